//! Pixel-format tags. Conversion tables between formats live in
//! `libsail-manip`'s Rust successor, out of scope for this core (spec §1).

use std::fmt;

/// A pixel layout tag. `Unknown` is the explicit "no preference/not set"
/// value everywhere the spec requires one (e.g. a descriptor's
/// `compressions` list must contain no `Unknown` entries).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormat {
	/// Sentinel: no format selected or recognised.
	Unknown,
	/// 8 bits per pixel, palette-indexed.
	Bpp8Indexed,
	/// 8 bits per pixel, grayscale.
	Bpp8Grayscale,
	/// 24 bits per pixel, RGB byte order.
	Bpp24Rgb,
	/// 24 bits per pixel, BGR byte order.
	Bpp24Bgr,
	/// 32 bits per pixel, RGBA byte order.
	Bpp32Rgba,
	/// 32 bits per pixel, BGRA byte order.
	Bpp32Bgra,
}

impl Default for PixelFormat {
	fn default() -> Self {
		Self::Unknown
	}
}

impl fmt::Display for PixelFormat {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl PixelFormat {
	/// Canonical string form, as used in codec descriptor files.
	pub fn as_str(&self) -> &'static str {
		match self {
			PixelFormat::Unknown => "UNKNOWN",
			PixelFormat::Bpp8Indexed => "BPP8-INDEXED",
			PixelFormat::Bpp8Grayscale => "BPP8-GRAYSCALE",
			PixelFormat::Bpp24Rgb => "BPP24-RGB",
			PixelFormat::Bpp24Bgr => "BPP24-BGR",
			PixelFormat::Bpp32Rgba => "BPP32-RGBA",
			PixelFormat::Bpp32Bgra => "BPP32-BGRA",
		}
	}

	/// Parses a descriptor's pixel-format name (case-insensitive).
	pub fn parse(s: &str) -> Option<Self> {
		Some(match s.to_ascii_uppercase().as_str() {
			"UNKNOWN" => PixelFormat::Unknown,
			"BPP8-INDEXED" => PixelFormat::Bpp8Indexed,
			"BPP8-GRAYSCALE" => PixelFormat::Bpp8Grayscale,
			"BPP24-RGB" => PixelFormat::Bpp24Rgb,
			"BPP24-BGR" => PixelFormat::Bpp24Bgr,
			"BPP32-RGBA" => PixelFormat::Bpp32Rgba,
			"BPP32-BGRA" => PixelFormat::Bpp32Bgra,
			_ => return None,
		})
	}
}

/// A lossless or lossy compression scheme a write-capable codec supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompressionType {
	/// Sentinel: not a valid choice for `default_compression` or a chosen
	/// write option.
	Unknown,
	/// No compression.
	None,
	/// Run-length encoding.
	Rle,
	/// LZW.
	Lzw,
	/// Deflate (zlib).
	Deflate,
	/// JPEG (DCT-based lossy).
	Jpeg,
}

impl Default for CompressionType {
	fn default() -> Self {
		Self::Unknown
	}
}

impl fmt::Display for CompressionType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl CompressionType {
	/// Canonical string form, as used in codec descriptor files.
	pub fn as_str(&self) -> &'static str {
		match self {
			CompressionType::Unknown => "UNKNOWN",
			CompressionType::None => "NONE",
			CompressionType::Rle => "RLE",
			CompressionType::Lzw => "LZW",
			CompressionType::Deflate => "DEFLATE",
			CompressionType::Jpeg => "JPEG",
		}
	}

	/// Parses a descriptor's compression-type name (case-insensitive).
	pub fn parse(s: &str) -> Option<Self> {
		Some(match s.to_ascii_uppercase().as_str() {
			"UNKNOWN" => CompressionType::Unknown,
			"NONE" => CompressionType::None,
			"RLE" => CompressionType::Rle,
			"LZW" => CompressionType::Lzw,
			"DEFLATE" => CompressionType::Deflate,
			"JPEG" => CompressionType::Jpeg,
			_ => return None,
		})
	}
}
