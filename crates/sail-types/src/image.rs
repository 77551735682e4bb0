//! The image and source-image data model (spec §3, §4.7).

use bitflags::bitflags;

use crate::meta_data::MetaDataChain;
use crate::pixel::{CompressionType, PixelFormat};

bitflags! {
	/// Per-image rendering hints a codec may set.
	#[derive(Debug, Clone, Copy, PartialEq, Eq)]
	pub struct ImageProperty: u32 {
		/// Rows are stored bottom-to-top.
		const FLIPPED_VERTICALLY = 1 << 0;
		/// The image was written progressively/interlaced.
		const INTERLACED = 1 << 1;
	}
}

/// A palette of indexed colours, present when `pixel_format` is
/// `Bpp8Indexed`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
	/// Pixel format the palette entries themselves are encoded in
	/// (typically 24- or 32-bit).
	pub pixel_format: PixelFormat,
	/// Raw palette bytes, `pixel_format`-encoded, one entry after another.
	pub data: Vec<u8>,
}

/// What the file actually contained, before any format conversion
/// (spec §3 "Source-image descriptor").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceImage {
	/// Pixel format as stored on disk.
	pub pixel_format: PixelFormat,
	/// Chroma subsampling scheme, codec-specific (e.g. `"4:2:0"`), or
	/// `None` when not applicable.
	pub chroma_subsampling: Option<String>,
	/// Rendering hints as stored.
	pub properties: ImageProperty,
	/// Compression the file used.
	pub compression: CompressionType,
}

/// A single decoded (or about-to-be-encoded) frame.
///
/// Created and populated jointly by the engine and the codec; owned by
/// the caller once `next_frame` returns it (spec §3).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
	/// Width in pixels.
	pub width: u32,
	/// Height in pixels.
	pub height: u32,
	/// Pixel layout of `pixels`.
	pub pixel_format: PixelFormat,
	/// Stride: bytes from the start of one row to the start of the next.
	pub bytes_per_line: u32,
	/// Owned pixel buffer, `bytes_per_line * height` bytes.
	pub pixels: Vec<u8>,
	/// Palette, present only for indexed pixel formats.
	pub palette: Option<Palette>,
	/// Key-value metadata carried alongside the pixels.
	pub meta_data: MetaDataChain,
	/// Embedded ICC colour profile, if any.
	pub iccp: Option<Vec<u8>>,
	/// What the file actually contained before conversion, if the codec
	/// reported it and the session requested `IoOption::SOURCE_IMAGE`.
	pub source_image: Option<SourceImage>,
	/// Inter-frame delay in milliseconds, for animated formats. Zero for
	/// static images.
	pub delay_ms: u32,
	/// Rendering hints.
	pub properties: ImageProperty,
}

impl Image {
	/// An empty skeleton with no pixels, the shape `read_seek_next_frame`
	/// produces before `read_frame` fills `pixels` in (spec §4.6).
	pub fn skeleton(width: u32, height: u32, pixel_format: PixelFormat, bytes_per_line: u32) -> Self {
		Self {
			width,
			height,
			pixel_format,
			bytes_per_line,
			pixels: Vec::new(),
			palette: None,
			meta_data: MetaDataChain::new(),
			iccp: None,
			source_image: None,
			delay_ms: 0,
			properties: ImageProperty::empty(),
		}
	}

	/// Basic dimension sanity check (spec §7:
	/// `INCORRECT_IMAGE_DIMENSIONS`).
	pub fn has_valid_dimensions(&self) -> bool {
		self.width > 0 && self.height > 0
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn deep_copy_is_independent_of_original() {
		let mut image = Image::skeleton(2, 2, PixelFormat::Bpp24Rgb, 6);
		image.pixels = vec![0u8; 12];
		let mut copy = image.clone();
		copy.pixels[0] = 255;
		assert_eq!(image.pixels[0], 0);
		assert_ne!(image.pixels, copy.pixels);
	}
}
