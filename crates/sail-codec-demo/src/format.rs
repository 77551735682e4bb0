//! Decode/encode logic for the synthetic `SDEM` wire format, kept free
//! of any ABI plumbing so it can be unit tested directly.

use sail_types::error::{SailError, SailErrorKind, SailResult};
use sail_types::image::Image;
use sail_types::pixel::PixelFormat;

/// The format's 4-byte magic prefix.
pub const MAGIC: &[u8; 4] = b"SDEM";

const HEADER_LEN: usize = 4 + 4 + 4;
const BYTES_PER_PIXEL: u32 = 3;

/// Parses a complete `SDEM` buffer into an [`Image`].
pub fn decode(bytes: &[u8]) -> SailResult<Image> {
	if bytes.len() < HEADER_LEN || &bytes[0..4] != MAGIC {
		return Err(SailError::new(SailErrorKind::BrokenImage, "not an SDEM stream"));
	}
	let width = u32::from_le_bytes(bytes[4..8].try_into().unwrap());
	let height = u32::from_le_bytes(bytes[8..12].try_into().unwrap());
	if width == 0 || height == 0 {
		return Err(SailError::new(SailErrorKind::IncorrectImageDimensions, "SDEM header reports zero dimension"));
	}

	let bytes_per_line = width * BYTES_PER_PIXEL;
	let expected_len = HEADER_LEN + (bytes_per_line as usize) * (height as usize);
	if bytes.len() < expected_len {
		return Err(SailError::new(SailErrorKind::BrokenImage, "SDEM stream truncated before its pixel data ended"));
	}

	let mut image = Image::skeleton(width, height, PixelFormat::Bpp24Rgb, bytes_per_line);
	image.pixels = bytes[HEADER_LEN..expected_len].to_vec();
	Ok(image)
}

/// Serializes `image` into a complete `SDEM` buffer.
pub fn encode(image: &Image) -> SailResult<Vec<u8>> {
	if image.pixel_format != PixelFormat::Bpp24Rgb {
		return Err(SailError::new(
			SailErrorKind::UnsupportedPixelFormat,
			format!("SDEM only writes BPP24-RGB, got {}", image.pixel_format),
		));
	}
	if !image.has_valid_dimensions() {
		return Err(SailError::new(SailErrorKind::IncorrectImageDimensions, "cannot encode a zero-sized image"));
	}
	let expected_len = (image.bytes_per_line as usize) * (image.height as usize);
	if image.pixels.len() != expected_len {
		return Err(SailError::new(
			SailErrorKind::BrokenImage,
			format!("image reports {expected_len} pixel bytes but carries {}", image.pixels.len()),
		));
	}

	let mut out = Vec::with_capacity(HEADER_LEN + image.pixels.len());
	out.extend_from_slice(MAGIC);
	out.extend_from_slice(&image.width.to_le_bytes());
	out.extend_from_slice(&image.height.to_le_bytes());
	out.extend_from_slice(&image.pixels);
	Ok(out)
}
