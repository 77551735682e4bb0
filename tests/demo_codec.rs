//! Exercises the bundled demo codec's wire format directly through its
//! public `decode`/`encode` functions (spec §6 plugin ABI v6, narrowed to
//! the codec-internal logic those ABI entry points wrap).

use sail_types::error::SailErrorKind;
use sail_types::pixel::PixelFormat;

fn sample_payload(width: u32, height: u32, fill: u8) -> Vec<u8> {
	let mut data = Vec::new();
	data.extend_from_slice(sail_codec_demo::MAGIC);
	data.extend_from_slice(&width.to_le_bytes());
	data.extend_from_slice(&height.to_le_bytes());
	data.extend(std::iter::repeat_n(fill, (width * height * 3) as usize));
	data
}

#[test]
fn decode_then_encode_round_trips_dimensions_and_pixels() {
	let data = sample_payload(4, 3, 0x7f);
	let image = sail_codec_demo::decode(&data).unwrap();

	assert_eq!(image.width, 4);
	assert_eq!(image.height, 3);
	assert_eq!(image.pixel_format, PixelFormat::Bpp24Rgb);
	assert_eq!(image.pixels, vec![0x7f; 4 * 3 * 3]);

	let encoded = sail_codec_demo::encode(&image).unwrap();
	assert_eq!(encoded, data);
}

#[test]
fn decode_rejects_wrong_magic() {
	let mut data = sample_payload(2, 2, 0x00);
	data[0] = b'X';
	let err = sail_codec_demo::decode(&data).unwrap_err();
	assert_eq!(err.kind, SailErrorKind::BrokenImage);
}

#[test]
fn decode_rejects_zero_dimensions() {
	let data = sample_payload(0, 4, 0x00);
	let err = sail_codec_demo::decode(&data).unwrap_err();
	assert_eq!(err.kind, SailErrorKind::IncorrectImageDimensions);
}

#[test]
fn decode_rejects_truncated_pixel_data() {
	let mut data = sample_payload(4, 4, 0x00);
	data.truncate(data.len() - 1);
	let err = sail_codec_demo::decode(&data).unwrap_err();
	assert_eq!(err.kind, SailErrorKind::BrokenImage);
}

#[test]
fn encode_rejects_non_rgb_pixel_format() {
	let data = sample_payload(2, 2, 0x00);
	let mut image = sail_codec_demo::decode(&data).unwrap();
	image.pixel_format = PixelFormat::Bpp32Rgba;
	let err = sail_codec_demo::encode(&image).unwrap_err();
	assert_eq!(err.kind, SailErrorKind::UnsupportedPixelFormat);
}

#[test]
fn decode_is_idempotent_on_the_same_bytes() {
	let data = sample_payload(3, 3, 0x11);
	let first = sail_codec_demo::decode(&data).unwrap();
	let second = sail_codec_demo::decode(&data).unwrap();
	assert_eq!(first.pixels, second.pixels);
	assert_eq!(first.width, second.width);
	assert_eq!(first.height, second.height);
}
