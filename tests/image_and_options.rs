//! Cross-cutting scenarios over the image data model and the
//! options/features model (spec §4.2, §4.7, §8 round-trip laws and
//! end-to-end scenario 4 "compression validation").

use sail::prelude::*;

fn sample_payload(width: u32, height: u32) -> Vec<u8> {
	let mut data = Vec::new();
	data.extend_from_slice(sail_codec_demo::MAGIC);
	data.extend_from_slice(&width.to_le_bytes());
	data.extend_from_slice(&height.to_le_bytes());
	data.extend(std::iter::repeat_n(0x5au8, (width * height * 3) as usize));
	data
}

#[test]
fn decoded_image_with_attached_metadata_deep_copies_independently() {
	let mut image = sail_codec_demo::decode(&sample_payload(2, 2)).unwrap();
	let mut chain = MetaDataChain::new();
	chain.push(MetaDataNode::new(MetaDataKey::Author, ValueType::String, b"artist".to_vec()));
	chain.push(MetaDataNode::unknown("x-custom", ValueType::Data, vec![1, 2, 3]));
	image.meta_data = chain;

	let mut copy = image.clone();
	assert_eq!(copy, image);

	copy.pixels[0] = 0xff;
	copy.meta_data.push(MetaDataNode::new(MetaDataKey::Software, ValueType::String, b"sail".to_vec()));

	assert_ne!(copy.pixels, image.pixels);
	assert_eq!(image.meta_data.len(), 2, "mutating the copy must not affect the original chain");
	assert_eq!(copy.meta_data.len(), 3);
}

#[test]
fn read_options_from_features_enables_metadata_when_advertised() {
	let features = ReadFeatures {
		output_pixel_formats: vec![PixelFormat::Bpp24Rgb],
		preferred_output_pixel_format: PixelFormat::Bpp24Rgb,
		features: ReadFeature::STATIC | ReadFeature::META_DATA,
	};
	let options = ReadOptions::from_features(&features);
	assert!(options.io_options.contains(IoOption::META_DATA));
	assert!(options.io_options.contains(IoOption::ICC_PROFILE));
	assert!(options.io_options.contains(IoOption::SOURCE_IMAGE));
}

#[test]
fn write_options_validate_fails_fast_on_unsupported_compression() {
	let features = WriteFeatures {
		output_pixel_formats: vec![PixelFormat::Bpp24Rgb],
		preferred_output_pixel_format: PixelFormat::Bpp24Rgb,
		features: ReadFeature::STATIC,
		properties: WriteProperty::empty(),
		compressions: vec![CompressionType::Rle],
		default_compression: CompressionType::Rle,
		compression_level_min: 0.0,
		compression_level_max: 0.0,
		compression_level_default: 0.0,
		compression_level_step: 0.0,
	};

	let mut options = WriteOptions::from_features(&features);
	options.compression = CompressionType::Lzw;

	let err = options.validate(&features).unwrap_err();
	assert_eq!(err.kind, SailErrorKind::UnsupportedCompression);
}

#[test]
fn metadata_key_round_trip_holds_for_every_defined_key() {
	for key in MetaDataKey::DEFINED {
		assert_eq!(&MetaDataKey::from_str(key.to_str()), key);
	}
}

#[test]
fn zero_sized_image_fails_the_dimension_check() {
	let image = Image::skeleton(0, 4, PixelFormat::Bpp24Rgb, 0);
	assert!(!image.has_valid_dimensions());
}
