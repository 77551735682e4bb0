//! Benchmark helper utilities for `sail`.
//!
//! This crate generates synthetic codec descriptors and synthetic `SDEM`
//! (the demo codec's wire format) payloads so the registry, detector and
//! session engine can be exercised without a real image file on disk.

use sail_types::codec_info::{CodecInfo, SUPPORTED_LAYOUT};
use sail_types::features::{Priority, ReadFeature, ReadFeatures};
use sail_types::pixel::PixelFormat;

/// Builds a synthetic `SDEM` payload (the demo codec's wire format: 4-byte
/// magic, little-endian width/height, then tightly packed 24-bit RGB rows).
pub fn generate_sdem_payload(width: u32, height: u32) -> Vec<u8> {
	let mut data = Vec::new();
	data.extend_from_slice(sail_codec_demo::MAGIC);
	data.extend_from_slice(&width.to_le_bytes());
	data.extend_from_slice(&height.to_le_bytes());
	data.extend(std::iter::repeat_n(0x42u8, (width * height * 3) as usize));
	data
}

/// Builds `count` synthetic codec descriptors claiming distinct extensions,
/// for populating a registry without touching disk.
pub fn synthetic_codec_infos(count: usize) -> Vec<CodecInfo> {
	(0..count)
		.map(|i| CodecInfo {
			layout: SUPPORTED_LAYOUT,
			version: "1.0".into(),
			name: format!("SYN{i}"),
			description: "synthetic benchmark codec".into(),
			priority: Priority::Medium,
			extensions: vec![format!("syn{i}")],
			mime_types: vec![format!("image/x-syn{i}")],
			magic_numbers: vec![format!("{:02x}{:02x}{:02x}{:02x}", i % 256, 0xAA, 0xBB, 0xCC)],
			path: std::path::PathBuf::from("/dev/null"),
			read_features: ReadFeatures {
				output_pixel_formats: vec![PixelFormat::Bpp24Rgb],
				preferred_output_pixel_format: PixelFormat::Bpp24Rgb,
				features: ReadFeature::STATIC,
			},
			write_features: None,
		})
		.collect()
}

/// Common benchmark image sizes.
pub mod sizes {
	/// Tiny image: 16x16.
	pub const TINY: (u32, u32) = (16, 16);
	/// Small image: 128x128.
	pub const SMALL: (u32, u32) = (128, 128);
	/// Medium image: 512x512.
	pub const MEDIUM: (u32, u32) = (512, 512);
	/// Large image: 1920x1080.
	pub const LARGE: (u32, u32) = (1920, 1080);
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn generated_payload_round_trips_through_decode() {
		let data = generate_sdem_payload(4, 3);
		let image = sail_codec_demo::decode(&data).unwrap();
		assert_eq!(image.width, 4);
		assert_eq!(image.height, 3);
	}

	#[test]
	fn synthetic_codec_infos_have_distinct_extensions() {
		let infos = synthetic_codec_infos(8);
		assert_eq!(infos.len(), 8);
		let extensions: std::collections::HashSet<_> =
			infos.iter().flat_map(|i| i.extensions.iter()).collect();
		assert_eq!(extensions.len(), 8);
	}
}
