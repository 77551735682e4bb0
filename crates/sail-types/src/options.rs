//! Per-session configuration derived from a codec's features (spec §4.2).

use crate::error::{SailError, SailErrorKind, SailResult};
use crate::features::{IoOption, ReadFeatures, WriteFeatures};
use crate::pixel::CompressionType;

/// Options for a read (decode) session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadOptions {
	/// Which optional payloads the engine/codec should populate.
	pub io_options: IoOption,
}

impl ReadOptions {
	/// Builds options that enable every flag the codec advertises
	/// (spec §4.2: "enable everything the codec supports"). Callers may
	/// mutate the result before passing it to a start call.
	pub fn from_features(features: &ReadFeatures) -> Self {
		let mut io_options = IoOption::empty();
		if features.features.contains(crate::features::ReadFeature::META_DATA) {
			io_options |= IoOption::META_DATA;
		}
		io_options |= IoOption::ICC_PROFILE | IoOption::SOURCE_IMAGE;
		Self { io_options }
	}
}

/// Options for a write (encode) session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteOptions {
	/// Which optional payloads the engine/codec should consume/emit.
	pub io_options: IoOption,
	/// Compression scheme to use.
	pub compression: CompressionType,
	/// Compression level; `0.0` when the codec is "type-only"
	/// (see [`WriteFeatures::is_type_only`]).
	pub compression_level: f64,
}

impl WriteOptions {
	/// Builds options from a codec's advertised write features: every
	/// flag enabled, plus the codec's default compression and level
	/// (spec §4.2).
	pub fn from_features(features: &WriteFeatures) -> Self {
		let mut io_options = IoOption::empty();
		if features.features.contains(crate::features::ReadFeature::META_DATA) {
			io_options |= IoOption::META_DATA;
		}
		io_options |= IoOption::ICC_PROFILE;
		Self {
			io_options,
			compression: features.default_compression,
			compression_level: features.compression_level_default,
		}
	}

	/// Validates this selection against the codec's advertised write
	/// features (spec §3 "Read/write options": the chosen compression
	/// must appear in `compressions`, and a non-zero level must lie in
	/// `[min, max]`). Called before any codec I/O so compression mistakes
	/// fail fast (spec §4.6, end-to-end scenario 4).
	pub fn validate(&self, features: &WriteFeatures) -> SailResult<()> {
		if !features.compressions.contains(&self.compression) {
			return Err(SailError::new(
				SailErrorKind::UnsupportedCompression,
				format!("compression {:?} is not supported by this codec", self.compression),
			));
		}
		if self.compression_level != 0.0
			&& (self.compression_level < features.compression_level_min
				|| self.compression_level > features.compression_level_max)
		{
			return Err(SailError::new(
				SailErrorKind::UnsupportedCompression,
				format!(
					"compression level {} outside [{}, {}]",
					self.compression_level, features.compression_level_min, features.compression_level_max
				),
			));
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::features::{ReadFeature, WriteProperty};

	fn sample_write_features() -> WriteFeatures {
		WriteFeatures {
			output_pixel_formats: vec![],
			preferred_output_pixel_format: crate::pixel::PixelFormat::Unknown,
			features: ReadFeature::STATIC,
			properties: WriteProperty::empty(),
			compressions: vec![CompressionType::Rle, CompressionType::None],
			default_compression: CompressionType::Rle,
			compression_level_min: 0.0,
			compression_level_max: 0.0,
			compression_level_default: 0.0,
			compression_level_step: 0.0,
		}
	}

	#[test]
	fn from_features_picks_default_compression() {
		let features = sample_write_features();
		let options = WriteOptions::from_features(&features);
		assert_eq!(options.compression, CompressionType::Rle);
		assert_eq!(options.compression_level, 0.0);
	}

	#[test]
	fn validate_rejects_unsupported_compression() {
		let features = sample_write_features();
		let options = WriteOptions { compression: CompressionType::Lzw, ..WriteOptions::from_features(&features) };
		let err = options.validate(&features).unwrap_err();
		assert_eq!(err.kind, SailErrorKind::UnsupportedCompression);
	}
}
