//! The immutable codec-info descriptor (spec §3) and the invariants a
//! freshly parsed descriptor must satisfy before it is accepted into the
//! registry (spec §4.3).

use std::path::PathBuf;

use crate::error::{SailError, SailErrorKind, SailResult};
use crate::features::{Priority, ReadFeatures, WriteFeatures};
use crate::pixel::CompressionType;

/// Number of bytes probed from a source when matching magic numbers
/// (spec §4.5). A magic pattern may be at most `3 * MAGIC_BUFFER_SIZE -
/// 1` characters once rendered as a hex string with `??` wildcards
/// (two hex digits plus one separator per byte, minus the trailing
/// separator).
pub const MAGIC_BUFFER_SIZE: usize = 16;

/// Only plugin layout version this engine accepts (spec §3, §6).
pub const SUPPORTED_LAYOUT: i32 = 6;

/// Immutable metadata describing one image format and the plugin binary
/// that implements it.
#[derive(Debug, Clone, PartialEq)]
pub struct CodecInfo {
	/// ABI layout version; must equal [`SUPPORTED_LAYOUT`].
	pub layout: i32,
	/// Free-form codec version string, e.g. `"1.5.2"`.
	pub version: String,
	/// Uppercase codec name, matching `^[A-Z0-9_]+$`.
	pub name: String,
	/// Human-readable description.
	pub description: String,
	/// Registry lookup tie-break order.
	pub priority: Priority,
	/// Lower-cased file extensions this codec claims (no leading dot).
	pub extensions: Vec<String>,
	/// Lower-cased MIME types this codec claims.
	pub mime_types: Vec<String>,
	/// Magic-number patterns, lower-cased hex with `??` wildcard bytes.
	pub magic_numbers: Vec<String>,
	/// Absolute path to the shared module, derived from the descriptor's
	/// own location (spec §C, recovered from `codec_info_private.c`).
	pub path: PathBuf,
	/// Declared read capabilities.
	pub read_features: ReadFeatures,
	/// Declared write capabilities, if the codec can write at all.
	pub write_features: Option<WriteFeatures>,
}

impl CodecInfo {
	/// Validates every invariant spec §3 lists for a parsed descriptor.
	/// Returns [`SailErrorKind::IncompleteCodecInfo`] naming the first
	/// violation found, or [`SailErrorKind::UnsupportedCodecLayout`] if
	/// the layout itself is wrong (checked first, per spec §4.3: "the
	/// layout must equal 6 ... or the descriptor is rejected").
	pub fn validate(&self) -> SailResult<()> {
		if self.layout != SUPPORTED_LAYOUT {
			return Err(SailError::new(
				SailErrorKind::UnsupportedCodecLayout,
				format!("unsupported codec layout {} (only {SUPPORTED_LAYOUT} is accepted)", self.layout),
			));
		}

		let incomplete = |msg: &str| {
			Err(SailError::new(SailErrorKind::IncompleteCodecInfo, format!("{}: {msg}", self.name)))
		};

		if self.name.is_empty() || !self.name.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
		{
			return incomplete("name must be non-empty and match ^[A-Z0-9_]+$");
		}
		if self.version.is_empty() {
			return incomplete("version must be non-empty");
		}
		if self.description.is_empty() {
			return incomplete("description must be non-empty");
		}
		if self.extensions.is_empty() && self.mime_types.is_empty() && self.magic_numbers.is_empty() {
			return incomplete("at least one of extensions/mime-types/magic-numbers is required");
		}

		if let Some(write) = &self.write_features {
			let advertises_frames =
				!write.features.is_empty() || !write.output_pixel_formats.is_empty();
			if advertises_frames {
				if write.output_pixel_formats.is_empty() {
					return incomplete("write features advertise frames but output_pixel_formats is empty");
				}
				if write.compressions.is_empty() {
					return incomplete("write features advertise frames but compressions is empty");
				}
				if write.output_pixel_formats.contains(&crate::pixel::PixelFormat::Unknown) {
					return incomplete("output_pixel_formats must not contain UNKNOWN");
				}
				if write.compressions.contains(&CompressionType::Unknown) {
					return incomplete("compressions must not contain UNKNOWN");
				}
			}
			if !write.compressions.contains(&write.default_compression)
				|| write.default_compression == CompressionType::Unknown
			{
				return incomplete("default_compression must be present in compressions and not UNKNOWN");
			}
			if write.compressions.len() > 1
				&& (write.compression_level_min != 0.0 || write.compression_level_max != 0.0)
			{
				return incomplete(
					"a codec with more than one compression type must report level min=max=0",
				);
			}
		}

		Ok(())
	}
}
