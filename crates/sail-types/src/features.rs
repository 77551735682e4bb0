//! Structured descriptors for codec capabilities (spec §3 "Read/write
//! features") and the priority used to break registry lookup ties
//! (spec §4.3).

use bitflags::bitflags;

use crate::pixel::{CompressionType, PixelFormat};

bitflags! {
	/// Capability bits a codec advertises for reading.
	#[derive(Debug, Clone, Copy, PartialEq, Eq)]
	pub struct ReadFeature: u32 {
		/// The format has exactly one frame.
		const STATIC = 1 << 0;
		/// The format can carry more than one frame played in sequence.
		const ANIMATED = 1 << 1;
		/// The format can carry more than one independent page/sub-image.
		const MULTI_PAGED = 1 << 2;
		/// The format can carry key-value metadata.
		const META_DATA = 1 << 3;
	}
}

impl ReadFeature {
	/// Parses a single descriptor bit name (e.g. `"META-DATA"`).
	pub fn parse_one(s: &str) -> Option<Self> {
		Some(match s.to_ascii_uppercase().as_str() {
			"STATIC" => ReadFeature::STATIC,
			"ANIMATED" => ReadFeature::ANIMATED,
			"MULTI-PAGED" | "MULTI_PAGED" => ReadFeature::MULTI_PAGED,
			"META-DATA" | "META_DATA" => ReadFeature::META_DATA,
			_ => return None,
		})
	}

	/// Parses a whitespace-separated list of bit names, OR-ing them
	/// together (spec §4.3: `features` key is "bit names OR'd").
	pub fn parse_list(s: &str) -> Option<Self> {
		let mut bits = ReadFeature::empty();
		for token in s.split_whitespace() {
			bits |= Self::parse_one(token)?;
		}
		Some(bits)
	}
}

bitflags! {
	/// Properties a write-capable codec can apply to its output.
	#[derive(Debug, Clone, Copy, PartialEq, Eq)]
	pub struct WriteProperty: u32 {
		/// The codec can write an interlaced image.
		const INTERLACED = 1 << 0;
	}
}

bitflags! {
	/// Bits selecting what a session should ask the codec to produce, set
	/// on [`crate::options::ReadOptions`]/[`crate::options::WriteOptions`].
	#[derive(Debug, Clone, Copy, PartialEq, Eq)]
	pub struct IoOption: u32 {
		/// Populate/emit the metadata chain.
		const META_DATA = 1 << 0;
		/// Populate/emit an embedded ICC profile.
		const ICC_PROFILE = 1 << 1;
		/// Populate/emit the source-image descriptor (spec §3).
		const SOURCE_IMAGE = 1 << 2;
	}
}

impl WriteProperty {
	/// Parses a single descriptor bit name.
	pub fn parse_one(s: &str) -> Option<Self> {
		Some(match s.to_ascii_uppercase().as_str() {
			"INTERLACED" => WriteProperty::INTERLACED,
			_ => return None,
		})
	}

	/// Parses a whitespace-separated list of bit names.
	pub fn parse_list(s: &str) -> Option<Self> {
		let mut bits = WriteProperty::empty();
		for token in s.split_whitespace() {
			bits |= Self::parse_one(token)?;
		}
		Some(bits)
	}
}

/// Registry tie-break order (spec §4.3): highest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Priority {
	/// Lowest priority: tried last.
	Lowest,
	/// Low priority.
	Low,
	/// Default priority for most codecs.
	Medium,
	/// High priority.
	High,
	/// Highest priority: tried first.
	Highest,
}

impl Priority {
	/// Parses the descriptor's `priority` string (spec §4.3: "string ->
	/// enum"). Case-insensitive, matching the INI convention that list
	/// values are lower-cased on load.
	pub fn parse(s: &str) -> Option<Self> {
		match s.to_ascii_uppercase().as_str() {
			"HIGHEST" => Some(Priority::Highest),
			"HIGH" => Some(Priority::High),
			"MEDIUM" => Some(Priority::Medium),
			"LOW" => Some(Priority::Low),
			"LOWEST" => Some(Priority::Lowest),
			_ => None,
		}
	}
}

/// What a codec can produce when reading (spec §3 "Read features").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadFeatures {
	/// Pixel formats the codec can output, in preference order.
	pub output_pixel_formats: Vec<PixelFormat>,
	/// The format the codec recommends when the caller has no preference.
	pub preferred_output_pixel_format: PixelFormat,
	/// Capability bits.
	pub features: ReadFeature,
}

/// What a codec can produce when writing (spec §3 "Write features").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteFeatures {
	/// Pixel formats the codec can output, in preference order.
	pub output_pixel_formats: Vec<PixelFormat>,
	/// The format the codec recommends when the caller has no preference.
	pub preferred_output_pixel_format: PixelFormat,
	/// Capability bits.
	pub features: ReadFeature,
	/// Properties the codec can apply to written output.
	pub properties: WriteProperty,
	/// Compression schemes the codec supports, in preference order.
	pub compressions: Vec<CompressionType>,
	/// The compression chosen when the caller has no preference.
	pub default_compression: CompressionType,
	/// Minimum compression level. `min == max == 0` means "type-only, no
	/// level" (spec §3, and the Open Question in spec §9 resolved that
	/// way).
	pub compression_level_min: f64,
	/// Maximum compression level.
	pub compression_level_max: f64,
	/// Default compression level.
	pub compression_level_default: f64,
	/// Smallest meaningful increment between levels.
	pub compression_level_step: f64,
}

impl WriteFeatures {
	/// Whether this codec's levels are "type-only" (spec §9 Open
	/// Question: both-zero means no levels, not "unspecified").
	pub fn is_type_only(&self) -> bool {
		self.compression_level_min == 0.0 && self.compression_level_max == 0.0
	}
}
