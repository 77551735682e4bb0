//! The process-wide codec-info registry (spec §4.3): descriptors parsed
//! from disk, indexed by extension, MIME type and magic number, and
//! exposed only through a one-shot guarded initializer (spec §9 Open
//! Question, "Process-wide registry": "replace the ad-hoc mutable
//! globals with a single, one-shot-initialized registry... disallow
//! re-initialization; provide an explicit teardown for tests").

mod magic;
mod parser;

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

pub use magic::MagicPattern;
use sail_types::codec_info::CodecInfo;
use sail_types::features::Priority;

use crate::config::SearchPaths;

/// Descriptor file suffix the registry scans for in each search
/// directory.
const DESCRIPTOR_EXTENSION: &str = "sail";

/// One registered codec: its parsed descriptor plus the order it was
/// discovered in, used to break priority ties (spec §4.3: "ties broken
/// by codec priority then file-discovery order").
#[derive(Debug, Clone)]
struct Entry {
	info: CodecInfo,
	discovery_order: usize,
}

/// The queryable codec-info registry.
#[derive(Debug, Default)]
pub struct Registry {
	entries: Vec<Entry>,
	by_extension: HashMap<String, Vec<usize>>,
	by_mime_type: HashMap<String, Vec<usize>>,
	magic_index: Vec<(MagicPattern, usize)>,
}

fn entry_rank(entry: &Entry) -> (std::cmp::Reverse<Priority>, usize) {
	(std::cmp::Reverse(entry.info.priority), entry.discovery_order)
}

impl Registry {
	/// Scans every directory in `search_paths` for `*.sail` descriptors,
	/// parsing each one. A descriptor that fails to parse or fails its
	/// post-parse invariants is logged and skipped, never fatal (spec
	/// §4.3: "failures to parse individual descriptors are logged and
	/// skipped, never fatal").
	pub fn build(search_paths: &SearchPaths) -> Self {
		let mut entries = Vec::new();
		for directory in &search_paths.directories {
			scan_directory(directory, &mut entries);
		}
		Self::from_entries(entries)
	}

	fn from_entries(mut raw: Vec<CodecInfo>) -> Self {
		let mut entries: Vec<Entry> = raw
			.drain(..)
			.enumerate()
			.map(|(discovery_order, info)| Entry { info, discovery_order })
			.collect();
		entries.sort_by_key(entry_rank);

		let mut by_extension: HashMap<String, Vec<usize>> = HashMap::new();
		let mut by_mime_type: HashMap<String, Vec<usize>> = HashMap::new();
		let mut magic_index = Vec::new();

		for (index, entry) in entries.iter().enumerate() {
			for extension in &entry.info.extensions {
				by_extension.entry(extension.clone()).or_default().push(index);
			}
			for mime_type in &entry.info.mime_types {
				by_mime_type.entry(mime_type.clone()).or_default().push(index);
			}
			for magic in &entry.info.magic_numbers {
				if let Some(pattern) = MagicPattern::parse(magic) {
					magic_index.push((pattern, index));
				} else {
					log::warn!("{}: malformed magic pattern '{magic}', ignored", entry.info.name);
				}
			}
		}

		for indices in by_extension.values_mut() {
			indices.sort_by_key(|&i| entry_rank(&entries[i]));
		}
		for indices in by_mime_type.values_mut() {
			indices.sort_by_key(|&i| entry_rank(&entries[i]));
		}
		magic_index.sort_by_key(|&(_, i)| entry_rank(&entries[i]));

		Self { entries, by_extension, by_mime_type, magic_index }
	}

	/// Builds a registry directly from already-parsed descriptors,
	/// bypassing disk I/O. Used by tests and by [`global`] after a
	/// descriptor is removed from the index (spec end-to-end scenario 6).
	pub fn from_codec_infos(infos: Vec<CodecInfo>) -> Self {
		Self::from_entries(infos)
	}

	/// Highest-priority codec claiming `extension` (already lower-cased
	/// by the caller, or not; comparison lower-cases internally).
	pub fn by_extension(&self, extension: &str) -> Option<&CodecInfo> {
		let extension = extension.to_ascii_lowercase();
		let indices = self.by_extension.get(&extension)?;
		indices.first().map(|&i| &self.entries[i].info)
	}

	/// Highest-priority codec claiming `mime_type`.
	pub fn by_mime_type(&self, mime_type: &str) -> Option<&CodecInfo> {
		let mime_type = mime_type.to_ascii_lowercase();
		let indices = self.by_mime_type.get(&mime_type)?;
		indices.first().map(|&i| &self.entries[i].info)
	}

	/// Highest-priority codec whose magic pattern matches the leading
	/// bytes of `buffer` (spec §4.5: probing reads up to
	/// `MAGIC_BUFFER_SIZE` bytes and checks every registered pattern for a
	/// prefix match).
	pub fn by_magic(&self, buffer: &[u8]) -> Option<&CodecInfo> {
		self.magic_index
			.iter()
			.find(|(pattern, _)| pattern.matches(buffer))
			.map(|&(_, i)| &self.entries[i].info)
	}

	/// All registered codecs, ordered by descending priority then
	/// discovery order (spec §4.3: "The registry exposes a read-only
	/// enumeration ordered by descending priority then discovery order").
	pub fn enumerate(&self) -> impl Iterator<Item = &CodecInfo> {
		self.entries.iter().map(|entry| &entry.info)
	}

	/// Number of registered codecs.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Whether the registry holds no codecs.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

fn scan_directory(directory: &Path, out: &mut Vec<CodecInfo>) {
	let read_dir = match fs::read_dir(directory) {
		Ok(read_dir) => read_dir,
		Err(err) => {
			log::warn!("could not open codec search directory '{}': {err}", directory.display());
			return;
		}
	};

	for entry in read_dir.flatten() {
		let path = entry.path();
		if path.extension().and_then(|e| e.to_str()) != Some(DESCRIPTOR_EXTENSION) {
			continue;
		}
		match parser::parse_descriptor(&path) {
			Ok(info) => out.push(info),
			Err(err) => log::warn!("skipping codec descriptor '{}': {err}", path.display()),
		}
	}
}

static GLOBAL: OnceLock<Registry> = OnceLock::new();

/// Initializes the process-wide registry from the resolved search path.
/// Calling this more than once is a no-op: the registry built on the
/// first call wins (spec §9: "disallow re-initialization").
pub fn init_global() -> &'static Registry {
	GLOBAL.get_or_init(|| Registry::build(&SearchPaths::resolve()))
}

/// Returns the process-wide registry, initializing it with the default
/// search path resolution if this is the first access.
pub fn global() -> &'static Registry {
	init_global()
}

#[cfg(test)]
mod tests {
	use sail_types::error::SailResult;
	use sail_types::features::{ReadFeature, ReadFeatures};

	use super::*;

	fn sample(name: &str, extension: &str, priority: Priority) -> CodecInfo {
		CodecInfo {
			layout: sail_types::codec_info::SUPPORTED_LAYOUT,
			version: "1.0".into(),
			name: name.into(),
			description: "test codec".into(),
			priority,
			extensions: vec![extension.into()],
			mime_types: vec![],
			magic_numbers: vec![],
			path: Path::new("/dev/null").into(),
			read_features: ReadFeatures {
				output_pixel_formats: vec![],
				preferred_output_pixel_format: sail_types::pixel::PixelFormat::Unknown,
				features: ReadFeature::STATIC,
			},
			write_features: None,
		}
	}

	#[test]
	fn extension_lookup_breaks_ties_by_priority() -> SailResult<()> {
		let high = sample("HIGH", "img", Priority::High);
		let low = sample("LOW", "img", Priority::Low);
		let registry = Registry::from_codec_infos(vec![low, high]);
		assert_eq!(registry.by_extension("img").unwrap().name, "HIGH");
		Ok(())
	}

	#[test]
	fn removing_the_top_priority_entry_falls_back_to_the_next() {
		let high = sample("HIGH", "img", Priority::High);
		let low = sample("LOW", "img", Priority::Low);
		let registry = Registry::from_codec_infos(vec![low.clone(), high]);
		assert_eq!(registry.by_extension("img").unwrap().name, "HIGH");

		let registry = Registry::from_codec_infos(vec![low]);
		assert_eq!(registry.by_extension("img").unwrap().name, "LOW");
	}

	#[test]
	fn extension_match_is_case_insensitive() {
		let codec = sample("PNG", "png", Priority::Medium);
		let registry = Registry::from_codec_infos(vec![codec]);
		assert_eq!(registry.by_extension("PNG").unwrap().name, "PNG");
	}

	#[test]
	fn enumerate_orders_by_priority_then_discovery() {
		let a = sample("A", "a", Priority::Medium);
		let b = sample("B", "b", Priority::Medium);
		let c = sample("C", "c", Priority::Highest);
		let registry = Registry::from_codec_infos(vec![a, b, c]);
		let names: Vec<&str> = registry.enumerate().map(|info| info.name.as_str()).collect();
		assert_eq!(names, vec!["C", "A", "B"]);
	}

	#[test]
	fn magic_lookup_respects_priority() {
		let mut low = sample("LOW", "dat", Priority::Low);
		low.magic_numbers = vec!["89504e47".into()];
		let mut high = sample("HIGH", "dat2", Priority::High);
		high.magic_numbers = vec!["89504e47".into()];
		let registry = Registry::from_codec_infos(vec![low, high]);
		let found = registry.by_magic(&[0x89, 0x50, 0x4e, 0x47]).unwrap();
		assert_eq!(found.name, "HIGH");
	}
}
