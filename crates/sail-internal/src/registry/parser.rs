//! Parses a codec descriptor file (spec §4.3, §6: "Codec descriptor
//! file (INI)") into a [`CodecInfo`].

use std::path::Path;

use ini::Ini;
use sail_types::codec_info::CodecInfo;
use sail_types::error::{SailError, SailErrorKind, SailResult};
use sail_types::features::{Priority, ReadFeature, ReadFeatures, WriteFeatures, WriteProperty};
use sail_types::pixel::{CompressionType, PixelFormat};

const KNOWN_SECTIONS: &[&str] = &["codec", "read-features", "write-features"];
const KNOWN_CODEC_KEYS: &[&str] =
	&["layout", "version", "priority", "name", "description", "magic-numbers", "extensions", "mime-types"];
const KNOWN_READ_FEATURE_KEYS: &[&str] = &["features"];
const KNOWN_WRITE_FEATURE_KEYS: &[&str] = &[
	"features",
	"output-pixel-formats",
	"properties",
	"compression-types",
	"default-compression",
	"compression-level-min",
	"compression-level-max",
	"compression-level-default",
	"compression-level-step",
];

fn parse_error(path: &Path, message: impl Into<String>) -> SailError {
	SailError::new(SailErrorKind::ParseFile, format!("{}: {}", path.display(), message.into()))
}

/// Splits a semicolon-separated descriptor list, dropping empty entries
/// (spec §8: "Empty values in the descriptor are ignored silently") and
/// lower-casing every entry (spec §4.3).
fn split_list_lower(value: &str) -> Vec<String> {
	value
		.split(';')
		.map(str::trim)
		.filter(|s| !s.is_empty())
		.map(str::to_ascii_lowercase)
		.collect()
}

fn check_unknown_keys(
	path: &Path,
	section_name: &str,
	section: &ini::Properties,
	known: &[&str],
) -> SailResult<()> {
	for (key, _) in section.iter() {
		if !known.contains(&key) {
			return Err(parse_error(path, format!("unknown key '{key}' in section [{section_name}]")));
		}
	}
	Ok(())
}

/// Parses one descriptor file. `path` is the descriptor's own location;
/// the returned [`CodecInfo::path`] is derived from it (spec §C,
/// recovered from `codec_info_private.c`: the shared module sits next to
/// its descriptor, sharing the descriptor's base name).
pub fn parse_descriptor(path: &Path) -> SailResult<CodecInfo> {
	let ini = Ini::load_from_file(path)
		.map_err(|e| parse_error(path, format!("failed to parse INI: {e}")))?;

	for section_name in ini.sections().flatten() {
		if !KNOWN_SECTIONS.contains(&section_name) {
			return Err(parse_error(path, format!("unknown section [{section_name}]")));
		}
	}

	let codec_section = ini
		.section(Some("codec"))
		.ok_or_else(|| parse_error(path, "missing [codec] section"))?;
	check_unknown_keys(path, "codec", codec_section, KNOWN_CODEC_KEYS)?;

	let layout: i32 = codec_section
		.get("layout")
		.ok_or_else(|| parse_error(path, "missing 'layout'"))?
		.trim()
		.parse()
		.map_err(|_| parse_error(path, "'layout' is not an integer"))?;

	let version = codec_section.get("version").unwrap_or("").trim().to_string();
	let name = codec_section.get("name").unwrap_or("").trim().to_ascii_uppercase();
	let description = codec_section.get("description").unwrap_or("").trim().to_string();

	let priority = match codec_section.get("priority").map(str::trim) {
		Some(s) if !s.is_empty() => Priority::parse(s)
			.ok_or_else(|| parse_error(path, format!("unrecognised priority '{s}'")))?,
		_ => Priority::Medium,
	};

	let extensions = codec_section.get("extensions").map(split_list_lower).unwrap_or_default();
	let mime_types = codec_section.get("mime-types").map(split_list_lower).unwrap_or_default();
	let magic_numbers = codec_section
		.get("magic-numbers")
		.map(split_list_lower)
		.unwrap_or_default()
		.into_iter()
		.filter(|magic| {
			let within_limit = magic.len() <= 3 * sail_types::codec_info::MAGIC_BUFFER_SIZE - 1;
			if !within_limit {
				log::warn!(
					"{}: magic pattern '{magic}' exceeds 3*MAGIC_BUFFER_SIZE-1 characters, dropped",
					path.display()
				);
			}
			within_limit
		})
		.collect::<Vec<_>>();

	let read_features = parse_read_features(path, &ini)?;
	let write_features = parse_write_features(path, &ini)?;

	let codec_dir = path.parent().unwrap_or_else(|| Path::new("."));
	let stem = path.file_stem().map(|s| s.to_string_lossy().to_string()).unwrap_or_default();
	let module_path = codec_dir.join(platform_module_name(&stem));

	let info = CodecInfo {
		layout,
		version,
		name,
		description,
		priority,
		extensions,
		mime_types,
		magic_numbers,
		path: module_path,
		read_features,
		write_features,
	};

	info.validate()?;
	Ok(info)
}

#[cfg(target_os = "windows")]
fn platform_module_name(stem: &str) -> String {
	format!("{stem}.dll")
}

#[cfg(target_os = "macos")]
fn platform_module_name(stem: &str) -> String {
	format!("lib{stem}.dylib")
}

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
fn platform_module_name(stem: &str) -> String {
	format!("lib{stem}.so")
}

fn parse_read_features(path: &Path, ini: &Ini) -> SailResult<ReadFeatures> {
	let Some(section) = ini.section(Some("read-features")) else {
		return Ok(ReadFeatures {
			output_pixel_formats: Vec::new(),
			preferred_output_pixel_format: PixelFormat::Unknown,
			features: ReadFeature::empty(),
		});
	};
	check_unknown_keys(path, "read-features", section, KNOWN_READ_FEATURE_KEYS)?;

	let features = match section.get("features").map(str::trim) {
		Some(s) if !s.is_empty() => {
			ReadFeature::parse_list(s).ok_or_else(|| parse_error(path, format!("unrecognised feature bit in '{s}'")))?
		}
		_ => ReadFeature::empty(),
	};

	Ok(ReadFeatures {
		output_pixel_formats: Vec::new(),
		preferred_output_pixel_format: PixelFormat::Unknown,
		features,
	})
}

fn parse_write_features(path: &Path, ini: &Ini) -> SailResult<Option<WriteFeatures>> {
	let Some(section) = ini.section(Some("write-features")) else {
		return Ok(None);
	};
	check_unknown_keys(path, "write-features", section, KNOWN_WRITE_FEATURE_KEYS)?;

	let features = match section.get("features").map(str::trim) {
		Some(s) if !s.is_empty() => {
			ReadFeature::parse_list(s).ok_or_else(|| parse_error(path, format!("unrecognised feature bit in '{s}'")))?
		}
		_ => ReadFeature::empty(),
	};

	let properties = match section.get("properties").map(str::trim) {
		Some(s) if !s.is_empty() => WriteProperty::parse_list(s)
			.ok_or_else(|| parse_error(path, format!("unrecognised property bit in '{s}'")))?,
		_ => WriteProperty::empty(),
	};

	let output_pixel_formats = match section.get("output-pixel-formats").map(str::trim) {
		Some(s) if !s.is_empty() => s
			.split(';')
			.map(str::trim)
			.filter(|s| !s.is_empty())
			.map(|s| PixelFormat::parse(s).ok_or_else(|| parse_error(path, format!("unrecognised pixel format '{s}'"))))
			.collect::<SailResult<Vec<_>>>()?,
		_ => Vec::new(),
	};

	let compressions = match section.get("compression-types").map(str::trim) {
		Some(s) if !s.is_empty() => s
			.split(';')
			.map(str::trim)
			.filter(|s| !s.is_empty())
			.map(|s| CompressionType::parse(s).ok_or_else(|| parse_error(path, format!("unrecognised compression '{s}'"))))
			.collect::<SailResult<Vec<_>>>()?,
		_ => Vec::new(),
	};

	let default_compression = match section.get("default-compression").map(str::trim) {
		Some(s) if !s.is_empty() => {
			CompressionType::parse(s).ok_or_else(|| parse_error(path, format!("unrecognised compression '{s}'")))?
		}
		_ => CompressionType::Unknown,
	};

	let parse_f64 = |key: &str| -> SailResult<f64> {
		match section.get(key).map(str::trim) {
			Some(s) if !s.is_empty() => {
				s.parse().map_err(|_| parse_error(path, format!("'{key}' is not a number")))
			}
			_ => Ok(0.0),
		}
	};

	Ok(Some(WriteFeatures {
		output_pixel_formats,
		preferred_output_pixel_format: PixelFormat::Unknown,
		features,
		properties,
		compressions,
		default_compression,
		compression_level_min: parse_f64("compression-level-min")?,
		compression_level_max: parse_f64("compression-level-max")?,
		compression_level_default: parse_f64("compression-level-default")?,
		compression_level_step: parse_f64("compression-level-step")?,
	}))
}
