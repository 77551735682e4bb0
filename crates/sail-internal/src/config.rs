//! Resolves the codec search path (spec §6 "Codec descriptor file"):
//! `SAIL_CODECS_PATH`/`SAIL_THIRD_PARTY_CODECS_PATH` env vars, layered
//! over an optional `sail.toml` for the same two keys, falling back to
//! the compile-time default directory.

use std::env;
use std::path::PathBuf;

use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;

/// Compile-time fallback search directory, used when neither the
/// environment nor `sail.toml` name one.
pub const DEFAULT_CODECS_PATH: &str = "/usr/local/lib/sail/codecs";

#[derive(Debug, Deserialize, Default)]
struct RawPaths {
	sail_codecs_path: Option<String>,
	sail_third_party_codecs_path: Option<String>,
}

/// The resolved set of directories the registry should scan, in scan
/// order: the primary path first, then the third-party path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPaths {
	/// Directories to scan, already split on the platform list
	/// separator.
	pub directories: Vec<PathBuf>,
}

fn split_path_list(value: &str) -> Vec<PathBuf> {
	env::split_paths(value).collect()
}

impl SearchPaths {
	/// Resolves the search path the way spec §6 describes: environment
	/// variables win, an optional `sail.toml` next to the process
	/// supplies a fallback, and the compile-time default is used only
	/// when nothing else names a path.
	pub fn resolve() -> Self {
		let settings = Config::builder()
			.add_source(File::new("sail.toml", FileFormat::Toml).required(false))
			.add_source(Environment::default())
			.build();

		let raw: RawPaths = match settings {
			Ok(settings) => settings.try_deserialize().unwrap_or_default(),
			Err(err) => {
				log::warn!("failed to load sail.toml, using environment and defaults only: {err}");
				RawPaths::default()
			}
		};

		let primary = raw.sail_codecs_path.filter(|s| !s.is_empty());
		let third_party = raw.sail_third_party_codecs_path.filter(|s| !s.is_empty());

		let mut directories = Vec::new();
		match primary {
			Some(value) => directories.extend(split_path_list(&value)),
			None => directories.push(PathBuf::from(DEFAULT_CODECS_PATH)),
		}
		if let Some(value) = third_party {
			directories.extend(split_path_list(&value));
		}

		log::debug!("resolved codec search path: {directories:?}");
		Self { directories }
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn split_path_list_honors_platform_separator() {
		let joined = env::join_paths([PathBuf::from("/a"), PathBuf::from("/b")]).unwrap();
		let parsed = split_path_list(joined.to_str().unwrap());
		assert_eq!(parsed, vec![PathBuf::from("/a"), PathBuf::from("/b")]);
	}
}
