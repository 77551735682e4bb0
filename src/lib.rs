#![allow(clippy::single_component_path_imports)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! `sail` identifies an image format, loads the matching codec plugin, and
//! drives it through a `start -> (frame)* -> stop` decode or encode session.
//!
//! This crate is a thin façade: it re-exports `sail_internal` wholesale so
//! callers only need one dependency. The registry (§4.3), plugin loader
//! (§4.4), format detector (§4.5) and session engine (§4.6) live there; the
//! data model and plugin ABI types they move around live in `sail-types`;
//! the I/O abstraction lives in `sail-vfs`.
//!
//! ```no_run
//! use sail::prelude::*;
//!
//! let registry = global();
//! let cache = PluginCache::new();
//! let mut stream: BoxStream = Box::new(FileStream::open("tiny.bmp")?);
//! let (_image, codec_info) =
//!     probe(stream.as_mut(), Some(std::path::Path::new("tiny.bmp")), registry, &cache)?;
//! let mut session = Session::start_reading_file("tiny.bmp", codec_info, None, &cache)?;
//! while let Ok(frame) = session.next_frame() {
//!     let _ = frame;
//! }
//! session.stop()?;
//! # Ok::<(), sail::SailError>(())
//! ```

pub use sail_internal::*;

#[cfg(all(feature = "dynamic_linking", not(target_family = "wasm")))]
#[allow(unused_imports)]
use sail_codec_demo;
