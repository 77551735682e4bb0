//! Data model and plugin ABI types shared across the SAIL core.
//!
//! This crate holds everything spec §3 ("Data model") and §6 ("Plugin
//! ABI v6") describe as *structure*: codec descriptors, options,
//! features, the image/metadata model, and the versioned function-table
//! types a loaded codec plugin is driven through. The engine that
//! actually drives a session lives in `sail-internal`.

pub mod abi;
pub mod codec_info;
pub mod error;
pub mod features;
pub mod image;
pub mod meta_data;
pub mod options;
pub mod pixel;

pub mod prelude;
