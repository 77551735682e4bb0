//! Resolves a codec's eight ABI v6 symbols out of its shared module
//! (spec §4.4) and caches the result for the life of the process (spec
//! §9 Open Question: plugins are never unloaded once loaded).

mod dynlib;

use std::collections::HashMap;
use std::ffi::c_void;
use std::path::Path;
use std::sync::Mutex;

pub use dynlib::{DynLibrary, NativeLibrary};
use sail_types::abi::{
	CodecApiV6, OPERATIONS, ReadFinishFn, ReadFrameFn, ReadInitFn, ReadSeekNextFrameFn, PluginHandle,
	WriteFinishFn, WriteFrameFn, WriteInitFn, WriteSeekNextFrameFn, symbol_name,
};
use sail_types::error::{SailError, SailErrorKind, SailResult};

/// Resolves all eight operations for `codec_name` out of an already
/// opened library, building a [`CodecApiV6`] table.
fn resolve_table(library: &dyn DynLibrary, codec_name: &str) -> SailResult<CodecApiV6> {
	let mut addresses: HashMap<&str, *const c_void> = HashMap::with_capacity(OPERATIONS.len());
	for operation in OPERATIONS {
		let name = symbol_name(operation, codec_name);
		let address = library.resolve(&name).ok_or_else(|| {
			SailError::new(SailErrorKind::CodecSymbolResolve, format!("missing exported symbol '{name}'"))
		})?;
		addresses.insert(operation, address);
	}

	// SAFETY: every address was just resolved by name from the module's
	// own export table; the naming convention in `symbol_name` guarantees
	// the symbol at that name has the corresponding ABI v6 signature, as
	// long as the plugin declares `layout = 6` truthfully.
	unsafe {
		Ok(CodecApiV6 {
			read_init: std::mem::transmute::<*const c_void, ReadInitFn>(addresses["read_init"]),
			read_seek_next_frame: std::mem::transmute::<*const c_void, ReadSeekNextFrameFn>(
				addresses["read_seek_next_frame"],
			),
			read_frame: std::mem::transmute::<*const c_void, ReadFrameFn>(addresses["read_frame"]),
			read_finish: std::mem::transmute::<*const c_void, ReadFinishFn>(addresses["read_finish"]),
			write_init: std::mem::transmute::<*const c_void, WriteInitFn>(addresses["write_init"]),
			write_seek_next_frame: std::mem::transmute::<*const c_void, WriteSeekNextFrameFn>(
				addresses["write_seek_next_frame"],
			),
			write_frame: std::mem::transmute::<*const c_void, WriteFrameFn>(addresses["write_frame"]),
			write_finish: std::mem::transmute::<*const c_void, WriteFinishFn>(addresses["write_finish"]),
		})
	}
}

/// Loads the native module at `path` and resolves `codec_name`'s v6
/// table, wrapping both in a [`PluginHandle`].
pub fn load_plugin(path: &Path, codec_name: &str) -> SailResult<PluginHandle> {
	log::debug!("loading codec module '{}' for {codec_name}", path.display());
	let library = NativeLibrary::load(path)?;
	let v6 = resolve_table(&library, codec_name)?;
	log::trace!("resolved all v6 symbols for {codec_name}");
	Ok(PluginHandle::new(v6, Box::new(library)))
}

/// Caches loaded plugins for the life of the process, keyed by codec
/// name. The registry never unloads a module once it has been opened
/// (spec §9: "the engine should just leak the library and cache the
/// handle for the process's lifetime").
#[derive(Default)]
pub struct PluginCache {
	loaded: Mutex<HashMap<String, std::sync::Arc<PluginHandle>>>,
}

impl PluginCache {
	/// Builds an empty cache.
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns the cached handle for `codec_name`, loading it via `path`
	/// on first use.
	pub fn get_or_load(
		&self,
		codec_name: &str,
		path: &Path,
	) -> SailResult<std::sync::Arc<PluginHandle>> {
		let mut loaded = self.loaded.lock().map_err(|_| {
			SailError::new(SailErrorKind::StateExecutionFail, "plugin cache mutex poisoned".to_string())
		})?;
		if let Some(handle) = loaded.get(codec_name) {
			return Ok(handle.clone());
		}
		let handle = std::sync::Arc::new(load_plugin(path, codec_name)?);
		loaded.insert(codec_name.to_string(), handle.clone());
		Ok(handle)
	}
}
