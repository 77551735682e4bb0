//! Abstracts dynamic library loading behind a trait so the symbol
//! resolution logic in [`super::load_plugin`] can be exercised without a
//! real shared object on disk (grounded on the mockable-loader pattern
//! used by `other_examples/FallingSnow-onevpl-rs`).

use std::ffi::c_void;
use std::path::Path;

use sail_types::error::{SailError, SailErrorKind, SailResult};

/// A loaded dynamic library capable of resolving symbols by name.
pub trait DynLibrary: Send + Sync {
	/// Resolves `symbol`'s address, or `None` if the module doesn't export
	/// it.
	fn resolve(&self, symbol: &str) -> Option<*const c_void>;
}

/// A [`DynLibrary`] backed by a real platform shared object, loaded via
/// `libloading`.
pub struct NativeLibrary {
	library: libloading::Library,
}

impl NativeLibrary {
	/// Loads `path` with the platform dynamic linker.
	pub fn load(path: &Path) -> SailResult<Self> {
		// SAFETY: loading arbitrary code is inherently unsafe; the caller is
		// responsible for only pointing this at a trusted codec module.
		let library = unsafe { libloading::Library::new(path) }.map_err(|e| {
			SailError::wrap(SailErrorKind::CodecLoad, format!("failed to load '{}'", path.display()), e)
		})?;
		Ok(Self { library })
	}
}

impl DynLibrary for NativeLibrary {
	fn resolve(&self, symbol: &str) -> Option<*const c_void> {
		let name = std::ffi::CString::new(symbol).ok()?;
		// SAFETY: the resolved symbol is only ever read as a raw address and
		// cast to a typed function pointer by the caller, which checks the
		// codec's declared ABI layout before calling through it.
		unsafe { self.library.get::<*const c_void>(name.as_bytes_with_nul()).ok().map(|sym| *sym) }
	}
}

#[cfg(test)]
pub(crate) mod mock {
	use std::collections::HashMap;

	use super::*;

	/// A [`DynLibrary`] backed by an in-process symbol table, for testing
	/// the loader's symbol-resolution and error-mapping logic without a
	/// real `.so`/`.dll`/`.dylib`.
	#[derive(Default)]
	pub struct MockLibrary {
		symbols: HashMap<String, *const c_void>,
	}

	unsafe impl Send for MockLibrary {}
	unsafe impl Sync for MockLibrary {}

	impl MockLibrary {
		pub fn new() -> Self {
			Self::default()
		}

		pub fn with_symbol(mut self, name: &str, address: *const c_void) -> Self {
			self.symbols.insert(name.to_string(), address);
			self
		}
	}

	impl DynLibrary for MockLibrary {
		fn resolve(&self, symbol: &str) -> Option<*const c_void> {
			self.symbols.get(symbol).copied()
		}
	}
}
