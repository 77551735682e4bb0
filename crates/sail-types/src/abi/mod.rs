//! Plugin ABI v6 types (spec §6) and the loaded-plugin handle (spec §3
//! "Plugin handle").
//!
//! Design Notes §9 frames the versioned function table as something a
//! systems language expresses as "an interface/trait with a discriminant
//! for the layout version". [`PluginHandle`] is that discriminant-plus-
//! vtable: the engine dispatches on `layout` exactly once, at load time,
//! and from then on only ever touches the concrete `v6` table it stored.

mod api;
mod io_handle;

pub use api::{
	CodecApiV6, OPERATIONS, ReadFinishFn, ReadFrameFn, ReadInitFn, ReadSeekNextFrameFn, STATUS_OK,
	StatusCode, WriteFinishFn, WriteFrameFn, WriteInitFn, WriteSeekNextFrameFn, kind_to_status,
	status_to_kind, symbol_name,
};
pub use io_handle::{SailIoHandle, Whence};

use crate::codec_info::SUPPORTED_LAYOUT;

/// A loaded codec plugin: the layout discriminant, the resolved v6
/// table, and whatever keeps the backing module alive.
///
/// `keep_alive` is deliberately type-erased (`Box<dyn Any>`) rather than
/// `libloading::Library` so this data-model crate doesn't need to depend
/// on the dynamic-linking crate; `sail-internal`'s loader is the only
/// thing that knows what's actually inside it.
pub struct PluginHandle {
	/// ABI layout version; always [`SUPPORTED_LAYOUT`] for a handle this
	/// engine produced.
	pub layout: i32,
	/// The resolved v6 operation table.
	pub v6: CodecApiV6,
	keep_alive: Box<dyn std::any::Any + Send + Sync>,
}

impl PluginHandle {
	/// Builds a handle around a resolved v6 table, retaining whatever
	/// object must stay alive for the function pointers to remain valid
	/// (typically a loaded `libloading::Library`).
	pub fn new(v6: CodecApiV6, keep_alive: Box<dyn std::any::Any + Send + Sync>) -> Self {
		Self { layout: SUPPORTED_LAYOUT, v6, keep_alive }
	}
}

impl std::fmt::Debug for PluginHandle {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("PluginHandle").field("layout", &self.layout).finish_non_exhaustive()
	}
}
