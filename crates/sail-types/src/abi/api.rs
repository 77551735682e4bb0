//! The versioned v6 function table (spec §6).
//!
//! Each operation is an `extern "C"` function pointer so the table can be
//! populated straight from symbols resolved out of a dynamically loaded
//! module (spec §4.4). The per-session codec state crossing the boundary
//! is an opaque `*mut c_void` handle; only the codec that allocated it
//! knows what it actually points to.

use std::ffi::c_void;

use crate::error::SailErrorKind;
use crate::image::Image;
use crate::options::{ReadOptions, WriteOptions};

use super::io_handle::SailIoHandle;

/// The wire-level status code every ABI function returns. `0` is success;
/// any other value is a [`SailErrorKind`] discriminant (see
/// [`status_to_kind`]).
pub type StatusCode = i32;

/// Success.
pub const STATUS_OK: StatusCode = 0;

/// Converts an engine error kind to the status code a plugin would
/// return for it.
pub fn kind_to_status(kind: SailErrorKind) -> StatusCode {
	kind as i32
}

/// Converts a nonzero status code back to a [`SailErrorKind`], falling
/// back to [`SailErrorKind::StateExecutionFail`] for codes this engine
/// version doesn't recognise (forward compatibility with newer plugins).
pub fn status_to_kind(code: StatusCode) -> Option<SailErrorKind> {
	if code == STATUS_OK {
		return None;
	}
	let kind = match code {
		1 => SailErrorKind::MemoryAllocation,
		2 => SailErrorKind::OpenFile,
		3 => SailErrorKind::DirOpen,
		4 => SailErrorKind::ParseFile,
		5 => SailErrorKind::InvalidArgument,
		6 => SailErrorKind::ReadIo,
		7 => SailErrorKind::WriteIo,
		20 => SailErrorKind::NullPtr,
		40 => SailErrorKind::IncorrectImageDimensions,
		41 => SailErrorKind::UnsupportedPixelFormat,
		42 => SailErrorKind::UnsupportedCompression,
		43 => SailErrorKind::BrokenImage,
		44 => SailErrorKind::UnsupportedFormat,
		60 => SailErrorKind::IncompleteCodecInfo,
		61 => SailErrorKind::UnsupportedCodecLayout,
		62 => SailErrorKind::UnsupportedCodecPriority,
		63 => SailErrorKind::CodecLoad,
		64 => SailErrorKind::CodecSymbolResolve,
		80 => SailErrorKind::NotImplemented,
		81 => SailErrorKind::NoMoreFrames,
		_ => SailErrorKind::StateExecutionFail,
	};
	Some(kind)
}

/// `sail_codec_read_init_v6_<name>`.
pub type ReadInitFn =
	unsafe extern "C" fn(*mut SailIoHandle, *const ReadOptions, *mut *mut c_void) -> StatusCode;
/// `sail_codec_read_seek_next_frame_v6_<name>`.
pub type ReadSeekNextFrameFn =
	unsafe extern "C" fn(*mut c_void, *mut SailIoHandle, *mut *mut Image) -> StatusCode;
/// `sail_codec_read_frame_v6_<name>`.
pub type ReadFrameFn = unsafe extern "C" fn(*mut c_void, *mut SailIoHandle, *mut Image) -> StatusCode;
/// `sail_codec_read_finish_v6_<name>`.
pub type ReadFinishFn = unsafe extern "C" fn(*mut *mut c_void, *mut SailIoHandle) -> StatusCode;
/// `sail_codec_write_init_v6_<name>`.
pub type WriteInitFn =
	unsafe extern "C" fn(*mut SailIoHandle, *const WriteOptions, *mut *mut c_void) -> StatusCode;
/// `sail_codec_write_seek_next_frame_v6_<name>`.
pub type WriteSeekNextFrameFn =
	unsafe extern "C" fn(*mut c_void, *mut SailIoHandle, *const Image) -> StatusCode;
/// `sail_codec_write_frame_v6_<name>`.
pub type WriteFrameFn = unsafe extern "C" fn(*mut c_void, *mut SailIoHandle, *const Image) -> StatusCode;
/// `sail_codec_write_finish_v6_<name>`.
pub type WriteFinishFn = unsafe extern "C" fn(*mut *mut c_void, *mut SailIoHandle) -> StatusCode;

/// The complete v6 operation table, resolved from a loaded module's
/// exported symbols (spec §4.4) or supplied directly by an in-process
/// test fixture.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct CodecApiV6 {
	/// Allocates per-session decode state.
	pub read_init: ReadInitFn,
	/// Allocates the next frame's image skeleton, or signals exhaustion.
	pub read_seek_next_frame: ReadSeekNextFrameFn,
	/// Fills the skeleton's pixel buffer.
	pub read_frame: ReadFrameFn,
	/// Releases decode state, even if `read_init` only partially
	/// succeeded.
	pub read_finish: ReadFinishFn,
	/// Allocates per-session encode state.
	pub write_init: WriteInitFn,
	/// Prepares the codec to receive the next frame.
	pub write_seek_next_frame: WriteSeekNextFrameFn,
	/// Writes a frame's pixels.
	pub write_frame: WriteFrameFn,
	/// Releases encode state and flushes trailers.
	pub write_finish: WriteFinishFn,
}

/// The exported-symbol name for one v6 operation on codec `name`
/// (spec §6: "name lower-cased for the symbol").
pub fn symbol_name(operation: &str, codec_name: &str) -> String {
	format!("sail_codec_{operation}_v6_{}", codec_name.to_ascii_lowercase())
}

/// The eight operation names, in the order a plugin must export them.
pub const OPERATIONS: [&str; 8] = [
	"read_init",
	"read_seek_next_frame",
	"read_frame",
	"read_finish",
	"write_init",
	"write_seek_next_frame",
	"write_frame",
	"write_finish",
];
