//! A synthetic raster codec implementing plugin ABI v6 (spec §6), used
//! to exercise the loader and session engine end-to-end without relying
//! on a real image format. Not a real BMP/ICO/PNG decoder, the wire
//! format below exists only for this codec.
//!
//! Wire format: 4-byte magic `SDEM`, `width: u32`, `height: u32` (both
//! little-endian), then `width * height * 3` bytes of tightly packed
//! 24-bit RGB pixel data, row-major, no padding.

mod format;

use std::ffi::c_void;
use std::ptr;

use sail_types::abi::{STATUS_OK, SailIoHandle, StatusCode, kind_to_status};
use sail_types::error::SailErrorKind;
use sail_types::image::Image;
use sail_types::options::{ReadOptions, WriteOptions};

pub use format::{MAGIC, decode, encode};

struct ReadState {
	image: Option<Image>,
	served: bool,
}

struct WriteState;

fn status_from_result<T>(result: Result<T, sail_types::error::SailError>) -> (StatusCode, Option<T>) {
	match result {
		Ok(value) => (STATUS_OK, Some(value)),
		Err(err) => (kind_to_status(err.kind), None),
	}
}

/// # Safety
/// Called only by the session engine with a handle wrapping a live
/// stream and a pointer this function may write a freshly boxed state
/// pointer through.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn sail_codec_read_init_v6_demo(
	stream: *mut SailIoHandle,
	_options: *const ReadOptions,
	state: *mut *mut c_void,
) -> StatusCode {
	// SAFETY: see this function's `# Safety` doc comment.
	let handle = unsafe { &mut *stream };
	let mut bytes = Vec::new();
	let mut buf = [0u8; 4096];
	loop {
		match handle.read(&mut buf) {
			Ok(0) => break,
			Ok(n) => bytes.extend_from_slice(&buf[..n]),
			Err(_) => return kind_to_status(SailErrorKind::ReadIo),
		}
	}

	let (status, image) = status_from_result(decode(&bytes));
	if status != STATUS_OK {
		return status;
	}
	let boxed = Box::new(ReadState { image, served: false });
	// SAFETY: see this function's `# Safety` doc comment.
	unsafe { *state = Box::into_raw(boxed) as *mut c_void };
	STATUS_OK
}

/// # Safety
/// `state` must be the pointer `read_init` produced for this session.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn sail_codec_read_seek_next_frame_v6_demo(
	state: *mut c_void,
	_stream: *mut SailIoHandle,
	image_out: *mut *mut Image,
) -> StatusCode {
	// SAFETY: see this function's `# Safety` doc comment.
	let state = unsafe { &mut *(state as *mut ReadState) };
	if state.served {
		return kind_to_status(SailErrorKind::NoMoreFrames);
	}
	let Some(image) = state.image.as_ref() else {
		return kind_to_status(SailErrorKind::BrokenImage);
	};
	let skeleton = Image::skeleton(image.width, image.height, image.pixel_format, image.bytes_per_line);
	state.served = true;
	// SAFETY: see this function's `# Safety` doc comment.
	unsafe { *image_out = Box::into_raw(Box::new(skeleton)) };
	STATUS_OK
}

/// # Safety
/// `image` must be the skeleton `read_seek_next_frame` just produced for
/// this same state.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn sail_codec_read_frame_v6_demo(
	state: *mut c_void,
	_stream: *mut SailIoHandle,
	image: *mut Image,
) -> StatusCode {
	// SAFETY: see this function's `# Safety` doc comment.
	let state = unsafe { &mut *(state as *mut ReadState) };
	// SAFETY: see this function's `# Safety` doc comment.
	let target = unsafe { &mut *image };
	let Some(decoded) = state.image.take() else {
		return kind_to_status(SailErrorKind::BrokenImage);
	};
	*target = decoded;
	STATUS_OK
}

/// # Safety
/// `state` must be the pointer `read_init` produced; it is freed here.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn sail_codec_read_finish_v6_demo(
	state: *mut *mut c_void,
	_stream: *mut SailIoHandle,
) -> StatusCode {
	// SAFETY: see this function's `# Safety` doc comment.
	let raw = unsafe { *state };
	if !raw.is_null() {
		// SAFETY: `raw` was produced by `Box::into_raw` in `read_init` and
		// is freed at most once since `state` is nulled out right after.
		drop(unsafe { Box::from_raw(raw as *mut ReadState) });
		// SAFETY: `state` is a valid out-param per the ABI contract.
		unsafe { *state = ptr::null_mut() };
	}
	STATUS_OK
}

/// # Safety
/// Called only by the session engine with a handle wrapping a live
/// stream and a pointer this function may write a freshly boxed state
/// pointer through.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn sail_codec_write_init_v6_demo(
	_stream: *mut SailIoHandle,
	_options: *const WriteOptions,
	state: *mut *mut c_void,
) -> StatusCode {
	let boxed = Box::new(WriteState);
	// SAFETY: see this function's `# Safety` doc comment.
	unsafe { *state = Box::into_raw(boxed) as *mut c_void };
	STATUS_OK
}

/// # Safety
/// `state` must be the pointer `write_init` produced for this session.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn sail_codec_write_seek_next_frame_v6_demo(
	_state: *mut c_void,
	_stream: *mut SailIoHandle,
	_image: *const Image,
) -> StatusCode {
	STATUS_OK
}

/// # Safety
/// `image` must be a fully populated frame matching this format's pixel
/// layout expectations.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn sail_codec_write_frame_v6_demo(
	_state: *mut c_void,
	stream: *mut SailIoHandle,
	image: *const Image,
) -> StatusCode {
	// SAFETY: see this function's `# Safety` doc comment.
	let handle = unsafe { &mut *stream };
	// SAFETY: see this function's `# Safety` doc comment.
	let image = unsafe { &*image };
	let (status, bytes) = status_from_result(encode(image));
	if status != STATUS_OK {
		return status;
	}
	match handle.write(&bytes.unwrap_or_default()) {
		Ok(_) => STATUS_OK,
		Err(_) => kind_to_status(SailErrorKind::WriteIo),
	}
}

/// # Safety
/// `state` must be the pointer `write_init` produced; it is freed here.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn sail_codec_write_finish_v6_demo(
	state: *mut *mut c_void,
	stream: *mut SailIoHandle,
) -> StatusCode {
	// SAFETY: see this function's `# Safety` doc comment.
	let handle = unsafe { &mut *stream };
	if let Err(_err) = handle.flush() {
		return kind_to_status(SailErrorKind::WriteIo);
	}
	// SAFETY: see this function's `# Safety` doc comment.
	let raw = unsafe { *state };
	if !raw.is_null() {
		// SAFETY: `raw` was produced by `Box::into_raw` in `write_init` and
		// is freed at most once since `state` is nulled out right after.
		drop(unsafe { Box::from_raw(raw as *mut WriteState) });
		// SAFETY: `state` is a valid out-param per the ABI contract.
		unsafe { *state = ptr::null_mut() };
	}
	STATUS_OK
}
