//! Crossing the plugin ABI boundary with an I/O stream.
//!
//! A codec plugin is a separate shared object; it cannot be handed a
//! Rust trait object directly (trait objects are fat pointers, not
//! FFI-safe). Instead the engine builds a thin, `repr(C)` vtable
//! (`SailIoHandle`) whose function pointers trampoline back into the
//! `sail_vfs::Stream` the session owns. This is the Rust analogue of the
//! original C library's `struct sail_io`.

use std::ffi::c_void;
use std::os::raw::c_int;

use sail_vfs::{IoError, SeekFrom, Stream};

/// `whence` encoding used on [`SailIoHandle::seek`]'s wire format.
#[repr(u8)]
#[derive(Debug, Clone, Copy)]
pub enum Whence {
	/// Seek from the start.
	Start = 0,
	/// Seek from the current position.
	Current = 1,
	/// Seek from the end.
	End = 2,
}

/// A `repr(C)` vtable bridging a boxed `dyn Stream` across the plugin
/// ABI boundary. `context` is opaque to the plugin; it must only ever
/// pass it back into these function pointers.
#[repr(C)]
pub struct SailIoHandle {
	context: *mut c_void,
	read: unsafe extern "C" fn(*mut c_void, *mut u8, usize, *mut usize) -> c_int,
	write: unsafe extern "C" fn(*mut c_void, *const u8, usize, *mut usize) -> c_int,
	seek: unsafe extern "C" fn(*mut c_void, i64, u8, *mut u64) -> c_int,
	tell: unsafe extern "C" fn(*mut c_void, *mut u64) -> c_int,
	flush: unsafe extern "C" fn(*mut c_void) -> c_int,
	close_fn: unsafe extern "C" fn(*mut c_void) -> c_int,
	drop_ctx: unsafe extern "C" fn(*mut c_void),
}

/// Owns the boxed trampoline context so its lifetime doesn't outlive the
/// borrowed stream. The fat `&mut dyn Stream` reference lives inline in
/// this sized struct, which is why a pointer to it is thin enough to
/// stash in `context`.
struct Context<'a> {
	stream: &'a mut dyn Stream,
	last_error: Option<IoError>,
}

unsafe extern "C" fn trampoline_read(ctx: *mut c_void, buf: *mut u8, len: usize, out_n: *mut usize) -> c_int {
	// SAFETY: `ctx` was produced by `SailIoHandle::wrap` and is only ever
	// passed back by the plugin that received it, never outliving the
	// `SailIoHandle` that owns it.
	let ctx = unsafe { &mut *(ctx as *mut Context) };
	// SAFETY: the plugin guarantees `buf` is valid for `len` bytes, as
	// required by the ABI contract for this call.
	let slice = unsafe { std::slice::from_raw_parts_mut(buf, len) };
	match ctx.stream.read(slice) {
		Ok(n) => {
			// SAFETY: `out_n` is a valid out-param per the ABI contract.
			unsafe { *out_n = n };
			0
		}
		Err(e) => {
			ctx.last_error = Some(e);
			1
		}
	}
}

unsafe extern "C" fn trampoline_write(
	ctx: *mut c_void,
	buf: *const u8,
	len: usize,
	out_n: *mut usize,
) -> c_int {
	// SAFETY: see `trampoline_read`.
	let ctx = unsafe { &mut *(ctx as *mut Context) };
	// SAFETY: the plugin guarantees `buf` is valid for `len` bytes, as
	// required by the ABI contract for this call.
	let slice = unsafe { std::slice::from_raw_parts(buf, len) };
	match ctx.stream.write(slice) {
		Ok(n) => {
			// SAFETY: `out_n` is a valid out-param per the ABI contract.
			unsafe { *out_n = n };
			0
		}
		Err(e) => {
			ctx.last_error = Some(e);
			1
		}
	}
}

unsafe extern "C" fn trampoline_seek(ctx: *mut c_void, offset: i64, whence: u8, out_pos: *mut u64) -> c_int {
	// SAFETY: see `trampoline_read`.
	let ctx = unsafe { &mut *(ctx as *mut Context) };
	let pos = match whence {
		0 => SeekFrom::Start(offset as u64),
		1 => SeekFrom::Current(offset),
		_ => SeekFrom::End(offset),
	};
	match ctx.stream.seek(pos) {
		Ok(p) => {
			// SAFETY: `out_pos` is a valid out-param per the ABI contract.
			unsafe { *out_pos = p };
			0
		}
		Err(e) => {
			ctx.last_error = Some(e);
			1
		}
	}
}

unsafe extern "C" fn trampoline_tell(ctx: *mut c_void, out_pos: *mut u64) -> c_int {
	// SAFETY: see `trampoline_read`.
	let ctx = unsafe { &mut *(ctx as *mut Context) };
	match ctx.stream.tell() {
		Ok(p) => {
			// SAFETY: `out_pos` is a valid out-param per the ABI contract.
			unsafe { *out_pos = p };
			0
		}
		Err(e) => {
			ctx.last_error = Some(e);
			1
		}
	}
}

unsafe extern "C" fn trampoline_flush(ctx: *mut c_void) -> c_int {
	// SAFETY: see `trampoline_read`.
	let ctx = unsafe { &mut *(ctx as *mut Context) };
	match ctx.stream.flush() {
		Ok(()) => 0,
		Err(e) => {
			ctx.last_error = Some(e);
			1
		}
	}
}

unsafe extern "C" fn trampoline_close(ctx: *mut c_void) -> c_int {
	// SAFETY: see `trampoline_read`.
	let ctx = unsafe { &mut *(ctx as *mut Context) };
	match ctx.stream.close() {
		Ok(()) => 0,
		Err(e) => {
			ctx.last_error = Some(e);
			1
		}
	}
}

unsafe extern "C" fn trampoline_drop(ctx: *mut c_void) {
	// SAFETY: reclaims the box leaked in `SailIoHandle::wrap`.
	drop(unsafe { Box::from_raw(ctx as *mut Context) });
}

impl SailIoHandle {
	/// Builds a vtable wrapping `stream` for the duration of one ABI
	/// call. The returned handle must be dropped (via [`SailIoHandle::
	/// drop`]) exactly once.
	pub fn wrap(stream: &mut dyn Stream) -> Self {
		// SAFETY: extending the borrow to `'static` is sound because the
		// boxed context, and therefore every trampoline call using it, is
		// dropped before this function's caller's borrow of `stream` ends.
		// The engine never lets a `SailIoHandle` outlive the `&mut
		// dyn Stream` it was built from.
		let stream: &'static mut dyn Stream = unsafe { std::mem::transmute(stream) };
		let ctx = Box::new(Context { stream, last_error: None });
		Self {
			context: Box::into_raw(ctx) as *mut c_void,
			read: trampoline_read,
			write: trampoline_write,
			seek: trampoline_seek,
			tell: trampoline_tell,
			flush: trampoline_flush,
			close_fn: trampoline_close,
			drop_ctx: trampoline_drop,
		}
	}

	/// Releases the boxed context. Must be called exactly once per
	/// [`SailIoHandle::wrap`].
	pub fn release(self) {
		// SAFETY: `context` was produced by `Box::into_raw` in `wrap`.
		unsafe { (self.drop_ctx)(self.context) };
	}

	/// Returns the last I/O error a trampoline call recorded, if any,
	/// consuming the handle. Used by the engine to recover a real
	/// [`IoError`] after a plugin call returns a nonzero status.
	pub fn take_last_error(&mut self) -> Option<IoError> {
		// SAFETY: see `wrap`; the context outlives this call.
		let ctx = unsafe { &mut *(self.context as *mut Context) };
		ctx.last_error.take()
	}

	/// Reads up to `buf.len()` bytes through the bridged stream. This is
	/// the call a codec plugin makes against its `*mut SailIoHandle`
	/// parameter, the Rust analogue of the original C library's
	/// `io->read(io->context, ...)`.
	pub fn read(&mut self, buf: &mut [u8]) -> Result<usize, IoError> {
		let mut n: usize = 0;
		// SAFETY: `self.context` was produced by `wrap` and outlives this
		// call; `buf` is a valid slice for its stated length.
		let status = unsafe { (self.read)(self.context, buf.as_mut_ptr(), buf.len(), &mut n) };
		if status == 0 { Ok(n) } else { Err(self.take_last_error().unwrap_or(IoError::Closed)) }
	}

	/// Writes `buf` through the bridged stream.
	pub fn write(&mut self, buf: &[u8]) -> Result<usize, IoError> {
		let mut n: usize = 0;
		// SAFETY: see `read`.
		let status = unsafe { (self.write)(self.context, buf.as_ptr(), buf.len(), &mut n) };
		if status == 0 { Ok(n) } else { Err(self.take_last_error().unwrap_or(IoError::Closed)) }
	}

	/// Repositions the bridged stream, returning the new absolute
	/// position.
	pub fn seek(&mut self, offset: i64, whence: Whence) -> Result<u64, IoError> {
		let mut pos: u64 = 0;
		// SAFETY: see `read`.
		let status = unsafe { (self.seek)(self.context, offset, whence as u8, &mut pos) };
		if status == 0 { Ok(pos) } else { Err(self.take_last_error().unwrap_or(IoError::Closed)) }
	}

	/// Returns the bridged stream's current absolute position.
	pub fn tell(&mut self) -> Result<u64, IoError> {
		let mut pos: u64 = 0;
		// SAFETY: see `read`.
		let status = unsafe { (self.tell)(self.context, &mut pos) };
		if status == 0 { Ok(pos) } else { Err(self.take_last_error().unwrap_or(IoError::Closed)) }
	}

	/// Flushes the bridged stream.
	pub fn flush(&mut self) -> Result<(), IoError> {
		// SAFETY: see `read`.
		let status = unsafe { (self.flush)(self.context) };
		if status == 0 { Ok(()) } else { Err(self.take_last_error().unwrap_or(IoError::Closed)) }
	}
}
