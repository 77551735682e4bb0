//! The session engine (spec §4.6): `start → (frame)* → stop`, coordinating
//! an I/O source, options, and a loaded codec through the plugin ABI.

mod phase;

use std::ffi::c_void;
use std::path::Path;
use std::ptr;
use std::sync::Arc;

pub use phase::Phase;
use sail_types::abi::{PluginHandle, SailIoHandle, StatusCode, STATUS_OK, status_to_kind};
use sail_types::codec_info::CodecInfo;
use sail_types::error::{SailError, SailErrorKind, SailResult};
use sail_types::image::Image;
use sail_types::options::{ReadOptions, WriteOptions};
use sail_vfs::{BoxStream, FileStream, MemoryStream, Stream};

use crate::loader::PluginCache;

/// Which direction a [`Session`] was started in; determines which half
/// of the v6 table is driven.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
	Read,
	Write,
}

enum Options {
	Read(ReadOptions),
	Write(WriteOptions),
}

fn status_result(operation: &str, codec_name: &str, status: StatusCode) -> SailResult<()> {
	if status == STATUS_OK {
		return Ok(());
	}
	let kind = status_to_kind(status).unwrap_or(SailErrorKind::StateExecutionFail);
	Err(SailError::new(kind, format!("{codec_name}: {operation} returned status {status}")))
}

/// A live decode or encode session. Constructed by one of the
/// `start_reading_*`/`start_writing_*` functions; driven by
/// [`Session::next_frame`]/[`Session::write_next_frame`]; released by
/// [`Session::stop`].
pub struct Session {
	stream: Option<BoxStream>,
	own_io: bool,
	codec_info: CodecInfo,
	plugin: Arc<PluginHandle>,
	state: *mut c_void,
	direction: Direction,
	options: Options,
	phase: Phase,
	stop_logged: bool,
}

impl std::fmt::Debug for Session {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Session")
			.field("codec", &self.codec_info.name)
			.field("phase", &self.phase)
			.finish_non_exhaustive()
	}
}

impl Session {
	fn start_reading_io_with_options(
		stream: BoxStream,
		own_io: bool,
		codec_info: CodecInfo,
		options: Option<ReadOptions>,
		cache: &PluginCache,
	) -> SailResult<Self> {
		let plugin = cache.get_or_load(&codec_info.name, &codec_info.path)?;
		let options = options.unwrap_or_else(|| ReadOptions::from_features(&codec_info.read_features));

		let mut session = Session {
			stream: Some(stream),
			own_io,
			codec_info,
			plugin,
			state: ptr::null_mut(),
			direction: Direction::Read,
			options: Options::Read(options.clone()),
			phase: Phase::Open,
			stop_logged: false,
		};

		let mut handle = SailIoHandle::wrap(session.stream.as_mut().expect("stream present at init").as_mut());
		// SAFETY: `session.plugin.v6` was resolved from symbols matching this
		// exact signature by construction; `handle` stays alive until
		// `release` below.
		let status = unsafe { (session.plugin.v6.read_init)(&mut handle, &options, &mut session.state) };
		handle.release();

		if let Err(err) = status_result("read_init", &session.codec_info.name, status) {
			let _ = session.best_effort_finish();
			session.release_io();
			return Err(err);
		}

		log::trace!("{}: read session opened", session.codec_info.name);
		Ok(session)
	}

	fn start_writing_io_with_options(
		stream: BoxStream,
		own_io: bool,
		codec_info: CodecInfo,
		options: Option<WriteOptions>,
		cache: &PluginCache,
	) -> SailResult<Self> {
		let write_features = codec_info.write_features.clone().ok_or_else(|| {
			SailError::new(
				SailErrorKind::NotImplemented,
				format!("{}: codec does not support writing", codec_info.name),
			)
		})?;
		let options = options.unwrap_or_else(|| WriteOptions::from_features(&write_features));
		options.validate(&write_features)?;

		let plugin = cache.get_or_load(&codec_info.name, &codec_info.path)?;

		let mut session = Session {
			stream: Some(stream),
			own_io,
			codec_info,
			plugin,
			state: ptr::null_mut(),
			direction: Direction::Write,
			options: Options::Write(options.clone()),
			phase: Phase::Open,
			stop_logged: false,
		};

		let mut handle = SailIoHandle::wrap(session.stream.as_mut().expect("stream present at init").as_mut());
		// SAFETY: see `start_reading_io_with_options`.
		let status = unsafe { (session.plugin.v6.write_init)(&mut handle, &options, &mut session.state) };
		handle.release();

		if let Err(err) = status_result("write_init", &session.codec_info.name, status) {
			let _ = session.best_effort_finish();
			session.release_io();
			return Err(err);
		}

		log::trace!("{}: write session opened", session.codec_info.name);
		Ok(session)
	}

	/// Starts a decode session reading `path` on disk.
	pub fn start_reading_file(
		path: impl AsRef<Path>,
		codec_info: CodecInfo,
		options: Option<ReadOptions>,
		cache: &PluginCache,
	) -> SailResult<Self> {
		let stream: BoxStream = Box::new(FileStream::open(path)?);
		Self::start_reading_io_with_options(stream, true, codec_info, options, cache)
	}

	/// Starts a decode session reading an in-memory buffer.
	pub fn start_reading_memory(
		data: Vec<u8>,
		codec_info: CodecInfo,
		options: Option<ReadOptions>,
		cache: &PluginCache,
	) -> SailResult<Self> {
		let stream: BoxStream = Box::new(MemoryStream::readable(data));
		Self::start_reading_io_with_options(stream, true, codec_info, options, cache)
	}

	/// Starts a decode session reading a caller-supplied stream. The
	/// engine does not own it: `stop` will not close it.
	pub fn start_reading_io(
		stream: BoxStream,
		codec_info: CodecInfo,
		options: Option<ReadOptions>,
		cache: &PluginCache,
	) -> SailResult<Self> {
		Self::start_reading_io_with_options(stream, false, codec_info, options, cache)
	}

	/// Starts an encode session writing `path` on disk.
	pub fn start_writing_file(
		path: impl AsRef<Path>,
		codec_info: CodecInfo,
		options: Option<WriteOptions>,
		cache: &PluginCache,
	) -> SailResult<Self> {
		let stream: BoxStream = Box::new(FileStream::create(path)?);
		Self::start_writing_io_with_options(stream, true, codec_info, options, cache)
	}

	/// Starts an encode session writing into a growable in-memory buffer.
	pub fn start_writing_memory(
		codec_info: CodecInfo,
		options: Option<WriteOptions>,
		cache: &PluginCache,
	) -> SailResult<Self> {
		let stream: BoxStream = Box::new(MemoryStream::writable(Vec::new()));
		Self::start_writing_io_with_options(stream, true, codec_info, options, cache)
	}

	/// Starts an encode session writing a caller-supplied stream. The
	/// engine does not own it: `stop` will not close it.
	pub fn start_writing_io(
		stream: BoxStream,
		codec_info: CodecInfo,
		options: Option<WriteOptions>,
		cache: &PluginCache,
	) -> SailResult<Self> {
		Self::start_writing_io_with_options(stream, false, codec_info, options, cache)
	}

	/// Reads the next frame (spec §4.6 "Frame iteration"): allocates the
	/// image skeleton via `read_seek_next_frame`, then fills it via
	/// `read_frame`. `NO_MORE_FRAMES` is forwarded without closing the
	/// session; any other error leaves the session `Failed`.
	pub fn next_frame(&mut self) -> SailResult<Image> {
		assert_eq!(self.direction, Direction::Read, "next_frame called on a write session");
		if self.phase == Phase::Exhausted {
			// Idempotent EOF (spec §8): once exhausted, every further call
			// reports NO_MORE_FRAMES again without re-entering the codec.
			return Err(SailError::no_more_frames());
		}
		if !self.phase.accepts_frame_call() {
			return Err(SailError::new(
				SailErrorKind::StateExecutionFail,
				format!("{}: next_frame called outside OPEN/STREAMING", self.codec_info.name),
			));
		}

		let mut handle = SailIoHandle::wrap(self.stream.as_mut().expect("stream present while open").as_mut());

		let mut image_ptr: *mut Image = ptr::null_mut();
		// SAFETY: see `start_reading_io_with_options`; `self.state` was
		// allocated by the matching `read_init` call.
		let seek_status = unsafe { (self.plugin.v6.read_seek_next_frame)(self.state, &mut handle, &mut image_ptr) };

		if let Some(kind) = status_to_kind(seek_status) {
			handle.release();
			if kind == SailErrorKind::NoMoreFrames {
				self.phase = Phase::Exhausted;
				log::trace!("{}: read source exhausted", self.codec_info.name);
				return Err(SailError::no_more_frames());
			}
			self.phase = Phase::Failed;
			return Err(SailError::new(kind, format!("{}: read_seek_next_frame failed", self.codec_info.name)));
		}

		if image_ptr.is_null() {
			handle.release();
			self.phase = Phase::Failed;
			return Err(SailError::new(
				SailErrorKind::BrokenImage,
				format!("{}: read_seek_next_frame reported success with no image", self.codec_info.name),
			));
		}
		// SAFETY: see `sail_types::abi` module doc; plugin and host share
		// layout for this build.
		let mut image = unsafe { *Box::from_raw(image_ptr) };

		// SAFETY: see `start_reading_io_with_options`.
		let frame_status = unsafe { (self.plugin.v6.read_frame)(self.state, &mut handle, &mut image) };
		handle.release();

		if let Err(err) = status_result("read_frame", &self.codec_info.name, frame_status) {
			self.phase = Phase::Failed;
			return Err(err);
		}

		self.phase = Phase::Streaming;
		Ok(image)
	}

	/// Writes the next frame (spec §4.6 "Frame iteration"): prepares the
	/// codec via `write_seek_next_frame`, then hands it the pixels via
	/// `write_frame`.
	pub fn write_next_frame(&mut self, image: &Image) -> SailResult<()> {
		assert_eq!(self.direction, Direction::Write, "write_next_frame called on a read session");
		if !self.phase.accepts_frame_call() {
			return Err(SailError::new(
				SailErrorKind::StateExecutionFail,
				format!("{}: write_next_frame called outside OPEN/STREAMING", self.codec_info.name),
			));
		}

		let mut handle = SailIoHandle::wrap(self.stream.as_mut().expect("stream present while open").as_mut());

		// SAFETY: see `start_writing_io_with_options`; `self.state` was
		// allocated by the matching `write_init` call.
		let seek_status = unsafe { (self.plugin.v6.write_seek_next_frame)(self.state, &mut handle, image) };
		if let Err(err) = status_result("write_seek_next_frame", &self.codec_info.name, seek_status) {
			handle.release();
			self.phase = Phase::Failed;
			return Err(err);
		}

		// SAFETY: see `start_writing_io_with_options`.
		let frame_status = unsafe { (self.plugin.v6.write_frame)(self.state, &mut handle, image) };
		handle.release();

		if let Err(err) = status_result("write_frame", &self.codec_info.name, frame_status) {
			self.phase = Phase::Failed;
			return Err(err);
		}

		self.phase = Phase::Streaming;
		Ok(())
	}

	/// Calls the matching `*_finish` with whatever state exists, ignoring
	/// its result. Used on the init-failure path, where spec §4.6 demands
	/// best-effort cleanup rather than propagating a second error.
	fn best_effort_finish(&mut self) -> SailResult<()> {
		let mut handle =
			SailIoHandle::wrap(self.stream.as_mut().expect("stream present during cleanup").as_mut());
		// SAFETY: see `start_reading_io_with_options`/`start_writing_io_with_options`;
		// `self.state` was allocated by the matching `*_init` call, or is
		// null if init never ran.
		let status = match self.direction {
			Direction::Read => unsafe { (self.plugin.v6.read_finish)(&mut self.state, &mut handle) },
			Direction::Write => unsafe { (self.plugin.v6.write_finish)(&mut self.state, &mut handle) },
		};
		handle.release();
		status_result("finish", &self.codec_info.name, status)
	}

	fn release_io(&mut self) {
		if let Some(mut stream) = self.stream.take() {
			if self.own_io {
				if let Err(err) = stream.close() {
					log::warn!("{}: error closing owned I/O stream: {err}", self.codec_info.name);
				}
			}
		}
	}

	/// Terminates the session (spec §4.6 "Termination"): calls the
	/// matching `*_finish`, releases the codec state, and, if the
	/// session owns its I/O, closes the stream. Idempotent after the
	/// first call; re-entry after a clean stop is a logged no-op.
	pub fn stop(&mut self) -> SailResult<()> {
		if self.phase == Phase::Closed {
			if !self.stop_logged {
				log::warn!("{}: stop called again after session was already closed", self.codec_info.name);
				self.stop_logged = true;
			}
			return Ok(());
		}

		let result = self.best_effort_finish();
		self.release_io();
		self.phase = Phase::Closed;
		log::trace!("{}: session closed", self.codec_info.name);
		result
	}
}

impl Drop for Session {
	fn drop(&mut self) {
		if self.phase != Phase::Closed {
			log::warn!("{}: session dropped without calling stop, cleaning up", self.codec_info.name);
			let _ = self.stop();
		}
	}
}

#[cfg(test)]
mod tests {
	use std::ffi::c_void;

	use sail_types::abi::{CodecApiV6, STATUS_OK};
	use sail_types::features::{ReadFeature, ReadFeatures};
	use sail_types::pixel::PixelFormat;

	use super::*;

	unsafe extern "C" fn ok_read_init(
		_stream: *mut SailIoHandle,
		_options: *const ReadOptions,
		state: *mut *mut c_void,
	) -> StatusCode {
		// SAFETY: `state` is a valid out-param per the ABI contract.
		unsafe { *state = 0x1 as *mut c_void };
		STATUS_OK
	}

	unsafe extern "C" fn one_frame_then_exhausted(
		state: *mut c_void,
		_stream: *mut SailIoHandle,
		image: *mut *mut Image,
	) -> StatusCode {
		if (state as usize) == 0x1 {
			let skeleton = Image::skeleton(2, 2, PixelFormat::Bpp24Rgb, 6);
			// SAFETY: `image` is a valid out-param per the ABI contract.
			unsafe { *image = Box::into_raw(Box::new(skeleton)) };
			STATUS_OK
		} else {
			sail_types::error::SailErrorKind::NoMoreFrames as StatusCode
		}
	}

	unsafe extern "C" fn fill_frame(
		_state: *mut c_void,
		_stream: *mut SailIoHandle,
		image: *mut Image,
	) -> StatusCode {
		// SAFETY: `image` was allocated by `one_frame_then_exhausted` above
		// and is still valid.
		unsafe { (*image).pixels = vec![0u8; 12] };
		STATUS_OK
	}

	unsafe extern "C" fn noop_read_finish(state: *mut *mut c_void, _stream: *mut SailIoHandle) -> StatusCode {
		// SAFETY: `state` is a valid out-param per the ABI contract.
		unsafe { *state = std::ptr::null_mut() };
		STATUS_OK
	}

	unsafe extern "C" fn unimplemented_write(
		_a: *mut SailIoHandle,
		_b: *const WriteOptions,
		_c: *mut *mut c_void,
	) -> StatusCode {
		sail_types::error::SailErrorKind::NotImplemented as StatusCode
	}

	unsafe extern "C" fn unimplemented_write_seek(
		_a: *mut c_void,
		_b: *mut SailIoHandle,
		_c: *const Image,
	) -> StatusCode {
		sail_types::error::SailErrorKind::NotImplemented as StatusCode
	}

	unsafe extern "C" fn unimplemented_write_finish(_a: *mut *mut c_void, _b: *mut SailIoHandle) -> StatusCode {
		STATUS_OK
	}

	fn mock_read_only_table() -> CodecApiV6 {
		CodecApiV6 {
			read_init: ok_read_init,
			read_seek_next_frame: one_frame_then_exhausted,
			read_frame: fill_frame,
			read_finish: noop_read_finish,
			write_init: unimplemented_write,
			write_seek_next_frame: unimplemented_write_seek,
			write_frame: unimplemented_write_seek,
			write_finish: unimplemented_write_finish,
		}
	}

	fn sample_codec_info() -> CodecInfo {
		CodecInfo {
			layout: sail_types::codec_info::SUPPORTED_LAYOUT,
			version: "1.0".into(),
			name: "MOCK".into(),
			description: "mock codec for tests".into(),
			priority: sail_types::features::Priority::Medium,
			extensions: vec!["mock".into()],
			mime_types: vec![],
			magic_numbers: vec![],
			path: Path::new("/dev/null").into(),
			read_features: ReadFeatures {
				output_pixel_formats: vec![PixelFormat::Bpp24Rgb],
				preferred_output_pixel_format: PixelFormat::Bpp24Rgb,
				features: ReadFeature::STATIC,
			},
			write_features: None,
		}
	}

	#[test]
	fn decode_then_exhaustion_then_stop() {
		let info = sample_codec_info();
		// Bypass the loader entirely: inject the plugin handle directly via
		// a hand-built Session, mirroring what `start_reading_io` would do
		// once `cache.get_or_load` resolves to this table.
		let plugin = Arc::new(PluginHandle::new(mock_read_only_table(), Box::new(())));
		let stream: BoxStream = Box::new(MemoryStream::readable(vec![0u8; 4]));
		let mut session = Session {
			stream: Some(stream),
			own_io: true,
			codec_info: info,
			plugin,
			state: 0x1 as *mut c_void,
			direction: Direction::Read,
			options: Options::Read(ReadOptions { io_options: sail_types::features::IoOption::empty() }),
			phase: Phase::Open,
			stop_logged: false,
		};

		let image = session.next_frame().unwrap();
		assert_eq!(image.pixels.len(), 12);
		assert_eq!(session.phase, Phase::Streaming);

		let err = session.next_frame().unwrap_err();
		assert_eq!(err.kind, SailErrorKind::NoMoreFrames);
		assert_eq!(session.phase, Phase::Exhausted);

		let err_again = session.next_frame().unwrap_err();
		assert_eq!(err_again.kind, SailErrorKind::NoMoreFrames);
		assert_eq!(session.phase, Phase::Exhausted);

		session.stop().unwrap();
		assert_eq!(session.phase, Phase::Closed);

		// second stop is a no-op
		session.stop().unwrap();
	}
}
