//! A caller-supplied [`Stream`]: every operation delegates straight
//! through to whatever the caller implemented. The engine must never
//! assume the callee is re-entrant: exactly one call is ever in flight
//! on a `UserStream` at a time, which the session engine's sequential
//! pipeline already guarantees (see the concurrency model in spec §5).

use crate::io::{IoError, SeekFrom, Stream};

/// Wraps a caller-supplied stream implementation.
///
/// This exists as a distinct type (rather than callers just handing a
/// `Box<dyn Stream>` to the engine directly) so the engine's source-kind
/// dispatch (`start_reading_file` / `start_reading_memory` /
/// `start_reading_io`) has a symbol to match on, and so logging at the
/// ABI boundary can say "user-supplied" rather than guessing.
#[derive(Debug)]
pub struct UserStream {
	inner: Box<dyn Stream>,
}

impl UserStream {
	/// Wraps an arbitrary caller-supplied stream.
	pub fn new(inner: Box<dyn Stream>) -> Self {
		Self { inner }
	}
}

impl Stream for UserStream {
	fn read(&mut self, buf: &mut [u8]) -> Result<usize, IoError> {
		self.inner.read(buf)
	}

	fn write(&mut self, buf: &[u8]) -> Result<usize, IoError> {
		self.inner.write(buf)
	}

	fn seek(&mut self, pos: SeekFrom) -> Result<u64, IoError> {
		self.inner.seek(pos)
	}

	fn tell(&mut self) -> Result<u64, IoError> {
		self.inner.tell()
	}

	fn flush(&mut self) -> Result<(), IoError> {
		self.inner.flush()
	}

	fn close(&mut self) -> Result<(), IoError> {
		self.inner.close()
	}
}
