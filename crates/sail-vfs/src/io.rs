//! The [`Stream`] trait: positioned, blocking byte I/O with an explicit
//! lifetime. Short reads at end-of-file are not errors: callers decide
//! what to do with a `read` that returned fewer bytes than requested.

use thiserror::Error;

/// Errors surfaced by a [`Stream`] implementation.
#[derive(Debug, Error)]
pub enum IoError {
	/// Opening the backing transport failed.
	#[error("failed to open {path}")]
	Open {
		/// Path that failed to open.
		path: String,
		/// Underlying OS error.
		#[source]
		source: std::io::Error,
	},

	/// A read call failed.
	#[error("read failed: {0}")]
	Read(#[source] std::io::Error),

	/// A write call failed.
	#[error("write failed: {0}")]
	Write(#[source] std::io::Error),

	/// A seek or tell call failed.
	#[error("seek failed: {0}")]
	Seek(#[source] std::io::Error),

	/// A memory-backed stream that was opened read-only received a write.
	#[error("stream is not writable")]
	NotWritable,

	/// The stream was closed and may not be used again.
	#[error("stream already closed")]
	Closed,
}

/// Mirrors [`std::io::SeekFrom`] so this crate doesn't force `std::io` on
/// callers who only want the stream abstraction (e.g. a user-supplied
/// transport with no file descriptor at all).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeekFrom {
	/// Seek from the start of the stream.
	Start(u64),
	/// Seek from the current position.
	Current(i64),
	/// Seek from the end of the stream.
	End(i64),
}

impl From<SeekFrom> for std::io::SeekFrom {
	fn from(value: SeekFrom) -> Self {
		match value {
			SeekFrom::Start(n) => std::io::SeekFrom::Start(n),
			SeekFrom::Current(n) => std::io::SeekFrom::Current(n),
			SeekFrom::End(n) => std::io::SeekFrom::End(n),
		}
	}
}

/// A positioned, blocking byte stream.
///
/// Implementors are not required to be `Send`; a [`Stream`] is owned by
/// exactly one session for the session's lifetime and never shared across
/// threads (see the concurrency model: distinct sessions are independent,
/// a single session is not).
pub trait Stream: std::fmt::Debug {
	/// Reads up to `buf.len()` bytes, returning the number actually read.
	/// A short read at end-of-file is not an error.
	fn read(&mut self, buf: &mut [u8]) -> Result<usize, IoError>;

	/// Writes `buf`, returning the number of bytes actually written.
	fn write(&mut self, buf: &[u8]) -> Result<usize, IoError>;

	/// Repositions the stream cursor, returning the new absolute position.
	fn seek(&mut self, pos: SeekFrom) -> Result<u64, IoError>;

	/// Returns the current absolute position.
	fn tell(&mut self) -> Result<u64, IoError>;

	/// Flushes any buffering the transport itself performs.
	fn flush(&mut self) -> Result<(), IoError>;

	/// Releases the transport. Idempotent where the backing resource
	/// allows it; called once by the session engine at `stop`.
	fn close(&mut self) -> Result<(), IoError>;

	/// Reads exactly `buf.len()` bytes or fails. Used by header parsers
	/// that need a fixed-size prefix (codec-info probing, ABI handshakes).
	fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), IoError> {
		let mut filled = 0;
		while filled < buf.len() {
			let n = self.read(&mut buf[filled..])?;
			if n == 0 {
				return Err(IoError::Read(std::io::Error::from(
					std::io::ErrorKind::UnexpectedEof,
				)));
			}
			filled += n;
		}
		Ok(())
	}
}

/// A boxed, trait-object stream: what the session engine actually stores,
/// regardless of which concrete backend produced it.
pub type BoxStream = Box<dyn Stream>;
