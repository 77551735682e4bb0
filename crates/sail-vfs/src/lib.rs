//! Uniform I/O stream abstraction for `sail`.
//!
//! A [`Stream`] unifies three backing transports behind one interface: a
//! plain file, an in-memory byte range, and a caller-supplied object. The
//! session engine in `sail-internal` drives a `Stream` synchronously;
//! nothing here buffers beyond what the transport itself provides.

mod io;
mod memory;
mod user;

pub use io::{IoError, SeekFrom, Stream};
pub use memory::MemoryStream;
pub use user::UserStream;

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, Write};
use std::path::Path;

/// A stream backed by an open [`File`].
///
/// Opened in the platform's binary-mode semantics (no text-mode newline
/// translation, matching how every other backend treats bytes literally).
#[derive(Debug)]
pub struct FileStream {
	file: File,
}

impl FileStream {
	/// Opens `path` for reading.
	pub fn open(path: impl AsRef<Path>) -> Result<Self, IoError> {
		let file = File::open(path.as_ref()).map_err(|source| IoError::Open {
			path: path.as_ref().display().to_string(),
			source,
		})?;
		Ok(Self { file })
	}

	/// Creates (or truncates) `path` for writing.
	pub fn create(path: impl AsRef<Path>) -> Result<Self, IoError> {
		let file = OpenOptions::new()
			.write(true)
			.create(true)
			.truncate(true)
			.open(path.as_ref())
			.map_err(|source| IoError::Open { path: path.as_ref().display().to_string(), source })?;
		Ok(Self { file })
	}
}

impl Stream for FileStream {
	fn read(&mut self, buf: &mut [u8]) -> Result<usize, IoError> {
		self.file.read(buf).map_err(IoError::Read)
	}

	fn write(&mut self, buf: &[u8]) -> Result<usize, IoError> {
		self.file.write(buf).map_err(IoError::Write)
	}

	fn seek(&mut self, pos: SeekFrom) -> Result<u64, IoError> {
		self.file.seek(pos.into()).map_err(IoError::Seek)
	}

	fn tell(&mut self) -> Result<u64, IoError> {
		self.file.stream_position().map_err(IoError::Seek)
	}

	fn flush(&mut self) -> Result<(), IoError> {
		self.file.flush().map_err(IoError::Write)
	}

	fn close(&mut self) -> Result<(), IoError> {
		// Dropping `File` closes the descriptor; nothing to do explicitly,
		// but we still flush so buffered writers never lose data silently.
		self.flush()
	}
}
