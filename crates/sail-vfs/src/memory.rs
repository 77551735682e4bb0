//! A memory-backed [`Stream`] over an owned byte buffer.

use crate::io::{IoError, SeekFrom, Stream};

/// An in-memory stream with a cursor. Writes are rejected unless the
/// stream was constructed in writable mode (`MemoryStream::writable`),
/// matching spec §4.1: "memory-backed variant treats writes as errors
/// unless constructed in writable mode".
#[derive(Debug, Clone)]
pub struct MemoryStream {
	data: Vec<u8>,
	cursor: usize,
	writable: bool,
	closed: bool,
}

impl MemoryStream {
	/// Wraps `data` for reading only.
	pub fn readable(data: Vec<u8>) -> Self {
		Self { data, cursor: 0, writable: false, closed: false }
	}

	/// Wraps (or starts empty with) `data` for reading and writing.
	pub fn writable(data: Vec<u8>) -> Self {
		Self { data, cursor: 0, writable: true, closed: false }
	}

	/// Consumes the stream, returning the buffer as it stands.
	pub fn into_inner(self) -> Vec<u8> {
		self.data
	}

	/// Borrows the buffer as it stands without consuming the stream.
	pub fn as_slice(&self) -> &[u8] {
		&self.data
	}

	fn check_open(&self) -> Result<(), IoError> {
		if self.closed { Err(IoError::Closed) } else { Ok(()) }
	}
}

impl Stream for MemoryStream {
	fn read(&mut self, buf: &mut [u8]) -> Result<usize, IoError> {
		self.check_open()?;
		let available = self.data.len().saturating_sub(self.cursor);
		let n = available.min(buf.len());
		buf[..n].copy_from_slice(&self.data[self.cursor..self.cursor + n]);
		self.cursor += n;
		Ok(n)
	}

	fn write(&mut self, buf: &[u8]) -> Result<usize, IoError> {
		self.check_open()?;
		if !self.writable {
			return Err(IoError::NotWritable);
		}
		let end = self.cursor + buf.len();
		if end > self.data.len() {
			self.data.resize(end, 0);
		}
		self.data[self.cursor..end].copy_from_slice(buf);
		self.cursor = end;
		Ok(buf.len())
	}

	fn seek(&mut self, pos: SeekFrom) -> Result<u64, IoError> {
		self.check_open()?;
		let new_cursor = match pos {
			SeekFrom::Start(n) => n as i64,
			SeekFrom::Current(n) => self.cursor as i64 + n,
			SeekFrom::End(n) => self.data.len() as i64 + n,
		};
		if new_cursor < 0 {
			return Err(IoError::Seek(std::io::Error::from(std::io::ErrorKind::InvalidInput)));
		}
		self.cursor = new_cursor as usize;
		Ok(self.cursor as u64)
	}

	fn tell(&mut self) -> Result<u64, IoError> {
		self.check_open()?;
		Ok(self.cursor as u64)
	}

	fn flush(&mut self) -> Result<(), IoError> {
		self.check_open()
	}

	fn close(&mut self) -> Result<(), IoError> {
		self.closed = true;
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn read_returns_short_count_at_eof() {
		let mut stream = MemoryStream::readable(vec![1, 2, 3]);
		let mut buf = [0u8; 8];
		let n = stream.read(&mut buf).unwrap();
		assert_eq!(n, 3);
		assert_eq!(stream.read(&mut buf).unwrap(), 0);
	}

	#[test]
	fn write_rejected_when_not_writable() {
		let mut stream = MemoryStream::readable(vec![1, 2, 3]);
		assert!(matches!(stream.write(&[9]), Err(IoError::NotWritable)));
	}

	#[test]
	fn write_extends_buffer_and_seek_round_trips() {
		let mut stream = MemoryStream::writable(Vec::new());
		stream.write(b"hello").unwrap();
		assert_eq!(stream.tell().unwrap(), 5);
		stream.seek(SeekFrom::Start(0)).unwrap();
		let mut buf = [0u8; 5];
		stream.read(&mut buf).unwrap();
		assert_eq!(&buf, b"hello");
	}

	#[test]
	fn closed_stream_rejects_further_use() {
		let mut stream = MemoryStream::writable(Vec::new());
		stream.close().unwrap();
		assert!(matches!(stream.tell(), Err(IoError::Closed)));
	}
}
