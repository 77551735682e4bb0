//! `FileStream` exercised against a real filesystem path (spec §4.1: the
//! file-backed variant "opens with the platform's binary-mode
//! semantics").

use sail_vfs::{FileStream, SeekFrom, Stream};

#[test]
fn write_then_read_back_through_separate_handles() {
	let dir = tempfile::tempdir().unwrap();
	let path = dir.path().join("frame.bin");

	let mut writer = FileStream::create(&path).unwrap();
	writer.write(b"hello sail").unwrap();
	writer.flush().unwrap();
	writer.close().unwrap();

	let mut reader = FileStream::open(&path).unwrap();
	let mut buf = [0u8; 5];
	let n = reader.read(&mut buf).unwrap();
	assert_eq!(n, 5);
	assert_eq!(&buf, b"hello");

	reader.seek(SeekFrom::Start(6)).unwrap();
	let mut rest = [0u8; 4];
	reader.read_exact(&mut rest).unwrap();
	assert_eq!(&rest, b"sail");
}

#[test]
fn seek_and_tell_agree_after_a_partial_read() {
	let dir = tempfile::tempdir().unwrap();
	let path = dir.path().join("seek.bin");

	let mut writer = FileStream::create(&path).unwrap();
	writer.write(&[0u8, 1, 2, 3, 4, 5, 6, 7]).unwrap();
	drop(writer);

	let mut reader = FileStream::open(&path).unwrap();
	let mut head = [0u8; 3];
	reader.read(&mut head).unwrap();
	assert_eq!(reader.tell().unwrap(), 3);

	let pos = reader.seek(SeekFrom::Current(2)).unwrap();
	assert_eq!(pos, 5);
	assert_eq!(reader.tell().unwrap(), 5);

	let mut tail = [0u8; 3];
	let n = reader.read(&mut tail).unwrap();
	assert_eq!(n, 3);
	assert_eq!(tail, [5, 6, 7]);
}

#[test]
fn opening_a_missing_file_returns_an_io_error() {
	let err = FileStream::open("/nonexistent/path/does-not-exist.bin").unwrap_err();
	let _ = err;
}
