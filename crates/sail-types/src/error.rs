//! The single error tag type returned from every fallible SAIL operation
//! (spec §4.8, §7). Discriminants are grouped into bands the way the
//! original C `error.h` grouped its `#define`s: common errors low,
//! format/codec errors in the 40s, registry/plugin errors in the 60s,
//! session-control errors in the 80s, with the kinds spec §7 adds that
//! the trimmed C header didn't carry appended after each band rather
//! than interleaved into it.

use sail_vfs::IoError;
use thiserror::Error;

/// The error taxonomy condensed in spec §7.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum SailErrorKind {
	/// A required allocation failed.
	MemoryAllocation = 1,
	/// A file could not be opened.
	OpenFile = 2,
	/// A directory could not be opened (e.g. the codecs search path).
	DirOpen = 3,
	/// A descriptor or config file failed to parse.
	ParseFile = 4,
	/// An argument failed validation.
	InvalidArgument = 5,
	/// A read from the active I/O stream failed.
	ReadIo = 6,
	/// A write to the active I/O stream failed.
	WriteIo = 7,

	/// A required pointer/handle was null or absent.
	NullPtr = 20,

	/// An image reported nonsensical dimensions.
	IncorrectImageDimensions = 40,
	/// The codec does not support the requested pixel format.
	UnsupportedPixelFormat = 41,
	/// The codec does not support the requested compression.
	UnsupportedCompression = 42,
	/// The underlying bytes are not a valid instance of the format.
	BrokenImage = 43,
	/// No registered codec recognised the source.
	UnsupportedFormat = 44,

	/// A codec descriptor failed its post-parse invariants.
	IncompleteCodecInfo = 60,
	/// The descriptor names a plugin layout version this engine can't load.
	UnsupportedCodecLayout = 61,
	/// The descriptor names a priority string the engine doesn't recognise.
	UnsupportedCodecPriority = 62,
	/// The platform dynamic linker could not load the codec's module.
	CodecLoad = 63,
	/// The module loaded but was missing a required exported symbol.
	CodecSymbolResolve = 64,

	/// The codec does not implement the requested ABI operation.
	NotImplemented = 80,
	/// Benign: the decode source is exhausted. Forwarded to the caller;
	/// the session remains open until `stop`.
	NoMoreFrames = 81,
	/// The session already failed; no further ABI calls will be issued.
	StateExecutionFail = 82,
}

impl SailErrorKind {
	/// Whether this kind signals a recoverable, expected condition rather
	/// than a failure; currently only [`SailErrorKind::NoMoreFrames`].
	pub fn is_benign(self) -> bool {
		matches!(self, SailErrorKind::NoMoreFrames)
	}
}

/// The error type returned from every fallible SAIL operation.
#[derive(Debug, Error)]
#[error("{kind:?}: {message}")]
pub struct SailError {
	/// The error's tag.
	pub kind: SailErrorKind,
	/// Human-readable detail, logged at ERROR level by the caller.
	pub message: String,
	/// The underlying cause, if any.
	#[source]
	pub source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
}

impl SailError {
	/// Builds an error with no underlying cause.
	pub fn new(kind: SailErrorKind, message: impl Into<String>) -> Self {
		Self { kind, message: message.into(), source: None }
	}

	/// Builds an error wrapping an underlying cause.
	pub fn wrap(
		kind: SailErrorKind,
		message: impl Into<String>,
		source: impl std::error::Error + Send + Sync + 'static,
	) -> Self {
		Self { kind, message: message.into(), source: Some(Box::new(source)) }
	}

	/// Shorthand for the frequent "forward NO_MORE_FRAMES" case.
	pub fn no_more_frames() -> Self {
		Self::new(SailErrorKind::NoMoreFrames, "no more frames")
	}
}

impl From<IoError> for SailError {
	fn from(source: IoError) -> Self {
		let kind = match &source {
			IoError::Open { .. } => SailErrorKind::OpenFile,
			IoError::Read(_) => SailErrorKind::ReadIo,
			IoError::Write(_) | IoError::NotWritable => SailErrorKind::WriteIo,
			IoError::Seek(_) => SailErrorKind::ReadIo,
			IoError::Closed => SailErrorKind::InvalidArgument,
		};
		SailError::wrap(kind, "I/O operation failed", source)
	}
}

/// Convenience alias used throughout the SAIL crates.
pub type SailResult<T> = Result<T, SailError>;
