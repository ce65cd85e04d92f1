use bstr::BStr;
use thiserror::Error;

use crate::state::StateId;

/// Range errors raised by [`ChunkedBuffer`](crate::ChunkedBuffer).
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferError {
    /// The requested range is reversed or extends past the buffered bytes.
    #[error("range {start}..{end} is out of bounds for a buffer of length {len}")]
    OutOfRange {
        /// Resolved start index.
        start: usize,
        /// Resolved end index.
        end: usize,
        /// Buffer length at the time of the request.
        len: usize,
    },
    /// A negative index reaches back past the first byte.
    #[error("index {index} resolves before the start of a buffer of length {len}")]
    BeforeStart {
        /// The index as given by the caller.
        index: isize,
        /// Buffer length at the time of the request.
        len: usize,
    },
}

/// Misuse of a [`Document`](crate::Document).
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentError {
    /// Segments must be able to hold at least one byte.
    #[error("segment capacity must be positive")]
    ZeroSegmentCapacity,
    /// The state id was never issued by this document or has been released.
    #[error("unknown or released parse state {0}")]
    UnknownState(StateId),
    /// Bytes were fed after [`Document::close`](crate::Document::close).
    #[error("document input is closed")]
    Closed,
    #[error("buffer error: {0}")]
    /// Forwarded from the underlying buffer.
    Buffer(#[from] BufferError),
}

/// A parse failure with the cursor position where it was detected.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("{kind} at {line}:{column}")]
pub struct ParseError {
    /// What went wrong.
    pub kind: SyntaxError,
    /// 0-based line of the cursor after the offending byte.
    pub line: usize,
    /// 0-based column of the cursor after the offending byte.
    pub column: usize,
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
/// The taxonomy behind a non-ok [`Status`](crate::Status).
pub enum SyntaxError {
    /// A byte that cannot start a value, break a keyword, or end a keyword.
    #[error("unexpected byte {:?}", BStr::new(core::slice::from_ref(.0)))]
    UnexpectedByte(u8),
    /// The input was closed in the middle of a keyword.
    #[error("unexpected end of input")]
    UnexpectedEndOfInput,
    /// The cursor position no longer resolves against the buffer.
    #[error("cursor position is outside the buffered input")]
    Invariant,
}
