//! Chunked, append-only byte storage.
//!
//! Overview
//! - `ChunkedBuffer` holds the full byte history of a document as a list of
//!   fixed-capacity [`Segment`]s. Appending never moves bytes that are already
//!   stored; it only fills the last segment and allocates new ones.
//! - Any byte ever received can be addressed by its absolute index. The
//!   cursor reads through [`Location`]s, which are `(segment, offset)` pairs.
//!
//! Invariants
//! - Every segment except the last is full; the last has `filled <= capacity`.
//! - `len` is the sum of all fill lengths.
//! - Segments are only dropped together with the buffer.

use alloc::{boxed::Box, vec, vec::Vec};
use core::{fmt, num::NonZeroUsize, ops::Range};

use bstr::BStr;
use tracing::debug;

use crate::error::BufferError;

/// A fixed-capacity block of bytes.
pub struct Segment {
    data: Box<[u8]>,
    filled: usize,
}

impl Segment {
    fn with_capacity(capacity: NonZeroUsize) -> Self {
        Self {
            data: vec![0; capacity.get()].into_boxed_slice(),
            filled: 0,
        }
    }

    /// Total number of bytes this segment can hold.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Number of bytes written so far.
    #[must_use]
    pub fn filled(&self) -> usize {
        self.filled
    }

    /// Returns `true` once no more bytes fit.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.filled == self.data.len()
    }

    /// The written prefix of the segment.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data[..self.filled]
    }

    /// Copies as much of `bytes` as fits and returns how many were taken.
    fn fill_from(&mut self, bytes: &[u8]) -> usize {
        let n = (self.data.len() - self.filled).min(bytes.len());
        self.data[self.filled..self.filled + n].copy_from_slice(&bytes[..n]);
        self.filled += n;
        n
    }
}

impl fmt::Debug for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Segment")
            .field("capacity", &self.capacity())
            .field("filled", &self.filled)
            .field("data", &BStr::new(self.as_bytes()))
            .finish()
    }
}

/// An absolute byte index resolved against the segment list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Location {
    /// Index of the segment in the buffer.
    pub segment: usize,
    /// Offset inside that segment.
    pub offset: usize,
}

/// An ever-growing byte sequence stored in fixed-size segments.
///
/// # Examples
///
/// ```rust
/// use core::num::NonZeroUsize;
/// use jsoncursor::ChunkedBuffer;
///
/// let mut buffer = ChunkedBuffer::new(NonZeroUsize::new(4).unwrap());
/// buffer.append(b"tr");
/// buffer.append(b"ue, false");
/// assert_eq!(buffer.segment_count(), 3);
/// assert_eq!(buffer.extract(0..4).unwrap(), b"true");
/// ```
pub struct ChunkedBuffer {
    segments: Vec<Segment>,
    segment_capacity: NonZeroUsize,
    len: usize,
}

impl ChunkedBuffer {
    /// Creates an empty buffer whose segments hold `segment_capacity` bytes.
    #[must_use]
    pub fn new(segment_capacity: NonZeroUsize) -> Self {
        Self {
            segments: Vec::new(),
            segment_capacity,
            len: 0,
        }
    }

    /// Total number of bytes appended so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if nothing has been appended yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Capacity shared by every segment.
    #[must_use]
    pub fn segment_capacity(&self) -> usize {
        self.segment_capacity.get()
    }

    /// Number of allocated segments.
    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// The allocated segments in order.
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Appends `bytes` and returns the new total length.
    ///
    /// The last segment is filled to capacity before a new one is allocated.
    pub fn append(&mut self, bytes: &[u8]) -> usize {
        let mut rest = bytes;
        if let Some(last) = self.segments.last_mut() {
            let taken = last.fill_from(rest);
            rest = &rest[taken..];
        }

        while !rest.is_empty() {
            let mut segment = Segment::with_capacity(self.segment_capacity);
            let taken = segment.fill_from(rest);
            rest = &rest[taken..];
            self.segments.push(segment);
            debug!(
                segments = self.segments.len(),
                capacity = self.segment_capacity.get(),
                "allocated segment"
            );
        }

        self.len += bytes.len();
        self.len
    }

    /// Resolves an absolute index to a segment and an offset inside it.
    ///
    /// `index == len()` is the one-past-end position and always resolves: into
    /// the last segment (with `offset == filled`), or to `(0, 0)` while the
    /// buffer is empty. Anything past that yields `None`.
    #[must_use]
    pub fn locate(&self, index: usize) -> Option<Location> {
        if index > self.len {
            return None;
        }

        let capacity = self.segment_capacity.get();
        let location = Location {
            segment: index / capacity,
            offset: index % capacity,
        };

        if location.segment < self.segments.len() {
            Some(location)
        } else if self.segments.is_empty() {
            Some(Location {
                segment: 0,
                offset: 0,
            })
        } else {
            // `index == len` and the last segment is exactly full.
            Some(Location {
                segment: self.segments.len() - 1,
                offset: capacity,
            })
        }
    }

    /// The byte stored at `location`, if it has been received.
    #[must_use]
    pub fn byte_at(&self, location: Location) -> Option<u8> {
        self.segments
            .get(location.segment)?
            .as_bytes()
            .get(location.offset)
            .copied()
    }

    /// Copies the half-open range into a new contiguous vector.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::OutOfRange`] unless `start <= end <= len()`.
    pub fn extract(&self, range: Range<usize>) -> Result<Vec<u8>, BufferError> {
        let Range { start, end } = range;
        if start > end || end > self.len {
            return Err(BufferError::OutOfRange {
                start,
                end,
                len: self.len,
            });
        }

        let capacity = self.segment_capacity.get();
        let mut out = Vec::with_capacity(end - start);
        let mut index = start;
        while index < end {
            let segment = &self.segments[index / capacity];
            let offset = index % capacity;
            let take = (capacity - offset).min(end - index);
            out.extend_from_slice(&segment.as_bytes()[offset..offset + take]);
            index += take;
        }

        Ok(out)
    }

    /// Like [`extract`](Self::extract), but negative indices count from the
    /// end: `-1` is the end of the buffer, `-2` the last byte, and so on.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::BeforeStart`] if an index still resolves below
    /// zero, and [`BufferError::OutOfRange`] for an invalid resolved range.
    pub fn slice(&self, start: isize, end: isize) -> Result<Vec<u8>, BufferError> {
        let start = self.resolve(start)?;
        let end = self.resolve(end)?;
        self.extract(start..end)
    }

    fn resolve(&self, index: isize) -> Result<usize, BufferError> {
        if let Ok(index) = usize::try_from(index) {
            return Ok(index);
        }

        let from_end = index.unsigned_abs() - 1;
        self.len
            .checked_sub(from_end)
            .ok_or(BufferError::BeforeStart {
                index,
                len: self.len,
            })
    }
}

impl fmt::Debug for ChunkedBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChunkedBuffer")
            .field("len", &self.len)
            .field("segment_capacity", &self.segment_capacity)
            .field("segments", &self.segments)
            .finish()
    }
}
