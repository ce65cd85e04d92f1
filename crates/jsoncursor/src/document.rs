//! The document: one chunked buffer plus the live chain of parse states.
//!
//! # Examples
//!
//! Driving states by hand:
//!
//! ```rust
//! use jsoncursor::{Document, Status, Value};
//!
//! let mut doc = Document::with_segment_capacity(4).unwrap();
//! doc.feed("nu").unwrap();
//! let state = doc.start();
//! assert_eq!(doc.state(state).unwrap().status(), Status::NeedsMoreInput);
//!
//! doc.feed("ll true").unwrap();
//! let state = doc.advance(state).unwrap();
//! assert_eq!(doc.state(state).unwrap().token(), Some(&Value::Null));
//!
//! // `true` may still continue in the next chunk.
//! let state = doc.advance(state).unwrap();
//! assert_eq!(doc.state(state).unwrap().status(), Status::NeedsMoreInput);
//!
//! doc.close();
//! let state = doc.advance(state).unwrap();
//! assert_eq!(doc.state(state).unwrap().token(), Some(&Value::Boolean(true)));
//! ```
//!
//! Or through the value iterator:
//!
//! ```rust
//! use jsoncursor::{Document, Value};
//!
//! let mut doc = Document::with_segment_capacity(8).unwrap();
//! doc.feed("true false").unwrap();
//! doc.close();
//! let values: Vec<_> = doc.values().collect::<Result<_, _>>().unwrap();
//! assert_eq!(values, [Value::Boolean(true), Value::Boolean(false)]);
//! ```

use alloc::vec::Vec;
use core::{num::NonZeroUsize, ops::Range};

use tracing::{debug, trace};

use crate::{
    buffer::ChunkedBuffer,
    cursor::{Cursor, Outcome, Position},
    error::{DocumentError, ParseError},
    options::DocumentOptions,
    state::{Compose, ParseState, StateArena, StateId, Status},
    value::Value,
};

/// An incrementally fed input document and its parse states.
///
/// Bytes are appended with [`feed`](Self::feed). Parsing starts with
/// [`start`](Self::start) and proceeds one token per
/// [`advance`](Self::advance). No call ever waits for input: when the cursor
/// runs out of bytes, the returned state reports
/// [`Status::NeedsMoreInput`], or [`Status::EndOfInput`] once the document
/// has been [closed](Self::close).
#[derive(Debug)]
pub struct Document {
    buffer: ChunkedBuffer,
    states: StateArena,
    root: Option<StateId>,
    head: Option<StateId>,
    /// Last head handed out by [`Values`].
    reported: Option<StateId>,
    closed: bool,
}

impl Document {
    /// Creates an empty document.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::ZeroSegmentCapacity`] if
    /// `options.segment_capacity` is zero.
    pub fn new(options: DocumentOptions) -> Result<Self, DocumentError> {
        let capacity =
            NonZeroUsize::new(options.segment_capacity).ok_or(DocumentError::ZeroSegmentCapacity)?;
        Ok(Self {
            buffer: ChunkedBuffer::new(capacity),
            states: StateArena::new(),
            root: None,
            head: None,
            reported: None,
            closed: false,
        })
    }

    /// Shorthand for [`new`](Self::new) with only the segment capacity set.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::ZeroSegmentCapacity`] for a zero capacity.
    pub fn with_segment_capacity(segment_capacity: usize) -> Result<Self, DocumentError> {
        Self::new(DocumentOptions { segment_capacity })
    }

    /// Appends a chunk of input and returns the new buffered length.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::Closed`] after [`close`](Self::close).
    pub fn feed(&mut self, bytes: impl AsRef<[u8]>) -> Result<usize, DocumentError> {
        if self.closed {
            return Err(DocumentError::Closed);
        }
        Ok(self.buffer.append(bytes.as_ref()))
    }

    /// Declares that no more input will arrive.
    ///
    /// From now on running out of bytes is reported as
    /// [`Status::EndOfInput`] instead of [`Status::NeedsMoreInput`].
    pub fn close(&mut self) {
        if !self.closed {
            debug!(len = self.buffer.len(), "document closed");
        }
        self.closed = true;
    }

    /// Returns `true` once [`close`](Self::close) has been called.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// The underlying byte buffer.
    #[must_use]
    pub fn buffer(&self) -> &ChunkedBuffer {
        &self.buffer
    }

    /// Number of bytes fed so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Returns `true` if nothing has been fed yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Copies `range` of the fed input.
    ///
    /// # Errors
    ///
    /// Forwards [`BufferError`](crate::BufferError)s for invalid ranges.
    pub fn extract(&self, range: Range<usize>) -> Result<Vec<u8>, DocumentError> {
        Ok(self.buffer.extract(range)?)
    }

    /// Copies a range given with end-relative negative indices; see
    /// [`ChunkedBuffer::slice`].
    ///
    /// # Errors
    ///
    /// Forwards [`BufferError`](crate::BufferError)s for invalid ranges.
    pub fn slice(&self, start: isize, end: isize) -> Result<Vec<u8>, DocumentError> {
        Ok(self.buffer.slice(start, end)?)
    }

    /// Bootstraps the root state at the first byte and advances once.
    ///
    /// Any previous chain is released, so parsing restarts from byte 0.
    pub fn start(&mut self) -> StateId {
        self.states.clear();
        let root = self.states.insert(ParseState::root());
        self.root = Some(root);
        self.reported = None;

        let entry = self
            .states
            .push(root, Compose::Extend, ParseState::root());
        self.step(entry, Position::default(), entry)
    }

    /// Produces the state following `id`.
    ///
    /// Advancing a [`Status::NeedsMoreInput`] state retries the suspended
    /// step: the suspended state is released and the step is applied to its
    /// parent, so retries never grow the chain.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::UnknownState`] if `id` was released or
    /// belongs to another document.
    pub fn advance(&mut self, id: StateId) -> Result<StateId, DocumentError> {
        let state = self.states.get(id).ok_or(DocumentError::UnknownState(id))?;
        let resume = Resume::from(state);
        Ok(self.resume(id, resume))
    }

    /// Advances a state already known to be live.
    fn resume(&mut self, id: StateId, resume: Resume) -> StateId {
        let anchor = match (resume.status, resume.parent) {
            (Status::NeedsMoreInput, Some(parent)) => {
                self.states.remove(id);
                parent
            }
            _ => id,
        };

        self.step(anchor, resume.position, id)
    }

    /// Scans one token from `position` and publishes it relative to `anchor`.
    fn step(&mut self, anchor: StateId, position: Position, requested: StateId) -> StateId {
        let outcome = if self.buffer.locate(position.index()).is_some() {
            Cursor::new(&self.buffer, self.closed, position).scan()
        } else {
            Outcome {
                status: Status::Error,
                token: None,
                position,
                found: None,
                compose: Compose::Extend,
            }
        };

        #[cfg(any(test, feature = "fuzzing"))]
        assert!(
            outcome.status == Status::Error
                || (outcome.position.index() >= position.index()
                    && outcome.position.index() <= self.buffer.len()),
            "Internal error: cursor moved outside the buffered input"
        );

        let compose = outcome.compose;
        let next = self
            .states
            .push(anchor, compose, ParseState::from_outcome(outcome));
        if compose == Compose::Replace && self.root == Some(anchor) {
            self.root = Some(next);
        }
        self.head = Some(next);

        if let Some(state) = self.states.get(next) {
            trace!(
                from = %requested,
                to = %next,
                status = ?state.status,
                token = ?state.token,
                line = state.position.line(),
                column = state.position.column(),
                "advanced"
            );
        }
        next
    }

    /// Looks up a live state.
    #[must_use]
    pub fn state(&self, id: StateId) -> Option<&ParseState> {
        self.states.get(id)
    }

    /// The root of the live chain; `None` before [`start`](Self::start).
    #[must_use]
    pub fn root(&self) -> Option<StateId> {
        self.root
    }

    /// The most recently produced state.
    #[must_use]
    pub fn head(&self) -> Option<StateId> {
        self.head
    }

    /// Number of states currently alive.
    #[must_use]
    pub fn live_states(&self) -> usize {
        self.states.len()
    }

    /// Iterates from `id` up the parent links, `id` first.
    pub fn ancestors(&self, id: StateId) -> Ancestors<'_> {
        Ancestors {
            document: self,
            next: self.states.get(id).map(|_| id),
        }
    }

    /// Number of ancestors above `id`; the root has depth 0.
    ///
    /// Returns `None` for an unknown id.
    #[must_use]
    pub fn depth(&self, id: StateId) -> Option<usize> {
        self.states.get(id)?;
        Some(self.ancestors(id).count() - 1)
    }

    /// Drives the parse from the head state and yields produced values.
    ///
    /// Iteration stops when the input runs out; feed more bytes and call
    /// `values()` again to resume. An unexpected token is yielded once as an
    /// error, after which the iterator stays exhausted.
    pub fn values(&mut self) -> Values<'_> {
        Values { document: self }
    }

    /// Releases every segment and every live state.
    pub fn release(self) {
        debug!(
            segments = self.buffer.segment_count(),
            states = self.states.len(),
            "released document"
        );
    }
}

/// The parts of a state an advance reads.
#[derive(Debug, Clone, Copy)]
struct Resume {
    status: Status,
    position: Position,
    parent: Option<StateId>,
}

impl From<&ParseState> for Resume {
    fn from(state: &ParseState) -> Self {
        Self {
            status: state.status,
            position: state.position,
            parent: state.parent,
        }
    }
}

/// Iterator returned by [`Document::ancestors`].
#[derive(Debug)]
pub struct Ancestors<'a> {
    document: &'a Document,
    next: Option<StateId>,
}

impl Iterator for Ancestors<'_> {
    type Item = StateId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next?;
        self.next = self.document.state(id).and_then(ParseState::parent);
        Some(id)
    }
}

/// Iterator returned by [`Document::values`].
#[derive(Debug)]
pub struct Values<'a> {
    document: &'a mut Document,
}

impl Iterator for Values<'_> {
    type Item = Result<Value, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        let doc = &mut *self.document;
        let id = match doc.head {
            None => doc.start(),
            Some(head) if doc.reported != Some(head) => head,
            Some(head) => {
                // The head is never released while it is the head.
                let resume = Resume::from(doc.state(head)?);
                match resume.status {
                    Status::Ok | Status::NeedsMoreInput => doc.resume(head, resume),
                    Status::EndOfInput | Status::UnexpectedToken | Status::Error => return None,
                }
            }
        };
        doc.reported = Some(id);

        let state = doc.state(id)?;
        match state.status {
            Status::Ok => state.token.clone().map(Ok),
            Status::NeedsMoreInput | Status::EndOfInput => None,
            Status::UnexpectedToken | Status::Error => state.error().map(Err),
        }
    }
}
