//! Byte-level cursor over a [`ChunkedBuffer`].
//!
//! A `Cursor` is a short-lived view: it borrows the buffer, starts at the
//! position saved in a parse state, and scans exactly one token. The
//! resulting [`Outcome`] carries the new position, which the document stores
//! in a fresh state. Committed positions only ever move forward.
//!
//! Positions are canonical: `segment == index / capacity` and
//! `offset == index % capacity`. A position at the start of a segment that
//! has not been allocated yet reads as "no data" until bytes arrive.

use crate::{
    buffer::{ChunkedBuffer, Location},
    literal::{ExpectedLiteral, Step},
    state::{Compose, Status},
    value::Value,
};

/// Where a parse state sits in the input.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    segment: usize,
    offset: usize,
    index: usize,
    line: usize,
    column: usize,
}

impl Position {
    /// Segment the next byte is read from.
    #[must_use]
    pub fn segment(&self) -> usize {
        self.segment
    }

    /// Offset of the next byte inside its segment.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Absolute index of the next byte; equals the number of consumed bytes.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// 0-based line.
    #[must_use]
    pub fn line(&self) -> usize {
        self.line
    }

    /// 0-based column; after consuming `n` bytes of a line it is `n`.
    #[must_use]
    pub fn column(&self) -> usize {
        self.column
    }

    /// The `(segment, offset)` pair for buffer lookups.
    #[must_use]
    pub fn location(&self) -> Location {
        Location {
            segment: self.segment,
            offset: self.offset,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Represents a peeked byte from the buffer.
pub(crate) enum Peeked {
    /// Nothing buffered at the position yet.
    Empty,
    /// Some byte
    Byte(u8),
    /// Nothing buffered and the document is closed.
    EndOfInput,
}

use Peeked::{Byte, Empty, EndOfInput};

pub(crate) fn is_whitespace(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | b'\r')
}

/// Bytes (or the closed end of input) allowed right after a keyword.
///
/// `Empty` is not a terminator: the next chunk may still continue the word.
pub(crate) fn is_terminator(peeked: Peeked) -> bool {
    match peeked {
        EndOfInput => true,
        Empty => false,
        Byte(b) => is_whitespace(b) || matches!(b, b':' | b',' | b']' | b'}'),
    }
}

/// The result of scanning one token.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Outcome {
    pub(crate) status: Status,
    pub(crate) token: Option<Value>,
    pub(crate) position: Position,
    pub(crate) found: Option<u8>,
    pub(crate) compose: Compose,
}

impl Outcome {
    fn terminal(status: Status, position: Position, found: Option<u8>, compose: Compose) -> Self {
        Self {
            status,
            token: None,
            position,
            found,
            compose,
        }
    }
}

pub(crate) struct Cursor<'a> {
    buffer: &'a ChunkedBuffer,
    closed: bool,
    position: Position,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(buffer: &'a ChunkedBuffer, closed: bool, position: Position) -> Self {
        Self {
            buffer,
            closed,
            position,
        }
    }

    pub(crate) fn position(&self) -> Position {
        self.position
    }

    pub(crate) fn peek(&self) -> Peeked {
        match self.buffer.byte_at(self.position.location()) {
            Some(b) => Byte(b),
            None if self.closed => EndOfInput,
            None => Empty,
        }
    }

    /// Returns `peek()` and steps past the byte, if there was one.
    pub(crate) fn consume(&mut self) -> Peeked {
        let peeked = self.peek();
        if let Byte(b) = peeked {
            let p = &mut self.position;
            p.index += 1;
            p.offset += 1;
            if p.offset == self.buffer.segment_capacity() {
                p.segment += 1;
                p.offset = 0;
            }
            if b == b'\n' {
                p.line += 1;
                p.column = 0;
            } else {
                p.column += 1;
            }
        }
        peeked
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Byte(b) if is_whitespace(b)) {
            self.consume();
        }
    }

    /// Scans the next token.
    pub(crate) fn scan(mut self) -> Outcome {
        self.skip_whitespace();
        let start = self.position;

        match self.consume() {
            Empty => Outcome::terminal(Status::NeedsMoreInput, start, None, Compose::Extend),
            EndOfInput => Outcome::terminal(Status::EndOfInput, start, None, Compose::Extend),
            Byte(lead) => match ExpectedLiteral::new(lead) {
                Some(literal) => self.keyword(literal, start),
                None => Outcome::terminal(
                    Status::UnexpectedToken,
                    self.position,
                    Some(lead),
                    Compose::Extend,
                ),
            },
        }
    }

    /// Matches the rest of a keyword whose lead byte was consumed at `start`.
    fn keyword(&mut self, mut literal: ExpectedLiteral, start: Position) -> Outcome {
        let value = loop {
            match self.consume() {
                Byte(b) => match literal.step(b) {
                    Step::NeedMore => {}
                    Step::Done(value) => break value,
                    Step::Reject => {
                        return Outcome::terminal(
                            Status::UnexpectedToken,
                            self.position,
                            Some(b),
                            Compose::Replace,
                        );
                    }
                },
                // Nothing committed: the caller retries from `start`.
                Empty => {
                    return Outcome::terminal(Status::NeedsMoreInput, start, None, Compose::Extend);
                }
                EndOfInput => {
                    return Outcome::terminal(
                        Status::UnexpectedToken,
                        self.position,
                        None,
                        Compose::Replace,
                    );
                }
            }
        };

        let next = self.peek();
        if next == Empty {
            return Outcome::terminal(Status::NeedsMoreInput, start, None, Compose::Extend);
        }
        if is_terminator(next) {
            return Outcome {
                status: Status::Ok,
                token: Some(value),
                position: self.position,
                found: None,
                compose: Compose::Replace,
            };
        }

        self.consume();
        let found = match next {
            Byte(b) => Some(b),
            Empty | EndOfInput => None,
        };
        Outcome::terminal(Status::UnexpectedToken, self.position, found, Compose::Replace)
    }
}
