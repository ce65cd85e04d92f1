//! Incremental JSON parsing over a chunked, append-only byte buffer.
//!
//! Input arrives in arbitrary chunks through [`Document::feed`]. The bytes are
//! stored in fixed-size segments ([`ChunkedBuffer`]) so that growth never
//! moves data that is already buffered. Parsing is driven one token at a
//! time: every [`Document::advance`] reads from the saved position of a
//! [`ParseState`] and publishes a new state, never blocking for input and
//! never re-reading committed bytes.
//!
//! ```rust
//! use jsoncursor::{Document, Status, Value};
//!
//! let mut doc = Document::with_segment_capacity(16).unwrap();
//! doc.feed("  nu").unwrap();
//! let state = doc.start();
//! assert_eq!(doc.state(state).unwrap().status(), Status::NeedsMoreInput);
//!
//! doc.feed("ll").unwrap();
//! doc.close();
//! let state = doc.advance(state).unwrap();
//! let state = doc.state(state).unwrap();
//! assert_eq!(state.token(), Some(&Value::Null));
//! assert_eq!(state.position().column(), 6);
//! ```

#![no_std]
extern crate alloc;

#[cfg(test)]
extern crate std;

mod buffer;
mod cursor;
mod document;
mod error;
mod literal;
mod options;
mod state;
mod value;

#[cfg(test)]
mod tests;

pub use buffer::{ChunkedBuffer, Location, Segment};
pub use cursor::Position;
pub use document::{Ancestors, Document, Values};
pub use error::{BufferError, DocumentError, ParseError, SyntaxError};
pub use options::{DEFAULT_SEGMENT_CAPACITY, DocumentOptions};
pub use state::{ParseState, StateId, Status};
pub use value::Value;
