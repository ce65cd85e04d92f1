//! Parse states and the arena that owns them.
//!
//! A parse state is a snapshot of progress: a status, the produced token (if
//! any), the cursor position, and a link to the enclosing state. States are
//! immutable once published. A new state either *extends* the chain (its
//! predecessor stays alive as its parent) or *replaces* the predecessor (the
//! predecessor is released and the new state takes over its parent).
//!
//! States live in a generational arena so that released slots can be reused
//! while stale [`StateId`]s are still detected.

use alloc::vec::Vec;
use core::fmt;

use crate::{
    cursor::{Outcome, Position},
    error::{ParseError, SyntaxError},
    value::Value,
};

/// Outcome class of a parse state.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    /// A value was produced; the state carries a token.
    Ok,
    /// The cursor position no longer resolves against the buffer.
    Error,
    /// No byte is available and the document is closed.
    EndOfInput,
    /// No byte is available yet. Feed more input and advance this state
    /// again.
    NeedsMoreInput,
    /// The input does not continue as a value here.
    UnexpectedToken,
}

impl Status {
    /// Returns `true` for [`Status::Ok`].
    #[must_use]
    pub fn is_ok(self) -> bool {
        self == Status::Ok
    }

    /// Returns `true` if no further token can be produced without feeding
    /// input or correcting it.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        self != Status::Ok
    }
}

/// Handle to a parse state inside a [`Document`](crate::Document).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateId {
    index: u32,
    generation: u32,
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}v{}", self.index, self.generation)
    }
}

/// One node of the parse chain.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseState {
    pub(crate) status: Status,
    pub(crate) token: Option<Value>,
    pub(crate) parent: Option<StateId>,
    pub(crate) position: Position,
    pub(crate) found: Option<u8>,
}

impl ParseState {
    pub(crate) fn root() -> Self {
        Self {
            status: Status::Ok,
            token: None,
            parent: None,
            position: Position::default(),
            found: None,
        }
    }

    pub(crate) fn from_outcome(outcome: Outcome) -> Self {
        Self {
            status: outcome.status,
            token: outcome.token,
            parent: None,
            position: outcome.position,
            found: outcome.found,
        }
    }

    /// The outcome class.
    #[must_use]
    pub fn status(&self) -> Status {
        self.status
    }

    /// The produced value; present when [`status`](Self::status) is
    /// [`Status::Ok`] (the root state is the only ok state without one).
    #[must_use]
    pub fn token(&self) -> Option<&Value> {
        self.token.as_ref()
    }

    /// The enclosing state, or `None` at the root of the chain.
    #[must_use]
    pub fn parent(&self) -> Option<StateId> {
        self.parent
    }

    /// Where the next advance resumes.
    #[must_use]
    pub fn position(&self) -> Position {
        self.position
    }

    /// The byte that made this state unexpected, if one was read.
    #[must_use]
    pub fn found(&self) -> Option<u8> {
        self.found
    }

    /// Describes a failed state as an error with its position.
    ///
    /// Returns `None` for ok, end-of-input and needs-more-input states.
    #[must_use]
    pub fn error(&self) -> Option<ParseError> {
        let kind = match (self.status, self.found) {
            (Status::UnexpectedToken, Some(b)) => SyntaxError::UnexpectedByte(b),
            (Status::UnexpectedToken, None) => SyntaxError::UnexpectedEndOfInput,
            (Status::Error, _) => SyntaxError::Invariant,
            _ => return None,
        };
        Some(ParseError {
            kind,
            line: self.position.line(),
            column: self.position.column(),
        })
    }
}

/// How a new state relates to its predecessor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Compose {
    /// Keep the predecessor as the parent.
    Extend,
    /// Release the predecessor and adopt its parent.
    Replace,
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    state: Option<ParseState>,
}

#[derive(Debug, Default)]
pub(crate) struct StateArena {
    slots: Vec<Slot>,
    free: Vec<u32>,
    live: usize,
}

impl StateArena {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn len(&self) -> usize {
        self.live
    }

    /// Stores `state` in a free slot, or a new one.
    ///
    /// # Panics
    ///
    /// Panics if more than `u32::MAX` slots would be needed.
    pub(crate) fn insert(&mut self, state: ParseState) -> StateId {
        self.live += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.state = Some(state);
            return StateId {
                index,
                generation: slot.generation,
            };
        }

        let index = u32::try_from(self.slots.len()).expect("state arena exceeds u32::MAX slots");
        self.slots.push(Slot {
            generation: 0,
            state: Some(state),
        });
        StateId {
            index,
            generation: 0,
        }
    }

    pub(crate) fn get(&self, id: StateId) -> Option<&ParseState> {
        let slot = self.slots.get(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.state.as_ref()
    }

    /// Releases a state. Its id, and every copy of it, becomes stale.
    pub(crate) fn remove(&mut self, id: StateId) -> Option<ParseState> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        let state = slot.state.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        self.live -= 1;
        Some(state)
    }

    /// Publishes `state` relative to `predecessor`.
    pub(crate) fn push(&mut self, predecessor: StateId, compose: Compose, mut state: ParseState) -> StateId {
        state.parent = match compose {
            Compose::Extend => Some(predecessor),
            Compose::Replace => self.remove(predecessor).and_then(|p| p.parent),
        };
        self.insert(state)
    }

    pub(crate) fn clear(&mut self) {
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if slot.state.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(u32::try_from(index).unwrap_or(u32::MAX));
            }
        }
        self.live = 0;
    }
}
