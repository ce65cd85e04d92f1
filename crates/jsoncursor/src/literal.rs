use crate::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Keyword {
    Null,
    True,
    False,
}

impl Keyword {
    fn value(self) -> Value {
        match self {
            Keyword::Null => Value::Null,
            Keyword::True => Value::Boolean(true),
            Keyword::False => Value::Boolean(false),
        }
    }
}

/// What happened after feeding one more byte into the keyword matcher?
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Step {
    /// Byte matched, but the keyword is not finished yet.
    NeedMore,
    /// Byte matched *and* it was the last byte of the keyword.
    Done(Value),
    /// Byte did **not** match the expected one.
    Reject,
}

/// Matches the remainder of a keyword after its leading byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ExpectedLiteral {
    remaining: &'static [u8],
    keyword: Keyword,
}

impl ExpectedLiteral {
    /// Starts matching after the leading byte (`n`, `t`, or `f`).
    pub(crate) fn new(lead: u8) -> Option<Self> {
        let (remaining, keyword): (&'static [u8], _) = match lead {
            b'n' => (b"ull", Keyword::Null),
            b't' => (b"rue", Keyword::True),
            b'f' => (b"alse", Keyword::False),
            _ => return None,
        };
        Some(Self { remaining, keyword })
    }

    pub(crate) fn step(&mut self, byte: u8) -> Step {
        match self.remaining.split_first() {
            Some((&expected, rest)) if expected == byte => {
                self.remaining = rest;
                if rest.is_empty() {
                    Step::Done(self.keyword.value())
                } else {
                    Step::NeedMore
                }
            }
            _ => Step::Reject,
        }
    }
}
