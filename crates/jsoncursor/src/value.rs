//! Values produced by the cursor.
//!
//! The set of variants covers the whole JSON grammar, while the cursor
//! currently recognizes the keyword literals only (`null`, `true`, `false`).
//! Numbers, strings, arrays and object members are declared here so the
//! public type does not change once they are recognized.

use alloc::{boxed::Box, string::String, vec::Vec};
use core::fmt::{self, Write};

/// A JSON value owned by a [`ParseState`](crate::ParseState).
///
/// # Examples
///
/// ```
/// use jsoncursor::Value;
///
/// let member = Value::pair("enabled", Value::Boolean(true));
/// assert_eq!(member.to_string(), r#""enabled":true"#);
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Clone, Debug, PartialEq, Default)]
pub enum Value {
    /// `null`
    #[default]
    Null,
    /// `true` or `false`
    Boolean(bool),
    /// A number without fraction or exponent.
    Integer(i64),
    /// Any other number.
    Number(f64),
    /// A string.
    String(String),
    /// An array.
    Array(Vec<Value>),
    /// One member of an object.
    Pair {
        /// The member name.
        key: String,
        /// The member value.
        value: Box<Value>,
    },
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Boolean(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Self::Array(v)
    }
}

impl Value {
    /// Builds an object member.
    #[must_use]
    pub fn pair(key: impl Into<String>, value: Value) -> Self {
        Self::Pair {
            key: key.into(),
            value: Box::new(value),
        }
    }

    /// Returns `true` if the value is [`Null`].
    ///
    /// [`Null`]: Value::Null
    ///
    /// # Examples
    ///
    /// ```
    /// use jsoncursor::Value;
    ///
    /// assert!(Value::Null.is_null());
    /// assert!(!Value::Boolean(false).is_null());
    /// ```
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns `true` if the value is [`Boolean`].
    ///
    /// [`Boolean`]: Value::Boolean
    #[must_use]
    pub fn is_bool(&self) -> bool {
        matches!(self, Self::Boolean(..))
    }

    /// Returns the boolean, if this is one.
    ///
    /// ```
    /// use jsoncursor::Value;
    ///
    /// assert_eq!(Value::Boolean(false).as_bool(), Some(false));
    /// assert_eq!(Value::Null.as_bool(), None);
    /// ```
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns `true` for [`Integer`] and [`Number`].
    ///
    /// [`Integer`]: Value::Integer
    /// [`Number`]: Value::Number
    #[must_use]
    pub fn is_number(&self) -> bool {
        matches!(self, Self::Integer(..) | Self::Number(..))
    }

    /// Returns `true` if the value is [`String`].
    ///
    /// [`String`]: Value::String
    #[must_use]
    pub fn is_string(&self) -> bool {
        matches!(self, Self::String(..))
    }

    /// Returns `true` if the value is [`Array`].
    ///
    /// [`Array`]: Value::Array
    #[must_use]
    pub fn is_array(&self) -> bool {
        matches!(self, Self::Array(..))
    }

    /// Returns `true` if the value is a [`Pair`].
    ///
    /// [`Pair`]: Value::Pair
    #[must_use]
    pub fn is_pair(&self) -> bool {
        matches!(self, Self::Pair { .. })
    }
}

/// Writes `src` with quotes, backslashes and control characters escaped.
fn write_escaped_string<W: Write>(src: &str, f: &mut W) -> fmt::Result {
    f.write_char('"')?;
    for c in src.chars() {
        match c {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\u{2028}' | '\u{2029}' => write!(f, "\\u{:04X}", c as u32)?,
            c if c.is_ascii_control() || c.is_control() && c as u32 <= 0xFFFF => {
                write!(f, "\\u{:04X}", c as u32)?;
            }
            _ => f.write_char(c)?,
        }
    }
    f.write_char('"')
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Boolean(b) => f.write_str(if *b { "true" } else { "false" }),
            Value::Integer(n) => write!(f, "{n}"),
            Value::Number(n) => write!(f, "{n}"),
            Value::String(s) => write_escaped_string(s, f),
            Value::Array(arr) => {
                f.write_char('[')?;
                for (i, v) in arr.iter().enumerate() {
                    if i > 0 {
                        f.write_char(',')?;
                    }
                    write!(f, "{v}")?;
                }
                f.write_char(']')
            }
            Value::Pair { key, value } => {
                write_escaped_string(key, f)?;
                write!(f, ":{value}")
            }
        }
    }
}
