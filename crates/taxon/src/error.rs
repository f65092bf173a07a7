//! Error types reported by the parser and the value accessors.
//!
//! Parse failures carry a static message rather than formatted text. The
//! message set falls into a few families:
//!
//! - structural: `"missing colon"`, `"missing key string"`, `"missing value"`,
//!   `"missing comma or closed bracket"`, `"missing comma or closed brace"`,
//!   `"array not terminated properly"`, `"object not terminated properly"`,
//!   `"invalid token"`, `"end of input stream"`
//! - lexical: `"invalid character"`, `"invalid UTF-8 byte"`,
//!   `"invalid UTF-8 sequence"`, `"invalid UTF character"`,
//!   `"invalid number"`, `"string not terminated properly"`,
//!   `"control character not allowed in string"`,
//!   `"incomplete escape sequence"`, `"invalid escape sequence"`,
//!   `"invalid hexadecimal digit"`, `"dangling UTF-16 trailing surrogate"`,
//!   `"missing UTF-16 trailing surrogate"`
//! - annotator: `"unknown type annotator"`, `"invalid 64-bit integer"`,
//!   `"invalid double-precision number"`, `"invalid timestamp"`,
//!   `"invalid hex string"`, `"invalid hex digit"`,
//!   `"invalid base64 string"`, `"invalid base64 digit"`
//! - range: `"number value out of range"`,
//!   `"64-bit integer value out of range"`, `"timestamp value out of range"`
//! - semantic: `"duplicate key string"`, `"nesting limit exceeded"`
//! - i/o: `"source read failure"` (the source failed below the syntax layer)

use thiserror::Error;

use crate::value::Type;

/// A rejected document.
///
/// `offset` is the byte offset of the token that failed, and `message` is a
/// static description of the failure. The first error encountered wins; any
/// partially built value is indeterminate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("{message} at offset {offset}")]
pub struct ParseError {
    /// Static description of the failure.
    pub message: &'static str,
    /// Byte offset of the token that failed.
    pub offset: i64,
}

/// A borrowing accessor was called on a value of another type.
///
/// ```rust
/// use taxon::{Type, Value};
///
/// let value = Value::from(true);
/// let err = value.as_string().unwrap_err();
/// assert_eq!(err.expected, Type::String);
/// assert_eq!(err.actual, Type::Boolean);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("value is {actual}, not {expected}")]
pub struct TypeError {
    /// The type the accessor asked for.
    pub expected: Type,
    /// The type actually stored.
    pub actual: Type,
}
