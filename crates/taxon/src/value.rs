//! The tagged value tree.
//!
//! A [`Value`] is one of nine alternatives. Aggregates and byte-carrying
//! payloads are shared through reference counting with copy-on-write
//! mutation, so copying a value is O(1) regardless of its size. Values are
//! destroyed iteratively: dropping an arbitrarily deep tree never recurses
//! down its spine.

use std::collections::HashMap;
use std::fmt;
use std::io;
use std::rc::Rc;
use std::str::FromStr;

use bstr::{BStr, BString, ByteSlice};

use crate::error::{ParseError, TypeError};
use crate::options::Options;
use crate::parser::{self, ParserContext};
use crate::printer;
use crate::sink::Sink;
use crate::source::{SliceSource, Source};

/// An ordered sequence of values.
pub type Array = Vec<Value>;

/// A mapping from byte-string keys to values.
///
/// Keys are unique; iteration order is unspecified but stable while the map
/// is not modified.
pub type Object = HashMap<BString, Value>;

/// The type of a [`Value`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Type {
    /// The null value.
    Null,
    /// An array.
    Array,
    /// An object.
    Object,
    /// A boolean value.
    Boolean,
    /// A 64-bit integer.
    Integer,
    /// A floating-point number.
    Number,
    /// A character string.
    String,
    /// A byte string.
    Binary,
    /// A timestamp.
    Time,
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Type::Null => "null",
            Type::Array => "array",
            Type::Object => "object",
            Type::Boolean => "boolean",
            Type::Integer => "integer",
            Type::Number => "number",
            Type::String => "string",
            Type::Binary => "binary",
            Type::Time => "time",
        })
    }
}

/// A TAXON value.
///
/// - `String` payloads are byte sequences intended to be UTF-8; they are not
///   validated on construction.
/// - `Binary` payloads are arbitrary bytes.
/// - `Time` is an instant as signed milliseconds since
///   1970-01-01T00:00:00Z. The parser only accepts instants between the
///   years 1900 and 9999 inclusive; values stored programmatically are not
///   re-validated.
///
/// # Examples
///
/// ```rust
/// use taxon::{Options, Value};
///
/// let value = Value::from(vec![Value::from(1), Value::from("hello")]);
/// assert_eq!(value.to_text(Options::default()), r#"["$l:1","hello"]"#);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// No payload.
    Null,
    /// `true` or `false`.
    Boolean(bool),
    /// A signed 64-bit integer.
    Integer(i64),
    /// An IEEE-754 binary64 number; may be non-finite.
    Number(f64),
    /// Bytes intended to be UTF-8, shared and copied on write.
    String(Rc<BString>),
    /// Arbitrary bytes, shared and copied on write.
    Binary(Rc<Vec<u8>>),
    /// Milliseconds since the Unix epoch.
    Time(i64),
    /// An ordered sequence of values, shared and copied on write.
    Array(Rc<Array>),
    /// A keyed map of values, shared and copied on write.
    Object(Rc<Object>),
}

impl Default for Value {
    fn default() -> Self {
        Self::Null
    }
}

impl Value {
    /// Constructs a timestamp from milliseconds since the Unix epoch.
    #[must_use]
    pub fn time(milliseconds: i64) -> Self {
        Self::Time(milliseconds)
    }

    /// Returns the type of the stored value.
    #[must_use]
    pub fn kind(&self) -> Type {
        match self {
            Value::Null => Type::Null,
            Value::Boolean(_) => Type::Boolean,
            Value::Integer(_) => Type::Integer,
            Value::Number(_) => Type::Number,
            Value::String(_) => Type::String,
            Value::Binary(_) => Type::Binary,
            Value::Time(_) => Type::Time,
            Value::Array(_) => Type::Array,
            Value::Object(_) => Type::Object,
        }
    }

    fn mismatch(&self, expected: Type) -> TypeError {
        TypeError {
            expected,
            actual: self.kind(),
        }
    }

    /// Returns `true` if the stored value is null.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns `true` if the stored value is a boolean.
    #[must_use]
    pub fn is_boolean(&self) -> bool {
        matches!(self, Value::Boolean(_))
    }

    /// Returns `true` if the stored value is an integer.
    #[must_use]
    pub fn is_integer(&self) -> bool {
        matches!(self, Value::Integer(_))
    }

    /// Returns `true` if the stored value is an integer or a floating-point
    /// number.
    ///
    /// ```rust
    /// use taxon::Value;
    ///
    /// assert!(Value::from(42).is_number());
    /// assert!(Value::from(1.5).is_number());
    /// assert!(!Value::Null.is_number());
    /// ```
    #[must_use]
    pub fn is_number(&self) -> bool {
        matches!(self, Value::Integer(_) | Value::Number(_))
    }

    /// Returns `true` if the stored value is a character string.
    #[must_use]
    pub fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    /// Returns `true` if the stored value is a byte string.
    #[must_use]
    pub fn is_binary(&self) -> bool {
        matches!(self, Value::Binary(_))
    }

    /// Returns `true` if the stored value is a timestamp.
    #[must_use]
    pub fn is_time(&self) -> bool {
        matches!(self, Value::Time(_))
    }

    /// Returns `true` if the stored value is an array.
    #[must_use]
    pub fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    /// Returns `true` if the stored value is an object.
    #[must_use]
    pub fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    /// Sets a null value.
    pub fn clear(&mut self) {
        *self = Value::Null;
    }

    /// Swaps two values without copying either payload.
    pub fn swap(&mut self, other: &mut Value) {
        std::mem::swap(self, other);
    }

    /// Gets a boolean value, or fails if another type is stored.
    pub fn as_boolean(&self) -> Result<bool, TypeError> {
        match *self {
            Value::Boolean(value) => Ok(value),
            _ => Err(self.mismatch(Type::Boolean)),
        }
    }

    /// Gets an integer, or fails if another type is stored.
    pub fn as_integer(&self) -> Result<i64, TypeError> {
        match *self {
            Value::Integer(value) => Ok(value),
            _ => Err(self.mismatch(Type::Integer)),
        }
    }

    /// Gets a floating-point number, or fails if another type is stored.
    ///
    /// An integer converts implicitly, despite potential precision loss
    /// above 2^53. There is no conversion in the other direction.
    pub fn as_number(&self) -> Result<f64, TypeError> {
        match *self {
            Value::Integer(value) => Ok(value as f64),
            Value::Number(value) => Ok(value),
            _ => Err(self.mismatch(Type::Number)),
        }
    }

    /// Gets a character string, or fails if another type is stored.
    pub fn as_string(&self) -> Result<&BStr, TypeError> {
        match self {
            Value::String(value) => Ok(value.as_bstr()),
            _ => Err(self.mismatch(Type::String)),
        }
    }

    /// Gets a byte string, or fails if another type is stored.
    pub fn as_binary(&self) -> Result<&[u8], TypeError> {
        match self {
            Value::Binary(value) => Ok(value),
            _ => Err(self.mismatch(Type::Binary)),
        }
    }

    /// Gets a timestamp as milliseconds since the Unix epoch, or fails if
    /// another type is stored.
    pub fn as_time(&self) -> Result<i64, TypeError> {
        match *self {
            Value::Time(value) => Ok(value),
            _ => Err(self.mismatch(Type::Time)),
        }
    }

    /// Gets an array, or fails if another type is stored.
    pub fn as_array(&self) -> Result<&Array, TypeError> {
        match self {
            Value::Array(value) => Ok(value),
            _ => Err(self.mismatch(Type::Array)),
        }
    }

    /// Gets an object, or fails if another type is stored.
    pub fn as_object(&self) -> Result<&Object, TypeError> {
        match self {
            Value::Object(value) => Ok(value),
            _ => Err(self.mismatch(Type::Object)),
        }
    }

    /// Gets or creates a boolean value. If another type is stored, it is
    /// overwritten with `false` first.
    pub fn open_boolean(&mut self) -> &mut bool {
        if !matches!(self, Value::Boolean(_)) {
            *self = Value::Boolean(false);
        }
        match self {
            Value::Boolean(value) => value,
            _ => unreachable!(),
        }
    }

    /// Gets or creates an integer. If another type is stored, it is
    /// overwritten with zero first.
    pub fn open_integer(&mut self) -> &mut i64 {
        if !matches!(self, Value::Integer(_)) {
            *self = Value::Integer(0);
        }
        match self {
            Value::Integer(value) => value,
            _ => unreachable!(),
        }
    }

    /// Gets or creates a floating-point number. A stored integer is
    /// converted in place, despite potential precision loss; any other type
    /// is overwritten with zero first.
    pub fn open_number(&mut self) -> &mut f64 {
        if let Value::Integer(stored) = self {
            let widened = *stored as f64;
            *self = Value::Number(widened);
        } else if !matches!(self, Value::Number(_)) {
            *self = Value::Number(0.0);
        }
        match self {
            Value::Number(value) => value,
            _ => unreachable!(),
        }
    }

    /// Gets or creates a character string. If another type is stored, it is
    /// overwritten with an empty string first.
    pub fn open_string(&mut self) -> &mut BString {
        if !matches!(self, Value::String(_)) {
            *self = Value::String(Rc::new(BString::default()));
        }
        match self {
            Value::String(value) => Rc::make_mut(value),
            _ => unreachable!(),
        }
    }

    /// Gets or creates a byte string. If another type is stored, it is
    /// overwritten with an empty byte string first.
    pub fn open_binary(&mut self) -> &mut Vec<u8> {
        if !matches!(self, Value::Binary(_)) {
            *self = Value::Binary(Rc::new(Vec::new()));
        }
        match self {
            Value::Binary(value) => Rc::make_mut(value),
            _ => unreachable!(),
        }
    }

    /// Gets or creates a timestamp. If another type is stored, it is
    /// overwritten with the Unix epoch first.
    pub fn open_time(&mut self) -> &mut i64 {
        if !matches!(self, Value::Time(_)) {
            *self = Value::Time(0);
        }
        match self {
            Value::Time(value) => value,
            _ => unreachable!(),
        }
    }

    /// Gets or creates an array. If another type is stored, it is
    /// overwritten with an empty array first.
    ///
    /// ```rust
    /// use taxon::Value;
    ///
    /// let mut value = Value::from("no longer a string");
    /// value.open_array().push(Value::from(1));
    /// assert_eq!(value.as_array().unwrap().len(), 1);
    /// ```
    pub fn open_array(&mut self) -> &mut Array {
        if !matches!(self, Value::Array(_)) {
            *self = Value::Array(Rc::new(Array::new()));
        }
        match self {
            Value::Array(value) => Rc::make_mut(value),
            _ => unreachable!(),
        }
    }

    /// Gets or creates an object. If another type is stored, it is
    /// overwritten with an empty object first.
    pub fn open_object(&mut self) -> &mut Object {
        if !matches!(self, Value::Object(_)) {
            *self = Value::Object(Rc::new(Object::new()));
        }
        match self {
            Value::Object(value) => Rc::make_mut(value),
            _ => unreachable!(),
        }
    }

    /// Parses a source for a value and stores it into `self`, recording
    /// errors into `ctx`.
    ///
    /// The source shall contain a single TAXON value in UTF-8, optionally
    /// surrounded by whitespace; reading stops at the end of the value and
    /// leaves the rest in the source. The context does not have to be
    /// initialized. If an error is recorded, `self` is reset to null.
    pub fn parse_with<S: Source>(&mut self, ctx: &mut ParserContext, source: &mut S, opts: Options) {
        parser::parse_into(self, ctx, source, opts);
    }

    /// Parses a source for a value and stores it into `self`, discarding
    /// error details.
    pub fn parse<S: Source>(&mut self, source: &mut S, opts: Options) -> bool {
        let mut ctx = ParserContext::default();
        self.parse_with(&mut ctx, source, opts);
        ctx.error.is_none()
    }

    /// Prints this value.
    ///
    /// The output is a single line of ASCII with no whitespace between
    /// tokens, and is always valid TAXON. In strict-JSON mode every value
    /// that would require annotation is output as an explicit `null`. Errors
    /// come only from the sink.
    pub fn print_to<K: Sink>(&self, sink: &mut K, opts: Options) -> io::Result<()> {
        printer::write_value(self, sink, opts)
    }

    /// Prints this value to a new string.
    #[must_use]
    pub fn to_text(&self, opts: Options) -> String {
        let mut buf = Vec::new();
        self.print_to(&mut buf, opts)
            .expect("writing to a Vec cannot fail");
        String::from_utf8(buf).expect("formatter output is ASCII")
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<i8> for Value {
    fn from(value: i8) -> Self {
        Self::Integer(value.into())
    }
}

impl From<i16> for Value {
    fn from(value: i16) -> Self {
        Self::Integer(value.into())
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Integer(value.into())
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<u8> for Value {
    fn from(value: u8) -> Self {
        Self::Integer(value.into())
    }
}

impl From<u16> for Value {
    fn from(value: u16) -> Self {
        Self::Integer(value.into())
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Self::Integer(value.into())
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Self::Number(value.into())
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(Rc::new(BString::from(value)))
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(Rc::new(BString::from(value)))
    }
}

impl From<BString> for Value {
    fn from(value: BString) -> Self {
        Self::String(Rc::new(value))
    }
}

impl From<&[u8]> for Value {
    fn from(value: &[u8]) -> Self {
        Self::Binary(Rc::new(value.to_vec()))
    }
}

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Self::Binary(Rc::new(value))
    }
}

impl From<Array> for Value {
    fn from(value: Array) -> Self {
        Self::Array(Rc::new(value))
    }
}

impl From<Object> for Value {
    fn from(value: Object) -> Self {
        Self::Object(Rc::new(value))
    }
}

impl fmt::Display for Value {
    /// Writes the TAXON text form with default options.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut buf = Vec::new();
        self.print_to(&mut buf, Options::default())
            .map_err(|_| fmt::Error)?;
        f.write_str(std::str::from_utf8(&buf).map_err(|_| fmt::Error)?)
    }
}

impl FromStr for Value {
    type Err = ParseError;

    /// Parses the TAXON text form with default options.
    fn from_str(text: &str) -> Result<Self, ParseError> {
        let mut value = Value::Null;
        let mut ctx = ParserContext::default();
        let mut source = SliceSource::from(text);
        value.parse_with(&mut ctx, &mut source, Options::default());
        match ctx.error {
            None => Ok(value),
            Some(message) => Err(ParseError {
                message,
                offset: ctx.offset,
            }),
        }
    }
}

impl Drop for Value {
    /// Destroys the value without recursing down the spine of a nested
    /// tree.
    ///
    /// Children of uniquely owned aggregates are moved onto a heap
    /// work-stack and destroyed in turn; shared aggregates are released by
    /// a reference-count decrement without traversal. Native stack usage is
    /// O(1) for any nesting depth.
    fn drop(&mut self) {
        if matches!(self, Value::Array(_) | Value::Object(_)) {
            let mut stack = Vec::new();
            detach_children(self, &mut stack);
            while let Some(mut child) = stack.pop() {
                detach_children(&mut child, &mut stack);
            }
        }
    }
}

fn detach_children(value: &mut Value, stack: &mut Vec<Value>) {
    match value {
        Value::Array(payload) => {
            if let Some(items) = Rc::get_mut(payload) {
                stack.append(items);
            }
        }
        Value::Object(payload) => {
            if let Some(map) = Rc::get_mut(payload) {
                stack.extend(map.drain().map(|(_, child)| child));
            }
        }
        _ => {}
    }
}
