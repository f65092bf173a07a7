//! TAXON: a typed superset of JSON.
//!
//! TAXON is a textual data-interchange format that preserves the types
//! JSON loses: 64-bit integers, non-finite floating point, byte strings,
//! timestamps, and strings whose contents would collide with the
//! annotation syntax. Compatibility runs both ways; every document this
//! crate produces in TAXON mode is still syntactically valid JSON, and a
//! strict-JSON mode produces standards-conformant JSON by writing
//! unrepresentable values as `null`.
//!
//! Values that need a richer type ride inside ordinary JSON strings,
//! marked by a `$<letter>:` annotator prefix:
//!
//! | Annotator | Type    | Body                                    |
//! |-----------|---------|-----------------------------------------|
//! | `$l:`     | integer | signed decimal, full 64-bit range       |
//! | `$d:`     | number  | decimal float, `nan`, `inf`, `-inf`     |
//! | `$s:`     | string  | verbatim text that itself starts with `$` |
//! | `$t:`     | time    | signed milliseconds since the Unix epoch |
//! | `$h:`     | binary  | hex                                     |
//! | `$b:`     | binary  | base64                                  |
//!
//! Parsing and formatting both run in bounded native stack space
//! regardless of document nesting depth, as does destruction of the value
//! tree.
//!
//! # Examples
//!
//! ```rust
//! use taxon::{Options, SliceSource, Value};
//!
//! let mut value = Value::Null;
//! let mut source = SliceSource::from(r#"["$l:42","$t:987654321",3.5,"plain"]"#);
//! assert!(value.parse(&mut source, Options::default()));
//!
//! let items = value.as_array().unwrap();
//! assert_eq!(items[0].as_integer(), Ok(42));
//! assert_eq!(items[1].as_time(), Ok(987_654_321));
//! assert_eq!(items[2].as_number(), Ok(3.5));
//!
//! // Arrays of scalars print back byte for byte.
//! assert_eq!(
//!     value.to_text(Options::default()),
//!     r#"["$l:42","$t:987654321",3.5,"plain"]"#
//! );
//! ```
//!
//! Strict-JSON mode trades fidelity for compatibility:
//!
//! ```rust
//! use taxon::{Options, Value};
//!
//! let value = Value::from(vec![Value::from(f64::NAN), Value::time(0)]);
//! let json = Options {
//!     json_mode: true,
//!     ..Default::default()
//! };
//! assert_eq!(value.to_text(json), "[null,null]");
//! ```

mod error;
mod options;
mod parser;
mod printer;
mod sink;
mod source;
mod value;

#[cfg(test)]
mod tests;

pub use error::{ParseError, TypeError};
pub use options::Options;
pub use parser::ParserContext;
pub use sink::{Sink, WriteSink};
pub use source::{ReadSource, SliceSource, Source};
pub use value::{Array, Object, Type, Value};
