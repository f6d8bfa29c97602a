//! A self-contained, deliberately lenient JSON library.
//!
//! The pieces, leaves first: a [`Value`] tree (null, booleans, a
//! five-variant [`Number`], strings, [`Array`], [`Object`]), a
//! character-level tokenizer feeding a recursive-descent [`parse`], a
//! configurable [`render`] serializer, a forward-only [`JsonWriter`], and
//! an RFC-6901-style [`Pointer`] resolver.
//!
//! The parser accepts more than the JSON grammar: unquoted keys and bare
//! tokens, single-quoted strings, `;` as an entry separator, trailing
//! commas, and implicit `null` elements in arrays. Duplicate object keys
//! are rejected. Numbers narrow to the smallest exact representation and
//! widen into big integers and exact decimals instead of silently losing
//! digits.
//!
//! ```
//! use jsontree::{parse, render, Pointer};
//!
//! let tree = parse("{size: 3, tags: ['a', 'b',]}")?;
//! assert_eq!(render(&tree, 0), r#"{"size":3,"tags":["a","b"]}"#);
//!
//! let pointer = Pointer::new("/tags/1")?;
//! assert_eq!(pointer.resolve(&tree)?.as_str(), Some("b"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! Typed accessors degrade gracefully: `get_*` fail with a typed error,
//! their `opt_*` counterparts convert any failure into `None`.
//!
//! ```
//! use jsontree::parse;
//!
//! let tree = parse(r#"{"port": "8080", "debug": "TRUE"}"#)?;
//! let config = tree.as_object().unwrap();
//! assert_eq!(config.get_i32("port")?, 8080);
//! assert_eq!(config.opt_bool("debug"), Some(true));
//! assert_eq!(config.opt_bool("verbose"), None);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod array;
mod error;
mod number;
mod object;
mod parser;
mod pointer;
mod render;
mod tokenizer;
mod value;
mod writer;

pub use num_bigint::BigInt;

pub use crate::array::Array;
pub use crate::error::{Error, ErrorKind, Position};
pub use crate::number::{BigDecimal, Number};
pub use crate::object::{Lookup, Object};
pub use crate::parser::{parse, parse_bytes};
pub use crate::pointer::{Pointer, PointerBuilder, PointerError};
pub use crate::render::{quote, quote_into, render, render_to};
pub use crate::value::{ToValue, Value};
pub use crate::writer::JsonWriter;
