//! JSON Pointer parsing, formatting and resolution.
//!
//! A pointer is an ordered list of reference tokens addressing a value
//! inside a tree, in the RFC 6901 style: `""` or `"#"` is the whole tree,
//! `"/a/b/1"` descends through objects by key and arrays by index, and the
//! `"#/…"` URI-fragment form is percent-decoded before splitting.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::value::Value;

/// Characters percent-encoded in the URI-fragment form; the unreserved
/// set stays literal.
const FRAGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Failures of pointer parsing or resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PointerError {
    /// The expression does not start with `/`, `#/`, `#` or the empty
    /// string, or its percent-encoding is broken.
    Format(String),
    /// An object along the path has no such key.
    NoSuchKey(String),
    /// An array was reached with a token that is not a non-negative
    /// integer.
    NotAnIndex(String),
    /// An array index beyond the array's length.
    OutOfBounds { index: usize, len: usize },
    /// A scalar was reached with tokens remaining.
    Unresolvable(String),
}

impl fmt::Display for PointerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Format(message) => f.write_str(message),
            Self::NoSuchKey(key) => write!(f, "No value for key \"{key}\"."),
            Self::NotAnIndex(token) => write!(f, "\"{token}\" is not an array index."),
            Self::OutOfBounds { index, len } => write!(
                f,
                "Index {index} is out of bounds - the array has {len} elements."
            ),
            Self::Unresolvable(token) => write!(
                f,
                "The key \"{token}\" cannot be resolved against a scalar value."
            ),
        }
    }
}

impl std::error::Error for PointerError {}

/// A parsed JSON Pointer: a list of already-unescaped reference tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pointer {
    tokens: Vec<String>,
}

impl Pointer {
    /// Parse a pointer expression.
    pub fn new(expr: &str) -> Result<Self, PointerError> {
        if expr.is_empty() || expr == "#" {
            return Ok(Self { tokens: Vec::new() });
        }
        let refs: Cow<'_, str> = if let Some(rest) = expr.strip_prefix("#/") {
            percent_decode_str(rest).decode_utf8().map_err(|_| {
                PointerError::Format(format!("Invalid percent-encoding in \"{expr}\"."))
            })?
        } else if let Some(rest) = expr.strip_prefix('/') {
            Cow::Borrowed(rest)
        } else {
            return Err(PointerError::Format(
                "A JSON pointer should start with '/' or '#/'.".to_owned(),
            ));
        };
        Ok(Self {
            tokens: refs.split('/').map(unescape).collect(),
        })
    }

    #[must_use]
    pub fn builder() -> PointerBuilder {
        PointerBuilder { tokens: Vec::new() }
    }

    /// The unescaped reference tokens, in order.
    #[must_use]
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Walk the token list from `root`; an empty pointer yields the root
    /// itself.
    pub fn resolve<'a>(&self, root: &'a Value) -> Result<&'a Value, PointerError> {
        let mut current = root;
        for token in &self.tokens {
            current = match current {
                Value::Object(object) => object
                    .opt(token)
                    .ok_or_else(|| PointerError::NoSuchKey(token.clone()))?,
                Value::Array(array) => {
                    let index: usize = token
                        .parse()
                        .map_err(|_| PointerError::NotAnIndex(token.clone()))?;
                    array.opt(index).ok_or(PointerError::OutOfBounds {
                        index,
                        len: array.len(),
                    })?
                }
                _ => return Err(PointerError::Unresolvable(token.clone())),
            };
        }
        Ok(current)
    }

    /// Like [`Pointer::resolve`], swallowing resolution failures.
    #[must_use]
    pub fn resolve_opt<'a>(&self, root: &'a Value) -> Option<&'a Value> {
        self.resolve(root).ok()
    }

    /// The URI-fragment form: `#` plus percent-encoded tokens.
    #[must_use]
    pub fn to_uri_fragment(&self) -> String {
        let mut out = String::from("#");
        for token in &self.tokens {
            out.push('/');
            out.push_str(&utf8_percent_encode(token, FRAGMENT).collect::<String>());
        }
        out
    }
}

impl fmt::Display for Pointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for token in &self.tokens {
            write!(f, "/{}", escape(token))?;
        }
        Ok(())
    }
}

impl FromStr for Pointer {
    type Err = PointerError;

    fn from_str(s: &str) -> Result<Self, PointerError> {
        Self::new(s)
    }
}

/// Builds a pointer from already-unescaped tokens.
#[derive(Debug, Default)]
pub struct PointerBuilder {
    tokens: Vec<String>,
}

impl PointerBuilder {
    #[must_use]
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.tokens.push(token.into());
        self
    }

    #[must_use]
    pub fn index(mut self, index: usize) -> Self {
        self.tokens.push(itoa::Buffer::new().format(index).to_owned());
        self
    }

    #[must_use]
    pub fn build(self) -> Pointer {
        Pointer {
            tokens: self.tokens,
        }
    }
}

fn unescape(token: &str) -> String {
    token
        .replace("~1", "/")
        .replace("~0", "~")
        .replace("\\\"", "\"")
        .replace("\\\\", "\\")
}

fn escape(token: &str) -> String {
    token
        .replace('~', "~0")
        .replace('/', "~1")
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
}
