use std::fmt;

/// A location in the input text, tracked by the tokenizer.
///
/// `offset` counts consumed characters, `line` and `column` are 1-based
/// (`column` resets at every line boundary).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub offset: u64,
    pub line: u64,
    pub column: u64,
}

/// Classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed input text: unterminated string, bad escape, unexpected
    /// character, duplicate key, missing value.
    Syntax,
    /// An accessor requested a type the stored value cannot supply, even
    /// after fallback conversion.
    Type,
    /// A key or index outside the container's key/index set.
    Range,
    /// Streaming-writer misuse: wrong state, nesting mismatch, depth
    /// exceeded, duplicate key.
    Structural,
    /// Attempt to store a non-finite number.
    Validity,
    /// The underlying sink reported a failure while rendering.
    Write,
}

#[derive(Debug)]
struct ErrorRepr {
    kind: ErrorKind,
    message: String,
    position: Option<Position>,
}

/// The error type shared by parsing, rendering, the streaming writer and
/// the accessor layer.
///
/// Syntax errors carry the tokenizer position at which they were raised.
#[derive(Debug)]
pub struct Error {
    repr: Box<ErrorRepr>,
}

impl Error {
    pub(crate) fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            repr: Box::new(ErrorRepr {
                kind,
                message: message.into(),
                position: None,
            }),
        }
    }

    pub(crate) fn syntax(message: impl Into<String>, position: Position) -> Self {
        Self {
            repr: Box::new(ErrorRepr {
                kind: ErrorKind::Syntax,
                message: message.into(),
                position: Some(position),
            }),
        }
    }

    pub(crate) fn type_error(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Type, message)
    }

    pub(crate) fn range(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Range, message)
    }

    pub(crate) fn structural(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Structural, message)
    }

    pub(crate) fn validity(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validity, message)
    }

    /// Prefix the message with rendering context (array index, object key).
    pub(crate) fn wrapped(self, context: &str) -> Self {
        Self {
            repr: Box::new(ErrorRepr {
                kind: self.repr.kind,
                message: format!("{context}: {}", self.repr.message),
                position: self.repr.position,
            }),
        }
    }

    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        self.repr.kind
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.repr.message
    }

    /// The input position for syntax errors, `None` otherwise.
    #[must_use]
    pub fn position(&self) -> Option<Position> {
        self.repr.position
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.repr.message)?;
        if let Some(position) = self.repr.position {
            write!(
                f,
                " at {} [character {} line {}]",
                position.offset, position.column, position.line
            )?;
        }
        Ok(())
    }
}

impl std::error::Error for Error {}

impl From<fmt::Error> for Error {
    fn from(_: fmt::Error) -> Self {
        Self::new(ErrorKind::Write, "Unable to write to the underlying sink.")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn syntax_error_display_includes_position() {
        let error = Error::syntax(
            "Expected a ',' or '}'.",
            Position {
                offset: 14,
                line: 2,
                column: 5,
            },
        );
        assert_eq!(error.kind(), ErrorKind::Syntax);
        assert_eq!(
            error.to_string(),
            "Expected a ',' or '}'. at 14 [character 5 line 2]"
        );
    }

    #[test]
    fn plain_error_display_is_message_only() {
        let error = Error::type_error("Object[\"a\"] is not a boolean.");
        assert_eq!(error.to_string(), "Object[\"a\"] is not a boolean.");
        assert_eq!(error.position(), None);
    }
}
