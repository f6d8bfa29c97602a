//! Forward-only streaming writer with an explicit state machine.
//!
//! Produces JSON text without materializing a tree. The writer is not
//! transactional: after any error its internal state is unspecified and it
//! must not be reused.

use std::fmt::Write;

use ahash::AHashSet;

use crate::error::Error;
use crate::number::Number;
use crate::render::{quote, quote_into, render};
use crate::value::Value;

const MAX_DEPTH: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// Nothing written yet.
    Initial,
    /// Inside an object, a key is expected.
    ExpectKey,
    /// A value is expected (after a key, or right before the root).
    ExpectValue,
    /// Inside an array.
    InArray,
    /// The outermost container was closed.
    Done,
}

#[derive(Debug)]
enum Frame {
    /// Keys already written in this object.
    Object(AHashSet<String>),
    Array,
}

/// A streaming JSON writer over any [`std::fmt::Write`] sink.
///
/// ```
/// use jsontree::JsonWriter;
///
/// let mut writer = JsonWriter::new();
/// writer.object()?.key("x")?.value(1)?.end_object()?;
/// assert_eq!(writer.finish()?, r#"{"x":1}"#);
/// # Ok::<(), jsontree::Error>(())
/// ```
#[derive(Debug)]
pub struct JsonWriter<W = String> {
    out: W,
    mode: Mode,
    stack: Vec<Frame>,
    comma: bool,
}

impl JsonWriter<String> {
    /// A writer accumulating into a string; retrieve it with
    /// [`JsonWriter::finish`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_sink(String::new())
    }
}

impl Default for JsonWriter<String> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> JsonWriter<W> {
    pub fn with_sink(out: W) -> Self {
        Self {
            out,
            mode: Mode::Initial,
            stack: Vec::new(),
            comma: false,
        }
    }

    /// Open an object. Valid at the start or in any value position.
    pub fn object(&mut self) -> Result<&mut Self, Error> {
        if self.mode == Mode::Initial {
            self.mode = Mode::ExpectValue;
        }
        if matches!(self.mode, Mode::ExpectValue | Mode::InArray) {
            self.append("{")?;
            self.push(Frame::Object(AHashSet::new()))?;
            self.comma = false;
            Ok(self)
        } else {
            Err(Error::structural("Misplaced object."))
        }
    }

    /// Open an array. Valid at the start or in any value position.
    pub fn array(&mut self) -> Result<&mut Self, Error> {
        if matches!(self.mode, Mode::Initial | Mode::ExpectValue | Mode::InArray) {
            self.push(Frame::Array)?;
            self.append("[")?;
            self.comma = false;
            Ok(self)
        } else {
            Err(Error::structural("Misplaced array."))
        }
    }

    /// Write a member key. Valid only inside an object when a key is
    /// expected; a key already used in the innermost object is an error.
    pub fn key(&mut self, name: &str) -> Result<&mut Self, Error> {
        if self.mode != Mode::ExpectKey {
            return Err(Error::structural("Misplaced key."));
        }
        match self.stack.last_mut() {
            Some(Frame::Object(seen)) => {
                if !seen.insert(name.to_owned()) {
                    return Err(Error::structural(format!("Duplicate key {}.", quote(name))));
                }
            }
            _ => return Err(Error::structural("Nesting error.")),
        }
        if self.comma {
            self.out.write_char(',')?;
        }
        quote_into(&mut self.out, name)?;
        self.out.write_char(':')?;
        self.comma = false;
        self.mode = Mode::ExpectValue;
        Ok(self)
    }

    /// Write a value: after a key, inside an array, or as the whole text.
    pub fn value(&mut self, value: impl Into<Value>) -> Result<&mut Self, Error> {
        self.append(&render(&value.into(), 0))
    }

    /// Write a double, failing validation for non-finite input.
    pub fn double(&mut self, value: f64) -> Result<&mut Self, Error> {
        let number = Number::from_f64(value)?;
        self.append(&number.to_string())
    }

    /// Close the innermost object.
    pub fn end_object(&mut self) -> Result<&mut Self, Error> {
        if self.mode != Mode::ExpectKey {
            return Err(Error::structural("Misplaced end object."));
        }
        self.end(matches!(self.stack.last(), Some(Frame::Object(_))), '}')
    }

    /// Close the innermost array.
    pub fn end_array(&mut self) -> Result<&mut Self, Error> {
        if self.mode != Mode::InArray {
            return Err(Error::structural("Misplaced end array."));
        }
        self.end(matches!(self.stack.last(), Some(Frame::Array)), ']')
    }

    /// The sink, once the outermost container has been closed.
    pub fn finish(self) -> Result<W, Error> {
        if self.mode == Mode::Done {
            Ok(self.out)
        } else {
            Err(Error::structural("The outermost container is still open."))
        }
    }

    fn append(&mut self, text: &str) -> Result<&mut Self, Error> {
        if matches!(self.mode, Mode::ExpectValue | Mode::InArray) {
            if self.comma && self.mode == Mode::InArray {
                self.out.write_char(',')?;
            }
            self.out.write_str(text)?;
            if self.mode == Mode::ExpectValue {
                self.mode = Mode::ExpectKey;
            }
            self.comma = true;
            Ok(self)
        } else {
            Err(Error::structural("Value out of sequence."))
        }
    }

    fn push(&mut self, frame: Frame) -> Result<(), Error> {
        if self.stack.len() >= MAX_DEPTH {
            return Err(Error::structural("Nesting too deep."));
        }
        self.mode = match frame {
            Frame::Object(_) => Mode::ExpectKey,
            Frame::Array => Mode::InArray,
        };
        self.stack.push(frame);
        Ok(())
    }

    fn end(&mut self, matches_innermost: bool, closing: char) -> Result<&mut Self, Error> {
        if !matches_innermost {
            return Err(Error::structural("Nesting error."));
        }
        self.stack.pop();
        self.mode = match self.stack.last() {
            None => Mode::Done,
            Some(Frame::Object(_)) => Mode::ExpectKey,
            Some(Frame::Array) => Mode::InArray,
        };
        self.out.write_char(closing)?;
        self.comma = true;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[test]
    fn object_sequencing() {
        let mut writer = JsonWriter::new();
        writer
            .object()
            .unwrap()
            .key("x")
            .unwrap()
            .value(1)
            .unwrap()
            .end_object()
            .unwrap();
        assert_eq!(writer.finish().unwrap(), r#"{"x":1}"#);
    }

    #[test]
    fn nested_containers_and_commas() {
        let mut writer = JsonWriter::new();
        writer.object().unwrap();
        writer.key("a").unwrap().value("text").unwrap();
        writer.key("b").unwrap().array().unwrap();
        writer.value(1).unwrap().value(2).unwrap();
        writer.array().unwrap().value(3).unwrap().end_array().unwrap();
        writer.end_array().unwrap();
        writer.key("c").unwrap().value(Value::Null).unwrap();
        writer.end_object().unwrap();
        assert_eq!(
            writer.finish().unwrap(),
            r#"{"a":"text","b":[1,2,[3]],"c":null}"#
        );
    }

    #[test]
    fn array_root() {
        let mut writer = JsonWriter::new();
        writer.array().unwrap();
        writer.value(true).unwrap().value("x").unwrap();
        writer.end_array().unwrap();
        assert_eq!(writer.finish().unwrap(), r#"[true,"x"]"#);
    }

    #[test]
    fn value_without_key_is_misplaced() {
        let mut writer = JsonWriter::new();
        writer.object().unwrap();
        let error = writer.value(1).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Structural);
        assert_eq!(error.message(), "Value out of sequence.");
    }

    #[test]
    fn key_outside_object_is_misplaced() {
        let mut writer = JsonWriter::new();
        writer.array().unwrap();
        assert_eq!(
            writer.key("a").unwrap_err().message(),
            "Misplaced key."
        );
    }

    #[test]
    fn closing_the_wrong_container_is_an_error() {
        let mut writer = JsonWriter::new();
        writer.object().unwrap();
        let error = writer.end_array().unwrap_err();
        assert_eq!(error.message(), "Misplaced end array.");
    }

    #[test]
    fn duplicate_keys_are_rejected() {
        let mut writer = JsonWriter::new();
        writer.object().unwrap();
        writer.key("a").unwrap().value(1).unwrap();
        let error = writer.key("a").unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Structural);
        assert_eq!(error.message(), "Duplicate key \"a\".");
    }

    #[test]
    fn same_key_in_sibling_objects_is_fine() {
        let mut writer = JsonWriter::new();
        writer.array().unwrap();
        writer.object().unwrap().key("a").unwrap().value(1).unwrap();
        writer.end_object().unwrap();
        writer.object().unwrap().key("a").unwrap().value(2).unwrap();
        writer.end_object().unwrap();
        writer.end_array().unwrap();
        assert_eq!(writer.finish().unwrap(), r#"[{"a":1},{"a":2}]"#);
    }

    #[test]
    fn depth_is_bounded() {
        let mut writer = JsonWriter::new();
        for _ in 0..200 {
            writer.array().unwrap();
        }
        let error = writer.array().unwrap_err();
        assert_eq!(error.message(), "Nesting too deep.");
    }

    #[test]
    fn double_is_validity_checked() {
        let mut writer = JsonWriter::new();
        writer.array().unwrap();
        writer.double(2.5).unwrap();
        let error = writer.double(f64::INFINITY).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Validity);
    }

    #[test]
    fn finish_requires_a_closed_root() {
        let mut writer = JsonWriter::new();
        writer.object().unwrap();
        assert!(writer.finish().is_err());
    }

    #[test]
    fn top_level_scalar_is_out_of_sequence() {
        let mut writer = JsonWriter::new();
        let error = writer.value(1).unwrap_err();
        assert_eq!(error.message(), "Value out of sequence.");
    }
}
