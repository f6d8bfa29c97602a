//! Recursive-descent parser over the tokenizer.
//!
//! Deliberately lenient: bare (unquoted) keys and tokens, single-quoted
//! strings, `;` as an entry separator, trailing commas, and implicit
//! `null` elements between adjacent array commas. Duplicate object keys
//! are a syntax error.

use crate::array::Array;
use crate::error::{Error, Position};
use crate::number::Number;
use crate::object::Object;
use crate::render::{quote, render};
use crate::tokenizer::Tokenizer;
use crate::value::Value;

/// Characters that terminate a bare token.
const DELIMITERS: &str = ",:]}/\\\"[{;=#";

/// Parse a JSON text into a value tree.
///
/// The root must be an object or an array; the parser consumes exactly one
/// root value and ignores anything after its closing bracket.
pub fn parse(text: &str) -> Result<Value, Error> {
    let mut tokenizer = Tokenizer::new(text);
    match tokenizer.next_clean() {
        Some('{') => {
            tokenizer.back()?;
            parse_object(&mut tokenizer).map(Value::Object)
        }
        Some('[') => {
            tokenizer.back()?;
            parse_array(&mut tokenizer).map(Value::Array)
        }
        _ => Err(tokenizer.syntax_error("A JSON text must begin with '{' or '['.")),
    }
}

/// Parse a byte stream as UTF-8 JSON text; invalid UTF-8 is a syntax
/// error at the offending offset.
pub fn parse_bytes(bytes: &[u8]) -> Result<Value, Error> {
    let text = std::str::from_utf8(bytes).map_err(|error| {
        Error::syntax(
            "Input is not valid UTF-8.",
            Position {
                offset: error.valid_up_to() as u64,
                line: 1,
                column: 1,
            },
        )
    })?;
    parse(text)
}

fn parse_object(tokenizer: &mut Tokenizer<'_>) -> Result<Object, Error> {
    if tokenizer.next_clean() != Some('{') {
        return Err(tokenizer.syntax_error("An object text must begin with '{'."));
    }
    let mut object = Object::new();
    loop {
        let key = match tokenizer.next_clean() {
            None => return Err(tokenizer.syntax_error("An object text must end with '}'.")),
            Some('}') => return Ok(object),
            Some(_) => {
                tokenizer.back()?;
                key_text(next_value(tokenizer)?)
            }
        };
        if tokenizer.next_clean() != Some(':') {
            return Err(tokenizer.syntax_error("Expected a ':' after a key."));
        }
        if object.contains_key(&key) {
            return Err(tokenizer.syntax_error(format!("Duplicate key {}.", quote(&key))));
        }
        let value = next_value(tokenizer)?;
        object.insert(key, value);
        match tokenizer.next_clean() {
            Some(';' | ',') => match tokenizer.next_clean() {
                None => {
                    return Err(tokenizer.syntax_error("An object text must end with '}'."));
                }
                Some('}') => return Ok(object),
                Some(_) => tokenizer.back()?,
            },
            Some('}') => return Ok(object),
            _ => return Err(tokenizer.syntax_error("Expected a ',' or '}'.")),
        }
    }
}

fn parse_array(tokenizer: &mut Tokenizer<'_>) -> Result<Array, Error> {
    if tokenizer.next_clean() != Some('[') {
        return Err(tokenizer.syntax_error("An array text must begin with '['."));
    }
    let mut array = Array::new();
    match tokenizer.next_clean() {
        Some(']') => return Ok(array),
        _ => tokenizer.back()?,
    }
    loop {
        if tokenizer.next_clean() == Some(',') {
            // Nothing between two commas reads as an implicit null.
            tokenizer.back()?;
            array.push(Value::Null);
        } else {
            tokenizer.back()?;
            array.push(next_value(tokenizer)?);
        }
        match tokenizer.next_clean() {
            Some(',') => match tokenizer.next_clean() {
                Some(']') => return Ok(array),
                _ => tokenizer.back()?,
            },
            Some(']') => return Ok(array),
            _ => return Err(tokenizer.syntax_error("Expected a ',' or ']'.")),
        }
    }
}

/// One value of any kind: a quoted string, a nested container, or a bare
/// token resolved into a scalar.
fn next_value(tokenizer: &mut Tokenizer<'_>) -> Result<Value, Error> {
    let first = tokenizer.next_clean();
    match first {
        Some(quote @ ('"' | '\'')) => {
            return tokenizer.next_string(quote).map(Value::String);
        }
        Some('{') => {
            tokenizer.back()?;
            return parse_object(tokenizer).map(Value::Object);
        }
        Some('[') => {
            tokenizer.back()?;
            return parse_array(tokenizer).map(Value::Array);
        }
        _ => {}
    }
    let mut buffer = String::new();
    let mut current = first;
    while let Some(ch) = current {
        if ch < ' ' || DELIMITERS.contains(ch) {
            break;
        }
        buffer.push(ch);
        current = tokenizer.next();
    }
    tokenizer.back()?;
    let token = buffer.trim();
    if token.is_empty() {
        return Err(tokenizer.syntax_error("Missing value."));
    }
    Ok(scalar_from_token(token))
}

/// An object key is whatever value appears before the ':', rendered to
/// text when it is not already a string.
fn key_text(value: Value) -> String {
    match value {
        Value::String(text) => text,
        other => render(&other, 0),
    }
}

/// Resolve a trimmed bare token: boolean and null literals
/// (case-insensitive), then numbers, then a plain string.
fn scalar_from_token(token: &str) -> Value {
    if token.is_empty() {
        return Value::String(String::new());
    }
    if token.eq_ignore_ascii_case("true") {
        return Value::Bool(true);
    }
    if token.eq_ignore_ascii_case("false") {
        return Value::Bool(false);
    }
    if token.eq_ignore_ascii_case("null") {
        return Value::Null;
    }
    Number::from_token(token).map_or_else(|| Value::String(token.to_owned()), Value::Number)
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;
    use crate::ErrorKind;

    fn object(text: &str) -> Object {
        match parse(text).unwrap() {
            Value::Object(object) => object,
            other => panic!("expected an object, got {other:?}"),
        }
    }

    fn array(text: &str) -> Array {
        match parse(text).unwrap() {
            Value::Array(array) => array,
            other => panic!("expected an array, got {other:?}"),
        }
    }

    #[test]
    fn strict_document_parses() {
        let tree = object(r#"{"a": 1, "b": [true, null, "x"]}"#);
        assert_eq!(tree.get_i32("a").unwrap(), 1);
        let nested = tree.get_array("b").unwrap();
        assert!(nested.get_bool(0).unwrap());
        assert!(nested.get(1).unwrap().is_null());
        assert_eq!(nested.get_string(2).unwrap(), "x");
    }

    #[test]
    fn bare_keys_and_trailing_comma() {
        let tree = object("{a:1,}");
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.get_i32("a").unwrap(), 1);
    }

    #[test]
    fn implicit_nulls_between_commas() {
        let tree = array("[1,,3]");
        assert_eq!(tree.len(), 3);
        assert_eq!(tree.get_i32(0).unwrap(), 1);
        assert!(tree.get(1).unwrap().is_null());
        assert_eq!(tree.get_i32(2).unwrap(), 3);
    }

    #[test]
    fn leading_comma_is_an_implicit_null() {
        let tree = array("[,1]");
        assert!(tree.get(0).unwrap().is_null());
        assert_eq!(tree.get_i32(1).unwrap(), 1);
    }

    #[test]
    fn trailing_comma_in_array() {
        assert_eq!(array("[1,2,]").len(), 2);
    }

    #[test]
    fn single_quotes_and_semicolons() {
        let tree = object("{'a': 'x'; b: 2}");
        assert_eq!(tree.get_string("a").unwrap(), "x");
        assert_eq!(tree.get_i32("b").unwrap(), 2);
    }

    #[test]
    fn bare_tokens_resolve_to_scalars() {
        let tree = array("[True, FALSE, NULL, hello, -4, 2.5]");
        assert!(tree.get_bool(0).unwrap());
        assert!(!tree.get_bool(1).unwrap());
        assert!(tree.get(2).unwrap().is_null());
        assert_eq!(tree.get_string(3).unwrap(), "hello");
        assert_eq!(tree.get_i32(4).unwrap(), -4);
        assert_eq!(tree.get_f64(5).unwrap(), 2.5);
    }

    #[test]
    fn bare_tokens_are_trimmed() {
        let tree = object("{a: hello world }");
        assert_eq!(tree.get_string("a").unwrap(), "hello world");
    }

    #[test]
    fn numeric_looking_strings_stay_strings() {
        let tree = array("[007, 1e999]");
        assert_eq!(tree.get_string(0).unwrap(), "007");
        assert_eq!(tree.get_string(1).unwrap(), "1e999");
    }

    #[test]
    fn non_string_keys_are_rendered_to_text() {
        let tree = object("{1: one, true: yes}");
        assert_eq!(tree.get_string("1").unwrap(), "one");
        assert_eq!(tree.get_string("true").unwrap(), "yes");
    }

    #[test]
    fn duplicate_keys_are_rejected() {
        let error = parse(r#"{"a":1,"a":2}"#).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Syntax);
        assert_eq!(error.message(), "Duplicate key \"a\".");
    }

    #[test_case("", "A JSON text must begin with '{' or '['."; "empty input")]
    #[test_case("12", "A JSON text must begin with '{' or '['."; "scalar root")]
    #[test_case("{", "An object text must end with '}'."; "lone brace")]
    #[test_case("{\"a\"", "Expected a ':' after a key."; "missing colon")]
    #[test_case("{\"a\":1", "Expected a ',' or '}'."; "unclosed object")]
    #[test_case("{\"a\":}", "Missing value."; "missing value")]
    #[test_case("[\"a\" \"b\"]", "Expected a ',' or ']'."; "missing array comma")]
    #[test_case("[\"a]", "Unterminated string."; "unterminated string")]
    fn syntax_errors(text: &str, message: &str) {
        let error = parse(text).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Syntax);
        assert_eq!(error.message(), message);
    }

    #[test]
    fn syntax_errors_carry_positions() {
        let error = parse("{\n  \"a\": ,\n}").unwrap_err();
        let position = error.position().unwrap();
        assert_eq!(position.line, 2);
    }

    #[test]
    fn deeply_nested_containers() {
        let mut text = String::new();
        for _ in 0..64 {
            text.push('[');
        }
        text.push('1');
        for _ in 0..64 {
            text.push(']');
        }
        let mut value = &parse(&text).unwrap();
        let mut depth = 0;
        while let Value::Array(inner) = value {
            value = inner.get(0).unwrap();
            depth += 1;
        }
        assert_eq!(depth, 64);
    }

    #[test]
    fn byte_input_must_be_utf8() {
        assert_eq!(
            parse_bytes(br#"{"a": 1}"#).unwrap(),
            parse(r#"{"a": 1}"#).unwrap()
        );
        let error = parse_bytes(&[b'{', 0xFF, 0xFE, b'}']).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Syntax);
        assert_eq!(error.position().unwrap().offset, 1);
    }

    #[test]
    fn comments_are_not_supported() {
        // '/' is a bare-token delimiter, so a comment is a syntax error.
        assert!(parse("{a: 1 // note\n}").is_err());
    }
}
