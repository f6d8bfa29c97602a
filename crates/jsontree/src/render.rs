//! Whole-tree serialization: compact and indented text output.

use std::fmt::{self, Write};

use crate::error::Error;
use crate::number::{double_to_string, Number};
use crate::value::Value;

/// Render a value as JSON text; `indent_factor == 0` is compact,
/// anything larger indents nested containers by that many spaces per
/// level.
#[must_use]
pub fn render(value: &Value, indent_factor: usize) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = render_to(&mut out, value, indent_factor, 0);
    out
}

/// Render into an arbitrary sink, starting at `indent` spaces of current
/// indentation. Sink failures and per-member rendering failures surface
/// as errors, the latter wrapped with the offending key or index.
pub fn render_to<W: Write>(
    out: &mut W,
    value: &Value,
    indent_factor: usize,
    indent: usize,
) -> Result<(), Error> {
    match value {
        Value::Null => out.write_str("null").map_err(Into::into),
        Value::Bool(true) => out.write_str("true").map_err(Into::into),
        Value::Bool(false) => out.write_str("false").map_err(Into::into),
        Value::Number(number) => write_number(out, number),
        Value::String(text) => quote_into(out, text),
        Value::Array(array) => {
            out.write_char('[')?;
            if array.len() == 1 {
                let item = array.opt(0).ok_or(fmt::Error)?;
                render_to(out, item, indent_factor, indent)
                    .map_err(|e| e.wrapped("Unable to write the value at index 0"))?;
            } else if !array.is_empty() {
                let new_indent = indent + indent_factor;
                for (index, item) in array.iter().enumerate() {
                    if index > 0 {
                        out.write_char(',')?;
                    }
                    if indent_factor > 0 {
                        out.write_char('\n')?;
                    }
                    write_indent(out, new_indent)?;
                    render_to(out, item, indent_factor, new_indent).map_err(|e| {
                        e.wrapped(&format!("Unable to write the value at index {index}"))
                    })?;
                }
                if indent_factor > 0 {
                    out.write_char('\n')?;
                }
                write_indent(out, indent)?;
            }
            out.write_char(']').map_err(Into::into)
        }
        Value::Object(object) => {
            out.write_char('{')?;
            if object.len() == 1 {
                if let Some((key, item)) = object.iter().next() {
                    write_key(out, key, indent_factor)?;
                    render_to(out, item, indent_factor, indent).map_err(|e| {
                        e.wrapped(&format!("Unable to write the value for key {}", quote(key)))
                    })?;
                }
            } else if !object.is_empty() {
                let new_indent = indent + indent_factor;
                let mut first = true;
                for (key, item) in object.iter() {
                    if !first {
                        out.write_char(',')?;
                    }
                    if indent_factor > 0 {
                        out.write_char('\n')?;
                    }
                    write_indent(out, new_indent)?;
                    write_key(out, key, indent_factor)?;
                    render_to(out, item, indent_factor, new_indent).map_err(|e| {
                        e.wrapped(&format!("Unable to write the value for key {}", quote(key)))
                    })?;
                    first = false;
                }
                if indent_factor > 0 {
                    out.write_char('\n')?;
                }
                write_indent(out, indent)?;
            }
            out.write_char('}').map_err(Into::into)
        }
    }
}

fn write_key<W: Write>(out: &mut W, key: &str, indent_factor: usize) -> Result<(), Error> {
    quote_into(out, key)?;
    out.write_char(':')?;
    if indent_factor > 0 {
        out.write_char(' ')?;
    }
    Ok(())
}

fn write_number<W: Write>(out: &mut W, number: &Number) -> Result<(), Error> {
    match number {
        Number::Int(value) => out.write_str(itoa::Buffer::new().format(*value)),
        Number::Long(value) => out.write_str(itoa::Buffer::new().format(*value)),
        Number::BigInt(value) => write!(out, "{value}"),
        Number::Double(value) => out.write_str(&double_to_string(*value)),
        Number::BigDecimal(value) => write!(out, "{value}"),
    }
    .map_err(Into::into)
}

fn write_indent<W: Write>(out: &mut W, width: usize) -> Result<(), Error> {
    for _ in 0..width {
        out.write_char(' ')?;
    }
    Ok(())
}

/// Quote a string as a JSON string literal.
#[must_use]
pub fn quote(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    // Writing into a String cannot fail.
    let _ = quote_into(&mut out, text);
    out
}

/// Quote into a sink: escapes `\` and `"`, the short control escapes,
/// `/` directly after `<` (defusing `</script>`), other control
/// characters, and the U+0080-U+009F and U+2000-U+20FF ranges as
/// `\uXXXX`.
pub fn quote_into<W: Write>(out: &mut W, text: &str) -> Result<(), Error> {
    if text.is_empty() {
        return out.write_str("\"\"").map_err(Into::into);
    }
    out.write_char('"')?;
    let mut previous = '\0';
    for ch in text.chars() {
        match ch {
            '\\' | '"' => {
                out.write_char('\\')?;
                out.write_char(ch)?;
            }
            '/' => {
                if previous == '<' {
                    out.write_char('\\')?;
                }
                out.write_char('/')?;
            }
            '\u{8}' => out.write_str("\\b")?,
            '\t' => out.write_str("\\t")?,
            '\n' => out.write_str("\\n")?,
            '\u{c}' => out.write_str("\\f")?,
            '\r' => out.write_str("\\r")?,
            _ => {
                if ch < ' '
                    || ('\u{80}'..'\u{a0}').contains(&ch)
                    || ('\u{2000}'..'\u{2100}').contains(&ch)
                {
                    write!(out, "\\u{:04x}", u32::from(ch))?;
                } else {
                    out.write_char(ch)?;
                }
            }
        }
        previous = ch;
    }
    out.write_char('"').map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;
    use crate::parse;

    #[test]
    fn compact_rendering() {
        let tree = parse(r#"{"b": [1, 2, 3], "a": true}"#).unwrap();
        assert_eq!(render(&tree, 0), r#"{"a":true,"b":[1,2,3]}"#);
    }

    #[test]
    fn empty_containers() {
        assert_eq!(render(&parse("{}").unwrap(), 2), "{}");
        assert_eq!(render(&parse("[]").unwrap(), 2), "[]");
    }

    #[test]
    fn single_child_renders_inline() {
        let tree = parse(r#"{"a": [5]}"#).unwrap();
        assert_eq!(render(&tree, 2), "{\"a\": [5]}");
    }

    #[test]
    fn indented_rendering() {
        let tree = parse(r#"{"a": 1, "b": {"c": [1, 2]}}"#).unwrap();
        let expected = "\
{
  \"a\": 1,
  \"b\": {\"c\": [\n    1,\n    2\n  ]}
}";
        assert_eq!(render(&tree, 2), expected);
    }

    #[test_case("a\tb", "\"a\\tb\""; "tab")]
    #[test_case("a\nb", "\"a\\nb\""; "newline")]
    #[test_case("a\"b", "\"a\\\"b\""; "quote")]
    #[test_case("a\\b", "\"a\\\\b\""; "backslash")]
    #[test_case("</script>", "\"<\\/script>\""; "defanged slash")]
    #[test_case("a/b", "\"a/b\""; "plain slash kept")]
    #[test_case("", "\"\""; "empty")]
    #[test_case("\u{8}\u{c}\r", "\"\\b\\f\\r\""; "short escapes")]
    #[test_case("\u{1}", "\"\\u0001\""; "control")]
    #[test_case("\u{85}", "\"\\u0085\""; "latin1 control range")]
    #[test_case("\u{2028}", "\"\\u2028\""; "line separator")]
    #[test_case("\u{20ff}", "\"\\u20ff\""; "top of punctuation range")]
    #[test_case("\u{2100}", "\"\u{2100}\""; "past the escaped range")]
    #[test_case("héllo", "\"héllo\""; "plain unicode kept")]
    fn quoting(input: &str, expected: &str) {
        assert_eq!(quote(input), expected);
    }

    #[test]
    fn number_rendering_is_canonical() {
        let tree = parse("[2.50, 3.0, 1e2]").unwrap();
        assert_eq!(render(&tree, 0), "[2.5,3,100]");
    }

    struct FailingSink;

    impl Write for FailingSink {
        fn write_str(&mut self, _: &str) -> fmt::Result {
            Err(fmt::Error)
        }
    }

    #[test]
    fn sink_failures_surface_with_context() {
        let tree = parse(r#"{"a": 1}"#).unwrap();
        let error = render_to(&mut FailingSink, &tree, 0, 0).unwrap_err();
        assert_eq!(error.kind(), crate::ErrorKind::Write);
    }
}
