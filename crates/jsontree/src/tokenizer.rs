//! Character-level tokenizer with one-step pushback and position tracking.
//!
//! Wraps the input text and hands the parser one character at a time.
//! `back` un-consumes exactly one character; attempting it twice without an
//! intervening `next` is an error. Offset, 1-based line and 1-based column
//! are maintained across `\r`, `\n` and `\r\n` line boundaries so that
//! syntax errors can point at the offending character.

use std::str::Chars;

use crate::error::{Error, Position};

pub(crate) struct Tokenizer<'a> {
    chars: Chars<'a>,
    previous: char,
    use_previous: bool,
    eof: bool,
    index: u64,
    line: u64,
    column: u64,
    column_previous_line: u64,
}

impl<'a> Tokenizer<'a> {
    pub(crate) fn new(text: &'a str) -> Self {
        Self {
            chars: text.chars(),
            previous: '\0',
            use_previous: false,
            eof: false,
            index: 0,
            line: 1,
            column: 1,
            column_previous_line: 0,
        }
    }

    /// Next character, or `None` at end of input.
    pub(crate) fn next(&mut self) -> Option<char> {
        let ch = if self.use_previous {
            self.use_previous = false;
            Some(self.previous)
        } else {
            self.chars.next()
        };
        match ch {
            None => {
                self.eof = true;
                None
            }
            Some(ch) => {
                self.increment(ch);
                self.previous = ch;
                Some(ch)
            }
        }
    }

    fn increment(&mut self, ch: char) {
        self.index += 1;
        match ch {
            '\r' => {
                self.line += 1;
                self.column_previous_line = self.column;
                self.column = 0;
            }
            '\n' => {
                // A `\n` right after `\r` belongs to the same line boundary.
                if self.previous != '\r' {
                    self.line += 1;
                    self.column_previous_line = self.column;
                }
                self.column = 0;
            }
            _ => self.column += 1,
        }
    }

    fn decrement(&mut self) {
        self.index -= 1;
        if self.previous == '\r' || self.previous == '\n' {
            self.line -= 1;
            self.column = self.column_previous_line;
        } else if self.column > 0 {
            self.column -= 1;
        }
    }

    /// Un-consume the most recently returned character.
    ///
    /// A `back` directly after end of input restores nothing; two `back`
    /// calls without an intervening `next` are an error.
    pub(crate) fn back(&mut self) -> Result<(), Error> {
        if self.use_previous || self.index == 0 {
            return Err(Error::structural(
                "Stepping back two steps is not supported.",
            ));
        }
        if !self.eof {
            self.decrement();
            self.use_previous = true;
        }
        Ok(())
    }

    /// Next character above U+0020; everything at or below space counts as
    /// whitespace.
    pub(crate) fn next_clean(&mut self) -> Option<char> {
        loop {
            match self.next() {
                None => return None,
                Some(ch) if ch > ' ' => return Some(ch),
                Some(_) => {}
            }
        }
    }

    /// Exactly `n` characters, or a syntax error if the input ends first.
    pub(crate) fn next_n(&mut self, n: usize) -> Result<String, Error> {
        let mut out = String::with_capacity(n);
        for _ in 0..n {
            match self.next() {
                Some(ch) => out.push(ch),
                None => return Err(self.syntax_error("Substring bounds error.")),
            }
        }
        Ok(out)
    }

    /// Whether any input remains to be consumed.
    pub(crate) fn more(&mut self) -> bool {
        self.use_previous || self.chars.clone().next().is_some()
    }

    pub(crate) fn end(&self) -> bool {
        self.eof && !self.use_previous
    }

    /// The body of a quoted string whose opening `quote` was already
    /// consumed, with escape sequences decoded.
    pub(crate) fn next_string(&mut self, quote: char) -> Result<String, Error> {
        let mut out = String::new();
        loop {
            match self.next() {
                None | Some('\n' | '\r') => {
                    return Err(self.syntax_error("Unterminated string."));
                }
                Some('\\') => match self.next() {
                    Some('b') => out.push('\u{8}'),
                    Some('t') => out.push('\t'),
                    Some('n') => out.push('\n'),
                    Some('f') => out.push('\u{c}'),
                    Some('r') => out.push('\r'),
                    Some('u') => out.push(self.unicode_escape()?),
                    Some(ch @ ('"' | '\'' | '\\' | '/')) => out.push(ch),
                    _ => return Err(self.syntax_error("Illegal escape.")),
                },
                Some(ch) if ch == quote => return Ok(out),
                Some(ch) => out.push(ch),
            }
        }
    }

    /// Decode the four hex digits of a `\u` escape, combining surrogate
    /// pairs into a single character.
    fn unicode_escape(&mut self) -> Result<char, Error> {
        let high = self.hex4()?;
        if (0xD800..=0xDBFF).contains(&high) {
            if self.next() != Some('\\') || self.next() != Some('u') {
                return Err(self.syntax_error("Illegal escape."));
            }
            let low = self.hex4()?;
            if !(0xDC00..=0xDFFF).contains(&low) {
                return Err(self.syntax_error("Illegal escape."));
            }
            let combined = 0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00);
            return char::from_u32(combined).ok_or_else(|| self.syntax_error("Illegal escape."));
        }
        char::from_u32(high).ok_or_else(|| self.syntax_error("Illegal escape."))
    }

    fn hex4(&mut self) -> Result<u32, Error> {
        let digits = self.next_n(4)?;
        u32::from_str_radix(&digits, 16).map_err(|_| self.syntax_error("Illegal escape."))
    }

    pub(crate) fn position(&self) -> Position {
        Position {
            offset: self.index,
            line: self.line,
            column: self.column,
        }
    }

    /// A syntax error carrying the current position.
    pub(crate) fn syntax_error(&self, message: impl Into<String>) -> Error {
        Error::syntax(message, self.position())
    }
}
