//! XML parser for templates and mapping fragments
//!
//! Covers the subset the converter needs: elements, attributes, text,
//! entity references. Processing instructions, comments, and doctype
//! blocks are skipped wherever they appear; the textual prolog is
//! recovered separately by the line-oriented scanner in `prolog`.

use indexmap::IndexMap;

use crate::error::{Error, ErrorKind, Pos, Result, Span};
use crate::xml::cursor::Cursor;
use crate::xml::model::Element;

/// XML parser
#[derive(Debug)]
pub struct Parser<'a> {
    cursor: Cursor<'a>,
}

impl<'a> Parser<'a> {
    /// Create a new XML parser
    pub const fn new(input: &'a [u8]) -> Self {
        Self {
            cursor: Cursor::new(input),
        }
    }

    /// Parse a document and return its root element
    pub fn parse(&mut self) -> Result<Element> {
        self.skip_misc()?;
        let root = self.parse_element()?;
        self.skip_misc()?;

        if !self.cursor.is_eof() {
            return Err(self.error_here("content after document root"));
        }

        Ok(root)
    }

    fn parse_element(&mut self) -> Result<Element> {
        self.expect_byte(b'<')?;

        if self.cursor.current() == Some(b'?') {
            self.skip_processing_instruction()?;
            self.skip_whitespace();
            return self.parse_element();
        }

        if self.cursor.current() == Some(b'!') {
            self.skip_declaration_or_comment()?;
            self.skip_whitespace();
            return self.parse_element();
        }

        if self.cursor.current() == Some(b'/') {
            return Err(self.error_here("unexpected closing tag"));
        }

        let name = self.parse_name()?;
        let attributes = self.parse_attributes()?;

        let mut element = Element {
            name,
            attributes,
            text: None,
            tail: None,
            children: Vec::new(),
        };

        if self.cursor.current() == Some(b'/') {
            self.cursor.advance();
            self.expect_byte(b'>')?;
            return Ok(element);
        }

        self.expect_byte(b'>')?;

        loop {
            if self.cursor.current() == Some(b'<') && self.cursor.peek(1) == Some(b'/') {
                self.cursor.advance_by(2);
                let close_name = self.parse_name()?;
                if close_name != element.name {
                    return Err(Error::with_message(
                        ErrorKind::MismatchedTag {
                            expected: element.name.clone(),
                            found: close_name.clone(),
                        },
                        self.span_here(),
                        format!("expected </{}>, found </{close_name}>", element.name),
                    ));
                }
                self.skip_whitespace();
                self.expect_byte(b'>')?;
                break;
            }

            if self.cursor.current() == Some(b'<') && self.cursor.peek(1) == Some(b'!') {
                self.cursor.advance();
                self.skip_declaration_or_comment()?;
                continue;
            }

            if self.cursor.current() == Some(b'<') {
                let child = self.parse_element()?;
                element.children.push(child);
                continue;
            }

            if self.cursor.is_eof() {
                return Err(Error::with_message(
                    ErrorKind::UnterminatedMarkup,
                    self.span_here(),
                    format!("element <{}> is never closed", element.name),
                ));
            }

            if let Some(text) = self.parse_text()? {
                // Text after a child's closing tag is that child's tail.
                match element.children.last_mut() {
                    Some(prev) => append_text(&mut prev.tail, &text),
                    None => append_text(&mut element.text, &text),
                }
            }
        }

        Ok(element)
    }

    fn parse_attributes(&mut self) -> Result<IndexMap<String, String>> {
        let mut attrs = IndexMap::new();

        loop {
            self.skip_whitespace();
            match self.cursor.current() {
                Some(b'/') | Some(b'>') => break,
                Some(_) => {}
                None => return Err(self.error_here("unexpected end of input")),
            }

            let name = self.parse_name()?;
            self.skip_whitespace();
            self.expect_byte(b'=')?;
            self.skip_whitespace();
            let value = self.parse_attribute_value()?;

            if attrs.contains_key(&name) {
                return Err(Error::with_message(
                    ErrorKind::DuplicateAttribute { name: name.clone() },
                    self.span_here(),
                    format!("duplicate attribute: {name}"),
                ));
            }
            attrs.insert(name, value);
        }

        Ok(attrs)
    }

    fn parse_attribute_value(&mut self) -> Result<String> {
        let quote = match self.cursor.current() {
            Some(b'"') => b'"',
            Some(b'\'') => b'\'',
            _ => return Err(self.error_here("expected quoted attribute value")),
        };
        self.cursor.advance();

        let start = self.cursor.pos();
        while let Some(b) = self.cursor.current() {
            if b == quote {
                let raw = self.cursor.slice_from(start);
                self.cursor.advance();
                let text = bytes_to_string(raw)?;
                return decode_entities(&text);
            }
            self.cursor.advance();
        }

        Err(Error::with_message(
            ErrorKind::UnterminatedMarkup,
            self.span_here(),
            "unterminated attribute value".to_string(),
        ))
    }

    fn parse_text(&mut self) -> Result<Option<String>> {
        let start = self.cursor.pos();
        while let Some(b) = self.cursor.current() {
            if b == b'<' {
                break;
            }
            self.cursor.advance();
        }

        let raw = self.cursor.slice_from(start);
        let text = bytes_to_string(raw)?;
        let text = decode_entities(&text)?;

        if text.trim().is_empty() {
            Ok(None)
        } else {
            Ok(Some(text))
        }
    }

    fn parse_name(&mut self) -> Result<String> {
        let start_pos = self.cursor.position();
        let start = self.cursor.pos();

        let Some(first) = self.cursor.current() else {
            return Err(self.error_here("expected name"));
        };
        if !is_name_start(first) {
            return Err(Error::at(
                ErrorKind::InvalidToken,
                start_pos.offset,
                start_pos.line,
                start_pos.col,
            ));
        }

        self.cursor.advance();
        while let Some(b) = self.cursor.current() {
            if is_name_char(b) {
                self.cursor.advance();
            } else {
                break;
            }
        }

        let raw = self.cursor.slice_from(start);
        bytes_to_string(raw)
    }

    fn skip_misc(&mut self) -> Result<()> {
        loop {
            self.skip_whitespace();
            if self.cursor.current() != Some(b'<') {
                return Ok(());
            }
            match self.cursor.peek(1) {
                Some(b'?') => {
                    self.cursor.advance();
                    self.skip_processing_instruction()?;
                }
                Some(b'!') => {
                    self.cursor.advance();
                    self.skip_declaration_or_comment()?;
                }
                _ => return Ok(()),
            }
        }
    }

    fn skip_declaration_or_comment(&mut self) -> Result<()> {
        // cursor currently at '!'
        if self.cursor.peek(1) == Some(b'-') && self.cursor.peek(2) == Some(b'-') {
            self.cursor.advance_by(3);
            self.skip_until(b"-->")?;
            return Ok(());
        }

        self.skip_until(b">")
    }

    fn skip_processing_instruction(&mut self) -> Result<()> {
        // cursor currently at '?'
        self.cursor.advance();
        self.skip_until(b"?>")
    }

    fn skip_until(&mut self, pattern: &[u8]) -> Result<()> {
        while self.cursor.current().is_some() {
            if self.cursor.peek_bytes(pattern.len()) == Some(pattern) {
                self.cursor.advance_by(pattern.len());
                return Ok(());
            }
            self.cursor.advance();
        }
        Err(Error::with_message(
            ErrorKind::UnterminatedMarkup,
            self.span_here(),
            "unterminated markup".to_string(),
        ))
    }

    fn expect_byte(&mut self, expected: u8) -> Result<()> {
        if self.cursor.current() == Some(expected) {
            self.cursor.advance();
            Ok(())
        } else {
            Err(self.error_here("unexpected token"))
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(b) = self.cursor.current() {
            if matches!(b, b' ' | b'\t' | b'\r' | b'\n') {
                self.cursor.advance();
            } else {
                break;
            }
        }
    }

    fn span_here(&self) -> Span {
        let pos = self.cursor.position();
        Span::new(Pos::new(pos.offset, pos.line, pos.col), pos)
    }

    fn error_here(&self, message: &str) -> Error {
        Error::with_message(ErrorKind::InvalidToken, self.span_here(), message.to_string())
    }
}

fn append_text(slot: &mut Option<String>, text: &str) {
    match slot {
        Some(existing) => existing.push_str(text),
        None => *slot = Some(text.to_string()),
    }
}

fn bytes_to_string(bytes: &[u8]) -> Result<String> {
    std::str::from_utf8(bytes)
        .map(|s| s.to_string())
        .map_err(|_| Error::new(ErrorKind::InvalidUtf8, Span::empty()))
}

fn is_name_start(b: u8) -> bool {
    matches!(b, b'A'..=b'Z' | b'a'..=b'z' | b'_' | b':')
}

fn is_name_char(b: u8) -> bool {
    is_name_start(b) || matches!(b, b'0'..=b'9' | b'-' | b'.')
}

fn decode_entities(input: &str) -> Result<String> {
    if !input.contains('&') {
        return Ok(input.to_string());
    }

    let mut result = String::new();
    let mut chars = input.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch != '&' {
            result.push(ch);
            continue;
        }

        let mut entity = String::new();
        let mut terminated = false;
        for next in chars.by_ref() {
            if next == ';' {
                terminated = true;
                break;
            }
            entity.push(next);
        }

        let decoded = if terminated {
            match entity.as_str() {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                _ => decode_numeric_entity(&entity),
            }
        } else {
            None
        };

        match decoded {
            Some(ch) => result.push(ch),
            None => {
                return Err(Error::with_message(
                    ErrorKind::InvalidEntity,
                    Span::empty(),
                    format!("invalid entity: &{entity}"),
                ));
            }
        }
    }

    Ok(result)
}

fn decode_numeric_entity(entity: &str) -> Option<char> {
    if let Some(hex) = entity.strip_prefix("#x") {
        u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
    } else if let Some(dec) = entity.strip_prefix('#') {
        dec.parse::<u32>().ok().and_then(char::from_u32)
    } else {
        None
    }
}
