//! ASCII FBX tokenizer.
//!
//! ```text
//! ; comment
//! Name: prop, prop, ... {
//!     Child: prop
//!     Array: *3 {
//!         a: 1,2,3
//!     }
//! }
//! ```

use tracing::debug;

use super::constants::MAX_DEPTH;
use super::element::{Element, Property, PropertyType};
use crate::util::{Error, Result};

/// Tokenize an ASCII FBX document into a synthetic root element.
#[tracing::instrument(skip_all)]
pub fn tokenize(data: &[u8]) -> Result<Element> {
    let mut cursor = TextCursor { data, pos: 0, line: 1, depth: 0 };
    let mut root = Element::new("");
    loop {
        cursor.skip_insignificant();
        if cursor.peek().is_none() {
            break;
        }
        root.children.push(read_element(&mut cursor)?);
    }
    debug!(sections = root.children.len(), lines = cursor.line, "text tokenize done");
    Ok(root)
}

struct TextCursor<'a> {
    data: &'a [u8],
    pos: usize,
    line: usize,
    depth: usize,
}

impl<'a> TextCursor<'a> {
    #[inline]
    fn peek(&self) -> Option<u8> {
        self.data.get(self.pos).copied()
    }

    #[inline]
    fn bump(&mut self) -> Option<u8> {
        let b = self.peek()?;
        self.pos += 1;
        if b == b'\n' {
            self.line += 1;
        }
        Some(b)
    }

    fn error(&self, msg: impl Into<String>) -> Error {
        Error::parse(self.line, msg)
    }

    /// Skip spaces and tabs without crossing a line break.
    fn skip_inline_whitespace(&mut self) {
        while matches!(self.peek(), Some(b' ' | b'\t' | b'\r')) {
            self.bump();
        }
    }

    /// Skip whitespace, line breaks and `;` comments.
    fn skip_insignificant(&mut self) {
        while let Some(b) = self.peek() {
            match b {
                b';' => {
                    while !matches!(self.peek(), None | Some(b'\n')) {
                        self.bump();
                    }
                }
                b if b.is_ascii_whitespace() => {
                    self.bump();
                }
                _ => break,
            }
        }
    }

    fn read_while(&mut self, pred: impl Fn(u8) -> bool) -> &'a [u8] {
        let start = self.pos;
        while self.peek().is_some_and(&pred) {
            self.bump();
        }
        &self.data[start..self.pos]
    }

    fn expect(&mut self, byte: u8) -> Result<()> {
        match self.bump() {
            Some(b) if b == byte => Ok(()),
            Some(b) => Err(self.error(format!("expected '{}', found '{}'", byte as char, b as char))),
            None => Err(self.error(format!("expected '{}', found end of input", byte as char))),
        }
    }
}

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

fn read_element(c: &mut TextCursor<'_>) -> Result<Element> {
    let id = c.read_while(is_ident_byte);
    if id.is_empty() {
        let found = c.peek().map(|b| b as char).unwrap_or(' ');
        return Err(c.error(format!("expected identifier, found '{found}'")));
    }
    let mut element = Element::new(String::from_utf8_lossy(id).into_owned());
    c.skip_inline_whitespace();
    c.expect(b':')?;

    loop {
        c.skip_inline_whitespace();
        match c.peek() {
            None | Some(b'\n' | b';' | b'}') => break,
            Some(b'{') => {
                c.bump();
                read_children(c, &mut element)?;
                break;
            }
            Some(b',') => {
                c.bump();
                // a trailing comma continues the list on the next line
                c.skip_insignificant();
            }
            Some(_) => element.properties.push(read_property(c)?),
        }
    }
    Ok(element)
}

fn read_children(c: &mut TextCursor<'_>, parent: &mut Element) -> Result<()> {
    if c.depth >= MAX_DEPTH {
        return Err(c.error(format!("blocks nested deeper than {MAX_DEPTH} levels")));
    }
    c.depth += 1;
    loop {
        c.skip_insignificant();
        match c.peek() {
            None => return Err(c.error(format!("unclosed block '{}'", parent.id))),
            Some(b'}') => {
                c.bump();
                c.depth -= 1;
                return Ok(());
            }
            Some(_) => parent.children.push(read_element(c)?),
        }
    }
}

fn read_property(c: &mut TextCursor<'_>) -> Result<Property> {
    match c.peek() {
        Some(b'"') => {
            c.bump();
            let start = c.pos;
            while !matches!(c.peek(), None | Some(b'"')) {
                c.bump();
            }
            if c.peek().is_none() {
                return Err(c.error("unterminated string"));
            }
            let text = c.data[start..c.pos].to_vec();
            c.bump();
            Ok(Property::text(PropertyType::String, text, 0))
        }
        Some(b'*') => read_array(c),
        Some(b) if b.is_ascii_digit() || b == b'-' || b == b'+' => read_number(c),
        Some(b) if b.is_ascii_alphabetic() => {
            let word = c.read_while(|b| b.is_ascii_alphabetic()).to_vec();
            Ok(Property::text(PropertyType::Marker(word[0]), word, 0))
        }
        Some(b) => Err(c.error(format!("unexpected character '{}'", b as char))),
        None => Err(c.error("unexpected end of input")),
    }
}

fn read_digits(c: &mut TextCursor<'_>) -> usize {
    c.read_while(|b| b.is_ascii_digit()).len()
}

fn read_number(c: &mut TextCursor<'_>) -> Result<Property> {
    let start = c.pos;
    if matches!(c.peek(), Some(b'-' | b'+')) {
        c.bump();
    }
    let mut digits = read_digits(c);
    let mut is_float = false;

    if c.peek() == Some(b'.') {
        c.bump();
        digits += read_digits(c);
        is_float = true;
    }
    if digits == 0 {
        return Err(c.error("malformed number"));
    }
    if matches!(c.peek(), Some(b'e' | b'E')) {
        c.bump();
        if matches!(c.peek(), Some(b'-' | b'+')) {
            c.bump();
        }
        if read_digits(c) == 0 {
            return Err(c.error("malformed exponent"));
        }
        is_float = true;
    }

    let kind = if is_float { PropertyType::Float64 } else { PropertyType::Int64 };
    Ok(Property::text(kind, c.data[start..c.pos].to_vec(), 0))
}

/// `*N { a: v,v,... }`
fn read_array(c: &mut TextCursor<'_>) -> Result<Property> {
    c.expect(b'*')?;
    let declared = read_digits(c);
    if declared == 0 {
        return Err(c.error("array literal without a count"));
    }
    c.skip_insignificant();
    c.expect(b'{')?;

    while !matches!(c.peek(), None | Some(b':' | b'}')) {
        c.bump();
    }
    if c.peek() != Some(b':') {
        return Err(c.error("array literal without values"));
    }
    c.bump();

    let start = c.pos;
    while !matches!(c.peek(), None | Some(b'}')) {
        c.bump();
    }
    if c.peek().is_none() {
        return Err(c.error("unclosed array literal"));
    }
    let body = &c.data[start..c.pos];
    c.bump();

    let mut count = 0u32;
    let mut is_float = false;
    for value in body.split(|&b| b == b',') {
        let value = value.trim_ascii();
        if value.is_empty() {
            continue;
        }
        count += 1;
        is_float |= value.iter().any(|&b| matches!(b, b'.' | b'e' | b'E'));
    }
    let kind = if is_float { PropertyType::Float64Array } else { PropertyType::Int64Array };
    Ok(Property::text(kind, body.to_vec(), count))
}
