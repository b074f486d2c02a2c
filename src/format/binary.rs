//! Binary FBX tokenizer.
//!
//! Layout after the 27-byte header is a list of element records:
//!
//! ```text
//! end_offset      u32 | u64   (absolute; 0 = end of sibling list)
//! property_count  u32 | u64
//! property_bytes  u32 | u64
//! name_len        u8
//! name            [u8; name_len]
//! properties      ...
//! children        ...  followed by a zeroed sentinel record
//! ```
//!
//! Offset fields are 64-bit from version 7500 on.

use byteorder::{ByteOrder, LittleEndian};
use tracing::debug;

use super::constants::*;
use super::element::{Element, Property, PropertyType};
use crate::util::{Error, Result};

/// Parse and validate the binary header, returning the file version.
pub fn parse_header(data: &[u8]) -> Result<u32> {
    if !has_binary_magic(data) {
        return Err(Error::NotBinary);
    }
    if data.len() < HEADER_SIZE {
        return Err(Error::UnexpectedEof(data.len() as u64));
    }
    Ok(LittleEndian::read_u32(&data[VERSION_OFFSET..HEADER_SIZE]))
}

/// Tokenize a binary FBX document into a synthetic root element.
///
/// Arrays whose decoded size would exceed `max_array_bytes` are rejected.
#[tracing::instrument(skip_all)]
pub fn tokenize(data: &[u8], max_array_bytes: usize) -> Result<Element> {
    let version = parse_header(data)?;
    debug!(version, len = data.len(), "binary FBX header");

    let mut cursor = Cursor {
        data,
        pos: HEADER_SIZE,
        version,
        max_array_bytes: max_array_bytes as u64,
        depth: 0,
    };

    let mut root = Element::new("");
    // A file cut exactly at a record boundary is accepted without the closing NUL record.
    while cursor.remaining() > 0 {
        match read_element(&mut cursor)? {
            Some(element) => root.children.push(element),
            None => break,
        }
    }
    debug!(sections = root.children.len(), "binary tokenize done");
    Ok(root)
}

struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
    version: u32,
    max_array_bytes: u64,
    depth: usize,
}

impl<'a> Cursor<'a> {
    #[inline]
    fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        if n > self.remaining() {
            return Err(Error::UnexpectedEof(self.pos as u64));
        }
        let bytes = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(bytes)
    }

    #[inline]
    fn read_u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    #[inline]
    fn read_u32(&mut self) -> Result<u32> {
        Ok(LittleEndian::read_u32(self.take(4)?))
    }

    #[inline]
    fn read_u64(&mut self) -> Result<u64> {
        Ok(LittleEndian::read_u64(self.take(8)?))
    }

    fn read_offset(&mut self) -> Result<u64> {
        if offset_width(self.version) == 8 {
            self.read_u64()
        } else {
            self.read_u32().map(u64::from)
        }
    }

    fn read_short_string(&mut self) -> Result<String> {
        let len = self.read_u8()? as usize;
        Ok(String::from_utf8_lossy(self.take(len)?).into_owned())
    }
}

fn read_element(c: &mut Cursor<'_>) -> Result<Option<Element>> {
    let start = c.pos;
    let end_offset = c.read_offset()?;
    if end_offset == 0 {
        return Ok(None);
    }
    let property_count = c.read_offset()?;
    let _property_bytes = c.read_offset()?;
    let id = c.read_short_string()?;

    let end = usize::try_from(end_offset)
        .ok()
        .filter(|&end| end <= c.data.len() && end > start)
        .ok_or(Error::InvalidOffset { offset: end_offset, position: start as u64 })?;

    let mut element = Element::new(id);
    for _ in 0..property_count {
        element.properties.push(read_property(c)?);
    }
    if c.pos > end {
        return Err(Error::InvalidOffset { offset: end_offset, position: c.pos as u64 });
    }

    if c.pos < end {
        if c.depth >= MAX_DEPTH {
            return Err(Error::invalid(format!(
                "elements nested deeper than {MAX_DEPTH} levels at position {start}"
            )));
        }
        c.depth += 1;
        let children_end = end.saturating_sub(block_sentinel_len(c.version));
        while c.pos < children_end {
            match read_element(c)? {
                Some(child) => element.children.push(child),
                None => break,
            }
        }
        c.depth -= 1;
        if c.pos > end {
            return Err(Error::InvalidOffset { offset: end_offset, position: c.pos as u64 });
        }
        // skip the sentinel record
        c.pos = end;
    }
    Ok(Some(element))
}

fn read_property(c: &mut Cursor<'_>) -> Result<Property> {
    let tag = c.read_u8()?;
    let kind = PropertyType::from_tag(tag).ok_or(Error::UnknownPropertyType(tag))?;

    if kind.is_array() {
        let count = c.read_u32()?;
        let encoding = c.read_u32()?;
        let stored_len = c.read_u32()? as usize;

        let declared = u64::from(count) * kind.element_size() as u64;
        if declared > c.max_array_bytes {
            return Err(Error::ArrayTooLarge { declared, max: c.max_array_bytes });
        }
        match encoding {
            ARRAY_ENCODING_RAW if stored_len as u64 != declared => {
                return Err(Error::invalid(format!(
                    "array of {count} '{}' elements stores {stored_len} bytes",
                    tag as char
                )));
            }
            ARRAY_ENCODING_RAW | ARRAY_ENCODING_ZLIB => {}
            other => return Err(Error::UnsupportedEncoding(other)),
        }
        let payload = c.take(stored_len)?;
        return Ok(Property::binary_array(kind, count, encoding, payload.to_vec()));
    }

    match kind {
        PropertyType::String | PropertyType::Raw => {
            let len = c.read_u32()? as usize;
            Ok(Property::binary(kind, c.take(len)?.to_vec()))
        }
        _ => {
            let bytes = c.take(kind.element_size())?;
            Ok(Property::binary(kind, bytes.to_vec()))
        }
    }
}
