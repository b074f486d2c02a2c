//! zlib inflation for compressed array properties.
//!
//! Binary FBX stores large arrays as a single zlib stream (encoding 1).
//! The decompressed size is bounded by `count × element_size`.

use std::io::Read;

use flate2::read::ZlibDecoder;

use crate::util::{Error, Result};

/// Inflate a zlib stream, failing if it expands past `max_len` bytes.
pub fn inflate(data: &[u8], max_len: usize) -> Result<Vec<u8>> {
    let limit = (max_len as u64).saturating_add(1);
    let mut decoder = ZlibDecoder::new(data).take(limit);
    // grow with the output; the declared size may be far larger than the stream
    let mut out = Vec::with_capacity(max_len.min(data.len().saturating_mul(4)));
    decoder
        .read_to_end(&mut out)
        .map_err(|e| Error::Decompression(e.to_string()))?;

    if out.len() > max_len {
        return Err(Error::ArrayTooLarge {
            declared: out.len() as u64,
            max: max_len as u64,
        });
    }
    Ok(out)
}
