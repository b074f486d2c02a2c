//! Lazy decoding of property payloads.
//!
//! Scalars decode straight from the captured bytes and fall back to the
//! type's zero value when the capture is too short. Arrays may need
//! inflating first, so their accessors return [`Result`].

use std::borrow::Cow;

use byteorder::{ByteOrder, LittleEndian, ReadBytesExt};

use super::compression::inflate;
use super::constants::{ARRAY_ENCODING_RAW, ARRAY_ENCODING_ZLIB};
use super::element::{Property, PropertyType, Source};
use crate::util::{DMat4, DVec2, DVec3, DVec4, Error, Result};

impl Property {
    // ========================================================================
    // Scalars
    // ========================================================================

    pub fn to_i64(&self) -> i64 {
        match self.source {
            Source::Binary => {
                let mut r = self.raw.as_slice();
                match self.kind {
                    PropertyType::Bool => r.read_u8().map(|v| i64::from(v != 0)).unwrap_or(0),
                    PropertyType::Int16 => r.read_i16::<LittleEndian>().map(i64::from).unwrap_or(0),
                    PropertyType::Int32 => r.read_i32::<LittleEndian>().map(i64::from).unwrap_or(0),
                    PropertyType::Int64 => r.read_i64::<LittleEndian>().unwrap_or(0),
                    PropertyType::Float32 => r.read_f32::<LittleEndian>().map(|v| v as i64).unwrap_or(0),
                    PropertyType::Float64 => r.read_f64::<LittleEndian>().map(|v| v as i64).unwrap_or(0),
                    _ => 0,
                }
            }
            Source::Text => match self.kind {
                PropertyType::Marker(_) => 1,
                _ => parse_i64(self.token()),
            },
        }
    }

    pub fn to_f64(&self) -> f64 {
        match self.source {
            Source::Binary => {
                let mut r = self.raw.as_slice();
                match self.kind {
                    PropertyType::Float32 => r.read_f32::<LittleEndian>().map(f64::from).unwrap_or(0.0),
                    PropertyType::Float64 => r.read_f64::<LittleEndian>().unwrap_or(0.0),
                    _ => self.to_i64() as f64,
                }
            }
            Source::Text => match self.kind {
                PropertyType::Marker(_) => 1.0,
                _ => parse_f64(self.token()),
            },
        }
    }

    #[inline]
    pub fn to_i32(&self) -> i32 {
        self.to_i64() as i32
    }

    /// Object IDs are stored as signed 64-bit values.
    #[inline]
    pub fn to_u64(&self) -> u64 {
        self.to_i64() as u64
    }

    #[inline]
    pub fn to_f32(&self) -> f32 {
        self.to_f64() as f32
    }

    #[inline]
    pub fn to_bool(&self) -> bool {
        self.to_i64() != 0
    }

    /// String view of a `S`/`R` property (lossy UTF-8).
    ///
    /// Text-mode properties of any type return their token text.
    pub fn to_str(&self) -> Cow<'_, str> {
        match (self.source, self.kind) {
            (Source::Text, _) | (_, PropertyType::String) | (_, PropertyType::Raw) => {
                String::from_utf8_lossy(&self.raw)
            }
            _ => Cow::Borrowed(""),
        }
    }

    /// Whether this property carries string data.
    #[inline]
    pub fn is_string(&self) -> bool {
        self.kind == PropertyType::String
    }

    fn token(&self) -> &str {
        std::str::from_utf8(&self.raw).unwrap_or("").trim()
    }

    // ========================================================================
    // Arrays
    // ========================================================================

    /// Decoded array bytes, inflated if needed.
    fn array_bytes(&self) -> Result<Cow<'_, [u8]>> {
        let elem = self.kind.element_size() as u64;
        let expected = u64::from(self.count) * elem;
        let expected = usize::try_from(expected)
            .map_err(|_| Error::ArrayTooLarge { declared: expected, max: usize::MAX as u64 })?;

        match self.encoding {
            ARRAY_ENCODING_RAW => Ok(Cow::Borrowed(&self.raw[..expected.min(self.raw.len())])),
            ARRAY_ENCODING_ZLIB => Ok(Cow::Owned(inflate(&self.raw, expected)?)),
            other => Err(Error::UnsupportedEncoding(other)),
        }
    }

    fn text_values(&self) -> impl Iterator<Item = &str> + '_ {
        let text = if self.kind.is_array() { self.token() } else { "" };
        text.split(',').map(str::trim).filter(|s| !s.is_empty())
    }

    pub fn to_f64_vec(&self) -> Result<Vec<f64>> {
        if self.source == Source::Text {
            return Ok(self.text_values().map(parse_f64).collect());
        }
        if !self.kind.is_array() {
            return Ok(Vec::new());
        }
        let bytes = self.array_bytes()?;
        Ok(match self.kind {
            PropertyType::Float64Array => bytes.chunks_exact(8).map(LittleEndian::read_f64).collect(),
            PropertyType::Float32Array => {
                bytes.chunks_exact(4).map(|c| f64::from(LittleEndian::read_f32(c))).collect()
            }
            PropertyType::Int32Array => {
                bytes.chunks_exact(4).map(|c| f64::from(LittleEndian::read_i32(c))).collect()
            }
            PropertyType::Int64Array => {
                bytes.chunks_exact(8).map(|c| LittleEndian::read_i64(c) as f64).collect()
            }
            _ => bytes.iter().map(|&b| if b != 0 { 1.0 } else { 0.0 }).collect(),
        })
    }

    pub fn to_i64_vec(&self) -> Result<Vec<i64>> {
        if self.source == Source::Text {
            return Ok(self.text_values().map(parse_i64).collect());
        }
        if !self.kind.is_array() {
            return Ok(Vec::new());
        }
        let bytes = self.array_bytes()?;
        Ok(match self.kind {
            PropertyType::Int64Array => bytes.chunks_exact(8).map(LittleEndian::read_i64).collect(),
            PropertyType::Int32Array => {
                bytes.chunks_exact(4).map(|c| i64::from(LittleEndian::read_i32(c))).collect()
            }
            PropertyType::Float64Array => {
                bytes.chunks_exact(8).map(|c| LittleEndian::read_f64(c) as i64).collect()
            }
            PropertyType::Float32Array => {
                bytes.chunks_exact(4).map(|c| LittleEndian::read_f32(c) as i64).collect()
            }
            _ => bytes.iter().map(|&b| i64::from(b != 0)).collect(),
        })
    }

    pub fn to_i32_vec(&self) -> Result<Vec<i32>> {
        Ok(self.to_i64_vec()?.into_iter().map(|v| v as i32).collect())
    }

    pub fn to_f32_vec(&self) -> Result<Vec<f32>> {
        Ok(self.to_f64_vec()?.into_iter().map(|v| v as f32).collect())
    }

    pub fn to_bool_vec(&self) -> Result<Vec<bool>> {
        Ok(self.to_i64_vec()?.into_iter().map(|v| v != 0).collect())
    }

    /// Group the decoded stream into 2-vectors. A trailing partial group is dropped.
    pub fn to_dvec2_vec(&self) -> Result<Vec<DVec2>> {
        Ok(self.to_f64_vec()?.chunks_exact(2).map(DVec2::from_slice).collect())
    }

    pub fn to_dvec3_vec(&self) -> Result<Vec<DVec3>> {
        Ok(self.to_f64_vec()?.chunks_exact(3).map(DVec3::from_slice).collect())
    }

    pub fn to_dvec4_vec(&self) -> Result<Vec<DVec4>> {
        Ok(self.to_f64_vec()?.chunks_exact(4).map(DVec4::from_slice).collect())
    }

    /// 16 doubles in column-major order. `None` if fewer are stored.
    pub fn to_dmat4(&self) -> Result<Option<DMat4>> {
        let values = self.to_f64_vec()?;
        Ok((values.len() >= 16).then(|| DMat4::from_cols_slice(&values[..16])))
    }
}

fn parse_i64(s: &str) -> i64 {
    s.parse::<i64>()
        .or_else(|_| s.parse::<f64>().map(|v| v as i64))
        .unwrap_or(0)
}

fn parse_f64(s: &str) -> f64 {
    s.parse::<f64>().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::ZlibEncoder;
    use flate2::Compression;
    use std::io::Write;

    fn f64_bytes(values: &[f64]) -> Vec<u8> {
        values.iter().flat_map(|v| v.to_le_bytes()).collect()
    }

    #[test]
    fn test_binary_scalars() {
        assert_eq!(Property::binary(PropertyType::Int16, (-3i16).to_le_bytes().to_vec()).to_i64(), -3);
        assert_eq!(Property::binary(PropertyType::Int32, 42i32.to_le_bytes().to_vec()).to_i32(), 42);
        assert_eq!(Property::binary(PropertyType::Int64, 1234567890123i64.to_le_bytes().to_vec()).to_u64(), 1234567890123);
        assert_eq!(Property::binary(PropertyType::Float32, 1.5f32.to_le_bytes().to_vec()).to_f64(), 1.5);
        assert_eq!(Property::binary(PropertyType::Float64, 2.25f64.to_le_bytes().to_vec()).to_f32(), 2.25);
        assert!(Property::binary(PropertyType::Bool, vec![1]).to_bool());
        assert!(!Property::binary(PropertyType::Bool, vec![0]).to_bool());
    }

    #[test]
    fn test_short_scalar_is_zero() {
        assert_eq!(Property::binary(PropertyType::Int64, vec![1, 2, 3]).to_i64(), 0);
        assert_eq!(Property::binary(PropertyType::Float64, vec![]).to_f64(), 0.0);
        assert_eq!(Property::binary(PropertyType::Int16, vec![9]).to_i64(), 0);
        assert!(!Property::binary(PropertyType::Bool, vec![]).to_bool());
    }

    #[test]
    fn test_strings() {
        let p = Property::binary(PropertyType::String, b"Cube\x00\x01Model".to_vec());
        assert_eq!(p.to_str(), "Cube\u{0}\u{1}Model");
        assert!(p.is_string());
        let n = Property::binary(PropertyType::Int32, vec![0; 4]);
        assert_eq!(n.to_str(), "");
    }

    #[test]
    fn test_raw_array() {
        let values = [1.0, -2.5, 3.25];
        let p = Property::binary_array(PropertyType::Float64Array, 3, 0, f64_bytes(&values));
        assert_eq!(p.to_f64_vec().unwrap(), values);
        assert_eq!(p.to_i64_vec().unwrap(), vec![1, -2, 3]);
    }

    #[test]
    fn test_zlib_matches_raw() {
        let values: Vec<f64> = (0..32).map(|i| i as f64 * 0.5).collect();
        let raw = f64_bytes(&values);
        let mut enc = ZlibEncoder::new(Vec::new(), Compression::best());
        enc.write_all(&raw).unwrap();
        let packed = enc.finish().unwrap();

        let verbatim = Property::binary_array(PropertyType::Float64Array, 32, 0, raw);
        let deflated = Property::binary_array(PropertyType::Float64Array, 32, 1, packed);
        assert_eq!(verbatim.to_f64_vec().unwrap(), deflated.to_f64_vec().unwrap());
        assert_eq!(deflated.to_dvec4_vec().unwrap().len(), 8);
    }

    #[test]
    fn test_zlib_exceeding_count_fails() {
        let raw: Vec<u8> = [1i32, 2, 3, 4].iter().flat_map(|v| v.to_le_bytes()).collect();
        let mut enc = ZlibEncoder::new(Vec::new(), Compression::default());
        enc.write_all(&raw).unwrap();
        // declares 2 elements but the stream holds 4
        let p = Property::binary_array(PropertyType::Int32Array, 2, 1, enc.finish().unwrap());
        assert!(matches!(p.to_i32_vec(), Err(Error::ArrayTooLarge { max: 8, .. })));
    }

    #[test]
    fn test_unknown_encoding() {
        let p = Property::binary_array(PropertyType::Int32Array, 1, 7, vec![0; 4]);
        assert!(matches!(p.to_i32_vec(), Err(Error::UnsupportedEncoding(7))));
    }

    #[test]
    fn test_text_values() {
        assert_eq!(Property::text(PropertyType::Int64, "-17", 0).to_i64(), -17);
        assert_eq!(Property::text(PropertyType::Float64, "1.5e-2", 0).to_f64(), 0.015);
        assert_eq!(Property::text(PropertyType::String, "Lcl Rotation", 0).to_str(), "Lcl Rotation");
        assert!(Property::text(PropertyType::Marker(b'T'), "T", 0).to_bool());

        let arr = Property::text(PropertyType::Float64Array, "0,1.5, 2,\n3", 4);
        assert_eq!(arr.to_f64_vec().unwrap(), vec![0.0, 1.5, 2.0, 3.0]);
        let ints = Property::text(PropertyType::Int64Array, "0,1,2,-4", 4);
        assert_eq!(ints.to_i32_vec().unwrap(), vec![0, 1, 2, -4]);
    }

    #[test]
    fn test_vector_grouping() {
        let p = Property::text(PropertyType::Float64Array, "1,2,3,4,5,6,7", 7);
        let v = p.to_dvec3_vec().unwrap();
        assert_eq!(v, vec![DVec3::new(1.0, 2.0, 3.0), DVec3::new(4.0, 5.0, 6.0)]);
        let v2 = p.to_dvec2_vec().unwrap();
        assert_eq!(v2.len(), 3);
    }

    #[test]
    fn test_matrix() {
        let cols: Vec<String> = DMat4::from_translation(DVec3::new(1.0, 2.0, 3.0))
            .to_cols_array()
            .iter()
            .map(|v| v.to_string())
            .collect();
        let p = Property::text(PropertyType::Float64Array, cols.join(","), 16);
        let m = p.to_dmat4().unwrap().unwrap();
        assert_eq!(m.w_axis.truncate(), DVec3::new(1.0, 2.0, 3.0));

        let short = Property::text(PropertyType::Float64Array, "1,2,3", 3);
        assert!(short.to_dmat4().unwrap().is_none());
    }
}
