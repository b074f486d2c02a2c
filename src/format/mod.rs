//! Low-level FBX container format.
//!
//! Both variants of the format decode into the same generic tree:
//!
//! ```text
//! Element (root, unnamed)
//! ├── FBXHeaderExtension
//! ├── GlobalSettings
//! ├── Objects
//! │   ├── Model: id, "name", "class"
//! │   └── Geometry: ...
//! ├── Connections
//! └── Takes
//! ```
//!
//! - [`Element`] - labeled node with typed properties and children
//! - [`Property`] - raw typed value, decoded on request
//! - [`tokenize`] - binary/ASCII dispatch

pub mod constants;
mod element;
mod property;
mod compression;
pub mod binary;
pub mod text;

pub use constants::*;
pub use element::*;
pub use compression::inflate;

use crate::util::{Error, Result};

/// Tokenize a complete FBX document, binary or ASCII.
///
/// The binary tokenizer is tried first; a magic mismatch falls through to
/// the text tokenizer rather than failing.
pub fn tokenize(data: &[u8], max_array_bytes: usize) -> Result<Element> {
    match binary::tokenize(data, max_array_bytes) {
        Err(Error::NotBinary) => text::tokenize(data),
        result => result,
    }
}
