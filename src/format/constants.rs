//! FBX container constants.

/// Magic bytes at the start of a binary FBX file (including the trailing NUL).
pub const BINARY_MAGIC: &[u8; 21] = b"Kaydara FBX Binary  \x00";

/// Reserved bytes following the magic.
pub const HEADER_RESERVED: [u8; 2] = [0x1A, 0x00];

/// Offset of the version word in the header.
pub const VERSION_OFFSET: usize = 23;

/// Size of the file header in bytes (magic + reserved + version).
pub const HEADER_SIZE: usize = 27;

/// First version whose element records use 64-bit offset fields.
pub const WIDE_OFFSETS_VERSION: u32 = 7500;

/// Size of the NUL record closing a child list, 32-bit offsets.
pub const BLOCK_SENTINEL_LEN_32: usize = 13;

/// Size of the NUL record closing a child list, 64-bit offsets.
pub const BLOCK_SENTINEL_LEN_64: usize = 25;

/// Array encoding: payload stored verbatim.
pub const ARRAY_ENCODING_RAW: u32 = 0;

/// Array encoding: payload is a zlib stream.
pub const ARRAY_ENCODING_ZLIB: u32 = 1;

/// Deepest element nesting either tokenizer accepts.
pub const MAX_DEPTH: usize = 512;

/// Byte width of an element offset field for the given version.
#[inline]
pub const fn offset_width(version: u32) -> usize {
    if version >= WIDE_OFFSETS_VERSION { 8 } else { 4 }
}

/// Length of the block sentinel for the given version.
#[inline]
pub const fn block_sentinel_len(version: u32) -> usize {
    if version >= WIDE_OFFSETS_VERSION {
        BLOCK_SENTINEL_LEN_64
    } else {
        BLOCK_SENTINEL_LEN_32
    }
}

/// Check whether `data` begins with the binary magic.
#[inline]
pub fn has_binary_magic(data: &[u8]) -> bool {
    data.len() >= BINARY_MAGIC.len() && &data[..BINARY_MAGIC.len()] == BINARY_MAGIC
}
