//! Error types for the FBX reader.

use thiserror::Error;

/// Main error type for FBX decoding.
///
/// Every variant is fatal for a load: a scene is either fully built or
/// not returned at all. Lenient cases (unknown connection targets, zeroed
/// out-of-range attribute lookups, ...) never surface here.
#[derive(Error, Debug)]
pub enum Error {
    /// Input does not start with the binary magic
    #[error("Not a binary FBX file: magic bytes do not match")]
    NotBinary,

    /// File is truncated or corrupted
    #[error("Unexpected end of file at position {0}")]
    UnexpectedEof(u64),

    /// Element end offset points outside the file or backwards
    #[error("Invalid element end offset {offset} at position {position}")]
    InvalidOffset { offset: u64, position: u64 },

    /// Unknown property type tag in binary data
    #[error("Unknown property type tag {0:#04x}")]
    UnknownPropertyType(u8),

    /// Array encoding other than verbatim or zlib
    #[error("Unsupported array encoding: {0}")]
    UnsupportedEncoding(u32),

    /// Array byte size exceeds the declared or configured maximum
    #[error("Array too large: {declared} bytes (max {max})")]
    ArrayTooLarge { declared: u64, max: u64 },

    /// zlib stream failed to inflate
    #[error("Decompression failed: {0}")]
    Decompression(String),

    /// Malformed ASCII document
    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    /// Connection kind other than "OO" or "OP"
    #[error("Unsupported connection kind: {0}")]
    UnsupportedConnection(String),

    /// Connection record with missing or mistyped fields
    #[error("Invalid connection: {0}")]
    InvalidConnection(String),

    /// KeyTime and KeyValueFloat arrays disagree in length
    #[error("Invalid animation curve {id}: {times} key times, {values} key values")]
    InvalidAnimationCurve { id: u64, times: usize, values: usize },

    /// Invalid data structure in file
    #[error("Invalid file structure: {0}")]
    InvalidStructure(String),

    /// Two objects declare the same ID
    #[error("Duplicate object ID: {0}")]
    DuplicateObject(u64),

    /// Second assignment of a single-valued link
    #[error("{what} already linked on object {id}")]
    AlreadyLinked { what: &'static str, id: u64 },

    /// Fourth curve bound to an animation curve node
    #[error("Animation curve node {0} already has 3 curves")]
    CurveSlotsFull(u64),

    /// Cluster could not derive its per-vertex weights
    #[error("Cluster {id} postprocess failed: {reason}")]
    ClusterPostprocess { id: u64, reason: String },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an "other" error from a string.
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }

    /// Create an invalid structure error.
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidStructure(msg.into())
    }

    /// Create a text parse error.
    pub fn parse(line: usize, msg: impl Into<String>) -> Self {
        Self::Parse { line, message: msg.into() }
    }
}

/// Result type alias for FBX operations.
pub type Result<T> = std::result::Result<T, Error>;
