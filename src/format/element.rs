//! Generic element tree produced by both tokenizers.

use smallvec::SmallVec;

/// Property type, keyed by the one-byte tag used in binary files.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PropertyType {
    /// `C`
    Bool,
    /// `Y`
    Int16,
    /// `I`
    Int32,
    /// `L`
    Int64,
    /// `F`
    Float32,
    /// `D`
    Float64,
    /// `S`
    String,
    /// `R`
    Raw,
    /// `b`
    BoolArray,
    /// `i`
    Int32Array,
    /// `l`
    Int64Array,
    /// `f`
    Float32Array,
    /// `d`
    Float64Array,
    /// Bare `T` / `Y` token in ASCII files.
    Marker(u8),
}

impl PropertyType {
    /// Map a binary tag byte to a property type.
    pub fn from_tag(tag: u8) -> Option<Self> {
        Some(match tag {
            b'C' => Self::Bool,
            b'Y' => Self::Int16,
            b'I' => Self::Int32,
            b'L' => Self::Int64,
            b'F' => Self::Float32,
            b'D' => Self::Float64,
            b'S' => Self::String,
            b'R' => Self::Raw,
            b'b' => Self::BoolArray,
            b'i' => Self::Int32Array,
            b'l' => Self::Int64Array,
            b'f' => Self::Float32Array,
            b'd' => Self::Float64Array,
            _ => return None,
        })
    }

    /// The tag byte for this type.
    pub fn tag(self) -> u8 {
        match self {
            Self::Bool => b'C',
            Self::Int16 => b'Y',
            Self::Int32 => b'I',
            Self::Int64 => b'L',
            Self::Float32 => b'F',
            Self::Float64 => b'D',
            Self::String => b'S',
            Self::Raw => b'R',
            Self::BoolArray => b'b',
            Self::Int32Array => b'i',
            Self::Int64Array => b'l',
            Self::Float32Array => b'f',
            Self::Float64Array => b'd',
            Self::Marker(t) => t,
        }
    }

    #[inline]
    pub fn is_array(self) -> bool {
        matches!(
            self,
            Self::BoolArray | Self::Int32Array | Self::Int64Array | Self::Float32Array | Self::Float64Array
        )
    }

    /// Byte width of one scalar, or of one array element for array types.
    /// Zero for variable-length types.
    pub fn element_size(self) -> usize {
        match self {
            Self::Bool | Self::BoolArray => 1,
            Self::Int16 => 2,
            Self::Int32 | Self::Float32 | Self::Int32Array | Self::Float32Array => 4,
            Self::Int64 | Self::Float64 | Self::Int64Array | Self::Float64Array => 8,
            Self::String | Self::Raw | Self::Marker(_) => 0,
        }
    }
}

/// How a property's raw bytes are to be interpreted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Source {
    /// Little-endian binary payload.
    Binary,
    /// ASCII token text.
    Text,
}

/// A typed value cell attached to an [`Element`].
///
/// Only the raw capture is stored; conversion to concrete values happens on
/// request (see the accessors in `property.rs`).
#[derive(Clone, Debug, PartialEq)]
pub struct Property {
    pub(crate) kind: PropertyType,
    pub(crate) source: Source,
    pub(crate) raw: Vec<u8>,
    /// Element count for arrays.
    pub(crate) count: u32,
    /// Array encoding flag (0 = verbatim, 1 = zlib).
    pub(crate) encoding: u32,
}

impl Property {
    /// Scalar or string property captured from binary data.
    pub fn binary(kind: PropertyType, raw: Vec<u8>) -> Self {
        Self { kind, source: Source::Binary, raw, count: 0, encoding: 0 }
    }

    /// Array property captured from binary data.
    pub fn binary_array(kind: PropertyType, count: u32, encoding: u32, raw: Vec<u8>) -> Self {
        Self { kind, source: Source::Binary, raw, count, encoding }
    }

    /// Property captured from ASCII text. `count` is only meaningful for arrays.
    pub fn text(kind: PropertyType, raw: impl Into<Vec<u8>>, count: u32) -> Self {
        Self { kind, source: Source::Text, raw: raw.into(), count, encoding: 0 }
    }

    #[inline]
    pub fn kind(&self) -> PropertyType {
        self.kind
    }

    #[inline]
    pub fn source(&self) -> Source {
        self.source
    }

    /// Raw captured bytes (binary payload or token text).
    #[inline]
    pub fn raw(&self) -> &[u8] {
        &self.raw
    }

    /// Declared element count (arrays only).
    #[inline]
    pub fn count(&self) -> u32 {
        self.count
    }

    #[inline]
    pub fn encoding(&self) -> u32 {
        self.encoding
    }
}

/// A labeled tree node.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Element {
    /// Label, e.g. `Objects`, `Model`, `P`.
    pub id: String,
    pub properties: SmallVec<[Property; 4]>,
    pub children: Vec<Element>,
}

impl Element {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into(), properties: SmallVec::new(), children: Vec::new() }
    }

    /// First child with the given label.
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.id == name)
    }

    /// All children with the given label, in file order.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |c| c.id == name)
    }

    #[inline]
    pub fn property(&self, index: usize) -> Option<&Property> {
        self.properties.get(index)
    }

    /// First property of the first child with the given label.
    ///
    /// Most data-carrying children (`Vertices`, `KeyTime`, `FileName`, ...)
    /// hold exactly one property.
    pub fn child_property(&self, name: &str) -> Option<&Property> {
        self.child(name).and_then(|c| c.property(0))
    }

    /// Total number of elements in this subtree, including self.
    pub fn subtree_len(&self) -> usize {
        1 + self.children.iter().map(Element::subtree_len).sum::<usize>()
    }
}
