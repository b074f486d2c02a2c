//! Scene graph.
//!
//! - [`Scene`] - decoded document, object arena and connection list
//! - [`Object`] / [`ObjectKind`] - typed scene objects keyed by [`ObjectId`]
//! - [`Connection`] - declared edges between objects
//! - [`Settings`] / [`TakeInfo`] - global settings and animation takes
//! - [`LoadOptions`] - decoding configuration
//!
//! ## Example
//!
//! ```ignore
//! use fbx::Scene;
//!
//! let scene = Scene::open("character.fbx")?;
//! for mesh in scene.meshes() {
//!     println!("{} -> {:?}", mesh.name(), scene.global_transform(mesh.id()));
//! }
//! ```

mod builder;
mod connection;
mod object;
pub mod properties;
mod settings;

pub use connection::*;
pub use object::*;
pub use settings::*;

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::anim::{AnimationCurve, AnimationCurveNode, AnimationLayer, AnimationStack};
use crate::format::{self, Element};
use crate::geom::{Cluster, Geometry, Material, Mesh, Skin, Texture};
use crate::util::Result;

/// Default ceiling for a single decoded array (1 GiB).
pub const DEFAULT_MAX_ARRAY_BYTES: usize = 1 << 30;

/// Decoding options.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadOptions {
    /// Register Geometry objects without decoding their vertex data.
    pub ignore_geometry: bool,
    /// Build triangle lists for geometries.
    pub triangulate: bool,
    /// Reject arrays whose decoded size exceeds this many bytes.
    pub max_array_bytes: usize,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            ignore_geometry: false,
            triangulate: true,
            max_array_bytes: DEFAULT_MAX_ARRAY_BYTES,
        }
    }
}

impl LoadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ignore_geometry(mut self, ignore: bool) -> Self {
        self.ignore_geometry = ignore;
        self
    }

    pub fn triangulate(mut self, triangulate: bool) -> Self {
        self.triangulate = triangulate;
        self
    }

    pub fn max_array_bytes(mut self, max: usize) -> Self {
        self.max_array_bytes = max;
        self
    }
}

/// A decoded FBX scene.
///
/// Immutable once loaded; all queries are pure lookups.
#[derive(Clone, Debug)]
pub struct Scene {
    pub(crate) document: Element,
    pub(crate) objects_section: Option<usize>,
    pub(crate) objects: Vec<Object>,
    pub(crate) index: HashMap<ObjectId, usize>,
    pub(crate) connections: Vec<Connection>,
    pub(crate) settings: Settings,
    pub(crate) takes: Vec<TakeInfo>,
    pub(crate) meshes: Vec<ObjectId>,
    pub(crate) animation_stacks: Vec<ObjectId>,
}

impl Scene {
    // ========================================================================
    // Loading
    // ========================================================================

    /// Read a complete document from a stream.
    pub fn load<R: Read>(reader: R) -> Result<Self> {
        Self::load_with_options(reader, &LoadOptions::default())
    }

    pub fn load_with_options<R: Read>(mut reader: R, options: &LoadOptions) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes_with_options(&data, options)
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::from_bytes_with_options(data, &LoadOptions::default())
    }

    #[tracing::instrument(skip_all, fields(len = data.len()))]
    pub fn from_bytes_with_options(data: &[u8], options: &LoadOptions) -> Result<Self> {
        let document = format::tokenize(data, options.max_array_bytes)?;
        builder::build(document, options)
    }

    /// Open and decode a file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_opts(path, &LoadOptions::default())
    }

    pub fn open_opts(path: impl AsRef<Path>, options: &LoadOptions) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Self::load_with_options(BufReader::new(file), options)
    }

    // ========================================================================
    // Document
    // ========================================================================

    /// Root of the tokenized element tree.
    #[inline]
    pub fn document(&self) -> &Element {
        &self.document
    }

    /// Source element of an object; the document root for the root object.
    pub fn element(&self, object: &Object) -> Option<&Element> {
        match object.element {
            None => Some(&self.document),
            Some(i) => self.document.children.get(self.objects_section?)?.children.get(i),
        }
    }

    /// `FBXHeaderExtension/FBXVersion`, if present.
    pub fn version(&self) -> Option<u32> {
        let version = self.document.child("FBXHeaderExtension")?.child_property("FBXVersion")?;
        Some(version.to_i64() as u32)
    }

    #[inline]
    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    #[inline]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    #[inline]
    pub fn takes(&self) -> &[TakeInfo] {
        &self.takes
    }

    /// Find a take by name.
    pub fn take(&self, name: &str) -> Option<&TakeInfo> {
        self.takes.iter().find(|t| t.name == name)
    }

    /// Frames per second from the global settings.
    pub fn frame_rate(&self) -> Option<f32> {
        self.settings.frame_rate()
    }

    // ========================================================================
    // Objects
    // ========================================================================

    pub fn object(&self, id: ObjectId) -> Option<&Object> {
        self.index.get(&id).map(|&i| &self.objects[i])
    }

    pub(crate) fn object_mut(&mut self, id: ObjectId) -> Option<&mut Object> {
        let i = *self.index.get(&id)?;
        self.objects.get_mut(i)
    }

    /// The root object (ID 0).
    pub fn root(&self) -> Option<&Object> {
        self.object(ROOT_ID)
    }

    /// All objects in file order, root first.
    pub fn objects(&self) -> impl Iterator<Item = &Object> {
        self.objects.iter()
    }

    #[inline]
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Mesh models in file order.
    pub fn meshes(&self) -> impl Iterator<Item = &Object> {
        self.meshes.iter().filter_map(|&id| self.object(id))
    }

    pub fn animation_stacks(&self) -> impl Iterator<Item = &Object> {
        self.animation_stacks.iter().filter_map(|&id| self.object(id))
    }

    pub fn mesh(&self, id: ObjectId) -> Option<&Mesh> {
        self.object(id)?.as_mesh()
    }

    pub fn geometry(&self, id: ObjectId) -> Option<&Geometry> {
        self.object(id)?.as_geometry()
    }

    pub fn material(&self, id: ObjectId) -> Option<&Material> {
        self.object(id)?.as_material()
    }

    pub fn texture(&self, id: ObjectId) -> Option<&Texture> {
        self.object(id)?.as_texture()
    }

    pub fn skin(&self, id: ObjectId) -> Option<&Skin> {
        self.object(id)?.as_skin()
    }

    pub fn cluster(&self, id: ObjectId) -> Option<&Cluster> {
        self.object(id)?.as_cluster()
    }

    pub fn node_attribute(&self, id: ObjectId) -> Option<&NodeAttribute> {
        self.object(id)?.as_node_attribute()
    }

    pub fn animation_stack(&self, id: ObjectId) -> Option<&AnimationStack> {
        self.object(id)?.as_animation_stack()
    }

    pub fn animation_layer(&self, id: ObjectId) -> Option<&AnimationLayer> {
        self.object(id)?.as_animation_layer()
    }

    pub fn animation_curve_node(&self, id: ObjectId) -> Option<&AnimationCurveNode> {
        self.object(id)?.as_animation_curve_node()
    }

    pub fn animation_curve(&self, id: ObjectId) -> Option<&AnimationCurve> {
        self.object(id)?.as_animation_curve()
    }

    // ========================================================================
    // Relations
    // ========================================================================

    /// First object of type `ty` that `id` is connected to (`id` → target).
    pub fn find_link(&self, id: ObjectId, ty: ObjectType) -> Option<&Object> {
        self.connections
            .iter()
            .filter(|c| c.from == id)
            .filter_map(|c| self.object(c.to))
            .find(|o| o.object_type() == ty)
    }

    /// First object of type `ty` connected to `id` (source → `id`).
    pub fn find_link_reverse(&self, id: ObjectId, ty: ObjectType) -> Option<&Object> {
        self.connections
            .iter()
            .filter(|c| c.to == id)
            .filter_map(|c| self.object(c.from))
            .find(|o| o.object_type() == ty)
    }

    /// Parent node in the transform hierarchy.
    pub fn parent(&self, id: ObjectId) -> Option<ObjectId> {
        self.connections
            .iter()
            .filter(|c| c.from == id && c.to != id)
            .filter_map(|c| self.object(c.to))
            .find(|o| o.is_node())
            .map(Object::id)
    }

    /// Child nodes in connection order.
    pub fn children(&self, id: ObjectId) -> impl Iterator<Item = &Object> {
        self.connections
            .iter()
            .filter(move |c| c.to == id && c.from != id)
            .filter_map(|c| self.object(c.from))
            .filter(|o| o.is_node())
    }
}
