//! # FBX
//!
//! Reader for Autodesk FBX scene files, binary and ASCII.
//!
//! Decoding runs in three stages: the file is tokenized into a generic
//! [`Element`](format::Element) tree, typed scene objects are instantiated
//! from the `Objects` section, and finally the `Connections` list links
//! them into a graph. Geometry is expanded into polygon corners and
//! triangulated on load; transforms and animation are evaluated on demand.
//!
//! ## Modules
//!
//! - [`util`] - Errors and math helpers
//! - [`format`] - Low-level binary and text tokenizers, lazy property decoding
//! - [`scene`] - Scene graph, objects, connections, settings
//! - [`geom`] - Geometry, materials, skinning, transforms
//! - [`anim`] - Animation stacks, layers, curves
//!
//! ## Example
//!
//! ```ignore
//! let scene = fbx::load_file("character.fbx")?;
//!
//! for mesh in scene.meshes() {
//!     let global = scene.global_transform(mesh.id());
//!     let triangles = mesh
//!         .as_mesh()
//!         .and_then(|m| m.geometry)
//!         .and_then(|g| scene.geometry(g))
//!         .map_or(0, |g| g.triangle_count());
//!     println!("{}: {triangles} triangles at {:?}", mesh.name(), global.w_axis);
//! }
//! ```

pub mod util;
pub mod format;
pub mod scene;
pub mod geom;
pub mod anim;

use std::io::Read;
use std::path::Path;

// Re-export commonly used types
pub use scene::{LoadOptions, Object, ObjectId, ObjectKind, ObjectType, Scene};
pub use util::{Error, Result};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::anim::*;
    pub use crate::geom::*;
    pub use crate::scene::{
        Connection, ConnectionKind, LoadOptions, Object, ObjectId, ObjectKind, ObjectType, Scene,
        Settings, TakeInfo,
    };
    pub use crate::util::{Error, Result};
}

/// Decode a scene from a stream with default options.
pub fn load<R: Read>(reader: R) -> Result<Scene> {
    Scene::load(reader)
}

pub fn load_with_options<R: Read>(reader: R, options: &LoadOptions) -> Result<Scene> {
    Scene::load_with_options(reader, options)
}

/// Decode a scene already held in memory.
pub fn load_bytes(data: &[u8]) -> Result<Scene> {
    Scene::from_bytes(data)
}

pub fn load_file(path: impl AsRef<Path>) -> Result<Scene> {
    Scene::open(path)
}
