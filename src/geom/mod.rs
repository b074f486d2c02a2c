//! Geometry, materials, deformers and transforms.
//!
//! - [`Geometry`] - vertex data expanded to polygon corners
//! - [`Mesh`] - model linking a geometry and its materials
//! - [`Material`] / [`Texture`] - surface description
//! - [`Skin`] / [`Cluster`] - skinning deformers
//! - [`NodeTransform`] / [`RotationOrder`] - node transform evaluation
//! - [`vertex_data`] - splat, remap and triangulation of layer arrays

pub mod vertex_data;
mod geometry;
mod material;
mod mesh;
mod rotation_order;
mod skin;
pub mod xform;

pub use geometry::{BlendWeight, Geometry, MAX_UV_SETS};
pub use material::{Material, Texture, TextureSlot};
pub use mesh::Mesh;
pub use rotation_order::RotationOrder;
pub use skin::{Cluster, Skin};
pub(crate) use skin::postprocess_clusters;
pub use vertex_data::{MeshTopology, VertexDataMapping, VertexDataReference};
pub use xform::NodeTransform;
