//! Mesh models.

use crate::scene::{properties, ObjectId, Scene};
use crate::util::{DMat4, DVec3};

use super::RotationOrder;

/// `Model` object of class `Mesh`.
///
/// The transform lives on the model; vertex data lives on the linked
/// [`Geometry`](super::Geometry).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Mesh {
    pub geometry: Option<ObjectId>,
    /// Materials in connection order; indexed by `Geometry::materials`.
    pub materials: Vec<ObjectId>,
}

impl Scene {
    /// Offset applied to the mesh's vertices but not inherited by children.
    ///
    /// `GeometricTranslation · R(GeometricRotation, XYZ) · GeometricScaling`.
    pub fn geometric_matrix(&self, mesh: ObjectId) -> DMat4 {
        let Some(element) = self.object(mesh).and_then(|o| self.element(o)) else {
            return DMat4::IDENTITY;
        };
        let translation = properties::resolve_vec3(element, "GeometricTranslation", DVec3::ZERO);
        let rotation = properties::resolve_vec3(element, "GeometricRotation", DVec3::ZERO);
        let scale = properties::resolve_vec3(element, "GeometricScaling", DVec3::ONE);

        DMat4::from_translation(translation)
            * RotationOrder::EulerXYZ.rotation_matrix(rotation)
            * DMat4::from_scale(scale)
    }

    /// Animation stacks that drive this mesh or one of its skin bones.
    pub fn mesh_animation_stacks(&self, mesh: ObjectId) -> Vec<ObjectId> {
        let mut animated = vec![mesh];
        let skin = self
            .mesh(mesh)
            .and_then(|m| m.geometry)
            .and_then(|g| self.geometry(g))
            .and_then(|g| g.skin)
            .and_then(|s| self.skin(s));
        if let Some(skin) = skin {
            animated.extend(
                skin.clusters
                    .iter()
                    .filter_map(|&c| self.cluster(c))
                    .filter_map(|c| c.link),
            );
        }

        self.animation_stacks
            .iter()
            .copied()
            .filter(|&stack| {
                self.animation_stack(stack).is_some_and(|s| {
                    s.layers
                        .iter()
                        .filter_map(|&l| self.animation_layer(l))
                        .flat_map(|l| l.curve_nodes.iter())
                        .filter_map(|&n| self.animation_curve_node(n))
                        .any(|n| n.bone.is_some_and(|b| animated.contains(&b)))
                })
            })
            .collect()
    }
}
