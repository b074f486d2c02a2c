//! Node transform evaluation.
//!
//! A node's local matrix is composed from its decomposed `Properties70`
//! values:
//!
//! ```text
//! T · Roff · Rp · Rpre · R · Rpost⁻¹ · Rp⁻¹ · Soff · Sp · S · Sp⁻¹
//! ```
//!
//! The global matrix walks the parent chain found through connections.

use crate::anim::AnimationCurveNode;
use crate::format::Element;
use crate::scene::{properties, ObjectId, Scene};
use crate::util::{DMat4, DVec3};

use super::RotationOrder;

/// Decomposed transform of a scene node. Angles are in degrees.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodeTransform {
    pub translation: DVec3,
    pub rotation: DVec3,
    pub scaling: DVec3,
    pub rotation_offset: DVec3,
    pub rotation_pivot: DVec3,
    pub pre_rotation: DVec3,
    pub post_rotation: DVec3,
    pub scaling_offset: DVec3,
    pub scaling_pivot: DVec3,
    pub rotation_order: RotationOrder,
}

impl Default for NodeTransform {
    fn default() -> Self {
        Self {
            translation: DVec3::ZERO,
            rotation: DVec3::ZERO,
            scaling: DVec3::ONE,
            rotation_offset: DVec3::ZERO,
            rotation_pivot: DVec3::ZERO,
            pre_rotation: DVec3::ZERO,
            post_rotation: DVec3::ZERO,
            scaling_offset: DVec3::ZERO,
            scaling_pivot: DVec3::ZERO,
            rotation_order: RotationOrder::DEFAULT,
        }
    }
}

impl NodeTransform {
    pub fn from_element(element: &Element) -> Self {
        let vec3 = |name: &str, default: DVec3| properties::resolve_vec3(element, name, default);
        let order = properties::resolve_enum(element, "RotationOrder", RotationOrder::DEFAULT as i32);

        Self {
            translation: vec3("Lcl Translation", DVec3::ZERO),
            rotation: vec3("Lcl Rotation", DVec3::ZERO),
            scaling: vec3("Lcl Scaling", DVec3::ONE),
            rotation_offset: vec3("RotationOffset", DVec3::ZERO),
            rotation_pivot: vec3("RotationPivot", DVec3::ZERO),
            pre_rotation: vec3("PreRotation", DVec3::ZERO),
            post_rotation: vec3("PostRotation", DVec3::ZERO),
            scaling_offset: vec3("ScalingOffset", DVec3::ZERO),
            scaling_pivot: vec3("ScalingPivot", DVec3::ZERO),
            rotation_order: RotationOrder::from_i32(order),
        }
    }

    /// Local matrix.
    pub fn matrix(&self) -> DMat4 {
        let order = self.rotation_order;
        let rotation = order.rotation_matrix(self.rotation);
        let pre = order.rotation_matrix(self.pre_rotation);
        // orthonormal, so the transpose is the inverse
        let post_inv = order.rotation_matrix(self.post_rotation).transpose();

        DMat4::from_translation(self.translation)
            * DMat4::from_translation(self.rotation_offset)
            * DMat4::from_translation(self.rotation_pivot)
            * pre
            * rotation
            * post_inv
            * DMat4::from_translation(-self.rotation_pivot)
            * DMat4::from_translation(self.scaling_offset)
            * DMat4::from_translation(self.scaling_pivot)
            * DMat4::from_scale(self.scaling)
            * DMat4::from_translation(-self.scaling_pivot)
    }
}

impl Scene {
    /// Decomposed transform of a node; defaults for unknown IDs and the root.
    pub fn node_transform(&self, id: ObjectId) -> NodeTransform {
        self.object(id)
            .filter(|o| o.element_index().is_some())
            .and_then(|o| self.element(o))
            .map(NodeTransform::from_element)
            .unwrap_or_default()
    }

    pub fn local_transform(&self, id: ObjectId) -> DMat4 {
        self.node_transform(id).matrix()
    }

    /// Local matrix with `Lcl` values replaced by the layer's curves at `time` seconds.
    ///
    /// Channels the layer does not animate keep their static values.
    pub fn animated_local_transform(&self, node: ObjectId, layer: ObjectId, time: f64) -> DMat4 {
        let mut transform = self.node_transform(node);
        if let Some(layer) = self.animation_layer(layer) {
            let sample = |property: &str| -> Option<DVec3> {
                let curve_node: &AnimationCurveNode = layer.curve_node(self, node, property)?;
                Some(curve_node.node_local_transform(self, time))
            };
            if let Some(t) = sample("Lcl Translation") {
                transform.translation = t;
            }
            if let Some(r) = sample("Lcl Rotation") {
                transform.rotation = r;
            }
            if let Some(s) = sample("Lcl Scaling") {
                transform.scaling = s;
            }
        }
        transform.matrix()
    }

    /// `parent_global · local`, up to the first node without a parent.
    pub fn global_transform(&self, id: ObjectId) -> DMat4 {
        let mut chain = vec![id];
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            if chain.len() > self.object_count() {
                tracing::warn!(id, "parent chain does not terminate, truncated");
                break;
            }
            chain.push(parent);
            current = parent;
        }
        chain
            .iter()
            .rev()
            .fold(DMat4::IDENTITY, |global, &node| global * self.local_transform(node))
    }
}
