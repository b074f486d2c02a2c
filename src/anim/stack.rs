//! Animation stacks, layers and curve nodes.

use smallvec::SmallVec;

use crate::scene::{ObjectId, Scene};
use crate::util::DVec3;

/// Animation clip; owns layers in connection order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AnimationStack {
    pub layers: Vec<ObjectId>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AnimationLayer {
    pub curve_nodes: Vec<ObjectId>,
}

impl AnimationLayer {
    /// Curve node animating `property` of `bone`.
    pub fn curve_node<'a>(
        &self,
        scene: &'a Scene,
        bone: ObjectId,
        property: &str,
    ) -> Option<&'a AnimationCurveNode> {
        self.curve_nodes
            .iter()
            .filter_map(|&id| scene.animation_curve_node(id))
            .find(|n| n.bone == Some(bone) && n.bone_link_property == property)
    }
}

/// A curve attached to one channel of a curve node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CurveBinding {
    pub curve: ObjectId,
    /// Channel name from the connection, e.g. `d|X`.
    pub property: Option<String>,
}

impl CurveBinding {
    /// Vector component named by the channel; `None` for unnamed channels.
    pub fn component(&self) -> Option<usize> {
        match self.property.as_deref()? {
            "d|X" => Some(0),
            "d|Y" => Some(1),
            "d|Z" => Some(2),
            _ => None,
        }
    }
}

/// Up to three curves driving one vector property of a node.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AnimationCurveNode {
    /// Curves in connection order. A curve drives the component named by its
    /// channel, or its slot index when the channel is unnamed.
    pub curves: SmallVec<[CurveBinding; 3]>,
    /// Animated node.
    pub bone: Option<ObjectId>,
    /// Animated property of `bone`, e.g. `Lcl Translation`.
    pub bone_link_property: String,
}

impl AnimationCurveNode {
    pub const MAX_CURVES: usize = 3;

    /// Sample the bound curves at `time` seconds. Missing curves contribute 0.
    pub fn node_local_transform(&self, scene: &Scene, time: f64) -> DVec3 {
        let mut out = [0.0; 3];
        for (slot, binding) in self.curves.iter().take(Self::MAX_CURVES).enumerate() {
            if let Some(curve) = scene.animation_curve(binding.curve) {
                out[binding.component().unwrap_or(slot)] = f64::from(curve.sample(time));
            }
        }
        DVec3::from_array(out)
    }
}
