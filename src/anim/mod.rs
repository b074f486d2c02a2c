//! Animation data.
//!
//! Stacks own layers, layers own curve nodes, and each curve node binds up
//! to three [`AnimationCurve`]s to one vector property of a scene node.
//! All links are [`ObjectId`](crate::scene::ObjectId) handles resolved
//! through the [`Scene`](crate::scene::Scene).

mod curve;
mod stack;

pub use curve::AnimationCurve;
pub use stack::{AnimationCurveNode, AnimationLayer, AnimationStack, CurveBinding};
