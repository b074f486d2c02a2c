//! Skin deformers and their clusters.

use tracing::{debug, trace};

use crate::format::Element;
use crate::scene::{ObjectId, ObjectType, Scene};
use crate::util::{DMat4, Error, Result};

use super::BlendWeight;

/// `Deformer` of class `Skin`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Skin {
    /// Clusters in connection order.
    pub clusters: Vec<ObjectId>,
}

/// `Deformer` of class `Cluster`: the influence of one bone.
#[derive(Clone, Debug, PartialEq)]
pub struct Cluster {
    /// Affected polygon corners, filled after linking.
    pub indices: Vec<u32>,
    /// Weight per entry of `indices`.
    pub weights: Vec<f64>,
    /// Affected control points as stored in the file.
    pub old_indices: Vec<i32>,
    pub old_weights: Vec<f64>,
    pub transform: DMat4,
    pub transform_link: DMat4,
    /// Bone driving this cluster.
    pub link: Option<ObjectId>,
    pub skin: Option<ObjectId>,
}

impl Default for Cluster {
    fn default() -> Self {
        Self {
            indices: Vec::new(),
            weights: Vec::new(),
            old_indices: Vec::new(),
            old_weights: Vec::new(),
            transform: DMat4::IDENTITY,
            transform_link: DMat4::IDENTITY,
            link: None,
            skin: None,
        }
    }
}

impl Cluster {
    pub fn parse(element: &Element) -> Result<Self> {
        let mut cluster = Self::default();
        if let Some(p) = element.child_property("Indexes") {
            cluster.old_indices = p.to_i32_vec()?;
        }
        if let Some(p) = element.child_property("Weights") {
            cluster.old_weights = p.to_f64_vec()?;
        }
        if let Some(m) = element.child_property("Transform") {
            cluster.transform = m.to_dmat4()?.unwrap_or(DMat4::IDENTITY);
        }
        if let Some(m) = element.child_property("TransformLink") {
            cluster.transform_link = m.to_dmat4()?.unwrap_or(DMat4::IDENTITY);
        }
        Ok(cluster)
    }
}

/// Expand every cluster's control point weights to polygon corners.
///
/// Runs after linking; clusters not attached to a skin are left untouched.
pub(crate) fn postprocess_clusters(scene: &mut Scene) -> Result<()> {
    let clusters: Vec<(ObjectId, ObjectId)> = scene
        .objects()
        .filter_map(|o| Some((o.id(), o.as_cluster()?.skin?)))
        .collect();

    for (id, skin) in clusters {
        let fail = |reason: String| Error::ClusterPostprocess { id, reason };

        let geometry_id = scene
            .find_link(skin, ObjectType::Geometry)
            .map(|o| o.id())
            .ok_or_else(|| fail(format!("skin {skin} is not attached to a geometry")))?;
        let (old_indices, old_weights) = match scene.cluster(id) {
            Some(c) => (c.old_indices.clone(), c.old_weights.clone()),
            None => continue,
        };
        if old_indices.len() != old_weights.len() {
            return Err(fail(format!(
                "{} indices but {} weights",
                old_indices.len(),
                old_weights.len()
            )));
        }

        let geometry = scene
            .object_mut(geometry_id)
            .and_then(|o| o.as_geometry_mut())
            .ok_or_else(|| fail(format!("object {geometry_id} is not a geometry")))?;

        let mut indices = Vec::new();
        let mut weights = Vec::new();
        for (&cp, &weight) in old_indices.iter().zip(&old_weights) {
            let control_point = usize::try_from(cp)
                .ok()
                .filter(|&i| i < geometry.control_point_count())
                .ok_or_else(|| {
                    fail(format!(
                        "control point {cp} out of range 0..{}",
                        geometry.control_point_count()
                    ))
                })?;
            let corners: Vec<u32> = geometry.corners_of(control_point).to_vec();
            for corner in corners {
                indices.push(corner);
                weights.push(weight);
                geometry.add_blend_weight(corner, BlendWeight { cluster: id, weight });
            }
        }
        trace!(cluster = id, geometry = geometry_id, corners = indices.len(), "cluster expanded");

        if let Some(cluster) = scene.object_mut(id).and_then(|o| o.as_cluster_mut()) {
            cluster.indices = indices;
            cluster.weights = weights;
        }
    }

    debug!("cluster postprocess done");
    Ok(())
}
