//! Geometry objects (`Geometry` elements with class `Mesh`).

use smallvec::SmallVec;
use tracing::{trace, warn};

use super::vertex_data::{
    remap, splat, triangulate, MeshTopology, VertexDataMapping, VertexDataReference,
};
use crate::format::{Element, Property};
use crate::scene::ObjectId;
use crate::util::{DVec2, DVec3, DVec4, Error, Result};

/// Number of UV sets kept per geometry.
pub const MAX_UV_SETS: usize = 4;

/// One skin influence on a polygon corner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BlendWeight {
    pub cluster: ObjectId,
    pub weight: f64,
}

/// Mesh data expanded into the polygon-corner domain.
///
/// `vertices`, `normals`, `tangents`, `uvs` and `colors` all have one entry
/// per polygon corner (or are empty), and `faces` indexes into them.
#[derive(Clone, Debug, Default)]
pub struct Geometry {
    /// Control points as stored in `Vertices`.
    pub control_points: Vec<DVec3>,
    pub vertices: Vec<DVec3>,
    pub normals: Vec<DVec3>,
    pub tangents: Vec<DVec3>,
    pub uvs: [Vec<DVec2>; MAX_UV_SETS],
    pub colors: Vec<DVec4>,
    /// Triangle list into the corner domain.
    pub faces: Vec<u32>,
    /// Material index per triangle.
    pub materials: Vec<i32>,
    pub topology: MeshTopology,
    /// Control point → corners referencing it.
    corners_by_vertex: Vec<SmallVec<[u32; 4]>>,
    pub skin: Option<ObjectId>,
    /// Per-corner skin influences, filled after linking.
    pub blend_weights: Vec<SmallVec<[BlendWeight; 4]>>,
}

impl Geometry {
    /// Decode a `Geometry` element.
    ///
    /// With `triangulate == false` the per-corner arrays are still built but
    /// `faces` and `materials` stay empty.
    pub fn parse(element: &Element, triangulate_faces: bool) -> Result<Self> {
        let control_points = element
            .child_property("Vertices")
            .ok_or_else(|| Error::invalid("Geometry without Vertices"))?
            .to_dvec3_vec()?;
        let polygon_vertex_index = element
            .child_property("PolygonVertexIndex")
            .ok_or_else(|| Error::invalid("Geometry without PolygonVertexIndex"))?
            .to_i32_vec()?;

        let mut topology = triangulate(&polygon_vertex_index);
        let vertices = remap(&control_points, &topology.corner_vertices);

        let mut corners_by_vertex = vec![SmallVec::new(); control_points.len()];
        for (corner, &cp) in topology.corner_vertices.iter().enumerate() {
            if let Some(list) = usize::try_from(cp).ok().and_then(|cp| corners_by_vertex.get_mut(cp)) {
                list.push(corner as u32);
            }
        }

        let mut geom = Geometry {
            control_points,
            vertices,
            corners_by_vertex,
            ..Geometry::default()
        };

        if let Some(layer) = element.child("LayerElementNormal") {
            geom.normals = read_layer(layer, "Normals", "NormalsIndex", Property::to_dvec3_vec, &topology)?;
        }
        if let Some(layer) = element.child("LayerElementTangent") {
            let (data, index) = if layer.child("Tangents").is_some() {
                ("Tangents", "TangentsIndex")
            } else {
                ("Tangent", "TangentIndex")
            };
            geom.tangents = read_layer(layer, data, index, Property::to_dvec3_vec, &topology)?;
        }
        for layer in element.children_named("LayerElementUV") {
            let set = layer.property(0).map_or(0, Property::to_i64);
            let Some(slot) = usize::try_from(set).ok().filter(|&s| s < MAX_UV_SETS) else {
                warn!(set, "UV set index out of range, skipped");
                continue;
            };
            geom.uvs[slot] = read_layer(layer, "UV", "UVIndex", Property::to_dvec2_vec, &topology)?;
        }
        if let Some(layer) = element.child("LayerElementColor") {
            geom.colors = read_layer(layer, "Colors", "ColorIndex", Property::to_dvec4_vec, &topology)?;
        }

        if triangulate_faces {
            geom.materials = read_materials(element, &topology)?;
            geom.faces = std::mem::take(&mut topology.faces);
        } else {
            topology.faces.clear();
            topology.triangle_polygons.clear();
        }
        geom.topology = topology;

        trace!(
            control_points = geom.control_points.len(),
            corners = geom.vertices.len(),
            triangles = geom.faces.len() / 3,
            "parsed geometry"
        );
        Ok(geom)
    }

    /// Control point a polygon corner refers to.
    #[inline]
    pub fn old_vertex(&self, corner: usize) -> Option<i32> {
        self.topology.corner_vertices.get(corner).copied()
    }

    /// Control point of every polygon corner.
    #[inline]
    pub fn old_vertices(&self) -> &[i32] {
        &self.topology.corner_vertices
    }

    /// Corners referencing a control point.
    pub fn corners_of(&self, control_point: usize) -> &[u32] {
        self.corners_by_vertex.get(control_point).map(|c| c.as_slice()).unwrap_or(&[])
    }

    #[inline]
    pub fn control_point_count(&self) -> usize {
        self.control_points.len()
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.faces.len() / 3
    }

    #[inline]
    pub fn has_normals(&self) -> bool {
        !self.normals.is_empty()
    }

    /// Record a skin influence on a corner.
    pub(crate) fn add_blend_weight(&mut self, corner: u32, weight: BlendWeight) {
        if self.blend_weights.len() < self.vertices.len() {
            self.blend_weights.resize(self.vertices.len(), SmallVec::new());
        }
        if let Some(slot) = self.blend_weights.get_mut(corner as usize) {
            slot.push(weight);
        }
    }
}

fn read_layer<T: Copy + bytemuck::Zeroable>(
    layer: &Element,
    data_name: &str,
    index_name: &str,
    decode: impl Fn(&Property) -> Result<Vec<T>>,
    topology: &MeshTopology,
) -> Result<Vec<T>> {
    let Some(mapping) = layer_mapping(layer) else {
        return Ok(Vec::new());
    };
    let Some(data) = layer.child_property(data_name) else {
        warn!(layer = %layer.id, data_name, "layer element without data");
        return Ok(Vec::new());
    };
    let data = decode(data)?;
    let indices = layer_indices(layer, index_name)?;
    Ok(splat(mapping, &data, &indices, topology))
}

fn layer_mapping(layer: &Element) -> Option<VertexDataMapping> {
    let name = layer.child_property("MappingInformationType")?.to_str();
    let mapping = VertexDataMapping::parse(&name);
    if mapping.is_none() {
        warn!(layer = %layer.id, mapping = %name, "unsupported mapping, layer skipped");
    }
    mapping
}

fn layer_indices(layer: &Element, index_name: &str) -> Result<Vec<i32>> {
    let reference = layer
        .child_property("ReferenceInformationType")
        .and_then(|p| VertexDataReference::parse(&p.to_str()))
        .unwrap_or(VertexDataReference::Direct);
    match (reference, layer.child_property(index_name)) {
        (VertexDataReference::IndexToDirect, Some(indices)) => indices.to_i32_vec(),
        _ => Ok(Vec::new()),
    }
}

/// Per-triangle material indices from the first `LayerElementMaterial`.
fn read_materials(element: &Element, topology: &MeshTopology) -> Result<Vec<i32>> {
    let Some(layer) = element.child("LayerElementMaterial") else {
        return Ok(Vec::new());
    };
    let values = layer.child_property("Materials").map_or(Ok(Vec::new()), Property::to_i32_vec)?;
    let mapping = layer
        .child_property("MappingInformationType")
        .and_then(|p| VertexDataMapping::parse(&p.to_str()));

    Ok(match mapping {
        Some(VertexDataMapping::ByPolygon) => topology
            .triangle_polygons
            .iter()
            .map(|&p| values.get(p as usize).copied().unwrap_or(0))
            .collect(),
        _ => vec![values.first().copied().unwrap_or(0); topology.triangle_count()],
    })
}
