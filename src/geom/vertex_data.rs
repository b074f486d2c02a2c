//! Vertex attribute mapping and polygon triangulation.
//!
//! Layer elements (`LayerElementNormal`, `LayerElementUV`, ...) may be stored
//! per polygon corner, per polygon or per control point, optionally through a
//! side index array. Everything is expanded into the polygon-corner domain,
//! which is the domain [`MeshTopology::faces`] indexes.

use std::borrow::Cow;

use bytemuck::Zeroable;

/// `MappingInformationType` of a layer element.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VertexDataMapping {
    ByPolygonVertex,
    ByPolygon,
    ByVertex,
    AllSame,
}

impl VertexDataMapping {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "ByPolygonVertex" => Some(Self::ByPolygonVertex),
            "ByPolygon" => Some(Self::ByPolygon),
            "ByVertex" | "ByVertice" => Some(Self::ByVertex),
            "AllSame" => Some(Self::AllSame),
            _ => None,
        }
    }
}

/// `ReferenceInformationType` of a layer element.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VertexDataReference {
    Direct,
    IndexToDirect,
}

impl VertexDataReference {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Direct" => Some(Self::Direct),
            // "Index" is the pre-7.x spelling
            "IndexToDirect" | "Index" => Some(Self::IndexToDirect),
            _ => None,
        }
    }
}

/// Polygon structure decoded from `PolygonVertexIndex`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshTopology {
    /// Triangle list, three corner indices per triangle.
    pub faces: Vec<u32>,
    /// Corner → control point.
    pub corner_vertices: Vec<i32>,
    /// Corner → polygon.
    pub corner_polygons: Vec<u32>,
    /// Triangle → polygon.
    pub triangle_polygons: Vec<u32>,
    pub polygon_count: usize,
}

impl MeshTopology {
    #[inline]
    pub fn corner_count(&self) -> usize {
        self.corner_vertices.len()
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.faces.len() / 3
    }
}

/// Split a negative-terminated polygon index run into polygons and fan-triangulate them.
///
/// The last corner of each polygon is stored as `!index`. A trailing run
/// without a terminator is closed at the end of the array. Polygons with
/// fewer than three corners produce no triangles but keep their corners.
pub fn triangulate(polygon_vertex_index: &[i32]) -> MeshTopology {
    let mut topo = MeshTopology {
        corner_vertices: Vec::with_capacity(polygon_vertex_index.len()),
        corner_polygons: Vec::with_capacity(polygon_vertex_index.len()),
        ..MeshTopology::default()
    };

    let mut start = 0usize;
    for (corner, &raw) in polygon_vertex_index.iter().enumerate() {
        let is_last = raw < 0;
        topo.corner_vertices.push(if is_last { !raw } else { raw });
        topo.corner_polygons.push(topo.polygon_count as u32);

        if is_last || corner + 1 == polygon_vertex_index.len() {
            emit_fan(&mut topo, start, corner + 1);
            topo.polygon_count += 1;
            start = corner + 1;
        }
    }
    topo
}

fn emit_fan(topo: &mut MeshTopology, start: usize, end: usize) {
    let n = end - start;
    if n < 3 {
        return;
    }
    let polygon = topo.polygon_count as u32;
    for k in 1..n - 1 {
        topo.faces.extend_from_slice(&[start as u32, (start + k) as u32, (start + k + 1) as u32]);
        topo.triangle_polygons.push(polygon);
    }
}

/// Reorder `data` by `mapping`: `out[i] = data[mapping[i]]`.
///
/// Negative or out-of-range entries produce the zero value. Empty `data`
/// stays empty, so an absent attribute remains absent.
pub fn remap<T: Copy + Zeroable>(data: &[T], mapping: &[i32]) -> Vec<T> {
    if data.is_empty() {
        return Vec::new();
    }
    mapping
        .iter()
        .map(|&i| {
            usize::try_from(i)
                .ok()
                .and_then(|i| data.get(i))
                .copied()
                .unwrap_or_else(T::zeroed)
        })
        .collect()
}

/// Expand layer data into the polygon-corner domain.
///
/// `indices` is the `IndexToDirect` side array (empty for `Direct`).
pub fn splat<T: Copy + Zeroable>(
    mapping: VertexDataMapping,
    data: &[T],
    indices: &[i32],
    topology: &MeshTopology,
) -> Vec<T> {
    let direct: Cow<'_, [T]> = if indices.is_empty() {
        Cow::Borrowed(data)
    } else {
        Cow::Owned(remap(data, indices))
    };

    match mapping {
        VertexDataMapping::ByPolygonVertex => direct.into_owned(),
        VertexDataMapping::ByVertex => remap(&direct, &topology.corner_vertices),
        VertexDataMapping::ByPolygon => {
            if direct.is_empty() {
                return Vec::new();
            }
            topology
                .corner_polygons
                .iter()
                .map(|&p| direct.get(p as usize).copied().unwrap_or_else(T::zeroed))
                .collect()
        }
        VertexDataMapping::AllSame => match direct.first() {
            Some(&v) => vec![v; topology.corner_count()],
            None => Vec::new(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{DVec2, DVec3, DVec4};

    fn polygon(n: i32) -> Vec<i32> {
        let mut idx: Vec<i32> = (0..n).collect();
        if let Some(last) = idx.last_mut() {
            *last = !*last;
        }
        idx
    }

    #[test]
    fn test_triangulate_counts() {
        for n in 0..10 {
            let topo = triangulate(&polygon(n));
            let expected = if n >= 3 { 3 * (n as usize - 2) } else { 0 };
            assert_eq!(topo.faces.len(), expected, "n = {n}");
            assert_eq!(topo.corner_count(), n as usize);
        }
    }

    #[test]
    fn test_triangulate_fan() {
        // quad followed by a triangle
        let topo = triangulate(&[0, 1, 2, -4, 4, 5, -7]);
        assert_eq!(topo.polygon_count, 2);
        assert_eq!(topo.faces, vec![0, 1, 2, 0, 2, 3, 4, 5, 6]);
        assert_eq!(topo.triangle_polygons, vec![0, 0, 1]);
        assert_eq!(topo.corner_vertices, vec![0, 1, 2, 3, 4, 5, 6]);
        assert_eq!(topo.corner_polygons, vec![0, 0, 0, 0, 1, 1, 1]);
    }

    #[test]
    fn test_triangulate_degenerate() {
        let topo = triangulate(&[3, -2, 0, 1, -3]);
        assert_eq!(topo.polygon_count, 2);
        assert_eq!(topo.faces, vec![2, 3, 4]);
        assert_eq!(topo.triangle_polygons, vec![1]);
    }

    #[test]
    fn test_triangulate_unterminated_tail() {
        let topo = triangulate(&[0, 1, 2]);
        assert_eq!(topo.polygon_count, 1);
        assert_eq!(topo.triangle_count(), 1);
    }

    #[test]
    fn test_remap_out_of_range() {
        let v3 = [DVec3::new(1.0, 2.0, 3.0), DVec3::new(4.0, 5.0, 6.0)];
        assert_eq!(remap(&v3, &[1, 5, 0]), vec![v3[1], DVec3::ZERO, v3[0]]);

        let v2 = [DVec2::new(1.0, 2.0)];
        assert_eq!(remap(&v2, &[0, 1, -1]), vec![v2[0], DVec2::ZERO, DVec2::ZERO]);

        let v4 = [DVec4::ONE];
        assert_eq!(remap(&v4, &[3]), vec![DVec4::ZERO]);

        assert!(remap::<DVec3>(&[], &[0, 1]).is_empty());
    }

    #[test]
    fn test_splat_by_polygon_vertex() {
        let topo = triangulate(&polygon(3));
        let data = [DVec2::new(0.0, 0.0), DVec2::new(1.0, 0.0), DVec2::new(0.0, 1.0)];
        assert_eq!(splat(VertexDataMapping::ByPolygonVertex, &data, &[], &topo), data.to_vec());

        let indexed = splat(VertexDataMapping::ByPolygonVertex, &data, &[2, 2, 9], &topo);
        assert_eq!(indexed, vec![data[2], data[2], DVec2::ZERO]);
    }

    #[test]
    fn test_splat_by_vertex() {
        // two triangles sharing an edge, four control points
        let topo = triangulate(&[0, 1, -3, 2, 1, -4]);
        let data = [
            DVec3::new(0.0, 0.0, 1.0),
            DVec3::new(0.0, 1.0, 0.0),
            DVec3::new(1.0, 0.0, 0.0),
        ];
        let out = splat(VertexDataMapping::ByVertex, &data, &[], &topo);
        assert_eq!(out.len(), 6);
        assert_eq!(out[0], data[0]);
        assert_eq!(out[1], data[1]);
        assert_eq!(out[4], data[1]);
        // control point 3 has no entry
        assert_eq!(out[5], DVec3::ZERO);

        let mut by_hand = topo.clone();
        by_hand.corner_vertices[0] = -1;
        assert_eq!(splat(VertexDataMapping::ByVertex, &data, &[], &by_hand)[0], DVec3::ZERO);
    }

    #[test]
    fn test_splat_by_polygon() {
        let topo = triangulate(&[0, 1, -3, 2, 1, 3, -5]);
        let data = [1.0f64, 2.0];
        let out = splat(VertexDataMapping::ByPolygon, &data, &[], &topo);
        assert_eq!(out, vec![1.0, 1.0, 1.0, 2.0, 2.0, 2.0, 2.0]);

        let swapped = splat(VertexDataMapping::ByPolygon, &data, &[1, 0], &topo);
        assert_eq!(swapped[0], 2.0);
        assert_eq!(swapped[6], 1.0);
    }

    #[test]
    fn test_splat_all_same() {
        let topo = triangulate(&polygon(4));
        assert_eq!(splat(VertexDataMapping::AllSame, &[7i32], &[], &topo), vec![7; 4]);
    }

    #[test]
    fn test_mapping_names() {
        assert_eq!(VertexDataMapping::parse("ByVertice"), Some(VertexDataMapping::ByVertex));
        assert_eq!(VertexDataMapping::parse("ByEdge"), None);
        assert_eq!(VertexDataReference::parse("Index"), Some(VertexDataReference::IndexToDirect));
    }
}
