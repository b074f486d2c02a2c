//! Three-phase scene construction.
//!
//! 1. instantiate one object per recognised `Objects` child
//! 2. link objects along the connection list, in file order
//! 3. postprocess clusters into per-corner skin weights

use std::collections::HashMap;

use tracing::{debug, trace, warn};

use super::connection::{parse_connections, Connection};
use super::object::{object_name, NodeAttribute, Object, ObjectKind, ObjectType, ROOT_ID};
use super::settings::{parse_takes, Settings};
use super::{LoadOptions, Scene};
use crate::anim::{AnimationCurve, AnimationCurveNode, AnimationLayer, AnimationStack, CurveBinding};
use crate::format::Element;
use crate::geom::{self, Cluster, Geometry, Material, Mesh, Skin, TextureSlot};
use crate::util::{Error, Result};

#[tracing::instrument(skip_all)]
pub(crate) fn build(document: Element, options: &LoadOptions) -> Result<Scene> {
    let connections = parse_connections(&document)?;
    let takes = parse_takes(&document)?;
    let settings = Settings::parse(&document);
    let objects_section = document.children.iter().position(|c| c.id == "Objects");

    let mut scene = Scene {
        document,
        objects_section,
        objects: Vec::new(),
        index: HashMap::new(),
        connections,
        settings,
        takes,
        meshes: Vec::new(),
        animation_stacks: Vec::new(),
    };

    instantiate(&mut scene, options)?;
    link(&mut scene)?;
    if options.ignore_geometry {
        debug!("geometry ignored, skipping cluster postprocess");
    } else {
        geom::postprocess_clusters(&mut scene)?;
    }

    debug!(
        objects = scene.objects.len(),
        connections = scene.connections.len(),
        meshes = scene.meshes.len(),
        stacks = scene.animation_stacks.len(),
        "scene built"
    );
    Ok(scene)
}

// ============================================================================
// Phase 1: instantiate
// ============================================================================

fn instantiate(scene: &mut Scene, options: &LoadOptions) -> Result<()> {
    let mut objects = vec![Object::root()];
    let mut index = HashMap::from([(ROOT_ID, 0)]);
    let mut meshes = Vec::new();
    let mut stacks = Vec::new();

    let section = scene.objects_section.and_then(|i| scene.document.children.get(i));
    for (i, element) in section.into_iter().flat_map(|s| s.children.iter().enumerate()) {
        let Some(id) = element.property(0).map(|p| p.to_u64()) else {
            warn!(label = %element.id, "object without an ID, skipped");
            continue;
        };
        let Some(kind) = object_kind(element, id, options)? else {
            trace!(id, label = %element.id, "unrecognised object skipped");
            continue;
        };

        if index.contains_key(&id) {
            return Err(Error::DuplicateObject(id));
        }
        match kind {
            ObjectKind::Mesh(_) => meshes.push(id),
            ObjectKind::AnimationStack(_) => stacks.push(id),
            _ => {}
        }
        trace!(id, ty = ?kind.object_type(), "instantiated");
        index.insert(id, objects.len());
        objects.push(Object::new(id, object_name(element.property(1)), Some(i), kind));
    }

    debug!(count = objects.len(), "objects instantiated");
    scene.objects = objects;
    scene.index = index;
    scene.meshes = meshes;
    scene.animation_stacks = stacks;
    Ok(())
}

/// Select the payload from the element label and its class string.
fn object_kind(element: &Element, id: u64, options: &LoadOptions) -> Result<Option<ObjectKind>> {
    let class = element.property(2).filter(|p| p.is_string()).map(|p| p.to_str());
    let class = class.as_deref().unwrap_or("");

    Ok(Some(match (element.id.as_str(), class) {
        ("Geometry", "Mesh") => {
            if options.ignore_geometry {
                ObjectKind::Geometry(Geometry::default())
            } else {
                ObjectKind::Geometry(Geometry::parse(element, options.triangulate)?)
            }
        }
        ("Material", _) => ObjectKind::Material(Material::parse(element)),
        ("Texture", _) => ObjectKind::Texture(geom::Texture::parse(element)),
        ("AnimationStack", _) => ObjectKind::AnimationStack(AnimationStack::default()),
        ("AnimationLayer", _) => ObjectKind::AnimationLayer(AnimationLayer::default()),
        ("AnimationCurve", _) => ObjectKind::AnimationCurve(AnimationCurve::parse(element, id)?),
        ("AnimationCurveNode", _) => ObjectKind::AnimationCurveNode(AnimationCurveNode::default()),
        ("Deformer", "Cluster") => ObjectKind::Cluster(Cluster::parse(element)?),
        ("Deformer", "Skin") => ObjectKind::Skin(Skin::default()),
        ("NodeAttribute", _) => ObjectKind::NodeAttribute(NodeAttribute::parse(element)),
        ("Model", "Mesh") => ObjectKind::Mesh(Mesh::default()),
        ("Model", "LimbNode") => ObjectKind::LimbNode,
        ("Model", "Null" | "Root") => ObjectKind::Null,
        _ => return Ok(None),
    }))
}

// ============================================================================
// Phase 2: link
// ============================================================================

fn link(scene: &mut Scene) -> Result<()> {
    let connections = std::mem::take(&mut scene.connections);
    let result = connections.iter().try_for_each(|c| link_one(scene, c));
    scene.connections = connections;
    result
}

fn link_one(scene: &mut Scene, c: &Connection) -> Result<()> {
    let (Some(child), Some(parent)) = (scene.object(c.from), scene.object(c.to)) else {
        warn!(from = c.from, to = c.to, "connection to unregistered object skipped");
        return Ok(());
    };
    let child_type = child.object_type();
    let parent_type = parent.object_type();
    let parent_is_node = parent.is_node();
    let (from, to) = (c.from, c.to);

    if child_type == ObjectType::NodeAttribute {
        let parent = node_mut(scene, to)?;
        if parent.node_attribute.is_some() {
            return Err(Error::AlreadyLinked { what: "node attribute", id: to });
        }
        parent.node_attribute = Some(from);
        return Ok(());
    }

    if child_type == ObjectType::AnimationCurveNode && parent_is_node {
        let curve_node = node_mut(scene, from)?
            .as_animation_curve_node_mut()
            .ok_or_else(|| Error::invalid("expected animation curve node"))?;
        curve_node.bone = Some(to);
        curve_node.bone_link_property = c.property.clone().unwrap_or_default();
        return Ok(());
    }

    match (parent_type, child_type) {
        (ObjectType::Mesh, ObjectType::Geometry) => {
            let mesh = payload(scene, to, Object::as_mesh_mut)?;
            if mesh.geometry.is_some() {
                return Err(Error::AlreadyLinked { what: "mesh geometry", id: to });
            }
            mesh.geometry = Some(from);
        }
        (ObjectType::Mesh, ObjectType::Material) => {
            payload(scene, to, Object::as_mesh_mut)?.materials.push(from);
        }
        (ObjectType::Skin, ObjectType::Cluster) => {
            let cluster = payload(scene, from, Object::as_cluster_mut)?;
            if cluster.skin.is_some() {
                return Err(Error::AlreadyLinked { what: "cluster skin", id: from });
            }
            cluster.skin = Some(to);
            payload(scene, to, Object::as_skin_mut)?.clusters.push(from);
        }
        (ObjectType::Material, ObjectType::Texture) => {
            let property = c.property.as_deref().unwrap_or("");
            let Some(slot) = TextureSlot::from_property(property) else {
                warn!(material = to, texture = from, property, "unsupported texture slot ignored");
                return Ok(());
            };
            let material = payload(scene, to, Object::as_material_mut)?;
            if material.texture(slot).is_some() {
                warn!(material = to, texture = from, ?slot, "texture slot already filled");
            } else {
                material.set_texture(slot, from);
            }
        }
        (ObjectType::Geometry, ObjectType::Skin) => {
            payload(scene, to, Object::as_geometry_mut)?.skin = Some(from);
        }
        (ObjectType::Cluster, ObjectType::LimbNode | ObjectType::Mesh | ObjectType::NullNode) => {
            let cluster = payload(scene, to, Object::as_cluster_mut)?;
            if cluster.link.is_some() {
                return Err(Error::AlreadyLinked { what: "cluster link", id: to });
            }
            cluster.link = Some(from);
        }
        (ObjectType::AnimationStack, ObjectType::AnimationLayer) => {
            payload(scene, to, Object::as_animation_stack_mut)?.layers.push(from);
        }
        (ObjectType::AnimationLayer, ObjectType::AnimationCurveNode) => {
            payload(scene, to, Object::as_animation_layer_mut)?.curve_nodes.push(from);
        }
        (ObjectType::AnimationCurveNode, ObjectType::AnimationCurve) => {
            let node = payload(scene, to, Object::as_animation_curve_node_mut)?;
            if node.curves.len() >= AnimationCurveNode::MAX_CURVES {
                return Err(Error::CurveSlotsFull(to));
            }
            node.curves.push(CurveBinding { curve: from, property: c.property.clone() });
        }
        _ => trace!(from, to, ?parent_type, ?child_type, "connection without effect"),
    }
    Ok(())
}

fn node_mut(scene: &mut Scene, id: u64) -> Result<&mut Object> {
    scene
        .object_mut(id)
        .ok_or_else(|| Error::invalid(format!("object {id} vanished during linking")))
}

fn payload<T>(
    scene: &mut Scene,
    id: u64,
    get: impl FnOnce(&mut Object) -> Option<&mut T>,
) -> Result<&mut T> {
    get(node_mut(scene, id)?).ok_or_else(|| Error::invalid(format!("object {id} has an unexpected type")))
}
