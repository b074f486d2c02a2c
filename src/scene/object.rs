//! Scene objects.
//!
//! Every child of the `Objects` section that the reader understands becomes
//! one [`Object`]: the shared header (ID, name, node attribute) plus an
//! [`ObjectKind`] payload. Cross-references between objects are stored as
//! [`ObjectId`] handles and resolved through the [`Scene`](super::Scene).

use crate::anim::{AnimationCurve, AnimationCurveNode, AnimationLayer, AnimationStack};
use crate::format::{Element, Property};
use crate::geom::{Cluster, Geometry, Material, Mesh, Skin, Texture};

/// 64-bit object identifier as declared in the file. `0` is the root.
pub type ObjectId = u64;

/// ID reserved for the scene root.
pub const ROOT_ID: ObjectId = 0;

/// Discriminant of an [`ObjectKind`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ObjectType {
    Root,
    Geometry,
    Material,
    Mesh,
    Texture,
    LimbNode,
    NullNode,
    NodeAttribute,
    Cluster,
    Skin,
    AnimationStack,
    AnimationLayer,
    AnimationCurve,
    AnimationCurveNode,
}

/// `NodeAttribute` payload.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NodeAttribute {
    /// `TypeFlags`, e.g. `Skeleton`, `Light`, `Camera`.
    pub attribute_type: String,
}

impl NodeAttribute {
    pub fn parse(element: &Element) -> Self {
        let attribute_type = element
            .child_property("TypeFlags")
            .map(|p| p.to_str().into_owned())
            .unwrap_or_default();
        Self { attribute_type }
    }
}

/// Typed payload of a scene object.
#[derive(Clone, Debug)]
pub enum ObjectKind {
    Root,
    Null,
    LimbNode,
    Mesh(Mesh),
    Geometry(Geometry),
    Material(Material),
    Texture(Texture),
    Skin(Skin),
    Cluster(Cluster),
    NodeAttribute(NodeAttribute),
    AnimationStack(AnimationStack),
    AnimationLayer(AnimationLayer),
    AnimationCurveNode(AnimationCurveNode),
    AnimationCurve(AnimationCurve),
}

impl ObjectKind {
    pub fn object_type(&self) -> ObjectType {
        match self {
            Self::Root => ObjectType::Root,
            Self::Null => ObjectType::NullNode,
            Self::LimbNode => ObjectType::LimbNode,
            Self::Mesh(_) => ObjectType::Mesh,
            Self::Geometry(_) => ObjectType::Geometry,
            Self::Material(_) => ObjectType::Material,
            Self::Texture(_) => ObjectType::Texture,
            Self::Skin(_) => ObjectType::Skin,
            Self::Cluster(_) => ObjectType::Cluster,
            Self::NodeAttribute(_) => ObjectType::NodeAttribute,
            Self::AnimationStack(_) => ObjectType::AnimationStack,
            Self::AnimationLayer(_) => ObjectType::AnimationLayer,
            Self::AnimationCurveNode(_) => ObjectType::AnimationCurveNode,
            Self::AnimationCurve(_) => ObjectType::AnimationCurve,
        }
    }
}

/// A scene object.
#[derive(Clone, Debug)]
pub struct Object {
    pub(crate) id: ObjectId,
    pub(crate) name: String,
    /// Index into the `Objects` section; `None` for the root.
    pub(crate) element: Option<usize>,
    pub(crate) node_attribute: Option<ObjectId>,
    pub kind: ObjectKind,
}

macro_rules! kind_accessors {
    ($($variant:ident => $get:ident, $get_mut:ident: $ty:ty;)*) => {
        $(
            pub fn $get(&self) -> Option<&$ty> {
                match &self.kind {
                    ObjectKind::$variant(v) => Some(v),
                    _ => None,
                }
            }

            pub(crate) fn $get_mut(&mut self) -> Option<&mut $ty> {
                match &mut self.kind {
                    ObjectKind::$variant(v) => Some(v),
                    _ => None,
                }
            }
        )*
    };
}

impl Object {
    pub fn new(id: ObjectId, name: impl Into<String>, element: Option<usize>, kind: ObjectKind) -> Self {
        Self { id, name: name.into(), element, node_attribute: None, kind }
    }

    pub(crate) fn root() -> Self {
        Self::new(ROOT_ID, "RootNode", None, ObjectKind::Root)
    }

    #[inline]
    pub fn id(&self) -> ObjectId {
        self.id
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn object_type(&self) -> ObjectType {
        self.kind.object_type()
    }

    /// Whether this object takes part in the transform hierarchy.
    pub fn is_node(&self) -> bool {
        matches!(
            self.kind,
            ObjectKind::Root | ObjectKind::Null | ObjectKind::LimbNode | ObjectKind::Mesh(_)
        )
    }

    #[inline]
    pub fn node_attribute(&self) -> Option<ObjectId> {
        self.node_attribute
    }

    /// Index of the source element within the `Objects` section.
    #[inline]
    pub fn element_index(&self) -> Option<usize> {
        self.element
    }

    kind_accessors! {
        Mesh => as_mesh, as_mesh_mut: Mesh;
        Geometry => as_geometry, as_geometry_mut: Geometry;
        Material => as_material, as_material_mut: Material;
        Texture => as_texture, as_texture_mut: Texture;
        Skin => as_skin, as_skin_mut: Skin;
        Cluster => as_cluster, as_cluster_mut: Cluster;
        NodeAttribute => as_node_attribute, as_node_attribute_mut: NodeAttribute;
        AnimationStack => as_animation_stack, as_animation_stack_mut: AnimationStack;
        AnimationLayer => as_animation_layer, as_animation_layer_mut: AnimationLayer;
        AnimationCurveNode => as_animation_curve_node, as_animation_curve_node_mut: AnimationCurveNode;
        AnimationCurve => as_animation_curve, as_animation_curve_mut: AnimationCurve;
    }
}

/// Display name from the second property of an object element.
///
/// Binary files store `Name\0\x01Class`, ASCII files `Class::Name`.
pub fn object_name(property: Option<&Property>) -> String {
    let Some(property) = property else { return String::new() };
    let raw = property.to_str();
    if let Some((name, _class)) = raw.split_once("\u{0}\u{1}") {
        return name.to_string();
    }
    if let Some((_class, name)) = raw.split_once("::") {
        return name.to_string();
    }
    raw.into_owned()
}
