//! End-to-end decoding of synthesized binary files.

mod common;

use common::*;
use fbx::geom::TextureSlot;
use fbx::scene::TimeMode;
use fbx::util::{Color, DVec2, DVec3};
use fbx::{Error, LoadOptions, ObjectType, Scene};

fn load(nodes: &[Node], writer: Writer) -> fbx::Result<Scene> {
    init_logging();
    fbx::load_bytes(&writer.file(nodes))
}

#[test]
fn test_quad_end_to_end() {
    for version in [7400, 7500] {
        let scene = load(&quad_scene(), Writer::new(version)).unwrap();

        assert_eq!(scene.version(), Some(7400));
        assert_eq!(scene.meshes().count(), 1);
        let mesh = scene.mesh(200).unwrap();
        assert_eq!(mesh.geometry, Some(100));
        assert_eq!(mesh.materials, vec![300]);
        assert_eq!(scene.object(200).unwrap().name(), "Quad");

        let g = scene.geometry(100).unwrap();
        assert_eq!(g.faces, vec![0, 1, 2, 0, 2, 3]);
        assert_eq!(g.vertices.len(), 4);
        assert_eq!(g.vertices[2], DVec3::new(1.0, 1.0, 0.0));
        assert_eq!(g.normals, vec![DVec3::Z; 4]);
        assert_eq!(g.uvs[0][3], DVec2::new(0.0, 1.0));
        assert!(g.uvs[1].is_empty());
        assert_eq!(g.materials, vec![0, 0]);
        assert_eq!(g.triangle_count(), 2);

        let global = scene.global_transform(200);
        assert_eq!(global.transform_point3(DVec3::ZERO), DVec3::new(1.0, 2.0, 3.0));

        assert_eq!(scene.material(300).unwrap().diffuse_color, Color::new(0.0, 0.0, 1.0));
        assert_eq!(scene.settings().up_axis, 2);
        assert_eq!(scene.settings().time_mode, TimeMode::Frames30);
        assert_eq!(scene.frame_rate(), Some(30.0));
        assert_eq!(scene.settings().unit_scale_factor, 2.54);
    }
}

#[test]
fn test_compressed_arrays_match_raw() {
    let raw = load(&quad_scene(), Writer::new(7500)).unwrap();
    let zlib = load(&quad_scene(), Writer::new(7500).compressed()).unwrap();

    let (a, b) = (raw.geometry(100).unwrap(), zlib.geometry(100).unwrap());
    assert_eq!(a.vertices, b.vertices);
    assert_eq!(a.faces, b.faces);
    assert_eq!(a.normals, b.normals);
    assert_eq!(a.uvs, b.uvs);
}

#[test]
fn test_array_limit() {
    init_logging();
    let data = Writer::new(7400).file(&quad_scene());
    // 12 doubles of control points exceed a 64 byte ceiling
    let options = LoadOptions::new().max_array_bytes(64);
    assert!(matches!(
        fbx::load_with_options(data.as_slice(), &options),
        Err(Error::ArrayTooLarge { declared: 96, max: 64 })
    ));
}

#[test]
fn test_ignore_geometry() {
    init_logging();
    let data = Writer::new(7400).file(&quad_scene());
    let options = LoadOptions::new().ignore_geometry(true);
    let scene = fbx::load_with_options(data.as_slice(), &options).unwrap();
    assert_eq!(scene.mesh(200).unwrap().geometry, Some(100));
    assert!(scene.geometry(100).unwrap().vertices.is_empty());
}

#[test]
fn test_without_triangulation() {
    init_logging();
    let data = Writer::new(7400).file(&quad_scene());
    let options = LoadOptions::new().triangulate(false);
    let scene = fbx::load_with_options(data.as_slice(), &options).unwrap();
    let g = scene.geometry(100).unwrap();
    assert!(g.faces.is_empty());
    assert_eq!(g.vertices.len(), 4);
}

#[test]
fn test_node_attribute_links() {
    let mut nodes = quad_scene();
    let attribute = object("NodeAttribute", 400, "Attr", "Null", vec![leaf("TypeFlags", s("Null"))]);
    nodes[2].children.push(attribute.clone());
    nodes[3].children.push(oo(400, 200));

    let scene = load(&nodes, Writer::new(7400)).unwrap();
    assert_eq!(scene.object(200).unwrap().node_attribute(), Some(400));
    assert_eq!(scene.node_attribute(400).unwrap().attribute_type, "Null");

    let mut second = attribute;
    second.props[0] = P::I64(401);
    nodes[2].children.push(second);
    nodes[3].children.push(oo(401, 200));
    assert!(matches!(
        load(&nodes, Writer::new(7400)),
        Err(Error::AlreadyLinked { id: 200, .. })
    ));
}

#[test]
fn test_textures() {
    let mut nodes = quad_scene();
    nodes[2].children.push(object(
        "Texture",
        500,
        "Albedo",
        "",
        vec![leaf("FileName", s("/textures/albedo.png")), leaf("RelativeFilename", s("albedo.png"))],
    ));
    nodes[3].children.push(op(500, 300, "DiffuseColor"));

    let scene = load(&nodes, Writer::new(7500)).unwrap();
    let material = scene.material(300).unwrap();
    let texture = material.texture(TextureSlot::Diffuse).and_then(|t| scene.texture(t)).unwrap();
    assert_eq!(texture.relative_file_name, "albedo.png");
    assert_eq!(scene.find_link(500, ObjectType::Material).map(|o| o.id()), Some(300));
}

#[test]
fn test_skinned_quad() {
    let mut nodes = quad_scene();
    let objects = &mut nodes[2].children;
    objects.push(object("Model", 600, "Bone", "LimbNode", vec![]));
    objects.push(object("Deformer", 700, "Skin", "Skin", vec![]));
    objects.push(object(
        "Deformer",
        701,
        "Cluster",
        "Cluster",
        vec![
            leaf("Indexes", P::I32s(vec![0, 2])),
            leaf("Weights", P::F64s(vec![1.0, 0.25])),
        ],
    ));
    nodes[3].children.extend([oo(600, 0), oo(700, 100), oo(701, 700), oo(600, 701)]);

    let scene = load(&nodes, Writer::new(7500)).unwrap();
    let cluster = scene.cluster(701).unwrap();
    assert_eq!(cluster.link, Some(600));
    assert_eq!(cluster.indices, vec![0, 2]);
    assert_eq!(cluster.weights, vec![1.0, 0.25]);

    let g = scene.geometry(100).unwrap();
    assert_eq!(g.skin, Some(700));
    assert_eq!(g.blend_weights[2][0].weight, 0.25);
    assert!(g.blend_weights[1].is_empty());
    assert_eq!(g.old_vertices(), &[0, 1, 2, 3]);
}

#[test]
fn test_unsupported_connection() {
    let mut nodes = quad_scene();
    nodes[3].children.push(node("C", vec![s("PP"), P::I64(1), P::I64(2)], vec![]));
    assert!(matches!(
        load(&nodes, Writer::new(7400)),
        Err(Error::UnsupportedConnection(kind)) if kind == "PP"
    ));
}

#[test]
fn test_truncated_file() {
    init_logging();
    let data = Writer::new(7400).file(&quad_scene());
    let cut = &data[..data.len() / 2];
    assert!(fbx::load_bytes(cut).is_err());
}

#[test]
fn test_load_file() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("quad.fbx");
    std::fs::write(&path, Writer::new(7500).file(&quad_scene())).unwrap();

    let scene = fbx::load_file(&path).unwrap();
    assert_eq!(scene.geometry(100).unwrap().faces.len(), 6);
    assert!(matches!(fbx::load_file(dir.path().join("missing.fbx")), Err(Error::Io(_))));
}
