//! Shared fixtures: an in-memory binary FBX writer and log setup.

#![allow(dead_code)]

use std::io::Write;
use std::sync::Once;

use flate2::write::ZlibEncoder;
use flate2::Compression;

static INIT: Once = Once::new();

/// Route `tracing` output to the test harness; `RUST_LOG` selects the level.
pub fn init_logging() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

pub const SECOND: i64 = 46_186_158_000;

#[derive(Clone, Debug)]
pub enum P {
    I32(i32),
    I64(i64),
    F64(f64),
    Str(String),
    I32s(Vec<i32>),
    I64s(Vec<i64>),
    F64s(Vec<f64>),
    F32s(Vec<f32>),
}

pub fn s(v: &str) -> P {
    P::Str(v.to_string())
}

#[derive(Clone, Debug)]
pub struct Node {
    pub name: &'static str,
    pub props: Vec<P>,
    pub children: Vec<Node>,
}

pub fn node(name: &'static str, props: Vec<P>, children: Vec<Node>) -> Node {
    Node { name, props, children }
}

/// Leaf element holding one property.
pub fn leaf(name: &'static str, prop: P) -> Node {
    node(name, vec![prop], vec![])
}

/// `P` entry of a `Properties70` block.
pub fn p70(name: &str, ty: &str, values: &[f64]) -> Node {
    let mut props = vec![s(name), s(ty), s(""), s("A")];
    props.extend(values.iter().map(|&v| P::F64(v)));
    node("P", props, vec![])
}

/// Object header: ID, binary `Name\0\x01Class` name, class string.
pub fn object(label: &'static str, id: i64, name: &str, class: &str, children: Vec<Node>) -> Node {
    node(
        label,
        vec![P::I64(id), P::Str(format!("{name}\0\x01{label}")), s(class)],
        children,
    )
}

pub fn oo(from: i64, to: i64) -> Node {
    node("C", vec![s("OO"), P::I64(from), P::I64(to)], vec![])
}

pub fn op(from: i64, to: i64, property: &str) -> Node {
    node("C", vec![s("OP"), P::I64(from), P::I64(to), s(property)], vec![])
}

#[derive(Clone, Copy, Debug)]
pub struct Writer {
    pub version: u32,
    pub compress: bool,
}

impl Writer {
    pub fn new(version: u32) -> Self {
        Self { version, compress: false }
    }

    pub fn compressed(mut self) -> Self {
        self.compress = true;
        self
    }

    fn wide(&self) -> bool {
        self.version >= 7500
    }

    fn sentinel(&self) -> usize {
        if self.wide() { 25 } else { 13 }
    }

    fn offset(&self, out: &mut Vec<u8>, value: u64) {
        if self.wide() {
            out.extend_from_slice(&value.to_le_bytes());
        } else {
            out.extend_from_slice(&(value as u32).to_le_bytes());
        }
    }

    fn patch(&self, out: &mut [u8], at: usize, value: u64) {
        if self.wide() {
            out[at..at + 8].copy_from_slice(&value.to_le_bytes());
        } else {
            out[at..at + 4].copy_from_slice(&(value as u32).to_le_bytes());
        }
    }

    fn array(&self, out: &mut Vec<u8>, tag: u8, count: usize, raw: Vec<u8>) {
        out.push(tag);
        out.extend_from_slice(&(count as u32).to_le_bytes());
        let payload = if self.compress {
            let mut enc = ZlibEncoder::new(Vec::new(), Compression::default());
            enc.write_all(&raw).unwrap();
            enc.finish().unwrap()
        } else {
            raw
        };
        out.extend_from_slice(&u32::from(self.compress).to_le_bytes());
        out.extend_from_slice(&(payload.len() as u32).to_le_bytes());
        out.extend_from_slice(&payload);
    }

    fn property(&self, out: &mut Vec<u8>, p: &P) {
        match p {
            P::I32(v) => {
                out.push(b'I');
                out.extend_from_slice(&v.to_le_bytes());
            }
            P::I64(v) => {
                out.push(b'L');
                out.extend_from_slice(&v.to_le_bytes());
            }
            P::F64(v) => {
                out.push(b'D');
                out.extend_from_slice(&v.to_le_bytes());
            }
            P::Str(v) => {
                out.push(b'S');
                out.extend_from_slice(&(v.len() as u32).to_le_bytes());
                out.extend_from_slice(v.as_bytes());
            }
            P::I32s(v) => self.array(out, b'i', v.len(), v.iter().flat_map(|x| x.to_le_bytes()).collect()),
            P::I64s(v) => self.array(out, b'l', v.len(), v.iter().flat_map(|x| x.to_le_bytes()).collect()),
            P::F64s(v) => self.array(out, b'd', v.len(), v.iter().flat_map(|x| x.to_le_bytes()).collect()),
            P::F32s(v) => self.array(out, b'f', v.len(), v.iter().flat_map(|x| x.to_le_bytes()).collect()),
        }
    }

    fn node(&self, out: &mut Vec<u8>, n: &Node) {
        let start = out.len();
        self.offset(out, 0);
        self.offset(out, n.props.len() as u64);
        let len_at = out.len();
        self.offset(out, 0);
        out.push(n.name.len() as u8);
        out.extend_from_slice(n.name.as_bytes());

        let props_start = out.len();
        for p in &n.props {
            self.property(out, p);
        }
        let props_len = (out.len() - props_start) as u64;
        self.patch(out, len_at, props_len);

        if !n.children.is_empty() {
            for child in &n.children {
                self.node(out, child);
            }
            out.extend(std::iter::repeat(0).take(self.sentinel()));
        }
        let end = out.len() as u64;
        self.patch(out, start, end);
    }

    /// Complete file: header, top-level nodes, closing sentinel.
    pub fn file(&self, nodes: &[Node]) -> Vec<u8> {
        let mut out = b"Kaydara FBX Binary  \0".to_vec();
        out.extend_from_slice(&[0x1A, 0x00]);
        out.extend_from_slice(&self.version.to_le_bytes());
        for n in nodes {
            self.node(&mut out, n);
        }
        out.extend(std::iter::repeat(0).take(self.sentinel()));
        out
    }
}

/// A single quad mesh under the root, with normals by polygon vertex and
/// one material.
pub fn quad_scene() -> Vec<Node> {
    vec![
        node(
            "FBXHeaderExtension",
            vec![],
            vec![leaf("FBXVersion", P::I32(7400))],
        ),
        node(
            "GlobalSettings",
            vec![],
            vec![node(
                "Properties70",
                vec![],
                vec![
                    node("P", vec![s("UpAxis"), s("int"), s("Integer"), s(""), P::I32(2)], vec![]),
                    node("P", vec![s("TimeMode"), s("enum"), s(""), s(""), P::I32(6)], vec![]),
                    p70("UnitScaleFactor", "double", &[2.54]),
                ],
            )],
        ),
        node(
            "Objects",
            vec![],
            vec![
                object(
                    "Geometry",
                    100,
                    "Quad",
                    "Mesh",
                    vec![
                        leaf("Vertices", P::F64s(vec![
                            0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0, 0.0,
                        ])),
                        leaf("PolygonVertexIndex", P::I32s(vec![0, 1, 2, -4])),
                        node(
                            "LayerElementNormal",
                            vec![P::I32(0)],
                            vec![
                                leaf("MappingInformationType", s("ByVertice")),
                                leaf("ReferenceInformationType", s("Direct")),
                                leaf("Normals", P::F64s([0.0, 0.0, 1.0].repeat(4))),
                            ],
                        ),
                        node(
                            "LayerElementUV",
                            vec![P::I32(0)],
                            vec![
                                leaf("MappingInformationType", s("ByPolygonVertex")),
                                leaf("ReferenceInformationType", s("IndexToDirect")),
                                leaf("UV", P::F64s(vec![0.0, 0.0, 1.0, 0.0, 1.0, 1.0, 0.0, 1.0])),
                                leaf("UVIndex", P::I32s(vec![0, 1, 2, 3])),
                            ],
                        ),
                        node(
                            "LayerElementMaterial",
                            vec![P::I32(0)],
                            vec![
                                leaf("MappingInformationType", s("AllSame")),
                                leaf("ReferenceInformationType", s("IndexToDirect")),
                                leaf("Materials", P::I32s(vec![0])),
                            ],
                        ),
                    ],
                ),
                object(
                    "Model",
                    200,
                    "Quad",
                    "Mesh",
                    vec![node(
                        "Properties70",
                        vec![],
                        vec![p70("Lcl Translation", "Lcl Translation", &[1.0, 2.0, 3.0])],
                    )],
                ),
                object(
                    "Material",
                    300,
                    "Blue",
                    "",
                    vec![node(
                        "Properties70",
                        vec![],
                        vec![p70("DiffuseColor", "Color", &[0.0, 0.0, 1.0])],
                    )],
                ),
            ],
        ),
        node(
            "Connections",
            vec![],
            vec![oo(200, 0), oo(100, 200), oo(300, 200)],
        ),
    ]
}
