#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;
use serde_json::{json, Value};
use tempfile::TempDir;

pub const FLOAT: u32 = 5126;

/// The footprint used by most tests: a 10 x 4 rectangle in the XZ plane.
pub const RECT: [[f32; 3]; 4] = [
    [0.0, 0.0, 0.0],
    [10.0, 0.0, 0.0],
    [10.0, 0.0, 4.0],
    [0.0, 0.0, 4.0],
];

pub fn vec3_bytes(vs: &[[f32; 3]], stride: usize) -> Vec<u8> {
    let mut out = Vec::new();
    for v in vs {
        for x in v {
            out.extend_from_slice(&x.to_le_bytes());
        }
        out.resize(out.len() + stride - 12, 0xee);
    }
    out
}

pub fn mesh(name: &str, accessor: usize) -> Value {
    json!({ "name": name, "primitives": [{ "attributes": { "POSITION": accessor } }] })
}

pub fn vec3_accessor(view: usize, count: usize) -> Value {
    json!({ "bufferView": view, "componentType": FLOAT, "count": count, "type": "VEC3" })
}

/// A scene with one position accessor over `bin`, stored next to it as `scene.bin`.
pub struct Fixture {
    pub nodes: Vec<Value>,
    pub meshes: Vec<Value>,
    pub accessors: Vec<Value>,
    pub views: Vec<Value>,
    pub buffers: Vec<Value>,
    pub bin: Vec<u8>,
}

impl Fixture {
    pub fn new(verts: &[[f32; 3]]) -> Fixture {
        let bin = vec3_bytes(verts, 12);
        Fixture {
            nodes: Vec::new(),
            meshes: Vec::new(),
            accessors: vec![vec3_accessor(0, verts.len())],
            views: vec![json!({ "buffer": 0, "byteLength": bin.len() })],
            buffers: vec![json!({ "uri": "scene.bin", "byteLength": bin.len() })],
            bin,
        }
    }

    pub fn node(mut self, node: Value) -> Fixture {
        self.nodes.push(node);
        self
    }

    pub fn mesh(mut self, name: &str) -> Fixture {
        self.meshes.push(mesh(name, 0));
        self
    }

    pub fn document(&self) -> Value {
        json!({
            "asset": { "version": "2.0" },
            "nodes": self.nodes,
            "meshes": self.meshes,
            "accessors": self.accessors,
            "bufferViews": self.views,
            "buffers": self.buffers,
        })
    }

    /// Write `scene.gltf` and `scene.bin` into a fresh temporary directory.
    pub fn write(&self) -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("scene.gltf");
        fs::write(&path, serde_json::to_vec(&self.document()).unwrap()).unwrap();
        fs::write(dir.path().join("scene.bin"), &self.bin).unwrap();
        (dir, path)
    }
}

fn push_chunk(out: &mut Vec<u8>, tag: &[u8; 4], data: &[u8], pad: u8) {
    let mut data = data.to_vec();
    while data.len() % 4 != 0 {
        data.push(pad);
    }
    out.extend_from_slice(&(data.len() as u32).to_le_bytes());
    out.extend_from_slice(tag);
    out.extend_from_slice(&data);
}

pub fn glb_bytes(doc: &Value, bin: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(b"glTF");
    out.extend_from_slice(&2_u32.to_le_bytes());
    out.extend_from_slice(&0_u32.to_le_bytes());
    push_chunk(&mut out, b"JSON", &serde_json::to_vec(doc).unwrap(), b' ');
    push_chunk(&mut out, b"BIN\0", bin, 0);
    let len = out.len() as u32;
    out[8 .. 12].copy_from_slice(&len.to_le_bytes());
    out
}
