use std::fs;
use std::path::{Path, PathBuf};
use gltf_json::{Root, Node};
use gltf_json::accessor::{self, ComponentType, GenericComponentType};
use gltf_json::mesh::Semantic;
use gltf_json::validation::Checked;
use log::{debug, warn};
use crate::buffer;
use crate::error::{Error, Result};
use crate::glb;


/// A parsed glTF document together with the payloads of all its buffers.
///
/// Every buffer is loaded when the scene is opened, so nothing after construction touches the
/// file system.  A buffer that cannot be loaded does not fail construction; the failure is kept
/// and reported by the queries that need that buffer.
pub struct SceneFile {
    root: Root,
    buffers: Vec<std::result::Result<Vec<u8>, String>>,
}

impl SceneFile {
    /// Read a `.gltf` (JSON) or `.glb` (binary container) scene.  Relative buffer URIs are
    /// resolved against the directory containing `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<SceneFile> {
        let path = path.as_ref();
        let data = fs::read(path)?;
        let resource_dir = path.parent().map(Path::to_owned).unwrap_or_else(PathBuf::new);

        if glb::is_glb(&data) {
            let glb = glb::split(&data)?;
            let root = Root::from_slice(glb.json)?;
            Ok(SceneFile::from_root(root, &resource_dir, glb.bin))
        } else {
            let root = Root::from_slice(&data)?;
            Ok(SceneFile::from_root(root, &resource_dir, None))
        }
    }

    /// Wrap an already parsed document.  `bin` is the embedded binary chunk, if any; it backs
    /// buffer 0 when that buffer has no URI.
    pub fn from_root(root: Root, resource_dir: &Path, bin: Option<&[u8]>) -> SceneFile {
        let buffers = root.buffers.iter().enumerate().map(|(i, b)| {
            let r = load_buffer(b.uri.as_deref(), i, resource_dir, bin);
            match r {
                Ok(ref data) => debug!("buffer {}: loaded {} bytes", i, data.len()),
                Err(ref e) => warn!("buffer {}: {}", i, e),
            }
            r
        }).collect();
        SceneFile { root, buffers }
    }

    pub fn root(&self) -> &Root {
        &self.root
    }

    pub fn nodes(&self) -> &[Node] {
        &self.root.nodes
    }

    /// Name of mesh `idx`, or `None` if the index is out of range or the mesh is unnamed.
    pub fn mesh_name(&self, idx: usize) -> Option<&str> {
        self.root.meshes.get(idx)?.name.as_deref()
    }

    pub fn buffer(&self, idx: usize) -> Result<&[u8]> {
        match self.buffers.get(idx) {
            Some(Ok(data)) => Ok(data),
            Some(Err(reason)) => Err(Error::MissingBuffer { index: idx, reason: reason.clone() }),
            None => Err(Error::MissingBuffer { index: idx, reason: "no such buffer".into() }),
        }
    }

    /// Decode the `POSITION` attribute of the first primitive of mesh `mesh_idx`.
    pub fn positions(&self, mesh_idx: usize) -> Result<Vec<[f32; 3]>> {
        let mesh = self.root.meshes.get(mesh_idx).ok_or(Error::InvalidMesh(mesh_idx))?;
        let prim = mesh.primitives.first().ok_or_else(|| Error::InvalidAccessor(
            format!("mesh {} has no primitives", mesh_idx)))?;
        let acc_idx = prim.attributes.get(&Checked::Valid(Semantic::Positions))
            .ok_or_else(|| Error::InvalidAccessor(
                format!("mesh {} has no POSITION attribute", mesh_idx)))?;

        let acc = self.root.accessors.get(acc_idx.value()).ok_or_else(|| Error::InvalidAccessor(
            format!("accessor {} does not exist", acc_idx.value())))?;
        let is_vec3 = matches!(acc.component_type,
            Checked::Valid(GenericComponentType(ComponentType::F32)))
            && matches!(acc.type_, Checked::Valid(accessor::Type::Vec3));
        if !is_vec3 {
            return Err(Error::InvalidAccessor(
                format!("accessor {} is not a FLOAT VEC3", acc_idx.value())));
        }

        let view_idx = acc.buffer_view.ok_or_else(|| Error::InvalidAccessor(
            format!("accessor {} has no buffer view", acc_idx.value())))?;
        let view = self.root.buffer_views.get(view_idx.value()).ok_or_else(|| {
            Error::InvalidAccessor(format!("buffer view {} does not exist", view_idx.value()))
        })?;

        let data = self.buffer(view.buffer.value())?;
        let start = view.byte_offset.as_ref().map_or(0, |x| x.0 as usize);
        let len = view.byte_length.0 as usize;
        let view_data = start.checked_add(len)
            .and_then(|end| data.get(start .. end))
            .ok_or_else(|| Error::InvalidAccessor(format!(
                "buffer view {} (offset {}, length {}) exceeds buffer {} of {} bytes",
                view_idx.value(), start, len, view.buffer.value(), data.len())))?;

        buffer::read_vec3s(
            view_data,
            acc.byte_offset.as_ref().map_or(0, |x| x.0 as usize),
            acc.count.0 as usize,
            view.byte_stride.as_ref().map(|s| s.0),
        )
    }
}

fn load_buffer(
    uri: Option<&str>,
    idx: usize,
    resource_dir: &Path,
    bin: Option<&[u8]>,
) -> std::result::Result<Vec<u8>, String> {
    match uri {
        Some(uri) if buffer::is_data_uri(uri) => buffer::decode_data_uri(uri),
        Some(uri) => {
            let path = resource_dir.join(uri);
            fs::read(&path).map_err(|e| format!("{}: {}", path.display(), e))
        },
        None => match bin {
            Some(bin) if idx == 0 => Ok(bin.to_vec()),
            _ => Err("buffer has no uri and no embedded binary chunk".into()),
        },
    }
}
