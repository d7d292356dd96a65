//! Error types for scene loading and buffer decoding.

use std::io;
use thiserror::Error;

/// Errors that can occur while reading a glTF scene.
#[derive(Debug, Error)]
pub enum Error {
    /// The scene file could not be read
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The scene document is not valid glTF JSON
    #[error("invalid glTF document: {0}")]
    Parse(#[from] gltf_json::Error),

    /// The binary glTF container is malformed
    #[error("invalid GLB container: {0}")]
    Glb(String),

    /// A buffer payload could not be located or decoded
    #[error("buffer {index} unavailable: {reason}")]
    MissingBuffer { index: usize, reason: String },

    /// A mesh index points outside the document's meshes
    #[error("invalid mesh index {0}")]
    InvalidMesh(usize),

    /// Accessor, buffer view or attribute metadata is absent or unusable
    #[error("invalid accessor: {0}")]
    InvalidAccessor(String),
}

pub type Result<T> = std::result::Result<T, Error>;
