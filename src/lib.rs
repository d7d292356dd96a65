pub mod read_from;
pub mod error;

pub mod buffer;
pub mod glb;
pub mod ground;
pub mod model;
pub mod record;
pub mod scene;

pub use crate::error::{Error, Result};
pub use crate::model::ProppedModel;
