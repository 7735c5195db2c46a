//! Shared scene-graph data model produced by `scene_script`.

pub mod defs;
pub mod validate;

pub use defs::*;
pub use validate::{ValidationError, validate_story};
