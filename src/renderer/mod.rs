//! Rendering module
//!
//! `shapes` turns a round into a flat triangle list in arena pixels;
//! `pipeline` uploads it to a WebGPU surface.

pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use pipeline::{RenderState, arena_to_ndc, viewport_to_arena};
pub use shapes::build_scene;
pub use vertex::Vertex;
