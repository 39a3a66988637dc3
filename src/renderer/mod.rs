//! Rendering module
//!
//! `scene` decides what to draw, `shapes` turns it into triangles and
//! `pipeline` pushes them through WebGPU.

pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use pipeline::RenderState;
pub use scene::{DrawCmd, Scene, compose};
pub use shapes::tessellate;
