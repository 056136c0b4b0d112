//! Renderer module - WebGPU rendering of the frame's draw list
//!
//! Re-exports only. All logic in submodules.

mod state;
mod scene;
mod shapes;

pub use state::{initialize_gpu, GpuStateError};
pub use scene::{build_scene_vertices, render_draw_list};
