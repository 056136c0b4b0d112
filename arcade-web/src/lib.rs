//! Arcade Web - hand-tracking minigames on a WebGPU canvas
//!
//! Entry point for WASM module. Only contains:
//! - Module declarations
//! - wasm_bindgen entry points that delegate to submodules

pub mod bridge;
pub mod physics;
pub mod effects;
pub mod paint;
pub mod modes;
pub mod engine;
pub mod net;

#[cfg(target_arch = "wasm32")]
mod renderer;

use wasm_bindgen::prelude::*;

// Re-export wasm_bindgen functions for JS access
pub use bridge::{configure, on_frame};

// ============================================================================
// WASM ENTRY POINTS
// ============================================================================

/// Called automatically when WASM module loads
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
    bridge::init_logger(log::LevelFilter::Info);
}

/// Initialize WebGPU on the canvas with this id, sized to the engine's
/// current canvas size. Call after `configure`.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub async fn init_renderer(canvas_id: String) -> Result<(), JsValue> {
    let canvas = bridge::with_engine(|e| Ok(e.session().canvas()))?;
    renderer::initialize_gpu(&canvas_id, canvas).await?;
    Ok(())
}

/// Draw the last processed frame
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn render_frame() {
    let drawn = bridge::with_engine(|e| {
        renderer::render_draw_list(e.draw_list(), e.session().canvas());
        Ok(())
    });
    if let Err(e) = drawn {
        log::debug!("render skipped: {}", e);
    }
}
