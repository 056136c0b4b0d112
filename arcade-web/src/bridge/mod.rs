//! Bridge module - JS ↔ Rust communication
//!
//! All #[wasm_bindgen] entry points live here.
//! Re-exports only in mod.rs, logic in submodules.

mod hand_landmarks;
mod logger;
mod js_collaborators;
mod engine_slot;

pub use hand_landmarks::{
    parse_hand_frame,
    HandFrame,
    Landmark,
    // Constants
    WRIST, THUMB_TIP, INDEX_TIP, MIDDLE_TIP, RING_TIP, PINKY_TIP,
    FINGERTIPS, HAND_SKELETON, LANDMARKS_PER_HAND, MAX_HANDS,
};

pub use logger::{init_logger, ConsoleLogger};
pub use js_collaborators::{JsAudio, JsNetwork, LocalStorageScores};

pub(crate) use engine_slot::with_engine;
pub use engine_slot::{
    configure, set_audio_callbacks, set_network_callback,
    start_game, pipeline_ready, pipeline_failed, end_game, set_mode,
    on_frame, push_peer_state, peer_left,
    set_player_name, set_music_enabled, set_paint_color, set_paint_size,
    set_eraser, clear_paint, resize,
    hud_text, debug_text, phase, labels_json, load_scores,
};
