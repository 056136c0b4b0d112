//! Engine slot and JS entry points
//!
//! The page owns the loop: the detector callback calls `on_frame`, toolbar
//! and lobby code call the setters. Peer events may arrive from socket
//! callbacks at any time, so they land in a separate inbox that is only
//! drained at frame start.

use std::cell::RefCell;

use wasm_bindgen::prelude::*;

use crate::engine::{self, Engine, EngineConfig, EngineError};
use crate::modes::ModeId;
use crate::net::{PeerEvent, PeerInbox};
use super::hand_landmarks::parse_hand_frame;
use super::js_collaborators::{JsAudio, JsNetwork, LocalStorageScores};
use super::logger::init_logger;

// Thread-local storage (WASM is single-threaded)
thread_local! {
    static ENGINE: RefCell<Option<Engine>> = const { RefCell::new(None) };
    static PEER_INBOX: RefCell<PeerInbox> = RefCell::new(PeerInbox::new());
}

/// Run against the configured engine. A JS callback that re-enters while a
/// frame holds the engine gets `Busy` instead of a borrow panic.
pub(crate) fn with_engine<T>(
    f: impl FnOnce(&mut Engine) -> engine::Result<T>,
) -> engine::Result<T> {
    ENGINE.with(|slot| {
        let mut slot = slot.try_borrow_mut().map_err(|_| EngineError::Busy)?;
        let engine = slot.as_mut().ok_or(EngineError::NotInitialized)?;
        f(engine)
    })
}

// ============================================================================
// SETUP
// ============================================================================

/// Create (or replace) the engine from a JSON config. Callbacks registered
/// on a previous engine must be registered again.
#[wasm_bindgen]
pub fn configure(config_json: &str) -> Result<(), JsValue> {
    let mut config = EngineConfig::from_json(config_json)?;
    init_logger(config.log_level());
    if config.seed.is_none() {
        config.seed = Some(js_sys::Date::now() as u64);
    }

    let mut fresh = Engine::new(config)?;
    match LocalStorageScores::open() {
        Ok(store) => fresh.set_score_store(Box::new(store)),
        Err(e) => log::warn!("leaderboard kept in memory: {}", e),
    }

    ENGINE.with(|slot| -> engine::Result<()> {
        *slot.try_borrow_mut().map_err(|_| EngineError::Busy)? = Some(fresh);
        Ok(())
    })?;
    PEER_INBOX.with(|inbox| inbox.borrow_mut().clear());
    Ok(())
}

#[wasm_bindgen]
pub fn set_audio_callbacks(play: js_sys::Function, music: js_sys::Function) -> Result<(), JsValue> {
    with_engine(|e| {
        e.set_audio(Box::new(JsAudio::new(play, music)));
        Ok(())
    })?;
    Ok(())
}

#[wasm_bindgen]
pub fn set_network_callback(send: js_sys::Function) -> Result<(), JsValue> {
    with_engine(|e| {
        e.set_network(Box::new(JsNetwork::new(send)));
        Ok(())
    })?;
    Ok(())
}

// ============================================================================
// LIFECYCLE
// ============================================================================

#[wasm_bindgen]
pub fn start_game(now_ms: f64) -> Result<(), JsValue> {
    with_engine(|e| e.start_game(now_ms))?;
    Ok(())
}

/// Camera and detector are up
#[wasm_bindgen]
pub fn pipeline_ready() -> Result<(), JsValue> {
    with_engine(|e| e.pipeline_ready(Ok(())))?;
    Ok(())
}

/// Camera permission denied or detector failed to load
#[wasm_bindgen]
pub fn pipeline_failed(reason: &str) -> Result<(), JsValue> {
    with_engine(|e| match e.pipeline_ready(Err(reason.to_string())) {
        Err(EngineError::PipelineUnavailable(_)) => Ok(()),
        other => other,
    })?;
    Ok(())
}

#[wasm_bindgen]
pub fn end_game(now_ms: f64) -> Result<(), JsValue> {
    with_engine(|e| e.end_game(now_ms))?;
    Ok(())
}

#[wasm_bindgen]
pub fn set_mode(mode: &str) -> Result<(), JsValue> {
    let id: ModeId = mode.parse()?;
    with_engine(|e| {
        e.set_mode(id);
        Ok(())
    })?;
    Ok(())
}

// ============================================================================
// FRAME
// ============================================================================

/// Called from the detector callback with a flat Float32Array of
/// `num_hands × 21 × 3` values
#[wasm_bindgen]
pub fn on_frame(
    data: &[f32],
    num_hands: usize,
    frame_width: f32,
    frame_height: f32,
    now_ms: f64,
) -> Result<(), JsValue> {
    let frame = parse_hand_frame(data, num_hands, frame_width, frame_height);
    let events: Vec<PeerEvent> = PEER_INBOX.with(|inbox| inbox.borrow_mut().drain().collect());

    with_engine(|e| {
        for event in events {
            match event {
                PeerEvent::State { id, payload } => e.push_peer_state(&id, &payload),
                PeerEvent::Leave { id } => e.peer_left(&id),
            }
        }
        e.on_frame(now_ms, &frame);
        Ok(())
    })?;
    Ok(())
}

// ============================================================================
// PEERS
// ============================================================================

#[wasm_bindgen]
pub fn push_peer_state(id: &str, payload: &str) {
    PEER_INBOX.with(|inbox| inbox.borrow_mut().push_state(id, payload));
}

#[wasm_bindgen]
pub fn peer_left(id: &str) {
    PEER_INBOX.with(|inbox| inbox.borrow_mut().push_leave(id));
}

// ============================================================================
// TOOLBAR
// ============================================================================

#[wasm_bindgen]
pub fn set_player_name(name: &str) -> Result<(), JsValue> {
    with_engine(|e| {
        e.set_player_name(name);
        Ok(())
    })?;
    Ok(())
}

#[wasm_bindgen]
pub fn set_music_enabled(enabled: bool) -> Result<(), JsValue> {
    with_engine(|e| {
        e.set_music_enabled(enabled);
        Ok(())
    })?;
    Ok(())
}

#[wasm_bindgen]
pub fn set_paint_color(hex: &str) -> Result<(), JsValue> {
    with_engine(|e| e.set_paint_color(hex))?;
    Ok(())
}

#[wasm_bindgen]
pub fn set_paint_size(size: f32) -> Result<(), JsValue> {
    with_engine(|e| e.set_paint_size(size))?;
    Ok(())
}

#[wasm_bindgen]
pub fn set_eraser(on: bool) -> Result<(), JsValue> {
    with_engine(|e| {
        e.set_eraser(on);
        Ok(())
    })?;
    Ok(())
}

#[wasm_bindgen]
pub fn clear_paint() -> Result<(), JsValue> {
    with_engine(|e| {
        e.clear_paint();
        Ok(())
    })?;
    Ok(())
}

#[wasm_bindgen]
pub fn resize(width: f32, height: f32) -> Result<(), JsValue> {
    with_engine(|e| {
        e.resize(width, height);
        Ok(())
    })?;
    Ok(())
}

// ============================================================================
// READ-ONLY TEXT
// ============================================================================

#[wasm_bindgen]
pub fn hud_text() -> String {
    with_engine(|e| Ok(e.hud_text())).unwrap_or_default()
}

#[wasm_bindgen]
pub fn debug_text() -> String {
    with_engine(|e| Ok(e.debug_text())).unwrap_or_default()
}

#[wasm_bindgen]
pub fn phase() -> String {
    with_engine(|e| Ok(e.phase().as_str().to_string())).unwrap_or_else(|_| "idle".to_string())
}

/// Overlay labels for the last frame, as a JSON array
#[wasm_bindgen]
pub fn labels_json() -> Result<String, JsValue> {
    Ok(with_engine(|e| e.labels_json())?)
}

/// Leaderboard for one game id, best first, as JSON
#[wasm_bindgen]
pub fn load_scores(mode: &str) -> Result<String, JsValue> {
    let id: ModeId = mode.parse()?;
    let table = with_engine(|e| e.load_scores(id))?;
    Ok(serde_json::to_string(&table).map_err(EngineError::from)?)
}
