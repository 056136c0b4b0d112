//! Browser-backed collaborators: JS audio and network callbacks,
//! localStorage leaderboards

use wasm_bindgen::JsValue;

use crate::engine::{
    insert_score, AudioSink, EngineError, NetworkSink, Result, ScoreEntry, ScoreStore,
};

/// Key prefix for leaderboard tables in localStorage
const SCORE_KEY_PREFIX: &str = "arcade.scores.";

fn js_error(err: &JsValue) -> String {
    err.as_string().unwrap_or_else(|| format!("{:?}", err))
}

// ============================================================================
// AUDIO
// ============================================================================

/// Calls `play(name)` and `music(enabled)` on the page's audio layer
pub struct JsAudio {
    play: js_sys::Function,
    music: js_sys::Function,
}

impl JsAudio {
    pub fn new(play: js_sys::Function, music: js_sys::Function) -> Self {
        Self { play, music }
    }
}

impl AudioSink for JsAudio {
    fn play_sound(&mut self, name: &str) {
        // Autoplay policy rejects until the first user gesture
        if let Err(e) = self.play.call1(&JsValue::NULL, &JsValue::from_str(name)) {
            log::debug!("sound '{}' failed: {}", name, js_error(&e));
        }
    }

    fn set_music_enabled(&mut self, enabled: bool) {
        if let Err(e) = self.music.call1(&JsValue::NULL, &JsValue::from_bool(enabled)) {
            log::debug!("music toggle failed: {}", js_error(&e));
        }
    }
}

// ============================================================================
// NETWORK
// ============================================================================

/// Hands serialized pose payloads to the page's socket
pub struct JsNetwork {
    send: js_sys::Function,
}

impl JsNetwork {
    pub fn new(send: js_sys::Function) -> Self {
        Self { send }
    }
}

impl NetworkSink for JsNetwork {
    fn send_state(&mut self, payload: &str) -> Result<()> {
        self.send
            .call1(&JsValue::NULL, &JsValue::from_str(payload))
            .map(|_| ())
            .map_err(|e| EngineError::Network(js_error(&e)))
    }
}

// ============================================================================
// LEADERBOARD STORAGE
// ============================================================================

/// One JSON table per game id in `window.localStorage`
pub struct LocalStorageScores {
    storage: web_sys::Storage,
}

impl LocalStorageScores {
    pub fn open() -> Result<Self> {
        let window = web_sys::window().ok_or_else(|| EngineError::Storage("no window".into()))?;
        let storage = window
            .local_storage()
            .map_err(|e| EngineError::Storage(js_error(&e)))?
            .ok_or_else(|| EngineError::Storage("localStorage disabled".into()))?;
        Ok(Self { storage })
    }

    fn key(game_id: &str) -> String {
        format!("{}{}", SCORE_KEY_PREFIX, game_id)
    }

    fn read_table(&self, game_id: &str) -> Result<Vec<ScoreEntry>> {
        let raw = self
            .storage
            .get_item(&Self::key(game_id))
            .map_err(|e| EngineError::Storage(js_error(&e)))?;
        match raw {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Ok(Vec::new()),
        }
    }
}

impl ScoreStore for LocalStorageScores {
    fn save_score(&mut self, game_id: &str, name: &str, score: i64) -> Result<()> {
        // A corrupt table is replaced rather than blocking every future save
        let table = self.read_table(game_id).unwrap_or_else(|e| {
            log::warn!("discarding leaderboard '{}': {}", game_id, e);
            Vec::new()
        });
        let table = insert_score(table, name, score);
        let json = serde_json::to_string(&table)?;
        self.storage
            .set_item(&Self::key(game_id), &json)
            .map_err(|e| EngineError::Storage(js_error(&e)))
    }

    fn load_scores(&self, game_id: &str) -> Result<Vec<ScoreEntry>> {
        self.read_table(game_id)
    }
}
