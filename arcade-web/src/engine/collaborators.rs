//! Collaborator seams - audio, score persistence, network transport
//!
//! The engine only knows these traits. The browser implementations live in
//! `bridge`, tests use recording fakes.

use super::error::Result;
use super::leaderboard::ScoreEntry;

/// Fire-and-forget audio. Failures are the implementation's problem.
pub trait AudioSink {
    fn play_sound(&mut self, name: &str);
    fn set_music_enabled(&mut self, enabled: bool);
}

/// Leaderboard persistence, one table per game id
pub trait ScoreStore {
    fn save_score(&mut self, game_id: &str, name: &str, score: i64) -> Result<()>;
    fn load_scores(&self, game_id: &str) -> Result<Vec<ScoreEntry>>;
}

/// Outbound pose transport. The payload is already serialized JSON.
pub trait NetworkSink {
    fn send_state(&mut self, payload: &str) -> Result<()>;
}

/// Audio that goes nowhere (no audio context yet, or muted page)
#[derive(Default)]
pub struct SilentAudio;

impl AudioSink for SilentAudio {
    fn play_sound(&mut self, _name: &str) {}
    fn set_music_enabled(&mut self, _enabled: bool) {}
}

/// Offline play: poses are dropped
#[derive(Default)]
pub struct OfflineNetwork;

impl NetworkSink for OfflineNetwork {
    fn send_state(&mut self, _payload: &str) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod fakes {
    //! Recording collaborators shared by engine tests

    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::engine::error::EngineError;

    #[derive(Clone, Default)]
    pub struct RecordingAudio {
        pub played: Rc<RefCell<Vec<String>>>,
        pub music: Rc<RefCell<Option<bool>>>,
    }

    impl AudioSink for RecordingAudio {
        fn play_sound(&mut self, name: &str) {
            self.played.borrow_mut().push(name.to_string());
        }

        fn set_music_enabled(&mut self, enabled: bool) {
            *self.music.borrow_mut() = Some(enabled);
        }
    }

    #[derive(Clone, Default)]
    pub struct RecordingNetwork {
        pub sent: Rc<RefCell<Vec<String>>>,
        pub fail: bool,
    }

    impl NetworkSink for RecordingNetwork {
        fn send_state(&mut self, payload: &str) -> Result<()> {
            if self.fail {
                return Err(EngineError::Network("socket closed".into()));
            }
            self.sent.borrow_mut().push(payload.to_string());
            Ok(())
        }
    }
}
