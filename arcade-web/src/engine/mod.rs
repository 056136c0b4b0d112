//! Engine module - session state, frame dispatch, collaborator seams
//!
//! Re-exports only. All logic in submodules.

mod error;
mod config;
mod draw;
mod deferred;
mod session;
mod sound;
mod leaderboard;
mod metrics;
mod dispatcher;
pub(crate) mod collaborators;

#[cfg(test)]
mod tests;

pub use error::{EngineError, Result};
pub use config::{EngineConfig, DT_MAX, ENDING_DISPLAY_MS};
pub use draw::{colors, parse_hex_color, with_alpha, Color, DrawList, Shape, TextLabel};
pub use deferred::DeferredQueue;
pub use session::{Effects, GameSession, ModeContext};
pub use sound::{SoundGate, SOUND_COOLDOWN_MS};
pub use leaderboard::{insert_score, normalize_name, MemoryScoreStore, ScoreEntry, LEADERBOARD_SIZE};
pub use metrics::FrameMetrics;
pub use dispatcher::{clamp_dt, Engine, EnginePhase};
pub use collaborators::{AudioSink, NetworkSink, OfflineNetwork, ScoreStore, SilentAudio};
