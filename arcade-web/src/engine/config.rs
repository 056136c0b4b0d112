//! Engine configuration, passed from JS as JSON

use serde::Deserialize;
use crate::physics::CanvasSize;
use super::error::{EngineError, Result};

/// Longest frame step fed to any simulation (seconds)
pub const DT_MAX: f32 = 0.05;

/// How long the final score stays up before returning to idle
pub const ENDING_DISPLAY_MS: f64 = 2500.0;

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub canvas_width: f32,
    pub canvas_height: f32,
    /// Round length for timed modes (seconds)
    pub round_seconds: f32,
    pub player_name: String,
    pub particle_soft_cap: usize,
    pub particle_hard_cap: usize,
    pub popup_cap: usize,
    pub popup_min_interval_ms: f64,
    pub network_interval_ms: f64,
    pub peer_timeout_ms: f64,
    /// Fixed RNG seed; `None` seeds from the clock
    pub seed: Option<u64>,
    /// off | error | warn | info | debug | trace
    pub log_level: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            canvas_width: 1280.0,
            canvas_height: 720.0,
            round_seconds: 60.0,
            player_name: "Player".to_string(),
            particle_soft_cap: 220,
            particle_hard_cap: 320,
            popup_cap: 24,
            popup_min_interval_ms: 50.0,
            network_interval_ms: 83.0,
            peer_timeout_ms: 2200.0,
            seed: None,
            log_level: "info".to_string(),
        }
    }
}

impl EngineConfig {
    /// Parse and validate a JSON config; missing fields take defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.canvas_width > 0.0 && self.canvas_height > 0.0) {
            return Err(EngineError::Config(format!(
                "canvas must be positive, got {}x{}",
                self.canvas_width, self.canvas_height
            )));
        }
        if self.round_seconds < 0.0 {
            return Err(EngineError::Config("round_seconds must be >= 0".into()));
        }
        if self.particle_hard_cap == 0 || self.popup_cap == 0 {
            return Err(EngineError::Config("effect caps must be non-zero".into()));
        }
        Ok(())
    }

    pub fn canvas(&self) -> CanvasSize {
        CanvasSize::new(self.canvas_width, self.canvas_height)
    }

    pub fn log_level(&self) -> log::LevelFilter {
        self.log_level.parse().unwrap_or(log::LevelFilter::Info)
    }
}
