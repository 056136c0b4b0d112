//! Engine error type

use wasm_bindgen::JsValue;

/// Errors surfaced to the UI layer.
///
/// Per-frame work never returns these; collaborator failures inside a
/// frame are logged and swallowed.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("camera/detector pipeline unavailable: {0}")]
    PipelineUnavailable(String),

    #[error("cannot go from {from} to {to}")]
    InvalidTransition { from: &'static str, to: &'static str },

    #[error("malformed payload: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("storage failed: {0}")]
    Storage(String),

    #[error("network send failed: {0}")]
    Network(String),

    #[error("invalid config: {0}")]
    Config(String),

    #[error("unknown game mode '{0}'")]
    UnknownMode(String),

    #[error("engine not configured, call configure first")]
    NotInitialized,

    /// A JS callback re-entered the engine while a frame was running
    #[error("engine busy")]
    Busy,
}

pub type Result<T> = std::result::Result<T, EngineError>;

impl From<EngineError> for JsValue {
    fn from(err: EngineError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}
