//! Net module - pose payloads out, peer cursors in
//!
//! Re-exports only. All logic in submodules.

mod payload;
mod throttle;
mod peers;
mod inbox;

pub use payload::{PosePayload, quantize, dequantize, QUANT_MAX};
pub use throttle::{SendThrottle, SEND_INTERVAL_MS};
pub use peers::{PeerTracker, PeerCursor, PEER_TIMEOUT_MS, BLEND_RATE};
pub use inbox::{PeerInbox, PeerEvent};
