//! Peer cursors - smoothed ghost pointers for everyone else in the room
//!
//! Each received pose sets a target; the drawn position chases it with an
//! exponential blend. Peers that go quiet fade out over the tail of the
//! timeout and are then dropped.

use hashbrown::HashMap;

use crate::engine::{colors, with_alpha, DrawList};
use crate::physics::CanvasSize;
use super::payload::PosePayload;

/// Peers silent for this long are purged
pub const PEER_TIMEOUT_MS: f64 = 2200.0;
/// Blend rate toward the newest target (per second)
pub const BLEND_RATE: f32 = 12.0;
/// Fraction of the timeout over which a silent peer fades out
const FADE_FRACTION: f64 = 0.3;

const CURSOR_RADIUS: f32 = 14.0;

#[derive(Clone, Debug, PartialEq)]
pub struct PeerCursor {
    pub x: f32,
    pub y: f32,
    pub target_x: f32,
    pub target_y: f32,
    pub last_update_ms: f64,
    pub alpha: f32,
}

pub struct PeerTracker {
    peers: HashMap<String, PeerCursor>,
    timeout_ms: f64,
}

impl PeerTracker {
    pub fn new(timeout_ms: f64) -> Self {
        Self {
            peers: HashMap::new(),
            timeout_ms: timeout_ms.max(1.0),
        }
    }

    /// Apply one received payload. A heartbeat only refreshes a known
    /// peer; the first pose from a new peer snaps instead of gliding.
    pub fn on_state(&mut self, id: &str, payload: &PosePayload, canvas: CanvasSize, now_ms: f64) {
        let Some((tx, ty)) = payload.cursor(canvas) else {
            if let Some(peer) = self.peers.get_mut(id) {
                peer.last_update_ms = now_ms;
            }
            return;
        };

        match self.peers.get_mut(id) {
            Some(peer) => {
                peer.target_x = tx;
                peer.target_y = ty;
                peer.last_update_ms = now_ms;
            }
            None => {
                log::debug!("peer {} joined", id);
                self.peers.insert(
                    id.to_string(),
                    PeerCursor {
                        x: tx,
                        y: ty,
                        target_x: tx,
                        target_y: ty,
                        last_update_ms: now_ms,
                        alpha: 1.0,
                    },
                );
            }
        }
    }

    pub fn on_leave(&mut self, id: &str) {
        if self.peers.remove(id).is_some() {
            log::debug!("peer {} left", id);
        }
    }

    /// Blend toward targets, update fade, purge the stale
    pub fn tick(&mut self, dt: f32, now_ms: f64) {
        let blend = (dt * BLEND_RATE).min(1.0);
        let timeout = self.timeout_ms;
        let fade_start = timeout * (1.0 - FADE_FRACTION);

        self.peers.retain(|_, p| now_ms - p.last_update_ms <= timeout);
        for p in self.peers.values_mut() {
            p.x += (p.target_x - p.x) * blend;
            p.y += (p.target_y - p.y) * blend;

            let silent = now_ms - p.last_update_ms;
            p.alpha = if silent <= fade_start {
                1.0
            } else {
                (1.0 - (silent - fade_start) / (timeout - fade_start)).clamp(0.0, 1.0) as f32
            };
        }
    }

    pub fn draw(&self, list: &mut DrawList) {
        for p in self.peers.values() {
            list.ring(p.x, p.y, CURSOR_RADIUS, 3.0, with_alpha(colors::GHOST, p.alpha));
            list.circle(p.x, p.y, 4.0, with_alpha(colors::GHOST, p.alpha));
        }
    }

    pub fn get(&self, id: &str) -> Option<&PeerCursor> {
        self.peers.get(id)
    }

    pub fn len(&self) -> usize {
        self.peers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }

    pub fn clear(&mut self) {
        self.peers.clear();
    }
}

impl Default for PeerTracker {
    fn default() -> Self {
        Self::new(PEER_TIMEOUT_MS)
    }
}
