//! Inbound peer events, queued by the transport and drained at frame start

use std::collections::VecDeque;

/// Cap on queued events; a stalled tab drops the oldest
const MAX_QUEUED: usize = 256;

#[derive(Clone, Debug, PartialEq)]
pub enum PeerEvent {
    /// Raw JSON payload, decoded when drained
    State { id: String, payload: String },
    Leave { id: String },
}

#[derive(Default)]
pub struct PeerInbox {
    events: VecDeque<PeerEvent>,
}

impl PeerInbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: PeerEvent) {
        if self.events.len() >= MAX_QUEUED {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }

    pub fn push_state(&mut self, id: &str, payload: &str) {
        self.push(PeerEvent::State {
            id: id.to_string(),
            payload: payload.to_string(),
        });
    }

    pub fn push_leave(&mut self, id: &str) {
        self.push(PeerEvent::Leave { id: id.to_string() });
    }

    pub fn drain(&mut self) -> impl Iterator<Item = PeerEvent> + '_ {
        self.events.drain(..)
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
