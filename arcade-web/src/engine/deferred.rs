//! Deferred actions with deadlines, swept once per frame
//!
//! Replaces timer callbacks: nothing re-enters game state from outside the
//! frame, work is collected here and processed at a fixed point in the tick.

pub struct DeferredQueue<T> {
    items: Vec<(f64, T)>,
}

impl<T> DeferredQueue<T> {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn schedule(&mut self, deadline_ms: f64, item: T) {
        self.items.push((deadline_ms, item));
    }

    /// Remove and return every item whose deadline has passed, in schedule order
    pub fn drain_due(&mut self, now_ms: f64) -> Vec<T> {
        let mut due = Vec::new();
        let mut pending = Vec::with_capacity(self.items.len());
        for (deadline, item) in self.items.drain(..) {
            if deadline <= now_ms {
                due.push(item);
            } else {
                pending.push((deadline, item));
            }
        }
        self.items = pending;
        due
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T> Default for DeferredQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
