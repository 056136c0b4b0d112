//! Leading-edge send throttle
//!
//! The first call in each window goes out; the rest of the window is
//! dropped, not queued.

/// Default outbound pose interval (~12 Hz)
pub const SEND_INTERVAL_MS: f64 = 83.0;

pub struct SendThrottle {
    interval_ms: f64,
    last_sent_ms: Option<f64>,
}

impl SendThrottle {
    pub fn new(interval_ms: f64) -> Self {
        Self {
            interval_ms: interval_ms.max(0.0),
            last_sent_ms: None,
        }
    }

    /// True if a send may happen now; claims the window if so
    pub fn try_acquire(&mut self, now_ms: f64) -> bool {
        if let Some(last) = self.last_sent_ms {
            if now_ms - last < self.interval_ms {
                return false;
            }
        }
        self.last_sent_ms = Some(now_ms);
        true
    }

    pub fn reset(&mut self) {
        self.last_sent_ms = None;
    }
}

impl Default for SendThrottle {
    fn default() -> Self {
        Self::new(SEND_INTERVAL_MS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_burst_within_window_sends_once() {
        let mut t = SendThrottle::default();
        let sent = (0..20).filter(|i| t.try_acquire(*i as f64 * 4.0)).count();
        assert_eq!(sent, 1);
    }

    #[test]
    fn test_next_window_opens() {
        let mut t = SendThrottle::default();
        assert!(t.try_acquire(1000.0));
        assert!(!t.try_acquire(1082.9));
        assert!(t.try_acquire(1083.0));
    }
}
