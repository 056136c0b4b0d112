//! Score popups - floating text with a rate limit and FIFO eviction

use std::collections::VecDeque;
use crate::engine::DrawList;

/// Seconds a popup stays visible
const POPUP_LIFE: f32 = 0.9;

/// Upward drift (px/s)
const POPUP_RISE: f32 = -70.0;

#[derive(Clone, Debug)]
pub struct Popup {
    pub x: f32,
    pub y: f32,
    pub text: String,
    pub vx: f32,
    pub vy: f32,
    pub life: f32,
    pub age: f32,
}

pub struct PopupPool {
    popups: VecDeque<Popup>,
    cap: usize,
    min_interval_ms: f64,
    last_accepted_ms: Option<f64>,
}

impl PopupPool {
    pub fn new(cap: usize, min_interval_ms: f64) -> Self {
        let cap = cap.max(1);
        Self {
            popups: VecDeque::with_capacity(cap),
            cap,
            min_interval_ms,
            last_accepted_ms: None,
        }
    }

    /// Returns false when rejected by the rate limit.
    /// A full pool evicts its oldest popup instead of rejecting.
    pub fn spawn(&mut self, now_ms: f64, x: f32, y: f32, text: impl Into<String>) -> bool {
        if let Some(last) = self.last_accepted_ms {
            if now_ms - last < self.min_interval_ms {
                return false;
            }
        }

        if self.popups.len() >= self.cap {
            self.popups.pop_front();
        }

        self.popups.push_back(Popup {
            x,
            y,
            text: text.into(),
            vx: 0.0,
            vy: POPUP_RISE,
            life: POPUP_LIFE,
            age: 0.0,
        });
        self.last_accepted_ms = Some(now_ms);
        true
    }

    pub fn tick(&mut self, dt: f32) {
        for p in &mut self.popups {
            p.x += p.vx * dt;
            p.y += p.vy * dt;
            p.age += dt;
        }
        self.popups.retain(|p| p.age < p.life);
    }

    pub fn draw(&self, list: &mut DrawList) {
        for p in &self.popups {
            let alpha = (1.0 - p.age / p.life).clamp(0.0, 1.0);
            list.label(p.x, p.y, p.text.clone(), alpha);
        }
    }

    pub fn clear(&mut self) {
        self.popups.clear();
    }

    pub fn len(&self) -> usize {
        self.popups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.popups.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Popup> {
        self.popups.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limit() {
        let mut pool = PopupPool::new(24, 50.0);
        assert!(pool.spawn(0.0, 0.0, 0.0, "+10"));
        assert!(!pool.spawn(49.0, 0.0, 0.0, "+10"));
        assert!(pool.spawn(50.0, 0.0, 0.0, "+10"));
        assert_eq!(pool.len(), 2);
    }

    #[test]
    fn test_fifo_eviction_over_cap() {
        let mut pool = PopupPool::new(24, 50.0);
        for i in 0..30 {
            assert!(pool.spawn(i as f64 * 50.0, 0.0, 0.0, format!("#{}", i)));
            assert!(pool.len() <= 24);
        }
        let texts: Vec<&str> = pool.iter().map(|p| p.text.as_str()).collect();
        assert_eq!(texts.len(), 24);
        // 0..=5 were evicted in order, 6..=29 survive in order
        assert_eq!(texts[0], "#6");
        assert_eq!(texts[23], "#29");
        for (i, t) in texts.iter().enumerate() {
            assert_eq!(*t, format!("#{}", i + 6));
        }
    }

    #[test]
    fn test_popups_expire() {
        let mut pool = PopupPool::new(24, 50.0);
        pool.spawn(0.0, 100.0, 100.0, "+5");
        pool.tick(0.5);
        assert_eq!(pool.len(), 1);
        assert!(pool.iter().next().map(|p| p.y < 100.0).unwrap_or(false));
        pool.tick(0.5);
        assert!(pool.is_empty());
    }
}
