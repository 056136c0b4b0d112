//! Particle pool - capped, self-expiring burst effects
//!
//! Two budgets keep bursts from eating the frame:
//! - a soft cap above which new bursts are refused outright
//! - a hard cap the pool never exceeds (oldest trimmed to make room)
//!
//! Heavy operations (a shape trace closing many segments at once) open a
//! short cooldown window during which every burst is suppressed.

use std::ops::Range;

use rand::Rng;
use crate::engine::{Color, DrawList, with_alpha};

/// Downward pull on particles (px/s²)
const GRAVITY: f32 = 520.0;

/// Bursts are suppressed for this long after a heavy event
pub const HEAVY_COOLDOWN_MS: f64 = 220.0;

#[derive(Clone, Debug)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub life: f32,
    max_life: f32,
    pub color: Color,
    pub radius: f32,
}

/// Burst tuning requested by the caller
#[derive(Clone, Copy, Debug, Default)]
pub struct BurstOptions {
    /// Smaller, shorter, fewer particles (precision contexts like tracing)
    pub reduced: bool,
}

impl BurstOptions {
    pub fn reduced() -> Self {
        Self { reduced: true }
    }
}

pub struct ParticlePool {
    particles: Vec<Particle>,
    soft_cap: usize,
    hard_cap: usize,
    cooldown_until_ms: f64,
}

impl ParticlePool {
    pub fn new(soft_cap: usize, hard_cap: usize) -> Self {
        let hard_cap = hard_cap.max(1);
        Self {
            particles: Vec::with_capacity(hard_cap),
            soft_cap: soft_cap.min(hard_cap),
            hard_cap,
            cooldown_until_ms: f64::NEG_INFINITY,
        }
    }

    /// Open the burst-suppression window
    pub fn mark_heavy(&mut self, now_ms: f64) {
        self.cooldown_until_ms = now_ms + HEAVY_COOLDOWN_MS;
    }

    pub fn in_cooldown(&self, now_ms: f64) -> bool {
        now_ms < self.cooldown_until_ms
    }

    /// Spawn a burst, returns how many particles were actually added
    pub fn spawn<R: Rng>(
        &mut self,
        rng: &mut R,
        now_ms: f64,
        x: f32,
        y: f32,
        color: Color,
        count: usize,
        opts: BurstOptions,
    ) -> usize {
        if self.in_cooldown(now_ms) || self.particles.len() >= self.soft_cap {
            return 0;
        }

        let count = if opts.reduced { (count / 3).max(1) } else { count };
        let count = count.min(self.hard_cap);
        if count == 0 {
            return 0;
        }

        let overflow = (self.particles.len() + count).saturating_sub(self.hard_cap);
        if overflow > 0 {
            self.particles.drain(..overflow);
        }

        let (speed, life, radius): (Range<f32>, Range<f32>, Range<f32>) = if opts.reduced {
            (40.0..120.0, 0.2..0.45, 1.5..3.0)
        } else {
            (80.0..260.0, 0.4..0.9, 2.0..5.0)
        };

        for _ in 0..count {
            let angle = rng.random_range(0.0..std::f32::consts::TAU);
            let s = rng.random_range(speed.clone());
            let l = rng.random_range(life.clone());
            self.particles.push(Particle {
                x,
                y,
                vx: angle.cos() * s,
                vy: angle.sin() * s - s * 0.3,
                life: l,
                max_life: l,
                color,
                radius: rng.random_range(radius.clone()),
            });
        }

        count
    }

    /// Integrate motion and age out expired particles
    pub fn tick(&mut self, dt: f32) {
        for p in &mut self.particles {
            p.vy += GRAVITY * dt;
            p.x += p.vx * dt;
            p.y += p.vy * dt;
            p.life -= dt;
        }
        self.particles.retain(|p| p.life > 0.0);
    }

    pub fn draw(&self, list: &mut DrawList) {
        for p in &self.particles {
            let fade = (p.life / p.max_life).clamp(0.0, 1.0);
            list.circle(p.x, p.y, p.radius, with_alpha(p.color, fade));
        }
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn hard_cap(&self) -> usize {
        self.hard_cap
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;
    use crate::engine::colors;

    #[test]
    fn test_never_exceeds_hard_cap() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut pool = ParticlePool::new(220, 320);
        for i in 0..200 {
            pool.spawn(&mut rng, i as f64, 0.0, 0.0, colors::RED, 50 + i, BurstOptions::default());
            assert!(pool.len() <= pool.hard_cap());
        }
        pool.spawn(&mut rng, 1000.0, 0.0, 0.0, colors::RED, 100_000, BurstOptions::default());
        assert!(pool.len() <= 320);
    }

    #[test]
    fn test_trims_oldest_to_fit() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut pool = ParticlePool::new(10, 12);
        pool.spawn(&mut rng, 0.0, 1.0, 1.0, colors::RED, 8, BurstOptions::default());
        pool.spawn(&mut rng, 0.0, 2.0, 2.0, colors::GREEN, 8, BurstOptions::default());
        assert_eq!(pool.len(), 12);
        // The oldest four red particles were evicted
        assert_eq!(pool.particles.iter().filter(|p| p.color == colors::RED).count(), 4);
    }

    #[test]
    fn test_soft_cap_refuses_new_bursts() {
        let mut rng = Pcg32::seed_from_u64(2);
        let mut pool = ParticlePool::new(10, 20);
        pool.spawn(&mut rng, 0.0, 0.0, 0.0, colors::RED, 15, BurstOptions::default());
        assert_eq!(pool.spawn(&mut rng, 0.0, 0.0, 0.0, colors::RED, 5, BurstOptions::default()), 0);
    }

    #[test]
    fn test_heavy_cooldown_suppresses_bursts() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut pool = ParticlePool::new(220, 320);
        pool.mark_heavy(1000.0);
        assert_eq!(pool.spawn(&mut rng, 1100.0, 0.0, 0.0, colors::RED, 10, BurstOptions::default()), 0);
        assert_eq!(pool.spawn(&mut rng, 1220.0, 0.0, 0.0, colors::RED, 10, BurstOptions::default()), 10);
    }

    #[test]
    fn test_reduced_burst_and_expiry() {
        let mut rng = Pcg32::seed_from_u64(4);
        let mut pool = ParticlePool::new(220, 320);
        assert_eq!(pool.spawn(&mut rng, 0.0, 0.0, 0.0, colors::RED, 9, BurstOptions::reduced()), 3);
        for _ in 0..30 {
            pool.tick(0.05);
        }
        assert!(pool.is_empty());
    }
}
