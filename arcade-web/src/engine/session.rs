//! Game session - the state every mode shares for one round
//!
//! Score, round timer, clock and RNG live here and are handed to the active
//! mode each frame through `ModeContext`.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::effects::{BurstOptions, ParticlePool, PopupPool};
use crate::physics::CanvasSize;
use super::draw::Color;
use super::sound::SoundGate;

pub struct GameSession {
    score: i64,
    /// Round length; 0 means untimed
    duration_s: f32,
    time_left_s: f32,
    elapsed_s: f32,
    now_ms: f64,
    canvas: CanvasSize,
    pub rng: Pcg32,
}

impl GameSession {
    pub fn new(canvas: CanvasSize, seed: u64) -> Self {
        Self {
            score: 0,
            duration_s: 0.0,
            time_left_s: 0.0,
            elapsed_s: 0.0,
            now_ms: 0.0,
            canvas,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Start a new round
    pub fn reset(&mut self, duration_s: f32) {
        self.score = 0;
        self.duration_s = duration_s.max(0.0);
        self.time_left_s = self.duration_s;
        self.elapsed_s = 0.0;
    }

    /// Advance the round clock. Returns true when a timed round just ran out.
    pub fn advance(&mut self, dt: f32) -> bool {
        self.elapsed_s += dt;
        if self.duration_s <= 0.0 || self.time_left_s <= 0.0 {
            return false;
        }
        self.time_left_s = (self.time_left_s - dt).max(0.0);
        self.time_left_s <= 0.0
    }

    pub fn add_score(&mut self, points: i64) {
        self.score += points;
    }

    pub fn reset_score(&mut self) {
        self.score = 0;
    }

    pub fn score(&self) -> i64 {
        self.score
    }

    pub fn is_timed(&self) -> bool {
        self.duration_s > 0.0
    }

    pub fn time_left(&self) -> f32 {
        self.time_left_s
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed_s
    }

    pub fn set_now(&mut self, now_ms: f64) {
        self.now_ms = now_ms;
    }

    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    pub fn canvas(&self) -> CanvasSize {
        self.canvas
    }

    pub fn set_canvas(&mut self, canvas: CanvasSize) {
        self.canvas = canvas;
    }
}

/// Particle + popup pools
pub struct Effects {
    pub particles: ParticlePool,
    pub popups: PopupPool,
}

impl Effects {
    pub fn tick(&mut self, dt: f32) {
        self.particles.tick(dt);
        self.popups.tick(dt);
    }

    pub fn clear(&mut self) {
        self.particles.clear();
        self.popups.clear();
    }
}

/// Everything a mode may touch during one frame
pub struct ModeContext<'a> {
    pub session: &'a mut GameSession,
    pub effects: &'a mut Effects,
    pub sounds: &'a mut SoundGate,
}

impl ModeContext<'_> {
    pub fn now_ms(&self) -> f64 {
        self.session.now_ms()
    }

    pub fn canvas(&self) -> CanvasSize {
        self.session.canvas()
    }

    pub fn rng(&mut self) -> &mut Pcg32 {
        &mut self.session.rng
    }

    pub fn play(&mut self, name: &'static str) {
        let now = self.session.now_ms();
        self.sounds.play(now, name);
    }

    pub fn burst(&mut self, x: f32, y: f32, color: Color, count: usize, opts: BurstOptions) -> usize {
        let now = self.session.now_ms();
        self.effects.particles.spawn(&mut self.session.rng, now, x, y, color, count, opts)
    }

    pub fn popup(&mut self, x: f32, y: f32, text: impl Into<String>) -> bool {
        let now = self.session.now_ms();
        self.effects.popups.spawn(now, x, y, text)
    }

    /// Suppress particle bursts for a short window
    pub fn mark_heavy(&mut self) {
        let now = self.session.now_ms();
        self.effects.particles.mark_heavy(now);
    }

    /// Score change with the standard feedback: "+N"/"-N" popup and a burst
    pub fn award(&mut self, points: i64, x: f32, y: f32, color: Color) {
        self.session.add_score(points);
        self.popup(x, y, format!("{:+}", points));
        self.burst(x, y, color, 14, BurstOptions::default());
    }
}
