//! Follow target - keep the fingertip on a bouncing dot
//!
//! Time spent within `FOLLOW_RADIUS` fills a hold meter; a full meter
//! scores and empties. Drifting away drains the meter at half speed
//! instead of zeroing it.

use std::f32::consts::TAU;

use rand::Rng;

use crate::engine::{colors, with_alpha, DrawList, ModeContext};
use crate::physics::{distance, MappedHand};
use super::ModeLogic;

pub const FOLLOW_RADIUS: f32 = 60.0;
pub const HOLD_THRESHOLD_S: f32 = 1.2;
pub const FOLLOW_POINTS: i64 = 15;
/// Meter drain rate relative to fill rate when off target
const DECAY_RATE: f32 = 0.5;

const TARGET_RADIUS: f32 = 24.0;
const TARGET_SPEED: f32 = 220.0;

pub struct FollowTarget {
    x: f32,
    y: f32,
    vx: f32,
    vy: f32,
    hold: f32,
    on_target: bool,
}

impl FollowTarget {
    pub fn new() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            vx: 0.0,
            vy: 0.0,
            hold: 0.0,
            on_target: false,
        }
    }

    pub fn position(&self) -> (f32, f32) {
        (self.x, self.y)
    }

    /// Hold meter in seconds
    pub fn hold(&self) -> f32 {
        self.hold
    }

    /// Bounce off the canvas edges
    fn advance(&mut self, dt: f32, width: f32, height: f32) {
        self.x += self.vx * dt;
        self.y += self.vy * dt;

        let r = TARGET_RADIUS;
        if self.x < r {
            self.x = r;
            self.vx = self.vx.abs();
        } else if self.x > width - r {
            self.x = width - r;
            self.vx = -self.vx.abs();
        }
        if self.y < r {
            self.y = r;
            self.vy = self.vy.abs();
        } else if self.y > height - r {
            self.y = height - r;
            self.vy = -self.vy.abs();
        }
    }
}

impl Default for FollowTarget {
    fn default() -> Self {
        Self::new()
    }
}

impl ModeLogic for FollowTarget {
    fn on_start(&mut self, ctx: &mut ModeContext) {
        let (cx, cy) = ctx.canvas().center();
        let heading = ctx.rng().random_range(0.0..TAU);
        self.x = cx;
        self.y = cy;
        self.vx = heading.cos() * TARGET_SPEED;
        self.vy = heading.sin() * TARGET_SPEED;
        self.hold = 0.0;
        self.on_target = false;
    }

    fn update(&mut self, dt: f32, hands: &[MappedHand], ctx: &mut ModeContext) {
        let canvas = ctx.canvas();
        self.advance(dt, canvas.width, canvas.height);

        self.on_target = hands
            .first()
            .is_some_and(|h| distance(h.tip(), (self.x, self.y)) <= FOLLOW_RADIUS);

        if self.on_target {
            self.hold += dt;
            if self.hold >= HOLD_THRESHOLD_S {
                self.hold = 0.0;
                ctx.award(FOLLOW_POINTS, self.x, self.y, colors::PURPLE);
                ctx.play("point");
            }
        } else {
            self.hold = (self.hold - dt * DECAY_RATE).max(0.0);
        }
    }

    fn on_end(&mut self, ctx: &mut ModeContext) {
        self.hold = 0.0;
        ctx.effects.clear();
    }

    fn draw(&self, list: &mut DrawList) {
        let zone = if self.on_target { colors::GREEN } else { colors::WHITE };
        list.ring(self.x, self.y, FOLLOW_RADIUS, 2.0, with_alpha(zone, 0.4));
        list.circle(self.x, self.y, TARGET_RADIUS, colors::PURPLE);

        // Hold meter as a bar under the target
        let fill = (self.hold / HOLD_THRESHOLD_S).clamp(0.0, 1.0);
        let w = FOLLOW_RADIUS * 2.0;
        let top = self.y + FOLLOW_RADIUS + 8.0;
        list.rect(self.x - w / 2.0, top, w, 6.0, with_alpha(colors::GREY, 0.5));
        list.rect(self.x - w / 2.0, top, w * fill, 6.0, colors::GREEN);
    }
}
