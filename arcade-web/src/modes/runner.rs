//! Runner - fingertip-steered avatar dodging scrolling wall pairs
//!
//! The round is time-limited only: hitting a wall costs points and shoves
//! the avatar toward the gap, it never ends the run.

use rand::Rng;

use crate::engine::{colors, DrawList, ModeContext};
use crate::physics::{circle_intersects_rect, MappedHand};
use super::ModeLogic;

const AVATAR_RADIUS: f32 = 18.0;
/// Avatar sits at this fraction of the canvas width
const AVATAR_X: f32 = 0.22;
/// Target velocity per pixel of fingertip offset (1/s)
const FOLLOW_GAIN: f32 = 7.0;
const MAX_SPEED: f32 = 900.0;
/// Exponential blend rate toward the target velocity (1/s)
const VELOCITY_BLEND: f32 = 10.0;
/// Small constant sink so a lost hand drifts down (px/s²)
const SINK: f32 = 60.0;

const OBSTACLE_INTERVAL_S: f32 = 1.4;
const OBSTACLE_SPEED: f32 = 260.0;
const OBSTACLE_WIDTH: f32 = 60.0;
const OBSTACLE_GAP: f32 = 190.0;
/// Minimum horizontal distance between consecutive obstacles
pub const MIN_SPACING: f32 = 240.0;
/// How far a collision shoves the avatar toward the gap
const NUDGE: f32 = 30.0;

pub const HIT_PENALTY: i64 = -5;
pub const PASS_POINTS: i64 = 2;

#[derive(Clone, Debug)]
pub struct Obstacle {
    pub id: u32,
    pub x: f32,
    /// Gap center
    pub y: f32,
    /// Full column height
    pub h: f32,
    pub gap: f32,
    pub width: f32,
    pub speed: f32,
    pub passed: bool,
    hit: bool,
}

impl Obstacle {
    /// The two wall rectangles (x, y, w, h): above and below the gap
    pub fn walls(&self) -> [(f32, f32, f32, f32); 2] {
        let top = self.y - self.gap / 2.0;
        let bottom = self.y + self.gap / 2.0;
        [
            (self.x, 0.0, self.width, top.max(0.0)),
            (self.x, bottom, self.width, (self.h - bottom).max(0.0)),
        ]
    }
}

#[derive(Clone, Debug)]
pub struct Avatar {
    pub x: f32,
    pub y: f32,
    pub vy: f32,
    pub r: f32,
}

pub struct Runner {
    avatar: Avatar,
    obstacles: Vec<Obstacle>,
    spawn_timer: f32,
    next_id: u32,
}

impl Runner {
    pub fn new() -> Self {
        Self {
            avatar: Avatar { x: 0.0, y: 0.0, vy: 0.0, r: AVATAR_RADIUS },
            obstacles: Vec::new(),
            spawn_timer: 0.0,
            next_id: 1,
        }
    }

    pub fn avatar(&self) -> &Avatar {
        &self.avatar
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    /// Spawn at the right edge unless the previous obstacle is too close.
    /// A skipped spawn is retried on the next interval.
    pub fn try_spawn(&mut self, ctx: &mut ModeContext) -> bool {
        let canvas = ctx.canvas();
        let spawn_x = canvas.width;
        if let Some(last) = self.obstacles.last() {
            if spawn_x - last.x < MIN_SPACING {
                return false;
            }
        }

        let margin = OBSTACLE_GAP * 0.5 + 20.0;
        let y = if canvas.height > margin * 2.0 {
            ctx.rng().random_range(margin..canvas.height - margin)
        } else {
            canvas.height * 0.5
        };

        self.obstacles.push(Obstacle {
            id: self.next_id,
            x: spawn_x,
            y,
            h: canvas.height,
            gap: OBSTACLE_GAP,
            width: OBSTACLE_WIDTH,
            speed: OBSTACLE_SPEED,
            passed: false,
            hit: false,
        });
        self.next_id += 1;
        true
    }

    fn steer(&mut self, dt: f32, tip: Option<(f32, f32)>, height: f32) {
        let a = &mut self.avatar;
        let target_vy = match tip {
            Some((_, ty)) => ((ty - a.y) * FOLLOW_GAIN).clamp(-MAX_SPEED, MAX_SPEED),
            None => a.vy,
        };
        let blend = (dt * VELOCITY_BLEND).min(1.0);
        a.vy += (target_vy - a.vy) * blend;
        a.vy += SINK * dt;
        a.y += a.vy * dt;

        if a.y < a.r {
            a.y = a.r;
            a.vy = a.vy.max(0.0);
        } else if a.y > height - a.r {
            a.y = height - a.r;
            a.vy = a.vy.min(0.0);
        }
    }
}

impl Default for Runner {
    fn default() -> Self {
        Self::new()
    }
}

impl ModeLogic for Runner {
    fn on_start(&mut self, ctx: &mut ModeContext) {
        let canvas = ctx.canvas();
        self.avatar = Avatar {
            x: canvas.width * AVATAR_X,
            y: canvas.height * 0.5,
            vy: 0.0,
            r: AVATAR_RADIUS,
        };
        self.obstacles.clear();
        self.spawn_timer = 0.0;
    }

    fn update(&mut self, dt: f32, hands: &[MappedHand], ctx: &mut ModeContext) {
        let canvas = ctx.canvas();
        self.steer(dt, hands.first().map(MappedHand::tip), canvas.height);

        self.spawn_timer += dt;
        if self.spawn_timer >= OBSTACLE_INTERVAL_S {
            self.spawn_timer = 0.0;
            self.try_spawn(ctx);
        }

        let (ax, r) = (self.avatar.x, self.avatar.r);
        for i in 0..self.obstacles.len() {
            let ob = &mut self.obstacles[i];
            ob.x -= ob.speed * dt;

            if !ob.passed && ob.x + ob.width < ax - r {
                ob.passed = true;
                if !ob.hit {
                    ctx.session.add_score(PASS_POINTS);
                    ctx.play("point");
                }
            }

            let avatar = (ax, self.avatar.y);
            let hit = ob.walls().iter().any(|&w| circle_intersects_rect(avatar, r, w));
            if hit && !ob.hit {
                ob.hit = true;
                let push = if self.avatar.y < ob.y { NUDGE } else { -NUDGE };
                self.avatar.y = (self.avatar.y + push).clamp(r, canvas.height - r);
                self.avatar.vy = 0.0;
                ctx.award(HIT_PENALTY, ax, self.avatar.y, colors::RED);
                ctx.play("hit");
            }
        }

        self.obstacles.retain(|o| o.x + o.width >= 0.0);
    }

    fn on_end(&mut self, ctx: &mut ModeContext) {
        self.obstacles.clear();
        ctx.effects.clear();
    }

    fn draw(&self, list: &mut DrawList) {
        for ob in &self.obstacles {
            for (x, y, w, h) in ob.walls() {
                list.rect(x, y, w, h, if ob.hit { colors::RED } else { colors::GREEN });
            }
        }
        list.circle(self.avatar.x, self.avatar.y, self.avatar.r, colors::YELLOW);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modes::testing::{synthetic_hand, Harness};
    use crate::modes::Gesture;

    fn obstacle(x: f32, gap_y: f32) -> Obstacle {
        Obstacle {
            id: 1, x, y: gap_y, h: 720.0, gap: OBSTACLE_GAP, width: OBSTACLE_WIDTH,
            speed: OBSTACLE_SPEED, passed: false, hit: false,
        }
    }

    #[test]
    fn test_walls_leave_gap() {
        let [top, bottom] = obstacle(100.0, 300.0).walls();
        assert_eq!(top, (100.0, 0.0, OBSTACLE_WIDTH, 300.0 - OBSTACLE_GAP / 2.0));
        assert_eq!(bottom.1, 300.0 + OBSTACLE_GAP / 2.0);
        assert!((bottom.1 + bottom.3 - 720.0).abs() < 1e-4);
        assert!(!circle_intersects_rect((130.0, 300.0), AVATAR_RADIUS, top));
        assert!(!circle_intersects_rect((130.0, 300.0), AVATAR_RADIUS, bottom));
    }

    #[test]
    fn test_steer_follows_fingertip() {
        let mut runner = Runner::new();
        runner.avatar.y = 360.0;
        for _ in 0..60 {
            runner.steer(1.0 / 30.0, Some((0.0, 200.0)), 720.0);
        }
        assert!((runner.avatar.y - 200.0).abs() < 15.0);
    }

    #[test]
    fn test_steer_stays_on_canvas() {
        let mut runner = Runner::new();
        runner.avatar.y = 360.0;
        for _ in 0..120 {
            runner.steer(0.05, Some((0.0, -500.0)), 720.0);
            assert!(runner.avatar.y >= AVATAR_RADIUS);
        }
    }

    /// Run frames with the fingertip held at the avatar's start height and
    /// spawning suppressed. Returns the avatar shift on the frame the score
    /// first changed, if it did.
    fn run(runner: &mut Runner, h: &mut Harness, frames: usize) -> Option<f32> {
        let dt = 1.0 / 30.0;
        let hand = synthetic_hand(Gesture::Open, (640.0, 360.0));
        let mut shift = None;
        for _ in 0..frames {
            runner.spawn_timer = 0.0;
            let (score, y) = (h.session.score(), runner.avatar.y);
            h.advance(dt);
            runner.update(dt, std::slice::from_ref(&hand), &mut h.ctx());
            if shift.is_none() && h.session.score() != score {
                shift = Some(runner.avatar.y - y);
            }
        }
        shift
    }

    #[test]
    fn test_clean_pass_scores_once() {
        let mut h = Harness::new();
        let mut runner = Runner::new();
        runner.on_start(&mut h.ctx());
        let ax = runner.avatar.x;
        runner.obstacles.push(obstacle(ax + AVATAR_RADIUS + 20.0, 360.0));

        run(&mut runner, &mut h, 30);
        assert!(runner.obstacles[0].passed);
        assert_eq!(h.session.score(), PASS_POINTS);
        assert_eq!(h.played("point"), 1);

        run(&mut runner, &mut h, 30);
        assert_eq!(h.session.score(), PASS_POINTS);
        assert_eq!(h.played("hit"), 0);
    }

    #[test]
    fn test_wall_hit_costs_once_and_nudges() {
        let mut h = Harness::new();
        let mut runner = Runner::new();
        runner.on_start(&mut h.ctx());
        let ax = runner.avatar.x;
        // Gap well below the avatar: it is inside the top wall's span
        runner.obstacles.push(obstacle(ax + AVATAR_RADIUS + 20.0, 510.0));

        let shift = run(&mut runner, &mut h, 60).expect("hit registered");
        assert!(shift >= NUDGE - 5.0, "shift {}", shift);
        assert_eq!(h.session.score(), HIT_PENALTY);
        assert_eq!(h.played("hit"), 1);
        // Passing after a hit earns nothing
        assert_eq!(h.played("point"), 0);

        // The run goes on: new obstacles still spawn
        assert!(runner.try_spawn(&mut h.ctx()));
    }

    #[test]
    fn test_spawn_waits_for_spacing() {
        let mut h = Harness::new();
        let mut runner = Runner::new();
        runner.on_start(&mut h.ctx());
        let width = h.session.canvas().width;

        assert!(runner.try_spawn(&mut h.ctx()));
        assert!(!runner.try_spawn(&mut h.ctx()));
        assert_eq!(runner.obstacles().len(), 1);

        runner.obstacles[0].x = width - MIN_SPACING + 1.0;
        assert!(!runner.try_spawn(&mut h.ctx()));
        runner.obstacles[0].x = width - MIN_SPACING;
        assert!(runner.try_spawn(&mut h.ctx()));
        assert_eq!(runner.obstacles().len(), 2);
    }
}
