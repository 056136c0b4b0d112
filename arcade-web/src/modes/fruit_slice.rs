//! Fruit slice - gravity-thrown fruit and bombs, cut with the hand skeleton
//!
//! Every skeleton bone (plus the fingertip's travel since last frame) is a
//! blade. A blade within `radius + HIT_PADDING` of an unsliced object
//! slices it; sliced objects linger briefly for feedback, then get swept.

use rand::Rng;
use smallvec::SmallVec;

use crate::bridge::HAND_SKELETON;
use crate::engine::{colors, DeferredQueue, DrawList, ModeContext};
use crate::physics::{point_segment_distance, MappedHand};
use super::ModeLogic;

/// Downward acceleration on thrown objects (px/s²)
pub const GRAVITY: f32 = 900.0;

/// Extra reach added to every object's radius for hit-testing
pub const HIT_PADDING: f32 = 12.0;

pub const MAX_FRUITS: usize = 6;
pub const MAX_BOMBS: usize = 2;

const FRUIT_INTERVAL_S: f32 = 0.9;
const BOMB_INTERVAL_S: f32 = 2.4;
const BOMB_CHANCE: f64 = 0.45;

/// Sliced objects stay visible this long before removal
pub const SLICE_REMOVE_DELAY_MS: f64 = 250.0;

pub const FRUIT_POINTS: i64 = 10;
pub const BOMB_PENALTY: i64 = -20;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ObjectKind {
    Fruit,
    Bomb,
}

#[derive(Clone, Debug)]
pub struct GameObject {
    pub id: u32,
    pub kind: ObjectKind,
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub r: f32,
    pub angle: f32,
    pub spin: f32,
    pub sliced: bool,
}

impl GameObject {
    /// Mark sliced. Returns false if it already was (a no-op).
    pub fn try_slice(&mut self) -> bool {
        if self.sliced {
            return false;
        }
        self.sliced = true;
        true
    }
}

/// A straight blade in canvas space
pub type Segment = ((f32, f32), (f32, f32));

/// Indices of unsliced objects touched by any segment
pub fn find_hits(objects: &[GameObject], segments: &[Segment]) -> Vec<usize> {
    objects
        .iter()
        .enumerate()
        .filter(|(_, o)| !o.sliced)
        .filter(|(_, o)| {
            segments
                .iter()
                .any(|&(a, b)| point_segment_distance((o.x, o.y), a, b) <= o.r + HIT_PADDING)
        })
        .map(|(i, _)| i)
        .collect()
}

pub struct FruitSlice {
    objects: Vec<GameObject>,
    next_id: u32,
    fruit_timer: f32,
    bomb_timer: f32,
    removals: DeferredQueue<u32>,
    prev_tips: [Option<(f32, f32)>; 2],
}

impl FruitSlice {
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
            next_id: 1,
            fruit_timer: 0.0,
            bomb_timer: 0.0,
            removals: DeferredQueue::new(),
            prev_tips: [None, None],
        }
    }

    pub fn objects(&self) -> &[GameObject] {
        &self.objects
    }

    /// Objects of this kind on screen, sliced ones included until swept
    fn count(&self, kind: ObjectKind) -> usize {
        self.objects.iter().filter(|o| o.kind == kind).count()
    }

    /// Throw a new object from below the bottom edge. Returns its id, or
    /// None when the cap for that kind is reached.
    pub fn spawn(&mut self, kind: ObjectKind, ctx: &mut ModeContext) -> Option<u32> {
        let cap = match kind {
            ObjectKind::Fruit => MAX_FRUITS,
            ObjectKind::Bomb => MAX_BOMBS,
        };
        if self.count(kind) >= cap {
            return None;
        }

        let canvas = ctx.canvas();
        let rng = ctx.rng();
        let r = match kind {
            ObjectKind::Fruit => rng.random_range(26.0f32..38.0),
            ObjectKind::Bomb => 30.0,
        };
        let x = rng.random_range(canvas.width * 0.15..canvas.width * 0.85);
        let apex = canvas.height * rng.random_range(0.55f32..0.85);
        let vy = -(2.0 * GRAVITY * apex).sqrt();
        // Lean toward the middle so objects stay on screen
        let toward_center = (canvas.width * 0.5 - x) / canvas.width;
        let vx = toward_center * rng.random_range(120.0f32..320.0) + rng.random_range(-40.0f32..40.0);
        let spin: f32 = rng.random_range(-4.0..4.0);

        let id = self.next_id;
        self.next_id += 1;
        self.objects.push(GameObject {
            id,
            kind,
            x,
            y: canvas.height + r,
            vx,
            vy,
            r,
            angle: 0.0,
            spin,
            sliced: false,
        });
        Some(id)
    }

    /// Place a specific object (tests, scripted openings)
    pub fn insert_object(&mut self, kind: ObjectKind, x: f32, y: f32, r: f32) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        self.objects.push(GameObject {
            id, kind, x, y, vx: 0.0, vy: 0.0, r, angle: 0.0, spin: 0.0, sliced: false,
        });
        id
    }

    /// Blades for this frame: all bones of every hand, plus fingertip travel
    fn blades(&mut self, hands: &[MappedHand]) -> SmallVec<[Segment; 64]> {
        let mut segments = SmallVec::new();
        for (h, hand) in hands.iter().enumerate().take(2) {
            for &(a, b) in HAND_SKELETON.iter() {
                segments.push((hand.point(a), hand.point(b)));
            }
            let tip = hand.tip();
            if let Some(prev) = self.prev_tips[h] {
                segments.push((prev, tip));
            }
        }
        for h in 0..2 {
            self.prev_tips[h] = hands.get(h).map(MappedHand::tip);
        }
        segments
    }

    /// Hit-test blades against live objects and score the hits
    pub fn collide(&mut self, hands: &[MappedHand], ctx: &mut ModeContext) {
        let blades = self.blades(hands);
        if blades.is_empty() {
            return;
        }

        let now = ctx.now_ms();
        for i in find_hits(&self.objects, &blades) {
            let obj = &mut self.objects[i];
            if !obj.try_slice() {
                continue;
            }
            let (id, kind, x, y) = (obj.id, obj.kind, obj.x, obj.y);
            self.removals.schedule(now + SLICE_REMOVE_DELAY_MS, id);

            match kind {
                ObjectKind::Fruit => {
                    ctx.award(FRUIT_POINTS, x, y, colors::ORANGE);
                    ctx.play("slice");
                }
                ObjectKind::Bomb => {
                    ctx.award(BOMB_PENALTY, x, y, colors::RED);
                    ctx.play("bomb");
                }
            }
            log::debug!("sliced {:?} #{}", kind, id);
        }
    }

    /// Remove sliced objects whose display delay has passed
    pub fn sweep(&mut self, now_ms: f64) {
        let due = self.removals.drain_due(now_ms);
        if !due.is_empty() {
            self.objects.retain(|o| !due.contains(&o.id));
        }
    }
}

impl Default for FruitSlice {
    fn default() -> Self {
        Self::new()
    }
}

impl ModeLogic for FruitSlice {
    fn on_start(&mut self, _ctx: &mut ModeContext) {
        self.objects.clear();
        self.removals.clear();
        self.prev_tips = [None, None];
        self.fruit_timer = 0.0;
        self.bomb_timer = 0.0;
    }

    fn update(&mut self, dt: f32, _hands: &[MappedHand], ctx: &mut ModeContext) {
        self.fruit_timer += dt;
        if self.fruit_timer >= FRUIT_INTERVAL_S {
            self.fruit_timer = 0.0;
            self.spawn(ObjectKind::Fruit, ctx);
        }

        self.bomb_timer += dt;
        if self.bomb_timer >= BOMB_INTERVAL_S {
            self.bomb_timer = 0.0;
            if ctx.rng().random_bool(BOMB_CHANCE) {
                self.spawn(ObjectKind::Bomb, ctx);
            }
        }

        for o in &mut self.objects {
            if o.sliced {
                // Sliced halves just drift down while fading
                o.y += 60.0 * dt;
                continue;
            }
            o.vy += GRAVITY * dt;
            o.x += o.vx * dt;
            o.y += o.vy * dt;
            o.angle += o.spin * dt;
        }

        let canvas = ctx.canvas();
        self.objects.retain(|o| {
            let falling_out = o.vy > 0.0 && o.y - o.r > canvas.height;
            let sideways_out = !canvas.contains(o.x, o.y, o.r + 80.0);
            o.sliced || !(falling_out || sideways_out)
        });
    }

    fn on_end(&mut self, ctx: &mut ModeContext) {
        self.objects.clear();
        self.removals.clear();
        self.prev_tips = [None, None];
        ctx.effects.clear();
    }

    fn draw(&self, list: &mut DrawList) {
        for o in &self.objects {
            let color = match (o.kind, o.sliced) {
                (ObjectKind::Fruit, false) => colors::ORANGE,
                (ObjectKind::Bomb, false) => colors::DARK,
                (_, true) => colors::GREY,
            };
            list.circle(o.x, o.y, o.r, color);
            if o.kind == ObjectKind::Bomb {
                list.ring(o.x, o.y, o.r, 3.0, colors::RED);
            }
            // Stem, so spin reads on screen
            let stem = (o.x + o.angle.cos() * o.r, o.y + o.angle.sin() * o.r);
            list.line((o.x, o.y), stem, 2.0, colors::WHITE);
        }
    }
}
