//! Gesture sequence - a Simon-style memory game played with hand poses
//!
//! Show phase cues the sequence one pose at a time. Input phase compares
//! each detected pose to the next expected one. A pose only counts once:
//! to repeat it the hand has to change pose (or drop out) in between.

use rand::Rng;

use crate::engine::{colors, DrawList, ModeContext};
use crate::physics::MappedHand;
use super::gesture::{classify, Gesture};
use super::ModeLogic;

/// Time each cue stays on screen during the show phase
const SHOW_INTERVAL_S: f32 = 0.8;
/// Minimum time between two accepted inputs
const MIN_INPUT_GAP_S: f32 = 0.5;
pub const MIN_SEQUENCE_LEN: usize = 3;
pub const POINTS_PER_ELEMENT: i64 = 10;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Phase {
    Show { index: usize, timer: f32 },
    Input { index: usize },
}

pub struct GestureSequence {
    sequence: Vec<Gesture>,
    phase: Phase,
    since_input: f32,
    /// Last accepted pose; cleared when the pose changes or the hand leaves
    latched: Option<Gesture>,
    detected: Gesture,
    center: (f32, f32),
}

impl GestureSequence {
    pub fn new() -> Self {
        Self {
            sequence: Vec::new(),
            phase: Phase::Show { index: 0, timer: 0.0 },
            since_input: 0.0,
            latched: None,
            detected: Gesture::None,
            center: (640.0, 360.0),
        }
    }

    /// Start from a fixed sequence instead of a random one
    pub fn with_sequence(sequence: Vec<Gesture>) -> Self {
        let mut mode = Self::new();
        mode.sequence = sequence;
        mode
    }

    pub fn sequence(&self) -> &[Gesture] {
        &self.sequence
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn detected(&self) -> Gesture {
        self.detected
    }

    fn random_gesture(ctx: &mut ModeContext) -> Gesture {
        let i = ctx.rng().random_range(0..Gesture::PLAYABLE.len());
        Gesture::PLAYABLE[i]
    }

    fn restart_show(&mut self) {
        self.phase = Phase::Show { index: 0, timer: 0.0 };
        self.latched = None;
    }

    fn tick_show(&mut self, dt: f32, index: usize, timer: f32, ctx: &mut ModeContext) {
        let timer = timer + dt;
        if timer < SHOW_INTERVAL_S {
            self.phase = Phase::Show { index, timer };
            return;
        }
        let next = index + 1;
        if next >= self.sequence.len() {
            self.phase = Phase::Input { index: 0 };
            self.since_input = 0.0;
            self.latched = None;
        } else {
            ctx.play("cue");
            self.phase = Phase::Show { index: next, timer: 0.0 };
        }
    }

    fn tick_input(&mut self, index: usize, ctx: &mut ModeContext) {
        let pose = self.detected;
        if pose == Gesture::None {
            self.latched = None;
            return;
        }
        if self.latched.is_some_and(|g| g != pose) {
            self.latched = None;
        }
        if self.latched.is_some() || self.since_input < MIN_INPUT_GAP_S {
            return;
        }

        self.latched = Some(pose);
        self.since_input = 0.0;
        let (cx, cy) = ctx.canvas().center();

        if self.sequence.get(index) != Some(&pose) {
            let shorter = self.sequence.len().saturating_sub(1).max(MIN_SEQUENCE_LEN);
            log::debug!("wrong gesture {:?}, sequence {} -> {}", pose, self.sequence.len(), shorter);
            self.sequence.truncate(shorter);
            ctx.play("wrong");
            ctx.popup(cx, cy, "Wrong!");
            self.restart_show();
            return;
        }

        ctx.play("correct");
        let next = index + 1;
        if next < self.sequence.len() {
            self.phase = Phase::Input { index: next };
            return;
        }

        let points = POINTS_PER_ELEMENT * self.sequence.len() as i64;
        ctx.award(points, cx, cy, colors::GREEN);
        let extra = Self::random_gesture(ctx);
        self.sequence.push(extra);
        log::debug!("sequence complete, now {}", self.sequence.len());
        self.restart_show();
    }
}

impl Default for GestureSequence {
    fn default() -> Self {
        Self::new()
    }
}

impl ModeLogic for GestureSequence {
    fn on_start(&mut self, ctx: &mut ModeContext) {
        if self.sequence.len() < MIN_SEQUENCE_LEN {
            self.sequence.clear();
            for _ in 0..MIN_SEQUENCE_LEN {
                let g = Self::random_gesture(ctx);
                self.sequence.push(g);
            }
        }
        self.detected = Gesture::None;
        self.center = ctx.canvas().center();
        self.restart_show();
        ctx.play("cue");
    }

    fn update(&mut self, dt: f32, hands: &[MappedHand], ctx: &mut ModeContext) {
        self.detected = hands.first().map_or(Gesture::None, classify);
        self.since_input += dt;

        match self.phase {
            Phase::Show { index, timer } => self.tick_show(dt, index, timer, ctx),
            Phase::Input { index } => self.tick_input(index, ctx),
        }
    }

    fn on_end(&mut self, ctx: &mut ModeContext) {
        self.sequence.clear();
        self.restart_show();
        ctx.effects.clear();
    }

    fn draw(&self, list: &mut DrawList) {
        let (cx, cy) = self.center;
        let spacing = 46.0;
        let x0 = cx - spacing * (self.sequence.len() as f32 - 1.0) / 2.0;

        match self.phase {
            Phase::Show { index, .. } => {
                if let Some(g) = self.sequence.get(index) {
                    list.label(cx, cy - 60.0, g.label(), 1.0);
                }
                for i in 0..self.sequence.len() {
                    let color = if i == index { colors::YELLOW } else { colors::GREY };
                    list.circle(x0 + i as f32 * spacing, 80.0, 14.0, color);
                }
            }
            Phase::Input { index } => {
                list.label(cx, cy - 60.0, format!("Your turn: {}", self.detected.label()), 1.0);
                for i in 0..self.sequence.len() {
                    let color = if i < index { colors::GREEN } else { colors::GREY };
                    list.circle(x0 + i as f32 * spacing, 80.0, 14.0, color);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modes::testing::{synthetic_hand, Harness};

    const DT: f32 = 1.0 / 30.0;

    fn run(mode: &mut GestureSequence, h: &mut Harness, pose: Option<Gesture>, seconds: f32) {
        let frames = (seconds / DT).round() as usize;
        let hands: Vec<MappedHand> = pose.map(|p| synthetic_hand(p, (640.0, 300.0))).into_iter().collect();
        for _ in 0..frames {
            h.advance(DT);
            mode.update(DT, &hands, &mut h.ctx());
        }
    }

    fn wait_for_input(mode: &mut GestureSequence, h: &mut Harness) {
        let show = SHOW_INTERVAL_S * mode.sequence().len() as f32 + 0.3;
        run(mode, h, None, show);
        assert!(matches!(mode.phase(), Phase::Input { index: 0 }));
    }

    #[test]
    fn test_correct_sequence_grows_and_scores() {
        let mut h = Harness::new();
        let mut mode = GestureSequence::with_sequence(vec![Gesture::Open, Gesture::Closed, Gesture::Pinch]);
        mode.on_start(&mut h.ctx());
        wait_for_input(&mut mode, &mut h);

        run(&mut mode, &mut h, Some(Gesture::Open), 0.8);
        run(&mut mode, &mut h, Some(Gesture::Closed), 0.8);
        run(&mut mode, &mut h, Some(Gesture::Pinch), 0.8);

        assert_eq!(mode.sequence().len(), 4);
        assert_eq!(&mode.sequence()[..3], &[Gesture::Open, Gesture::Closed, Gesture::Pinch]);
        assert_eq!(h.session.score(), 30);
        assert!(matches!(mode.phase(), Phase::Show { .. }));
    }

    #[test]
    fn test_wrong_gesture_shrinks_with_floor() {
        let mut h = Harness::new();
        let seq = vec![Gesture::Open, Gesture::Closed, Gesture::Pinch, Gesture::Open];
        let mut mode = GestureSequence::with_sequence(seq);
        mode.on_start(&mut h.ctx());
        wait_for_input(&mut mode, &mut h);

        run(&mut mode, &mut h, Some(Gesture::Pinch), 0.8);
        assert_eq!(mode.sequence().len(), 3);
        assert!(matches!(mode.phase(), Phase::Show { index: 0, .. }));
        assert_eq!(h.played("wrong"), 1);

        wait_for_input(&mut mode, &mut h);
        run(&mut mode, &mut h, Some(Gesture::Closed), 0.8);
        assert_eq!(mode.sequence().len(), MIN_SEQUENCE_LEN);
        assert_eq!(h.session.score(), 0);
    }

    #[test]
    fn test_held_pose_counts_once() {
        let mut h = Harness::new();
        let mut mode = GestureSequence::with_sequence(vec![Gesture::Open, Gesture::Open, Gesture::Closed]);
        mode.on_start(&mut h.ctx());
        wait_for_input(&mut mode, &mut h);

        run(&mut mode, &mut h, Some(Gesture::Open), 2.0);
        assert!(matches!(mode.phase(), Phase::Input { index: 1 }));
        run(&mut mode, &mut h, None, 0.2);
        run(&mut mode, &mut h, Some(Gesture::Open), 0.8);
        assert!(matches!(mode.phase(), Phase::Input { index: 2 }));
    }
}
