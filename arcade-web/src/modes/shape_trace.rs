//! Shape trace - run the fingertip around an outline until it is covered
//!
//! Coverage is tracked per segment with a running counter, never by
//! rescanning. Hit-testing normally looks only at a small window around the
//! last hit; when the fingertip jumps somewhere else a full scan is allowed,
//! but at most once per `FULL_SCAN_COOLDOWN_MS`.

use crate::effects::BurstOptions;
use crate::engine::{colors, with_alpha, DrawList, ModeContext};
use crate::physics::{distance, point_segment_distance, polyline_length, MappedHand};
use super::shapes::{random_outline, ShapeKind};
use super::ModeLogic;

/// Fingertip within this distance of a segment covers it
pub const TRACE_TOLERANCE: f32 = 28.0;
pub const COMPLETION_RATIO: f32 = 0.95;
pub const SHAPE_POINTS: i64 = 50;

/// Segments checked on either side of the last hit
const LOCAL_WINDOW: usize = 6;
const FULL_SCAN_COOLDOWN_MS: f64 = 150.0;
/// Gap-fill applies to segments shorter than mean length × this
const GAP_FILL_FACTOR: f32 = 1.5;
/// Covering this many segments in one frame counts as a heavy event
const HEAVY_FRAME_SEGMENTS: usize = 3;

/// An outline and which of its segments have been traced
#[derive(Clone, Debug)]
pub struct TraceTarget {
    pub kind: ShapeKind,
    pub points: Vec<(f32, f32)>,
    covered: Vec<bool>,
    covered_count: usize,
    gap_threshold: f32,
    last_hit: Option<usize>,
    last_full_scan_ms: f64,
}

impl TraceTarget {
    pub fn new(kind: ShapeKind, points: Vec<(f32, f32)>) -> Self {
        let segments = points.len().saturating_sub(1);
        let mean = if segments > 0 {
            polyline_length(&points) / segments as f32
        } else {
            0.0
        };
        Self {
            kind,
            points,
            covered: vec![false; segments],
            covered_count: 0,
            gap_threshold: mean * GAP_FILL_FACTOR,
            last_hit: None,
            last_full_scan_ms: f64::NEG_INFINITY,
        }
    }

    pub fn segment_count(&self) -> usize {
        self.covered.len()
    }

    pub fn covered_count(&self) -> usize {
        self.covered_count
    }

    pub fn is_covered(&self, i: usize) -> bool {
        self.covered.get(i).copied().unwrap_or(false)
    }

    /// Covered fraction in [0, 1]
    pub fn progress(&self) -> f32 {
        if self.covered.is_empty() {
            return 0.0;
        }
        self.covered_count as f32 / self.covered.len() as f32
    }

    pub fn is_complete(&self) -> bool {
        !self.covered.is_empty() && self.progress() >= COMPLETION_RATIO
    }

    fn segment(&self, i: usize) -> ((f32, f32), (f32, f32)) {
        (self.points[i], self.points[i + 1])
    }

    fn wrap(&self, i: isize) -> usize {
        let n = self.covered.len() as isize;
        i.rem_euclid(n) as usize
    }

    fn mark(&mut self, i: usize, newly: &mut Vec<usize>) {
        if !self.covered[i] {
            self.covered[i] = true;
            self.covered_count += 1;
            newly.push(i);
        }
    }

    /// Segments to hit-test this frame
    fn candidates(&mut self, tip: (f32, f32), now_ms: f64) -> Vec<usize> {
        let n = self.covered.len();
        if let Some(h) = self.last_hit {
            let window: Vec<usize> = if n <= LOCAL_WINDOW * 2 + 1 {
                (0..n).collect()
            } else {
                (-(LOCAL_WINDOW as isize)..=LOCAL_WINDOW as isize)
                    .map(|d| self.wrap(h as isize + d))
                    .collect()
            };
            let near = window.iter().any(|&i| {
                let (a, b) = self.segment(i);
                point_segment_distance(tip, a, b) <= TRACE_TOLERANCE
            });
            if near {
                return window;
            }
        }

        if now_ms - self.last_full_scan_ms < FULL_SCAN_COOLDOWN_MS {
            return Vec::new();
        }
        self.last_full_scan_ms = now_ms;
        (0..n).collect()
    }

    /// Cover whatever the fingertip touches. Returns newly covered segment
    /// indices; coverage never goes backwards.
    pub fn trace(&mut self, tip: (f32, f32), now_ms: f64) -> Vec<usize> {
        let mut newly = Vec::new();
        if self.covered.is_empty() {
            return newly;
        }

        let mut nearest: Option<(usize, f32)> = None;
        for i in self.candidates(tip, now_ms) {
            let (a, b) = self.segment(i);
            let d = point_segment_distance(tip, a, b);
            if d > TRACE_TOLERANCE {
                continue;
            }
            self.mark(i, &mut newly);
            // Near a joint: the segment on the other side counts too
            if distance(tip, a) <= TRACE_TOLERANCE {
                let prev = self.wrap(i as isize - 1);
                self.mark(prev, &mut newly);
            }
            if distance(tip, b) <= TRACE_TOLERANCE {
                let next = self.wrap(i as isize + 1);
                self.mark(next, &mut newly);
            }
            if nearest.map_or(true, |(_, best)| d < best) {
                nearest = Some((i, d));
            }
        }
        if let Some((i, _)) = nearest {
            self.last_hit = Some(i);
        }

        self.fill_gaps(&mut newly);
        newly
    }

    /// Close single-segment holes next to freshly covered segments, as long
    /// as the hole is short. Only neighbours of new coverage are examined.
    fn fill_gaps(&mut self, newly: &mut Vec<usize>) {
        let n = self.covered.len();
        if n < 3 {
            return;
        }
        let fresh = newly.clone();
        for i in fresh {
            for step in [-1isize, 1] {
                let gap = self.wrap(i as isize + step);
                let beyond = self.wrap(i as isize + step * 2);
                if self.covered[gap] || !self.covered[beyond] {
                    continue;
                }
                let (a, b) = self.segment(gap);
                if distance(a, b) < self.gap_threshold {
                    self.mark(gap, newly);
                }
            }
        }
    }
}

pub struct ShapeTrace {
    target: Option<TraceTarget>,
    /// (covered, total) of the most recently finished shape
    pub last_completed: Option<(usize, usize)>,
    completed: u32,
}

impl ShapeTrace {
    pub fn new() -> Self {
        Self {
            target: None,
            last_completed: None,
            completed: 0,
        }
    }

    pub fn target(&self) -> Option<&TraceTarget> {
        self.target.as_ref()
    }

    pub fn set_target(&mut self, target: TraceTarget) {
        self.target = Some(target);
    }

    pub fn completed(&self) -> u32 {
        self.completed
    }

    fn next_shape(&mut self, ctx: &mut ModeContext) {
        let canvas = ctx.canvas();
        let (kind, points) = random_outline(ctx.rng(), canvas);
        log::debug!("trace shape {:?}, {} segments", kind, points.len().saturating_sub(1));
        self.target = Some(TraceTarget::new(kind, points));
    }
}

impl Default for ShapeTrace {
    fn default() -> Self {
        Self::new()
    }
}

impl ModeLogic for ShapeTrace {
    fn on_start(&mut self, ctx: &mut ModeContext) {
        self.last_completed = None;
        self.completed = 0;
        self.next_shape(ctx);
    }

    fn update(&mut self, _dt: f32, hands: &[MappedHand], ctx: &mut ModeContext) {
        let Some(hand) = hands.first() else {
            return;
        };
        let Some(target) = self.target.as_mut() else {
            return;
        };

        let tip = hand.tip();
        let newly = target.trace(tip, ctx.now_ms());

        if newly.len() >= HEAVY_FRAME_SEGMENTS {
            ctx.burst(tip.0, tip.1, colors::GREEN, 6, BurstOptions::reduced());
            ctx.mark_heavy();
        } else {
            for &i in &newly {
                let (a, b) = target.segment(i);
                let mid = ((a.0 + b.0) * 0.5, (a.1 + b.1) * 0.5);
                ctx.burst(mid.0, mid.1, colors::GREEN, 4, BurstOptions::reduced());
            }
        }

        if target.is_complete() {
            let done = (target.covered_count(), target.segment_count());
            let (cx, cy) = ctx.canvas().center();
            ctx.award(SHAPE_POINTS, cx, cy, colors::GREEN);
            ctx.play("shape_done");
            log::debug!("shape {:?} done {}/{}", target.kind, done.0, done.1);
            self.last_completed = Some(done);
            self.completed += 1;
            self.next_shape(ctx);
        }
    }

    fn on_end(&mut self, ctx: &mut ModeContext) {
        self.target = None;
        ctx.effects.clear();
    }

    fn draw(&self, list: &mut DrawList) {
        let Some(target) = &self.target else {
            return;
        };
        for i in 0..target.segment_count() {
            let (a, b) = target.segment(i);
            let color = if target.is_covered(i) {
                colors::GREEN
            } else {
                with_alpha(colors::WHITE, 0.35)
            };
            list.line(a, b, 6.0, color);
        }
        let (x, y) = target.points.first().copied().unwrap_or_default();
        list.label(
            x,
            y - 30.0,
            format!("{} {:.0}%", target.kind.label(), target.progress() * 100.0),
            1.0,
        );
    }

    fn resets_score(&self) -> bool {
        true
    }
}
