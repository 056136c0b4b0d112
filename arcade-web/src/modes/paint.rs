//! Paint - freehand drawing with the index fingertip
//!
//! Pinch lifts the pen. In eraser mode the fingertip feeds the throttled
//! eraser instead of laying down points. Untimed, no scoring.

use crate::engine::{colors, with_alpha, Color, DrawList, ModeContext};
use crate::paint::PaintCanvas;
use crate::physics::MappedHand;
use super::gesture::{classify, Gesture};
use super::ModeLogic;

pub const DEFAULT_BRUSH_SIZE: f32 = 8.0;
const MIN_BRUSH_SIZE: f32 = 1.0;
const MAX_BRUSH_SIZE: f32 = 64.0;
/// Eraser radius is this multiple of the brush size
const ERASER_SCALE: f32 = 2.0;

pub struct PaintMode {
    canvas: PaintCanvas,
    color: Color,
    size: f32,
    eraser: bool,
    cursor: Option<(f32, f32)>,
}

impl PaintMode {
    pub fn new() -> Self {
        Self {
            canvas: PaintCanvas::new(),
            color: colors::CYAN,
            size: DEFAULT_BRUSH_SIZE,
            eraser: false,
            cursor: None,
        }
    }

    pub fn canvas(&self) -> &PaintCanvas {
        &self.canvas
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
        self.canvas.break_stroke();
    }

    /// Clamp to the brush range. Non-finite sizes are ignored.
    pub fn set_size(&mut self, size: f32) -> bool {
        if !size.is_finite() {
            return false;
        }
        self.size = size.clamp(MIN_BRUSH_SIZE, MAX_BRUSH_SIZE);
        self.canvas.break_stroke();
        true
    }

    pub fn set_eraser(&mut self, on: bool) {
        self.eraser = on;
        self.canvas.break_stroke();
    }

    pub fn eraser(&self) -> bool {
        self.eraser
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn clear(&mut self) {
        self.canvas.clear();
    }

    fn eraser_radius(&self) -> f32 {
        self.size * ERASER_SCALE
    }
}

impl Default for PaintMode {
    fn default() -> Self {
        Self::new()
    }
}

impl ModeLogic for PaintMode {
    fn on_start(&mut self, _ctx: &mut ModeContext) {
        self.canvas.clear();
        self.cursor = None;
    }

    fn update(&mut self, _dt: f32, hands: &[MappedHand], ctx: &mut ModeContext) {
        let Some(hand) = hands.first() else {
            self.cursor = None;
            self.canvas.break_stroke();
            return;
        };

        let (x, y) = hand.tip();
        self.cursor = Some((x, y));

        if classify(hand) == Gesture::Pinch {
            self.canvas.break_stroke();
            return;
        }

        let now = ctx.now_ms();
        if self.eraser {
            let radius = self.eraser_radius();
            self.canvas.queue_erase(now, x, y, radius);
        } else {
            self.canvas.add_point(now, x, y, self.color, self.size);
        }
    }

    fn on_end(&mut self, ctx: &mut ModeContext) {
        self.canvas.clear();
        self.cursor = None;
        ctx.effects.clear();
    }

    fn draw(&self, list: &mut DrawList) {
        self.canvas.draw(list);
        if let Some((x, y)) = self.cursor {
            if self.eraser {
                list.ring(x, y, self.eraser_radius(), 2.0, with_alpha(colors::WHITE, 0.7));
            } else {
                list.circle(x, y, self.size * 0.5, self.color);
            }
        }
    }

    fn resets_score(&self) -> bool {
        true
    }
}
