//! Coordinate mapper - normalized landmarks to canvas pixels
//!
//! The video is drawn with a "cover" fit (uniform scale, centered, excess
//! cropped). Landmarks go through the exact same transform, otherwise the
//! skeleton and every hit-test drift away from the hand on screen.

use crate::bridge::{Landmark, LANDMARKS_PER_HAND, WRIST, INDEX_TIP, THUMB_TIP};

/// Canvas dimensions in pixels
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CanvasSize {
    pub width: f32,
    pub height: f32,
}

impl CanvasSize {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> (f32, f32) {
        (self.width * 0.5, self.height * 0.5)
    }

    /// Is the point inside the canvas, with an optional margin outside it?
    pub fn contains(&self, x: f32, y: f32, margin: f32) -> bool {
        x >= -margin && y >= -margin && x <= self.width + margin && y <= self.height + margin
    }

    /// Whole-pixel size for the drawing surface, never zero
    pub fn surface_extent(&self) -> (u32, u32) {
        let px = |v: f32| if v.is_finite() { v.round().max(1.0) as u32 } else { 1 };
        (px(self.width), px(self.height))
    }
}

impl Default for CanvasSize {
    fn default() -> Self {
        Self::new(1280.0, 720.0)
    }
}

/// A landmark in canvas pixel space (z passes through unscaled)
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MappedPoint {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl MappedPoint {
    pub fn xy(&self) -> (f32, f32) {
        (self.x, self.y)
    }
}

/// Uniform scale + offset that makes the video frame cover the canvas
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CoverTransform {
    pub scale: f32,
    pub offset_x: f32,
    pub offset_y: f32,
    frame_width: f32,
    frame_height: f32,
}

impl CoverTransform {
    pub fn new(frame_width: f32, frame_height: f32, canvas: CanvasSize) -> Self {
        // No video metadata yet: treat the frame as the canvas itself
        let (fw, fh) = if frame_width > 0.0 && frame_height > 0.0 {
            (frame_width, frame_height)
        } else {
            (canvas.width, canvas.height)
        };

        let scale = (canvas.width / fw).max(canvas.height / fh);
        Self {
            scale,
            offset_x: (canvas.width - fw * scale) / 2.0,
            offset_y: (canvas.height - fh * scale) / 2.0,
            frame_width: fw,
            frame_height: fh,
        }
    }

    pub fn apply(&self, lm: &Landmark) -> MappedPoint {
        MappedPoint {
            x: self.offset_x + lm.x * self.frame_width * self.scale,
            y: self.offset_y + lm.y * self.frame_height * self.scale,
            z: lm.z,
        }
    }

    /// Destination rectangle (x, y, w, h) the video frame must be drawn into
    pub fn video_rect(&self) -> (f32, f32, f32, f32) {
        (
            self.offset_x,
            self.offset_y,
            self.frame_width * self.scale,
            self.frame_height * self.scale,
        )
    }
}

/// Map a landmark list into canvas space. Empty in, empty out.
pub fn map_landmarks(
    landmarks: &[Landmark],
    frame_width: f32,
    frame_height: f32,
    canvas_width: f32,
    canvas_height: f32,
) -> Vec<MappedPoint> {
    let transform = CoverTransform::new(
        frame_width,
        frame_height,
        CanvasSize::new(canvas_width, canvas_height),
    );
    landmarks.iter().map(|lm| transform.apply(lm)).collect()
}

// ============================================================================
// MAPPED HAND
// ============================================================================

/// A complete hand (21 joints) in canvas space
#[derive(Clone, Debug, PartialEq)]
pub struct MappedHand {
    pub points: [MappedPoint; LANDMARKS_PER_HAND],
}

impl MappedHand {
    /// Build from mapped points; anything but exactly 21 joints is rejected
    pub fn from_points(points: &[MappedPoint]) -> Option<Self> {
        let points: [MappedPoint; LANDMARKS_PER_HAND] = points.try_into().ok()?;
        Some(Self { points })
    }

    pub fn point(&self, index: usize) -> (f32, f32) {
        self.points[index].xy()
    }

    /// Index fingertip, the pointer for every mode
    pub fn tip(&self) -> (f32, f32) {
        self.point(INDEX_TIP)
    }

    pub fn wrist(&self) -> (f32, f32) {
        self.point(WRIST)
    }

    pub fn thumb_tip(&self) -> (f32, f32) {
        self.point(THUMB_TIP)
    }
}
