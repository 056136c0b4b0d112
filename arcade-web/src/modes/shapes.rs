//! Outline generators for the tracing game
//!
//! Every outline is a closed polyline: the last point equals the first, so
//! `points.len() - 1` is the segment count.

use std::f32::consts::{PI, TAU};

use rand::Rng;

use crate::physics::CanvasSize;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShapeKind {
    Circle,
    Rect,
    Ellipse,
    Triangle,
    Star,
    Heart,
    /// Regular polygon with this many sides
    Polygon(u8),
}

impl ShapeKind {
    pub fn label(self) -> &'static str {
        match self {
            ShapeKind::Circle => "Circle",
            ShapeKind::Rect => "Rectangle",
            ShapeKind::Ellipse => "Ellipse",
            ShapeKind::Triangle => "Triangle",
            ShapeKind::Star => "Star",
            ShapeKind::Heart => "Heart",
            ShapeKind::Polygon(_) => "Polygon",
        }
    }
}

pub fn circle(cx: f32, cy: f32, r: f32, segments: usize) -> Vec<(f32, f32)> {
    ellipse(cx, cy, r, r, segments)
}

pub fn ellipse(cx: f32, cy: f32, rx: f32, ry: f32, segments: usize) -> Vec<(f32, f32)> {
    let segments = segments.max(3);
    let mut points: Vec<(f32, f32)> = (0..segments)
        .map(|i| {
            let a = TAU * i as f32 / segments as f32 - PI / 2.0;
            (cx + rx * a.cos(), cy + ry * a.sin())
        })
        .collect();
    points.push(points[0]);
    points
}

/// Close a vertex loop, splitting every edge into `subdivisions` pieces
fn closed_polyline(vertices: &[(f32, f32)], subdivisions: usize) -> Vec<(f32, f32)> {
    let n = subdivisions.max(1);
    let mut points = Vec::with_capacity(vertices.len() * n + 1);
    for (i, &a) in vertices.iter().enumerate() {
        let b = vertices[(i + 1) % vertices.len()];
        for k in 0..n {
            let t = k as f32 / n as f32;
            points.push((a.0 + (b.0 - a.0) * t, a.1 + (b.1 - a.1) * t));
        }
    }
    if let Some(&first) = points.first() {
        points.push(first);
    }
    points
}

pub fn rect(cx: f32, cy: f32, w: f32, h: f32) -> Vec<(f32, f32)> {
    let (hw, hh) = (w / 2.0, h / 2.0);
    closed_polyline(
        &[(cx - hw, cy - hh), (cx + hw, cy - hh), (cx + hw, cy + hh), (cx - hw, cy + hh)],
        4,
    )
}

pub fn regular_polygon(cx: f32, cy: f32, r: f32, sides: usize, subdivisions: usize) -> Vec<(f32, f32)> {
    let sides = sides.max(3);
    let vertices: Vec<(f32, f32)> = (0..sides)
        .map(|i| {
            let a = TAU * i as f32 / sides as f32 - PI / 2.0;
            (cx + r * a.cos(), cy + r * a.sin())
        })
        .collect();
    closed_polyline(&vertices, subdivisions)
}

pub fn star(cx: f32, cy: f32, r: f32) -> Vec<(f32, f32)> {
    let inner = r * 0.45;
    let vertices: Vec<(f32, f32)> = (0..10)
        .map(|i| {
            let a = TAU * i as f32 / 10.0 - PI / 2.0;
            let rr = if i % 2 == 0 { r } else { inner };
            (cx + rr * a.cos(), cy + rr * a.sin())
        })
        .collect();
    closed_polyline(&vertices, 2)
}

/// Classic parametric heart, point down
pub fn heart(cx: f32, cy: f32, r: f32, segments: usize) -> Vec<(f32, f32)> {
    let segments = segments.max(8);
    let k = r / 17.0;
    let mut points: Vec<(f32, f32)> = (0..segments)
        .map(|i| {
            let t = TAU * i as f32 / segments as f32;
            let x = 16.0 * t.sin().powi(3);
            let y = 13.0 * t.cos() - 5.0 * (2.0 * t).cos() - 2.0 * (3.0 * t).cos() - (4.0 * t).cos();
            (cx + x * k, cy - y * k)
        })
        .collect();
    points.push(points[0]);
    points
}

/// Random shape centred on the canvas, sized to fit with a margin
pub fn random_outline<R: Rng>(rng: &mut R, canvas: CanvasSize) -> (ShapeKind, Vec<(f32, f32)>) {
    let (cx, cy) = canvas.center();
    let r = canvas.width.min(canvas.height) * rng.random_range(0.28f32..0.38);

    let kind = match rng.random_range(0..7u8) {
        0 => ShapeKind::Circle,
        1 => ShapeKind::Rect,
        2 => ShapeKind::Ellipse,
        3 => ShapeKind::Triangle,
        4 => ShapeKind::Star,
        5 => ShapeKind::Heart,
        _ => ShapeKind::Polygon(rng.random_range(5..=8u8)),
    };

    let points = match kind {
        ShapeKind::Circle => circle(cx, cy, r, 36),
        ShapeKind::Rect => rect(cx, cy, r * 2.4, r * 1.6),
        ShapeKind::Ellipse => ellipse(cx, cy, r * 1.35, r * 0.8, 40),
        ShapeKind::Triangle => regular_polygon(cx, cy, r, 3, 6),
        ShapeKind::Star => star(cx, cy, r),
        ShapeKind::Heart => heart(cx, cy, r, 48),
        ShapeKind::Polygon(sides) => regular_polygon(cx, cy, r, sides as usize, 3),
    };
    (kind, points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_outlines_are_closed() {
        let mut rng = Pcg32::seed_from_u64(11);
        let canvas = CanvasSize::default();
        for _ in 0..50 {
            let (kind, points) = random_outline(&mut rng, canvas);
            assert!(points.len() >= 4, "{:?}", kind);
            assert_eq!(points.first(), points.last(), "{:?}", kind);
            assert!(points.iter().all(|&(x, y)| canvas.contains(x, y, 0.0)), "{:?}", kind);
        }
    }

    #[test]
    fn test_circle_segment_count() {
        assert_eq!(circle(0.0, 0.0, 100.0, 18).len(), 19);
        assert_eq!(rect(0.0, 0.0, 10.0, 10.0).len(), 17);
        assert_eq!(star(0.0, 0.0, 10.0).len(), 21);
    }
}
