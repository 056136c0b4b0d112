//! 2D geometry helpers shared by hit-testing, tracing and maze movement

/// Euclidean distance between two points
pub fn distance(a: (f32, f32), b: (f32, f32)) -> f32 {
    let dx = b.0 - a.0;
    let dy = b.1 - a.1;
    (dx * dx + dy * dy).sqrt()
}

/// Shortest distance from `p` to the segment `a`-`b`
///
/// Degenerate segments (a == b) fall back to point distance.
pub fn point_segment_distance(p: (f32, f32), a: (f32, f32), b: (f32, f32)) -> f32 {
    let abx = b.0 - a.0;
    let aby = b.1 - a.1;
    let len_sq = abx * abx + aby * aby;

    if len_sq < 1e-8 {
        return distance(p, a);
    }

    let t = (((p.0 - a.0) * abx + (p.1 - a.1) * aby) / len_sq).clamp(0.0, 1.0);
    distance(p, (a.0 + abx * t, a.1 + aby * t))
}

/// Does a circle overlap an axis-aligned rectangle (x, y, w, h)?
pub fn circle_intersects_rect(c: (f32, f32), r: f32, rect: (f32, f32, f32, f32)) -> bool {
    let (x, y, w, h) = rect;
    if w <= 0.0 || h <= 0.0 {
        return false;
    }
    let nx = c.0.clamp(x, x + w);
    let ny = c.1.clamp(y, y + h);
    distance(c, (nx, ny)) <= r
}

/// Move `current` toward `target` by at most `max_step`
pub fn step_toward(current: (f32, f32), target: (f32, f32), max_step: f32) -> (f32, f32) {
    let d = distance(current, target);
    if d <= max_step || d < 1e-6 {
        return target;
    }
    let t = max_step / d;
    (
        current.0 + (target.0 - current.0) * t,
        current.1 + (target.1 - current.1) * t,
    )
}

/// Total length of a polyline
pub fn polyline_length(points: &[(f32, f32)]) -> f32 {
    points.windows(2).map(|w| distance(w[0], w[1])).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_distance_perpendicular() {
        let d = point_segment_distance((5.0, 3.0), (0.0, 0.0), (10.0, 0.0));
        assert!((d - 3.0).abs() < 1e-5);
    }

    #[test]
    fn test_segment_distance_past_endpoint() {
        let d = point_segment_distance((13.0, 4.0), (0.0, 0.0), (10.0, 0.0));
        assert!((d - 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_degenerate_segment() {
        let d = point_segment_distance((3.0, 4.0), (0.0, 0.0), (0.0, 0.0));
        assert!((d - 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_circle_rect() {
        assert!(circle_intersects_rect((0.0, 5.0), 2.0, (1.0, 0.0, 4.0, 10.0)));
        assert!(!circle_intersects_rect((-5.0, 5.0), 2.0, (1.0, 0.0, 4.0, 10.0)));
        assert!(!circle_intersects_rect((2.0, 5.0), 2.0, (1.0, 0.0, 4.0, 0.0)));
    }

    #[test]
    fn test_step_toward_stops_at_target() {
        assert_eq!(step_toward((0.0, 0.0), (3.0, 4.0), 10.0), (3.0, 4.0));
        let p = step_toward((0.0, 0.0), (3.0, 4.0), 2.5);
        assert!((distance((0.0, 0.0), p) - 2.5).abs() < 1e-5);
    }
}
