//! Paint canvas - stroke arena with lazy erase and batched compaction
//!
//! Points live in one arena interleaved with stroke breaks. Erasing only
//! flips a tombstone flag; the arena and the bucket index are rebuilt in one
//! pass once enough tombstones pile up.

use crate::engine::{Color, DrawList};
use crate::physics::distance;
use super::spatial_index::{SpatialIndex, BUCKET_SIZE};

/// Minimum pointer travel before a new point is recorded (px)
pub const PAINT_MIN_DISTANCE: f32 = 3.0;

/// Minimum time between recorded points if the pointer barely moves
pub const PAINT_MIN_INTERVAL_MS: f64 = 16.0;

/// Erase queries run at most this often
pub const ERASE_INTERVAL_MS: f64 = 33.0;

/// Hard cap on stored entries (points + breaks)
pub const MAX_PAINT_POINTS: usize = 20_000;

/// Compaction runs when both thresholds are exceeded
pub const COMPACT_DELETED_THRESHOLD: usize = 400;
pub const COMPACT_SIZE_THRESHOLD: usize = 1_200;

/// Queued eraser positions kept between throttled erase passes
const MAX_PENDING_ERASES: usize = 8;

#[derive(Clone, Debug, PartialEq)]
pub struct PaintPoint {
    pub x: f32,
    pub y: f32,
    pub timestamp_ms: f64,
    pub color: Color,
    pub size: f32,
    pub deleted: bool,
}

/// Arena entry: a point or a stroke separator
#[derive(Clone, Debug, PartialEq)]
pub enum StrokeEntry {
    Point(PaintPoint),
    Break,
}

pub struct PaintCanvas {
    entries: Vec<StrokeEntry>,
    index: SpatialIndex,
    deleted_count: usize,
    live: usize,
    last_point: Option<(f32, f32, f64)>,
    pending_erases: Vec<(f32, f32, f32)>,
    last_erase_ms: Option<f64>,
}

impl PaintCanvas {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            index: SpatialIndex::new(BUCKET_SIZE),
            deleted_count: 0,
            live: 0,
            last_point: None,
            pending_erases: Vec::with_capacity(MAX_PENDING_ERASES),
            last_erase_ms: None,
        }
    }

    /// Record a pointer sample. Returns true if a point was stored.
    pub fn add_point(&mut self, now_ms: f64, x: f32, y: f32, color: Color, size: f32) -> bool {
        if self.entries.len() >= MAX_PAINT_POINTS {
            return false;
        }

        if let Some((lx, ly, lt)) = self.last_point {
            let moved = distance((lx, ly), (x, y));
            if moved < PAINT_MIN_DISTANCE && now_ms - lt < PAINT_MIN_INTERVAL_MS {
                return false;
            }
        }

        let index = self.entries.len();
        self.entries.push(StrokeEntry::Point(PaintPoint {
            x,
            y,
            timestamp_ms: now_ms,
            color,
            size,
            deleted: false,
        }));
        self.index.insert(index, x, y);
        self.live += 1;
        self.last_point = Some((x, y, now_ms));
        true
    }

    /// End the current stroke (no-op if already broken)
    pub fn break_stroke(&mut self) {
        self.last_point = None;
        if matches!(self.entries.last(), Some(StrokeEntry::Point(_))) {
            self.entries.push(StrokeEntry::Break);
        }
    }

    /// Soft-delete every live point within `radius`. Returns the count.
    pub fn erase_at(&mut self, x: f32, y: f32, radius: f32) -> usize {
        let mut erased = 0;
        for i in self.index.query_circle(x, y, radius) {
            if let Some(StrokeEntry::Point(p)) = self.entries.get_mut(i) {
                if !p.deleted && distance((p.x, p.y), (x, y)) <= radius {
                    p.deleted = true;
                    erased += 1;
                }
            }
        }
        self.deleted_count += erased;
        self.live -= erased;
        erased
    }

    /// Throttled eraser: positions are queued and processed in one pass
    /// every `ERASE_INTERVAL_MS`. Returns points erased this call.
    pub fn queue_erase(&mut self, now_ms: f64, x: f32, y: f32, radius: f32) -> usize {
        if self.pending_erases.len() >= MAX_PENDING_ERASES {
            self.pending_erases.remove(0);
        }
        self.pending_erases.push((x, y, radius));

        if let Some(last) = self.last_erase_ms {
            if now_ms - last < ERASE_INTERVAL_MS {
                return 0;
            }
        }
        self.last_erase_ms = Some(now_ms);

        let pending = std::mem::take(&mut self.pending_erases);
        let erased: usize = pending.iter().map(|&(ex, ey, r)| self.erase_at(ex, ey, r)).sum();
        self.pending_erases = pending;
        self.pending_erases.clear();

        self.maybe_compact();
        erased
    }

    /// Compact if both thresholds are exceeded
    pub fn maybe_compact(&mut self) -> bool {
        if self.deleted_count > COMPACT_DELETED_THRESHOLD
            && self.entries.len() > COMPACT_SIZE_THRESHOLD
        {
            self.compact();
            true
        } else {
            false
        }
    }

    /// Drop tombstoned points and rebuild the bucket index from scratch.
    /// Stroke breaks are kept; runs of breaks collapse to one.
    pub fn compact(&mut self) {
        let before = self.entries.len();
        let old = std::mem::take(&mut self.entries);
        self.index.clear();

        for entry in old {
            match entry {
                StrokeEntry::Point(p) if p.deleted => {}
                StrokeEntry::Point(p) => {
                    self.index.insert(self.entries.len(), p.x, p.y);
                    self.entries.push(StrokeEntry::Point(p));
                }
                StrokeEntry::Break => {
                    if matches!(self.entries.last(), Some(StrokeEntry::Point(_))) {
                        self.entries.push(StrokeEntry::Break);
                    }
                }
            }
        }

        self.deleted_count = 0;
        log::debug!("paint compacted: {} -> {} entries", before, self.entries.len());
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.index.clear();
        self.deleted_count = 0;
        self.live = 0;
        self.last_point = None;
        self.pending_erases.clear();
    }

    /// Draw live strokes; tombstones split a stroke the same way a break does
    pub fn draw(&self, list: &mut DrawList) {
        let mut prev: Option<&PaintPoint> = None;
        for entry in &self.entries {
            match entry {
                StrokeEntry::Point(p) if !p.deleted => {
                    match prev {
                        Some(a) => list.line((a.x, a.y), (p.x, p.y), p.size * 0.5, p.color),
                        None => list.circle(p.x, p.y, p.size * 0.5, p.color),
                    }
                    prev = Some(p);
                }
                _ => prev = None,
            }
        }
    }

    pub fn entries(&self) -> &[StrokeEntry] {
        &self.entries
    }

    pub fn index(&self) -> &SpatialIndex {
        &self.index
    }

    pub fn deleted_count(&self) -> usize {
        self.deleted_count
    }

    pub fn live_count(&self) -> usize {
        self.live
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for PaintCanvas {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::colors;
    use crate::paint::spatial_index::bucket_key;

    fn fill_row(canvas: &mut PaintCanvas, y: f32, n: usize, t0: f64) {
        for i in 0..n {
            canvas.add_point(t0 + i as f64 * 20.0, i as f32 * 4.0, y, colors::RED, 6.0);
        }
    }

    /// Every live point sits in exactly one bucket, and that bucket matches its cell
    fn assert_index_consistent(canvas: &PaintCanvas) {
        let bs = canvas.index().bucket_size();
        for (i, entry) in canvas.entries().iter().enumerate() {
            if let StrokeEntry::Point(p) = entry {
                if p.deleted {
                    continue;
                }
                let homes: Vec<_> = canvas.index().entries().filter(|&(_, idx)| idx == i).collect();
                assert_eq!(homes.len(), 1, "point {} indexed {} times", i, homes.len());
                assert_eq!(homes[0].0, bucket_key(p.x, p.y, bs));
            }
        }
    }

    #[test]
    fn test_distance_and_time_threshold() {
        let mut canvas = PaintCanvas::new();
        assert!(canvas.add_point(0.0, 10.0, 10.0, colors::RED, 4.0));
        assert!(!canvas.add_point(5.0, 11.0, 10.0, colors::RED, 4.0));
        assert!(canvas.add_point(20.0, 11.0, 10.0, colors::RED, 4.0));
        assert!(canvas.add_point(21.0, 20.0, 10.0, colors::RED, 4.0));
        assert_eq!(canvas.len(), 3);
    }

    #[test]
    fn test_breaks_do_not_stack() {
        let mut canvas = PaintCanvas::new();
        canvas.break_stroke();
        assert!(canvas.is_empty());
        canvas.add_point(0.0, 0.0, 0.0, colors::RED, 4.0);
        canvas.break_stroke();
        canvas.break_stroke();
        assert_eq!(canvas.entries().last(), Some(&StrokeEntry::Break));
        assert_eq!(canvas.len(), 2);
    }

    #[test]
    fn test_erase_is_soft() {
        let mut canvas = PaintCanvas::new();
        fill_row(&mut canvas, 50.0, 20, 0.0);
        let erased = canvas.erase_at(0.0, 50.0, 10.0);
        assert_eq!(erased, 3); // x = 0, 4, 8
        assert_eq!(canvas.len(), 20);
        assert_eq!(canvas.live_count(), 17);
        // Erasing the same spot again touches nothing
        assert_eq!(canvas.erase_at(0.0, 50.0, 10.0), 0);
        assert_index_consistent(&canvas);
    }

    #[test]
    fn test_erase_throttle() {
        let mut canvas = PaintCanvas::new();
        fill_row(&mut canvas, 50.0, 50, 0.0);
        assert!(canvas.queue_erase(1000.0, 0.0, 50.0, 5.0) > 0);
        // Within the interval: queued, not processed
        assert_eq!(canvas.queue_erase(1010.0, 100.0, 50.0, 5.0), 0);
        assert_eq!(canvas.live_count(), 48);
        // Next window processes the queued position too
        assert!(canvas.queue_erase(1040.0, 196.0, 50.0, 5.0) > 0);
        assert_eq!(canvas.live_count(), 48 - 3 - 2);
    }

    /// Tombstone a whole `fill_row` row without touching its neighbours
    fn erase_row(canvas: &mut PaintCanvas, y: f32) -> usize {
        (0..=400).step_by(20).map(|x| canvas.erase_at(x as f32, y, 12.0)).sum()
    }

    fn count_live(canvas: &PaintCanvas) -> usize {
        canvas
            .entries()
            .iter()
            .filter(|e| matches!(e, StrokeEntry::Point(p) if !p.deleted))
            .count()
    }

    #[test]
    fn test_compaction_threshold_and_rebuild() {
        let mut canvas = PaintCanvas::new();
        for row in 0..13 {
            fill_row(&mut canvas, 10.0 + row as f32 * 30.0, 100, row as f64 * 10_000.0);
            canvas.break_stroke();
        }
        assert_eq!(canvas.len(), 1_313);
        assert!(canvas.len() > COMPACT_SIZE_THRESHOLD);

        // Exactly at the threshold is not enough
        for row in 0..4 {
            assert_eq!(erase_row(&mut canvas, 10.0 + row as f32 * 30.0), 100);
        }
        assert_eq!(canvas.deleted_count(), COMPACT_DELETED_THRESHOLD);
        assert!(!canvas.maybe_compact());
        assert_eq!(canvas.len(), 1_313);

        assert_eq!(erase_row(&mut canvas, 130.0), 100);
        assert!(canvas.deleted_count() > COMPACT_DELETED_THRESHOLD);
        assert!(canvas.maybe_compact());

        assert_eq!(canvas.deleted_count(), 0);
        assert_eq!(canvas.live_count(), 800);
        // Eight surviving rows, each still followed by its break
        assert_eq!(canvas.len(), 808);
        assert!(canvas.entries().iter().all(|e| !matches!(e, StrokeEntry::Point(p) if p.deleted)));
        assert_index_consistent(&canvas);
    }

    #[test]
    fn test_live_count_tracks_every_mutation() {
        let mut canvas = PaintCanvas::new();
        fill_row(&mut canvas, 50.0, 40, 0.0);
        canvas.break_stroke();
        fill_row(&mut canvas, 80.0, 40, 10_000.0);
        assert_eq!(canvas.live_count(), 80);

        canvas.erase_at(0.0, 50.0, 10.0);
        assert_eq!(canvas.live_count(), count_live(&canvas));
        canvas.compact();
        assert_eq!(canvas.live_count(), 77);
        assert_eq!(canvas.live_count(), count_live(&canvas));

        canvas.clear();
        assert_eq!(canvas.live_count(), 0);
    }
}
