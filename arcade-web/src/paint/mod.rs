//! Paint module - freehand strokes with a bucket index for erasing
//!
//! Re-exports only. All logic in submodules.

mod spatial_index;
mod canvas;

pub use spatial_index::{SpatialIndex, BucketKey, bucket_key, BUCKET_SIZE};
pub use canvas::{
    PaintCanvas, PaintPoint, StrokeEntry,
    ERASE_INTERVAL_MS, MAX_PAINT_POINTS, COMPACT_DELETED_THRESHOLD, COMPACT_SIZE_THRESHOLD,
};
