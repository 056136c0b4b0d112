//! Physics module - coordinate mapping and 2D geometry
//!
//! Re-exports only. All logic in submodules.

mod mapper;
mod geometry;

pub use mapper::{CanvasSize, CoverTransform, MappedHand, MappedPoint, map_landmarks};
pub use geometry::{
    distance, point_segment_distance, circle_intersects_rect, step_toward, polyline_length,
};
