//! Pose payload - the only thing sent over the wire
//!
//! Coordinates are normalized against the sender's canvas and quantized to
//! integers in 0..=1000, so peers with different canvas sizes agree and the
//! JSON stays tiny: `{"pose":[[wx,wy],[tx,ty]]}`, or `{}` as a heartbeat.

use serde::{Deserialize, Serialize};

use crate::engine::Result;
use crate::physics::CanvasSize;

/// Upper bound of the quantized range
pub const QUANT_MAX: u16 = 1000;

pub fn quantize(value: f32, extent: f32) -> u16 {
    if extent <= 0.0 || !value.is_finite() {
        return 0;
    }
    ((value / extent).clamp(0.0, 1.0) * QUANT_MAX as f32).round() as u16
}

pub fn dequantize(q: u16, extent: f32) -> f32 {
    q.min(QUANT_MAX) as f32 / QUANT_MAX as f32 * extent
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PosePayload {
    /// Wrist then fingertip; absent when no hand is visible
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pose: Option<Vec<[u16; 2]>>,
}

impl PosePayload {
    pub fn heartbeat() -> Self {
        Self { pose: None }
    }

    pub fn from_points(points: &[(f32, f32)], canvas: CanvasSize) -> Self {
        let pose = points
            .iter()
            .map(|&(x, y)| [quantize(x, canvas.width), quantize(y, canvas.height)])
            .collect();
        Self { pose: Some(pose) }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Where to draw this peer's cursor: the last point (the fingertip),
    /// back in local canvas pixels
    pub fn cursor(&self, canvas: CanvasSize) -> Option<(f32, f32)> {
        let [qx, qy] = *self.pose.as_ref()?.last()?;
        Some((dequantize(qx, canvas.width), dequantize(qy, canvas.height)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantize_clamps_and_rounds() {
        assert_eq!(quantize(640.0, 1280.0), 500);
        assert_eq!(quantize(-20.0, 1280.0), 0);
        assert_eq!(quantize(5000.0, 1280.0), QUANT_MAX);
        assert_eq!(quantize(f32::NAN, 1280.0), 0);
        assert_eq!(quantize(10.0, 0.0), 0);
    }

    #[test]
    fn test_wire_format() {
        let canvas = CanvasSize::new(1000.0, 500.0);
        let p = PosePayload::from_points(&[(100.0, 250.0), (900.0, 50.0)], canvas);
        assert_eq!(p.to_json().unwrap(), r#"{"pose":[[100,500],[900,100]]}"#);
        assert_eq!(PosePayload::heartbeat().to_json().unwrap(), "{}");
    }

    #[test]
    fn test_cursor_is_last_point() {
        let p = PosePayload::from_json(r#"{"pose":[[500,500],[520,480]]}"#).unwrap();
        let (x, y) = p.cursor(CanvasSize::new(1280.0, 720.0)).unwrap();
        assert!((x - 665.6).abs() < 1e-3);
        assert!((y - 345.6).abs() < 1e-3);
        assert_eq!(PosePayload::heartbeat().cursor(CanvasSize::default()), None);
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(PosePayload::from_json("{\"pose\": \"nope\"}").is_err());
        assert!(PosePayload::from_json("not json").is_err());
    }
}
