//! Hand landmark parsing - detector output to typed frames
//!
//! The detector hands us one flat Float32Array per video frame:
//! `num_hands × 21 landmarks × (x, y, z)`, normalized to the video frame.
//! Anything malformed is dropped here so the engine only ever sees
//! complete, finite hands.

// ============================================================================
// HAND LANDMARK INDICES
// ============================================================================

pub const WRIST: usize = 0;
pub const THUMB_CMC: usize = 1;
pub const THUMB_MCP: usize = 2;
pub const THUMB_IP: usize = 3;
pub const THUMB_TIP: usize = 4;
pub const INDEX_MCP: usize = 5;
pub const INDEX_PIP: usize = 6;
pub const INDEX_DIP: usize = 7;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_MCP: usize = 9;
pub const MIDDLE_PIP: usize = 10;
pub const MIDDLE_DIP: usize = 11;
pub const MIDDLE_TIP: usize = 12;
pub const RING_MCP: usize = 13;
pub const RING_PIP: usize = 14;
pub const RING_DIP: usize = 15;
pub const RING_TIP: usize = 16;
pub const PINKY_MCP: usize = 17;
pub const PINKY_PIP: usize = 18;
pub const PINKY_DIP: usize = 19;
pub const PINKY_TIP: usize = 20;

/// Landmarks per detected hand
pub const LANDMARKS_PER_HAND: usize = 21;

/// The detector never reports more than two hands
pub const MAX_HANDS: usize = 2;

/// Hand skeleton connections, used for drawing and as slicing blades
pub const HAND_SKELETON: [(usize, usize); 21] = [
    (WRIST, THUMB_CMC), (THUMB_CMC, THUMB_MCP), (THUMB_MCP, THUMB_IP), (THUMB_IP, THUMB_TIP),
    (WRIST, INDEX_MCP), (INDEX_MCP, INDEX_PIP), (INDEX_PIP, INDEX_DIP), (INDEX_DIP, INDEX_TIP),
    (WRIST, MIDDLE_MCP), (MIDDLE_MCP, MIDDLE_PIP), (MIDDLE_PIP, MIDDLE_DIP), (MIDDLE_DIP, MIDDLE_TIP),
    (WRIST, RING_MCP), (RING_MCP, RING_PIP), (RING_PIP, RING_DIP), (RING_DIP, RING_TIP),
    (WRIST, PINKY_MCP), (PINKY_MCP, PINKY_PIP), (PINKY_PIP, PINKY_DIP), (PINKY_DIP, PINKY_TIP),
    (INDEX_MCP, MIDDLE_MCP),
];

/// Fingertips used by the open/closed hand heuristic
pub const FINGERTIPS: [usize; 4] = [INDEX_TIP, MIDDLE_TIP, RING_TIP, PINKY_TIP];

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// A single hand joint, normalized to the video frame (z is relative depth)
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Landmark {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

/// One detector result: the video frame size plus every complete hand
#[derive(Clone, Debug, Default)]
pub struct HandFrame {
    pub frame_width: f32,
    pub frame_height: f32,
    pub hands: Vec<Vec<Landmark>>,
}

impl HandFrame {
    /// A frame with no hands visible
    pub fn empty(frame_width: f32, frame_height: f32) -> Self {
        Self {
            frame_width,
            frame_height,
            hands: Vec::new(),
        }
    }
}

// ============================================================================
// PARSING
// ============================================================================

/// Parse the detector's flat landmark array.
///
/// Hands that are truncated or contain non-finite values are treated as
/// not visible this frame. Never fails.
pub fn parse_hand_frame(
    flat_data: &[f32],
    num_hands: usize,
    frame_width: f32,
    frame_height: f32,
) -> HandFrame {
    let mut frame = HandFrame::empty(frame_width, frame_height);
    let stride = LANDMARKS_PER_HAND * 3;

    for h in 0..num_hands.min(MAX_HANDS) {
        let base = h * stride;
        let Some(chunk) = flat_data.get(base..base + stride) else {
            log::debug!("hand {} truncated ({} floats total)", h, flat_data.len());
            break;
        };

        let hand: Vec<Landmark> = chunk
            .chunks_exact(3)
            .map(|c| Landmark::new(c[0], c[1], c[2]))
            .collect();

        if hand.iter().all(Landmark::is_finite) {
            frame.hands.push(hand);
        }
    }

    frame
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_hand(x: f32, y: f32) -> Vec<f32> {
        (0..LANDMARKS_PER_HAND).flat_map(|_| [x, y, 0.0]).collect()
    }

    #[test]
    fn test_parses_two_hands() {
        let mut data = flat_hand(0.2, 0.3);
        data.extend(flat_hand(0.7, 0.8));
        let frame = parse_hand_frame(&data, 2, 640.0, 480.0);
        assert_eq!(frame.hands.len(), 2);
        assert_eq!(frame.hands[1][INDEX_TIP], Landmark::new(0.7, 0.8, 0.0));
    }

    #[test]
    fn test_truncated_hand_is_dropped() {
        let mut data = flat_hand(0.2, 0.3);
        data.extend_from_slice(&[0.5; 10]);
        let frame = parse_hand_frame(&data, 2, 640.0, 480.0);
        assert_eq!(frame.hands.len(), 1);
    }

    #[test]
    fn test_nan_hand_is_dropped() {
        let mut data = flat_hand(0.2, 0.3);
        data[5] = f32::NAN;
        let frame = parse_hand_frame(&data, 1, 640.0, 480.0);
        assert!(frame.hands.is_empty());
    }

    #[test]
    fn test_extra_hands_ignored() {
        let data: Vec<f32> = (0..3).flat_map(|_| flat_hand(0.5, 0.5)).collect();
        let frame = parse_hand_frame(&data, 3, 640.0, 480.0);
        assert_eq!(frame.hands.len(), MAX_HANDS);
    }
}
