//! Hand pose classifier - open palm, fist, pinch
//!
//! Pure distance heuristics in canvas pixels, no model. Pinch wins over the
//! open/closed test so a pinch with the other fingers spread still reads as
//! a pinch.

use crate::bridge::FINGERTIPS;
use crate::physics::{distance, MappedHand};

/// Thumb tip to index tip below this is a pinch
pub const PINCH_DISTANCE: f32 = 40.0;
/// Average fingertip-to-wrist distance above this is an open hand
pub const OPEN_DISTANCE: f32 = 120.0;
/// ...and below this a closed fist
pub const CLOSED_DISTANCE: f32 = 85.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Gesture {
    Open,
    Closed,
    Pinch,
    /// Ambiguous pose, or no hand
    None,
}

impl Gesture {
    /// The poses a sequence can ask for
    pub const PLAYABLE: [Gesture; 3] = [Gesture::Open, Gesture::Closed, Gesture::Pinch];

    pub fn label(self) -> &'static str {
        match self {
            Gesture::Open => "OPEN",
            Gesture::Closed => "FIST",
            Gesture::Pinch => "PINCH",
            Gesture::None => "-",
        }
    }
}

pub fn classify(hand: &MappedHand) -> Gesture {
    if distance(hand.thumb_tip(), hand.tip()) < PINCH_DISTANCE {
        return Gesture::Pinch;
    }

    let wrist = hand.wrist();
    let spread = FINGERTIPS
        .iter()
        .map(|&i| distance(hand.point(i), wrist))
        .sum::<f32>()
        / FINGERTIPS.len() as f32;

    if spread > OPEN_DISTANCE {
        Gesture::Open
    } else if spread < CLOSED_DISTANCE {
        Gesture::Closed
    } else {
        Gesture::None
    }
}
