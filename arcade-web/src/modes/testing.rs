//! Test support - a mode harness and synthetic hands

use std::cell::RefCell;
use std::rc::Rc;

use crate::bridge::{
    INDEX_TIP, LANDMARKS_PER_HAND, MIDDLE_TIP, PINKY_TIP, RING_TIP, THUMB_TIP, WRIST,
};
use crate::effects::{ParticlePool, PopupPool};
use crate::engine::collaborators::fakes::RecordingAudio;
use crate::engine::{Effects, GameSession, ModeContext, SoundGate};
use crate::physics::{CanvasSize, MappedHand, MappedPoint};
use super::Gesture;

/// Session, effects and a recording sound gate, enough to drive one mode
pub(crate) struct Harness {
    pub session: GameSession,
    pub effects: Effects,
    pub sounds: SoundGate,
    pub played: Rc<RefCell<Vec<String>>>,
}

impl Harness {
    pub fn new() -> Self {
        let audio = RecordingAudio::default();
        let played = audio.played.clone();
        let mut session = GameSession::new(CanvasSize::default(), 7);
        session.reset(60.0);
        Self {
            session,
            effects: Effects {
                particles: ParticlePool::new(220, 320),
                popups: PopupPool::new(24, 50.0),
            },
            sounds: SoundGate::new(Box::new(audio)),
            played,
        }
    }

    pub fn ctx(&mut self) -> ModeContext<'_> {
        ModeContext {
            session: &mut self.session,
            effects: &mut self.effects,
            sounds: &mut self.sounds,
        }
    }

    /// Move the clock forward, as the dispatcher does before each update
    pub fn advance(&mut self, dt: f32) {
        let now = self.session.now_ms() + dt as f64 * 1000.0;
        self.session.set_now(now);
    }

    pub fn played(&self, name: &str) -> usize {
        self.played.borrow().iter().filter(|s| s.as_str() == name).count()
    }
}

/// A plausible 21-joint hand whose index fingertip sits at `tip` and whose
/// shape classifies as `pose`. The wrist is straight below the index tip.
pub(crate) fn synthetic_hand(pose: Gesture, tip: (f32, f32)) -> MappedHand {
    let reach = match pose {
        Gesture::Open | Gesture::Pinch => 160.0,
        Gesture::Closed => 60.0,
        Gesture::None => 100.0,
    };
    let wrist = (tip.0, tip.1 + reach);

    let mut tips = [(0.0f32, 0.0f32); 5];
    tips[1] = tip;
    tips[2] = (tip.0 + 15.0, tip.1);
    tips[3] = (tip.0 + 30.0, tip.1);
    tips[4] = (tip.0 + 45.0, tip.1);
    tips[0] = match pose {
        Gesture::Pinch => (tip.0 + 10.0, tip.1 + 10.0),
        _ => (tip.0 - 80.0, tip.1 + reach * 0.5),
    };

    let mut points = [MappedPoint::default(); LANDMARKS_PER_HAND];
    points[WRIST] = MappedPoint { x: wrist.0, y: wrist.1, z: 0.0 };
    // Each finger: four joints evenly spaced from the wrist to its tip
    for (finger, &(tx, ty)) in tips.iter().enumerate() {
        for joint in 0..4 {
            let t = (joint + 1) as f32 / 4.0;
            points[1 + finger * 4 + joint] = MappedPoint {
                x: wrist.0 + (tx - wrist.0) * t,
                y: wrist.1 + (ty - wrist.1) * t,
                z: 0.0,
            };
        }
    }

    debug_assert_eq!(points[INDEX_TIP].x, tip.0);
    debug_assert_eq!(points[THUMB_TIP].x, tips[0].0);
    debug_assert!(points[MIDDLE_TIP].x > points[INDEX_TIP].x);
    debug_assert!(points[RING_TIP].x < points[PINKY_TIP].x);
    MappedHand { points }
}
