//! End-to-end frame scenarios through the dispatcher

use std::cell::RefCell;
use std::rc::Rc;

use super::collaborators::fakes::{RecordingAudio, RecordingNetwork};
use super::*;
use crate::bridge::{parse_hand_frame, HandFrame, LANDMARKS_PER_HAND};
use crate::modes::testing::synthetic_hand;
use crate::modes::{
    circle, GameMode, Gesture, GestureSequence, ModeId, ObjectKind, Phase, ShapeKind, TraceTarget,
    TRACE_TOLERANCE,
};
use crate::physics::{distance, CanvasSize, MappedHand};

const FRAME_MS: f64 = 1000.0 / 30.0;

struct Rig {
    engine: Engine,
    played: Rc<RefCell<Vec<String>>>,
    sent: Rc<RefCell<Vec<String>>>,
    now: f64,
}

impl Rig {
    fn new() -> Self {
        let config = EngineConfig {
            seed: Some(1234),
            ..EngineConfig::default()
        };
        let mut engine = Engine::new(config).expect("default config is valid");
        let audio = RecordingAudio::default();
        let network = RecordingNetwork::default();
        let played = audio.played.clone();
        let sent = network.sent.clone();
        engine.set_audio(Box::new(audio));
        engine.set_network(Box::new(network));
        Self { engine, played, sent, now: 1000.0 }
    }

    fn start(&mut self, id: ModeId) {
        self.engine.set_mode(id);
        self.engine.start_game(self.now).expect("idle engine starts");
        self.engine.pipeline_ready(Ok(())).expect("starting engine accepts ready");
    }

    fn frame(&mut self, hands: Vec<MappedHand>) {
        self.now += FRAME_MS;
        self.engine.step(self.now, hands);
    }

    fn played(&self, name: &str) -> usize {
        self.played.borrow().iter().filter(|s| s.as_str() == name).count()
    }
}

// ============================================================================
// SCENARIOS
// ============================================================================

#[test]
fn test_fruit_slice_hit_scores_and_removes_after_delay() {
    let mut rig = Rig::new();
    rig.start(ModeId::FruitSlice);

    let id = rig
        .engine
        .mode_mut()
        .as_fruit_slice_mut()
        .expect("fruit mode")
        .insert_object(ObjectKind::Fruit, 640.0, 360.0, 30.0);

    // Index finger bone runs straight through the fruit
    let hand = synthetic_hand(Gesture::Open, (640.0, 300.0));
    rig.frame(vec![hand.clone()]);

    assert_eq!(rig.engine.session().score(), 10);
    assert_eq!(rig.played("slice"), 1);
    assert!(!rig.engine.effects().particles.is_empty());
    let popups: Vec<&str> = rig.engine.effects().popups.iter().map(|p| p.text.as_str()).collect();
    assert_eq!(popups, vec!["+10"]);

    let live = |rig: &Rig| {
        let GameMode::FruitSlice(f) = rig.engine.mode() else {
            panic!("fruit mode");
        };
        f.objects().iter().any(|o| o.id == id)
    };
    assert!(live(&rig));

    // Still there while the slice feedback shows, gone after the delay
    for _ in 0..3 {
        rig.frame(vec![hand.clone()]);
    }
    assert!(live(&rig));
    for _ in 0..6 {
        rig.frame(vec![hand.clone()]);
    }
    assert!(!live(&rig));
    assert_eq!(rig.engine.session().score(), 10);
}

#[test]
fn test_shape_trace_circle_completes() {
    let mut rig = Rig::new();
    rig.start(ModeId::ShapeTrace);

    let (cx, cy, r) = (640.0, 360.0, 220.0);
    rig.engine
        .mode_mut()
        .as_shape_trace_mut()
        .expect("trace mode")
        .set_target(TraceTarget::new(ShapeKind::Circle, circle(cx, cy, r, 18)));

    for &p in &circle(cx, cy, r + TRACE_TOLERANCE * 0.7, 72) {
        rig.frame(vec![synthetic_hand(Gesture::Open, p)]);
    }

    let GameMode::ShapeTrace(trace) = rig.engine.mode() else {
        panic!("trace mode");
    };
    assert_eq!(trace.last_completed, Some((18, 18)));
    assert_eq!(trace.completed(), 1);
    assert_eq!(rig.engine.session().score(), 50);
    assert_eq!(rig.played("shape_done"), 1);
}

#[test]
fn test_gesture_sequence_grows_then_shrinks() {
    let mut rig = Rig::new();
    let seq = vec![Gesture::Open, Gesture::Closed, Gesture::Pinch];
    rig.engine.install_mode(GameMode::Gesture(GestureSequence::with_sequence(seq)));
    rig.engine.start_game(rig.now).unwrap();
    rig.engine.pipeline_ready(Ok(())).unwrap();

    let phase = |rig: &Rig| rig.engine.mode().as_gesture().map(GestureSequence::phase);
    let len = |rig: &Rig| rig.engine.mode().as_gesture().map_or(0, |g| g.sequence().len());

    // Show phase: three cues
    for _ in 0..80 {
        rig.frame(Vec::new());
    }
    assert!(matches!(phase(&rig), Some(Phase::Input { index: 0 })));

    for pose in [Gesture::Open, Gesture::Closed, Gesture::Pinch] {
        for _ in 0..24 {
            rig.frame(vec![synthetic_hand(pose, (640.0, 300.0))]);
        }
    }
    assert_eq!(len(&rig), 4);
    assert_eq!(rig.engine.session().score(), 30);

    // Watch the four cues, then answer wrong
    for _ in 0..110 {
        rig.frame(Vec::new());
    }
    assert!(matches!(phase(&rig), Some(Phase::Input { index: 0 })));
    let first = rig.engine.mode().as_gesture().map(|g| g.sequence()[0]).unwrap();
    let wrong = Gesture::PLAYABLE.into_iter().find(|&g| g != first).unwrap();
    for _ in 0..24 {
        rig.frame(vec![synthetic_hand(wrong, (640.0, 300.0))]);
    }
    assert_eq!(len(&rig), 3);
    assert!(matches!(phase(&rig), Some(Phase::Show { .. })));
    assert_eq!(rig.engine.session().score(), 30);
}

#[test]
fn test_peer_cursor_converges_then_expires() {
    let mut rig = Rig::new();
    rig.engine.push_peer_state("a", r#"{"pose":[[100,100],[100,100]]}"#);
    rig.engine.push_peer_state("b", r#"{"pose":[[900,900],[900,900]]}"#);
    rig.frame(Vec::new());
    assert_eq!(rig.engine.peers().len(), 2);

    rig.engine.push_peer_state("a", r#"{"pose":[[500,500],[520,480]]}"#);
    rig.engine.push_peer_state("b", r#"{"pose":[[500,500],[520,480]]}"#);
    let canvas = rig.engine.session().canvas();
    let target = (0.52 * canvas.width, 0.48 * canvas.height);

    let mut last = f32::MAX;
    for _ in 0..30 {
        rig.frame(Vec::new());
        let p = rig.engine.peers().get("a").expect("peer a live");
        let d = distance((p.x, p.y), target);
        assert!(d <= last);
        last = d;
    }
    assert!(last < 1.0);

    // 2.2s of silence
    for _ in 0..70 {
        rig.frame(Vec::new());
    }
    assert!(rig.engine.peers().is_empty());
}

// ============================================================================
// DISPATCHER PROPERTIES
// ============================================================================

#[test]
fn test_dt_is_clamped() {
    assert_eq!(clamp_dt(None), 0.0);
    assert_eq!(clamp_dt(Some(16.0)), 0.016);
    assert_eq!(clamp_dt(Some(5000.0)), DT_MAX);
    assert_eq!(clamp_dt(Some(-30.0)), 0.0);
    assert_eq!(clamp_dt(Some(f64::NAN)), 0.0);
}

#[test]
fn test_stalled_tab_moves_objects_one_clamped_step() {
    let mut rig = Rig::new();
    rig.start(ModeId::FruitSlice);
    rig.frame(Vec::new());
    rig.engine
        .mode_mut()
        .as_fruit_slice_mut()
        .unwrap()
        .insert_object(ObjectKind::Fruit, 640.0, 100.0, 30.0);

    rig.now += 10_000.0;
    rig.engine.step(rig.now, Vec::new());

    let GameMode::FruitSlice(f) = rig.engine.mode() else {
        panic!("fruit mode");
    };
    let o = f.objects().iter().find(|o| o.x == 640.0).expect("fruit kept");
    // One step of gravity from rest: v = g*dt, y += v*dt
    let max_drop = crate::modes::GRAVITY * DT_MAX * DT_MAX + 1e-3;
    assert!(o.y - 100.0 <= max_drop);
}

#[test]
fn test_network_send_is_throttled() {
    let mut rig = Rig::new();
    for i in 0..10 {
        rig.engine.step(rig.now + i as f64 * 5.0, Vec::new());
    }
    assert_eq!(rig.sent.borrow().len(), 1);
    assert_eq!(rig.sent.borrow()[0], "{}");

    rig.now += 200.0;
    rig.frame(vec![synthetic_hand(Gesture::Open, (640.0, 360.0))]);
    assert_eq!(rig.sent.borrow().len(), 2);
    assert!(rig.sent.borrow()[1].starts_with(r#"{"pose":[["#));
}

#[test]
fn test_network_failure_does_not_stop_frames() {
    let mut rig = Rig::new();
    rig.engine.set_network(Box::new(RecordingNetwork { fail: true, ..Default::default() }));
    rig.start(ModeId::Follow);
    for _ in 0..10 {
        rig.frame(Vec::new());
    }
    assert_eq!(rig.engine.phase(), EnginePhase::Running);
}

#[test]
fn test_pipeline_failure_returns_to_idle() {
    let mut rig = Rig::new();
    rig.engine.start_game(rig.now).unwrap();
    let err = rig.engine.pipeline_ready(Err("camera denied".into())).unwrap_err();
    assert!(matches!(err, EngineError::PipelineUnavailable(_)));
    assert_eq!(rig.engine.phase(), EnginePhase::Idle);
    assert!(rig.engine.pipeline_ready(Ok(())).is_err());
}

#[test]
fn test_double_start_is_rejected() {
    let mut rig = Rig::new();
    rig.start(ModeId::Runner);
    assert!(matches!(
        rig.engine.start_game(rig.now),
        Err(EngineError::InvalidTransition { from: "running", .. })
    ));
}

#[test]
fn test_timer_expiry_saves_score_and_returns_to_idle() {
    let mut rig = Rig::new();
    rig.engine.set_player_name("  Ana ");
    rig.start(ModeId::Follow);

    // 60s round at 30fps, plus a little
    for _ in 0..1810 {
        rig.frame(Vec::new());
        if rig.engine.phase() != EnginePhase::Running {
            break;
        }
    }
    assert_eq!(rig.engine.phase(), EnginePhase::Ending);
    assert!(rig.engine.hud_text().starts_with("Game over"));
    assert_eq!(rig.played("game_over"), 1);

    let scores = rig.engine.load_scores(ModeId::Follow).unwrap();
    assert_eq!(scores.len(), 1);
    assert_eq!(scores[0].name, "Ana");
    assert!(rig.engine.load_scores(ModeId::FruitSlice).unwrap().is_empty());

    for _ in 0..80 {
        rig.frame(Vec::new());
    }
    assert_eq!(rig.engine.phase(), EnginePhase::Idle);
}

#[test]
fn test_paint_is_untimed_and_resets_score() {
    let mut rig = Rig::new();
    rig.start(ModeId::Paint);
    assert!(!rig.engine.session().is_timed());
    for i in 0..20 {
        rig.frame(vec![synthetic_hand(Gesture::Open, (300.0 + i as f32 * 10.0, 300.0))]);
    }
    assert_eq!(rig.engine.phase(), EnginePhase::Running);
    assert_eq!(rig.engine.metrics().paint_points, 20);
    assert_eq!(rig.engine.hud_text(), "Paint | Score: 0");
}

#[test]
fn test_mode_switch_discards_outgoing_state() {
    let mut rig = Rig::new();
    rig.start(ModeId::FruitSlice);
    rig.engine
        .mode_mut()
        .as_fruit_slice_mut()
        .unwrap()
        .insert_object(ObjectKind::Fruit, 640.0, 360.0, 30.0);
    rig.frame(vec![synthetic_hand(Gesture::Open, (640.0, 300.0))]);
    assert_eq!(rig.engine.session().score(), 10);

    rig.engine.set_mode(ModeId::Runner);
    assert_eq!(rig.engine.mode_id(), ModeId::Runner);
    assert!(rig.engine.effects().particles.is_empty());
    assert!(rig.engine.effects().popups.is_empty());
    // Runner keeps the running score
    assert_eq!(rig.engine.session().score(), 10);

    rig.engine.set_mode(ModeId::ShapeTrace);
    assert_eq!(rig.engine.session().score(), 0);
    assert!(rig.engine.mode().as_shape_trace().and_then(|t| t.target()).is_some());
}

#[test]
fn test_detector_frame_is_mapped_into_canvas() {
    let mut rig = Rig::new();
    // 640x480 video on the 1280x720 canvas: scale 2, vertical crop of 120
    let mut flat = vec![0.5f32; LANDMARKS_PER_HAND * 3];
    flat[0] = 0.25;
    flat[1] = 0.5;
    let frame: HandFrame = parse_hand_frame(&flat, 1, 640.0, 480.0);
    rig.now += FRAME_MS;
    rig.engine.on_frame(rig.now, &frame);

    let hands = rig.engine.hands();
    assert_eq!(hands.len(), 1);
    let (x, y) = hands[0].wrist();
    assert!((x - 320.0).abs() < 1e-3);
    assert!((y - 360.0).abs() < 1e-3);

    // Truncated detector output is treated as no hand
    let bad = parse_hand_frame(&flat[..30], 1, 640.0, 480.0);
    rig.now += FRAME_MS;
    rig.engine.on_frame(rig.now, &bad);
    assert!(rig.engine.hands().is_empty());
}

#[test]
fn test_bad_paint_color_is_rejected() {
    let mut rig = Rig::new();
    assert!(matches!(rig.engine.set_paint_color("purple"), Err(EngineError::Config(_))));
    assert!(rig.engine.set_paint_color("#ff8800").is_ok());
}

#[test]
fn test_non_finite_paint_size_keeps_brush() {
    let mut rig = Rig::new();
    rig.start(ModeId::Paint);
    rig.engine.set_paint_size(20.0).unwrap();
    assert!(matches!(rig.engine.set_paint_size(f32::NAN), Err(EngineError::Config(_))));
    let paint = rig.engine.mode().as_paint().unwrap();
    assert_eq!(paint.size(), 20.0);
}

#[test]
fn test_resize_moves_canvas_and_surface_extent() {
    let mut rig = Rig::new();
    rig.engine.resize(1920.0, 1080.0);
    assert_eq!(rig.engine.session().canvas().surface_extent(), (1920, 1080));
    rig.engine.resize(0.0, 600.0);
    rig.engine.resize(f32::NAN, 600.0);
    assert_eq!(rig.engine.session().canvas(), CanvasSize::new(1920.0, 1080.0));
}
