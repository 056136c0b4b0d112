//! Frame dispatcher - lifecycle, per-frame ordering, collaborators
//!
//! One `Engine` owns everything mutable. Each video frame runs, in order:
//! peer inbox drain, landmark mapping, mode update, fruit collision,
//! effects, round timer, pose send, peer smoothing, draw list, metrics.

use crate::bridge::{HandFrame, HAND_SKELETON};
use crate::effects::{ParticlePool, PopupPool};
use crate::modes::{GameMode, ModeId, DEFAULT_BRUSH_SIZE};
use crate::net::{PeerEvent, PeerInbox, PeerTracker, PosePayload, SendThrottle};
use crate::physics::{map_landmarks, CanvasSize, MappedHand};
use super::collaborators::{AudioSink, NetworkSink, OfflineNetwork, ScoreStore, SilentAudio};
use super::config::{EngineConfig, DT_MAX, ENDING_DISPLAY_MS};
use super::draw::{colors, parse_hex_color, with_alpha, Color, DrawList};
use super::error::{EngineError, Result};
use super::leaderboard::{MemoryScoreStore, ScoreEntry};
use super::metrics::FrameMetrics;
use super::session::{Effects, GameSession, ModeContext};
use super::sound::SoundGate;

const DEFAULT_SEED: u64 = 0x5EED_CAFE;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnginePhase {
    Idle,
    /// Waiting for the camera/detector to confirm
    Starting,
    Running,
    /// Final score on screen
    Ending,
}

impl EnginePhase {
    pub fn as_str(self) -> &'static str {
        match self {
            EnginePhase::Idle => "idle",
            EnginePhase::Starting => "starting",
            EnginePhase::Running => "running",
            EnginePhase::Ending => "ending",
        }
    }
}

/// Toolbar state, kept across mode switches
#[derive(Clone, Copy, Debug)]
struct PaintSettings {
    color: Color,
    size: f32,
    eraser: bool,
}

/// Step size for a frame gap: 0 on the first frame, never above `DT_MAX`
pub fn clamp_dt(gap_ms: Option<f64>) -> f32 {
    match gap_ms {
        Some(gap) if gap.is_finite() => ((gap / 1000.0) as f32).clamp(0.0, DT_MAX),
        _ => 0.0,
    }
}

pub struct Engine {
    config: EngineConfig,
    phase: EnginePhase,
    mode: GameMode,
    session: GameSession,
    effects: Effects,
    sounds: SoundGate,
    scores: Box<dyn ScoreStore>,
    network: Box<dyn NetworkSink>,
    throttle: SendThrottle,
    peers: PeerTracker,
    inbox: PeerInbox,
    hands: Vec<MappedHand>,
    paint: PaintSettings,
    player_name: String,
    last_frame_ms: Option<f64>,
    ending_until_ms: Option<f64>,
    draw_list: DrawList,
    metrics: FrameMetrics,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let canvas = config.canvas();
        let seed = config.seed.unwrap_or(DEFAULT_SEED);

        log::info!(
            "engine: canvas {}x{}, round {}s, seed {}",
            canvas.width, canvas.height, config.round_seconds, seed
        );

        Ok(Self {
            phase: EnginePhase::Idle,
            mode: GameMode::new(ModeId::FruitSlice),
            session: GameSession::new(canvas, seed),
            effects: Effects {
                particles: ParticlePool::new(config.particle_soft_cap, config.particle_hard_cap),
                popups: PopupPool::new(config.popup_cap, config.popup_min_interval_ms),
            },
            sounds: SoundGate::new(Box::new(SilentAudio)),
            scores: Box::new(MemoryScoreStore::new()),
            network: Box::new(OfflineNetwork),
            throttle: SendThrottle::new(config.network_interval_ms),
            peers: PeerTracker::new(config.peer_timeout_ms),
            inbox: PeerInbox::new(),
            hands: Vec::with_capacity(2),
            paint: PaintSettings {
                color: colors::CYAN,
                size: DEFAULT_BRUSH_SIZE,
                eraser: false,
            },
            player_name: config.player_name.clone(),
            last_frame_ms: None,
            ending_until_ms: None,
            draw_list: DrawList::new(),
            metrics: FrameMetrics::default(),
            config,
        })
    }

    // ========================================================================
    // COLLABORATORS
    // ========================================================================

    pub fn set_audio(&mut self, audio: Box<dyn AudioSink>) {
        self.sounds.replace_sink(audio);
    }

    pub fn set_score_store(&mut self, store: Box<dyn ScoreStore>) {
        self.scores = store;
    }

    pub fn set_network(&mut self, network: Box<dyn NetworkSink>) {
        self.network = network;
        self.throttle.reset();
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn phase(&self) -> EnginePhase {
        self.phase
    }

    pub fn mode_id(&self) -> ModeId {
        self.mode.id()
    }

    pub fn mode(&self) -> &GameMode {
        &self.mode
    }

    pub fn mode_mut(&mut self) -> &mut GameMode {
        &mut self.mode
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn effects(&self) -> &Effects {
        &self.effects
    }

    pub fn peers(&self) -> &PeerTracker {
        &self.peers
    }

    pub fn hands(&self) -> &[MappedHand] {
        &self.hands
    }

    pub fn draw_list(&self) -> &DrawList {
        &self.draw_list
    }

    pub fn metrics(&self) -> &FrameMetrics {
        &self.metrics
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn load_scores(&self, mode: ModeId) -> Result<Vec<ScoreEntry>> {
        self.scores.load_scores(mode.as_str())
    }

    /// Split borrow: the active mode plus the context it runs against
    fn parts(&mut self) -> (&mut GameMode, ModeContext<'_>) {
        (
            &mut self.mode,
            ModeContext {
                session: &mut self.session,
                effects: &mut self.effects,
                sounds: &mut self.sounds,
            },
        )
    }

    // ========================================================================
    // LIFECYCLE
    // ========================================================================

    /// Switch modes. The outgoing mode drops its transient state; a round in
    /// progress carries on in the new mode with its score, unless the new
    /// mode resets score on entry.
    pub fn set_mode(&mut self, id: ModeId) {
        if self.mode.id() == id {
            return;
        }
        let active = matches!(self.phase, EnginePhase::Starting | EnginePhase::Running);

        let (mode, mut ctx) = self.parts();
        mode.on_end(&mut ctx);
        self.install_mode(GameMode::new(id));

        if self.mode.resets_score() {
            self.session.reset_score();
        }
        if active {
            let (mode, mut ctx) = self.parts();
            mode.on_start(&mut ctx);
        }
        log::info!("mode -> {}", id);
    }

    /// Put a mode in place without lifecycle calls, applying toolbar state
    pub(crate) fn install_mode(&mut self, mode: GameMode) {
        self.mode = mode;
        let paint = self.paint;
        if let Some(p) = self.mode.as_paint_mut() {
            p.set_color(paint.color);
            p.set_size(paint.size);
            p.set_eraser(paint.eraser);
        }
    }

    /// Reset the round and ask the pipeline to come up. The round does not
    /// run until `pipeline_ready` confirms.
    pub fn start_game(&mut self, now_ms: f64) -> Result<()> {
        if matches!(self.phase, EnginePhase::Starting | EnginePhase::Running) {
            return Err(EngineError::InvalidTransition {
                from: self.phase.as_str(),
                to: EnginePhase::Starting.as_str(),
            });
        }

        let id = self.mode.id();
        self.session.reset(id.round_seconds(self.config.round_seconds));
        self.session.set_now(now_ms);
        self.effects.clear();
        self.ending_until_ms = None;
        self.last_frame_ms = None;

        let (mode, mut ctx) = self.parts();
        mode.on_start(&mut ctx);
        self.phase = EnginePhase::Starting;
        log::info!("starting {}", id);
        Ok(())
    }

    /// The camera/detector pipeline's answer to `start_game`
    pub fn pipeline_ready(&mut self, outcome: std::result::Result<(), String>) -> Result<()> {
        if self.phase != EnginePhase::Starting {
            return Err(EngineError::InvalidTransition {
                from: self.phase.as_str(),
                to: EnginePhase::Running.as_str(),
            });
        }

        match outcome {
            Ok(()) => {
                self.phase = EnginePhase::Running;
                log::info!("running {}", self.mode.id());
                Ok(())
            }
            Err(reason) => {
                let (mode, mut ctx) = self.parts();
                mode.on_end(&mut ctx);
                self.phase = EnginePhase::Idle;
                log::warn!("pipeline failed: {}", reason);
                Err(EngineError::PipelineUnavailable(reason))
            }
        }
    }

    /// Stop the round, persist the score, show it for a moment
    pub fn end_game(&mut self, now_ms: f64) -> Result<()> {
        if !matches!(self.phase, EnginePhase::Starting | EnginePhase::Running) {
            return Err(EngineError::InvalidTransition {
                from: self.phase.as_str(),
                to: EnginePhase::Ending.as_str(),
            });
        }

        let id = self.mode.id();
        let score = self.session.score();
        if self.phase == EnginePhase::Running {
            if let Err(e) = self.scores.save_score(id.as_str(), &self.player_name, score) {
                log::warn!("score not saved: {}", e);
            }
        }

        self.sounds.play(now_ms, "game_over");
        let (mode, mut ctx) = self.parts();
        mode.on_end(&mut ctx);
        self.phase = EnginePhase::Ending;
        self.ending_until_ms = Some(now_ms + ENDING_DISPLAY_MS);
        log::info!("{} over, score {}", id, score);
        Ok(())
    }

    // ========================================================================
    // FRAME
    // ========================================================================

    /// Full frame from detector output
    pub fn on_frame(&mut self, now_ms: f64, frame: &HandFrame) {
        let canvas = self.session.canvas();
        let hands = frame
            .hands
            .iter()
            .filter_map(|lms| {
                let mapped = map_landmarks(lms, frame.frame_width, frame.frame_height, canvas.width, canvas.height);
                MappedHand::from_points(&mapped)
            })
            .collect();
        self.step(now_ms, hands);
    }

    /// Frame with hands already in canvas space
    pub fn step(&mut self, now_ms: f64, hands: Vec<MappedHand>) {
        let gap = self.last_frame_ms.map(|last| now_ms - last);
        let dt = clamp_dt(gap);
        self.last_frame_ms = Some(now_ms);
        self.session.set_now(now_ms);

        self.drain_inbox(now_ms);
        self.hands = hands;

        if self.phase == EnginePhase::Ending
            && self.ending_until_ms.is_some_and(|until| now_ms >= until)
        {
            self.phase = EnginePhase::Idle;
            self.ending_until_ms = None;
        }

        if self.phase == EnginePhase::Running {
            let hands = std::mem::take(&mut self.hands);
            let (mode, mut ctx) = self.parts();
            mode.update(dt, &hands, &mut ctx);
            if let Some(fruit) = mode.as_fruit_slice_mut() {
                fruit.collide(&hands, &mut ctx);
                fruit.sweep(now_ms);
            }
            self.hands = hands;
        }

        self.effects.tick(dt);

        if self.phase == EnginePhase::Running && self.session.advance(dt) {
            if let Err(e) = self.end_game(now_ms) {
                log::warn!("timer end: {}", e);
            }
        }

        self.send_pose(now_ms);
        self.peers.tick(dt, now_ms);
        self.rebuild_draw_list();

        if let Some(gap) = gap {
            self.metrics.record_frame(gap);
        }
        self.metrics.particles = self.effects.particles.len();
        self.metrics.popups = self.effects.popups.len();
        self.metrics.paint_points = self.mode.as_paint().map_or(0, |p| p.canvas().live_count());
        self.metrics.peers = self.peers.len();
    }

    fn drain_inbox(&mut self, now_ms: f64) {
        let canvas = self.session.canvas();
        for event in self.inbox.drain() {
            match event {
                PeerEvent::State { id, payload } => match PosePayload::from_json(&payload) {
                    Ok(pose) => self.peers.on_state(&id, &pose, canvas, now_ms),
                    Err(e) => log::warn!("bad payload from {}: {}", id, e),
                },
                PeerEvent::Leave { id } => self.peers.on_leave(&id),
            }
        }
    }

    fn send_pose(&mut self, now_ms: f64) {
        if !self.throttle.try_acquire(now_ms) {
            return;
        }
        let payload = match self.hands.first() {
            Some(hand) => PosePayload::from_points(&[hand.wrist(), hand.tip()], self.session.canvas()),
            None => PosePayload::heartbeat(),
        };
        let sent = payload.to_json().and_then(|json| self.network.send_state(&json));
        if let Err(e) = sent {
            log::warn!("pose not sent: {}", e);
        }
    }

    fn rebuild_draw_list(&mut self) {
        let list = &mut self.draw_list;
        list.clear();

        if matches!(self.phase, EnginePhase::Running | EnginePhase::Starting) {
            self.mode.draw(list);
        }
        self.effects.particles.draw(list);
        self.effects.popups.draw(list);
        self.peers.draw(list);

        let bone = with_alpha(colors::WHITE, 0.6);
        for hand in &self.hands {
            for &(a, b) in HAND_SKELETON.iter() {
                list.line(hand.point(a), hand.point(b), 3.0, bone);
            }
            let (x, y) = hand.tip();
            list.circle(x, y, 7.0, colors::YELLOW);
        }
    }

    // ========================================================================
    // TEXT
    // ========================================================================

    pub fn hud_text(&self) -> String {
        let score = self.session.score();
        if self.phase == EnginePhase::Ending {
            return format!("Game over | Score: {}", score);
        }
        let label = self.mode.id().label();
        if self.session.is_timed() && self.phase != EnginePhase::Idle {
            format!("{} | Score: {} | Time: {}s", label, score, self.session.time_left().ceil() as u32)
        } else {
            format!("{} | Score: {}", label, score)
        }
    }

    pub fn debug_text(&self) -> String {
        self.metrics.overlay_text()
    }

    /// Overlay labels for this frame as JSON
    pub fn labels_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self.draw_list.labels())?)
    }

    // ========================================================================
    // SETTERS
    // ========================================================================

    pub fn set_player_name(&mut self, name: &str) {
        let name = name.trim();
        self.player_name = if name.is_empty() { "Player".to_string() } else { name.to_string() };
    }

    pub fn set_music_enabled(&mut self, enabled: bool) {
        self.sounds.set_music_enabled(enabled);
    }

    pub fn set_paint_color(&mut self, hex: &str) -> Result<()> {
        let color = parse_hex_color(hex)
            .ok_or_else(|| EngineError::Config(format!("bad color '{}'", hex)))?;
        self.paint.color = color;
        if let Some(p) = self.mode.as_paint_mut() {
            p.set_color(color);
        }
        Ok(())
    }

    pub fn set_paint_size(&mut self, size: f32) -> Result<()> {
        if !size.is_finite() {
            return Err(EngineError::Config(format!("bad brush size {}", size)));
        }
        if let Some(p) = self.mode.as_paint_mut() {
            p.set_size(size);
            self.paint.size = p.size();
        } else {
            self.paint.size = size;
        }
        Ok(())
    }

    pub fn set_eraser(&mut self, on: bool) {
        self.paint.eraser = on;
        if let Some(p) = self.mode.as_paint_mut() {
            p.set_eraser(on);
        }
    }

    pub fn clear_paint(&mut self) {
        if let Some(p) = self.mode.as_paint_mut() {
            p.clear();
        }
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        if width > 0.0 && height > 0.0 {
            self.session.set_canvas(CanvasSize::new(width, height));
        }
    }

    // ========================================================================
    // PEERS
    // ========================================================================

    pub fn push_peer_state(&mut self, id: &str, payload: &str) {
        self.inbox.push_state(id, payload);
    }

    pub fn peer_left(&mut self, id: &str) {
        self.inbox.push_leave(id);
    }
}
