//! Frame metrics for the debug overlay
//!
//! Tracks FPS and frame time as moving averages plus pool occupancy.

#[derive(Default, Clone, Debug)]
pub struct FrameMetrics {
    pub fps: f32,
    pub frame_time_ms: f32,
    pub particles: usize,
    pub popups: usize,
    pub paint_points: usize,
    pub peers: usize,
    pub frames: u64,
}

impl FrameMetrics {
    /// Record one frame gap. Gaps outside 1-200ms (first frame, tab
    /// backgrounded) are ignored so they don't poison the average.
    pub fn record_frame(&mut self, gap_ms: f64) {
        self.frames += 1;
        if !(1.0..=200.0).contains(&gap_ms) {
            return;
        }
        let gap = gap_ms as f32;
        if self.frame_time_ms == 0.0 {
            self.frame_time_ms = gap;
            self.fps = 1000.0 / gap;
            return;
        }
        self.frame_time_ms = self.frame_time_ms * 0.9 + gap * 0.1;
        self.fps = self.fps * 0.9 + (1000.0 / gap) * 0.1;
    }

    pub fn overlay_text(&self) -> String {
        format!(
            "FPS: {:.0} | Frame: {:.1}ms\n\
             Particles: {} | Popups: {}\n\
             Paint: {} | Peers: {}",
            self.fps, self.frame_time_ms,
            self.particles, self.popups,
            self.paint_points, self.peers,
        )
    }
}
