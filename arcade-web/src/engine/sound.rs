//! Sound gate - per-sample cooldown in front of the audio collaborator

use hashbrown::HashMap;
use super::collaborators::AudioSink;

/// The same sample never fires twice within this window
pub const SOUND_COOLDOWN_MS: f64 = 80.0;

pub struct SoundGate {
    sink: Box<dyn AudioSink>,
    last_played: HashMap<&'static str, f64>,
    music_enabled: bool,
}

impl SoundGate {
    pub fn new(sink: Box<dyn AudioSink>) -> Self {
        Self {
            sink,
            last_played: HashMap::new(),
            music_enabled: true,
        }
    }

    /// Play unless the same sample fired within the cooldown.
    /// Returns whether the sink was called.
    pub fn play(&mut self, now_ms: f64, name: &'static str) -> bool {
        if let Some(&last) = self.last_played.get(name) {
            if now_ms - last < SOUND_COOLDOWN_MS {
                return false;
            }
        }
        self.last_played.insert(name, now_ms);
        self.sink.play_sound(name);
        true
    }

    pub fn set_music_enabled(&mut self, enabled: bool) {
        self.music_enabled = enabled;
        self.sink.set_music_enabled(enabled);
    }

    pub fn music_enabled(&self) -> bool {
        self.music_enabled
    }

    pub fn replace_sink(&mut self, sink: Box<dyn AudioSink>) {
        self.sink = sink;
        self.sink.set_music_enabled(self.music_enabled);
    }
}
