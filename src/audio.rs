//! Audio cue dispatch
//!
//! The simulation only names cues. Synthesis happens in an external backend
//! that receives a procedural tone description, so no sample files are needed.

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Firework shell launched
    Launch,
    /// Shell detonated
    Explosion,
    /// Coins spilled from an envelope
    Coin,
    /// Envelope batch appeared
    SpawnEnvelopes,
}

/// Waveform for a procedural tone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Triangle,
    Sawtooth,
    Noise,
}

/// A single procedural tone: frequency sweep with an exponential gain decay
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub waveform: Waveform,
    pub freq_start: f32,
    pub freq_end: f32,
    pub duration: f32,
    /// Peak gain before volume scaling
    pub gain: f32,
}

impl SoundEffect {
    pub fn as_str(&self) -> &'static str {
        match self {
            SoundEffect::Launch => "launch",
            SoundEffect::Explosion => "explosion",
            SoundEffect::Coin => "coin",
            SoundEffect::SpawnEnvelopes => "spawnEnvelopes",
        }
    }

    /// Tone recipe for this cue
    pub fn tone(&self) -> Tone {
        match self {
            // Rising whistle
            SoundEffect::Launch => Tone {
                waveform: Waveform::Sine,
                freq_start: 300.0,
                freq_end: 1200.0,
                duration: 0.6,
                gain: 0.2,
            },
            // Low noisy boom
            SoundEffect::Explosion => Tone {
                waveform: Waveform::Noise,
                freq_start: 120.0,
                freq_end: 40.0,
                duration: 0.8,
                gain: 0.5,
            },
            // Bright ping
            SoundEffect::Coin => Tone {
                waveform: Waveform::Triangle,
                freq_start: 1400.0,
                freq_end: 1800.0,
                duration: 0.15,
                gain: 0.3,
            },
            // Short chime sweep
            SoundEffect::SpawnEnvelopes => Tone {
                waveform: Waveform::Sawtooth,
                freq_start: 600.0,
                freq_end: 900.0,
                duration: 0.3,
                gain: 0.25,
            },
        }
    }
}

/// External sound producer. Calls are fire-and-forget.
pub trait AudioBackend {
    fn play_tone(&mut self, effect: SoundEffect, tone: Tone, volume: f32);
}

/// Backend that drops every cue
#[derive(Debug, Default)]
pub struct NullBackend;

impl AudioBackend for NullBackend {
    fn play_tone(&mut self, _effect: SoundEffect, _tone: Tone, _volume: f32) {}
}

/// Backend that only logs cues
#[derive(Debug, Default)]
pub struct LogBackend;

impl AudioBackend for LogBackend {
    fn play_tone(&mut self, effect: SoundEffect, tone: Tone, volume: f32) {
        log::debug!(
            "cue {} ({:?} {:.0}->{:.0} Hz, {:.2}s) at volume {:.2}",
            effect.as_str(),
            tone.waveform,
            tone.freq_start,
            tone.freq_end,
            tone.duration,
            volume
        );
    }
}

/// Audio manager applying volume and mute before handing cues to a backend
pub struct AudioManager<B: AudioBackend> {
    backend: B,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl<B: AudioBackend> AudioManager<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    /// Build a manager with volumes taken from settings
    pub fn with_settings(backend: B, settings: &crate::Settings) -> Self {
        let mut manager = Self::new(backend);
        manager.set_master_volume(settings.master_volume);
        manager.set_sfx_volume(settings.sfx_volume);
        manager.set_muted(settings.muted);
        manager
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Get effective volume
    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Play a sound effect
    pub fn play(&mut self, effect: SoundEffect) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        self.backend.play_tone(effect, effect.tone(), vol);
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}
