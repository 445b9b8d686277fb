//! Frame driver
//!
//! Runs fixed-timestep ticks against wall-clock frame intervals, pulls the
//! newest hand snapshot, and fans tick events out to audio and stats
//! listeners. Hand tracking publishes from its own thread into a
//! [`SnapshotSlot`]; the driver only ever reads the latest value.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::audio::{AudioBackend, AudioManager};
use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};
use crate::render::{EntityBuffers, FrameView};
use crate::settings::Settings;
use crate::sim::{GameEvent, GamePhase, GameStats, HandSnapshot, SimState, TickInput, tick};
use crate::tuning::Tuning;

/// Last-write-wins mailbox for hand-tracking results
#[derive(Debug, Clone, Default)]
pub struct SnapshotSlot {
    inner: Arc<Mutex<Option<HandSnapshot>>>,
}

impl SnapshotSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current snapshot (`None` = no hand in view)
    pub fn publish(&self, snapshot: Option<HandSnapshot>) {
        *self.lock() = snapshot;
    }

    /// Copy of the most recent snapshot
    pub fn latest(&self) -> Option<HandSnapshot> {
        *self.lock()
    }

    fn lock(&self) -> MutexGuard<'_, Option<HandSnapshot>> {
        // A panicking producer cannot leave a half-written Copy value behind
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// What happened during one call to [`FrameDriver::frame`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameReport {
    /// Ticks run this frame
    pub ticks: u32,
    /// Latest stats snapshot if counters changed
    pub stats: Option<GameStats>,
    /// Phase transitions in order
    pub phases: Vec<GamePhase>,
}

pub struct FrameDriver<B: AudioBackend> {
    state: SimState,
    audio: AudioManager<B>,
    snapshots: SnapshotSlot,
    entities: EntityBuffers,
    accumulator: f32,
    pending: TickInput,
}

impl<B: AudioBackend> FrameDriver<B> {
    pub fn new(mut tuning: Tuning, settings: &Settings, backend: B, seed: u64) -> Self {
        settings.apply_to(&mut tuning);
        let state = SimState::new(tuning, seed);
        log::info!(
            "Simulation ready: {} particle slots, seed {}",
            state.particles.capacity(),
            state.seed
        );
        Self {
            state,
            audio: AudioManager::with_settings(backend, settings),
            snapshots: SnapshotSlot::new(),
            entities: EntityBuffers::default(),
            accumulator: 0.0,
            pending: TickInput::default(),
        }
    }

    /// Handle for the hand-tracking producer
    pub fn snapshot_slot(&self) -> SnapshotSlot {
        self.snapshots.clone()
    }

    /// Request a round start; applied on the next tick
    pub fn start(&mut self) {
        self.pending.start = true;
    }

    /// Request a replay; applied on the next tick
    pub fn replay(&mut self) {
        self.pending.replay = true;
    }

    /// Advance by a wall-clock frame interval (seconds)
    pub fn frame(&mut self, frame_dt: f32) -> FrameReport {
        let mut report = FrameReport::default();
        self.accumulator += frame_dt.clamp(0.0, MAX_FRAME_DT);

        while self.accumulator >= SIM_DT && report.ticks < MAX_SUBSTEPS {
            let mut input = std::mem::take(&mut self.pending);
            input.hand = self.snapshots.latest();

            tick(&mut self.state, &input, SIM_DT);
            self.accumulator -= SIM_DT;
            report.ticks += 1;

            for event in self.state.drain_events() {
                match event {
                    GameEvent::Sound(effect) => self.audio.play(effect),
                    GameEvent::StatsChanged(stats) => report.stats = Some(stats),
                    GameEvent::PhaseChanged(phase) => report.phases.push(phase),
                }
            }
        }

        // Drop backlog the substep cap could not absorb
        if report.ticks == MAX_SUBSTEPS {
            self.accumulator = self.accumulator.min(SIM_DT);
        }

        if report.ticks > 0 {
            self.entities.update(&self.state);
        }
        report
    }

    pub fn view(&self) -> FrameView<'_> {
        FrameView {
            particles: &self.state.particles,
            entities: &self.entities,
        }
    }

    pub fn state(&self) -> &SimState {
        &self.state
    }

    pub fn audio(&self) -> &AudioManager<B> {
        &self.audio
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::SoundEffect;
    use crate::audio::tests::RecordingBackend;
    use crate::settings::QualityPreset;
    use crate::sim::Gesture;
    use glam::Vec3;

    fn driver() -> FrameDriver<RecordingBackend> {
        FrameDriver::new(Tuning::default(), &Settings::default(), RecordingBackend::default(), 21)
    }

    #[test]
    fn slot_keeps_only_latest() {
        let slot = SnapshotSlot::new();
        assert_eq!(slot.latest(), None);
        slot.publish(Some(HandSnapshot::new(Gesture::Victory, 1.0, Vec3::ZERO)));
        slot.publish(Some(HandSnapshot::new(Gesture::OpenPalm, 2.0, Vec3::ZERO)));
        assert_eq!(slot.latest().map(|s| s.gesture), Some(Gesture::OpenPalm));
        slot.publish(None);
        assert_eq!(slot.latest(), None);
    }

    #[test]
    fn slot_is_shared_across_threads() {
        let slot = SnapshotSlot::new();
        let producer = slot.clone();
        std::thread::spawn(move || {
            producer.publish(Some(HandSnapshot::new(Gesture::Shaka, 0.5, Vec3::ONE)));
        })
        .join()
        .expect("producer thread");
        assert_eq!(slot.latest().map(|s| s.gesture), Some(Gesture::Shaka));
    }

    #[test]
    fn substeps_are_capped() {
        let mut driver = driver();
        let report = driver.frame(10.0);
        assert_eq!(report.ticks, MAX_SUBSTEPS);
        // Backlog is dropped instead of replayed next frame
        assert!(driver.frame(0.0).ticks <= 1);
    }

    #[test]
    fn short_frames_accumulate() {
        let mut driver = driver();
        assert_eq!(driver.frame(SIM_DT * 0.6).ticks, 0);
        assert_eq!(driver.frame(SIM_DT * 0.6).ticks, 1);
        assert_eq!(driver.state().time_ticks, 1);
    }

    #[test]
    fn settings_shape_the_simulation() {
        let settings = Settings::from_preset(QualityPreset::Low);
        let driver = FrameDriver::new(Tuning::default(), &settings, RecordingBackend::default(), 99);
        assert_eq!(driver.state().seed, 99);
        assert_eq!(driver.view().particle_count(), QualityPreset::Low.max_particles());
    }

    #[test]
    fn start_intent_runs_a_round_with_audio() {
        let mut driver = driver();
        driver.start();
        let report = driver.frame(SIM_DT);
        assert_eq!(report.phases, vec![GamePhase::Playing]);
        // Counters were already zero
        assert_eq!(report.stats, None);

        for _ in 0..30 {
            driver.frame(SIM_DT);
        }
        let played = &driver.audio().backend().played;
        assert!(played.iter().any(|(effect, _)| *effect == SoundEffect::Launch));
        assert!(!driver.view().entities.projectiles.is_empty());
    }

    #[test]
    fn published_gesture_reaches_the_tick() {
        let mut driver = driver();
        let slot = driver.snapshot_slot();
        slot.publish(Some(HandSnapshot::new(Gesture::Victory, 0.0, Vec3::ZERO)));

        let mut phases = Vec::new();
        for _ in 0..10 {
            phases.extend(driver.frame(SIM_DT).phases);
        }
        assert_eq!(phases, vec![GamePhase::Playing]);
        assert_eq!(driver.state().gesture.stable(), Gesture::Victory);
    }

    #[test]
    fn view_exposes_full_particle_buffer() {
        let driver = driver();
        let view = driver.view();
        assert_eq!(view.particle_count(), Settings::default().max_particles());
        assert_eq!(view.particles.sizes().len(), view.particle_count());
    }
}
