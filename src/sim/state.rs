//! Simulation state aggregate
//!
//! One `SimState` owns every collection. Subsystems receive it by `&mut`
//! from the tick, which is the only writer.

use glam::{Vec2, Vec3};
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::gesture::GestureStabilizer;
use super::particles::{ParticlePhysics, ParticlePool};
use super::scheduler::SpawnScheduler;
use super::session::{GamePhase, Session};
use super::stats::{GameStats, Scoreboard};
use super::viewer::Viewer;
use crate::audio::SoundEffect;
use crate::tuning::Tuning;

/// A rising firework shell
#[derive(Debug, Clone, PartialEq)]
pub struct Projectile {
    /// Random tag, also used as the wobble phase
    pub id: f32,
    pub position: Vec3,
    pub velocity: Vec3,
    pub color: Vec3,
}

/// A reward pickup; golden ones pay double
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    pub id: u32,
    pub position: Vec3,
    pub is_golden: bool,
    /// Breathing phase offset
    pub phase: f32,
    /// Current breathing scale
    pub scale: f32,
}

/// A falling coin
#[derive(Debug, Clone, PartialEq)]
pub struct Coin {
    pub position: Vec3,
    pub velocity: Vec3,
    /// Rotation about x and y (radians)
    pub rotation: Vec2,
    pub rotation_speed: Vec2,
    /// 1 for silver, 2 for coins from a golden envelope
    pub value: u32,
}

/// Outbound notifications produced during a tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    /// Fire-and-forget audio cue
    Sound(SoundEffect),
    /// Counters changed this tick (at most one per tick)
    StatsChanged(GameStats),
    /// Session moved to a new phase
    PhaseChanged(GamePhase),
}

/// Complete simulation state
pub struct SimState {
    pub tuning: Tuning,
    pub seed: u64,
    /// Gameplay RNG (particle slot picks use the pool's own stream)
    pub rng: Pcg32,
    /// Simulation clock
    pub time_ms: f64,
    pub time_ticks: u64,
    pub particles: ParticlePool,
    pub projectiles: Vec<Projectile>,
    pub envelopes: Vec<Envelope>,
    pub coins: Vec<Coin>,
    pub gesture: GestureStabilizer,
    /// Latest raw hand speed (0 without a hand)
    pub hand_speed: f32,
    pub scheduler: SpawnScheduler,
    pub session: Session,
    pub scoreboard: Scoreboard,
    pub viewer: Viewer,
    /// Events raised since the driver last drained them
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl SimState {
    pub fn new(tuning: Tuning, seed: u64) -> Self {
        let particles = ParticlePool::new(
            tuning.particle_capacity,
            ParticlePhysics::from_tuning(&tuning),
            seed.wrapping_add(1),
        );
        Self {
            gesture: GestureStabilizer::new(tuning.gesture_hold_frames),
            viewer: Viewer::from_tuning(&tuning),
            particles,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            time_ms: 0.0,
            time_ticks: 0,
            projectiles: Vec::new(),
            envelopes: Vec::new(),
            coins: Vec::new(),
            hand_speed: 0.0,
            scheduler: SpawnScheduler::default(),
            session: Session::default(),
            scoreboard: Scoreboard::default(),
            events: Vec::new(),
            next_id: 1,
            tuning,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn stats(&self) -> GameStats {
        self.scoreboard.stats()
    }

    pub fn charges(&self) -> u32 {
        self.scoreboard.charges(self.tuning.charge_cost)
    }

    pub fn phase(&self) -> GamePhase {
        self.session.phase()
    }

    pub(crate) fn play(&mut self, effect: SoundEffect) {
        self.events.push(GameEvent::Sound(effect));
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
