//! Reward envelopes bought with charges and cashed in as coins
//!
//! Only one batch may be alive at a time.

use glam::Vec3;
use rand::Rng;

use super::coins;
use super::projectiles::sample_unit_sphere;
use super::state::{Envelope, SimState};
use crate::audio::SoundEffect;
use crate::color::{ENVELOPE_RED, GOLD};

/// Spend one charge and, if no batch is alive, spawn a new one.
///
/// With fewer than one charge nothing happens. The charge is spent even
/// when a batch is already alive. Returns whether a batch spawned.
pub fn try_spawn(state: &mut SimState) -> bool {
    if !state.scoreboard.spend_charge(state.tuning.charge_cost) {
        return false;
    }
    if !state.envelopes.is_empty() {
        log::debug!("envelope batch already alive, charge spent without spawning");
        return false;
    }

    let t = &state.tuning;
    let (half_width, min_alt, max_alt) = (
        t.envelope_half_width,
        t.envelope_min_altitude,
        t.envelope_max_altitude,
    );
    let count = state
        .rng
        .random_range(t.envelope_batch_min..=t.envelope_batch_max);
    let golden_slot = if state.rng.random_bool(t.golden_chance) {
        Some(state.rng.random_range(0..count))
    } else {
        None
    };

    for slot in 0..count {
        let position = Vec3::new(
            state.rng.random_range(-half_width..=half_width),
            state.rng.random_range(min_alt..=max_alt),
            0.0,
        );
        let is_golden = golden_slot == Some(slot);
        let phase = state.rng.random_range(0.0..std::f32::consts::TAU);
        let id = state.next_entity_id();

        state.envelopes.push(Envelope {
            id,
            position,
            is_golden,
            phase,
            scale: 1.0,
        });
        sparkle(state, position, is_golden);
    }

    log::debug!(
        "spawned {count} envelopes (golden: {})",
        golden_slot.is_some()
    );
    state.play(SoundEffect::SpawnEnvelopes);
    true
}

/// Celebratory burst around a fresh envelope
fn sparkle(state: &mut SimState, position: Vec3, is_golden: bool) {
    let SimState {
        tuning,
        rng,
        particles,
        ..
    } = state;
    let (count, size, color) = if is_golden {
        (tuning.golden_sparkle_count, tuning.golden_sparkle_size, GOLD)
    } else {
        (tuning.sparkle_count, tuning.sparkle_size, ENVELOPE_RED)
    };

    for _ in 0..count {
        let speed = rng.random_range(tuning.sparkle_speed_min..=tuning.sparkle_speed_max);
        let velocity = sample_unit_sphere(rng) * speed;
        let decay = rng.random_range(tuning.sparkle_decay_min..=tuning.sparkle_decay_max);
        particles.spawn(position, color, velocity, 1.0, decay, size);
    }
}

/// Breathing animation only; envelopes do not move
pub fn tick(state: &mut SimState, _dt: f32) {
    let time = (state.time_ms / 1000.0) as f32;
    let frequency = state.tuning.breathe_frequency;
    let amount = state.tuning.breathe_amount;

    for envelope in &mut state.envelopes {
        envelope.scale = 1.0 + amount * (time * frequency + envelope.phase).sin();
    }
}

/// Turn every live envelope into coins. Returns how many were converted.
pub fn explode_all(state: &mut SimState) -> usize {
    let batch = std::mem::take(&mut state.envelopes);
    for envelope in &batch {
        coins::spawn(state, envelope.position, envelope.is_golden);
    }
    if !batch.is_empty() {
        log::debug!("converted {} envelopes to coins", batch.len());
    }
    batch.len()
}
