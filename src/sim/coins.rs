//! Coins spilled from converted envelopes

use glam::{Vec2, Vec3};
use rand::Rng;

use super::state::{Coin, SimState};
use crate::audio::SoundEffect;
use crate::frame_scale;

/// Spill a batch of coins at `position` and credit them. Returns the number
/// of coins spawned.
pub fn spawn(state: &mut SimState, position: Vec3, is_golden: bool) -> u32 {
    let t = &state.tuning;
    let rng = &mut state.rng;

    let base = rng.random_range(t.coin_count_min..=t.coin_count_max);
    let (count, value) = if is_golden { (base * 2, 2) } else { (base, 1) };

    for _ in 0..count {
        let jitter = Vec3::new(
            rng.random_range(-t.coin_jitter..=t.coin_jitter),
            rng.random_range(-t.coin_jitter..=t.coin_jitter),
            rng.random_range(-t.coin_jitter..=t.coin_jitter),
        );
        let velocity = Vec3::new(
            rng.random_range(-0.05..=0.05),
            rng.random_range(0.0..=t.coin_pop),
            rng.random_range(-0.05..=0.05),
        );
        let rotation_speed = Vec2::new(
            rng.random_range(-t.coin_spin_max..=t.coin_spin_max),
            rng.random_range(-t.coin_spin_max..=t.coin_spin_max),
        );
        state.coins.push(Coin {
            position: position + jitter,
            velocity,
            rotation: Vec2::ZERO,
            rotation_speed,
            value,
        });
    }

    state.scoreboard.add_coins(count * value);
    state.play(SoundEffect::Coin);
    count
}

/// Let coins fall and spin; drop the ones below the floor
pub fn tick(state: &mut SimState, dt: f32) {
    let step = frame_scale(dt);
    let gravity = state.tuning.coin_gravity;
    let floor = state.tuning.coin_floor;

    state.coins.retain_mut(|coin| {
        coin.velocity.y -= gravity * step;
        coin.position += coin.velocity * step;
        coin.rotation += coin.rotation_speed * step;
        coin.position.y >= floor
    });
}
