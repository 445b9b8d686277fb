//! Adaptive projectile launch timer

use rand::Rng;

use super::gesture::Gesture;
use crate::lerp;
use crate::tuning::Tuning;

/// Decides when the next projectile launches
#[derive(Debug, Clone, Default)]
pub struct SpawnScheduler {
    /// Simulation clock time (ms) after which the next launch happens
    pub next_spawn_ms: f64,
}

impl SpawnScheduler {
    /// Launch as soon as possible
    pub fn reset(&mut self, now_ms: f64) {
        self.next_spawn_ms = now_ms;
    }

    /// Whether a launch is due. Time must strictly exceed the deadline.
    pub fn is_due(&self, now_ms: f64) -> bool {
        now_ms > self.next_spawn_ms
    }

    /// Pick the following launch time after one has just happened
    pub fn schedule_next(
        &mut self,
        now_ms: f64,
        rng: &mut impl Rng,
        stable: Gesture,
        speed: f32,
        tuning: &Tuning,
    ) -> f64 {
        let base = if tuning.spawn_delay_max_ms > tuning.spawn_delay_min_ms {
            rng.random_range(tuning.spawn_delay_min_ms..tuning.spawn_delay_max_ms)
        } else {
            tuning.spawn_delay_min_ms
        };
        let delay = launch_delay(base, stable, speed, tuning);
        self.next_spawn_ms = now_ms + delay;
        delay
    }
}

/// Shorten `base` toward half of itself as hand speed rises, but only while
/// the speed gesture is held
pub fn launch_delay(base: f64, stable: Gesture, speed: f32, tuning: &Tuning) -> f64 {
    if stable != tuning.speed_gesture {
        return base;
    }
    let t = (speed / tuning.speed_normalizer).clamp(0.0, 1.0);
    base * lerp(1.0, 0.5, t) as f64
}
