//! Data-driven game balance
//!
//! Every gameplay constant lives here so a JSON file can retune the toy
//! without a rebuild. Distances are world units, velocities and decays are
//! per 60 Hz frame (see [`crate::frame_scale`]).

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::sim::Gesture;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Particle pool ===
    /// Number of particle slots
    pub particle_capacity: usize,
    /// Downward acceleration applied to particle velocity each frame
    pub gravity: f32,
    /// Horizontal/depth velocity multiplier each frame (< 1)
    pub damping: f32,
    /// Particles below this altitude are recycled
    pub cull_altitude: f32,
    /// Blink oscillation frequency (radians per second)
    pub blink_frequency: f32,

    // === Projectiles ===
    /// Launch x is drawn from [-half_width, half_width]
    pub launch_half_width: f32,
    /// Launch z is drawn from [-half_depth, half_depth]
    pub launch_half_depth: f32,
    /// Altitude projectiles launch from
    pub launch_altitude: f32,
    pub launch_speed_min: f32,
    pub launch_speed_max: f32,
    /// Projectiles above this altitude escape unexploded
    pub ceiling: f32,
    /// Upward velocity multiplier each frame
    pub rise_damping: f32,
    pub wobble_amplitude: f32,
    pub wobble_frequency: f32,
    /// Chance per frame that a projectile drops a trail particle
    pub trail_probability: f32,
    pub trail_size: f32,
    pub trail_decay: f32,

    // === Explosions ===
    pub burst_count: u32,
    pub burst_speed_min: f32,
    pub burst_speed_max: f32,
    /// Hue jitter in turns, applied as +/- this value
    pub burst_hue_jitter: f32,
    pub burst_decay_min: f32,
    pub burst_decay_max: f32,
    pub burst_size_min: f32,
    pub burst_size_max: f32,
    /// NDC slack around the clip volume for "visible" projectiles
    pub visibility_tolerance: f32,

    // === Envelopes ===
    /// Exploded projectiles per charge
    pub charge_cost: u32,
    pub envelope_batch_min: u32,
    pub envelope_batch_max: u32,
    pub golden_chance: f64,
    pub envelope_half_width: f32,
    pub envelope_min_altitude: f32,
    pub envelope_max_altitude: f32,
    pub sparkle_count: u32,
    pub golden_sparkle_count: u32,
    pub sparkle_size: f32,
    pub golden_sparkle_size: f32,
    pub sparkle_speed_min: f32,
    pub sparkle_speed_max: f32,
    pub sparkle_decay_min: f32,
    pub sparkle_decay_max: f32,
    pub breathe_frequency: f32,
    pub breathe_amount: f32,

    // === Coins ===
    pub coin_count_min: u32,
    pub coin_count_max: u32,
    pub coin_jitter: f32,
    /// Initial upward kick before gravity takes over
    pub coin_pop: f32,
    pub coin_gravity: f32,
    pub coin_floor: f32,
    pub coin_spin_max: f32,

    // === Spawn scheduler ===
    pub spawn_delay_min_ms: f64,
    pub spawn_delay_max_ms: f64,
    /// Speed that maps to full acceleration of the launch cadence
    pub speed_normalizer: f32,
    /// Gesture that lets hand speed accelerate launches
    pub speed_gesture: Gesture,

    // === Gesture stabilizer ===
    /// Repeat observations beyond the first before a gesture is trusted
    pub gesture_hold_frames: u32,

    // === Session ===
    pub round_seconds: u32,
    pub replay_cooldown_seconds: u32,

    // === Viewer ===
    pub camera_distance: f32,
    pub fov_y_degrees: f32,
    pub aspect_ratio: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            particle_capacity: 4000,
            gravity: 0.004,
            damping: 0.96,
            cull_altitude: -30.0,
            blink_frequency: 20.0,

            launch_half_width: 14.0,
            launch_half_depth: 3.0,
            launch_altitude: -18.0,
            launch_speed_min: 0.3,
            launch_speed_max: 0.45,
            ceiling: 22.0,
            rise_damping: 0.995,
            wobble_amplitude: 0.03,
            wobble_frequency: 6.0,
            trail_probability: 0.4,
            trail_size: 0.25,
            trail_decay: 0.05,

            burst_count: 60,
            burst_speed_min: 0.2,
            burst_speed_max: 0.5,
            burst_hue_jitter: 0.05,
            burst_decay_min: 0.008,
            burst_decay_max: 0.02,
            burst_size_min: 0.4,
            burst_size_max: 1.0,
            visibility_tolerance: 0.1,

            charge_cost: 5,
            envelope_batch_min: 1,
            envelope_batch_max: 4,
            golden_chance: 0.3,
            envelope_half_width: 8.0,
            envelope_min_altitude: -2.0,
            envelope_max_altitude: 6.0,
            sparkle_count: 20,
            golden_sparkle_count: 40,
            sparkle_size: 0.3,
            golden_sparkle_size: 0.5,
            sparkle_speed_min: 0.05,
            sparkle_speed_max: 0.2,
            sparkle_decay_min: 0.015,
            sparkle_decay_max: 0.03,
            breathe_frequency: 3.0,
            breathe_amount: 0.08,

            coin_count_min: 3,
            coin_count_max: 10,
            coin_jitter: 0.5,
            coin_pop: 0.15,
            coin_gravity: 0.01,
            coin_floor: -25.0,
            coin_spin_max: 0.2,

            spawn_delay_min_ms: 666.0,
            spawn_delay_max_ms: 2000.0,
            speed_normalizer: 4.0,
            speed_gesture: Gesture::ClosedFist,

            gesture_hold_frames: 5,

            round_seconds: 30,
            replay_cooldown_seconds: 3,

            camera_distance: 30.0,
            fov_y_degrees: 60.0,
            aspect_ratio: 16.0 / 9.0,
        }
    }
}

impl Tuning {
    /// Parse and validate tuning from JSON. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load tuning from a JSON file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.particle_capacity == 0 {
            return Err(ConfigError::invalid("particle_capacity", "must be at least 1"));
        }
        if !(self.damping > 0.0 && self.damping <= 1.0) {
            return Err(ConfigError::invalid("damping", "must be in (0, 1]"));
        }
        if !(self.rise_damping > 0.0 && self.rise_damping <= 1.0) {
            return Err(ConfigError::invalid("rise_damping", "must be in (0, 1]"));
        }
        if self.charge_cost == 0 {
            return Err(ConfigError::invalid("charge_cost", "must be at least 1"));
        }
        if !(0.0..=1.0).contains(&self.golden_chance) {
            return Err(ConfigError::invalid("golden_chance", "must be a probability"));
        }
        if !(0.0..=1.0).contains(&self.trail_probability) {
            return Err(ConfigError::invalid("trail_probability", "must be a probability"));
        }
        if self.speed_normalizer <= 0.0 {
            return Err(ConfigError::invalid("speed_normalizer", "must be positive"));
        }
        if self.ceiling <= self.launch_altitude {
            return Err(ConfigError::invalid("ceiling", "must be above launch_altitude"));
        }

        check_range("launch_speed", self.launch_speed_min, self.launch_speed_max)?;
        check_range("burst_speed", self.burst_speed_min, self.burst_speed_max)?;
        check_range("burst_decay", self.burst_decay_min, self.burst_decay_max)?;
        check_range("burst_size", self.burst_size_min, self.burst_size_max)?;
        check_range("sparkle_speed", self.sparkle_speed_min, self.sparkle_speed_max)?;
        check_range("sparkle_decay", self.sparkle_decay_min, self.sparkle_decay_max)?;
        check_range(
            "envelope_altitude",
            self.envelope_min_altitude,
            self.envelope_max_altitude,
        )?;
        check_range(
            "spawn_delay_ms",
            self.spawn_delay_min_ms as f32,
            self.spawn_delay_max_ms as f32,
        )?;

        // Spread fields feed symmetric `-x..=x` ranges
        check_non_negative("launch_half_width", self.launch_half_width)?;
        check_non_negative("launch_half_depth", self.launch_half_depth)?;
        check_non_negative("envelope_half_width", self.envelope_half_width)?;
        check_non_negative("burst_hue_jitter", self.burst_hue_jitter)?;
        check_non_negative("coin_jitter", self.coin_jitter)?;
        check_non_negative("coin_pop", self.coin_pop)?;
        check_non_negative("coin_spin_max", self.coin_spin_max)?;

        if self.envelope_batch_min == 0 || self.envelope_batch_min > self.envelope_batch_max {
            return Err(ConfigError::invalid(
                "envelope_batch",
                format!("{}..={} is not a usable batch size", self.envelope_batch_min, self.envelope_batch_max),
            ));
        }
        if self.coin_count_min == 0 || self.coin_count_min > self.coin_count_max {
            return Err(ConfigError::invalid(
                "coin_count",
                format!("{}..={} is not a usable coin count", self.coin_count_min, self.coin_count_max),
            ));
        }
        Ok(())
    }
}

fn check_range(field: &'static str, min: f32, max: f32) -> Result<(), ConfigError> {
    if min > max || min.is_nan() || max.is_nan() {
        return Err(ConfigError::invalid(field, format!("min {min} exceeds max {max}")));
    }
    Ok(())
}

fn check_non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_nan() || value < 0.0 {
        return Err(ConfigError::invalid(field, format!("{value} must be non-negative")));
    }
    Ok(())
}
