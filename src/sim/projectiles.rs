//! Firework shells: launch, flight, detonation

use std::f32::consts::TAU;

use glam::Vec3;
use rand::Rng;

use super::state::{Projectile, SimState};
use crate::audio::SoundEffect;
use crate::color::{hsl_to_rgb, shift_hue};
use crate::frame_scale;

/// Launch one shell from the bottom of the view
pub fn spawn(state: &mut SimState) {
    let t = &state.tuning;
    let rng = &mut state.rng;

    let position = Vec3::new(
        rng.random_range(-t.launch_half_width..=t.launch_half_width),
        t.launch_altitude,
        rng.random_range(-t.launch_half_depth..=t.launch_half_depth),
    );
    // Mostly upward with a slight lean
    let direction = Vec3::new(
        rng.random_range(-0.05..=0.05),
        1.0,
        rng.random_range(-0.03..=0.03),
    )
    .normalize();
    let speed = rng.random_range(t.launch_speed_min..=t.launch_speed_max);
    let color = hsl_to_rgb(rng.random::<f32>(), 1.0, 0.6);

    state.projectiles.push(Projectile {
        id: rng.random::<f32>(),
        position,
        velocity: direction * speed,
        color,
    });
    state.play(SoundEffect::Launch);
}

/// Fly every shell, drop trail sparks, and let escaped shells go
pub fn tick(state: &mut SimState, dt: f32) {
    let step = frame_scale(dt);
    let time = (state.time_ms / 1000.0) as f32;

    let SimState {
        tuning,
        rng,
        projectiles,
        particles,
        ..
    } = state;
    let rise_damping = tuning.rise_damping.powf(step);
    let trail_chance = f64::from(tuning.trail_probability);

    projectiles.retain_mut(|p| {
        p.position += p.velocity * step;
        if p.velocity.y > 0.0 {
            p.velocity.y *= rise_damping;
        }
        p.position.x +=
            (time * tuning.wobble_frequency + p.id * TAU).sin() * tuning.wobble_amplitude * step;

        if rng.random_bool(trail_chance) {
            let drift = Vec3::new(
                rng.random_range(-0.01..=0.01),
                rng.random_range(-0.03..=0.0),
                rng.random_range(-0.01..=0.01),
            );
            particles.spawn(
                p.position,
                p.color,
                drift,
                1.0,
                tuning.trail_decay,
                tuning.trail_size,
            );
        }

        p.position.y <= tuning.ceiling
    });
}

/// Detonate every shell currently on screen. Returns how many went off.
pub fn explode_visible(state: &mut SimState) -> usize {
    let tolerance = state.tuning.visibility_tolerance;
    let viewer = &state.viewer;
    let mut detonated = Vec::new();

    state.projectiles.retain(|p| {
        if viewer.is_visible(p.position, tolerance) {
            detonated.push((p.position, p.color));
            false
        } else {
            true
        }
    });

    let count = detonated.len();
    for (position, color) in detonated {
        explode(state, position, color);
    }
    count
}

/// Score one detonation and emit its spherical burst
pub fn explode(state: &mut SimState, position: Vec3, color: Vec3) {
    state.scoreboard.record_explosion();
    state.play(SoundEffect::Explosion);

    let SimState {
        tuning,
        rng,
        particles,
        ..
    } = state;

    for _ in 0..tuning.burst_count {
        let direction = sample_unit_sphere(rng);
        let speed = rng.random_range(tuning.burst_speed_min..=tuning.burst_speed_max);
        let hue = rng.random_range(-tuning.burst_hue_jitter..=tuning.burst_hue_jitter);
        let decay = rng.random_range(tuning.burst_decay_min..=tuning.burst_decay_max);
        let size = rng.random_range(tuning.burst_size_min..=tuning.burst_size_max);

        particles.spawn(
            position,
            shift_hue(color, hue),
            direction * speed,
            1.0,
            decay,
            size,
        );
    }
}

/// Uniform direction on the unit sphere, polar axis +Y.
///
/// `phi = acos(2v - 1)` keeps equal solid angles equally likely.
pub fn sample_unit_sphere(rng: &mut impl Rng) -> Vec3 {
    let theta = TAU * rng.random::<f32>();
    let phi = (2.0 * rng.random::<f32>() - 1.0).clamp(-1.0, 1.0).acos();
    Vec3::new(phi.sin() * theta.cos(), phi.cos(), phi.sin() * theta.sin())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::sim::GameEvent;
    use crate::tuning::Tuning;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn state() -> SimState {
        SimState::new(Tuning::default(), 42)
    }

    #[test]
    fn spawn_launches_upward_from_bottom() {
        let mut state = state();
        spawn(&mut state);

        let p = &state.projectiles[0];
        let t = &state.tuning;
        assert_eq!(p.position.y, t.launch_altitude);
        assert!(p.position.x.abs() <= t.launch_half_width);
        assert!(p.velocity.y > 0.0);
        let speed = p.velocity.length();
        assert!(speed >= t.launch_speed_min - 1e-5 && speed <= t.launch_speed_max + 1e-5);
        assert!(state.events.contains(&GameEvent::Sound(SoundEffect::Launch)));
    }

    #[test]
    fn shells_escape_past_ceiling_without_scoring() {
        let mut state = state();
        spawn(&mut state);
        for _ in 0..2000 {
            tick(&mut state, SIM_DT);
            if state.projectiles.is_empty() {
                break;
            }
        }
        assert!(state.projectiles.is_empty());
        assert_eq!(state.stats().exploded, 0);
    }

    #[test]
    fn flight_leaves_a_trail() {
        let mut state = state();
        spawn(&mut state);
        for _ in 0..30 {
            tick(&mut state, SIM_DT);
        }
        assert!(state.particles.active_count() > 0);
    }

    #[test]
    fn explode_visible_only_hits_on_screen_shells() {
        let mut state = state();
        let color = Vec3::new(1.0, 0.0, 0.0);
        state.projectiles.push(Projectile {
            id: 0.1,
            position: Vec3::ZERO,
            velocity: Vec3::Y * 0.3,
            color,
        });
        state.projectiles.push(Projectile {
            id: 0.2,
            position: Vec3::new(0.0, 100.0, 0.0),
            velocity: Vec3::Y * 0.3,
            color,
        });

        assert_eq!(explode_visible(&mut state), 1);
        assert_eq!(state.projectiles.len(), 1);
        assert_eq!(state.projectiles[0].id, 0.2);
        assert_eq!(state.stats().exploded, 1);
        assert_eq!(state.particles.active_count(), 60);
    }

    #[test]
    fn burst_particles_have_bounded_speed() {
        let mut state = state();
        explode(&mut state, Vec3::ZERO, Vec3::new(0.2, 0.6, 1.0));

        let bursts: Vec<_> = state.particles.iter_active().collect();
        assert_eq!(bursts.len(), 60);
        for p in bursts {
            let speed = p.velocity.length();
            assert!((0.2 - 1e-4..=0.5 + 1e-4).contains(&speed), "speed {speed}");
            assert_eq!(p.life, 1.0);
        }
    }

    #[test]
    fn burst_directions_are_uniform_in_polar_cosine() {
        let mut rng = Pcg32::seed_from_u64(11);
        let mut bins = [0u32; 10];
        let trials = 60 * 1000;
        for _ in 0..trials {
            let dir = sample_unit_sphere(&mut rng);
            assert!((dir.length() - 1.0).abs() < 1e-4);
            let bin = (((dir.y + 1.0) / 2.0) * 10.0).floor().clamp(0.0, 9.0) as usize;
            bins[bin] += 1;
        }
        let expected = trials as f32 / 10.0;
        for count in bins {
            assert!(
                (count as f32 - expected).abs() < expected * 0.05,
                "bins {bins:?}"
            );
        }
    }

    #[test]
    fn burst_hue_stays_near_source() {
        let mut state = state();
        let source = hsl_to_rgb(0.5, 1.0, 0.5);
        explode(&mut state, Vec3::ZERO, source);
        for p in state.particles.iter_active() {
            let (h, _, _) = crate::color::rgb_to_hsl(p.color);
            assert!((h - 0.5).abs() <= 0.05 + 1e-3);
        }
    }
}
