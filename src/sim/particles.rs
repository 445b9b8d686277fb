//! Fixed-capacity particle pool
//!
//! Slots are never allocated or freed after construction. Spawners request a
//! slot and the pool recycles it in place once its life runs out. The render
//! buffers (position, color, size) are kept in step with the slots so the
//! renderer can upload them directly.

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::consts::PARKED_POSITION;
use crate::frame_scale;
use crate::tuning::Tuning;

const PARKED: Vec3 = Vec3::from_array(PARKED_POSITION);

/// A pooled visual mote
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub active: bool,
    pub position: Vec3,
    pub velocity: Vec3,
    /// 1.0 at spawn, recycled at 0.0
    pub life: f32,
    /// Life lost per frame
    pub decay: f32,
    pub initial_size: f32,
    pub color: Vec3,
}

impl Particle {
    fn dead() -> Self {
        Self {
            active: false,
            position: PARKED,
            velocity: Vec3::ZERO,
            life: 0.0,
            decay: 0.0,
            initial_size: 0.0,
            color: Vec3::ZERO,
        }
    }
}

/// Physics constants shared by every particle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticlePhysics {
    pub gravity: f32,
    pub damping: f32,
    pub cull_altitude: f32,
    pub blink_frequency: f32,
}

impl ParticlePhysics {
    pub fn from_tuning(tuning: &Tuning) -> Self {
        Self {
            gravity: tuning.gravity,
            damping: tuning.damping,
            cull_altitude: tuning.cull_altitude,
            blink_frequency: tuning.blink_frequency,
        }
    }
}

pub struct ParticlePool {
    slots: Vec<Particle>,
    /// Indices of inactive slots; picks are uniformly random so reuse is
    /// spread across the whole buffer
    free: Vec<u32>,
    positions: Vec<Vec3>,
    colors: Vec<Vec3>,
    sizes: Vec<f32>,
    physics: ParticlePhysics,
    rng: Pcg32,
    elapsed: f32,
}

impl ParticlePool {
    pub fn new(capacity: usize, physics: ParticlePhysics, seed: u64) -> Self {
        Self {
            slots: vec![Particle::dead(); capacity],
            free: (0..capacity as u32).rev().collect(),
            positions: vec![PARKED; capacity],
            colors: vec![Vec3::ZERO; capacity],
            sizes: vec![0.0; capacity],
            physics,
            rng: Pcg32::seed_from_u64(seed),
            elapsed: 0.0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn active_count(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    pub fn is_saturated(&self) -> bool {
        self.free.is_empty()
    }

    /// Activate one inactive slot.
    ///
    /// Returns `false` when the pool is saturated; the request is dropped and
    /// no other slot is touched.
    pub fn spawn(
        &mut self,
        position: Vec3,
        color: Vec3,
        velocity: Vec3,
        life: f32,
        decay: f32,
        size: f32,
    ) -> bool {
        if self.free.is_empty() {
            log::trace!("particle pool saturated, dropping spawn");
            return false;
        }

        let pick = self.rng.random_range(0..self.free.len());
        let index = self.free.swap_remove(pick) as usize;

        self.slots[index] = Particle {
            active: true,
            position,
            velocity,
            life,
            decay,
            initial_size: size,
            color,
        };
        self.positions[index] = position;
        self.colors[index] = color;
        self.sizes[index] = size.max(0.0);
        true
    }

    /// Advance every active particle and recycle the expired ones
    pub fn tick(&mut self, dt: f32) {
        let step = frame_scale(dt);
        self.elapsed += dt;

        let ParticlePhysics {
            gravity,
            damping,
            cull_altitude,
            blink_frequency,
        } = self.physics;
        let damping = damping.powf(step);

        for (index, p) in self.slots.iter_mut().enumerate() {
            if !p.active {
                continue;
            }

            p.velocity.y -= gravity * step;
            p.velocity.x *= damping;
            p.velocity.z *= damping;
            p.position += p.velocity * step;
            p.life -= p.decay * step;

            if p.life <= 0.0 || p.position.y < cull_altitude {
                p.active = false;
                p.position = PARKED;
                self.positions[index] = PARKED;
                self.sizes[index] = 0.0;
                self.free.push(index as u32);
                continue;
            }

            let blink = 0.75 + 0.25 * (self.elapsed * blink_frequency + p.life * 10.0).sin();
            self.positions[index] = p.position;
            self.sizes[index] = (p.initial_size * p.life * blink).max(0.0);
        }
    }

    /// Deactivate every slot
    pub fn clear(&mut self) {
        for p in &mut self.slots {
            *p = Particle::dead();
        }
        self.positions.fill(PARKED);
        self.sizes.fill(0.0);
        self.free.clear();
        self.free.extend((0..self.slots.len() as u32).rev());
    }

    pub fn slots(&self) -> &[Particle] {
        &self.slots
    }

    pub fn iter_active(&self) -> impl Iterator<Item = &Particle> {
        self.slots.iter().filter(|p| p.active)
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn colors(&self) -> &[Vec3] {
        &self.colors
    }

    pub fn sizes(&self) -> &[f32] {
        &self.sizes
    }

    /// Position buffer as raw bytes for upload
    pub fn position_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.positions)
    }

    pub fn color_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.colors)
    }

    pub fn size_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.sizes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use proptest::prelude::*;

    fn pool(capacity: usize) -> ParticlePool {
        ParticlePool::new(capacity, ParticlePhysics::from_tuning(&Tuning::default()), 7)
    }

    fn spawn_one(pool: &mut ParticlePool) -> bool {
        pool.spawn(Vec3::ZERO, Vec3::ONE, Vec3::new(0.0, 0.1, 0.0), 1.0, 0.01, 0.5)
    }

    #[test]
    fn saturated_pool_drops_without_touching_slots() {
        let mut pool = pool(8);
        for _ in 0..8 {
            assert!(spawn_one(&mut pool));
        }
        let before = pool.slots().to_vec();

        assert!(!pool.spawn(Vec3::splat(5.0), Vec3::ZERO, Vec3::ZERO, 1.0, 0.0, 9.0));
        assert_eq!(pool.active_count(), 8);
        assert_eq!(pool.slots(), &before[..]);
    }

    #[test]
    fn expired_particle_is_parked_and_hidden() {
        let mut pool = pool(4);
        assert!(pool.spawn(Vec3::ZERO, Vec3::ONE, Vec3::ZERO, 0.05, 0.1, 1.0));
        pool.tick(SIM_DT);

        assert_eq!(pool.active_count(), 0);
        assert!(pool.sizes().iter().all(|&s| s == 0.0));
        assert!(pool.positions().iter().all(|&p| p == PARKED));
    }

    #[test]
    fn falling_below_cull_altitude_recycles() {
        let mut pool = pool(2);
        let below = Vec3::new(0.0, Tuning::default().cull_altitude - 1.0, 0.0);
        assert!(pool.spawn(below, Vec3::ONE, Vec3::ZERO, 1.0, 0.0, 1.0));
        pool.tick(SIM_DT);
        assert_eq!(pool.active_count(), 0);
    }

    #[test]
    fn gravity_and_damping_apply() {
        let mut pool = pool(1);
        let velocity = Vec3::new(1.0, 0.0, 1.0);
        assert!(pool.spawn(Vec3::ZERO, Vec3::ONE, velocity, 1.0, 0.0, 1.0));
        pool.tick(SIM_DT);

        let p = pool.iter_active().next().expect("still alive");
        let physics = ParticlePhysics::from_tuning(&Tuning::default());
        assert!((p.velocity.x - physics.damping).abs() < 1e-5);
        assert!((p.velocity.z - physics.damping).abs() < 1e-5);
        assert!((p.velocity.y + physics.gravity).abs() < 1e-6);
        assert!(p.position.x > 0.0 && p.position.y < 0.0);
    }

    #[test]
    fn rendered_size_never_negative_and_bounded() {
        let mut pool = pool(16);
        for _ in 0..16 {
            spawn_one(&mut pool);
        }
        for _ in 0..50 {
            pool.tick(SIM_DT);
            for (p, &size) in pool.slots().iter().zip(pool.sizes()) {
                assert!(size >= 0.0);
                if p.active {
                    assert!(size <= p.initial_size);
                }
            }
        }
    }

    #[test]
    fn slot_reuse_is_spread_over_buffer() {
        let mut pool = pool(1000);
        for _ in 0..10 {
            spawn_one(&mut pool);
        }
        let used: Vec<usize> = pool
            .slots()
            .iter()
            .enumerate()
            .filter(|(_, p)| p.active)
            .map(|(i, _)| i)
            .collect();
        assert_eq!(used.len(), 10);
        assert!(used.iter().any(|&i| i >= 100));
    }

    #[test]
    fn clear_frees_everything() {
        let mut pool = pool(5);
        for _ in 0..5 {
            spawn_one(&mut pool);
        }
        pool.clear();
        assert_eq!(pool.active_count(), 0);
        assert!(spawn_one(&mut pool));
    }

    #[test]
    fn zero_capacity_pool_drops_everything() {
        let mut pool = pool(0);
        assert!(!spawn_one(&mut pool));
        pool.tick(SIM_DT);
        assert_eq!(pool.active_count(), 0);
    }

    #[test]
    fn byte_views_cover_all_slots() {
        let pool = pool(3);
        assert_eq!(pool.position_bytes().len(), 3 * 12);
        assert_eq!(pool.color_bytes().len(), 3 * 12);
        assert_eq!(pool.size_bytes().len(), 3 * 4);
    }

    proptest! {
        #[test]
        fn active_count_never_exceeds_capacity(
            capacity in 1usize..64,
            ops in proptest::collection::vec((0u8..3, 0.0f32..0.2), 1..200),
        ) {
            let mut pool = pool(capacity);
            for (op, decay) in ops {
                match op {
                    0 | 1 => {
                        let was_full = pool.is_saturated();
                        let spawned = pool.spawn(Vec3::ZERO, Vec3::ONE, Vec3::Y * 0.1, 1.0, decay, 0.5);
                        prop_assert_eq!(spawned, !was_full);
                    }
                    _ => pool.tick(SIM_DT),
                }
                prop_assert!(pool.active_count() <= pool.capacity());
                let active = pool.slots().iter().filter(|p| p.active).count();
                prop_assert_eq!(active, pool.active_count());
            }
        }
    }
}
