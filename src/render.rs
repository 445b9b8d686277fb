//! Buffers handed to the rendering collaborator
//!
//! Particles are read straight out of the pool. Projectiles, envelopes and
//! coins are packed into instance buffers that are rewritten in place each
//! frame, so their allocations are reused.

use bytemuck::{Pod, Zeroable};

use crate::color::{ENVELOPE_RED, GOLD, SILVER};
use crate::sim::{Coin, Envelope, ParticlePool, Projectile, SimState};

/// Per-instance transform and tint, 48 bytes (3 x vec4)
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct EntityInstance {
    /// xyz = position, w = uniform scale
    pub pos_scale: [f32; 4],
    /// rgba tint
    pub color: [f32; 4],
    /// xy = rotation about x/y (radians), zw unused
    pub rotation: [f32; 4],
}

impl EntityInstance {
    pub fn from_projectile(p: &Projectile) -> Self {
        Self {
            pos_scale: [p.position.x, p.position.y, p.position.z, 1.0],
            color: [p.color.x, p.color.y, p.color.z, 1.0],
            rotation: [0.0; 4],
        }
    }

    pub fn from_envelope(e: &Envelope) -> Self {
        let tint = if e.is_golden { GOLD } else { ENVELOPE_RED };
        Self {
            pos_scale: [e.position.x, e.position.y, e.position.z, e.scale],
            color: [tint.x, tint.y, tint.z, 1.0],
            rotation: [0.0; 4],
        }
    }

    pub fn from_coin(c: &Coin) -> Self {
        let tint = if c.value > 1 { GOLD } else { SILVER };
        Self {
            pos_scale: [c.position.x, c.position.y, c.position.z, 1.0],
            color: [tint.x, tint.y, tint.z, 1.0],
            rotation: [c.rotation.x, c.rotation.y, 0.0, 0.0],
        }
    }
}

/// Instance buffers for every entity kind
#[derive(Debug, Default)]
pub struct EntityBuffers {
    pub projectiles: Vec<EntityInstance>,
    pub envelopes: Vec<EntityInstance>,
    pub coins: Vec<EntityInstance>,
}

impl EntityBuffers {
    /// Rewrite all buffers from the current state
    pub fn update(&mut self, state: &SimState) {
        refill(&mut self.projectiles, state.projectiles.iter().map(EntityInstance::from_projectile));
        refill(&mut self.envelopes, state.envelopes.iter().map(EntityInstance::from_envelope));
        refill(&mut self.coins, state.coins.iter().map(EntityInstance::from_coin));
    }

    pub fn projectile_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.projectiles)
    }

    pub fn envelope_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.envelopes)
    }

    pub fn coin_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.coins)
    }
}

fn refill(buffer: &mut Vec<EntityInstance>, items: impl Iterator<Item = EntityInstance>) {
    buffer.clear();
    buffer.extend(items);
}

/// Borrowed view of everything the renderer needs for one frame
pub struct FrameView<'a> {
    pub particles: &'a ParticlePool,
    pub entities: &'a EntityBuffers,
}

impl FrameView<'_> {
    /// Number of particle slots to draw (inactive ones have size 0)
    pub fn particle_count(&self) -> usize {
        self.particles.capacity()
    }
}
