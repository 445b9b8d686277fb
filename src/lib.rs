//! Palm Fireworks - gesture-driven firework display
//!
//! Core modules:
//! - `sim`: Simulation core (particle pool, entities, gestures, session, scoring)
//! - `driver`: Fixed-timestep frame driver and hand snapshot mailbox
//! - `render`: In-place buffers handed to the rendering collaborator
//! - `audio`: Audio cue dispatch to an external sound backend
//! - `settings`: Player preferences (quality, volumes)
//! - `tuning`: Data-driven game balance

pub mod audio;
pub mod color;
pub mod driver;
pub mod error;
pub mod render;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use driver::{FrameDriver, SnapshotSlot};
pub use error::ConfigError;
pub use settings::{QualityPreset, Settings};
pub use tuning::Tuning;

/// Simulation configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, one tick per display frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;
    /// Longest frame interval the driver will account for
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Hand-tracking producers clamp their speed estimate to this
    pub const MAX_HAND_SPEED: f32 = 5.0;

    /// Where inactive particle slots are parked (far below the view)
    pub const PARKED_POSITION: [f32; 3] = [0.0, -10_000.0, 0.0];
}

/// Per-tick scale factor relative to a 60 Hz frame.
///
/// Velocities, decays and damping factors are expressed per 60 Hz frame;
/// this keeps them meaningful if a caller ticks with a different `dt`.
#[inline]
pub fn frame_scale(dt: f32) -> f32 {
    dt / consts::SIM_DT
}

/// Linear interpolation
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
