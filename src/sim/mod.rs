//! Simulation core
//!
//! Everything that changes from frame to frame lives here. This module never
//! touches a graphics device, audio device or camera:
//! - Inputs arrive as a `TickInput` (latest hand snapshot plus session intents)
//! - Outputs are in-place buffers and `GameEvent`s drained by the driver
//! - Only `tick` mutates state

pub mod coins;
pub mod envelopes;
pub mod gesture;
pub mod particles;
pub mod projectiles;
pub mod scheduler;
pub mod session;
pub mod state;
pub mod stats;
pub mod tick;
pub mod viewer;

pub use gesture::{Gesture, GestureAction, GestureEdge, GestureStabilizer, HandSnapshot, edge_actions};
pub use particles::{Particle, ParticlePhysics, ParticlePool};
pub use scheduler::{SpawnScheduler, launch_delay};
pub use session::{GamePhase, Session};
pub use state::{Coin, Envelope, GameEvent, Projectile, SimState};
pub use stats::{GameStats, Scoreboard};
pub use tick::{TickInput, tick};
pub use viewer::Viewer;
