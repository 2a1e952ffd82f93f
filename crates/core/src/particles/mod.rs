//! Snow particle field
//!
//! - `spawn`: rejection sampling of spawn points on the bounding sphere
//! - `field`: the fixed-size particle array, per-tick advance and respawn

pub mod field;
pub mod spawn;

pub use field::{sample_velocity, Particle, ParticleField};
pub use spawn::{SpawnSphere, MAX_SPAWN_ATTEMPTS};
