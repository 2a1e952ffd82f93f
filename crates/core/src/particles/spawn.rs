//! Spawn-point sampling on the bounding sphere
//!
//! New and respawned flakes are placed on the *surface* of the sphere centred
//! at `(0, center_height, 0)`: `theta` is uniform in `[0, 2π)` and
//! `phi = acos(2u - 1)`. Points below the snow line are rejected and redrawn.
//! Rejection keeps the spatial distribution intact; clamping to `min_height`
//! would pile flakes up on a flat disc.

use crate::config::{SceneConfig, RESPAWN_MARGIN};
use crate::core_types::Vec3;
use crate::error::{Result, SimulationError};
use rand::Rng;
use std::f32::consts::TAU;

/// Upper bound on rejection-sampling draws for a single spawn point.
///
/// With the default scene about 80% of draws are accepted, so reaching this
/// cap means the configuration leaves an (almost) empty acceptance region.
pub const MAX_SPAWN_ATTEMPTS: u32 = 100_000;

/// Bounding sphere and snow line shared by spawning and the respawn test
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnSphere {
    pub radius: f32,
    pub center_height: f32,
    pub min_height: f32,
}

impl SpawnSphere {
    pub fn from_config(config: &SceneConfig) -> Self {
        Self {
            radius: config.sphere_radius,
            center_height: config.center_height,
            min_height: config.min_height,
        }
    }

    /// Centre of the sphere in world space.
    #[inline]
    pub fn center(&self) -> Vec3 {
        Vec3::new(0.0, self.center_height, 0.0)
    }

    /// Distance from `position` to the sphere centre.
    #[inline]
    pub fn distance_to_center(&self, position: &Vec3) -> f32 {
        (position - self.center()).norm()
    }

    /// Whether a particle at `position` may stay where it is.
    ///
    /// A particle leaves the field when it drops below `min_height` or moves
    /// further than `radius + RESPAWN_MARGIN` from the centre.
    #[inline]
    pub fn contains(&self, position: &Vec3) -> bool {
        position.y >= self.min_height
            && self.distance_to_center(position) <= self.radius + RESPAWN_MARGIN
    }

    /// Draw a point on the sphere surface at or above `min_height`.
    ///
    /// # Errors
    /// Returns [`SimulationError::SpawnAttemptsExhausted`] if no acceptable
    /// point was drawn within [`MAX_SPAWN_ATTEMPTS`] tries.
    pub fn generate_point<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Vec3> {
        self.generate_point_within(rng, MAX_SPAWN_ATTEMPTS)
    }

    /// [`Self::generate_point`] with an explicit attempt budget.
    ///
    /// # Errors
    /// Returns [`SimulationError::SpawnAttemptsExhausted`] once `max_attempts`
    /// draws have all landed below `min_height`.
    pub fn generate_point_within<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        max_attempts: u32,
    ) -> Result<Vec3> {
        for _ in 0..max_attempts {
            let theta = TAU * rng.random::<f32>();
            let phi = (2.0 * rng.random::<f32>() - 1.0).acos();

            let point = Vec3::new(
                self.radius * phi.sin() * theta.cos(),
                self.center_height + self.radius * phi.sin() * theta.sin(),
                self.radius * phi.cos(),
            );

            if point.y >= self.min_height {
                return Ok(point);
            }
        }

        Err(SimulationError::SpawnAttemptsExhausted {
            attempts: max_attempts,
        })
    }
}
