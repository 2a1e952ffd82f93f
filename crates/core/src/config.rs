//! Scene configuration
//!
//! Defaults reproduce the diorama as shipped: 800 flakes falling inside a
//! 10 unit sphere centred 7 units above the ground, never below height 1.

use crate::error::{Result, SimulationError};
use serde::{Deserialize, Serialize};

// Particles
pub const DEFAULT_PARTICLE_COUNT: usize = 800;
pub const DEFAULT_SPHERE_RADIUS: f32 = 10.0;
pub const DEFAULT_CENTER_HEIGHT: f32 = 7.0;
pub const DEFAULT_MIN_HEIGHT: f32 = 1.0;
pub const DEFAULT_POINT_SIZE: f32 = 0.2;

/// Margin past the sphere surface tolerated before a particle is respawned.
/// Particles spawn exactly on the surface, so a zero margin would respawn
/// anything whose first step drifts outward.
pub const RESPAWN_MARGIN: f32 = 0.1;

/// Display rate the default per-frame velocities were tuned for.
pub const DEFAULT_REFERENCE_RATE: f32 = 60.0;

/// One velocity component drawn as `floor(u * range + offset) * scale + bias`.
///
/// The floor makes the result take a handful of discrete values rather than a
/// continuous spread; flakes visibly fall at a few distinct speeds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DiscreteJitter {
    pub range: f32,
    pub offset: f32,
    pub scale: f32,
    pub bias: f32,
}

impl DiscreteJitter {
    /// Map a uniform sample `u ∈ [0, 1)` onto this component's discrete set.
    #[inline]
    pub fn sample(&self, u: f32) -> f32 {
        (u * self.range + self.offset).floor() * self.scale + self.bias
    }

    /// Sideways drift: one of `{-3, -2, -1, 0, 1, 2} * 0.001`.
    pub const fn lateral() -> Self {
        Self {
            range: 6.0,
            offset: -3.0,
            scale: 0.001,
            bias: 0.0,
        }
    }

    /// Fall rate: one of `{0..=5} * 0.0018 + 0.001`, always positive.
    pub const fn fall() -> Self {
        Self {
            range: 5.0,
            offset: 0.12,
            scale: 0.0018,
            bias: 0.001,
        }
    }

    fn validate(&self, field: &'static str) -> Result<()> {
        if !(self.range.is_finite() && self.range > 0.0) {
            return Err(SimulationError::not_positive(field, self.range));
        }
        if !(self.offset.is_finite() && self.scale.is_finite() && self.bias.is_finite()) {
            return Err(SimulationError::invalid_config(
                field,
                "offset, scale and bias must be finite",
            ));
        }
        Ok(())
    }
}

/// Per-axis velocity distributions. `x` and `z` share the lateral profile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VelocityProfile {
    pub lateral: DiscreteJitter,
    pub fall: DiscreteJitter,
}

impl Default for VelocityProfile {
    fn default() -> Self {
        Self {
            lateral: DiscreteJitter::lateral(),
            fall: DiscreteJitter::fall(),
        }
    }
}

/// How a particle's stored velocity is applied each tick
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum IntegrationMode {
    /// Velocity is a fixed displacement per frame; fall speed follows the
    /// display refresh rate.
    #[default]
    FrameCoupled,
    /// Velocity is scaled by `delta * reference_rate`, so motion matches
    /// `FrameCoupled` at `reference_rate` Hz and stays constant in wall time
    /// at any other rate.
    TimeScaled { reference_rate: f32 },
}

impl IntegrationMode {
    /// Multiplier applied to every velocity for a tick lasting `delta` seconds.
    #[inline]
    pub fn step_factor(&self, delta: f32) -> f32 {
        match self {
            Self::FrameCoupled => 1.0,
            Self::TimeScaled { reference_rate } => delta * reference_rate,
        }
    }
}

/// Complete configuration for a snow field and its scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub count: usize,
    pub sphere_radius: f32,
    pub center_height: f32,
    pub min_height: f32,
    pub point_size: f32,
    pub integration: IntegrationMode,
    pub velocity: VelocityProfile,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            count: DEFAULT_PARTICLE_COUNT,
            sphere_radius: DEFAULT_SPHERE_RADIUS,
            center_height: DEFAULT_CENTER_HEIGHT,
            min_height: DEFAULT_MIN_HEIGHT,
            point_size: DEFAULT_POINT_SIZE,
            integration: IntegrationMode::default(),
            velocity: VelocityProfile::default(),
        }
    }
}

impl SceneConfig {
    /// Highest point of the bounding sphere.
    #[inline]
    pub fn top_height(&self) -> f32 {
        self.center_height + self.sphere_radius
    }

    /// Check that a field built from this config can always spawn particles.
    ///
    /// # Errors
    /// Returns [`SimulationError::InvalidConfig`] naming the first field that is
    /// non-finite or out of range, or when `min_height` is at or above the top
    /// of the sphere (no spawn point could ever be accepted).
    pub fn validate(&self) -> Result<()> {
        if !(self.sphere_radius.is_finite() && self.sphere_radius > 0.0) {
            return Err(SimulationError::not_positive(
                "sphere_radius",
                self.sphere_radius,
            ));
        }
        if !self.center_height.is_finite() {
            return Err(SimulationError::invalid_config(
                "center_height",
                "must be finite",
            ));
        }
        if !self.min_height.is_finite() {
            return Err(SimulationError::invalid_config("min_height", "must be finite"));
        }
        if self.min_height >= self.top_height() {
            return Err(SimulationError::invalid_config(
                "min_height",
                format!(
                    "{} is not below the top of the sphere ({}), no spawn point exists",
                    self.min_height,
                    self.top_height()
                ),
            ));
        }
        if !(self.point_size.is_finite() && self.point_size > 0.0) {
            return Err(SimulationError::not_positive("point_size", self.point_size));
        }
        if let IntegrationMode::TimeScaled { reference_rate } = self.integration {
            if !(reference_rate.is_finite() && reference_rate > 0.0) {
                return Err(SimulationError::not_positive(
                    "integration.reference_rate",
                    reference_rate,
                ));
            }
        }
        self.velocity.lateral.validate("velocity.lateral")?;
        self.velocity.fall.validate("velocity.fall")?;
        Ok(())
    }
}
