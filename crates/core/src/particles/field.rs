//! Falling snow field
//!
//! `ParticleField` owns a fixed number of flakes. Flakes are never created or
//! destroyed after construction; a flake that falls through the snow line or
//! drifts out of the bounding sphere is moved back onto the sphere surface
//! and keeps its original velocity.

use super::spawn::{SpawnSphere, MAX_SPAWN_ATTEMPTS};
use crate::config::{SceneConfig, VelocityProfile};
use crate::core_types::Vec3;
use crate::error::Result;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{info, trace};

/// A single snow flake
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    /// World-space position
    pub position: Vec3,
    /// Displacement subtracted from `position` each step. The `y` component
    /// is positive, so flakes fall.
    pub velocity: Vec3,
}

impl Particle {
    pub fn new(position: Vec3, velocity: Vec3) -> Self {
        Self { position, velocity }
    }
}

/// Draw a velocity from the per-axis discrete profiles.
pub fn sample_velocity<R: Rng + ?Sized>(profile: &VelocityProfile, rng: &mut R) -> Vec3 {
    Vec3::new(
        profile.lateral.sample(rng.random::<f32>()),
        profile.fall.sample(rng.random::<f32>()),
        profile.lateral.sample(rng.random::<f32>()),
    )
}

/// Fixed-size field of falling particles plus the flat position buffer the
/// renderer reads from
pub struct ParticleField {
    particles: Vec<Particle>,
    /// Interleaved `xyz` positions, kept in step with `particles`
    positions: Vec<f32>,
    /// Set whenever `positions` changed since the renderer last uploaded it
    dirty: bool,
    bounds: SpawnSphere,
    /// Rejection-sampling budget for each respawn
    spawn_attempts: u32,
    rng: StdRng,
}

impl ParticleField {
    /// Create a field of `config.count` particles seeded from the OS RNG.
    ///
    /// # Errors
    /// Returns an error if `config` fails [`SceneConfig::validate`] or a spawn
    /// point cannot be drawn.
    pub fn new(config: &SceneConfig) -> Result<Self> {
        Self::with_rng(config, StdRng::from_os_rng())
    }

    /// Create a field whose spawn points and velocities are reproducible.
    ///
    /// # Errors
    /// Same as [`Self::new`].
    pub fn with_seed(config: &SceneConfig, seed: u64) -> Result<Self> {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    /// Create a field drawing from `rng`.
    ///
    /// All spawn positions are drawn first, then all velocities.
    ///
    /// # Errors
    /// Same as [`Self::new`].
    pub fn with_rng(config: &SceneConfig, mut rng: StdRng) -> Result<Self> {
        config.validate()?;
        let bounds = SpawnSphere::from_config(config);

        let positions = (0..config.count)
            .map(|_| bounds.generate_point(&mut rng))
            .collect::<Result<Vec<_>>>()?;

        let particles = positions
            .into_iter()
            .map(|position| Particle::new(position, sample_velocity(&config.velocity, &mut rng)))
            .collect();

        let field = Self::assemble(particles, bounds, rng);

        info!(
            "Particle field initialized: {} particles, radius={:.2}, center_height={:.2}, \
             min_height={:.2}",
            field.len(),
            bounds.radius,
            bounds.center_height,
            bounds.min_height
        );

        Ok(field)
    }

    /// Create a field from caller-provided particles.
    ///
    /// Particles are taken as-is; ones outside the bounds are respawned by the
    /// next [`Self::advance`]. `config.count` is ignored in favour of
    /// `particles.len()`.
    ///
    /// # Errors
    /// Returns an error if `config` fails [`SceneConfig::validate`].
    pub fn from_particles(
        config: &SceneConfig,
        particles: Vec<Particle>,
        rng: StdRng,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self::assemble(particles, SpawnSphere::from_config(config), rng))
    }

    fn assemble(particles: Vec<Particle>, bounds: SpawnSphere, rng: StdRng) -> Self {
        let positions = particles
            .iter()
            .flat_map(|p| [p.position.x, p.position.y, p.position.z])
            .collect();

        Self {
            particles,
            positions,
            dirty: true,
            bounds,
            spawn_attempts: MAX_SPAWN_ATTEMPTS,
            rng,
        }
    }

    /// Limit the draws [`Self::advance`] makes when respawning one particle.
    /// Defaults to [`MAX_SPAWN_ATTEMPTS`].
    pub fn with_spawn_attempts(mut self, attempts: u32) -> Self {
        self.spawn_attempts = attempts;
        self
    }

    /// Move every particle by `-velocity * step` and respawn the ones that left
    /// the field.
    ///
    /// `step` is 1 for frame-coupled motion; see
    /// [`crate::config::IntegrationMode::step_factor`]. Marks the position
    /// buffer dirty.
    ///
    /// # Returns
    ///
    /// Number of particles respawned this step.
    ///
    /// # Errors
    /// Returns [`crate::SimulationError::SpawnAttemptsExhausted`] if a respawn
    /// could not find a point above the snow line. The failing particle keeps
    /// its previous position; particles before it have already moved. The
    /// position buffer matches the particles and is dirty either way.
    pub fn advance(&mut self, step: f32) -> Result<usize> {
        let mut respawned = 0;
        self.dirty = true;

        for (index, (particle, slot)) in self
            .particles
            .iter_mut()
            .zip(self.positions.chunks_exact_mut(3))
            .enumerate()
        {
            let mut next = particle.position - particle.velocity * step;

            if !self.bounds.contains(&next) {
                trace!(
                    "Respawning particle {} from ({:.2}, {:.2}, {:.2})",
                    index,
                    next.x,
                    next.y,
                    next.z
                );
                next = self.bounds.generate_point_within(&mut self.rng, self.spawn_attempts)?;
                respawned += 1;
            }

            particle.position = next;
            slot.copy_from_slice(next.as_slice());
        }

        Ok(respawned)
    }

    /// Overwrite a particle's velocity. Returns `false` if `index` is out of range.
    pub fn set_velocity(&mut self, index: usize, velocity: Vec3) -> bool {
        match self.particles.get_mut(index) {
            Some(particle) => {
                particle.velocity = velocity;
                true
            }
            None => false,
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Interleaved `xyz` position buffer, three floats per particle.
    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Take the dirty flag, leaving it cleared.
    ///
    /// Returns `true` if the renderer needs to re-upload [`Self::positions`].
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn bounds(&self) -> &SpawnSphere {
        &self.bounds
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}
