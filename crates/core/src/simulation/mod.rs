//! Frame loop tying the snow field, camera rig and scene together
//!
//! `Simulation` owns all mutable state of one diorama instance:
//! - the particle field and its position buffer
//! - the camera rig (distance and aspect, recalibrated on resize)
//! - named scene nodes and the secondary animators that move them
//! - the clock and the previous tick time
//!
//! Each call to [`Simulation::tick`] runs one frame: read the clock, advance
//! the particles, place the camera, run animators, upload positions if they
//! changed and render. [`Simulation::run`] keeps ticking for as long as the
//! host scheduler grants frames.

pub mod stats;

pub use stats::{FrameStats, SimulationStats};

use crate::camera::{CameraRig, CameraTransform, Viewport};
use crate::config::SceneConfig;
use crate::error::Result;
use crate::host::{Clock, FrameScheduler, Renderer, SceneState};
use crate::particles::ParticleField;
use crate::profiler::ProfilerScope;
use crate::scene::{FrameContext, SceneGraph, SecondaryAnimator};
use tracing::{debug, info};

/// Frame loop lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// Constructed, no frame run yet
    Idle,
    /// At least one frame has run
    Running,
}

/// One diorama: snow field, orbiting camera and animated scene nodes
pub struct Simulation<C: Clock> {
    config: SceneConfig,
    field: ParticleField,
    rig: CameraRig,
    viewport: Viewport,
    clock: C,
    previous_time: f32,
    state: LoopState,
    scene: SceneGraph,
    animators: Vec<Box<dyn SecondaryAnimator>>,
    stats: SimulationStats,
}

impl<C: Clock> Simulation<C> {
    /// Create a simulation with an OS-seeded particle field.
    ///
    /// # Errors
    /// Returns an error if `config` is invalid or the initial spawn fails.
    pub fn new(config: SceneConfig, viewport: Viewport, clock: C) -> Result<Self> {
        let field = ParticleField::new(&config)?;
        Ok(Self::with_field(config, field, viewport, clock))
    }

    /// Create a simulation whose particle field is reproducible from `seed`.
    ///
    /// # Errors
    /// Same as [`Self::new`].
    pub fn with_seed(
        config: SceneConfig,
        viewport: Viewport,
        clock: C,
        seed: u64,
    ) -> Result<Self> {
        let field = ParticleField::with_seed(&config, seed)?;
        Ok(Self::with_field(config, field, viewport, clock))
    }

    /// Create a simulation around an already-built field.
    ///
    /// `field` must have been built from `config`.
    pub fn with_field(
        config: SceneConfig,
        field: ParticleField,
        viewport: Viewport,
        clock: C,
    ) -> Self {
        let rig = CameraRig::new(&viewport);

        info!(
            "Simulation created: {} particles, {}x{} viewport, camera distance {:.2}, {:?}",
            field.len(),
            viewport.width(),
            viewport.height(),
            rig.distance(),
            config.integration
        );

        Self {
            config,
            field,
            rig,
            viewport,
            clock,
            previous_time: 0.0,
            state: LoopState::Idle,
            scene: SceneGraph::new(),
            animators: Vec::new(),
            stats: SimulationStats::default(),
        }
    }

    /// Register an animator to run after the core update of every tick.
    /// Animators run in registration order.
    pub fn add_animator(&mut self, animator: impl SecondaryAnimator + 'static) {
        debug!("Registered animator '{}'", animator.name());
        self.animators.push(Box::new(animator));
    }

    /// Push the current viewport size and pixel ratio to `renderer`.
    pub fn attach(&self, renderer: &mut dyn Renderer) {
        renderer.set_viewport_size(self.viewport.width().get(), self.viewport.height().get());
        renderer.set_pixel_ratio(self.viewport.pixel_ratio());
    }

    /// Handle a viewport resize: recalibrate the camera and forward the new
    /// size and (capped) pixel ratio to the renderer.
    ///
    /// # Errors
    /// Returns [`crate::SimulationError::InvalidViewport`] if `width` or
    /// `height` is zero, or [`crate::SimulationError::InvalidPixelRatio`] for a
    /// non-finite or non-positive ratio; nothing is changed in either case.
    pub fn resize(
        &mut self,
        width: u32,
        height: u32,
        device_pixel_ratio: f32,
        renderer: &mut dyn Renderer,
    ) -> Result<()> {
        let viewport = Viewport::new(width, height, device_pixel_ratio)?;
        self.viewport = viewport;
        self.rig.resize(&viewport);
        self.attach(renderer);

        info!(
            "Viewport resized to {}x{} (pixel ratio {:.2}), camera distance {:.2}",
            width,
            height,
            viewport.pixel_ratio(),
            self.rig.distance()
        );
        Ok(())
    }

    /// Run one frame.
    ///
    /// # Errors
    /// Returns [`crate::SimulationError::SpawnAttemptsExhausted`] if a particle
    /// could not be respawned. Nothing is rendered for that frame.
    pub fn tick(&mut self, renderer: &mut dyn Renderer) -> Result<FrameStats> {
        let _scope = ProfilerScope::new("tick");

        if self.state == LoopState::Idle {
            info!("Frame loop started");
            self.state = LoopState::Running;
        }

        let elapsed = self.clock.elapsed_time();
        let delta = (elapsed - self.previous_time).max(0.0);
        self.previous_time = elapsed;

        // 1. Particles
        let step = self.config.integration.step_factor(delta);
        let respawned = self.field.advance(step)?;

        // 2. Camera
        let camera = self.rig.update_camera(elapsed);

        // 3. Scene nodes
        let frame = FrameContext {
            elapsed,
            delta,
            camera: &camera,
        };
        for animator in &mut self.animators {
            animator.animate(&frame, &mut self.scene);
        }

        // 4. Draw
        if self.field.take_dirty() {
            renderer.upload_positions(self.field.positions());
        }
        let scene = SceneState {
            positions: self.field.positions(),
            point_size: self.config.point_size,
            nodes: &self.scene,
        };
        renderer.render(&scene, &camera);

        self.stats.record(respawned);

        debug!(
            "Frame {}: t={:.3}s, dt={:.4}s, step={:.3}, respawned={}",
            self.stats.frames, elapsed, delta, step, respawned
        );

        Ok(FrameStats {
            frame: self.stats.frames,
            elapsed,
            delta,
            respawned,
        })
    }

    /// Tick once per frame granted by `scheduler` until it reports teardown.
    ///
    /// # Returns
    ///
    /// Totals over the whole life of the simulation, including frames run
    /// before this call.
    ///
    /// # Errors
    /// Stops at and returns the first error from [`Self::tick`].
    pub fn run(
        &mut self,
        scheduler: &mut dyn FrameScheduler,
        renderer: &mut dyn Renderer,
    ) -> Result<SimulationStats> {
        while scheduler.next_frame() {
            self.tick(renderer)?;
        }

        info!(
            "Frame loop stopped after {} frames ({} respawns)",
            self.stats.frames, self.stats.total_respawns
        );
        Ok(self.stats)
    }

    /// Camera transform at the clock's current time.
    pub fn camera(&self) -> CameraTransform {
        self.rig.update_camera(self.clock.elapsed_time())
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn field(&self) -> &ParticleField {
        &self.field
    }

    pub fn field_mut(&mut self) -> &mut ParticleField {
        &mut self.field
    }

    pub fn camera_rig(&self) -> &CameraRig {
        &self.rig
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn scene(&self) -> &SceneGraph {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut SceneGraph {
        &mut self.scene
    }

    pub fn stats(&self) -> SimulationStats {
        self.stats
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }
}
