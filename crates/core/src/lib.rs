//! Snow Diorama Core Library
//!
//! Simulation engine behind an animated diorama: a field of snow flakes
//! falling inside a bounding sphere and a camera that gently sways around
//! the model. Rendering, asset loading and audio are left to the host, which
//! plugs in through the [`Renderer`], [`Clock`] and [`FrameScheduler`] traits.
//!
//! ## Frame loop
//!
//! Every tick of [`Simulation`]:
//! - advances each particle by its fixed per-frame velocity and respawns the
//!   ones that fell through the snow line or left the sphere
//! - places the camera on its orbit and aims it at the model
//! - runs the registered [`SecondaryAnimator`]s over the scene nodes
//! - uploads the position buffer (when dirty) and renders

// Core types and utilities
pub mod core_types;

pub mod camera;
pub mod config;
pub mod error;
pub mod host;
pub mod particles;
pub mod profiler;
pub mod scene;
pub mod simulation;

// Re-export core types
pub use core_types::Vec3;

pub use camera::{CameraRig, CameraTransform, Viewport};
pub use config::{DiscreteJitter, IntegrationMode, SceneConfig, VelocityProfile};
pub use error::SimulationError;
pub use host::{
    Clock, FixedFrameScheduler, FrameScheduler, ManualClock, PacedScheduler, RecordingRenderer,
    Renderer, SceneState, SystemClock,
};
pub use particles::{Particle, ParticleField, SpawnSphere};
pub use profiler::{FrameTimer, ProfilerScope};
pub use scene::{FaceCamera, FrameContext, SceneGraph, SceneNode, SecondaryAnimator};
pub use simulation::{FrameStats, LoopState, Simulation, SimulationStats};
