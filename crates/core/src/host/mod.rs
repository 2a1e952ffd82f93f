//! Host-provided collaborators: clock, frame scheduler and renderer

pub mod clock;
pub mod renderer;
pub mod scheduler;

pub use clock::{Clock, ManualClock, SystemClock};
pub use renderer::{RecordingRenderer, Renderer, SceneState};
pub use scheduler::{FixedFrameScheduler, FrameScheduler, PacedScheduler};
