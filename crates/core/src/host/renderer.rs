//! Renderer interface
//!
//! The core never draws anything. Each tick it hands the renderer the
//! particle positions (only when they changed), the scene nodes and a camera
//! transform. Materials, textures and the draw call itself live behind this
//! trait.

use crate::camera::CameraTransform;
use crate::scene::SceneGraph;

/// Read-only view of everything drawn in one frame
#[derive(Debug, Clone, Copy)]
pub struct SceneState<'a> {
    /// Interleaved `xyz` particle positions
    pub positions: &'a [f32],
    /// World-space size of a snow point sprite
    pub point_size: f32,
    pub nodes: &'a SceneGraph,
}

/// Drawing backend driven by the frame loop
pub trait Renderer {
    /// Replace the GPU copy of the particle position buffer.
    ///
    /// Called at most once per tick, before `render`, only when the buffer
    /// changed.
    fn upload_positions(&mut self, positions: &[f32]);

    /// Draw one frame.
    fn render(&mut self, scene: &SceneState<'_>, camera: &CameraTransform);

    /// Resize the output surface, in CSS pixels.
    fn set_viewport_size(&mut self, width: u32, height: u32);

    /// Set device pixels per CSS pixel.
    fn set_pixel_ratio(&mut self, ratio: f32);
}

/// Renderer that draws nothing and remembers what it was asked to do
///
/// Used by the headless demo and by tests.
#[derive(Debug, Clone, Default)]
pub struct RecordingRenderer {
    /// Number of `upload_positions` calls
    pub uploads: u64,
    /// Number of `render` calls
    pub renders: u64,
    /// Contents of the most recent upload
    pub uploaded: Vec<f32>,
    pub viewport: Option<(u32, u32)>,
    pub pixel_ratio: Option<f32>,
    pub last_camera: Option<CameraTransform>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Renderer for RecordingRenderer {
    fn upload_positions(&mut self, positions: &[f32]) {
        self.uploads += 1;
        self.uploaded.clear();
        self.uploaded.extend_from_slice(positions);
    }

    fn render(&mut self, _scene: &SceneState<'_>, camera: &CameraTransform) {
        self.renders += 1;
        self.last_camera = Some(*camera);
    }

    fn set_viewport_size(&mut self, width: u32, height: u32) {
        self.viewport = Some((width, height));
    }

    fn set_pixel_ratio(&mut self, ratio: f32) {
        self.pixel_ratio = Some(ratio);
    }
}
