//! Orbiting camera rig
//!
//! The camera sways back and forth around the diorama on a fixed-height
//! circle, always looking at a point slightly above the ground. Its only
//! state is the orbit distance (calibrated from viewport width) and the
//! aspect ratio; the position is a pure function of elapsed time.

use crate::core_types::{to_point, Vec3};
use crate::error::{Result, SimulationError};
use nalgebra::{Matrix4, Perspective3};
use std::num::NonZeroU32;

// Distance calibration
/// Viewport width at which the distance modifier bottoms out.
pub const REFERENCE_VIEWPORT_WIDTH: f32 = 2560.0;
pub const MIN_DEVICE_COEFFICIENT: f32 = 2.0;
pub const MAX_DISTANCE_MODIFIER: f32 = 12.0;
pub const BASE_DISTANCE: f32 = 9.0;

// Orbit path
pub const ORBIT_RATE: f32 = 0.5;
pub const ORBIT_AMPLITUDE: f32 = 0.1;
pub const ORBIT_CENTER_PHASE: f32 = 0.5;
pub const CAMERA_HEIGHT: f32 = 6.0;
pub const TARGET_HEIGHT: f32 = 3.0;

// Projection
pub const FOV_DEGREES: f32 = 75.0;
pub const NEAR_PLANE: f32 = 0.1;
pub const FAR_PLANE: f32 = 100.0;

/// Renderers are never asked for more than this many device pixels per CSS pixel.
pub const MAX_PIXEL_RATIO: f32 = 2.0;

/// Output surface size. Both dimensions are guaranteed non-zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    width: NonZeroU32,
    height: NonZeroU32,
    device_pixel_ratio: f32,
}

impl Viewport {
    /// # Errors
    /// Returns [`SimulationError::InvalidViewport`] if either dimension is zero,
    /// or [`SimulationError::InvalidPixelRatio`] if `device_pixel_ratio` is
    /// non-finite or not positive.
    pub fn new(width: u32, height: u32, device_pixel_ratio: f32) -> Result<Self> {
        let (Some(w), Some(h)) = (NonZeroU32::new(width), NonZeroU32::new(height)) else {
            return Err(SimulationError::InvalidViewport { width, height });
        };
        if !(device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0) {
            return Err(SimulationError::InvalidPixelRatio {
                ratio: device_pixel_ratio,
            });
        }

        Ok(Self {
            width: w,
            height: h,
            device_pixel_ratio,
        })
    }

    pub fn width(&self) -> NonZeroU32 {
        self.width
    }

    pub fn height(&self) -> NonZeroU32 {
        self.height
    }

    pub fn aspect(&self) -> f32 {
        self.width.get() as f32 / self.height.get() as f32
    }

    /// Device pixel ratio capped at [`MAX_PIXEL_RATIO`].
    pub fn pixel_ratio(&self) -> f32 {
        self.device_pixel_ratio.min(MAX_PIXEL_RATIO)
    }
}

/// Orbit distance for a viewport `width` pixels wide.
///
/// Narrow viewports zoom out so the model is not clipped on phones; the
/// squared coefficient is capped so very narrow windows don't push the
/// camera out indefinitely.
pub fn calibrated_distance(width: NonZeroU32) -> f32 {
    let device_coefficient =
        (REFERENCE_VIEWPORT_WIDTH / width.get() as f32).max(MIN_DEVICE_COEFFICIENT);
    let modifier = (device_coefficient * device_coefficient).min(MAX_DISTANCE_MODIFIER);
    BASE_DISTANCE + modifier
}

/// Angle around the vertical axis at `elapsed` seconds.
///
/// Oscillates in `[0.4, 0.6]` radians rather than sweeping a full circle.
#[inline]
pub fn orbit_phase(elapsed: f32) -> f32 {
    (elapsed * ORBIT_RATE).sin() * ORBIT_AMPLITUDE + ORBIT_CENTER_PHASE
}

/// Point every frame looks at.
pub fn look_target() -> Vec3 {
    Vec3::new(0.0, TARGET_HEIGHT, 0.0)
}

/// Everything the renderer needs to place the camera for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraTransform {
    pub position: Vec3,
    pub target: Vec3,
    /// Right-handed world-to-view matrix
    pub view: Matrix4<f32>,
    /// Perspective projection for the current aspect ratio
    pub projection: Matrix4<f32>,
}

impl CameraTransform {
    pub fn view_projection(&self) -> Matrix4<f32> {
        self.projection * self.view
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraRig {
    distance: f32,
    aspect: f32,
}

impl CameraRig {
    pub fn new(viewport: &Viewport) -> Self {
        let mut rig = Self {
            distance: 0.0,
            aspect: 1.0,
        };
        rig.resize(viewport);
        rig
    }

    /// Recalibrate the orbit distance from the viewport width.
    ///
    /// Returns the new distance.
    pub fn set_camera_distance(&mut self, viewport: &Viewport) -> f32 {
        self.distance = calibrated_distance(viewport.width());
        self.distance
    }

    /// Recalibrate distance and aspect ratio after a viewport change.
    pub fn resize(&mut self, viewport: &Viewport) {
        self.set_camera_distance(viewport);
        self.aspect = viewport.aspect();
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    /// Camera position at `elapsed` seconds.
    pub fn position_at(&self, elapsed: f32) -> Vec3 {
        let phase = orbit_phase(elapsed);
        Vec3::new(
            phase.sin() * self.distance,
            CAMERA_HEIGHT,
            phase.cos() * self.distance,
        )
    }

    /// Full camera transform at `elapsed` seconds.
    pub fn update_camera(&self, elapsed: f32) -> CameraTransform {
        let position = self.position_at(elapsed);
        let target = look_target();

        let view = Matrix4::look_at_rh(&to_point(&position), &to_point(&target), &Vec3::y());
        let projection =
            Perspective3::new(self.aspect, FOV_DEGREES.to_radians(), NEAR_PLANE, FAR_PLANE)
                .to_homogeneous();

        CameraTransform {
            position,
            target,
            view,
            projection,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn viewport(width: u32) -> Viewport {
        Viewport::new(width, 720, 1.0).unwrap()
    }

    #[test]
    fn test_distance_reference_width() {
        // coefficient 2, modifier 4
        let mut rig = CameraRig::new(&viewport(2560));
        assert_eq!(rig.distance(), 13.0);
        // Calibrating again gives the same answer
        assert_eq!(rig.set_camera_distance(&viewport(2560)), 13.0);
    }

    #[test]
    fn test_distance_modifier_capped() {
        // coefficient 4, modifier 16 capped to 12
        let rig = CameraRig::new(&viewport(640));
        assert_eq!(rig.distance(), 21.0);

        let tiny = CameraRig::new(&viewport(1));
        assert_eq!(tiny.distance(), 21.0);
    }

    #[test]
    fn test_distance_between_bounds() {
        // Wide screens stay at the floor coefficient
        assert_eq!(calibrated_distance(viewport(3840).width()), 13.0);
        assert_eq!(calibrated_distance(viewport(1280).width()), 13.0);

        // 2560 / 1000 = 2.56, squared = 6.5536
        assert_relative_eq!(
            calibrated_distance(viewport(1000).width()),
            15.5536,
            epsilon = 1e-4
        );
    }

    #[test]
    fn test_zero_viewport_rejected() {
        assert_eq!(
            Viewport::new(0, 600, 1.0),
            Err(SimulationError::InvalidViewport {
                width: 0,
                height: 600
            })
        );
        assert!(Viewport::new(800, 0, 1.0).is_err());
    }

    #[test]
    fn test_pixel_ratio_capped() {
        assert_eq!(Viewport::new(800, 600, 3.0).unwrap().pixel_ratio(), 2.0);
        assert_eq!(Viewport::new(800, 600, 1.5).unwrap().pixel_ratio(), 1.5);
    }

    #[test]
    fn test_bad_pixel_ratio_rejected() {
        assert!(matches!(
            Viewport::new(800, 600, f32::NAN),
            Err(SimulationError::InvalidPixelRatio { ratio }) if ratio.is_nan()
        ));
        assert_eq!(
            Viewport::new(800, 600, -1.0),
            Err(SimulationError::InvalidPixelRatio { ratio: -1.0 })
        );
        assert!(Viewport::new(800, 600, 0.0).is_err());
        assert!(Viewport::new(800, 600, f32::INFINITY).is_err());
    }

    #[test]
    fn test_position_at_start() {
        let rig = CameraRig::new(&viewport(2560));
        let pos = rig.position_at(0.0);

        assert_relative_eq!(orbit_phase(0.0), 0.5);
        assert_relative_eq!(pos.x, 0.5_f32.sin() * 13.0, epsilon = 1e-5);
        assert_relative_eq!(pos.y, CAMERA_HEIGHT);
        assert_relative_eq!(pos.z, 0.5_f32.cos() * 13.0, epsilon = 1e-5);
        assert_relative_eq!(pos.x, 6.2325, epsilon = 1e-3);
        assert_relative_eq!(pos.z, 11.4085, epsilon = 1e-3);
    }

    #[test]
    fn test_orbit_stays_on_circle() {
        let rig = CameraRig::new(&viewport(1920));
        for i in 0..200 {
            let t = i as f32 * 0.37;
            let phase = orbit_phase(t);
            assert!((0.4 - 1e-6..=0.6 + 1e-6).contains(&phase));

            let pos = rig.position_at(t);
            let radius = (pos.x * pos.x + pos.z * pos.z).sqrt();
            assert_relative_eq!(radius, rig.distance(), epsilon = 1e-4);
        }
    }

    #[test]
    fn test_position_is_deterministic() {
        let rig = CameraRig::new(&viewport(1366));
        assert_eq!(rig.position_at(12.5), rig.position_at(12.5));
    }

    #[test]
    fn test_view_looks_at_target() {
        let rig = CameraRig::new(&viewport(2560));
        let transform = rig.update_camera(3.0);

        // The target sits straight ahead, down the view-space -Z axis
        let target_in_view = transform.view.transform_point(&to_point(&transform.target));
        let dist = (transform.position - transform.target).norm();
        assert_relative_eq!(target_in_view.x, 0.0, epsilon = 1e-4);
        assert_relative_eq!(target_in_view.y, 0.0, epsilon = 1e-4);
        assert_relative_eq!(target_in_view.z, -dist, epsilon = 1e-4);
    }

    #[test]
    fn test_resize_updates_aspect() {
        let mut rig = CameraRig::new(&viewport(1280));
        assert_relative_eq!(rig.aspect(), 1280.0 / 720.0);

        rig.resize(&Viewport::new(640, 640, 1.0).unwrap());
        assert_eq!(rig.aspect(), 1.0);
        assert_eq!(rig.distance(), 21.0);
    }
}
