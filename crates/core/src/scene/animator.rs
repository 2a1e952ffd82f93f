//! Secondary animators
//!
//! Animators run once per tick after the particles and camera have been
//! updated. They receive the frame's camera transform and mutate named
//! scene nodes; the frame loop itself knows nothing about node names.

use super::graph::SceneGraph;
use crate::camera::CameraTransform;
use crate::core_types::Vec3;
use nalgebra::{UnitQuaternion, Vector3};
use std::f32::consts::FRAC_PI_3;

/// Past this `|sin(y)|` the X and Z angles of an XYZ decomposition are
/// coupled, and all of the residual is put into X.
const GIMBAL_LOCK_THRESHOLD: f32 = 0.999_999;

/// Split `rotation` into intrinsic XYZ Euler angles, `Rx(x) * Ry(y) * Rz(z)`.
///
/// `y` lands in `[-π/2, π/2]`.
pub fn euler_xyz(rotation: &UnitQuaternion<f32>) -> (f32, f32, f32) {
    let m = rotation.to_rotation_matrix().into_inner();
    let sin_y = m[(0, 2)].clamp(-1.0, 1.0);
    let y = sin_y.asin();

    if sin_y.abs() < GIMBAL_LOCK_THRESHOLD {
        ((-m[(1, 2)]).atan2(m[(2, 2)]), y, (-m[(0, 1)]).atan2(m[(0, 0)]))
    } else {
        (m[(2, 1)].atan2(m[(1, 1)]), y, 0.0)
    }
}

/// Inverse of [`euler_xyz`].
pub fn from_euler_xyz(x: f32, y: f32, z: f32) -> UnitQuaternion<f32> {
    UnitQuaternion::from_axis_angle(&Vector3::x_axis(), x)
        * UnitQuaternion::from_axis_angle(&Vector3::y_axis(), y)
        * UnitQuaternion::from_axis_angle(&Vector3::z_axis(), z)
}

/// Per-tick data handed to every animator
#[derive(Debug, Clone, Copy)]
pub struct FrameContext<'a> {
    /// Seconds since the clock started
    pub elapsed: f32,
    /// Seconds since the previous tick
    pub delta: f32,
    pub camera: &'a CameraTransform,
}

/// Hook invoked by the frame loop after the core update of every tick
pub trait SecondaryAnimator {
    /// Short label used in log output.
    fn name(&self) -> &str;

    /// Update `scene` for the current frame.
    fn animate(&mut self, frame: &FrameContext<'_>, scene: &mut SceneGraph);
}

/// Turns a named node to face the camera, then yaws it by a fixed offset.
///
/// The diorama uses this to keep the title card readable from the orbit
/// while angling it a third of a turn away from straight-on.
#[derive(Debug, Clone)]
pub struct FaceCamera {
    node: String,
    yaw_offset: f32,
}

impl FaceCamera {
    pub fn new(node: impl Into<String>, yaw_offset: f32) -> Self {
        Self {
            node: node.into(),
            yaw_offset,
        }
    }

    /// Title card behaviour: face the camera, then turn `π/3` clockwise.
    pub fn title() -> Self {
        Self::new("title", -FRAC_PI_3)
    }

    pub fn node(&self) -> &str {
        &self.node
    }

    /// Rotation that points local `+Z` from `from` towards `to`, with the yaw
    /// offset added to the middle angle of its XYZ Euler decomposition.
    ///
    /// When the node and target share a height this is a plain turn about the
    /// world vertical; otherwise the pitch and roll angles are left untouched.
    ///
    /// Returns `None` when the two points coincide.
    pub fn orientation(&self, from: &Vec3, to: &Vec3) -> Option<UnitQuaternion<f32>> {
        let dir = to - from;
        if dir.norm_squared() <= f32::EPSILON {
            return None;
        }
        let facing = UnitQuaternion::face_towards(&dir, &Vector3::y());
        let (x, y, z) = euler_xyz(&facing);
        Some(from_euler_xyz(x, y + self.yaw_offset, z))
    }
}

impl SecondaryAnimator for FaceCamera {
    fn name(&self) -> &str {
        "face-camera"
    }

    fn animate(&mut self, frame: &FrameContext<'_>, scene: &mut SceneGraph) {
        // Model not loaded yet
        let Some(node) = scene.find_mut(&self.node) else {
            return;
        };
        if let Some(rotation) = self.orientation(&node.position, &frame.camera.position) {
            node.rotation = rotation;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::{CameraRig, Viewport};
    use crate::scene::SceneNode;
    use approx::assert_relative_eq;

    fn camera_at(elapsed: f32) -> CameraTransform {
        CameraRig::new(&Viewport::new(2560, 1440, 1.0).unwrap()).update_camera(elapsed)
    }

    #[test]
    fn test_missing_node_is_noop() {
        let camera = camera_at(0.0);
        let frame = FrameContext {
            elapsed: 0.0,
            delta: 0.0,
            camera: &camera,
        };
        let mut scene = SceneGraph::new();
        scene.insert(SceneNode::new("shed", Vec3::zeros()));

        FaceCamera::title().animate(&frame, &mut scene);

        assert_eq!(scene.find("shed").unwrap().rotation, UnitQuaternion::identity());
    }

    #[test]
    fn test_node_faces_camera_without_offset() {
        let camera = camera_at(1.0);
        let frame = FrameContext {
            elapsed: 1.0,
            delta: 1.0 / 60.0,
            camera: &camera,
        };
        let origin = Vec3::new(0.0, 4.0, 0.0);
        let mut scene = SceneGraph::new();
        scene.insert(SceneNode::new("title", origin));

        FaceCamera::new("title", 0.0).animate(&frame, &mut scene);

        let forward = scene.find("title").unwrap().rotation * Vec3::z();
        let expected = (camera.position - origin).normalize();
        assert_relative_eq!(forward, expected, epsilon = 1e-5);
    }

    #[test]
    fn test_title_offset_turns_away() {
        let camera = camera_at(0.0);
        let frame = FrameContext {
            elapsed: 0.0,
            delta: 0.0,
            camera: &camera,
        };
        let mut scene = SceneGraph::new();
        scene.insert(SceneNode::new("title", Vec3::new(0.0, 6.0, 0.0)));

        FaceCamera::title().animate(&frame, &mut scene);

        // Camera and node share a height, so the offset is a pure yaw
        let forward = scene.find("title").unwrap().rotation * Vec3::z();
        let to_camera = (camera.position - Vec3::new(0.0, 6.0, 0.0)).normalize();
        assert_relative_eq!(forward.dot(&to_camera), 0.5, epsilon = 1e-5);
        assert_relative_eq!(forward.y, 0.0, epsilon = 1e-5);
    }

    #[test]
    fn test_offset_shifts_only_middle_euler_angle() {
        // Camera above and to the side, so the facing rotation has pitch and roll
        let node = Vec3::new(0.0, 0.0, 0.0);
        let camera = Vec3::new(3.0, 6.0, 4.0);
        let facing = UnitQuaternion::face_towards(&(camera - node), &Vector3::y());
        let (fx, fy, fz) = euler_xyz(&facing);
        assert!(fx.abs() > 0.1, "expected a tilted facing, got x = {fx}");

        let rotation = FaceCamera::title().orientation(&node, &camera).unwrap();
        let (x, y, z) = euler_xyz(&rotation);

        assert_relative_eq!(x, fx, epsilon = 1e-4);
        assert_relative_eq!(y, fy - FRAC_PI_3, epsilon = 1e-4);
        assert_relative_eq!(z, fz, epsilon = 1e-4);
    }

    #[test]
    fn test_euler_xyz_round_trip() {
        let rotation = from_euler_xyz(0.3, -0.7, 1.1);
        let (x, y, z) = euler_xyz(&rotation);
        assert_relative_eq!(x, 0.3, epsilon = 1e-5);
        assert_relative_eq!(y, -0.7, epsilon = 1e-5);
        assert_relative_eq!(z, 1.1, epsilon = 1e-5);
    }

    #[test]
    fn test_coincident_points_have_no_orientation() {
        let p = Vec3::new(1.0, 2.0, 3.0);
        assert!(FaceCamera::title().orientation(&p, &p).is_none());
    }
}
