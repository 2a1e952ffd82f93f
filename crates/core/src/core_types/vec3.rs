//! Vector type alias for 3D positions and directions.

use nalgebra::{Point3, Vector3};

/// 3D vector type for positions, velocities, and directions.
///
/// This is a simple alias for `nalgebra::Vector3<f32>`, used throughout
/// the simulation for particle positions, per-frame displacements and the
/// camera path.
pub type Vec3 = Vector3<f32>;

/// Converts a world-space vector into a point for look-at style matrix builders.
#[inline]
pub fn to_point(v: &Vec3) -> Point3<f32> {
    Point3::from(*v)
}
