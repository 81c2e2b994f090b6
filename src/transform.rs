//! Fixed camera tilt and weak-perspective projection.

use crate::model::{Point2D, Point3D};

/// Applies the fixed two-angle camera tilt (degrees).
///
/// `beta` mixes x with z first, then `alpha` mixes y with the resulting z.
/// The wheel's own spin is not handled here; it is baked into the arc angles.
pub fn rotate_3d(point: Point3D, alpha: f64, beta: f64) -> Point3D {
    let (sin_a, cos_a) = alpha.to_radians().sin_cos();
    let (sin_b, cos_b) = beta.to_radians().sin_cos();

    let x1 = point.x * cos_b + point.z * sin_b;
    let z1 = -point.x * sin_b + point.z * cos_b;

    let y2 = point.y * cos_a - z1 * sin_a;
    let z2 = point.y * sin_a + z1 * cos_a;

    Point3D::new(x1, y2, z2)
}

/// Weak perspective: one scale factor from depth, applied to x and y.
pub fn project_3d(point: Point3D, perspective_distance: f64) -> Point2D {
    let scale = perspective_distance / (perspective_distance + point.z);
    Point2D::new(point.x * scale, point.y * scale)
}
