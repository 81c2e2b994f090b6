use std::ops::{Add, Mul, Neg, Sub};

use crate::config::Color;

// ============================================================================
// INPUT DATA
// ============================================================================

/// One category of the breakdown, as supplied by the data source.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub name: String,
    pub value: f64,
    pub color: Color,
    pub percentage: f64,
}

impl Segment {
    pub fn new(name: impl Into<String>, value: f64, color: Color, percentage: f64) -> Self {
        Self {
            name: name.into(),
            value,
            color,
            percentage,
        }
    }

    /// Arc length of this segment on a full circle, in degrees.
    pub fn sweep_degrees(&self) -> f64 {
        self.percentage / 100.0 * 360.0
    }
}

// ============================================================================
// 3D POINTS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point3D {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3D {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn dot(self, other: Self) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn length(self) -> f64 {
        self.dot(self).sqrt()
    }

    /// Unit vector in the same direction; the zero vector stays zero.
    pub fn normalize(self) -> Self {
        let len = self.length();
        if len > f64::EPSILON {
            self * (1.0 / len)
        } else {
            Self::default()
        }
    }

    pub fn with_z(self, z: f64) -> Self {
        Self { z, ..self }
    }
}

impl Add for Point3D {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Point3D {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f64> for Point3D {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Neg for Point3D {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}

/// A projected point in screen space, relative to the wheel center.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

// ============================================================================
// WHEEL GEOMETRY
// ============================================================================

/// Four corners sampled at one angular step of a segment's arc.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcPoint {
    pub outer: Point3D,
    pub inner: Point3D,
    pub outer_bottom: Point3D,
    pub inner_bottom: Point3D,
}

/// A segment of the ring in model space (unrotated).
#[derive(Debug, Clone, PartialEq)]
pub struct Segment3D {
    /// Position of the source segment in the input list.
    pub index: usize,
    pub points: Vec<ArcPoint>,
    pub color: Color,
    pub source: Segment,
    /// Degrees, including the caller's rotation angle.
    pub start_angle: f64,
    pub end_angle: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaceKind {
    Top,
    Bottom,
    OuterSide,
    InnerSide,
}

/// A planar quad in rotated space; the unit that gets sorted and drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct Face {
    pub kind: FaceKind,
    pub points: [Point3D; 4],
    pub color: Color,
    pub opacity: f64,
    /// Facet index along the depth axis. Informational only.
    pub depth_hint: usize,
    /// Index of the segment this face belongs to.
    pub segment: usize,
}

impl Face {
    pub fn centroid(&self) -> Point3D {
        let sum = self
            .points
            .iter()
            .fold(Point3D::default(), |acc, &p| acc + p);
        sum * 0.25
    }

    /// Painter's sort key.
    pub fn mean_z(&self) -> f64 {
        self.centroid().z
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn normalize_yields_unit_length() {
        let v = Point3D::new(3.0, -4.0, 12.0).normalize();
        assert_relative_eq!(v.length(), 1.0, epsilon = 1e-12);
        assert_eq!(Point3D::default().normalize(), Point3D::default());
    }

    #[test]
    fn face_centroid_averages_corners() {
        let face = Face {
            kind: FaceKind::Top,
            points: [
                Point3D::new(0.0, 0.0, 0.0),
                Point3D::new(2.0, 0.0, 1.0),
                Point3D::new(2.0, 2.0, 2.0),
                Point3D::new(0.0, 2.0, 5.0),
            ],
            color: Color::new(0, 0, 0),
            opacity: 1.0,
            depth_hint: 0,
            segment: 0,
        };
        assert_eq!(face.centroid(), Point3D::new(1.0, 1.0, 2.0));
        assert_relative_eq!(face.mean_z(), 2.0);
    }

    #[test]
    fn sweep_is_proportional() {
        let s = Segment::new("Food", 40.0, Color::new(1, 2, 3), 25.0);
        assert_relative_eq!(s.sweep_degrees(), 90.0);
    }
}
