//! Single-light Lambertian shading per face.

use crate::config::WheelConfig;
use crate::model::{Face, FaceKind, Point3D};

/// Normal by face kind. Side walls point radially through the centroid.
pub fn face_normal(kind: FaceKind, centroid: Point3D) -> Point3D {
    match kind {
        FaceKind::Top => Point3D::new(0.0, 0.0, 1.0),
        FaceKind::Bottom => Point3D::new(0.0, 0.0, -1.0),
        FaceKind::OuterSide | FaceKind::InnerSide => {
            let (sin, cos) = centroid.y.atan2(centroid.x).sin_cos();
            let radial = Point3D::new(cos, sin, 0.0);
            if kind == FaceKind::OuterSide {
                radial
            } else {
                -radial
            }
        }
    }
}

/// Luminance in `[ambient, ambient + diffuse]`.
pub fn face_lighting(face: &Face, config: &WheelConfig) -> f64 {
    let centroid = face.centroid();
    let light_dir = (config.light_source - centroid).normalize();
    let normal = face_normal(face.kind, centroid);
    let lambert = light_dir.dot(normal).clamp(0.0, 1.0);
    config.ambient + config.diffuse * lambert
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Color;
    use approx::assert_relative_eq;

    fn face(kind: FaceKind, center: Point3D) -> Face {
        let d = Point3D::new(1.0, 1.0, 0.0);
        let e = Point3D::new(1.0, -1.0, 0.0);
        Face {
            kind,
            points: [center - d, center + e, center + d, center - e],
            color: Color::new(0x80, 0x80, 0x80),
            opacity: 1.0,
            depth_hint: 0,
            segment: 0,
        }
    }

    #[test]
    fn lighting_stays_within_bounds_for_every_kind() {
        let config = WheelConfig::default();
        let kinds = [
            FaceKind::Top,
            FaceKind::Bottom,
            FaceKind::OuterSide,
            FaceKind::InnerSide,
        ];
        for kind in kinds {
            for step in 0..36 {
                let a = (step as f64 * 10.0).to_radians();
                for z in [-60.0, -20.0, 0.0, 30.0] {
                    let center = Point3D::new(a.cos() * 90.0, a.sin() * 90.0, z);
                    let l = face_lighting(&face(kind, center), &config);
                    assert!(l >= config.ambient - 1e-12, "{kind:?} below ambient: {l}");
                    assert!(
                        l <= config.ambient + config.diffuse + 1e-12,
                        "{kind:?} too bright: {l}"
                    );
                }
            }
        }
    }

    #[test]
    fn top_face_under_light_gets_full_diffuse() {
        let config = WheelConfig::builder()
            .light_source(Point3D::new(0.0, 0.0, 500.0))
            .build();
        let l = face_lighting(&face(FaceKind::Top, Point3D::default()), &config);
        assert_relative_eq!(l, config.ambient + config.diffuse, epsilon = 1e-12);

        let l = face_lighting(&face(FaceKind::Bottom, Point3D::default()), &config);
        assert_relative_eq!(l, config.ambient, epsilon = 1e-12);
    }

    #[test]
    fn inner_normal_opposes_outer_normal() {
        let c = Point3D::new(0.0, 50.0, -10.0);
        let outer = face_normal(FaceKind::OuterSide, c);
        let inner = face_normal(FaceKind::InnerSide, c);
        assert_relative_eq!(outer.y, 1.0, epsilon = 1e-12);
        assert_relative_eq!(outer.dot(inner), -1.0, epsilon = 1e-12);
    }
}
