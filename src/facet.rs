//! Subdivides a segment's side walls into depth-banded facets.

use crate::config::WheelConfig;
use crate::model::{Face, FaceKind, Point3D, Segment3D};
use crate::transform::rotate_3d;

const OUTER_BASE_OPACITY: f64 = 0.8;
const OUTER_OPACITY_STEP: f64 = 0.05;
const INNER_BASE_OPACITY: f64 = 0.7;
const INNER_OPACITY_STEP: f64 = 0.04;

/// Outer and inner wall quads for one segment, already in rotated space.
///
/// A segment with `N` arc points yields `(N - 1) * facet_count * 2` faces.
pub fn generate_facets(segment: &Segment3D, config: &WheelConfig) -> Vec<Face> {
    let facet_count = config.facet_count;
    let band = config.depth / facet_count.max(1) as f64;
    let rotate = |p: Point3D| rotate_3d(p, config.alpha, config.beta);

    let mut faces =
        Vec::with_capacity(segment.points.len().saturating_sub(1) * facet_count * 2);

    for pair in segment.points.windows(2) {
        let (p1, p2) = (&pair[0], &pair[1]);
        for f in 0..facet_count {
            let z1 = -band * f as f64;
            let z2 = -band * (f + 1) as f64;

            faces.push(Face {
                kind: FaceKind::OuterSide,
                points: [
                    rotate(p1.outer.with_z(z1)),
                    rotate(p2.outer.with_z(z1)),
                    rotate(p2.outer.with_z(z2)),
                    rotate(p1.outer.with_z(z2)),
                ],
                color: segment.color,
                opacity: (OUTER_BASE_OPACITY - f as f64 * OUTER_OPACITY_STEP).max(0.0),
                depth_hint: f,
                segment: segment.index,
            });

            faces.push(Face {
                kind: FaceKind::InnerSide,
                points: [
                    rotate(p1.inner.with_z(z1)),
                    rotate(p2.inner.with_z(z1)),
                    rotate(p2.inner.with_z(z2)),
                    rotate(p1.inner.with_z(z2)),
                ],
                color: segment.color,
                opacity: (INNER_BASE_OPACITY - f as f64 * INNER_OPACITY_STEP).max(0.0),
                depth_hint: f,
                segment: segment.index,
            });
        }
    }

    faces
}
