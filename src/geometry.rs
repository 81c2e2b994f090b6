//! Ring geometry from proportional data, plus angle-based segment lookup.

use tracing::{debug, instrument};

use crate::config::{PercentagePolicy, WheelConfig};
use crate::error::WheelError;
use crate::model::{ArcPoint, Point3D, Segment, Segment3D};

/// Builds the top and bottom disc samples for every segment.
///
/// Angles start at `rotation_angle` (degrees) and run through the segments in
/// order. Each segment gets `max(min_steps, floor(sweep / degrees_per_step)) + 1`
/// arc points, so even a sliver is sampled densely. Sampling never exceeds one
/// full turn's worth of steps, whatever the percentage.
#[instrument(level = "debug", skip(segments, config), fields(count = segments.len()))]
pub fn generate_3d_segments(
    segments: &[Segment],
    rotation_angle: f64,
    config: &WheelConfig,
) -> Vec<Segment3D> {
    let mut current_angle = rotation_angle;
    let mut result = Vec::with_capacity(segments.len());

    for (index, segment) in segments.iter().enumerate() {
        let segment_angle = segment.sweep_degrees();
        let steps = step_count(segment_angle, config);

        let points = (0..=steps)
            .map(|i| {
                let angle = current_angle + segment_angle * i as f64 / steps as f64;
                arc_point(angle.to_radians(), config)
            })
            .collect();

        result.push(Segment3D {
            index,
            points,
            color: segment.color,
            source: segment.clone(),
            start_angle: current_angle,
            end_angle: current_angle + segment_angle,
        });

        current_angle += segment_angle;
    }

    debug!(segments = result.len(), "generated ring geometry");
    result
}

fn step_count(segment_angle: f64, config: &WheelConfig) -> usize {
    if config.degrees_per_step <= 0.0 {
        return config.min_steps.max(1);
    }
    let full_turn = (360.0 / config.degrees_per_step).ceil();
    let adaptive = (segment_angle / config.degrees_per_step)
        .floor()
        .clamp(0.0, full_turn) as usize;
    adaptive.max(config.min_steps).max(1)
}

fn arc_point(radians: f64, config: &WheelConfig) -> ArcPoint {
    let (sin, cos) = radians.sin_cos();
    let outer = Point3D::new(cos * config.radius, sin * config.radius, 0.0);
    let inner = Point3D::new(cos * config.inner_radius, sin * config.inner_radius, 0.0);
    ArcPoint {
        outer,
        inner,
        outer_bottom: outer.with_z(-config.depth),
        inner_bottom: inner.with_z(-config.depth),
    }
}

/// The segment drawn at the bottom of the screen (90° in screen space).
pub fn bottom_segment(segments: &[Segment], rotation_angle: f64) -> Option<&Segment> {
    segment_at_screen_angle(segments, rotation_angle, 90.0)
}

/// Finds the segment whose arc covers `screen_angle` (degrees) once the wheel
/// is spun by `rotation_angle`. Returns `None` for empty data or when the angle
/// lands in the gap of a ring whose percentages sum below 100.
pub fn segment_at_screen_angle(
    segments: &[Segment],
    rotation_angle: f64,
    screen_angle: f64,
) -> Option<&Segment> {
    let target = (screen_angle - rotation_angle).rem_euclid(360.0);
    let mut start = 0.0;
    for segment in segments {
        let end = start + segment.sweep_degrees();
        if target >= start && target < end {
            return Some(segment);
        }
        start = end;
    }
    None
}

/// Validates raw data and applies the configured percentage policy.
///
/// Negative, non-finite or (after the policy is applied) above-100 percentages
/// are rejected. Zero-percentage segments are dropped when `skip_degenerate`
/// is set, otherwise rejected.
pub fn prepare_segments(
    segments: &[Segment],
    config: &WheelConfig,
) -> Result<Vec<Segment>, WheelError> {
    let mut prepared = Vec::with_capacity(segments.len());
    for segment in segments {
        if !segment.percentage.is_finite() || segment.percentage < 0.0 {
            return Err(WheelError::InvalidSegmentData {
                name: segment.name.clone(),
                percentage: segment.percentage,
            });
        }
        if segment.percentage == 0.0 {
            if config.skip_degenerate {
                debug!(name = %segment.name, "skipping zero-width segment");
                continue;
            }
            return Err(WheelError::DegenerateSegment {
                name: segment.name.clone(),
            });
        }
        prepared.push(segment.clone());
    }

    if config.percentage_policy == PercentagePolicy::Normalize {
        let total: f64 = prepared.iter().map(|s| s.percentage).sum();
        if total > 0.0 {
            for segment in &mut prepared {
                segment.percentage = segment.percentage / total * 100.0;
            }
        }
    }

    if let Some(segment) = prepared.iter().find(|s| s.percentage > 100.0) {
        return Err(WheelError::InvalidSegmentData {
            name: segment.name.clone(),
            percentage: segment.percentage,
        });
    }

    Ok(prepared)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Color;
    use approx::assert_relative_eq;

    fn spending() -> Vec<Segment> {
        vec![
            Segment::new("Food", 400.0, Color::new(0xf4, 0x43, 0x36), 40.0),
            Segment::new("Transport", 350.0, Color::new(0x21, 0x96, 0xf3), 35.0),
            Segment::new("Entertainment", 250.0, Color::new(0x4c, 0xaf, 0x50), 25.0),
        ]
    }

    #[test]
    fn empty_input_yields_no_geometry() {
        assert!(generate_3d_segments(&[], 123.0, &WheelConfig::default()).is_empty());
    }

    #[test]
    fn arcs_tile_full_circle_from_rotation() {
        let config = WheelConfig::default();
        let rotation = -37.5;
        let built = generate_3d_segments(&spending(), rotation, &config);

        assert_relative_eq!(built[0].start_angle, rotation);
        for pair in built.windows(2) {
            assert_relative_eq!(pair[0].end_angle, pair[1].start_angle);
        }
        assert_relative_eq!(built[2].end_angle, rotation + 360.0, epsilon = 1e-9);
    }

    #[test]
    fn point_count_is_adaptive_with_minimum() {
        let config = WheelConfig::default();
        let data = vec![
            Segment::new("big", 1.0, Color::new(0, 0, 0), 50.0),
            Segment::new("tiny", 1.0, Color::new(0, 0, 0), 1.0),
        ];
        let built = generate_3d_segments(&data, 0.0, &config);
        // 180 degrees / 3 = 60 steps
        assert_eq!(built[0].points.len(), 61);
        assert_eq!(built[1].points.len(), 21);
    }

    #[test]
    fn oversized_sweep_is_sampled_as_one_turn() {
        let config = WheelConfig::default();
        let data = vec![
            Segment::new("huge", 1.0, Color::new(0, 0, 0), 1.0e7),
            Segment::new("whole", 1.0, Color::new(0, 0, 0), 100.0),
        ];
        let built = generate_3d_segments(&data, 0.0, &config);
        assert_eq!(built[0].points.len(), 121);
        assert_eq!(built[1].points.len(), 121);
        assert_eq!(built[1].index, 1);
    }

    #[test]
    fn prepare_rejects_segment_above_hundred_percent() {
        let data = vec![Segment::new("Food", 1.0, Color::new(0, 0, 0), 100_000.0)];
        assert!(matches!(
            prepare_segments(&data, &WheelConfig::default()),
            Err(WheelError::InvalidSegmentData { name, .. }) if name == "Food"
        ));

        // normalizing first brings it back into range
        let config = WheelConfig::builder()
            .percentage_policy(PercentagePolicy::Normalize)
            .build();
        let prepared = prepare_segments(&data, &config).unwrap();
        assert_relative_eq!(prepared[0].percentage, 100.0);
    }

    #[test]
    fn zero_percentage_is_degenerate_not_skipped() {
        let data = vec![Segment::new("none", 0.0, Color::new(0, 0, 0), 0.0)];
        let built = generate_3d_segments(&data, 10.0, &WheelConfig::default());
        assert_eq!(built.len(), 1);
        assert_eq!(built[0].points.len(), 21);
        assert_relative_eq!(built[0].start_angle, built[0].end_angle);
    }

    #[test]
    fn arc_points_sit_on_radii_and_depth() {
        let config = WheelConfig::default();
        let built = generate_3d_segments(&spending(), 15.0, &config);
        for p in &built[1].points {
            assert_relative_eq!(p.outer.length(), config.radius, epsilon = 1e-9);
            assert_relative_eq!(p.inner.length(), config.inner_radius, epsilon = 1e-9);
            assert_relative_eq!(p.outer.z, 0.0);
            assert_relative_eq!(p.outer_bottom.z, -config.depth);
            assert_relative_eq!(p.inner_bottom.x, p.inner.x);
        }
    }

    #[test]
    fn bottom_segment_at_zero_rotation_is_food() {
        let data = spending();
        assert_eq!(bottom_segment(&data, 0.0).map(|s| s.name.as_str()), Some("Food"));
    }

    #[test]
    fn bottom_segment_follows_rotation() {
        let data = spending();
        // (90 - -100) = 190 -> Transport [144, 270)
        assert_eq!(
            bottom_segment(&data, -100.0).map(|s| s.name.as_str()),
            Some("Transport")
        );
        // (90 - 100) = -10 -> 350 -> Entertainment [270, 360)
        assert_eq!(
            bottom_segment(&data, 100.0).map(|s| s.name.as_str()),
            Some("Entertainment")
        );
        // unbounded angles reduce the same way
        assert_eq!(
            bottom_segment(&data, 100.0 + 720.0).map(|s| s.name.as_str()),
            Some("Entertainment")
        );
    }

    #[test]
    fn bottom_segment_in_gap_or_empty_is_none() {
        let data = vec![Segment::new("half", 1.0, Color::new(0, 0, 0), 20.0)];
        assert!(bottom_segment(&data, 0.0).is_none());
        assert!(bottom_segment(&[], 0.0).is_none());
    }

    #[test]
    fn prepare_rejects_invalid_percentages() {
        let config = WheelConfig::default();
        for bad in [-1.0, f64::NAN, f64::INFINITY] {
            let data = vec![Segment::new("bad", 1.0, Color::new(0, 0, 0), bad)];
            assert!(matches!(
                prepare_segments(&data, &config),
                Err(WheelError::InvalidSegmentData { .. })
            ));
        }
    }

    #[test]
    fn prepare_skips_or_rejects_zero_width() {
        let mut data = spending();
        data.push(Segment::new("Savings", 0.0, Color::new(0, 0, 0), 0.0));

        let skipped = prepare_segments(&data, &WheelConfig::default()).unwrap();
        assert_eq!(skipped.len(), 3);

        let strict = WheelConfig::builder().skip_degenerate(false).build();
        assert!(matches!(
            prepare_segments(&data, &strict),
            Err(WheelError::DegenerateSegment { name }) if name == "Savings"
        ));
    }

    #[test]
    fn prepare_normalizes_when_asked() {
        let data = vec![
            Segment::new("a", 1.0, Color::new(0, 0, 0), 30.0),
            Segment::new("b", 1.0, Color::new(0, 0, 0), 10.0),
        ];
        let as_is = prepare_segments(&data, &WheelConfig::default()).unwrap();
        assert_relative_eq!(as_is[0].percentage, 30.0);

        let config = WheelConfig::builder()
            .percentage_policy(PercentagePolicy::Normalize)
            .build();
        let normalized = prepare_segments(&data, &config).unwrap();
        assert_relative_eq!(normalized[0].percentage, 75.0);
        assert_relative_eq!(normalized[1].percentage, 25.0);
    }
}
