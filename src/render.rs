// ============================================================================
// PAINTER'S ALGORITHM RENDERER
// ============================================================================

use tracing::debug;

use crate::config::{Color, WheelConfig};
use crate::error::WheelError;
use crate::facet::generate_facets;
use crate::geometry::{generate_3d_segments, prepare_segments};
use crate::lighting::face_lighting;
use crate::model::{Face, FaceKind, Point2D, Point3D, Segment, Segment3D};
use crate::surface::Surface;
use crate::transform::{project_3d, rotate_3d};

#[derive(Clone, Debug)]
enum DrawCommand {
    Polygon {
        points: [Point2D; 4],
        fill: Color,
        opacity: f64,
        stroke: Color,
        stroke_width: f32,
    },
}

/// Retained list of draw calls for one frame, replayed onto a surface.
struct Scene {
    commands: Vec<DrawCommand>,
}

impl Scene {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            commands: Vec::with_capacity(capacity),
        }
    }

    fn add_command(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    fn render(&self, surface: &mut dyn Surface) {
        for command in &self.commands {
            match command {
                DrawCommand::Polygon {
                    points,
                    fill,
                    opacity,
                    stroke,
                    stroke_width,
                } => {
                    surface.fill_polygon(points, *fill, *opacity);
                    surface.stroke_polygon(points, *stroke, *opacity, *stroke_width);
                }
            }
        }
    }
}

/// Top and bottom disc quads for every adjacent arc-point pair, rotated.
pub fn build_disc_faces(segments: &[Segment3D], config: &WheelConfig) -> Vec<Face> {
    let rotate = |p: Point3D| rotate_3d(p, config.alpha, config.beta);
    let mut faces = Vec::new();

    for segment in segments {
        for pair in segment.points.windows(2) {
            let (p1, p2) = (&pair[0], &pair[1]);
            faces.push(Face {
                kind: FaceKind::Bottom,
                points: [
                    rotate(p1.outer_bottom),
                    rotate(p2.outer_bottom),
                    rotate(p2.inner_bottom),
                    rotate(p1.inner_bottom),
                ],
                color: segment.color,
                opacity: config.bottom_opacity,
                depth_hint: config.facet_count,
                segment: segment.index,
            });
            faces.push(Face {
                kind: FaceKind::Top,
                points: [
                    rotate(p1.outer),
                    rotate(p2.outer),
                    rotate(p2.inner),
                    rotate(p1.inner),
                ],
                color: segment.color,
                opacity: config.top_opacity,
                depth_hint: 0,
                segment: segment.index,
            });
        }
    }

    faces
}

/// Disc faces and side facets for every segment, in no particular order.
pub fn collect_faces(segments: &[Segment3D], config: &WheelConfig) -> Vec<Face> {
    let mut faces = build_disc_faces(segments, config);
    for segment in segments {
        faces.extend(generate_facets(segment, config));
    }
    faces
}

/// Orders faces back to front: ascending mean z. Ties keep their order.
pub fn sort_faces(faces: &mut [Face]) {
    faces.sort_by(|a, b| a.mean_z().total_cmp(&b.mean_z()));
}

/// Runs the pure part of the pipeline: validation, geometry, facets, sort.
///
/// Needs no surface, so independent wheels can build their frames on
/// separate threads.
pub fn build_frame(
    segments: &[Segment],
    rotation_angle: f64,
    config: &WheelConfig,
) -> Result<Vec<Face>, WheelError> {
    config.validate()?;
    let prepared = prepare_segments(segments, config)?;
    let built = generate_3d_segments(&prepared, rotation_angle, config);
    let mut faces = collect_faces(&built, config);
    sort_faces(&mut faces);
    Ok(faces)
}

/// Screen-space corners of `face` for a wheel centered on `center`.
pub fn project_face(face: &Face, center: Point2D, config: &WheelConfig) -> [Point2D; 4] {
    face.points.map(|p| {
        let projected = project_3d(p, config.perspective_distance);
        Point2D::new(center.x + projected.x, center.y + projected.y)
    })
}

/// Topmost face covering `point`, given faces in draw order.
pub fn face_at<'a>(
    faces: &'a [Face],
    point: Point2D,
    center: Point2D,
    config: &WheelConfig,
) -> Option<&'a Face> {
    faces
        .iter()
        .rev()
        .find(|face| contains(&project_face(face, center, config), point))
}

/// Even-odd containment test.
fn contains(polygon: &[Point2D], point: Point2D) -> bool {
    if polygon.len() < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = polygon.len() - 1;
    for i in 0..polygon.len() {
        let (a, b) = (polygon[i], polygon[j]);
        if (a.y > point.y) != (b.y > point.y) {
            let x = a.x + (point.y - a.y) / (b.y - a.y) * (b.x - a.x);
            if point.x < x {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Draws the wheel centered on the surface and returns the faces in the order
/// they were painted. Empty data draws nothing.
pub fn render_wheel(
    surface: &mut dyn Surface,
    segments: &[Segment],
    rotation_angle: f64,
    config: &WheelConfig,
) -> Result<Vec<Face>, WheelError> {
    let faces = build_frame(segments, rotation_angle, config)?;
    if faces.is_empty() {
        return Ok(faces);
    }

    let (width, height) = surface.size();
    let center = Point2D::new(width as f64 / 2.0, height as f64 / 2.0);

    let mut scene = Scene::with_capacity(faces.len());
    for face in &faces {
        let points = project_face(face, center, config);
        let opacity = (face.opacity * face_lighting(face, config)).clamp(0.0, 1.0);
        let (stroke, stroke_width) = match face.kind {
            FaceKind::Top => (
                face.color.darken(config.top_stroke_darken),
                config.top_stroke_width,
            ),
            _ => (
                face.color.darken(config.side_stroke_darken),
                config.side_stroke_width,
            ),
        };
        scene.add_command(DrawCommand::Polygon {
            points,
            fill: face.color,
            opacity,
            stroke,
            stroke_width,
        });
    }
    scene.render(surface);

    debug!(faces = faces.len(), "rendered wheel");
    Ok(faces)
}
