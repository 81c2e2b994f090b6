// ============================================================================
// CRATE CONFIGURATION & IMPORTS
// ============================================================================

pub mod config;
pub mod error;
pub mod facet;
pub mod geometry;
pub mod interaction;
pub mod lighting;
pub mod model;
pub mod render;
pub mod surface;
pub mod transform;

// External crate imports
use pixels::{Pixels, SurfaceTexture};
use rusttype::Font;
use tracing::{debug, info, warn};

// Standard library imports
use std::sync::mpsc::Receiver;
use std::time::Instant;

// Window management imports
use winit::dpi::{LogicalSize, PhysicalPosition};
use winit::event::{ElementState, Event, MouseButton, Touch, TouchPhase, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::WindowBuilder;

pub use config::{Color, PercentagePolicy, WheelConfig};
pub use error::WheelError;
pub use facet::generate_facets;
pub use geometry::{
    bottom_segment, generate_3d_segments, prepare_segments, segment_at_screen_angle,
};
pub use interaction::{DragState, Interaction, InteractionController};
pub use lighting::face_lighting;
pub use model::{ArcPoint, Face, FaceKind, Point2D, Point3D, Segment, Segment3D};
pub use render::{build_frame, face_at, project_face, render_wheel};
pub use surface::{Canvas, RecordingSurface, Surface};
pub use transform::{project_3d, rotate_3d};

// ============================================================================
// PUBLIC API - MAIN INTERFACE
// ============================================================================

/// Command enum for driving a live wheel from another thread
#[derive(Debug, Clone)]
pub enum WheelCommand {
    SetSegments(Vec<Segment>),
    SetRotation(f64),
    RotateBy(f64),
}

/// Main wheel struct - the primary public interface
#[derive(Debug, Clone)]
pub struct Wheel {
    config: WheelConfig,
    segments: Vec<Segment>,
    controller: InteractionController,
    selected: Option<String>,
}

impl Wheel {
    pub fn new(config: WheelConfig) -> Self {
        let controller = InteractionController::new(0.0, config.click_suppress_window);
        Self {
            config,
            segments: Vec::new(),
            controller,
            selected: None,
        }
    }

    pub fn config(&self) -> &WheelConfig {
        &self.config
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn set_segments(&mut self, segments: Vec<Segment>) {
        self.segments = segments;
        self.selected = None;
    }

    pub fn rotation_angle(&self) -> f64 {
        self.controller.rotation_angle()
    }

    pub fn set_rotation(&mut self, rotation_angle: f64) {
        self.controller.set_rotation(rotation_angle);
    }

    pub fn controller_mut(&mut self) -> &mut InteractionController {
        &mut self.controller
    }

    /// Name of the last segment picked by an unsuppressed click.
    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// The segment currently facing the viewer, after validation and policy.
    pub fn bottom_segment(&self) -> Option<Segment> {
        let layout = self.layout();
        bottom_segment(&layout, self.rotation_angle()).cloned()
    }

    /// Selects the segment whose projected face lies under `pointer`, for a
    /// wheel drawn around `center`. Clicks in the hole or off the wheel clear
    /// the selection.
    pub fn select_at(&mut self, pointer: Point2D, center: Point2D) -> Option<&str> {
        let layout = self.layout();
        self.selected = match build_frame(&layout, self.rotation_angle(), &self.config) {
            Ok(faces) => face_at(&faces, pointer, center, &self.config)
                .and_then(|face| layout.get(face.segment))
                .map(|s| s.name.clone()),
            Err(e) => {
                debug!(error = %e, "no frame to select from");
                None
            }
        };
        if let Some(name) = &self.selected {
            info!(segment = %name, "segment selected");
        }
        self.selected.as_deref()
    }

    /// Draws one frame: background, wheel and, with a font, the bottom label.
    pub fn render_to(
        &self,
        surface: &mut dyn Surface,
        font: Option<&Font<'_>>,
    ) -> Result<Vec<Face>, WheelError> {
        surface.clear(self.config.background_color);
        let faces = render_wheel(surface, &self.segments, self.rotation_angle(), &self.config)?;

        if let (Some(font), Some(segment)) = (font, self.bottom_segment()) {
            let (width, height) = surface.size();
            let text = format!("{} {:.0}%", segment.name, segment.percentage);
            surface.draw_text(
                width as i32 / 2,
                height as i32 - self.config.label_margin,
                &text,
                font,
                self.config.label_font_size,
                self.config.label_color,
            );
        }

        Ok(faces)
    }

    pub fn show(&mut self) -> Result<(), WheelError> {
        self.run_window(None)
    }

    pub fn show_with_commands(
        &mut self,
        receiver: Receiver<WheelCommand>,
    ) -> Result<(), WheelError> {
        self.run_window(Some(receiver))
    }

    pub fn apply_command(&mut self, command: WheelCommand) {
        match command {
            WheelCommand::SetSegments(segments) => self.set_segments(segments),
            WheelCommand::SetRotation(angle) => self.set_rotation(angle),
            WheelCommand::RotateBy(delta) => self.controller.rotate_by(delta),
        }
    }

    fn layout(&self) -> Vec<Segment> {
        prepare_segments(&self.segments, &self.config).unwrap_or_else(|e| {
            debug!(error = %e, "segments rejected, treating wheel as empty");
            Vec::new()
        })
    }

    fn run_window(&mut self, receiver: Option<Receiver<WheelCommand>>) -> Result<(), WheelError> {
        let window_error = |e: &dyn std::fmt::Display| WheelError::Window(e.to_string());

        let event_loop = EventLoop::new().map_err(|e| window_error(&e))?;
        let window = WindowBuilder::new()
            .with_title(&self.config.title)
            .with_inner_size(LogicalSize::new(
                self.config.window_width as f64,
                self.config.window_height as f64,
            ))
            .build(&event_loop)
            .map_err(|e| window_error(&e))?;

        let window = std::sync::Arc::new(window);
        let window_clone = window.clone();

        let font = match self.config.font_data.clone() {
            Some(data) => {
                let font = Font::try_from_vec(data);
                if font.is_none() {
                    warn!("font data could not be parsed, labels disabled");
                }
                font
            }
            None => None,
        };

        let size = window.inner_size();
        let mut fb_width = size.width as usize;
        let mut fb_height = size.height as usize;
        let surface_texture = SurfaceTexture::new(size.width, size.height, &window);
        let mut pixels =
            Pixels::new(size.width, size.height, surface_texture).map_err(|e| window_error(&e))?;

        let frame_duration = std::time::Duration::from_secs_f64(1.0 / self.config.max_framerate);
        let mut last_frame = Instant::now();
        let mut cursor = Point2D::default();
        let mut needs_redraw = true;

        info!(
            width = fb_width,
            height = fb_height,
            segments = self.segments.len(),
            "opening wheel window"
        );

        event_loop
            .run(move |event, window_target| {
                window_target.set_control_flow(ControlFlow::Poll);
                let center = Point2D::new(fb_width as f64 / 2.0, fb_height as f64 / 2.0);
                match event {
                    Event::WindowEvent { event, .. } => match event {
                        WindowEvent::CloseRequested => {
                            window_target.exit();
                        }
                        WindowEvent::Resized(new_size) => {
                            fb_width = new_size.width as usize;
                            fb_height = new_size.height as usize;
                            let _ = pixels.resize_buffer(new_size.width, new_size.height);
                            let _ = pixels.resize_surface(new_size.width, new_size.height);
                            needs_redraw = true;
                        }
                        WindowEvent::CursorMoved { position, .. } => {
                            cursor = to_point(position);
                            needs_redraw |= self.controller.drag_move(cursor, center);
                        }
                        WindowEvent::MouseInput {
                            state,
                            button: MouseButton::Left,
                            ..
                        } => match state {
                            ElementState::Pressed => self.controller.drag_start(cursor, center),
                            ElementState::Released => {
                                let now = Instant::now();
                                self.controller.drag_end(now);
                                if self.controller.click(now) {
                                    self.select_at(cursor, center);
                                }
                            }
                        },
                        WindowEvent::Touch(Touch {
                            phase, location, ..
                        }) => {
                            // Touches are consumed here and never scroll anything else.
                            let point = to_point(location);
                            match phase {
                                TouchPhase::Started => self.controller.drag_start(point, center),
                                TouchPhase::Moved => {
                                    needs_redraw |= self.controller.drag_move(point, center);
                                }
                                TouchPhase::Ended => {
                                    let now = Instant::now();
                                    self.controller.drag_end(now);
                                    if self.controller.click(now) {
                                        self.select_at(point, center);
                                    }
                                }
                                TouchPhase::Cancelled => {
                                    self.controller.drag_end(Instant::now());
                                }
                            }
                        }
                        WindowEvent::RedrawRequested => {
                            if let Some(ref receiver) = receiver {
                                while let Ok(command) = receiver.try_recv() {
                                    self.apply_command(command);
                                }
                            }

                            match Canvas::new(pixels.frame_mut(), fb_width, fb_height) {
                                Ok(mut canvas) => {
                                    if let Err(e) = self.render_to(&mut canvas, font.as_ref()) {
                                        warn!(error = %e, "skipping frame");
                                    }
                                }
                                Err(e) => warn!(error = %e, "skipping frame"),
                            }
                            if let Err(e) = pixels.render() {
                                warn!(error = %e, "failed to present frame");
                            }
                            needs_redraw = false;
                        }
                        _ => {}
                    },
                    Event::AboutToWait => {
                        let due = needs_redraw || receiver.is_some();
                        if due && last_frame.elapsed() >= frame_duration {
                            window_clone.request_redraw();
                            last_frame = Instant::now();
                        }
                    }
                    _ => {}
                }
            })
            .map_err(|e| window_error(&e))?;

        Ok(())
    }
}

fn to_point(position: PhysicalPosition<f64>) -> Point2D {
    Point2D::new(position.x, position.y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn spending() -> Vec<Segment> {
        vec![
            Segment::new("Food", 400.0, Color::new(0xf4, 0x43, 0x36), 40.0),
            Segment::new("Transport", 350.0, Color::new(0x21, 0x96, 0xf3), 35.0),
            Segment::new("Entertainment", 250.0, Color::new(0x4c, 0xaf, 0x50), 25.0),
        ]
    }

    #[test]
    fn commands_update_data_and_rotation() {
        let mut wheel = Wheel::new(WheelConfig::default());
        wheel.apply_command(WheelCommand::SetSegments(spending()));
        wheel.apply_command(WheelCommand::SetRotation(10.0));
        wheel.apply_command(WheelCommand::RotateBy(-110.0));
        assert_eq!(wheel.segments().len(), 3);
        assert_relative_eq!(wheel.rotation_angle(), -100.0);
        assert_eq!(wheel.bottom_segment().map(|s| s.name), Some("Transport".to_string()));
    }

    #[test]
    fn select_at_picks_segment_under_pointer() {
        let mut wheel = Wheel::new(WheelConfig::default());
        wheel.set_segments(spending());
        let center = Point2D::new(180.0, 180.0);
        assert_eq!(
            wheel.select_at(Point2D::new(100.0, 200.0), center),
            Some("Transport")
        );
        assert_eq!(wheel.selected(), Some("Transport"));

        // a half turn moves Entertainment to [90, 180) on screen
        wheel.set_rotation(180.0);
        assert_eq!(
            wheel.select_at(Point2D::new(100.0, 200.0), center),
            Some("Entertainment")
        );
    }

    #[test]
    fn select_at_ignores_hole_and_outside() {
        let mut wheel = Wheel::new(WheelConfig::default());
        wheel.set_segments(spending());
        let center = Point2D::new(180.0, 180.0);
        wheel.select_at(Point2D::new(260.0, 200.0), center);
        assert_eq!(wheel.selected(), Some("Food"));

        assert_eq!(wheel.select_at(Point2D::new(182.0, 180.0), center), None);
        assert_eq!(wheel.select_at(Point2D::new(359.0, 359.0), center), None);
        assert_eq!(wheel.selected(), None);
    }

    #[test]
    fn rejected_segments_leave_nothing_to_select_or_label() {
        let mut wheel = Wheel::new(WheelConfig::default());
        wheel.set_segments(vec![Segment::new("bad", 1.0, Color::new(0, 0, 0), -5.0)]);
        assert!(wheel.bottom_segment().is_none());
        let center = Point2D::new(180.0, 180.0);
        assert_eq!(wheel.select_at(Point2D::new(260.0, 200.0), center), None);
    }

    #[test]
    fn render_to_clears_then_draws() {
        let mut wheel = Wheel::new(WheelConfig::default());
        wheel.set_segments(spending());
        let mut surface = RecordingSurface::new(360, 360);
        let faces = wheel.render_to(&mut surface, None).unwrap();
        assert_eq!(surface.clears, vec![wheel.config().background_color]);
        assert_eq!(surface.fills.len(), faces.len());
        assert!(surface.texts.is_empty());
    }
}
