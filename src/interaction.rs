//! Drag-to-rotate state machine with drag/click disambiguation.
//!
//! Transitions are pure: each takes the current [`Interaction`] by value and
//! returns the next one. [`InteractionController`] wraps them for hosts that
//! prefer a mutable handle.
//!
//! The rotation angle is never wrapped into `[0, 360)`. It drifts freely across
//! drags; lookups that need a canonical angle reduce it themselves.

use std::time::{Duration, Instant};

use tracing::debug;

use crate::model::Point2D;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragState {
    Idle {
        /// A click arriving before this instant belongs to the drag that just ended.
        suppress_click_until: Option<Instant>,
    },
    Dragging {
        /// Pointer angle minus rotation at drag start, degrees.
        start_angle: f64,
        has_dragged: bool,
    },
}

impl Default for DragState {
    fn default() -> Self {
        Self::Idle {
            suppress_click_until: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Interaction {
    pub rotation_angle: f64,
    pub state: DragState,
}

/// Angle of `pointer` around `center`, degrees, in `(-180, 180]`.
pub fn pointer_angle(pointer: Point2D, center: Point2D) -> f64 {
    (pointer.y - center.y).atan2(pointer.x - center.x).to_degrees()
}

impl Interaction {
    pub fn new(rotation_angle: f64) -> Self {
        Self {
            rotation_angle,
            state: DragState::default(),
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    pub fn on_drag_start(self, pointer: Point2D, center: Point2D) -> Self {
        let start_angle = pointer_angle(pointer, center) - self.rotation_angle;
        Self {
            state: DragState::Dragging {
                start_angle,
                has_dragged: false,
            },
            ..self
        }
    }

    /// Moves outside a drag are ignored.
    pub fn on_drag_move(self, pointer: Point2D, center: Point2D) -> Self {
        match self.state {
            DragState::Dragging { start_angle, .. } => Self {
                rotation_angle: pointer_angle(pointer, center) - start_angle,
                state: DragState::Dragging {
                    start_angle,
                    has_dragged: true,
                },
            },
            DragState::Idle { .. } => self,
        }
    }

    /// Ends a drag. If the pointer moved, clicks are suppressed until
    /// `now + suppress_window`.
    pub fn on_drag_end(self, now: Instant, suppress_window: Duration) -> Self {
        let suppress_click_until = match self.state {
            DragState::Dragging {
                has_dragged: true, ..
            } => Some(now + suppress_window),
            DragState::Dragging { .. } => None,
            DragState::Idle {
                suppress_click_until,
            } => suppress_click_until,
        };
        Self {
            state: DragState::Idle {
                suppress_click_until,
            },
            ..self
        }
    }

    /// Returns the next state and whether the click should reach the select handler.
    pub fn on_click(self, now: Instant) -> (Self, bool) {
        match self.state {
            DragState::Idle {
                suppress_click_until: Some(until),
            } if now < until => (self, false),
            DragState::Idle { .. } => (
                Self {
                    state: DragState::default(),
                    ..self
                },
                true,
            ),
            DragState::Dragging { has_dragged, .. } => (self, !has_dragged),
        }
    }
}

/// Owns the wheel's rotation and feeds pointer events through [`Interaction`].
#[derive(Debug, Clone)]
pub struct InteractionController {
    current: Interaction,
    suppress_window: Duration,
}

impl InteractionController {
    pub fn new(rotation_angle: f64, suppress_window: Duration) -> Self {
        Self {
            current: Interaction::new(rotation_angle),
            suppress_window,
        }
    }

    pub fn rotation_angle(&self) -> f64 {
        self.current.rotation_angle
    }

    pub fn state(&self) -> DragState {
        self.current.state
    }

    pub fn is_dragging(&self) -> bool {
        self.current.is_dragging()
    }

    pub fn set_rotation(&mut self, rotation_angle: f64) {
        self.current.rotation_angle = rotation_angle;
    }

    pub fn rotate_by(&mut self, delta: f64) {
        self.current.rotation_angle += delta;
    }

    pub fn drag_start(&mut self, pointer: Point2D, center: Point2D) {
        self.current = self.current.on_drag_start(pointer, center);
        debug!(rotation = self.current.rotation_angle, "drag started");
    }

    /// Returns true when the rotation changed and a redraw is due.
    pub fn drag_move(&mut self, pointer: Point2D, center: Point2D) -> bool {
        let before = self.current.rotation_angle;
        self.current = self.current.on_drag_move(pointer, center);
        self.current.is_dragging() && self.current.rotation_angle != before
    }

    pub fn drag_end(&mut self, now: Instant) {
        if self.current.is_dragging() {
            self.current = self.current.on_drag_end(now, self.suppress_window);
            debug!(rotation = self.current.rotation_angle, "drag ended");
        }
    }

    pub fn click(&mut self, now: Instant) -> bool {
        let (next, fire) = self.current.on_click(now);
        self.current = next;
        if !fire {
            debug!("click suppressed after drag");
        }
        fire
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const CENTER: Point2D = Point2D::new(100.0, 100.0);
    const WINDOW: Duration = Duration::from_millis(50);

    #[test]
    fn pointer_angle_uses_screen_axes() {
        assert_relative_eq!(pointer_angle(Point2D::new(150.0, 100.0), CENTER), 0.0);
        assert_relative_eq!(pointer_angle(Point2D::new(100.0, 150.0), CENTER), 90.0);
        assert_relative_eq!(pointer_angle(Point2D::new(50.0, 100.0), CENTER), 180.0);
    }

    #[test]
    fn drag_rotates_by_pointer_sweep() {
        let s = Interaction::new(30.0)
            .on_drag_start(Point2D::new(150.0, 100.0), CENTER)
            .on_drag_move(Point2D::new(100.0, 150.0), CENTER);
        assert_relative_eq!(s.rotation_angle, 120.0);
        assert!(s.is_dragging());
    }

    #[test]
    fn move_without_drag_is_ignored() {
        let s = Interaction::new(10.0).on_drag_move(Point2D::new(0.0, 0.0), CENTER);
        assert_eq!(s, Interaction::new(10.0));
    }

    #[test]
    fn rotation_is_not_wrapped() {
        let mut s = Interaction::new(0.0);
        let path = [
            Point2D::new(150.0, 100.0),
            Point2D::new(100.0, 150.0),
            Point2D::new(50.0, 100.1),
        ];
        for _ in 0..3 {
            s = s.on_drag_start(path[0], CENTER);
            for p in &path[1..] {
                s = s.on_drag_move(*p, CENTER);
            }
            s = s.on_drag_end(Instant::now(), WINDOW);
        }
        assert!(s.rotation_angle > 360.0);
    }

    #[test]
    fn click_after_drag_is_suppressed() {
        let now = Instant::now();
        let s = Interaction::new(0.0)
            .on_drag_start(Point2D::new(150.0, 100.0), CENTER)
            .on_drag_move(Point2D::new(140.0, 120.0), CENTER)
            .on_drag_end(now, WINDOW);
        let (s, fired) = s.on_click(now);
        assert!(!fired);

        // once the window passes, clicks go through again
        let (_, fired) = s.on_click(now + WINDOW);
        assert!(fired);
    }

    #[test]
    fn click_without_move_fires() {
        let now = Instant::now();
        let s = Interaction::new(0.0)
            .on_drag_start(Point2D::new(150.0, 100.0), CENTER)
            .on_drag_end(now, WINDOW);
        let (_, fired) = s.on_click(now);
        assert!(fired);
    }

    #[test]
    fn controller_reports_redraws_and_suppression() {
        let now = Instant::now();
        let mut controller = InteractionController::new(0.0, WINDOW);
        controller.drag_start(Point2D::new(150.0, 100.0), CENTER);
        assert!(controller.drag_move(Point2D::new(100.0, 150.0), CENTER));
        assert_relative_eq!(controller.rotation_angle(), 90.0);
        controller.drag_end(now);
        assert!(!controller.is_dragging());
        assert!(!controller.click(now));

        controller.rotate_by(-45.0);
        assert_relative_eq!(controller.rotation_angle(), 45.0);
        assert!(!controller.drag_move(Point2D::new(0.0, 0.0), CENTER));
    }
}
