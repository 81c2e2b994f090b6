use std::time::Duration;

use bon::Builder;

use crate::error::WheelError;
use crate::model::Point3D;

/// Color representation for wheel faces, strokes and labels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn as_tuple(self) -> (u8, u8, u8) {
        (self.r, self.g, self.b)
    }

    /// Parses `#rrggbb` or `#rgb` (leading `#` optional).
    pub fn from_hex(hex: &str) -> Result<Self, WheelError> {
        let digits = hex.trim().trim_start_matches('#');
        let invalid = || WheelError::InvalidColor(hex.to_string());
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| invalid());
        match digits.len() {
            6 => Ok(Self::new(
                channel(&digits[0..2])?,
                channel(&digits[2..4])?,
                channel(&digits[4..6])?,
            )),
            3 => {
                let expand = |i: usize| channel(&digits[i..=i]).map(|v| v * 17);
                Ok(Self::new(expand(0)?, expand(1)?, expand(2)?))
            }
            _ => Err(invalid()),
        }
    }

    /// Scales every channel by `factor` (clamped to `[0, 1]`).
    pub fn darken(self, factor: f64) -> Self {
        let f = factor.clamp(0.0, 1.0);
        let scale = |c: u8| (c as f64 * f).round() as u8;
        Self::new(scale(self.r), scale(self.g), scale(self.b))
    }
}

/// How `prepare_segments` treats percentages that do not add up to 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PercentagePolicy {
    /// Draw the arcs exactly as given; the ring may not close.
    #[default]
    AsIs,
    /// Rescale every percentage so the total is 100.
    Normalize,
}

/// Runtime configuration for the wheel pipeline and its window host.
#[derive(Debug, Clone, Builder)]
pub struct WheelConfig {
    // Geometry
    #[builder(default = 120.0)]
    pub radius: f64,
    #[builder(default = 60.0)]
    pub inner_radius: f64,
    #[builder(default = 40.0)]
    pub depth: f64,
    #[builder(default = 20)]
    pub min_steps: usize,
    #[builder(default = 3.0)]
    pub degrees_per_step: f64,
    #[builder(default = 8)]
    pub facet_count: usize,

    // Camera tilt, degrees
    #[builder(default = 25.0)]
    pub alpha: f64,
    #[builder(default = 0.0)]
    pub beta: f64,
    #[builder(default = 800.0)]
    pub perspective_distance: f64,

    // Lighting
    #[builder(default = Point3D::new(-200.0, -250.0, 400.0))]
    pub light_source: Point3D,
    #[builder(default = 0.4)]
    pub ambient: f64,
    #[builder(default = 0.6)]
    pub diffuse: f64,

    // Face styling
    #[builder(default = 0.95)]
    pub top_opacity: f64,
    #[builder(default = 0.9)]
    pub bottom_opacity: f64,
    #[builder(default = 1.5)]
    pub top_stroke_width: f32,
    #[builder(default = 0.6)]
    pub top_stroke_darken: f64,
    #[builder(default = 0.5)]
    pub side_stroke_width: f32,
    #[builder(default = 0.85)]
    pub side_stroke_darken: f64,

    // Data policy
    #[builder(default)]
    pub percentage_policy: PercentagePolicy,
    #[builder(default = true)]
    pub skip_degenerate: bool,

    // Interaction
    #[builder(default = Duration::from_millis(50))]
    pub click_suppress_window: Duration,

    // Window configuration
    #[builder(default = "Spending".to_string())]
    pub title: String,
    #[builder(default = 360)]
    pub window_width: usize,
    #[builder(default = 360)]
    pub window_height: usize,
    #[builder(default = 60.0)]
    pub max_framerate: f64,
    #[builder(default = Color::new(0xff, 0xff, 0xff))]
    pub background_color: Color,

    // Label configuration
    pub font_data: Option<Vec<u8>>,
    #[builder(default = 22.0)]
    pub label_font_size: f32,
    #[builder(default = 24)]
    pub label_margin: i32,
    #[builder(default = Color::new(0x33, 0x33, 0x33))]
    pub label_color: Color,
}

impl Default for WheelConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl WheelConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks the geometry and camera ranges the pipeline relies on.
    ///
    /// `perspective_distance` must exceed `radius + depth`: no rotated point is
    /// farther than that from the origin, so every projection scale stays
    /// positive and finite.
    pub fn validate(&self) -> Result<(), WheelError> {
        let invalid = |msg: String| Err(WheelError::InvalidConfig(msg));
        let finite = [
            self.radius,
            self.inner_radius,
            self.depth,
            self.alpha,
            self.beta,
            self.perspective_distance,
            self.degrees_per_step,
            self.ambient,
            self.diffuse,
        ];
        if finite.iter().any(|v| !v.is_finite()) {
            return invalid("non-finite value".to_string());
        }
        if self.radius <= 0.0 {
            return invalid(format!("radius {} must be positive", self.radius));
        }
        if self.inner_radius < 0.0 || self.inner_radius >= self.radius {
            return invalid(format!(
                "inner radius {} must lie in [0, {})",
                self.inner_radius, self.radius
            ));
        }
        if self.depth < 0.0 {
            return invalid(format!("depth {} must not be negative", self.depth));
        }
        if self.perspective_distance <= self.radius + self.depth {
            return invalid(format!(
                "perspective distance {} must exceed radius + depth ({})",
                self.perspective_distance,
                self.radius + self.depth
            ));
        }
        if self.degrees_per_step <= 0.0 {
            return invalid(format!(
                "degrees per step {} must be positive",
                self.degrees_per_step
            ));
        }
        if self.ambient < 0.0 || self.diffuse < 0.0 {
            return invalid("lighting coefficients must not be negative".to_string());
        }
        Ok(())
    }
}
