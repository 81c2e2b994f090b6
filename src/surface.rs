// ============================================================================
// DRAWING SURFACE
// ============================================================================

use rusttype::{point, Font, Scale};

use crate::config::Color;
use crate::error::WheelError;
use crate::model::Point2D;

/// Minimal drawing target the renderer talks to.
///
/// Coordinates are in surface pixels. `alpha` is the blend factor in `[0, 1]`.
pub trait Surface {
    fn size(&self) -> (usize, usize);

    fn clear(&mut self, color: Color);

    fn fill_polygon(&mut self, points: &[Point2D], color: Color, alpha: f64);

    fn stroke_polygon(&mut self, points: &[Point2D], color: Color, alpha: f64, width: f32);

    /// Draws `text` centered on `(x, y)`. Surfaces without text support ignore it.
    fn draw_text(
        &mut self,
        _x: i32,
        _y: i32,
        _text: &str,
        _font: &Font<'_>,
        _font_size: f32,
        _color: Color,
    ) {
    }
}

/// An RGBA8 frame buffer, as handed out by `pixels`.
pub struct Canvas<'a> {
    frame: &'a mut [u8],
    width: usize,
    height: usize,
}

impl<'a> Canvas<'a> {
    pub fn new(frame: &'a mut [u8], width: usize, height: usize) -> Result<Self, WheelError> {
        if width == 0 || height == 0 || frame.len() != width * height * 4 {
            return Err(WheelError::SurfaceUnavailable {
                width,
                height,
                len: frame.len(),
            });
        }
        Ok(Self {
            frame,
            width,
            height,
        })
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 4]> {
        if x < self.width && y < self.height {
            let idx = (y * self.width + x) * 4;
            let mut out = [0; 4];
            out.copy_from_slice(&self.frame[idx..idx + 4]);
            Some(out)
        } else {
            None
        }
    }

    fn set_pixel(&mut self, x: i32, y: i32, color: Color, alpha: f32) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return;
        }
        let idx = (y as usize * self.width + x as usize) * 4;
        let a = alpha.clamp(0.0, 1.0);
        let blend = |src: u8, dst: u8| (src as f32 * a + dst as f32 * (1.0 - a)).round() as u8;
        let out = [
            blend(color.r, self.frame[idx]),
            blend(color.g, self.frame[idx + 1]),
            blend(color.b, self.frame[idx + 2]),
            0xff,
        ];
        self.frame[idx..idx + 4].copy_from_slice(&out);
    }

    fn draw_thick_line_aa(
        &mut self,
        from: Point2D,
        to: Point2D,
        thickness: f32,
        color: Color,
        alpha: f32,
    ) {
        let (x0, y0) = (from.x as f32, from.y as f32);
        let (x1, y1) = (to.x as f32, to.y as f32);
        let pad = thickness.ceil() + 1.0;
        let min_x = ((x0.min(x1) - pad).floor() as i32).max(0);
        let max_x = ((x0.max(x1) + pad).ceil() as i32).min(self.width as i32 - 1);
        let min_y = ((y0.min(y1) - pad).floor() as i32).max(0);
        let max_y = ((y0.max(y1) + pad).ceil() as i32).min(self.height as i32 - 1);

        let dx = x1 - x0;
        let dy = y1 - y0;
        let len_sq = dx * dx + dy * dy;
        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let px = x as f32 - x0;
                let py = y as f32 - y0;
                let t = if len_sq > 0.0 {
                    ((px * dx + py * dy) / len_sq).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                let lx = x0 + t * dx;
                let ly = y0 + t * dy;
                let dist = ((lx - x as f32).powi(2) + (ly - y as f32).powi(2)).sqrt();
                let aa = (1.0 - (dist - thickness / 2.0).clamp(0.0, 1.0)).clamp(0.0, 1.0);
                if aa > 0.01 {
                    self.set_pixel(x, y, color, aa * alpha);
                }
            }
        }
    }
}

impl Surface for Canvas<'_> {
    fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    fn clear(&mut self, color: Color) {
        for chunk in self.frame.chunks_exact_mut(4) {
            chunk.copy_from_slice(&[color.r, color.g, color.b, 0xff]);
        }
    }

    /// Even-odd scanline fill sampled at pixel centers.
    fn fill_polygon(&mut self, points: &[Point2D], color: Color, alpha: f64) {
        if points.len() < 3 || alpha <= 0.0 {
            return;
        }
        let min_y = points.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
        let max_y = points.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max);
        if !min_y.is_finite() || !max_y.is_finite() {
            return;
        }
        let y_start = (min_y.floor() as i64).max(0);
        let y_end = (max_y.ceil() as i64).min(self.height as i64 - 1);

        let mut crossings = Vec::with_capacity(points.len());
        for y in y_start..=y_end {
            let sample_y = y as f64 + 0.5;
            crossings.clear();
            for i in 0..points.len() {
                let a = points[i];
                let b = points[(i + 1) % points.len()];
                if (a.y <= sample_y) != (b.y <= sample_y) {
                    let t = (sample_y - a.y) / (b.y - a.y);
                    crossings.push(a.x + t * (b.x - a.x));
                }
            }
            crossings.sort_by(|a, b| a.total_cmp(b));

            for span in crossings.chunks_exact(2) {
                let x_start = ((span[0] - 0.5).ceil() as i64).max(0);
                let x_end = ((span[1] - 0.5).floor() as i64).min(self.width as i64 - 1);
                for x in x_start..=x_end {
                    self.set_pixel(x as i32, y as i32, color, alpha as f32);
                }
            }
        }
    }

    fn stroke_polygon(&mut self, points: &[Point2D], color: Color, alpha: f64, width: f32) {
        if points.len() < 2 || alpha <= 0.0 || width <= 0.0 {
            return;
        }
        for i in 0..points.len() {
            let a = points[i];
            let b = points[(i + 1) % points.len()];
            self.draw_thick_line_aa(a, b, width, color, alpha as f32);
        }
    }

    fn draw_text(
        &mut self,
        x: i32,
        y: i32,
        text: &str,
        font: &Font<'_>,
        font_size: f32,
        color: Color,
    ) {
        if text.is_empty() {
            return;
        }
        let scale = Scale::uniform(font_size);
        let v = font.v_metrics(scale);
        let glyphs: Vec<_> = font.layout(text, scale, point(0.0, 0.0)).collect();
        let advance = glyphs
            .last()
            .map(|g| g.position().x + g.unpositioned().h_metrics().advance_width)
            .unwrap_or(0.0);
        let (ox, oy) = label_origin(x, y, advance, v.ascent, v.descent);

        for glyph in &glyphs {
            let Some(bb) = glyph.pixel_bounding_box() else {
                continue;
            };
            glyph.draw(|gx, gy, coverage| {
                let px = ox + bb.min.x + gx as i32;
                let py = oy + bb.min.y + gy as i32;
                self.set_pixel(px, py, color, coverage);
            });
        }
    }
}

/// Baseline origin that centres a run of `advance` pixels on `(x, y)`.
///
/// `descent` is negative in font metrics, so the visual middle of the line
/// sits `(ascent + descent) / 2` above the baseline.
pub(crate) fn label_origin(
    x: i32,
    y: i32,
    advance: f32,
    ascent: f32,
    descent: f32,
) -> (i32, i32) {
    let ox = x as f32 - advance / 2.0;
    let oy = y as f32 + (ascent + descent) / 2.0;
    (ox.round() as i32, oy.round() as i32)
}

/// Headless surface that records every call, in order.
///
/// Useful for hosts that export draw order rather than pixels.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub width: usize,
    pub height: usize,
    pub clears: Vec<Color>,
    pub fills: Vec<(Vec<Point2D>, Color, f64)>,
    pub strokes: Vec<(Vec<Point2D>, Color, f64, f32)>,
    pub texts: Vec<(i32, i32, String)>,
}

impl RecordingSurface {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }
}

impl Surface for RecordingSurface {
    fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    fn clear(&mut self, color: Color) {
        self.clears.push(color);
    }

    fn fill_polygon(&mut self, points: &[Point2D], color: Color, alpha: f64) {
        self.fills.push((points.to_vec(), color, alpha));
    }

    fn stroke_polygon(&mut self, points: &[Point2D], color: Color, alpha: f64, width: f32) {
        self.strokes.push((points.to_vec(), color, alpha, width));
    }

    fn draw_text(
        &mut self,
        x: i32,
        y: i32,
        text: &str,
        _font: &Font<'_>,
        _font_size: f32,
        _color: Color,
    ) {
        self.texts.push((x, y, text.to_string()));
    }
}
