//! Drawing capability the scene renders into.
//!
//! The browser implementation wraps a `CanvasRenderingContext2d`; tests use a
//! recorder. Only the handful of primitives the scene needs are exposed.

use crate::animation::FrameRect;

/// Destination rectangle in canvas pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearGradient {
    pub from: (f64, f64),
    pub to: (f64, f64),
    pub stops: [(f64, &'static str); 3],
}

/// One stroked circle of a glow ring. Coordinates of `gradient` are relative to
/// the circle center after `rotation` has been applied.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GlowStroke {
    pub cx: f64,
    pub cy: f64,
    pub radius: f64,
    pub rotation: f64,
    pub line_width: f64,
    pub gradient: LinearGradient,
    pub shadow_blur: f64,
    pub shadow_color: &'static str,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Font {
    pub size_px: f64,
    pub bold: bool,
}

impl Font {
    pub fn css(&self) -> String {
        if self.bold {
            format!("bold {}px Arial", self.size_px)
        } else {
            format!("{}px Arial", self.size_px)
        }
    }
}

pub trait Surface {
    type Image;

    fn width(&self) -> f64;
    fn height(&self) -> f64;
    fn resize(&mut self, width: f64, height: f64);
    fn clear(&mut self);
    fn draw_image(&mut self, image: &Self::Image, dest: Rect);
    fn draw_image_region(&mut self, image: &Self::Image, src: FrameRect, dest: Rect);
    fn stroke_glow(&mut self, stroke: &GlowStroke);
    /// Draws `text` centered horizontally and vertically on (x, y).
    fn fill_text(&mut self, text: &str, x: f64, y: f64, font: Font, color: &str);
}
