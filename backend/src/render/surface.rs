//! Drawing target abstraction used by the scene renderer.

use super::projection::ScreenPoint;

/// Straight (non-premultiplied) RGBA color with float alpha.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::rgb(0xff, 0xff, 0xff);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }
}

/// Outline parameters for circles and polylines.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineStyle {
    pub color: Rgba,
    pub width: f32,
}

impl LineStyle {
    pub const fn new(color: Rgba, width: f32) -> Self {
        Self { color, width }
    }
}

/// Typeface families available to the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontRole {
    Sans,
    SansBold,
    Serif,
    SerifItalic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Start,
    Center,
}

/// Vertical anchor of the text position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextBaseline {
    Alphabetic,
    Middle,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub role: FontRole,
    pub size: f32,
    pub color: Rgba,
    pub align: TextAlign,
    pub baseline: TextBaseline,
}

impl TextStyle {
    pub const fn new(role: FontRole, size: f32, color: Rgba) -> Self {
        Self {
            role,
            size,
            color,
            align: TextAlign::Start,
            baseline: TextBaseline::Alphabetic,
        }
    }

    pub const fn centered(mut self) -> Self {
        self.align = TextAlign::Center;
        self
    }

    pub const fn middle(mut self) -> Self {
        self.baseline = TextBaseline::Middle;
        self
    }
}

/// A 2D raster target.
///
/// Clips nest: every drawing call is confined to the intersection of the
/// clips pushed so far.
pub trait Surface {
    fn width(&self) -> f32;
    fn height(&self) -> f32;

    /// Paint the whole surface, ignoring clips.
    fn fill_background(&mut self, color: Rgba);
    fn fill_circle(&mut self, center: ScreenPoint, radius: f64, color: Rgba);
    fn stroke_circle(&mut self, center: ScreenPoint, radius: f64, line: LineStyle);
    /// Connected open segments through `points`.
    fn stroke_polyline(&mut self, points: &[ScreenPoint], line: LineStyle);
    fn push_circle_clip(&mut self, center: ScreenPoint, radius: f64);
    fn pop_clip(&mut self);
    fn fill_text(&mut self, text: &str, at: ScreenPoint, style: &TextStyle);
    fn measure_text(&self, text: &str, style: &TextStyle) -> f32;
}
