//! [`Surface`] backed by a tiny-skia pixmap.

use std::sync::Arc;

use tiny_skia::{
    Color, FillRule, Mask, Paint, PathBuilder, Pixmap, PremultipliedColorU8, Stroke, Transform,
};

use super::fonts::FontSet;
use super::projection::ScreenPoint;
use super::surface::{LineStyle, Rgba, Surface, TextStyle};
use super::RenderError;

/// Raster canvas with a stack of circular clips.
pub struct PixmapSurface {
    pixmap: Pixmap,
    clips: Vec<Mask>,
    fonts: Arc<FontSet>,
}

impl PixmapSurface {
    pub fn new(width: u32, height: u32, fonts: Arc<FontSet>) -> Result<Self, RenderError> {
        let pixmap = Pixmap::new(width, height)
            .ok_or(RenderError::SurfaceAllocation { width, height })?;
        Ok(Self {
            pixmap,
            clips: Vec::new(),
            fonts,
        })
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    pub fn into_pixmap(self) -> Pixmap {
        self.pixmap
    }

    fn active_clip(&self) -> Option<&Mask> {
        self.clips.last()
    }

    fn fill_paint(color: Rgba) -> Paint<'static> {
        let mut paint = Paint::default();
        paint.set_color(to_skia(color));
        paint.anti_alias = true;
        paint
    }
}

fn to_skia(color: Rgba) -> Color {
    let alpha = (color.a.clamp(0.0, 1.0) * 255.0).round() as u8;
    Color::from_rgba8(color.r, color.g, color.b, alpha)
}

impl Surface for PixmapSurface {
    fn width(&self) -> f32 {
        self.pixmap.width() as f32
    }

    fn height(&self) -> f32 {
        self.pixmap.height() as f32
    }

    fn fill_background(&mut self, color: Rgba) {
        self.pixmap.fill(to_skia(color));
    }

    fn fill_circle(&mut self, center: ScreenPoint, radius: f64, color: Rgba) {
        let Some(path) = PathBuilder::from_circle(center.x as f32, center.y as f32, radius as f32)
        else {
            return;
        };
        let paint = Self::fill_paint(color);
        let clip = self.clips.last();
        self.pixmap
            .fill_path(&path, &paint, FillRule::Winding, Transform::identity(), clip);
    }

    fn stroke_circle(&mut self, center: ScreenPoint, radius: f64, line: LineStyle) {
        let Some(path) = PathBuilder::from_circle(center.x as f32, center.y as f32, radius as f32)
        else {
            return;
        };
        let paint = Self::fill_paint(line.color);
        let stroke = Stroke {
            width: line.width,
            ..Stroke::default()
        };
        let clip = self.clips.last();
        self.pixmap
            .stroke_path(&path, &paint, &stroke, Transform::identity(), clip);
    }

    fn stroke_polyline(&mut self, points: &[ScreenPoint], line: LineStyle) {
        let Some((first, rest)) = points.split_first() else {
            return;
        };
        let mut builder = PathBuilder::new();
        builder.move_to(first.x as f32, first.y as f32);
        for p in rest {
            builder.line_to(p.x as f32, p.y as f32);
        }
        // A single vertex yields no path
        let Some(path) = builder.finish() else {
            return;
        };
        let paint = Self::fill_paint(line.color);
        let stroke = Stroke {
            width: line.width,
            ..Stroke::default()
        };
        let clip = self.clips.last();
        self.pixmap
            .stroke_path(&path, &paint, &stroke, Transform::identity(), clip);
    }

    fn push_circle_clip(&mut self, center: ScreenPoint, radius: f64) {
        let (w, h) = (self.pixmap.width(), self.pixmap.height());
        let Some(mut mask) = Mask::new(w, h) else {
            return;
        };
        if let Some(path) =
            PathBuilder::from_circle(center.x as f32, center.y as f32, radius as f32)
        {
            mask.fill_path(&path, FillRule::Winding, true, Transform::identity());
        }
        if let Some(outer) = self.active_clip() {
            for (m, o) in mask.data_mut().iter_mut().zip(outer.data()) {
                *m = ((*m as u16 * *o as u16) / 255) as u8;
            }
        }
        self.clips.push(mask);
    }

    fn pop_clip(&mut self) {
        self.clips.pop();
    }

    fn fill_text(&mut self, text: &str, at: ScreenPoint, style: &TextStyle) {
        let glyphs = self.fonts.layout(text, at.x as f32, at.y as f32, style);
        if glyphs.is_empty() {
            return;
        }
        let width = self.pixmap.width() as i32;
        let height = self.pixmap.height() as i32;
        let color = style.color;
        let alpha = color.a.clamp(0.0, 1.0);
        let clip = self.clips.last().map(|m| m.data());
        let pixels = self.pixmap.pixels_mut();

        for glyph in &glyphs {
            let Some(bb) = glyph.pixel_bounding_box() else {
                continue;
            };
            glyph.draw(|gx, gy, coverage| {
                let px = bb.min.x + gx as i32;
                let py = bb.min.y + gy as i32;
                if px < 0 || py < 0 || px >= width || py >= height {
                    return;
                }
                let idx = (py * width + px) as usize;
                let clip_factor = clip.map_or(1.0, |c| c[idx] as f32 / 255.0);
                let sa = alpha * coverage * clip_factor;
                if sa <= 0.0 {
                    return;
                }
                let dst = pixels[idx];
                let inv = 1.0 - sa;
                let blend = |src: u8, dst: u8| (src as f32 * sa + dst as f32 * inv).round() as u8;
                let blended = PremultipliedColorU8::from_rgba(
                    blend(color.r, dst.red()),
                    blend(color.g, dst.green()),
                    blend(color.b, dst.blue()),
                    blend(255, dst.alpha()),
                );
                if let Some(c) = blended {
                    pixels[idx] = c;
                }
            });
        }
    }

    fn measure_text(&self, text: &str, style: &TextStyle) -> f32 {
        self.fonts.text_width(text, style)
    }
}
