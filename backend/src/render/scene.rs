//! Full star map composition.
//!
//! A render is one pass in a fixed order: background, dome, grid, stars,
//! constellations and bodies under the dome clip, then compass labels and
//! text overlays. Every pass starts by overwriting the whole surface, so
//! rendering the same inputs twice yields the same picture.

use log::debug;
use serde::Serialize;

use super::projection::{compass_point, project, ScreenPoint};
use super::stamp::{format_stamp, WATERMARK};
use super::style::{self, BodyStyle};
use super::surface::Surface;
use super::text_layout::wrap_message;
use crate::config::CanvasConfig;
use crate::models::{RenderRequest, SkyDataResponse};

/// Compass labels and their azimuths. West is labelled in Spanish.
const COMPASS: [(&str, f64); 4] = [("N", 0.0), ("E", 90.0), ("S", 180.0), ("O", 270.0)];
const COMPASS_OFFSET: f64 = 25.0;
const GRID_RINGS: [f64; 2] = [0.33, 0.66];
const GRID_SPOKE_STEP_DEG: f64 = 45.0;
const MESSAGE_LINE_HEIGHT: f64 = 40.0;

pub const PLACEHOLDER_HINT: &str = "Configura tu mapa para ver las estrellas";

/// Canvas size and dome geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasLayout {
    pub width: u32,
    pub height: u32,
    pub radius: f64,
}

impl Default for CanvasLayout {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 1600,
            radius: 500.0,
        }
    }
}

impl From<&CanvasConfig> for CanvasLayout {
    fn from(config: &CanvasConfig) -> Self {
        Self {
            width: config.width,
            height: config.height,
            radius: config.dome_radius,
        }
    }
}

impl CanvasLayout {
    /// Dome center, raised above the canvas middle to leave room for text.
    pub fn center(&self) -> ScreenPoint {
        ScreenPoint::new(
            self.width as f64 / 2.0,
            self.height as f64 / 2.0 - 100.0,
        )
    }

    fn text_x(&self) -> f64 {
        self.width as f64 / 2.0
    }

    fn recipient_y(&self) -> f64 {
        100.0
    }

    fn message_y(&self) -> f64 {
        self.height as f64 - 260.0
    }

    fn stamp_y(&self) -> f64 {
        self.height as f64 - 160.0
    }

    fn watermark_y(&self) -> f64 {
        self.height as f64 - 80.0
    }
}

/// What one render pass put on the surface.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RenderStats {
    pub stars_drawn: usize,
    pub constellation_polylines: usize,
    pub constellation_labels: Vec<String>,
    pub body_labels: Vec<String>,
    pub message_lines: Vec<String>,
    pub stamp: String,
}

/// Paints star maps onto a [`Surface`].
#[derive(Debug, Clone, Default)]
pub struct SceneRenderer {
    layout: CanvasLayout,
}

impl SceneRenderer {
    pub fn new(layout: CanvasLayout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> &CanvasLayout {
        &self.layout
    }

    /// Draw the complete map for `data` as requested by `request`.
    pub fn render(
        &self,
        surface: &mut dyn Surface,
        data: &SkyDataResponse,
        request: &RenderRequest,
    ) -> RenderStats {
        let center = self.layout.center();
        let radius = self.layout.radius;
        let mut stats = RenderStats::default();

        surface.fill_background(style::BACKGROUND);

        surface.fill_circle(center, radius, style::DOME_FILL);
        surface.stroke_circle(center, radius, style::DOME_BORDER);
        surface.push_circle_clip(center, radius);

        self.draw_grid(surface, center, radius);

        for star in &data.stars {
            let at = project(star.alt_deg, star.az_deg, center, radius);
            surface.fill_circle(at, style::star_radius(star.magnitude), style::STAR_FILL);
            stats.stars_drawn += 1;
        }

        for constellation in &data.constellations {
            for line in &constellation.lines {
                if line.len() < 2 {
                    continue;
                }
                let points: Vec<ScreenPoint> = line
                    .iter()
                    .map(|p| project(p.alt, p.az, center, radius))
                    .collect();
                surface.stroke_polyline(&points, style::CONSTELLATION_LINE);
                stats.constellation_polylines += 1;
            }
            if let Some(anchor) = constellation.label_anchor() {
                let label = constellation.name.to_uppercase();
                let at = project(anchor.alt, anchor.az, center, radius);
                surface.fill_text(&label, at, &style::CONSTELLATION_LABEL);
                stats.constellation_labels.push(label);
            }
        }

        for body in &data.solar_system {
            let body_style = BodyStyle::for_name(&body.name);
            let at = project(body.alt_deg, body.az_deg, center, radius);
            surface.fill_circle(at, body_style.radius, body_style.color);
            let (dx, dy) = style::BODY_LABEL_OFFSET;
            surface.fill_text(&body.name, at.offset(dx, dy), &style::BODY_LABEL);
            stats.body_labels.push(body.name.clone());
        }

        surface.pop_clip();

        self.draw_compass(surface, center, radius);

        let text_x = self.layout.text_x();
        let recipient = request.recipient.trim();
        if !recipient.is_empty() {
            surface.fill_text(
                recipient,
                ScreenPoint::new(text_x, self.layout.recipient_y()),
                &style::RECIPIENT_TEXT,
            );
        }

        stats.message_lines = wrap_message(&request.message);
        for (i, line) in stats.message_lines.iter().enumerate() {
            let y = self.layout.message_y() + i as f64 * MESSAGE_LINE_HEIGHT;
            surface.fill_text(line, ScreenPoint::new(text_x, y), &style::MESSAGE_TEXT);
        }

        stats.stamp = format_stamp(request);
        surface.fill_text(
            &stats.stamp,
            ScreenPoint::new(text_x, self.layout.stamp_y()),
            &style::STAMP_TEXT,
        );
        surface.fill_text(
            WATERMARK,
            ScreenPoint::new(text_x, self.layout.watermark_y()),
            &style::WATERMARK_TEXT,
        );

        debug!(
            "Rendered map: {} stars, {} constellation lines, {} bodies",
            stats.stars_drawn,
            stats.constellation_polylines,
            stats.body_labels.len()
        );
        stats
    }

    /// Scene shown before the first map is generated.
    pub fn draw_placeholder(&self, surface: &mut dyn Surface) {
        let center = self.layout.center();
        surface.fill_background(style::BACKGROUND);
        surface.stroke_circle(center, self.layout.radius, style::PLACEHOLDER_RIM);
        surface.fill_text(PLACEHOLDER_HINT, center, &style::PLACEHOLDER_TEXT);
    }

    fn draw_grid(&self, surface: &mut dyn Surface, center: ScreenPoint, radius: f64) {
        for ring in GRID_RINGS {
            surface.stroke_circle(center, radius * ring, style::GRID_LINE);
        }
        let spokes = (360.0 / GRID_SPOKE_STEP_DEG) as usize;
        for i in 0..spokes {
            let rim = project(0.0, i as f64 * GRID_SPOKE_STEP_DEG, center, radius);
            surface.stroke_polyline(&[center, rim], style::GRID_LINE);
        }
    }

    fn draw_compass(&self, surface: &mut dyn Surface, center: ScreenPoint, radius: f64) {
        for (label, az) in COMPASS {
            let at = compass_point(az, center, radius, COMPASS_OFFSET);
            surface.fill_text(label, at, &style::COMPASS_LABEL);
        }
    }
}

#[cfg(test)]
#[path = "scene_tests.rs"]
mod scene_tests;
