//! Colors, sizes and fonts of the star map.

use super::surface::{FontRole, LineStyle, Rgba, TextStyle};

pub const BACKGROUND: Rgba = Rgba::rgb(0x0b, 0x0d, 0x17);
pub const DOME_FILL: Rgba = Rgba::rgb(0x11, 0x1b, 0x29);
pub const DOME_BORDER: LineStyle = LineStyle::new(Rgba::WHITE, 3.0);
pub const GRID_LINE: LineStyle = LineStyle::new(Rgba::rgba(255, 255, 255, 0.1), 1.0);
pub const STAR_FILL: Rgba = Rgba::WHITE;
pub const CONSTELLATION_LINE: LineStyle = LineStyle::new(Rgba::rgba(255, 255, 255, 0.3), 1.0);

pub const CONSTELLATION_LABEL: TextStyle =
    TextStyle::new(FontRole::Sans, 10.0, Rgba::rgba(255, 255, 255, 0.6)).centered();
pub const BODY_LABEL: TextStyle = TextStyle::new(FontRole::Sans, 12.0, Rgba::WHITE);
pub const COMPASS_LABEL: TextStyle =
    TextStyle::new(FontRole::SansBold, 20.0, Rgba::WHITE).centered().middle();

pub const RECIPIENT_TEXT: TextStyle =
    TextStyle::new(FontRole::SerifItalic, 40.0, Rgba::WHITE).centered().middle();
pub const MESSAGE_TEXT: TextStyle =
    TextStyle::new(FontRole::Serif, 30.0, Rgba::WHITE).centered().middle();
pub const STAMP_TEXT: TextStyle =
    TextStyle::new(FontRole::Sans, 16.0, Rgba::rgba(255, 255, 255, 0.6)).centered().middle();
pub const WATERMARK_TEXT: TextStyle =
    TextStyle::new(FontRole::Sans, 12.0, Rgba::rgba(255, 255, 255, 0.3)).centered().middle();

pub const PLACEHOLDER_RIM: LineStyle = LineStyle::new(Rgba::rgba(255, 255, 255, 0.2), 2.0);
pub const PLACEHOLDER_TEXT: TextStyle =
    TextStyle::new(FontRole::Sans, 30.0, Rgba::rgba(255, 255, 255, 0.5)).centered();

/// Pixel offset of a body label from the body center.
pub const BODY_LABEL_OFFSET: (f64, f64) = (8.0, 4.0);

/// Star disk radius for a magnitude; brighter stars are larger.
pub fn star_radius(magnitude: f64) -> f64 {
    ((6.0 - magnitude) * 0.6).max(0.5)
}

/// Solar-system bodies the sky-data service reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolarBody {
    Sun,
    Moon,
    Mercury,
    Venus,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
}

impl SolarBody {
    /// Identify a body by its service name (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        let body = match name.trim().to_ascii_lowercase().as_str() {
            "sun" => SolarBody::Sun,
            "moon" => SolarBody::Moon,
            "mercury" => SolarBody::Mercury,
            "venus" => SolarBody::Venus,
            "mars" => SolarBody::Mars,
            "jupiter" => SolarBody::Jupiter,
            "saturn" => SolarBody::Saturn,
            "uranus" => SolarBody::Uranus,
            "neptune" => SolarBody::Neptune,
            _ => return None,
        };
        Some(body)
    }

    pub fn style(self) -> BodyStyle {
        match self {
            SolarBody::Sun => BodyStyle::new(Rgba::rgb(0xff, 0xd7, 0x00), 10.0),
            SolarBody::Moon => BodyStyle::new(Rgba::rgb(0xf4, 0xf6, 0xf0), 8.0),
            SolarBody::Mars => BodyStyle::new(Rgba::rgb(0xff, 0x6b, 0x6b), 6.0),
            _ => BodyStyle::DEFAULT,
        }
    }
}

/// Marker appearance of a solar-system body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyStyle {
    pub color: Rgba,
    pub radius: f64,
}

impl BodyStyle {
    pub const DEFAULT: BodyStyle = BodyStyle::new(Rgba::rgb(0xdd, 0xdd, 0xdd), 5.0);

    pub const fn new(color: Rgba, radius: f64) -> Self {
        Self { color, radius }
    }

    /// Style for a body name; unknown names get [`BodyStyle::DEFAULT`].
    pub fn for_name(name: &str) -> Self {
        SolarBody::from_name(name)
            .map(SolarBody::style)
            .unwrap_or(Self::DEFAULT)
    }
}
