//! TrueType font loading and text metrics.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use rusttype::{point, Font, PositionedGlyph, Scale};

use super::surface::{FontRole, TextAlign, TextBaseline, TextStyle};
use super::RenderError;
use crate::config::FontConfig;

/// System locations probed when a role has no configured path.
const SANS_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];
const SANS_BOLD_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans-Bold.ttf",
    "/Library/Fonts/Arial Bold.ttf",
    "C:\\Windows\\Fonts\\arialbd.ttf",
];
const SERIF_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSerif.ttf",
    "/usr/share/fonts/TTF/DejaVuSerif.ttf",
    "/usr/share/fonts/dejavu/DejaVuSerif.ttf",
    "/Library/Fonts/Georgia.ttf",
    "C:\\Windows\\Fonts\\georgia.ttf",
];
const SERIF_ITALIC_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSerif-Italic.ttf",
    "/usr/share/fonts/TTF/DejaVuSerif-Italic.ttf",
    "/usr/share/fonts/dejavu/DejaVuSerif-Italic.ttf",
    "/Library/Fonts/Georgia Italic.ttf",
    "C:\\Windows\\Fonts\\georgiai.ttf",
];

/// Fonts for every [`FontRole`]; missing roles fall back to sans.
#[derive(Default)]
pub struct FontSet {
    sans: Option<Font<'static>>,
    sans_bold: Option<Font<'static>>,
    serif: Option<Font<'static>>,
    serif_italic: Option<Font<'static>>,
}

impl std::fmt::Debug for FontSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontSet")
            .field("sans", &self.sans.is_some())
            .field("sans_bold", &self.sans_bold.is_some())
            .field("serif", &self.serif.is_some())
            .field("serif_italic", &self.serif_italic.is_some())
            .finish()
    }
}

impl FontSet {
    /// A set with no fonts; text draws become no-ops.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load fonts from configured paths, probing system locations for
    /// roles left unset. A configured path that cannot be read is an error.
    pub fn load(config: &FontConfig) -> Result<Self, RenderError> {
        let set = Self {
            sans: load_role(config.sans.as_deref(), SANS_CANDIDATES)?,
            sans_bold: load_role(config.sans_bold.as_deref(), SANS_BOLD_CANDIDATES)?,
            serif: load_role(config.serif.as_deref(), SERIF_CANDIDATES)?,
            serif_italic: load_role(config.serif_italic.as_deref(), SERIF_ITALIC_CANDIDATES)?,
        };
        if set.sans.is_none() {
            warn!("No sans-serif font available; map text will be omitted");
        }
        debug!("Loaded fonts: {:?}", set);
        Ok(set)
    }

    /// Parse a font from raw TrueType bytes.
    pub fn with_font(mut self, role: FontRole, bytes: Vec<u8>) -> Result<Self, RenderError> {
        let font = Font::try_from_vec(bytes)
            .ok_or_else(|| RenderError::Font(format!("invalid font data for {:?}", role)))?;
        match role {
            FontRole::Sans => self.sans = Some(font),
            FontRole::SansBold => self.sans_bold = Some(font),
            FontRole::Serif => self.serif = Some(font),
            FontRole::SerifItalic => self.serif_italic = Some(font),
        }
        Ok(self)
    }

    pub fn has_text(&self) -> bool {
        self.sans.is_some()
    }

    /// Font for a role, falling back toward sans.
    pub fn font(&self, role: FontRole) -> Option<&Font<'static>> {
        let preferred = match role {
            FontRole::Sans => None,
            FontRole::SansBold => self.sans_bold.as_ref(),
            FontRole::Serif => self.serif.as_ref(),
            FontRole::SerifItalic => self.serif_italic.as_ref().or(self.serif.as_ref()),
        };
        preferred.or(self.sans.as_ref())
    }

    /// Advance width of `text` in pixels; zero when no font is loaded.
    pub fn text_width(&self, text: &str, style: &TextStyle) -> f32 {
        match self.font(style.role) {
            Some(font) => layout_width(font, Scale::uniform(style.size), text),
            None => 0.0,
        }
    }

    /// Glyphs of `text` positioned so that `(x, y)` is the style's anchor.
    pub fn layout(&self, text: &str, x: f32, y: f32, style: &TextStyle) -> Vec<PositionedGlyph<'static>> {
        let Some(font) = self.font(style.role) else {
            return Vec::new();
        };
        let scale = Scale::uniform(style.size);
        let width = layout_width(font, scale, text);
        let start_x = match style.align {
            TextAlign::Start => x,
            TextAlign::Center => x - width / 2.0,
        };
        let v_metrics = font.v_metrics(scale);
        let baseline_y = match style.baseline {
            TextBaseline::Alphabetic => y,
            // Center of the em box sits on y
            TextBaseline::Middle => y + (v_metrics.ascent + v_metrics.descent) / 2.0,
        };
        font.layout(text, scale, point(start_x, baseline_y)).collect()
    }
}

fn layout_width(font: &Font<'static>, scale: Scale, text: &str) -> f32 {
    font.layout(text, scale, point(0.0, 0.0))
        .last()
        .map(|g| g.position().x + g.unpositioned().h_metrics().advance_width)
        .unwrap_or(0.0)
}

fn load_role(configured: Option<&Path>, candidates: &[&str]) -> Result<Option<Font<'static>>, RenderError> {
    if let Some(path) = configured {
        return read_font(path).map(Some);
    }
    for candidate in candidates {
        let path = PathBuf::from(candidate);
        if path.exists() {
            match read_font(&path) {
                Ok(font) => return Ok(Some(font)),
                Err(e) => warn!("Skipping font {}: {}", path.display(), e),
            }
        }
    }
    Ok(None)
}

fn read_font(path: &Path) -> Result<Font<'static>, RenderError> {
    let bytes = fs::read(path)
        .map_err(|e| RenderError::Font(format!("failed to read {}: {}", path.display(), e)))?;
    Font::try_from_vec(bytes)
        .ok_or_else(|| RenderError::Font(format!("{} is not a TrueType font", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::surface::Rgba;

    #[test]
    fn test_empty_set_measures_zero() {
        let fonts = FontSet::empty();
        let style = TextStyle::new(FontRole::Sans, 12.0, Rgba::WHITE);
        assert!(!fonts.has_text());
        assert_eq!(fonts.text_width("Moon", &style), 0.0);
        assert!(fonts.layout("Moon", 0.0, 0.0, &style).is_empty());
    }

    #[test]
    fn test_invalid_bytes_rejected() {
        let result = FontSet::empty().with_font(FontRole::Sans, vec![0u8; 16]);
        assert!(matches!(result, Err(RenderError::Font(_))));
    }

    #[test]
    fn test_missing_configured_path_is_an_error() {
        let config = FontConfig {
            sans: Some(PathBuf::from("/nonexistent/font.ttf")),
            ..FontConfig::default()
        };
        let err = FontSet::load(&config).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/font.ttf"));
    }
}
