//! Star map rendering.
//!
//! Geometry ([`projection`]) and line breaking ([`text_layout`]) are pure
//! functions. [`scene::SceneRenderer`] paints a full map onto any
//! [`Surface`]; [`raster::PixmapSurface`] is the tiny-skia implementation
//! used for previews and exports.

pub mod fonts;
pub mod projection;
pub mod raster;
pub mod scene;
pub mod stamp;
pub mod style;
pub mod surface;
pub mod text_layout;

pub use fonts::FontSet;
pub use projection::{compass_point, project, ScreenPoint};
pub use raster::PixmapSurface;
pub use scene::{CanvasLayout, RenderStats, SceneRenderer};
pub use surface::{FontRole, LineStyle, Rgba, Surface, TextAlign, TextBaseline, TextStyle};
pub use text_layout::{wrap_by_chars, wrap_by_width, wrap_message, TextMeasure};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Font error: {0}")]
    Font(String),

    #[error("Cannot allocate a {width}x{height} surface")]
    SurfaceAllocation { width: u32, height: u32 },

    #[error("Render task failed: {0}")]
    Task(String),
}
