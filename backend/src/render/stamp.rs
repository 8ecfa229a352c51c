//! Date and location line printed under the dedication.

use chrono::{DateTime, FixedOffset, Locale};

use crate::models::RenderRequest;

/// Copyright line drawn at the bottom of every map.
pub const WATERMARK: &str = "© 2026 Starlight Project";

/// Spanish long date, e.g. `DOMINGO, 25 DE ENERO DE 2026`.
pub fn format_long_date(datetime: &DateTime<FixedOffset>) -> String {
    datetime
        .format_localized("%A, %-d de %B de %Y", Locale::es_ES)
        .to_string()
        .to_uppercase()
}

/// `20.69° N, 88.20° W`
pub fn format_location(lat: f64, lon: f64) -> String {
    let ns = if lat < 0.0 { 'S' } else { 'N' };
    let ew = if lon < 0.0 { 'W' } else { 'E' };
    format!("{:.2}° {}, {:.2}° {}", lat.abs(), ns, lon.abs(), ew)
}

/// Stamp for the request that was submitted, not the live form.
pub fn format_stamp(request: &RenderRequest) -> String {
    format!(
        "{} | {}",
        format_long_date(&request.datetime),
        format_location(request.lat, request.lon)
    )
}
