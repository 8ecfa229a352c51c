//! Inputs of one rendering pass.

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::SessionError;

/// Wire format of `datetime_utc` in sky-data requests.
pub const UTC_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Accepted formats for the local date/time form field.
const LOCAL_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];

/// Everything one render needs, captured when the form is submitted.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderRequest {
    /// Observation instant in the submitter's local time.
    pub datetime: DateTime<FixedOffset>,
    pub lat: f64,
    pub lon: f64,
    pub recipient: String,
    pub message: String,
}

impl RenderRequest {
    /// Observation instant formatted for the sky-data service.
    pub fn datetime_utc(&self) -> String {
        self.datetime.with_timezone(&Utc).format(UTC_FORMAT).to_string()
    }

    /// Body of the sky-data request.
    pub fn sky_query(&self) -> SkyDataRequest {
        SkyDataRequest {
            lat: self.lat,
            lon: self.lon,
            datetime_utc: self.datetime_utc(),
        }
    }
}

/// JSON body posted to the sky-data service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkyDataRequest {
    pub lat: f64,
    pub lon: f64,
    pub datetime_utc: String,
}

/// Parse the local date/time field and attach the submitter's UTC offset.
///
/// `utc_offset_minutes` is east-positive (UTC-6 is `-360`).
pub fn parse_local_datetime(
    value: &str,
    utc_offset_minutes: i32,
) -> Result<DateTime<FixedOffset>, SessionError> {
    let invalid = || SessionError::InvalidDateTime(value.to_string());

    let naive = LOCAL_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value.trim(), fmt).ok())
        .ok_or_else(invalid)?;
    let offset = FixedOffset::east_opt(utc_offset_minutes * 60).ok_or_else(invalid)?;

    offset.from_local_datetime(&naive).single().ok_or_else(invalid)
}
