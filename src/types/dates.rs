use crate::types::errors::DateFormatError;
use chrono::{DateTime, NaiveDate, NaiveDateTime};

const COMPACT_FORMAT: &str = "%Y%m%d";
const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%d/%m/%Y"];
const DATE_TIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Renders a date the way the bank file expects it (`YYYYMMDD`).
pub fn compact(date: NaiveDate) -> String {
    date.format(COMPACT_FORMAT).to_string()
}

/// Parses the date layouts the expense backend is known to emit.
pub fn parse_date(value: &str) -> Result<NaiveDate, DateFormatError> {
    let value = value.trim();

    if let Ok(date_time) = DateTime::parse_from_rfc3339(value) {
        return Ok(date_time.date_naive());
    }

    DATE_FORMATS.iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
        .or_else(|| DATE_TIME_FORMATS.iter()
            .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
            .map(|date_time| date_time.date()))
        .ok_or_else(|| DateFormatError { value: value.to_string() })
}

pub fn format_compact_date(value: &str) -> Result<String, DateFormatError> {
    parse_date(value).map(compact)
}
