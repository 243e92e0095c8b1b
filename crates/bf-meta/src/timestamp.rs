//! Timestamp text exchange with DuckDB.
//!
//! Timestamps cross the driver boundary as text so no driver-side chrono
//! integration is needed.

use crate::error::{MetaError, MetaResult};
use chrono::NaiveDateTime;

/// `strftime` pattern used when reading timestamps back
pub const SQL_TS_FORMAT: &str = "%Y-%m-%d %H:%M:%S.%f";

const CHRONO_TS_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

pub fn format_ts(at: NaiveDateTime) -> String {
    at.format(CHRONO_TS_FORMAT).to_string()
}

pub fn parse_ts(text: &str) -> MetaResult<NaiveDateTime> {
    NaiveDateTime::parse_from_str(text, CHRONO_TS_FORMAT)
        .map_err(|_| MetaError::InvalidTimestamp(text.to_string()))
}
