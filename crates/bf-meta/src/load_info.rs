//! Load audit log: one appended row per file-type attempt.
//!
//! Rows are never updated or deduplicated. Re-running a date appends new
//! rows next to the old ones; the table is the audit trail.

use crate::ddl::LOAD_INFO_TABLE;
use crate::error::{MetaResult, MetaResultExt};
use crate::timestamp::{format_ts, parse_ts, SQL_TS_FORMAT};
use bf_db::sql::quote_ident;
use chrono::NaiveDateTime;
use duckdb::Connection;

/// Outcome of loading one input file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    Success,
    Error,
}

impl LoadStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoadStatus::Success => "SUCCESS",
            LoadStatus::Error => "ERROR",
        }
    }
}

/// A load attempt to append.
#[derive(Debug, Clone)]
pub struct LoadRecord {
    /// `DDMMYYYY` run date key
    pub run_date: String,
    pub file_type: String,
    /// Base name of the input file
    pub file_name: Option<String>,
    pub records_loaded: i64,
    pub status: LoadStatus,
    pub error_message: Option<String>,
}

/// A stored audit row.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadInfoRow {
    pub load_id: i64,
    pub run_date: String,
    pub file_type: String,
    pub file_name: Option<String>,
    pub records_loaded: i64,
    pub load_status: String,
    pub error_message: Option<String>,
    pub loaded_at: NaiveDateTime,
}

/// Append one audit row.
pub fn record_load(
    conn: &Connection,
    schema: &str,
    record: &LoadRecord,
    at: NaiveDateTime,
) -> MetaResult<()> {
    let sql = format!(
        "INSERT INTO {}.{LOAD_INFO_TABLE}
             (run_date, file_type, file_name, records_loaded, load_status, error_message, loaded_at)
         VALUES (?, ?, ?, ?, ?, ?, CAST(? AS TIMESTAMP))",
        quote_ident(schema)
    );
    conn.execute(
        &sql,
        duckdb::params![
            record.run_date,
            record.file_type,
            record.file_name,
            record.records_loaded,
            record.status.as_str(),
            record.error_message,
            format_ts(at),
        ],
    )
    .query_context("insert meta_load_info")?;

    log::info!(
        "Recorded {} load of {} for {} ({} rows)",
        record.status.as_str(),
        record.file_type,
        record.run_date,
        record.records_loaded
    );
    Ok(())
}

/// Audit rows in insertion order, optionally for one run date.
pub fn load_history(
    conn: &Connection,
    schema: &str,
    run_date: Option<&str>,
) -> MetaResult<Vec<LoadInfoRow>> {
    let sql = format!(
        "SELECT load_id, run_date, file_type, file_name, records_loaded, load_status,
                error_message, strftime(loaded_at, '{SQL_TS_FORMAT}')
         FROM {}.{LOAD_INFO_TABLE}
         WHERE CAST(? AS VARCHAR) IS NULL OR run_date = ?
         ORDER BY load_id",
        quote_ident(schema)
    );
    let mut stmt = conn.prepare(&sql).query_context("prepare load_history")?;
    let raw = stmt
        .query_map(duckdb::params![run_date, run_date], |row| {
            Ok(RawLoadInfo {
                load_id: row.get(0)?,
                run_date: row.get(1)?,
                file_type: row.get(2)?,
                file_name: row.get(3)?,
                records_loaded: row.get(4)?,
                load_status: row.get(5)?,
                error_message: row.get(6)?,
                loaded_at: row.get(7)?,
            })
        })
        .query_context("query load_history")?
        .collect::<Result<Vec<_>, _>>()
        .query_context("read load_history")?;

    raw.into_iter()
        .map(|r| {
            Ok(LoadInfoRow {
                loaded_at: parse_ts(&r.loaded_at)?,
                load_id: r.load_id,
                run_date: r.run_date,
                file_type: r.file_type,
                file_name: r.file_name,
                records_loaded: r.records_loaded,
                load_status: r.load_status,
                error_message: r.error_message,
            })
        })
        .collect()
}

/// Row as read, before the timestamp text is parsed
struct RawLoadInfo {
    load_id: i64,
    run_date: String,
    file_type: String,
    file_name: Option<String>,
    records_loaded: i64,
    load_status: String,
    error_message: Option<String>,
    loaded_at: String,
}

#[cfg(test)]
#[path = "load_info_test.rs"]
mod tests;
