//! Fraud report read access

use crate::error::EtlResult;
use bf_core::RunDate;
use bf_db::sql::quote_ident;
use bf_db::{DbError, Warehouse};
use bf_meta::timestamp::{parse_ts, SQL_TS_FORMAT};
use chrono::NaiveDateTime;
use std::collections::BTreeMap;

/// Report table rebuilt by the report step
pub const REPORT_TABLE: &str = "rep_fraud";

/// One suspicious event.
#[derive(Debug, Clone, PartialEq)]
pub struct FraudReportRow {
    pub event_dt: NaiveDateTime,
    pub passport: Option<String>,
    pub fio: Option<String>,
    pub phone: Option<String>,
    pub event_type: String,
    pub report_dt: NaiveDateTime,
}

/// Report rows, newest event first, optionally limited to events on `date`.
pub fn fraud_report(
    warehouse: &Warehouse,
    schema: &str,
    date: Option<&RunDate>,
) -> EtlResult<Vec<FraudReportRow>> {
    let sql = format!(
        "SELECT strftime(event_dt, '{SQL_TS_FORMAT}'), passport, fio, phone, event_type,
                strftime(report_dt, '{SQL_TS_FORMAT}')
         FROM {}.{REPORT_TABLE}
         WHERE CAST(? AS VARCHAR) IS NULL OR CAST(event_dt AS DATE) = CAST(? AS DATE)
         ORDER BY event_dt DESC, passport",
        quote_ident(schema)
    );
    let day = date.map(|d| d.iso());

    let mut stmt = warehouse.conn().prepare(&sql).map_err(DbError::from)?;
    let raw = stmt
        .query_map(duckdb::params![day, day], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, Option<String>>(1)?,
                row.get::<_, Option<String>>(2)?,
                row.get::<_, Option<String>>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, String>(5)?,
            ))
        })
        .map_err(DbError::from)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(DbError::from)?;

    let mut rows = Vec::with_capacity(raw.len());
    for (event_dt, passport, fio, phone, event_type, report_dt) in raw {
        rows.push(FraudReportRow {
            event_dt: parse_ts(&event_dt)?,
            passport,
            fio,
            phone,
            event_type,
            report_dt: parse_ts(&report_dt)?,
        });
    }
    Ok(rows)
}

/// Number of rows per event type, ordered by type.
pub fn count_by_event_type(rows: &[FraudReportRow]) -> BTreeMap<&str, usize> {
    let mut counts = BTreeMap::new();
    for row in rows {
        *counts.entry(row.event_type.as_str()).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
#[path = "report_test.rs"]
mod tests;
