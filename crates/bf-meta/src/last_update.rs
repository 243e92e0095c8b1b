//! Last-update markers: one row per target table, last writer wins.

use crate::ddl::LAST_UPDATE_TABLE;
use crate::error::{MetaError, MetaResult, MetaResultExt};
use crate::timestamp::{format_ts, parse_ts, SQL_TS_FORMAT};
use bf_db::sql::quote_ident;
use chrono::NaiveDateTime;
use duckdb::Connection;
use std::fmt;

/// Kind of warehouse table a marker belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateCategory {
    Dimensions,
    Facts,
    Report,
}

impl UpdateCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            UpdateCategory::Dimensions => "dimensions",
            UpdateCategory::Facts => "facts",
            UpdateCategory::Report => "report",
        }
    }
}

impl fmt::Display for UpdateCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored marker.
#[derive(Debug, Clone, PartialEq)]
pub struct LastUpdate {
    pub table_name: String,
    pub last_update_date: NaiveDateTime,
    pub last_update_type: String,
}

/// Set or replace the marker for `table`.
pub fn touch_last_update(
    conn: &Connection,
    schema: &str,
    table: &str,
    category: UpdateCategory,
    at: NaiveDateTime,
) -> MetaResult<()> {
    let sql = format!(
        "INSERT INTO {}.{LAST_UPDATE_TABLE} (table_name, last_update_date, last_update_type)
         VALUES (?, CAST(? AS TIMESTAMP), ?)
         ON CONFLICT (table_name) DO UPDATE SET
             last_update_date = EXCLUDED.last_update_date,
             last_update_type = EXCLUDED.last_update_type",
        quote_ident(schema)
    );
    conn.execute(
        &sql,
        duckdb::params![table, format_ts(at), category.as_str()],
    )
    .query_context("upsert meta_last_update")?;
    log::debug!("Marked {table} updated ({category})");
    Ok(())
}

/// Marker for one table, if it was ever updated.
pub fn last_update(conn: &Connection, schema: &str, table: &str) -> MetaResult<Option<LastUpdate>> {
    let sql = format!(
        "SELECT table_name, strftime(last_update_date, '{SQL_TS_FORMAT}'), last_update_type
         FROM {}.{LAST_UPDATE_TABLE} WHERE table_name = ?",
        quote_ident(schema)
    );
    let found = conn.query_row(&sql, duckdb::params![table], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
        ))
    });

    let (table_name, ts, last_update_type) = match found {
        Ok(r) => r,
        Err(duckdb::Error::QueryReturnedNoRows) => return Ok(None),
        Err(e) => {
            return Err(MetaError::QueryError(format!(
                "read meta_last_update: {e}"
            )))
        }
    };

    Ok(Some(LastUpdate {
        table_name,
        last_update_date: parse_ts(&ts)?,
        last_update_type,
    }))
}

/// All markers ordered by table name.
pub fn all_last_updates(conn: &Connection, schema: &str) -> MetaResult<Vec<LastUpdate>> {
    let sql = format!(
        "SELECT table_name, strftime(last_update_date, '{SQL_TS_FORMAT}'), last_update_type
         FROM {}.{LAST_UPDATE_TABLE} ORDER BY table_name",
        quote_ident(schema)
    );
    let mut stmt = conn.prepare(&sql).query_context("prepare all_last_updates")?;
    let raw = stmt
        .query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
            ))
        })
        .query_context("query all_last_updates")?
        .collect::<Result<Vec<_>, _>>()
        .query_context("read all_last_updates")?;

    raw.into_iter()
        .map(|(table_name, ts, last_update_type)| {
            Ok(LastUpdate {
                table_name,
                last_update_date: parse_ts(&ts)?,
                last_update_type,
            })
        })
        .collect()
}

#[cfg(test)]
#[path = "last_update_test.rs"]
mod tests;
