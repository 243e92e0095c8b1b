//! Metadata table definitions.
//!
//! The audit log and marker tables are part of the column contract other
//! tools read, so they are created here rather than trusted to the
//! warehouse DDL script. Both statements are create-if-absent.

use crate::error::{MetaError, MetaResult};
use bf_db::sql::quote_ident;
use duckdb::Connection;

/// Append-only load audit table
pub const LOAD_INFO_TABLE: &str = "meta_load_info";

/// One-row-per-table marker table
pub const LAST_UPDATE_TABLE: &str = "meta_last_update";

/// Ensure both metadata tables exist in `schema`.
pub fn ensure_meta_tables(conn: &Connection, schema: &str) -> MetaResult<()> {
    let s = quote_ident(schema);
    let sql = format!(
        "CREATE SCHEMA IF NOT EXISTS {s};
         CREATE SEQUENCE IF NOT EXISTS {s}.meta_load_info_seq;
         CREATE TABLE IF NOT EXISTS {s}.{LOAD_INFO_TABLE} (
             load_id        BIGINT NOT NULL DEFAULT nextval('{schema}.meta_load_info_seq'),
             run_date       VARCHAR NOT NULL,
             file_type      VARCHAR NOT NULL,
             file_name      VARCHAR,
             records_loaded BIGINT NOT NULL DEFAULT 0,
             load_status    VARCHAR NOT NULL,
             error_message  VARCHAR,
             loaded_at      TIMESTAMP NOT NULL
         );
         CREATE TABLE IF NOT EXISTS {s}.{LAST_UPDATE_TABLE} (
             table_name       VARCHAR PRIMARY KEY,
             last_update_date TIMESTAMP NOT NULL,
             last_update_type VARCHAR NOT NULL
         );"
    );
    conn.execute_batch(&sql)
        .map_err(|e| MetaError::SetupError(format!("{schema}: {e}")))?;
    log::debug!("Metadata tables ready in schema {schema}");
    Ok(())
}

#[cfg(test)]
#[path = "ddl_test.rs"]
mod tests;
