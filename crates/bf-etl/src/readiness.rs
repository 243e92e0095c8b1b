//! Database readiness
//!
//! Runs at the start of every run, before anything is staged: creates the
//! schema, applies the table definition script, creates the metadata tables
//! and drops staging tables left behind by an earlier run. Every statement is
//! create-if-absent, so applying it to an existing warehouse is a no-op.

use crate::error::{EtlError, EtlResult};
use crate::template::render_sql_file;
use bf_core::FileType;
use bf_db::Warehouse;
use bf_meta::ensure_meta_tables;
use std::path::Path;

/// Table definition script inside the DDL directory
pub const CREATE_TABLES_SCRIPT: &str = "create_tables.sql";

/// Bring the warehouse to a loadable state.
pub fn ensure_ready(warehouse: &Warehouse, schema: &str, ddl_dir: &Path) -> EtlResult<()> {
    let fail = |what: &str, e: &dyn std::fmt::Display| {
        log::error!("Database initialization failed at {what}: {e}");
        EtlError::SchemaInit(format!("{what}: {e}"))
    };

    warehouse
        .create_schema_if_not_exists(schema)
        .map_err(|e| fail("create schema", &e))?;

    let script_path = ddl_dir.join(CREATE_TABLES_SCRIPT);
    let script = render_sql_file(&script_path, schema, None)
        .map_err(|e| fail(CREATE_TABLES_SCRIPT, &e))?;
    let statements = warehouse
        .run_script(&script)
        .map_err(|e| fail(CREATE_TABLES_SCRIPT, &e))?;
    log::debug!("Applied {statements} table definitions");

    ensure_meta_tables(warehouse.conn(), schema).map_err(|e| fail("metadata tables", &e))?;

    for file_type in FileType::ALL {
        let table = format!("{schema}.{}", file_type.staging_table());
        warehouse
            .drop_table_if_exists(&table)
            .map_err(|e| fail("staging cleanup", &e))?;
    }

    log::info!("Database ready (schema {schema})");
    Ok(())
}

#[cfg(test)]
#[path = "readiness_test.rs"]
mod tests;
