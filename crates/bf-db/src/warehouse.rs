//! DuckDB warehouse handle
//!
//! [`Warehouse`] owns the single DuckDB connection of a run. Every step
//! commits through its own short transaction, so a failure in a later step
//! leaves earlier steps' work in place.

use crate::error::{DbError, DbResult};
use crate::sql::{quote_ident, quote_qualified, split_qualified_name, split_statements};
use duckdb::Connection;
use std::path::Path;

/// Connection to the warehouse database.
///
/// Single-threaded; a run executes its steps one after another.
pub struct Warehouse {
    conn: Connection,
    path: String,
}

impl Warehouse {
    /// Create a new in-memory warehouse
    pub fn in_memory() -> DbResult<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| DbError::ConnectionError(e.to_string()))?;
        Ok(Self {
            conn,
            path: ":memory:".to_string(),
        })
    }

    /// Open (or create) a warehouse file
    pub fn from_path(path: &Path) -> DbResult<Self> {
        let conn = Connection::open(path)
            .map_err(|e| DbError::ConnectionError(format!("{e}: {}", path.display())))?;
        Ok(Self {
            conn,
            path: path.display().to_string(),
        })
    }

    /// Open from a path string (handles the `:memory:` special case)
    pub fn open(path: &str) -> DbResult<Self> {
        let warehouse = if path == ":memory:" {
            Self::in_memory()?
        } else {
            Self::from_path(Path::new(path))?
        };
        log::debug!("Opened warehouse {}", warehouse.path);
        Ok(warehouse)
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Borrow the underlying DuckDB connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Execute `body` within a `BEGIN` / `COMMIT` transaction, rolling back on
    /// error.
    pub fn transaction<F, T, E>(&self, body: F) -> Result<T, E>
    where
        F: FnOnce(&Connection) -> Result<T, E>,
        E: From<DbError>,
    {
        self.conn
            .execute_batch("BEGIN TRANSACTION")
            .map_err(|e| DbError::TransactionError(format!("BEGIN failed: {e}")))?;

        let result = body(&self.conn);

        match &result {
            Ok(_) => {
                if let Err(commit_err) = self.conn.execute_batch("COMMIT") {
                    let _ = self.conn.execute_batch("ROLLBACK");
                    return Err(
                        DbError::TransactionError(format!("COMMIT failed: {commit_err}")).into(),
                    );
                }
            }
            Err(_) => {
                let _ = self.conn.execute_batch("ROLLBACK");
            }
        }
        result
    }

    /// Execute SQL that modifies data, returns affected rows
    pub fn execute(&self, sql: &str) -> DbResult<usize> {
        self.conn
            .execute(sql, [])
            .map_err(|e| DbError::ExecutionError(format!("{e}: {sql}")))
    }

    /// Execute multiple SQL statements
    pub fn execute_batch(&self, sql: &str) -> DbResult<()> {
        self.conn.execute_batch(sql).map_err(DbError::from)
    }

    /// Execute query returning row count
    pub fn query_count(&self, sql: &str) -> DbResult<usize> {
        let count: i64 = self
            .conn
            .query_row(&format!("SELECT COUNT(*) FROM ({sql})"), [], |row| {
                row.get(0)
            })
            .map_err(DbError::from)?;
        Ok(count as usize)
    }

    /// Check if a table or view exists
    pub fn relation_exists(&self, name: &str) -> DbResult<bool> {
        let (schema, table) = split_qualified_name(name);
        let count: i64 = self
            .conn
            .query_row(
                "SELECT COUNT(*) FROM information_schema.tables WHERE table_schema = ? AND table_name = ?",
                duckdb::params![schema, table],
                |row| row.get(0),
            )
            .map_err(|e| DbError::ExecutionError(e.to_string()))?;
        Ok(count > 0)
    }

    /// Create a schema if it does not exist
    pub fn create_schema_if_not_exists(&self, schema: &str) -> DbResult<()> {
        self.execute_batch(&format!(
            "CREATE SCHEMA IF NOT EXISTS {}",
            quote_ident(schema)
        ))
    }

    /// Drop a table if it exists
    pub fn drop_table_if_exists(&self, name: &str) -> DbResult<()> {
        self.execute_batch(&format!("DROP TABLE IF EXISTS {}", quote_qualified(name)))
    }

    /// Run a multi-statement script atomically.
    ///
    /// Statements run in order inside one transaction; the first failure
    /// rolls back the whole script. Returns the number of statements run.
    pub fn run_script(&self, script: &str) -> DbResult<usize> {
        let statements = split_statements(script);
        log::debug!("Running script with {} statements", statements.len());

        self.transaction(|conn| {
            for (i, stmt) in statements.iter().enumerate() {
                let index = i + 1;
                log::debug!("Statement {index}: {}", preview(stmt));
                conn.execute_batch(stmt).map_err(|e| {
                    log::error!("Statement {index} failed: {e}\n{stmt}");
                    DbError::ScriptError {
                        index,
                        message: e.to_string(),
                    }
                })?;
            }
            Ok(statements.len())
        })
    }

    /// Replace `table` with an all-`VARCHAR` table holding `rows`.
    ///
    /// Drop-and-reload happens in one transaction: readers see either the
    /// previous content or the full new content. Every row must have exactly
    /// `columns.len()` values. Returns the number of rows written.
    pub fn replace_text_table(
        &self,
        table: &str,
        columns: &[String],
        rows: &[Vec<Option<String>>],
    ) -> DbResult<usize> {
        if columns.is_empty() {
            return Err(DbError::InvalidIdentifier(format!(
                "{table}: at least one column is required"
            )));
        }
        if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != columns.len()) {
            return Err(DbError::ExecutionError(format!(
                "{table}: row {} has {} values, expected {}",
                i + 1,
                row.len(),
                columns.len()
            )));
        }

        let target = quote_qualified(table);
        let column_defs: Vec<String> = columns
            .iter()
            .map(|c| format!("{} VARCHAR", quote_ident(c)))
            .collect();
        let create = format!("CREATE OR REPLACE TABLE {target} ({})", column_defs.join(", "));
        let placeholders = vec!["?"; columns.len()].join(", ");
        let insert = format!("INSERT INTO {target} VALUES ({placeholders})");

        self.transaction(|conn| {
            conn.execute_batch(&create)
                .map_err(|e| DbError::ExecutionError(format!("{e}: {create}")))?;
            let mut stmt = conn.prepare(&insert)?;
            for row in rows {
                stmt.execute(duckdb::params_from_iter(row.iter()))?;
            }
            Ok(rows.len())
        })
    }
}

fn preview(stmt: &str) -> String {
    let flat: String = stmt.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() > 60 {
        format!("{}...", flat.chars().take(60).collect::<String>())
    } else {
        flat
    }
}

#[cfg(test)]
#[path = "warehouse_test.rs"]
mod tests;
