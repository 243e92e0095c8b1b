//! bf-db - Warehouse access layer for Bankflow
//!
//! Wraps the DuckDB connection used by a run: schema creation, atomic script
//! execution and all-text staging table writes.

pub mod error;
pub mod sql;
pub mod warehouse;

pub use error::{DbError, DbResult};
pub use warehouse::Warehouse;
