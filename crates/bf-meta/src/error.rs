//! Error types for load metadata.

use thiserror::Error;

/// Metadata errors.
#[derive(Error, Debug)]
pub enum MetaError {
    /// Creating the metadata tables failed (M001).
    #[error("[M001] Metadata table setup failed: {0}")]
    SetupError(String),

    /// Writing or reading a metadata row failed (M002).
    #[error("[M002] Metadata query failed: {0}")]
    QueryError(String),

    /// A stored timestamp could not be read back (M003).
    #[error("[M003] Unreadable timestamp '{0}'")]
    InvalidTimestamp(String),
}

/// Result type alias for [`MetaError`].
pub type MetaResult<T> = Result<T, MetaError>;

/// Attach a short operation label to driver errors.
pub(crate) trait MetaResultExt<T> {
    fn query_context(self, what: &str) -> MetaResult<T>;
}

impl<T> MetaResultExt<T> for Result<T, duckdb::Error> {
    fn query_context(self, what: &str) -> MetaResult<T> {
        self.map_err(|e| MetaError::QueryError(format!("{what}: {e}")))
    }
}
