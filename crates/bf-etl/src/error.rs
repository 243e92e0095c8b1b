//! Error types for bf-etl

use bf_core::CoreError;
use bf_db::DbError;
use bf_meta::MetaError;
use thiserror::Error;

/// Pipeline errors
#[derive(Error, Debug)]
pub enum EtlError {
    /// E001: Schema, table definitions or staging cleanup failed
    #[error("[E001] Database initialization failed: {0}")]
    SchemaInit(String),

    /// E002: Input file could not be read or parsed
    #[error("[E002] Failed to read '{path}': {message}")]
    FileRead { path: String, message: String },

    /// E003: No reader exists for the file's extension
    #[error("[E003] Unsupported file type: {path}")]
    UnsupportedFileType { path: String },

    /// E004: A transform script failed and was rolled back
    #[error("[E004] Step '{step}' failed: {message}")]
    Transform { step: String, message: String },

    /// E005: A SQL template could not be rendered
    #[error("[E005] Failed to render {script}: {message}")]
    Template { script: String, message: String },

    /// Core error
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Database error
    #[error(transparent)]
    Db(#[from] DbError),

    /// Metadata error
    #[error(transparent)]
    Meta(#[from] MetaError),
}

/// Result type alias for EtlError
pub type EtlResult<T> = Result<T, EtlError>;
