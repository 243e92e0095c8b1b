//! Error types for bf-core

use thiserror::Error;

/// Core error type for Bankflow
#[derive(Error, Debug)]
pub enum CoreError {
    /// B001: Configuration file not found
    #[error("[B001] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// B002: Failed to parse configuration file
    #[error("[B002] Failed to parse config {path}: {message}")]
    ConfigParseError { path: String, message: String },

    /// B003: Invalid configuration value
    #[error("[B003] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// B010: Date argument matches none of the accepted layouts
    #[error("[B010] Unsupported date format '{input}'. Use DDMMYYYY, DD-MM-YYYY, DD.MM.YYYY, DD/MM/YYYY or a two-digit year")]
    InvalidDateFormat { input: String },

    /// B011: Date argument parsed but a component is out of range
    #[error("[B011] Invalid {component} in date '{input}': {value}")]
    InvalidDateValue {
        input: String,
        component: &'static str,
        value: u32,
    },

    /// B020: None of the expected input files exist for the run date
    #[error("[B020] No input files found for date {date} in {dir}")]
    NoInputFiles { date: String, dir: String },

    /// B030: Moving a processed file into the archive failed
    #[error("[B030] Failed to archive '{path}': {source}")]
    ArchiveError {
        path: String,
        source: std::io::Error,
    },

    /// B040: Another run holds the warehouse lock
    #[error("[B040] Warehouse is locked by another run ({holder}); remove {path} if that run is gone")]
    RunLocked { path: String, holder: String },

    /// B051: IO error with file path context
    #[error("[B051] Failed to access '{path}': {source}")]
    IoWithPath {
        path: String,
        source: std::io::Error,
    },
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;
