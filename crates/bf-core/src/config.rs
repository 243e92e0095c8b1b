//! Configuration types and parsing for config.json

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default config file name looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "config.json";

/// Main pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Warehouse connection settings
    pub db: DatabaseConfig,

    /// Filesystem locations
    pub paths: PathsConfig,
}

/// Warehouse connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    /// Path to the DuckDB file, or `:memory:`
    pub path: String,

    /// Schema holding every pipeline table
    #[serde(default = "default_schema")]
    pub schema: String,
}

/// Directories the pipeline reads from and writes to
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PathsConfig {
    /// Directory scanned for the day's input files
    pub files_dir: PathBuf,

    /// Directory receiving processed files as `.backup`
    pub archive_dir: PathBuf,

    /// Directory containing `create_tables.sql`
    pub ddl_sql: PathBuf,

    /// Directory containing the load and report scripts
    pub dml_sql: PathBuf,
}

fn default_schema() -> String {
    "bank".to_string()
}

impl Config {
    /// Load configuration from a file path.
    ///
    /// Relative paths inside the file are resolved against the file's
    /// directory, so a run does not depend on the caller's working directory.
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.is_file() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        let mut config = Self::from_json(&content).map_err(|e| match e {
            CoreError::ConfigParseError { message, .. } => CoreError::ConfigParseError {
                path: path.display().to_string(),
                message,
            },
            other => other,
        })?;

        let base = path.parent().unwrap_or_else(|| Path::new(""));
        config.resolve_relative_to(base);
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse and validate configuration from JSON text.
    pub fn from_json(content: &str) -> CoreResult<Self> {
        let config: Config =
            serde_json::from_str(content).map_err(|e| CoreError::ConfigParseError {
                path: "<inline>".to_string(),
                message: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Whether the warehouse lives only in process memory
    pub fn is_in_memory(&self) -> bool {
        self.db.path == ":memory:"
    }

    /// Name DuckDB gives the attached database: the file stem, or `memory`.
    pub fn catalog_name(&self) -> String {
        if self.is_in_memory() {
            return "memory".to_string();
        }
        Path::new(&self.db.path)
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    fn resolve_relative_to(&mut self, base: &Path) {
        let resolve = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };
        resolve(&mut self.paths.files_dir);
        resolve(&mut self.paths.archive_dir);
        resolve(&mut self.paths.ddl_sql);
        resolve(&mut self.paths.dml_sql);

        if !self.is_in_memory() && Path::new(&self.db.path).is_relative() {
            self.db.path = base.join(&self.db.path).display().to_string();
        }
    }

    fn validate(&self) -> CoreResult<()> {
        if self.db.path.trim().is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "db.path cannot be empty".to_string(),
            });
        }

        if !is_identifier(&self.db.schema) {
            return Err(CoreError::ConfigInvalid {
                message: format!(
                    "db.schema '{}' must be a plain identifier (letters, digits, underscore)",
                    self.db.schema
                ),
            });
        }

        // A schema named like the catalog makes `schema.table` ambiguous.
        let catalog = self.catalog_name();
        if catalog.eq_ignore_ascii_case(&self.db.schema) {
            return Err(CoreError::ConfigInvalid {
                message: format!(
                    "db.schema '{}' clashes with the database name '{catalog}' taken from db.path; \
                     rename the database file or the schema",
                    self.db.schema
                ),
            });
        }

        let paths = [
            ("paths.files_dir", &self.paths.files_dir),
            ("paths.archive_dir", &self.paths.archive_dir),
            ("paths.ddl_sql", &self.paths.ddl_sql),
            ("paths.dml_sql", &self.paths.dml_sql),
        ];
        for (name, value) in paths {
            if value.as_os_str().is_empty() {
                return Err(CoreError::ConfigInvalid {
                    message: format!("{name} cannot be empty"),
                });
            }
        }

        Ok(())
    }
}

/// Schema and table names are spliced into SQL text, so only plain
/// identifiers are allowed.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
