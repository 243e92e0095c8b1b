//! bf-core - Core library for Bankflow
//!
//! Shared types used by every stage of a daily warehouse run: the run date
//! key, configuration, input file discovery, archiving and the run lock.

pub mod archive;
pub mod config;
pub mod error;
pub mod input;
pub mod lock;
pub mod run_date;

pub use archive::{archive_file, BACKUP_SUFFIX};
pub use config::Config;
pub use error::{CoreError, CoreResult};
pub use input::{locate_inputs, FileFormat, FileType, InputFiles};
pub use lock::RunLock;
pub use run_date::{normalize, RunDate};
