//! bf-etl - Daily load pipeline for Bankflow
//!
//! Stages the day's input files, historizes terminals, merges transaction and
//! blacklist facts, rebuilds the fraud report and archives what was loaded.

pub mod error;
pub mod pipeline;
pub mod readiness;
pub mod report;
pub mod staging;
pub mod template;
pub mod transform;

pub use error::{EtlError, EtlResult};
pub use pipeline::{Pipeline, RunStage, RunSummary};
pub use report::{count_by_event_type, fraud_report, FraudReportRow};
pub use staging::{load_staging, read_file, StagedData};
pub use transform::{StepOutcome, TransformStep};
