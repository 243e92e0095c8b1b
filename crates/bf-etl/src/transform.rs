//! Historization, fact merge and report steps
//!
//! Each step is one SQL script from the DML directory, rendered with the run
//! date and executed atomically. A successful step stamps the marker of the
//! table it writes.

use crate::error::{EtlError, EtlResult};
use crate::template::render_sql_file;
use bf_core::{FileType, RunDate};
use bf_db::Warehouse;
use bf_meta::{touch_last_update, UpdateCategory};
use chrono::NaiveDateTime;
use std::fmt;
use std::path::Path;

/// A transform step, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransformStep {
    TerminalsDimension,
    TransactionFacts,
    BlacklistFacts,
    FraudReport,
}

impl TransformStep {
    pub const ALL: [TransformStep; 4] = [
        TransformStep::TerminalsDimension,
        TransformStep::TransactionFacts,
        TransformStep::BlacklistFacts,
        TransformStep::FraudReport,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            TransformStep::TerminalsDimension => "load terminals dimension",
            TransformStep::TransactionFacts => "load transaction facts",
            TransformStep::BlacklistFacts => "load blacklist facts",
            TransformStep::FraudReport => "build fraud report",
        }
    }

    /// Script file name inside the DML directory
    pub fn script(&self) -> &'static str {
        match self {
            TransformStep::TerminalsDimension => "load_dimensions.sql",
            TransformStep::TransactionFacts => "load_fact_transactions.sql",
            TransformStep::BlacklistFacts => "load_fact_blacklist.sql",
            TransformStep::FraudReport => "build_fraud_report.sql",
        }
    }

    /// Staging input the step consumes, if any
    pub fn requires(&self) -> Option<FileType> {
        match self {
            TransformStep::TerminalsDimension => Some(FileType::Terminals),
            TransformStep::TransactionFacts => Some(FileType::Transactions),
            TransformStep::BlacklistFacts => Some(FileType::Blacklist),
            TransformStep::FraudReport => None,
        }
    }

    /// Table whose marker the step updates
    pub fn target_table(&self) -> &'static str {
        match self {
            TransformStep::TerminalsDimension => "dwh_dim_terminals_hist",
            TransformStep::TransactionFacts => "dwh_fact_transactions",
            TransformStep::BlacklistFacts => "dwh_fact_passport_blacklist",
            TransformStep::FraudReport => "rep_fraud",
        }
    }

    pub fn category(&self) -> UpdateCategory {
        match self {
            TransformStep::TerminalsDimension => UpdateCategory::Dimensions,
            TransformStep::TransactionFacts | TransformStep::BlacklistFacts => {
                UpdateCategory::Facts
            }
            TransformStep::FraudReport => UpdateCategory::Report,
        }
    }
}

impl fmt::Display for TransformStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What happened to a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Script ran and committed
    Applied,
    /// The staging input was absent or empty this run
    NotStaged,
    /// No script file in the DML directory
    NoScript,
}

/// Run one step's script for `date`, then stamp its marker with `at`.
///
/// A missing script is not an error: the step is reported as
/// [`StepOutcome::NoScript`] and its marker is left alone.
pub fn run_step(
    warehouse: &Warehouse,
    schema: &str,
    dml_dir: &Path,
    step: TransformStep,
    date: &RunDate,
    at: NaiveDateTime,
) -> EtlResult<StepOutcome> {
    let script_path = dml_dir.join(step.script());
    if !script_path.is_file() {
        log::warn!(
            "Skipping {step}: script {} not found",
            script_path.display()
        );
        return Ok(StepOutcome::NoScript);
    }

    log::info!("Running {step} for {}", date.iso());
    let sql = render_sql_file(&script_path, schema, Some(date))?;
    let step_error = |message: String| {
        log::error!("{step} failed: {message}");
        EtlError::Transform {
            step: step.name().to_string(),
            message,
        }
    };

    warehouse
        .run_script(&sql)
        .map_err(|e| step_error(e.to_string()))?;
    touch_last_update(
        warehouse.conn(),
        schema,
        step.target_table(),
        step.category(),
        at,
    )
    .map_err(|e| step_error(e.to_string()))?;

    log::info!("Finished {step}");
    Ok(StepOutcome::Applied)
}

#[cfg(test)]
#[path = "transform_test.rs"]
mod tests;
