//! Run orchestration
//!
//! One [`Pipeline::run`] processes one date:
//!
//! 1. locate the input files (nothing else happens if there are none)
//! 2. take the warehouse lock and open the database
//! 3. make the database ready
//! 4. stage each present file, writing an audit row per file
//! 5. run the dimension, fact and report steps
//! 6. archive the input files
//!
//! Any failure before archiving aborts the run. The files that did not
//! already get an ERROR audit row get one on the way out.

use crate::error::EtlResult;
use crate::readiness::ensure_ready;
use crate::report::{fraud_report, FraudReportRow, REPORT_TABLE};
use crate::staging::load_staging;
use crate::transform::{run_step, StepOutcome, TransformStep};
use bf_core::{archive_file, locate_inputs, Config, FileType, InputFiles, RunDate, RunLock};
use bf_db::Warehouse;
use bf_meta::{record_load, LoadRecord, LoadStatus};
use chrono::{Local, NaiveDateTime};
use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};

/// Position of a run in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RunStage {
    Init,
    FilesLocated,
    DbReady,
    Staged,
    DimensionsLoaded,
    FactsLoaded,
    ReportBuilt,
    Archived,
    Done,
    Errored,
}

impl fmt::Display for RunStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RunStage::Init => "init",
            RunStage::FilesLocated => "files located",
            RunStage::DbReady => "database ready",
            RunStage::Staged => "staged",
            RunStage::DimensionsLoaded => "dimensions loaded",
            RunStage::FactsLoaded => "facts loaded",
            RunStage::ReportBuilt => "report built",
            RunStage::Archived => "archived",
            RunStage::Done => "done",
            RunStage::Errored => "errored",
        };
        f.write_str(s)
    }
}

/// What a finished run did.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub run_date: RunDate,
    pub stage: RunStage,
    /// Rows staged per file type, in processing order
    pub staged: Vec<(FileType, usize)>,
    pub steps: Vec<(TransformStep, StepOutcome)>,
    pub archived: Vec<PathBuf>,
    pub archive_failures: Vec<(PathBuf, String)>,
    /// Report rows with events on the run date
    pub report: Vec<FraudReportRow>,
}

impl RunSummary {
    fn new(run_date: RunDate) -> Self {
        Self {
            run_date,
            stage: RunStage::Init,
            staged: Vec::new(),
            steps: Vec::new(),
            archived: Vec::new(),
            archive_failures: Vec::new(),
            report: Vec::new(),
        }
    }

    /// Rows staged for `file_type` in this run
    pub fn staged_rows(&self, file_type: FileType) -> Option<usize> {
        self.staged
            .iter()
            .find(|(t, _)| *t == file_type)
            .map(|(_, n)| *n)
    }

    pub fn outcome(&self, step: TransformStep) -> Option<StepOutcome> {
        self.steps
            .iter()
            .find(|(s, _)| *s == step)
            .map(|(_, o)| *o)
    }

    fn advance(&mut self, stage: RunStage) {
        log::debug!("Run {}: {} -> {}", self.run_date, self.stage, stage);
        self.stage = stage;
    }
}

/// Per-run bookkeeping that does not outlive the run
struct RunState {
    summary: RunSummary,
    /// File types that already have an ERROR audit row from this run
    error_recorded: HashSet<FileType>,
}

/// Daily load pipeline for one warehouse.
pub struct Pipeline {
    config: Config,
}

impl Pipeline {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    fn schema(&self) -> &str {
        &self.config.db.schema
    }

    /// Process every input file of `date`.
    pub fn run(&self, date: &RunDate) -> EtlResult<RunSummary> {
        log::info!("Starting run for {date}");
        let mut state = RunState {
            summary: RunSummary::new(*date),
            error_recorded: HashSet::new(),
        };

        let files = locate_inputs(&self.config.paths.files_dir, date)?;
        state.summary.advance(RunStage::FilesLocated);

        let _lock = if self.config.is_in_memory() {
            None
        } else {
            Some(RunLock::acquire(Path::new(&self.config.db.path), date)?)
        };
        let warehouse = Warehouse::open(&self.config.db.path)?;

        match self.process(&warehouse, date, &files, &mut state) {
            Ok(()) => {
                state.summary.advance(RunStage::Done);
                log::info!("Run for {date} finished");
                Ok(state.summary)
            }
            Err(e) => {
                log::error!(
                    "Run for {date} failed after stage '{}': {e}",
                    state.summary.stage
                );
                state.summary.advance(RunStage::Errored);
                self.record_failures(&warehouse, date, &files, &state, &e.to_string());
                Err(e)
            }
        }
    }

    fn process(
        &self,
        warehouse: &Warehouse,
        date: &RunDate,
        files: &InputFiles,
        state: &mut RunState,
    ) -> EtlResult<()> {
        ensure_ready(warehouse, self.schema(), &self.config.paths.ddl_sql)?;
        state.summary.advance(RunStage::DbReady);

        self.stage_files(warehouse, date, files, state)?;
        state.summary.advance(RunStage::Staged);

        for step in TransformStep::ALL {
            let outcome = self.transform(warehouse, date, step, &state.summary)?;
            state.summary.steps.push((step, outcome));
            match step {
                TransformStep::TerminalsDimension => {
                    state.summary.advance(RunStage::DimensionsLoaded)
                }
                TransformStep::BlacklistFacts => state.summary.advance(RunStage::FactsLoaded),
                TransformStep::FraudReport => state.summary.advance(RunStage::ReportBuilt),
                TransformStep::TransactionFacts => {}
            }
        }

        let report_table = format!("{}.{REPORT_TABLE}", self.schema());
        if warehouse.relation_exists(&report_table)? {
            state.summary.report = fraud_report(warehouse, self.schema(), Some(date))?;
        }

        self.archive(files, &mut state.summary);
        state.summary.advance(RunStage::Archived);
        Ok(())
    }

    /// Stage present files in order, stopping at the first failure.
    fn stage_files(
        &self,
        warehouse: &Warehouse,
        date: &RunDate,
        files: &InputFiles,
        state: &mut RunState,
    ) -> EtlResult<()> {
        for (file_type, path) in files.present() {
            match load_staging(warehouse, self.schema(), file_type, path) {
                Ok(count) => {
                    let record = load_record(date, file_type, path, LoadStatus::Success, count, None);
                    record_load(warehouse.conn(), self.schema(), &record, now())?;
                    state.summary.staged.push((file_type, count));
                }
                Err(e) => {
                    log::error!("Staging {file_type} from {} failed: {e}", path.display());
                    let record = load_record(
                        date,
                        file_type,
                        path,
                        LoadStatus::Error,
                        0,
                        Some(e.to_string()),
                    );
                    let recorded = attempt(
                        "record staging failure",
                        record_load(warehouse.conn(), self.schema(), &record, now()),
                    );
                    if recorded.is_some() {
                        state.error_recorded.insert(file_type);
                    }
                    return Err(e);
                }
            }
        }
        Ok(())
    }

    fn transform(
        &self,
        warehouse: &Warehouse,
        date: &RunDate,
        step: TransformStep,
        summary: &RunSummary,
    ) -> EtlResult<StepOutcome> {
        if let Some(input) = step.requires() {
            if summary.staged_rows(input).unwrap_or(0) == 0 {
                log::info!("Skipping {step}: no {input} rows staged in this run");
                return Ok(StepOutcome::NotStaged);
            }
        }
        run_step(
            warehouse,
            self.schema(),
            &self.config.paths.dml_sql,
            step,
            date,
            now(),
        )
    }

    /// Move processed files to the archive. Failures are logged and kept in
    /// the summary; they never fail the run.
    fn archive(&self, files: &InputFiles, summary: &mut RunSummary) {
        let archive_dir = &self.config.paths.archive_dir;
        for (file_type, path) in files.present() {
            match archive_file(path, archive_dir) {
                Ok(dest) => {
                    log::info!("Archived {file_type} file to {}", dest.display());
                    summary.archived.push(dest);
                }
                Err(e) => {
                    log::error!("{e}");
                    summary
                        .archive_failures
                        .push((path.to_path_buf(), e.to_string()));
                }
            }
        }
    }

    /// Write ERROR audit rows for every located file not yet marked failed.
    fn record_failures(
        &self,
        warehouse: &Warehouse,
        date: &RunDate,
        files: &InputFiles,
        state: &RunState,
        message: &str,
    ) {
        for (file_type, path) in files.present() {
            if state.error_recorded.contains(&file_type) {
                continue;
            }
            let record = load_record(
                date,
                file_type,
                path,
                LoadStatus::Error,
                0,
                Some(message.to_string()),
            );
            attempt(
                "record run failure",
                record_load(warehouse.conn(), self.schema(), &record, now()),
            );
        }
    }
}

/// Run a bookkeeping write whose failure must not mask the real error.
fn attempt<T, E: fmt::Display>(what: &str, result: Result<T, E>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            log::warn!("Could not {what}: {e}");
            None
        }
    }
}

fn load_record(
    date: &RunDate,
    file_type: FileType,
    path: &Path,
    status: LoadStatus,
    count: usize,
    error_message: Option<String>,
) -> LoadRecord {
    LoadRecord {
        run_date: date.key(),
        file_type: file_type.stem().to_string(),
        file_name: path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned()),
        records_loaded: count as i64,
        status,
        error_message,
    }
}

fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

#[cfg(test)]
#[path = "pipeline_test.rs"]
mod tests;
