//! Input file discovery
//!
//! Each run expects up to three files in the configured input directory,
//! named by fixed templates around the run date key:
//!
//! - `transactions_<DDMMYYYY>.txt`
//! - `passport_blacklist_<DDMMYYYY>.xlsx`
//! - `terminals_<DDMMYYYY>.xlsx`

use crate::error::{CoreError, CoreResult};
use crate::run_date::RunDate;
use std::fmt;
use std::path::{Path, PathBuf};

/// Kind of daily input file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FileType {
    Transactions,
    Blacklist,
    Terminals,
}

impl FileType {
    /// Processing order of a run
    pub const ALL: [FileType; 3] = [
        FileType::Transactions,
        FileType::Blacklist,
        FileType::Terminals,
    ];

    /// File name stem shared by the input file, staging table and audit rows
    pub fn stem(&self) -> &'static str {
        match self {
            FileType::Transactions => "transactions",
            FileType::Blacklist => "passport_blacklist",
            FileType::Terminals => "terminals",
        }
    }

    /// Expected input file name for a run date
    pub fn file_name(&self, date: &RunDate) -> String {
        let ext = match self.format() {
            FileFormat::Delimited => "txt",
            FileFormat::Spreadsheet => "xlsx",
        };
        format!("{}_{}.{}", self.stem(), date.key(), ext)
    }

    /// Unqualified staging table name
    pub fn staging_table(&self) -> String {
        format!("stg_{}_temp", self.stem())
    }

    /// Declared format of this file type
    pub fn format(&self) -> FileFormat {
        match self {
            FileType::Transactions => FileFormat::Delimited,
            FileType::Blacklist | FileType::Terminals => FileFormat::Spreadsheet,
        }
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.stem())
    }
}

/// Physical layout of an input file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// `;`-separated text with a header row
    Delimited,
    /// Excel workbook, first worksheet, header row
    Spreadsheet,
}

impl FileFormat {
    /// Infer the format from a file extension.
    ///
    /// Returns `None` for extensions no reader exists for.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "txt" | "csv" => Some(FileFormat::Delimited),
            "xlsx" | "xls" => Some(FileFormat::Spreadsheet),
            _ => None,
        }
    }
}

/// Resolved inputs of one run, in processing order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputFiles {
    entries: Vec<(FileType, Option<PathBuf>)>,
}

impl InputFiles {
    /// Path found for a file type, if any
    pub fn get(&self, file_type: FileType) -> Option<&Path> {
        self.entries
            .iter()
            .find(|(t, _)| *t == file_type)
            .and_then(|(_, p)| p.as_deref())
    }

    /// Present files in processing order
    pub fn present(&self) -> impl Iterator<Item = (FileType, &Path)> {
        self.entries
            .iter()
            .filter_map(|(t, p)| p.as_deref().map(|p| (*t, p)))
    }

    /// File types with no matching file
    pub fn missing(&self) -> impl Iterator<Item = FileType> + '_ {
        self.entries
            .iter()
            .filter(|(_, p)| p.is_none())
            .map(|(t, _)| *t)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.iter().all(|(_, p)| p.is_none())
    }
}

/// Look up the expected files for `date` in `dir` without failing on absence.
pub fn scan_inputs(dir: &Path, date: &RunDate) -> InputFiles {
    let entries = FileType::ALL
        .iter()
        .map(|&file_type| {
            let path = dir.join(file_type.file_name(date));
            let found = path.is_file().then_some(path);
            (file_type, found)
        })
        .collect();
    InputFiles { entries }
}

/// Locate the inputs for a run, failing when none of them exist.
pub fn locate_inputs(dir: &Path, date: &RunDate) -> CoreResult<InputFiles> {
    let files = scan_inputs(dir, date);
    if files.is_empty() {
        return Err(CoreError::NoInputFiles {
            date: date.key(),
            dir: dir.display().to_string(),
        });
    }

    for (file_type, path) in files.present() {
        log::info!("Found {} file: {}", file_type, path.display());
    }
    for file_type in files.missing() {
        log::warn!(
            "No {} file for {} ({} expected)",
            file_type,
            date,
            file_type.file_name(date)
        );
    }
    Ok(files)
}

#[cfg(test)]
#[path = "input_test.rs"]
mod tests;
