//! Staging loader
//!
//! Input files are loaded verbatim: every column is text, the first row is
//! the header and nothing is type-converted. Conversion happens in the
//! transform scripts, where a bad value fails one step instead of the read.

use crate::error::{EtlError, EtlResult};
use bf_core::{FileFormat, FileType};
use bf_db::Warehouse;
use calamine::{open_workbook_auto, Data, Reader};
use std::collections::HashSet;
use std::path::Path;

/// Field separator of delimited input files
pub const DELIMITER: u8 = b';';

/// Staging column holding each row's 1-based position in its file.
/// Transform scripts use it to break ties between duplicate keys.
pub const FILE_ROW_COLUMN: &str = "file_row";

/// An input file read into memory, all values as text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StagedData {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

impl StagedData {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// Read `path` in the given format.
pub fn read_file(path: &Path, format: FileFormat) -> EtlResult<StagedData> {
    match format {
        FileFormat::Delimited => read_delimited(path),
        FileFormat::Spreadsheet => read_spreadsheet(path),
    }
}

/// Load `path` into the staging table of `file_type`, replacing its content.
///
/// Returns the number of rows staged.
pub fn load_staging(
    warehouse: &Warehouse,
    schema: &str,
    file_type: FileType,
    path: &Path,
) -> EtlResult<usize> {
    let format = FileFormat::from_path(path).ok_or_else(|| EtlError::UnsupportedFileType {
        path: path.display().to_string(),
    })?;
    if format != file_type.format() {
        log::warn!(
            "{} file {} is not in the usual {:?} format",
            file_type,
            path.display(),
            file_type.format()
        );
    }

    let mut data = read_file(path, format)?;
    number_rows(path, &mut data)?;
    let table = format!("{schema}.{}", file_type.staging_table());
    let count = warehouse.replace_text_table(&table, &data.columns, &data.rows)?;
    log::info!("Staged {count} {file_type} rows into {table}");
    Ok(count)
}

/// Append [`FILE_ROW_COLUMN`] to every row, in file order.
fn number_rows(path: &Path, data: &mut StagedData) -> EtlResult<()> {
    if data
        .columns
        .iter()
        .any(|c| c.eq_ignore_ascii_case(FILE_ROW_COLUMN))
    {
        return Err(read_error(
            path,
            format!("column name '{FILE_ROW_COLUMN}' is reserved"),
        ));
    }
    data.columns.push(FILE_ROW_COLUMN.to_string());
    for (index, row) in data.rows.iter_mut().enumerate() {
        row.push(Some((index + 1).to_string()));
    }
    Ok(())
}

fn read_error(path: &Path, message: impl ToString) -> EtlError {
    EtlError::FileRead {
        path: path.display().to_string(),
        message: message.to_string(),
    }
}

fn read_delimited(path: &Path) -> EtlResult<StagedData> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(DELIMITER)
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(|e| read_error(path, e))?;

    let header: Vec<String> = reader
        .headers()
        .map_err(|e| read_error(path, e))?
        .iter()
        .map(String::from)
        .collect();
    let columns = column_names(header);
    if columns.is_empty() {
        return Err(read_error(path, "file has no header row"));
    }

    let mut rows = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record.map_err(|e| read_error(path, e))?;
        if record.len() > columns.len() {
            return Err(read_error(
                path,
                format!(
                    "line {} has {} fields, header has {}",
                    i + 2,
                    record.len(),
                    columns.len()
                ),
            ));
        }
        let mut row: Vec<Option<String>> = record.iter().map(text_value).collect();
        if row.iter().all(Option::is_none) {
            continue;
        }
        row.resize(columns.len(), None);
        rows.push(row);
    }

    Ok(StagedData { columns, rows })
}

fn read_spreadsheet(path: &Path) -> EtlResult<StagedData> {
    let mut workbook = open_workbook_auto(path).map_err(|e| read_error(path, e))?;
    let sheet = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| read_error(path, "workbook has no sheets"))?;
    let range = workbook
        .worksheet_range(&sheet)
        .map_err(|e| read_error(path, format!("sheet '{sheet}': {e}")))?;

    let mut cells = range.rows();
    let header: Vec<String> = match cells.next() {
        Some(row) => row.iter().map(|c| cell_text(c).unwrap_or_default()).collect(),
        None => return Err(read_error(path, format!("sheet '{sheet}' is empty"))),
    };
    let columns = column_names(header);

    let rows = cells
        .map(|row| row.iter().map(cell_text).collect::<Vec<_>>())
        .filter(|row| row.iter().any(Option::is_some))
        .map(|mut row| {
            row.resize(columns.len(), None);
            row
        })
        .collect();

    Ok(StagedData { columns, rows })
}

fn text_value(field: &str) -> Option<String> {
    let trimmed = field.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Render a spreadsheet cell the way it would read in a text export.
fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty => None,
        Data::String(s) => text_value(s),
        Data::Int(i) => Some(i.to_string()),
        Data::Float(f) => Some(float_text(*f)),
        Data::Bool(b) => Some(b.to_string()),
        Data::DateTime(dt) => Some(match dt.as_datetime() {
            Some(ts) => ts.format("%Y-%m-%d %H:%M:%S").to_string(),
            None => float_text(dt.as_f64()),
        }),
        Data::DateTimeIso(s) | Data::DurationIso(s) => text_value(s),
        Data::Error(e) => Some(format!("#{e:?}")),
    }
}

fn float_text(f: f64) -> String {
    if f.fract() == 0.0 && f.abs() < 1e15 {
        format!("{}", f as i64)
    } else {
        f.to_string()
    }
}

/// Header cells as column names: trimmed, blanks become `column_<n>` and
/// repeats get a numeric suffix.
fn column_names(header: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    header
        .into_iter()
        .enumerate()
        .map(|(i, name)| {
            let base = match name.trim() {
                "" => format!("column_{}", i + 1),
                trimmed => trimmed.to_string(),
            };
            let mut candidate = base.clone();
            let mut n = 2;
            while !seen.insert(candidate.to_lowercase()) {
                candidate = format!("{base}_{n}");
                n += 1;
            }
            candidate
        })
        .collect()
}

#[cfg(test)]
#[path = "staging_test.rs"]
mod tests;
