//! Shared fixtures for pipeline integration tests.
//!
//! Each [`TestWorkspace`] is a scratch directory laid out by the shipped
//! `config.json`: an input folder, an archive folder and a file-backed
//! warehouse, wired to the SQL scripts in the repository's `sql/` directory.

#![allow(dead_code)]

use bf_core::config::DEFAULT_CONFIG_FILE;
use bf_core::{Config, RunDate};
use bf_db::Warehouse;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use zip::write::FileOptions;

pub const TRANSACTIONS_HEADER: [&str; 7] = [
    "transaction_id",
    "transaction_date",
    "amount",
    "card_num",
    "oper_type",
    "oper_result",
    "terminal",
];

pub const TERMINALS_HEADER: [&str; 4] = [
    "terminal_id",
    "terminal_type",
    "terminal_city",
    "terminal_address",
];

pub const BLACKLIST_HEADER: [&str; 2] = ["date", "passport"];

// ── Workspace ──────────────────────────────────────────────────────────

pub struct TestWorkspace {
    pub dir: TempDir,
    pub config: Config,
}

impl TestWorkspace {
    pub fn new() -> Self {
        Self::with_dml_dir(sql_root().join("dml"))
    }

    /// Workspace using a custom DML directory
    ///
    /// The repository's `config.json` is copied into the scratch directory
    /// and loaded from there, so the database file name, schema and
    /// directory layout are the shipped ones. Only the script directories
    /// point back into the repository.
    pub fn with_dml_dir(dml_sql: PathBuf) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join(DEFAULT_CONFIG_FILE);
        fs::copy(shipped_config(), &config_path).unwrap();

        let mut config = Config::load(&config_path).unwrap();
        config.paths.ddl_sql = sql_root().join("ddl");
        config.paths.dml_sql = dml_sql;
        fs::create_dir_all(&config.paths.files_dir).unwrap();
        Self { dir, config }
    }

    pub fn input_dir(&self) -> &Path {
        &self.config.paths.files_dir
    }

    pub fn archive_dir(&self) -> &Path {
        &self.config.paths.archive_dir
    }

    pub fn db_path(&self) -> PathBuf {
        PathBuf::from(&self.config.db.path)
    }

    /// Open the warehouse for assertions; drop it before the next run.
    pub fn warehouse(&self) -> Warehouse {
        Warehouse::from_path(&self.db_path()).unwrap()
    }

    pub fn write_transactions(&self, date: &str, rows: &[[&str; 7]]) -> PathBuf {
        let path = self.input_dir().join(format!("transactions_{date}.txt"));
        let mut text = TRANSACTIONS_HEADER.join(";");
        text.push('\n');
        for row in rows {
            text.push_str(&row.join(";"));
            text.push('\n');
        }
        fs::write(&path, text).unwrap();
        path
    }

    pub fn write_terminals(&self, date: &str, rows: &[[&str; 4]]) -> PathBuf {
        let path = self.input_dir().join(format!("terminals_{date}.xlsx"));
        write_xlsx(&path, &TERMINALS_HEADER, rows);
        path
    }

    pub fn write_blacklist(&self, date: &str, rows: &[[&str; 2]]) -> PathBuf {
        let path = self
            .input_dir()
            .join(format!("passport_blacklist_{date}.xlsx"));
        write_xlsx(&path, &BLACKLIST_HEADER, rows);
        path
    }

    /// Write arbitrary bytes under the input directory
    pub fn write_raw(&self, name: &str, content: &[u8]) -> PathBuf {
        let path = self.input_dir().join(name);
        fs::write(&path, content).unwrap();
        path
    }
}

/// The sample configuration at the repository root
pub fn shipped_config() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../..").join(DEFAULT_CONFIG_FILE)
}

pub fn sql_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../sql")
}

/// Copy the files of `src` (one level deep) into `dst`.
pub fn copy_dir(src: &Path, dst: &Path) {
    fs::create_dir_all(dst).unwrap();
    for entry in fs::read_dir(src).unwrap() {
        let entry = entry.unwrap();
        if entry.path().is_file() {
            fs::copy(entry.path(), dst.join(entry.file_name())).unwrap();
        }
    }
}

pub fn date(s: &str) -> RunDate {
    RunDate::parse(s).unwrap()
}

// ── Query helpers ──────────────────────────────────────────────────────

pub fn count(wh: &Warehouse, sql: &str) -> usize {
    wh.query_count(sql).unwrap()
}

pub fn strings(wh: &Warehouse, sql: &str) -> Vec<String> {
    let mut stmt = wh.conn().prepare(sql).unwrap();
    stmt.query_map([], |row| row.get::<_, String>(0))
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap()
}

// ── Spreadsheet fixtures ───────────────────────────────────────────────

/// Write a single-sheet xlsx workbook with inline string cells.
pub fn write_xlsx<const N: usize>(path: &Path, header: &[&str; N], rows: &[[&str; N]]) {
    let mut sheet_rows = String::new();
    let all_rows = std::iter::once(header).chain(rows.iter());
    for (r, row) in all_rows.enumerate() {
        sheet_rows.push_str(&format!("<row r=\"{}\">", r + 1));
        for (c, value) in row.iter().enumerate() {
            if value.is_empty() {
                continue;
            }
            let cell_ref = format!("{}{}", column_letter(c), r + 1);
            sheet_rows.push_str(&format!(
                "<c r=\"{cell_ref}\" t=\"inlineStr\"><is><t>{}</t></is></c>",
                xml_escape(value)
            ));
        }
        sheet_rows.push_str("</row>");
    }

    let parts = [
        (
            "[Content_Types].xml",
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
<Default Extension="xml" ContentType="application/xml"/>
<Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>
<Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>
</Types>"#
                .to_string(),
        ),
        (
            "_rels/.rels",
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>
</Relationships>"#
                .to_string(),
        ),
        (
            "xl/workbook.xml",
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
<sheets><sheet name="Sheet1" sheetId="1" r:id="rId1"/></sheets>
</workbook>"#
                .to_string(),
        ),
        (
            "xl/_rels/workbook.xml.rels",
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/>
</Relationships>"#
                .to_string(),
        ),
        (
            "xl/worksheets/sheet1.xml",
            format!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
<sheetData>{sheet_rows}</sheetData>
</worksheet>"#
            ),
        ),
    ];

    let mut zip = zip::ZipWriter::new(File::create(path).unwrap());
    let options = FileOptions::default().compression_method(zip::CompressionMethod::Stored);
    for (name, content) in parts {
        zip.start_file(name, options).unwrap();
        zip.write_all(content.as_bytes()).unwrap();
    }
    zip.finish().unwrap();
}

fn column_letter(index: usize) -> char {
    (b'A' + index as u8) as char
}

fn xml_escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
