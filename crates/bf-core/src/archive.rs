//! Archiving of processed input files

use crate::error::{CoreError, CoreResult};
use std::fs;
use std::path::{Path, PathBuf};

/// Suffix appended to archived file names
pub const BACKUP_SUFFIX: &str = ".backup";

/// Archive destination for `src` inside `archive_dir`
pub fn backup_path(src: &Path, archive_dir: &Path) -> Option<PathBuf> {
    let name = src.file_name()?.to_string_lossy();
    Some(archive_dir.join(format!("{name}{BACKUP_SUFFIX}")))
}

/// Move `src` into `archive_dir` as `<name>.backup`.
///
/// An existing backup with the same name is replaced. Rename is tried first;
/// when it fails (e.g. the archive is on another filesystem) the file is
/// copied and the source removed.
pub fn archive_file(src: &Path, archive_dir: &Path) -> CoreResult<PathBuf> {
    let fail = |source: std::io::Error| CoreError::ArchiveError {
        path: src.display().to_string(),
        source,
    };

    if !src.is_file() {
        return Err(fail(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "source file not found",
        )));
    }
    let dst = backup_path(src, archive_dir).ok_or_else(|| {
        fail(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "source path has no file name",
        ))
    })?;

    fs::create_dir_all(archive_dir).map_err(fail)?;
    if dst.exists() {
        fs::remove_file(&dst).map_err(fail)?;
    }

    if let Err(rename_err) = fs::rename(src, &dst) {
        log::debug!(
            "rename {} -> {} failed ({rename_err}), falling back to copy",
            src.display(),
            dst.display()
        );
        fs::copy(src, &dst).map_err(fail)?;
        fs::remove_file(src).map_err(fail)?;
    }
    Ok(dst)
}

#[cfg(test)]
#[path = "archive_test.rs"]
mod tests;
