//! Advisory run lock
//!
//! Staging tables are shared by every run date, so two runs against the same
//! warehouse must not overlap. A run creates `<database>.lock` exclusively
//! before opening the database and removes it when the guard drops.

use crate::error::{CoreError, CoreResult};
use crate::run_date::RunDate;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Held lock; released on drop
#[derive(Debug)]
pub struct RunLock {
    path: PathBuf,
}

impl RunLock {
    /// Lock file guarding the warehouse at `db_path`
    pub fn lock_path(db_path: &Path) -> PathBuf {
        let mut name = db_path.as_os_str().to_owned();
        name.push(".lock");
        PathBuf::from(name)
    }

    /// Take the lock for `db_path`, failing if another run holds it.
    pub fn acquire(db_path: &Path, date: &RunDate) -> CoreResult<Self> {
        let path = Self::lock_path(db_path);
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| CoreError::IoWithPath {
                path: parent.display().to_string(),
                source: e,
            })?;
        }

        let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                let holder = fs::read_to_string(&path)
                    .map(|s| s.trim().to_string())
                    .unwrap_or_else(|_| "unknown".to_string());
                return Err(CoreError::RunLocked {
                    path: path.display().to_string(),
                    holder,
                });
            }
            Err(e) => {
                return Err(CoreError::IoWithPath {
                    path: path.display().to_string(),
                    source: e,
                })
            }
        };

        let lock = Self { path };
        writeln!(file, "date={} pid={}", date.key(), std::process::id()).map_err(|e| {
            CoreError::IoWithPath {
                path: lock.path.display().to_string(),
                source: e,
            }
        })?;
        log::debug!("Acquired run lock {}", lock.path.display());
        Ok(lock)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for RunLock {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path) {
            log::warn!("Failed to release run lock {}: {e}", self.path.display());
        }
    }
}

#[cfg(test)]
#[path = "lock_test.rs"]
mod tests;
