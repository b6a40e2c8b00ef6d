//! Path-scoped mutual exclusion for writers
//!
//! Writers take `<path>.lock` before touching `<path>`. Acquisition fails fast:
//! if the lock is already held the caller gets [`LockError::Held`] and decides
//! for itself whether to retry.
//!
//! The backup log appends straight to the real file, so its locks are always
//! released without committing anything.

use std::fs::File;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Suffix of the lock file placed next to the protected file
pub const LOCK_SUFFIX: &str = "lock";

#[derive(Debug, Error)]
pub enum LockError {
    #[error("unable to lock {path:?}: lock is already held")]
    Held { path: PathBuf },
    #[error("unable to create lock for {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Something able to hand out exclusive, path-scoped locks
pub trait LockProvider {
    type Guard: LockGuard;

    fn acquire(&self, path: &Path) -> Result<Self::Guard, LockError>;
}

/// A held lock
pub trait LockGuard {
    /// Give the lock up without committing any staged content
    fn release_without_commit(self);
}

/// `<path>.lock` files created exclusively on disk
#[derive(Debug, Default, Clone, Copy)]
pub struct LockFile;

impl LockFile {
    pub fn lock_path(path: &Path) -> PathBuf {
        let mut lock_path = path.as_os_str().to_owned();
        lock_path.push(".");
        lock_path.push(LOCK_SUFFIX);
        PathBuf::from(lock_path)
    }
}

impl LockProvider for LockFile {
    type Guard = LockFileGuard;

    fn acquire(&self, path: &Path) -> Result<LockFileGuard, LockError> {
        let lock_path = Self::lock_path(path);

        match File::options()
            .write(true)
            .create_new(true)
            .open(&lock_path)
        {
            Ok(file) => {
                tracing::trace!(lock = ?lock_path, "acquired lock");
                Ok(LockFileGuard {
                    lock_path,
                    file: Some(file),
                })
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => Err(LockError::Held {
                path: path.to_path_buf(),
            }),
            Err(source) => Err(LockError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }
}

/// Held `<path>.lock`, removed when released or dropped
#[derive(Debug)]
pub struct LockFileGuard {
    lock_path: PathBuf,
    file: Option<File>,
}

impl LockFileGuard {
    pub fn lock_path(&self) -> &Path {
        &self.lock_path
    }

    fn rollback(&mut self) {
        // Nothing to do if already rolled back
        if self.file.take().is_none() {
            return;
        }

        if let Err(e) = std::fs::remove_file(&self.lock_path) {
            tracing::warn!(lock = ?self.lock_path, error = %e, "failed to remove lock file");
        } else {
            tracing::trace!(lock = ?self.lock_path, "released lock");
        }
    }
}

impl LockGuard for LockFileGuard {
    fn release_without_commit(mut self) {
        self.rollback();
    }
}

impl Drop for LockFileGuard {
    fn drop(&mut self) {
        self.rollback();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::TempDir;

    #[test]
    fn lock_path_appends_suffix() {
        assert_eq!(
            LockFile::lock_path(Path::new("logs/backup.log")),
            PathBuf::from("logs/backup.log.lock")
        );
    }

    #[test]
    fn acquire_creates_and_release_removes_lock_file() -> Result<(), Box<dyn std::error::Error>> {
        let dir = TempDir::new()?;
        let log_path = dir.path().join("backup.log");

        let guard = LockFile.acquire(&log_path)?;
        assert!(guard.lock_path().exists());

        guard.release_without_commit();
        assert!(!LockFile::lock_path(&log_path).exists());
        assert!(!log_path.exists());

        Ok(())
    }

    #[test]
    fn second_acquire_fails_fast_while_held() -> Result<(), Box<dyn std::error::Error>> {
        let dir = TempDir::new()?;
        let log_path = dir.path().join("backup.log");

        let guard = LockFile.acquire(&log_path)?;
        let contended = LockFile.acquire(&log_path);
        assert!(matches!(contended, Err(LockError::Held { .. })));

        guard.release_without_commit();
        LockFile.acquire(&log_path)?.release_without_commit();

        Ok(())
    }

    #[test]
    fn dropping_guard_releases_lock() -> Result<(), Box<dyn std::error::Error>> {
        let dir = TempDir::new()?;
        let log_path = dir.path().join("backup.log");

        drop(LockFile.acquire(&log_path)?);
        assert!(!LockFile::lock_path(&log_path).exists());

        Ok(())
    }

    #[test]
    fn acquire_reports_io_errors() -> Result<(), Box<dyn std::error::Error>> {
        let dir = TempDir::new()?;
        let log_path = dir.path().join("missing").join("backup.log");

        let result = LockFile.acquire(&log_path);
        assert!(matches!(result, Err(LockError::Io { .. })));

        Ok(())
    }
}
