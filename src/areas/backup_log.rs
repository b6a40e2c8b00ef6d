//! Append-only backup log file
//!
//! Every line of the file records one transition of the object id tracked for
//! a path (see [`crate::artifacts::backup_log::entry`] for the line format).
//! Lines are only ever appended; the order of the lines is the order in which
//! the transitions happened.
//!
//! ## Writing
//!
//! Writers accumulate lines in a [`Batch`] and commit it in a single write
//! while holding `<log>.lock`. The lock only excludes concurrent writers: the
//! batch is appended straight to the real file, so the lock is released
//! without committing anything.
//!
//! ## Reading
//!
//! Readers take no lock. They hand raw lines, terminating line feed included,
//! to a handler and stop at the first error it returns. A missing file reads
//! as an empty log.
//!
//! - [`BackupLog::scan_forward`] yields the oldest line first
//! - [`BackupLog::scan_reverse`] yields the newest line first, reading the
//!   file backwards one block at a time

use crate::areas::lockfile::{LockError, LockFile, LockGuard, LockProvider};
use crate::artifacts::backup_log::batch::Batch;
use std::fs::File;
use std::io::{BufRead, BufReader, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Number of bytes read per step of a reverse scan
pub const DEFAULT_BLOCK_SIZE: usize = 8192;

#[derive(Debug, Error)]
pub enum BackupLogError {
    #[error("unable to open {path:?}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("unable to update {path:?}")]
    Update {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot seek back in {path:?}")]
    Seek {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot read {count} bytes from {path:?}")]
    Read {
        count: usize,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Lock(#[from] LockError),
}

/// Backup log stored at a fixed path
///
/// Generic over the lock provider so writers can be coordinated by something
/// other than lock files.
#[derive(Debug, Clone)]
pub struct BackupLog<L = LockFile> {
    /// Path to the log file
    path: Box<Path>,
    locks: L,
    block_size: usize,
}

impl BackupLog<LockFile> {
    /// Backup log at `path`, guarded by `<path>.lock` files
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_locks(path, LockFile)
    }
}

impl<L: LockProvider> BackupLog<L> {
    pub fn with_locks(path: impl Into<PathBuf>, locks: L) -> Self {
        BackupLog {
            path: path.into().into_boxed_path(),
            locks,
            block_size: DEFAULT_BLOCK_SIZE,
        }
    }

    /// Use blocks of `block_size` bytes (at least one) for reverse scans
    pub fn with_block_size(mut self, block_size: usize) -> Self {
        self.block_size = block_size.max(1);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Append a batch to the log under the writer lock
    ///
    /// # Locking
    ///
    /// Fails immediately with [`LockError::Held`] if another writer holds the
    /// lock. The lock is released on every path out of this function.
    pub fn commit(&self, batch: &Batch) -> anyhow::Result<()> {
        let lock = self
            .locks
            .acquire(&self.path)
            .map_err(BackupLogError::from)?;

        let result = self.write_unlocked(batch.as_bytes());
        // The lock only serialises appenders, there is nothing to commit
        lock.release_without_commit();

        result?;
        tracing::debug!(
            log = ?self.path,
            entries = batch.len(),
            bytes = batch.as_bytes().len(),
            "appended to backup log"
        );

        Ok(())
    }

    fn write_unlocked(&self, bytes: &[u8]) -> Result<(), BackupLogError> {
        let mut file = open_for_append(&self.path).map_err(|source| BackupLogError::Open {
            path: self.path.to_path_buf(),
            source,
        })?;

        file.write_all(bytes)
            .and_then(|_| file.flush())
            .map_err(|source| BackupLogError::Update {
                path: self.path.to_path_buf(),
                source,
            })
    }

    /// Feed every line to `handler`, oldest first
    ///
    /// Holds at most one line in memory. Stops at the first error returned by
    /// `handler` and returns it unchanged.
    pub fn scan_forward<F>(&self, mut handler: F) -> anyhow::Result<()>
    where
        F: FnMut(&[u8]) -> anyhow::Result<()>,
    {
        let Some(file) = self.open_for_read()? else {
            return Ok(());
        };

        let mut reader = BufReader::new(file);
        let mut line = Vec::new();
        loop {
            line.clear();
            let read = reader
                .read_until(b'\n', &mut line)
                .map_err(|source| BackupLogError::Read {
                    count: line.len(),
                    path: self.path.to_path_buf(),
                    source,
                })?;
            if read == 0 {
                return Ok(());
            }

            handler(&line)?;
        }
    }

    /// Feed every line to `handler`, newest first
    ///
    /// The file is read backwards in blocks of [`Self::block_size`] bytes, so
    /// memory stays bounded by one block plus the longest line whatever the
    /// size of the log. Only the bytes present when the scan starts are seen.
    ///
    /// A line cut by a block boundary is kept as leftover until the earlier
    /// block holding its start has been read; each line reaches `handler`
    /// exactly once and whole.
    pub fn scan_reverse<F>(&self, mut handler: F) -> anyhow::Result<()>
    where
        F: FnMut(&[u8]) -> anyhow::Result<()>,
    {
        let Some(mut file) = self.open_for_read()? else {
            return Ok(());
        };

        let mut pos = file
            .seek(SeekFrom::End(0))
            .map_err(|source| self.seek_error(source))?;

        let mut block = vec![0u8; self.block_size];
        let mut leftover: Vec<u8> = Vec::new();
        let mut at_tail = true;

        'blocks: while pos > 0 {
            let count = usize::try_from(pos).map_or(self.block_size, |p| p.min(self.block_size));
            pos -= count as u64;

            file.seek(SeekFrom::Start(pos))
                .map_err(|source| self.seek_error(source))?;
            let buf = &mut block[..count];
            file.read_exact(buf)
                .map_err(|source| BackupLogError::Read {
                    count,
                    path: self.path.to_path_buf(),
                    source,
                })?;
            tracing::trace!(log = ?self.path, offset = pos, count, "read block");

            // The line being assembled ends right before buf[end], its start
            // is searched backwards from buf[scan]
            let mut end = count;
            let mut scan = count;
            if at_tail && buf[count - 1] == b'\n' {
                // Final line feed of the file, not the start of an empty line
                scan -= 1;
            }
            at_tail = false;

            loop {
                match buf[..scan].iter().rposition(|&b| b == b'\n') {
                    Some(newline) => {
                        let segment = &buf[newline + 1..end];
                        if leftover.is_empty() {
                            handler(segment)?;
                        } else {
                            leftover.splice(0..0, segment.iter().copied());
                            handler(&leftover)?;
                            leftover.clear();
                        }

                        scan = newline;
                        end = newline + 1;
                    }
                    None if pos == 0 => {
                        // Start of the file: this is the oldest line
                        leftover.splice(0..0, buf[..end].iter().copied());
                        handler(&leftover)?;
                        leftover.clear();
                        break 'blocks;
                    }
                    None => {
                        // The line starts in an earlier block
                        leftover.splice(0..0, buf[..end].iter().copied());
                        continue 'blocks;
                    }
                }
            }
        }

        assert!(
            leftover.is_empty(),
            "reverse scan of {:?} finished with {} bytes of leftover",
            self.path,
            leftover.len()
        );

        Ok(())
    }

    /// Open the log for reading, `None` if it does not exist
    fn open_for_read(&self) -> Result<Option<File>, BackupLogError> {
        match File::open(&self.path) {
            Ok(file) => Ok(Some(file)),
            Err(e) if is_missing(&e) => Ok(None),
            Err(source) => Err(BackupLogError::Open {
                path: self.path.to_path_buf(),
                source,
            }),
        }
    }

    fn seek_error(&self, source: std::io::Error) -> BackupLogError {
        BackupLogError::Seek {
            path: self.path.to_path_buf(),
            source,
        }
    }
}

fn open_for_append(path: &Path) -> std::io::Result<File> {
    let mut options = File::options();
    options.append(true).create(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o666);
    }

    options.open(path)
}

/// A missing file or a missing parent directory both mean "no log yet"
fn is_missing(e: &std::io::Error) -> bool {
    matches!(
        e.kind(),
        std::io::ErrorKind::NotFound | std::io::ErrorKind::NotADirectory
    )
}
