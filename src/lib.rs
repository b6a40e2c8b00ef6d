//! Backup log of object id transitions
//!
//! Records every "this path changed from object X to object Y, by whom, when"
//! in an append-only text file, and reads those records back oldest first or
//! newest first.
//!
//! - `areas`: The log file itself and writer locking
//! - `artifacts`: Entry codec, batches, identities and object ids
//! - `commands`: The `bkl` command line operations

pub mod areas;
pub mod artifacts;
pub mod commands;

pub use areas::backup_log::{BackupLog, BackupLogError};
pub use areas::lockfile::{LockError, LockFile, LockGuard, LockProvider};
pub use artifacts::backup_log::batch::Batch;
pub use artifacts::backup_log::entry::{CorruptEntry, Entry};
pub use artifacts::backup_log::identity::Identity;
pub use artifacts::objects::object_id::ObjectId;
