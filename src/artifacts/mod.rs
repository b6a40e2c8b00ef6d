//! Backup log data structures
//!
//! - `backup_log`: Entry codec, pending batches and committer identity
//! - `objects`: Object identifiers the log records transitions between

pub mod backup_log;
pub mod objects;
