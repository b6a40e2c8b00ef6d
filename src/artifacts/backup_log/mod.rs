//! Backup log value types
//!
//! - `entry`: Line codec for one recorded transition
//! - `batch`: In-memory accumulator of encoded lines awaiting a commit
//! - `identity`: Who/when text embedded in every line

pub mod batch;
pub mod entry;
pub mod identity;
