//! On-disk components
//!
//! - `backup_log`: The append-only log file, its writer and both scanners
//! - `lockfile`: Exclusive `<path>.lock` files serialising writers

pub mod backup_log;
pub mod lockfile;
