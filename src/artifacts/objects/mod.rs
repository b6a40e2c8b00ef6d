//! Object identifiers
//!
//! The backup log never looks inside the objects it talks about. All it needs
//! from the content-addressed store is a fixed-width identifier with a hex
//! text form, which lives here.

pub mod object_id;

/// Length of a SHA-1 hash in hexadecimal format
pub const OBJECT_ID_LENGTH: usize = 40;

/// Length of a SHA-1 hash in binary format
pub const OBJECT_ID_RAW_LENGTH: usize = OBJECT_ID_LENGTH / 2;
