//! Command implementations behind the `bkl` binary
//!
//! Each command is an `impl Session` block in its own module:
//!
//! - `append`: Record one transition in a backup log
//! - `log`: Print the entries of a backup log, oldest or newest first
//! - `hash`: Print the object id of a file's content

pub mod append;
pub mod hash;
pub mod log;

use std::cell::{RefCell, RefMut};

/// Output sink shared by the commands of one invocation
pub struct Session {
    writer: RefCell<Box<dyn std::io::Write>>,
}

impl Session {
    pub fn new(writer: Box<dyn std::io::Write>) -> Self {
        Session {
            writer: RefCell::new(writer),
        }
    }

    pub fn writer(&'_ self) -> RefMut<'_, Box<dyn std::io::Write>> {
        self.writer.borrow_mut()
    }
}
