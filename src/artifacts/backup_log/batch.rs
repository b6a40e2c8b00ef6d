//! Pending backup log lines
//!
//! Transitions are encoded as soon as they are known and kept in memory until
//! the whole batch is committed in a single write.

use crate::artifacts::backup_log::entry;
use crate::artifacts::objects::object_id::ObjectId;
use bytes::{Bytes, BytesMut};

/// Encoded lines waiting to be appended to a backup log
#[derive(Debug, Default, Clone)]
pub struct Batch {
    buffer: BytesMut,
    entries: usize,
}

impl Batch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Encode a transition and queue it
    ///
    /// No I/O happens here. No-op transitions are dropped.
    ///
    /// # Returns
    ///
    /// true if a line was queued
    pub fn append_into(
        &mut self,
        path: &[u8],
        old_id: &ObjectId,
        new_id: &ObjectId,
        actor_text: &str,
    ) -> bool {
        match entry::encode(path, old_id, new_id, actor_text) {
            Some(line) => {
                self.buffer.extend_from_slice(&line);
                self.entries += 1;
                true
            }
            None => false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Number of queued lines
    pub fn len(&self) -> usize {
        self.entries
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    pub fn freeze(self) -> Bytes {
        self.buffer.freeze()
    }
}
