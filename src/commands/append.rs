use crate::areas::backup_log::BackupLog;
use crate::artifacts::backup_log::batch::Batch;
use crate::artifacts::backup_log::identity::Identity;
use crate::artifacts::objects::object_id::ObjectId;
use crate::commands::Session;
use std::path::Path;

impl Session {
    /// Record `path` moving from `old` to `new` in the log at `log_path`
    ///
    /// The committer is taken from the environment. Nothing is written when
    /// both ids are equal.
    pub fn append(&self, log_path: &Path, path: &str, old: &str, new: &str) -> anyhow::Result<()> {
        let old_id = ObjectId::try_parse(old)?;
        let new_id = ObjectId::try_parse(new)?;
        let identity = Identity::load_from_env()?;

        let mut batch = Batch::new();
        if !batch.append_into(path.as_bytes(), &old_id, &new_id, &identity.to_string()) {
            tracing::info!(path, "skipping no-op transition");
            return Ok(());
        }

        BackupLog::new(log_path).commit(&batch)
    }
}
