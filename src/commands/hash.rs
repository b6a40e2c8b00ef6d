use crate::artifacts::objects::object_id::ObjectId;
use crate::commands::Session;
use anyhow::Context;
use std::path::Path;

impl Session {
    pub fn hash(&self, file: &Path) -> anyhow::Result<()> {
        let content =
            std::fs::read(file).with_context(|| format!("failed to read file at {:?}", file))?;

        writeln!(self.writer(), "{}", ObjectId::digest(&content))?;

        Ok(())
    }
}
