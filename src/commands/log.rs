use crate::areas::backup_log::BackupLog;
use crate::artifacts::backup_log::entry::Entry;
use crate::commands::Session;
use colored::Colorize;
use derive_new::new;
use std::path::Path;

#[derive(Debug, Clone, Copy, Default, new)]
pub struct LogOptions {
    /// Newest entry first
    pub reverse: bool,
    /// Print lines exactly as stored
    pub raw: bool,
    pub oneline: bool,
}

impl Session {
    pub fn log(&self, log_path: &Path, opts: &LogOptions) -> anyhow::Result<()> {
        let log = BackupLog::new(log_path);
        let show = |line: &[u8]| self.show_line(line, opts);

        if opts.reverse {
            log.scan_reverse(show)
        } else {
            log.scan_forward(show)
        }
    }

    fn show_line(&self, line: &[u8], opts: &LogOptions) -> anyhow::Result<()> {
        if opts.raw {
            self.writer().write_all(line)?;
            return Ok(());
        }

        let entry = Entry::decode(line)?;
        if opts.oneline {
            return self.show_entry_oneline(&entry);
        }

        self.show_entry_medium(&entry)
    }

    fn show_entry_oneline(&self, entry: &Entry) -> anyhow::Result<()> {
        writeln!(
            self.writer(),
            "{} {}",
            transition(entry),
            String::from_utf8_lossy(entry.path)
        )?;

        Ok(())
    }

    fn show_entry_medium(&self, entry: &Entry) -> anyhow::Result<()> {
        writeln!(
            self.writer(),
            "{} {}",
            transition(entry),
            String::from_utf8_lossy(entry.path)
        )?;
        writeln!(
            self.writer(),
            "Committer: {}",
            String::from_utf8_lossy(entry.actor)
        )?;
        let date = match entry.when() {
            Some(when) => when.format("%a %b %-d %H:%M:%S %Y %z").to_string(),
            None => format!("{} {}", entry.timestamp, entry.timezone()),
        };
        writeln!(self.writer(), "Date:      {}", date)?;
        writeln!(self.writer())?;

        Ok(())
    }
}

fn transition(entry: &Entry) -> String {
    format!(
        "{}..{}",
        entry.old_id.to_short_oid(),
        entry.new_id.to_short_oid()
    )
    .yellow()
    .to_string()
}
