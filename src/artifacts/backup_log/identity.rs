//! Who and when
//!
//! Every recorded transition carries the identity of whoever applied it and
//! the moment it happened, rendered as `Name <email> <timestamp> <timezone>`.
//! The codec treats that text as opaque; this module is the provider that
//! produces it.

use anyhow::Context;

/// Committer information with timestamp and timezone
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Identity {
    name: String,
    email: String,
    timestamp: chrono::DateTime<chrono::FixedOffset>,
}

impl Identity {
    /// Create a new identity stamped with the current local time
    ///
    /// # Arguments
    ///
    /// * `name` - Committer's name
    /// * `email` - Committer's email address
    pub fn new(name: String, email: String) -> Self {
        Identity {
            name,
            email,
            timestamp: chrono::Local::now().fixed_offset(),
        }
    }

    /// Create a new identity with a specific timestamp
    pub fn new_with_timestamp(
        name: String,
        email: String,
        timestamp: chrono::DateTime<chrono::FixedOffset>,
    ) -> Self {
        Identity {
            name,
            email,
            timestamp,
        }
    }

    /// Load the identity from environment variables
    ///
    /// Reads GIT_COMMITTER_NAME, GIT_COMMITTER_EMAIL, and optionally
    /// GIT_COMMITTER_DATE. If no date is provided, uses current time.
    pub fn load_from_env() -> anyhow::Result<Self> {
        let name = std::env::var("GIT_COMMITTER_NAME").context("GIT_COMMITTER_NAME not set")?;
        let email =
            std::env::var("GIT_COMMITTER_EMAIL").context("GIT_COMMITTER_EMAIL not set")?;
        let timestamp = std::env::var("GIT_COMMITTER_DATE")
            .ok()
            .map(|date_str| parse_date(&date_str))
            .transpose()?;

        match timestamp {
            Some(ts) => Ok(Identity::new_with_timestamp(name, email, ts)),
            None => Ok(Identity::new(name, email)),
        }
    }

    /// Format name and email for display
    ///
    /// # Returns
    ///
    /// String in format "Name <email@example.com>"
    pub fn display_name(&self) -> String {
        format!("{} <{}>", self.name, self.email)
    }

    pub fn timestamp(&self) -> chrono::DateTime<chrono::FixedOffset> {
        self.timestamp
    }
}

impl std::fmt::Display for Identity {
    /// Renders "Name <email> timestamp timezone", the actor text of a log line
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} <{}> {} {}",
            self.name,
            self.email,
            self.timestamp.timestamp(),
            self.timestamp.format("%z")
        )
    }
}

fn parse_date(date_str: &str) -> anyhow::Result<chrono::DateTime<chrono::FixedOffset>> {
    chrono::DateTime::parse_from_rfc2822(date_str)
        .or_else(|_| chrono::DateTime::parse_from_str(date_str, "%Y-%m-%d %H:%M:%S %z"))
        .with_context(|| format!("invalid GIT_COMMITTER_DATE: {}", date_str))
}

/// Rebuild a point in time from unix seconds and a `[+-]HHMM` offset
/// expressed as a signed decimal (e.g. `-530` for `-0530`)
pub fn datetime_from_parts(
    timestamp: u64,
    tz_offset: i32,
) -> Option<chrono::DateTime<chrono::FixedOffset>> {
    let minutes = tz_offset.abs() / 100 * 60 + tz_offset.abs() % 100;
    let seconds = tz_offset.signum() * minutes * 60;
    let offset = chrono::FixedOffset::east_opt(seconds)?;

    chrono::DateTime::from_timestamp(i64::try_from(timestamp).ok()?, 0)
        .map(|utc| utc.with_timezone(&offset))
}
