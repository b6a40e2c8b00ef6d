//! Backup log entry codec
//!
//! One entry records one transition of the object id associated with a path.
//!
//! ## Format
//!
//! ```text
//! <old-sha> SP <new-sha> SP <name> <<email>> SP <timestamp> SP <+|-HHMM> TAB <path> LF
//! ```
//!
//! The path is written verbatim: no escaping is applied, so it must not
//! contain a line feed.

use crate::artifacts::backup_log::identity;
use crate::artifacts::objects::OBJECT_ID_LENGTH;
use crate::artifacts::objects::object_id::ObjectId;
use thiserror::Error;

/// Reasons a log line is rejected by [`Entry::decode`]
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum CorruptEntry {
    #[error("corrupt backup log entry: missing terminating line feed")]
    MissingLineFeed,
    #[error("corrupt backup log entry: malformed {0} object id")]
    MalformedId(&'static str),
    #[error("corrupt backup log entry: missing space after {0} object id")]
    MissingSeparator(&'static str),
    #[error("corrupt backup log entry: malformed identity")]
    MalformedIdentity,
    #[error("corrupt backup log entry: malformed timestamp")]
    MalformedTimestamp,
    #[error("corrupt backup log entry: malformed timezone")]
    MalformedTimezone,
}

/// A decoded log line
///
/// Borrows `actor` and `path` from the line it was decoded from; copy them
/// out if the entry has to outlive the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Entry<'l> {
    pub old_id: ObjectId,
    pub new_id: ObjectId,
    /// `Name <email>`, up to and including the closing `>`
    pub actor: &'l [u8],
    pub timestamp: u64,
    /// Signed `HHMM` read as a decimal, e.g. `+0200` is `200`
    pub tz_offset: i32,
    pub path: &'l [u8],
}

/// Encode one transition into its log line
///
/// Returns `None` when `old_id == new_id`: no-op transitions are never
/// recorded.
pub fn encode(
    path: &[u8],
    old_id: &ObjectId,
    new_id: &ObjectId,
    actor_text: &str,
) -> Option<Vec<u8>> {
    if old_id == new_id {
        return None;
    }

    let mut line =
        Vec::with_capacity(2 * OBJECT_ID_LENGTH + actor_text.len() + path.len() + 4);
    line.extend_from_slice(old_id.to_hex().as_bytes());
    line.push(b' ');
    line.extend_from_slice(new_id.to_hex().as_bytes());
    line.push(b' ');
    line.extend_from_slice(actor_text.as_bytes());
    line.push(b'\t');
    line.extend_from_slice(path);
    line.push(b'\n');

    Some(line)
}

impl<'l> Entry<'l> {
    /// Decode a log line, terminating line feed included
    ///
    /// Fields are parsed strictly left to right. A line whose timezone is not
    /// followed by a tab is still accepted: its path then starts right after
    /// the timezone digits.
    pub fn decode(line: &'l [u8]) -> Result<Self, CorruptEntry> {
        let body = match line.split_last() {
            Some((b'\n', body)) => body,
            _ => return Err(CorruptEntry::MissingLineFeed),
        };

        let mut pos = 0;
        let old_id = parse_id(body, &mut pos, "old")?;
        let new_id = parse_id(body, &mut pos, "new")?;

        // The first '>' anywhere after the ids closes the email
        let email_end = body[pos..]
            .iter()
            .position(|&b| b == b'>')
            .map(|offset| pos + offset)
            .ok_or(CorruptEntry::MalformedIdentity)?;
        if body.get(email_end + 1) != Some(&b' ') {
            return Err(CorruptEntry::MalformedIdentity);
        }
        let actor = &body[pos..=email_end];

        let timestamp_start = email_end + 2;
        let digits = body[timestamp_start..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count();
        let timestamp = std::str::from_utf8(&body[timestamp_start..timestamp_start + digits])
            .ok()
            .and_then(|text| text.parse::<u64>().ok())
            .filter(|&ts| ts != 0)
            .ok_or(CorruptEntry::MalformedTimestamp)?;

        // " +HHMM"
        let tz_start = timestamp_start + digits;
        let tz_offset = match body.get(tz_start..tz_start + 6) {
            Some([b' ', sign @ (b'+' | b'-'), hhmm @ ..]) if hhmm.iter().all(u8::is_ascii_digit) => {
                let value = hhmm
                    .iter()
                    .fold(0i32, |acc, &d| acc * 10 + i32::from(d - b'0'));
                if *sign == b'-' { -value } else { value }
            }
            _ => return Err(CorruptEntry::MalformedTimezone),
        };

        let mut path_start = tz_start + 6;
        if body.get(path_start) == Some(&b'\t') {
            path_start += 1;
        }

        Ok(Entry {
            old_id,
            new_id,
            actor,
            timestamp,
            tz_offset,
            path: &body[path_start..],
        })
    }

    /// The moment of the transition in its recorded timezone
    pub fn when(&self) -> Option<chrono::DateTime<chrono::FixedOffset>> {
        identity::datetime_from_parts(self.timestamp, self.tz_offset)
    }

    /// The recorded timezone rendered back as `[+-]HHMM`
    pub fn timezone(&self) -> String {
        let sign = if self.tz_offset < 0 { '-' } else { '+' };
        format!("{}{:04}", sign, self.tz_offset.abs())
    }
}

fn parse_id(body: &[u8], pos: &mut usize, which: &'static str) -> Result<ObjectId, CorruptEntry> {
    let oid =
        ObjectId::from_hex_prefix(&body[*pos..]).ok_or(CorruptEntry::MalformedId(which))?;
    *pos += OBJECT_ID_LENGTH;

    if body.get(*pos) != Some(&b' ') {
        return Err(CorruptEntry::MissingSeparator(which));
    }
    *pos += 1;

    Ok(oid)
}
