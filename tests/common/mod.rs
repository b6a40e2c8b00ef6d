#![allow(dead_code)]

pub mod command;
pub mod locks;

use assert_fs::TempDir;
use bkl::{BackupLog, Batch, Entry, Identity, LockProvider, ObjectId};
use chrono::TimeZone;
use rstest::fixture;

/// An owned copy of a decoded entry, for comparing scan results
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub path: Vec<u8>,
    pub old_id: ObjectId,
    pub new_id: ObjectId,
}

impl Transition {
    pub fn new(path: &str, old: &str, new: &str) -> Self {
        Transition {
            path: path.as_bytes().to_vec(),
            old_id: ObjectId::digest(old.as_bytes()),
            new_id: ObjectId::digest(new.as_bytes()),
        }
    }

    pub fn from_entry(entry: &Entry) -> Self {
        Transition {
            path: entry.path.to_vec(),
            old_id: entry.old_id,
            new_id: entry.new_id,
        }
    }
}

#[fixture]
pub fn log_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp dir")
}

#[fixture]
pub fn identity() -> Identity {
    random_identity()
}

pub fn random_identity() -> Identity {
    use fake::Fake;
    use fake::faker::internet::en::FreeEmail;
    use fake::faker::name::en::Name;

    let offset = chrono::FixedOffset::east_opt(2 * 3600).expect("valid offset");
    let timestamp = offset
        .timestamp_opt(1_700_000_000, 0)
        .single()
        .expect("valid timestamp");

    Identity::new_with_timestamp(
        Name().fake::<String>(),
        FreeEmail().fake::<String>(),
        timestamp,
    )
}

/// Distinct transitions over random paths, as a caller would record them
pub fn generate_transitions(count: usize) -> Vec<Transition> {
    use fake::{Fake, faker::lorem::en::Word};

    (0..count)
        .map(|i| {
            let path = (0..=i % 4)
                .map(|_| Word().fake::<String>())
                .collect::<Vec<_>>()
                .join("/");
            Transition::new(&path, &format!("{}-old", i), &format!("{}-new", i))
        })
        .collect()
}

pub fn record<L: LockProvider>(
    log: &BackupLog<L>,
    transitions: &[Transition],
    identity: &Identity,
) -> anyhow::Result<()> {
    let mut batch = Batch::new();
    for transition in transitions {
        batch.append_into(
            &transition.path,
            &transition.old_id,
            &transition.new_id,
            &identity.to_string(),
        );
    }
    log.commit(&batch)
}

pub fn read_forward<L: LockProvider>(log: &BackupLog<L>) -> anyhow::Result<Vec<Transition>> {
    let mut transitions = Vec::new();
    log.scan_forward(|line| {
        transitions.push(Transition::from_entry(&Entry::decode(line)?));
        Ok(())
    })?;
    Ok(transitions)
}

pub fn read_reverse<L: LockProvider>(log: &BackupLog<L>) -> anyhow::Result<Vec<Transition>> {
    let mut transitions = Vec::new();
    log.scan_reverse(|line| {
        transitions.push(Transition::from_entry(&Entry::decode(line)?));
        Ok(())
    })?;
    Ok(transitions)
}
