//! # Commit Fingerprints
//!
//! Commits copied between the two repositories get new hashes, so they are
//! matched by a fingerprint instead: the author timestamp followed by the
//! normalized subject, e.g. `"1612345678 Fix memory leak"`.
//!
//! ## Key Components
//!
//! - **`CommitRecord`**: One commit as reported by the history query.
//! - **`Fingerprint`**: The comparable key derived from a record.
//! - **`CommitMap`**: An insertion-ordered `Fingerprint -> hash` mapping.
//! - **`build`**: Turns a history into a `CommitMap`, honouring the ignore set.
//!
//! ## Collisions
//!
//! Fingerprints are not guaranteed unique. Two unrelated commits made within
//! the same second with the same normalized subject collapse into a single
//! entry, and only the later commit's hash survives.

use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::Serialize;

use crate::subject;

/// A single commit from a repository history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitRecord {
    /// Full 40-character hexadecimal commit hash.
    pub id: String,
    /// Author timestamp in seconds since the epoch.
    pub timestamp: i64,
    /// Raw subject line without the trailing newline.
    #[serde(serialize_with = "serialize_lossy")]
    pub subject: Vec<u8>,
}

impl CommitRecord {
    pub fn new(id: impl Into<String>, timestamp: i64, subject: impl Into<Vec<u8>>) -> Self {
        Self {
            id: id.into(),
            timestamp,
            subject: subject.into(),
        }
    }
}

fn serialize_lossy<S: serde::Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&String::from_utf8_lossy(bytes))
}

/// The key two commits must share to be considered the same change.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(Vec<u8>);

impl Fingerprint {
    /// Build the fingerprint for `record`, dropping any topic listed in
    /// `skip_prefixes` from its subject.
    pub fn of<S: AsRef<[u8]>>(record: &CommitRecord, skip_prefixes: &[S]) -> Self {
        let subject = subject::normalize_for_fingerprint(&record.subject, skip_prefixes);
        let mut key = record.timestamp.to_string().into_bytes();
        key.push(b' ');
        key.extend_from_slice(&subject);
        Self(key)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.0))
    }
}

/// Ordered mapping from fingerprint to commit hash.
///
/// Iteration follows first-insertion order. Inserting a fingerprint that is
/// already present replaces its hash but keeps its position (last write wins
/// on the value).
#[derive(Debug, Clone, Default)]
pub struct CommitMap {
    entries: Vec<(Fingerprint, String)>,
    index: HashMap<Fingerprint, usize>,
}

impl CommitMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `id` under `key`, returning the hash it replaced, if any.
    pub fn insert(&mut self, key: Fingerprint, id: String) -> Option<String> {
        if let Some(&slot) = self.index.get(&key) {
            return Some(std::mem::replace(&mut self.entries[slot].1, id));
        }
        self.index.insert(key.clone(), self.entries.len());
        self.entries.push((key, id));
        None
    }

    pub fn get(&self, key: &Fingerprint) -> Option<&str> {
        self.index
            .get(key)
            .map(|&slot| self.entries[slot].1.as_str())
    }

    pub fn contains_key(&self, key: &Fingerprint) -> bool {
        self.index.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&Fingerprint, &str)> {
        self.entries.iter().map(|(key, id)| (key, id.as_str()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &Fingerprint> {
        self.entries.iter().map(|(key, _)| key)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(_, id)| id.as_str())
    }
}

/// Build the fingerprint map for a history given oldest first.
///
/// Records whose hash is in `ignore` never reach the map.
pub fn build<S: AsRef<[u8]>>(
    history: &[CommitRecord],
    ignore: &HashSet<String>,
    skip_prefixes: &[S],
) -> CommitMap {
    let mut map = CommitMap::new();
    for record in history {
        if ignore.contains(&record.id) {
            log::debug!("Ignoring commit {}", record.id);
            continue;
        }
        let key = Fingerprint::of(record, skip_prefixes);
        if let Some(previous) = map.insert(key.clone(), record.id.clone()) {
            log::warn!(
                "Commits {} and {} share fingerprint \"{}\"; keeping {}",
                previous,
                record.id,
                key,
                record.id
            );
        }
    }
    map
}
