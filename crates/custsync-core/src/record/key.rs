//! Identity keys and the per-run set of keys already persisted.

use std::collections::HashSet;

use super::model::{LocationRecord, TrendRecord};

/// Separator placed between identity fields.
pub const KEY_SEPARATOR: char = '_';
const ESCAPE: char = '\\';

/// A record with a deterministic identity key.
pub trait IdentityKey {
    fn identity_key(&self) -> String;

    /// False when the field that distinguishes rows is blank. Such a
    /// record cannot be told apart from other blank rows and is not stored.
    fn has_identity(&self) -> bool;
}

/// Builds the identity key of a record.
pub fn key_for<R: IdentityKey>(record: &R) -> String {
    record.identity_key()
}

/// Joins identity fields with `KEY_SEPARATOR`.
///
/// Separator and escape characters inside a field are backslash-escaped,
/// so distinct field tuples always produce distinct keys.
pub fn join_key<S: AsRef<str>>(fields: &[S]) -> String {
    let mut key = String::new();
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            key.push(KEY_SEPARATOR);
        }
        for ch in field.as_ref().chars() {
            if ch == KEY_SEPARATOR || ch == ESCAPE {
                key.push(ESCAPE);
            }
            key.push(ch);
        }
    }
    key
}

impl IdentityKey for TrendRecord {
    fn identity_key(&self) -> String {
        join_key(&[self.store_id.as_str(), self.date.as_str()])
    }

    fn has_identity(&self) -> bool {
        !self.date.trim().is_empty()
    }
}

impl IdentityKey for LocationRecord {
    fn identity_key(&self) -> String {
        let start = self.period_start.map(|d| d.to_string()).unwrap_or_default();
        let end = self.period_end.map(|d| d.to_string()).unwrap_or_default();
        join_key(&[
            self.store_id.as_str(),
            self.period_preset.as_str(),
            start.as_str(),
            end.as_str(),
            self.pincode.as_str(),
        ])
    }

    fn has_identity(&self) -> bool {
        !self.pincode.trim().is_empty()
    }
}

/// Identity keys already seen for one record kind.
///
/// Loaded once per run from durable storage, then grown as records are
/// accepted so later duplicates in the same run are caught too.
#[derive(Debug, Clone, Default)]
pub struct ExistingKeySet {
    keys: HashSet<String>,
}

impl ExistingKeySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
        }
    }

    pub fn from_records<R: IdentityKey>(records: &[R]) -> Self {
        Self {
            keys: records.iter().map(IdentityKey::identity_key).collect(),
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    /// Inserts a key, returning `false` if it was already present.
    pub fn insert(&mut self, key: String) -> bool {
        self.keys.insert(key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
