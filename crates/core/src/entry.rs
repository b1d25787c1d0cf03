//! The `Entry` entity and its submission-side value types.
//!
//! An entry is created exactly once, from a [`NewEntry`], by the store. It is
//! never updated or deleted by this system.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::error::{DomainError, DomainResult};
use crate::id::EntryId;

/// A submitted name that is allowed to be persisted.
///
/// The only rule is non-emptiness. Whitespace is kept as submitted.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntryName(String);

impl EntryName {
    pub fn new(value: impl Into<String>) -> DomainResult<Self> {
        let value = value.into();
        if value.is_empty() {
            return Err(DomainError::validation("name must not be empty"));
        }
        Ok(Self(value))
    }

    /// Interpret a raw form field.
    ///
    /// Absent and empty fields yield `None`: the submission is accepted but
    /// nothing gets stored.
    pub fn parse(raw: Option<String>) -> Option<Self> {
        raw.and_then(|value| Self::new(value).ok())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

/// An accepted submission that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEntry {
    pub name: EntryName,
}

impl NewEntry {
    pub fn new(name: EntryName) -> Self {
        Self { name }
    }
}

/// A persisted form submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub id: EntryId,
    pub name: String,
    /// Assigned by the store at insertion time.
    pub created_at: DateTime<Utc>,
}

impl Entry {
    /// `created_at` as ISO-8601 in UTC, millisecond precision, `Z` suffix.
    pub fn created_at_iso(&self) -> String {
        self.created_at.to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

/// Sort entries newest first (descending id).
///
/// `created_at` is ignored: two inserts may share a timestamp.
pub fn newest_first(entries: &mut [Entry]) {
    entries.sort_by(|a, b| b.id.cmp(&a.id));
}
