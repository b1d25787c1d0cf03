use std::sync::Arc;

use thiserror::Error;

use formbook_core::{Entry, NewEntry};

/// Entry store operation error.
///
/// Every variant is an infrastructure failure. None of them is retried; callers
/// surface them as a server error.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store could not be reached (connect refused, pool closed or timed out, I/O).
    #[error("store unavailable during {operation}: {message}")]
    Unavailable {
        operation: &'static str,
        message: String,
    },

    /// The store was reached but rejected the statement.
    #[error("query failed during {operation}: {message}")]
    Query {
        operation: &'static str,
        message: String,
    },

    /// A row came back in a shape the domain cannot represent.
    #[error("invalid row during {operation}: {message}")]
    InvalidRow {
        operation: &'static str,
        message: String,
    },
}

impl StoreError {
    pub fn unavailable(operation: &'static str, message: impl Into<String>) -> Self {
        Self::Unavailable {
            operation,
            message: message.into(),
        }
    }

    pub fn invalid_row(operation: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidRow {
            operation,
            message: message.into(),
        }
    }

    pub fn operation(&self) -> &'static str {
        match self {
            Self::Unavailable { operation, .. }
            | Self::Query { operation, .. }
            | Self::InvalidRow { operation, .. } => operation,
        }
    }
}

/// Append-only store of form entries.
///
/// ## Semantics
///
/// - `insert` assigns a fresh, strictly increasing id and the creation timestamp.
///   It is at-most-once: there is no idempotency key, so a caller that retries
///   after an error may end up with two rows.
/// - `list_newest_first` returns every entry ordered by id descending. The
///   timestamp never takes part in ordering.
/// - Nothing is cached between calls.
#[async_trait::async_trait]
pub trait EntryStore: Send + Sync {
    /// Create the backing table if it does not exist yet. Idempotent.
    async fn ensure_schema(&self) -> Result<(), StoreError>;

    /// Persist a new entry and return it with its assigned id and timestamp.
    async fn insert(&self, entry: NewEntry) -> Result<Entry, StoreError>;

    /// Read all entries, newest first.
    async fn list_newest_first(&self) -> Result<Vec<Entry>, StoreError>;

    /// Cheap reachability check.
    async fn ping(&self) -> Result<(), StoreError>;
}

#[async_trait::async_trait]
impl<S> EntryStore for Arc<S>
where
    S: EntryStore + ?Sized,
{
    async fn ensure_schema(&self) -> Result<(), StoreError> {
        (**self).ensure_schema().await
    }

    async fn insert(&self, entry: NewEntry) -> Result<Entry, StoreError> {
        (**self).insert(entry).await
    }

    async fn list_newest_first(&self) -> Result<Vec<Entry>, StoreError> {
        (**self).list_newest_first().await
    }

    async fn ping(&self) -> Result<(), StoreError> {
        (**self).ping().await
    }
}
