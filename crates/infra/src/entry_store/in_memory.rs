use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use chrono::Utc;

use formbook_core::{newest_first, Entry, EntryId, NewEntry};

use super::r#trait::{EntryStore, StoreError};

#[derive(Debug, Default)]
struct Table {
    last_id: i64,
    rows: Vec<Entry>,
}

/// In-memory entry store.
///
/// Intended for tests/dev. Can be switched into an "unavailable" mode where
/// every call fails the way an unreachable database would.
#[derive(Debug, Default)]
pub struct InMemoryEntryStore {
    table: RwLock<Table>,
    unavailable: AtomicBool,
}

impl InMemoryEntryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate the store going away (or coming back).
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of stored rows. Ignores the unavailable switch.
    pub fn len(&self) -> Result<usize, StoreError> {
        self.table
            .read()
            .map(|t| t.rows.len())
            .map_err(|_| StoreError::unavailable("count_entries", "lock poisoned"))
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        self.len().map(|n| n == 0)
    }

    fn check_available(&self, operation: &'static str) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::unavailable(operation, "in-memory store marked unavailable"));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl EntryStore for InMemoryEntryStore {
    async fn ensure_schema(&self) -> Result<(), StoreError> {
        self.check_available("ensure_schema")
    }

    async fn insert(&self, entry: NewEntry) -> Result<Entry, StoreError> {
        self.check_available("insert_entry")?;

        let mut table = self
            .table
            .write()
            .map_err(|_| StoreError::unavailable("insert_entry", "lock poisoned"))?;

        let id = EntryId::new(table.last_id + 1)
            .map_err(|e| StoreError::invalid_row("insert_entry", e.to_string()))?;
        table.last_id = id.get();

        let stored = Entry {
            id,
            name: entry.name.into_inner(),
            created_at: Utc::now(),
        };
        table.rows.push(stored.clone());
        Ok(stored)
    }

    async fn list_newest_first(&self) -> Result<Vec<Entry>, StoreError> {
        self.check_available("list_entries")?;

        let table = self
            .table
            .read()
            .map_err(|_| StoreError::unavailable("list_entries", "lock poisoned"))?;

        let mut rows = table.rows.clone();
        newest_first(&mut rows);
        Ok(rows)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.check_available("ping")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use formbook_core::EntryName;

    fn new_entry(name: &str) -> NewEntry {
        NewEntry::new(EntryName::new(name).unwrap())
    }

    #[tokio::test]
    async fn ids_increase_with_insertion_order() {
        let store = InMemoryEntryStore::new();
        let a = store.insert(new_entry("Bob")).await.unwrap();
        let b = store.insert(new_entry("Carol")).await.unwrap();
        assert!(a.id < b.id);
        assert!(a.created_at <= b.created_at);
    }

    #[tokio::test]
    async fn list_is_newest_first_and_stable() {
        let store = InMemoryEntryStore::new();
        for name in ["a", "b", "c"] {
            store.insert(new_entry(name)).await.unwrap();
        }

        let first = store.list_newest_first().await.unwrap();
        let names: Vec<_> = first.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["c", "b", "a"]);

        let second = store.list_newest_first().await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn unavailable_store_fails_every_operation() {
        let store = InMemoryEntryStore::new();
        store.set_unavailable(true);

        assert!(matches!(store.ensure_schema().await, Err(StoreError::Unavailable { .. })));
        assert!(matches!(store.ping().await, Err(StoreError::Unavailable { .. })));
        let err = store.insert(new_entry("x")).await.unwrap_err();
        assert_eq!(err.operation(), "insert_entry");
        assert!(store.list_newest_first().await.is_err());
        assert!(store.is_empty().unwrap());

        store.set_unavailable(false);
        store.insert(new_entry("x")).await.unwrap();
        assert_eq!(store.len().unwrap(), 1);
    }

    #[tokio::test]
    async fn poisoned_table_is_reported_not_hidden() {
        let store = std::sync::Arc::new(InMemoryEntryStore::new());
        store.insert(new_entry("kept")).await.unwrap();

        let poisoner = store.clone();
        let joined = std::thread::spawn(move || {
            let _guard = poisoner.table.write().unwrap();
            panic!("writer died holding the lock");
        })
        .join();
        assert!(joined.is_err());

        let err = store.len().unwrap_err();
        assert_eq!(err.operation(), "count_entries");
        assert!(store.is_empty().is_err());
        assert!(matches!(
            store.list_newest_first().await,
            Err(StoreError::Unavailable { .. })
        ));
        assert!(store.insert(new_entry("lost")).await.is_err());
    }
}
