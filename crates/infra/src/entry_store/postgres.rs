//! Postgres-backed entry store.
//!
//! ## Error Mapping
//!
//! | SQLx Error | StoreError |
//! |------------|------------|
//! | `Io`, `Tls`, `PoolClosed`, `PoolTimedOut` | `Unavailable` |
//! | `ColumnDecode`, `ColumnNotFound`, `Decode`, `RowNotFound` | `InvalidRow` |
//! | `Database` and anything else | `Query` |
//!
//! ## Timestamps
//!
//! `created_at` is a `TIMESTAMP` (no zone) filled by `now()`, so it holds the
//! session's local time. Reads cast it back through `timestamptz` in the same
//! session zone, which yields the original instant as UTC.

use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, PgRow};
use sqlx::Row;
use tracing::{instrument, Span};

use formbook_core::{Entry, EntryId, NewEntry};

use crate::config::DbConfig;

use super::r#trait::{EntryStore, StoreError};

/// Idempotent schema for the entries table.
pub const CREATE_ENTRIES_TABLE: &str = "CREATE TABLE IF NOT EXISTS entries (id SERIAL PRIMARY KEY, name TEXT, created_at TIMESTAMP DEFAULT now())";

/// Postgres-backed entry store.
///
/// Cloning is cheap; clones share the same connection pool. Connections are
/// acquired per statement and returned when the statement completes.
#[derive(Debug, Clone)]
pub struct PostgresEntryStore {
    pool: PgPool,
}

impl PostgresEntryStore {
    /// Create a new store over an existing connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Build a pool from configuration without opening a connection yet.
    ///
    /// The first statement (normally [`EntryStore::ensure_schema`]) is what
    /// discovers an unreachable database.
    pub fn connect_lazy(config: &DbConfig) -> Self {
        let pool = config.pool_options().connect_lazy_with(config.connect_options());
        Self::new(pool)
    }

    /// Build the pool and make sure the schema exists.
    ///
    /// Fails if the database cannot be reached within the configured acquire
    /// timeout; nothing should be served in that case.
    #[instrument(skip(config), fields(host = %config.host, database = %config.database), err)]
    pub async fn bootstrap(config: &DbConfig) -> Result<Self, StoreError> {
        let store = Self::connect_lazy(config);
        store.ensure_schema().await?;
        Ok(store)
    }

    /// Close the pool, waiting for checked-out connections to be returned.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait::async_trait]
impl EntryStore for PostgresEntryStore {
    #[instrument(skip(self), err)]
    async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(CREATE_ENTRIES_TABLE)
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("ensure_schema", e))?;
        Ok(())
    }

    #[instrument(skip(self, entry), fields(name_len = entry.name.as_str().len(), entry_id), err)]
    async fn insert(&self, entry: NewEntry) -> Result<Entry, StoreError> {
        let row = sqlx::query(
            r#"
            INSERT INTO entries (name)
            VALUES ($1)
            RETURNING
                id::int8 AS id,
                name,
                created_at::timestamptz AS created_at
            "#,
        )
        .bind(entry.name.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert_entry", e))?;

        let stored = entry_from_row("insert_entry", &row)?;
        Span::current().record("entry_id", stored.id.get());
        Ok(stored)
    }

    #[instrument(skip(self), fields(entry_count), err)]
    async fn list_newest_first(&self) -> Result<Vec<Entry>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT
                id::int8 AS id,
                name,
                created_at::timestamptz AS created_at
            FROM entries
            ORDER BY id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_entries", e))?;

        let entries = rows
            .iter()
            .map(|row| entry_from_row("list_entries", row))
            .collect::<Result<Vec<_>, _>>()?;

        Span::current().record("entry_count", entries.len());
        Ok(entries)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("ping", e))?;
        Ok(())
    }
}

/// Map one `entries` row to the domain type.
///
/// Rows written out-of-band may carry a NULL name; it renders as empty. A NULL
/// `created_at` cannot be rendered and is rejected.
fn entry_from_row(operation: &'static str, row: &PgRow) -> Result<Entry, StoreError> {
    let id: i64 = row
        .try_get("id")
        .map_err(|e| StoreError::invalid_row(operation, format!("failed to read id: {e}")))?;
    let name: Option<String> = row
        .try_get("name")
        .map_err(|e| StoreError::invalid_row(operation, format!("failed to read name: {e}")))?;
    let created_at: Option<DateTime<Utc>> = row
        .try_get("created_at")
        .map_err(|e| StoreError::invalid_row(operation, format!("failed to read created_at: {e}")))?;

    let id = EntryId::new(id).map_err(|e| StoreError::invalid_row(operation, e.to_string()))?;
    let created_at = created_at
        .ok_or_else(|| StoreError::invalid_row(operation, format!("entry {id} has no created_at")))?;

    Ok(Entry {
        id,
        name: name.unwrap_or_default(),
        created_at,
    })
}

/// Map SQLx errors to StoreError.
fn map_sqlx_error(operation: &'static str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::PoolClosed
        | sqlx::Error::PoolTimedOut => StoreError::Unavailable {
            operation,
            message: err.to_string(),
        },
        sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::Decode(_)
        | sqlx::Error::RowNotFound => StoreError::InvalidRow {
            operation,
            message: err.to_string(),
        },
        sqlx::Error::Database(db_err) => StoreError::Query {
            operation,
            message: match db_err.code() {
                Some(code) => format!("{} (sqlstate {code})", db_err.message()),
                None => db_err.message().to_string(),
            },
        },
        other => StoreError::Query {
            operation,
            message: other.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    //! Tests against a live database run only when `DATABASE_URL` is set.
    //! They share the table with whatever else uses that database, so they
    //! only assert on rows they inserted themselves.

    use std::time::Duration;

    use super::*;
    use formbook_core::EntryName;

    async fn live_store() -> Option<PostgresEntryStore> {
        let url = std::env::var("DATABASE_URL").ok()?;
        let pool = PgPool::connect(&url)
            .await
            .expect("DATABASE_URL is set but Postgres is unreachable");
        let store = PostgresEntryStore::new(pool);
        store.ensure_schema().await.expect("schema creation failed");
        Some(store)
    }

    fn unique_name(prefix: &str) -> String {
        format!("{prefix}-{}", Utc::now().timestamp_nanos_opt().unwrap_or_default())
    }

    #[tokio::test]
    async fn bootstrap_fails_when_database_is_unreachable() {
        // Port 1 on loopback refuses connections.
        let config = DbConfig {
            host: "127.0.0.1".to_string(),
            port: 1,
            user: "user".to_string(),
            password: "password".to_string(),
            database: "students".to_string(),
            max_connections: 1,
            acquire_timeout: Duration::from_millis(500),
        };

        let err = PostgresEntryStore::bootstrap(&config).await.unwrap_err();
        assert!(matches!(err, StoreError::Unavailable { .. }), "got {err:?}");
        assert_eq!(err.operation(), "ensure_schema");
    }

    #[tokio::test]
    async fn schema_creation_is_idempotent() {
        let Some(store) = live_store().await else { return };
        store.ensure_schema().await.unwrap();
        store.ensure_schema().await.unwrap();
    }

    #[tokio::test]
    async fn insert_assigns_id_and_timestamp() {
        let Some(store) = live_store().await else { return };
        let name = unique_name("alice");

        let before = Utc::now() - chrono::Duration::seconds(1);
        let stored = store
            .insert(NewEntry::new(EntryName::new(name.clone()).unwrap()))
            .await
            .unwrap();
        let after = Utc::now() + chrono::Duration::seconds(1);

        assert_eq!(stored.name, name);
        assert!(stored.created_at >= before && stored.created_at <= after);

        let listed = store.list_newest_first().await.unwrap();
        assert_eq!(listed.iter().filter(|e| e.name == name).count(), 1);
    }

    #[tokio::test]
    async fn later_inserts_come_first() {
        let Some(store) = live_store().await else { return };
        let bob = store
            .insert(NewEntry::new(EntryName::new(unique_name("bob")).unwrap()))
            .await
            .unwrap();
        let carol = store
            .insert(NewEntry::new(EntryName::new(unique_name("carol")).unwrap()))
            .await
            .unwrap();
        assert!(bob.id < carol.id);

        let listed = store.list_newest_first().await.unwrap();
        let pos = |id: EntryId| listed.iter().position(|e| e.id == id).unwrap();
        assert!(pos(carol.id) < pos(bob.id));
        assert!(listed.windows(2).all(|w| w[0].id > w[1].id));
    }
}
