//! Infrastructure layer: database configuration and the entry store.

pub mod config;
pub mod entry_store;

pub use config::{ConfigError, DbConfig};
pub use entry_store::{EntryStore, InMemoryEntryStore, PostgresEntryStore, StoreError};
