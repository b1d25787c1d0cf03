//! Entry persistence boundary.
//!
//! Handlers talk to an [`EntryStore`]; production wires [`PostgresEntryStore`],
//! tests and local runs can use [`InMemoryEntryStore`].

pub mod in_memory;
pub mod postgres;
pub mod r#trait;

pub use in_memory::InMemoryEntryStore;
pub use postgres::{PostgresEntryStore, CREATE_ENTRIES_TABLE};
pub use r#trait::{EntryStore, StoreError};
