//! `formbook-core` — domain types for the form service.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod entry;
pub mod error;
pub mod id;

pub use entry::{newest_first, Entry, EntryName, NewEntry};
pub use error::{DomainError, DomainResult};
pub use id::EntryId;
