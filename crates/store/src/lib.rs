//! Progress store implementations for Tutorius.
//!
//! All backends implement the `tutorius_core::ProgressStore` trait:
//! - [`SqliteStore`] — the production backend (WAL, pooled, self-migrating)
//! - [`InMemoryStore`] — for tests and ephemeral sessions

pub mod in_memory;
pub mod sqlite;

pub use in_memory::InMemoryStore;
pub use sqlite::SqliteStore;
