//! SQLite backend for the transcript record store.
//!
//! Implements [`transcript_core::store::RecordStore`] over a single
//! [`tokio_rusqlite`] connection. Uniqueness violations on inserts surface as
//! [`InsertOutcome::Duplicate`](transcript_core::enrollment::InsertOutcome)
//! rather than errors.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;
