//! Persistent record storage.
//!
//! The tantivy-backed store behind the index: atomic per-record replacement,
//! key lookups by id and path, filtered listings.

pub mod error;
pub mod schema;
pub mod store;

pub use error::{StorageError, StorageResult};
pub use schema::RecordSchema;
pub use store::RecordStore;
