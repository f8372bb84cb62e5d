//! Persistence layer
//!
//! A namespaced key-value store over JSON files with an in-memory cache,
//! plus typed storage errors.

mod error;
mod store;

pub use error::{StorageError, StorageResult};
pub use store::JsonStore;
