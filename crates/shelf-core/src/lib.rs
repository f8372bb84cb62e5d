//! Shelf Core Library
//!
//! This crate provides the core functionality for Shelf, a personal
//! book-tracking application: a local JSON-backed collection of books with
//! ratings, summaries, and highlighted quotes, mirrored one-way to an
//! external sheet endpoint.
//!
//! # Architecture
//!
//! - **JsonStore**: key-value persistence over JSON files, cached in memory
//! - **Library**: the collection repository; the local store is always the
//!   authority
//! - **SheetRelay**: best-effort, fire-and-forget push of a book's state to
//!   the external sheet after each mutation
//!
//! # Quick Start
//!
//! ```text
//! let config = Config::load()?;
//! let mut library = Library::new(JsonStore::open(config.data_dir.clone()));
//!
//! // Add a book
//! let book = library.add_book(BookDraft {
//!     title: "Dune".into(),
//!     author: "Frank Herbert".into(),
//!     ..Default::default()
//! })?;
//!
//! // Mirror it to the sheet, best effort
//! if let Some(relay) = SheetRelay::from_config(&config)? {
//!     relay.push(SyncAction::Add, &SheetPayload::from_book(&book), None).await.ok();
//! }
//! ```
//!
//! # Modules
//!
//! - `library`: collection repository (main entry point)
//! - `models`: data structures for books, quotes, and page references
//! - `storage`: JSON key-value persistence
//! - `sync`: one-way sheet relay
//! - `config`: application configuration

pub mod config;
pub mod library;
pub mod models;
pub mod storage;
pub mod sync;

pub use config::Config;
pub use library::{search, Library, LibraryError, SearchMode, SearchResults};
pub use models::{Book, BookDraft, BookPatch, Page, Quote, QuoteDraft, QuotePatch, MAX_RATING};
pub use storage::{JsonStore, StorageError};
pub use sync::{SheetPayload, SheetRelay, SyncAction, SyncError};
