//! Collection repository
//!
//! The `Library` owns the ordered collection of books persisted under a
//! single storage key, and the session view state (current selection and
//! search). Every mutation rewrites the whole collection atomically
//! through the [`JsonStore`]; there are no partial writes of a book
//! mid-update.
//!
//! Mutations are applied to the in-memory collection first. A failed
//! persistence write is surfaced to the caller, but the in-memory state
//! stays authoritative for the remainder of the session.
//!
//! ## Usage
//!
//! ```ignore
//! let store = JsonStore::open(config.data_dir.clone());
//! let mut library = Library::new(store);
//!
//! let book = library.add_book(BookDraft {
//!     title: "Dune".into(),
//!     author: "Frank Herbert".into(),
//!     ..Default::default()
//! })?;
//! ```

use thiserror::Error;
use uuid::Uuid;

use crate::models::{Book, BookDraft, BookPatch, Quote, QuoteDraft, QuotePatch};
use crate::storage::{JsonStore, StorageError};

/// Storage key for the persisted collection
const COLLECTION_KEY: &str = "books";

/// Errors produced by repository operations
#[derive(Error, Debug)]
pub enum LibraryError {
    /// A required field was empty; reported before any state mutation
    #[error("{field} is required")]
    MissingField { field: &'static str },

    /// The persistence medium failed; the in-memory mutation already
    /// happened and is retained
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Search mode for filtering the collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchMode {
    #[default]
    Title,
    Author,
    Quote,
}

/// Result of a search: books, or (quote, owning book) pairs in quote mode
#[derive(Debug, Clone, PartialEq)]
pub enum SearchResults {
    Books(Vec<Book>),
    Quotes(Vec<(Quote, Book)>),
}

/// Filter the collection by query and mode
///
/// Pure function of its inputs: matching is case-insensitive on the
/// trimmed query, and an empty query returns the unfiltered collection in
/// insertion order. Quote mode scans every book's quotes and pairs each
/// match with its owner.
pub fn search(books: &[Book], query: &str, mode: SearchMode) -> SearchResults {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return SearchResults::Books(books.to_vec());
    }

    match mode {
        SearchMode::Title => SearchResults::Books(
            books
                .iter()
                .filter(|b| b.title.to_lowercase().contains(&query))
                .cloned()
                .collect(),
        ),
        SearchMode::Author => SearchResults::Books(
            books
                .iter()
                .filter(|b| b.author.to_lowercase().contains(&query))
                .cloned()
                .collect(),
        ),
        SearchMode::Quote => {
            let mut matches = Vec::new();
            for book in books {
                for quote in &book.quotes {
                    if quote.text.to_lowercase().contains(&query) {
                        matches.push((quote.clone(), book.clone()));
                    }
                }
            }
            SearchResults::Quotes(matches)
        }
    }
}

/// The book collection and its session view state
pub struct Library {
    store: JsonStore,
    books: Vec<Book>,
    selected: Option<Uuid>,
    query: String,
    mode: SearchMode,
}

impl Library {
    /// Open the library over a store, reading the persisted collection
    /// once up front
    pub fn new(mut store: JsonStore) -> Self {
        let books: Vec<Book> = store.read(COLLECTION_KEY, Vec::new());
        Self {
            store,
            books,
            selected: None,
            query: String::new(),
            mode: SearchMode::default(),
        }
    }

    /// The full collection, in insertion order
    pub fn books(&self) -> &[Book] {
        &self.books
    }

    /// Look up a book by identifier
    pub fn book(&self, id: Uuid) -> Option<&Book> {
        self.books.iter().find(|b| b.id == id)
    }

    pub fn book_count(&self) -> usize {
        self.books.len()
    }

    pub fn quote_count(&self) -> usize {
        self.books.iter().map(|b| b.quotes.len()).sum()
    }

    // ==================== Book Operations ====================

    /// Add a new book to the end of the collection
    ///
    /// Title and author must be non-empty after trimming; everything else
    /// defaults. Returns the created record with its fresh identifier.
    pub fn add_book(&mut self, draft: BookDraft) -> Result<Book, LibraryError> {
        if draft.title.trim().is_empty() {
            return Err(LibraryError::MissingField { field: "title" });
        }
        if draft.author.trim().is_empty() {
            return Err(LibraryError::MissingField { field: "author" });
        }

        let book = Book::from_draft(draft);
        self.books.push(book.clone());
        self.commit()?;
        Ok(book)
    }

    /// Merge a patch onto an existing book
    ///
    /// Returns `Ok(None)` without touching anything when `id` is not in
    /// the collection. A selection pointing at `id` stays consistent
    /// because selection is held by identifier and resolved on read.
    pub fn update_book(&mut self, id: Uuid, patch: BookPatch) -> Result<Option<Book>, LibraryError> {
        let Some(book) = self.books.iter_mut().find(|b| b.id == id) else {
            return Ok(None);
        };

        book.apply_patch(patch);
        let updated = book.clone();
        self.commit()?;
        Ok(Some(updated))
    }

    /// Remove a book by identifier
    ///
    /// Returns whether a record was removed. If the deleted book was
    /// selected, the selection is cleared and the search state reset
    /// (leaving the detail view always returns to a fresh list).
    pub fn delete_book(&mut self, id: Uuid) -> Result<bool, LibraryError> {
        let before = self.books.len();
        self.books.retain(|b| b.id != id);
        if self.books.len() == before {
            return Ok(false);
        }

        if self.selected == Some(id) {
            self.selected = None;
            self.reset_search();
        }

        self.commit()?;
        Ok(true)
    }

    // ==================== Quote Operations ====================

    /// Append a quote to a book
    ///
    /// Quote text must be non-empty. Returns the updated book, or
    /// `Ok(None)` when the book is absent.
    pub fn add_quote(
        &mut self,
        book_id: Uuid,
        draft: QuoteDraft,
    ) -> Result<Option<Book>, LibraryError> {
        if draft.text.trim().is_empty() {
            return Err(LibraryError::MissingField { field: "text" });
        }

        let Some(book) = self.books.iter_mut().find(|b| b.id == book_id) else {
            return Ok(None);
        };

        book.quotes.push(Quote::new(draft.text, draft.page));
        let updated = book.clone();
        self.commit()?;
        Ok(Some(updated))
    }

    /// Update a quote in place
    ///
    /// Rewrites the owning book's quotes sequence and replaces the whole
    /// record through the same write path as `update_book`. `Ok(None)`
    /// when either the book or the quote is absent.
    pub fn update_quote(
        &mut self,
        book_id: Uuid,
        quote_id: Uuid,
        patch: QuotePatch,
    ) -> Result<Option<Book>, LibraryError> {
        let Some(book) = self.books.iter_mut().find(|b| b.id == book_id) else {
            return Ok(None);
        };
        let Some(quote) = book.quotes.iter_mut().find(|q| q.id == quote_id) else {
            return Ok(None);
        };

        if let Some(text) = patch.text {
            quote.text = text;
        }
        if let Some(page) = patch.page {
            quote.page = page;
        }

        let updated = book.clone();
        self.commit()?;
        Ok(Some(updated))
    }

    /// Remove a quote from a book
    pub fn delete_quote(
        &mut self,
        book_id: Uuid,
        quote_id: Uuid,
    ) -> Result<Option<Book>, LibraryError> {
        let Some(book) = self.books.iter_mut().find(|b| b.id == book_id) else {
            return Ok(None);
        };

        let before = book.quotes.len();
        book.quotes.retain(|q| q.id != quote_id);
        if book.quotes.len() == before {
            return Ok(None);
        }

        let updated = book.clone();
        self.commit()?;
        Ok(Some(updated))
    }

    // ==================== View State ====================

    /// Select a book for the detail view; no-op when absent
    pub fn select_book(&mut self, id: Uuid) -> Option<&Book> {
        if self.books.iter().any(|b| b.id == id) {
            self.selected = Some(id);
        }
        self.selected_book()
    }

    /// The currently selected book, resolved against the live collection
    /// so the detail view never sees stale data after its own mutation
    pub fn selected_book(&self) -> Option<&Book> {
        self.selected.and_then(|id| self.book(id))
    }

    /// Leave the detail view: clear selection and reset search
    pub fn deselect(&mut self) {
        self.selected = None;
        self.reset_search();
    }

    /// Set the active search query and mode
    pub fn set_search(&mut self, query: impl Into<String>, mode: SearchMode) {
        self.query = query.into();
        self.mode = mode;
    }

    pub fn search_query(&self) -> &str {
        &self.query
    }

    pub fn search_mode(&self) -> SearchMode {
        self.mode
    }

    /// Run the active search against the collection
    pub fn search_results(&self) -> SearchResults {
        search(&self.books, &self.query, self.mode)
    }

    fn reset_search(&mut self) {
        self.query.clear();
        self.mode = SearchMode::default();
    }

    /// Write the whole collection back to the store
    fn commit(&mut self) -> Result<(), StorageError> {
        self.store.write(COLLECTION_KEY, &self.books)
    }
}
