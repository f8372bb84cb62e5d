//! Wire payload for the sheet endpoint
//!
//! The endpoint accepts a flattened projection of a book as form fields.
//! Row identity on the sheet side is the ISBN string, never the internal
//! book identifier, so the projection deliberately excludes the id.

use std::fmt;

use crate::models::Book;

/// Action the sheet endpoint should take
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncAction {
    /// Append a new row unconditionally
    Add,
    /// Upsert-by-ISBN: overwrite the matching row, or append when none
    Update,
}

impl SyncAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncAction::Add => "add",
            SyncAction::Update => "update",
        }
    }
}

impl fmt::Display for SyncAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Flattened projection of a book for the external sheet
///
/// Optional fields flatten to empty strings; the quotes sequence is
/// serialized as a single JSON text blob, one sheet cell.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetPayload {
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub summary: String,
    pub completion_date: String,
    pub quotes: String,
}

impl SheetPayload {
    /// Build the projection from a book's full current state
    pub fn from_book(book: &Book) -> Self {
        Self {
            title: book.title.clone(),
            author: book.author.clone(),
            isbn: book.isbn.clone().unwrap_or_default(),
            summary: book.summary.clone(),
            completion_date: book
                .completion_date
                .map(|d| d.to_string())
                .unwrap_or_default(),
            quotes: serde_json::to_string(&book.quotes).unwrap_or_else(|_| "[]".to_string()),
        }
    }

    /// Form fields for the endpoint
    ///
    /// `lookupIsbn` is sent only on update and only when present, so the
    /// endpoint can match the pre-edit ISBN and a local ISBN edit does not
    /// orphan the external row.
    pub fn to_form(&self, action: SyncAction, lookup_isbn: Option<&str>) -> Vec<(&'static str, String)> {
        let mut form = vec![
            ("action", action.as_str().to_string()),
            ("title", self.title.clone()),
            ("author", self.author.clone()),
            ("isbn", self.isbn.clone()),
            ("summary", self.summary.clone()),
            ("completionDate", self.completion_date.clone()),
            ("quotes", self.quotes.clone()),
        ];

        if action == SyncAction::Update {
            if let Some(lookup) = lookup_isbn {
                if !lookup.trim().is_empty() {
                    form.push(("lookupIsbn", lookup.to_string()));
                }
            }
        }

        form
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BookDraft, Page, Quote};
    use chrono::NaiveDate;

    fn sample_book() -> Book {
        let mut book = Book::from_draft(BookDraft {
            title: "Dune".to_string(),
            author: "Frank Herbert".to_string(),
            isbn: Some("9780441013593".to_string()),
            summary: Some("Desert planet.".to_string()),
            completion_date: NaiveDate::from_ymd_opt(2026, 2, 10),
            ..Default::default()
        });
        book.quotes
            .push(Quote::new("Fear is the mind-killer.", Page::parse("8")));
        book
    }

    #[test]
    fn test_from_book_flattens_fields() {
        let book = sample_book();
        let payload = SheetPayload::from_book(&book);

        assert_eq!(payload.title, "Dune");
        assert_eq!(payload.author, "Frank Herbert");
        assert_eq!(payload.isbn, "9780441013593");
        assert_eq!(payload.summary, "Desert planet.");
        assert_eq!(payload.completion_date, "2026-02-10");

        // Quotes travel as one JSON blob, internal id included per quote
        let parsed: serde_json::Value = serde_json::from_str(&payload.quotes).unwrap();
        assert_eq!(parsed[0]["text"], "Fear is the mind-killer.");
        assert_eq!(parsed[0]["page"], 8);
    }

    #[test]
    fn test_from_book_with_defaults() {
        let book = Book::from_draft(BookDraft {
            title: "Emma".to_string(),
            author: "Jane Austen".to_string(),
            ..Default::default()
        });
        let payload = SheetPayload::from_book(&book);

        assert_eq!(payload.isbn, "");
        assert_eq!(payload.completion_date, "");
        assert_eq!(payload.quotes, "[]");
    }

    #[test]
    fn test_projection_excludes_internal_id() {
        let book = sample_book();
        let payload = SheetPayload::from_book(&book);
        let form = payload.to_form(SyncAction::Add, None);

        let id = book.id.to_string();
        assert!(form.iter().all(|(_, v)| !v.contains(&id)));
    }

    #[test]
    fn test_update_form_carries_lookup_isbn() {
        let payload = SheetPayload::from_book(&sample_book());

        let form = payload.to_form(SyncAction::Update, Some("9780000000001"));
        assert!(form
            .iter()
            .any(|(k, v)| *k == "lookupIsbn" && v == "9780000000001"));
        assert!(form.iter().any(|(k, v)| *k == "action" && v == "update"));
    }

    #[test]
    fn test_add_form_never_carries_lookup_isbn() {
        let payload = SheetPayload::from_book(&sample_book());

        let form = payload.to_form(SyncAction::Add, Some("9780000000001"));
        assert!(form.iter().all(|(k, _)| *k != "lookupIsbn"));
        assert!(form.iter().any(|(k, v)| *k == "action" && v == "add"));
    }

    #[test]
    fn test_blank_lookup_isbn_is_omitted() {
        let payload = SheetPayload::from_book(&sample_book());

        let form = payload.to_form(SyncAction::Update, Some("  "));
        assert!(form.iter().all(|(k, _)| *k != "lookupIsbn"));
    }
}
