//! Data models for Shelf
//!
//! Defines the core data structures: Book, Quote, and the loosely-typed
//! page reference attached to quotes.

use std::cmp::Ordering;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum star rating for a book
pub const MAX_RATING: u8 = 5;

/// A page reference on a quote
///
/// Source material may use roman numerals or ranges ("xii", "102-104"),
/// so the field stays loosely typed: a number when the whole value parses
/// as one, free text otherwise. Serialized untagged so the JSON form is a
/// bare number or string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Page {
    Number(i64),
    Label(String),
}

impl Page {
    /// Parse a page reference from user input
    ///
    /// Trims whitespace; a value that parses fully as an integer becomes
    /// `Number`, anything else (including the empty string) stays a label.
    pub fn parse(input: &str) -> Self {
        let trimmed = input.trim();
        match trimmed.parse::<i64>() {
            Ok(n) => Page::Number(n),
            Err(_) => Page::Label(trimmed.to_string()),
        }
    }

    /// True when there is no page information at all
    pub fn is_empty(&self) -> bool {
        matches!(self, Page::Label(s) if s.trim().is_empty())
    }

    /// Ordering used for quote display
    ///
    /// Numeric pages sort ascending and come first, non-empty labels follow
    /// in lexicographic order, and empty references sort last (all equal).
    pub fn display_cmp(&self, other: &Page) -> Ordering {
        fn rank(page: &Page) -> u8 {
            match page {
                Page::Number(_) => 0,
                Page::Label(s) if !s.trim().is_empty() => 1,
                Page::Label(_) => 2,
            }
        }

        match (self, other) {
            (Page::Number(a), Page::Number(b)) => a.cmp(b),
            (Page::Label(a), Page::Label(b)) => {
                let (a, b) = (a.trim(), b.trim());
                if a.is_empty() && b.is_empty() {
                    Ordering::Equal
                } else {
                    a.cmp(b)
                }
            }
            _ => rank(self).cmp(&rank(other)),
        }
    }
}

impl Default for Page {
    fn default() -> Self {
        Page::Label(String::new())
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Page::Number(n) => write!(f, "{}", n),
            Page::Label(s) => write!(f, "{}", s),
        }
    }
}

/// A highlighted quote from a book
///
/// Quotes have no independent persistence; their lifecycle is entirely
/// subordinate to the owning book.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Quote {
    /// Unique within the owning book
    pub id: Uuid,
    /// The quoted text
    pub text: String,
    /// Where the quote appears
    #[serde(default)]
    pub page: Page,
}

impl Quote {
    /// Create a new quote with a generated identifier
    pub fn new(text: impl Into<String>, page: Page) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            page,
        }
    }
}

/// Fields for creating a new quote
#[derive(Debug, Clone, Default)]
pub struct QuoteDraft {
    pub text: String,
    pub page: Page,
}

/// Partial update for a quote; absent fields are preserved
#[derive(Debug, Clone, Default)]
pub struct QuotePatch {
    pub text: Option<String>,
    pub page: Option<Page>,
}

/// A book in the collection
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    /// Unique identifier, immutable once assigned
    pub id: Uuid,
    pub title: String,
    pub author: String,
    #[serde(default)]
    pub isbn: Option<String>,
    #[serde(default)]
    pub genre: String,
    /// Cover image URL
    pub cover_image: String,
    /// Star rating, 0 to `MAX_RATING`
    pub rating: u8,
    #[serde(default)]
    pub summary: String,
    /// Quotes in insertion order; display order is derived, see
    /// [`Book::sorted_quotes`]
    #[serde(default)]
    pub quotes: Vec<Quote>,
    #[serde(default)]
    pub page_count: u32,
    /// Date the book was finished, if known
    #[serde(default)]
    pub completion_date: Option<NaiveDate>,
}

impl Book {
    /// Build a book from a draft, generating a fresh identifier
    ///
    /// The caller is responsible for validating that title and author are
    /// non-empty. Unspecified fields take their defaults; the cover image
    /// falls back to a deterministic placeholder seeded by the title.
    pub fn from_draft(draft: BookDraft) -> Self {
        let title = draft.title.trim().to_string();
        let cover_image = draft
            .cover_image
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| placeholder_cover(&title));

        Self {
            id: Uuid::new_v4(),
            cover_image,
            author: draft.author.trim().to_string(),
            isbn: normalize_optional(draft.isbn),
            genre: draft.genre.unwrap_or_default(),
            rating: draft.rating.unwrap_or(0).min(MAX_RATING),
            summary: draft.summary.unwrap_or_default(),
            quotes: Vec::new(),
            page_count: draft.page_count.unwrap_or(0),
            completion_date: draft.completion_date,
            title,
        }
    }

    /// Merge a patch onto this record; fields absent from the patch are
    /// preserved. The identifier is never touched.
    pub fn apply_patch(&mut self, patch: BookPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(author) = patch.author {
            self.author = author;
        }
        if let Some(isbn) = patch.isbn {
            self.isbn = normalize_optional(isbn);
        }
        if let Some(genre) = patch.genre {
            self.genre = genre;
        }
        if let Some(cover_image) = patch.cover_image {
            self.cover_image = cover_image;
        }
        if let Some(rating) = patch.rating {
            self.rating = rating.min(MAX_RATING);
        }
        if let Some(summary) = patch.summary {
            self.summary = summary;
        }
        if let Some(page_count) = patch.page_count {
            self.page_count = page_count;
        }
        if let Some(completion_date) = patch.completion_date {
            self.completion_date = completion_date;
        }
    }

    /// Quotes in display order: numeric pages ascending, then labelled
    /// pages lexicographically, then quotes with no page reference.
    ///
    /// Computed on read; storage order stays insertion order.
    pub fn sorted_quotes(&self) -> Vec<Quote> {
        let mut quotes = self.quotes.clone();
        quotes.sort_by(|a, b| a.page.display_cmp(&b.page));
        quotes
    }

    /// Find a quote by identifier
    pub fn quote(&self, quote_id: Uuid) -> Option<&Quote> {
        self.quotes.iter().find(|q| q.id == quote_id)
    }
}

/// Fields for creating a new book; only title and author are required
#[derive(Debug, Clone, Default)]
pub struct BookDraft {
    pub title: String,
    pub author: String,
    pub isbn: Option<String>,
    pub genre: Option<String>,
    pub cover_image: Option<String>,
    pub rating: Option<u8>,
    pub summary: Option<String>,
    pub page_count: Option<u32>,
    pub completion_date: Option<NaiveDate>,
}

/// Partial update for a book
///
/// Absent (`None`) fields are preserved. The optional book fields use a
/// double `Option` so a patch can distinguish "leave as is" from "clear".
#[derive(Debug, Clone, Default)]
pub struct BookPatch {
    pub title: Option<String>,
    pub author: Option<String>,
    pub isbn: Option<Option<String>>,
    pub genre: Option<String>,
    pub cover_image: Option<String>,
    pub rating: Option<u8>,
    pub summary: Option<String>,
    pub page_count: Option<u32>,
    pub completion_date: Option<Option<NaiveDate>>,
}

/// Deterministic placeholder cover derived from the title
pub fn placeholder_cover(title: &str) -> String {
    format!(
        "https://picsum.photos/seed/{}/300/450",
        encode_seed(title.trim())
    )
}

/// Treat blank optional strings as absent
fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Percent-encode a placeholder seed (RFC 3986 unreserved set)
fn encode_seed(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for byte in input.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}
