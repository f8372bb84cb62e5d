//! Book command handlers

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;

use shelf_core::{
    search, BookDraft, BookPatch, Config, Library, SearchMode, SearchResults, SyncAction,
};

use super::{confirm, parse_book_id, push_to_sheet};
use crate::metadata::fetch_by_isbn;
use crate::output::Output;
use crate::review;

/// Fields shared by `book add` and `book update`
#[derive(Debug, Clone, Default, clap::Args)]
pub struct BookFields {
    /// ISBN (empty string clears it on update)
    #[arg(long)]
    pub isbn: Option<String>,
    /// Genre
    #[arg(long)]
    pub genre: Option<String>,
    /// Star rating, 0-5
    #[arg(long)]
    pub rating: Option<u8>,
    /// Free-text summary
    #[arg(long)]
    pub summary: Option<String>,
    /// Page count
    #[arg(long)]
    pub pages: Option<u32>,
    /// Completion date, YYYY-MM-DD (empty string clears it on update)
    #[arg(long)]
    pub completed: Option<String>,
    /// Cover image URL
    #[arg(long)]
    pub cover: Option<String>,
}

/// Add a new book
pub async fn add(
    library: &mut Library,
    config: &Config,
    title: String,
    author: String,
    fields: BookFields,
    lookup: bool,
    output: &Output,
) -> Result<()> {
    let mut draft = BookDraft {
        title,
        author,
        isbn: fields.isbn.clone(),
        genre: fields.genre,
        cover_image: fields.cover,
        rating: fields.rating,
        summary: fields.summary,
        page_count: fields.pages,
        completion_date: parse_completed(fields.completed.as_deref())?,
    };

    // Prefill missing fields from Open Library when asked
    if lookup {
        let Some(ref isbn) = draft.isbn else {
            bail!("--lookup requires --isbn");
        };
        match fetch_by_isbn(isbn).await {
            Some(metadata) => {
                if draft.title.trim().is_empty() {
                    draft.title = metadata.title;
                }
                if draft.author.trim().is_empty() {
                    draft.author = metadata.author;
                }
                if draft.page_count.is_none() && metadata.page_count > 0 {
                    draft.page_count = Some(metadata.page_count);
                }
                if draft.cover_image.is_none() {
                    draft.cover_image = metadata.cover_image;
                }
            }
            None => output.message(&format!("No metadata found for ISBN {}", isbn)),
        }
    }

    let book = library.add_book(draft).context("Failed to add book")?;

    push_to_sheet(config, SyncAction::Add, &book, None, output).await;

    output.success(&format!("Added book: {}", book.id));
    output.print_book(&book);

    Ok(())
}

/// List all books
pub fn list(library: &Library, output: &Output) -> Result<()> {
    output.print_books(library.books());
    Ok(())
}

/// Show a single book
pub fn show(library: &Library, id: String, output: &Output) -> Result<()> {
    let uuid = parse_book_id(&id, library)?;
    let book = library
        .book(uuid)
        .ok_or_else(|| anyhow::anyhow!("Book not found: {}", id))?;

    output.print_book(book);
    Ok(())
}

/// Update a book from field flags
pub async fn update(
    library: &mut Library,
    config: &Config,
    id: String,
    title: Option<String>,
    author: Option<String>,
    fields: BookFields,
    output: &Output,
) -> Result<()> {
    let uuid = parse_book_id(&id, library)?;

    // The sheet row is matched by the pre-edit ISBN so a local ISBN edit
    // does not orphan the external row.
    let original_isbn = library.book(uuid).and_then(|b| b.isbn.clone());

    let patch = BookPatch {
        title,
        author,
        isbn: fields.isbn.map(clear_when_blank),
        genre: fields.genre,
        cover_image: fields.cover,
        rating: fields.rating,
        summary: fields.summary,
        page_count: fields.pages,
        completion_date: match fields.completed.as_deref() {
            Some(raw) => Some(parse_completed(Some(raw))?),
            None => None,
        },
    };

    let updated = library
        .update_book(uuid, patch)
        .context("Failed to update book")?
        .ok_or_else(|| anyhow::anyhow!("Book not found: {}", id))?;

    let lookup_isbn = original_isbn.or_else(|| updated.isbn.clone());
    push_to_sheet(
        config,
        SyncAction::Update,
        &updated,
        lookup_isbn.as_deref(),
        output,
    )
    .await;

    output.success("Book updated");
    output.print_book(&updated);

    Ok(())
}

/// Delete a book
pub fn delete(library: &mut Library, id: String, output: &Output) -> Result<()> {
    let uuid = parse_book_id(&id, library)?;
    let book = library
        .book(uuid)
        .ok_or_else(|| anyhow::anyhow!("Book not found: {}", id))?;

    if output.should_prompt() {
        println!("Delete book: {} - {}", &uuid.to_string()[..8], book.title);
        if !confirm("Are you sure?")? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    library.delete_book(uuid).context("Failed to delete book")?;

    output.success(&format!("Deleted book: {}", uuid));

    Ok(())
}

/// Search the collection
pub fn search_books(library: &Library, query: String, by: SearchMode, output: &Output) -> Result<()> {
    match search(library.books(), &query, by) {
        SearchResults::Books(books) => output.print_books(&books),
        SearchResults::Quotes(matches) => output.print_quote_matches(&matches),
    }
    Ok(())
}

/// Generate an AI review and store it as the book's summary
pub async fn generate_review(
    library: &mut Library,
    config: &Config,
    id: String,
    output: &Output,
) -> Result<()> {
    let uuid = parse_book_id(&id, library)?;
    let book = library
        .book(uuid)
        .ok_or_else(|| anyhow::anyhow!("Book not found: {}", id))?;

    output.message(&format!("Generating review for \"{}\"...", book.title));
    let review = review::generate(&book.title, &book.author).await;

    let lookup_isbn = book.isbn.clone();
    let updated = library
        .update_book(
            uuid,
            BookPatch {
                summary: Some(review),
                ..Default::default()
            },
        )
        .context("Failed to store review")?
        .ok_or_else(|| anyhow::anyhow!("Book not found: {}", id))?;

    push_to_sheet(
        config,
        SyncAction::Update,
        &updated,
        lookup_isbn.as_deref(),
        output,
    )
    .await;

    output.success("Review saved as summary");
    output.message(&updated.summary);

    Ok(())
}

/// Blank strings from `--isbn ""` clear the field
fn clear_when_blank(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

/// Parse a `--completed` value; empty clears the date
fn parse_completed(raw: Option<&str>) -> Result<Option<NaiveDate>> {
    match raw {
        None => Ok(None),
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => {
            let date = NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
                .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))?;
            Ok(Some(date))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_completed() {
        assert_eq!(parse_completed(None).unwrap(), None);
        assert_eq!(parse_completed(Some("")).unwrap(), None);
        assert_eq!(
            parse_completed(Some("2026-02-10")).unwrap(),
            NaiveDate::from_ymd_opt(2026, 2, 10)
        );
        assert!(parse_completed(Some("02/10/2026")).is_err());
    }

    #[test]
    fn test_clear_when_blank() {
        assert_eq!(clear_when_blank("  ".to_string()), None);
        assert_eq!(
            clear_when_blank("9780441013593".to_string()),
            Some("9780441013593".to_string())
        );
    }
}
