//! Quote command handlers
//!
//! Every quote mutation rewrites the owning book and then mirrors the
//! whole record to the sheet as an update keyed by the book's ISBN.

use anyhow::{Context, Result};

use shelf_core::{Config, Library, Page, QuoteDraft, QuotePatch, SyncAction};

use super::{confirm, parse_book_id, parse_quote_id, push_to_sheet};
use crate::output::Output;

/// Add a quote to a book
pub async fn add(
    library: &mut Library,
    config: &Config,
    book_id: String,
    text: String,
    page: Option<String>,
    output: &Output,
) -> Result<()> {
    let uuid = parse_book_id(&book_id, library)?;

    let draft = QuoteDraft {
        text,
        page: page.as_deref().map(Page::parse).unwrap_or_default(),
    };

    let updated = library
        .add_quote(uuid, draft)
        .context("Failed to add quote")?
        .ok_or_else(|| anyhow::anyhow!("Book not found: {}", book_id))?;

    let lookup_isbn = updated.isbn.clone();
    push_to_sheet(
        config,
        SyncAction::Update,
        &updated,
        lookup_isbn.as_deref(),
        output,
    )
    .await;

    if let Some(quote) = updated.quotes.last() {
        output.success(&format!("Added quote: {}", quote.id));
    }

    Ok(())
}

/// List a book's quotes in display order
pub fn list(library: &Library, book_id: String, output: &Output) -> Result<()> {
    let uuid = parse_book_id(&book_id, library)?;
    let book = library
        .book(uuid)
        .ok_or_else(|| anyhow::anyhow!("Book not found: {}", book_id))?;

    output.print_quotes(book);
    Ok(())
}

/// Update a quote's text or page
pub async fn update(
    library: &mut Library,
    config: &Config,
    book_id: String,
    quote_id: String,
    text: Option<String>,
    page: Option<String>,
    output: &Output,
) -> Result<()> {
    let book_uuid = parse_book_id(&book_id, library)?;
    let book = library
        .book(book_uuid)
        .ok_or_else(|| anyhow::anyhow!("Book not found: {}", book_id))?;
    let quote_uuid = parse_quote_id(&quote_id, book)?;

    let patch = QuotePatch {
        text,
        page: page.as_deref().map(Page::parse),
    };

    let updated = library
        .update_quote(book_uuid, quote_uuid, patch)
        .context("Failed to update quote")?
        .ok_or_else(|| anyhow::anyhow!("Quote not found: {}", quote_id))?;

    let lookup_isbn = updated.isbn.clone();
    push_to_sheet(
        config,
        SyncAction::Update,
        &updated,
        lookup_isbn.as_deref(),
        output,
    )
    .await;

    output.success("Quote updated");

    Ok(())
}

/// Delete a quote from a book
pub async fn delete(
    library: &mut Library,
    config: &Config,
    book_id: String,
    quote_id: String,
    output: &Output,
) -> Result<()> {
    let book_uuid = parse_book_id(&book_id, library)?;
    let book = library
        .book(book_uuid)
        .ok_or_else(|| anyhow::anyhow!("Book not found: {}", book_id))?;
    let quote_uuid = parse_quote_id(&quote_id, book)?;

    if output.should_prompt() {
        if let Some(quote) = book.quote(quote_uuid) {
            println!("Delete quote: \"{}\"", quote.text);
        }
        if !confirm("Are you sure?")? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    let updated = library
        .delete_quote(book_uuid, quote_uuid)
        .context("Failed to delete quote")?
        .ok_or_else(|| anyhow::anyhow!("Quote not found: {}", quote_id))?;

    let lookup_isbn = updated.isbn.clone();
    push_to_sheet(
        config,
        SyncAction::Update,
        &updated,
        lookup_isbn.as_deref(),
        output,
    )
    .await;

    output.success(&format!("Deleted quote: {}", quote_uuid));

    Ok(())
}
