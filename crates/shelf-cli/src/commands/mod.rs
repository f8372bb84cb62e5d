//! Command handlers

pub mod book;
pub mod config;
pub mod quote;
pub mod status;

use std::io::{self, Write};

use anyhow::{bail, Result};
use uuid::Uuid;

use shelf_core::{Book, Config, Library, SheetPayload, SheetRelay, SyncAction};

use crate::output::Output;

/// Mirror a book's current state to the sheet endpoint, best effort
///
/// The local mutation has already committed by the time this runs. Skipped
/// silently when sync is disabled or unconfigured; a failed push prints a
/// non-fatal warning and nothing more (no retry, no rollback).
pub async fn push_to_sheet(
    config: &Config,
    action: SyncAction,
    book: &Book,
    lookup_isbn: Option<&str>,
    output: &Output,
) {
    let relay = match SheetRelay::from_config(config) {
        Ok(Some(relay)) => relay,
        Ok(None) => return,
        Err(e) => {
            output.warn(&format!("Sheet sync unavailable: {}", e));
            return;
        }
    };

    let payload = SheetPayload::from_book(book);
    if let Err(e) = relay.push(action, &payload, lookup_isbn).await {
        output.warn(&format!(
            "Saved locally, but failed to sync to sheet: {}",
            e
        ));
    }
}

/// Ask the user a yes/no question
pub fn confirm(prompt: &str) -> Result<bool> {
    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let answer = input.trim().to_lowercase();

    Ok(answer == "y" || answer == "yes")
}

/// Parse a book ID (supports full UUID or unambiguous prefix)
pub fn parse_book_id(id: &str, library: &Library) -> Result<Uuid> {
    if let Ok(uuid) = Uuid::parse_str(id) {
        return Ok(uuid);
    }

    let matches: Vec<Uuid> = library
        .books()
        .iter()
        .filter(|b| b.id.to_string().starts_with(id))
        .map(|b| b.id)
        .collect();

    match matches.len() {
        0 => bail!("No book found matching ID: {}", id),
        1 => Ok(matches[0]),
        n => bail!("Ambiguous ID prefix '{}' matches {} books", id, n),
    }
}

/// Parse a quote ID within a book (supports full UUID or prefix)
pub fn parse_quote_id(id: &str, book: &Book) -> Result<Uuid> {
    if let Ok(uuid) = Uuid::parse_str(id) {
        return Ok(uuid);
    }

    let matches: Vec<Uuid> = book
        .quotes
        .iter()
        .filter(|q| q.id.to_string().starts_with(id))
        .map(|q| q.id)
        .collect();

    match matches.len() {
        0 => bail!("No quote found matching ID: {}", id),
        1 => Ok(matches[0]),
        n => bail!("Ambiguous ID prefix '{}' matches {} quotes", id, n),
    }
}
