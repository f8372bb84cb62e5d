//! ISBN metadata lookup
//!
//! Fetches title, author, page count, and cover image from the Open
//! Library books API. Purely informational: the caller decides whether to
//! apply the result, and nothing here mutates local state.

use std::time::Duration;

use anyhow::Result;
use serde_json::Value;

/// Metadata returned for an ISBN
#[derive(Debug, Clone, PartialEq)]
pub struct IsbnMetadata {
    pub title: String,
    pub author: String,
    pub page_count: u32,
    pub cover_image: Option<String>,
}

/// Fetch timeout in seconds
const FETCH_TIMEOUT: u64 = 10;

/// Fetch book metadata for an ISBN (async)
///
/// Hyphens in the ISBN are stripped before lookup. Returns `None` when the
/// book is unknown or on any failure (graceful degradation).
pub async fn fetch_by_isbn(isbn: &str) -> Option<IsbnMetadata> {
    fetch_by_isbn_inner(isbn).await.ok().flatten()
}

async fn fetch_by_isbn_inner(isbn: &str) -> Result<Option<IsbnMetadata>> {
    let formatted = isbn.replace('-', "").trim().to_string();
    if formatted.is_empty() {
        return Ok(None);
    }

    let url = format!(
        "https://openlibrary.org/api/books?bibkeys=ISBN:{}&jscmd=data&format=json",
        formatted
    );

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(FETCH_TIMEOUT))
        .user_agent("Mozilla/5.0 (compatible; Shelf/1.0)")
        .build()?;

    let response = client.get(&url).send().await?;
    if !response.status().is_success() {
        return Ok(None);
    }

    let body: Value = response.json().await?;
    Ok(parse_book_payload(&body, &formatted))
}

/// Extract the fields we care about from the Open Library response
fn parse_book_payload(body: &Value, isbn: &str) -> Option<IsbnMetadata> {
    let entry = body.get(format!("ISBN:{}", isbn))?;

    let title = entry.get("title")?.as_str()?.to_string();

    let author = entry
        .get("authors")
        .and_then(Value::as_array)
        .map(|authors| {
            authors
                .iter()
                .filter_map(|a| a.get("name").and_then(Value::as_str))
                .collect::<Vec<_>>()
                .join(", ")
        })
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "Unknown author".to_string());

    let page_count = entry
        .get("number_of_pages")
        .and_then(Value::as_u64)
        .unwrap_or(0) as u32;

    // Prefer the largest available cover
    let cover_image = entry.get("cover").and_then(|cover| {
        ["large", "medium", "small"]
            .iter()
            .find_map(|size| cover.get(size).and_then(Value::as_str))
            .map(str::to_string)
    });

    Some(IsbnMetadata {
        title,
        author,
        page_count,
        cover_image,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_full_payload() {
        let body = json!({
            "ISBN:9780441013593": {
                "title": "Dune",
                "authors": [{"name": "Frank Herbert"}],
                "number_of_pages": 412,
                "cover": {
                    "small": "https://covers.openlibrary.org/b/id/1-S.jpg",
                    "medium": "https://covers.openlibrary.org/b/id/1-M.jpg",
                    "large": "https://covers.openlibrary.org/b/id/1-L.jpg"
                }
            }
        });

        let metadata = parse_book_payload(&body, "9780441013593").unwrap();
        assert_eq!(metadata.title, "Dune");
        assert_eq!(metadata.author, "Frank Herbert");
        assert_eq!(metadata.page_count, 412);
        assert_eq!(
            metadata.cover_image.as_deref(),
            Some("https://covers.openlibrary.org/b/id/1-L.jpg")
        );
    }

    #[test]
    fn test_parse_joins_multiple_authors() {
        let body = json!({
            "ISBN:1": {
                "title": "Good Omens",
                "authors": [{"name": "Terry Pratchett"}, {"name": "Neil Gaiman"}]
            }
        });

        let metadata = parse_book_payload(&body, "1").unwrap();
        assert_eq!(metadata.author, "Terry Pratchett, Neil Gaiman");
        assert_eq!(metadata.page_count, 0);
        assert!(metadata.cover_image.is_none());
    }

    #[test]
    fn test_parse_missing_authors_uses_placeholder() {
        let body = json!({
            "ISBN:1": { "title": "Anonymous Work" }
        });

        let metadata = parse_book_payload(&body, "1").unwrap();
        assert_eq!(metadata.author, "Unknown author");
    }

    #[test]
    fn test_parse_not_found() {
        let body = json!({});
        assert!(parse_book_payload(&body, "9780441013593").is_none());
    }

    #[test]
    fn test_parse_falls_back_to_smaller_cover() {
        let body = json!({
            "ISBN:1": {
                "title": "Dune",
                "cover": { "small": "https://covers.openlibrary.org/b/id/1-S.jpg" }
            }
        });

        let metadata = parse_book_payload(&body, "1").unwrap();
        assert_eq!(
            metadata.cover_image.as_deref(),
            Some("https://covers.openlibrary.org/b/id/1-S.jpg")
        );
    }
}
