//! AI review generation
//!
//! Produces a short prose review for a book via the Gemini REST API.
//! Treated as an opaque string-producing collaborator: there are no side
//! effects on the data model, and every failure degrades to a fixed
//! fallback string.

use std::time::Duration;

use anyhow::{anyhow, Result};
use serde_json::{json, Value};

/// Environment variable holding the API key
const API_KEY_VAR: &str = "SHELF_GEMINI_API_KEY";

/// Generation endpoint
const GENERATE_URL: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent";

/// Request timeout in seconds
const GENERATE_TIMEOUT: u64 = 30;

/// Shown when no API key is configured
const KEY_MISSING_FALLBACK: &str =
    "AI review is unavailable: set SHELF_GEMINI_API_KEY to enable review generation.";

/// Shown when the generation call fails
const ERROR_FALLBACK: &str = "Could not generate a review right now. Please try again later.";

/// Generate a one-paragraph review for a book
///
/// Never fails: a missing key or a failed call returns a fixed fallback
/// string instead.
pub async fn generate(title: &str, author: &str) -> String {
    let Ok(api_key) = std::env::var(API_KEY_VAR) else {
        return KEY_MISSING_FALLBACK.to_string();
    };
    if api_key.trim().is_empty() {
        return KEY_MISSING_FALLBACK.to_string();
    }

    match generate_inner(title, author, &api_key).await {
        Ok(review) => review,
        Err(e) => {
            tracing::warn!(error = %e, "review generation failed");
            ERROR_FALLBACK.to_string()
        }
    }
}

async fn generate_inner(title: &str, author: &str, api_key: &str) -> Result<String> {
    let prompt = format!(
        "Write a short, insightful one-paragraph review of the book \"{}\" by {}.",
        title, author
    );

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(GENERATE_TIMEOUT))
        .build()?;

    let body = json!({
        "contents": [{ "parts": [{ "text": prompt }] }]
    });

    let response = client
        .post(format!("{}?key={}", GENERATE_URL, api_key))
        .json(&body)
        .send()
        .await?
        .error_for_status()?;

    let payload: Value = response.json().await?;
    extract_text(&payload).ok_or_else(|| anyhow!("response contained no generated text"))
}

/// Pull the generated text out of a generateContent response
fn extract_text(payload: &Value) -> Option<String> {
    let text = payload
        .get("candidates")?
        .get(0)?
        .get("content")?
        .get("parts")?
        .get(0)?
        .get("text")?
        .as_str()?
        .trim();

    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_text() {
        let payload = json!({
            "candidates": [{
                "content": { "parts": [{ "text": "  A sweeping epic.  " }] }
            }]
        });

        assert_eq!(extract_text(&payload).as_deref(), Some("A sweeping epic."));
    }

    #[test]
    fn test_extract_text_missing_candidates() {
        assert!(extract_text(&json!({})).is_none());
        assert!(extract_text(&json!({"candidates": []})).is_none());
    }

    #[test]
    fn test_extract_text_empty_string() {
        let payload = json!({
            "candidates": [{
                "content": { "parts": [{ "text": "   " }] }
            }]
        });
        assert!(extract_text(&payload).is_none());
    }
}
