//! Sheet relay client
//!
//! Pushes a book projection to the configured webhook endpoint. The relay
//! is strictly second-phase: the local mutation has already committed by
//! the time a push starts, and a push failure never affects it.

use std::time::Duration;

use thiserror::Error;
use tracing::{debug, warn};

use super::payload::{SheetPayload, SyncAction};
use crate::config::Config;

/// Push timeout in seconds
const PUSH_TIMEOUT: u64 = 10;

/// Errors from pushing to the sheet endpoint
///
/// Only transport-level failure counts; the response body is not
/// inspected.
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("could not reach sheet endpoint: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Client for the sheet webhook endpoint
#[derive(Debug, Clone)]
pub struct SheetRelay {
    client: reqwest::Client,
    endpoint: String,
}

impl SheetRelay {
    /// Create a relay for the given endpoint URL
    pub fn new(endpoint: impl Into<String>) -> Result<Self, SyncError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(PUSH_TIMEOUT))
            .build()?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    /// Build a relay from configuration
    ///
    /// Returns `None` when sync is disabled or no endpoint is configured;
    /// callers skip the push silently in that case.
    pub fn from_config(config: &Config) -> Result<Option<Self>, SyncError> {
        if !config.sync_enabled {
            return Ok(None);
        }
        let Some(ref url) = config.sync_url else {
            return Ok(None);
        };
        Self::new(url.clone()).map(Some)
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Push one book projection to the endpoint
    ///
    /// `lookup_isbn` carries the ISBN the endpoint should match for an
    /// update; without it the endpoint treats the push as always-insert.
    pub async fn push(
        &self,
        action: SyncAction,
        payload: &SheetPayload,
        lookup_isbn: Option<&str>,
    ) -> Result<(), SyncError> {
        let form = payload.to_form(action, lookup_isbn);

        debug!(action = %action, title = %payload.title, "pushing book to sheet");
        self.client
            .post(&self.endpoint)
            .form(&form)
            .send()
            .await?;

        Ok(())
    }

    /// Push without awaiting the result
    ///
    /// Spawns the request on the runtime; failure is logged as a warning
    /// and otherwise dropped. There is no cancellation: an in-flight push
    /// runs to completion or failure.
    pub fn spawn_push(
        &self,
        action: SyncAction,
        payload: SheetPayload,
        lookup_isbn: Option<String>,
    ) -> tokio::task::JoinHandle<()> {
        let relay = self.clone();
        tokio::spawn(async move {
            if let Err(e) = relay.push(action, &payload, lookup_isbn.as_deref()).await {
                warn!(error = %e, title = %payload.title, "sheet sync failed; local data is unaffected");
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Book, BookDraft};

    #[test]
    fn test_from_config_disabled() {
        let config = Config {
            sync_enabled: false,
            sync_url: Some("https://script.example.com/exec".to_string()),
            ..Default::default()
        };
        assert!(SheetRelay::from_config(&config).unwrap().is_none());
    }

    #[test]
    fn test_from_config_without_url() {
        let config = Config {
            sync_enabled: true,
            sync_url: None,
            ..Default::default()
        };
        assert!(SheetRelay::from_config(&config).unwrap().is_none());
    }

    #[test]
    fn test_from_config_enabled() {
        let config = Config {
            sync_enabled: true,
            sync_url: Some("https://script.example.com/exec".to_string()),
            ..Default::default()
        };
        let relay = SheetRelay::from_config(&config).unwrap().unwrap();
        assert_eq!(relay.endpoint(), "https://script.example.com/exec");
    }

    #[tokio::test]
    async fn test_push_failure_is_transport_error() {
        // Unroutable local endpoint; the push must fail fast with a
        // transport error and nothing else.
        let relay = SheetRelay::new("http://127.0.0.1:1/exec").unwrap();
        let book = Book::from_draft(BookDraft {
            title: "Dune".to_string(),
            author: "Frank Herbert".to_string(),
            ..Default::default()
        });
        let payload = SheetPayload::from_book(&book);

        let result = relay.push(SyncAction::Add, &payload, None).await;
        assert!(matches!(result, Err(SyncError::Transport(_))));
    }
}
