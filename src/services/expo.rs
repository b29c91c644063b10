use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

use crate::models::{PushMessage, PushTicket};

/// Default Expo push endpoint.
pub const DEFAULT_PUSH_ENDPOINT: &str = "https://exp.host/--/api/v2/push/send";

/// Expo rejects batches above this size; the dispatcher never submits more
/// messages than this in a single call.
pub const PUSH_CHUNK_LIMIT: usize = 100;

/// Errors that can occur when talking to the push gateway
#[derive(Debug, Error)]
pub enum PushError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Push API returned error: {0}")]
    ApiError(String),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// The narrow surface of the push gateway the dispatcher depends on.
///
/// Implemented by [`ExpoClient`] for production and by in-memory fakes in
/// tests, so the matcher and dispatcher never need network access to be
/// exercised.
#[async_trait]
pub trait PushProvider: Send + Sync {
    /// Whether a token is syntactically deliverable.
    fn is_valid_token(&self, token: &str) -> bool;

    /// Partition messages into batches acceptable to the gateway.
    /// Concatenating the batches yields the input exactly, in order.
    fn chunk(&self, messages: Vec<PushMessage>) -> Vec<Vec<PushMessage>>;

    /// Submit one batch and return its delivery tickets.
    async fn send(&self, batch: &[PushMessage]) -> Result<Vec<PushTicket>, PushError>;
}

/// Expo push API client
///
/// Handles communication with the Expo push gateway: token-format
/// validation, chunking under the provider batch limit, and batch
/// submission returning delivery tickets.
pub struct ExpoClient {
    endpoint: String,
    access_token: Option<String>,
    client: Client,
}

impl ExpoClient {
    /// Create a new Expo client
    pub fn new(endpoint: String, access_token: Option<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            endpoint,
            access_token,
            client,
        }
    }
}

impl Default for ExpoClient {
    fn default() -> Self {
        Self::new(DEFAULT_PUSH_ENDPOINT.to_string(), None)
    }
}

/// Expo token-format check: `ExponentPushToken[...]` or `ExpoPushToken[...]`
/// with a non-empty body.
pub fn is_expo_push_token(token: &str) -> bool {
    let body = token
        .strip_prefix("ExponentPushToken[")
        .or_else(|| token.strip_prefix("ExpoPushToken["));

    match body {
        Some(rest) => rest.len() > 1 && rest.ends_with(']'),
        None => false,
    }
}

#[async_trait]
impl PushProvider for ExpoClient {
    fn is_valid_token(&self, token: &str) -> bool {
        is_expo_push_token(token)
    }

    fn chunk(&self, messages: Vec<PushMessage>) -> Vec<Vec<PushMessage>> {
        let mut chunks = Vec::with_capacity(messages.len().div_ceil(PUSH_CHUNK_LIMIT));
        let mut rest = messages.into_iter();

        loop {
            let chunk: Vec<PushMessage> = rest.by_ref().take(PUSH_CHUNK_LIMIT).collect();
            if chunk.is_empty() {
                break;
            }
            chunks.push(chunk);
        }

        chunks
    }

    async fn send(&self, batch: &[PushMessage]) -> Result<Vec<PushTicket>, PushError> {
        let mut request = self
            .client
            .post(&self.endpoint)
            .header("Accept", "application/json")
            .json(batch);

        if let Some(token) = &self.access_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;

        if !response.status().is_success() {
            return Err(PushError::ApiError(format!(
                "Failed to submit push batch: {}",
                response.status()
            )));
        }

        let json: Value = response.json().await?;

        let data = json
            .get("data")
            .ok_or_else(|| PushError::InvalidResponse("Missing data array".into()))?;

        let tickets: Vec<PushTicket> = serde_json::from_value(data.clone())
            .map_err(|e| PushError::InvalidResponse(format!("Failed to parse tickets: {}", e)))?;

        tracing::debug!("Submitted {} messages, got {} tickets", batch.len(), tickets.len());

        Ok(tickets)
    }
}
