//! Chat completion client.
//!
//! [`CompletionClient`] is the seam between the fallback loop and the
//! network. [`OpenAiClient`] talks to any OpenAI-compatible endpoint.

use std::time::Duration;

use async_trait::async_trait;
use axum::http::header;
use reqwest::Client;

use super::types::{ChatCompletionRequest, ChatCompletionResponse};
use crate::config::{ApiKey, ProviderConfig};

/// Errors from a single completion call.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("request to provider failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("provider returned {status}: {body}")]
    Status { status: u16, body: String },
}

/// A chat completion endpoint.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Send one chat completion request and return the decoded response.
    async fn complete(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, ProviderError>;
}

/// Client for an OpenAI-compatible `/chat/completions` endpoint.
#[derive(Clone)]
pub struct OpenAiClient {
    http_client: Client,
    completions_url: String,
    api_key: ApiKey,
}

impl OpenAiClient {
    /// Create a client sharing the given connection pool.
    pub fn new(http_client: Client, base_url: &str, api_key: ApiKey) -> Self {
        Self {
            http_client,
            completions_url: format!("{}/chat/completions", base_url.trim_end_matches('/')),
            api_key,
        }
    }

    /// Build a client with its own connection pool from provider settings.
    pub fn from_config(config: &ProviderConfig) -> Result<Self, reqwest::Error> {
        // The per-request deadline is enforced by the caller; this only
        // bounds connections that outlive it.
        let http_client = Client::builder()
            .timeout(Duration::from_secs(120))
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self::new(http_client, &config.base_url, config.api_key.clone()))
    }

    pub fn completions_url(&self) -> &str {
        &self.completions_url
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn complete(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, ProviderError> {
        let response = self
            .http_client
            .post(&self.completions_url)
            .header(header::CONTENT_TYPE, "application/json")
            .bearer_auth(self.api_key.expose_secret())
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json::<ChatCompletionResponse>().await?)
    }
}
