//! Shared helpers for integration tests: a scripted completion client and
//! response parsing.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use prom2grafana::config::ModelCandidates;
use prom2grafana::generator::types::{
    ChatCompletionRequest, ChatCompletionResponse, Choice, ChoiceMessage,
};
use prom2grafana::generator::{CompletionClient, DashboardGenerator, ProviderError};
use prom2grafana::web::{create_router, AppState};

/// How the stub answers a given model.
#[derive(Clone)]
pub enum Script {
    /// Provider returns an HTTP error status.
    Status(u16),
    /// Provider returns a response with no choices.
    NoChoices,
    /// Provider returns a single choice with this content.
    Content(String),
    /// Provider never answers in any reasonable time.
    Hang,
}

/// Content for a successful, schema-conforming reply.
pub fn dashboard_reply(dashboard: &str, alerts: &str) -> Script {
    Script::Content(
        serde_json::json!({
            "grafana_dashboard": dashboard,
            "prometheus_alerts": alerts,
        })
        .to_string(),
    )
}

/// Completion client that follows a per-model script and records calls.
#[derive(Default)]
pub struct StubClient {
    scripts: HashMap<String, Script>,
    calls: Mutex<Vec<ChatCompletionRequest>>,
}

impl StubClient {
    pub fn new(scripts: &[(&str, Script)]) -> Arc<Self> {
        Arc::new(Self {
            scripts: scripts
                .iter()
                .map(|(model, script)| (model.to_string(), script.clone()))
                .collect(),
            calls: Mutex::new(Vec::new()),
        })
    }

    /// Models requested so far, in call order.
    pub fn called_models(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.model.clone())
            .collect()
    }

    /// Every request received, in call order.
    pub fn requests(&self) -> Vec<ChatCompletionRequest> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl CompletionClient for StubClient {
    async fn complete(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, ProviderError> {
        self.calls.lock().unwrap().push(request.clone());

        match self.scripts.get(&request.model) {
            Some(Script::Status(status)) => Err(ProviderError::Status {
                status: *status,
                body: format!("internal failure in {}", request.model),
            }),
            Some(Script::NoChoices) | None => Ok(ChatCompletionResponse::default()),
            Some(Script::Content(content)) => Ok(ChatCompletionResponse {
                choices: vec![Choice {
                    index: 0,
                    message: ChoiceMessage {
                        role: Some("assistant".to_string()),
                        content: Some(content.clone()),
                    },
                    finish_reason: Some("stop".to_string()),
                }],
                ..Default::default()
            }),
            Some(Script::Hang) => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(ChatCompletionResponse::default())
            }
        }
    }
}

/// Build a test app over the stub with the given fallback order.
pub fn setup_app(client: Arc<StubClient>, models: &[&str]) -> axum::Router {
    setup_app_with_timeout(client, models, Duration::from_secs(30))
}

pub fn setup_app_with_timeout(
    client: Arc<StubClient>,
    models: &[&str],
    timeout: Duration,
) -> axum::Router {
    let candidates: ModelCandidates = models.iter().copied().collect();
    let generator = DashboardGenerator::new(client, candidates, "test system prompt");
    let state = AppState::new(generator).with_request_timeout(timeout);
    create_router(state)
}

/// Parse the response body as JSON and return (status_code, json_value).
pub async fn parse_body(
    response: axum::response::Response,
) -> (http::StatusCode, serde_json::Value) {
    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), 4 * 1_048_576)
        .await
        .expect("read body");
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap_or_default();
    (status, json)
}
