//! HTTP server setup and configuration.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{DefaultBodyLimit, Request},
    http::{HeaderName, HeaderValue},
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use super::handlers;
use crate::config::Config;
use crate::generator::{prompt, DashboardGenerator, OpenAiClient};

/// Maximum accepted request body for `/convert` (1 MiB).
pub const MAX_BODY_BYTES: usize = 1 << 20;

/// Deadline for a whole conversion, across all model attempts.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Response header carrying the request correlation ID (UUID v4).
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Correlation ID assigned to every inbound request.
#[derive(Debug, Clone, Copy)]
pub struct RequestId(pub Uuid);

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub generator: Arc<DashboardGenerator>,
    pub request_timeout: Duration,
}

impl AppState {
    pub fn new(generator: DashboardGenerator) -> Self {
        Self {
            generator: Arc::new(generator),
            request_timeout: REQUEST_TIMEOUT,
        }
    }

    /// Override the conversion deadline.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

/// Create the axum router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    let convert = post(handlers::convert)
        .fallback(handlers::method_not_allowed)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES));

    Router::new()
        .route("/", get(handlers::index))
        .route("/static/*path", get(handlers::static_asset))
        .route("/convert", convert)
        .route("/health", get(handlers::health))
        .fallback(handlers::not_found)
        // State and middleware
        .with_state(state)
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request| {
                let request_id = request
                    .extensions()
                    .get::<RequestId>()
                    .map(|id| id.0.to_string())
                    .unwrap_or_default();
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    path = %request.uri().path(),
                    request_id = %request_id,
                )
            }),
        )
        .layer(middleware::from_fn(assign_request_id))
}

/// Tag the request with a fresh [`RequestId`] and echo it in the response.
async fn assign_request_id(mut request: Request, next: Next) -> Response {
    let request_id = RequestId(Uuid::new_v4());
    request.extensions_mut().insert(request_id);

    let mut response = next.run(request).await;
    if let Ok(value) = HeaderValue::from_str(&request_id.0.to_string()) {
        response
            .headers_mut()
            .insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
    }
    response
}

/// Build application state from configuration: HTTP client, generator, prompt.
pub fn build_state(config: &Config) -> anyhow::Result<AppState> {
    let client = OpenAiClient::from_config(&config.provider)?;
    tracing::debug!(url = %client.completions_url(), "API client created");

    let generator = DashboardGenerator::new(
        Arc::new(client),
        config.candidates(),
        prompt::system_prompt(),
    );
    Ok(AppState::new(generator))
}

/// Run the HTTP server.
pub async fn run_server(config: Config) -> anyhow::Result<()> {
    let state = build_state(&config)?;
    let app = create_router(state);

    let listen_addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    let listener = tokio::net::TcpListener::bind(listen_addr).await?;
    tracing::info!(
        address = %listen_addr,
        url = %format!("http://localhost:{}", config.server.port),
        models = %config.candidates(),
        "Server starting"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Resolve when the process receives Ctrl+C.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
