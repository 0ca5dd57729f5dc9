//! HTTP server module.
//!
//! Serves the conversion API, the bundled web UI and a health endpoint.

mod assets;
mod handlers;
mod server;
pub mod types;

pub use server::{
    build_state, create_router, run_server, AppState, RequestId, MAX_BODY_BYTES,
    REQUEST_ID_HEADER, REQUEST_TIMEOUT,
};
pub use types::{ConvertRequest, HealthResponse};
