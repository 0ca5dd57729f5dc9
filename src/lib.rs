//! prom2grafana - Turn Prometheus metric samples into Grafana dashboards
//!
//! This library provides the core functionality for the prom2grafana
//! service: configuration, model invocation with fallback, and the HTTP API.

pub mod config;
pub mod error;
pub mod generator;
pub mod web;

pub use config::Config;
pub use error::{Error, Result};
