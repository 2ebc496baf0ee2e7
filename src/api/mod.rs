//! API layer
//!
//! HTTP handlers for:
//! - Repository and user proxy endpoints (session cookie required)
//! - Public client configuration
//! - Presentation page
//! - Metrics (Prometheus)

mod client_config;
pub mod metrics;
mod page;
mod repos;

use axum::{Router, routing::get};

use crate::AppState;

pub use client_config::ClientConfigResponse;
pub use metrics::metrics_router;
pub use repos::{ReposResponse, UserResponse};

/// Create JSON API router
///
/// Routes:
/// - GET /api/repos
/// - GET /api/user
/// - GET /api/config
pub fn api_router() -> Router<AppState> {
    Router::new()
        .route("/api/repos", get(repos::list_repos))
        .route("/api/user", get(repos::current_user))
        .route("/api/config", get(client_config::client_config))
}

/// Create presentation router
///
/// Routes:
/// - GET /
pub fn page_router() -> Router<AppState> {
    Router::new().route("/", get(page::index))
}
