//! RepoDeck - GitHub sign-in and repository listing
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      API Layer (Axum)                        │
//! │  - OAuth login / callback / logout redirects                │
//! │  - Repository and user proxy endpoints                      │
//! │  - Presentation page, metrics                               │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     GitHub Collaborator                      │
//! │  - Authorization URL builder                                │
//! │  - Token exchange, repository listing (reqwest)             │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - `api`: JSON endpoints, presentation page, metrics endpoint
//! - `auth`: Origin resolution, cookies, OAuth routes
//! - `github`: GitHub OAuth and REST client
//! - `config`: Configuration management
//! - `error`: Error types
//! - `metrics`: Prometheus instruments

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod github;
pub mod metrics;

use std::sync::Arc;

/// Application state shared across all handlers
///
/// Cloned for each request. Holds no per-user data: every request is
/// handled from its own cookies and headers.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<config::AppConfig>,

    /// GitHub OAuth and REST client
    pub github: Arc<dyn github::GitHubApi>,
}

impl AppState {
    /// Initialize application state
    ///
    /// # Errors
    /// Returns error if the GitHub HTTP client cannot be built
    pub fn new(config: config::AppConfig) -> Result<Self, error::AppError> {
        let github = github::GitHubClient::new(&config.github)
            .map_err(|e| error::AppError::Internal(e.into()))?;

        tracing::info!(
            api_url = %config.github.api_url,
            timeout_seconds = config.github.timeout_seconds,
            "GitHub client initialized"
        );

        Ok(Self::with_github(config, Arc::new(github)))
    }

    /// Build state around an existing GitHub implementation
    pub fn with_github(config: config::AppConfig, github: Arc<dyn github::GitHubApi>) -> Self {
        Self {
            config: Arc::new(config),
            github,
        }
    }
}

/// Build the Axum router with all routes.
///
/// This is shared by the binary and integration tests to keep route
/// composition consistent across environments.
pub fn build_router(state: AppState) -> axum::Router {
    use axum::Router;
    use tower_http::{compression::CompressionLayer, trace::TraceLayer};

    let cors_layer = build_cors_layer(&state.config.server);

    Router::new()
        .route("/health", axum::routing::get(health_check))
        .merge(api::page_router())
        .merge(auth::auth_router())
        .merge(api::api_router())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .with_state(state)
        .merge(api::metrics_router())
}

fn build_cors_layer(server: &config::ServerConfig) -> tower_http::cors::CorsLayer {
    use axum::http::{HeaderValue, Method};
    use tower_http::cors::{Any, CorsLayer};

    if !server.environment.is_production() {
        return CorsLayer::permissive();
    }

    let Some(public_url) = &server.public_url else {
        return CorsLayer::new();
    };

    let allowed_origin = public_url.trim_end_matches('/');
    match HeaderValue::from_str(allowed_origin) {
        Ok(origin) => CorsLayer::new()
            .allow_origin([origin])
            .allow_methods([Method::GET, Method::POST])
            .allow_headers(Any),
        Err(error) => {
            tracing::error!(
                %error,
                origin = %allowed_origin,
                "Failed to parse CORS origin from server public URL; denying cross-origin requests"
            );
            CorsLayer::new()
        }
    }
}

async fn health_check() -> &'static str {
    "OK"
}
