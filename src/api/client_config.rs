//! Public client configuration
//!
//! Non-secret values the browser shows for diagnostics.

use axum::{Json, extract::State};
use serde::Serialize;

use crate::AppState;
use crate::config::Environment;

#[derive(Debug, Serialize)]
pub struct ClientConfigResponse {
    pub client_id: String,
    pub environment: Environment,
    pub install_url: Option<String>,
}

/// GET /api/config
pub(super) async fn client_config(State(state): State<AppState>) -> Json<ClientConfigResponse> {
    let github = &state.config.github;

    Json(ClientConfigResponse {
        client_id: github.public_client_id().to_string(),
        environment: state.config.server.environment,
        install_url: github.installation_url(),
    })
}
