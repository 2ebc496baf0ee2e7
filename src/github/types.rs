//! Typed GitHub wire records
//!
//! Upstream payloads are decoded here, at the network boundary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure talking to GitHub
#[derive(Debug, Error)]
pub enum GitHubError {
    /// GitHub answered with an OAuth error payload
    #[error("{}", oauth_detail(.error, .description))]
    OAuth {
        error: String,
        description: Option<String>,
    },

    /// Network failure or timeout
    #[error("GitHub request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success status with a body we could not interpret
    #[error("GitHub returned status {status}")]
    Status { status: u16, body: String },

    /// Success status but the body did not match the expected shape
    #[error("Malformed GitHub response: {0}")]
    Decode(String),
}

fn oauth_detail<'a>(error: &'a str, description: &'a Option<String>) -> &'a str {
    description
        .as_deref()
        .filter(|description| !description.is_empty())
        .unwrap_or(error)
}

/// Token endpoint body
///
/// GitHub reports exchange failures with a 200 status and an `error` field,
/// so the body decides the outcome, not the status.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum TokenEndpointResponse {
    Denied(OAuthErrorBody),
    Granted(AccessTokenGrant),
}

#[derive(Debug, Deserialize)]
pub(crate) struct OAuthErrorBody {
    pub error: String,
    #[serde(default)]
    pub error_description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AccessTokenGrant {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
}

impl TokenEndpointResponse {
    pub(crate) fn into_access_token(self) -> Result<String, GitHubError> {
        match self {
            TokenEndpointResponse::Denied(body) => Err(GitHubError::OAuth {
                error: body.error,
                description: body.error_description,
            }),
            TokenEndpointResponse::Granted(grant) if grant.access_token.is_empty() => Err(
                GitHubError::Decode("token response carried an empty access_token".to_string()),
            ),
            TokenEndpointResponse::Granted(grant) => {
                tracing::debug!(
                    token_type = ?grant.token_type,
                    scope = ?grant.scope,
                    "GitHub granted an access token"
                );
                Ok(grant.access_token)
            }
        }
    }
}

/// Repository record as returned by `GET /user/repos`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Repository {
    pub id: u64,
    pub name: String,
    pub full_name: String,
    pub description: Option<String>,
    pub private: bool,
    #[serde(default)]
    pub archived: bool,
    pub language: Option<String>,
    #[serde(default)]
    pub stargazers_count: u64,
    pub updated_at: Option<DateTime<Utc>>,
    pub html_url: String,
}

/// Authenticated user record as returned by `GET /user`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GitHubUser {
    pub login: String,
    pub id: u64,
    pub name: Option<String>,
    pub avatar_url: String,
    pub html_url: String,
}
