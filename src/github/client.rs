//! GitHub HTTP client
//!
//! One `reqwest::Client` per process. Every call is single-attempt and
//! bounded by the configured timeout.

use std::time::{Duration, Instant};

use axum::async_trait;
use reqwest::header::{ACCEPT, HeaderValue};
use serde::Serialize;

use super::types::{GitHubError, GitHubUser, Repository, TokenEndpointResponse};
use crate::config::GitHubOAuthConfig;

const GITHUB_JSON: &str = "application/vnd.github+json";
const GITHUB_API_VERSION: &str = "2022-11-28";

/// Upstream operations the HTTP handlers depend on
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GitHubApi: Send + Sync {
    /// Exchange a one-time authorization code for a bearer access token.
    ///
    /// `redirect_uri` must be the exact value sent with the authorization request.
    async fn exchange_code(&self, code: &str, redirect_uri: &str) -> Result<String, GitHubError>;

    /// Repositories the token's user owns, collaborates on, or reaches through
    /// organization membership, most recently updated first (one page of 30).
    async fn list_repositories(&self, access_token: &str) -> Result<Vec<Repository>, GitHubError>;

    /// The user the token belongs to.
    async fn get_authenticated_user(&self, access_token: &str) -> Result<GitHubUser, GitHubError>;
}

/// `reqwest`-backed [`GitHubApi`]
pub struct GitHubClient {
    http: reqwest::Client,
    client_id: String,
    client_secret: String,
    token_url: String,
    api_url: String,
}

#[derive(Serialize)]
struct TokenExchangeRequest<'a> {
    client_id: &'a str,
    client_secret: &'a str,
    code: &'a str,
    redirect_uri: &'a str,
}

impl GitHubClient {
    /// Create a client from configuration
    ///
    /// # Errors
    /// Returns error if the underlying HTTP client cannot be built
    pub fn new(config: &GitHubOAuthConfig) -> Result<Self, GitHubError> {
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self::with_http_client(config, http))
    }

    /// Use a caller-built HTTP client
    pub fn with_http_client(config: &GitHubOAuthConfig, http: reqwest::Client) -> Self {
        Self {
            http,
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            token_url: config.token_url.clone(),
            api_url: config.api_url.trim_end_matches('/').to_string(),
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        endpoint: &'static str,
        path: &str,
        query: &[(&str, &str)],
        access_token: &str,
    ) -> Result<T, GitHubError> {
        let started = Instant::now();
        let result = self
            .http
            .get(format!("{}{}", self.api_url, path))
            .query(query)
            .bearer_auth(access_token)
            .header(ACCEPT, HeaderValue::from_static(GITHUB_JSON))
            .header("X-GitHub-Api-Version", GITHUB_API_VERSION)
            .send()
            .await;

        let response = match result {
            Ok(response) => response,
            Err(error) => {
                crate::metrics::observe_upstream(endpoint, "network_error", started.elapsed());
                return Err(error.into());
            }
        };

        let status = response.status();
        crate::metrics::observe_upstream(endpoint, status.as_str(), started.elapsed());

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GitHubError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| GitHubError::Decode(e.to_string()))
    }
}

#[async_trait]
impl GitHubApi for GitHubClient {
    async fn exchange_code(&self, code: &str, redirect_uri: &str) -> Result<String, GitHubError> {
        let started = Instant::now();
        let result = self
            .http
            .post(self.token_url.as_str())
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .json(&TokenExchangeRequest {
                client_id: &self.client_id,
                client_secret: &self.client_secret,
                code,
                redirect_uri,
            })
            .send()
            .await;

        let response = match result {
            Ok(response) => response,
            Err(error) => {
                crate::metrics::observe_upstream("token", "network_error", started.elapsed());
                return Err(error.into());
            }
        };

        let status = response.status();
        crate::metrics::observe_upstream("token", status.as_str(), started.elapsed());
        let body = response.text().await?;

        match serde_json::from_str::<TokenEndpointResponse>(&body) {
            Ok(parsed) => parsed.into_access_token(),
            Err(_) if !status.is_success() => Err(GitHubError::Status {
                status: status.as_u16(),
                body,
            }),
            Err(error) => Err(GitHubError::Decode(error.to_string())),
        }
    }

    async fn list_repositories(&self, access_token: &str) -> Result<Vec<Repository>, GitHubError> {
        let repos: Vec<Repository> = self
            .get_json(
                "user_repos",
                "/user/repos",
                &[
                    ("sort", "updated"),
                    ("per_page", "30"),
                    ("affiliation", "owner,collaborator,organization_member"),
                ],
                access_token,
            )
            .await?;

        let private = repos.iter().filter(|repo| repo.private).count();
        tracing::debug!(
            total = repos.len(),
            private,
            public = repos.len() - private,
            "Fetched repositories"
        );

        Ok(repos)
    }

    async fn get_authenticated_user(&self, access_token: &str) -> Result<GitHubUser, GitHubError> {
        self.get_json("user", "/user", &[], access_token).await
    }
}
