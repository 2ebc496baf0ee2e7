//! Authenticated GitHub proxy endpoints
//!
//! Forward the session token to GitHub and relay the result as JSON.
//! An upstream failure never yields a partial list.

use axum::{Json, extract::State};
use serde::Serialize;

use crate::AppState;
use crate::auth::SessionToken;
use crate::error::{AppError, Result};
use crate::github::{GitHubUser, Repository};

/// Body of `GET /api/repos`
#[derive(Debug, Serialize)]
pub struct ReposResponse {
    pub repos: Vec<Repository>,
}

/// Body of `GET /api/user`
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub user: GitHubUser,
}

/// GET /api/repos
///
/// 401 without a session cookie, 500 when GitHub fails, otherwise the
/// repositories in the order GitHub returned them.
pub(super) async fn list_repos(
    State(state): State<AppState>,
    SessionToken(token): SessionToken,
) -> Result<Json<ReposResponse>> {
    let repos = state
        .github
        .list_repositories(&token)
        .await
        .map_err(AppError::RepositoryFetch)?;

    tracing::info!(count = repos.len(), "Found repositories");

    Ok(Json(ReposResponse { repos }))
}

/// GET /api/user
pub(super) async fn current_user(
    State(state): State<AppState>,
    SessionToken(token): SessionToken,
) -> Result<Json<UserResponse>> {
    let user = state
        .github
        .get_authenticated_user(&token)
        .await
        .map_err(AppError::UserFetch)?;

    Ok(Json(UserResponse { user }))
}
