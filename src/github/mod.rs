//! GitHub collaborator
//!
//! Handles:
//! - Authorization URL construction and anti-forgery state
//! - Code-for-token exchange
//! - Repository and user lookups for an access token

mod authorize;
mod client;
mod types;

pub use authorize::{AuthorizationRequest, authorization_url, generate_state};
pub use client::{GitHubApi, GitHubClient};
#[cfg(test)]
pub use client::MockGitHubApi;
pub use types::{GitHubError, GitHubUser, Repository};
