//! Session token extraction
//!
//! The session is the GitHub access token itself, kept in an HttpOnly cookie.
//! No server-side session storage.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
};
use axum_extra::extract::CookieJar;

use super::cookies::SESSION_COOKIE_NAME;
use crate::error::AppError;

/// Extractor for the bearer token carried by the session cookie
///
/// Rejects with [`AppError::Unauthorized`] when the cookie is absent or empty.
///
/// # Usage
/// ```ignore
/// async fn handler(SessionToken(token): SessionToken) -> impl IntoResponse {
///     // call GitHub with `token`
/// }
/// ```
#[derive(Clone)]
pub struct SessionToken(pub String);

impl std::fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SessionToken([redacted])")
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for SessionToken
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        jar.get(SESSION_COOKIE_NAME)
            .map(|cookie| cookie.value().trim())
            .filter(|value| !value.is_empty())
            .map(|value| SessionToken(value.to_string()))
            .ok_or(AppError::Unauthorized)
    }
}
