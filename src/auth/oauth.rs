//! GitHub OAuth flow
//!
//! Implements the OAuth 2.0 authorization code flow with GitHub.
//! Every callback outcome is a redirect back to the application root.

use axum::{
    Router,
    extract::{RawQuery, State},
    response::Redirect,
    routing::get,
};
use axum_extra::extract::CookieJar;
use subtle::ConstantTimeEq;

use super::cookies::{self, STATE_COOKIE_NAME};
use super::origin::RequestOrigin;
use crate::AppState;
use crate::error::{AppError, Result};
use crate::github::authorization_url;
use crate::metrics::{OAUTH_CALLBACKS_TOTAL, OAUTH_LOGINS_TOTAL};

/// Path GitHub redirects back to after consent
pub const CALLBACK_PATH: &str = "/api/auth/callback";

/// Create authentication router
///
/// Routes:
/// - GET /api/auth/login - Redirect to GitHub
/// - GET /api/auth/callback - OAuth callback
/// - GET|POST /api/auth/logout - Logout
/// - GET /api/auth/install - Redirect to the GitHub App installation page
pub fn auth_router() -> Router<AppState> {
    Router::new()
        .route("/api/auth/login", get(login))
        .route(CALLBACK_PATH, get(callback))
        .route("/api/auth/logout", get(logout).post(logout))
        .route("/api/auth/install", get(install))
}

// =============================================================================
// Login
// =============================================================================

/// GET /api/auth/login
///
/// # Steps
/// 1. Generate anti-forgery state
/// 2. Store state in cookie
/// 3. Redirect to GitHub with client_id, redirect_uri, state, scope
async fn login(
    State(state): State<AppState>,
    RequestOrigin(origin): RequestOrigin,
    jar: CookieJar,
) -> Result<(CookieJar, Redirect)> {
    let redirect_uri = callback_url(&origin);
    let request = authorization_url(&state.config.github, &redirect_uri, None)
        .map_err(|e| AppError::Internal(e.into()))?;

    let cookie = cookies::state_cookie(
        &request.state,
        state.config.auth.state_max_age,
        state.config.should_use_secure_cookies(),
    );

    OAUTH_LOGINS_TOTAL.with_label_values(&["github"]).inc();
    tracing::debug!(redirect_uri = %redirect_uri, "Redirecting to GitHub authorization");

    Ok((jar.add(cookie), Redirect::to(&request.url)))
}

// =============================================================================
// Callback
// =============================================================================

/// Query parameters from GitHub callback
///
/// Parsed leniently (first occurrence wins) so a malformed query still ends
/// in a redirect rather than an extractor rejection.
#[derive(Debug, Default, PartialEq, Eq)]
struct CallbackParams {
    code: Option<String>,
    state: Option<String>,
    error: Option<String>,
}

impl CallbackParams {
    fn from_query(query: Option<&str>) -> Self {
        let mut params = Self::default();

        for (key, value) in url::form_urlencoded::parse(query.unwrap_or_default().as_bytes()) {
            let slot = match key.as_ref() {
                "code" => &mut params.code,
                "state" => &mut params.state,
                "error" => &mut params.error,
                _ => continue,
            };
            if slot.is_none() && !value.is_empty() {
                *slot = Some(value.into_owned());
            }
        }

        params
    }
}

/// GET /api/auth/callback
///
/// # Steps
/// 1. Surface an upstream error, or a missing code
/// 2. Verify anti-forgery state (when enabled)
/// 3. Exchange code for access token
/// 4. Set session cookie and redirect to root
async fn callback(
    State(state): State<AppState>,
    RequestOrigin(origin): RequestOrigin,
    jar: CookieJar,
    RawQuery(query): RawQuery,
) -> (CookieJar, Redirect) {
    let params = CallbackParams::from_query(query.as_deref());

    let expected_state = jar
        .get(STATE_COOKIE_NAME)
        .map(|cookie| cookie.value().to_string());
    let jar = if expected_state.is_some() {
        jar.add(cookies::clear_state_cookie())
    } else {
        jar
    };

    if let Some(error) = params.error {
        tracing::warn!(error = %error, "OAuth error from GitHub");
        OAUTH_CALLBACKS_TOTAL
            .with_label_values(&["upstream_error"])
            .inc();
        return (jar, root_with_error(&origin, &error, None));
    }

    let Some(code) = params.code else {
        tracing::warn!("OAuth callback without code");
        OAUTH_CALLBACKS_TOTAL
            .with_label_values(&["missing_code"])
            .inc();
        return (jar, root_with_error(&origin, "missing_code", None));
    };

    if state.config.auth.verify_state
        && !states_match(params.state.as_deref(), expected_state.as_deref())
    {
        tracing::warn!(
            state_present = params.state.is_some(),
            cookie_present = expected_state.is_some(),
            "OAuth state mismatch"
        );
        OAUTH_CALLBACKS_TOTAL
            .with_label_values(&["state_mismatch"])
            .inc();
        return (jar, root_with_error(&origin, "state_mismatch", None));
    }

    let redirect_uri = callback_url(&origin);
    match state.github.exchange_code(&code, &redirect_uri).await {
        Ok(access_token) => {
            let cookie = cookies::session_cookie(
                &access_token,
                state.config.auth.session_max_age,
                state.config.should_use_secure_cookies(),
            );
            OAUTH_CALLBACKS_TOTAL.with_label_values(&["success"]).inc();
            tracing::info!("GitHub OAuth login successful");

            (jar.add(cookie), Redirect::to(&format!("{origin}/")))
        }
        Err(error) => {
            tracing::error!(error = ?error, redirect_uri = %redirect_uri, "Token exchange failed");
            OAUTH_CALLBACKS_TOTAL
                .with_label_values(&["exchange_failed"])
                .inc();

            let details = error.to_string();
            (
                jar,
                root_with_error(&origin, "token_exchange_failed", Some(&details)),
            )
        }
    }
}

// =============================================================================
// Logout
// =============================================================================

/// GET|POST /api/auth/logout
///
/// Always emits the removal cookie, whether or not a session existed.
async fn logout(RequestOrigin(origin): RequestOrigin, jar: CookieJar) -> (CookieJar, Redirect) {
    (
        jar.add(cookies::clear_session_cookie()),
        Redirect::to(&format!("{origin}/")),
    )
}

// =============================================================================
// Installation
// =============================================================================

/// GET /api/auth/install
async fn install(State(state): State<AppState>) -> Result<Redirect> {
    state
        .config
        .github
        .installation_url()
        .map(|url| Redirect::to(&url))
        .ok_or(AppError::NotFound)
}

// =============================================================================
// Helpers
// =============================================================================

fn callback_url(origin: &str) -> String {
    format!("{origin}{CALLBACK_PATH}")
}

fn root_with_error(origin: &str, error: &str, details: Option<&str>) -> Redirect {
    let mut target = format!("{origin}/?error={}", urlencoding::encode(error));
    if let Some(details) = details {
        target.push_str("&details=");
        target.push_str(&urlencoding::encode(details));
    }
    Redirect::to(&target)
}

/// Compare the echoed state with the cookie in constant time.
fn states_match(received: Option<&str>, expected: Option<&str>) -> bool {
    match (received, expected) {
        (Some(received), Some(expected)) if !expected.is_empty() => {
            let (received, expected) = (received.as_bytes(), expected.as_bytes());
            received.len() == expected.len() && bool::from(received.ct_eq(expected))
        }
        _ => false,
    }
}
