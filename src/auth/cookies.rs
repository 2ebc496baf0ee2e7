//! Cookie builders for the session token and the anti-forgery state

use axum_extra::extract::cookie::{Cookie, SameSite};
use time::Duration;

/// Session cookie holding the GitHub access token
pub const SESSION_COOKIE_NAME: &str = "github_token";

/// Anti-forgery state cookie, scoped to the auth routes
pub const STATE_COOKIE_NAME: &str = "oauth_state";

const STATE_COOKIE_PATH: &str = "/api/auth";

/// Create the session cookie.
///
/// Fixed TTL: the max age is set once at login and never refreshed.
pub(super) fn session_cookie(token: &str, max_age_secs: i64, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE_NAME, token.to_string()))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(Duration::seconds(max_age_secs))
        .build()
}

/// Create the removal cookie for the session.
pub(super) fn clear_session_cookie() -> Cookie<'static> {
    let mut cookie = Cookie::build((SESSION_COOKIE_NAME, "")).path("/").build();
    cookie.make_removal();
    cookie
}

/// Create the anti-forgery state cookie for a login attempt.
pub(super) fn state_cookie(state: &str, max_age_secs: i64, secure: bool) -> Cookie<'static> {
    Cookie::build((STATE_COOKIE_NAME, state.to_string()))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .path(STATE_COOKIE_PATH)
        .max_age(Duration::seconds(max_age_secs))
        .build()
}

/// Create the removal cookie for the anti-forgery state.
pub(super) fn clear_state_cookie() -> Cookie<'static> {
    let mut cookie = Cookie::build((STATE_COOKIE_NAME, ""))
        .path(STATE_COOKIE_PATH)
        .build();
    cookie.make_removal();
    cookie
}
