//! Authorization URL builder

use base64::{Engine as _, engine::general_purpose};
use rand::RngCore;
use url::Url;

use crate::config::GitHubOAuthConfig;

/// Authorization redirect plus the state it carries
#[derive(Debug, Clone)]
pub struct AuthorizationRequest {
    pub url: String,
    pub state: String,
}

/// Generate a random anti-forgery state token
///
/// 32 random bytes, base64url without padding.
pub fn generate_state() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}

/// Build the GitHub authorization URL
///
/// # Arguments
/// * `config` - GitHub OAuth settings (client id, endpoint, scope)
/// * `redirect_uri` - Absolute callback URL GitHub sends the user back to
/// * `state` - Caller-supplied state; a fresh one is generated when `None`
///
/// # Errors
/// Returns error if the configured authorize endpoint is not a valid URL
pub fn authorization_url(
    config: &GitHubOAuthConfig,
    redirect_uri: &str,
    state: Option<&str>,
) -> Result<AuthorizationRequest, url::ParseError> {
    let state = state.map_or_else(generate_state, ToOwned::to_owned);

    let mut url = Url::parse(&config.authorize_url)?;
    url.query_pairs_mut()
        .append_pair("client_id", &config.client_id)
        .append_pair("redirect_uri", redirect_uri)
        .append_pair("state", &state)
        .append_pair("scope", &config.scope);

    Ok(AuthorizationRequest {
        url: url.into(),
        state,
    })
}
