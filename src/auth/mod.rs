//! GitHub OAuth authentication
//!
//! Handles:
//! - Request origin resolution behind reverse proxies
//! - Login, callback, logout and app installation redirects
//! - Session cookie issuance and extraction

mod cookies;
mod oauth;
pub mod origin;
pub mod session;

pub use cookies::{SESSION_COOKIE_NAME, STATE_COOKIE_NAME};
pub use oauth::{CALLBACK_PATH, auth_router};
pub use origin::{RequestOrigin, resolve_origin};
pub use session::SessionToken;
