//! Request origin resolution
//!
//! Container and proxy deployments terminate TLS and rewrite `Host` before the
//! request reaches us, so the request's own URL can name an internal address.
//! In production the forwarding headers restore the public origin.

use std::convert::Infallible;
use std::str::FromStr;

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{HeaderMap, Uri, header::HOST, request::Parts, uri::Authority},
};

use crate::AppState;
use crate::config::Environment;

const X_FORWARDED_HOST: &str = "x-forwarded-host";
const X_FORWARDED_PROTO: &str = "x-forwarded-proto";

/// Resolve the externally reachable origin (`scheme://host`, no path).
///
/// # Arguments
/// * `headers` - Inbound request headers
/// * `request_origin` - Origin of the request's own URL
/// * `environment` - Only production trusts forwarding headers
pub fn resolve_origin(headers: &HeaderMap, request_origin: &str, environment: Environment) -> String {
    if environment.is_production() {
        let host = header_authority(headers, X_FORWARDED_HOST)
            .or_else(|| header_authority(headers, HOST.as_str()));

        if let Some(host) = host {
            let scheme = match first_header_value(headers, X_FORWARDED_PROTO) {
                Some(proto) if proto.eq_ignore_ascii_case("http") => "http",
                _ => "https",
            };
            return format!("{scheme}://{host}");
        }
    }

    request_origin.to_string()
}

/// Origin of the request's own URL.
///
/// Absolute-form URIs (HTTP/2, proxies) carry it directly; otherwise it is
/// rebuilt from `Host` as plain http, which is what the listener speaks.
pub fn request_own_origin(uri: &Uri, headers: &HeaderMap) -> Option<String> {
    let url = if uri.scheme().is_some() && uri.authority().is_some() {
        url::Url::parse(&uri.to_string()).ok()
    } else {
        header_authority(headers, HOST.as_str())
            .and_then(|host| url::Url::parse(&format!("http://{host}")).ok())
    }?;

    let origin = url.origin();
    origin.is_tuple().then(|| origin.ascii_serialization())
}

fn first_header_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

fn header_authority<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    first_header_value(headers, name).filter(|value| Authority::from_str(value).is_ok())
}

/// Extractor for the resolved origin of the current request
///
/// Falls back to the configured public URL when the request carries no
/// usable host information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestOrigin(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for RequestOrigin
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        let server = &app_state.config.server;

        let own_origin = request_own_origin(&parts.uri, &parts.headers)
            .unwrap_or_else(|| server.fallback_origin());

        Ok(RequestOrigin(resolve_origin(
            &parts.headers,
            &own_origin,
            server.environment,
        )))
    }
}
