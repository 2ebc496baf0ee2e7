//! Stand-in for GitHub's OAuth and REST endpoints

use std::{
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use axum::{
    Json, Router,
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::json;
use tokio::net::TcpListener;

pub const CLIENT_ID: &str = "test-client-id";
pub const CLIENT_SECRET: &str = "test-client-secret";
pub const GOOD_CODE: &str = "good-code";
pub const BAD_CODE: &str = "bad-code";
pub const BROKEN_CODE: &str = "broken-code";
/// Code whose exchange stalls for [`STALL`]
pub const SLOW_CODE: &str = "slow-code";
pub const TOKEN: &str = "abc123";
/// Token whose listing stalls for [`STALL`]
pub const SLOW_TOKEN: &str = "slow-token";
pub const REVOKED_TOKEN: &str = "revoked";

/// How long the slow endpoints stall before answering
pub const STALL: Duration = Duration::from_secs(3);

#[derive(Default)]
struct Recorded {
    token_calls: AtomicUsize,
    last_redirect_uri: Mutex<Option<String>>,
}

/// Fake GitHub server bound to a random local port
pub struct FakeGitHub {
    pub addr: String,
    recorded: Arc<Recorded>,
}

impl FakeGitHub {
    pub async fn start() -> Self {
        let recorded = Arc::new(Recorded::default());

        let app = Router::new()
            .route("/login/oauth/access_token", post(access_token))
            .route("/user/repos", get(user_repos))
            .route("/user", get(user))
            .with_state(recorded.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = format!("http://{}", listener.local_addr().unwrap());

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, recorded }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.addr, path)
    }

    /// Number of token exchange requests received
    pub fn token_calls(&self) -> usize {
        self.recorded.token_calls.load(Ordering::SeqCst)
    }

    /// `redirect_uri` sent with the most recent token exchange
    pub fn last_redirect_uri(&self) -> Option<String> {
        self.recorded.last_redirect_uri.lock().unwrap().clone()
    }
}

#[derive(Deserialize)]
struct ExchangeBody {
    client_id: String,
    client_secret: String,
    code: String,
    redirect_uri: String,
}

async fn access_token(
    State(recorded): State<Arc<Recorded>>,
    headers: HeaderMap,
    Json(body): Json<ExchangeBody>,
) -> Response {
    recorded.token_calls.fetch_add(1, Ordering::SeqCst);
    *recorded.last_redirect_uri.lock().unwrap() = Some(body.redirect_uri.clone());

    if headers.get("accept").and_then(|v| v.to_str().ok()) != Some("application/json") {
        return (StatusCode::NOT_ACCEPTABLE, "expected Accept: application/json").into_response();
    }

    if body.client_id != CLIENT_ID || body.client_secret != CLIENT_SECRET {
        return Json(json!({
            "error": "incorrect_client_credentials",
            "error_description": "The client_id and/or client_secret passed are incorrect."
        }))
        .into_response();
    }

    if !body.redirect_uri.ends_with("/api/auth/callback") {
        return Json(json!({ "error": "redirect_uri_mismatch" })).into_response();
    }

    match body.code.as_str() {
        SLOW_CODE => {
            tokio::time::sleep(STALL).await;
            Json(json!({ "access_token": TOKEN, "token_type": "bearer" })).into_response()
        }
        GOOD_CODE => Json(json!({
            "access_token": TOKEN,
            "token_type": "bearer",
            "scope": "repo"
        }))
        .into_response(),
        BAD_CODE => Json(json!({ "error": "bad_verification_code" })).into_response(),
        BROKEN_CODE => (StatusCode::INTERNAL_SERVER_ERROR, "<html>oops</html>").into_response(),
        _ => Json(json!({
            "error": "bad_verification_code",
            "error_description": "The code passed is incorrect or expired."
        }))
        .into_response(),
    }
}

fn bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
}

fn bad_credentials() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "message": "Bad credentials" })),
    )
        .into_response()
}

#[derive(Deserialize)]
struct ReposQuery {
    sort: Option<String>,
    per_page: Option<String>,
    affiliation: Option<String>,
}

async fn user_repos(headers: HeaderMap, Query(query): Query<ReposQuery>) -> Response {
    if bearer(&headers) == Some(SLOW_TOKEN) {
        tokio::time::sleep(STALL).await;
        return Json(json!([])).into_response();
    }

    if bearer(&headers) != Some(TOKEN) {
        return bad_credentials();
    }

    if query.sort.as_deref() != Some("updated")
        || query.per_page.as_deref() != Some("30")
        || query.affiliation.as_deref() != Some("owner,collaborator,organization_member")
    {
        return (StatusCode::UNPROCESSABLE_ENTITY, "unexpected query").into_response();
    }

    Json(json!([
        {
            "id": 2,
            "name": "recent",
            "full_name": "octocat/recent",
            "description": "Most recently updated",
            "private": true,
            "archived": false,
            "language": "Rust",
            "stargazers_count": 5,
            "updated_at": "2026-10-01T12:00:00Z",
            "html_url": "https://github.com/octocat/recent"
        },
        {
            "id": 1,
            "name": "older",
            "full_name": "octocat/older",
            "description": null,
            "private": false,
            "archived": true,
            "language": null,
            "stargazers_count": 0,
            "updated_at": "2020-01-01T00:00:00Z",
            "html_url": "https://github.com/octocat/older"
        }
    ]))
    .into_response()
}

async fn user(headers: HeaderMap) -> Response {
    if bearer(&headers) != Some(TOKEN) {
        return bad_credentials();
    }

    Json(json!({
        "login": "octocat",
        "id": 1,
        "name": "The Octocat",
        "avatar_url": "https://github.com/images/error/octocat_happy.gif",
        "html_url": "https://github.com/octocat"
    }))
    .into_response()
}
