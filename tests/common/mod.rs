//! Common test utilities for E2E tests

#![allow(dead_code)]

pub mod fake_github;

use repodeck::{AppState, config};
use tokio::net::TcpListener;

use fake_github::FakeGitHub;

/// Test server instance
pub struct TestServer {
    pub addr: String,
    pub github: FakeGitHub,
    pub client: reqwest::Client,
}

impl TestServer {
    /// Create a new test server instance
    pub async fn new() -> Self {
        Self::with_config(|_| {}).await
    }

    /// Create a test server, adjusting the default test configuration first
    pub async fn with_config(adjust: impl FnOnce(&mut config::AppConfig)) -> Self {
        let github = FakeGitHub::start().await;

        let mut config = config::AppConfig {
            server: config::ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                environment: config::Environment::Development,
                public_url: None,
            },
            github: config::GitHubOAuthConfig {
                client_id: fake_github::CLIENT_ID.to_string(),
                client_secret: fake_github::CLIENT_SECRET.to_string(),
                public_client_id: None,
                app_slug: None,
                authorize_url: "https://github.com/login/oauth/authorize".to_string(),
                token_url: github.url("/login/oauth/access_token"),
                api_url: github.addr.clone(),
                scope: "repo".to_string(),
                timeout_seconds: 5,
                user_agent: "repodeck-e2e".to_string(),
            },
            auth: config::AuthConfig {
                session_max_age: 604800,
                verify_state: true,
                state_max_age: 600,
            },
            logging: config::LoggingConfig {
                level: "info".to_string(),
                format: "pretty".to_string(),
            },
        };
        adjust(&mut config);

        // Initialize app state
        let state = AppState::new(config).unwrap();

        // Bind to random port
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let addr_str = format!("http://{}", addr);

        let app = repodeck::build_router(state);

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr: addr_str,
            github,
            client: no_redirect_client(),
        }
    }

    /// Get base URL for API requests
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.addr, path)
    }

    /// Start a login and return the anti-forgery state it issued
    pub async fn begin_login(&self) -> String {
        let response = self
            .client
            .get(self.url("/api/auth/login"))
            .send()
            .await
            .expect("login request succeeds");

        let location = location(&response);
        url::Url::parse(&location)
            .expect("absolute authorization URL")
            .query_pairs()
            .find(|(key, _)| key == "state")
            .map(|(_, value)| value.into_owned())
            .expect("state parameter")
    }
}

/// Client that surfaces redirects instead of following them
pub fn no_redirect_client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .timeout(std::time::Duration::from_secs(10))
        .build()
        .expect("failed to build no-redirect client")
}

pub fn location(response: &reqwest::Response) -> String {
    response
        .headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .expect("location header")
        .to_string()
}

pub fn set_cookies(response: &reqwest::Response) -> Vec<String> {
    response
        .headers()
        .get_all("set-cookie")
        .iter()
        .filter_map(|v| v.to_str().ok().map(ToString::to_string))
        .collect()
}
