//! Configuration management
//!
//! Loads configuration from:
//! 1. Default values
//! 2. Configuration file (config/local.toml)
//! 3. Environment variables (override)

use std::fmt;

use serde::{Deserialize, Serialize};

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub github: GitHubOAuthConfig,
    pub auth: AuthConfig,
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0")
    pub host: String,
    /// Port number (e.g., 3000)
    pub port: u16,
    /// Deployment environment; production trusts proxy forwarding headers
    #[serde(default)]
    pub environment: Environment,
    /// Public base URL used when a request carries no usable host information
    pub public_url: Option<String>,
}

impl ServerConfig {
    /// Origin used when the request itself cannot tell us where it was sent.
    ///
    /// # Returns
    /// `public_url` without a trailing slash, or `http://{host}:{port}`
    pub fn fallback_origin(&self) -> String {
        match &self.public_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("http://{}:{}", self.host, self.port),
        }
    }
}

/// Deployment environment flag
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    pub fn is_production(self) -> bool {
        self == Environment::Production
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
        }
    }
}

/// GitHub OAuth application and API settings
#[derive(Clone, Deserialize)]
pub struct GitHubOAuthConfig {
    pub client_id: String,
    pub client_secret: String,
    /// Client ID shown to the browser for diagnostics (defaults to `client_id`)
    pub public_client_id: Option<String>,
    /// GitHub App slug, enables the installation redirect
    pub app_slug: Option<String>,
    pub authorize_url: String,
    pub token_url: String,
    pub api_url: String,
    pub scope: String,
    /// Timeout applied to every outbound GitHub call
    pub timeout_seconds: u64,
    pub user_agent: String,
}

impl GitHubOAuthConfig {
    pub fn public_client_id(&self) -> &str {
        self.public_client_id.as_deref().unwrap_or(&self.client_id)
    }

    /// GitHub App installation page, if an app slug is configured
    pub fn installation_url(&self) -> Option<String> {
        self.app_slug
            .as_deref()
            .map(str::trim)
            .filter(|slug| !slug.is_empty())
            .map(|slug| format!("https://github.com/apps/{slug}/installations/new"))
    }
}

impl fmt::Debug for GitHubOAuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GitHubOAuthConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[redacted]")
            .field("public_client_id", &self.public_client_id)
            .field("app_slug", &self.app_slug)
            .field("authorize_url", &self.authorize_url)
            .field("token_url", &self.token_url)
            .field("api_url", &self.api_url)
            .field("scope", &self.scope)
            .field("timeout_seconds", &self.timeout_seconds)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

/// Session and anti-forgery settings
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Session cookie max age in seconds (default: 604800 = 7 days)
    pub session_max_age: i64,
    /// Check the `state` echoed by GitHub against the login cookie
    pub verify_state: bool,
    /// Lifetime of the anti-forgery state cookie in seconds
    pub state_max_age: i64,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    pub level: String,
    /// Log format: "pretty" or "json"
    pub format: String,
}

impl LoggingConfig {
    /// Default `EnvFilter` directives when `RUST_LOG` is unset
    pub fn filter_directives(&self) -> String {
        format!("repodeck={},tower_http=debug", self.level.trim())
    }

    pub fn is_json(&self) -> bool {
        self.format.trim().eq_ignore_ascii_case("json")
    }
}

impl AppConfig {
    /// Load configuration from file and environment
    ///
    /// # Loading Order
    /// 1. Default values
    /// 2. config/default.toml (if exists)
    /// 3. config/local.toml (if exists)
    /// 4. Environment variables (REPODECK__*)
    ///
    /// # Errors
    /// Returns error if configuration is invalid
    pub fn load() -> Result<Self, crate::error::AppError> {
        use config::{Config, Environment, File};

        let config = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("server.environment", "development")?
            .set_default(
                "github.authorize_url",
                "https://github.com/login/oauth/authorize",
            )?
            .set_default(
                "github.token_url",
                "https://github.com/login/oauth/access_token",
            )?
            .set_default("github.api_url", "https://api.github.com")?
            .set_default("github.scope", "repo")?
            .set_default("github.timeout_seconds", 10)?
            .set_default(
                "github.user_agent",
                concat!("repodeck/", env!("CARGO_PKG_VERSION")),
            )?
            .set_default("auth.session_max_age", 604800)?
            .set_default("auth.verify_state", true)?
            .set_default("auth.state_max_age", 600)?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "pretty")?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(
                Environment::with_prefix("REPODECK")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| crate::error::AppError::Config(e.to_string()))?;

        let app_config: Self = config
            .try_deserialize()
            .map_err(|e| crate::error::AppError::Config(e.to_string()))?;
        app_config.validate()?;
        Ok(app_config)
    }

    pub fn should_use_secure_cookies(&self) -> bool {
        self.server.environment.is_production()
    }

    pub(crate) fn validate(&self) -> Result<(), crate::error::AppError> {
        use crate::error::AppError;

        if self.github.client_id.trim().is_empty() {
            return Err(AppError::Config("github.client_id is required".to_string()));
        }

        if self.github.client_secret.trim().is_empty() {
            return Err(AppError::Config(
                "github.client_secret is required".to_string(),
            ));
        }

        for (key, value) in [
            ("github.authorize_url", &self.github.authorize_url),
            ("github.token_url", &self.github.token_url),
            ("github.api_url", &self.github.api_url),
        ] {
            url::Url::parse(value)
                .map_err(|e| AppError::Config(format!("{key} is not a valid URL: {e}")))?;
        }

        if let Some(public_url) = &self.server.public_url {
            url::Url::parse(public_url)
                .map_err(|e| AppError::Config(format!("server.public_url is not a valid URL: {e}")))?;
        }

        if self.github.timeout_seconds == 0 {
            return Err(AppError::Config(
                "github.timeout_seconds must be greater than 0".to_string(),
            ));
        }

        if self.auth.session_max_age <= 0 {
            return Err(AppError::Config(
                "auth.session_max_age must be greater than 0".to_string(),
            ));
        }

        if self.auth.state_max_age <= 0 {
            return Err(AppError::Config(
                "auth.state_max_age must be greater than 0".to_string(),
            ));
        }

        match self.logging.format.trim().to_ascii_lowercase().as_str() {
            "pretty" | "json" => {}
            other => {
                return Err(AppError::Config(format!(
                    "logging.format must be \"pretty\" or \"json\", got \"{other}\""
                )));
            }
        }

        Ok(())
    }

    /// Log settings that weaken the session cookie or the OAuth flow.
    ///
    /// Called once tracing is initialized.
    pub fn warn_on_weak_settings(&self) {
        if !self.should_use_secure_cookies() {
            tracing::warn!(
                environment = %self.server.environment.as_str(),
                "Using insecure session cookies outside production"
            );
        }

        if !self.auth.verify_state {
            tracing::warn!("OAuth state verification is disabled");
        }
    }
}
