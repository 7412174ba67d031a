//! Configuration management for lead-console.
//!
//! Configuration is loaded with the following priority (highest to lowest):
//! 1. Command-line arguments
//! 2. Environment variables
//! 3. Configuration file (JSON)
//! 4. Default values

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::api::{AdminApi, DEFAULT_TTL};
use crate::cli::Args;
use crate::client::{Dispatcher, Navigator};
use crate::session::{FileStorage, SessionStore};

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Remote API settings.
    pub api: ApiSection,
    /// Session persistence settings.
    pub session: SessionSection,
    /// Logging configuration.
    pub logging: LoggingSection,
}

/// Remote API section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSection {
    /// Origin of the REST API.
    pub base_url: String,
    /// TCP connect timeout in seconds; 0 leaves it to the OS.
    pub connect_timeout_secs: u64,
}

impl Default for ApiSection {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:4000".to_string(),
            connect_timeout_secs: 10,
        }
    }
}

/// Session persistence section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSection {
    /// Session file. Defaults to `$HOME/.lead-console/session.json`.
    pub file: Option<PathBuf>,
    /// Token lifetime used when the login response has none.
    pub default_ttl: String,
}

impl Default for SessionSection {
    fn default() -> Self {
        Self {
            file: None,
            default_ttl: DEFAULT_TTL.to_string(),
        }
    }
}

/// Logging configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level (error, warn, info, debug, trace).
    pub level: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Apply environment variable overrides.
    pub fn apply_env(&mut self) {
        if let Ok(url) = std::env::var("LEAD_CONSOLE_API_URL") {
            if !url.is_empty() {
                self.api.base_url = url;
            }
        }

        if let Ok(file) = std::env::var("LEAD_CONSOLE_SESSION_FILE") {
            if !file.is_empty() {
                self.session.file = Some(PathBuf::from(file));
            }
        }

        if let Ok(level) = std::env::var("LEAD_CONSOLE_LOG_LEVEL") {
            self.logging.level = level;
        } else if let Ok(level) = std::env::var("RUST_LOG") {
            self.logging.level = level;
        }
    }

    /// Apply CLI argument overrides.
    pub fn apply_args(&mut self, args: &Args) {
        if let Some(ref url) = args.api_url {
            self.api.base_url = url.clone();
        }

        if let Some(ref file) = args.session_file {
            self.session.file = Some(file.clone());
        }

        if let Some(ref level) = args.log_level {
            self.logging.level = level.clone();
        }
    }

    /// Load configuration with full priority chain.
    ///
    /// Priority: CLI args > env vars > config file > defaults
    pub fn load(args: &Args) -> Result<Self, ConfigError> {
        let mut config = match args.config {
            Some(ref path) => Config::from_file(path)?,
            None => Config::default(),
        };

        config.apply_env();
        config.apply_args(args);

        Ok(config)
    }

    /// Parsed API base URL.
    pub fn base_url(&self) -> Result<Url, ConfigError> {
        Url::parse(&self.api.base_url)
            .map_err(|_| ConfigError::InvalidUrl(self.api.base_url.clone()))
    }

    /// Session file to use, if one can be determined.
    pub fn session_file(&self) -> Option<PathBuf> {
        self.session.file.clone().or_else(|| {
            std::env::var_os("HOME")
                .filter(|home| !home.is_empty())
                .map(|home| PathBuf::from(home).join(".lead-console").join("session.json"))
        })
    }

    /// Build the session store: file-backed, or detached when no session
    /// file location is known.
    pub fn session_store(&self) -> SessionStore {
        match self.session_file() {
            Some(path) => SessionStore::new(Arc::new(FileStorage::new(path))),
            None => {
                tracing::warn!("no session file location, running without a persistent session");
                SessionStore::detached()
            }
        }
    }

    /// Build the HTTP client with the configured transport settings.
    pub fn http_client(&self) -> Result<reqwest::Client, ConfigError> {
        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("lead-console/", env!("CARGO_PKG_VERSION")));
        if self.api.connect_timeout_secs > 0 {
            builder = builder.connect_timeout(Duration::from_secs(self.api.connect_timeout_secs));
        }
        builder.build().map_err(ConfigError::Http)
    }

    /// Assemble the API client.
    pub fn admin_api(
        &self,
        navigator: Option<Arc<dyn Navigator>>,
    ) -> Result<AdminApi, ConfigError> {
        let mut dispatcher = Dispatcher::new(Arc::new(self.session_store()))
            .with_base_url(self.base_url()?)
            .with_http_client(self.http_client()?);
        if let Some(navigator) = navigator {
            dispatcher = dispatcher.with_navigator(navigator);
        }
        Ok(AdminApi::new(dispatcher).with_default_ttl(self.session.default_ttl.clone()))
    }

    /// Get the log level filter string.
    pub fn log_filter(&self) -> &str {
        &self.logging.level
    }
}

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// IO error reading config file.
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    /// JSON parsing error.
    #[error("failed to parse config file: {0}")]
    Json(#[from] serde_json::Error),
    /// API base URL is not an absolute URL.
    #[error("invalid API URL: {0}")]
    InvalidUrl(String),
    /// HTTP client could not be built.
    #[error("failed to build HTTP client: {0}")]
    Http(reqwest::Error),
}
