//! Configuration module for the inventory admin core.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Base URL used when `INVENTORY_API_BASE_URL` is not set.
pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8000/api";

/// Page size used when walking every page of a collection.
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the catalogue REST API, without trailing slash
    pub api_base_url: String,
    /// File holding the persisted auth token
    pub token_path: PathBuf,
    /// Optional per-request timeout applied by the HTTP transport
    pub request_timeout: Option<Duration>,
    /// Page size for full-list retrieval
    pub page_size: u32,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Emit logs as JSON lines
    pub log_json: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            token_path: PathBuf::from("./data/auth.json"),
            request_timeout: None,
            page_size: DEFAULT_PAGE_SIZE,
            log_level: "info".to_string(),
            log_json: false,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let defaults = Self::default();

        let api_base_url = env::var("INVENTORY_API_BASE_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or(defaults.api_base_url);

        let token_path = env::var("INVENTORY_TOKEN_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.token_path);

        let request_timeout = parse_var::<u64>("INVENTORY_REQUEST_TIMEOUT")
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs);

        let page_size = parse_var::<u32>("INVENTORY_PAGE_SIZE")
            .filter(|size| *size > 0)
            .unwrap_or(defaults.page_size);

        let log_level = env::var("INVENTORY_LOG_LEVEL").unwrap_or(defaults.log_level);
        let log_json = env::var("INVENTORY_LOG_FORMAT")
            .map(|format| format.eq_ignore_ascii_case("json"))
            .unwrap_or(defaults.log_json);

        Self {
            api_base_url,
            token_path,
            request_timeout,
            page_size,
            log_level,
            log_json,
        }
    }

    /// Builder-style override of the base URL, handy when pointing at a local server.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into().trim_end_matches('/').to_string();
        self
    }
}

/// Parse a numeric variable, warning and returning `None` when malformed.
fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    let raw = env::var(name).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!("Ignoring malformed {}={:?}", name, raw);
            None
        }
    }
}
