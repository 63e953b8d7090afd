use crate::error::Result;
use reqwest::blocking::{Client, ClientBuilder};
use std::time::Duration;

/// Default API base URL
pub const DEFAULT_BASE_URL: &str = "https://open.tiktokapis.com/v2";
/// Environment variable overriding the API base URL
pub const BASE_URL_VAR: &str = "TIKTOK_API_BASE_URL";

/// Create the HTTP client for API requests.
/// The client is reused across calls for connection pooling; per-attempt
/// timeouts are set on each request.
pub fn create_rest_client() -> Result<Client> {
    let client = ClientBuilder::new()
        .pool_max_idle_per_host(10)
        .connect_timeout(Duration::from_secs(10))
        .build()?;
    Ok(client)
}

/// Create the HTTP client for raw file uploads with a longer timeout
pub fn create_upload_client() -> Result<Client> {
    let client = ClientBuilder::new()
        .pool_max_idle_per_host(10)
        .timeout(Duration::from_secs(3600)) // 1 hour
        .connect_timeout(Duration::from_secs(10))
        .build()?;
    Ok(client)
}

/// Configuration for the posting client
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL every endpoint path is appended to
    pub base_url: String,
    /// Timeout for a single network attempt
    pub timeout: Duration,
    /// Attempts allowed per logical request
    pub max_attempts: u32,
    /// Backoff unit; the wait before attempt `n + 1` is `unit * 2^n`
    pub backoff_unit: Duration,
    /// Retry 4xx responses too (other than 408/429, which always retry)
    pub retry_client_errors: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
            max_attempts: 3,
            backoff_unit: Duration::from_secs(1),
            retry_client_errors: false,
        }
    }
}

impl Config {
    /// Create a new configuration against the given base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        Config {
            base_url: base_url.into(),
            ..Config::default()
        }
    }

    /// Default configuration, with the base URL taken from
    /// `TIKTOK_API_BASE_URL` when set
    pub fn from_env() -> Self {
        match std::env::var(BASE_URL_VAR) {
            Ok(url) if !url.trim().is_empty() => Config::new(url.trim()),
            _ => Config::default(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn with_backoff_unit(mut self, unit: Duration) -> Self {
        self.backoff_unit = unit;
        self
    }

    pub fn with_retry_client_errors(mut self, retry: bool) -> Self {
        self.retry_client_errors = retry;
        self
    }

    /// Full URL for an endpoint path
    pub fn endpoint_url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), endpoint)
    }

    /// Wait before the attempt following failed attempt number `attempt` (1-based)
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        self.backoff_unit
            .saturating_mul(2u32.saturating_pow(attempt.min(16)))
    }
}
