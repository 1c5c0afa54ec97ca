//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional and fall back to defaults suitable for local
//! development against a backend on port 5000.
//!
//! - `SCAN_DINE_API_URL` - Base URL of the ordering API
//!   (default: `http://localhost:5000/api`)
//! - `SCAN_DINE_STORAGE_PATH` - Durable storage file (default:
//!   `scan-dine.json` in the working directory)
//! - `SCAN_DINE_HTTP_TIMEOUT_SECS` - Per-request timeout (default: 30)
//! - `SCAN_DINE_ORDER_POLL_SECS` - Order-status refresh period (default: 5)
//! - `SCAN_DINE_QUEUE_POLL_SECS` - Staff queue refresh period (default: 3)
//! - `SCAN_DINE_STATS_POLL_SECS` - Dashboard stats refresh period
//!   (default: 30)

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

const DEFAULT_API_URL: &str = "http://localhost:5000/api";
const DEFAULT_STORAGE_FILE: &str = "scan-dine.json";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Client application configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the remote ordering API.
    pub api_url: Url,
    /// Path of the durable key-value storage file.
    pub storage_path: PathBuf,
    /// Timeout applied to every HTTP request.
    pub http_timeout: Duration,
    /// Refresh period for the customer order-status view.
    pub order_poll: Duration,
    /// Refresh period for the staff order queue.
    pub queue_poll: Duration,
    /// Refresh period for dashboard statistics.
    pub stats_poll: Duration,
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from a `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but unparseable.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_url = parse_url(
            &get_env_or_default("SCAN_DINE_API_URL", DEFAULT_API_URL),
            "SCAN_DINE_API_URL",
        )?;
        let storage_path = PathBuf::from(get_env_or_default(
            "SCAN_DINE_STORAGE_PATH",
            DEFAULT_STORAGE_FILE,
        ));

        Ok(Self {
            api_url,
            storage_path,
            http_timeout: seconds_var("SCAN_DINE_HTTP_TIMEOUT_SECS", 30)?,
            order_poll: seconds_var("SCAN_DINE_ORDER_POLL_SECS", 5)?,
            queue_poll: seconds_var("SCAN_DINE_QUEUE_POLL_SECS", 3)?,
            stats_poll: seconds_var("SCAN_DINE_STATS_POLL_SECS", 30)?,
        })
    }

    /// Configuration pointing at an explicit server and storage file, with
    /// default timings. Primarily used by tests.
    #[must_use]
    pub fn new(api_url: Url, storage_path: impl Into<PathBuf>) -> Self {
        Self {
            api_url,
            storage_path: storage_path.into(),
            http_timeout: Duration::from_secs(30),
            order_poll: Duration::from_secs(5),
            queue_poll: Duration::from_secs(3),
            stats_poll: Duration::from_secs(30),
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse a base URL, reporting the variable name on failure.
fn parse_url(value: &str, var_name: &str) -> Result<Url, ConfigError> {
    Url::parse(value).map_err(|e| ConfigError::InvalidEnvVar(var_name.to_string(), e.to_string()))
}

/// Read a duration-in-seconds variable with a default.
fn seconds_var(key: &str, default: u64) -> Result<Duration, ConfigError> {
    match std::env::var(key) {
        Ok(raw) => raw
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string())),
        Err(_) => Ok(Duration::from_secs(default)),
    }
}
