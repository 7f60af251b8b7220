//! Storefront client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `CLOUDMART_API_BASE_URL` - Backend REST API base URL (default: `http://localhost:5000/api`)
//! - `CLOUDMART_API_TIMEOUT_SECS` - Request timeout in seconds (default: 50)
//! - `CLOUDMART_STORAGE_PATH` - Client storage document (default: `.cloudmart/storage.json`)

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

const DEFAULT_API_BASE_URL: &str = "http://localhost:5000/api";
const DEFAULT_API_TIMEOUT_SECS: u64 = 50;
const DEFAULT_STORAGE_PATH: &str = ".cloudmart/storage.json";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorefrontConfig {
    /// Backend REST API settings
    pub api: ApiConfig,
    /// Path of the client storage document
    pub storage_path: PathBuf,
}

/// Backend REST API settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Base URL every endpoint path is appended to
    pub base_url: Url,
    /// Per-request timeout
    pub timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: parse_base_url("default", DEFAULT_API_BASE_URL)
                .unwrap_or_else(|_| unreachable!("default base URL is valid")),
            timeout: Duration::from_secs(DEFAULT_API_TIMEOUT_SECS),
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get_or_default =
            |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let base_url = parse_base_url(
            "CLOUDMART_API_BASE_URL",
            &get_or_default("CLOUDMART_API_BASE_URL", DEFAULT_API_BASE_URL),
        )?;

        let timeout_secs = get_or_default(
            "CLOUDMART_API_TIMEOUT_SECS",
            &DEFAULT_API_TIMEOUT_SECS.to_string(),
        )
        .parse::<u64>()
        .map_err(|e| {
            ConfigError::InvalidEnvVar("CLOUDMART_API_TIMEOUT_SECS".to_string(), e.to_string())
        })?;
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "CLOUDMART_API_TIMEOUT_SECS".to_string(),
                "must be greater than zero".to_string(),
            ));
        }

        let storage_path = PathBuf::from(get_or_default(
            "CLOUDMART_STORAGE_PATH",
            DEFAULT_STORAGE_PATH,
        ));

        Ok(Self {
            api: ApiConfig {
                base_url,
                timeout: Duration::from_secs(timeout_secs),
            },
            storage_path,
        })
    }
}

/// Parse a base URL, normalizing it to end in `/` so endpoint paths join
/// beneath it rather than replacing its last segment.
fn parse_base_url(var_name: &str, value: &str) -> Result<Url, ConfigError> {
    let invalid = |msg: String| ConfigError::InvalidEnvVar(var_name.to_string(), msg);

    let mut url = Url::parse(value).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}
