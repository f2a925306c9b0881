// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client configuration loaded from environment variables.
//!
//! A `.env` file in the working directory is honored for local setups.
//! Command-line flags override whatever is loaded here.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Host the app talks to when nothing else is configured.
pub const DEFAULT_API_BASE: &str = "http://192.168.1.20";

/// How long the scanner ignores decode events after handling one.
pub const DEFAULT_SCAN_DEBOUNCE_MS: u64 = 1500;

/// Client configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host without the `/api` suffix
    pub api_base: String,
    /// Directory holding the sealed credential store
    pub state_dir: PathBuf,
    /// Scanner debounce window
    pub scan_debounce: Duration,
    /// Optional per-request timeout
    pub http_timeout: Option<Duration>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let api_base = match env::var("SUKARELA_API_BASE") {
            Ok(v) => normalize_api_base("SUKARELA_API_BASE", &v)?,
            Err(_) => DEFAULT_API_BASE.to_string(),
        };

        let state_dir = match env::var("SUKARELA_STATE_DIR") {
            Ok(dir) => PathBuf::from(dir),
            Err(_) => default_state_dir(),
        };

        let scan_debounce = match env::var("SUKARELA_SCAN_DEBOUNCE_MS") {
            Ok(v) => Duration::from_millis(
                v.trim()
                    .parse()
                    .map_err(|_| ConfigError::Invalid("SUKARELA_SCAN_DEBOUNCE_MS", v))?,
            ),
            Err(_) => Duration::from_millis(DEFAULT_SCAN_DEBOUNCE_MS),
        };

        let http_timeout = match env::var("SUKARELA_HTTP_TIMEOUT_SECS") {
            Ok(v) => Some(Duration::from_secs(
                v.trim()
                    .parse()
                    .map_err(|_| ConfigError::Invalid("SUKARELA_HTTP_TIMEOUT_SECS", v))?,
            )),
            Err(_) => None,
        };

        Ok(Self {
            api_base,
            state_dir,
            scan_debounce,
            http_timeout,
        })
    }

    /// Replace the API base, e.g. from a command-line flag.
    pub fn set_api_base(&mut self, source: &'static str, value: &str) -> Result<(), ConfigError> {
        self.api_base = normalize_api_base(source, value)?;
        Ok(())
    }

    /// Full URL prefix for API requests.
    pub fn api_url(&self) -> String {
        format!("{}/api", self.api_base)
    }

    /// Config for tests: local server, throwaway state dir, short debounce.
    pub fn test_default() -> Self {
        Self {
            api_base: "http://127.0.0.1:8080".to_string(),
            state_dir: env::temp_dir().join("sukarela-test"),
            scan_debounce: Duration::from_millis(50),
            http_timeout: Some(Duration::from_secs(5)),
        }
    }
}

/// Trim whitespace and trailing slashes; only http(s) URLs are accepted.
fn normalize_api_base(source: &'static str, value: &str) -> Result<String, ConfigError> {
    let base = value.trim().trim_end_matches('/');
    if !base.starts_with("http://") && !base.starts_with("https://") {
        return Err(ConfigError::Invalid(source, value.to_string()));
    }
    Ok(base.to_string())
}

fn default_state_dir() -> PathBuf {
    env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".sukarela")
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1:?}")]
    Invalid(&'static str, String),
}
