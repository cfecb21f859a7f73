//! Configuration management for the Ecclesia MCP Server.
//!
//! This module handles loading and validating configuration from environment variables.
//! The optional `.env` file is read with `dotenvy`, which never writes to stdout
//! (stdout carries the MCP protocol).

use crate::error::{ConfigError, ConfigResult};
use crate::models::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use std::env;
use std::path::PathBuf;

/// Configuration for the Ecclesia MCP Server.
#[derive(Debug, Clone)]
pub struct Config {
    /// Ecclesia API base URL, e.g. `http://localhost:8000`
    pub api_base_url: String,

    /// Login credentials used at startup when no stored session is valid
    pub credentials: Option<Credentials>,

    /// Where the bearer token is persisted between runs (memory only when unset)
    pub session_file: Option<PathBuf>,

    /// HTTP request timeout in seconds (default: 10)
    pub request_timeout: u64,

    /// Page size used by list tools when the caller gives none (default: 20)
    pub default_page_size: u32,

    /// Log level (default: "error")
    pub log_level: String,
}

/// Email and password for `POST /api/auth/login`.
#[derive(Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Required environment variables:
    /// - `ECCLESIA_API_BASE_URL`: Base URL for the Ecclesia API
    ///
    /// Optional environment variables:
    /// - `ECCLESIA_EMAIL` / `ECCLESIA_PASSWORD`: startup login (both or neither)
    /// - `ECCLESIA_SESSION_FILE`: token file path
    /// - `REQUEST_TIMEOUT`: HTTP timeout in seconds (default: 10)
    /// - `DEFAULT_PAGE_SIZE`: list page size, 1-100 (default: 20)
    /// - `LOG_LEVEL`: Logging level (default: "error")
    pub fn from_env() -> ConfigResult<Self> {
        let _ = dotenvy::dotenv();

        let api_base_url = env::var("ECCLESIA_API_BASE_URL")
            .map_err(|_| ConfigError::MissingVar("ECCLESIA_API_BASE_URL".to_string()))?;

        if !api_base_url.starts_with("http://") && !api_base_url.starts_with("https://") {
            return Err(ConfigError::InvalidValue {
                var: "ECCLESIA_API_BASE_URL".to_string(),
                reason: "Must start with http:// or https://".to_string(),
            });
        }
        let api_base_url = api_base_url.trim_end_matches('/').to_string();

        let credentials = Self::read_credentials()?;

        let session_file = Self::non_empty_var("ECCLESIA_SESSION_FILE").map(PathBuf::from);

        let request_timeout = Self::parse_env_u64("REQUEST_TIMEOUT", 10)?;
        if request_timeout == 0 {
            return Err(ConfigError::InvalidValue {
                var: "REQUEST_TIMEOUT".to_string(),
                reason: "Must be at least 1 second".to_string(),
            });
        }

        let default_page_size = Self::parse_env_u32("DEFAULT_PAGE_SIZE", DEFAULT_PAGE_SIZE)?;
        if default_page_size == 0 || default_page_size > MAX_PAGE_SIZE {
            return Err(ConfigError::InvalidValue {
                var: "DEFAULT_PAGE_SIZE".to_string(),
                reason: format!("Must be between 1 and {}", MAX_PAGE_SIZE),
            });
        }

        let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "error".to_string());

        Ok(Config {
            api_base_url,
            credentials,
            session_file,
            request_timeout,
            default_page_size,
            log_level,
        })
    }

    fn read_credentials() -> ConfigResult<Option<Credentials>> {
        match (
            Self::non_empty_var("ECCLESIA_EMAIL"),
            Self::non_empty_var("ECCLESIA_PASSWORD"),
        ) {
            (Some(email), Some(password)) => Ok(Some(Credentials { email, password })),
            (None, None) => Ok(None),
            (Some(_), None) => Err(ConfigError::MissingVar("ECCLESIA_PASSWORD".to_string())),
            (None, Some(_)) => Err(ConfigError::MissingVar("ECCLESIA_EMAIL".to_string())),
        }
    }

    fn non_empty_var(var_name: &str) -> Option<String> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    /// Parse an environment variable as u64 with a default value.
    fn parse_env_u64(var_name: &str, default: u64) -> ConfigResult<u64> {
        match env::var(var_name) {
            Ok(val) => val.parse::<u64>().map_err(|_| ConfigError::InvalidValue {
                var: var_name.to_string(),
                reason: format!("Must be a positive number, got: {}", val),
            }),
            Err(_) => Ok(default),
        }
    }

    /// Parse an environment variable as u32 with a default value.
    fn parse_env_u32(var_name: &str, default: u32) -> ConfigResult<u32> {
        match env::var(var_name) {
            Ok(val) => val.parse::<u32>().map_err(|_| ConfigError::InvalidValue {
                var: var_name.to_string(),
                reason: format!("Must be a positive number, got: {}", val),
            }),
            Err(_) => Ok(default),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_base_url: String::new(),
            credentials: None,
            session_file: None,
            request_timeout: 10,
            default_page_size: DEFAULT_PAGE_SIZE,
            log_level: "error".to_string(),
        }
    }
}
