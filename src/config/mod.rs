//! Configuration module for the feedback console.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::errors::AppError;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the upstream feedback API
    pub api_base_url: String,
    /// Path to the SQLite file backing client storage
    pub db_path: PathBuf,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Attach the stored access token to resource requests
    pub attach_token: bool,
    /// Upper bound for a single upstream request; unset means wait indefinitely
    pub request_timeout: Option<Duration>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let api_base_url = env::var("FEEDBACK_API_URL")
            .unwrap_or_else(|_| "http://127.0.0.1:8000".to_string())
            .trim_end_matches('/')
            .to_string();

        let db_path = env::var("FEEDBACK_DB_PATH")
            .unwrap_or_else(|_| "./data/console.sqlite".to_string())
            .into();

        let bind_addr = env::var("FEEDBACK_BIND_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8080".to_string())
            .parse()
            .map_err(|e| AppError::Config(format!("Invalid FEEDBACK_BIND_ADDR format: {}", e)))?;

        let log_level = env::var("FEEDBACK_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let attach_token = match env::var("FEEDBACK_ATTACH_TOKEN") {
            Ok(raw) => parse_flag(&raw).ok_or_else(|| {
                AppError::Config(format!("Invalid FEEDBACK_ATTACH_TOKEN value: {}", raw))
            })?,
            Err(_) => false,
        };

        let request_timeout = match env::var("FEEDBACK_REQUEST_TIMEOUT_SECS") {
            Ok(raw) => Some(
                raw.trim()
                    .parse::<u64>()
                    .map(Duration::from_secs)
                    .map_err(|e| {
                        AppError::Config(format!("Invalid FEEDBACK_REQUEST_TIMEOUT_SECS: {}", e))
                    })?,
            ),
            Err(_) => None,
        };

        Ok(Self {
            api_base_url,
            db_path,
            bind_addr,
            log_level,
            attach_token,
            request_timeout,
        })
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
