//! Configuration module for the Artemis quiz service
//!
//! Uses defaults from utils/constants.rs; every knob can be overridden
//! through the environment. No hardcoded values in other modules.

use std::path::PathBuf;
use tracing::info;

use crate::utils::constants::{DEFAULT_ANALYTICS_DIR, DEFAULT_SESSION_TTL_SECS};

/// Runtime configuration for the quiz API
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Bind host
    pub host: String,
    /// Bind port (PORT is honored for container hosts)
    pub port: u16,
    /// Hosted backend base URL; persistence is disabled when unset
    pub backend_url: Option<String>,
    /// Hosted backend service key; never logged
    pub backend_api_key: Option<String>,
    /// Directory for analytics exports (JSONL events, JSON stats)
    pub analytics_dir: PathBuf,
    /// Idle quiz sessions are swept after this many seconds
    pub session_ttl_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

impl AppConfig {
    /// Build configuration from the environment, falling back to defaults
    pub fn from_env() -> Self {
        let host = std::env::var("ARTEMIS_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port: u16 = std::env::var("PORT")
            .or_else(|_| std::env::var("ARTEMIS_PORT"))
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8080);

        let backend_url = std::env::var("BACKEND_URL")
            .ok()
            .filter(|url| !url.is_empty());
        let backend_api_key = std::env::var("BACKEND_API_KEY")
            .ok()
            .filter(|key| !key.is_empty());

        if backend_url.is_some() && backend_api_key.is_some() {
            info!("BACKEND_API_KEY configured (key hidden)");
        }

        let analytics_dir = std::env::var("ANALYTICS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_ANALYTICS_DIR));

        let session_ttl_secs = std::env::var("SESSION_TTL_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_SESSION_TTL_SECS);

        Self {
            host,
            port,
            backend_url,
            backend_api_key,
            analytics_dir,
            session_ttl_secs,
        }
    }

    /// True when both backend URL and key are present
    pub fn backend_enabled(&self) -> bool {
        self.backend_url.is_some() && self.backend_api_key.is_some()
    }
}
