//! Application settings loaded from environment variables.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use super::constants::{
    DEFAULT_DATABASE_URL, DEFAULT_IMAGE_PATH, DEFAULT_LINK_DOMAIN,
    DEFAULT_SHUTDOWN_TIMEOUT_SECONDS,
};

/// Application configuration
#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub image_path: PathBuf,
    pub link_domain: String,
    pub shutdown_timeout: Duration,
    pub metrics_enabled: bool,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &"[REDACTED]")
            .field("image_path", &self.image_path)
            .field("link_domain", &self.link_domain)
            .field("shutdown_timeout", &self.shutdown_timeout)
            .field("metrics_enabled", &self.metrics_enabled)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            image_path: PathBuf::from(DEFAULT_IMAGE_PATH),
            link_domain: DEFAULT_LINK_DOMAIN.to_string(),
            shutdown_timeout: Duration::from_secs(DEFAULT_SHUTDOWN_TIMEOUT_SECONDS),
            metrics_enabled: true,
        }
    }
}

impl Config {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let defaults = Self::default();

        Self {
            database_url: env::var("DATABASE_URL").unwrap_or(defaults.database_url),
            image_path: env::var("IMAGE_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.image_path),
            link_domain: env::var("LINK_DOMAIN").unwrap_or(defaults.link_domain),
            shutdown_timeout: env::var("SHUTDOWN_TIMEOUT_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.shutdown_timeout),
            metrics_enabled: env::var("METRICS_ENABLED")
                .ok()
                .and_then(|v| parse_flag(&v))
                .unwrap_or(defaults.metrics_enabled),
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
