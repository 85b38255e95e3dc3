//! Application configuration.
//!
//! Handles loading configuration from environment variables and .env files.

use dotenv::dotenv;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::constants::net::DEFAULT_TIMEOUT_SECS;
use crate::constants::template::DEFAULT_TEMPLATES_URL;
use crate::error::{Error, Result};

/// Configuration for the application.
#[derive(Debug, Clone)]
pub struct Config {
    /// The application name
    app_name: String,
    /// The application version
    app_version: String,
    /// Where the template registry is fetched from
    pub templates_url: String,
    /// Base URL of the relay service
    pub relay_api_url: String,
    /// Relay workspace name
    pub relay_workspace: String,
    /// File holding the last processed relay timestamp
    pub cursor_path: Option<PathBuf>,
    /// Timeout for every HTTP request
    pub http_timeout: Duration,
}

impl Config {
    /// Get the application name.
    #[must_use]
    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    /// Get the application version.
    #[must_use]
    pub fn app_version(&self) -> &str {
        &self.app_version
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_name: env!("CARGO_PKG_NAME").to_string(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            templates_url: DEFAULT_TEMPLATES_URL.to_string(),
            relay_api_url: String::new(),
            relay_workspace: String::new(),
            cursor_path: default_cursor_path(),
            http_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn load() -> Result<Self> {
        // Try to load .env file if present
        dotenv().ok();

        let mut config = Self::default();

        if let Ok(url) = env::var("TEMPLATES_URL") {
            if !url.trim().is_empty() {
                config.templates_url = url.trim().to_string();
            }
        }

        if let Ok(url) = env::var("RELAY_API_URL") {
            config.relay_api_url = url;
        }

        if let Ok(workspace) = env::var("RELAY_WORKSPACE") {
            config.relay_workspace = workspace;
        }

        if let Ok(path) = env::var("CURSOR_PATH") {
            config.cursor_path = Some(PathBuf::from(shellexpand::tilde(&path).to_string()));
        }

        if let Ok(secs) = env::var("HTTP_TIMEOUT_SECS") {
            let secs = secs.trim().parse::<u64>().map_err(|_| {
                Error::config(
                    format!("HTTP_TIMEOUT_SECS must be a whole number of seconds, got \"{secs}\""),
                    "Unset it to use the 30 second default",
                )
            })?;
            config.http_timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    /// Check if the relay is configured
    pub fn has_relay(&self) -> bool {
        !self.relay_api_url.trim().is_empty() && !self.relay_workspace.trim().is_empty()
    }
}

/// Default cursor location under the platform data directory
fn default_cursor_path() -> Option<PathBuf> {
    dirs::data_dir().map(|d| d.join(env!("CARGO_PKG_NAME")).join("relay-cursor.json"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_the_published_registry() {
        let config = Config::default();
        assert_eq!(config.templates_url, DEFAULT_TEMPLATES_URL);
        assert_eq!(config.http_timeout, Duration::from_secs(30));
        assert!(!config.has_relay());
        assert_eq!(config.app_name(), "carousel");
    }

    #[test]
    fn relay_needs_both_url_and_workspace() {
        let config = Config {
            relay_api_url: "https://relay.test".into(),
            relay_workspace: "  ".into(),
            ..Config::default()
        };
        assert!(!config.has_relay());
    }
}
