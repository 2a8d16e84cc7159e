//! Configuration schema definitions

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Placeholder secret shipped in the default config. Serving with this value
/// still works but is loudly warned against.
pub const DEV_SECRET_KEY: &str = "change-me-in-production";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub store: StoreConfig,
}

/// Server configuration for the HTTP interface
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    4350
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Session timeout and cookie-signing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Idle timeout: log out after this many minutes without a request
    #[serde(default = "default_idle_minutes")]
    pub idle_minutes: i64,

    /// Absolute ceiling on session age from login, in hours
    #[serde(default = "default_max_hours")]
    pub max_hours: i64,

    /// Key used to sign the session cookie
    #[serde(default = "default_secret_key")]
    pub secret_key: String,
}

fn default_idle_minutes() -> i64 {
    30
}

fn default_max_hours() -> i64 {
    8
}

fn default_secret_key() -> String {
    DEV_SECRET_KEY.to_string()
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            idle_minutes: default_idle_minutes(),
            max_hours: default_max_hours(),
            secret_key: default_secret_key(),
        }
    }
}

impl SessionConfig {
    /// Maximum gap between consecutive validated requests
    pub fn idle_timeout(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.idle_minutes)
    }

    /// Absolute ceiling on session age from login
    pub fn max_duration(&self) -> chrono::Duration {
        chrono::Duration::hours(self.max_hours)
    }

    /// True when the signing key is still the development placeholder
    pub fn is_default_secret(&self) -> bool {
        self.secret_key == DEV_SECRET_KEY
    }
}

/// Data store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Path of the JSON snapshot file
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,
}

fn default_data_file() -> PathBuf {
    PathBuf::from("./keydesk-data.json")
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
        }
    }
}
