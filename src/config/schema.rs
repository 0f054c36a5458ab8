//! Configuration schema definitions

use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub admin: Option<AdminConfig>,
}

/// Server configuration for the HTTP API
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
    4680
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Session cookie and credential settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Name of the session cookie
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,

    /// Session lifetime in hours
    #[serde(default = "default_session_ttl_hours")]
    pub ttl_hours: i64,

    /// Set the Secure attribute on the session cookie
    #[serde(default)]
    pub secure: bool,

    /// HMAC key for the credential integrity tag. Empty means a random
    /// per-process key.
    #[serde(default)]
    pub secret: String,
}

fn default_cookie_name() -> String {
    "shopfront_session".to_string()
}

fn default_session_ttl_hours() -> i64 {
    30 * 24
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: default_cookie_name(),
            ttl_hours: default_session_ttl_hours(),
            secure: false,
            secret: String::new(),
        }
    }
}

/// Optional bootstrap admin account, created at startup if absent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminConfig {
    pub email: String,
    pub username: String,
    pub password: String,
}
