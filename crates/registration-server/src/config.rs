//! Configuration for the registration server.

use anyhow::{Context, Result};
use firebase_client::DEFAULT_AUTH_URL;
use registration_form::avatar::DEFAULT_GRAVATAR_BASE_URL;
use serde::Deserialize;
use std::fmt;
use std::time::Duration;

/// Server configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Which backend registrations go to
    #[serde(default)]
    pub backend: BackendConfig,

    /// Firebase project settings, used when the backend is `firebase`
    #[serde(default)]
    pub firebase: FirebaseConfig,

    /// Avatar configuration
    #[serde(default)]
    pub avatar: AvatarConfig,

    /// Rate limiting configuration
    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    /// Logging configuration
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Server listen address
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Accounts and records kept in process memory
    #[default]
    Memory,
    /// Firebase identity toolkit and realtime database
    Firebase,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendKind::Memory => f.write_str("memory"),
            BackendKind::Firebase => f.write_str("firebase"),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BackendConfig {
    #[serde(default)]
    pub kind: BackendKind,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FirebaseConfig {
    /// Web API key of the project
    #[serde(default)]
    pub api_key: Option<String>,

    /// Identity toolkit URL
    #[serde(default = "default_auth_url")]
    pub auth_url: String,

    /// Realtime database URL, e.g. `https://<project>.firebaseio.com`
    #[serde(default)]
    pub database_url: Option<String>,

    /// Collection user records are written to
    #[serde(default = "default_users_collection")]
    pub users_collection: String,

    /// Request timeout
    #[serde(default = "default_timeout", with = "humantime_serde")]
    pub timeout: Duration,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AvatarConfig {
    /// Gravatar base URL
    #[serde(default = "default_avatar_base_url")]
    pub base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    /// Registration requests per minute, across all clients
    #[serde(default = "default_registrations_per_minute")]
    pub registrations_per_minute: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,
}

// Default implementations
impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            port: default_port(),
        }
    }
}

impl Default for FirebaseConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            auth_url: default_auth_url(),
            database_url: None,
            users_collection: default_users_collection(),
            timeout: default_timeout(),
        }
    }
}

impl Default for AvatarConfig {
    fn default() -> Self {
        Self {
            base_url: default_avatar_base_url(),
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            registrations_per_minute: default_registrations_per_minute(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// Default value functions
fn default_listen_addr() -> String {
    "0.0.0.0".into()
}

fn default_port() -> u16 {
    8080
}

fn default_auth_url() -> String {
    DEFAULT_AUTH_URL.into()
}

fn default_users_collection() -> String {
    "users".into()
}

fn default_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_avatar_base_url() -> String {
    DEFAULT_GRAVATAR_BASE_URL.into()
}

fn default_registrations_per_minute() -> u32 {
    30
}

fn default_log_level() -> String {
    "info".into()
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        Self::from_source(
            config::Environment::default()
                .separator("__")
                .try_parsing(false),
        )
    }

    /// Load configuration from a single source.
    pub fn from_source<S>(source: S) -> Result<Self>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let config = config::Config::builder()
            .add_source(source)
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}
