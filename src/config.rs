use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

use crate::services::expo::DEFAULT_PUSH_ENDPOINT;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub database: DatabaseSettings,
    #[serde(default)]
    pub expo: ExpoSettings,
    #[serde(default)]
    pub worker: WorkerSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: Option<u32>,
    pub min_connections: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExpoSettings {
    #[serde(default = "default_push_endpoint")]
    pub endpoint: String,
    /// Optional Expo access token, sent as a bearer credential.
    #[serde(default)]
    pub access_token: Option<String>,
}

impl Default for ExpoSettings {
    fn default() -> Self {
        Self {
            endpoint: default_push_endpoint(),
            access_token: None,
        }
    }
}

fn default_push_endpoint() -> String {
    DEFAULT_PUSH_ENDPOINT.to_string()
}

/// Periods of the three background loops, in seconds.
#[derive(Debug, Clone, Deserialize)]
pub struct WorkerSettings {
    #[serde(default = "default_buddy_refresh_secs")]
    pub buddy_refresh_secs: u64,
    #[serde(default = "default_request_refresh_secs")]
    pub request_refresh_secs: u64,
    #[serde(default = "default_match_interval_secs")]
    pub match_interval_secs: u64,
}

impl Default for WorkerSettings {
    fn default() -> Self {
        Self {
            buddy_refresh_secs: default_buddy_refresh_secs(),
            request_refresh_secs: default_request_refresh_secs(),
            match_interval_secs: default_match_interval_secs(),
        }
    }
}

fn default_buddy_refresh_secs() -> u64 { 20 }
fn default_request_refresh_secs() -> u64 { 1 }
fn default_match_interval_secs() -> u64 { 2 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Environment variables (prefixed with BUDDY_)
    pub fn load() -> Result<Self, ConfigError> {
        let mut settings = Config::builder()
            // Add default config file
            .add_source(File::with_name("config/default").required(false))
            // Add local config file (for development overrides)
            .add_source(File::with_name("config/local").required(false))
            // Add environment variables (prefixed with BUDDY_)
            // e.g., BUDDY_WORKER__MATCH_INTERVAL_SECS -> worker.match_interval_secs
            .add_source(
                Environment::with_prefix("BUDDY")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings = substitute_env_vars(settings)?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("BUDDY")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}

/// Apply the conventional standalone environment variables on top of the
/// layered sources. DATABASE_URL wins over the config file, matching how
/// the CRUD backend is deployed.
fn substitute_env_vars(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let database_url = env::var("DATABASE_URL")
        .or_else(|_| env::var("BUDDY_DATABASE__URL"))
        .ok();

    let expo_access_token = env::var("EXPO_ACCESS_TOKEN").ok();

    let mut builder = Config::builder().add_source(settings);

    if let Some(url) = database_url {
        builder = builder.set_override("database.url", url)?;
    }
    if let Some(token) = expo_access_token {
        builder = builder.set_override("expo.access_token", token)?;
    }

    builder.build()
}
