//! Arena configuration loaded from TOML.

use derive_getters::Getters;
use derive_more::{Display, Error};
use derive_setters::Setters;
use serde::{Deserialize, Serialize};
use std::path::Path;
use strictly_shougi::RuleSet;
use tracing::{debug, info, instrument};

/// Top-level configuration for the arena server.
///
/// ```toml
/// log_filter = "strictly_arena=debug,info"
///
/// [server]
/// host = "0.0.0.0"
/// port = 3000
///
/// [database]
/// path = "arena.db"
///
/// [rules]
/// promotion = false
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Getters, Setters, Serialize, Deserialize)]
#[setters(prefix = "with_")]
pub struct ArenaConfig {
    /// Tracing filter used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    log_filter: String,

    /// HTTP listener.
    #[serde(default)]
    server: ServerConfig,

    /// Durable journal.
    #[serde(default)]
    database: DatabaseConfig,

    /// Rules applied to new matches.
    #[serde(default)]
    rules: RuleSet,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            log_filter: default_log_filter(),
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            rules: RuleSet::default(),
        }
    }
}

/// HTTP listener settings.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Setters, Serialize, Deserialize)]
#[setters(prefix = "with_")]
pub struct ServerConfig {
    /// Bind address.
    #[serde(default = "default_host")]
    host: String,

    /// Bind port.
    #[serde(default = "default_port")]
    port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    /// `host:port` for binding.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Journal settings. Without a path, matches live in memory only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Getters, Setters, Serialize, Deserialize)]
#[setters(prefix = "with_", strip_option)]
pub struct DatabaseConfig {
    /// SQLite database file.
    #[serde(default)]
    path: Option<String>,
}

#[instrument]
fn default_host() -> String {
    "127.0.0.1".to_string()
}

#[instrument]
fn default_port() -> u16 {
    3000
}

#[instrument]
fn default_log_filter() -> String {
    "info".to_string()
}

impl ArenaConfig {
    /// Loads and validates configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed, or if the
    /// rule set is invalid.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config = Self::from_toml(&content)?;
        info!(bind = %config.server.bind_address(), "Config loaded successfully");
        Ok(config)
    }

    /// Parses and validates configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] on a parse error or an invalid rule set.
    #[instrument(skip(content))]
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the rule set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] wrapping the rule-set problem.
    #[instrument(skip(self))]
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.rules
            .validate()
            .map_err(|e| ConfigError::new(format!("Invalid rules: {}", e.message)))
    }

    /// Applies command-line overrides on top of the loaded values.
    pub fn with_overrides(
        self,
        host: Option<String>,
        port: Option<u16>,
        db_path: Option<String>,
    ) -> Self {
        let mut server = self.server.clone();
        if let Some(host) = host {
            server = server.with_host(host);
        }
        if let Some(port) = port {
            server = server.with_port(port);
        }
        let database = match db_path {
            Some(path) => self.database.clone().with_path(path),
            None => self.database.clone(),
        };
        self.with_server(server).with_database(database)
    }

    /// Renders the effective configuration back to TOML.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if serialization fails.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self)
            .map_err(|e| ConfigError::new(format!("Failed to render config: {}", e)))
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}
