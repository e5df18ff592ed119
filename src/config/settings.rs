//! Configuration settings structures
//!
//! Every section can be loaded from TOML files and `PIZZA_*` environment variables.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::config::error::ConfigError;
use crate::logger::{ConsoleConfig, FileConfig, LogFormat, LoggerConfig};

// ============================================================================
// Default value functions
// ============================================================================

fn default_app_name() -> String {
    "pizza-service".to_string()
}

fn default_app_version() -> String {
    crate::pkg_version().to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

fn default_connection_timeout() -> u64 {
    30
}

fn default_maintenance_database() -> String {
    "postgres".to_string()
}

fn default_true() -> bool {
    true
}

fn default_factory_url() -> String {
    "https://pizza-factory.cs329.click".to_string()
}

fn default_factory_timeout() -> u64 {
    5
}

fn default_admin_name() -> String {
    "常用名字".to_string()
}

fn default_admin_email() -> String {
    "a@jwt.com".to_string()
}

fn default_admin_password() -> String {
    "admin".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_console_format() -> String {
    "full".to_string()
}

fn default_log_path() -> String {
    "logs/pizza-service.log".to_string()
}

fn default_file_format() -> String {
    "json".to_string()
}

// ============================================================================
// Application / Server
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationConfig {
    #[serde(default = "default_app_name")]
    pub name: String,

    #[serde(default = "default_app_version")]
    pub version: String,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            version: default_app_version(),
        }
    }
}

/// Axum HTTP server configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

impl ServerConfig {
    /// Full server address as "host:port"
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

// ============================================================================
// Database
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL, including the database name
    #[serde(default)]
    pub url: String,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    #[serde(default = "default_min_connections")]
    pub min_connections: u32,

    /// Pool checkout timeout in seconds
    #[serde(default = "default_connection_timeout")]
    pub connection_timeout: u64,

    /// Database used to check for and create the target database
    #[serde(default = "default_maintenance_database")]
    pub maintenance_database: String,

    /// Create the database and apply pending migrations on startup
    #[serde(default = "default_true")]
    pub auto_migrate: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connection_timeout: default_connection_timeout(),
            maintenance_database: default_maintenance_database(),
            auto_migrate: default_true(),
        }
    }
}

// ============================================================================
// Sessions / Factory / Bootstrap
// ============================================================================

/// Session token signing configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SessionConfig {
    /// HMAC secret used to sign session tokens. Keep it out of committed files.
    #[serde(default)]
    pub secret: String,
}

/// Order verification service (the pizza factory)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactoryConfig {
    #[serde(default = "default_factory_url")]
    pub url: String,

    #[serde(default)]
    pub api_key: String,

    /// Upper bound for one verification call, in seconds
    #[serde(default = "default_factory_timeout")]
    pub timeout_secs: u64,
}

impl Default for FactoryConfig {
    fn default() -> Self {
        Self {
            url: default_factory_url(),
            api_key: String::new(),
            timeout_secs: default_factory_timeout(),
        }
    }
}

/// Platform admin ensured at startup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BootstrapConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_admin_name")]
    pub admin_name: String,

    #[serde(default = "default_admin_email")]
    pub admin_email: String,

    #[serde(default = "default_admin_password")]
    pub admin_password: String,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            admin_name: default_admin_name(),
            admin_email: default_admin_email(),
            admin_password: default_admin_password(),
        }
    }
}

// ============================================================================
// Logger
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsoleSettings {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_true")]
    pub colored: bool,

    /// "full", "compact" or "json"
    #[serde(default = "default_console_format")]
    pub format: String,
}

impl Default for ConsoleSettings {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            colored: default_true(),
            format: default_console_format(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSettings {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_log_path")]
    pub path: String,

    #[serde(default = "default_true")]
    pub append: bool,

    /// "full", "compact" or "json"
    #[serde(default = "default_file_format")]
    pub format: String,
}

impl Default for FileSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            path: default_log_path(),
            append: default_true(),
            format: default_file_format(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggerSettings {
    /// "trace", "debug", "info", "warn" or "error"
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub console: ConsoleSettings,

    #[serde(default)]
    pub file: FileSettings,
}

impl Default for LoggerSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            console: ConsoleSettings::default(),
            file: FileSettings::default(),
        }
    }
}

impl LoggerSettings {
    /// Converts the file representation into the runtime logger configuration.
    pub fn into_logger_config(self) -> Result<LoggerConfig, ConfigError> {
        let console_format = parse_format("logger.console.format", &self.console.format)?;
        let file_format = parse_format("logger.file.format", &self.file.format)?;

        let console = ConsoleConfig::new(self.console.enabled, self.console.colored, console_format);
        let file = FileConfig::new(
            self.file.enabled,
            PathBuf::from(self.file.path),
            self.file.append,
            file_format,
        )
        .map_err(|e| ConfigError::validation("logger.file", e.to_string()))?;

        LoggerConfig::new(console, file, self.level)
            .map_err(|e| ConfigError::validation("logger", e.to_string()))
    }
}

fn parse_format(field: &str, value: &str) -> Result<LogFormat, ConfigError> {
    value
        .parse::<LogFormat>()
        .map_err(|e| ConfigError::validation(field, e.to_string()))
}

// ============================================================================
// Main Settings Structure
// ============================================================================

/// Complete application settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub application: ApplicationConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub factory: FactoryConfig,

    #[serde(default)]
    pub bootstrap: BootstrapConfig,

    #[serde(default)]
    pub logger: LoggerSettings,
}
