//! Configuration module for HealthDocs.

use serde::Deserialize;
use std::path::Path;

use crate::{HealthDocsError, Result};

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port number to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_db_path")]
    pub path: String,
}

fn default_db_path() -> String {
    "data/healthdocs.db".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// Document file storage configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct FilesConfig {
    /// Media root. Documents are stored under `{media_root}/documents`.
    #[serde(default = "default_media_root")]
    pub media_root: String,
    /// Maximum upload size in megabytes.
    #[serde(default = "default_max_upload_size")]
    pub max_upload_size_mb: u64,
}

fn default_media_root() -> String {
    "uploads".to_string()
}

fn default_max_upload_size() -> u64 {
    10
}

impl FilesConfig {
    /// Maximum upload size in bytes.
    pub fn max_upload_size_bytes(&self) -> u64 {
        self.max_upload_size_mb * 1024 * 1024
    }
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            media_root: default_media_root(),
            max_upload_size_mb: default_max_upload_size(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file.
    #[serde(default = "default_log_file")]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "logs/healthdocs.log".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

/// Web API configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WebConfig {
    /// CORS allowed origins. Empty allows any origin.
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// File storage configuration.
    #[serde(default)]
    pub files: FilesConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Web API configuration.
    #[serde(default)]
    pub web: WebConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(HealthDocsError::Io)?;
        Self::parse(&content)
    }

    /// Load configuration from a TOML file and apply environment variable overrides.
    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| HealthDocsError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `HEALTHDOCS_MEDIA_ROOT`: Override the media root directory
    /// - `HEALTHDOCS_DATABASE_PATH`: Override the SQLite database path
    /// - `HEALTHDOCS_PORT`: Override the listen port
    pub fn apply_env_overrides(&mut self) {
        if let Ok(media_root) = std::env::var("HEALTHDOCS_MEDIA_ROOT") {
            if !media_root.is_empty() {
                self.files.media_root = media_root;
            }
        }

        if let Ok(db_path) = std::env::var("HEALTHDOCS_DATABASE_PATH") {
            if !db_path.is_empty() {
                self.database.path = db_path;
            }
        }

        if let Ok(port) = std::env::var("HEALTHDOCS_PORT") {
            // Logging is not initialised yet, so report straight to stderr.
            match parse_port_override(&port) {
                Ok(port) => self.server.port = port,
                Err(e) => eprintln!("Warning: {e}"),
            }
        }
    }

    /// Validate the configuration.
    ///
    /// Returns an error if the upload limit is zero.
    pub fn validate(&self) -> Result<()> {
        if self.files.max_upload_size_mb == 0 {
            return Err(HealthDocsError::Config(
                "files.max_upload_size_mb must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Parse a `HEALTHDOCS_PORT` value.
fn parse_port_override(value: &str) -> Result<u16> {
    value.trim().parse().map_err(|_| {
        HealthDocsError::Config(format!(
            "ignoring invalid HEALTHDOCS_PORT value: {value:?}"
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8000);

        assert_eq!(config.database.path, "data/healthdocs.db");

        assert_eq!(config.files.media_root, "uploads");
        assert_eq!(config.files.max_upload_size_mb, 10);
        assert_eq!(config.files.max_upload_size_bytes(), 10_485_760);

        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.file, "logs/healthdocs.log");

        assert!(config.web.cors_origins.is_empty());
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[server]
host = "127.0.0.1"
port = 9000

[database]
path = "custom/db.sqlite"

[files]
media_root = "/var/lib/healthdocs"
max_upload_size_mb = 20

[logging]
level = "debug"
file = "custom/logs/app.log"

[web]
cors_origins = ["http://localhost:3000"]
"#;

        let config = Config::parse(toml).unwrap();

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.database.path, "custom/db.sqlite");
        assert_eq!(config.files.media_root, "/var/lib/healthdocs");
        assert_eq!(config.files.max_upload_size_mb, 20);
        assert_eq!(config.files.max_upload_size_bytes(), 20 * 1024 * 1024);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.file, "custom/logs/app.log");
        assert_eq!(config.web.cors_origins, vec!["http://localhost:3000"]);
    }

    #[test]
    fn test_parse_partial_config() {
        let toml = r#"
[files]
media_root = "media"
"#;

        let config = Config::parse(toml).unwrap();

        assert_eq!(config.files.media_root, "media");
        assert_eq!(config.files.max_upload_size_mb, 10);
        assert_eq!(config.server.port, 8000);
    }

    #[test]
    fn test_parse_empty_config() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.files.media_root, "uploads");
    }

    #[test]
    fn test_parse_invalid_config() {
        let result = Config::parse("this is not valid toml [[[");
        assert!(matches!(result, Err(HealthDocsError::Config(_))));
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = Config::load("nonexistent.toml");
        assert!(matches!(result, Err(HealthDocsError::Io(_))));
    }

    #[test]
    fn test_validate_default() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_zero_upload_limit() {
        let mut config = Config::default();
        config.files.max_upload_size_mb = 0;
        assert!(matches!(config.validate(), Err(HealthDocsError::Config(_))));
    }

    #[test]
    fn test_parse_port_override() {
        assert_eq!(parse_port_override("9000").unwrap(), 9000);
        assert_eq!(parse_port_override(" 8080\n").unwrap(), 8080);

        for bad in ["", "http", "-1", "65536"] {
            match parse_port_override(bad) {
                Err(HealthDocsError::Config(msg)) => assert!(msg.contains("HEALTHDOCS_PORT")),
                other => panic!("expected config error for {bad:?}, got {other:?}"),
            }
        }
    }
}
