//! Configuration module for filegate.

use serde::Deserialize;
use std::path::Path;

use crate::{FilegateError, Result};

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port number to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// CORS allowed origins. Empty means permissive mode without credentials.
    #[serde(default)]
    pub cors_origins: Vec<String>,
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
            cors_origins: Vec::new(),
        }
    }
}

/// File tree configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct FilesConfig {
    /// Root directory all file operations are confined to.
    #[serde(default = "default_root_path")]
    pub root_path: String,
    /// Maximum upload size per file in megabytes.
    #[serde(default = "default_max_upload_size")]
    pub max_upload_size_mb: u64,
}

fn default_root_path() -> String {
    "data".to_string()
}

fn default_max_upload_size() -> u64 {
    1024
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            root_path: default_root_path(),
            max_upload_size_mb: default_max_upload_size(),
        }
    }
}

/// Authentication configuration.
///
/// Authentication is enabled when both `username` and `password` are set.
/// With neither set the server is open, which is the expected mode on a
/// trusted local network.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Username accepted at login.
    #[serde(default)]
    pub username: String,
    /// Password accepted at login.
    #[serde(default)]
    pub password: String,
    /// Session lifetime in days. Activity slides the window.
    #[serde(default = "default_session_ttl_days")]
    pub session_ttl_days: u64,
}

fn default_session_ttl_days() -> u64 {
    7
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            username: String::new(),
            password: String::new(),
            session_ttl_days: default_session_ttl_days(),
        }
    }
}

impl AuthConfig {
    /// Whether authentication is enabled.
    pub fn enabled(&self) -> bool {
        !self.username.is_empty() && !self.password.is_empty()
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Optional log file path. Console output is always enabled.
    #[serde(default)]
    pub file: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// File tree configuration.
    #[serde(default)]
    pub files: FilesConfig,
    /// Authentication configuration.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(FilegateError::Io)?;
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
        toml::from_str(s).map_err(|e| FilegateError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `FILEGATE_ROOT`: root directory of the served file tree
    /// - `FILEGATE_PORT`: listen port
    /// - `FILEGATE_AUTH_USERNAME` / `FILEGATE_AUTH_PASSWORD`: login credentials
    pub fn apply_env_overrides(&mut self) {
        if let Ok(root) = std::env::var("FILEGATE_ROOT") {
            if !root.is_empty() {
                self.files.root_path = root;
            }
        }
        if let Ok(port) = std::env::var("FILEGATE_PORT") {
            if let Ok(port) = port.parse() {
                self.server.port = port;
            }
        }
        if let Ok(username) = std::env::var("FILEGATE_AUTH_USERNAME") {
            if !username.is_empty() {
                self.auth.username = username;
            }
        }
        if let Ok(password) = std::env::var("FILEGATE_AUTH_PASSWORD") {
            if !password.is_empty() {
                self.auth.password = password;
            }
        }
    }

    /// Validate the configuration.
    ///
    /// Returns an error if only one half of the credential pair is set,
    /// which would otherwise silently run the server unauthenticated.
    pub fn validate(&self) -> Result<()> {
        let half_configured = self.auth.username.is_empty() != self.auth.password.is_empty();
        if half_configured {
            return Err(FilegateError::Config(
                "auth requires both username and password. \
                 Set both in config.toml or via FILEGATE_AUTH_USERNAME and \
                 FILEGATE_AUTH_PASSWORD environment variables."
                    .to_string(),
            ));
        }
        if self.auth.session_ttl_days == 0 {
            return Err(FilegateError::Config(
                "auth.session_ttl_days must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.files.root_path, "data");
        assert_eq!(config.files.max_upload_size_mb, 1024);
        assert!(!config.auth.enabled());
        assert_eq!(config.auth.session_ttl_days, 7);
        assert_eq!(config.logging.level, "info");
        assert!(config.logging.file.is_none());
    }

    #[test]
    fn test_parse_empty() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.server.port, 8000);
    }

    #[test]
    fn test_parse_full() {
        let config = Config::parse(
            r#"
            [server]
            host = "127.0.0.1"
            port = 9000
            cors_origins = ["http://localhost:5173"]

            [files]
            root_path = "/srv/media"
            max_upload_size_mb = 64

            [auth]
            username = "admin"
            password = "hunter2"
            session_ttl_days = 14

            [logging]
            level = "debug"
            file = "logs/filegate.log"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.cors_origins.len(), 1);
        assert_eq!(config.files.root_path, "/srv/media");
        assert_eq!(config.files.max_upload_size_mb, 64);
        assert!(config.auth.enabled());
        assert_eq!(config.auth.session_ttl_days, 14);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.file.as_deref(), Some("logs/filegate.log"));
    }

    #[test]
    fn test_parse_invalid() {
        assert!(Config::parse("server = 1").is_err());
    }

    #[test]
    fn test_auth_enabled_requires_both() {
        let mut auth = AuthConfig::default();
        assert!(!auth.enabled());

        auth.username = "admin".to_string();
        assert!(!auth.enabled());

        auth.password = "secret".to_string();
        assert!(auth.enabled());
    }

    #[test]
    fn test_validate_half_configured_auth() {
        let mut config = Config::default();
        config.auth.username = "admin".to_string();
        assert!(config.validate().is_err());

        config.auth.password = "secret".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_zero_ttl() {
        let mut config = Config::default();
        config.auth.session_ttl_days = 0;
        assert!(config.validate().is_err());
    }
}
