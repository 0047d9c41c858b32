//! Centralized configuration for api-server.
//!
//! All environment variables are loaded and validated at startup to fail fast
//! on misconfiguration rather than at request time.

use axum::http::HeaderValue;
use std::env;
use std::path::PathBuf;
use thiserror::Error;

/// Storage backend provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageProvider {
    /// In-memory storage (data lost on restart)
    Memory,
    /// SQLite file-based storage
    Sqlite,
}

impl StorageProvider {
    fn from_str(s: &str) -> Self {
        if s.eq_ignore_ascii_case("memory") {
            Self::Memory
        } else {
            Self::Sqlite
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl LogFormat {
    fn from_str(s: &str) -> Self {
        if s.eq_ignore_ascii_case("json") {
            Self::Json
        } else {
            Self::Pretty
        }
    }
}

/// Configuration error.
#[derive(Debug, Error)]
#[error("Configuration error for {field}: {message}")]
pub struct ConfigError {
    pub field: &'static str,
    pub message: String,
}

/// Server configuration loaded from environment variables.
///
/// All fields are validated at construction time.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port (default: 8000)
    pub port: u16,
    /// Storage provider (default: sqlite)
    pub storage_provider: StorageProvider,
    /// SQLite database path (default: ./addresses.db)
    pub db_path: PathBuf,
    /// Append-only log file; `None` when `LOG_FILE` is set to an empty string
    pub log_file: Option<PathBuf>,
    /// Console log format
    pub log_format: LogFormat,
    /// CORS allow origin
    pub cors_allow_origin: HeaderValue,
}

impl Config {
    /// Load and validate configuration from environment variables.
    ///
    /// Fails fast on invalid configuration.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Port
        let port = match lookup("PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|e| ConfigError {
                field: "PORT",
                message: format!("Invalid port '{}': {}", raw, e),
            })?,
            None => 8000,
        };

        // Storage provider
        let storage_provider =
            StorageProvider::from_str(&lookup("STORAGE_PROVIDER").unwrap_or_else(|| "sqlite".into()));

        // DB path (for sqlite)
        let db_path = PathBuf::from(lookup("DB_PATH").unwrap_or_else(|| "./addresses.db".into()));
        if db_path.as_os_str().is_empty() {
            return Err(ConfigError {
                field: "DB_PATH",
                message: "Must not be empty".into(),
            });
        }

        // Log file; an explicit empty value turns file logging off
        let log_file = match lookup("LOG_FILE") {
            Some(s) if s.trim().is_empty() => None,
            Some(s) => Some(PathBuf::from(s)),
            None => Some(PathBuf::from("./app.log")),
        };

        // Log format
        let log_format =
            LogFormat::from_str(&lookup("LOG_FORMAT").unwrap_or_else(|| "pretty".into()));

        // CORS allow origin
        let cors_origin_str = lookup("CORS_ALLOW_ORIGIN").unwrap_or_else(|| "*".into());
        let cors_allow_origin = if cors_origin_str == "*" {
            HeaderValue::from_static("*")
        } else {
            HeaderValue::from_str(&cors_origin_str).map_err(|e| ConfigError {
                field: "CORS_ALLOW_ORIGIN",
                message: format!("Invalid header value '{}': {}", cors_origin_str, e),
            })?
        };

        Ok(Self {
            port,
            storage_provider,
            db_path,
            log_file,
            log_format,
            cors_allow_origin,
        })
    }

    /// Log a warning when the selected storage does not survive a restart.
    pub fn warn_if_ephemeral(&self) {
        if self.storage_provider == StorageProvider::Memory {
            tracing::warn!(
                "STORAGE_PROVIDER=memory: addresses are kept in process memory and \
                 will be lost on restart."
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn storage_provider_parsing() {
        assert_eq!(StorageProvider::from_str("memory"), StorageProvider::Memory);
        assert_eq!(StorageProvider::from_str("MEMORY"), StorageProvider::Memory);
        assert_eq!(StorageProvider::from_str("sqlite"), StorageProvider::Sqlite);
        assert_eq!(StorageProvider::from_str("anything"), StorageProvider::Sqlite);
    }

    #[test]
    fn log_format_parsing() {
        assert_eq!(LogFormat::from_str("pretty"), LogFormat::Pretty);
        assert_eq!(LogFormat::from_str("json"), LogFormat::Json);
        assert_eq!(LogFormat::from_str("JSON"), LogFormat::Json);
        assert_eq!(LogFormat::from_str("anything"), LogFormat::Pretty);
    }

    #[test]
    fn defaults_apply_when_unset() {
        let cfg = config_from(&[]).unwrap();
        assert_eq!(cfg.port, 8000);
        assert_eq!(cfg.storage_provider, StorageProvider::Sqlite);
        assert_eq!(cfg.db_path, PathBuf::from("./addresses.db"));
        assert_eq!(cfg.log_file, Some(PathBuf::from("./app.log")));
        assert_eq!(cfg.log_format, LogFormat::Pretty);
        assert_eq!(cfg.cors_allow_origin, HeaderValue::from_static("*"));
    }

    #[test]
    fn overrides_are_honoured() {
        let cfg = config_from(&[
            ("PORT", "9001"),
            ("STORAGE_PROVIDER", "memory"),
            ("DB_PATH", "/tmp/book.db"),
            ("LOG_FILE", ""),
            ("LOG_FORMAT", "json"),
            ("CORS_ALLOW_ORIGIN", "http://localhost:5173"),
        ])
        .unwrap();
        assert_eq!(cfg.port, 9001);
        assert_eq!(cfg.storage_provider, StorageProvider::Memory);
        assert_eq!(cfg.db_path, PathBuf::from("/tmp/book.db"));
        assert_eq!(cfg.log_file, None);
        assert_eq!(cfg.log_format, LogFormat::Json);
        assert_eq!(cfg.cors_allow_origin.to_str().unwrap(), "http://localhost:5173");
    }

    #[test]
    fn invalid_port_fails_fast() {
        let err = config_from(&[("PORT", "eighty")]).unwrap_err();
        assert_eq!(err.field, "PORT");
        let err = config_from(&[("PORT", "70000")]).unwrap_err();
        assert_eq!(err.field, "PORT");
    }

    #[test]
    fn invalid_cors_origin_fails_fast() {
        let err = config_from(&[("CORS_ALLOW_ORIGIN", "bad\norigin")]).unwrap_err();
        assert_eq!(err.field, "CORS_ALLOW_ORIGIN");
    }

    #[test]
    fn empty_db_path_is_rejected() {
        let err = config_from(&[("DB_PATH", "")]).unwrap_err();
        assert_eq!(err.field, "DB_PATH");
    }
}
