//! Server configuration.
//!
//! Read from a TOML file with a `[server]` table, then overridden by
//! `INTERHOOK_*` environment variables:
//!
//! ```toml
//! [server]
//! public_key = "e3b0c442..."
//! endpoint = "/interactions"
//! bind = "0.0.0.0:3000"
//! body_limit = 1048576
//! chain_deadline_ms = 2500
//! log_level = "info"
//! ```

use crate::logger::{FilterError, parse_filter};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Env var overriding `server.public_key`.
pub const ENV_PUBLIC_KEY: &str = "INTERHOOK_PUBLIC_KEY";
/// Env var overriding `server.endpoint`.
pub const ENV_ENDPOINT: &str = "INTERHOOK_ENDPOINT";
/// Env var overriding `server.bind`.
pub const ENV_BIND: &str = "INTERHOOK_BIND";
/// Env var overriding `server.log_level`.
pub const ENV_LOG_LEVEL: &str = "INTERHOOK_LOG_LEVEL";

/// Errors raised while loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("cannot read {}: {source}", .path.display())]
    Read {
        /// File that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid TOML or has the wrong shape.
    #[error("config error: {0}")]
    Parse(#[from] toml::de::Error),

    /// No public key in the file or the environment.
    #[error("no public key configured (set server.public_key or INTERHOOK_PUBLIC_KEY)")]
    MissingPublicKey,

    /// `log_level` is not a usable filter.
    #[error("invalid log_level '{level}': {source}")]
    LogLevel {
        /// The rejected setting.
        level: String,
        /// Why it was rejected.
        #[source]
        source: FilterError,
    },
}

/// Resolved server settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Hex Ed25519 public key of the application.
    pub public_key: String,
    /// Path interactions are posted to.
    pub endpoint: String,
    /// Socket address to listen on.
    pub bind: String,
    /// Maximum accepted body size in bytes.
    pub body_limit: usize,
    /// Optional bound on the whole handler chain.
    pub chain_deadline: Option<Duration>,
    /// Log level passed to the logger.
    pub log_level: String,
}

/// Values that take precedence over the file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    /// Replaces `public_key`.
    pub public_key: Option<String>,
    /// Replaces `endpoint`.
    pub endpoint: Option<String>,
    /// Replaces `bind`.
    pub bind: Option<String>,
    /// Replaces `log_level`.
    pub log_level: Option<String>,
}

impl ConfigOverrides {
    /// Collect overrides from `INTERHOOK_*` variables.
    pub fn from_env() -> Self {
        Self {
            public_key: env::var(ENV_PUBLIC_KEY).ok(),
            endpoint: env::var(ENV_ENDPOINT).ok(),
            bind: env::var(ENV_BIND).ok(),
            log_level: env::var(ENV_LOG_LEVEL).ok(),
        }
    }
}

#[derive(Deserialize, Default)]
struct RawConfig {
    #[serde(default)]
    server: RawServer,
}

#[derive(Deserialize)]
struct RawServer {
    #[serde(default)]
    public_key: Option<String>,
    #[serde(default = "default_endpoint")]
    endpoint: String,
    #[serde(default = "default_bind")]
    bind: String,
    #[serde(default = "default_body_limit")]
    body_limit: usize,
    #[serde(default)]
    chain_deadline_ms: Option<u64>,
    #[serde(default = "default_log_level")]
    log_level: String,
}

impl Default for RawServer {
    fn default() -> Self {
        Self {
            public_key: None,
            endpoint: default_endpoint(),
            bind: default_bind(),
            body_limit: default_body_limit(),
            chain_deadline_ms: None,
            log_level: default_log_level(),
        }
    }
}

fn default_endpoint() -> String {
    "/interactions".to_string()
}

fn default_bind() -> String {
    "127.0.0.1:3000".to_string()
}

fn default_body_limit() -> usize {
    1024 * 1024
}

fn default_log_level() -> String {
    "info".to_string()
}

impl ServerConfig {
    /// Load from `path` (or defaults if `None`), then apply env overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let overrides = ConfigOverrides::from_env();
        match path {
            Some(path) => Self::load_from(path, &overrides),
            None => Self::resolve(RawConfig::default(), &overrides),
        }
    }

    /// Load from an explicit file with explicit overrides.
    pub fn load_from(path: &Path, overrides: &ConfigOverrides) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw, overrides)
    }

    /// Parse TOML text with explicit overrides.
    pub fn from_toml_str(raw: &str, overrides: &ConfigOverrides) -> Result<Self, ConfigError> {
        let parsed: RawConfig = toml::from_str(raw)?;
        Self::resolve(parsed, overrides)
    }

    fn resolve(raw: RawConfig, overrides: &ConfigOverrides) -> Result<Self, ConfigError> {
        let s = raw.server;
        let public_key = overrides
            .public_key
            .clone()
            .or(s.public_key)
            .filter(|k| !k.trim().is_empty())
            .ok_or(ConfigError::MissingPublicKey)?;

        let log_level = overrides.log_level.clone().unwrap_or(s.log_level);
        if let Err(source) = parse_filter(&log_level) {
            return Err(ConfigError::LogLevel {
                level: log_level,
                source,
            });
        }

        Ok(Self {
            public_key: public_key.trim().to_string(),
            endpoint: overrides.endpoint.clone().unwrap_or(s.endpoint),
            bind: overrides.bind.clone().unwrap_or(s.bind),
            body_limit: s.body_limit,
            chain_deadline: s.chain_deadline_ms.map(Duration::from_millis),
            log_level,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const KEY: &str = "ea4a6c63e29c520abef5507b132ec5f9954776aebebe7b92421eea691446d22c";

    #[test]
    fn defaults_fill_missing_fields() {
        let toml = format!("[server]\npublic_key = \"{KEY}\"\n");
        let config = ServerConfig::from_toml_str(&toml, &ConfigOverrides::default()).unwrap();
        assert_eq!(config.endpoint, "/interactions");
        assert_eq!(config.bind, "127.0.0.1:3000");
        assert_eq!(config.body_limit, 1024 * 1024);
        assert_eq!(config.chain_deadline, None);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn overrides_win() {
        let toml = format!(
            "[server]\npublic_key = \"{KEY}\"\nendpoint = \"/a\"\nchain_deadline_ms = 250\n"
        );
        let overrides = ConfigOverrides {
            endpoint: Some("/b".into()),
            log_level: Some("debug".into()),
            ..ConfigOverrides::default()
        };
        let config = ServerConfig::from_toml_str(&toml, &overrides).unwrap();
        assert_eq!(config.endpoint, "/b");
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.chain_deadline, Some(Duration::from_millis(250)));
    }

    #[test]
    fn missing_key_is_an_error() {
        let err = ServerConfig::from_toml_str("[server]\n", &ConfigOverrides::default())
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingPublicKey));
    }

    #[test]
    fn key_may_come_from_overrides_only() {
        let overrides = ConfigOverrides {
            public_key: Some(KEY.into()),
            ..ConfigOverrides::default()
        };
        let config = ServerConfig::from_toml_str("", &overrides).unwrap();
        assert_eq!(config.public_key, KEY);
    }

    #[test]
    fn reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[server]\npublic_key = \"{KEY}\"\nbind = \"0.0.0.0:8080\"").unwrap();
        let config = ServerConfig::load_from(file.path(), &ConfigOverrides::default()).unwrap();
        assert_eq!(config.bind, "0.0.0.0:8080");
    }

    #[test]
    fn unreadable_file_names_path() {
        let err = ServerConfig::load_from(
            Path::new("/definitely/not/here.toml"),
            &ConfigOverrides::default(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.toml"));
    }

    #[test]
    fn unusable_log_level_is_rejected() {
        let overrides = ConfigOverrides {
            public_key: Some(KEY.into()),
            log_level: Some("verbose".into()),
            ..ConfigOverrides::default()
        };
        let err = ServerConfig::from_toml_str("", &overrides).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::LogLevel { ref level, .. } if level == "verbose"
        ));
    }

    #[test]
    fn directive_log_level_is_accepted() {
        let toml = format!(
            "[server]\npublic_key = \"{KEY}\"\nlog_level = \"warn,interhook=debug\"\n"
        );
        let config = ServerConfig::from_toml_str(&toml, &ConfigOverrides::default()).unwrap();
        assert_eq!(config.log_level, "warn,interhook=debug");
    }

    #[test]
    fn wrong_types_are_parse_errors() {
        let err = ServerConfig::from_toml_str(
            "[server]\nbody_limit = \"big\"\n",
            &ConfigOverrides::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
