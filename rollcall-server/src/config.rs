//! Configuration file for rollcall
//!
//! Loaded from `~/.rollcall/config.toml` (or `ROLLCALL_CONFIG`). Every key is
//! optional; callers layer CLI flags and environment on top.
//!
//! ```toml
//! bind = "127.0.0.1:3030"
//! database_url = "postgres://localhost/rollcall"
//! max_connections = 5
//! cors_permissive = false
//! seed = true
//! ```

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Configuration error type
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path:?} (invalid TOML): {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Optional settings read from the config file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RollcallConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bind: Option<SocketAddr>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_connections: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cors_permissive: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<bool>,
}

impl RollcallConfig {
    /// Config file path: `$ROLLCALL_CONFIG` or `~/.rollcall/config.toml`
    pub fn config_path() -> PathBuf {
        if let Some(path) = std::env::var_os("ROLLCALL_CONFIG") {
            return PathBuf::from(path);
        }
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".rollcall/config.toml")
    }

    /// Load the default config file. A missing file yields empty settings.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path())
    }

    /// Load from an explicit path. A missing file yields empty settings.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_owned(),
            source,
        })?;

        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_owned(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = RollcallConfig::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, RollcallConfig::default());
    }

    #[test]
    fn parses_all_keys() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            bind = "0.0.0.0:8080"
            database_url = "postgres://db/rollcall"
            max_connections = 12
            cors_permissive = true
            seed = false
            "#
        )
        .unwrap();

        let config = RollcallConfig::load_from(file.path()).unwrap();
        assert_eq!(config.bind, Some("0.0.0.0:8080".parse().unwrap()));
        assert_eq!(config.database_url.as_deref(), Some("postgres://db/rollcall"));
        assert_eq!(config.max_connections, Some(12));
        assert_eq!(config.cors_permissive, Some(true));
        assert_eq!(config.seed, Some(false));
    }

    #[test]
    fn rejects_unknown_keys() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "port = 3000").unwrap();

        let err = RollcallConfig::load_from(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
