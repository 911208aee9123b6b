//! Configuration Storage
//!
//! This module reads the two config files the importer understands: the
//! general config file and the per-database connection file. Both are TOML;
//! only the camelCase key names (`debugMode`, `dbConnectionString`, ...) are
//! carried over from the older YAML files, which must be converted.

use crate::error::{ImportError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default general config file name
pub const DEFAULT_CONFIG_NAME: &str = "config";

/// Extension appended to config names given without one
const CONFIG_EXTENSION: &str = "toml";

/// General settings (`config.toml`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeneralConfig {
    /// Enable debug logging
    pub debug_mode: bool,
    /// Directory holding connection files
    pub connections_dir: Option<PathBuf>,
    /// Name of the connection file to use
    pub connection_config: Option<String>,
    /// Commit instead of rolling back after a successful import
    pub commit_on_success: bool,
    /// Where the failing statement is written
    pub failure_file: Option<PathBuf>,
}

/// Connection settings (`<connectionsDir>/<connectionConfig>.toml`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConnectionConfig {
    /// Full `user/password@host:port/service` string
    pub db_connection_string: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub hostname: Option<String>,
    pub port: Option<u16>,
    pub service: Option<String>,
}

/// Resolve a config name to a file path inside `dir`
///
/// Names without an extension get `.toml` appended.
pub fn config_path(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    if path.extension().is_some() {
        path
    } else {
        path.with_extension(CONFIG_EXTENSION)
    }
}

fn read_toml<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path).map_err(|e| {
        ImportError::Config(format!(
            "Failed to read config file {}: {}",
            path.display(),
            e
        ))
    })?;

    toml::from_str(&content).map_err(|source| ImportError::ConfigParse {
        path: path.to_path_buf(),
        source,
    })
}

impl GeneralConfig {
    /// Load the general config file, failing if it does not exist
    pub fn load(path: &Path) -> Result<Self> {
        tracing::debug!(path = %path.display(), "Reading config file");
        read_toml(path)
    }

    /// Load the general config file, falling back to defaults if it is absent
    pub fn load_optional(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }
        Self::load(path)
    }
}

impl ConnectionConfig {
    /// Load a connection file
    pub fn load(path: &Path) -> Result<Self> {
        tracing::debug!(path = %path.display(), "Reading connection file");
        read_toml(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_config_path_appends_extension() {
        assert_eq!(
            config_path(Path::new("conns"), "dev"),
            PathBuf::from("conns/dev.toml")
        );
        assert_eq!(
            config_path(Path::new("."), "settings.toml"),
            PathBuf::from("./settings.toml")
        );
    }

    #[test]
    fn test_general_config_camel_case_keys() {
        let config: GeneralConfig = toml::from_str(
            r#"
            debugMode = true
            connectionsDir = "connections"
            connectionConfig = "dev"
            "#,
        )
        .unwrap();

        assert!(config.debug_mode);
        assert_eq!(config.connections_dir, Some(PathBuf::from("connections")));
        assert_eq!(config.connection_config.as_deref(), Some("dev"));
        assert!(!config.commit_on_success);
        assert!(config.failure_file.is_none());
    }

    #[test]
    fn test_connection_config_parts() {
        let config: ConnectionConfig = toml::from_str(
            r#"
            username = "apex"
            password = "secret"
            hostname = "db.local"
            port = 1521
            service = "XEPDB1"
            "#,
        )
        .unwrap();

        assert!(config.db_connection_string.is_none());
        assert_eq!(config.port, Some(1521));
        assert_eq!(config.service.as_deref(), Some("XEPDB1"));
    }

    #[test]
    fn test_load_optional_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = GeneralConfig::load_optional(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, GeneralConfig::default());
    }

    #[test]
    fn test_load_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(GeneralConfig::load(&dir.path().join("nope.toml")).is_err());
    }

    #[test]
    fn test_load_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "debugMode = [").unwrap();

        let err = GeneralConfig::load(&path).unwrap_err();
        assert!(matches!(err, ImportError::ConfigParse { .. }));
    }
}
