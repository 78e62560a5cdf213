//! Configuration management for Memkeep
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from a YAML file with CLI and environment overrides.

use crate::error::{MemkeepError, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure for Memkeep
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Session storage settings
    #[serde(default)]
    pub storage: StorageConfig,

    /// Server identity settings
    #[serde(default)]
    pub server: ServerConfig,
}

/// Session storage configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StorageConfig {
    /// Directory holding one JSON file per session. When unset, the OS
    /// data directory is used.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

/// Server identity configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Name advertised in the initialize handshake
    #[serde(default = "default_server_name")]
    pub name: String,
}

fn default_server_name() -> String {
    "memkeep".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: default_server_name(),
        }
    }
}

impl Config {
    /// Load configuration from file with CLI overrides
    ///
    /// A missing file is not an error: defaults are used and a warning is
    /// logged. The CLI `--data-dir` flag (or the `MEMKEEP_DATA_DIR`
    /// environment variable it reads) takes precedence over the file.
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or parsed
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::warn!("Config file not found at {}, using defaults", path);
            Self::default()
        };

        config.apply_cli_overrides(cli);

        Ok(config)
    }

    /// Parse configuration from a YAML file
    fn from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| MemkeepError::Config(format!("Failed to read {}: {}", path, e)))?;
        let config: Config = serde_yaml::from_str(&content)
            .map_err(|e| MemkeepError::Config(format!("Failed to parse {}: {}", path, e)))?;
        Ok(config)
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if let Some(data_dir) = &cli.data_dir {
            self.storage.data_dir = Some(data_dir.clone());
        }
    }

    /// Resolve the effective data directory
    ///
    /// Uses the configured directory when set, otherwise the OS data
    /// directory with a `sessions` subdirectory.
    pub fn data_dir(&self) -> Result<PathBuf> {
        if let Some(data_dir) = &self.storage.data_dir {
            return Ok(data_dir.clone());
        }

        let proj_dirs = ProjectDirs::from("com", "memkeep", "memkeep")
            .ok_or_else(|| MemkeepError::Config("Could not determine data directory".into()))?;
        Ok(proj_dirs.data_dir().join("sessions"))
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns error for an empty server name or an explicitly empty
    /// data directory
    pub fn validate(&self) -> Result<()> {
        if self.server.name.trim().is_empty() {
            return Err(MemkeepError::Config("server.name must not be empty".into()).into());
        }

        if let Some(data_dir) = &self.storage.data_dir {
            if data_dir.as_os_str().is_empty() {
                return Err(
                    MemkeepError::Config("storage.data_dir must not be empty".into()).into(),
                );
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};

    fn cli_with_data_dir(data_dir: Option<PathBuf>) -> Cli {
        Cli {
            config: None,
            data_dir,
            verbose: false,
            command: Commands::Serve,
        }
    }

    #[test]
    fn test_default_config_validates() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.server.name, "memkeep");
        assert!(config.storage.data_dir.is_none());
    }

    #[test]
    fn test_parse_full_yaml() {
        let yaml = r#"
storage:
  data_dir: /var/lib/memkeep/sessions
server:
  name: memkeep-test
"#;
        let config: Config = serde_yaml::from_str(yaml).expect("parse failed");
        assert_eq!(
            config.storage.data_dir,
            Some(PathBuf::from("/var/lib/memkeep/sessions"))
        );
        assert_eq!(config.server.name, "memkeep-test");
    }

    #[test]
    fn test_parse_partial_yaml_fills_defaults() {
        let yaml = "storage:\n  data_dir: /tmp/x\n";
        let config: Config = serde_yaml::from_str(yaml).expect("parse failed");
        assert_eq!(config.server.name, "memkeep");
    }

    #[test]
    fn test_cli_data_dir_overrides_file_value() {
        let yaml = "storage:\n  data_dir: /from/file\n";
        let mut config: Config = serde_yaml::from_str(yaml).expect("parse failed");
        config.apply_cli_overrides(&cli_with_data_dir(Some(PathBuf::from("/from/cli"))));
        assert_eq!(config.storage.data_dir, Some(PathBuf::from("/from/cli")));
    }

    #[test]
    fn test_absent_cli_flag_keeps_file_value() {
        let yaml = "storage:\n  data_dir: /from/file\n";
        let mut config: Config = serde_yaml::from_str(yaml).expect("parse failed");
        config.apply_cli_overrides(&cli_with_data_dir(None));
        assert_eq!(config.storage.data_dir, Some(PathBuf::from("/from/file")));
    }

    #[test]
    fn test_data_dir_resolution_prefers_configured_value() {
        let config = Config {
            storage: StorageConfig {
                data_dir: Some(PathBuf::from("/explicit")),
            },
            server: ServerConfig::default(),
        };
        assert_eq!(config.data_dir().expect("resolve failed"), PathBuf::from("/explicit"));
    }

    #[test]
    fn test_data_dir_resolution_falls_back_to_os_dir() {
        let config = Config::default();
        let resolved = config.data_dir().expect("resolve failed");
        assert!(resolved.ends_with("sessions"));
    }

    #[test]
    fn test_validate_rejects_empty_server_name() {
        let config = Config {
            storage: StorageConfig::default(),
            server: ServerConfig {
                name: "  ".to_string(),
            },
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_data_dir() {
        let config = Config {
            storage: StorageConfig {
                data_dir: Some(PathBuf::new()),
            },
            server: ServerConfig::default(),
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let config = Config::load("/definitely/not/here.yaml", &cli_with_data_dir(None))
            .expect("load failed");
        assert_eq!(config.server.name, "memkeep");
    }
}
