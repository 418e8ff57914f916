//! The `config.toml` read at startup.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, warn};

use super::app_config::AppConfig;
use crate::infrastructure::atomic_write::write_atomic;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to determine config directory")]
    NoConfigDir,
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Location of the configuration file.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    path: PathBuf,
}

impl ConfigFile {
    /// Uses the `--config` override when given, otherwise `config.toml` in the
    /// platform config directory.
    ///
    /// # Errors
    /// Returns [`ConfigError::NoConfigDir`] if there is no override and the
    /// platform has no config directory.
    pub fn resolve(path_override: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path_override {
            Some(path) => path.to_path_buf(),
            None => AppConfig::default_config_path().ok_or(ConfigError::NoConfigDir)?,
        };
        Ok(Self::at(path))
    }

    #[must_use]
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the configuration. A missing file is created with defaults. A
    /// file that does not parse is left in place and defaults are used.
    ///
    /// # Errors
    /// Returns error if the file exists but cannot be read, or the default
    /// file cannot be written.
    pub fn load(&self) -> Result<AppConfig, ConfigError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!(path = %self.path.display(), "Config file not found, writing defaults");
                let config = AppConfig::default();
                self.save(&config)?;
                return Ok(config);
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        match toml::from_str(&content) {
            Ok(config) => Ok(config),
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Config does not parse, using defaults"
                );
                Ok(AppConfig::default())
            }
        }
    }

    /// # Errors
    /// Returns error if the configuration cannot be serialized or written.
    pub fn save(&self, config: &AppConfig) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(config)?;
        write_atomic(&self.path, content.as_bytes()).map_err(|source| ConfigError::Write {
            path: self.path.clone(),
            source,
        })?;

        debug!(path = %self.path.display(), "Config saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::config::LogLevel;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_is_created_with_defaults() {
        let dir = tempdir().unwrap();
        let file = ConfigFile::at(dir.path().join("bakery").join("config.toml"));

        let config = file.load().unwrap();

        assert!(config.session.remember_session);
        assert!(file.path().exists());
        let written = std::fs::read_to_string(file.path()).unwrap();
        let written: AppConfig = toml::from_str(&written).unwrap();
        assert_eq!(written.identity.request_timeout_secs, 30);
    }

    #[test]
    fn test_malformed_file_is_kept_and_defaults_used() {
        let dir = tempdir().unwrap();
        let file = ConfigFile::at(dir.path().join("config.toml"));
        std::fs::write(file.path(), "[identity\nrequest_timeout_secs = 5").unwrap();

        let config = file.load().unwrap();

        assert_eq!(config.identity.request_timeout_secs, 30);
        assert_eq!(
            std::fs::read_to_string(file.path()).unwrap(),
            "[identity\nrequest_timeout_secs = 5"
        );
    }

    #[test]
    fn test_saved_settings_are_loaded_back() {
        let dir = tempdir().unwrap();
        let file = ConfigFile::at(dir.path().join("config.toml"));
        let mut config = AppConfig::default();
        config.log_level = LogLevel::Trace;
        config.identity.offline = true;
        config.session.remember_session = false;

        file.save(&config).unwrap();
        let loaded = file.load().unwrap();

        assert_eq!(loaded.log_level, LogLevel::Trace);
        assert!(loaded.identity.offline);
        assert!(!loaded.session.remember_session);
    }

    #[test]
    fn test_unreadable_path_reports_read_error() {
        let dir = tempdir().unwrap();
        let file = ConfigFile::at(dir.path());

        assert!(matches!(file.load(), Err(ConfigError::Read { .. })));
    }

    #[test]
    fn test_override_path_wins() {
        let dir = tempdir().unwrap();
        let custom = dir.path().join("custom.toml");

        let file = ConfigFile::resolve(Some(&custom)).unwrap();

        assert_eq!(file.path(), custom);
    }
}
