//! Application configuration.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use super::args::CliArgs;

const APP_NAME: &str = "bakery";
const APP_QUALIFIER: &str = "com";
const APP_ORGANIZATION: &str = "bakery";
const CONFIG_FILE_NAME: &str = "config.toml";

const DEFAULT_IDENTITY_BASE_URL: &str = "https://identitytoolkit.googleapis.com/v1";
const DEFAULT_TOKEN_BASE_URL: &str = "https://securetoken.googleapis.com/v1";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
const REMINDERS_FILE_NAME: &str = "reminders.toml";

/// Log level configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace level.
    Trace,
    /// Debug level.
    Debug,
    /// Info level.
    #[default]
    Info,
    /// Warning level.
    Warn,
    /// Error level.
    Error,
}

impl LogLevel {
    /// Converts to tracing level.
    #[must_use]
    pub const fn to_tracing_level(self) -> tracing::Level {
        match self {
            Self::Trace => tracing::Level::TRACE,
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warn => tracing::Level::WARN,
            Self::Error => tracing::Level::ERROR,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Trace => write!(f, "trace"),
            Self::Debug => write!(f, "debug"),
            Self::Info => write!(f, "info"),
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Application configuration, read from TOML and overridden by CLI.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Configuration file path.
    #[serde(skip)]
    pub config: Option<PathBuf>,

    /// Log file path.
    #[serde(skip)]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[serde(default)]
    pub log_level: LogLevel,

    /// Identity provider settings.
    #[serde(default)]
    pub identity: IdentityConfig,

    /// Session persistence settings.
    #[serde(default)]
    pub session: SessionConfig,

    /// Reminder storage settings.
    #[serde(default)]
    pub reminders: RemindersConfig,
}

/// Identity provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityConfig {
    /// Web API key of the identity project. Without one the app runs offline.
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_identity_base_url")]
    pub identity_base_url: String,

    #[serde(default = "default_token_base_url")]
    pub token_base_url: String,

    /// Seconds before a pending request is reported as timed out.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Use the in-process account directory instead of the remote provider.
    #[serde(default)]
    pub offline: bool,
}

impl IdentityConfig {
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    /// Returns the API key when the remote provider should be used.
    #[must_use]
    pub fn remote_api_key(&self) -> Option<&str> {
        if self.offline {
            return None;
        }
        self.api_key.as_deref().filter(|key| !key.trim().is_empty())
    }
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            identity_base_url: default_identity_base_url(),
            token_base_url: default_token_base_url(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            offline: false,
        }
    }
}

/// Session persistence configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Keep the signed-in session in the system keyring between launches.
    #[serde(default = "default_true")]
    pub remember_session: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            remember_session: true,
        }
    }
}

/// Reminder storage configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RemindersConfig {
    /// Reminder table file. Defaults to the data directory.
    #[serde(default)]
    pub file: Option<PathBuf>,
}

fn default_identity_base_url() -> String {
    DEFAULT_IDENTITY_BASE_URL.to_string()
}

fn default_token_base_url() -> String {
    DEFAULT_TOKEN_BASE_URL.to_string()
}

const fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

const fn default_true() -> bool {
    true
}

impl AppConfig {
    /// Merges CLI arguments into the configuration.
    pub fn merge_with_args(&mut self, args: CliArgs) {
        if let Some(config_path) = args.config {
            self.config = Some(config_path);
        }
        if let Some(log_path) = args.log_path {
            self.log_path = Some(log_path);
        }
        if let Some(log_level) = args.log_level {
            self.log_level = log_level;
        }
        if args.offline {
            self.identity.offline = true;
        }
        if let Some(api_key) = args.api_key {
            self.identity.api_key = Some(api_key);
        }
        if let Some(timeout) = args.request_timeout {
            self.identity.request_timeout_secs = timeout;
        }
        if let Some(remember) = args.remember_session {
            self.session.remember_session = remember;
        }
    }

    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
    }

    /// Returns default config file path.
    #[must_use]
    pub fn default_config_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    /// Returns default log file path.
    #[must_use]
    pub fn default_log_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.data_dir().join("bakery.log"))
    }

    /// Returns default reminder table path.
    #[must_use]
    pub fn default_reminders_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.data_dir().join(REMINDERS_FILE_NAME))
    }

    /// Returns effective log path.
    #[must_use]
    pub fn effective_log_path(&self) -> Option<PathBuf> {
        self.log_path.clone().or_else(Self::default_log_path)
    }

    /// Returns effective reminder table path.
    #[must_use]
    pub fn effective_reminders_path(&self) -> Option<PathBuf> {
        self.reminders
            .file
            .clone()
            .or_else(Self::default_reminders_path)
    }
}
