//! Application configuration.

pub mod app_config;
pub mod args;
pub mod config_file;

pub use app_config::{AppConfig, IdentityConfig, LogLevel, RemindersConfig, SessionConfig};
pub use args::CliArgs;
pub use config_file::{ConfigError, ConfigFile};
