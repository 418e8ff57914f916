//! Infrastructure layer with external service adapters.

mod atomic_write;
/// Application configuration.
pub mod config;
/// Identity provider adapters.
pub mod identity;
/// Reminder persistence.
pub mod reminders;
/// Session storage adapters.
pub mod storage;

pub use config::{AppConfig, CliArgs, ConfigFile, LogLevel};
pub use identity::{FirebaseIdentityClient, InMemoryIdentityGateway};
pub use reminders::FileReminderStore;
pub use storage::KeyringSessionStorage;
