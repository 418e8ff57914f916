//! Domain layer with core business entities and port definitions.

/// Entity definitions.
pub mod entities;
/// Error types.
pub mod errors;
/// Port definitions.
pub mod ports;
/// Screen definitions.
pub mod screen;
/// Domain services.
pub mod services;

pub use entities::{Credentials, Reminder, ReminderId, Session, UserRef};
pub use errors::{GatewayError, ReminderError, StoreError, ValidationError};
pub use ports::{IdentityGatewayPort, ReminderStorePort, SessionStoragePort};
pub use screen::Screen;
