//! Domain error types.

mod gateway_error;
mod navigation_error;
mod reminder_error;
mod secret_error;
mod store_error;
mod validation_error;

pub use gateway_error::GatewayError;
pub use navigation_error::NavigationError;
pub use reminder_error::ReminderError;
pub use secret_error::SecretError;
pub use store_error::StoreError;
pub use validation_error::ValidationError;
