mod identity_gateway_port;
mod reminder_store_port;
mod session_storage_port;

pub use identity_gateway_port::IdentityGatewayPort;
pub use reminder_store_port::ReminderStorePort;
pub use session_storage_port::SessionStoragePort;
