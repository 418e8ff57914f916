//! Session storage adapters.

#[cfg(feature = "keyring")]
mod keyring_session_storage;
#[cfg(not(feature = "keyring"))]
mod keyring_session_storage_stub;

#[cfg(feature = "keyring")]
pub use keyring_session_storage::KeyringSessionStorage;
#[cfg(not(feature = "keyring"))]
pub use keyring_session_storage_stub::KeyringSessionStorage;
