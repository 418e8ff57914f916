//! Stub session storage for builds without keyring support.

use async_trait::async_trait;
use tracing::debug;

use crate::domain::entities::Session;
use crate::domain::errors::StoreError;
use crate::domain::ports::SessionStoragePort;

/// Stub session storage that remembers nothing.
/// Used when keyring feature is disabled.
pub struct KeyringSessionStorage;

impl KeyringSessionStorage {
    /// Creates new stub storage.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Creates storage with custom names (no-op in stub).
    #[must_use]
    pub fn with_names(_service: impl Into<String>, _user: impl Into<String>) -> Self {
        Self
    }
}

impl Default for KeyringSessionStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionStoragePort for KeyringSessionStorage {
    async fn get_session(&self) -> Result<Option<Session>, StoreError> {
        debug!("Keyring feature disabled - no session storage available");
        Ok(None)
    }

    async fn store_session(&self, _session: &Session) -> Result<(), StoreError> {
        debug!("Keyring feature disabled - session not persisted");
        Ok(())
    }

    async fn delete_session(&self) -> Result<(), StoreError> {
        debug!("Keyring feature disabled - nothing to delete");
        Ok(())
    }
}
