//! Keyring-based session storage.

use async_trait::async_trait;
use keyring::Entry;
use tracing::{debug, warn};

use crate::domain::entities::Session;
use crate::domain::errors::{SecretError, StoreError};
use crate::domain::ports::SessionStoragePort;

const KEYRING_SERVICE: &str = "bakery";
const KEYRING_USER: &str = "session";

/// System keyring session storage adapter.
///
/// The session is kept as a single JSON secret so that the uid, email and
/// both tokens are replaced together.
pub struct KeyringSessionStorage {
    service: String,
    user: String,
}

impl KeyringSessionStorage {
    /// Creates new storage with default names.
    #[must_use]
    pub fn new() -> Self {
        Self {
            service: KEYRING_SERVICE.to_string(),
            user: KEYRING_USER.to_string(),
        }
    }

    /// Creates storage with custom names.
    #[must_use]
    pub fn with_names(service: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            user: user.into(),
        }
    }

    fn entry(&self) -> Result<Entry, StoreError> {
        Entry::new(&self.service, &self.user)
            .map_err(|e| SecretError::AccessFailed(format!("failed to access keyring: {e}")).into())
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
        debug!(service = %self.service, "Retrieving session from keyring");

        let entry = self.entry()?;

        match entry.get_password() {
            Ok(secret) => {
                let session: Session = serde_json::from_str(&secret).map_err(|e| {
                    warn!(error = %e, "Stored session is unreadable");
                    StoreError::corrupt(e.to_string())
                })?;
                debug!(user = %session.user().email(), "Session found in keyring");
                Ok(Some(session))
            }
            Err(keyring::Error::NoEntry) => {
                debug!("No session stored in keyring");
                Ok(None)
            }
            Err(e) => {
                warn!(error = %e, "Failed to retrieve session from keyring");
                Err(SecretError::RetrievalFailed(e.to_string()).into())
            }
        }
    }

    async fn store_session(&self, session: &Session) -> Result<(), StoreError> {
        debug!(service = %self.service, "Storing session in keyring");

        let secret =
            serde_json::to_string(session).map_err(|e| StoreError::write_failed(e.to_string()))?;
        let entry = self.entry()?;

        entry.set_password(&secret).map_err(|e| {
            warn!(error = %e, "Failed to store session in keyring");
            StoreError::from(SecretError::StorageFailed(e.to_string()))
        })?;

        debug!("Session stored successfully");
        Ok(())
    }

    async fn delete_session(&self) -> Result<(), StoreError> {
        debug!(service = %self.service, "Deleting session from keyring");

        let entry = self.entry()?;

        match entry.delete_credential() {
            Ok(()) => {
                debug!("Session deleted from keyring");
                Ok(())
            }
            Err(keyring::Error::NoEntry) => {
                debug!("No session to delete");
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Failed to delete session from keyring");
                Err(SecretError::DeletionFailed(e.to_string()).into())
            }
        }
    }
}
