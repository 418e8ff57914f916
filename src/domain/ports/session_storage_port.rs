//! Session storage port definition.

use async_trait::async_trait;

use crate::domain::entities::Session;
use crate::domain::errors::StoreError;

/// Port for persisting the signed-in session across launches.
#[async_trait]
pub trait SessionStoragePort: Send + Sync {
    /// Retrieves the stored session.
    async fn get_session(&self) -> Result<Option<Session>, StoreError>;

    /// Stores the session securely.
    async fn store_session(&self, session: &Session) -> Result<(), StoreError>;

    /// Deletes the stored session.
    async fn delete_session(&self) -> Result<(), StoreError>;

    /// Checks if a session exists.
    async fn has_session(&self) -> Result<bool, StoreError> {
        Ok(self.get_session().await?.is_some())
    }
}
