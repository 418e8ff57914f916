//! Reminder store port definition.

use async_trait::async_trait;

use crate::domain::entities::{Reminder, ReminderId};
use crate::domain::errors::StoreError;

/// Port for the local reminder table, keyed by an auto-assigned id with
/// secondary lookup by owner.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReminderStorePort: Send + Sync {
    /// Inserts a reminder and returns it with its assigned id.
    async fn create(
        &self,
        owner_id: &str,
        message: &str,
        created_at: &str,
    ) -> Result<Reminder, StoreError>;

    /// Lists every reminder owned by a user, in insertion order.
    async fn list_for(&self, owner_id: &str) -> Result<Vec<Reminder>, StoreError>;

    /// Deletes one of the owner's reminders. Returns whether a row was removed.
    async fn delete(&self, owner_id: &str, id: ReminderId) -> Result<bool, StoreError>;
}
