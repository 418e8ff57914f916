//! Reminder use case.

use std::sync::Arc;

use chrono::{DateTime, FixedOffset, Local, SecondsFormat};
use tracing::{debug, info};

use crate::domain::entities::{Reminder, ReminderId, UserRef};
use crate::domain::errors::ReminderError;
use crate::domain::ports::ReminderStorePort;

/// Longest reminder message accepted, in characters.
pub const MAX_REMINDER_LENGTH: usize = 280;

/// Creates, lists and deletes reminders of the user shown as signed in.
///
/// The owner is fixed at construction and never re-read from the gateway.
#[derive(Clone)]
pub struct ReminderUseCase {
    store: Arc<dyn ReminderStorePort>,
    owner: Option<UserRef>,
}

impl ReminderUseCase {
    #[must_use]
    pub const fn new(store: Arc<dyn ReminderStorePort>, owner: Option<UserRef>) -> Self {
        Self { store, owner }
    }

    fn owner(&self) -> Result<&UserRef, ReminderError> {
        self.owner.as_ref().ok_or(ReminderError::NotSignedIn)
    }

    /// Creates a reminder stamped with the local time.
    ///
    /// # Errors
    /// Returns error if no user is signed in, the message is empty or too
    /// long, or the store fails.
    pub async fn create(&self, message: &str) -> Result<Reminder, ReminderError> {
        self.create_at(message, Local::now().fixed_offset()).await
    }

    /// Creates a reminder stamped with the given time.
    ///
    /// # Errors
    /// Same as [`Self::create`].
    pub async fn create_at(
        &self,
        message: &str,
        at: DateTime<FixedOffset>,
    ) -> Result<Reminder, ReminderError> {
        let owner = self.owner()?;
        let message = message.trim();

        if message.is_empty() {
            return Err(ReminderError::EmptyMessage);
        }
        if message.chars().count() > MAX_REMINDER_LENGTH {
            return Err(ReminderError::MessageTooLong {
                max: MAX_REMINDER_LENGTH,
            });
        }

        let created_at = at.to_rfc3339_opts(SecondsFormat::Secs, false);
        let reminder = self.store.create(owner.uid(), message, &created_at).await?;

        info!(id = %reminder.id(), owner = %owner.uid(), "Reminder created");
        Ok(reminder)
    }

    /// Lists the signed-in user's reminders, newest first.
    ///
    /// # Errors
    /// Returns error if no user is signed in or the store fails.
    pub async fn list(&self) -> Result<Vec<Reminder>, ReminderError> {
        let owner = self.owner()?;
        let mut reminders = self.store.list_for(owner.uid()).await?;
        reminders.sort_by_key(|r| std::cmp::Reverse(r.id()));

        debug!(owner = %owner.uid(), count = reminders.len(), "Listed reminders");
        Ok(reminders)
    }

    /// Deletes one of the signed-in user's reminders.
    ///
    /// # Errors
    /// Returns [`ReminderError::NotFound`] if the user owns no reminder with
    /// that id.
    pub async fn delete(&self, id: ReminderId) -> Result<(), ReminderError> {
        let owner = self.owner()?;

        if self.store.delete(owner.uid(), id).await? {
            info!(%id, owner = %owner.uid(), "Reminder deleted");
            Ok(())
        } else {
            Err(ReminderError::NotFound(id))
        }
    }
}
