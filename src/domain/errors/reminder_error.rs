//! Reminder use case errors.

use thiserror::Error;

use super::StoreError;
use crate::domain::entities::ReminderId;

#[derive(Debug, Error)]
pub enum ReminderError {
    #[error("no user is signed in")]
    NotSignedIn,

    #[error("reminder message is empty")]
    EmptyMessage,

    #[error("reminder message exceeds {max} characters")]
    MessageTooLong { max: usize },

    #[error("reminder {0} not found")]
    NotFound(ReminderId),

    #[error(transparent)]
    Store(#[from] StoreError),
}
