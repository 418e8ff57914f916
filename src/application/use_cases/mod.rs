//! Use case implementations.

mod reminder_use_case;
mod restore_session_use_case;
mod session_use_case;

pub use reminder_use_case::{MAX_REMINDER_LENGTH, ReminderUseCase};
pub use restore_session_use_case::RestoreSessionUseCase;
pub use session_use_case::SessionUseCase;
