//! Application layer: form controllers, navigation and use cases.

/// Form controllers.
pub mod controllers;
/// Data transfer objects.
pub mod dto;
/// Screen routing.
pub mod navigation;
/// Use case implementations.
pub mod use_cases;

pub use controllers::{AuthFlowController, Completion, FlowPhase, PendingRequest, SubmitOutcome};
pub use dto::{AuthUiState, FormEvent, FormKind};
pub use navigation::{AppFlow, FlowStep, NavOutcome, NavigationRouter};
pub use use_cases::{ReminderUseCase, RestoreSessionUseCase, SessionUseCase};
