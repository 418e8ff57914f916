//! Per-screen authentication flow controller.
//!
//! The controller owns one form's state and issues at most one gateway
//! request at a time. Requests are handed to the caller as a
//! [`PendingRequest`] to run on any executor; the resulting [`Completion`]
//! must be fed back through [`AuthFlowController::complete`] on the
//! controller's own context. Completions are matched by [`Ticket`], so late,
//! duplicated or foreign results are ignored rather than applied twice.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::application::dto::{AuthUiState, FormEvent, FormKind};
use crate::domain::entities::{Credentials, Session};
use crate::domain::errors::{GatewayError, ValidationError};
use crate::domain::ports::IdentityGatewayPort;
use crate::domain::services::{ValidationResult, validate, validate_email};

/// Default upper bound for a single gateway request.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Why the last submission failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowFailure {
    Validation(ValidationError),
    Gateway(String),
}

/// Controller phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowPhase {
    Idle,
    Validating,
    Submitting,
    Success,
    Failed(FlowFailure),
}

/// Identifies one issued request of one controller instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket {
    controller: Uuid,
    generation: u64,
}

/// Result of a gateway request, routed back to its controller.
#[derive(Debug, Clone)]
pub struct Completion {
    pub ticket: Ticket,
    pub result: Result<(), GatewayError>,
    /// Session issued by a successful sign-in or sign-up. The gateway made it
    /// current even if the completion is later ignored.
    pub session: Option<Session>,
}

/// Result of a submit action.
#[derive(Debug)]
pub enum SubmitOutcome {
    /// A gateway request was issued and must be run by the caller.
    Issued(PendingRequest),
    /// Local validation failed; nothing was sent.
    Rejected(ValidationError),
    /// A request is already outstanding.
    Busy,
    /// The flow already succeeded.
    Completed,
    /// The controller was torn down.
    Detached,
}

impl SubmitOutcome {
    /// Returns the issued request, if any.
    #[must_use]
    pub fn into_request(self) -> Option<PendingRequest> {
        match self {
            Self::Issued(request) => Some(request),
            _ => None,
        }
    }
}

/// What applying a completion did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionOutcome {
    /// Transitioned `Submitting -> Success`. Reported once per request.
    Succeeded,
    /// Transitioned `Submitting -> Failed`.
    Failed,
    /// Stale, duplicated, foreign, or delivered after teardown.
    Ignored,
}

/// A gateway request issued by a controller, not yet executed.
pub struct PendingRequest {
    ticket: Ticket,
    kind: FormKind,
    credentials: Credentials,
    gateway: Arc<dyn IdentityGatewayPort>,
    timeout: Duration,
}

impl PendingRequest {
    #[must_use]
    pub const fn ticket(&self) -> Ticket {
        self.ticket
    }

    #[must_use]
    pub const fn kind(&self) -> FormKind {
        self.kind
    }

    /// Performs the gateway call, bounded by the controller's timeout.
    pub async fn run(self) -> Completion {
        let (result, session) = match tokio::time::timeout(self.timeout, self.call()).await {
            Ok(Ok(session)) => (Ok(()), session),
            Ok(Err(e)) => (Err(e), None),
            Err(_elapsed) => {
                warn!(kind = %self.kind, "Gateway request timed out");
                (Err(GatewayError::timeout(self.timeout)), None)
            }
        };

        Completion {
            ticket: self.ticket,
            result,
            session,
        }
    }

    async fn call(&self) -> Result<Option<Session>, GatewayError> {
        let email = self.credentials.email();
        match self.kind {
            FormKind::SignIn => self
                .gateway
                .sign_in(email, self.credentials.password())
                .await
                .map(Some),
            FormKind::SignUp => self
                .gateway
                .sign_up(email, self.credentials.password())
                .await
                .map(Some),
            FormKind::PasswordReset => {
                self.gateway.send_password_reset(email).await.map(|()| None)
            }
        }
    }
}

impl std::fmt::Debug for PendingRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingRequest")
            .field("ticket", &self.ticket)
            .field("kind", &self.kind)
            .field("credentials", &self.credentials)
            .finish_non_exhaustive()
    }
}

/// State machine behind one authentication form.
pub struct AuthFlowController {
    id: Uuid,
    kind: FormKind,
    gateway: Arc<dyn IdentityGatewayPort>,
    timeout: Duration,
    state: AuthUiState,
    phase: FlowPhase,
    generation: u64,
    attached: bool,
    state_tx: watch::Sender<AuthUiState>,
}

impl AuthFlowController {
    /// Creates a controller for one form instance.
    #[must_use]
    pub fn new(kind: FormKind, gateway: Arc<dyn IdentityGatewayPort>) -> Self {
        let state = AuthUiState::default();
        let (state_tx, _) = watch::channel(state.clone());

        Self {
            id: Uuid::new_v4(),
            kind,
            gateway,
            timeout: DEFAULT_REQUEST_TIMEOUT,
            state,
            phase: FlowPhase::Idle,
            generation: 0,
            attached: true,
            state_tx,
        }
    }

    /// Overrides the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub const fn kind(&self) -> FormKind {
        self.kind
    }

    #[must_use]
    pub const fn current_state(&self) -> &AuthUiState {
        &self.state
    }

    #[must_use]
    pub const fn phase(&self) -> &FlowPhase {
        &self.phase
    }

    #[must_use]
    pub const fn is_attached(&self) -> bool {
        self.attached
    }

    /// Subscribes to state changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<AuthUiState> {
        self.state_tx.subscribe()
    }

    /// Applies an input event. Returns the issued request when the event was
    /// a submit that passed validation.
    pub fn dispatch(&mut self, event: FormEvent) -> Option<PendingRequest> {
        match event {
            FormEvent::EmailChanged(value) => self.on_email_change(value),
            FormEvent::PasswordChanged(value) => self.on_password_change(value),
            FormEvent::ConfirmChanged(value) => self.on_confirm_change(value),
            FormEvent::Submit => return self.submit().into_request(),
            FormEvent::MessageConsumed => self.message_consumed(),
        }
        None
    }

    pub fn on_email_change(&mut self, value: impl Into<String>) {
        self.update_field(|state| state.email = value.into());
    }

    pub fn on_password_change(&mut self, value: impl Into<String>) {
        self.update_field(|state| state.password = value.into());
    }

    pub fn on_confirm_change(&mut self, value: impl Into<String>) {
        self.update_field(|state| state.confirm = value.into());
    }

    /// Clears the one-shot message after it was displayed.
    pub fn message_consumed(&mut self) {
        if !self.attached || self.state.message.is_none() {
            return;
        }
        self.state.message = None;
        self.publish();
    }

    /// Validates the form and, when valid, issues exactly one gateway request.
    pub fn submit(&mut self) -> SubmitOutcome {
        if !self.attached {
            return SubmitOutcome::Detached;
        }
        if self.state.loading {
            debug!(kind = %self.kind, "Ignoring submit while a request is outstanding");
            return SubmitOutcome::Busy;
        }
        if self.phase == FlowPhase::Success {
            debug!(kind = %self.kind, "Ignoring submit after success");
            return SubmitOutcome::Completed;
        }

        self.phase = FlowPhase::Validating;
        self.state.error = None;

        if let ValidationResult::Invalid(reason) = self.validate() {
            debug!(kind = %self.kind, reason = reason.code(), "Form rejected locally");
            self.state.error = Some(reason.to_string());
            self.phase = FlowPhase::Failed(FlowFailure::Validation(reason));
            self.publish();
            return SubmitOutcome::Rejected(reason);
        }

        self.generation += 1;
        self.phase = FlowPhase::Submitting;
        self.state.loading = true;
        self.publish();

        debug!(kind = %self.kind, generation = self.generation, "Issuing gateway request");

        SubmitOutcome::Issued(PendingRequest {
            ticket: self.ticket(),
            kind: self.kind,
            credentials: self.credentials(),
            gateway: Arc::clone(&self.gateway),
            timeout: self.timeout,
        })
    }

    /// Applies a gateway completion. Only the completion for the outstanding
    /// request is applied, and only once.
    pub fn complete(&mut self, completion: Completion) -> CompletionOutcome {
        if !self.attached {
            debug!(kind = %self.kind, "Dropping completion for detached controller");
            return CompletionOutcome::Ignored;
        }
        if completion.ticket != self.ticket() || self.phase != FlowPhase::Submitting {
            debug!(kind = %self.kind, ticket = ?completion.ticket, "Dropping stale completion");
            return CompletionOutcome::Ignored;
        }

        self.state.loading = false;

        let outcome = match completion.result {
            Ok(()) => {
                info!(kind = %self.kind, email = %self.state.email, "Gateway request succeeded");
                self.state.password.clear();
                self.state.confirm.clear();
                self.state.success = true;
                self.state.message = Some(self.kind.success_message().to_string());
                self.phase = FlowPhase::Success;
                CompletionOutcome::Succeeded
            }
            Err(e) => {
                warn!(kind = %self.kind, error = %e, "Gateway request failed");
                let reason = e
                    .description()
                    .unwrap_or_else(|| self.kind.fallback_error().to_string());
                self.state.error = Some(reason.clone());
                self.phase = FlowPhase::Failed(FlowFailure::Gateway(reason));
                CompletionOutcome::Failed
            }
        };

        self.publish();
        outcome
    }

    /// Detaches the controller from its screen. Later completions are ignored.
    pub fn teardown(&mut self) {
        if self.attached {
            debug!(kind = %self.kind, loading = self.state.loading, "Controller torn down");
            self.attached = false;
        }
    }

    const fn ticket(&self) -> Ticket {
        Ticket {
            controller: self.id,
            generation: self.generation,
        }
    }

    fn validate(&self) -> ValidationResult {
        let state = &self.state;
        match self.kind {
            FormKind::SignIn => validate(&state.email, &state.password, None),
            FormKind::SignUp => validate(&state.email, &state.password, Some(&state.confirm)),
            FormKind::PasswordReset => validate_email(&state.email),
        }
    }

    fn credentials(&self) -> Credentials {
        let state = &self.state;
        match self.kind {
            FormKind::SignIn => Credentials::new(&state.email, &state.password),
            FormKind::SignUp => Credentials::new(&state.email, &state.password)
                .with_confirmation(&state.confirm),
            FormKind::PasswordReset => Credentials::email_only(&state.email),
        }
    }

    fn update_field(&mut self, apply: impl FnOnce(&mut AuthUiState)) {
        if !self.attached {
            return;
        }
        apply(&mut self.state);
        self.state.error = None;
        self.publish();
    }

    fn publish(&self) {
        self.state_tx.send_replace(self.state.clone());
    }
}
