//! Couples the router with the controller of the visible form.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use super::router::{NavOutcome, NavigationRouter};
use crate::application::controllers::{
    AuthFlowController, Completion, CompletionOutcome, DEFAULT_REQUEST_TIMEOUT, PendingRequest,
};
use crate::application::dto::{FormEvent, FormKind};
use crate::domain::Screen;
use crate::domain::errors::NavigationError;
use crate::domain::ports::IdentityGatewayPort;

/// Effect of a completion on the flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowStep {
    pub outcome: CompletionOutcome,
    /// Set when a success moved the router.
    pub navigated: Option<(NavOutcome, Screen)>,
    /// One-shot message from the finished form, already consumed.
    pub message: Option<String>,
}

/// Owns the navigation stack and the controller of the visible auth form.
///
/// A fresh controller is created every time a form screen becomes visible;
/// the previous one is torn down so its in-flight completion is ignored.
pub struct AppFlow {
    router: NavigationRouter,
    gateway: Arc<dyn IdentityGatewayPort>,
    timeout: Duration,
    active: Option<AuthFlowController>,
}

impl AppFlow {
    #[must_use]
    pub fn new(gateway: Arc<dyn IdentityGatewayPort>) -> Self {
        Self::with_router(NavigationRouter::new(), gateway)
    }

    /// Starts on the principal screen for a restored session.
    #[must_use]
    pub fn signed_in(gateway: Arc<dyn IdentityGatewayPort>) -> Self {
        Self::with_router(NavigationRouter::signed_in(), gateway)
    }

    fn with_router(router: NavigationRouter, gateway: Arc<dyn IdentityGatewayPort>) -> Self {
        Self {
            router,
            gateway,
            timeout: DEFAULT_REQUEST_TIMEOUT,
            active: None,
        }
    }

    /// Sets the timeout applied to controllers created from now on.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn current_screen(&self) -> Screen {
        self.router.current()
    }

    #[must_use]
    pub const fn router(&self) -> &NavigationRouter {
        &self.router
    }

    #[must_use]
    pub const fn controller(&self) -> Option<&AuthFlowController> {
        self.active.as_ref()
    }

    /// Opens a form screen from home.
    ///
    /// # Errors
    /// Returns error if the transition is not part of the screen graph.
    pub fn open(&mut self, target: Screen) -> Result<Screen, NavigationError> {
        let screen = self.router.open(target)?;
        self.sync_controller();
        Ok(screen)
    }

    /// Navigates back from a form screen.
    pub fn back(&mut self) -> Option<Screen> {
        let screen = self.router.back()?;
        self.sync_controller();
        Some(screen)
    }

    /// Forwards an input event to the visible form.
    pub fn dispatch(&mut self, event: FormEvent) -> Option<PendingRequest> {
        self.active.as_mut()?.dispatch(event)
    }

    /// Submits the visible form.
    pub fn submit(&mut self) -> Option<PendingRequest> {
        self.dispatch(FormEvent::Submit)
    }

    /// Applies a completion to the visible form and follows a success edge.
    pub fn complete(&mut self, completion: Completion) -> FlowStep {
        let Some(controller) = self.active.as_mut() else {
            debug!("Completion arrived with no active form");
            return FlowStep {
                outcome: CompletionOutcome::Ignored,
                navigated: None,
                message: None,
            };
        };

        let outcome = controller.complete(completion);
        if outcome != CompletionOutcome::Succeeded {
            return FlowStep {
                outcome,
                navigated: None,
                message: None,
            };
        }

        let message = controller.current_state().message.clone();
        controller.message_consumed();

        let nav = match controller.kind() {
            FormKind::SignIn => NavOutcome::SignedIn,
            FormKind::SignUp => NavOutcome::Registered,
            FormKind::PasswordReset => NavOutcome::ResetEmailSent,
        };
        let navigated = self.router.apply(nav).map(|screen| (nav, screen));
        if navigated.is_some() {
            self.sync_controller();
        }

        FlowStep {
            outcome,
            navigated,
            message,
        }
    }

    /// Returns to home after the gateway session was dropped.
    pub fn logged_out(&mut self) -> Option<Screen> {
        let screen = self.router.apply(NavOutcome::LoggedOut)?;
        self.sync_controller();
        Some(screen)
    }

    fn sync_controller(&mut self) {
        if let Some(mut previous) = self.active.take() {
            previous.teardown();
        }

        self.active = FormKind::for_screen(self.router.current()).map(|kind| {
            debug!(%kind, "Creating form controller");
            AuthFlowController::new(kind, Arc::clone(&self.gateway)).with_timeout(self.timeout)
        });
    }
}
