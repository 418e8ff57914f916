//! Screen graph with a back stack.

use tracing::debug;

use crate::domain::Screen;
use crate::domain::errors::NavigationError;

/// Flow results that move the router.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavOutcome {
    SignedIn,
    Registered,
    ResetEmailSent,
    LoggedOut,
}

impl NavOutcome {
    /// Screen that must be on top for the outcome to apply.
    #[must_use]
    pub const fn source(self) -> Screen {
        match self {
            Self::SignedIn => Screen::Login,
            Self::Registered => Screen::Register,
            Self::ResetEmailSent => Screen::Recover,
            Self::LoggedOut => Screen::Principal,
        }
    }
}

/// Navigation stack rooted at [`Screen::Home`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationRouter {
    stack: Vec<Screen>,
}

impl NavigationRouter {
    /// Creates a router showing the home screen.
    #[must_use]
    pub fn new() -> Self {
        Self {
            stack: vec![Screen::Home],
        }
    }

    /// Creates a router for an already signed-in user.
    #[must_use]
    pub fn signed_in() -> Self {
        Self {
            stack: vec![Screen::Home, Screen::Principal],
        }
    }

    /// Returns the visible screen.
    #[must_use]
    pub fn current(&self) -> Screen {
        self.stack.last().copied().unwrap_or(Screen::Home)
    }

    #[must_use]
    pub fn stack(&self) -> &[Screen] {
        &self.stack
    }

    /// Opens one of the auth forms from home.
    ///
    /// # Errors
    /// Returns error if `target` is not reachable from the current screen.
    pub fn open(&mut self, target: Screen) -> Result<Screen, NavigationError> {
        let from = self.current();
        if from != Screen::Home || !target.is_auth_form() {
            return Err(NavigationError::InvalidTransition { from, to: target });
        }

        debug!(%from, to = %target, "Navigating");
        self.stack.push(target);
        Ok(target)
    }

    /// Pops an auth form back to home. Home and principal ignore back.
    pub fn back(&mut self) -> Option<Screen> {
        let from = self.current();
        if !from.is_auth_form() {
            debug!(%from, "Back ignored");
            return None;
        }

        self.stack.pop();
        let to = self.current();
        debug!(%from, %to, "Navigated back");
        Some(to)
    }

    /// Applies a flow outcome. Outcomes whose source screen is not visible
    /// are ignored, so a repeated success never navigates twice.
    pub fn apply(&mut self, outcome: NavOutcome) -> Option<Screen> {
        let from = self.current();
        if from != outcome.source() {
            debug!(?outcome, %from, "Outcome ignored, source screen not visible");
            return None;
        }

        match outcome {
            NavOutcome::SignedIn => {
                self.stack.pop();
                self.stack.push(Screen::Principal);
            }
            NavOutcome::Registered | NavOutcome::ResetEmailSent => {
                self.pop_to_root();
                self.stack.push(Screen::Login);
            }
            NavOutcome::LoggedOut => self.pop_to_root(),
        }

        let to = self.current();
        debug!(?outcome, %from, %to, "Navigated on outcome");
        Some(to)
    }

    fn pop_to_root(&mut self) {
        self.stack.truncate(1);
    }
}

impl Default for NavigationRouter {
    fn default() -> Self {
        Self::new()
    }
}
