//! Authentication form DTOs.

use std::fmt;

use crate::domain::Screen;

/// Which gateway operation a form drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormKind {
    /// Email + password sign-in.
    SignIn,
    /// Account creation with password confirmation.
    SignUp,
    /// Password reset email dispatch.
    PasswordReset,
}

impl FormKind {
    /// Returns the form hosted by a screen.
    #[must_use]
    pub const fn for_screen(screen: Screen) -> Option<Self> {
        match screen {
            Screen::Login => Some(Self::SignIn),
            Screen::Register => Some(Self::SignUp),
            Screen::Recover => Some(Self::PasswordReset),
            Screen::Home | Screen::Principal => None,
        }
    }

    /// Returns the screen hosting this form.
    #[must_use]
    pub const fn screen(self) -> Screen {
        match self {
            Self::SignIn => Screen::Login,
            Self::SignUp => Screen::Register,
            Self::PasswordReset => Screen::Recover,
        }
    }

    #[must_use]
    pub const fn has_password(self) -> bool {
        !matches!(self, Self::PasswordReset)
    }

    #[must_use]
    pub const fn has_confirmation(self) -> bool {
        matches!(self, Self::SignUp)
    }

    /// Transient message shown after success.
    #[must_use]
    pub const fn success_message(self) -> &'static str {
        match self {
            Self::SignIn => "Signed in successfully",
            Self::SignUp => "Account created. Please sign in.",
            Self::PasswordReset => "Recovery email sent. Check your inbox.",
        }
    }

    /// Error shown when the gateway gives no cause.
    #[must_use]
    pub const fn fallback_error(self) -> &'static str {
        match self {
            Self::SignIn => "Could not sign in",
            Self::SignUp => "Could not create the account",
            Self::PasswordReset => "Could not send the recovery email",
        }
    }

    /// Submit button label.
    #[must_use]
    pub const fn submit_label(self, loading: bool) -> &'static str {
        match (self, loading) {
            (Self::SignIn, false) => "Sign in",
            (Self::SignIn, true) => "Signing in...",
            (Self::SignUp, false) => "Create account",
            (Self::SignUp, true) => "Creating account...",
            (Self::PasswordReset, false) => "Send recovery email",
            (Self::PasswordReset, true) => "Sending...",
        }
    }
}

impl fmt::Display for FormKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::SignIn => "sign-in",
            Self::SignUp => "sign-up",
            Self::PasswordReset => "password-reset",
        };
        f.write_str(name)
    }
}

/// Input events accepted by an auth flow controller.
#[derive(Clone, PartialEq, Eq)]
pub enum FormEvent {
    EmailChanged(String),
    PasswordChanged(String),
    ConfirmChanged(String),
    Submit,
    MessageConsumed,
}

impl fmt::Debug for FormEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmailChanged(email) => f.debug_tuple("EmailChanged").field(email).finish(),
            Self::PasswordChanged(_) => f.write_str("PasswordChanged(***)"),
            Self::ConfirmChanged(_) => f.write_str("ConfirmChanged(***)"),
            Self::Submit => f.write_str("Submit"),
            Self::MessageConsumed => f.write_str("MessageConsumed"),
        }
    }
}

/// Observable form state of one screen.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct AuthUiState {
    pub email: String,
    pub password: String,
    pub confirm: String,
    /// True only while a gateway request is outstanding.
    pub loading: bool,
    pub error: Option<String>,
    /// One-shot notice, cleared once consumed.
    pub message: Option<String>,
    pub success: bool,
}

impl AuthUiState {
    /// Sign-in succeeded.
    #[must_use]
    pub const fn logged_in(&self) -> bool {
        self.success
    }

    /// Account creation succeeded.
    #[must_use]
    pub const fn registered(&self) -> bool {
        self.success
    }

    /// Reset email dispatched.
    #[must_use]
    pub const fn sent(&self) -> bool {
        self.success
    }

    /// Whether the submit affordance should be enabled.
    #[must_use]
    pub const fn can_submit(&self) -> bool {
        !self.loading
    }
}

impl fmt::Debug for AuthUiState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthUiState")
            .field("email", &self.email)
            .field("loading", &self.loading)
            .field("error", &self.error)
            .field("message", &self.message)
            .field("success", &self.success)
            .finish_non_exhaustive()
    }
}
