//! Form credentials value object.

use std::fmt;

use zeroize::Zeroize;

/// Email/password pair captured by an authentication form.
///
/// Secrets are wiped when the value is dropped.
#[derive(Clone, Default, PartialEq, Eq, Zeroize)]
pub struct Credentials {
    email: String,
    password: String,
    confirm: Option<String>,
}

impl Credentials {
    /// Creates credentials without a confirmation field.
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            confirm: None,
        }
    }

    /// Creates credentials for an email-only form.
    #[must_use]
    pub fn email_only(email: impl Into<String>) -> Self {
        Self::new(email, String::new())
    }

    /// Attaches a password confirmation.
    #[must_use]
    pub fn with_confirmation(mut self, confirm: impl Into<String>) -> Self {
        self.confirm = Some(confirm.into());
        self
    }

    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }

    #[must_use]
    pub fn confirm(&self) -> Option<&str> {
        self.confirm.as_deref()
    }
}

impl Drop for Credentials {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"***")
            .field("confirm", &self.confirm.as_ref().map(|_| "***"))
            .finish()
    }
}
