//! Identity gateway port definition.

use async_trait::async_trait;

use crate::domain::entities::{Session, UserRef};
use crate::domain::errors::GatewayError;

/// Port for the remote identity provider.
#[async_trait]
pub trait IdentityGatewayPort: Send + Sync {
    /// Signs in with email and password, making the session current.
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, GatewayError>;

    /// Creates an account, making its session current.
    async fn sign_up(&self, email: &str, password: &str) -> Result<Session, GatewayError>;

    /// Dispatches a password reset email.
    async fn send_password_reset(&self, email: &str) -> Result<(), GatewayError>;

    /// Exchanges a persisted session for fresh tokens, making it current.
    async fn refresh(&self, session: &Session) -> Result<Session, GatewayError>;

    /// Drops the current session.
    async fn sign_out(&self);

    /// Makes an already issued session current without contacting the
    /// provider.
    fn adopt(&self, session: Session);

    /// Returns the signed-in user, if any.
    fn current_user(&self) -> Option<UserRef> {
        self.current_session().map(|s| s.user().clone())
    }

    /// Returns the current session, if any.
    fn current_session(&self) -> Option<Session>;
}
