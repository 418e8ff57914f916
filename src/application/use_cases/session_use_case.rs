//! Session persistence and sign-out.

use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::entities::{Session, UserRef};
use crate::domain::errors::StoreError;
use crate::domain::ports::{IdentityGatewayPort, SessionStoragePort};

/// Keeps the persisted session in step with the gateway's.
#[derive(Clone)]
pub struct SessionUseCase {
    gateway: Arc<dyn IdentityGatewayPort>,
    storage: Arc<dyn SessionStoragePort>,
    remember: bool,
}

impl SessionUseCase {
    #[must_use]
    pub const fn new(
        gateway: Arc<dyn IdentityGatewayPort>,
        storage: Arc<dyn SessionStoragePort>,
        remember: bool,
    ) -> Self {
        Self {
            gateway,
            storage,
            remember,
        }
    }

    #[must_use]
    pub fn current_user(&self) -> Option<UserRef> {
        self.gateway.current_user()
    }

    /// Makes a session issued by a completed sign-in the gateway's current one.
    pub fn adopt(&self, session: Session) {
        self.gateway.adopt(session);
    }

    /// Reverts the gateway after a sign-in or sign-up whose completion was
    /// dropped. The gateway made `late` current when the request finished;
    /// `displayed` is put back, or the gateway is signed out when nobody is
    /// shown as signed in.
    pub async fn discard(&self, late: &Session, displayed: Option<&Session>) {
        if self.gateway.current_user().as_ref() != Some(late.user()) {
            debug!("Dropped session is no longer current");
            return;
        }

        match displayed {
            Some(session) if session.user() == late.user() => {}
            Some(session) => {
                info!(user = %session.user().email(), "Restoring session after a dropped request");
                self.gateway.adopt(session.clone());
            }
            None => {
                info!(user = %late.user().email(), "Signing out session of a dropped request");
                self.gateway.sign_out().await;
            }
        }
    }

    /// Persists the gateway's current session. Returns whether it was stored.
    pub async fn persist_current(&self) -> bool {
        if !self.remember {
            debug!("Session persistence disabled, skipping storage");
            return false;
        }

        let Some(session) = self.gateway.current_session() else {
            debug!("No current session to persist");
            return false;
        };

        match self.storage.store_session(&session).await {
            Ok(()) => {
                info!("Session persisted to secure storage");
                true
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to persist session");
                false
            }
        }
    }

    /// Signs out and forgets the persisted session.
    ///
    /// # Errors
    /// Returns error if the persisted session cannot be deleted. The gateway
    /// session is dropped regardless.
    pub async fn logout(&self) -> Result<(), StoreError> {
        let user = self.gateway.current_user();
        self.gateway.sign_out().await;

        self.storage.delete_session().await.inspect_err(|e| {
            tracing::error!(error = %e, "Failed to delete persisted session");
        })?;

        info!(user = ?user.as_ref().map(UserRef::email), "Signed out");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::SessionToken;
    use crate::domain::ports::mocks::{MockIdentityGateway, MockSessionStorage};

    fn session(uid: &str, email: &str) -> Session {
        Session::new(
            UserRef::new(uid, email),
            SessionToken::new(format!("{uid}-id")),
            SessionToken::new(format!("{uid}-refresh")),
        )
    }

    async fn signed_in_gateway() -> Arc<MockIdentityGateway> {
        let gateway = Arc::new(MockIdentityGateway::new(true));
        gateway.sign_in("a@b.com", "secret1").await.unwrap();
        gateway
    }

    #[tokio::test]
    async fn test_persist_current_session() {
        let gateway = signed_in_gateway().await;
        let storage = Arc::new(MockSessionStorage::new());
        let use_case = SessionUseCase::new(gateway, storage.clone(), true);

        assert!(use_case.persist_current().await);
        assert!(storage.has_session().await.unwrap());
    }

    #[tokio::test]
    async fn test_persistence_disabled() {
        let gateway = signed_in_gateway().await;
        let storage = Arc::new(MockSessionStorage::new());
        let use_case = SessionUseCase::new(gateway, storage.clone(), false);

        assert!(!use_case.persist_current().await);
        assert!(!storage.has_session().await.unwrap());
    }

    #[tokio::test]
    async fn test_logout_clears_gateway_and_storage() {
        let gateway = signed_in_gateway().await;
        let storage = Arc::new(MockSessionStorage::new());
        let use_case = SessionUseCase::new(gateway.clone(), storage.clone(), true);
        use_case.persist_current().await;

        use_case.logout().await.unwrap();

        assert!(gateway.current_user().is_none());
        assert!(use_case.current_user().is_none());
        assert!(!storage.has_session().await.unwrap());
    }

    #[tokio::test]
    async fn test_discard_restores_displayed_session() {
        let gateway = Arc::new(MockIdentityGateway::new(true));
        let use_case =
            SessionUseCase::new(gateway.clone(), Arc::new(MockSessionStorage::new()), true);
        let displayed = session("uid-b", "b@b.com");
        let late = session("uid-new", "new@b.com");
        gateway.adopt(late.clone());

        use_case.discard(&late, Some(&displayed)).await;

        assert_eq!(gateway.current_user().as_ref(), Some(displayed.user()));
    }

    #[tokio::test]
    async fn test_discard_signs_out_when_nobody_is_shown() {
        let gateway = Arc::new(MockIdentityGateway::new(true));
        let use_case =
            SessionUseCase::new(gateway.clone(), Arc::new(MockSessionStorage::new()), true);
        let late = session("uid-new", "new@b.com");
        gateway.adopt(late.clone());

        use_case.discard(&late, None).await;

        assert!(gateway.current_user().is_none());
    }

    #[tokio::test]
    async fn test_discard_leaves_newer_session_alone() {
        let gateway = Arc::new(MockIdentityGateway::new(true));
        let use_case =
            SessionUseCase::new(gateway.clone(), Arc::new(MockSessionStorage::new()), true);
        let late = session("uid-new", "new@b.com");
        let newer = session("uid-c", "c@b.com");
        gateway.adopt(newer.clone());

        use_case.discard(&late, None).await;

        assert_eq!(gateway.current_user().as_ref(), Some(newer.user()));
    }
}
