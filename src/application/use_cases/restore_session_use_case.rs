//! Session restore use case.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::entities::UserRef;
use crate::domain::ports::{IdentityGatewayPort, SessionStoragePort};

/// Resumes a persisted session at startup.
pub struct RestoreSessionUseCase {
    gateway: Arc<dyn IdentityGatewayPort>,
    storage: Arc<dyn SessionStoragePort>,
}

impl RestoreSessionUseCase {
    /// Creates new use case.
    #[must_use]
    pub const fn new(
        gateway: Arc<dyn IdentityGatewayPort>,
        storage: Arc<dyn SessionStoragePort>,
    ) -> Self {
        Self { gateway, storage }
    }

    /// Refreshes the stored session, returning the signed-in user on success.
    ///
    /// A session the provider rejects is deleted; network failures keep it
    /// for the next launch.
    pub async fn execute(&self) -> Option<UserRef> {
        let stored = match self.storage.get_session().await {
            Ok(Some(session)) => session,
            Ok(None) => {
                debug!("No persisted session");
                return None;
            }
            Err(e) => {
                debug!(error = %e, "Failed to read persisted session");
                return None;
            }
        };

        debug!(user = %stored.user().email(), "Refreshing persisted session");

        match self.gateway.refresh(&stored).await {
            Ok(fresh) => {
                if let Err(e) = self.storage.store_session(&fresh).await {
                    warn!(error = %e, "Failed to persist refreshed session");
                }
                info!(user = %fresh.user().email(), "Session restored");
                Some(fresh.user().clone())
            }
            Err(e) if e.is_network_error() => {
                warn!(error = %e, "Could not reach identity provider, keeping stored session");
                None
            }
            Err(e) => {
                warn!(error = %e, "Persisted session rejected, discarding it");
                if let Err(e) = self.storage.delete_session().await {
                    tracing::error!(error = %e, "Failed to delete rejected session");
                }
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{Session, SessionToken};
    use crate::domain::errors::GatewayError;
    use crate::domain::ports::mocks::{MockIdentityGateway, MockSessionStorage};

    fn stored_session() -> Session {
        Session::new(
            UserRef::new("mock-uid", "a@b.com"),
            SessionToken::new("old-id"),
            SessionToken::new("old-refresh"),
        )
    }

    #[tokio::test]
    async fn test_restores_and_rotates_session() {
        let gateway = Arc::new(MockIdentityGateway::new(true));
        let storage = Arc::new(MockSessionStorage::with_session(stored_session()));
        let use_case = RestoreSessionUseCase::new(gateway.clone(), storage.clone());

        let user = use_case.execute().await;

        assert_eq!(user.map(|u| u.email().to_string()).as_deref(), Some("a@b.com"));
        assert_eq!(gateway.refresh_calls(), 1);
        let persisted = storage.get_session().await.unwrap().unwrap();
        assert_eq!(persisted.refresh_token().as_str(), "mock-refresh-token");
    }

    #[tokio::test]
    async fn test_no_stored_session() {
        let gateway = Arc::new(MockIdentityGateway::new(true));
        let storage = Arc::new(MockSessionStorage::new());
        let use_case = RestoreSessionUseCase::new(gateway.clone(), storage);

        assert!(use_case.execute().await.is_none());
        assert_eq!(gateway.refresh_calls(), 0);
    }

    #[tokio::test]
    async fn test_rejected_session_is_deleted() {
        let gateway = Arc::new(
            MockIdentityGateway::new(false).failing_with(GatewayError::rejected("TOKEN_EXPIRED")),
        );
        let storage = Arc::new(MockSessionStorage::with_session(stored_session()));
        let use_case = RestoreSessionUseCase::new(gateway, storage.clone());

        assert!(use_case.execute().await.is_none());
        assert!(!storage.has_session().await.unwrap());
    }

    #[tokio::test]
    async fn test_network_failure_keeps_session() {
        let gateway = Arc::new(
            MockIdentityGateway::new(false).failing_with(GatewayError::network("offline")),
        );
        let storage = Arc::new(MockSessionStorage::with_session(stored_session()));
        let use_case = RestoreSessionUseCase::new(gateway, storage.clone());

        assert!(use_case.execute().await.is_none());
        assert!(storage.has_session().await.unwrap());
    }
}
