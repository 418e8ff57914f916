//! In-process identity gateway for offline mode and tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use tracing::{debug, info};

use crate::domain::entities::{Session, SessionToken, UserRef};
use crate::domain::errors::GatewayError;
use crate::domain::ports::IdentityGatewayPort;

const EMAIL_EXISTS: &str = "The email address is already in use by another account.";
const INVALID_CREDENTIALS: &str = "The supplied auth credential is incorrect, malformed or has expired.";
const EMAIL_NOT_FOUND: &str =
    "There is no user record corresponding to this identifier. The user may have been deleted.";
const SESSION_EXPIRED: &str = "The session has expired. Please sign in again.";

struct Account {
    uid: String,
    password: String,
}

/// Account directory kept in memory. Nothing survives the process.
pub struct InMemoryIdentityGateway {
    accounts: Mutex<HashMap<String, Account>>,
    current: RwLock<Option<Session>>,
    latency: Option<Duration>,
    next_uid: AtomicU64,
    sign_in_calls: AtomicUsize,
    sign_up_calls: AtomicUsize,
    reset_calls: AtomicUsize,
}

impl InMemoryIdentityGateway {
    #[must_use]
    pub fn new() -> Self {
        Self {
            accounts: Mutex::new(HashMap::new()),
            current: RwLock::new(None),
            latency: None,
            next_uid: AtomicU64::new(1),
            sign_in_calls: AtomicUsize::new(0),
            sign_up_calls: AtomicUsize::new(0),
            reset_calls: AtomicUsize::new(0),
        }
    }

    /// Delays every request, to make the loading state observable.
    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Seeds an account.
    #[must_use]
    pub fn with_account(self, email: &str, password: &str) -> Self {
        self.insert_account(email, password);
        self
    }

    pub fn sign_in_calls(&self) -> usize {
        self.sign_in_calls.load(Ordering::SeqCst)
    }

    pub fn sign_up_calls(&self) -> usize {
        self.sign_up_calls.load(Ordering::SeqCst)
    }

    pub fn reset_calls(&self) -> usize {
        self.reset_calls.load(Ordering::SeqCst)
    }

    fn insert_account(&self, email: &str, password: &str) -> String {
        let uid = format!("local-{}", self.next_uid.fetch_add(1, Ordering::SeqCst));
        self.accounts.lock().insert(
            normalize(email),
            Account {
                uid: uid.clone(),
                password: password.to_string(),
            },
        );
        uid
    }

    async fn simulate_latency(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }

    fn start_session(&self, uid: &str, email: &str) -> Session {
        let session = Session::new(
            UserRef::new(uid, email),
            SessionToken::new(format!("offline-id-{uid}")),
            SessionToken::new(format!("offline-refresh-{uid}")),
        );
        *self.current.write() = Some(session.clone());
        session
    }
}

impl Default for InMemoryIdentityGateway {
    fn default() -> Self {
        Self::new()
    }
}

fn normalize(email: &str) -> String {
    email.trim().to_lowercase()
}

#[async_trait]
impl IdentityGatewayPort for InMemoryIdentityGateway {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, GatewayError> {
        self.sign_in_calls.fetch_add(1, Ordering::SeqCst);
        self.simulate_latency().await;

        let uid = {
            let accounts = self.accounts.lock();
            match accounts.get(&normalize(email)) {
                Some(account) if account.password == password => account.uid.clone(),
                _ => return Err(GatewayError::rejected(INVALID_CREDENTIALS)),
            }
        };

        info!(%uid, "Signed in offline");
        Ok(self.start_session(&uid, email))
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<Session, GatewayError> {
        self.sign_up_calls.fetch_add(1, Ordering::SeqCst);
        self.simulate_latency().await;

        if self.accounts.lock().contains_key(&normalize(email)) {
            return Err(GatewayError::rejected(EMAIL_EXISTS));
        }

        let uid = self.insert_account(email, password);
        info!(%uid, "Account created offline");
        Ok(self.start_session(&uid, email))
    }

    async fn send_password_reset(&self, email: &str) -> Result<(), GatewayError> {
        self.reset_calls.fetch_add(1, Ordering::SeqCst);
        self.simulate_latency().await;

        if !self.accounts.lock().contains_key(&normalize(email)) {
            return Err(GatewayError::rejected(EMAIL_NOT_FOUND));
        }

        debug!("Offline mode, password reset email not delivered");
        Ok(())
    }

    async fn refresh(&self, session: &Session) -> Result<Session, GatewayError> {
        self.simulate_latency().await;

        let known = self
            .accounts
            .lock()
            .values()
            .any(|account| account.uid == session.user().uid());
        if !known {
            return Err(GatewayError::rejected(SESSION_EXPIRED));
        }

        Ok(self.start_session(session.user().uid(), session.user().email()))
    }

    async fn sign_out(&self) {
        *self.current.write() = None;
    }

    fn adopt(&self, session: Session) {
        debug!(uid = %session.user().uid(), "Adopting session");
        *self.current.write() = Some(session);
    }

    fn current_session(&self) -> Option<Session> {
        self.current.read().clone()
    }
}
