//! End-to-end flows through the public API with the in-process gateway.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio_test::{assert_err, assert_ok};

use bakery::application::controllers::CompletionOutcome;
use bakery::application::dto::FormEvent;
use bakery::application::navigation::{AppFlow, NavOutcome};
use bakery::application::use_cases::{ReminderUseCase, RestoreSessionUseCase, SessionUseCase};
use bakery::domain::Screen;
use bakery::domain::entities::Session;
use bakery::domain::errors::{ReminderError, StoreError};
use bakery::domain::ports::{IdentityGatewayPort, SessionStoragePort};
use bakery::infrastructure::{FileReminderStore, InMemoryIdentityGateway};

#[derive(Default)]
struct MemorySessionStorage {
    session: Mutex<Option<Session>>,
}

#[async_trait]
impl SessionStoragePort for MemorySessionStorage {
    async fn get_session(&self) -> Result<Option<Session>, StoreError> {
        Ok(self.session.lock().clone())
    }

    async fn store_session(&self, session: &Session) -> Result<(), StoreError> {
        *self.session.lock() = Some(session.clone());
        Ok(())
    }

    async fn delete_session(&self) -> Result<(), StoreError> {
        *self.session.lock() = None;
        Ok(())
    }
}

fn fill(flow: &mut AppFlow, email: &str, password: &str, confirm: Option<&str>) {
    assert!(flow.dispatch(FormEvent::EmailChanged(email.into())).is_none());
    assert!(flow.dispatch(FormEvent::PasswordChanged(password.into())).is_none());
    if let Some(confirm) = confirm {
        assert!(flow.dispatch(FormEvent::ConfirmChanged(confirm.into())).is_none());
    }
}

#[tokio::test]
async fn test_register_lands_on_login_then_back_to_home() {
    let gateway = Arc::new(InMemoryIdentityGateway::new());
    let mut flow = AppFlow::new(gateway.clone());

    assert_ok!(flow.open(Screen::Register));
    fill(&mut flow, "a@b.com", "secret1", Some("secret1"));

    let request = flow.submit().expect("valid form issues a request");
    assert!(flow.submit().is_none(), "second submit while loading is ignored");

    let step = flow.complete(request.run().await);

    assert_eq!(step.outcome, CompletionOutcome::Succeeded);
    assert_eq!(step.navigated, Some((NavOutcome::Registered, Screen::Login)));
    assert_eq!(step.message.as_deref(), Some("Account created. Please sign in."));
    assert_eq!(gateway.sign_up_calls(), 1);
    assert_eq!(flow.router().stack(), [Screen::Home, Screen::Login]);

    assert_eq!(flow.back(), Some(Screen::Home));
    assert_eq!(flow.router().stack(), [Screen::Home]);
}

#[tokio::test]
async fn test_mismatched_confirmation_never_reaches_the_gateway() {
    let gateway = Arc::new(InMemoryIdentityGateway::new());
    let mut flow = AppFlow::new(gateway.clone());

    assert_ok!(flow.open(Screen::Register));
    fill(&mut flow, "a@b.com", "secret1", Some("secret2"));

    assert!(flow.submit().is_none());
    let state = flow.controller().expect("form is active").current_state();
    assert_eq!(state.error.as_deref(), Some("Passwords do not match"));
    assert_eq!(gateway.sign_up_calls(), 0);
}

#[tokio::test]
async fn test_sign_in_reminders_and_logout() {
    let dir = tempfile::tempdir().unwrap();
    let gateway = Arc::new(InMemoryIdentityGateway::new().with_account("a@b.com", "secret1"));
    let storage = Arc::new(MemorySessionStorage::default());
    let session = SessionUseCase::new(gateway.clone(), storage.clone(), true);
    let store = Arc::new(FileReminderStore::new(dir.path().join("reminders.toml")));
    let mut flow = AppFlow::new(gateway.clone());

    assert_ok!(flow.open(Screen::Login));
    fill(&mut flow, "a@b.com", "secret1", None);
    let request = flow.submit().expect("valid form issues a request");
    let step = flow.complete(request.run().await);

    assert_eq!(step.navigated, Some((NavOutcome::SignedIn, Screen::Principal)));
    assert!(flow.controller().is_none());
    assert!(session.persist_current().await);

    let reminders = ReminderUseCase::new(store.clone(), session.current_user());
    assert_ok!(reminders.create("Order the sourdough").await);
    assert_ok!(reminders.create("Pick up croissants").await);
    let listed = reminders.list().await.unwrap();
    assert_eq!(listed[0].message(), "Pick up croissants");
    assert_eq!(flow.back(), None, "back on the principal screen is a no-op");

    assert_ok!(session.logout().await);
    assert_eq!(flow.logged_out(), Some(Screen::Home));
    assert!(storage.get_session().await.unwrap().is_none());
    let signed_out = ReminderUseCase::new(store, session.current_user());
    assert!(matches!(
        assert_err!(signed_out.list().await),
        ReminderError::NotSignedIn
    ));
}

#[tokio::test]
async fn test_restore_resumes_a_persisted_session() {
    let gateway = Arc::new(InMemoryIdentityGateway::new().with_account("a@b.com", "secret1"));
    let storage = Arc::new(MemorySessionStorage::default());
    let persisted = gateway.sign_in("a@b.com", "secret1").await.unwrap();
    storage.store_session(&persisted).await.unwrap();
    gateway.sign_out().await;

    let user = RestoreSessionUseCase::new(gateway.clone(), storage)
        .execute()
        .await
        .expect("session restored");

    assert_eq!(user.email(), "a@b.com");
    assert_eq!(gateway.current_user(), Some(user));
}

#[tokio::test(start_paused = true)]
async fn test_leaving_a_form_drops_its_late_completion() {
    let gateway = Arc::new(
        InMemoryIdentityGateway::new()
            .with_account("a@b.com", "secret1")
            .with_latency(Duration::from_secs(3)),
    );
    let mut flow = AppFlow::new(gateway.clone()).with_timeout(Duration::from_secs(10));

    assert_ok!(flow.open(Screen::Recover));
    assert!(flow.dispatch(FormEvent::EmailChanged("a@b.com".into())).is_none());
    let request = flow.submit().expect("valid form issues a request");

    assert_eq!(flow.back(), Some(Screen::Home));
    assert_ok!(flow.open(Screen::Recover));

    let step = flow.complete(request.run().await);

    assert_eq!(step.outcome, CompletionOutcome::Ignored);
    assert_eq!(step.navigated, None);
    assert_eq!(flow.current_screen(), Screen::Recover);
    assert!(!flow.controller().unwrap().current_state().loading);
}

#[tokio::test]
async fn test_abandoned_sign_up_does_not_take_over_the_signed_in_account() {
    let dir = tempfile::tempdir().unwrap();
    let gateway = Arc::new(InMemoryIdentityGateway::new().with_account("b@b.com", "secret1"));
    let session = SessionUseCase::new(
        gateway.clone(),
        Arc::new(MemorySessionStorage::default()),
        true,
    );
    let store = Arc::new(FileReminderStore::new(dir.path().join("reminders.toml")));
    let mut flow = AppFlow::new(gateway.clone());

    assert_ok!(flow.open(Screen::Register));
    fill(&mut flow, "new@b.com", "secret1", Some("secret1"));
    let abandoned = flow.submit().expect("valid form issues a request");
    assert_eq!(flow.back(), Some(Screen::Home));

    assert_ok!(flow.open(Screen::Login));
    fill(&mut flow, "b@b.com", "secret1", None);
    let request = flow.submit().expect("valid form issues a request");
    let completion = request.run().await;
    let signed_in = completion.session.clone().expect("sign-in issues a session");
    let step = flow.complete(completion);
    assert_eq!(step.navigated, Some((NavOutcome::SignedIn, Screen::Principal)));
    session.adopt(signed_in.clone());

    let late = abandoned.run().await;
    let late_session = late.session.clone().expect("sign-up issues a session");
    assert_eq!(flow.complete(late).outcome, CompletionOutcome::Ignored);
    assert_eq!(gateway.sign_up_calls(), 1);

    session.discard(&late_session, Some(&signed_in)).await;

    assert_eq!(session.current_user().as_ref(), Some(signed_in.user()));
    let reminders = ReminderUseCase::new(store, Some(signed_in.user().clone()));
    let reminder = reminders.create("Order the sourdough").await.unwrap();
    assert_eq!(reminder.owner_id(), signed_in.user().uid());

    assert_ok!(session.logout().await);
    assert!(gateway.current_user().is_none());
}

#[tokio::test(start_paused = true)]
async fn test_slow_gateway_times_out_with_a_readable_error() {
    let gateway = Arc::new(
        InMemoryIdentityGateway::new()
            .with_account("a@b.com", "secret1")
            .with_latency(Duration::from_secs(60)),
    );
    let mut flow = AppFlow::new(gateway).with_timeout(Duration::from_secs(5));

    assert_ok!(flow.open(Screen::Login));
    fill(&mut flow, "a@b.com", "secret1", None);
    let request = flow.submit().expect("valid form issues a request");

    let step = flow.complete(request.run().await);

    assert_eq!(step.outcome, CompletionOutcome::Failed);
    let state = flow.controller().unwrap().current_state();
    assert!(!state.loading);
    assert_eq!(state.error.as_deref(), Some("Request timed out. Please try again."));
}
