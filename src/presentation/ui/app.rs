//! Main application orchestrator.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::event::{Event, EventStream, KeyEvent};
use futures_util::StreamExt;
use ratatui::layout::{Constraint, Layout};
use ratatui::{DefaultTerminal, Frame};
use tokio::sync::mpsc;
use tokio::time::interval;
use tracing::{debug, error, info, warn};

use crate::application::controllers::{Completion, CompletionOutcome, PendingRequest};
use crate::application::navigation::{AppFlow, NavOutcome};
use crate::application::use_cases::{ReminderUseCase, RestoreSessionUseCase, SessionUseCase};
use crate::domain::Screen;
use crate::domain::entities::{Reminder, ReminderId, Session};
use crate::domain::ports::{IdentityGatewayPort, ReminderStorePort, SessionStoragePort};
use crate::presentation::events::{EventHandler, EventResult};
use crate::presentation::ui::{
    AuthAction, AuthScreen, HomeAction, HomeScreen, PrincipalAction, PrincipalScreen,
};
use crate::presentation::widgets::Snackbar;

const TICK_RATE: Duration = Duration::from_millis(250);

#[derive(Debug)]
enum Action {
    AuthCompleted(Completion),
    RemindersLoaded(Result<Vec<Reminder>, String>),
    ReminderCreated(Result<Reminder, String>),
    ReminderDeleted(Result<ReminderId, String>),
}

enum CurrentScreen {
    Home(HomeScreen),
    Auth(AuthScreen),
    Principal(Box<PrincipalScreen>),
}

/// Runtime options taken from configuration.
#[derive(Debug, Clone, Copy)]
pub struct AppSettings {
    pub request_timeout: Duration,
    pub remember_session: bool,
}

pub struct App {
    flow: AppFlow,
    screen: CurrentScreen,
    gateway: Arc<dyn IdentityGatewayPort>,
    restore_use_case: RestoreSessionUseCase,
    session_use_case: SessionUseCase,
    reminder_store: Arc<dyn ReminderStorePort>,
    /// Session of the user shown on the principal screen.
    signed_in: Option<Session>,
    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,
    snackbar: Option<Snackbar>,
    settings: AppSettings,
    exiting: bool,
}

impl App {
    #[must_use]
    pub fn new(
        gateway: Arc<dyn IdentityGatewayPort>,
        session_storage: Arc<dyn SessionStoragePort>,
        reminder_store: Arc<dyn ReminderStorePort>,
        settings: AppSettings,
    ) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();

        Self {
            flow: AppFlow::new(Arc::clone(&gateway)).with_timeout(settings.request_timeout),
            screen: CurrentScreen::Home(HomeScreen::new()),
            restore_use_case: RestoreSessionUseCase::new(
                Arc::clone(&gateway),
                Arc::clone(&session_storage),
            ),
            session_use_case: SessionUseCase::new(
                Arc::clone(&gateway),
                session_storage,
                settings.remember_session,
            ),
            reminder_store,
            signed_in: None,
            gateway,
            action_tx,
            action_rx,
            snackbar: None,
            settings,
            exiting: false,
        }
    }

    /// # Errors
    /// Returns error if drawing to the terminal fails.
    pub async fn run(mut self, terminal: &mut DefaultTerminal) -> color_eyre::Result<()> {
        self.restore_session().await;
        self.run_event_loop(terminal).await?;

        info!("Application exiting normally");
        Ok(())
    }

    async fn restore_session(&mut self) {
        if !self.settings.remember_session {
            debug!("Session persistence disabled, starting signed out");
            return;
        }

        if let Some(user) = self.restore_use_case.execute().await {
            self.signed_in = self.gateway.current_session();
            self.flow = AppFlow::signed_in(Arc::clone(&self.gateway))
                .with_timeout(self.settings.request_timeout);
            self.snackbar = Some(Snackbar::success(format!("Welcome back, {}", user.email())));
            self.sync_screen();
        }
    }

    async fn run_event_loop(&mut self, terminal: &mut DefaultTerminal) -> color_eyre::Result<()> {
        let mut terminal_events = EventStream::new();
        let mut tick = interval(TICK_RATE);

        terminal.draw(|frame| self.render(frame))?;

        while !self.exiting {
            tokio::select! {
                Some(action) = self.action_rx.recv() => {
                    self.handle_action(action).await;
                }

                Some(Ok(event)) = terminal_events.next() => {
                    if self.handle_terminal_event(event).await == EventResult::Exit {
                        self.exiting = true;
                    }
                }

                _ = tick.tick() => {
                    self.expire_snackbar(Instant::now());
                }
            }

            terminal.draw(|frame| self.render(frame))?;
        }

        Ok(())
    }

    async fn handle_terminal_event(&mut self, event: Event) -> EventResult {
        match event {
            Event::Key(key) => self.handle_key(key).await,
            _ => EventResult::Continue,
        }
    }

    fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();
        match &mut self.screen {
            CurrentScreen::Home(screen) => frame.render_widget(&*screen, area),
            CurrentScreen::Auth(screen) => frame.render_widget(&*screen, area),
            CurrentScreen::Principal(screen) => frame.render_widget(&mut **screen, area),
        }

        if let Some(snackbar) = &self.snackbar {
            let [_, bottom] =
                Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(area);
            frame.render_widget(snackbar, bottom);
        }
    }

    fn expire_snackbar(&mut self, now: Instant) {
        if self.snackbar.as_ref().is_some_and(|s| s.is_expired(now)) {
            self.snackbar = None;
        }
    }

    async fn handle_key(&mut self, key: KeyEvent) -> EventResult {
        if !EventHandler::is_actionable(&key) {
            return EventResult::Continue;
        }
        if EventHandler::is_force_quit_event(&key) {
            return EventResult::Exit;
        }

        match &mut self.screen {
            CurrentScreen::Home(screen) => match screen.handle_key(key) {
                HomeAction::Open(target) => self.open(target),
                HomeAction::Quit => return EventResult::Exit,
                HomeAction::None => {}
            },
            CurrentScreen::Auth(screen) => match screen.handle_key(key) {
                AuthAction::Event(event) => {
                    if let Some(request) = self.flow.dispatch(event) {
                        self.spawn_request(request);
                    }
                    self.sync_form();
                }
                AuthAction::Submit => {
                    if let Some(request) = self.flow.submit() {
                        self.spawn_request(request);
                    }
                    self.sync_form();
                }
                AuthAction::Back => {
                    if self.flow.back().is_some() {
                        self.sync_screen();
                    }
                }
                AuthAction::None => {}
            },
            CurrentScreen::Principal(screen) => match screen.handle_key(key) {
                PrincipalAction::CreateReminder(message) => self.create_reminder(message),
                PrincipalAction::DeleteReminder(id) => self.delete_reminder(id),
                PrincipalAction::Logout => self.logout().await,
                PrincipalAction::Quit => return EventResult::Exit,
                PrincipalAction::None => {}
            },
        }

        EventResult::Continue
    }

    fn open(&mut self, target: Screen) {
        match self.flow.open(target) {
            Ok(screen) => {
                debug!(route = screen.route(), "Opened screen");
                self.sync_screen();
            }
            Err(e) => warn!(error = %e, "Navigation refused"),
        }
    }

    /// Rebuilds the visible screen from the router's top entry.
    fn sync_screen(&mut self) {
        self.screen = match self.flow.current_screen() {
            Screen::Home => CurrentScreen::Home(HomeScreen::new()),
            Screen::Principal => {
                let Some(user) = self.signed_in.as_ref().map(|s| s.user().clone()) else {
                    warn!("Principal screen without a signed-in user, returning home");
                    self.flow.logged_out();
                    self.screen = CurrentScreen::Home(HomeScreen::new());
                    return;
                };
                self.load_reminders();
                CurrentScreen::Principal(Box::new(PrincipalScreen::new(user)))
            }
            Screen::Login | Screen::Register | Screen::Recover => match self.flow.controller() {
                Some(controller) => {
                    CurrentScreen::Auth(AuthScreen::new(controller.kind(), controller.subscribe()))
                }
                None => CurrentScreen::Home(HomeScreen::new()),
            },
        };
    }

    fn sync_form(&mut self) {
        if let CurrentScreen::Auth(screen) = &mut self.screen {
            screen.sync_from_state();
        }
    }

    fn spawn_request(&self, request: PendingRequest) {
        debug!(kind = %request.kind(), "Issuing auth request");
        let tx = self.action_tx.clone();

        tokio::spawn(async move {
            let completion = request.run().await;
            let _ = tx.send(Action::AuthCompleted(completion));
        });
    }

    async fn handle_action(&mut self, action: Action) {
        match action {
            Action::AuthCompleted(completion) => self.handle_completion(completion).await,
            Action::RemindersLoaded(result) => {
                if let CurrentScreen::Principal(screen) = &mut self.screen {
                    match result {
                        Ok(reminders) => screen.set_reminders(reminders),
                        Err(e) => {
                            screen.set_idle();
                            self.snackbar =
                                Some(Snackbar::error(format!("Could not load reminders: {e}")));
                        }
                    }
                }
            }
            Action::ReminderCreated(result) => match result {
                Ok(reminder) => {
                    debug!(id = %reminder.id(), "Reminder saved");
                    if let CurrentScreen::Principal(screen) = &mut self.screen {
                        screen.reminder_saved();
                    }
                    self.snackbar = Some(Snackbar::success("Reminder saved"));
                    self.load_reminders();
                }
                Err(e) => self.reminder_failed(format!("Could not save reminder: {e}")),
            },
            Action::ReminderDeleted(result) => match result {
                Ok(id) => {
                    debug!(%id, "Reminder removed");
                    self.snackbar = Some(Snackbar::success("Reminder deleted"));
                    self.load_reminders();
                }
                Err(e) => self.reminder_failed(format!("Could not delete reminder: {e}")),
            },
        }
    }

    async fn handle_completion(&mut self, completion: Completion) {
        let issued = completion.session.clone();
        let step = self.flow.complete(completion);

        match step.outcome {
            CompletionOutcome::Ignored => {
                debug!("Ignored completion for a form that is no longer active");
                if let Some(late) = issued {
                    self.session_use_case.discard(&late, self.signed_in.as_ref()).await;
                }
            }
            CompletionOutcome::Failed => self.sync_form(),
            CompletionOutcome::Succeeded => {
                if let Some(message) = step.message {
                    self.snackbar = Some(Snackbar::success(message));
                }

                match step.navigated {
                    Some((NavOutcome::SignedIn, _)) => {
                        if let Some(session) = issued {
                            self.session_use_case.adopt(session.clone());
                            self.signed_in = Some(session);
                        }
                        self.session_use_case.persist_current().await;
                    }
                    Some((NavOutcome::Registered, _)) => {
                        // Sign-up leaves the new account signed in; the user
                        // signs in explicitly from the login form.
                        self.gateway.sign_out().await;
                    }
                    _ => {}
                }

                if step.navigated.is_some() {
                    self.sync_screen();
                } else {
                    self.sync_form();
                }
            }
        }
    }

    fn reminder_failed(&mut self, message: String) {
        warn!(%message, "Reminder request failed");
        if let CurrentScreen::Principal(screen) = &mut self.screen {
            screen.set_idle();
        }
        self.snackbar = Some(Snackbar::error(message));
    }

    fn reminders(&self) -> ReminderUseCase {
        ReminderUseCase::new(
            Arc::clone(&self.reminder_store),
            self.signed_in.as_ref().map(|s| s.user().clone()),
        )
    }

    fn load_reminders(&self) {
        let use_case = self.reminders();
        let tx = self.action_tx.clone();

        tokio::spawn(async move {
            let result = use_case.list().await.map_err(|e| e.to_string());
            let _ = tx.send(Action::RemindersLoaded(result));
        });
    }

    fn create_reminder(&self, message: String) {
        let use_case = self.reminders();
        let tx = self.action_tx.clone();

        tokio::spawn(async move {
            let result = use_case.create(&message).await.map_err(|e| e.to_string());
            let _ = tx.send(Action::ReminderCreated(result));
        });
    }

    fn delete_reminder(&self, id: ReminderId) {
        let use_case = self.reminders();
        let tx = self.action_tx.clone();

        tokio::spawn(async move {
            let result = use_case.delete(id).await.map(|()| id).map_err(|e| e.to_string());
            let _ = tx.send(Action::ReminderDeleted(result));
        });
    }

    async fn logout(&mut self) {
        if let Err(e) = self.session_use_case.logout().await {
            error!(error = %e, "Logout left a persisted session behind");
            self.snackbar = Some(Snackbar::error(format!("Signed out, but {e}")));
        } else {
            self.snackbar = Some(Snackbar::success("Signed out"));
        }

        self.signed_in = None;
        self.flow.logged_out();
        self.sync_screen();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::dto::FormKind;
    use crate::domain::ports::mocks::MockSessionStorage;
    use crate::infrastructure::{FileReminderStore, InMemoryIdentityGateway};
    use crossterm::event::{KeyCode, KeyModifiers};
    use tempfile::TempDir;

    struct Harness {
        app: App,
        gateway: Arc<InMemoryIdentityGateway>,
        storage: Arc<MockSessionStorage>,
        _dir: TempDir,
    }

    fn harness(gateway: InMemoryIdentityGateway) -> Harness {
        let dir = tempfile::tempdir().unwrap();
        let gateway = Arc::new(gateway);
        let storage = Arc::new(MockSessionStorage::new());
        let store = Arc::new(FileReminderStore::new(dir.path().join("reminders.toml")));
        let app = App::new(
            gateway.clone(),
            storage.clone(),
            store,
            AppSettings {
                request_timeout: Duration::from_secs(5),
                remember_session: true,
            },
        );
        Harness {
            app,
            gateway,
            storage,
            _dir: dir,
        }
    }

    async fn press(app: &mut App, code: KeyCode) -> EventResult {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE)).await
    }

    async fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c)).await;
        }
    }

    async fn next_action(app: &mut App) {
        let action = app.action_rx.recv().await.unwrap();
        app.handle_action(action).await;
    }

    fn auth_kind(app: &App) -> Option<FormKind> {
        match &app.screen {
            CurrentScreen::Auth(screen) => Some(screen.kind()),
            _ => None,
        }
    }

    #[tokio::test]
    async fn test_app_starts_on_home() {
        let h = harness(InMemoryIdentityGateway::new());

        assert!(matches!(h.app.screen, CurrentScreen::Home(_)));
        assert_eq!(h.app.flow.current_screen(), Screen::Home);
    }

    #[tokio::test]
    async fn test_register_then_land_on_login() {
        let mut h = harness(InMemoryIdentityGateway::new());

        press(&mut h.app, KeyCode::Char('r')).await;
        assert_eq!(auth_kind(&h.app), Some(FormKind::SignUp));

        type_text(&mut h.app, "a@b.com").await;
        press(&mut h.app, KeyCode::Tab).await;
        type_text(&mut h.app, "secret1").await;
        press(&mut h.app, KeyCode::Tab).await;
        type_text(&mut h.app, "secret1").await;
        press(&mut h.app, KeyCode::Enter).await;
        press(&mut h.app, KeyCode::Enter).await;

        next_action(&mut h.app).await;

        assert_eq!(h.gateway.sign_up_calls(), 1);
        assert_eq!(auth_kind(&h.app), Some(FormKind::SignIn));
        assert!(h.gateway.current_user().is_none());
        assert_eq!(
            h.app.snackbar.as_ref().map(Snackbar::message),
            Some(FormKind::SignUp.success_message())
        );
    }

    #[tokio::test]
    async fn test_sign_in_persists_and_logout_clears() {
        let mut h = harness(InMemoryIdentityGateway::new().with_account("a@b.com", "secret1"));

        press(&mut h.app, KeyCode::Enter).await;
        type_text(&mut h.app, "a@b.com").await;
        press(&mut h.app, KeyCode::Tab).await;
        type_text(&mut h.app, "secret1").await;
        press(&mut h.app, KeyCode::Enter).await;
        next_action(&mut h.app).await;

        assert!(matches!(h.app.screen, CurrentScreen::Principal(_)));
        assert!(h.storage.has_session().await.unwrap());

        next_action(&mut h.app).await;
        press(&mut h.app, KeyCode::Char('L')).await;

        assert!(matches!(h.app.screen, CurrentScreen::Home(_)));
        assert!(!h.storage.has_session().await.unwrap());
        assert!(h.gateway.current_user().is_none());
    }

    #[tokio::test]
    async fn test_failed_sign_in_stays_on_form() {
        let mut h = harness(InMemoryIdentityGateway::new());

        press(&mut h.app, KeyCode::Char('l')).await;
        type_text(&mut h.app, "a@b.com").await;
        press(&mut h.app, KeyCode::Tab).await;
        type_text(&mut h.app, "secret1").await;
        press(&mut h.app, KeyCode::Enter).await;
        next_action(&mut h.app).await;

        assert_eq!(auth_kind(&h.app), Some(FormKind::SignIn));
        let error = h.app.flow.controller().unwrap().current_state().error.clone();
        assert!(error.is_some());
    }

    #[tokio::test]
    async fn test_invalid_form_issues_no_request() {
        let mut h = harness(InMemoryIdentityGateway::new());

        press(&mut h.app, KeyCode::Char('l')).await;
        type_text(&mut h.app, "not-an-email").await;
        press(&mut h.app, KeyCode::Enter).await;

        assert_eq!(h.gateway.sign_in_calls(), 0);
        assert!(h.app.action_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_back_from_form_and_quit_from_home() {
        let mut h = harness(InMemoryIdentityGateway::new());

        press(&mut h.app, KeyCode::Char('f')).await;
        assert_eq!(auth_kind(&h.app), Some(FormKind::PasswordReset));

        press(&mut h.app, KeyCode::Esc).await;
        assert!(matches!(h.app.screen, CurrentScreen::Home(_)));

        assert_eq!(press(&mut h.app, KeyCode::Char('q')).await, EventResult::Exit);
    }

    #[tokio::test]
    async fn test_restore_session_opens_principal() {
        let mut h = harness(InMemoryIdentityGateway::new().with_account("a@b.com", "secret1"));
        let session = h.gateway.sign_in("a@b.com", "secret1").await.unwrap();
        h.gateway.sign_out().await;
        h.storage.store_session(&session).await.unwrap();

        h.app.restore_session().await;

        assert!(matches!(h.app.screen, CurrentScreen::Principal(_)));
        assert_eq!(h.app.flow.current_screen(), Screen::Principal);
    }

    fn principal_email(app: &App) -> Option<String> {
        match &app.screen {
            CurrentScreen::Principal(screen) => Some(screen.user().email().to_string()),
            _ => None,
        }
    }

    async fn fill_sign_up(app: &mut App, email: &str) -> PendingRequest {
        press(app, KeyCode::Char('r')).await;
        type_text(app, email).await;
        press(app, KeyCode::Tab).await;
        type_text(app, "secret1").await;
        press(app, KeyCode::Tab).await;
        type_text(app, "secret1").await;
        let request = app.flow.submit().unwrap();
        app.sync_form();
        request
    }

    async fn fill_sign_in(app: &mut App, email: &str) {
        press(app, KeyCode::Char('l')).await;
        type_text(app, email).await;
        press(app, KeyCode::Tab).await;
        type_text(app, "secret1").await;
    }

    #[tokio::test]
    async fn test_late_sign_up_does_not_replace_signed_in_user() {
        let mut h = harness(InMemoryIdentityGateway::new().with_account("b@b.com", "secret1"));

        let abandoned = fill_sign_up(&mut h.app, "new@b.com").await;
        press(&mut h.app, KeyCode::Esc).await;
        fill_sign_in(&mut h.app, "b@b.com").await;
        press(&mut h.app, KeyCode::Enter).await;
        next_action(&mut h.app).await;
        next_action(&mut h.app).await;
        assert_eq!(principal_email(&h.app).as_deref(), Some("b@b.com"));

        h.app.handle_completion(abandoned.run().await).await;

        let current = h.gateway.current_user().unwrap();
        assert_eq!(current.email(), "b@b.com");
        assert_eq!(principal_email(&h.app).as_deref(), Some("b@b.com"));

        let reminder = h.app.reminders().create("Bake bread").await.unwrap();
        assert_eq!(reminder.owner_id(), current.uid());

        press(&mut h.app, KeyCode::Char('L')).await;
        assert!(h.gateway.current_user().is_none());
    }

    #[tokio::test]
    async fn test_sign_in_keeps_its_own_session_when_sign_up_lands_first() {
        let mut h = harness(InMemoryIdentityGateway::new().with_account("b@b.com", "secret1"));

        let abandoned = fill_sign_up(&mut h.app, "new@b.com").await;
        press(&mut h.app, KeyCode::Esc).await;
        fill_sign_in(&mut h.app, "b@b.com").await;
        let sign_in = h.app.flow.submit().unwrap();

        let signed_in = sign_in.run().await;
        let late = abandoned.run().await;
        assert_eq!(h.gateway.current_user().unwrap().email(), "new@b.com");

        h.app.handle_completion(signed_in).await;
        assert_eq!(principal_email(&h.app).as_deref(), Some("b@b.com"));
        assert_eq!(h.gateway.current_user().unwrap().email(), "b@b.com");
        let stored = h.storage.get_session().await.unwrap().unwrap();
        assert_eq!(stored.user().email(), "b@b.com");

        h.app.handle_completion(late).await;
        assert_eq!(h.gateway.current_user().unwrap().email(), "b@b.com");
    }

    #[tokio::test]
    async fn test_late_sign_in_after_leaving_form_is_signed_out() {
        let mut h = harness(InMemoryIdentityGateway::new().with_account("b@b.com", "secret1"));

        fill_sign_in(&mut h.app, "b@b.com").await;
        let abandoned = h.app.flow.submit().unwrap();
        press(&mut h.app, KeyCode::Esc).await;

        h.app.handle_completion(abandoned.run().await).await;

        assert!(matches!(h.app.screen, CurrentScreen::Home(_)));
        assert!(h.gateway.current_user().is_none());
        assert!(!h.storage.has_session().await.unwrap());
    }

    #[test]
    fn test_snackbar_expiry() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = App::new(
            Arc::new(InMemoryIdentityGateway::new()),
            Arc::new(MockSessionStorage::new()),
            Arc::new(FileReminderStore::new(dir.path().join("r.toml"))),
            AppSettings {
                request_timeout: Duration::from_secs(1),
                remember_session: false,
            },
        );
        app.snackbar = Some(Snackbar::success("hi").with_ttl(Duration::ZERO));

        app.expire_snackbar(Instant::now());

        assert!(app.snackbar.is_none());
    }
}
