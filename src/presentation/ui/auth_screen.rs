//! Auth form screen shared by sign-in, sign-up and password recovery.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};
use tokio::sync::watch;

use crate::application::dto::{AuthUiState, FormEvent, FormKind};
use crate::presentation::widgets::TextInput;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Email,
    Password,
    Confirm,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthAction {
    None,
    /// Field edit to forward to the controller.
    Event(FormEvent),
    Submit,
    Back,
}

/// Form UI. Renders whatever the controller publishes on its state channel.
pub struct AuthScreen {
    kind: FormKind,
    state: watch::Receiver<AuthUiState>,
    email: TextInput,
    password: TextInput,
    confirm: TextInput,
    focus: Field,
}

impl AuthScreen {
    #[must_use]
    pub fn new(kind: FormKind, state: watch::Receiver<AuthUiState>) -> Self {
        let mut email = TextInput::new(" Email ").placeholder("you@example.com");
        email.set_focused(true);

        let mut screen = Self {
            kind,
            state,
            email,
            password: TextInput::new(" Password ")
                .password()
                .placeholder("At least 6 characters"),
            confirm: TextInput::new(" Confirm password ")
                .password()
                .placeholder("Repeat the password"),
            focus: Field::Email,
        };
        screen.sync_from_state();
        screen
    }

    #[must_use]
    pub const fn kind(&self) -> FormKind {
        self.kind
    }

    fn fields(&self) -> Vec<Field> {
        let mut fields = vec![Field::Email];
        if self.kind.has_password() {
            fields.push(Field::Password);
        }
        if self.kind.has_confirmation() {
            fields.push(Field::Confirm);
        }
        fields
    }

    fn input_mut(&mut self, field: Field) -> &mut TextInput {
        match field {
            Field::Email => &mut self.email,
            Field::Password => &mut self.password,
            Field::Confirm => &mut self.confirm,
        }
    }

    fn move_focus(&mut self, forward: bool) {
        let fields = self.fields();
        let index = fields.iter().position(|f| *f == self.focus).unwrap_or(0);
        let next = if forward {
            (index + 1) % fields.len()
        } else {
            index.checked_sub(1).unwrap_or(fields.len() - 1)
        };

        self.input_mut(self.focus).set_focused(false);
        self.focus = fields[next];
        self.input_mut(self.focus).set_focused(true);
    }

    /// Mirrors controller-owned values (cleared passwords, loading) into the
    /// inputs.
    pub fn sync_from_state(&mut self) {
        let state = self.state.borrow_and_update().clone();
        let loading = state.loading;

        if self.password.value() != state.password {
            self.password.set_value(state.password);
        }
        if self.confirm.value() != state.confirm {
            self.confirm.set_value(state.confirm);
        }
        if self.email.value() != state.email {
            self.email.set_value(state.email);
        }
        for input in [&mut self.email, &mut self.password, &mut self.confirm] {
            input.set_disabled(loading);
        }
    }

    /// Handles key event, returns action.
    pub fn handle_key(&mut self, key: KeyEvent) -> AuthAction {
        match key.code {
            KeyCode::Esc => return AuthAction::Back,
            KeyCode::Enter => return AuthAction::Submit,
            KeyCode::Tab | KeyCode::Down => {
                self.move_focus(true);
                return AuthAction::None;
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.move_focus(false);
                return AuthAction::None;
            }
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return AuthAction::None;
            }
            _ => {}
        }

        let focus = self.focus;
        let input = self.input_mut(focus);
        if !input.handle_key(&key) {
            return AuthAction::None;
        }

        let value = input.value().to_string();
        AuthAction::Event(match focus {
            Field::Email => FormEvent::EmailChanged(value),
            Field::Password => FormEvent::PasswordChanged(value),
            Field::Confirm => FormEvent::ConfirmChanged(value),
        })
    }

    fn render_inner(&self, area: Rect, buf: &mut Buffer) {
        let state = self.state.borrow();
        let fields = self.fields();
        #[allow(clippy::cast_possible_truncation)]
        let form_height = 3 * fields.len() as u16 + 7;

        let [_, center, _] = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(form_height),
            Constraint::Fill(1),
        ])
        .areas(area);
        let [_, content_area, _] = Layout::horizontal([
            Constraint::Fill(1),
            Constraint::Min(50),
            Constraint::Fill(1),
        ])
        .areas(center);

        Clear.render(content_area, buf);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow))
            .title(format!(" {} ", self.kind.screen().title()));
        let inner = block.inner(content_area);
        block.render(content_area, buf);

        let mut constraints = vec![Constraint::Length(1), Constraint::Length(1)];
        constraints.extend(fields.iter().map(|_| Constraint::Length(3)));
        constraints.extend([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Fill(1),
        ]);
        let areas = Layout::vertical(constraints).split(inner);

        let intro = match self.kind {
            FormKind::SignIn => "Sign in with your email and password",
            FormKind::SignUp => "Create an account to order online",
            FormKind::PasswordReset => "We will email you a link to reset your password",
        };
        Paragraph::new(intro)
            .style(Style::default().fg(Color::White))
            .render(areas[0], buf);

        for (offset, field) in fields.iter().enumerate() {
            let input = match field {
                Field::Email => &self.email,
                Field::Password => &self.password,
                Field::Confirm => &self.confirm,
            };
            input.render(areas[2 + offset], buf);
        }

        let button_style = if state.can_submit() {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC)
        };
        let next = 2 + fields.len();
        Paragraph::new(Line::from(Span::styled(
            format!("[ {} ]", self.kind.submit_label(state.loading)),
            button_style,
        )))
        .centered()
        .render(areas[next + 1], buf);

        let status = match &state.error {
            Some(error) => Line::from(Span::styled(
                format!("Error: {error}"),
                Style::default().fg(Color::Red),
            )),
            None => Line::from(vec![
                Span::styled("Enter: Submit", Style::default().fg(Color::DarkGray)),
                Span::raw(" | "),
                Span::styled("Tab: Next field", Style::default().fg(Color::DarkGray)),
                Span::raw(" | "),
                Span::styled("Esc: Back", Style::default().fg(Color::DarkGray)),
            ]),
        };
        Paragraph::new(status).render(areas[next + 2], buf);
    }
}

impl Widget for &AuthScreen {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.render_inner(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn screen(kind: FormKind) -> (watch::Sender<AuthUiState>, AuthScreen) {
        let (tx, rx) = watch::channel(AuthUiState::default());
        (tx, AuthScreen::new(kind, rx))
    }

    #[test]
    fn test_typing_emits_field_events() {
        let (_tx, mut screen) = screen(FormKind::SignIn);

        assert_eq!(
            screen.handle_key(key(KeyCode::Char('a'))),
            AuthAction::Event(FormEvent::EmailChanged("a".into()))
        );

        screen.handle_key(key(KeyCode::Tab));
        assert_eq!(
            screen.handle_key(key(KeyCode::Char('s'))),
            AuthAction::Event(FormEvent::PasswordChanged("s".into()))
        );
    }

    #[test]
    fn test_focus_skips_missing_fields() {
        let (_tx, mut screen) = screen(FormKind::PasswordReset);

        screen.handle_key(key(KeyCode::Tab));
        assert_eq!(
            screen.handle_key(key(KeyCode::Char('x'))),
            AuthAction::Event(FormEvent::EmailChanged("x".into()))
        );
    }

    #[test]
    fn test_confirm_field_on_sign_up() {
        let (_tx, mut screen) = screen(FormKind::SignUp);

        screen.handle_key(key(KeyCode::BackTab));
        assert_eq!(
            screen.handle_key(key(KeyCode::Char('z'))),
            AuthAction::Event(FormEvent::ConfirmChanged("z".into()))
        );
    }

    #[test]
    fn test_enter_and_escape() {
        let (_tx, mut screen) = screen(FormKind::SignIn);

        assert_eq!(screen.handle_key(key(KeyCode::Enter)), AuthAction::Submit);
        assert_eq!(screen.handle_key(key(KeyCode::Esc)), AuthAction::Back);
    }

    #[test]
    fn test_loading_disables_inputs() {
        let (tx, mut screen) = screen(FormKind::SignIn);
        tx.send_replace(AuthUiState {
            email: "a@b.com".into(),
            loading: true,
            ..AuthUiState::default()
        });

        screen.sync_from_state();

        assert_eq!(screen.email.value(), "a@b.com");
        assert_eq!(screen.handle_key(key(KeyCode::Char('x'))), AuthAction::None);
    }

    #[test]
    fn test_cleared_password_is_mirrored() {
        let (tx, mut screen) = screen(FormKind::SignIn);
        screen.handle_key(key(KeyCode::Tab));
        screen.handle_key(key(KeyCode::Char('p')));

        tx.send_replace(AuthUiState::default());
        screen.sync_from_state();

        assert!(screen.password.value().is_empty());
    }
}
