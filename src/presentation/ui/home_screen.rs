//! Home screen: entry point to the auth forms.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};

use crate::domain::Screen;

const ENTRIES: [(Screen, &str); 3] = [
    (Screen::Login, "Sign in"),
    (Screen::Register, "Create an account"),
    (Screen::Recover, "Forgot your password?"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HomeAction {
    None,
    Open(Screen),
    Quit,
}

/// Home screen UI.
#[derive(Debug, Default)]
pub struct HomeScreen {
    selected: usize,
}

impl HomeScreen {
    #[must_use]
    pub const fn new() -> Self {
        Self { selected: 0 }
    }

    #[must_use]
    pub const fn selected(&self) -> Screen {
        ENTRIES[self.selected].0
    }

    /// Handles key event, returns action.
    pub fn handle_key(&mut self, key: KeyEvent) -> HomeAction {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected = self.selected.checked_sub(1).unwrap_or(ENTRIES.len() - 1);
                HomeAction::None
            }
            KeyCode::Down | KeyCode::Char('j') | KeyCode::Tab => {
                self.selected = (self.selected + 1) % ENTRIES.len();
                HomeAction::None
            }
            KeyCode::Enter => HomeAction::Open(self.selected()),
            KeyCode::Char('l') => HomeAction::Open(Screen::Login),
            KeyCode::Char('r') => HomeAction::Open(Screen::Register),
            KeyCode::Char('f') => HomeAction::Open(Screen::Recover),
            KeyCode::Char('q') | KeyCode::Esc => HomeAction::Quit,
            _ => HomeAction::None,
        }
    }
}

impl Widget for &HomeScreen {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let [_, center, _] = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(11),
            Constraint::Fill(1),
        ])
        .areas(area);
        let [_, content_area, _] = Layout::horizontal([
            Constraint::Fill(1),
            Constraint::Min(44),
            Constraint::Fill(1),
        ])
        .areas(center);

        Clear.render(content_area, buf);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow))
            .title(format!(" {} ", Screen::Home.title()));
        let inner = block.inner(content_area);
        block.render(content_area, buf);

        let mut lines = vec![
            Line::from(Span::styled(
                "Fresh bread, cakes and sweets every morning",
                Style::default().fg(Color::White),
            )),
            Line::default(),
        ];
        for (index, (_, label)) in ENTRIES.iter().enumerate() {
            let style = if index == self.selected {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            lines.push(Line::from(Span::styled(format!("  {label}  "), style)));
        }
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            "↑/↓: Select | Enter: Open | q: Quit",
            Style::default().fg(Color::DarkGray),
        )));

        Paragraph::new(lines).centered().render(inner, buf);
    }
}
