//! Signed-in screen: greeting, catalog and personal reminders.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{
        Block, Borders, List, ListItem, ListState, Paragraph, StatefulWidget, Tabs, Widget, Wrap,
    },
};

use crate::application::use_cases::MAX_REMINDER_LENGTH;
use crate::domain::entities::product::{self, Product};
use crate::domain::entities::{Reminder, ReminderId, UserRef};
use crate::presentation::widgets::TextInput;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    Catalog,
    Reminders,
    Composer,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrincipalAction {
    None,
    CreateReminder(String),
    DeleteReminder(ReminderId),
    Logout,
    Quit,
}

/// Principal screen UI.
pub struct PrincipalScreen {
    user: UserRef,
    categories: Vec<&'static str>,
    category: usize,
    product: ListState,
    reminders: Vec<Reminder>,
    reminder: ListState,
    composer: TextInput,
    focus: Focus,
    busy: bool,
}

impl PrincipalScreen {
    #[must_use]
    pub fn new(user: UserRef) -> Self {
        Self {
            user,
            categories: product::categories(),
            category: 0,
            product: ListState::default().with_selected(Some(0)),
            reminders: Vec::new(),
            reminder: ListState::default(),
            composer: TextInput::new(" New reminder ")
                .placeholder("e.g. Pick up the birthday cake on Friday")
                .max_chars(MAX_REMINDER_LENGTH),
            focus: Focus::Catalog,
            busy: false,
        }
    }

    #[must_use]
    pub const fn user(&self) -> &UserRef {
        &self.user
    }

    #[must_use]
    pub fn reminders(&self) -> &[Reminder] {
        &self.reminders
    }

    /// Replaces the reminder list, keeping the selection in range.
    pub fn set_reminders(&mut self, reminders: Vec<Reminder>) {
        self.reminders = reminders;
        self.busy = false;
        let selected = match self.reminder.selected() {
            _ if self.reminders.is_empty() => None,
            Some(index) => Some(index.min(self.reminders.len() - 1)),
            None => Some(0),
        };
        self.reminder.select(selected);
    }

    /// Marks a reminder request as finished without new data.
    pub fn set_idle(&mut self) {
        self.busy = false;
    }

    /// Clears the composer once its reminder was saved.
    pub fn reminder_saved(&mut self) {
        self.composer.clear();
        self.busy = false;
    }

    fn visible_products(&self) -> Vec<&'static Product> {
        self.categories
            .get(self.category)
            .map(|category| product::by_category(category).collect())
            .unwrap_or_default()
    }

    fn set_focus(&mut self, focus: Focus) {
        self.focus = focus;
        self.composer.set_focused(focus == Focus::Composer);
    }

    fn cycle_focus(&mut self) {
        self.set_focus(match self.focus {
            Focus::Catalog => Focus::Reminders,
            Focus::Reminders => Focus::Composer,
            Focus::Composer => Focus::Catalog,
        });
    }

    /// Handles key event, returns action.
    pub fn handle_key(&mut self, key: KeyEvent) -> PrincipalAction {
        if key.code == KeyCode::Tab {
            self.cycle_focus();
            return PrincipalAction::None;
        }

        match self.focus {
            Focus::Composer => self.handle_composer_key(key),
            Focus::Catalog => self.handle_catalog_key(key),
            Focus::Reminders => self.handle_reminders_key(key),
        }
    }

    fn handle_common_key(key: KeyEvent) -> PrincipalAction {
        match key.code {
            KeyCode::Char('L') => PrincipalAction::Logout,
            KeyCode::Char('q') => PrincipalAction::Quit,
            _ => PrincipalAction::None,
        }
    }

    fn handle_composer_key(&mut self, key: KeyEvent) -> PrincipalAction {
        match key.code {
            KeyCode::Esc => self.set_focus(Focus::Reminders),
            KeyCode::Enter if !self.busy => {
                let message = self.composer.value().trim().to_string();
                if !message.is_empty() {
                    self.busy = true;
                    return PrincipalAction::CreateReminder(message);
                }
            }
            _ => {
                self.composer.handle_key(&key);
            }
        }
        PrincipalAction::None
    }

    fn handle_catalog_key(&mut self, key: KeyEvent) -> PrincipalAction {
        let count = self.visible_products().len();
        match key.code {
            KeyCode::Left | KeyCode::Char('h') if !self.categories.is_empty() => {
                self.category = self
                    .category
                    .checked_sub(1)
                    .unwrap_or(self.categories.len() - 1);
                self.product.select(Some(0));
            }
            KeyCode::Right | KeyCode::Char('l') if !self.categories.is_empty() => {
                self.category = (self.category + 1) % self.categories.len();
                self.product.select(Some(0));
            }
            KeyCode::Up | KeyCode::Char('k') if count > 0 => self.product.select_previous(),
            KeyCode::Down | KeyCode::Char('j') if count > 0 => {
                let next = self.product.selected().map_or(0, |i| (i + 1).min(count - 1));
                self.product.select(Some(next));
            }
            _ => return Self::handle_common_key(key),
        }
        PrincipalAction::None
    }

    fn handle_reminders_key(&mut self, key: KeyEvent) -> PrincipalAction {
        let count = self.reminders.len();
        match key.code {
            KeyCode::Up | KeyCode::Char('k') if count > 0 => self.reminder.select_previous(),
            KeyCode::Down | KeyCode::Char('j') if count > 0 => {
                let next = self.reminder.selected().map_or(0, |i| (i + 1).min(count - 1));
                self.reminder.select(Some(next));
            }
            KeyCode::Char('n') => self.set_focus(Focus::Composer),
            KeyCode::Char('d') | KeyCode::Delete if !self.busy => {
                if let Some(reminder) = self.reminder.selected().and_then(|i| self.reminders.get(i)) {
                    self.busy = true;
                    return PrincipalAction::DeleteReminder(reminder.id());
                }
            }
            _ if key.modifiers.contains(KeyModifiers::CONTROL) => {}
            _ => return Self::handle_common_key(key),
        }
        PrincipalAction::None
    }

    fn border_style(&self, focus: Focus) -> Style {
        if self.focus == focus {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::Gray)
        }
    }

    fn render_catalog(&mut self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.border_style(Focus::Catalog))
            .title(" Catalog ");
        let inner = block.inner(area);
        block.render(area, buf);

        let [tabs_area, list_area, detail_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Fill(1),
            Constraint::Length(3),
        ])
        .areas(inner);

        Tabs::new(self.categories.clone())
            .select(self.category)
            .highlight_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
            .render(tabs_area, buf);

        let products = self.visible_products();
        let items: Vec<ListItem> = products
            .iter()
            .map(|p| {
                ListItem::new(Line::from(vec![
                    Span::raw(p.title),
                    Span::raw("  "),
                    Span::styled(p.price_label, Style::default().fg(Color::Green)),
                ]))
            })
            .collect();
        StatefulWidget::render(
            List::new(items).highlight_symbol("> ").highlight_style(
                Style::default().add_modifier(Modifier::BOLD),
            ),
            list_area,
            buf,
            &mut self.product,
        );

        if let Some(selected) = self.product.selected().and_then(|i| products.get(i)) {
            Paragraph::new(selected.description)
                .style(Style::default().fg(Color::DarkGray))
                .wrap(Wrap { trim: true })
                .render(detail_area, buf);
        }
    }

    fn render_reminders(&mut self, area: Rect, buf: &mut Buffer) {
        let [list_area, composer_area] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(3)]).areas(area);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.border_style(Focus::Reminders))
            .title(format!(" My reminders ({}) ", self.reminders.len()));

        if self.reminders.is_empty() {
            Paragraph::new("No reminders yet. Press n to write one.")
                .style(Style::default().fg(Color::DarkGray))
                .block(block)
                .render(list_area, buf);
        } else {
            let items: Vec<ListItem> = self
                .reminders
                .iter()
                .map(|r| {
                    ListItem::new(vec![
                        Line::from(Span::styled(
                            r.created_at().to_string(),
                            Style::default().fg(Color::DarkGray),
                        )),
                        Line::from(r.message().to_string()),
                    ])
                })
                .collect();
            StatefulWidget::render(
                List::new(items).block(block).highlight_symbol("> "),
                list_area,
                buf,
                &mut self.reminder,
            );
        }

        (&self.composer).render(composer_area, buf);
    }
}

impl Widget for &mut PrincipalScreen {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let [header_area, body_area, footer_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Fill(1),
            Constraint::Length(1),
        ])
        .areas(area);

        Paragraph::new(Line::from(vec![
            Span::styled(
                "Bakery APP",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!("  Welcome, {}", self.user.email())),
        ]))
        .render(header_area, buf);

        let [catalog_area, reminders_area] =
            Layout::horizontal([Constraint::Percentage(55), Constraint::Percentage(45)])
                .areas(body_area);
        self.render_catalog(catalog_area, buf);
        self.render_reminders(reminders_area, buf);

        Paragraph::new(
            "Tab: Switch pane | ←/→: Category | n: New reminder | d: Delete | L: Log out | q: Quit",
        )
        .style(Style::default().fg(Color::DarkGray))
        .render(footer_area, buf);
    }
}
