//! Transient one-line notice.

use std::time::{Duration, Instant};

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

const DEFAULT_TTL: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnackbarLevel {
    Info,
    Success,
    Error,
}

impl SnackbarLevel {
    #[must_use]
    pub const fn color(self) -> Color {
        match self {
            Self::Info => Color::Cyan,
            Self::Success => Color::Green,
            Self::Error => Color::Red,
        }
    }
}

/// Notice shown at the bottom of the screen until it expires.
#[derive(Debug, Clone)]
pub struct Snackbar {
    message: String,
    level: SnackbarLevel,
    shown_at: Instant,
    ttl: Duration,
}

impl Snackbar {
    #[must_use]
    pub fn new(message: impl Into<String>, level: SnackbarLevel) -> Self {
        Self {
            message: message.into(),
            level,
            shown_at: Instant::now(),
            ttl: DEFAULT_TTL,
        }
    }

    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self::new(message, SnackbarLevel::Success)
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(message, SnackbarLevel::Error)
    }

    #[must_use]
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub const fn level(&self) -> SnackbarLevel {
        self.level
    }

    #[must_use]
    pub fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.shown_at) >= self.ttl
    }
}

impl Widget for &Snackbar {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let style = Style::default()
            .fg(Color::Black)
            .bg(self.level.color())
            .add_modifier(Modifier::BOLD);
        let line = Line::from(Span::styled(format!(" {} ", self.message), style));
        Paragraph::new(line).centered().render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expiry() {
        let snackbar = Snackbar::success("Saved").with_ttl(Duration::from_secs(2));
        let shown = snackbar.shown_at;

        assert!(!snackbar.is_expired(shown + Duration::from_secs(1)));
        assert!(snackbar.is_expired(shown + Duration::from_secs(2)));
    }

    #[test]
    fn test_levels() {
        assert_eq!(Snackbar::error("x").level(), SnackbarLevel::Error);
        assert_eq!(Snackbar::success("x").level().color(), Color::Green);
    }
}
