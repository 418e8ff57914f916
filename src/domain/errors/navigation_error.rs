//! Navigation errors.

use thiserror::Error;

use crate::domain::Screen;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum NavigationError {
    #[error("no route from {from} to {to}")]
    InvalidTransition { from: Screen, to: Screen },
}
