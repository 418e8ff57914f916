//! Identity gateway error types.

use std::time::Duration;

use thiserror::Error;

/// Failure reported by the identity gateway.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[allow(missing_docs)]
pub enum GatewayError {
    #[error("request rejected by identity provider{}", detail(.description.as_deref()))]
    Rejected { description: Option<String> },

    #[error("network error during authentication: {message}")]
    Network { message: String },

    #[error("request timed out after {secs}s")]
    Timeout { secs: u64 },

    #[error("rate limited by identity provider")]
    RateLimited,

    #[error("unexpected identity provider error: {message}")]
    Unexpected { message: String },
}

fn detail(description: Option<&str>) -> String {
    description.map(|d| format!(": {d}")).unwrap_or_default()
}

impl GatewayError {
    /// Creates rejection with a readable cause.
    #[must_use]
    pub fn rejected(description: impl Into<String>) -> Self {
        Self::Rejected {
            description: Some(description.into()),
        }
    }

    /// Creates rejection without a reported cause.
    #[must_use]
    pub const fn rejected_silently() -> Self {
        Self::Rejected { description: None }
    }

    /// Creates network error.
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Creates timeout error.
    #[must_use]
    pub const fn timeout(after: Duration) -> Self {
        Self::Timeout {
            secs: after.as_secs(),
        }
    }

    /// Creates unexpected error.
    #[must_use]
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected {
            message: message.into(),
        }
    }

    /// Returns the human-readable cause to show the user, if the gateway gave one.
    #[must_use]
    pub fn description(&self) -> Option<String> {
        match self {
            Self::Rejected { description } => description.clone(),
            Self::Network { message } => Some(format!("Network error: {message}")),
            Self::Timeout { .. } => Some("Request timed out. Please try again.".to_string()),
            Self::RateLimited => Some("Too many attempts. Try again later.".to_string()),
            Self::Unexpected { .. } => None,
        }
    }

    /// Returns whether error is network related.
    #[must_use]
    pub const fn is_network_error(&self) -> bool {
        matches!(
            self,
            Self::Network { .. } | Self::Timeout { .. } | Self::RateLimited
        )
    }
}
