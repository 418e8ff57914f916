//! Authenticated session issued by the identity gateway.

use std::fmt;

use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

/// Opaque token issued by the identity provider, masked when displayed.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Zeroize)]
#[serde(transparent)]
pub struct SessionToken {
    value: String,
}

impl SessionToken {
    /// Wraps a raw token.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    /// Returns token as string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Returns masked token for display.
    #[must_use]
    pub fn masked(&self) -> String {
        let len = self.value.chars().count();
        if len <= 10 {
            return "*".repeat(len);
        }

        let prefix: String = self.value.chars().take(4).collect();
        let suffix: String = self.value.chars().skip(len - 4).collect();
        format!("{prefix}...{suffix}")
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionToken")
            .field("value", &self.masked())
            .finish()
    }
}

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.masked())
    }
}

/// Read-only reference to the signed-in identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserRef {
    uid: String,
    email: String,
}

impl UserRef {
    #[must_use]
    pub fn new(uid: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            email: email.into(),
        }
    }

    #[must_use]
    pub fn uid(&self) -> &str {
        &self.uid
    }

    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }
}

/// Current authenticated identity plus the tokens backing it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    user: UserRef,
    id_token: SessionToken,
    refresh_token: SessionToken,
}

impl Session {
    #[must_use]
    pub const fn new(user: UserRef, id_token: SessionToken, refresh_token: SessionToken) -> Self {
        Self {
            user,
            id_token,
            refresh_token,
        }
    }

    #[must_use]
    pub const fn user(&self) -> &UserRef {
        &self.user
    }

    #[must_use]
    pub const fn id_token(&self) -> &SessionToken {
        &self.id_token
    }

    #[must_use]
    pub const fn refresh_token(&self) -> &SessionToken {
        &self.refresh_token
    }

    /// Returns a copy with rotated tokens for the same user.
    #[must_use]
    pub fn with_tokens(&self, id_token: SessionToken, refresh_token: SessionToken) -> Self {
        Self {
            user: self.user.clone(),
            id_token,
            refresh_token,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RAW: &str = "eyJhbGciOiJSUzI1NiIsImtpZCI6IjEyMyJ9.payload.signature";

    #[test]
    fn test_token_masking() {
        let token = SessionToken::new(RAW);
        let masked = token.masked();

        assert!(masked.starts_with("eyJh"));
        assert!(masked.contains("..."));
        assert!(!masked.contains(RAW));
    }

    #[test]
    fn test_short_token_fully_masked() {
        assert_eq!(SessionToken::new("abc").masked(), "***");
    }

    #[test]
    fn test_session_debug_does_not_leak_tokens() {
        let session = Session::new(
            UserRef::new("uid-1", "a@b.com"),
            SessionToken::new(RAW),
            SessionToken::new("refresh-token-value-0123456789"),
        );
        let output = format!("{session:?}");

        assert!(output.contains("a@b.com"));
        assert!(!output.contains(RAW));
        assert!(!output.contains("refresh-token-value-0123456789"));
    }

    #[test]
    fn test_session_json_shape() {
        let session = Session::new(
            UserRef::new("uid-1", "a@b.com"),
            SessionToken::new("id"),
            SessionToken::new("refresh"),
        );
        let json = serde_json::to_value(&session).unwrap();

        assert_eq!(json["user"]["email"], "a@b.com");
        assert_eq!(json["refresh_token"], "refresh");
    }
}
