//! Credential checks performed before any gateway call.

use std::sync::LazyLock;

use regex::Regex;

use crate::domain::errors::ValidationError;

/// Minimum accepted password length, in characters.
pub const MIN_PASSWORD_LENGTH: usize = 6;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9+._%\-]{1,256}@[a-zA-Z0-9][a-zA-Z0-9\-]{0,64}(\.[a-zA-Z0-9][a-zA-Z0-9\-]{0,25})+$",
    )
    .expect("email pattern compiles")
});

/// Outcome of validating a form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationResult {
    Valid,
    Invalid(ValidationError),
}

impl ValidationResult {
    #[must_use]
    pub const fn is_valid(self) -> bool {
        matches!(self, Self::Valid)
    }

    /// Converts into a `Result`.
    ///
    /// # Errors
    /// Returns the first failed rule.
    pub const fn into_result(self) -> Result<(), ValidationError> {
        match self {
            Self::Valid => Ok(()),
            Self::Invalid(reason) => Err(reason),
        }
    }
}

/// Returns whether the input has the shape of an email address.
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Validates an email-only form.
#[must_use]
pub fn validate_email(email: &str) -> ValidationResult {
    if is_valid_email(email) {
        ValidationResult::Valid
    } else {
        ValidationResult::Invalid(ValidationError::InvalidEmail)
    }
}

/// Validates credentials. Rules run in order and the first failure wins:
/// email shape, password length, then confirmation (only when supplied).
#[must_use]
pub fn validate(email: &str, password: &str, confirm: Option<&str>) -> ValidationResult {
    if !is_valid_email(email) {
        return ValidationResult::Invalid(ValidationError::InvalidEmail);
    }

    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return ValidationResult::Invalid(ValidationError::PasswordTooShort);
    }

    if let Some(confirm) = confirm
        && confirm != password
    {
        return ValidationResult::Invalid(ValidationError::PasswordMismatch);
    }

    ValidationResult::Valid
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("a@b.com" ; "minimal")]
    #[test_case("first.last+tag@bakery.example.cl" ; "dotted_with_tag")]
    #[test_case("USER_1%x@sub-domain.example.org" ; "mixed_chars")]
    fn test_valid_emails(email: &str) {
        assert!(is_valid_email(email));
    }

    #[test_case("" ; "empty")]
    #[test_case("ab.com" ; "missing_at")]
    #[test_case("a@b" ; "missing_domain_suffix")]
    #[test_case("a@" ; "missing_domain")]
    #[test_case("@b.com" ; "missing_local_part")]
    #[test_case("a@.com" ; "domain_starts_with_dot")]
    #[test_case("a b@c.com" ; "whitespace")]
    #[test_case(" a@b.com" ; "leading_space")]
    fn test_invalid_emails(email: &str) {
        assert_eq!(
            validate(email, "secret1", None),
            ValidationResult::Invalid(ValidationError::InvalidEmail)
        );
    }

    #[test_case("" ; "empty")]
    #[test_case("a" ; "one_char")]
    #[test_case("abcde" ; "five_chars")]
    fn test_short_passwords(password: &str) {
        assert_eq!(
            validate("a@b.com", password, None),
            ValidationResult::Invalid(ValidationError::PasswordTooShort)
        );
    }

    #[test]
    fn test_email_error_takes_precedence() {
        assert_eq!(
            validate("not-an-email", "abc", Some("xyz")),
            ValidationResult::Invalid(ValidationError::InvalidEmail)
        );
    }

    #[test]
    fn test_password_error_precedes_mismatch() {
        assert_eq!(
            validate("a@b.com", "abc", Some("abd")),
            ValidationResult::Invalid(ValidationError::PasswordTooShort)
        );
    }

    #[test]
    fn test_password_mismatch() {
        assert_eq!(
            validate("a@b.com", "abcdef", Some("abcdex")),
            ValidationResult::Invalid(ValidationError::PasswordMismatch)
        );
    }

    #[test]
    fn test_valid_with_confirmation() {
        assert_eq!(
            validate("a@b.com", "secret1", Some("secret1")),
            ValidationResult::Valid
        );
    }

    #[test]
    fn test_length_counts_characters() {
        assert!(validate("a@b.com", "ñandú1", None).is_valid());
    }

    #[test]
    fn test_validate_email_only() {
        assert!(validate_email("a@b.com").is_valid());
        assert_eq!(
            validate_email("a@b").into_result(),
            Err(ValidationError::InvalidEmail)
        );
    }

    #[test]
    fn test_reason_codes() {
        assert_eq!(ValidationError::InvalidEmail.code(), "invalid_email");
        assert_eq!(ValidationError::PasswordTooShort.code(), "password_too_short");
        assert_eq!(ValidationError::PasswordMismatch.code(), "password_mismatch");
    }
}
