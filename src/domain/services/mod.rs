//! Domain services.

pub mod credential_validator;

pub use credential_validator::{
    MIN_PASSWORD_LENGTH, ValidationResult, is_valid_email, validate, validate_email,
};
