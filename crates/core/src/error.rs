//! Domain error model.

use thiserror::Error;

/// Pre-submit validation failure.
///
/// Raised locally, before any request is built. The `Display` text is the
/// operator-facing message shown next to the acting control.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("name required")]
    NameRequired,

    #[error("quantity and price must be valid numbers")]
    InvalidNumber,

    #[error("a valid email address is required")]
    InvalidEmail,

    #[error("password must be at least 6 characters")]
    PasswordTooShort,

    #[error("company name is required")]
    CompanyNameRequired,
}

/// Domain-level error.
///
/// Keep this focused on deterministic client-side failures. Transport and
/// server failures belong to the dashboard crate.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// An identifier was invalid (e.g. empty or not path-safe).
    #[error("invalid identifier: {0}")]
    InvalidId(String),
}

impl DomainError {
    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }
}
