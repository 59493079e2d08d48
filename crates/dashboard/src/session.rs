//! Auth session holder.
//!
//! One `Session` is created per dashboard process and passed explicitly to the
//! gateway and views. It holds at most one bearer credential:
//! unset at construction, set after a successful login, cleared on sign-out.

use std::sync::{Arc, PoisonError, RwLock};

use thiserror::Error;

/// Bearer token proving an authenticated operator.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn token(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Debug for Credential {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    /// No credential is held; the caller should send the operator to sign in.
    #[error("not signed in")]
    Unauthenticated,
}

/// Shared handle to the current credential.
///
/// Cheap to clone; all clones observe the same credential.
#[derive(Debug, Clone, Default)]
pub struct Session {
    credential: Arc<RwLock<Option<Credential>>>,
}

impl Session {
    /// A session with no credential.
    pub fn new() -> Self {
        Self::default()
    }

    /// A session pre-seeded with a credential (e.g. from configuration).
    pub fn with_credential(credential: Credential) -> Self {
        let session = Self::new();
        session.set(credential);
        session
    }

    /// Replace the held credential.
    pub fn set(&self, credential: Credential) {
        *self.credential.write().unwrap_or_else(PoisonError::into_inner) = Some(credential);
        tracing::debug!("session credential set");
    }

    /// Drop the held credential (sign-out).
    pub fn clear(&self) {
        *self.credential.write().unwrap_or_else(PoisonError::into_inner) = None;
        tracing::debug!("session credential cleared");
    }

    pub fn credential(&self) -> Option<Credential> {
        self.credential
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.credential
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// The held credential, or `Unauthenticated`.
    pub fn require(&self) -> Result<Credential, SessionError> {
        self.credential().ok_or(SessionError::Unauthenticated)
    }
}
