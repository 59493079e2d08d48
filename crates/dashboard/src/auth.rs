//! Sign-in, registration and sign-out against the auth endpoints.
//!
//! Token issuance is the server's business; this client only posts the
//! forms, stores the returned bearer token in the [`Session`] and clears it
//! again on sign-out.

use serde::{Deserialize, Serialize};
use stockroom_core::ValidationError;
use stockroom_core::validate::{validate_login, validate_registration};
use thiserror::Error;

use crate::gateway::{Gateway, GatewayError};
use crate::session::{Credential, Session};

pub const LOGIN_PATH: &str = "/auth/login";
pub const REGISTER_PATH: &str = "/auth/register";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The server refused the request; carries the message to show.
    #[error("{0}")]
    Rejected(String),
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct RegisterRequest<'a> {
    name: &'a str,
    email: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct LoginResponse {
    #[serde(default)]
    token: Option<String>,
}

/// Response of a successful registration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Registration {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub tenant_id: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AuthClient {
    gateway: Gateway,
}

impl AuthClient {
    pub fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }

    pub fn session(&self) -> &Session {
        self.gateway.session()
    }

    /// Exchange email and password for a bearer token and hold it in the session.
    pub async fn login(&self, email: &str, password: &str) -> Result<(), AuthError> {
        validate_login(email, password)?;

        let body = LoginRequest {
            email: email.trim(),
            password,
        };
        let resp: LoginResponse = self
            .gateway
            .post_public(LOGIN_PATH, &body)
            .await
            .map_err(|e| rejected(&e, "Login failed"))?;

        let token = resp
            .token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AuthError::Rejected("Login failed".to_string()))?;

        self.session().set(Credential::new(token));
        tracing::info!("signed in");
        Ok(())
    }

    /// Create a tenant and its first operator. Does not sign in.
    pub async fn register(
        &self,
        company_name: &str,
        email: &str,
        password: &str,
    ) -> Result<Registration, AuthError> {
        validate_registration(company_name, email, password)?;

        let body = RegisterRequest {
            name: company_name.trim(),
            email: email.trim(),
            password,
        };
        let registration: Registration = self
            .gateway
            .post_public(REGISTER_PATH, &body)
            .await
            .map_err(|e| rejected(&e, "Registration failed"))?;

        tracing::info!(
            tenant_id = registration.tenant_id.as_deref().unwrap_or(""),
            "registered"
        );
        Ok(registration)
    }

    /// Register, then sign in with the same credentials.
    pub async fn register_and_login(
        &self,
        company_name: &str,
        email: &str,
        password: &str,
    ) -> Result<Registration, AuthError> {
        let registration = self.register(company_name, email, password).await?;
        self.login(email, password).await?;
        Ok(registration)
    }

    pub fn sign_out(&self) {
        self.session().clear();
        tracing::info!("signed out");
    }
}

fn rejected(err: &GatewayError, fallback: &str) -> AuthError {
    tracing::warn!(error = %err, "auth request failed");
    AuthError::Rejected(err.server_message().unwrap_or(fallback).to_string())
}
