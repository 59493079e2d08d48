//! Remote resource gateway: one HTTP round trip per call.
//!
//! Every request carries the session's bearer credential when one is held.
//! A missing credential is not checked here; the API answers 401 and that
//! surfaces as an ordinary [`GatewayError::Api`]. No retries, no timeouts.

use reqwest::{Method, RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use stockroom_core::RecordId;

use crate::session::Session;

/// HTTP client bound to an API base URL and a session.
#[derive(Debug, Clone)]
pub struct Gateway {
    http: reqwest::Client,
    base_url: String,
    session: Session,
}

impl Gateway {
    pub fn new(base_url: impl Into<String>, session: Session) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: reqwest::Client::new(),
            base_url,
            session,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// `GET {path}` → array of records. A `null` or empty body is an empty
    /// collection.
    pub async fn list<T>(&self, path: &str) -> Result<Vec<T>, GatewayError>
    where
        T: DeserializeOwned,
    {
        let resp = self.send(self.request(Method::GET, path)).await?;
        let records: Option<Vec<T>> = parse_json(resp).await?;
        Ok(records.unwrap_or_default())
    }

    /// `POST {path}` with a new record's fields.
    pub async fn create<B, T>(&self, path: &str, body: &B) -> Result<T, GatewayError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let resp = self.send(self.request(Method::POST, path).json(body)).await?;
        parse_json(resp).await
    }

    /// `PUT {path}/{id}` with the full field set.
    pub async fn update<B, T>(&self, path: &str, id: &RecordId, body: &B) -> Result<T, GatewayError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let path = format!("{path}/{id}");
        let resp = self.send(self.request(Method::PUT, &path).json(body)).await?;
        parse_json(resp).await
    }

    /// `DELETE {path}/{id}`. Any success status counts; the body is ignored.
    pub async fn delete(&self, path: &str, id: &RecordId) -> Result<(), GatewayError> {
        let path = format!("{path}/{id}");
        self.send(self.request(Method::DELETE, &path)).await?;
        Ok(())
    }

    /// `POST {path}` without the bearer credential (sign-in / registration).
    pub async fn post_public<B, T>(&self, path: &str, body: &B) -> Result<T, GatewayError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let req = self.http.post(self.url(path)).json(body);
        let resp = self.send(req).await?;
        parse_json(resp).await
    }

    /// Check connectivity by hitting the health endpoint.
    pub async fn health(&self) -> bool {
        match self.http.get(self.url("/health")).send().await {
            Ok(resp) => resp.status().is_success(),
            Err(e) => {
                tracing::warn!(error = %e, "health check failed");
                false
            }
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let mut req = self.http.request(method, self.url(path));
        if let Some(credential) = self.session.credential() {
            req = req.bearer_auth(credential.token());
        }
        req
    }

    async fn send(&self, req: RequestBuilder) -> Result<reqwest::Response, GatewayError> {
        let resp = req.send().await.map_err(|e| {
            tracing::warn!(error = %e, "request failed before a response arrived");
            GatewayError::Network(e.to_string())
        })?;

        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let body = resp.bytes().await.unwrap_or_default();
        let message = error_message(&body);
        tracing::warn!(
            status = status.as_u16(),
            message = message.as_deref().unwrap_or(""),
            "API returned an error"
        );
        Err(GatewayError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

/// Parse a success body. An empty body reads as JSON `null`.
async fn parse_json<T>(resp: reqwest::Response) -> Result<T, GatewayError>
where
    T: DeserializeOwned,
{
    let body = resp
        .bytes()
        .await
        .map_err(|e| GatewayError::Network(e.to_string()))?;
    let body: &[u8] = if body.iter().all(u8::is_ascii_whitespace) {
        b"null"
    } else {
        &body
    };
    serde_json::from_slice(body).map_err(|e| GatewayError::Parse(e.to_string()))
}

/// The `error` field of an API error body, if it is a non-empty string.
fn error_message(body: &[u8]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(body).ok()?;
    value
        .get("error")
        .and_then(|e| e.as_str())
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .map(str::to_string)
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    #[error("network error: {0}")]
    Network(String),
    #[error("API error ({status}): {}", .message.as_deref().unwrap_or("no message"))]
    Api { status: u16, message: Option<String> },
    #[error("parse error: {0}")]
    Parse(String),
}

impl GatewayError {
    /// Message supplied by the server in the error body, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            GatewayError::Api { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            GatewayError::Api { status, .. } => StatusCode::from_u16(*status).ok(),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(StatusCode::UNAUTHORIZED)
    }
}
