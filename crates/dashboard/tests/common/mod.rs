//! In-process inventory API used by the black-box tests.
//!
//! Serves `/api/v1` on an ephemeral port: the three collections, the auth
//! endpoints and `/health`. Every collection route requires a bearer token
//! the server issued. Tests can queue failures and count requests.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, Method, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use serde_json::{Value, json};

pub const TEST_TOKEN: &str = "test-token";
pub const TEST_EMAIL: &str = "ops@example.com";
pub const TEST_PASSWORD: &str = "correct-horse";

const COLLECTIONS: [&str; 3] = ["categories", "items", "warehouses"];

/// Response queued to replace the next matching collection request.
#[derive(Debug, Clone)]
struct Canned {
    method: Method,
    collection: String,
    status: StatusCode,
    body: Value,
}

#[derive(Debug, Default)]
struct Inner {
    records: HashMap<String, Vec<Value>>,
    tokens: HashSet<String>,
    users: HashMap<String, String>,
    canned: VecDeque<Canned>,
    list_delays: HashMap<String, Duration>,
    requests: HashMap<(Method, String), usize>,
    authorizations: Vec<Option<String>>,
}

/// Shared state of the mock API; tests hold a clone to seed and inspect it.
#[derive(Debug, Clone)]
pub struct MockApi {
    inner: Arc<Mutex<Inner>>,
}

impl MockApi {
    fn new() -> Self {
        let mut inner = Inner::default();
        inner.tokens.insert(TEST_TOKEN.to_string());
        inner
            .users
            .insert(TEST_EMAIL.to_string(), TEST_PASSWORD.to_string());
        Self {
            inner: Arc::new(Mutex::new(inner)),
        }
    }

    /// Insert a record directly; returns its id.
    pub fn seed(&self, collection: &str, mut record: Value) -> String {
        let id = uuid::Uuid::now_v7().to_string();
        record["id"] = json!(id);
        self.inner
            .lock()
            .unwrap()
            .records
            .entry(collection.to_string())
            .or_default()
            .push(record);
        id
    }

    pub fn records(&self, collection: &str) -> Vec<Value> {
        self.inner
            .lock()
            .unwrap()
            .records
            .get(collection)
            .cloned()
            .unwrap_or_default()
    }

    /// Make the next `method` request on `collection` fail with `status`.
    pub fn fail_next(&self, method: Method, collection: &str, status: u16, error: Option<&str>) {
        let body = match error {
            Some(message) => json!({ "error": message }),
            None => json!({}),
        };
        self.reply_next(method, collection, status, body);
    }

    /// Answer the next `method` request on `collection` with `status` and `body`.
    pub fn reply_next(&self, method: Method, collection: &str, status: u16, body: Value) {
        self.inner.lock().unwrap().canned.push_back(Canned {
            method,
            collection: collection.to_string(),
            status: StatusCode::from_u16(status).unwrap(),
            body,
        });
    }

    /// Hold every `GET` on `collection` for `delay` before answering.
    pub fn delay_lists(&self, collection: &str, delay: Duration) {
        self.inner
            .lock()
            .unwrap()
            .list_delays
            .insert(collection.to_string(), delay);
    }

    pub fn clear(&self, collection: &str) {
        self.inner.lock().unwrap().records.remove(collection);
    }

    /// Collection requests received, authorized or not.
    pub fn requests(&self, method: Method, collection: &str) -> usize {
        self.inner
            .lock()
            .unwrap()
            .requests
            .get(&(method, collection.to_string()))
            .copied()
            .unwrap_or(0)
    }

    pub fn mutations(&self, collection: &str) -> usize {
        [Method::POST, Method::PUT, Method::DELETE]
            .into_iter()
            .map(|m| self.requests(m, collection))
            .sum()
    }

    /// `Authorization` header of the most recent collection request.
    pub fn last_authorization(&self) -> Option<String> {
        self.inner
            .lock()
            .unwrap()
            .authorizations
            .last()
            .cloned()
            .flatten()
    }

    fn enter(&self, method: Method, collection: &str, headers: &HeaderMap) -> Result<(), Response> {
        let mut inner = self.inner.lock().unwrap();
        *inner
            .requests
            .entry((method.clone(), collection.to_string()))
            .or_default() += 1;

        let authorization = headers
            .get(header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .map(str::to_string);
        inner.authorizations.push(authorization.clone());

        if !COLLECTIONS.contains(&collection) {
            return Err(error(StatusCode::NOT_FOUND, "Not found"));
        }

        let token = authorization
            .as_deref()
            .and_then(|h| h.strip_prefix("Bearer "))
            .map(str::trim)
            .unwrap_or("");
        if !inner.tokens.contains(token) {
            return Err(error(StatusCode::UNAUTHORIZED, "Missing or malformed JWT"));
        }

        let queued = inner
            .canned
            .iter()
            .position(|c| c.method == method && c.collection == collection);
        if let Some(pos) = queued {
            let canned = inner.canned.remove(pos).unwrap();
            return Err((canned.status, Json(canned.body)).into_response());
        }

        Ok(())
    }
}

fn error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

fn not_found(collection: &str) -> Response {
    error(StatusCode::NOT_FOUND, &format!("{collection} record not found"))
}

async fn list(
    State(api): State<MockApi>,
    Path(collection): Path<String>,
    headers: HeaderMap,
) -> Response {
    if let Err(resp) = api.enter(Method::GET, &collection, &headers) {
        return resp;
    }
    let records = api.records(&collection);
    let delay = api.inner.lock().unwrap().list_delays.get(&collection).copied();
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }
    Json(records).into_response()
}

async fn create(
    State(api): State<MockApi>,
    Path(collection): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Err(resp) = api.enter(Method::POST, &collection, &headers) {
        return resp;
    }
    if body["name"].as_str().map_or(true, |n| n.trim().is_empty()) {
        return error(StatusCode::BAD_REQUEST, "name is required");
    }
    let id = api.seed(&collection, body.clone());
    let mut created = body;
    created["id"] = json!(id);
    (StatusCode::CREATED, Json(created)).into_response()
}

async fn update(
    State(api): State<MockApi>,
    Path((collection, id)): Path<(String, String)>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Err(resp) = api.enter(Method::PUT, &collection, &headers) {
        return resp;
    }
    let mut inner = api.inner.lock().unwrap();
    let records = inner.records.entry(collection.clone()).or_default();
    let Some(record) = records.iter_mut().find(|r| r["id"] == json!(id)) else {
        return not_found(&collection);
    };
    if let (Some(target), Some(fields)) = (record.as_object_mut(), body.as_object()) {
        for (key, value) in fields {
            if key != "id" {
                target.insert(key.clone(), value.clone());
            }
        }
    }
    Json(record.clone()).into_response()
}

async fn remove(
    State(api): State<MockApi>,
    Path((collection, id)): Path<(String, String)>,
    headers: HeaderMap,
) -> Response {
    if let Err(resp) = api.enter(Method::DELETE, &collection, &headers) {
        return resp;
    }
    let mut inner = api.inner.lock().unwrap();
    let records = inner.records.entry(collection.clone()).or_default();
    let before = records.len();
    records.retain(|r| r["id"] != json!(id));
    if records.len() == before {
        return not_found(&collection);
    }
    StatusCode::NO_CONTENT.into_response()
}

async fn login(State(api): State<MockApi>, Json(body): Json<Value>) -> Response {
    let email = body["email"].as_str().unwrap_or("");
    let password = body["password"].as_str().unwrap_or("");
    let mut inner = api.inner.lock().unwrap();
    if inner.users.get(email).map(String::as_str) != Some(password) {
        return error(StatusCode::UNAUTHORIZED, "Invalid credentials");
    }
    let token = format!("token-{}", uuid::Uuid::now_v7());
    inner.tokens.insert(token.clone());
    Json(json!({ "token": token })).into_response()
}

async fn register(State(api): State<MockApi>, Json(body): Json<Value>) -> Response {
    let email = body["email"].as_str().unwrap_or("").to_string();
    let password = body["password"].as_str().unwrap_or("").to_string();
    let mut inner = api.inner.lock().unwrap();
    if inner.users.contains_key(&email) {
        return error(StatusCode::CONFLICT, "Email already registered");
    }
    inner.users.insert(email, password);
    (
        StatusCode::CREATED,
        Json(json!({
            "message": "Registration successful",
            "tenant_id": uuid::Uuid::now_v7().to_string(),
        })),
    )
        .into_response()
}

fn build_app(api: MockApi) -> Router {
    Router::new()
        .route("/api/v1/health", get(|| async { Json(json!({ "status": "ok" })) }))
        .route("/api/v1/auth/login", post(login))
        .route("/api/v1/auth/register", post(register))
        .route("/api/v1/:collection", get(list).post(create))
        .route("/api/v1/:collection/:id", put(update).delete(remove))
        .with_state(api)
}

pub struct TestServer {
    /// API base URL, e.g. `http://127.0.0.1:PORT/api/v1`.
    pub base_url: String,
    pub api: MockApi,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    pub async fn spawn() -> Self {
        let api = MockApi::new();
        let app = build_app(api.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{addr}/api/v1");

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url,
            api,
            handle,
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// A dashboard signed in with the seeded token.
pub fn signed_in(srv: &TestServer) -> stockroom_dashboard::Dashboard {
    let session = stockroom_dashboard::Session::with_credential(stockroom_dashboard::Credential::new(TEST_TOKEN));
    stockroom_dashboard::Dashboard::with_session(&srv.base_url, session)
}

/// A dashboard with no credential.
pub fn signed_out(srv: &TestServer) -> stockroom_dashboard::Dashboard {
    stockroom_dashboard::Dashboard::with_session(&srv.base_url, stockroom_dashboard::Session::new())
}

pub fn accept(_: &str) -> bool {
    true
}

pub fn decline(_: &str) -> bool {
    false
}
