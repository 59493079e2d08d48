mod common;

use std::time::Duration;

use axum::http::Method;
use serde_json::json;
use stockroom_core::{Category, Warehouse};
use stockroom_dashboard::{Credential, Gateway, ResourceCache, Session};

use common::{TEST_TOKEN, TestServer};

fn cache<R: stockroom_core::Resource>(srv: &TestServer) -> ResourceCache<R> {
    let session = Session::with_credential(Credential::new(TEST_TOKEN));
    cache_with_session(srv, session)
}

fn cache_with_session<R: stockroom_core::Resource>(srv: &TestServer, session: Session) -> ResourceCache<R> {
    ResourceCache::new(Gateway::new(&srv.base_url, session))
}

#[tokio::test]
async fn concurrent_first_loads_share_one_request() {
    let srv = TestServer::spawn().await;
    srv.api.seed("categories", json!({ "name": "Tools" }));
    let cache = cache::<Category>(&srv);
    let other = cache.clone();

    let (a, b) = tokio::join!(cache.load(), other.load());

    assert_eq!(srv.api.requests(Method::GET, "categories"), 1);
    assert_eq!(a, b);
    assert_eq!(a.len(), 1);
    assert!(!a.loading);
}

#[tokio::test]
async fn load_is_idempotent_once_fetched() {
    let srv = TestServer::spawn().await;
    let cache = cache::<Category>(&srv);

    cache.load().await;
    srv.api.seed("categories", json!({ "name": "Late arrival" }));
    let snap = cache.load().await;

    assert_eq!(srv.api.requests(Method::GET, "categories"), 1);
    assert_eq!(snap.data, Some(vec![]));
}

#[tokio::test]
async fn invalidate_always_refetches() {
    let srv = TestServer::spawn().await;
    let cache = cache::<Warehouse>(&srv);
    cache.load().await;

    srv.api.seed("warehouses", json!({ "name": "North", "location": "Oslo" }));
    let snap = cache.invalidate().await.unwrap();

    assert_eq!(srv.api.requests(Method::GET, "warehouses"), 2);
    let data = snap.data.unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0].location(), Some("Oslo"));
}

#[tokio::test]
async fn failed_refetch_keeps_stale_data_and_sets_error() {
    let srv = TestServer::spawn().await;
    srv.api.seed("categories", json!({ "name": "Tools" }));
    let cache = cache::<Category>(&srv);
    cache.load().await;

    srv.api.fail_next(Method::GET, "categories", 500, Some("database unavailable"));
    let err = cache.invalidate().await.unwrap_err();
    assert_eq!(err.server_message(), Some("database unavailable"));

    let snap = cache.snapshot();
    assert!(snap.is_stale());
    assert_eq!(snap.len(), 1);
    assert_eq!(snap.error.as_deref(), Some("database unavailable"));

    let snap = cache.invalidate().await.unwrap();
    assert_eq!(snap.error, None);
    assert!(!snap.is_stale());
}

#[tokio::test]
async fn failed_first_load_is_not_retried_automatically() {
    let srv = TestServer::spawn().await;
    srv.api.fail_next(Method::GET, "categories", 500, None);
    let cache = cache::<Category>(&srv);

    let snap = cache.load().await;
    assert_eq!(snap.data, None);
    assert_eq!(snap.error.as_deref(), Some("Failed to load categories"));

    cache.load().await;
    assert_eq!(srv.api.requests(Method::GET, "categories"), 1);
}

#[tokio::test]
async fn reset_forgets_data_and_allows_a_fresh_load() {
    let srv = TestServer::spawn().await;
    let cache = cache::<Category>(&srv);
    cache.load().await;

    cache.reset();
    assert_eq!(cache.snapshot().data, None);

    cache.load().await;
    assert_eq!(srv.api.requests(Method::GET, "categories"), 2);
}

#[tokio::test]
async fn response_landing_after_reset_is_discarded() {
    let srv = TestServer::spawn().await;
    srv.api.seed("categories", json!({ "name": "Previous tenant" }));
    srv.api.delay_lists("categories", Duration::from_millis(300));
    let session = Session::with_credential(Credential::new(TEST_TOKEN));
    let cache = cache_with_session::<Category>(&srv, session.clone());

    let (stale, ()) = tokio::join!(cache.load(), async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        session.clear();
        cache.reset();
    });
    assert_eq!(stale.data, None);
    assert_eq!(cache.snapshot().data, None);
    assert!(!cache.snapshot().loading);

    srv.api.clear("categories");
    srv.api.seed("categories", json!({ "name": "Next tenant" }));
    session.set(Credential::new(TEST_TOKEN));

    let snap = cache.load().await;
    assert_eq!(srv.api.requests(Method::GET, "categories"), 2);
    let names: Vec<_> = snap.data.unwrap().into_iter().map(|c| c.name).collect();
    assert_eq!(names, vec!["Next tenant".to_string()]);
}

#[tokio::test]
async fn null_collection_body_reads_as_empty() {
    let srv = TestServer::spawn().await;
    srv.api.reply_next(Method::GET, "categories", 200, serde_json::Value::Null);
    let cache = cache::<Category>(&srv);

    let snap = cache.load().await;
    assert_eq!(snap.data, Some(vec![]));
    assert_eq!(snap.error, None);
}
