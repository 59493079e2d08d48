//! Per-resource-kind collection cache.
//!
//! The cache only ever holds a real server response: mutations never patch
//! it, they revalidate it. A failed fetch keeps the previous collection and
//! raises the error flag (stale-but-present). Responses are applied in the
//! order they resolve; the last one wins.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use stockroom_core::Resource;

use crate::gateway::{Gateway, GatewayError};

/// Point-in-time view of a cached collection.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheSnapshot<R> {
    /// Last successfully fetched collection, in server order.
    pub data: Option<Vec<R>>,
    /// A fetch is in flight.
    pub loading: bool,
    /// Message of the most recent failed fetch, cleared by the next success.
    pub error: Option<String>,
}

impl<R> CacheSnapshot<R> {
    /// Data is present but the latest fetch failed.
    pub fn is_stale(&self) -> bool {
        self.data.is_some() && self.error.is_some()
    }

    pub fn len(&self) -> usize {
        self.data.as_ref().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug)]
struct CacheState<R> {
    data: Option<Vec<R>>,
    error: Option<String>,
    in_flight: usize,
    completed: u64,
    /// Bumped by `reset`; fetches started under an older generation are dropped.
    generation: u64,
}

impl<R: Clone> CacheState<R> {
    fn snapshot(&self) -> CacheSnapshot<R> {
        CacheSnapshot {
            data: self.data.clone(),
            loading: self.in_flight > 0,
            error: self.error.clone(),
        }
    }
}

/// Cached collection for one resource kind, keyed by its endpoint path.
///
/// Cheap to clone; clones share state.
#[derive(Debug, Clone)]
pub struct ResourceCache<R: Resource> {
    gateway: Gateway,
    state: Arc<Mutex<CacheState<R>>>,
    /// Serializes first loads so concurrent callers share one request.
    load_gate: Arc<tokio::sync::Mutex<()>>,
}

impl<R: Resource> ResourceCache<R> {
    pub fn new(gateway: Gateway) -> Self {
        Self {
            gateway,
            state: Arc::new(Mutex::new(CacheState {
                data: None,
                error: None,
                in_flight: 0,
                completed: 0,
                generation: 0,
            })),
            load_gate: Arc::new(tokio::sync::Mutex::new(())),
        }
    }

    /// Endpoint path identifying this cache.
    pub fn key(&self) -> &'static str {
        R::KIND.path()
    }

    pub fn snapshot(&self) -> CacheSnapshot<R> {
        self.lock().snapshot()
    }

    /// Fetch the collection unless a fetch has already completed.
    ///
    /// Idempotent. Concurrent calls issue a single request; callers that
    /// arrive while it is in flight wait for it and return its outcome.
    pub async fn load(&self) -> CacheSnapshot<R> {
        if self.lock().completed > 0 {
            return self.snapshot();
        }

        let _gate = self.load_gate.lock().await;
        if self.lock().completed > 0 {
            return self.snapshot();
        }

        // Errors are recorded in the snapshot.
        let _ = self.fetch().await;
        self.snapshot()
    }

    /// Always fetch afresh (revalidate).
    ///
    /// On success the collection is replaced and the error flag cleared. On
    /// failure the previous collection is kept, the flag is set and the
    /// error is returned.
    pub async fn invalidate(&self) -> Result<CacheSnapshot<R>, GatewayError> {
        self.fetch().await?;
        Ok(self.snapshot())
    }

    /// Forget everything (e.g. on sign-out).
    ///
    /// A fetch still in flight is discarded when it lands.
    pub fn reset(&self) {
        let mut state = self.lock();
        state.data = None;
        state.error = None;
        state.completed = 0;
        state.generation += 1;
    }

    async fn fetch(&self) -> Result<(), GatewayError> {
        let generation = {
            let mut state = self.lock();
            state.in_flight += 1;
            state.generation
        };
        tracing::debug!(key = self.key(), "fetching collection");

        let result = self.gateway.list::<R>(self.key()).await;

        let mut state = self.lock();
        state.in_flight -= 1;
        if state.generation != generation {
            tracing::debug!(key = self.key(), "cache was reset; dropping response");
            return result.map(|_| ());
        }
        state.completed += 1;
        match result {
            Ok(records) => {
                tracing::debug!(key = self.key(), count = records.len(), "collection fetched");
                state.data = Some(records);
                state.error = None;
                Ok(())
            }
            Err(e) => {
                tracing::warn!(
                    key = self.key(),
                    error = %e,
                    kept = state.data.as_ref().map_or(0, Vec::len),
                    "collection fetch failed"
                );
                state.error = Some(
                    e.server_message()
                        .map(str::to_string)
                        .unwrap_or_else(|| format!("Failed to load {}", R::KIND.plural())),
                );
                Err(e)
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, CacheState<R>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
