// crates/psgc-core/src/client.rs

//! # Lookup client
//!
//! [`PsgcClient`] wraps a [`LookupTransport`] with the two tables the
//! cascade depends on:
//!
//! - the **list cache**: request key → sorted list. Entries are immutable
//!   and never evicted; the backing dataset (country subdivisions) is small
//!   and static, so unbounded growth over a process lifetime is fine.
//! - the **in-flight table**: request key → pending fetch. At most one
//!   network request per unique key is active at a time; concurrent callers
//!   of the same key await the same fetch and receive the same outcome.
//!
//! Failures are delivered to every waiter but are *not* cached — a later
//! call for the same key reaches the transport again.
//!
//! The client is explicitly constructed and cheaply cloneable; clones share
//! the same tables, so concurrent forms naturally share one cache. For the
//! ambient-singleton lifecycle there is an opt-in [`PsgcClient::shared`].

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use futures::future::{BoxFuture, Shared};
use futures::FutureExt;
use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use tracing::debug;

use crate::endpoint::Endpoint;
use crate::error::Result;
use crate::model::{CacheStats, GeoUnit};
use crate::text::fold_key;
use crate::transport::{HttpTransport, LookupTransport};

/// One pending fetch, shareable between every caller of its key.
type SharedFetch = Shared<BoxFuture<'static, Result<Arc<[GeoUnit]>>>>;

static SHARED: OnceCell<PsgcClient> = OnceCell::new();

/// Cached, coalescing client for the hierarchical division service.
#[derive(Clone)]
pub struct PsgcClient {
    inner: Arc<Inner>,
}

struct Inner {
    transport: Arc<dyn LookupTransport>,
    cache: Mutex<HashMap<String, Arc<[GeoUnit]>>>,
    in_flight: Mutex<HashMap<String, SharedFetch>>,
    hits: AtomicU64,
    misses: AtomicU64,
    coalesced: AtomicU64,
}

impl PsgcClient {
    pub fn new(transport: impl LookupTransport) -> Self {
        Self::with_transport(Arc::new(transport))
    }

    pub fn with_transport(transport: Arc<dyn LookupTransport>) -> Self {
        Self {
            inner: Arc::new(Inner {
                transport,
                cache: Mutex::new(HashMap::new()),
                in_flight: Mutex::new(HashMap::new()),
                hits: AtomicU64::new(0),
                misses: AtomicU64::new(0),
                coalesced: AtomicU64::new(0),
            }),
        }
    }

    /// Process-wide client over the default HTTP transport.
    ///
    /// The tables live for the rest of the process and are shared across
    /// every concurrent consumer, so independent forms benefit from each
    /// other's fetches. Prefer constructing a client per dependency graph
    /// in anything that needs isolation (tests, most of all).
    pub fn shared() -> &'static PsgcClient {
        SHARED.get_or_init(|| PsgcClient::new(HttpTransport::default()))
    }

    /// Fetches one candidate list, going to the network at most once per key.
    ///
    /// Lists are sorted ascending by [`fold_key`] of the display name before
    /// they are cached or returned.
    pub async fn list(&self, endpoint: &Endpoint) -> Result<Arc<[GeoUnit]>> {
        let key = endpoint.path();

        if let Some(cached) = self.inner.cache.lock().get(&key).cloned() {
            self.inner.hits.fetch_add(1, Ordering::Relaxed);
            debug!(key = %key, "list cache hit");
            return Ok(cached);
        }

        let fetch = {
            let mut in_flight = self.inner.in_flight.lock();
            // Re-check under the in-flight lock: the fetch that was pending
            // at the first check may have just landed in the cache.
            if let Some(cached) = self.inner.cache.lock().get(&key).cloned() {
                self.inner.hits.fetch_add(1, Ordering::Relaxed);
                return Ok(cached);
            }
            match in_flight.get(&key) {
                Some(pending) => {
                    self.inner.coalesced.fetch_add(1, Ordering::Relaxed);
                    debug!(key = %key, "joining in-flight fetch");
                    pending.clone()
                }
                None => {
                    self.inner.misses.fetch_add(1, Ordering::Relaxed);
                    debug!(key = %key, "issuing fetch");
                    let fetch = Self::start_fetch(&self.inner, key.clone());
                    in_flight.insert(key, fetch.clone());
                    fetch
                }
            }
        };

        fetch.await
    }

    /// Builds the one future every caller of `key` will share.
    ///
    /// Cache insertion and in-flight removal happen inside the future body,
    /// so they run exactly once no matter how many callers await it. The
    /// body holds only a `Weak` back-reference; a fetch outliving its
    /// client simply drops its result.
    fn start_fetch(inner: &Arc<Inner>, key: String) -> SharedFetch {
        let transport = Arc::clone(&inner.transport);
        let weak = Arc::downgrade(inner);

        async move {
            let outcome = transport.fetch(&key).await.map(|mut units| {
                units.sort_by_cached_key(|u| fold_key(&u.name));
                Arc::<[GeoUnit]>::from(units)
            });

            if let Some(inner) = Weak::upgrade(&weak) {
                if let Ok(units) = &outcome {
                    inner.cache.lock().insert(key.clone(), Arc::clone(units));
                }
                inner.in_flight.lock().remove(&key);
            }

            outcome
        }
        .boxed()
        .shared()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.inner.cache.lock().len(),
            hits: self.inner.hits.load(Ordering::Relaxed),
            misses: self.inner.misses.load(Ordering::Relaxed),
            coalesced: self.inner.coalesced.load(Ordering::Relaxed),
        }
    }
}
