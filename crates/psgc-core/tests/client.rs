//! Cache and coalescing behavior of `PsgcClient`.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use psgc_core::{Endpoint, GeoUnit, LookupTransport, PsgcClient, PsgcError};

/// Serves scripted responses after a fixed delay, counting every call.
struct ScriptedTransport {
    responses: HashMap<String, Vec<GeoUnit>>,
    delay: Duration,
    calls: AtomicUsize,
}

impl ScriptedTransport {
    fn new(delay: Duration) -> Self {
        Self {
            responses: HashMap::new(),
            delay,
            calls: AtomicUsize::new(0),
        }
    }

    fn respond(mut self, endpoint: &Endpoint, units: &[(&str, &str)]) -> Self {
        self.responses.insert(
            endpoint.path(),
            units.iter().map(|(c, n)| GeoUnit::new(*c, *n)).collect(),
        );
        self
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LookupTransport for ScriptedTransport {
    async fn fetch(&self, path: &str) -> psgc_core::Result<Vec<GeoUnit>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.responses.get(path).cloned().ok_or(PsgcError::Status {
            status: 404,
            path: path.to_string(),
        })
    }
}

/// Fails the first call, succeeds afterwards.
struct FlakyTransport {
    calls: AtomicUsize,
}

#[async_trait]
impl LookupTransport for FlakyTransport {
    async fn fetch(&self, _path: &str) -> psgc_core::Result<Vec<GeoUnit>> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        if n == 0 {
            Err(PsgcError::Network("connection reset".into()))
        } else {
            Ok(vec![GeoUnit::new("130000000", "NCR")])
        }
    }
}

fn names(units: &[GeoUnit]) -> Vec<&str> {
    units.iter().map(|u| u.name.as_str()).collect()
}

#[tokio::test]
async fn lists_are_sorted_by_folded_name() {
    let transport = Arc::new(ScriptedTransport::new(Duration::ZERO).respond(
        &Endpoint::Regions,
        &[("1", "Quezon City"), ("2", "Caloocan")],
    ));
    let client = PsgcClient::with_transport(transport);

    let regions = client.list(&Endpoint::Regions).await.unwrap();
    assert_eq!(names(&regions), vec!["Caloocan", "Quezon City"]);
}

#[tokio::test]
async fn second_call_is_answered_from_cache() {
    let transport = Arc::new(
        ScriptedTransport::new(Duration::ZERO)
            .respond(&Endpoint::Regions, &[("130000000", "NCR")]),
    );
    let client = PsgcClient::with_transport(transport.clone());

    let first = client.list(&Endpoint::Regions).await.unwrap();
    let second = client.list(&Endpoint::Regions).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(transport.calls(), 1);

    let stats = client.stats();
    assert_eq!(stats.entries, 1);
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.hits, 1);
}

#[tokio::test]
async fn concurrent_identical_requests_share_one_fetch() {
    let transport = Arc::new(
        ScriptedTransport::new(Duration::from_millis(20))
            .respond(&Endpoint::Regions, &[("130000000", "NCR")]),
    );
    let client = PsgcClient::with_transport(transport.clone());

    let (a, b) = tokio::join!(client.list(&Endpoint::Regions), client.list(&Endpoint::Regions));

    assert_eq!(a.unwrap(), b.unwrap());
    assert_eq!(transport.calls(), 1);
    assert_eq!(client.stats().coalesced, 1);
}

#[tokio::test]
async fn coalesced_waiters_see_the_same_failure() {
    // Nothing scripted: every fetch 404s after the delay.
    let transport = Arc::new(ScriptedTransport::new(Duration::from_millis(20)));
    let client = PsgcClient::with_transport(transport.clone());

    let endpoint = Endpoint::Provinces {
        region: "010000000".into(),
    };
    let (a, b) = tokio::join!(client.list(&endpoint), client.list(&endpoint));

    let expected = PsgcError::Status {
        status: 404,
        path: endpoint.path(),
    };
    assert_eq!(a.unwrap_err(), expected);
    assert_eq!(b.unwrap_err(), expected);
    assert_eq!(transport.calls(), 1);
}

#[tokio::test]
async fn failures_are_not_cached() {
    let transport = Arc::new(FlakyTransport {
        calls: AtomicUsize::new(0),
    });
    let client = PsgcClient::with_transport(transport.clone());

    assert!(client.list(&Endpoint::Regions).await.is_err());

    // The failed outcome must not stick; the retry reaches the transport.
    let regions = client.list(&Endpoint::Regions).await.unwrap();
    assert_eq!(names(&regions), vec!["NCR"]);
    assert_eq!(transport.calls.load(Ordering::SeqCst), 2);
    assert_eq!(client.stats().entries, 1);
}

#[tokio::test]
async fn distinct_keys_fetch_independently() {
    let transport = Arc::new(
        ScriptedTransport::new(Duration::ZERO)
            .respond(&Endpoint::Regions, &[("130000000", "NCR")])
            .respond(
                &Endpoint::Provinces {
                    region: "010000000".into(),
                },
                &[("012800000", "Ilocos Norte")],
            ),
    );
    let client = PsgcClient::with_transport(transport.clone());

    client.list(&Endpoint::Regions).await.unwrap();
    client
        .list(&Endpoint::Provinces {
            region: "010000000".into(),
        })
        .await
        .unwrap();

    assert_eq!(transport.calls(), 2);
    assert_eq!(client.stats().entries, 2);
}
