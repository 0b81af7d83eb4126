// crates/psgc-core/src/transport.rs

//! # Transport
//!
//! The network seam. [`LookupTransport`] is the only thing in this crate
//! that touches a socket; everything above it (client, cascade) is driven
//! through the trait, which keeps the caching and cascade logic testable
//! against in-memory fakes.

use async_trait::async_trait;

use crate::error::{PsgcError, Result};
use crate::model::GeoUnit;

/// Public instance of the PSGC lookup service.
pub const DEFAULT_BASE_URL: &str = "https://psgc.gitlab.io/api";

/// Fetches one list of divisions from the hierarchical lookup service.
///
/// Implementations receive a fully-qualified service path (see
/// [`crate::endpoint::Endpoint::path`]) and return the raw, unsorted list.
#[async_trait]
pub trait LookupTransport: Send + Sync + 'static {
    async fn fetch(&self, path: &str) -> Result<Vec<GeoUnit>>;
}

/// HTTP implementation over `reqwest`.
///
/// Plain GET, no body, no authentication. No request timeout either: a
/// hung request leaves the owning level's loading flag up until it
/// resolves, matching the service contract.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[async_trait]
impl LookupTransport for HttpTransport {
    async fn fetch(&self, path: &str) -> Result<Vec<GeoUnit>> {
        let url = format!("{}{}", self.base_url, path);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| PsgcError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PsgcError::Status {
                status: status.as_u16(),
                path: path.to_string(),
            });
        }

        response
            .json::<Vec<GeoUnit>>()
            .await
            .map_err(|e| PsgcError::Parse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_trimmed() {
        let t = HttpTransport::new("https://example.test/api/");
        assert_eq!(t.base_url(), "https://example.test/api");
    }
}
