// crates/psgc-core/src/error.rs
use thiserror::Error;

/// Errors produced while talking to the lookup service.
///
/// The enum is `Clone`: a coalesced fetch resolves once and its outcome is
/// handed to every waiter, so the variants carry rendered messages rather
/// than the underlying (non-cloneable) source errors.
///
/// Callers that only drive dropdowns collapse any of these to an empty
/// candidate list; see [`crate::cascade::AddressCascade`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PsgcError {
    /// The request never produced a response (DNS, connect, I/O).
    #[error("network failure: {0}")]
    Network(String),

    /// The service answered with a non-2xx status.
    #[error("lookup service returned HTTP {status} for {path}")]
    Status { status: u16, path: String },

    /// The response body was not a JSON list of divisions.
    #[error("unparsable response: {0}")]
    Parse(String),
}

pub type Result<T> = std::result::Result<T, PsgcError>;
