// crates/psgc-core/src/lib.rs

pub mod cascade;
pub mod client;
pub mod endpoint;
pub mod error;
pub mod model;
pub mod text;
pub mod traits;
pub mod transport;

// Re-exports
pub use crate::cascade::{AddressCascade, CascadeSnapshot};
pub use crate::client::PsgcClient;
pub use crate::endpoint::Endpoint;
pub use crate::error::{PsgcError, Result};
pub use crate::model::{Address, CacheStats, GeoUnit, NO_PROVINCE_REGIONS};
pub use crate::text::fold_key;
pub use crate::traits::NameMatch;
pub use crate::transport::{HttpTransport, LookupTransport, DEFAULT_BASE_URL};
