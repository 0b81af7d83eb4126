// crates/psgc-core/src/model.rs
use serde::{Deserialize, Serialize};

/// A node at any administrative level: region, province,
/// city/municipality, or barangay.
///
/// Deserialized straight from the lookup service; fields beyond `code` and
/// `name` are ignored. Immutable once fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeoUnit {
    pub code: String,
    pub name: String,
}

impl GeoUnit {
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
        }
    }
}

/// The resolved human-readable address, as bound into a form submission.
///
/// Every field tracks the display name chosen at its level; selecting an
/// ancestor clears all descendant fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub region: String,
    pub province: String,
    pub city: String,
    pub barangay: String,
}

/// Region codes whose structure omits the province tier, going directly
/// from region to city/municipality.
///
/// Currently only the National Capital Region. Regions outside this list
/// can still turn out province-less at runtime when their provinces list
/// comes back empty.
pub const NO_PROVINCE_REGIONS: &[&str] = &["130000000"];

/// Aggregate counters for the list cache.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CacheStats {
    /// Distinct request keys currently cached.
    pub entries: usize,
    /// Calls answered from the cache.
    pub hits: u64,
    /// Calls that issued a network fetch.
    pub misses: u64,
    /// Calls that joined an already-pending fetch for the same key.
    pub coalesced: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_payloads_with_extra_fields_deserialize() {
        // The live service decorates entries with island group, old names,
        // population and the like; only code and name matter here.
        let payload = r#"[
            {"code":"130000000","name":"NCR","regionName":"NCR","islandGroupCode":"luzon"},
            {"code":"010000000","name":"Region I","regionName":"Ilocos Region","islandGroupCode":"luzon"}
        ]"#;

        let units: Vec<GeoUnit> = serde_json::from_str(payload).unwrap();
        assert_eq!(units.len(), 2);
        assert_eq!(units[0], GeoUnit::new("130000000", "NCR"));
    }
}
