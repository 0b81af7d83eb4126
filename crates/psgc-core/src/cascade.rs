// crates/psgc-core/src/cascade.rs

//! # Address cascade
//!
//! [`AddressCascade`] drives the four-level dependent selection — region →
//! province → city/municipality → barangay — against a [`PsgcClient`].
//!
//! Selection rules:
//!
//! - selecting a level clears every descendant selection, candidate list,
//!   and display field;
//! - a region on [`NO_PROVINCE_REGIONS`] skips the province tier and loads
//!   its cities directly; a region whose provinces list comes back empty is
//!   reclassified the same way at runtime;
//! - the `cities` list is populated from exactly one of the two sources —
//!   directly under a no-province region, or under a selected province.
//!
//! Overlapping selections are sequenced with per-level generation counters:
//! every selection bumps its own level's generation and every descendant's,
//! and a fetch result is applied only if the generation it was issued under
//! is still current when it resolves. A superseded response is discarded,
//! never applied — last writer wins by logical order, not arrival time.
//!
//! Lookup failures collapse to an empty candidate list here (with a `warn!`
//! for the operator); the typed error stays available one layer down on
//! [`PsgcClient::list`].

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::warn;

use crate::client::PsgcClient;
use crate::endpoint::Endpoint;
use crate::model::{Address, GeoUnit, NO_PROVINCE_REGIONS};

/// Four-level dependent selection over the division hierarchy.
///
/// Methods take `&self`; the interior state sits behind a mutex that is
/// never held across an await, so a consumer can issue overlapping
/// selections from concurrent tasks and still observe a coherent cascade.
pub struct AddressCascade {
    client: PsgcClient,
    state: Mutex<CascadeState>,
}

#[derive(Default)]
struct CascadeState {
    regions: Arc<[GeoUnit]>,
    provinces: Arc<[GeoUnit]>,
    cities: Arc<[GeoUnit]>,
    barangays: Arc<[GeoUnit]>,

    region_code: Option<String>,
    province_code: Option<String>,
    city_code: Option<String>,

    no_province: bool,

    loading_provinces: bool,
    loading_cities: bool,
    loading_barangays: bool,

    // Bumped on selection; a fetch may only apply its result while the
    // generation it captured at issue time is still current.
    region_gen: u64,
    province_gen: u64,
    city_gen: u64,

    address: Address,
}

/// A coherent copy of the whole cascade at one instant.
#[derive(Debug, Clone)]
pub struct CascadeSnapshot {
    pub regions: Arc<[GeoUnit]>,
    pub provinces: Arc<[GeoUnit]>,
    pub cities: Arc<[GeoUnit]>,
    pub barangays: Arc<[GeoUnit]>,
    pub region_code: Option<String>,
    pub province_code: Option<String>,
    pub city_code: Option<String>,
    pub no_province: bool,
    pub loading_provinces: bool,
    pub loading_cities: bool,
    pub loading_barangays: bool,
    pub address: Address,
}

impl AddressCascade {
    pub fn new(client: PsgcClient) -> Self {
        Self {
            client,
            state: Mutex::new(CascadeState::default()),
        }
    }

    /// The client this cascade resolves through.
    pub fn client(&self) -> &PsgcClient {
        &self.client
    }

    /// Loads the full region list. Call once when the consuming form opens.
    ///
    /// Returns the (possibly empty) list it applied.
    pub async fn load_regions(&self) -> Arc<[GeoUnit]> {
        let regions = self.list_or_empty(Endpoint::Regions).await;
        self.state.lock().regions = Arc::clone(&regions);
        regions
    }

    /// Selects a region; clears province/city/barangay selections and
    /// display fields, then loads the next level down.
    ///
    /// For a region on the static no-province list, cities are fetched
    /// directly. Otherwise provinces are fetched first; an empty provinces
    /// list reclassifies the region as province-less and cities are fetched
    /// directly after all.
    pub async fn select_region(&self, code: &str, name: &str) {
        let (generation, no_province) = {
            let mut st = self.state.lock();
            st.region_gen += 1;
            st.province_gen += 1;
            st.city_gen += 1;

            st.region_code = Some(code.to_string());
            st.province_code = None;
            st.city_code = None;
            st.provinces = Arc::default();
            st.cities = Arc::default();
            st.barangays = Arc::default();
            st.no_province = NO_PROVINCE_REGIONS.contains(&code);

            st.address.region = name.to_string();
            st.address.province.clear();
            st.address.city.clear();
            st.address.barangay.clear();

            st.loading_provinces = !st.no_province;
            st.loading_cities = st.no_province;
            st.loading_barangays = false;

            (st.region_gen, st.no_province)
        };

        if no_province {
            self.load_region_cities(code, generation).await;
            return;
        }

        let provinces = self
            .list_or_empty(Endpoint::Provinces { region: code.to_string() })
            .await;

        if provinces.is_empty() {
            // Not on the static list, but the service knows no provinces
            // under it: treat as province-less and go straight to cities.
            {
                let mut st = self.state.lock();
                if st.region_gen != generation {
                    return;
                }
                st.no_province = true;
                st.loading_provinces = false;
                st.loading_cities = true;
            }
            self.load_region_cities(code, generation).await;
            return;
        }

        let mut st = self.state.lock();
        if st.region_gen == generation {
            st.provinces = provinces;
            st.loading_provinces = false;
        }
    }

    /// Selects a province; clears city/barangay state and loads its cities.
    pub async fn select_province(&self, code: &str, name: &str) {
        let generation = {
            let mut st = self.state.lock();
            st.province_gen += 1;
            st.city_gen += 1;

            st.province_code = Some(code.to_string());
            st.city_code = None;
            st.cities = Arc::default();
            st.barangays = Arc::default();

            st.address.province = name.to_string();
            st.address.city.clear();
            st.address.barangay.clear();

            st.loading_cities = true;
            st.loading_barangays = false;

            st.province_gen
        };

        let cities = self
            .list_or_empty(Endpoint::ProvinceCities { province: code.to_string() })
            .await;

        let mut st = self.state.lock();
        if st.province_gen == generation {
            st.cities = cities;
            st.loading_cities = false;
        }
    }

    /// Selects a city/municipality; clears the barangay and loads its
    /// barangay list.
    pub async fn select_city(&self, code: &str, name: &str) {
        let generation = {
            let mut st = self.state.lock();
            st.city_gen += 1;

            st.city_code = Some(code.to_string());
            st.barangays = Arc::default();

            st.address.city = name.to_string();
            st.address.barangay.clear();

            st.loading_barangays = true;

            st.city_gen
        };

        let barangays = self
            .list_or_empty(Endpoint::Barangays { city: code.to_string() })
            .await;

        let mut st = self.state.lock();
        if st.city_gen == generation {
            st.barangays = barangays;
            st.loading_barangays = false;
        }
    }

    /// Sets the barangay display name. Barangay is the leaf: no code is
    /// retained and nothing further cascades.
    pub fn set_barangay(&self, name: &str) {
        self.state.lock().address.barangay = name.to_string();
    }

    pub fn regions(&self) -> Arc<[GeoUnit]> {
        Arc::clone(&self.state.lock().regions)
    }

    pub fn provinces(&self) -> Arc<[GeoUnit]> {
        Arc::clone(&self.state.lock().provinces)
    }

    pub fn cities(&self) -> Arc<[GeoUnit]> {
        Arc::clone(&self.state.lock().cities)
    }

    pub fn barangays(&self) -> Arc<[GeoUnit]> {
        Arc::clone(&self.state.lock().barangays)
    }

    pub fn region_code(&self) -> Option<String> {
        self.state.lock().region_code.clone()
    }

    pub fn province_code(&self) -> Option<String> {
        self.state.lock().province_code.clone()
    }

    pub fn city_code(&self) -> Option<String> {
        self.state.lock().city_code.clone()
    }

    /// True when the selected region skips the province tier.
    pub fn no_province(&self) -> bool {
        self.state.lock().no_province
    }

    pub fn loading_provinces(&self) -> bool {
        self.state.lock().loading_provinces
    }

    pub fn loading_cities(&self) -> bool {
        self.state.lock().loading_cities
    }

    pub fn loading_barangays(&self) -> bool {
        self.state.lock().loading_barangays
    }

    /// The resolved display address, kept in sync with every setter.
    pub fn address(&self) -> Address {
        self.state.lock().address.clone()
    }

    pub fn snapshot(&self) -> CascadeSnapshot {
        let st = self.state.lock();
        CascadeSnapshot {
            regions: Arc::clone(&st.regions),
            provinces: Arc::clone(&st.provinces),
            cities: Arc::clone(&st.cities),
            barangays: Arc::clone(&st.barangays),
            region_code: st.region_code.clone(),
            province_code: st.province_code.clone(),
            city_code: st.city_code.clone(),
            no_province: st.no_province,
            loading_provinces: st.loading_provinces,
            loading_cities: st.loading_cities,
            loading_barangays: st.loading_barangays,
            address: st.address.clone(),
        }
    }

    /// Fetches cities directly under a region (no-province path) and applies
    /// them if the selection is still current.
    async fn load_region_cities(&self, region: &str, generation: u64) {
        let cities = self
            .list_or_empty(Endpoint::RegionCities { region: region.to_string() })
            .await;

        let mut st = self.state.lock();
        if st.region_gen == generation {
            st.cities = cities;
            st.loading_cities = false;
        }
    }

    /// Fail-soft collapse: any lookup error becomes an empty candidate list.
    async fn list_or_empty(&self, endpoint: Endpoint) -> Arc<[GeoUnit]> {
        match self.client.list(&endpoint).await {
            Ok(units) => units,
            Err(err) => {
                warn!(path = %endpoint.path(), %err, "lookup failed, presenting empty list");
                Arc::default()
            }
        }
    }
}
