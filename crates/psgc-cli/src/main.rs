//! psgc — Command-line interface for psgc-core
//!
//! This binary walks the Philippine administrative-division hierarchy from
//! your terminal: regions, provinces, cities/municipalities, and barangays,
//! plus a `resolve` command that drives the full address cascade the way a
//! checkout form would.
//!
//! Usage examples
//! --------------
//!
//! - List all regions
//!   $ psgc regions
//!
//! - List provinces under a region
//!   $ psgc provinces 010000000
//!
//! - List cities under a province, or directly under a province-less region
//!   $ psgc cities --province 012800000
//!   $ psgc cities --region 130000000
//!
//! - List barangays under a city/municipality
//!   $ psgc barangays 012805000
//!
//! - Resolve a full address (codes or names at every level)
//!   $ psgc resolve --region "Ilocos Region" --province "Ilocos Norte" \
//!       --city Laoag --barangay "Bacsil North"
//!   $ psgc resolve --region NCR --city "Quezon City"
//!
//! The lookup service defaults to the public PSGC instance; point
//! `--base-url` at a mirror to use another one. Set `RUST_LOG=debug` to see
//! cache and fetch traffic.
mod args;

use crate::args::{CliArgs, Commands};
use anyhow::{bail, Context};
use clap::Parser;
use psgc_core::{
    AddressCascade, Endpoint, GeoUnit, HttpTransport, NameMatch, PsgcClient, DEFAULT_BASE_URL,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = CliArgs::parse();
    let base_url = args.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL);
    let client = PsgcClient::new(HttpTransport::new(base_url));

    match args.command {
        Commands::Regions => {
            print_units(&client.list(&Endpoint::Regions).await?);
        }

        Commands::Provinces { region } => {
            let provinces = client.list(&Endpoint::Provinces { region }).await?;
            if provinces.is_empty() {
                println!("No provinces (province-less region?)");
            } else {
                print_units(&provinces);
            }
        }

        Commands::Cities { region, province } => {
            let endpoint = match (region, province) {
                (Some(region), None) => Endpoint::RegionCities { region },
                (None, Some(province)) => Endpoint::ProvinceCities { province },
                _ => bail!("pass exactly one of --region or --province"),
            };
            print_units(&client.list(&endpoint).await?);
        }

        Commands::Barangays { city } => {
            print_units(&client.list(&Endpoint::Barangays { city }).await?);
        }

        Commands::Resolve {
            region,
            province,
            city,
            barangay,
        } => {
            resolve(client, &region, province.as_deref(), &city, barangay.as_deref()).await?;
        }
    }

    Ok(())
}

fn print_units(units: &[GeoUnit]) {
    for u in units {
        println!("{}  {}", u.code, u.name);
    }
}

/// Finds a unit by code first, then by folded name, then by substring.
fn find_unit<'a>(units: &'a [GeoUnit], query: &str) -> Option<&'a GeoUnit> {
    let query = query.trim();
    units
        .iter()
        .find(|u| u.code.eq_ignore_ascii_case(query))
        .or_else(|| units.iter().find(|u| u.is_named(query)))
        .or_else(|| units.iter().find(|u| u.name_contains(query)))
}

async fn resolve(
    client: PsgcClient,
    region: &str,
    province: Option<&str>,
    city: &str,
    barangay: Option<&str>,
) -> anyhow::Result<()> {
    let cascade = AddressCascade::new(client);

    let regions = cascade.load_regions().await;
    let region_unit = find_unit(&regions, region)
        .with_context(|| format!("no region matching '{region}'"))?
        .clone();
    cascade.select_region(&region_unit.code, &region_unit.name).await;

    if cascade.no_province() {
        if province.is_some() {
            bail!("region {} has no province tier", region_unit.name);
        }
    } else {
        let Some(province_query) = province else {
            bail!("region {} requires --province", region_unit.name);
        };
        let provinces = cascade.provinces();
        let province_unit = find_unit(&provinces, province_query)
            .with_context(|| format!("no province matching '{province_query}'"))?
            .clone();
        cascade
            .select_province(&province_unit.code, &province_unit.name)
            .await;
    }

    let cities = cascade.cities();
    let city_unit = find_unit(&cities, city)
        .with_context(|| format!("no city/municipality matching '{city}'"))?
        .clone();
    cascade.select_city(&city_unit.code, &city_unit.name).await;

    if let Some(barangay_query) = barangay {
        let barangays = cascade.barangays();
        let barangay_unit = find_unit(&barangays, barangay_query)
            .with_context(|| format!("no barangay matching '{barangay_query}'"))?
            .clone();
        cascade.set_barangay(&barangay_unit.name);
    }

    let address = cascade.address();
    println!("Region:   {}", address.region);
    if !cascade.no_province() {
        println!("Province: {}", address.province);
    }
    println!("City:     {}", address.city);
    if !address.barangay.is_empty() {
        println!("Barangay: {}", address.barangay);
    }

    let stats = cascade.client().stats();
    tracing::debug!(
        entries = stats.entries,
        misses = stats.misses,
        hits = stats.hits,
        "lookup traffic"
    );

    Ok(())
}
