use clap::{Parser, Subcommand};

/// CLI arguments for psgc-cli
#[derive(Debug, Parser)]
#[command(
    name = "psgc",
    version,
    about = "CLI for browsing Philippine Standard Geographic Code divisions"
)]
pub struct CliArgs {
    /// Base URL of the lookup service
    #[arg(long = "base-url", global = true)]
    pub base_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List all regions
    Regions,

    /// List provinces under a region
    Provinces {
        /// PSGC code of the region (e.g. 010000000)
        region: String,
    },

    /// List cities/municipalities under a region or under a province
    Cities {
        /// PSGC code of a province-less region
        #[arg(long, conflicts_with = "province")]
        region: Option<String>,

        /// PSGC code of a province
        #[arg(long)]
        province: Option<String>,
    },

    /// List barangays under a city/municipality
    Barangays {
        /// PSGC code of the city/municipality
        city: String,
    },

    /// Resolve a full address by walking the cascade
    ///
    /// Each level accepts a PSGC code or a name (case- and
    /// accent-insensitive).
    Resolve {
        /// Region code or name
        #[arg(long)]
        region: String,

        /// Province code or name (omit for province-less regions)
        #[arg(long)]
        province: Option<String>,

        /// City/municipality code or name
        #[arg(long)]
        city: String,

        /// Barangay name
        #[arg(long)]
        barangay: Option<String>,
    },
}
