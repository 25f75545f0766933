pub mod cli;
pub mod toml_config;

use crate::core::directory::LoadOptions;
use crate::core::ranker::DedupPolicy;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};

#[cfg(feature = "cli")]
use crate::core::ranker::DEFAULT_TOP_N;
#[cfg(feature = "cli")]
use toml_config::TomlConfig;

pub const DEFAULT_ZIPS_PATH: &str = "uszips.json";

#[cfg(feature = "cli")]
#[derive(Debug, Clone, clap::Parser)]
#[command(name = "zip-gazetteer")]
#[command(about = "Look up zip codes for a US city and list the nearest cities")]
pub struct CliConfig {
    /// City name, matched exactly (case-sensitive)
    #[arg(required_unless_present = "zip")]
    pub city: Option<String>,

    /// Two-letter state abbreviation
    pub state: Option<String>,

    /// Zip source file (.csv or converted .json)
    #[arg(long)]
    pub zips: Option<String>,

    /// Number of nearest cities to list
    #[arg(long)]
    pub top_n: Option<usize>,

    /// Treat same-named cities in different states as one city
    #[arg(long)]
    pub by_name: bool,

    /// Reverse lookup: print the city and state of a zip code
    #[arg(long, conflicts_with = "city")]
    pub zip: Option<String>,

    /// Fail on duplicate zip codes in the source
    #[arg(long)]
    pub strict_zips: bool,

    /// Optional TOML config file
    #[arg(long)]
    pub config: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

/// Query settings after merging the command line over the config file.
#[derive(Debug, Clone, PartialEq)]
pub struct QuerySettings {
    pub zips_path: String,
    pub top_n: usize,
    pub policy: DedupPolicy,
    pub load_options: LoadOptions,
}

#[cfg(feature = "cli")]
impl CliConfig {
    pub fn settings(&self, file: Option<&TomlConfig>) -> QuerySettings {
        let zips_path = self
            .zips
            .clone()
            .or_else(|| file.and_then(|f| f.data.zips.clone()))
            .unwrap_or_else(|| DEFAULT_ZIPS_PATH.to_string());

        let top_n = self
            .top_n
            .or_else(|| file.and_then(|f| f.query.top_n))
            .unwrap_or(DEFAULT_TOP_N);

        let policy = if self.by_name {
            DedupPolicy::CityName
        } else {
            file.and_then(TomlConfig::dedup_policy).unwrap_or_default()
        };

        let reject_duplicate_zips = self.strict_zips
            || file
                .and_then(|f| f.data.reject_duplicate_zips)
                .unwrap_or(false);

        QuerySettings {
            zips_path,
            top_n,
            policy,
            load_options: LoadOptions {
                reject_duplicate_zips,
            },
        }
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        if self.zip.is_none() {
            validation::validate_required_field("city", &self.city)?;
        }
        if let Some(zips) = &self.zips {
            validation::validate_path("zips", zips)?;
            validation::validate_file_extension("zips", zips, &["csv", "json"])?;
        }
        if let Some(top_n) = self.top_n {
            validation::validate_positive_number("top_n", top_n, 1)?;
        }
        if let Some(config) = &self.config {
            validation::validate_path("config", config)?;
        }
        Ok(())
    }
}

impl Validate for QuerySettings {
    fn validate(&self) -> Result<()> {
        validation::validate_path("zips", &self.zips_path)?;
        validation::validate_file_extension("zips", &self.zips_path, &["csv", "json"])?;
        validation::validate_positive_number("top_n", self.top_n, 1)
    }
}
