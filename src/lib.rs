pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{cli::LocalStorage, toml_config::TomlConfig, QuerySettings};

pub use core::directory::{LoadOptions, ZipDirectory};
pub use core::etl::EtlEngine;
pub use core::query::{resolve_city, resolve_zip, write_zip_lookup, CityReport};
pub use core::ranker::{find_closest_cities, DedupPolicy, DEFAULT_TOP_N};
pub use core::reducer::{CsvImport, DatasetKind, FeatureReducer};
pub use domain::model::{CityState, RankedCity, ReferencePoint, ZipRecord};
pub use utils::error::{GazetteerError, Result};
