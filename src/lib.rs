pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{cli::LocalStorage, toml_config::TomlConfig, StorageSettings};

#[cfg(feature = "lambda")]
pub use config::lambda::LambdaConfig;
#[cfg(feature = "s3")]
pub use config::s3::S3Storage;

pub use crate::core::{
    aggregator::fetch_all_translations,
    etl::{EtlEngine, RunOutcome, RunReport},
    fetcher::CountriesClient,
    pipeline::CountryPipeline,
    writer::{try_write_json, write_json},
};
pub use domain::model::{CountryRecord, DestinationKeys, LoadReport, TranslationRecord};
pub use domain::ports::{ConfigProvider, CountrySource, Storage};
pub use utils::error::{EtlError, Result};
