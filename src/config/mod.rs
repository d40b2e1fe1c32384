pub mod cli;
#[cfg(feature = "lambda")]
pub mod lambda;
#[cfg(feature = "s3")]
pub mod s3;
pub mod toml_config;

use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_API_BASE_URL: &str = "https://restcountries.com";
pub const DEFAULT_BUCKET: &str = "countries-extraction";
pub const DEFAULT_KEY_PREFIX: &str = "countries";
pub const DEFAULT_CONCURRENT_REQUESTS: usize = 10;
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 10;

/// Checks shared by every configuration source.
pub fn validate_job_settings<C: ConfigProvider + ?Sized>(config: &C) -> Result<()> {
    validation::validate_url("api_base_url", config.api_base_url())?;
    validation::validate_s3_bucket_name("bucket", config.bucket())?;
    validation::validate_key_prefix("prefix", config.key_prefix())?;
    validation::validate_range("concurrent_requests", config.concurrent_requests(), 1, 100)?;
    validation::validate_range(
        "timeout_seconds",
        config.request_timeout().as_secs(),
        1,
        300,
    )?;
    for field in config.country_fields() {
        validation::validate_non_empty_string("fields", field)?;
    }
    Ok(())
}

/// Where the snapshot goes. `local_output` takes precedence over S3.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageSettings {
    pub local_output: Option<String>,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>,
}

impl StorageSettings {
    /// Values set in `overrides` replace ours.
    pub fn merged_with(self, overrides: StorageSettings) -> Self {
        Self {
            local_output: overrides.local_output.or(self.local_output),
            s3_region: overrides.s3_region.or(self.s3_region),
            s3_endpoint: overrides.s3_endpoint.or(self.s3_endpoint),
        }
    }
}

impl Validate for StorageSettings {
    fn validate(&self) -> Result<()> {
        if let Some(dir) = &self.local_output {
            validation::validate_path("local_output", dir)?;
        }
        if let Some(region) = &self.s3_region {
            validation::validate_aws_region("s3_region", region)?;
        }
        if let Some(endpoint) = &self.s3_endpoint {
            validation::validate_url("s3_endpoint", endpoint)?;
        }
        Ok(())
    }
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, clap::Parser)]
#[command(name = "countries-etl")]
#[command(about = "Snapshot REST Countries data and translations into object storage")]
pub struct CliConfig {
    #[arg(long, default_value = DEFAULT_API_BASE_URL)]
    pub api_base_url: String,

    #[arg(long, default_value = DEFAULT_BUCKET)]
    pub bucket: String,

    #[arg(long, default_value = DEFAULT_KEY_PREFIX)]
    pub prefix: String,

    #[arg(long, default_value_t = DEFAULT_CONCURRENT_REQUESTS)]
    pub concurrent_requests: usize,

    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECONDS)]
    pub timeout_seconds: u64,

    #[arg(long, value_delimiter = ',', help = "Restrict the all-countries response to these fields")]
    pub fields: Vec<String>,

    #[arg(long, help = "Write to <DIR>/<bucket>/<key> instead of S3")]
    pub local_output: Option<String>,

    #[arg(long)]
    pub s3_region: Option<String>,

    #[arg(long, help = "Custom S3 endpoint, e.g. a LocalStack URL")]
    pub s3_endpoint: Option<String>,

    #[arg(long, help = "Read job settings from a TOML file")]
    pub config: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log CPU and memory usage per phase")]
    pub monitor: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    pub fn storage_settings(&self) -> StorageSettings {
        StorageSettings {
            local_output: self.local_output.clone(),
            s3_region: self.s3_region.clone(),
            s3_endpoint: self.s3_endpoint.clone(),
        }
    }
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    fn bucket(&self) -> &str {
        &self.bucket
    }

    fn key_prefix(&self) -> &str {
        &self.prefix
    }

    fn concurrent_requests(&self) -> usize {
        self.concurrent_requests
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    fn country_fields(&self) -> &[String] {
        &self.fields
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_job_settings(self)?;
        self.storage_settings().validate()?;
        if let Some(path) = &self.config {
            validation::validate_path("config", path)?;
        }
        Ok(())
    }
}
