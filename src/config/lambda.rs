use crate::config::{
    validate_job_settings, StorageSettings, DEFAULT_API_BASE_URL, DEFAULT_CONCURRENT_REQUESTS,
    DEFAULT_KEY_PREFIX, DEFAULT_TIMEOUT_SECONDS,
};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{self, Validate};
use std::env;
use std::time::Duration;

const DEFAULT_S3_REGION: &str = "ap-southeast-2";

#[derive(Debug, Clone)]
pub struct LambdaConfig {
    pub api_base_url: String,
    pub s3_bucket: String,
    pub s3_prefix: String,
    pub s3_region: String,
    pub concurrent_requests: usize,
    pub timeout_seconds: u64,
    pub fields: Vec<String>,
}

fn parse_env<T: std::str::FromStr>(name: &str, default: T) -> Result<T> {
    match env::var(name) {
        Ok(raw) => raw.trim().parse().map_err(|_| EtlError::InvalidConfigValueError {
            field: name.to_string(),
            value: raw.clone(),
            reason: "not a valid number".to_string(),
        }),
        Err(_) => Ok(default),
    }
}

impl LambdaConfig {
    pub fn from_env() -> Result<Self> {
        let s3_bucket = env::var("S3_BUCKET").ok();
        let s3_bucket = validation::validate_required_field("S3_BUCKET", &s3_bucket)?.clone();

        Ok(Self {
            api_base_url: env::var("API_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string()),
            s3_bucket,
            s3_prefix: env::var("S3_PREFIX").unwrap_or_else(|_| DEFAULT_KEY_PREFIX.to_string()),
            s3_region: env::var("S3_REGION").unwrap_or_else(|_| DEFAULT_S3_REGION.to_string()),
            concurrent_requests: parse_env("CONCURRENT_REQUESTS", DEFAULT_CONCURRENT_REQUESTS)?,
            timeout_seconds: parse_env("TIMEOUT_SECONDS", DEFAULT_TIMEOUT_SECONDS)?,
            fields: env::var("COUNTRY_FIELDS")
                .map(|raw| {
                    raw.split(',')
                        .map(str::trim)
                        .filter(|f| !f.is_empty())
                        .map(String::from)
                        .collect()
                })
                .unwrap_or_default(),
        })
    }

    /// Event payload values win over the environment.
    pub fn with_overrides(
        mut self,
        api_base_url: Option<String>,
        s3_bucket: Option<String>,
        s3_prefix: Option<String>,
    ) -> Self {
        if let Some(url) = api_base_url {
            self.api_base_url = url;
        }
        if let Some(bucket) = s3_bucket {
            self.s3_bucket = bucket;
        }
        if let Some(prefix) = s3_prefix {
            self.s3_prefix = prefix;
        }
        self
    }

    pub fn storage_settings(&self) -> StorageSettings {
        StorageSettings {
            local_output: None,
            s3_region: Some(self.s3_region.clone()),
            s3_endpoint: env::var("S3_ENDPOINT").ok(),
        }
    }
}

impl ConfigProvider for LambdaConfig {
    fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    fn bucket(&self) -> &str {
        &self.s3_bucket
    }

    fn key_prefix(&self) -> &str {
        &self.s3_prefix
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

impl Validate for LambdaConfig {
    fn validate(&self) -> Result<()> {
        validate_job_settings(self)?;
        self.storage_settings().validate()?;

        tracing::info!("✅ Lambda configuration validation passed");
        Ok(())
    }
}
