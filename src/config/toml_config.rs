use crate::config::{
    validate_job_settings, StorageSettings, DEFAULT_API_BASE_URL, DEFAULT_BUCKET,
    DEFAULT_CONCURRENT_REQUESTS, DEFAULT_KEY_PREFIX, DEFAULT_TIMEOUT_SECONDS,
};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::Validate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Job settings loaded from a TOML file. Every section is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub source: SourceConfig,
    pub extract: ExtractConfig,
    pub load: LoadConfig,
    pub storage: StorageSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub api_base_url: String,
    pub timeout_seconds: u64,
    pub fields: Vec<String>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            fields: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    pub concurrent_requests: usize,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            concurrent_requests: DEFAULT_CONCURRENT_REQUESTS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadConfig {
    pub bucket: String,
    pub prefix: String,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            bucket: DEFAULT_BUCKET.to_string(),
            prefix: DEFAULT_KEY_PREFIX.to_string(),
        }
    }
}

impl TomlConfig {
    /// Loads and parses a TOML config file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(EtlError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| EtlError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value. Unset variables are left as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").map_err(|e| EtlError::ConfigError {
            message: format!("env substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.into_owned())
    }

    pub fn storage_settings(&self) -> StorageSettings {
        self.storage.clone()
    }
}

impl ConfigProvider for TomlConfig {
    fn api_base_url(&self) -> &str {
        &self.source.api_base_url
    }

    fn bucket(&self) -> &str {
        &self.load.bucket
    }

    fn key_prefix(&self) -> &str {
        &self.load.prefix
    }

    fn concurrent_requests(&self) -> usize {
        self.extract.concurrent_requests
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.source.timeout_seconds)
    }

    fn country_fields(&self) -> &[String] {
        &self.source.fields
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validate_job_settings(self)?;
        self.storage.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = TomlConfig::from_toml_str("").unwrap();
        assert_eq!(config.api_base_url(), "https://restcountries.com");
        assert_eq!(config.bucket(), "countries-extraction");
        assert_eq!(config.key_prefix(), "countries");
        assert_eq!(config.concurrent_requests(), 10);
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
        assert_eq!(config.storage_settings(), StorageSettings::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_full_file() {
        let config = TomlConfig::from_toml_str(
            r#"
[source]
api_base_url = "http://localhost:9000"
timeout_seconds = 30
fields = ["name", "translations"]

[extract]
concurrent_requests = 4

[load]
bucket = "snapshots"
prefix = "raw/countries"

[storage]
local_output = "./output"
"#,
        )
        .unwrap();

        assert_eq!(config.api_base_url(), "http://localhost:9000");
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.country_fields(), ["name", "translations"]);
        assert_eq!(config.concurrent_requests(), 4);
        assert_eq!(config.bucket(), "snapshots");
        assert_eq!(config.key_prefix(), "raw/countries");
        assert_eq!(config.storage.local_output.as_deref(), Some("./output"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_substitution() {
        std::env::set_var("COUNTRIES_ETL_TEST_BUCKET", "from-env-bucket");
        let config = TomlConfig::from_toml_str(
            r#"
[load]
bucket = "${COUNTRIES_ETL_TEST_BUCKET}"
prefix = "${COUNTRIES_ETL_TEST_UNSET_PREFIX}"
"#,
        )
        .unwrap();

        assert_eq!(config.bucket(), "from-env-bucket");
        assert_eq!(config.key_prefix(), "${COUNTRIES_ETL_TEST_UNSET_PREFIX}");
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let result = TomlConfig::from_toml_str("[load\nbucket = 1");
        assert!(matches!(
            result,
            Err(EtlError::ConfigValidationError { .. })
        ));
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let config = TomlConfig::from_toml_str(
            r#"
[extract]
concurrent_requests = 500
"#,
        )
        .unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_dot_segments_in_prefix() {
        let config = TomlConfig::from_toml_str(
            r#"
[load]
prefix = "a/../b"
"#,
        )
        .unwrap();
        assert!(matches!(
            config.validate(),
            Err(EtlError::InvalidConfigValueError { .. })
        ));
    }
}
