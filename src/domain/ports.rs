use crate::domain::model::{CountryRecord, LoadReport, Snapshot, TranslationRecord};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Object storage addressed by bucket and key.
pub trait Storage: Send + Sync {
    fn read_object(
        &self,
        bucket: &str,
        key: &str,
    ) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_object(
        &self,
        bucket: &str,
        key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn api_base_url(&self) -> &str;
    fn bucket(&self) -> &str;
    fn key_prefix(&self) -> &str;
    fn concurrent_requests(&self) -> usize;
    fn request_timeout(&self) -> Duration;
    /// Optional `fields` filter for the all-countries request.
    fn country_fields(&self) -> &[String];
}

/// Remote source of country data. The tagged `try_*` calls are required;
/// the soft variants log and degrade to empty/absent.
#[async_trait]
pub trait CountrySource: Send + Sync {
    async fn try_fetch_countries(&self) -> Result<Vec<CountryRecord>>;
    async fn try_fetch_translation(&self, name: &str) -> Result<TranslationRecord>;

    async fn fetch_countries(&self) -> Vec<CountryRecord> {
        match self.try_fetch_countries().await {
            Ok(countries) => countries,
            Err(e) => {
                tracing::error!("Failed to fetch countries: {}", e);
                Vec::new()
            }
        }
    }

    async fn fetch_translation(&self, name: &str) -> Option<TranslationRecord> {
        match self.try_fetch_translation(name).await {
            Ok(translation) => Some(translation),
            Err(e) => {
                tracing::warn!("Failed to fetch translation for '{}': {}", name, e);
                None
            }
        }
    }
}

/// The three run phases driven by `EtlEngine`.
#[async_trait]
pub trait Pipeline: Send + Sync {
    /// An error here aborts the run before anything is written.
    async fn extract(&self) -> Result<Vec<CountryRecord>>;
    async fn transform(&self, countries: &[CountryRecord]) -> Result<Vec<TranslationRecord>>;
    async fn load(&self, snapshot: &Snapshot) -> Result<LoadReport>;
}
