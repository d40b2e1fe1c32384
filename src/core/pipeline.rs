use crate::core::aggregator::fetch_all_translations;
use crate::core::fetcher::CountriesClient;
use crate::core::writer::write_json;
use crate::domain::model::{
    CountryRecord, DestinationKeys, LoadReport, Snapshot, TranslationRecord,
};
use crate::domain::ports::{ConfigProvider, CountrySource, Pipeline, Storage};
use crate::utils::error::Result;
use chrono::NaiveDate;

/// Countries and translations snapshot, written under
/// `<bucket>/<prefix>/<date>/`.
pub struct CountryPipeline<Src: CountrySource, S: Storage, C: ConfigProvider> {
    source: Src,
    storage: S,
    config: C,
    partition_date: Option<NaiveDate>,
}

impl<S: Storage, C: ConfigProvider> CountryPipeline<CountriesClient, S, C> {
    /// Builds the HTTP client from `config`.
    pub fn from_config(storage: S, config: C) -> Result<Self> {
        let source = CountriesClient::from_config(&config)?;
        Ok(Self::new(source, storage, config))
    }
}

impl<Src: CountrySource, S: Storage, C: ConfigProvider> CountryPipeline<Src, S, C> {
    pub fn new(source: Src, storage: S, config: C) -> Self {
        Self {
            source,
            storage,
            config,
            partition_date: None,
        }
    }

    /// Pins the date partition instead of using today's local date.
    pub fn with_partition_date(mut self, date: NaiveDate) -> Self {
        self.partition_date = Some(date);
        self
    }

    pub fn destination_keys(&self) -> DestinationKeys {
        match self.partition_date {
            Some(date) => DestinationKeys::for_date(self.config.key_prefix(), date),
            None => DestinationKeys::today(self.config.key_prefix()),
        }
    }

    pub fn config(&self) -> &C {
        &self.config
    }
}

#[async_trait::async_trait]
impl<Src: CountrySource, S: Storage, C: ConfigProvider> Pipeline for CountryPipeline<Src, S, C> {
    async fn extract(&self) -> Result<Vec<CountryRecord>> {
        tracing::info!(
            "🚀 Fetching countries from {}",
            self.config.api_base_url()
        );
        self.source.try_fetch_countries().await
    }

    async fn transform(&self, countries: &[CountryRecord]) -> Result<Vec<TranslationRecord>> {
        Ok(fetch_all_translations(&self.source, countries, self.config.concurrent_requests()).await)
    }

    async fn load(&self, snapshot: &Snapshot) -> Result<LoadReport> {
        let bucket = self.config.bucket();
        let keys = self.destination_keys();
        let mut report = LoadReport::default();

        let ok = write_json(&self.storage, bucket, &keys.countries, &snapshot.countries).await;
        report.record(&keys.countries, ok);

        let ok =
            write_json(&self.storage, bucket, &keys.translations, &snapshot.translations).await;
        report.record(&keys.translations, ok);

        Ok(report)
    }
}
