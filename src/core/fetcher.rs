use crate::domain::model::{CountryRecord, TranslationRecord};
use crate::domain::ports::{ConfigProvider, CountrySource};
use crate::utils::error::{EtlError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

const API_VERSION: &str = "v3.1";
const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// HTTP client for the REST Countries API.
///
/// Owns one `reqwest::Client`; its connection pool is shared by every
/// concurrent translation lookup and released when this value is dropped.
#[derive(Debug, Clone)]
pub struct CountriesClient {
    client: Client,
    base_url: Url,
    fields: Vec<String>,
}

impl CountriesClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(EtlError::ConfigError {
                message: format!("API base URL cannot carry a path: {}", base_url),
            });
        }

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            base_url,
            fields: Vec::new(),
        })
    }

    pub fn from_config<C: ConfigProvider + ?Sized>(config: &C) -> Result<Self> {
        Ok(Self::new(config.api_base_url(), config.request_timeout())?
            .with_fields(config.country_fields().to_vec()))
    }

    pub fn with_fields(mut self, fields: Vec<String>) -> Self {
        self.fields = fields;
        self
    }

    pub fn countries_url(&self) -> Url {
        let mut url = self.endpoint(&["all"]);
        if !self.fields.is_empty() {
            url.query_pairs_mut()
                .append_pair("fields", &self.fields.join(","));
        }
        url
    }

    /// `name` becomes a single percent-encoded path segment.
    pub fn translation_url(&self, name: &str) -> Url {
        self.endpoint(&["translation", name])
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // checked in `new`
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().push(API_VERSION).extend(segments);
        }
        url
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        tracing::debug!("Making API request to: {}", url);
        let response = self.client.get(url.clone()).send().await?;

        let status = response.status();
        tracing::debug!("API response status: {}", status);
        if !status.is_success() {
            return Err(EtlError::HttpStatusError {
                status,
                url: url.to_string(),
            });
        }

        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl CountrySource for CountriesClient {
    async fn try_fetch_countries(&self) -> Result<Vec<CountryRecord>> {
        let countries: Vec<CountryRecord> = self.get_json(self.countries_url()).await?;
        tracing::info!("Fetched {} countries", countries.len());
        Ok(countries)
    }

    async fn try_fetch_translation(&self, name: &str) -> Result<TranslationRecord> {
        self.get_json(self.translation_url(name)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn client_for(server: &MockServer) -> CountriesClient {
        CountriesClient::new(&server.base_url(), Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_urls() {
        let client =
            CountriesClient::new("https://restcountries.com", Duration::from_secs(10)).unwrap();
        assert_eq!(
            client.countries_url().as_str(),
            "https://restcountries.com/v3.1/all"
        );
        assert_eq!(
            client.translation_url("République fédérale").as_str(),
            "https://restcountries.com/v3.1/translation/R%C3%A9publique%20f%C3%A9d%C3%A9rale"
        );
        // a slash in a name must not open a new path segment
        assert_eq!(
            client.translation_url("A/B").as_str(),
            "https://restcountries.com/v3.1/translation/A%2FB"
        );
    }

    #[test]
    fn test_urls_keep_base_path_and_fields() {
        let client = CountriesClient::new("http://proxy.local/restcountries/", Duration::from_secs(1))
            .unwrap()
            .with_fields(vec!["name".to_string(), "translations".to_string()]);
        assert_eq!(
            client.countries_url().as_str(),
            "http://proxy.local/restcountries/v3.1/all?fields=name%2Ctranslations"
        );
    }

    #[test]
    fn test_rejects_non_base_url() {
        assert!(CountriesClient::new("mailto:someone@example.com", Duration::from_secs(1)).is_err());
        assert!(matches!(
            CountriesClient::new("not a url", Duration::from_secs(1)),
            Err(EtlError::UrlError(_))
        ));
    }

    #[tokio::test]
    async fn test_fetch_countries_success() {
        let server = MockServer::start();
        let mock_data = json!([
            {"name": {"common": "France", "official": "French Republic"},
             "translations": {"deu": {"official": "Französische Republik", "common": "Frankreich"}}},
            {"name": {"common": "Spain"}, "translations": {"fra": {"official": "Espagne"}}}
        ]);

        let api_mock = server.mock(|when, then| {
            when.method(GET).path("/v3.1/all");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(mock_data.clone());
        });

        let countries = client_for(&server).fetch_countries().await;

        api_mock.assert();
        assert_eq!(countries.len(), 2);
        assert_eq!(countries[0].common_name(), Some("France"));
        assert_eq!(countries[0].0, mock_data[0]);
    }

    #[tokio::test]
    async fn test_fetch_countries_sends_fields_filter() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/v3.1/all")
                .query_param("fields", "name,translations");
            then.status(200).json_body(json!([{"name": {"common": "Peru"}}]));
        });

        let client = client_for(&server)
            .with_fields(vec!["name".to_string(), "translations".to_string()]);
        let countries = client.fetch_countries().await;

        api_mock.assert();
        assert_eq!(countries.len(), 1);
    }

    #[tokio::test]
    async fn test_fetch_countries_http_error_is_empty() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET).path("/v3.1/all");
            then.status(404);
        });

        let client = client_for(&server);
        let countries = client.fetch_countries().await;

        api_mock.assert();
        assert!(countries.is_empty());

        match client.try_fetch_countries().await {
            Err(EtlError::HttpStatusError { status, .. }) => assert_eq!(status.as_u16(), 404),
            other => panic!("expected HTTP status error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fetch_countries_bad_body_is_empty() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/v3.1/all");
            then.status(200).body("not json");
        });

        let client = client_for(&server);
        assert!(client.fetch_countries().await.is_empty());
        assert!(matches!(
            client.try_fetch_countries().await,
            Err(EtlError::ApiError(_))
        ));
    }

    #[tokio::test]
    async fn test_fetch_countries_unreachable_is_empty() {
        // nothing listens on the discard port
        let client =
            CountriesClient::new("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();
        assert!(client.fetch_countries().await.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_countries_timeout_is_empty() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/v3.1/all");
            then.status(200)
                .delay(Duration::from_millis(1500))
                .json_body(json!([]));
        });

        let client = CountriesClient::new(&server.base_url(), Duration::from_millis(200)).unwrap();
        match client.try_fetch_countries().await {
            Err(EtlError::ApiError(e)) => assert!(e.is_timeout()),
            other => panic!("expected timeout, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fetch_translation_success() {
        let server = MockServer::start();
        let mock_data = json!([{"name": {"common": "Germany"}}]);
        let api_mock = server.mock(|when, then| {
            when.method(GET).path("/v3.1/translation/Allemagne");
            then.status(200).json_body(mock_data.clone());
        });

        let translation = client_for(&server).fetch_translation("Allemagne").await;

        api_mock.assert();
        assert_eq!(translation, Some(TranslationRecord(mock_data)));
    }

    #[tokio::test]
    async fn test_fetch_translation_failure_is_none() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET).path("/v3.1/translation/Nowhere");
            then.status(404).json_body(json!({"status": 404, "message": "Not Found"}));
        });

        let translation = client_for(&server).fetch_translation("Nowhere").await;

        api_mock.assert();
        assert!(translation.is_none());
    }
}
