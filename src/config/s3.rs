use crate::config::StorageSettings;
use crate::domain::ports::Storage;
use crate::utils::error::{EtlError, Result};
use aws_config::BehaviorVersion;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata};
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client as S3Client;

#[derive(Debug, Clone)]
pub struct S3Storage {
    client: S3Client,
}

impl S3Storage {
    pub fn new(client: S3Client) -> Self {
        Self { client }
    }

    /// Credentials come from the ambient AWS chain (env, profile, IMDS).
    pub async fn from_settings(settings: &StorageSettings) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = &settings.s3_region {
            loader = loader.region(Region::new(region.clone()));
        }
        let shared = loader.load().await;

        let mut builder = aws_sdk_s3::config::Builder::from(&shared);
        if let Some(endpoint) = &settings.s3_endpoint {
            tracing::info!("Using custom S3 endpoint {}", endpoint);
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }

        Self::new(S3Client::from_conf(builder.build()))
    }
}

impl Storage for S3Storage {
    async fn read_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>> {
        let resp = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| EtlError::StorageError {
                message: format!(
                    "Failed to read s3://{}/{} ({}): {}",
                    bucket,
                    key,
                    e.as_service_error().and_then(|se| se.code()).unwrap_or("no code"),
                    DisplayErrorContext(&e)
                ),
            })?;

        let data = resp
            .body
            .collect()
            .await
            .map_err(|e| EtlError::StorageError {
                message: format!("Failed to collect s3://{}/{}: {}", bucket, key, e),
            })?;

        Ok(data.into_bytes().to_vec())
    }

    async fn write_object(
        &self,
        bucket: &str,
        key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<()> {
        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(data))
            .send()
            .await
            .map_err(|e| EtlError::StorageError {
                message: format!(
                    "Failed to write s3://{}/{} ({}): {}",
                    bucket,
                    key,
                    e.as_service_error().and_then(|se| se.code()).unwrap_or("no code"),
                    DisplayErrorContext(&e)
                ),
            })?;

        Ok(())
    }
}
