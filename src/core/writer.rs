use crate::domain::ports::Storage;
use crate::utils::error::Result;
use serde::Serialize;

pub const JSON_CONTENT_TYPE: &str = "application/json";

pub async fn try_write_json<S, T>(storage: &S, bucket: &str, key: &str, value: &T) -> Result<()>
where
    S: Storage,
    T: Serialize + ?Sized,
{
    let body = serde_json::to_vec_pretty(value)?;
    tracing::debug!("Writing {} bytes to {}/{}", body.len(), bucket, key);
    storage
        .write_object(bucket, key, body, JSON_CONTENT_TYPE)
        .await
}

/// Best effort: failures are logged and reported as `false`, never raised.
pub async fn write_json<S, T>(storage: &S, bucket: &str, key: &str, value: &T) -> bool
where
    S: Storage,
    T: Serialize + ?Sized,
{
    match try_write_json(storage, bucket, key, value).await {
        Ok(()) => {
            tracing::info!("File saved to {}/{}", bucket, key);
            true
        }
        Err(e) => {
            tracing::error!("Failed to upload {}/{}: {}", bucket, key, e);
            false
        }
    }
}
