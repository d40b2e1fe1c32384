use crate::domain::ports::Storage;
use crate::utils::error::{EtlError, Result};
use std::path::{Component, Path, PathBuf};

/// Filesystem stand-in for object storage: `<base>/<bucket>/<key>`.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn object_path(&self, bucket: &str, key: &str) -> Result<PathBuf> {
        let relative = Path::new(bucket).join(key);
        // keys come from config; refuse anything that would escape the base dir
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)))
        {
            return Err(EtlError::StorageError {
                message: format!("Refusing object path outside storage root: {}/{}", bucket, key),
            });
        }
        Ok(self.base_path.join(relative))
    }
}

impl Storage for LocalStorage {
    async fn read_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>> {
        let full_path = self.object_path(bucket, key)?;
        let data = tokio::fs::read(full_path).await?;
        Ok(data)
    }

    async fn write_object(
        &self,
        bucket: &str,
        key: &str,
        data: Vec<u8>,
        _content_type: &str,
    ) -> Result<()> {
        let full_path = self.object_path(bucket, key)?;

        if let Some(parent) = full_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        tokio::fs::write(full_path, data).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_write_then_read_object() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path());

        storage
            .write_object(
                "countries-extraction",
                "countries/2024-01-01/countries.json",
                b"[]".to_vec(),
                "application/json",
            )
            .await
            .unwrap();

        let path = temp_dir
            .path()
            .join("countries-extraction/countries/2024-01-01/countries.json");
        assert!(path.exists());

        let data = storage
            .read_object("countries-extraction", "countries/2024-01-01/countries.json")
            .await
            .unwrap();
        assert_eq!(data, b"[]");
    }

    #[tokio::test]
    async fn test_read_missing_object_fails() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path());

        let result = storage.read_object("bucket", "missing.json").await;
        assert!(matches!(result, Err(EtlError::IoError(_))));
    }

    #[test]
    fn test_object_path_rejects_traversal() {
        let storage = LocalStorage::new("/tmp/out");
        assert!(storage.object_path("bucket", "../escape.json").is_err());
        assert!(storage.object_path("bucket", "/etc/passwd").is_err());
        assert!(storage.object_path("bucket", "countries/a.json").is_ok());
    }
}
