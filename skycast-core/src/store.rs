use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::path::PathBuf;
use tokio::fs;

use crate::{config::Config, error::StoreError};

/// Durable storage for the single "last viewed city" value.
///
/// Last-write-wins is the only guarantee needed: the value is written on
/// every successful city selection and read once at startup.
#[async_trait]
pub trait CityStore: Send + Sync + Debug {
    async fn load_city(&self) -> Result<Option<String>, StoreError>;
    async fn save_city(&self, city: &str) -> Result<(), StoreError>;
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredCity {
    city: String,
}

/// File-backed store: one small JSON document in the platform data dir.
#[derive(Debug, Clone)]
pub struct FileCityStore {
    path: PathBuf,
}

impl FileCityStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Store at the default platform location.
    pub fn at_default_location() -> Result<Self, StoreError> {
        let dir = Config::data_dir().map_err(|_| StoreError::NoDataDir)?;
        Ok(Self::new(dir.join("last_city.json")))
    }
}

#[async_trait]
impl CityStore for FileCityStore {
    async fn load_city(&self) -> Result<Option<String>, StoreError> {
        let contents = match fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(StoreError::Read(err)),
        };

        let stored: StoredCity = serde_json::from_str(&contents)?;
        Ok(Some(stored.city))
    }

    async fn save_city(&self, city: &str) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await.map_err(StoreError::Write)?;
        }

        let json = serde_json::to_string(&StoredCity {
            city: city.to_owned(),
        })?;

        fs::write(&self.path, json).await.map_err(StoreError::Write)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_in(dir: &tempfile::TempDir) -> FileCityStore {
        FileCityStore::new(dir.path().join("last_city.json"))
    }

    #[tokio::test]
    async fn load_returns_none_before_first_save() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store_in(&dir);

        let city = store.load_city().await.expect("load succeeds");
        assert_eq!(city, None);
    }

    #[tokio::test]
    async fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store_in(&dir);

        store.save_city("Paris").await.expect("save succeeds");
        let city = store.load_city().await.expect("load succeeds");
        assert_eq!(city.as_deref(), Some("Paris"));
    }

    #[tokio::test]
    async fn second_save_overwrites_first() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store_in(&dir);

        store.save_city("Paris").await.expect("save succeeds");
        store.save_city("Oslo").await.expect("save succeeds");

        let city = store.load_city().await.expect("load succeeds");
        assert_eq!(city.as_deref(), Some("Oslo"));
    }

    #[tokio::test]
    async fn malformed_file_is_a_decode_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store_in(&dir);

        tokio::fs::write(dir.path().join("last_city.json"), "not json")
            .await
            .expect("write fixture");

        let err = store.load_city().await.unwrap_err();
        assert!(matches!(err, StoreError::Decode(_)));
    }
}
