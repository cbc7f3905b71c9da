//! JSON file config store.
//!
//! One pretty-printed file per service key: `<dir>/<key>.json`.

use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use reforge_domain::ServiceConfigRecord;

use crate::infrastructure::ports::{ConfigStoreError, ConfigStorePort};

pub struct JsonFileConfigStore {
    dir: PathBuf,
}

impl JsonFileConfigStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, ConfigStoreError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(ConfigStoreError::io(
                "path",
                format!("invalid service key '{}'", key),
            ));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

#[async_trait]
impl ConfigStorePort for JsonFileConfigStore {
    async fn load(&self, key: &str) -> Result<Option<ServiceConfigRecord>, ConfigStoreError> {
        let path = self.path_for(key)?;
        let raw = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(ConfigStoreError::io("load", e)),
        };
        let record = serde_json::from_str(&raw).map_err(ConfigStoreError::serialization)?;
        tracing::debug!(path = %path.display(), "Loaded service config record");
        Ok(Some(record))
    }

    async fn save(&self, key: &str, record: &ServiceConfigRecord) -> Result<(), ConfigStoreError> {
        let path = self.path_for(key)?;
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| ConfigStoreError::io("save", e))?;
        let json = serde_json::to_string_pretty(record).map_err(ConfigStoreError::serialization)?;
        tokio::fs::write(&path, json)
            .await
            .map_err(|e| ConfigStoreError::io("save", e))?;
        tracing::debug!(path = %path.display(), "Saved service config record");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reforge_domain::{DelayBounds, FailChance, ItemType, ServiceConfig};

    #[tokio::test]
    async fn missing_file_loads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileConfigStore::new(dir.path());
        assert!(store.load("blacksmith").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileConfigStore::new(dir.path().join("nested"));
        let config = ServiceConfig::default()
            .with_reforgeable_items(vec![ItemType::Bow, ItemType::IronHelmet])
            .with_delays(DelayBounds::new(2, 4).unwrap())
            .with_fail_chance(FailChance::new(0).unwrap());

        store.save("blacksmith", &config.to_record()).await.unwrap();
        let record = store.load("blacksmith").await.unwrap().unwrap();
        let (loaded, unknown) = ServiceConfig::from_record(&record).unwrap();

        assert_eq!(loaded, config);
        assert!(unknown.is_empty());
    }

    #[tokio::test]
    async fn corrupt_file_is_a_serialization_error() {
        let dir = tempfile::tempdir().unwrap();
        tokio::fs::write(dir.path().join("broken.json"), "{ not json")
            .await
            .unwrap();
        let store = JsonFileConfigStore::new(dir.path());
        let err = store.load("broken").await.unwrap_err();
        assert!(matches!(err, ConfigStoreError::Serialization(_)));
    }

    #[tokio::test]
    async fn path_traversal_keys_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileConfigStore::new(dir.path());
        assert!(store.load("../etc/passwd").await.is_err());
        assert!(store.load("").await.is_err());
    }
}
