use std::sync::Arc;

use stamp_core::StampCatalog;
use stamp_core::model::UserProgress;

use crate::record::ProgressRecord;
use crate::repository::KeyValueStore;

/// Storage key for the progress record.
pub const PROGRESS_KEY: &str = "digital_stamp_progress";

/// Mirrors `UserProgress` into a key-value store as JSON.
///
/// Persistence is best-effort: reads that fail for any reason come back as
/// `None` and writes never report failure. Both are logged.
#[derive(Clone)]
pub struct ProgressPersistence {
    store: Arc<dyn KeyValueStore>,
    key: String,
    catalog: Arc<StampCatalog>,
}

impl ProgressPersistence {
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>, catalog: Arc<StampCatalog>) -> Self {
        Self::with_key(store, catalog, PROGRESS_KEY)
    }

    #[must_use]
    pub fn with_key(
        store: Arc<dyn KeyValueStore>,
        catalog: Arc<StampCatalog>,
        key: impl Into<String>,
    ) -> Self {
        Self {
            store,
            key: key.into(),
            catalog,
        }
    }

    /// The stored progress, or `None` when nothing usable is stored.
    pub async fn load(&self) -> Option<UserProgress> {
        let raw = match self.store.get_item(&self.key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(err) => {
                tracing::warn!(key = %self.key, error = %err, "progress read failed");
                return None;
            }
        };

        let record: ProgressRecord = match serde_json::from_str(&raw) {
            Ok(record) => record,
            Err(err) => {
                tracing::warn!(key = %self.key, error = %err, "stored progress is not valid JSON");
                return None;
            }
        };

        match record.into_progress(&self.catalog) {
            Ok(progress) => Some(progress),
            Err(err) => {
                tracing::warn!(key = %self.key, error = %err, "stored progress is inconsistent");
                None
            }
        }
    }

    /// Write `progress`; failures are logged and dropped.
    pub async fn save(&self, progress: &UserProgress) {
        let json = match serde_json::to_string(&ProgressRecord::from_progress(progress)) {
            Ok(json) => json,
            Err(err) => {
                tracing::warn!(key = %self.key, error = %err, "progress could not be encoded");
                return;
            }
        };

        if let Err(err) = self.store.set_item(&self.key, &json).await {
            tracing::warn!(key = %self.key, error = %err, "progress write failed");
        }
    }

    /// Drop the stored record entirely.
    pub async fn clear(&self) {
        if let Err(err) = self.store.remove_item(&self.key).await {
            tracing::warn!(key = %self.key, error = %err, "progress delete failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use stamp_core::model::StampId;
    use stamp_core::time::fixed_now;

    use crate::repository::{InMemoryKeyValueStore, StorageError};

    fn persistence(store: Arc<dyn KeyValueStore>) -> ProgressPersistence {
        ProgressPersistence::new(store, Arc::new(StampCatalog::standard()))
    }

    fn sample_progress() -> UserProgress {
        let catalog = StampCatalog::standard();
        let mut progress = UserProgress::empty();
        for raw in [4, 1, 6] {
            progress
                .record_stamp(&catalog, StampId::new(raw), fixed_now())
                .unwrap();
        }
        progress
    }

    #[tokio::test]
    async fn load_after_save_returns_same_value() {
        let persistence = persistence(Arc::new(InMemoryKeyValueStore::new()));
        let progress = sample_progress();

        persistence.save(&progress).await;
        assert_eq!(persistence.load().await, Some(progress));
    }

    #[tokio::test]
    async fn round_trips_full_claimed_card() {
        let catalog = StampCatalog::standard();
        let mut progress = UserProgress::empty();
        for id in catalog.ids() {
            progress.record_stamp(&catalog, id, fixed_now()).unwrap();
        }
        progress.claim_reward(catalog.total());

        let persistence = persistence(Arc::new(InMemoryKeyValueStore::new()));
        persistence.save(&progress).await;
        assert_eq!(persistence.load().await, Some(progress));
    }

    #[tokio::test]
    async fn load_without_value_is_none() {
        let persistence = persistence(Arc::new(InMemoryKeyValueStore::new()));
        assert_eq!(persistence.load().await, None);
    }

    #[tokio::test]
    async fn corrupt_values_load_as_none() {
        let store = InMemoryKeyValueStore::new();
        let persistence = persistence(Arc::new(store.clone()));

        for raw in [
            "not json",
            "{}",
            r#"{"stamps":"nope","rewardClaimed":false}"#,
            r#"{"stamps":[{"id":9,"timestamp":"2024-03-09T16:00:00Z","name":"x"}],"rewardClaimed":false}"#,
            r#"{"stamps":[],"rewardClaimed":true}"#,
        ] {
            store.set_item(PROGRESS_KEY, raw).await.unwrap();
            assert_eq!(persistence.load().await, None, "{raw} should be rejected");
        }
    }

    #[tokio::test]
    async fn clear_removes_record() {
        let persistence = persistence(Arc::new(InMemoryKeyValueStore::new()));
        persistence.save(&sample_progress()).await;
        persistence.clear().await;
        assert_eq!(persistence.load().await, None);
    }

    struct BrokenStore;

    #[async_trait]
    impl KeyValueStore for BrokenStore {
        async fn get_item(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Connection("offline".into()))
        }

        async fn set_item(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Connection("quota exceeded".into()))
        }

        async fn remove_item(&self, _key: &str) -> Result<(), StorageError> {
            Err(StorageError::Connection("offline".into()))
        }
    }

    #[tokio::test]
    async fn backend_failures_are_swallowed() {
        let persistence = persistence(Arc::new(BrokenStore));
        persistence.save(&sample_progress()).await;
        persistence.clear().await;
        assert_eq!(persistence.load().await, None);
    }
}
