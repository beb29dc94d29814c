use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use stamp_core::StampCatalog;
use stamp_core::model::{ClaimOutcome, ProgressError, StampId, StampOutcome, UserProgress};
use storage::ProgressPersistence;
use tokio::sync::Mutex as WriteLock;

use crate::Clock;

/// Owns the visitor's `UserProgress` and mirrors every change to storage.
///
/// Each mutation holds the write lock from computing the new value until its
/// save completes, so saves land in the same order as the mutations. The
/// state mutex only guards the in-memory swap and is never held across an
/// await; reads never wait on a save.
#[derive(Clone)]
pub struct ProgressService {
    clock: Clock,
    catalog: Arc<StampCatalog>,
    persistence: ProgressPersistence,
    state: Arc<Mutex<UserProgress>>,
    writes: Arc<WriteLock<()>>,
}

impl ProgressService {
    #[must_use]
    pub fn new(
        clock: Clock,
        catalog: Arc<StampCatalog>,
        persistence: ProgressPersistence,
        initial: UserProgress,
    ) -> Self {
        Self {
            clock,
            catalog,
            persistence,
            state: Arc::new(Mutex::new(initial)),
            writes: Arc::new(WriteLock::new(())),
        }
    }

    /// Start from whatever is stored, or an empty card when nothing usable is.
    pub async fn hydrate(
        clock: Clock,
        catalog: Arc<StampCatalog>,
        persistence: ProgressPersistence,
    ) -> Self {
        let initial = persistence.load().await.unwrap_or_default();
        tracing::debug!(collected = initial.collected(), "progress hydrated");
        Self::new(clock, catalog, persistence, initial)
    }

    #[must_use]
    pub fn catalog(&self) -> Arc<StampCatalog> {
        Arc::clone(&self.catalog)
    }

    #[must_use]
    pub fn snapshot(&self) -> UserProgress {
        self.lock().clone()
    }

    #[must_use]
    pub fn has_stamp(&self, id: StampId) -> bool {
        self.lock().has_stamp(id)
    }

    /// Add stamp `id` stamped with the current time, then persist.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::UnknownStamp` if `id` is not on the card.
    pub async fn record_stamp(&self, id: StampId) -> Result<StampOutcome, ProgressError> {
        let _write = self.writes.lock().await;
        let now = self.clock.now();
        let (outcome, next) = {
            let mut guard = self.lock();
            let mut next = guard.clone();
            let outcome = next.record_stamp(&self.catalog, id, now)?;
            if outcome.is_recorded() {
                *guard = next.clone();
            }
            (outcome, next)
        };

        if let StampOutcome::Recorded(record) = &outcome {
            tracing::info!(
                stamp = %record.id(),
                collected = next.collected(),
                total = self.catalog.total(),
                "stamp recorded"
            );
            self.persistence.save(&next).await;
        }
        Ok(outcome)
    }

    /// Claim the reward if every stamp is collected, then persist.
    pub async fn claim_reward(&self) -> ClaimOutcome {
        let _write = self.writes.lock().await;
        let (outcome, next) = {
            let mut guard = self.lock();
            let mut next = guard.clone();
            let outcome = next.claim_reward(self.catalog.total());
            if outcome == ClaimOutcome::Claimed {
                *guard = next.clone();
            }
            (outcome, next)
        };

        if outcome == ClaimOutcome::Claimed {
            tracing::info!("reward claimed");
            self.persistence.save(&next).await;
        }
        outcome
    }

    /// Wipe all progress. Callers confirm with the visitor first.
    pub async fn reset(&self) {
        let _write = self.writes.lock().await;
        let next = {
            let mut guard = self.lock();
            guard.reset();
            guard.clone()
        };
        tracing::info!("progress reset");
        self.persistence.save(&next).await;
    }

    fn lock(&self) -> MutexGuard<'_, UserProgress> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stamp_core::time::{fixed_clock, fixed_now};
    use storage::{InMemoryKeyValueStore, KeyValueStore};

    fn service() -> (ProgressService, ProgressPersistence) {
        let catalog = Arc::new(StampCatalog::standard());
        let persistence =
            ProgressPersistence::new(Arc::new(InMemoryKeyValueStore::new()), Arc::clone(&catalog));
        let service = ProgressService::new(
            fixed_clock(),
            catalog,
            persistence.clone(),
            UserProgress::empty(),
        );
        (service, persistence)
    }

    #[tokio::test]
    async fn record_grows_by_one_and_persists() {
        let (service, persistence) = service();

        let outcome = service.record_stamp(StampId::new(4)).await.unwrap();
        let StampOutcome::Recorded(record) = outcome else {
            panic!("expected a new record");
        };
        assert_eq!(record.collected_at(), fixed_now());

        let snapshot = service.snapshot();
        assert_eq!(snapshot.collected(), 1);
        assert_eq!(persistence.load().await, Some(snapshot));
    }

    #[tokio::test]
    async fn duplicate_record_changes_nothing() {
        let (service, _) = service();
        service.record_stamp(StampId::new(2)).await.unwrap();
        let before = service.snapshot();

        let outcome = service.record_stamp(StampId::new(2)).await.unwrap();
        assert_eq!(outcome, StampOutcome::AlreadyCollected);
        assert_eq!(service.snapshot(), before);
    }

    #[tokio::test]
    async fn unknown_stamp_is_rejected() {
        let (service, persistence) = service();
        let err = service.record_stamp(StampId::new(7)).await.unwrap_err();
        assert_eq!(err, ProgressError::UnknownStamp(StampId::new(7)));
        assert_eq!(service.snapshot(), UserProgress::empty());
        assert_eq!(persistence.load().await, None);
    }

    #[tokio::test]
    async fn claim_is_noop_until_complete() {
        let (service, persistence) = service();
        for raw in 1..=5 {
            service.record_stamp(StampId::new(raw)).await.unwrap();
        }
        assert!(matches!(
            service.claim_reward().await,
            ClaimOutcome::Incomplete { collected: 5, total: 6 }
        ));
        assert!(!service.snapshot().reward_claimed());

        service.record_stamp(StampId::new(6)).await.unwrap();
        assert_eq!(service.claim_reward().await, ClaimOutcome::Claimed);
        assert!(persistence.load().await.unwrap().reward_claimed());
    }

    /// Store whose first write stalls, so a later mutation could overtake it.
    struct StallFirstWrite {
        inner: InMemoryKeyValueStore,
        stalled: std::sync::atomic::AtomicBool,
    }

    #[async_trait::async_trait]
    impl KeyValueStore for StallFirstWrite {
        async fn get_item(&self, key: &str) -> Result<Option<String>, storage::StorageError> {
            self.inner.get_item(key).await
        }

        async fn set_item(&self, key: &str, value: &str) -> Result<(), storage::StorageError> {
            if !self.stalled.swap(true, std::sync::atomic::Ordering::SeqCst) {
                tokio::time::sleep(std::time::Duration::from_millis(100)).await;
            }
            self.inner.set_item(key, value).await
        }

        async fn remove_item(&self, key: &str) -> Result<(), storage::StorageError> {
            self.inner.remove_item(key).await
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn overlapping_records_are_saved_in_order() {
        let catalog = Arc::new(StampCatalog::standard());
        let store = Arc::new(StallFirstWrite {
            inner: InMemoryKeyValueStore::new(),
            stalled: std::sync::atomic::AtomicBool::new(false),
        });
        let persistence = ProgressPersistence::new(store, Arc::clone(&catalog));
        let service = ProgressService::new(
            fixed_clock(),
            catalog,
            persistence.clone(),
            UserProgress::empty(),
        );

        let first = tokio::spawn({
            let service = service.clone();
            async move { service.record_stamp(StampId::new(1)).await }
        });
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        let second = tokio::spawn({
            let service = service.clone();
            async move { service.record_stamp(StampId::new(2)).await }
        });
        first.await.unwrap().unwrap();
        second.await.unwrap().unwrap();

        let snapshot = service.snapshot();
        assert_eq!(snapshot.collected(), 2);
        assert_eq!(persistence.load().await, Some(snapshot));
    }

    #[tokio::test]
    async fn reset_persists_empty_progress() {
        let (service, persistence) = service();
        service.record_stamp(StampId::new(1)).await.unwrap();

        service.reset().await;
        assert_eq!(service.snapshot(), UserProgress::empty());
        assert_eq!(persistence.load().await, Some(UserProgress::empty()));
    }

    #[tokio::test]
    async fn hydrate_falls_back_to_empty_on_corruption() {
        let catalog = Arc::new(StampCatalog::standard());
        let store = InMemoryKeyValueStore::new();
        KeyValueStore::set_item(&store, storage::PROGRESS_KEY, "{broken")
            .await
            .unwrap();
        let persistence = ProgressPersistence::new(Arc::new(store), Arc::clone(&catalog));

        let service = ProgressService::hydrate(fixed_clock(), catalog, persistence).await;
        assert_eq!(service.snapshot(), UserProgress::empty());
    }

    #[tokio::test]
    async fn hydrate_restores_saved_progress() {
        let (first, persistence) = service();
        first.record_stamp(StampId::new(3)).await.unwrap();

        let second =
            ProgressService::hydrate(fixed_clock(), first.catalog(), persistence).await;
        assert_eq!(second.snapshot(), first.snapshot());
    }
}
