use std::sync::Arc;

use stamp_core::StampCatalog;
use storage::{ProgressPersistence, Storage};

use crate::error::AppServicesError;
use crate::intake_service::IntakeService;
use crate::motivation::MotivationFetcher;
use crate::progress_service::ProgressService;
use crate::Clock;

/// Assembles app-facing services around a hydrated progress store.
#[derive(Clone)]
pub struct AppServices {
    catalog: Arc<StampCatalog>,
    persistence: ProgressPersistence,
    progress: Arc<ProgressService>,
    intake: Arc<IntakeService>,
    motivation: Arc<MotivationFetcher>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage scoped to `origin`.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails.
    pub async fn new_sqlite(
        db_url: &str,
        origin: &str,
        clock: Clock,
        catalog: StampCatalog,
        motivation: MotivationFetcher,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url, origin).await?;
        Ok(Self::from_storage(&storage, clock, catalog, motivation).await)
    }

    /// Build services over an existing storage handle.
    pub async fn from_storage(
        storage: &Storage,
        clock: Clock,
        catalog: StampCatalog,
        motivation: MotivationFetcher,
    ) -> Self {
        let catalog = Arc::new(catalog);
        let persistence =
            ProgressPersistence::new(Arc::clone(&storage.items), Arc::clone(&catalog));
        let progress = Arc::new(
            ProgressService::hydrate(clock, Arc::clone(&catalog), persistence.clone()).await,
        );
        let motivation = Arc::new(motivation);
        let intake = Arc::new(IntakeService::new(
            Arc::clone(&progress),
            Arc::clone(&motivation),
        ));

        Self {
            catalog,
            persistence,
            progress,
            intake,
            motivation,
        }
    }

    #[must_use]
    pub fn catalog(&self) -> Arc<StampCatalog> {
        Arc::clone(&self.catalog)
    }

    #[must_use]
    pub fn persistence(&self) -> ProgressPersistence {
        self.persistence.clone()
    }

    #[must_use]
    pub fn progress(&self) -> Arc<ProgressService> {
        Arc::clone(&self.progress)
    }

    #[must_use]
    pub fn intake(&self) -> Arc<IntakeService> {
        Arc::clone(&self.intake)
    }

    #[must_use]
    pub fn motivation(&self) -> Arc<MotivationFetcher> {
        Arc::clone(&self.motivation)
    }
}
