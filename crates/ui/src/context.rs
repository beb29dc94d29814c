use std::sync::Arc;

use services::{IntakeService, MemoryAddressBar, ProgressService};
use stamp_core::StampCatalog;
use url::Url;

/// What the composition root hands the UI.
pub trait UiApp: Send + Sync {
    fn catalog(&self) -> Arc<StampCatalog>;
    fn progress(&self) -> Arc<ProgressService>;
    fn intake(&self) -> Arc<IntakeService>;
    fn address_bar(&self) -> Arc<MemoryAddressBar>;

    /// Page address that share links are built on.
    fn share_base(&self) -> Url;
}

#[derive(Clone)]
pub struct AppContext {
    catalog: Arc<StampCatalog>,
    progress: Arc<ProgressService>,
    intake: Arc<IntakeService>,
    address_bar: Arc<MemoryAddressBar>,
    share_base: Url,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            catalog: app.catalog(),
            progress: app.progress(),
            intake: app.intake(),
            address_bar: app.address_bar(),
            share_base: app.share_base(),
        }
    }

    #[must_use]
    pub fn catalog(&self) -> Arc<StampCatalog> {
        Arc::clone(&self.catalog)
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
    pub fn address_bar(&self) -> Arc<MemoryAddressBar> {
        Arc::clone(&self.address_bar)
    }

    #[must_use]
    pub fn share_base(&self) -> &Url {
        &self.share_base
    }
}

// Provided by the application composition root (`crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
