use std::sync::{Mutex, PoisonError};

use url::Url;

/// The visible page address: read by intake, rewritten without navigating.
pub trait AddressBar: Send + Sync {
    fn current_url(&self) -> Url;

    /// Swap the visible address in place; no reload, no history entry.
    fn replace_url(&self, url: Url);

    /// `replace_url`, but only while the address is still `expected`.
    /// Returns whether the swap happened.
    fn replace_url_if(&self, expected: &Url, url: Url) -> bool;
}

/// Address bar held in memory, for the desktop shell and tests.
#[derive(Debug)]
pub struct MemoryAddressBar {
    url: Mutex<Url>,
}

impl MemoryAddressBar {
    #[must_use]
    pub fn new(url: Url) -> Self {
        Self {
            url: Mutex::new(url),
        }
    }

    /// Arrive at `url`, e.g. by following a demo link or scanning a code.
    pub fn navigate(&self, url: Url) {
        *self.url.lock().unwrap_or_else(PoisonError::into_inner) = url;
    }
}

impl AddressBar for MemoryAddressBar {
    fn current_url(&self) -> Url {
        self.url
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn replace_url(&self, url: Url) {
        self.navigate(url);
    }

    fn replace_url_if(&self, expected: &Url, url: Url) -> bool {
        let mut current = self.url.lock().unwrap_or_else(PoisonError::into_inner);
        if *current != *expected {
            return false;
        }
        *current = url;
        true
    }
}
