use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use trade_tracker_types::OfferSnapshot;

use crate::{Credential, ListOptions, OfferSource, SourceError};

/// Offer source backed by a vector, for tests and replaying captured snapshots.
///
/// The historical cutoff is recorded but not applied; every stored offer is
/// returned.
#[derive(Default)]
pub struct InMemoryOfferSource {
    offers: Mutex<Vec<OfferSnapshot>>,
    should_fail: AtomicBool,
    calls: AtomicUsize,
    last_options: Mutex<Option<ListOptions>>,
}

impl InMemoryOfferSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_offers(offers: Vec<OfferSnapshot>) -> Self {
        Self {
            offers: Mutex::new(offers),
            ..Self::default()
        }
    }

    pub fn push(&self, offer: OfferSnapshot) {
        self.offers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(offer);
    }

    pub fn clear(&self) {
        self.offers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clear();
    }

    /// Make subsequent listings fail with `SourceError::Unavailable`
    pub fn set_should_fail(&self, fail: bool) {
        self.should_fail.store(fail, Ordering::SeqCst);
    }

    /// Number of listing requests served so far, failed ones included
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_options(&self) -> Option<ListOptions> {
        *self
            .last_options
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl OfferSource for InMemoryOfferSource {
    async fn list_offers(
        &self,
        _credential: &Credential,
        options: &ListOptions,
    ) -> Result<Vec<OfferSnapshot>, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self
            .last_options
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(*options);

        if self.should_fail.load(Ordering::SeqCst) {
            return Err(SourceError::Unavailable("simulated failure".to_string()));
        }

        Ok(self
            .offers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone())
    }
}
