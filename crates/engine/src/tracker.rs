use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, error, info, info_span, Instrument};
use trade_tracker_types::{OfferSnapshot, Outcome, TradeIntent};

use crate::{
    classify, Credential, EventSink, GlobalIdResolver, ListOptions, NoopSink, OfferSource,
    SteamId64Resolver, TrackError, TrackerConfig,
};

/// Builder error
#[derive(Debug, Error)]
pub enum BuilderError {
    #[error("missing required field: {field}")]
    MissingField { field: String },
}

/// Reconciles intended trades against the offers a credential can see.
///
/// Holds no state between calls; share it behind an `Arc` freely.
pub struct TradeTracker {
    source: Arc<dyn OfferSource>,
    sink: Arc<dyn EventSink>,
    resolver: Arc<dyn GlobalIdResolver>,
    config: TrackerConfig,
}

impl TradeTracker {
    /// Tracker with the Steam64 resolver and default settings
    pub fn new(source: Arc<dyn OfferSource>, sink: Arc<dyn EventSink>) -> Self {
        Self {
            source,
            sink,
            resolver: Arc::new(SteamId64Resolver),
            config: TrackerConfig::default(),
        }
    }

    pub fn builder() -> TradeTrackerBuilder {
        TradeTrackerBuilder::new()
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Classify every intent against one fresh snapshot and publish the
    /// resulting events.
    ///
    /// Intents are validated before the source is queried. The returned
    /// outcomes line up with `intents` index for index.
    pub async fn track(
        &self,
        credential: &Credential,
        intents: &[TradeIntent],
    ) -> Result<Vec<Outcome>, TrackError> {
        for (index, intent) in intents.iter().enumerate() {
            intent
                .validate()
                .map_err(|reason| TrackError::InvalidIntent { index, reason })?;
        }

        let span = info_span!("track", batch = intents.len());
        self.track_validated(credential, intents)
            .instrument(span)
            .await
    }

    async fn track_validated(
        &self,
        credential: &Credential,
        intents: &[TradeIntent],
    ) -> Result<Vec<Outcome>, TrackError> {
        let started = Instant::now();
        let options = ListOptions {
            historical_cutoff_secs: self.config.historical_cutoff_secs,
        };

        let offers = match self.source.list_offers(credential, &options).await {
            Ok(offers) => offers,
            Err(e) => {
                error!(error_type = e.kind(), error = %e, "offer source failed, batch aborted");
                return Err(e.into());
            }
        };
        debug!(offers = offers.len(), "fetched offer snapshot");

        let outcomes = self.classify_all(&offers, intents);

        let mut emitted = 0usize;
        for event in outcomes.iter().flat_map(|outcome| &outcome.events) {
            self.sink.publish(event);
            emitted += 1;
        }

        info!(
            intents = intents.len(),
            offers = offers.len(),
            events = emitted,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "track completed"
        );

        Ok(outcomes)
    }

    /// Classify intents against a snapshot without publishing anything.
    pub fn classify_all(&self, offers: &[OfferSnapshot], intents: &[TradeIntent]) -> Vec<Outcome> {
        intents
            .iter()
            .map(|intent| classify(offers, intent, &self.config, self.resolver.as_ref()))
            .collect()
    }
}

/// Builder for TradeTracker
pub struct TradeTrackerBuilder {
    source: Option<Arc<dyn OfferSource>>,
    sink: Option<Arc<dyn EventSink>>,
    resolver: Option<Arc<dyn GlobalIdResolver>>,
    config: TrackerConfig,
}

impl TradeTrackerBuilder {
    pub fn new() -> Self {
        Self {
            source: None,
            sink: None,
            resolver: None,
            config: TrackerConfig::default(),
        }
    }

    /// Set the offer source
    pub fn with_source(mut self, source: Arc<dyn OfferSource>) -> Self {
        self.source = Some(source);
        self
    }

    /// Set the event sink; events are dropped when none is set
    pub fn with_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Set the global id resolver; defaults to Steam64
    pub fn with_resolver(mut self, resolver: Arc<dyn GlobalIdResolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    pub fn with_config(mut self, config: TrackerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> Result<TradeTracker, BuilderError> {
        let source = self.source.ok_or_else(|| BuilderError::MissingField {
            field: "source".to_string(),
        })?;

        Ok(TradeTracker {
            source,
            sink: self.sink.unwrap_or_else(|| Arc::new(NoopSink)),
            resolver: self.resolver.unwrap_or_else(|| Arc::new(SteamId64Resolver)),
            config: self.config,
        })
    }
}

impl Default for TradeTrackerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
