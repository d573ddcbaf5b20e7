use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tracing::{debug, info, warn};
use trade_tracker_engine::{Credential, ListOptions, OfferSource, SourceError};
use trade_tracker_types::OfferSnapshot;

use crate::backoff::ExponentialBackoff;
use crate::wire::OffersResponse;

pub const STEAM_API_BASE_URL: &str = "https://api.steampowered.com";

const GET_TRADE_OFFERS: &str = "/IEconService/GetTradeOffers/v1/";
const CANCEL_TRADE_OFFER: &str = "/IEconService/CancelTradeOffer/v1/";

/// Steam Web API client settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SteamClientConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Retries of a single page after the first attempt
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Upper bound on cursor pages followed in one listing
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,

    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,

    /// Ceiling for the delay between retries
    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,
}

fn default_base_url() -> String {
    STEAM_API_BASE_URL.to_string()
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_max_retries() -> u32 {
    3
}

fn default_max_pages() -> u32 {
    20
}

fn default_initial_backoff_ms() -> u64 {
    250
}

fn default_max_backoff_ms() -> u64 {
    5_000
}

impl Default for SteamClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_ms: default_timeout_ms(),
            max_retries: default_max_retries(),
            max_pages: default_max_pages(),
            initial_backoff_ms: default_initial_backoff_ms(),
            max_backoff_ms: default_max_backoff_ms(),
        }
    }
}

impl SteamClientConfig {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = max_pages;
        self
    }

    pub fn with_initial_backoff_ms(mut self, initial_backoff_ms: u64) -> Self {
        self.initial_backoff_ms = initial_backoff_ms;
        self
    }

    pub fn with_max_backoff_ms(mut self, max_backoff_ms: u64) -> Self {
        self.max_backoff_ms = max_backoff_ms;
        self
    }
}

/// Result of one HTTP attempt
enum Attempt<T> {
    Done(T),
    Retry(String),
    Fail(SourceError),
}

/// Offer source backed by `IEconService`
pub struct SteamOfferSource {
    client: reqwest::Client,
    config: SteamClientConfig,
}

impl SteamOfferSource {
    pub fn new(config: SteamClientConfig) -> Result<Self, SourceError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| SourceError::Unavailable(format!("http client: {e}")))?;

        Ok(Self { client, config })
    }

    pub fn with_client(client: reqwest::Client, config: SteamClientConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &SteamClientConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// Cancel an offer the credential holder sent.
    pub async fn cancel_offer(
        &self,
        credential: &Credential,
        offer_id: &str,
    ) -> Result<(), SourceError> {
        let url = self.url(CANCEL_TRADE_OFFER);
        let params = [("key", credential.expose()), ("tradeofferid", offer_id)];

        let response = self
            .client
            .post(&url)
            .form(&params)
            .send()
            .await
            .map_err(|e| SourceError::Unavailable(format!("cancel request failed: {e}")))?;

        let status = response.status();
        if let Some(err) = status_error(status) {
            return Err(err);
        }
        if !status.is_success() {
            return Err(SourceError::Unavailable(format!(
                "cancel of offer {offer_id} returned {status}"
            )));
        }

        info!(offer_id, "trade offer canceled");
        Ok(())
    }

    async fn fetch_page(
        &self,
        credential: &Credential,
        cutoff: u64,
        cursor: u64,
    ) -> Result<OffersResponse, SourceError> {
        let mut backoff = ExponentialBackoff::new(
            Duration::from_millis(self.config.initial_backoff_ms),
            Duration::from_millis(self.config.max_backoff_ms),
        );

        loop {
            match self.try_fetch_page(credential, cutoff, cursor).await {
                Attempt::Done(page) => return Ok(page),
                Attempt::Fail(err) => return Err(err),
                Attempt::Retry(reason) => {
                    if backoff.current_attempt() >= self.config.max_retries {
                        return Err(SourceError::Unavailable(reason));
                    }
                    let delay = backoff.next_delay();
                    warn!(
                        cursor,
                        attempt = backoff.current_attempt(),
                        delay_ms = delay.as_millis() as u64,
                        reason = %reason,
                        "retrying trade offer page"
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }

    async fn try_fetch_page(
        &self,
        credential: &Credential,
        cutoff: u64,
        cursor: u64,
    ) -> Attempt<OffersResponse> {
        let query = [
            ("key", credential.expose().to_string()),
            ("get_sent_offers", "1".to_string()),
            ("get_received_offers", "1".to_string()),
            ("active_only", "1".to_string()),
            ("time_historical_cutoff", cutoff.to_string()),
            ("cursor", cursor.to_string()),
        ];

        let response = match self
            .client
            .get(self.url(GET_TRADE_OFFERS))
            .query(&query)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => return Attempt::Retry(format!("request failed: {e}")),
        };

        let status = response.status();
        if let Some(err) = status_error(status) {
            return Attempt::Fail(err);
        }
        if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
            return Attempt::Retry(format!("steam api returned {status}"));
        }
        if !status.is_success() {
            return Attempt::Fail(SourceError::Unavailable(format!(
                "steam api returned {status}"
            )));
        }

        match response.json::<OffersResponse>().await {
            Ok(page) => Attempt::Done(page),
            Err(e) => Attempt::Fail(SourceError::Malformed(e.to_string())),
        }
    }
}

fn status_error(status: StatusCode) -> Option<SourceError> {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Some(SourceError::Unauthorized(
            format!("steam api rejected the key with {status}"),
        )),
        _ => None,
    }
}

fn historical_cutoff(window_secs: u64) -> u64 {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    now.saturating_sub(window_secs)
}

#[async_trait]
impl OfferSource for SteamOfferSource {
    async fn list_offers(
        &self,
        credential: &Credential,
        options: &ListOptions,
    ) -> Result<Vec<OfferSnapshot>, SourceError> {
        let cutoff = historical_cutoff(options.historical_cutoff_secs);
        let mut offers = Vec::new();
        let mut cursor = 0u64;
        let mut pages = 0u32;

        loop {
            let response = self.fetch_page(credential, cutoff, cursor).await?;
            pages += 1;

            let next_cursor = response.response.next_cursor;
            offers.extend(response.response.into_snapshots(cutoff));

            if next_cursor == 0 || next_cursor == cursor {
                break;
            }
            if pages >= self.config.max_pages {
                warn!(pages, next_cursor, "page limit reached, listing truncated");
                break;
            }
            cursor = next_cursor;
        }

        debug!(pages, offers = offers.len(), "listed trade offers");
        Ok(offers)
    }
}
