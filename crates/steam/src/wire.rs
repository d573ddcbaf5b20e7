use serde::Deserialize;
use tracing::debug;
use trade_tracker_types::{OfferSnapshot, OfferState};

/// Envelope returned by `IEconService/GetTradeOffers/v1`
#[derive(Debug, Deserialize)]
pub struct OffersResponse {
    pub response: OffersPage,
}

#[derive(Debug, Default, Deserialize)]
pub struct OffersPage {
    #[serde(default)]
    pub trade_offers_sent: Vec<WireOffer>,

    #[serde(default)]
    pub trade_offers_received: Vec<WireOffer>,

    #[serde(default)]
    pub next_cursor: u64,
}

/// One offer exactly as reported; only the fields the tracker reads.
#[derive(Debug, Clone, Deserialize)]
pub struct WireOffer {
    pub tradeofferid: String,
    pub accountid_other: u32,
    pub trade_offer_state: u32,

    /// Items leaving the credential holder's inventory
    #[serde(default)]
    pub items_to_give: Vec<ItemAsset>,

    #[serde(default)]
    pub is_our_offer: bool,

    /// Unix seconds
    pub time_created: u64,

    /// Unix seconds of the last state change
    #[serde(default)]
    pub time_updated: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ItemAsset {
    pub assetid: String,
}

impl WireOffer {
    /// Last time the offer changed, falling back to its creation time
    pub fn last_activity(&self) -> u64 {
        self.time_updated.unwrap_or(self.time_created)
    }

    /// Convert into a snapshot. Offers with an unknown state code or no
    /// outgoing items cannot take part in reconciliation and yield `None`.
    pub fn into_snapshot(self) -> Option<OfferSnapshot> {
        let Some(state) = OfferState::from_code(self.trade_offer_state) else {
            debug!(
                offer_id = %self.tradeofferid,
                code = self.trade_offer_state,
                "skipping offer with unknown state"
            );
            return None;
        };

        let item_ids = self
            .items_to_give
            .into_iter()
            .map(|item| item.assetid)
            .collect();

        match OfferSnapshot::new(
            self.tradeofferid,
            self.accountid_other.to_string(),
            item_ids,
            self.time_created,
            self.is_our_offer,
            state,
        ) {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                debug!(error = %e, "skipping offer");
                None
            }
        }
    }
}

impl OffersPage {
    /// Sent offers first, then received ones. Offers idle since before
    /// `cutoff` (unix seconds) are dropped.
    pub fn into_snapshots(self, cutoff: u64) -> impl Iterator<Item = OfferSnapshot> {
        self.trade_offers_sent
            .into_iter()
            .chain(self.trade_offers_received)
            .filter(move |offer| {
                let fresh = offer.last_activity() >= cutoff;
                if !fresh {
                    debug!(
                        offer_id = %offer.tradeofferid,
                        last_activity = offer.last_activity(),
                        cutoff,
                        "skipping offer outside the history window"
                    );
                }
                fresh
            })
            .filter_map(WireOffer::into_snapshot)
    }
}
