use serde::{Deserialize, Serialize};

use crate::ItemPattern;

/// Payload shared by the plain status events.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeStatus {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,
    pub counterparty_id: String,
    pub item_ids: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WrongPartner {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,
    pub offer_counterparty_id: String,
    pub expected_counterparty_id: String,
    pub item_ids: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WrongItems {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,
    pub counterparty_id: String,
    pub expected_item_ids: ItemPattern,
    pub observed_item_ids: Vec<String>,
}

/// One side of a compromise report.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompromisedTrade {
    pub counterparty_id: String,
    /// Globally addressable form of `counterparty_id`
    pub global_id: String,
    pub item_ids: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompromisedApiKey {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,
    /// The canceled offer to the expected partner
    pub original_trade: CompromisedTrade,
    /// The later lookalike offer from someone else
    pub suspicious_trade: CompromisedTrade,
}

/// Classification event published for a tracked intent.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "payload", rename_all = "camelCase")]
pub enum TrackEvent {
    TradeSent(TradeStatus),
    TradeAccepted(TradeStatus),
    TradeCanceled(TradeStatus),
    TradeDeclined(TradeStatus),
    WrongPartner(WrongPartner),
    WrongItems(WrongItems),
    CompromisedApiKey(CompromisedApiKey),
}

impl TrackEvent {
    /// Wire name of the event
    pub fn name(&self) -> &'static str {
        match self {
            Self::TradeSent(_) => "tradeSent",
            Self::TradeAccepted(_) => "tradeAccepted",
            Self::TradeCanceled(_) => "tradeCanceled",
            Self::TradeDeclined(_) => "tradeDeclined",
            Self::WrongPartner(_) => "wrongPartner",
            Self::WrongItems(_) => "wrongItems",
            Self::CompromisedApiKey(_) => "compromisedApiKey",
        }
    }

    pub fn correlation_id(&self) -> Option<&str> {
        match self {
            Self::TradeSent(p)
            | Self::TradeAccepted(p)
            | Self::TradeCanceled(p)
            | Self::TradeDeclined(p) => p.correlation_id.as_deref(),
            Self::WrongPartner(p) => p.correlation_id.as_deref(),
            Self::WrongItems(p) => p.correlation_id.as_deref(),
            Self::CompromisedApiKey(p) => p.correlation_id.as_deref(),
        }
    }

    /// Anomalies are divergences the caller can still act on.
    pub fn is_anomaly(&self) -> bool {
        matches!(
            self,
            Self::WrongPartner(_) | Self::WrongItems(_) | Self::CompromisedApiKey(_)
        )
    }
}

/// Classification result for one intent.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Outcome {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,

    /// Offer matching both partner and items, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matched_offer_id: Option<String>,

    /// Events emitted for the intent, in emission order
    pub events: Vec<TrackEvent>,
}

impl Outcome {
    /// No event was produced for the intent.
    pub fn is_no_signal(&self) -> bool {
        self.events.is_empty()
    }

    pub fn event_names(&self) -> Vec<&'static str> {
        self.events.iter().map(TrackEvent::name).collect()
    }

    pub fn has_anomaly(&self) -> bool {
        self.events.iter().any(TrackEvent::is_anomaly)
    }
}
