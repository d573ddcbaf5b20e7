use serde::{Deserialize, Serialize};

use crate::{ItemPattern, MatchMode};

/// Lifecycle state of a trade offer as reported by the exchange service.
///
/// Discriminants are the Steam Web API `ETradeOfferState` codes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OfferState {
    Invalid = 1,
    Sent = 2,
    Accepted = 3,
    Countered = 4,
    Expired = 5,
    Canceled = 6,
    Declined = 7,
    InvalidItems = 8,
    NeedsConfirmation = 9,
    CanceledBySecondFactor = 10,
    Escrow = 11,
}

impl OfferState {
    /// Map a wire code to a state. Unknown codes yield `None`.
    pub fn from_code(code: u32) -> Option<Self> {
        let state = match code {
            1 => Self::Invalid,
            2 => Self::Sent,
            3 => Self::Accepted,
            4 => Self::Countered,
            5 => Self::Expired,
            6 => Self::Canceled,
            7 => Self::Declined,
            8 => Self::InvalidItems,
            9 => Self::NeedsConfirmation,
            10 => Self::CanceledBySecondFactor,
            11 => Self::Escrow,
            _ => return None,
        };
        Some(state)
    }

    pub fn code(self) -> u32 {
        self as u32
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SnapshotError {
    #[error("offer id is empty")]
    MissingId,

    #[error("offer {offer_id} has no counterparty")]
    MissingCounterparty { offer_id: String },

    #[error("offer {offer_id} carries no items")]
    NoItems { offer_id: String },
}

/// Point-in-time projection of one observed trade offer.
///
/// Fields are read-only once constructed; a fresh fetch yields fresh snapshots.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferSnapshot {
    id: String,
    counterparty_id: String,
    item_ids: Vec<String>,
    /// Unix seconds
    created_at: u64,
    is_own_offer: bool,
    state: OfferState,
}

impl OfferSnapshot {
    pub fn new(
        id: impl Into<String>,
        counterparty_id: impl Into<String>,
        item_ids: Vec<String>,
        created_at: u64,
        is_own_offer: bool,
        state: OfferState,
    ) -> Result<Self, SnapshotError> {
        let id = id.into();
        let counterparty_id = counterparty_id.into();

        if id.is_empty() {
            return Err(SnapshotError::MissingId);
        }
        if counterparty_id.is_empty() {
            return Err(SnapshotError::MissingCounterparty { offer_id: id });
        }
        if item_ids.is_empty() {
            return Err(SnapshotError::NoItems { offer_id: id });
        }

        Ok(Self {
            id,
            counterparty_id,
            item_ids,
            created_at,
            is_own_offer,
            state,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn counterparty_id(&self) -> &str {
        &self.counterparty_id
    }

    pub fn item_ids(&self) -> &[String] {
        &self.item_ids
    }

    pub fn created_at(&self) -> u64 {
        self.created_at
    }

    pub fn is_own_offer(&self) -> bool {
        self.is_own_offer
    }

    pub fn state(&self) -> OfferState {
        self.state
    }

    pub fn is_canceled(&self) -> bool {
        self.state == OfferState::Canceled
    }

    pub fn is_declined(&self) -> bool {
        self.state == OfferState::Declined
    }

    pub fn is_sent(&self) -> bool {
        self.state == OfferState::Sent
    }

    pub fn is_accepted(&self) -> bool {
        self.state == OfferState::Accepted
    }

    pub fn is_needing_confirmation(&self) -> bool {
        self.state == OfferState::NeedsConfirmation
    }

    /// Still reversible by the credential holder.
    pub fn is_cancelable(&self) -> bool {
        self.is_needing_confirmation() || self.is_sent()
    }

    pub fn has_items(&self, pattern: &ItemPattern, mode: MatchMode) -> bool {
        pattern.matches(&self.item_ids, mode)
    }
}
