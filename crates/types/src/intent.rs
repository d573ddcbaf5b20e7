use serde::{Deserialize, Serialize};

use crate::{ItemPattern, ItemTerm};

/// A caller's expectation of one trade: who the partner is and which
/// items should change hands.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeIntent {
    /// Expected counterparty
    pub counterparty_id: String,

    /// Expected items
    pub item_pattern: ItemPattern,

    /// Echoed back in every event emitted for this intent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,

    /// Offers created at or before this unix second are ignored for this intent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_after: Option<u64>,
}

impl TradeIntent {
    pub fn new(counterparty_id: impl Into<String>, item_pattern: ItemPattern) -> Self {
        Self {
            counterparty_id: counterparty_id.into(),
            item_pattern,
            correlation_id: None,
            created_after: None,
        }
    }

    pub fn builder() -> TradeIntentBuilder {
        TradeIntentBuilder::default()
    }

    pub fn with_correlation_id(mut self, correlation_id: impl Into<String>) -> Self {
        self.correlation_id = Some(correlation_id.into());
        self
    }

    pub fn with_created_after(mut self, created_after: u64) -> Self {
        self.created_after = Some(created_after);
        self
    }

    /// Check the caller contract: non-empty counterparty and pattern, and no
    /// empty alternative group.
    pub fn validate(&self) -> Result<(), IntentError> {
        if self.counterparty_id.trim().is_empty() {
            return Err(IntentError::MissingCounterparty);
        }

        if self.item_pattern.is_empty() {
            return Err(IntentError::EmptyPattern);
        }

        for (position, term) in self.item_pattern.terms().iter().enumerate() {
            match term {
                ItemTerm::Required(id) if id.is_empty() => {
                    return Err(IntentError::EmptyItemId { position });
                }
                ItemTerm::ExactlyOneOf(alternatives) if alternatives.is_empty() => {
                    return Err(IntentError::EmptyAlternatives { position });
                }
                _ => {}
            }
        }

        Ok(())
    }

    /// Whether an offer created at `created_at` is visible to this intent.
    pub fn admits(&self, created_at: u64) -> bool {
        match self.created_after {
            Some(floor) => created_at > floor,
            None => true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IntentError {
    #[error("missing counterparty id")]
    MissingCounterparty,

    #[error("item pattern is empty")]
    EmptyPattern,

    #[error("item pattern term {position} has an empty item id")]
    EmptyItemId { position: usize },

    #[error("item pattern term {position} has no alternatives")]
    EmptyAlternatives { position: usize },
}

/// Builder for trade intents
#[derive(Default)]
pub struct TradeIntentBuilder {
    counterparty_id: Option<String>,
    terms: Vec<ItemTerm>,
    correlation_id: Option<String>,
    created_after: Option<u64>,
}

impl TradeIntentBuilder {
    pub fn counterparty(mut self, counterparty_id: impl Into<String>) -> Self {
        self.counterparty_id = Some(counterparty_id.into());
        self
    }

    pub fn item(mut self, item_id: impl Into<String>) -> Self {
        self.terms.push(ItemTerm::required(item_id));
        self
    }

    pub fn one_of<I, S>(mut self, item_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.terms.push(ItemTerm::one_of(item_ids));
        self
    }

    pub fn correlation_id(mut self, correlation_id: impl Into<String>) -> Self {
        self.correlation_id = Some(correlation_id.into());
        self
    }

    pub fn created_after(mut self, created_after: u64) -> Self {
        self.created_after = Some(created_after);
        self
    }

    /// Build and validate the intent
    pub fn build(self) -> Result<TradeIntent, IntentError> {
        let counterparty_id = self.counterparty_id.ok_or(IntentError::MissingCounterparty)?;

        let intent = TradeIntent {
            counterparty_id,
            item_pattern: ItemPattern::new(self.terms),
            correlation_id: self.correlation_id,
            created_after: self.created_after,
        };
        intent.validate()?;

        Ok(intent)
    }
}
