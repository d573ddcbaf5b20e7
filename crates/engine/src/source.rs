use async_trait::async_trait;
use trade_tracker_types::OfferSnapshot;

use crate::SourceError;

/// Offers older than this many seconds are not requested by default.
pub const DEFAULT_HISTORICAL_CUTOFF_SECS: u64 = 900;

/// Reference to the credential offers are listed with.
///
/// The secret never appears in `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

/// Options for a single listing request
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ListOptions {
    /// How far back, in seconds, offers are requested
    pub historical_cutoff_secs: u64,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            historical_cutoff_secs: DEFAULT_HISTORICAL_CUTOFF_SECS,
        }
    }
}

/// Supplies every offer visible to a credential
#[async_trait]
pub trait OfferSource: Send + Sync {
    /// List sent and received offers, newest history bounded by `options`
    async fn list_offers(
        &self,
        credential: &Credential,
        options: &ListOptions,
    ) -> Result<Vec<OfferSnapshot>, SourceError>;
}
