use thiserror::Error;
use trade_tracker_types::IntentError;

/// Failure of the offer source. Fatal for the whole batch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    #[error("offer source unavailable: {0}")]
    Unavailable(String),

    #[error("credential rejected by offer source: {0}")]
    Unauthorized(String),

    #[error("malformed offer source response: {0}")]
    Malformed(String),
}

impl SourceError {
    /// Stable label for logs and metrics
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Unavailable(_) => "source_unavailable",
            Self::Unauthorized(_) => "source_unauthorized",
            Self::Malformed(_) => "source_malformed",
        }
    }
}

#[derive(Debug, Error)]
pub enum TrackError {
    #[error("invalid intent at index {index}: {reason}")]
    InvalidIntent {
        index: usize,
        #[source]
        reason: IntentError,
    },

    #[error(transparent)]
    Source(#[from] SourceError),
}
