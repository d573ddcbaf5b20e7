//! Core types for the trade offer tracker
//!
//! Offer snapshots observed at the exchange service, the intents callers
//! reconcile them against, and the events a reconciliation emits.

pub mod event;
pub mod intent;
pub mod offer;
pub mod pattern;

pub use event::*;
pub use intent::*;
pub use offer::*;
pub use pattern::*;
