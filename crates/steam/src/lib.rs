//! Steam Web API offer source
//!
//! Lists sent and received trade offers through `IEconService`, following
//! the pagination cursor and retrying transient failures, and converts them
//! into offer snapshots for the tracker.

pub mod backoff;
pub mod client;
pub mod wire;

pub use backoff::ExponentialBackoff;
pub use client::{SteamClientConfig, SteamOfferSource, STEAM_API_BASE_URL};
pub use wire::{ItemAsset, OffersPage, OffersResponse, WireOffer};
