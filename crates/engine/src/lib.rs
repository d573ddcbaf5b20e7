//! Reconciliation engine for the trade offer tracker
//!
//! Given the offers visible to a credential and a batch of intended trades,
//! classifies each intent and publishes one typed event per finding,
//! including evidence that the credential was used to redirect items.

pub mod classify;
pub mod error;
pub mod identity;
pub mod memory;
pub mod sink;
pub mod source;
pub mod tracker;

pub use classify::*;
pub use error::*;
pub use identity::*;
pub use memory::*;
pub use sink::*;
pub use source::*;
pub use tracker::*;
