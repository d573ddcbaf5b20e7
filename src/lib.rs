//! Trade offer tracker
//!
//! Reconciles what a caller meant to trade with the offers a Steam Web API
//! key can see, and reports the outcome as events: sent, accepted,
//! declined, canceled, sent to the wrong partner, sent with the wrong items,
//! or a compromised API key.
//!
//! ```no_run
//! use std::sync::Arc;
//! use trade_tracker::config::{validate_config, ConfigLoader};
//! use trade_tracker::engine::{TracingSink, TradeTracker};
//! use trade_tracker::steam::SteamOfferSource;
//! use trade_tracker::types::{ItemPattern, TradeIntent};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ConfigLoader::from_env()?;
//! validate_config(&config)?;
//!
//! let source = SteamOfferSource::new(config.steam_client_config())?;
//! let tracker = TradeTracker::builder()
//!     .with_source(Arc::new(source))
//!     .with_sink(Arc::new(TracingSink))
//!     .with_config(config.tracker_config())
//!     .build()?;
//!
//! let credential = config.credential().ok_or("steam.api_key is not set")?;
//! let intent = TradeIntent::new("22202", ItemPattern::exact(["1234567890"]));
//! let outcomes = tracker.track(&credential, &[intent]).await?;
//! # Ok(())
//! # }
//! ```

pub use trade_tracker_config as config;
pub use trade_tracker_engine as engine;
pub use trade_tracker_metrics as metrics;
pub use trade_tracker_steam as steam;
pub use trade_tracker_types as types;
