//! Configuration structures

use serde::{Deserialize, Serialize};
use trade_tracker_engine::{CompromisePolicy, Credential, TrackerConfig, DEFAULT_HISTORICAL_CUTOFF_SECS};
use trade_tracker_steam::{SteamClientConfig, STEAM_API_BASE_URL};
use trade_tracker_types::MatchMode;

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub tracker: TrackerSection,

    #[serde(default)]
    pub steam: SteamSection,

    #[serde(default)]
    pub logging: LoggingSection,
}

/// Classification settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackerSection {
    /// `exact` or `superset`
    #[serde(default)]
    pub match_mode: MatchMode,

    /// `always` or `require_cancelable`
    #[serde(default)]
    pub compromise_policy: CompromisePolicy,

    #[serde(default = "default_historical_cutoff_secs")]
    pub historical_cutoff_secs: u64,
}

/// Steam Web API access
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SteamSection {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Web API key; usually supplied through the environment
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,

    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    #[serde(default = "default_max_pages")]
    pub max_pages: u32,

    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,

    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,
}

/// Log output and metrics exposition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingSection {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output
    #[serde(default = "default_true")]
    pub json: bool,

    #[serde(default = "default_true")]
    pub metrics_enabled: bool,

    #[serde(default = "default_metrics_port")]
    pub metrics_port: u16,
}

fn default_historical_cutoff_secs() -> u64 {
    DEFAULT_HISTORICAL_CUTOFF_SECS
}

fn default_base_url() -> String {
    STEAM_API_BASE_URL.to_string()
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_max_retries() -> u32 {
    3
}

fn default_max_pages() -> u32 {
    20
}

fn default_initial_backoff_ms() -> u64 {
    250
}

fn default_max_backoff_ms() -> u64 {
    5_000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_metrics_port() -> u16 {
    9090
}

impl Default for TrackerSection {
    fn default() -> Self {
        Self {
            match_mode: MatchMode::default(),
            compromise_policy: CompromisePolicy::default(),
            historical_cutoff_secs: default_historical_cutoff_secs(),
        }
    }
}

impl Default for SteamSection {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            timeout_ms: default_timeout_ms(),
            max_retries: default_max_retries(),
            max_pages: default_max_pages(),
            initial_backoff_ms: default_initial_backoff_ms(),
            max_backoff_ms: default_max_backoff_ms(),
        }
    }
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: default_true(),
            metrics_enabled: default_true(),
            metrics_port: default_metrics_port(),
        }
    }
}

impl From<&TrackerSection> for TrackerConfig {
    fn from(section: &TrackerSection) -> Self {
        TrackerConfig::default()
            .with_match_mode(section.match_mode)
            .with_compromise_policy(section.compromise_policy)
            .with_historical_cutoff_secs(section.historical_cutoff_secs)
    }
}

impl From<&SteamSection> for SteamClientConfig {
    fn from(section: &SteamSection) -> Self {
        SteamClientConfig {
            base_url: section.base_url.clone(),
            timeout_ms: section.timeout_ms,
            max_retries: section.max_retries,
            max_pages: section.max_pages,
            initial_backoff_ms: section.initial_backoff_ms,
            max_backoff_ms: section.max_backoff_ms,
        }
    }
}

impl AppConfig {
    pub fn tracker_config(&self) -> TrackerConfig {
        TrackerConfig::from(&self.tracker)
    }

    pub fn steam_client_config(&self) -> SteamClientConfig {
        SteamClientConfig::from(&self.steam)
    }

    /// Credential from `steam.api_key`, if one is configured
    pub fn credential(&self) -> Option<Credential> {
        self.steam
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .map(Credential::new)
    }
}
