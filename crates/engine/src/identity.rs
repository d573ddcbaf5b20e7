use tracing::warn;

/// Steam64 id of account id 0 in the public universe (`[U:1:0]`).
pub const STEAM64_INDIVIDUAL_BASE: u64 = 76_561_197_960_265_728;

/// Derives a globally addressable identifier from a counterparty's local id.
///
/// Only used to make compromise reports actionable by a human.
pub trait GlobalIdResolver: Send + Sync {
    fn global_id(&self, local_id: &str) -> String;
}

impl<F> GlobalIdResolver for F
where
    F: Fn(&str) -> String + Send + Sync,
{
    fn global_id(&self, local_id: &str) -> String {
        self(local_id)
    }
}

/// Maps a Steam account id to its Steam64 form.
///
/// Assumes the counterparty is an individual account in the public universe
/// and that `local_id` is the 32-bit account id the Web API reports. Anything
/// that does not parse as a `u32` (including ids already in Steam64 form) is
/// reported unchanged.
#[derive(Clone, Copy, Debug, Default)]
pub struct SteamId64Resolver;

impl GlobalIdResolver for SteamId64Resolver {
    fn global_id(&self, local_id: &str) -> String {
        match local_id.parse::<u32>() {
            Ok(account_id) => (STEAM64_INDIVIDUAL_BASE + u64::from(account_id)).to_string(),
            Err(_) => {
                warn!(local_id = %local_id, "account id is not numeric, reporting it unchanged");
                local_id.to_string()
            }
        }
    }
}
