use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use trade_tracker_types::{
    CompromisedApiKey, CompromisedTrade, MatchMode, OfferSnapshot, Outcome, TrackEvent,
    TradeIntent, TradeStatus, WrongItems, WrongPartner,
};

use crate::{GlobalIdResolver, DEFAULT_HISTORICAL_CUTOFF_SECS};

/// When a lookalike offer following a canceled one is reported as a
/// compromised credential.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompromisePolicy {
    /// Report whatever state the suspicious offer is in
    #[default]
    Always,

    /// Report only while the suspicious offer can still be canceled
    RequireCancelable,
}

impl CompromisePolicy {
    fn reports(self, suspicious: &OfferSnapshot) -> bool {
        match self {
            Self::Always => true,
            Self::RequireCancelable => suspicious.is_cancelable(),
        }
    }
}

/// Classification settings
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// Item matching strictness
    #[serde(default)]
    pub match_mode: MatchMode,

    /// Reporting rule for suspicious lookalike offers
    #[serde(default)]
    pub compromise_policy: CompromisePolicy,

    /// History window requested from the offer source
    #[serde(default = "default_historical_cutoff_secs")]
    pub historical_cutoff_secs: u64,
}

fn default_historical_cutoff_secs() -> u64 {
    DEFAULT_HISTORICAL_CUTOFF_SECS
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            match_mode: MatchMode::default(),
            compromise_policy: CompromisePolicy::default(),
            historical_cutoff_secs: default_historical_cutoff_secs(),
        }
    }
}

impl TrackerConfig {
    pub fn with_match_mode(mut self, match_mode: MatchMode) -> Self {
        self.match_mode = match_mode;
        self
    }

    pub fn with_compromise_policy(mut self, policy: CompromisePolicy) -> Self {
        self.compromise_policy = policy;
        self
    }

    pub fn with_historical_cutoff_secs(mut self, secs: u64) -> Self {
        self.historical_cutoff_secs = secs;
        self
    }
}

/// Classify one intent against an offer snapshot.
///
/// Pure apart from logging: the same snapshot, intent and config always give
/// the same outcome. Offers are searched in snapshot order, so the first
/// qualifying offer wins every lookup.
pub fn classify(
    offers: &[OfferSnapshot],
    intent: &TradeIntent,
    config: &TrackerConfig,
    resolver: &dyn GlobalIdResolver,
) -> Outcome {
    let visible: Vec<&OfferSnapshot> = offers
        .iter()
        .filter(|offer| intent.admits(offer.created_at()))
        .collect();
    let same_items =
        |offer: &OfferSnapshot| offer.has_items(&intent.item_pattern, config.match_mode);
    let same_partner = |offer: &OfferSnapshot| offer.counterparty_id() == intent.counterparty_id;

    let mut outcome = Outcome {
        correlation_id: intent.correlation_id.clone(),
        ..Outcome::default()
    };

    let matched = visible
        .iter()
        .copied()
        .find(|&offer| same_partner(offer) && same_items(offer));

    if let Some(matched) = matched {
        outcome.matched_offer_id = Some(matched.id().to_string());

        if matched.is_canceled() {
            let suspicious = visible.iter().copied().find(|&offer| {
                !same_partner(offer)
                    && same_items(offer)
                    && !offer.is_own_offer()
                    && offer.created_at() > matched.created_at()
            });

            let event = match suspicious {
                Some(suspicious) if config.compromise_policy.reports(suspicious) => {
                    warn!(
                        original_offer = %matched.id(),
                        suspicious_offer = %suspicious.id(),
                        expected_counterparty = %intent.counterparty_id,
                        suspicious_counterparty = %suspicious.counterparty_id(),
                        "canceled offer reappeared with another partner"
                    );
                    compromised(intent, matched, suspicious, resolver)
                }
                _ => TrackEvent::TradeCanceled(status(intent, matched)),
            };
            outcome.events.push(event);
            return outcome;
        }

        if let Some(event) = status_event(intent, matched) {
            outcome.events.push(event);
            return outcome;
        }

        debug!(
            offer_id = %matched.id(),
            state = ?matched.state(),
            "matched offer has no reportable status"
        );
    }

    for offer in visible
        .iter()
        .copied()
        .filter(|&offer| same_partner(offer) || same_items(offer))
    {
        if !offer.is_cancelable() {
            continue;
        }

        if !same_partner(offer) {
            outcome.events.push(TrackEvent::WrongPartner(WrongPartner {
                correlation_id: intent.correlation_id.clone(),
                offer_counterparty_id: offer.counterparty_id().to_string(),
                expected_counterparty_id: intent.counterparty_id.clone(),
                item_ids: offer.item_ids().to_vec(),
            }));
        }

        if !same_items(offer) {
            outcome.events.push(TrackEvent::WrongItems(WrongItems {
                correlation_id: intent.correlation_id.clone(),
                counterparty_id: offer.counterparty_id().to_string(),
                expected_item_ids: intent.item_pattern.clone(),
                observed_item_ids: offer.item_ids().to_vec(),
            }));
        }
    }

    outcome
}

/// Declined, then sent, then accepted.
fn status_event(intent: &TradeIntent, offer: &OfferSnapshot) -> Option<TrackEvent> {
    if offer.is_declined() {
        Some(TrackEvent::TradeDeclined(status(intent, offer)))
    } else if offer.is_sent() {
        Some(TrackEvent::TradeSent(status(intent, offer)))
    } else if offer.is_accepted() {
        Some(TrackEvent::TradeAccepted(status(intent, offer)))
    } else {
        None
    }
}

fn status(intent: &TradeIntent, offer: &OfferSnapshot) -> TradeStatus {
    TradeStatus {
        correlation_id: intent.correlation_id.clone(),
        counterparty_id: offer.counterparty_id().to_string(),
        item_ids: offer.item_ids().to_vec(),
    }
}

fn compromised(
    intent: &TradeIntent,
    original: &OfferSnapshot,
    suspicious: &OfferSnapshot,
    resolver: &dyn GlobalIdResolver,
) -> TrackEvent {
    let side = |offer: &OfferSnapshot| CompromisedTrade {
        counterparty_id: offer.counterparty_id().to_string(),
        global_id: resolver.global_id(offer.counterparty_id()),
        item_ids: offer.item_ids().to_vec(),
    };

    TrackEvent::CompromisedApiKey(CompromisedApiKey {
        correlation_id: intent.correlation_id.clone(),
        original_trade: side(original),
        suspicious_trade: side(suspicious),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SteamId64Resolver;
    use trade_tracker_types::{ItemPattern, ItemTerm, OfferState};

    fn offer(
        id: &str,
        counterparty: &str,
        items: &[&str],
        state: OfferState,
        own: bool,
        created_at: u64,
    ) -> OfferSnapshot {
        OfferSnapshot::new(
            id,
            counterparty,
            items.iter().map(|s| s.to_string()).collect(),
            created_at,
            own,
            state,
        )
        .unwrap()
    }

    fn intent(counterparty: &str, items: &[&str]) -> TradeIntent {
        TradeIntent::new(counterparty, ItemPattern::exact(items.iter().copied()))
    }

    fn run(offers: &[OfferSnapshot], intent: &TradeIntent) -> Outcome {
        classify(offers, intent, &TrackerConfig::default(), &SteamId64Resolver)
    }

    #[test]
    fn test_accepted_trade() {
        let offers = vec![offer("10", "1", &["1"], OfferState::Accepted, true, 1000)];
        let outcome = run(&offers, &intent("1", &["1"]));

        assert_eq!(outcome.event_names(), vec!["tradeAccepted"]);
        assert_eq!(outcome.matched_offer_id.as_deref(), Some("10"));
    }

    #[test]
    fn test_sent_and_declined_trades() {
        let sent = vec![offer("10", "1", &["1"], OfferState::Sent, true, 1000)];
        assert_eq!(run(&sent, &intent("1", &["1"])).event_names(), vec!["tradeSent"]);

        let declined = vec![offer("10", "1", &["1"], OfferState::Declined, true, 1000)];
        assert_eq!(run(&declined, &intent("1", &["1"])).event_names(), vec!["tradeDeclined"]);
    }

    #[test]
    fn test_canceled_without_lookalike() {
        let offers = vec![offer("10", "1", &["1"], OfferState::Canceled, true, 1000)];
        let outcome = run(&offers, &intent("1", &["1"]));

        assert_eq!(outcome.event_names(), vec!["tradeCanceled"]);
    }

    #[test]
    fn test_compromised_api_key() {
        let offers = vec![
            offer("10", "1", &["1"], OfferState::Canceled, true, 1100),
            offer("11", "2", &["1"], OfferState::NeedsConfirmation, false, 1101),
        ];
        let outcome = run(&offers, &intent("1", &["1"]).with_correlation_id("t-1"));

        assert_eq!(outcome.events.len(), 1);
        match &outcome.events[0] {
            TrackEvent::CompromisedApiKey(report) => {
                assert_eq!(report.correlation_id.as_deref(), Some("t-1"));
                assert_eq!(report.original_trade.counterparty_id, "1");
                assert_eq!(report.original_trade.global_id, "76561197960265729");
                assert_eq!(report.suspicious_trade.counterparty_id, "2");
                assert_eq!(report.suspicious_trade.global_id, "76561197960265730");
                assert_eq!(report.suspicious_trade.item_ids, vec!["1".to_string()]);
            }
            other => panic!("expected compromise report, got {other:?}"),
        }
    }

    #[test]
    fn test_lookalike_must_be_later_and_received() {
        // earlier lookalike
        let earlier = vec![
            offer("10", "1", &["1"], OfferState::Canceled, true, 1100),
            offer("11", "2", &["1"], OfferState::NeedsConfirmation, false, 1100),
        ];
        assert_eq!(run(&earlier, &intent("1", &["1"])).event_names(), vec!["tradeCanceled"]);

        // our own offer to someone else is not evidence of compromise
        let own = vec![
            offer("10", "1", &["1"], OfferState::Canceled, true, 1100),
            offer("11", "2", &["1"], OfferState::Sent, true, 1200),
        ];
        assert_eq!(run(&own, &intent("1", &["1"])).event_names(), vec!["tradeCanceled"]);
    }

    #[test]
    fn test_compromise_policy_for_settled_lookalike() {
        let offers = vec![
            offer("10", "1", &["1"], OfferState::Canceled, true, 1100),
            offer("11", "2", &["1"], OfferState::Accepted, false, 1101),
        ];
        let trade = intent("1", &["1"]);

        let always = run(&offers, &trade);
        assert_eq!(always.event_names(), vec!["compromisedApiKey"]);

        let strict =
            TrackerConfig::default().with_compromise_policy(CompromisePolicy::RequireCancelable);
        let outcome = classify(&offers, &trade, &strict, &SteamId64Resolver);
        assert_eq!(outcome.event_names(), vec!["tradeCanceled"]);
    }

    #[test]
    fn test_wrong_partner() {
        let offers = vec![offer("10", "1", &["1"], OfferState::NeedsConfirmation, true, 1000)];
        let outcome = run(&offers, &intent("2", &["1"]));

        assert_eq!(outcome.event_names(), vec!["wrongPartner"]);
        assert!(outcome.matched_offer_id.is_none());
        match &outcome.events[0] {
            TrackEvent::WrongPartner(p) => {
                assert_eq!(p.offer_counterparty_id, "1");
                assert_eq!(p.expected_counterparty_id, "2");
            }
            other => panic!("expected wrong partner, got {other:?}"),
        }
    }

    #[test]
    fn test_wrong_items_with_extra_item() {
        let offers = vec![offer("10", "1", &["1", "2"], OfferState::Sent, true, 1000)];
        let outcome = run(&offers, &intent("1", &["1"]));

        assert_eq!(outcome.event_names(), vec!["wrongItems"]);
        match &outcome.events[0] {
            TrackEvent::WrongItems(p) => {
                assert_eq!(p.expected_item_ids, ItemPattern::exact(["1"]));
                assert_eq!(p.observed_item_ids, vec!["1".to_string(), "2".to_string()]);
            }
            other => panic!("expected wrong items, got {other:?}"),
        }
    }

    #[test]
    fn test_superset_mode_accepts_extra_item() {
        let offers = vec![offer("10", "1", &["1", "2"], OfferState::Sent, true, 1000)];
        let config = TrackerConfig::default().with_match_mode(MatchMode::Superset);
        let outcome = classify(&offers, &intent("1", &["1"]), &config, &SteamId64Resolver);

        assert_eq!(outcome.event_names(), vec!["tradeSent"]);
    }

    #[test]
    fn test_offer_wrong_on_both_dimensions_is_not_similar() {
        let offers = vec![offer("10", "3", &["9"], OfferState::Sent, true, 1000)];
        assert!(run(&offers, &intent("1", &["1"])).is_no_signal());
    }

    #[test]
    fn test_several_similar_offers_each_reported() {
        let offers = vec![
            offer("10", "2", &["1"], OfferState::Sent, true, 1000),
            offer("11", "1", &["5"], OfferState::NeedsConfirmation, true, 1000),
        ];
        let outcome = run(&offers, &intent("1", &["1"]));

        assert_eq!(outcome.event_names(), vec!["wrongPartner", "wrongItems"]);
    }

    #[test]
    fn test_same_partner_lookalike_with_group_mismatch_is_wrong_items() {
        let trade = TradeIntent::new("1", ItemPattern::new(vec![ItemTerm::one_of(["1", "2"])]));
        let offers = vec![offer("10", "1", &["1", "2"], OfferState::Sent, true, 1000)];

        assert_eq!(run(&offers, &trade).event_names(), vec!["wrongItems"]);
    }

    #[test]
    fn test_non_cancelable_anomalies_are_silent() {
        let offers = vec![
            offer("10", "2", &["1"], OfferState::Accepted, true, 1000),
            offer("11", "1", &["5"], OfferState::Expired, true, 1000),
        ];
        assert!(run(&offers, &intent("1", &["1"])).is_no_signal());
    }

    #[test]
    fn test_unreportable_match_falls_through_to_similar_offers() {
        let offers = vec![
            offer("10", "1", &["1"], OfferState::NeedsConfirmation, true, 1000),
            offer("11", "2", &["1"], OfferState::Sent, true, 1001),
        ];
        let outcome = run(&offers, &intent("1", &["1"]));

        assert_eq!(outcome.matched_offer_id.as_deref(), Some("10"));
        assert_eq!(outcome.event_names(), vec!["wrongPartner"]);
    }

    #[test]
    fn test_created_after_hides_older_offers() {
        let offers = vec![offer("10", "1", &["1"], OfferState::Accepted, true, 1000)];

        let hidden = run(&offers, &intent("1", &["1"]).with_created_after(1000));
        assert!(hidden.is_no_signal());
        assert!(hidden.matched_offer_id.is_none());

        let visible = run(&offers, &intent("1", &["1"]).with_created_after(999));
        assert_eq!(visible.event_names(), vec!["tradeAccepted"]);
    }

    #[test]
    fn test_first_match_in_snapshot_order_wins() {
        let offers = vec![
            offer("10", "1", &["1"], OfferState::Declined, true, 1000),
            offer("11", "1", &["1"], OfferState::Accepted, true, 1001),
        ];
        let outcome = run(&offers, &intent("1", &["1"]));

        assert_eq!(outcome.matched_offer_id.as_deref(), Some("10"));
        assert_eq!(outcome.event_names(), vec!["tradeDeclined"]);
    }

    #[test]
    fn test_empty_snapshot_is_no_signal() {
        assert!(run(&[], &intent("1", &["1"])).is_no_signal());
    }

    #[test]
    fn test_classification_is_repeatable() {
        let offers = vec![
            offer("10", "1", &["1"], OfferState::Canceled, true, 1100),
            offer("11", "2", &["1"], OfferState::NeedsConfirmation, false, 1101),
            offer("12", "1", &["1", "3"], OfferState::Sent, true, 1102),
        ];
        let trade = intent("1", &["1"]);

        assert_eq!(run(&offers, &trade), run(&offers, &trade));
    }
}
