//! HTTP-level tests for the Steam offer source against a mock server

use httpmock::prelude::*;
use serde_json::json;
use std::time::{SystemTime, UNIX_EPOCH};
use trade_tracker_engine::{Credential, ListOptions, OfferSource, SourceError};
use trade_tracker_steam::{SteamClientConfig, SteamOfferSource};
use trade_tracker_types::OfferState;

const PATH: &str = "/IEconService/GetTradeOffers/v1/";

fn source(server: &MockServer) -> SteamOfferSource {
    let config = SteamClientConfig::default()
        .with_base_url(server.base_url())
        .with_max_retries(2)
        .with_initial_backoff_ms(1);
    SteamOfferSource::new(config).unwrap()
}

fn now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs()
}

fn offer(id: &str, account: u32, state: u32, asset: &str, own: bool) -> serde_json::Value {
    json!({
        "tradeofferid": id,
        "accountid_other": account,
        "trade_offer_state": state,
        "items_to_give": [{"appid": 730, "contextid": "2", "assetid": asset}],
        "is_our_offer": own,
        "time_created": now() - 60
    })
}

// ═══════════════════════════════════════════════════════════════════════════
// LISTING
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_lists_sent_and_received_offers() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path(PATH)
                .query_param("key", "secret")
                .query_param("get_sent_offers", "1")
                .query_param("get_received_offers", "1")
                .query_param("active_only", "1")
                .query_param("cursor", "0");
            then.status(200).json_body(json!({
                "response": {
                    "trade_offers_sent": [offer("10", 1, 2, "111", true)],
                    "trade_offers_received": [offer("11", 2, 9, "111", false)],
                    "next_cursor": 0
                }
            }));
        })
        .await;

    let offers = source(&server)
        .list_offers(&Credential::new("secret"), &ListOptions::default())
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(offers.len(), 2);
    assert_eq!(offers[0].id(), "10");
    assert_eq!(offers[0].state(), OfferState::Sent);
    assert_eq!(offers[1].counterparty_id(), "2");
    assert!(offers[1].is_needing_confirmation());
}

#[tokio::test]
async fn test_follows_cursor_pages() {
    let server = MockServer::start_async().await;
    let first = server
        .mock_async(|when, then| {
            when.method(GET).path(PATH).query_param("cursor", "0");
            then.status(200).json_body(json!({
                "response": {
                    "trade_offers_sent": [offer("1", 1, 3, "a", true)],
                    "next_cursor": 7
                }
            }));
        })
        .await;
    let second = server
        .mock_async(|when, then| {
            when.method(GET).path(PATH).query_param("cursor", "7");
            then.status(200).json_body(json!({
                "response": {
                    "trade_offers_sent": [offer("2", 1, 7, "b", true)],
                    "next_cursor": 0
                }
            }));
        })
        .await;

    let offers = source(&server)
        .list_offers(&Credential::new("k"), &ListOptions::default())
        .await
        .unwrap();

    first.assert_async().await;
    second.assert_async().await;
    let ids: Vec<_> = offers.iter().map(|o| o.id()).collect();
    assert_eq!(ids, vec!["1", "2"]);
}

#[tokio::test]
async fn test_page_limit_truncates_listing() {
    let server = MockServer::start_async().await;
    let looping = server
        .mock_async(|when, then| {
            when.method(GET).path(PATH).query_param("cursor", "0");
            then.status(200).json_body(json!({
                "response": {
                    "trade_offers_sent": [offer("1", 1, 2, "a", true)],
                    "next_cursor": 5
                }
            }));
        })
        .await;

    let config = SteamClientConfig::default()
        .with_base_url(server.base_url())
        .with_max_pages(1);
    let offers = SteamOfferSource::new(config)
        .unwrap()
        .list_offers(&Credential::new("k"), &ListOptions::default())
        .await
        .unwrap();

    assert_eq!(looping.hits_async().await, 1);
    assert_eq!(offers.len(), 1);
}

#[tokio::test]
async fn test_offers_outside_history_window_are_dropped() {
    let recent = now() - 120;
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path(PATH)
                .query_param("active_only", "1")
                .query_param_exists("time_historical_cutoff");
            then.status(200).json_body(json!({
                "response": {
                    "trade_offers_sent": [
                        {
                            "tradeofferid": "stale",
                            "accountid_other": 1,
                            "trade_offer_state": 6,
                            "items_to_give": [{"assetid": "a"}],
                            "is_our_offer": true,
                            "time_created": 1000,
                            "time_updated": 1000
                        },
                        {
                            "tradeofferid": "revived",
                            "accountid_other": 1,
                            "trade_offer_state": 6,
                            "items_to_give": [{"assetid": "a"}],
                            "is_our_offer": true,
                            "time_created": 1000,
                            "time_updated": recent
                        },
                        {
                            "tradeofferid": "fresh",
                            "accountid_other": 1,
                            "trade_offer_state": 2,
                            "items_to_give": [{"assetid": "a"}],
                            "is_our_offer": true,
                            "time_created": recent
                        }
                    ],
                    "next_cursor": 0
                }
            }));
        })
        .await;

    let offers = source(&server)
        .list_offers(&Credential::new("k"), &ListOptions::default())
        .await
        .unwrap();

    mock.assert_async().await;
    let ids: Vec<_> = offers.iter().map(|o| o.id()).collect();
    assert_eq!(ids, vec!["revived", "fresh"]);
}

// ═══════════════════════════════════════════════════════════════════════════
// FAILURES
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_rejected_key_is_unauthorized_without_retry() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path(PATH);
            then.status(403);
        })
        .await;

    let err = source(&server)
        .list_offers(&Credential::new("bad"), &ListOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, SourceError::Unauthorized(_)));
    assert_eq!(mock.hits_async().await, 1);
}

#[tokio::test]
async fn test_server_errors_are_retried_then_reported() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path(PATH);
            then.status(503);
        })
        .await;

    let err = source(&server)
        .list_offers(&Credential::new("k"), &ListOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, SourceError::Unavailable(_)));
    // first attempt plus two retries
    assert_eq!(mock.hits_async().await, 3);
}

#[tokio::test]
async fn test_undecodable_body_is_malformed() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path(PATH);
            then.status(200).body("<html>maintenance</html>");
        })
        .await;

    let err = source(&server)
        .list_offers(&Credential::new("k"), &ListOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, SourceError::Malformed(_)));
}

// ═══════════════════════════════════════════════════════════════════════════
// CANCELLATION
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_cancel_offer_posts_form() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/IEconService/CancelTradeOffer/v1/")
                .body_contains("tradeofferid=42");
            then.status(200).json_body(json!({"response": {}}));
        })
        .await;

    source(&server)
        .cancel_offer(&Credential::new("k"), "42")
        .await
        .unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn test_cancel_with_rejected_key() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/IEconService/CancelTradeOffer/v1/");
            then.status(401);
        })
        .await;

    let err = source(&server)
        .cancel_offer(&Credential::new("bad"), "42")
        .await
        .unwrap_err();

    assert!(matches!(err, SourceError::Unauthorized(_)));
}
