// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Attendance scanning against the stub API.

use serde_json::json;
use std::time::Duration;
use sukarela_client::screens::Alert;
use sukarela_client::services::scanner::NETWORK_ERROR_MESSAGE;
use sukarela_client::services::{MemoryStorage, ScanOutcome, Scanner};
use sukarela_client::AppState;

mod common;
use common::{dead_address, StubServer};

#[tokio::test]
async fn test_signed_payload_forwarded_unmodified() {
    let stub = StubServer::start().await;
    stub.reply(
        "POST /api/ngo/events/scan",
        200,
        json!({ "message": "Welcome to Beach Cleanup" }),
    );
    let app = stub.logged_in_app();
    let screen = app.scanner_screen();

    let alert = screen
        .on_decode(r#"{"payload":"p","signature":"s"}"#)
        .await
        .expect("scan should be processed");
    assert_eq!(alert, Alert::new("Success", "Welcome to Beach Cleanup"));

    let requests = stub.requests_to("/api/ngo/events/scan");
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, "POST");
    assert_eq!(requests[0].json(), json!({ "payload": "p", "signature": "s" }));
    assert_eq!(requests[0].authorization.as_deref(), Some("Bearer test-token"));
}

#[tokio::test]
async fn test_url_code_routes_to_direct_scan() {
    let stub = StubServer::start().await;
    stub.reply("POST /api/ngo/events/abc123/scan", 201, json!({}));
    let app = stub.logged_in_app();
    let screen = app.scanner_screen();

    let alert = screen
        .on_decode("https://host/api/ngo/events/abc123/scan")
        .await
        .unwrap();
    assert_eq!(alert, Alert::new("Success", "Attendance recorded"));

    let requests = stub.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].path, "/api/ngo/events/abc123/scan");
    assert_eq!(requests[0].authorization.as_deref(), Some("Bearer test-token"));
}

#[tokio::test]
async fn test_unrecognized_code_makes_no_request() {
    let stub = StubServer::start().await;
    let app = stub.logged_in_app();
    let screen = app.scanner_screen();

    let alert = screen.on_decode("WIFI:S:guest;P:pass;;").await.unwrap();
    assert_eq!(
        alert,
        Alert::new(
            "Unrecognized QR",
            "This QR does not contain a valid event id or payload."
        )
    );
    assert!(stub.requests().is_empty());
}

#[tokio::test]
async fn test_in_flight_scan_blocks_others_until_debounce_elapses() {
    let stub = StubServer::start().await;
    stub.reply_slow(
        "POST /api/ngo/events/0c3b2f6e8a10/scan",
        200,
        json!({ "message": "Recorded" }),
        Duration::from_millis(200),
    );
    stub.reply("POST /api/ngo/events/aaaabbbbcccc/scan", 200, json!({}));
    let app = stub.logged_in_app();
    let scanner = Scanner::new(
        app.api.clone(),
        app.store.clone(),
        Duration::from_millis(150),
    );

    let (first, same, other) = tokio::join!(
        scanner.handle_scan("0c3b2f6e8a10"),
        scanner.handle_scan("0c3b2f6e8a10"),
        scanner.handle_scan("aaaabbbbcccc"),
    );
    assert_eq!(first, ScanOutcome::Success("Recorded".to_string()));
    assert_eq!(same, ScanOutcome::Ignored);
    assert_eq!(other, ScanOutcome::Ignored);

    // Still inside the debounce window
    assert!(scanner.is_processing());
    assert_eq!(scanner.handle_scan("aaaabbbbcccc").await, ScanOutcome::Ignored);

    tokio::time::sleep(Duration::from_millis(300)).await;
    assert!(!scanner.is_processing());
    assert_eq!(
        scanner.handle_scan("aaaabbbbcccc").await,
        ScanOutcome::Success("Attendance recorded".to_string())
    );

    assert_eq!(stub.requests_to("/api/ngo/events/0c3b2f6e8a10/scan").len(), 1);
    assert_eq!(stub.requests_to("/api/ngo/events/aaaabbbbcccc/scan").len(), 1);
}

#[tokio::test]
async fn test_unrecognized_code_also_holds_guard() {
    let stub = StubServer::start().await;
    let app = stub.logged_in_app();
    let screen = app.scanner_screen();

    assert!(screen.on_decode("not a code").await.is_some());
    assert!(screen.is_processing());
    assert!(screen.on_decode("0c3b2f6e8a10").await.is_none());
}

#[tokio::test]
async fn test_server_failure_message_surfaces() {
    let stub = StubServer::start().await;
    stub.reply(
        "POST /api/ngo/events/scan",
        422,
        json!({ "message": "QR code expired" }),
    );
    let app = stub.logged_in_app();

    let alert = app
        .scanner_screen()
        .on_decode(r#"{"payload":"eyJlIjo5fQ","signature":"c2ln"}"#)
        .await
        .unwrap();
    assert_eq!(alert, Alert::new("Failed", "QR code expired"));
}

#[tokio::test]
async fn test_non_created_success_is_info() {
    let stub = StubServer::start().await;
    stub.reply(
        "POST /api/ngo/events/0c3b2f6e8a10/scan",
        202,
        json!({ "message": "Queued" }),
    );
    let app = stub.logged_in_app();

    let alert = app
        .scanner_screen()
        .on_decode("0c3b2f6e8a10")
        .await
        .unwrap();
    assert_eq!(alert, Alert::new("Info", "Queued"));
}

#[tokio::test]
async fn test_network_failure_reports_generic_error() {
    let mut config = StubServer::start().await.config();
    config.api_base = dead_address().await;
    let app = AppState::with_storage(config, std::sync::Arc::new(MemoryStorage::default()))
        .unwrap();

    let alert = app
        .scanner_screen()
        .on_decode("0c3b2f6e8a10")
        .await
        .unwrap();
    assert_eq!(alert, Alert::new("Error", NETWORK_ERROR_MESSAGE));
}

#[tokio::test]
async fn test_cancelled_scan_releases_guard() {
    let stub = StubServer::start().await;
    stub.reply_slow(
        "POST /api/ngo/events/0c3b2f6e8a10/scan",
        201,
        json!({}),
        Duration::from_millis(500),
    );
    stub.reply("POST /api/ngo/events/aaaabbbbcccc/scan", 201, json!({}));
    let app = stub.logged_in_app();
    let screen = app.scanner_screen();

    // Give up on the first scan while its request is still in flight
    let timed_out =
        tokio::time::timeout(Duration::from_millis(50), screen.on_decode("0c3b2f6e8a10")).await;
    assert!(timed_out.is_err());
    assert!(screen.is_processing());

    tokio::time::sleep(Duration::from_millis(400)).await;
    assert!(!screen.is_processing());

    let alert = screen.on_decode("aaaabbbbcccc").await;
    assert_eq!(alert, Some(Alert::new("Success", "Attendance recorded")));
}
