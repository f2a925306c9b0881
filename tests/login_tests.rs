// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Login flow against the stub API.

use serde_json::json;
use sukarela_client::error::AppError;
use sukarela_client::screens::login::login_alert;
use sukarela_client::screens::{Alert, Route};

mod common;
use common::{volunteer_json, StubServer};

#[tokio::test]
async fn test_login_persists_session_and_header() {
    let stub = StubServer::start().await;
    stub.reply(
        "POST /api/login",
        200,
        json!({ "token": "tok-abc", "user": volunteer_json() }),
    );
    let app = stub.app();

    let session = app
        .login_screen()
        .submit(" aisyah@example.org ", "hunter2")
        .await
        .expect("login should succeed");

    assert_eq!(session.token, "tok-abc");
    assert_eq!(session.user.first_name(), "Nur");
    assert_eq!(app.login_screen().next_route(), Route::Home);
    assert_eq!(app.api.auth().value().as_deref(), Some("Bearer tok-abc"));
    assert_eq!(app.startup_route(), Route::Home);

    let requests = stub.requests_to("/api/login");
    assert_eq!(requests.len(), 1);
    assert_eq!(
        requests[0].json(),
        json!({ "email": "aisyah@example.org", "password": "hunter2" })
    );
    assert_eq!(requests[0].authorization, None);
}

#[tokio::test]
async fn test_non_volunteer_rejected_despite_200() {
    let stub = StubServer::start().await;
    stub.reply(
        "POST /api/login",
        200,
        json!({ "token": "tok-ngo", "user": { "id": 2, "name": "Org", "role": "NGO" } }),
    );
    let app = stub.app();

    let err = app
        .login_screen()
        .submit("org@example.org", "pw")
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::AccessDenied(_)));
    assert!(err.is_auth_failure());
    assert_eq!(
        login_alert(&err),
        Alert::new("Access denied", "Only volunteers can log in.")
    );
    assert_eq!(app.startup_route(), Route::Login);
    assert!(app.api.auth().value().is_none());
}

#[tokio::test]
async fn test_missing_user_rejected() {
    let stub = StubServer::start().await;
    stub.reply("POST /api/login", 200, json!({ "token": "tok" }));
    let app = stub.app();

    let err = app.login_screen().submit("a@b.c", "pw").await.unwrap_err();
    assert!(matches!(err, AppError::AccessDenied(_)));
    assert!(!app.store.load().is_logged_in());
}

#[tokio::test]
async fn test_server_rejection_shows_message() {
    let stub = StubServer::start().await;
    stub.reply(
        "POST /api/login",
        401,
        json!({ "message": "Invalid credentials" }),
    );
    let app = stub.app();

    let err = app.login_screen().submit("a@b.c", "wrong").await.unwrap_err();
    assert_eq!(
        login_alert(&err),
        Alert::new("Login failed", "Invalid credentials")
    );
    assert_eq!(app.startup_route(), Route::Login);
}

#[tokio::test]
async fn test_empty_fields_make_no_request() {
    let stub = StubServer::start().await;
    let app = stub.app();

    let err = app.login_screen().submit("", "pw").await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
    let err = app.login_screen().submit("a@b.c", "").await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    assert!(stub.requests().is_empty());
}
