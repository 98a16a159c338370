#![allow(
    clippy::unwrap_used,
    clippy::panic,
    clippy::missing_panics_doc,
    missing_debug_implementations,
    unreachable_pub
)]
use reqwest::StatusCode;
use serde_json::json;

mod common;

#[tokio::test]
async fn test_register_returns_public_profile() {
    let app = common::TestApp::spawn().await;

    let resp = app.register("alice", "p@ss1234", "a@x.com").await;
    assert_eq!(resp.status(), StatusCode::OK);

    let text = resp.text().await.unwrap();
    assert!(!text.contains("password"), "Response must not carry any password field: {text}");
    assert!(!text.contains("p@ss1234"));
    assert!(!text.contains("argon2"));

    let body: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "registration successful");
    assert_eq!(body["user"]["username"], "alice");
    assert_eq!(body["user"]["email"], "a@x.com");
    assert_eq!(body["user"]["role"], "user");
    assert!(body["user"]["id"].is_i64());
}

#[tokio::test]
async fn test_duplicate_username_is_rejected() {
    let app = common::TestApp::spawn().await;

    assert_eq!(app.register("alice", "p@ss1234", "a@x.com").await.status(), StatusCode::OK);

    let resp = app.register("alice", "p@ss1234", "a@x.com").await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "username already exists");

    // Other fields differing does not matter.
    let resp = app.register("alice", "another-password", "someone-else@x.com").await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "username already exists");

    assert_eq!(app.user_count().await, 1);
}

#[tokio::test]
async fn test_duplicate_email_is_rejected() {
    let app = common::TestApp::spawn().await;

    assert_eq!(app.register("alice", "p@ss1234", "a@x.com").await.status(), StatusCode::OK);

    let resp = app.register("bob", "p@ss1234", "a@x.com").await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "email already registered");
}

#[tokio::test]
async fn test_missing_field_creates_nothing() {
    let app = common::TestApp::spawn().await;

    let resp = app
        .client
        .post(format!("{}/api/auth/register", app.server_url))
        .json(&json!({ "username": "alice", "password": "p@ss1234" }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "missing required information");
    assert_eq!(app.user_count().await, 0);

    // The username is still free.
    assert_eq!(app.register("alice", "p@ss1234", "a@x.com").await.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_empty_fields_count_as_missing() {
    let app = common::TestApp::spawn().await;

    for (username, password, email) in [("", "p@ss1234", "a@x.com"), ("alice", "", "a@x.com"), ("alice", "p@ss1234", "")] {
        let resp = app.register(username, password, email).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = resp.json().await.unwrap();
        assert_eq!(body["message"], "missing required information");
    }

    assert_eq!(app.user_count().await, 0);
}

#[tokio::test]
async fn test_malformed_body_is_a_bad_request() {
    let app = common::TestApp::spawn().await;

    let resp = app
        .client
        .post(format!("{}/api/auth/register", app.server_url))
        .header("Content-Type", "application/json")
        .body("{\"username\": \"alice\",")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "invalid request body");

    let resp = app
        .client
        .post(format!("{}/api/auth/register", app.server_url))
        .json(&json!({ "username": 12, "password": "p@ss1234", "email": "a@x.com" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_stored_credentials_are_salted_hashes() {
    let app = common::TestApp::spawn().await;

    assert_eq!(app.register("alice", "p@ss1234", "a@x.com").await.status(), StatusCode::OK);
    assert_eq!(app.register("bob", "p@ss1234", "b@x.com").await.status(), StatusCode::OK);

    let hashes: Vec<String> =
        sqlx::query_scalar("SELECT password_hash FROM users ORDER BY id").fetch_all(&app.pool).await.unwrap();

    assert_eq!(hashes.len(), 2);
    assert!(hashes.iter().all(|h| h != "p@ss1234" && h.starts_with("$argon2")));
    assert_ne!(hashes[0], hashes[1]);
}

#[tokio::test]
async fn test_concurrent_duplicate_registrations() {
    let app = common::TestApp::spawn().await;

    let (first, second) =
        tokio::join!(app.register("alice", "p@ss1234", "a@x.com"), app.register("alice", "p@ss1234", "a2@x.com"));

    let mut statuses = [first.status(), second.status()];
    statuses.sort();
    assert_eq!(statuses, [StatusCode::OK, StatusCode::BAD_REQUEST]);
    assert_eq!(app.user_count().await, 1);
}
