// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! End-to-end session flow: a real server on an ephemeral port driven by the
//! bundled client.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::HeaderValue;
use bookshelf_server::{
    api::{cors_layer, router},
    auth::TokenService,
    client::{ApiClient, ClientError, ClientSession, FileTokenStore},
    config::SigningSecret,
    models::{BookInput, LoginRequest, RegisterRequest},
    state::AppState,
    storage::UserDatabase,
};
use chrono::{Duration, Utc};

struct TestServer {
    addr: SocketAddr,
    _dir: tempfile::TempDir,
}

impl TestServer {
    async fn start() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let db = UserDatabase::open(&dir.path().join("users.redb")).unwrap();
        let tokens = Arc::new(TokenService::new(
            &SigningSecret::new("integration-secret").unwrap(),
        ));
        let state = AppState::new(Arc::new(db), tokens);
        let app = router(state, cors_layer(HeaderValue::from_static("http://localhost:3000")));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, _dir: dir }
    }

    fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    fn client(&self) -> ApiClient {
        ApiClient::new(&self.url(), ClientSession::in_memory()).unwrap()
    }
}

fn registration() -> RegisterRequest {
    RegisterRequest {
        username: "reader".into(),
        email: "a@x.com".into(),
        password: "correct".into(),
    }
}

fn book(id: &str) -> BookInput {
    BookInput {
        book_id: id.into(),
        title: "Dune".into(),
        authors: vec!["Frank Herbert".into()],
        description: "Spice".into(),
        image: None,
        link: None,
    }
}

#[tokio::test]
async fn login_then_session_is_active() {
    let server = TestServer::start().await;
    server.client().register(&registration()).await.unwrap();

    let client = server.client();
    assert!(!client.session().is_active());

    let payload = client
        .login(&LoginRequest {
            email: "a@x.com".into(),
            password: "correct".into(),
        })
        .await
        .unwrap();

    assert!(client.session().is_active());
    let claims = client.session().profile().unwrap();
    assert_eq!(claims.username, "reader");
    assert_eq!(claims.email, "a@x.com");
    assert_eq!(claims.subject_id, payload.user.id);
    assert!(!client.session().is_active_at(Utc::now() + Duration::minutes(61)));
}

#[tokio::test]
async fn shelf_round_trip_through_client() {
    let server = TestServer::start().await;
    let client = server.client();
    client.register(&registration()).await.unwrap();

    let profile = client.save_book(&book("b1")).await.unwrap();
    assert_eq!(profile.book_count, 1);

    let me = client.me().await.unwrap();
    assert_eq!(me.saved_books[0].book_id, "b1");

    let profile = client.remove_book("b1").await.unwrap();
    assert_eq!(profile.book_count, 0);
}

#[tokio::test]
async fn anonymous_save_is_unauthenticated() {
    let server = TestServer::start().await;
    let client = server.client();

    match client.save_book(&book("b1")).await.unwrap_err() {
        ClientError::Unauthenticated(message) => assert_eq!(message, "User must be logged in"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn raw_request_without_header_gets_structured_error() {
    let server = TestServer::start().await;

    let response = reqwest::Client::new()
        .post(format!("{}/v1/users/me/books", server.url()))
        .json(&book("b1"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), reqwest::StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error_code"], "UNAUTHENTICATED");
}

#[tokio::test]
async fn tampered_token_is_rejected_by_server() {
    let server = TestServer::start().await;
    let client = server.client();
    let payload = client.register(&registration()).await.unwrap();

    // Flip one character of the payload segment
    let mut parts: Vec<String> = payload.token.split('.').map(str::to_string).collect();
    let mut payload_chars: Vec<char> = parts[1].chars().collect();
    payload_chars[0] = if payload_chars[0] == 'A' { 'B' } else { 'A' };
    parts[1] = payload_chars.into_iter().collect();
    client.session().store(&parts.join(".")).unwrap();

    let err = client.me().await.unwrap_err();
    assert!(err.is_unauthenticated(), "{err:?}");
}

#[tokio::test]
async fn logout_drops_the_session() {
    let server = TestServer::start().await;
    let client = server.client();
    client.register(&registration()).await.unwrap();

    client.logout().unwrap();
    assert!(!client.session().is_active());
    assert!(client.me().await.unwrap_err().is_unauthenticated());
}

#[tokio::test]
async fn file_backed_session_survives_new_client() {
    let server = TestServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let token_path = dir.path().join("session.json");

    let first = ApiClient::new(
        &server.url(),
        ClientSession::new(Arc::new(FileTokenStore::new(&token_path))),
    )
    .unwrap();
    first.register(&registration()).await.unwrap();

    let second = ApiClient::new(
        &server.url(),
        ClientSession::new(Arc::new(FileTokenStore::new(&token_path))),
    )
    .unwrap();
    assert!(second.session().is_active());
    assert_eq!(second.me().await.unwrap().username, "reader");
}

#[tokio::test]
async fn duplicate_registration_is_a_plain_error() {
    let server = TestServer::start().await;
    server.client().register(&registration()).await.unwrap();

    match server.client().register(&registration()).await.unwrap_err() {
        ClientError::Api { status, .. } => assert_eq!(status, 409),
        other => panic!("unexpected error: {other:?}"),
    }
}
