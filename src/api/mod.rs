// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    middleware,
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::{error::AuthorizationErrorBody, resolver::resolve_identity, ErrorCategory, Identity},
    error::{ApiError, OperationError},
    models::{AuthPayload, Book, BookInput, LoginRequest, RegisterRequest, UserProfile},
    state::AppState,
};

pub mod auth;
pub mod health;
pub mod users;

pub fn router(state: AppState, cors: CorsLayer) -> Router {
    let v1_routes = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/users/me", get(users::me))
        .route("/users/me/books", post(users::save_book))
        .route("/users/me/books/{book_id}", delete(users::remove_book));

    Router::new()
        .nest("/v1", v1_routes)
        .route("/health", get(health::health))
        .layer(middleware::from_fn_with_state(state.clone(), resolve_identity))
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(cors)
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}

/// CORS policy admitting only the web client's origin.
pub fn cors_layer(client_origin: HeaderValue) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(client_origin)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
}

/// Run a storage-bound operation off the async workers.
pub(crate) async fn run_blocking<T, F>(operation: F) -> Result<T, OperationError>
where
    F: FnOnce() -> Result<T, OperationError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(operation).await.map_err(|e| {
        tracing::error!(error = %e, "Blocking operation panicked or was cancelled");
        OperationError::Api(ApiError::internal("Internal server error"))
    })?
}

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        auth::register,
        auth::login,
        users::me,
        users::save_book,
        users::remove_book,
        health::health
    ),
    components(
        schemas(
            Book,
            BookInput,
            UserProfile,
            RegisterRequest,
            LoginRequest,
            AuthPayload,
            Identity,
            ErrorCategory,
            AuthorizationErrorBody,
            health::HealthResponse
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Account creation and login"),
        (name = "Users", description = "The caller's profile and saved books"),
        (name = "Health", description = "Liveness")
    )
)]
struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header::ORIGIN, Request, StatusCode},
        response::Response,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::auth::TokenService;
    use crate::config::SigningSecret;
    use crate::storage::UserDatabase;

    const ORIGIN_URL: &str = "http://localhost:3000";

    fn app() -> (Router, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let db = UserDatabase::open(&dir.path().join("users.redb")).unwrap();
        let tokens = Arc::new(TokenService::new(&SigningSecret::new("router-secret").unwrap()));
        let state = AppState::new(Arc::new(db), tokens);
        let cors = cors_layer(HeaderValue::from_static(ORIGIN_URL));
        (router(state, cors), dir)
    }

    fn json_request(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    fn empty_request(method: &str, uri: &str, token: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
        }
        builder.body(Body::empty()).unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn book(id: &str) -> Value {
        json!({
            "bookId": id,
            "title": "Dune",
            "authors": ["Frank Herbert"],
            "description": "Spice",
        })
    }

    async fn register(app: &Router) -> String {
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/v1/auth/register",
                None,
                json!({"username": "reader", "email": "a@x.com", "password": "correct"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        body_json(response).await["token"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn health_is_public() {
        let (app, _dir) = app();
        let response = app.oneshot(empty_request("GET", "/health", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn save_without_header_is_unauthenticated() {
        let (app, _dir) = app();
        let response = app
            .oneshot(json_request("POST", "/v1/users/me/books", None, book("b1")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = body_json(response).await;
        assert_eq!(body["error_code"], "UNAUTHENTICATED");
        assert_eq!(body["error"], "User must be logged in");
    }

    #[tokio::test]
    async fn anonymous_malformed_body_is_still_unauthenticated() {
        let (app, _dir) = app();
        let request = Request::builder()
            .method("POST")
            .uri("/v1/users/me/books")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await["error_code"], "UNAUTHENTICATED");
    }

    #[tokio::test]
    async fn authenticated_malformed_body_is_json_error() {
        let (app, _dir) = app();
        let token = register(&app).await;

        let request = Request::builder()
            .method("POST")
            .uri("/v1/users/me/books")
            .header(CONTENT_TYPE, "application/json")
            .header(AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::from("{not json"))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert!(body["error"].is_string());
        assert!(body.get("error_code").is_none());
    }

    #[tokio::test]
    async fn bad_token_is_treated_as_anonymous() {
        let (app, _dir) = app();
        let response = app
            .oneshot(empty_request("GET", "/v1/users/me", Some("not.a.token")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await["error_code"], "UNAUTHENTICATED");
    }

    #[tokio::test]
    async fn register_save_and_remove() {
        let (app, _dir) = app();
        let token = register(&app).await;

        let response = app
            .clone()
            .oneshot(json_request("POST", "/v1/users/me/books", Some(&token), book("b1")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["bookCount"], 1);

        let response = app
            .clone()
            .oneshot(empty_request("GET", "/v1/users/me", Some(&token)))
            .await
            .unwrap();
        let me = body_json(response).await;
        assert_eq!(me["username"], "reader");
        assert_eq!(me["savedBooks"][0]["bookId"], "b1");

        let response = app
            .oneshot(empty_request("DELETE", "/v1/users/me/books/b1", Some(&token)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["bookCount"], 0);
    }

    #[tokio::test]
    async fn login_failure_is_unauthenticated() {
        let (app, _dir) = app();
        register(&app).await;

        let response = app
            .oneshot(json_request(
                "POST",
                "/v1/auth/login",
                None,
                json!({"email": "a@x.com", "password": "wrong"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = body_json(response).await;
        assert_eq!(body["error_code"], "UNAUTHENTICATED");
        assert_eq!(body["error"], "Incorrect email or password.");
    }

    #[tokio::test]
    async fn cors_allows_only_client_origin() {
        let (app, _dir) = app();

        let allowed = Request::builder()
            .uri("/health")
            .header(ORIGIN, ORIGIN_URL)
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(allowed).await.unwrap();
        assert_eq!(
            response.headers().get("access-control-allow-origin").unwrap(),
            ORIGIN_URL
        );

        let foreign = Request::builder()
            .uri("/health")
            .header(ORIGIN, "http://evil.example")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(foreign).await.unwrap();
        assert!(response.headers().get("access-control-allow-origin").is_none());
    }

    #[test]
    fn openapi_documents_bearer_scheme() {
        let doc = ApiDoc::openapi();
        let components = doc.components.unwrap();
        assert!(components.security_schemes.contains_key("bearer"));
        assert!(doc.paths.paths.contains_key("/v1/users/me/books/{book_id}"));
    }
}
