//! Shared helpers for API integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response, StatusCode};
use axum::Router;
use barter_api::auth::jwt::{issue_access_token, JwtConfig};
use barter_api::config::ServerConfig;
use barter_api::router::build_app_router;
use barter_api::state::AppState;
use barter_db::models::category::CreateCategory;
use barter_db::models::item::CreateItem;
use barter_db::models::user::{CreateUser, User};
use barter_db::repositories::{CategoryRepo, ItemRepo, UserRepo};
use barter_events::EventBus;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 5,
        event_bus_capacity: 64,
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            access_token_expiry_mins: 15,
        },
    }
}

/// Build the full application router plus a handle on its event bus.
pub fn build_test_app_with_bus(pool: PgPool) -> (Router, Arc<EventBus>) {
    let config = test_config();
    let event_bus = Arc::new(EventBus::new(config.event_bus_capacity));

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        event_bus: Arc::clone(&event_bus),
    };

    (build_app_router(state, &config), event_bus)
}

/// Build the full application router with all middleware layers.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with_bus(pool).0
}

/// A valid access token for `user_id`.
pub fn token_for(user_id: i64) -> String {
    issue_access_token(user_id, &test_config().jwt).expect("token generation should succeed")
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, Some(token), None).await
}

/// Read a response body as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Assert the status and return the `data` member of the envelope.
pub async fn expect_data(response: Response<Body>, status: StatusCode) -> serde_json::Value {
    assert_eq!(response.status(), status);
    let mut json = body_json(response).await;
    json["data"].take()
}

/// Assert the status and return the error `code`.
pub async fn expect_error(response: Response<Body>, status: StatusCode) -> String {
    assert_eq!(response.status(), status);
    body_json(response).await["code"]
        .as_str()
        .unwrap_or_default()
        .to_string()
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub async fn create_user(pool: &PgPool, name: &str) -> User {
    UserRepo::create(
        pool,
        &CreateUser {
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
        },
    )
    .await
    .expect("user creation should succeed")
}

pub async fn create_category(pool: &PgPool, name: &str) -> i64 {
    CategoryRepo::create(
        pool,
        &CreateCategory {
            name: name.to_string(),
        },
    )
    .await
    .expect("category creation should succeed")
    .id
}

/// A donation item (not exchangeable).
pub async fn create_donation(pool: &PgPool, owner_id: i64, category_id: i64, title: &str) -> i64 {
    create_item(pool, owner_id, category_id, title, false, vec![]).await
}

pub async fn create_item(
    pool: &PgPool,
    owner_id: i64,
    category_id: i64,
    title: &str,
    is_exchangeable: bool,
    preferred_category_ids: Vec<i64>,
) -> i64 {
    ItemRepo::create(
        pool,
        owner_id,
        &CreateItem {
            category_id,
            title: title.to_string(),
            description: None,
            is_exchangeable,
            require_all_categories: false,
            preferred_category_ids,
        },
    )
    .await
    .expect("item creation should succeed")
    .id
}
