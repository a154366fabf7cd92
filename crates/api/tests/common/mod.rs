//! Common test utilities for integration tests.
//!
//! These tests run against a real PostgreSQL database. Set the
//! `TEST_DATABASE_URL` environment variable to enable them; without it
//! every test returns early as a skip.

// Allow dead code in this module - these are helper utilities that may not
// be used by all integration tests.
#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request, Response},
    Router,
};
use kinnect_api::{app::create_app, config::Config};
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;
use tower::ServiceExt;

/// Create a test database pool, or `None` when `TEST_DATABASE_URL` is not
/// set (the test should skip).
pub async fn try_create_test_pool() -> Option<PgPool> {
    let database_url = std::env::var("TEST_DATABASE_URL").ok()?;

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .min_connections(1)
        .acquire_timeout(Duration::from_secs(30))
        .connect(&database_url)
        .await
        .expect("Failed to connect to test database");

    run_migrations(&pool).await;
    Some(pool)
}

/// Run migrations on the test database.
async fn run_migrations(pool: &PgPool) {
    sqlx::migrate!("../persistence/src/migrations")
        .run(pool)
        .await
        .expect("Failed to run migrations on test database");
}

/// Test configuration pointing at the test database.
pub fn test_config() -> Config {
    Config {
        server: kinnect_api::config::ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8080,
            request_timeout_secs: 30,
        },
        database: kinnect_api::config::DatabaseConfig {
            url: std::env::var("TEST_DATABASE_URL").unwrap_or_default(),
            max_connections: 5,
            min_connections: 1,
            connect_timeout_secs: 10,
            idle_timeout_secs: 600,
        },
        logging: kinnect_api::config::LoggingConfig {
            level: "debug".to_string(),
            format: "pretty".to_string(),
        },
        security: kinnect_api::config::SecurityConfig {
            cors_origins: vec![],
        },
        jwt: kinnect_api::config::JwtAuthConfig {
            secret: "integration-test-secret-0123456789".to_string(),
            token_expiry_secs: 3600,
            leeway_secs: 30,
        },
    }
}

/// Create a test application router.
pub fn create_test_app(config: Config, pool: PgPool) -> Router {
    create_app(config, pool)
}

/// Test user data with unique username and email.
///
/// Every fixture is unique per test, so tests are parallel-safe and
/// re-runnable against the same database without cleanup.
#[derive(Debug, Clone)]
pub struct TestUser {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl TestUser {
    pub fn new() -> Self {
        let suffix = uuid::Uuid::new_v4().simple().to_string();
        Self {
            username: format!("user_{}", &suffix[..12]),
            email: format!("test_{}@example.com", suffix),
            password: "SecureP@ss123!".to_string(),
        }
    }
}

impl Default for TestUser {
    fn default() -> Self {
        Self::new()
    }
}

/// Authenticated user context for tests.
pub struct AuthenticatedUser {
    pub user_id: String,
    pub username: String,
    pub email: String,
    pub token: String,
}

/// Build a JSON request without authentication.
pub fn json_request(method: Method, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

/// Build a JSON request authenticated with the x-auth-token header.
pub fn json_request_with_auth(
    method: Method,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header("x-auth-token", token)
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

/// Build a bodyless request authenticated with the x-auth-token header.
pub fn request_with_auth(method: Method, uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("x-auth-token", token)
        .body(Body::empty())
        .unwrap()
}

/// Read and parse a JSON response body.
pub async fn parse_response_body(response: Response<Body>) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    if body.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&body).unwrap_or_else(|_| {
            panic!("Failed to parse body: {:?}", String::from_utf8_lossy(&body))
        })
    }
}

/// Register a user, log in, and return authentication context.
pub async fn create_authenticated_user(app: &Router, user: &TestUser) -> AuthenticatedUser {
    let register = json_request(
        Method::POST,
        "/api/users/register",
        serde_json::json!({
            "username": user.username,
            "email": user.email,
            "password": user.password,
        }),
    );
    let response = app.clone().oneshot(register).await.unwrap();
    assert!(
        response.status().is_success(),
        "Registration failed with status: {}",
        response.status()
    );

    let login = json_request(
        Method::POST,
        "/api/users/login",
        serde_json::json!({
            "email": user.email,
            "password": user.password,
        }),
    );
    let response = app.clone().oneshot(login).await.unwrap();
    assert!(
        response.status().is_success(),
        "Login failed with status: {}",
        response.status()
    );
    let json = parse_response_body(response).await;
    let token = json["token"].as_str().expect("Missing token").to_string();

    let me = request_with_auth(Method::GET, "/api/users/me", &token);
    let response = app.clone().oneshot(me).await.unwrap();
    let json = parse_response_body(response).await;

    AuthenticatedUser {
        user_id: json["id"].as_str().expect("Missing user id").to_string(),
        username: user.username.clone(),
        email: user.email.clone(),
        token,
    }
}

/// Created group context.
pub struct CreatedGroup {
    pub id: String,
    pub name: String,
    pub invite_code: String,
}

/// Create a group via the API as the given user.
pub async fn create_test_group(app: &Router, auth: &AuthenticatedUser) -> CreatedGroup {
    let request = request_with_auth(Method::POST, "/api/groups", &auth.token);
    let response = app.clone().oneshot(request).await.unwrap();
    assert!(
        response.status().is_success(),
        "Group creation failed with status: {}",
        response.status()
    );
    let json = parse_response_body(response).await;

    CreatedGroup {
        id: json["id"].as_str().unwrap().to_string(),
        name: json["name"].as_str().unwrap().to_string(),
        invite_code: json["inviteCode"].as_str().unwrap().to_string(),
    }
}

/// Create a medication via the API as the given user.
pub async fn create_test_medication(
    app: &Router,
    auth: &AuthenticatedUser,
    name: &str,
    dosage: &str,
    recipient: &str,
) -> String {
    let request = json_request_with_auth(
        Method::POST,
        "/api/medications",
        serde_json::json!({
            "name": name,
            "dosage": dosage,
            "recipientName": recipient,
        }),
        &auth.token,
    );
    let response = app.clone().oneshot(request).await.unwrap();
    assert!(
        response.status().is_success(),
        "Medication creation failed with status: {}",
        response.status()
    );
    let json = parse_response_body(response).await;
    json["id"].as_str().unwrap().to_string()
}

/// Create an appointment via the API as the given user.
pub async fn create_test_appointment(
    app: &Router,
    auth: &AuthenticatedUser,
    title: &str,
    start: &str,
    end: &str,
) -> String {
    let request = json_request_with_auth(
        Method::POST,
        "/api/appointments",
        serde_json::json!({
            "title": title,
            "start": start,
            "end": end,
        }),
        &auth.token,
    );
    let response = app.clone().oneshot(request).await.unwrap();
    assert!(
        response.status().is_success(),
        "Appointment creation failed with status: {}",
        response.status()
    );
    let json = parse_response_body(response).await;
    json["id"].as_str().unwrap().to_string()
}
