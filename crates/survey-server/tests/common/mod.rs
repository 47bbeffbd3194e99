// crates/survey-server/tests/common/mod.rs
// ============================================================================
// Module: Common Test Fixtures
// Description: Router harness over the in-memory store.
// Purpose: Drive the HTTP API in-process with a static identity provider.
// Dependencies: survey-server, survey-core, survey-config, tower, http-body-util
// ============================================================================

//! ## Overview
//! Requests go through `tower::ServiceExt::oneshot`, so no socket is bound and
//! no `ConnectInfo` is attached unless a test inserts one.

#![allow(dead_code, reason = "Shared test helpers may be unused in some cases.")]
#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Test-only assertions and helpers are permitted."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::HeaderMap;
use axum::http::Method;
use axum::http::Request;
use axum::http::StatusCode;
use axum::http::header::AUTHORIZATION;
use axum::http::header::CONTENT_TYPE;
use http_body_util::BodyExt;
use serde_json::Value;
use survey_config::IdentityConfig;
use survey_config::RunEnvironment;
use survey_config::StaticIdentityConfig;
use survey_config::StaticTokenConfig;
use survey_config::SurveyConfig;
use survey_core::InMemorySurveyStore;
use survey_server::SharedSurveyStore;
use survey_server::SurveyServer;
use tower::ServiceExt;

// ============================================================================
// SECTION: Fixtures
// ============================================================================

/// Token bound to an allow-listed admin.
pub const ADMIN_TOKEN: &str = "admin-token";
/// Token bound to an authenticated non-admin.
pub const USER_TOKEN: &str = "user-token";
/// Allow-listed admin email.
pub const ADMIN_EMAIL: &str = "admin@example.org";

/// Test config with one admin and one plain user.
#[must_use]
pub fn test_config() -> SurveyConfig {
    let mut config = SurveyConfig::default();
    config.server.environment = RunEnvironment::Test;
    config.auth.admin_emails = vec![ADMIN_EMAIL.to_string()];
    config.auth.identity = Some(IdentityConfig::Static(StaticIdentityConfig {
        tokens: vec![
            StaticTokenConfig {
                token: ADMIN_TOKEN.to_string(),
                email: ADMIN_EMAIL.to_string(),
            },
            StaticTokenConfig {
                token: USER_TOKEN.to_string(),
                email: "user@example.org".to_string(),
            },
        ],
    }));
    config
}

/// Router plus a handle on its backing store.
pub struct TestApp {
    /// API router.
    pub router: Router,
    /// Store shared with the router.
    pub store: InMemorySurveyStore,
}

/// Builds an app over a fresh in-memory store.
#[must_use]
pub fn app() -> TestApp {
    app_with(test_config(), InMemorySurveyStore::new())
}

/// Builds an app over `store` with `config`.
#[must_use]
pub fn app_with(config: SurveyConfig, store: InMemorySurveyStore) -> TestApp {
    let shared: SharedSurveyStore = Arc::new(store.clone());
    let server = SurveyServer::with_store(config, shared).expect("server");
    TestApp {
        router: server.router().expect("router"),
        store,
    }
}

// ============================================================================
// SECTION: Requests
// ============================================================================

/// Decoded response.
pub struct TestResponse {
    /// Status code.
    pub status: StatusCode,
    /// Response headers.
    pub headers: HeaderMap,
    /// JSON body, or `Null` when empty.
    pub body: Value,
}

/// Builds a request with an optional bearer token and JSON body.
#[must_use]
pub fn request(method: Method, uri: &str, token: Option<&str>, body: Option<&Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    match body {
        Some(body) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Sends `request` through `router`.
pub async fn send(router: &Router, request: Request<Body>) -> TestResponse {
    let response = router.clone().oneshot(request).await.expect("infallible service");
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = response.into_body().collect().await.expect("body").to_bytes();
    let body = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).expect("json body") };
    TestResponse {
        status,
        headers,
        body,
    }
}

/// Sends an anonymous GET.
pub async fn get(router: &Router, uri: &str) -> TestResponse {
    send(router, request(Method::GET, uri, None, None)).await
}

/// Sends an admin GET.
pub async fn admin_get(router: &Router, uri: &str) -> TestResponse {
    send(router, request(Method::GET, uri, Some(ADMIN_TOKEN), None)).await
}

/// Sends a JSON request.
pub async fn send_json(
    router: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: &Value,
) -> TestResponse {
    send(router, request(method, uri, token, Some(body))).await
}

/// Creates a question as admin and returns its identifier.
pub async fn create_question(router: &Router, body: &Value) -> String {
    let response = send_json(router, Method::POST, "/api/questions", Some(ADMIN_TOKEN), body).await;
    assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
    response.body["data"]["uuid"].as_str().expect("uuid").to_string()
}
