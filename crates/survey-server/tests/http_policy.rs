// crates/survey-server/tests/http_policy.rs
// ============================================================================
// Module: HTTP Policy Tests
// Description: Rate limiting, headers, fallbacks, limits, and health.
// Purpose: Validate cross-cutting HTTP behavior applied by the router.
// Dependencies: survey-server, tokio, serde_json
// ============================================================================

//! ## Overview
//! Requests without `ConnectInfo` share one limiter bucket; tests needing
//! distinct clients insert the extension themselves.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Test-only assertions and helpers are permitted."
)]

mod common;

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::ConnectInfo;
use axum::http::Method;
use axum::http::StatusCode;
use axum::http::header::RETRY_AFTER;
use serde_json::json;
use survey_config::RunEnvironment;
use survey_core::InMemorySurveyStore;
use survey_server::SharedSurveyStore;
use survey_server::SurveyServer;

use crate::common::ADMIN_TOKEN;
use crate::common::app;
use crate::common::app_with;
use crate::common::get;
use crate::common::request;
use crate::common::send;
use crate::common::send_json;
use crate::common::test_config;

// ============================================================================
// SECTION: Tests
// ============================================================================

#[tokio::test]
async fn api_requests_beyond_budget_are_limited() {
    let mut config = test_config();
    config.server.rate_limit.max_requests = 2;
    config.server.rate_limit.window_ms = 60_000;
    let app = app_with(config, InMemorySurveyStore::new());

    assert_eq!(get(&app.router, "/api/questions").await.status, StatusCode::OK);
    assert_eq!(get(&app.router, "/api/health").await.status, StatusCode::OK);
    let limited = get(&app.router, "/api/questions").await;
    assert_eq!(limited.status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(limited.body["error"], "Too many requests from this IP, please try again later.");
    assert_eq!(limited.body["retryAfter"], 60);
    assert_eq!(limited.headers.get(RETRY_AFTER).unwrap(), "60");

    let outside_api = get(&app.router, "/status").await;
    assert_eq!(outside_api.status, StatusCode::NOT_FOUND);

    let mut other_client = request(Method::GET, "/api/questions", None, None);
    other_client
        .extensions_mut()
        .insert(ConnectInfo(SocketAddr::from(([192, 0, 2, 7], 40_000))));
    assert_eq!(send(&app.router, other_client).await.status, StatusCode::OK);
}

#[tokio::test]
async fn responses_carry_security_headers() {
    let app = app();
    for uri in ["/api/health", "/api/unknown"] {
        let response = get(&app.router, uri).await;
        assert_eq!(response.headers.get("x-content-type-options").unwrap(), "nosniff");
        assert_eq!(response.headers.get("x-frame-options").unwrap(), "DENY");
        assert_eq!(response.headers.get("x-xss-protection").unwrap(), "1; mode=block");
        assert_eq!(response.headers.get("referrer-policy").unwrap(), "strict-origin-when-cross-origin");
    }
}

#[tokio::test]
async fn unknown_routes_and_methods_are_not_found() {
    let app = app();
    let unknown = get(&app.router, "/api/nothing-here").await;
    assert_eq!(unknown.status, StatusCode::NOT_FOUND);
    assert_eq!(unknown.body, json!({ "error": "Endpoint not found" }));

    let wrong_method = send(&app.router, request(Method::DELETE, "/api/health", None, None)).await;
    assert_eq!(wrong_method.status, StatusCode::NOT_FOUND);
    assert_eq!(wrong_method.body, json!({ "error": "Endpoint not found" }));
}

#[tokio::test]
async fn oversized_body_is_rejected() {
    let mut config = test_config();
    config.server.max_body_bytes = 64;
    let app = app_with(config, InMemorySurveyStore::new());
    let body = json!({ "title": "x".repeat(200) });
    let response = send_json(&app.router, Method::POST, "/api/questions", Some(ADMIN_TOKEN), &body).await;
    assert_eq!(response.status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(response.body["error"], "Payload too large");
}

#[tokio::test]
async fn cors_preflight_allows_configured_origin() {
    let app = app();
    let preflight = axum::http::Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/questions")
        .header("origin", "http://localhost:3000")
        .header("access-control-request-method", "PATCH")
        .header("access-control-request-headers", "authorization,content-type")
        .body(axum::body::Body::empty())
        .unwrap();
    let response = send(&app.router, preflight).await;
    assert_eq!(response.headers.get("access-control-allow-origin").unwrap(), "http://localhost:3000");
    assert_eq!(response.headers.get("access-control-allow-credentials").unwrap(), "true");
    assert_eq!(response.headers.get("access-control-max-age").unwrap(), "86400");
}

#[tokio::test]
async fn health_reports_store_and_environment() {
    let app = app();
    let response = get(&app.router, "/api/health").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "OK");
    assert_eq!(response.body["database"], "connected");
    assert_eq!(response.body["environment"], "test");
    assert!(response.body["uptime"].as_f64().unwrap() >= 0.0);
    assert!(response.body["timestamp"].as_str().unwrap().ends_with('Z'));
}

#[tokio::test]
async fn internal_details_are_hidden_in_production() {
    let mut config = test_config();
    config.server.environment = RunEnvironment::Production;
    let schema_store = InMemorySurveyStore::with_mode_column(false);
    let shared: SharedSurveyStore = Arc::new(schema_store);
    let server = SurveyServer::with_store(config, shared).unwrap();
    // Presence flipped after startup makes the store reject mode-aware reads.
    server.state().schema.refresh(&Arc::new(InMemorySurveyStore::new()));
    let router = server.router().unwrap();
    let response = get(&router, "/api/questions/7d0f4a4e-8c1b-4d6a-9a51-3f2b1c0e9d11").await;
    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.body, json!({ "error": "Failed to fetch question" }));
}
