// crates/survey-server/src/middleware.rs
// ============================================================================
// Module: HTTP Middleware
// Description: Request logging, security headers, and rate limiting.
// Purpose: Apply cross-cutting HTTP policy to every route.
// Dependencies: axum, tokio, tracing
// ============================================================================

//! ## Overview
//! Middleware here is plain `axum::middleware::from_fn` functions so the
//! router can order them explicitly. Client addresses come from
//! [`ConnectInfo`]; requests without one share a single rate limit bucket.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::net::IpAddr;
use std::net::SocketAddr;
use std::time::Instant;

use axum::extract::ConnectInfo;
use axum::extract::Request;
use axum::extract::State;
use axum::http::HeaderName;
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;

use crate::error::ApiError;
use crate::rate_limit::RateDecision;
use crate::state::AppState;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Path prefix subject to rate limiting.
const RATE_LIMITED_PREFIX: &str = "/api/";

/// Headers added to every response.
const SECURITY_HEADERS: [(&str, &str); 4] = [
    ("x-content-type-options", "nosniff"),
    ("x-frame-options", "DENY"),
    ("x-xss-protection", "1; mode=block"),
    ("referrer-policy", "strict-origin-when-cross-origin"),
];

// ============================================================================
// SECTION: Middleware
// ============================================================================

/// Logs method, path, status, latency, and client address for each request.
pub async fn log_requests(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let client = client_ip(&request);
    let started = Instant::now();
    let response = next.run(request).await;
    let latency_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
    tracing::info!(
        method = %method,
        path = %path,
        status = response.status().as_u16(),
        latency_ms,
        client_ip = ?client,
        "request completed"
    );
    response
}

/// Adds the fixed security headers.
pub async fn security_headers(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();
    for (name, value) in SECURITY_HEADERS {
        headers.insert(HeaderName::from_static(name), HeaderValue::from_static(value));
    }
    response
}

/// Refuses `/api/` requests beyond the per-client budget.
pub async fn rate_limit(State(state): State<AppState>, request: Request, next: Next) -> Response {
    if !request.uri().path().starts_with(RATE_LIMITED_PREFIX) {
        return next.run(request).await;
    }
    let client = client_ip(&request);
    match state.limiter.check(client, Instant::now()) {
        RateDecision::Allowed => next.run(request).await,
        RateDecision::Limited { retry_after_secs } => {
            tracing::warn!(client_ip = ?client, retry_after_secs, "rate limit exceeded");
            ApiError::RateLimited { retry_after_secs }.into_response()
        }
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Returns the peer address recorded by the connection layer.
fn client_ip(request: &Request) -> Option<IpAddr> {
    request.extensions().get::<ConnectInfo<SocketAddr>>().map(|info| info.0.ip())
}
