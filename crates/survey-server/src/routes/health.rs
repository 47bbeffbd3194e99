// crates/survey-server/src/routes/health.rs
// ============================================================================
// Module: Health Route
// Description: Liveness and store connectivity report.
// Purpose: Report store reachability and refresh optional column presence.
// Dependencies: axum, serde, survey-core
// ============================================================================

// ============================================================================
// SECTION: Imports
// ============================================================================

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use serde::Serialize;
use survey_core::StoreError;
use survey_core::Timestamp;

use crate::state::AppState;
use crate::state::run_blocking;

// ============================================================================
// SECTION: Bodies
// ============================================================================

/// Healthy report.
#[derive(Debug, Serialize)]
pub struct HealthReport {
    /// Always `OK`.
    pub status: &'static str,
    /// Report time (RFC 3339).
    pub timestamp: String,
    /// `connected` or `disconnected`.
    pub database: &'static str,
    /// Deployment environment label.
    pub environment: &'static str,
    /// Process uptime in seconds.
    pub uptime: f64,
}

/// Failed health check report.
#[derive(Debug, Serialize)]
pub struct HealthFailure {
    /// Always `ERROR`.
    pub status: &'static str,
    /// Report time (RFC 3339).
    pub timestamp: String,
    /// Always `error`.
    pub database: &'static str,
    /// Fixed failure message.
    pub error: &'static str,
}

// ============================================================================
// SECTION: Handler
// ============================================================================

/// `GET /api/health`.
///
/// An unreachable store reports `disconnected`; any other store failure
/// answers 503.
pub async fn health(State(state): State<AppState>) -> Response {
    let probe = run_blocking(|| {
        let ping = state.store.ping();
        if ping.is_ok() {
            state.schema.refresh(&state.store);
        }
        ping
    });
    let timestamp = Timestamp::now().to_rfc3339();
    let database = match probe {
        Ok(()) => "connected",
        Err(StoreError::Unavailable(message)) => {
            tracing::warn!(error = %message, "health check: store unreachable");
            "disconnected"
        }
        Err(err) => {
            tracing::error!(error = %err, "health check failed");
            return (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthFailure {
                    status: "ERROR",
                    timestamp,
                    database: "error",
                    error: "Health check failed",
                }),
            )
                .into_response();
        }
    };
    Json(HealthReport {
        status: "OK",
        timestamp,
        database,
        environment: state.settings.environment.as_str(),
        uptime: state.started_at.elapsed().as_secs_f64(),
    })
    .into_response()
}
