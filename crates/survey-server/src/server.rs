// crates/survey-server/src/server.rs
// ============================================================================
// Module: Survey Server
// Description: Router assembly, startup probes, and the HTTP serve loop.
// Purpose: Host the survey JSON API over axum.
// Dependencies: axum, survey-config, survey-store-sqlite, tokio, tower-http
// ============================================================================

//! ## Overview
//! [`SurveyServer`] validates configuration, opens the store, and refuses to
//! start when the store is unreachable. The router nests every route under
//! `/api` and applies, from outermost inward: request logging, CORS, security
//! headers, the body limit, and rate limiting. Shutdown waits for in-flight
//! requests after Ctrl-C or SIGTERM, up to a fixed grace period.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::HeaderName;
use axum::http::HeaderValue;
use axum::http::Method;
use axum::http::header::AUTHORIZATION;
use axum::http::header::CONTENT_TYPE;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use survey_config::SurveyConfig;
use survey_core::SchemaSupport;
use survey_core::SurveyStore;
use survey_store_sqlite::SqliteSurveyStore;
use thiserror::Error;
use tower_http::cors::AllowOrigin;
use tower_http::cors::CorsLayer;

use crate::auth::AdminGate;
use crate::error::ApiError;
use crate::middleware::log_requests;
use crate::middleware::rate_limit;
use crate::middleware::security_headers;
use crate::rate_limit::RateLimiter;
use crate::routes::health::health;
use crate::routes::questions::create_question;
use crate::routes::questions::delete_question;
use crate::routes::questions::get_question;
use crate::routes::questions::list_questions;
use crate::routes::questions::reorder_questions;
use crate::routes::questions::update_question;
use crate::routes::responses::compare_stats;
use crate::routes::responses::list_responses;
use crate::routes::responses::list_submissions;
use crate::routes::responses::response_stats;
use crate::routes::responses::submit_responses;
use crate::state::ApiSettings;
use crate::state::AppState;
use crate::state::SharedSurveyStore;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Time allowed for in-flight requests after a shutdown signal.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(30);
/// CORS preflight cache lifetime.
const CORS_MAX_AGE: Duration = Duration::from_secs(24 * 60 * 60);

// ============================================================================
// SECTION: Survey Server
// ============================================================================

/// Survey API server instance.
pub struct SurveyServer {
    /// Validated configuration.
    config: SurveyConfig,
    /// Handler state.
    state: AppState,
}

impl SurveyServer {
    /// Builds a server over the configured `SQLite` store.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError`] when configuration is invalid or the store
    /// cannot be opened or reached.
    pub fn from_config(config: SurveyConfig) -> Result<Self, ServerError> {
        config.validate().map_err(|err| ServerError::Config(err.to_string()))?;
        let store = SqliteSurveyStore::new(&config.store.sqlite())
            .map_err(|err| ServerError::Init(err.to_string()))?;
        Self::with_store(config, Arc::new(store))
    }

    /// Builds a server over an existing store.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError`] when configuration is invalid, the store is
    /// unreachable, or the identity provider cannot be built.
    pub fn with_store(config: SurveyConfig, store: SharedSurveyStore) -> Result<Self, ServerError> {
        config.validate().map_err(|err| ServerError::Config(err.to_string()))?;
        store
            .ping()
            .map_err(|err| ServerError::Init(format!("survey store unreachable: {err}")))?;
        let schema =
            SchemaSupport::probe(&store).map_err(|err| ServerError::Init(err.to_string()))?;
        let gate = AdminGate::from_config(&config.auth, config.server.environment)
            .map_err(|err| ServerError::Init(err.to_string()))?;
        let limiter = RateLimiter::new(&config.server.rate_limit);
        let settings = ApiSettings {
            environment: config.server.environment,
            default_page_size: config.collection.default_page_size,
            require_location: config.collection.require_location,
            cors_origins: config.server.cors_origins.clone(),
            max_body_bytes: config.server.max_body_bytes,
        };
        let state = AppState::new(store, schema, gate, limiter, settings);
        Ok(Self {
            config,
            state,
        })
    }

    /// Returns the handler state.
    #[must_use]
    pub const fn state(&self) -> &AppState {
        &self.state
    }

    /// Builds the router for this server.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Config`] when a CORS origin is not a valid header value.
    pub fn router(&self) -> Result<Router, ServerError> {
        build_router(self.state.clone())
    }

    /// Binds the configured address and serves until shutdown.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError`] when binding or serving fails.
    pub async fn serve(self) -> Result<(), ServerError> {
        let addr =
            self.config.server.bind_addr().map_err(|err| ServerError::Config(err.to_string()))?;
        let app = self.router()?;
        emit_startup_banner(&self.config, &self.state, addr);
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|_| ServerError::Transport("http bind failed".to_string()))?;
        serve_until_shutdown(listener, app).await
    }
}

/// Server errors.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Configuration errors.
    #[error("config error: {0}")]
    Config(String),
    /// Initialization failures.
    #[error("init error: {0}")]
    Init(String),
    /// Transport errors.
    #[error("transport error: {0}")]
    Transport(String),
}

// ============================================================================
// SECTION: Router
// ============================================================================

/// Builds the API router over `state`.
///
/// # Errors
///
/// Returns [`ServerError::Config`] when a CORS origin is not a valid header value.
pub fn build_router(state: AppState) -> Result<Router, ServerError> {
    let cors = cors_layer(&state.settings.cors_origins)?;
    let body_limit = state.settings.max_body_bytes;
    let router = Router::new()
        .route("/api/questions", get(list_questions).post(create_question))
        .route("/api/questions/reorder", post(reorder_questions))
        .route(
            "/api/questions/{uuid}",
            get(get_question).put(update_question).patch(update_question).delete(delete_question),
        )
        .route("/api/responses", get(list_responses).post(submit_responses))
        .route("/api/responses/stats", get(response_stats))
        .route("/api/responses/stats/compare", get(compare_stats))
        .route("/api/submissions", get(list_submissions))
        .route("/api/health", get(health))
        .fallback(endpoint_not_found)
        .method_not_allowed_fallback(endpoint_not_found)
        .layer(middleware::from_fn_with_state(state.clone(), rate_limit))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(middleware::from_fn(security_headers))
        .layer(cors)
        .layer(middleware::from_fn(log_requests))
        .with_state(state);
    Ok(router)
}

/// Answers unmatched routes and methods.
async fn endpoint_not_found() -> ApiError {
    ApiError::EndpointNotFound
}

/// Builds the CORS policy for explicit origins.
fn cors_layer(origins: &[String]) -> Result<CorsLayer, ServerError> {
    let origins = origins
        .iter()
        .map(|origin| {
            HeaderValue::from_str(origin)
                .map_err(|_| ServerError::Config(format!("invalid cors origin: {origin}")))
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION, HeaderName::from_static("x-requested-with")])
        .allow_credentials(true)
        .max_age(CORS_MAX_AGE))
}

// ============================================================================
// SECTION: Serve Loop
// ============================================================================

/// Serves `app` until a shutdown signal, then drains within [`SHUTDOWN_GRACE`].
async fn serve_until_shutdown(
    listener: tokio::net::TcpListener,
    app: Router,
) -> Result<(), ServerError> {
    let (signalled_tx, signalled_rx) = tokio::sync::oneshot::channel::<()>();
    let server = axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            signalled_tx.send(()).ok();
        })
        .into_future();
    tokio::pin!(server);
    tokio::select! {
        result = &mut server => {
            result.map_err(|_| ServerError::Transport("http server failed".to_string()))
        }
        Ok(()) = signalled_rx => {
            match tokio::time::timeout(SHUTDOWN_GRACE, &mut server).await {
                Ok(result) => {
                    tracing::info!("server stopped");
                    result.map_err(|_| ServerError::Transport("http server failed".to_string()))
                }
                Err(_) => {
                    tracing::warn!(
                        grace_secs = SHUTDOWN_GRACE.as_secs(),
                        "in-flight requests did not finish; forcing shutdown"
                    );
                    Ok(())
                }
            }
        }
    }
}

/// Resolves on Ctrl-C or, on unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => tracing::info!("received ctrl-c, shutting down"),
            Err(err) => {
                tracing::error!(error = %err, "ctrl-c handler unavailable");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::SignalKind;
        use tokio::signal::unix::signal;

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                tracing::info!("received terminate signal, shutting down");
            }
            Err(err) => {
                tracing::error!(error = %err, "terminate handler unavailable");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}

/// Logs the effective configuration at startup.
fn emit_startup_banner(config: &SurveyConfig, state: &AppState, addr: SocketAddr) {
    let rate_limit = &config.server.rate_limit;
    tracing::info!(
        bind = %addr,
        environment = config.server.environment.as_str(),
        rate_limit_max_requests = rate_limit.max_requests,
        rate_limit_window_secs = state.limiter.window_secs(),
        cors_origins = ?config.server.cors_origins,
        mode_column = state.schema.mode_present(),
        store = %config.store.path.display(),
        "survey server listening"
    );
    if !state.gate.has_provider() {
        tracing::warn!("no identity provider configured; admin routes will reject every request");
    } else if config.auth.admin_emails.is_empty() {
        tracing::warn!("admin allow-list is empty; admin routes will reject every request");
    }
}
