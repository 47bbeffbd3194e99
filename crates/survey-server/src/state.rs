// crates/survey-server/src/state.rs
// ============================================================================
// Module: Server State
// Description: Shared handler state and blocking store dispatch.
// Purpose: Hold the survey services, admin gate, and limiter for all routes.
// Dependencies: survey-config, survey-core, tokio
// ============================================================================

//! ## Overview
//! [`AppState`] is cloned into every handler. Store access is synchronous, so
//! handlers dispatch service calls through [`run_blocking`], which moves the
//! call off the async worker when the runtime allows it.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::time::Instant;

use survey_config::RunEnvironment;
use survey_core::QuestionCatalog;
use survey_core::ReportingService;
use survey_core::SchemaSupport;
use survey_core::SubmissionService;
use survey_core::SurveyStore;

use crate::auth::AdminGate;
use crate::rate_limit::RateLimiter;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Store handle shared by every service.
pub type SharedSurveyStore = Arc<dyn SurveyStore + Send + Sync>;

/// Request-facing settings derived from configuration.
#[derive(Debug, Clone)]
pub struct ApiSettings {
    /// Deployment environment.
    pub environment: RunEnvironment,
    /// Page size used when a listing omits `limit`.
    pub default_page_size: u32,
    /// Whether submissions must carry a location.
    pub require_location: bool,
    /// Allowed CORS origins.
    pub cors_origins: Vec<String>,
    /// Maximum accepted request body size.
    pub max_body_bytes: usize,
}

impl ApiSettings {
    /// Returns true when internal error details may be sent to clients.
    #[must_use]
    pub const fn expose_details(&self) -> bool {
        !self.environment.is_production()
    }
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            environment: RunEnvironment::Development,
            default_page_size: survey_core::DEFAULT_PAGE_SIZE,
            require_location: true,
            cors_origins: Vec::new(),
            max_body_bytes: 10 * 1024 * 1024,
        }
    }
}

/// State shared by all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Question catalog.
    pub catalog: QuestionCatalog<SharedSurveyStore>,
    /// Submission intake and listings.
    pub submissions: SubmissionService<SharedSurveyStore>,
    /// Aggregated statistics.
    pub reporting: ReportingService<SharedSurveyStore>,
    /// Raw store, used by health checks.
    pub store: SharedSurveyStore,
    /// Optional column presence shared with the catalog.
    pub schema: SchemaSupport,
    /// Admin route gate.
    pub gate: Arc<AdminGate>,
    /// Per-client request limiter.
    pub limiter: Arc<RateLimiter>,
    /// Request-facing settings.
    pub settings: ApiSettings,
    /// Process start, for uptime reporting.
    pub started_at: Instant,
}

impl AppState {
    /// Wires services over `store`.
    #[must_use]
    pub fn new(
        store: SharedSurveyStore,
        schema: SchemaSupport,
        gate: AdminGate,
        limiter: RateLimiter,
        settings: ApiSettings,
    ) -> Self {
        Self {
            catalog: QuestionCatalog::new(Arc::clone(&store), schema.clone()),
            submissions: SubmissionService::new(Arc::clone(&store)),
            reporting: ReportingService::new(Arc::clone(&store)),
            store,
            schema,
            gate: Arc::new(gate),
            limiter: Arc::new(limiter),
            settings,
            started_at: Instant::now(),
        }
    }
}

// ============================================================================
// SECTION: Blocking Dispatch
// ============================================================================

/// Runs a synchronous store call, shifting to a blocking context when available.
pub fn run_blocking<T>(call: impl FnOnce() -> T) -> T {
    match tokio::runtime::Handle::try_current() {
        Ok(handle) if handle.runtime_flavor() == tokio::runtime::RuntimeFlavor::MultiThread => {
            tokio::task::block_in_place(call)
        }
        _ => call(),
    }
}
