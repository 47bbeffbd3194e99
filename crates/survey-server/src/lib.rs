// crates/survey-server/src/lib.rs
// ============================================================================
// Module: Survey Server Library
// Description: HTTP JSON API for the survey monitor.
// Purpose: Expose the router, server, and admin authorization building blocks.
// Dependencies: survey-core, survey-config, survey-store-sqlite, axum
// ============================================================================

//! ## Overview
//! The survey server hosts the question catalog, submission intake, and
//! reporting endpoints over axum. Admin routes resolve bearer tokens through
//! an [`auth::IdentityProvider`] and check the result against an email
//! allow-list. Security posture: every request body and query string is
//! untrusted and is validated by `survey_core::validation` before any store
//! access.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod auth;
pub mod error;
pub mod middleware;
pub mod rate_limit;
pub mod routes;
pub mod server;
pub mod state;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use auth::AdminContext;
pub use auth::AdminGate;
pub use auth::IdentityProvider;
pub use auth::StaticIdentityProvider;
pub use auth::SupabaseIdentityProvider;
pub use error::ApiError;
pub use rate_limit::RateLimiter;
pub use server::ServerError;
pub use server::SurveyServer;
pub use server::build_router;
pub use state::ApiSettings;
pub use state::AppState;
pub use state::SharedSurveyStore;
