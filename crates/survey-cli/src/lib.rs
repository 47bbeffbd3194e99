// crates/survey-cli/src/lib.rs
// ============================================================================
// Module: Survey CLI Library
// Description: Shared helpers for the survey-monitor command-line interface.
// Purpose: Provide logging setup and config summaries for the binary and tests.
// Dependencies: clap, survey-config, tracing-subscriber
// ============================================================================

//! ## Overview
//! The binary entry point (`src/main.rs`) parses arguments and dispatches
//! commands; this library owns the pieces worth testing on their own.

// ============================================================================
// SECTION: Imports
// ============================================================================

use clap::ValueEnum;
use survey_config::IdentityConfig;
use survey_config::SurveyConfig;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

// ============================================================================
// SECTION: Logging
// ============================================================================

/// Default filter when `RUST_LOG` is unset or invalid.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per event.
    Json,
}

/// Logging setup failures.
#[derive(Debug, Error)]
#[error("logging init failed: {message}")]
pub struct LoggingError {
    /// Subscriber installation failure.
    message: String,
}

/// Installs the global `tracing` subscriber, writing to stderr.
///
/// # Errors
///
/// Returns [`LoggingError`] when a global subscriber is already set.
pub fn init_logging(format: LogFormat) -> Result<(), LoggingError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr);
    let result = match format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    result.map_err(|err| LoggingError {
        message: err.to_string(),
    })
}

// ============================================================================
// SECTION: Config Summary
// ============================================================================

/// Returns a one-line description of a validated config.
#[must_use]
pub fn config_summary(config: &SurveyConfig) -> String {
    let identity = match &config.auth.identity {
        Some(IdentityConfig::Supabase(_)) => "supabase",
        Some(IdentityConfig::Static(_)) => "static",
        None => "none",
    };
    format!(
        "config ok: bind={} environment={} store={} identity={} admins={} rate_limit={}/{}ms",
        config.server.bind,
        config.server.environment.as_str(),
        config.store.path.display(),
        identity,
        config.auth.admin_emails.len(),
        config.server.rate_limit.max_requests,
        config.server.rate_limit.window_ms,
    )
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(
        clippy::panic,
        clippy::unwrap_used,
        clippy::expect_used,
        reason = "Test-only assertions are permitted."
    )]

    use super::*;

    #[test]
    fn summary_reports_identity_and_admins() {
        let mut config = SurveyConfig::default();
        config.auth.admin_emails = vec!["a@b.nl".to_string(), "c@d.nl".to_string()];
        let summary = config_summary(&config);
        assert!(summary.starts_with("config ok: bind=0.0.0.0:5000 environment=development"));
        assert!(summary.contains("identity=none"));
        assert!(summary.contains("admins=2"));
        assert!(summary.contains("rate_limit=100/900000ms"));
    }
}
