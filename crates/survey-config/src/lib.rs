// crates/survey-config/src/lib.rs
// ============================================================================
// Module: Survey Config Library
// Description: Canonical config model, environment overrides, and validation.
// Purpose: Single source of truth for survey.toml semantics.
// Dependencies: survey-core, survey-store-sqlite, serde, toml
// ============================================================================

//! ## Overview
//! `survey-config` defines the configuration model for the survey monitor.
//! Files are parsed with strict size and path limits, environment overrides
//! are applied through an injectable lookup, and the result is validated
//! fail-closed before any component starts.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
