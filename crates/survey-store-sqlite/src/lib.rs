// crates/survey-store-sqlite/src/lib.rs
// ============================================================================
// Module: SQLite Survey Store
// Description: Durable SurveyStore backend using SQLite WAL.
// Purpose: Provide transactional persistence for questions, submissions, and responses.
// Dependencies: survey-core, rusqlite
// ============================================================================

//! ## Overview
//! This crate provides a SQLite-backed [`SurveyStore`] implementation. Batch
//! submissions are written in one transaction, and databases provisioned
//! before the `questions.mode` column existed are detected with a minimal
//! read rather than migrated. Security posture: storage inputs are untrusted;
//! every statement binds values as parameters.
//!
//! [`SurveyStore`]: survey_core::SurveyStore

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod store;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use store::SqliteStoreConfig;
pub use store::SqliteStoreError;
pub use store::SqliteStoreMode;
pub use store::SqliteSurveyStore;
pub use store::SqliteSyncMode;
