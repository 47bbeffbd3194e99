// crates/survey-core/src/runtime/mod.rs
// ============================================================================
// Module: Survey Runtime
// Description: Catalog, intake, and reporting services plus the in-memory store.
// Purpose: Execute survey operations against any SurveyStore implementation.
// Dependencies: crate::{core, interfaces, aggregation}
// ============================================================================

//! ## Overview
//! Runtime services are synchronous and generic over [`crate::SurveyStore`].
//! HTTP hosts construct them once and share them across requests; services
//! hold no mutable state apart from the [`SchemaSupport`] flag.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod catalog;
pub mod error;
pub mod reporting;
pub mod schema;
pub mod store;
pub mod submissions;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use catalog::QuestionCatalog;
pub use error::ServiceError;
pub use reporting::ReportingService;
pub use schema::SchemaSupport;
pub use store::InMemorySurveyStore;
pub use submissions::SubmissionService;
