// crates/survey-core/src/lib.rs
// ============================================================================
// Module: Survey Core Library
// Description: Public API surface for the survey collection core.
// Purpose: Expose domain types, validation, aggregation, and service runtime.
// Dependencies: crate::{core, interfaces, runtime, validation, aggregation}
// ============================================================================

//! ## Overview
//! Survey core owns the question catalog, submission intake, and reporting
//! logic for the survey monitor. It is transport-agnostic: HTTP hosts feed it
//! permissive request shapes and receive typed results or typed errors.
//! Persistence is reached only through the [`SurveyStore`] interface.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod aggregation;
pub mod core;
pub mod interfaces;
pub mod requests;
pub mod runtime;
pub mod validation;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use crate::core::*;

pub use aggregation::AggregateRecord;
pub use aggregation::ComparisonPoint;
pub use aggregation::ComparisonReport;
pub use aggregation::WeightedAverage;
pub use interfaces::ModeColumn;
pub use interfaces::StoreError;
pub use interfaces::SurveyStore;
pub use interfaces::TitleMap;
pub use runtime::InMemorySurveyStore;
pub use runtime::QuestionCatalog;
pub use runtime::ReportingService;
pub use runtime::SchemaSupport;
pub use runtime::ServiceError;
pub use runtime::SubmissionService;
pub use validation::FieldError;
pub use validation::ValidationErrors;
pub use validation::ValidationScope;
