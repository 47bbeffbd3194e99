// crates/survey-core/src/requests.rs
// ============================================================================
// Module: Survey Raw Requests
// Description: Permissive inbound shapes for query strings and JSON bodies.
// Purpose: Accept any client input so validation can report every field failure.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Raw request types deserialize from query strings and JSON bodies without
//! rejecting anything: query fields are optional strings and body fields are
//! optional JSON values. [`crate::validation`] turns them into typed commands
//! and collects all constraint failures at once. Unknown keys are dropped.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde_json::Value;

// ============================================================================
// SECTION: Query Strings
// ============================================================================

/// `GET /questions` query string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuestionListParams {
    /// Page number.
    pub page: Option<String>,
    /// Page size.
    pub limit: Option<String>,
    /// Category filter.
    pub category: Option<String>,
    /// Status filter.
    pub status: Option<String>,
    /// Priority filter.
    pub priority: Option<String>,
    /// Mode filter.
    pub mode: Option<String>,
    /// Free-text search.
    pub search: Option<String>,
    /// Sort column.
    #[serde(rename = "sortBy")]
    pub sort_by: Option<String>,
    /// Sort direction.
    #[serde(rename = "sortOrder")]
    pub sort_order: Option<String>,
}

/// `GET /responses` query string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResponseListParams {
    /// Page number.
    pub page: Option<String>,
    /// Page size.
    pub limit: Option<String>,
    /// Question filter.
    pub question_id: Option<String>,
    /// Legacy spelling of `question_id`.
    pub question_uuid: Option<String>,
}

/// `GET /submissions` query string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubmissionListParams {
    /// Page number.
    pub page: Option<String>,
    /// Page size.
    pub limit: Option<String>,
    /// Survey track filter.
    pub survey_type: Option<String>,
}

/// `GET /responses/stats` query string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatsParams {
    /// Location filter.
    pub location: Option<String>,
}

/// `GET /responses/stats/compare` query string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompareParams {
    /// Location compared against the global population.
    pub location: Option<String>,
    /// Survey track to compare within.
    pub survey_type: Option<String>,
}

// ============================================================================
// SECTION: JSON Bodies
// ============================================================================

/// Question create or update body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuestionBody {
    /// Rejected on update; ignored on create.
    pub uuid: Option<Value>,
    /// Title.
    pub title: Option<Value>,
    /// Description.
    pub description: Option<Value>,
    /// Category.
    pub category: Option<Value>,
    /// Priority.
    pub priority: Option<Value>,
    /// Status.
    pub status: Option<Value>,
    /// Survey track.
    pub mode: Option<Value>,
    /// Creator reference.
    pub created_by: Option<Value>,
}

/// `POST /responses` body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubmissionBody {
    /// Answer list.
    pub responses: Option<Value>,
    /// Survey track.
    pub survey_type: Option<Value>,
    /// Location tag.
    pub location: Option<Value>,
}

/// `POST /questions/reorder` body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReorderBody {
    /// Ordered entries, each carrying a `uuid`.
    pub order: Option<Value>,
}
