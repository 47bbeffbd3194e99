// crates/survey-server/src/routes/responses.rs
// ============================================================================
// Module: Response Routes
// Description: Submission intake, listings, and statistics handlers.
// Purpose: Accept survey batches and serve admin reporting views.
// Dependencies: axum, serde, survey-core
// ============================================================================

//! ## Overview
//! `POST /api/responses` is public; every read here is admin-only.

// ============================================================================
// SECTION: Imports
// ============================================================================

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Serialize;
use survey_core::AggregateRecord;
use survey_core::ComparisonReport;
use survey_core::EnrichedResponse;
use survey_core::Page;
use survey_core::SubmissionId;
use survey_core::SubmissionWithResponses;
use survey_core::requests::CompareParams;
use survey_core::requests::ResponseListParams;
use survey_core::requests::StatsParams;
use survey_core::requests::SubmissionBody;
use survey_core::requests::SubmissionListParams;
use survey_core::validation::validate_compare_query;
use survey_core::validation::validate_response_query;
use survey_core::validation::validate_stats_query;
use survey_core::validation::validate_submission;
use survey_core::validation::validate_submission_query;

use crate::auth::AdminContext;
use crate::error::ApiError;
use crate::error::Operation;
use crate::routes::ApiJson;
use crate::routes::ApiQuery;
use crate::routes::DataBody;
use crate::state::AppState;
use crate::state::run_blocking;

// ============================================================================
// SECTION: Bodies
// ============================================================================

/// Body returned after a batch is stored.
#[derive(Debug, Serialize)]
pub struct SubmissionSaved {
    /// Outcome message.
    pub message: &'static str,
    /// Identifier of the new submission.
    pub submission_id: SubmissionId,
}

// ============================================================================
// SECTION: Handlers
// ============================================================================

/// `POST /api/responses`.
pub async fn submit_responses(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<SubmissionBody>,
) -> Result<(StatusCode, Json<SubmissionSaved>), ApiError> {
    let batch = validate_submission(&body, state.settings.require_location)?;
    let submission_id = run_blocking(|| state.submissions.submit(batch))
        .map_err(|err| ApiError::service(Operation::SaveResponses, err, state.settings.expose_details()))?;
    Ok((
        StatusCode::CREATED,
        Json(SubmissionSaved {
            message: "Responses saved",
            submission_id,
        }),
    ))
}

/// `GET /api/submissions`.
pub async fn list_submissions(
    _admin: AdminContext,
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<SubmissionListParams>,
) -> Result<Json<Page<SubmissionWithResponses>>, ApiError> {
    let (page, survey_type) = validate_submission_query(&params, state.settings.default_page_size)?;
    let submissions = run_blocking(|| state.submissions.list_submissions(page, survey_type))
        .map_err(|err| ApiError::service(Operation::ListSubmissions, err, state.settings.expose_details()))?;
    Ok(Json(submissions))
}

/// `GET /api/responses`.
pub async fn list_responses(
    _admin: AdminContext,
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<ResponseListParams>,
) -> Result<Json<Page<EnrichedResponse>>, ApiError> {
    let (page, question) = validate_response_query(&params, state.settings.default_page_size)?;
    let responses = run_blocking(|| state.submissions.list_responses(page, question.as_ref()))
        .map_err(|err| ApiError::service(Operation::ListResponses, err, state.settings.expose_details()))?;
    Ok(Json(responses))
}

/// `GET /api/responses/stats`.
pub async fn response_stats(
    _admin: AdminContext,
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<StatsParams>,
) -> Result<Json<DataBody<Vec<AggregateRecord>>>, ApiError> {
    let location = validate_stats_query(&params)?;
    let records = run_blocking(|| state.reporting.stats(location))
        .map_err(|err| ApiError::service(Operation::ResponseStats, err, state.settings.expose_details()))?;
    Ok(Json(DataBody {
        data: records,
    }))
}

/// `GET /api/responses/stats/compare`.
pub async fn compare_stats(
    _admin: AdminContext,
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<CompareParams>,
) -> Result<Json<DataBody<ComparisonReport>>, ApiError> {
    let (location, survey_type) = validate_compare_query(&params)?;
    let report = run_blocking(|| state.reporting.compare(location, survey_type))
        .map_err(|err| ApiError::service(Operation::CompareStats, err, state.settings.expose_details()))?;
    Ok(Json(DataBody {
        data: report,
    }))
}
