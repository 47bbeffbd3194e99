// crates/survey-server/src/routes/questions.rs
// ============================================================================
// Module: Question Routes
// Description: Question catalog handlers.
// Purpose: Serve public reads and admin writes over the question catalog.
// Dependencies: axum, survey-core
// ============================================================================

// ============================================================================
// SECTION: Imports
// ============================================================================

use axum::Json;
use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use survey_core::Page;
use survey_core::Question;
use survey_core::requests::QuestionBody;
use survey_core::requests::QuestionListParams;
use survey_core::requests::ReorderBody;
use survey_core::validation::validate_new_question;
use survey_core::validation::validate_question_id;
use survey_core::validation::validate_question_patch;
use survey_core::validation::validate_question_query;
use survey_core::validation::validate_reorder;

use crate::auth::AdminContext;
use crate::error::ApiError;
use crate::error::Operation;
use crate::routes::ApiJson;
use crate::routes::ApiQuery;
use crate::routes::DataBody;
use crate::routes::MessageBody;
use crate::routes::MessageDataBody;
use crate::state::AppState;
use crate::state::run_blocking;

// ============================================================================
// SECTION: Public Reads
// ============================================================================

/// `GET /api/questions`.
pub async fn list_questions(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<QuestionListParams>,
) -> Result<Json<Page<Question>>, ApiError> {
    let query = validate_question_query(&params, state.settings.default_page_size)?;
    let page = run_blocking(|| state.catalog.list(query))
        .map_err(|err| ApiError::service(Operation::ListQuestions, err, state.settings.expose_details()))?;
    Ok(Json(page))
}

/// `GET /api/questions/{uuid}`.
pub async fn get_question(
    State(state): State<AppState>,
    Path(uuid): Path<String>,
) -> Result<Json<DataBody<Question>>, ApiError> {
    let id = validate_question_id(&uuid)?;
    let question = run_blocking(|| state.catalog.get(&id))
        .map_err(|err| ApiError::service(Operation::GetQuestion, err, state.settings.expose_details()))?;
    Ok(Json(DataBody {
        data: question,
    }))
}

// ============================================================================
// SECTION: Admin Writes
// ============================================================================

/// `POST /api/questions`.
pub async fn create_question(
    admin: AdminContext,
    State(state): State<AppState>,
    ApiJson(body): ApiJson<QuestionBody>,
) -> Result<(StatusCode, Json<MessageDataBody<Question>>), ApiError> {
    let new = validate_new_question(&body)?;
    let question = run_blocking(|| state.catalog.create(new, Some(&admin.email)))
        .map_err(|err| ApiError::service(Operation::CreateQuestion, err, state.settings.expose_details()))?;
    Ok((
        StatusCode::CREATED,
        Json(MessageDataBody {
            message: "Question created successfully",
            data: question,
        }),
    ))
}

/// `PUT|PATCH /api/questions/{uuid}`.
pub async fn update_question(
    _admin: AdminContext,
    State(state): State<AppState>,
    Path(uuid): Path<String>,
    ApiJson(body): ApiJson<QuestionBody>,
) -> Result<Json<MessageDataBody<Question>>, ApiError> {
    let id = validate_question_id(&uuid)?;
    let patch = validate_question_patch(&body)?;
    let question = run_blocking(|| state.catalog.update(&id, patch))
        .map_err(|err| ApiError::service(Operation::UpdateQuestion, err, state.settings.expose_details()))?;
    Ok(Json(MessageDataBody {
        message: "Question updated successfully",
        data: question,
    }))
}

/// `DELETE /api/questions/{uuid}`.
pub async fn delete_question(
    _admin: AdminContext,
    State(state): State<AppState>,
    Path(uuid): Path<String>,
) -> Result<Json<MessageBody>, ApiError> {
    let id = validate_question_id(&uuid)?;
    run_blocking(|| state.catalog.delete(&id))
        .map_err(|err| ApiError::service(Operation::DeleteQuestion, err, state.settings.expose_details()))?;
    Ok(Json(MessageBody {
        message: "Question deleted successfully",
    }))
}

/// `POST /api/questions/reorder`.
///
/// The order is acknowledged but not persisted.
pub async fn reorder_questions(
    _admin: AdminContext,
    State(state): State<AppState>,
    ApiJson(body): ApiJson<ReorderBody>,
) -> Result<Json<MessageBody>, ApiError> {
    let order = validate_reorder(&body).ok_or(ApiError::InvalidOrder)?;
    state.catalog.reorder(&order);
    Ok(Json(MessageBody {
        message: "Order accepted",
    }))
}
