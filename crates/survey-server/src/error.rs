// crates/survey-server/src/error.rs
// ============================================================================
// Module: API Errors
// Description: HTTP error envelope and failure classification.
// Purpose: Map validation, auth, and service failures onto stable JSON responses.
// Dependencies: axum, serde, survey-core, thiserror
// ============================================================================

//! ## Overview
//! Every failure leaves the server as `{ "error": <title>, "details"?: ... }`.
//! Store failures carry a per-operation title; their `details` string is
//! only populated outside production.

// ============================================================================
// SECTION: Imports
// ============================================================================

use axum::http::HeaderValue;
use axum::http::StatusCode;
use axum::http::header::RETRY_AFTER;
use axum::response::IntoResponse;
use axum::response::Response;
use serde::Serialize;
use serde_json::Value;
use serde_json::json;
use survey_core::FieldError;
use survey_core::ServiceError;
use survey_core::ValidationErrors;
use thiserror::Error;

use crate::auth::AuthError;

// ============================================================================
// SECTION: Operations
// ============================================================================

/// API operation, used to title internal failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// `GET /api/questions`.
    ListQuestions,
    /// `GET /api/questions/{uuid}`.
    GetQuestion,
    /// `POST /api/questions`.
    CreateQuestion,
    /// `PUT|PATCH /api/questions/{uuid}`.
    UpdateQuestion,
    /// `DELETE /api/questions/{uuid}`.
    DeleteQuestion,
    /// `POST /api/responses`.
    SaveResponses,
    /// `GET /api/responses`.
    ListResponses,
    /// `GET /api/submissions`.
    ListSubmissions,
    /// `GET /api/responses/stats`.
    ResponseStats,
    /// `GET /api/responses/stats/compare`.
    CompareStats,
}

impl Operation {
    /// Returns the error title shown for internal failures.
    #[must_use]
    pub const fn failure_title(self) -> &'static str {
        match self {
            Self::ListQuestions => "Failed to fetch questions",
            Self::GetQuestion => "Failed to fetch question",
            Self::CreateQuestion => "Failed to create question",
            Self::UpdateQuestion => "Failed to update question",
            Self::DeleteQuestion => "Failed to delete question",
            Self::SaveResponses => "Failed to save responses",
            Self::ListResponses => "Failed to fetch responses",
            Self::ListSubmissions => "Failed to fetch submissions",
            Self::ResponseStats => "Failed to generate response stats",
            Self::CompareStats => "Failed to generate comparison stats",
        }
    }

    /// Returns the operation label used in logs.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::ListQuestions => "list_questions",
            Self::GetQuestion => "get_question",
            Self::CreateQuestion => "create_question",
            Self::UpdateQuestion => "update_question",
            Self::DeleteQuestion => "delete_question",
            Self::SaveResponses => "save_responses",
            Self::ListResponses => "list_responses",
            Self::ListSubmissions => "list_submissions",
            Self::ResponseStats => "response_stats",
            Self::CompareStats => "compare_stats",
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// HTTP-facing error.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Request fields failed validation.
    #[error("{0}")]
    Validation(ValidationErrors),
    /// Request body is not acceptable JSON.
    #[error("malformed body: {0}")]
    MalformedBody(String),
    /// Query string could not be decoded.
    #[error("malformed query: {0}")]
    MalformedQuery(String),
    /// Request body exceeds the configured limit.
    #[error("payload too large")]
    PayloadTooLarge,
    /// Missing credentials or unreachable identity provider.
    #[error("unauthorized")]
    Unauthorized,
    /// Provider rejected the bearer token.
    #[error("invalid token")]
    InvalidToken,
    /// Caller is not on the admin allow-list.
    #[error("forbidden")]
    Forbidden,
    /// Entity does not exist.
    #[error("{0} not found")]
    NotFound(&'static str),
    /// No route matches the request.
    #[error("endpoint not found")]
    EndpointNotFound,
    /// Question identifier already exists.
    #[error("duplicate question")]
    Conflict,
    /// Update carries no applicable fields.
    #[error("no valid fields to update")]
    EmptyUpdate,
    /// Reorder payload entries lack string identifiers.
    #[error("invalid order payload")]
    InvalidOrder,
    /// Client exceeded the rate limit.
    #[error("rate limited")]
    RateLimited {
        /// Seconds until the window resets.
        retry_after_secs: u64,
    },
    /// Store or other internal failure.
    #[error("{}", operation.failure_title())]
    Internal {
        /// Failing operation.
        operation: Operation,
        /// Underlying message, present only outside production.
        details: Option<String>,
    },
}

impl ApiError {
    /// Classifies a service failure for `operation`.
    ///
    /// Internal failures are logged here with the operation name.
    #[must_use]
    pub fn service(operation: Operation, error: ServiceError, expose_details: bool) -> Self {
        match error {
            ServiceError::Validation(errors) => Self::Validation(errors),
            ServiceError::NotFound(entity) => Self::NotFound(entity),
            ServiceError::Conflict(_) if operation == Operation::CreateQuestion => Self::Conflict,
            ServiceError::EmptyUpdate => Self::EmptyUpdate,
            ServiceError::InvalidOrder => Self::InvalidOrder,
            other => {
                tracing::error!(operation = operation.label(), error = %other, "request failed");
                Self::Internal {
                    operation,
                    details: expose_details.then(|| other.to_string()),
                }
            }
        }
    }

    /// Returns the HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::MalformedBody(_) | Self::MalformedQuery(_) | Self::EmptyUpdate | Self::InvalidOrder => {
                StatusCode::BAD_REQUEST
            }
            Self::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Unauthorized | Self::InvalidToken => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::NotFound(_) | Self::EndpointNotFound => StatusCode::NOT_FOUND,
            Self::Conflict => StatusCode::CONFLICT,
            Self::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Builds the JSON envelope.
    fn body(&self) -> Value {
        match self {
            Self::Validation(errors) => envelope(errors.scope().title(), Some(field_list(errors.errors()))),
            Self::MalformedBody(message) => envelope(
                "Validation failed",
                Some(field_list(&[FieldError {
                    field: "body".to_string(),
                    message: message.clone(),
                }])),
            ),
            Self::MalformedQuery(message) => envelope(
                "Query validation failed",
                Some(field_list(&[FieldError {
                    field: "query".to_string(),
                    message: message.clone(),
                }])),
            ),
            Self::PayloadTooLarge => envelope("Payload too large", None),
            Self::Unauthorized => envelope("Unauthorized", None),
            Self::InvalidToken => envelope("Invalid token", None),
            Self::Forbidden => envelope("Forbidden", Some(Value::from("Email not in admin allow-list"))),
            Self::NotFound(entity) => envelope(&format!("{entity} not found"), None),
            Self::EndpointNotFound => envelope("Endpoint not found", None),
            Self::Conflict => envelope("Question with this UUID already exists", None),
            Self::EmptyUpdate => envelope("No valid fields to update", None),
            Self::InvalidOrder => envelope("Invalid order payload", None),
            Self::RateLimited { retry_after_secs } => json!({
                "error": "Too many requests from this IP, please try again later.",
                "retryAfter": retry_after_secs,
            }),
            Self::Internal { operation, details } => {
                envelope(operation.failure_title(), details.clone().map(Value::from))
            }
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(error: AuthError) -> Self {
        match error {
            AuthError::Unauthenticated(_) => Self::Unauthorized,
            AuthError::InvalidToken => Self::InvalidToken,
            AuthError::Forbidden(_) => Self::Forbidden,
        }
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(errors)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let mut response = (status, axum::Json(self.body())).into_response();
        if let Self::RateLimited { retry_after_secs } = self
            && let Ok(value) = HeaderValue::from_str(&retry_after_secs.to_string())
        {
            response.headers_mut().insert(RETRY_AFTER, value);
        }
        response
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// JSON error envelope.
#[derive(Serialize)]
struct Envelope<'a> {
    /// Error title.
    error: &'a str,
    /// Optional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

/// Builds `{ error, details? }`.
fn envelope(error: &str, details: Option<Value>) -> Value {
    serde_json::to_value(Envelope {
        error,
        details,
    })
    .unwrap_or(Value::Null)
}

/// Serializes field errors as a JSON array.
fn field_list(errors: &[FieldError]) -> Value {
    serde_json::to_value(errors).unwrap_or(Value::Array(Vec::new()))
}

// ============================================================================
// SECTION: Tests
// ============================================================================
