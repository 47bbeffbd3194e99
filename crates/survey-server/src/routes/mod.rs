// crates/survey-server/src/routes/mod.rs
// ============================================================================
// Module: API Routes
// Description: Route handlers and request extractors.
// Purpose: Translate HTTP requests into survey service calls.
// Dependencies: axum, serde, survey-core
// ============================================================================

//! ## Overview
//! Handlers validate permissive request shapes from `survey_core::requests`,
//! dispatch the typed command through [`crate::state::run_blocking`], and
//! wrap results in the JSON bodies the survey front end reads. Extractor
//! rejections are mapped onto [`ApiError`] so every failure keeps the
//! `{ error, details? }` envelope.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod health;
pub mod questions;
pub mod responses;

// ============================================================================
// SECTION: Imports
// ============================================================================

use axum::extract::FromRequest;
use axum::extract::FromRequestParts;
use axum::extract::Query;
use axum::extract::Request;
use axum::http::StatusCode;
use axum::http::request::Parts;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::ApiError;

// ============================================================================
// SECTION: Extractors
// ============================================================================

/// JSON body extractor with enveloped rejections.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiJson<T>(pub T);

impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        match axum::Json::<T>::from_request(request, state).await {
            Ok(axum::Json(value)) => Ok(Self(value)),
            Err(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
                Err(ApiError::PayloadTooLarge)
            }
            Err(rejection) => Err(ApiError::MalformedBody(rejection.body_text())),
        }
    }
}

/// Query string extractor with enveloped rejections.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Query::<T>::from_request_parts(parts, state)
            .await
            .map(|Query(value)| Self(value))
            .map_err(|rejection| ApiError::MalformedQuery(rejection.body_text()))
    }
}

// ============================================================================
// SECTION: Response Bodies
// ============================================================================

/// `{ data }` body.
#[derive(Debug, Serialize)]
pub struct DataBody<T> {
    /// Payload.
    pub data: T,
}

/// `{ message }` body.
#[derive(Debug, Serialize)]
pub struct MessageBody {
    /// Outcome message.
    pub message: &'static str,
}

/// `{ message, data }` body.
#[derive(Debug, Serialize)]
pub struct MessageDataBody<T> {
    /// Outcome message.
    pub message: &'static str,
    /// Affected record.
    pub data: T,
}
