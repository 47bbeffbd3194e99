// crates/survey-core/src/core/submission.rs
// ============================================================================
// Module: Survey Submission Model
// Description: Submissions, response rows, answer payloads, and locations.
// Purpose: Define the batch intake and listing shapes for survey answers.
// Dependencies: serde, serde_json, crate::core::{identifiers, question, time}
// ============================================================================

//! ## Overview
//! A submission is one respondent's pass through the question set. Each of
//! its responses carries a denormalized copy of the submission's
//! [`SurveyType`]. Answer payloads have a fixed `{ value?, label? }` shape.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use crate::core::identifiers::QuestionId;
use crate::core::identifiers::ResponseId;
use crate::core::identifiers::SubmissionId;
use crate::core::question::SurveyType;
use crate::core::time::Timestamp;

// ============================================================================
// SECTION: Location
// ============================================================================

/// Physical location where a survey was taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Location {
    /// Zaanstad.
    Zaanstad,
    /// Veenhuizen.
    Veenhuizen,
    /// Almelo.
    Almelo,
}

impl Location {
    /// All accepted locations.
    pub const ALL: [Self; 3] = [Self::Zaanstad, Self::Veenhuizen, Self::Almelo];

    /// Returns the wire label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Zaanstad => "Zaanstad",
            Self::Veenhuizen => "Veenhuizen",
            Self::Almelo => "Almelo",
        }
    }

    /// Parses a wire label (case-sensitive).
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|location| location.as_str() == value)
    }
}

// ============================================================================
// SECTION: Payload
// ============================================================================

/// Answer payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponsePayload {
    /// Answer token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// Display label for the answer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl ResponsePayload {
    /// Reads a payload from arbitrary JSON; non-string fields read as absent.
    #[must_use]
    pub fn from_json(value: &Value) -> Self {
        let text = |key: &str| value.get(key).and_then(Value::as_str).map(str::to_string);
        Self {
            value: text("value"),
            label: text("label"),
        }
    }

    /// Returns the answer token: `value` when non-empty, else `label` when non-empty.
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.value
            .as_deref()
            .filter(|value| !value.is_empty())
            .or_else(|| self.label.as_deref().filter(|label| !label.is_empty()))
    }
}

// ============================================================================
// SECTION: Commands
// ============================================================================

/// One validated answer in a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewResponse {
    /// Answered question.
    pub question_uuid: QuestionId,
    /// Answer payload.
    pub response_data: ResponsePayload,
    /// Optional free-text respondent identifier.
    pub user_identifier: Option<String>,
}

/// Validated batch submission.
///
/// # Invariants
/// - `responses` is non-empty when built by validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSubmission {
    /// Survey track.
    pub survey_type: SurveyType,
    /// Location tag.
    pub location: Option<Location>,
    /// Answers.
    pub responses: Vec<NewResponse>,
}

// ============================================================================
// SECTION: Records
// ============================================================================

/// Persisted submission row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    /// Submission identifier.
    pub uuid: SubmissionId,
    /// Survey track.
    pub survey_type: SurveyType,
    /// Location tag.
    pub location: Option<Location>,
    /// Creation time.
    pub created_at: Timestamp,
}

/// Persisted response row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseRecord {
    /// Response identifier.
    pub uuid: ResponseId,
    /// Owning submission.
    pub submission_uuid: SubmissionId,
    /// Answered question.
    pub question_uuid: QuestionId,
    /// Answer payload.
    pub response_data: ResponsePayload,
    /// Optional respondent identifier.
    pub user_identifier: Option<String>,
    /// Copy of the submission's survey track.
    pub survey_type: SurveyType,
    /// Creation time.
    pub created_at: Timestamp,
}

/// Response row with its question title resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnrichedResponse {
    /// Underlying row.
    #[serde(flatten)]
    pub record: ResponseRecord,
    /// Current question title; `None` when the question is unknown.
    pub question_title: Option<String>,
}

/// Submission with its nested, enriched responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionWithResponses {
    /// Submission row.
    #[serde(flatten)]
    pub submission: Submission,
    /// Responses in insertion order.
    pub responses: Vec<EnrichedResponse>,
}

/// Minimal projection of a response used by the aggregation engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatRow {
    /// Answered question; may be empty for malformed rows.
    pub question_uuid: QuestionId,
    /// Survey track copied from the submission.
    pub survey_type: SurveyType,
    /// Answer payload.
    pub response_data: ResponsePayload,
}
