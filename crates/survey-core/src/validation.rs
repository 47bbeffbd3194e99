// crates/survey-core/src/validation.rs
// ============================================================================
// Module: Survey Validation
// Description: Field-level validation of raw requests into typed commands.
// Purpose: Enforce length bounds, enum sets, and charset rules before business logic.
// Dependencies: serde, serde_json, crate::{core, requests}
// ============================================================================

//! ## Overview
//! Validation never aborts early: every failing field is recorded as a
//! [`FieldError`] and returned together in [`ValidationErrors`]. Strings are
//! trimmed before length and charset checks. JSON `null` and empty query
//! values both read as absent.
//!
//! Security posture: all request input is untrusted; every string that
//! reaches the store has passed a bounded length check.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Serialize;
use serde_json::Value;

use crate::core::Location;
use crate::core::NewQuestion;
use crate::core::NewResponse;
use crate::core::NewSubmission;
use crate::core::PageRequest;
use crate::core::Priority;
use crate::core::QuestionFilter;
use crate::core::QuestionId;
use crate::core::QuestionPatch;
use crate::core::QuestionQuery;
use crate::core::QuestionStatus;
use crate::core::ResponsePayload;
use crate::core::SortField;
use crate::core::SortOrder;
use crate::core::SurveyType;
use crate::core::page::MAX_PAGE_SIZE;
use crate::requests::CompareParams;
use crate::requests::QuestionBody;
use crate::requests::QuestionListParams;
use crate::requests::ReorderBody;
use crate::requests::ResponseListParams;
use crate::requests::StatsParams;
use crate::requests::SubmissionBody;
use crate::requests::SubmissionListParams;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum title length in characters.
const MAX_TITLE_CHARS: usize = 255;
/// Maximum description length in characters.
const MAX_DESCRIPTION_CHARS: usize = 5000;
/// Maximum category length in characters.
const MAX_CATEGORY_CHARS: usize = 100;
/// Maximum creator reference length in characters.
const MAX_CREATED_BY_CHARS: usize = 100;
/// Maximum respondent identifier length in characters.
const MAX_USER_IDENTIFIER_CHARS: usize = 255;
/// Minimum search term length in characters.
const MIN_SEARCH_CHARS: usize = 3;
/// Maximum search term length in characters.
const MAX_SEARCH_CHARS: usize = 100;

/// Extra characters allowed in categories.
const CATEGORY_EXTRA: &[char] = &['-', '_'];
/// Extra characters allowed in search terms.
const SEARCH_EXTRA: &[char] = &['-', '_', '.'];
/// Extra characters allowed in creator and respondent identifiers.
const IDENTITY_EXTRA: &[char] = &['-', '_', '.', '@'];

/// Message for an invalid priority.
const PRIORITY_MESSAGE: &str = "Priority must be low, medium, or high";
/// Message for an invalid status.
const STATUS_MESSAGE: &str = "Status must be active, inactive, or archived";
/// Message for an invalid question mode.
const MODE_MESSAGE: &str = "Mode must be regular or ouder_kind";
/// Message for an invalid survey type.
const SURVEY_TYPE_MESSAGE: &str = "Survey type must be regular or ouder_kind";
/// Message for an invalid location.
const LOCATION_MESSAGE: &str = "Selecteer een geldige locatie (Zaanstad, Veenhuizen of Almelo)";
/// Message for a missing location.
const LOCATION_REQUIRED_MESSAGE: &str = "Locatie is verplicht";

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Which part of the request failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationScope {
    /// JSON body.
    Body,
    /// Path parameters.
    Params,
    /// Query string.
    Query,
}

impl ValidationScope {
    /// Returns the error title reported to clients.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Body => "Validation failed",
            Self::Params => "Parameter validation failed",
            Self::Query => "Query validation failed",
        }
    }
}

/// A single field failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Dotted field path, e.g. `responses.0.question_uuid`.
    pub field: String,
    /// Human-readable message.
    pub message: String,
}

/// All field failures for one request part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors {
    /// Failing request part.
    scope: ValidationScope,
    /// Failures in input order.
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    /// Creates an empty collector for `scope`.
    #[must_use]
    pub const fn new(scope: ValidationScope) -> Self {
        Self {
            scope,
            errors: Vec::new(),
        }
    }

    /// Builds a collector holding one failure.
    #[must_use]
    pub fn single(
        scope: ValidationScope,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        let mut errors = Self::new(scope);
        errors.push(field, message);
        errors
    }

    /// Records a failure.
    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Returns the failing request part.
    #[must_use]
    pub const fn scope(&self) -> ValidationScope {
        self.scope
    }

    /// Returns the recorded failures.
    #[must_use]
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Returns true when nothing failed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns `value` when nothing failed, otherwise the collected failures.
    ///
    /// # Errors
    ///
    /// Returns `self` when at least one failure was recorded.
    pub fn finish<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.scope.title())?;
        for (index, error) in self.errors.iter().enumerate() {
            let sep = if index == 0 { ": " } else { "; " };
            write!(f, "{sep}{}: {}", error.field, error.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

// ============================================================================
// SECTION: Field Helpers
// ============================================================================

/// Returns true when every char is ASCII alphanumeric, whitespace, or in `extra`.
fn charset_ok(value: &str, extra: &[char]) -> bool {
    value
        .chars()
        .all(|ch| ch.is_ascii_alphanumeric() || ch.is_whitespace() || extra.contains(&ch))
}

/// Returns the trimmed query value, treating blank input as absent.
fn query_text(raw: Option<&String>) -> Option<&str> {
    raw.map(|value| value.trim()).filter(|value| !value.is_empty())
}

/// Reads an optional JSON string, recording a type failure for non-strings.
fn body_text(
    errors: &mut ValidationErrors,
    field: &str,
    label: &str,
    raw: Option<&Value>,
) -> Option<String> {
    match raw {
        None | Some(Value::Null) => None,
        Some(Value::String(value)) => Some(value.trim().to_string()),
        Some(_) => {
            errors.push(field, format!("{label} must be a string"));
            None
        }
    }
}

/// Applies a max length and optional charset to a trimmed, non-empty value.
fn bounded_text(
    errors: &mut ValidationErrors,
    field: &str,
    label: &str,
    value: &str,
    max_chars: usize,
    charset: Option<&[char]>,
) -> bool {
    let mut ok = true;
    if value.chars().count() > max_chars {
        errors.push(field, format!("{label} must be less than {max_chars} characters"));
        ok = false;
    }
    if let Some(extra) = charset
        && !value.is_empty()
        && !charset_ok(value, extra)
    {
        errors.push(field, format!("{label} contains invalid characters"));
        ok = false;
    }
    ok
}

/// Validates an optional clearable body string: empty clears the value.
fn clearable_text(
    errors: &mut ValidationErrors,
    field: &str,
    label: &str,
    raw: Option<&Value>,
    max_chars: usize,
    charset: Option<&[char]>,
) -> Option<Option<String>> {
    let value = body_text(errors, field, label, raw)?;
    if !bounded_text(errors, field, label, &value, max_chars, charset) {
        return None;
    }
    Some(if value.is_empty() { None } else { Some(value) })
}

/// Parses an optional enum-valued body field.
fn body_enum<T>(
    errors: &mut ValidationErrors,
    field: &str,
    raw: Option<&Value>,
    parse: impl Fn(&str) -> Option<T>,
    message: &str,
) -> Option<T> {
    match raw {
        None | Some(Value::Null) => None,
        Some(Value::String(value)) => {
            let parsed = parse(value);
            if parsed.is_none() {
                errors.push(field, message);
            }
            parsed
        }
        Some(_) => {
            errors.push(field, message);
            None
        }
    }
}

/// Parses an optional enum-valued query field.
fn query_enum<T>(
    errors: &mut ValidationErrors,
    field: &str,
    raw: Option<&String>,
    parse: impl Fn(&str) -> Option<T>,
    message: &str,
) -> Option<T> {
    let value = query_text(raw)?;
    let parsed = parse(value);
    if parsed.is_none() {
        errors.push(field, message);
    }
    parsed
}

/// Parses a positive integer query value with an optional upper bound.
fn positive_integer(
    errors: &mut ValidationErrors,
    field: &str,
    label: &str,
    raw: Option<&String>,
    default: u32,
    max: Option<u32>,
) -> u32 {
    let Some(value) = raw.map(|value| value.trim()) else {
        return default;
    };
    let Ok(number) = value.parse::<f64>() else {
        errors.push(field, format!("{label} must be a number"));
        return default;
    };
    if !number.is_finite() {
        errors.push(field, format!("{label} must be a number"));
        return default;
    }
    if number.fract() != 0.0 {
        errors.push(field, format!("{label} must be an integer"));
        return default;
    }
    if number < 1.0 {
        errors.push(field, format!("{label} must be at least 1"));
        return default;
    }
    if let Some(max) = max
        && number > f64::from(max)
    {
        errors.push(field, format!("{label} cannot exceed {max}"));
        return default;
    }
    if number > f64::from(u32::MAX) {
        errors.push(field, format!("{label} is too large"));
        return default;
    }
    format!("{number:.0}").parse().unwrap_or(default)
}

/// Validates `page` and `limit` query values.
fn page_request(
    errors: &mut ValidationErrors,
    page: Option<&String>,
    limit: Option<&String>,
    default_limit: u32,
) -> PageRequest {
    let page = positive_integer(errors, "page", "Page", page, 1, None);
    let limit = positive_integer(errors, "limit", "Limit", limit, default_limit, Some(MAX_PAGE_SIZE));
    PageRequest::new(page, limit)
}

// ============================================================================
// SECTION: Question Validation
// ============================================================================

/// Validates the question list query.
///
/// # Errors
///
/// Returns [`ValidationErrors`] with every failing query field.
pub fn validate_question_query(
    params: &QuestionListParams,
    default_limit: u32,
) -> Result<QuestionQuery, ValidationErrors> {
    let mut errors = ValidationErrors::new(ValidationScope::Query);
    let page = page_request(&mut errors, params.page.as_ref(), params.limit.as_ref(), default_limit);

    let category = query_text(params.category.as_ref()).and_then(|value| {
        bounded_text(&mut errors, "category", "Category", value, MAX_CATEGORY_CHARS, Some(CATEGORY_EXTRA))
            .then(|| value.to_string())
    });
    let status = query_enum(&mut errors, "status", params.status.as_ref(), QuestionStatus::parse, STATUS_MESSAGE);
    let priority =
        query_enum(&mut errors, "priority", params.priority.as_ref(), Priority::parse, PRIORITY_MESSAGE);
    let mode = query_enum(&mut errors, "mode", params.mode.as_ref(), SurveyType::parse, MODE_MESSAGE);

    let search = params.search.as_ref().map(|value| value.trim()).and_then(|value| {
        let chars = value.chars().count();
        if chars == 0 {
            errors.push("search", "Search term is not allowed to be empty");
            None
        } else if chars < MIN_SEARCH_CHARS {
            errors.push("search", "Search term must be at least 3 characters");
            None
        } else if chars > MAX_SEARCH_CHARS {
            errors.push("search", "Search term must be less than 100 characters");
            None
        } else if !charset_ok(value, SEARCH_EXTRA) {
            errors.push("search", "Search term contains invalid characters");
            None
        } else {
            Some(value.to_string())
        }
    });

    let sort_by = query_enum(
        &mut errors,
        "sortBy",
        params.sort_by.as_ref(),
        SortField::parse,
        "Sort by must be created_at, updated_at, title, or priority",
    )
    .unwrap_or_default();
    let sort_order = query_enum(
        &mut errors,
        "sortOrder",
        params.sort_order.as_ref(),
        SortOrder::parse,
        "Sort order must be ASC or DESC",
    )
    .unwrap_or_default();

    errors.finish(QuestionQuery {
        page,
        filter: QuestionFilter {
            category,
            status,
            priority,
            mode,
            search,
        },
        sort_by,
        sort_order,
    })
}

/// Validates a path `uuid` parameter.
///
/// # Errors
///
/// Returns [`ValidationErrors`] when the value is not a UUID.
pub fn validate_question_id(raw: &str) -> Result<QuestionId, ValidationErrors> {
    QuestionId::parse(raw.trim())
        .map_err(|_| ValidationErrors::single(ValidationScope::Params, "uuid", "Invalid UUID format"))
}

/// Validates a question creation body.
///
/// # Errors
///
/// Returns [`ValidationErrors`] with every failing body field.
pub fn validate_new_question(body: &QuestionBody) -> Result<NewQuestion, ValidationErrors> {
    let mut errors = ValidationErrors::new(ValidationScope::Body);

    let title = match body_text(&mut errors, "title", "Title", body.title.as_ref()) {
        None if body.title.as_ref().is_some_and(|value| !value.is_null()) => None,
        None => {
            errors.push("title", "Title is required");
            None
        }
        Some(value) if value.is_empty() => {
            errors.push("title", "Title is required");
            None
        }
        Some(value) => bounded_text(&mut errors, "title", "Title", &value, MAX_TITLE_CHARS, None)
            .then_some(value),
    };

    let description = clearable_text(
        &mut errors,
        "description",
        "Description",
        body.description.as_ref(),
        MAX_DESCRIPTION_CHARS,
        None,
    )
    .flatten();
    let category = clearable_text(
        &mut errors,
        "category",
        "Category",
        body.category.as_ref(),
        MAX_CATEGORY_CHARS,
        Some(CATEGORY_EXTRA),
    )
    .flatten();
    let created_by = clearable_text(
        &mut errors,
        "created_by",
        "Created by",
        body.created_by.as_ref(),
        MAX_CREATED_BY_CHARS,
        Some(IDENTITY_EXTRA),
    )
    .flatten();

    let priority = body_enum(&mut errors, "priority", body.priority.as_ref(), Priority::parse, PRIORITY_MESSAGE)
        .unwrap_or_default();
    let status = body_enum(&mut errors, "status", body.status.as_ref(), QuestionStatus::parse, STATUS_MESSAGE)
        .unwrap_or_default();
    let mode = body_enum(&mut errors, "mode", body.mode.as_ref(), SurveyType::parse, MODE_MESSAGE)
        .unwrap_or_default();

    let title = title.unwrap_or_default();
    errors.finish(NewQuestion {
        title,
        description,
        category,
        priority,
        status,
        mode,
        created_by,
    })
}

/// Validates a partial question update body.
///
/// The identifier is immutable, so a `uuid` key is rejected. `created_by`
/// is not updatable and is dropped.
///
/// # Errors
///
/// Returns [`ValidationErrors`] with every failing body field.
pub fn validate_question_patch(body: &QuestionBody) -> Result<QuestionPatch, ValidationErrors> {
    let mut errors = ValidationErrors::new(ValidationScope::Body);

    if body.uuid.as_ref().is_some_and(|value| !value.is_null()) {
        errors.push("uuid", "uuid is not allowed");
    }

    let title = body_text(&mut errors, "title", "Title", body.title.as_ref()).and_then(|value| {
        if value.is_empty() {
            errors.push("title", "Title cannot be empty");
            None
        } else {
            bounded_text(&mut errors, "title", "Title", &value, MAX_TITLE_CHARS, None).then_some(value)
        }
    });
    let description = clearable_text(
        &mut errors,
        "description",
        "Description",
        body.description.as_ref(),
        MAX_DESCRIPTION_CHARS,
        None,
    );
    let category = clearable_text(
        &mut errors,
        "category",
        "Category",
        body.category.as_ref(),
        MAX_CATEGORY_CHARS,
        Some(CATEGORY_EXTRA),
    );
    let priority = body_enum(&mut errors, "priority", body.priority.as_ref(), Priority::parse, PRIORITY_MESSAGE);
    let status = body_enum(&mut errors, "status", body.status.as_ref(), QuestionStatus::parse, STATUS_MESSAGE);
    let mode = body_enum(&mut errors, "mode", body.mode.as_ref(), SurveyType::parse, MODE_MESSAGE);

    errors.finish(QuestionPatch {
        title,
        description,
        category,
        priority,
        status,
        mode,
    })
}

/// Validates a reorder body; returns `None` when any entry lacks a string `uuid`.
///
/// A missing or non-array `order` reads as an empty list.
#[must_use]
pub fn validate_reorder(body: &ReorderBody) -> Option<Vec<String>> {
    let Some(Value::Array(entries)) = body.order.as_ref() else {
        return Some(Vec::new());
    };
    entries
        .iter()
        .map(|entry| entry.get("uuid").and_then(Value::as_str).map(str::to_string))
        .collect()
}

// ============================================================================
// SECTION: Submission Validation
// ============================================================================

/// Validates one answer object at `index`.
fn validate_answer(errors: &mut ValidationErrors, index: usize, raw: &Value) -> Option<NewResponse> {
    let prefix = format!("responses.{index}");
    let Value::Object(fields) = raw else {
        errors.push(prefix, "Response must be an object");
        return None;
    };

    let question_field = format!("{prefix}.question_uuid");
    let question_uuid = match fields.get("question_uuid") {
        None | Some(Value::Null) => {
            errors.push(question_field, "Question UUID is required");
            None
        }
        Some(Value::String(value)) => {
            let parsed = QuestionId::parse(value).ok();
            if parsed.is_none() {
                errors.push(question_field, "Invalid question UUID format");
            }
            parsed
        }
        Some(_) => {
            errors.push(question_field, "Invalid question UUID format");
            None
        }
    };

    let data_field = format!("{prefix}.response_data");
    let response_data = match fields.get("response_data") {
        None | Some(Value::Null) => {
            errors.push(data_field, "Response data is required");
            None
        }
        Some(Value::Object(payload)) => {
            let mut ok = true;
            for key in ["value", "label"] {
                if let Some(value) = payload.get(key)
                    && !value.is_string()
                    && !value.is_null()
                {
                    errors.push(format!("{data_field}.{key}"), format!("Response {key} must be a string"));
                    ok = false;
                }
            }
            ok.then(|| ResponsePayload::from_json(&Value::Object(payload.clone())))
        }
        Some(_) => {
            errors.push(data_field, "Response data must be an object");
            None
        }
    };

    let identifier_field = format!("{prefix}.user_identifier");
    let user_identifier = clearable_text(
        errors,
        &identifier_field,
        "User identifier",
        fields.get("user_identifier"),
        MAX_USER_IDENTIFIER_CHARS,
        Some(IDENTITY_EXTRA),
    )
    .flatten();

    Some(NewResponse {
        question_uuid: question_uuid?,
        response_data: response_data?,
        user_identifier,
    })
}

/// Validates a batch submission body.
///
/// # Errors
///
/// Returns [`ValidationErrors`] with every failing body field.
pub fn validate_submission(
    body: &SubmissionBody,
    require_location: bool,
) -> Result<NewSubmission, ValidationErrors> {
    let mut errors = ValidationErrors::new(ValidationScope::Body);

    let mut responses = Vec::new();
    match body.responses.as_ref() {
        None | Some(Value::Null) => errors.push("responses", "Responses are required"),
        Some(Value::Array(items)) if items.is_empty() => {
            errors.push("responses", "Responses must contain at least 1 item");
        }
        Some(Value::Array(items)) => {
            for (index, item) in items.iter().enumerate() {
                if let Some(answer) = validate_answer(&mut errors, index, item) {
                    responses.push(answer);
                }
            }
        }
        Some(_) => errors.push("responses", "Responses must be an array"),
    }

    let survey_type = body_enum(
        &mut errors,
        "survey_type",
        body.survey_type.as_ref(),
        SurveyType::parse,
        SURVEY_TYPE_MESSAGE,
    )
    .unwrap_or_default();

    let location = match body.location.as_ref() {
        None | Some(Value::Null) => {
            if require_location {
                errors.push("location", LOCATION_REQUIRED_MESSAGE);
            }
            None
        }
        raw => body_enum(&mut errors, "location", raw, Location::parse, LOCATION_MESSAGE),
    };

    errors.finish(NewSubmission {
        survey_type,
        location,
        responses,
    })
}

/// Validates the submission list query.
///
/// # Errors
///
/// Returns [`ValidationErrors`] with every failing query field.
pub fn validate_submission_query(
    params: &SubmissionListParams,
    default_limit: u32,
) -> Result<(PageRequest, Option<SurveyType>), ValidationErrors> {
    let mut errors = ValidationErrors::new(ValidationScope::Query);
    let page = page_request(&mut errors, params.page.as_ref(), params.limit.as_ref(), default_limit);
    let survey_type = query_enum(
        &mut errors,
        "survey_type",
        params.survey_type.as_ref(),
        SurveyType::parse,
        SURVEY_TYPE_MESSAGE,
    );
    errors.finish((page, survey_type))
}

/// Validates the flat response list query.
///
/// # Errors
///
/// Returns [`ValidationErrors`] with every failing query field.
pub fn validate_response_query(
    params: &ResponseListParams,
    default_limit: u32,
) -> Result<(PageRequest, Option<QuestionId>), ValidationErrors> {
    let mut errors = ValidationErrors::new(ValidationScope::Query);
    let page = page_request(&mut errors, params.page.as_ref(), params.limit.as_ref(), default_limit);
    let (field, raw) = if params.question_id.is_some() {
        ("question_id", params.question_id.as_ref())
    } else {
        ("question_uuid", params.question_uuid.as_ref())
    };
    let question = query_text(raw).and_then(|value| {
        let parsed = QuestionId::parse(value).ok();
        if parsed.is_none() {
            errors.push(field, "Invalid question UUID format");
        }
        parsed
    });
    errors.finish((page, question))
}

/// Validates the stats query.
///
/// # Errors
///
/// Returns [`ValidationErrors`] when the location is not in the closed set.
pub fn validate_stats_query(params: &StatsParams) -> Result<Option<Location>, ValidationErrors> {
    let mut errors = ValidationErrors::new(ValidationScope::Query);
    let location = query_enum(&mut errors, "location", params.location.as_ref(), Location::parse, LOCATION_MESSAGE);
    errors.finish(location)
}

/// Validates the comparison query; `location` is required.
///
/// # Errors
///
/// Returns [`ValidationErrors`] with every failing query field.
pub fn validate_compare_query(
    params: &CompareParams,
) -> Result<(Location, SurveyType), ValidationErrors> {
    let mut errors = ValidationErrors::new(ValidationScope::Query);
    let location = if query_text(params.location.as_ref()).is_none() {
        errors.push("location", LOCATION_REQUIRED_MESSAGE);
        None
    } else {
        query_enum(&mut errors, "location", params.location.as_ref(), Location::parse, LOCATION_MESSAGE)
    };
    let survey_type = query_enum(
        &mut errors,
        "survey_type",
        params.survey_type.as_ref(),
        SurveyType::parse,
        SURVEY_TYPE_MESSAGE,
    )
    .unwrap_or_default();
    match location {
        Some(location) if errors.is_empty() => Ok((location, survey_type)),
        _ => Err(errors),
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
