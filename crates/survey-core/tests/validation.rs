// crates/survey-core/tests/validation.rs
// ============================================================================
// Module: Request Validation Tests
// Description: Field constraints, messages, and defaults for raw requests.
// ============================================================================
//! ## Overview
//! Validates that every constraint reports its message and that failures
//! are collected rather than aborting at the first one.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Test-only panic-based assertions are permitted."
)]

use serde_json::json;
use survey_core::Location;
use survey_core::Priority;
use survey_core::QuestionStatus;
use survey_core::SortField;
use survey_core::SortOrder;
use survey_core::SurveyType;
use survey_core::ValidationErrors;
use survey_core::ValidationScope;
use survey_core::requests::CompareParams;
use survey_core::requests::QuestionBody;
use survey_core::requests::QuestionListParams;
use survey_core::requests::ReorderBody;
use survey_core::requests::ResponseListParams;
use survey_core::requests::SubmissionBody;
use survey_core::validation::validate_compare_query;
use survey_core::validation::validate_new_question;
use survey_core::validation::validate_question_id;
use survey_core::validation::validate_question_patch;
use survey_core::validation::validate_question_query;
use survey_core::validation::validate_reorder;
use survey_core::validation::validate_response_query;
use survey_core::validation::validate_submission;

// ============================================================================
// SECTION: Helpers
// ============================================================================

const Q1: &str = "11111111-1111-4111-8111-111111111111";

fn body<T: serde::de::DeserializeOwned>(value: serde_json::Value) -> T {
    serde_json::from_value(value).unwrap()
}

fn messages(errors: &ValidationErrors) -> Vec<(String, String)> {
    errors.errors().iter().map(|error| (error.field.clone(), error.message.clone())).collect()
}

fn has(errors: &ValidationErrors, field: &str, message: &str) -> bool {
    messages(errors).iter().any(|(f, m)| f == field && m == message)
}

// ============================================================================
// SECTION: Question Queries
// ============================================================================

#[test]
fn list_query_defaults() {
    let query = validate_question_query(&QuestionListParams::default(), 20).unwrap();
    assert_eq!((query.page.page, query.page.limit), (1, 20));
    assert_eq!(query.sort_by, SortField::CreatedAt);
    assert_eq!(query.sort_order, SortOrder::Asc);
    assert_eq!(query.filter.search, None);
}

#[test]
fn list_query_collects_every_failure() {
    let params = QuestionListParams {
        page: Some("0".to_string()),
        limit: Some("101".to_string()),
        search: Some("ab".to_string()),
        status: Some("gone".to_string()),
        sort_by: Some("rank".to_string()),
        sort_order: Some("up".to_string()),
        ..QuestionListParams::default()
    };
    let errors = validate_question_query(&params, 20).unwrap_err();
    assert_eq!(errors.scope(), ValidationScope::Query);
    assert!(has(&errors, "page", "Page must be at least 1"));
    assert!(has(&errors, "limit", "Limit cannot exceed 100"));
    assert!(has(&errors, "search", "Search term must be at least 3 characters"));
    assert!(has(&errors, "status", "Status must be active, inactive, or archived"));
    assert!(has(&errors, "sortBy", "Sort by must be created_at, updated_at, title, or priority"));
    assert!(has(&errors, "sortOrder", "Sort order must be ASC or DESC"));
}

#[test]
fn sort_order_is_case_insensitive_and_search_is_trimmed() {
    let params = QuestionListParams {
        sort_order: Some("desc".to_string()),
        sort_by: Some("priority".to_string()),
        search: Some("  spel ".to_string()),
        page: Some("abc".to_string()),
        ..QuestionListParams::default()
    };
    let errors = validate_question_query(&params, 20).unwrap_err();
    assert_eq!(messages(&errors), vec![("page".to_string(), "Page must be a number".to_string())]);

    let params = QuestionListParams { page: None, ..params };
    let query = validate_question_query(&params, 20).unwrap();
    assert_eq!(query.sort_order, SortOrder::Desc);
    assert_eq!(query.sort_by, SortField::Priority);
    assert_eq!(query.filter.search.as_deref(), Some("spel"));
}

#[test]
fn blank_page_limit_and_search_are_rejected() {
    let params = QuestionListParams {
        page: Some(String::new()),
        limit: Some(" ".to_string()),
        search: Some("   ".to_string()),
        ..QuestionListParams::default()
    };
    let errors = validate_question_query(&params, 20).unwrap_err();
    assert!(has(&errors, "page", "Page must be a number"));
    assert!(has(&errors, "limit", "Limit must be a number"));
    assert!(has(&errors, "search", "Search term is not allowed to be empty"));
}

#[test]
fn search_charset_is_restricted() {
    let params = QuestionListParams {
        search: Some("a%b_c".to_string()),
        ..QuestionListParams::default()
    };
    let errors = validate_question_query(&params, 20).unwrap_err();
    assert!(has(&errors, "search", "Search term contains invalid characters"));
}

// ============================================================================
// SECTION: Question Bodies
// ============================================================================

#[test]
fn create_requires_title_and_applies_defaults() {
    let errors = validate_new_question(&body::<QuestionBody>(json!({ "title": "   " }))).unwrap_err();
    assert!(has(&errors, "title", "Title is required"));

    let created = validate_new_question(&body::<QuestionBody>(json!({
        "title": "  Satisfaction ",
        "description": "",
        "category": "Algemeen"
    })))
    .unwrap();
    assert_eq!(created.title, "Satisfaction");
    assert_eq!(created.description, None);
    assert_eq!(created.category.as_deref(), Some("Algemeen"));
    assert_eq!(created.priority, Priority::Medium);
    assert_eq!(created.status, QuestionStatus::Active);
    assert_eq!(created.mode, SurveyType::Regular);
}

#[test]
fn create_reports_bounds_charsets_and_enums_together() {
    let errors = validate_new_question(&body::<QuestionBody>(json!({
        "title": "x".repeat(256),
        "category": "bad!",
        "priority": "urgent",
        "mode": "kids",
        "created_by": "a<b"
    })))
    .unwrap_err();
    assert_eq!(errors.scope().title(), "Validation failed");
    assert!(has(&errors, "title", "Title must be less than 255 characters"));
    assert!(has(&errors, "category", "Category contains invalid characters"));
    assert!(has(&errors, "priority", "Priority must be low, medium, or high"));
    assert!(has(&errors, "mode", "Mode must be regular or ouder_kind"));
    assert!(has(&errors, "created_by", "Created by contains invalid characters"));
}

#[test]
fn update_rejects_uuid_and_empty_title() {
    let errors = validate_question_patch(&body::<QuestionBody>(json!({
        "uuid": Q1,
        "title": ""
    })))
    .unwrap_err();
    assert!(has(&errors, "uuid", "uuid is not allowed"));
    assert!(has(&errors, "title", "Title cannot be empty"));
}

#[test]
fn update_drops_created_by_and_clears_with_empty_strings() {
    let patch = validate_question_patch(&body::<QuestionBody>(json!({
        "created_by": "someone",
        "description": ""
    })))
    .unwrap();
    assert_eq!(patch.description, Some(None));
    assert_eq!(patch.title, None);

    let patch = validate_question_patch(&body::<QuestionBody>(json!({ "created_by": "x" }))).unwrap();
    assert!(patch.is_empty());
}

#[test]
fn path_uuid_is_checked() {
    let errors = validate_question_id("123").unwrap_err();
    assert_eq!(errors.scope().title(), "Parameter validation failed");
    assert!(has(&errors, "uuid", "Invalid UUID format"));
    assert!(validate_question_id(Q1).is_ok());
}

// ============================================================================
// SECTION: Submissions
// ============================================================================

#[test]
fn submission_requires_location_when_configured() {
    let raw = body::<SubmissionBody>(json!({
        "responses": [{ "question_uuid": Q1, "response_data": { "value": "groen" } }]
    }));
    let errors = validate_submission(&raw, true).unwrap_err();
    assert!(has(&errors, "location", "Locatie is verplicht"));

    let batch = validate_submission(&raw, false).unwrap();
    assert_eq!(batch.location, None);
    assert_eq!(batch.survey_type, SurveyType::Regular);
    assert_eq!(batch.responses.len(), 1);
}

#[test]
fn identifiers_are_lowercased() {
    let lower = "67e55044-10b1-426f-9247-bb680e5fe0c8";
    let upper = lower.to_uppercase();
    assert_eq!(validate_question_id(&upper).unwrap().as_str(), lower);

    let raw = body::<SubmissionBody>(json!({
        "responses": [{ "question_uuid": upper, "response_data": { "value": "groen" } }],
        "location": "Almelo"
    }));
    let batch = validate_submission(&raw, true).unwrap();
    assert_eq!(batch.responses[0].question_uuid.as_str(), lower);
}

#[test]
fn submission_reports_item_paths() {
    let raw = body::<SubmissionBody>(json!({
        "responses": [
            { "question_uuid": "nope", "response_data": { "value": "groen" } },
            { "question_uuid": Q1 },
            { "question_uuid": Q1, "response_data": { "value": 5 }, "user_identifier": "x#y" }
        ],
        "survey_type": "weekend",
        "location": "Utrecht"
    }));
    let errors = validate_submission(&raw, true).unwrap_err();
    assert!(has(&errors, "responses.0.question_uuid", "Invalid question UUID format"));
    assert!(has(&errors, "responses.1.response_data", "Response data is required"));
    assert!(has(&errors, "responses.2.response_data.value", "Response value must be a string"));
    assert!(has(&errors, "responses.2.user_identifier", "User identifier contains invalid characters"));
    assert!(has(&errors, "survey_type", "Survey type must be regular or ouder_kind"));
    assert!(has(
        &errors,
        "location",
        "Selecteer een geldige locatie (Zaanstad, Veenhuizen of Almelo)"
    ));
}

#[test]
fn submission_rejects_empty_batches() {
    let raw = body::<SubmissionBody>(json!({ "responses": [], "location": "Almelo" }));
    let errors = validate_submission(&raw, true).unwrap_err();
    assert!(has(&errors, "responses", "Responses must contain at least 1 item"));
}

// ============================================================================
// SECTION: Reporting and Listing Queries
// ============================================================================

#[test]
fn response_query_accepts_both_spellings() {
    let params = ResponseListParams {
        question_uuid: Some(Q1.to_string()),
        ..ResponseListParams::default()
    };
    let (_, question) = validate_response_query(&params, 20).unwrap();
    assert_eq!(question.unwrap().as_str(), Q1);

    let params = ResponseListParams {
        question_id: Some("bad".to_string()),
        ..ResponseListParams::default()
    };
    let errors = validate_response_query(&params, 20).unwrap_err();
    assert!(has(&errors, "question_id", "Invalid question UUID format"));
}

#[test]
fn compare_query_requires_location() {
    let errors = validate_compare_query(&CompareParams::default()).unwrap_err();
    assert!(has(&errors, "location", "Locatie is verplicht"));

    let params = CompareParams {
        location: Some("Veenhuizen".to_string()),
        survey_type: Some("ouder_kind".to_string()),
    };
    assert_eq!(
        validate_compare_query(&params).unwrap(),
        (Location::Veenhuizen, SurveyType::OuderKind)
    );
}

#[test]
fn reorder_requires_string_uuids() {
    assert_eq!(validate_reorder(&ReorderBody::default()), Some(Vec::new()));
    let ok = body::<ReorderBody>(json!({ "order": [{ "uuid": "a" }, { "uuid": "b" }] }));
    assert_eq!(validate_reorder(&ok), Some(vec!["a".to_string(), "b".to_string()]));
    let bad = body::<ReorderBody>(json!({ "order": [{ "uuid": 3 }] }));
    assert_eq!(validate_reorder(&bad), None);
}
