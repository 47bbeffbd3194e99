// crates/survey-server/tests/responses_api.rs
// ============================================================================
// Module: Response API Tests
// Description: Submission intake, listings, and reporting over HTTP.
// Purpose: Validate the submit-to-stats flow and admin listings.
// Dependencies: survey-server, tokio, serde_json
// ============================================================================

//! ## Overview
//! Submits batches through the public route and reads them back through the
//! admin views.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::float_cmp,
    reason = "Test-only assertions and helpers are permitted."
)]

mod common;

// ============================================================================
// SECTION: Imports
// ============================================================================

use axum::Router;
use axum::http::Method;
use axum::http::StatusCode;
use serde_json::Value;
use serde_json::json;

use crate::common::admin_get;
use crate::common::app;
use crate::common::app_with;
use crate::common::create_question;
use crate::common::send_json;
use crate::common::test_config;

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Submits one answer for `question` and returns the response body.
async fn submit(router: &Router, question: &str, token: &str, survey_type: &str, location: &str) -> Value {
    let body = json!({
        "responses": [{ "question_uuid": question, "response_data": { "value": token } }],
        "survey_type": survey_type,
        "location": location,
    });
    let response = send_json(router, Method::POST, "/api/responses", None, &body).await;
    assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
    response.body
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[tokio::test]
async fn submitted_answer_appears_in_stats() {
    let app = app();
    let question = create_question(&app.router, &json!({ "title": "Satisfaction" })).await;
    let saved = submit(&app.router, &question, "groen", "regular", "Zaanstad").await;
    assert_eq!(saved["message"], "Responses saved");
    assert!(saved["submission_id"].is_string());
    assert_eq!(app.store.submission_count().unwrap(), 1);
    assert_eq!(app.store.response_count().unwrap(), 1);

    let stats = admin_get(&app.router, "/api/responses/stats").await;
    assert_eq!(stats.status, StatusCode::OK);
    let records = stats.body["data"].as_array().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["question_uuid"], question.as_str());
    assert_eq!(records[0]["question_title"], "Satisfaction");
    assert_eq!(records[0]["survey_type"], "regular");
    assert_eq!(records[0]["total"], 1);
    assert_eq!(records[0]["counts"], json!({ "groen": 1 }));
    assert_eq!(records[0]["average"].as_f64().unwrap(), 5.0);
}

#[tokio::test]
async fn stats_filter_by_location() {
    let app = app();
    let question = create_question(&app.router, &json!({ "title": "Food" })).await;
    submit(&app.router, &question, "groen", "regular", "Zaanstad").await;
    submit(&app.router, &question, "rood", "regular", "Almelo").await;

    let almelo = admin_get(&app.router, "/api/responses/stats?location=Almelo").await;
    assert_eq!(almelo.body["data"][0]["total"], 1);
    assert_eq!(almelo.body["data"][0]["average"].as_f64().unwrap(), 1.0);

    let veenhuizen = admin_get(&app.router, "/api/responses/stats?location=Veenhuizen").await;
    assert_eq!(veenhuizen.body["data"], json!([]));

    let invalid = admin_get(&app.router, "/api/responses/stats?location=Amsterdam").await;
    assert_eq!(invalid.status, StatusCode::BAD_REQUEST);
    assert_eq!(invalid.body["error"], "Query validation failed");
}

#[tokio::test]
async fn comparison_aligns_location_with_global() {
    let app = app();
    let question = create_question(&app.router, &json!({ "title": "Food" })).await;
    submit(&app.router, &question, "groen", "regular", "Zaanstad").await;
    submit(&app.router, &question, "rood", "regular", "Almelo").await;
    submit(&app.router, &question, "geel", "ouder_kind", "Zaanstad").await;

    let report = admin_get(&app.router, "/api/responses/stats/compare?location=Zaanstad&survey_type=regular").await;
    assert_eq!(report.status, StatusCode::OK);
    let data = &report.body["data"];
    assert_eq!(data["location"], "Zaanstad");
    assert_eq!(data["survey_type"], "regular");
    let point = &data["series"][0];
    assert_eq!(point["question_title"], "Food");
    assert_eq!(point["global_average"].as_f64().unwrap(), 3.0);
    assert_eq!(point["location_average"].as_f64().unwrap(), 5.0);
    assert_eq!(point["global_total"], 2);
    assert_eq!(point["location_total"], 1);

    let veenhuizen =
        admin_get(&app.router, "/api/responses/stats/compare?location=Veenhuizen&survey_type=regular").await;
    assert_eq!(veenhuizen.body["data"]["series"][0]["location_average"], Value::Null);
    assert_eq!(veenhuizen.body["data"]["series"][0]["location_total"], 0);

    let missing = admin_get(&app.router, "/api/responses/stats/compare?survey_type=regular").await;
    assert_eq!(missing.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn invalid_batch_is_rejected_whole() {
    let app = app();
    let body = json!({
        "responses": [
            { "question_uuid": "7d0f4a4e-8c1b-4d6a-9a51-3f2b1c0e9d11", "response_data": { "value": "groen" } },
            { "question_uuid": "nope", "response_data": "groen" },
        ],
        "location": "Zaanstad",
    });
    let response = send_json(&app.router, Method::POST, "/api/responses", None, &body).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "Validation failed");
    let fields: Vec<&str> =
        response.body["details"].as_array().unwrap().iter().map(|d| d["field"].as_str().unwrap()).collect();
    assert!(fields.contains(&"responses.1.question_uuid"));
    assert!(fields.contains(&"responses.1.response_data"));
    assert_eq!(app.store.submission_count().unwrap(), 0);
    assert_eq!(app.store.response_count().unwrap(), 0);
}

#[tokio::test]
async fn location_requirement_follows_config() {
    let body = json!({
        "responses": [{ "question_uuid": "7d0f4a4e-8c1b-4d6a-9a51-3f2b1c0e9d11", "response_data": { "label": "Leuk" } }],
    });
    let strict = app();
    let response = send_json(&strict.router, Method::POST, "/api/responses", None, &body).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["details"][0], json!({ "field": "location", "message": "Locatie is verplicht" }));

    let mut config = test_config();
    config.collection.require_location = false;
    let relaxed = app_with(config, survey_core::InMemorySurveyStore::new());
    let response = send_json(&relaxed.router, Method::POST, "/api/responses", None, &body).await;
    assert_eq!(response.status, StatusCode::CREATED);
}

#[tokio::test]
async fn submissions_list_nests_enriched_responses() {
    let app = app();
    let question = create_question(&app.router, &json!({ "title": "Sleep" })).await;
    let body = json!({
        "responses": [
            { "question_uuid": question, "response_data": { "value": "geel" } },
            { "question_uuid": "7d0f4a4e-8c1b-4d6a-9a51-3f2b1c0e9d11", "response_data": { "value": "ja" } },
        ],
        "survey_type": "ouder_kind",
        "location": "Veenhuizen",
    });
    send_json(&app.router, Method::POST, "/api/responses", None, &body).await;
    submit(&app.router, &question, "groen", "regular", "Almelo").await;

    let all = admin_get(&app.router, "/api/submissions").await;
    assert_eq!(all.status, StatusCode::OK);
    assert_eq!(all.body["pagination"]["total"], 2);

    let ouder = admin_get(&app.router, "/api/submissions?survey_type=ouder_kind").await;
    assert_eq!(ouder.body["pagination"]["total"], 1);
    let submission = &ouder.body["data"][0];
    assert_eq!(submission["location"], "Veenhuizen");
    let responses = submission["responses"].as_array().unwrap();
    assert_eq!(responses.len(), 2);
    assert_eq!(responses[0]["question_title"], "Sleep");
    assert_eq!(responses[0]["survey_type"], "ouder_kind");
    assert_eq!(responses[1]["question_title"], Value::Null);
}

#[tokio::test]
async fn responses_listing_filters_by_question() {
    let app = app();
    let first = create_question(&app.router, &json!({ "title": "First" })).await;
    let second = create_question(&app.router, &json!({ "title": "Second" })).await;
    submit(&app.router, &first, "groen", "regular", "Almelo").await;
    submit(&app.router, &second, "rood", "regular", "Almelo").await;

    let all = admin_get(&app.router, "/api/responses").await;
    assert_eq!(all.body["pagination"]["total"], 2);

    let filtered = admin_get(&app.router, &format!("/api/responses?question_id={first}")).await;
    assert_eq!(filtered.body["pagination"]["total"], 1);
    assert_eq!(filtered.body["data"][0]["question_title"], "First");

    let legacy = admin_get(&app.router, &format!("/api/responses?question_uuid={second}")).await;
    assert_eq!(legacy.body["data"][0]["question_title"], "Second");

    let invalid = admin_get(&app.router, "/api/responses?question_id=abc").await;
    assert_eq!(invalid.status, StatusCode::BAD_REQUEST);
}
