// crates/survey-core/tests/catalog.rs
// ============================================================================
// Module: Question Catalog Tests
// Description: Catalog CRUD semantics and mode column adaptation.
// ============================================================================
//! ## Overview
//! Runs the catalog against the in-memory store with the `mode` column
//! present and absent.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Test-only panic-based assertions are permitted."
)]

use survey_core::InMemorySurveyStore;
use survey_core::NewQuestion;
use survey_core::PageRequest;
use survey_core::Priority;
use survey_core::QuestionCatalog;
use survey_core::QuestionFilter;
use survey_core::QuestionId;
use survey_core::QuestionPatch;
use survey_core::QuestionQuery;
use survey_core::QuestionStatus;
use survey_core::SchemaSupport;
use survey_core::ServiceError;
use survey_core::SortField;
use survey_core::SortOrder;
use survey_core::SurveyType;

// ============================================================================
// SECTION: Helpers
// ============================================================================

fn catalog(mode_column: bool) -> QuestionCatalog<InMemorySurveyStore> {
    QuestionCatalog::new(InMemorySurveyStore::with_mode_column(mode_column), SchemaSupport::fixed(mode_column))
}

fn new_question(title: &str, priority: Priority, mode: SurveyType) -> NewQuestion {
    NewQuestion {
        title: title.to_string(),
        description: None,
        category: None,
        priority,
        status: QuestionStatus::Active,
        mode,
        created_by: None,
    }
}

fn query_with(filter: QuestionFilter) -> QuestionQuery {
    QuestionQuery {
        filter,
        ..QuestionQuery::default()
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[test]
fn create_records_actor_and_get_round_trips() {
    let catalog = catalog(true);
    let created = catalog
        .create(new_question("Satisfaction", Priority::High, SurveyType::OuderKind), Some("admin@example.org"))
        .unwrap();
    assert_eq!(created.created_by.as_deref(), Some("admin@example.org"));
    assert_eq!(created.mode, Some(SurveyType::OuderKind));
    let loaded = catalog.get(&created.uuid).unwrap();
    assert_eq!(loaded, created);
}

#[test]
fn missing_question_is_not_found() {
    let catalog = catalog(true);
    let missing = QuestionId::generate();
    assert!(matches!(catalog.get(&missing), Err(ServiceError::NotFound("Question"))));
    assert!(matches!(catalog.delete(&missing), Err(ServiceError::NotFound("Question"))));
    let patch = QuestionPatch {
        title: Some("New".to_string()),
        ..QuestionPatch::default()
    };
    assert!(matches!(catalog.update(&missing, patch), Err(ServiceError::NotFound("Question"))));
}

#[test]
fn empty_update_is_rejected() {
    let catalog = catalog(true);
    let created = catalog.create(new_question("Q", Priority::Low, SurveyType::Regular), None).unwrap();
    assert!(matches!(catalog.update(&created.uuid, QuestionPatch::default()), Err(ServiceError::EmptyUpdate)));
}

#[test]
fn update_applies_subset_and_bumps_updated_at() {
    let catalog = catalog(true);
    let created = catalog.create(new_question("Q", Priority::Low, SurveyType::Regular), None).unwrap();
    let updated = catalog
        .update(
            &created.uuid,
            QuestionPatch {
                status: Some(QuestionStatus::Archived),
                description: Some(Some("Uitleg".to_string())),
                ..QuestionPatch::default()
            },
        )
        .unwrap();
    assert_eq!(updated.status, QuestionStatus::Archived);
    assert_eq!(updated.description.as_deref(), Some("Uitleg"));
    assert_eq!(updated.title, "Q");
    assert!(updated.updated_at >= created.updated_at);
}

#[test]
fn priority_sort_uses_rank() {
    let catalog = catalog(true);
    for (title, priority) in [("a", Priority::High), ("b", Priority::Low), ("c", Priority::Medium)] {
        catalog.create(new_question(title, priority, SurveyType::Regular), None).unwrap();
    }
    let query = QuestionQuery {
        sort_by: SortField::Priority,
        sort_order: SortOrder::Desc,
        ..QuestionQuery::default()
    };
    let page = catalog.list(query).unwrap();
    let titles: Vec<&str> = page.data.iter().map(|question| question.title.as_str()).collect();
    assert_eq!(titles, vec!["a", "c", "b"]);
}

#[test]
fn search_matches_title_or_description_case_insensitively() {
    let catalog = catalog(true);
    catalog.create(new_question("Eten op locatie", Priority::Medium, SurveyType::Regular), None).unwrap();
    let mut described = new_question("Sport", Priority::Medium, SurveyType::Regular);
    described.description = Some("Hoe was het ETEN?".to_string());
    catalog.create(described, None).unwrap();
    catalog.create(new_question("Muziek", Priority::Medium, SurveyType::Regular), None).unwrap();

    let page = catalog
        .list(query_with(QuestionFilter {
            search: Some("eten".to_string()),
            ..QuestionFilter::default()
        }))
        .unwrap();
    assert_eq!(page.pagination.total, 2);
}

#[test]
fn pagination_windows_the_result() {
    let catalog = catalog(true);
    for index in 0..5 {
        catalog.create(new_question(&format!("Q{index}"), Priority::Medium, SurveyType::Regular), None).unwrap();
    }
    let query = QuestionQuery {
        page: PageRequest::new(2, 2),
        sort_by: SortField::Title,
        ..QuestionQuery::default()
    };
    let page = catalog.list(query).unwrap();
    let titles: Vec<&str> = page.data.iter().map(|question| question.title.as_str()).collect();
    assert_eq!(titles, vec!["Q2", "Q3"]);
    assert_eq!(page.pagination.total_pages, 3);
    assert!(page.pagination.has_next);
    assert!(page.pagination.has_prev);
}

#[test]
fn mode_filter_against_legacy_schema_is_empty_not_error() {
    let catalog = catalog(false);
    catalog.create(new_question("Legacy", Priority::Medium, SurveyType::OuderKind), None).unwrap();

    let page = catalog
        .list(query_with(QuestionFilter {
            mode: Some(SurveyType::OuderKind),
            ..QuestionFilter::default()
        }))
        .unwrap();
    assert!(page.data.is_empty());
    assert_eq!(page.pagination.total, 0);

    let page = catalog
        .list(query_with(QuestionFilter {
            mode: Some(SurveyType::Regular),
            ..QuestionFilter::default()
        }))
        .unwrap();
    assert_eq!(page.pagination.total, 1);
    assert_eq!(page.data[0].mode, None);
}

#[test]
fn mode_only_update_against_legacy_schema_is_empty() {
    let catalog = catalog(false);
    let created = catalog.create(new_question("Legacy", Priority::Medium, SurveyType::Regular), None).unwrap();
    assert_eq!(created.mode, None);
    let patch = QuestionPatch {
        mode: Some(SurveyType::OuderKind),
        ..QuestionPatch::default()
    };
    assert!(matches!(catalog.update(&created.uuid, patch), Err(ServiceError::EmptyUpdate)));
}

#[test]
fn reorder_acknowledges_entries() {
    let catalog = catalog(true);
    assert_eq!(catalog.reorder(&["a".to_string(), "b".to_string()]), 2);
}
