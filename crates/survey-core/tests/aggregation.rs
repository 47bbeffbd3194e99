// crates/survey-core/tests/aggregation.rs
// ============================================================================
// Module: Aggregation Engine Tests
// Description: Bucketing, weighted averages, and comparison alignment.
// ============================================================================
//! ## Overview
//! Exercises the pure aggregation functions over hand-built stat rows.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::float_cmp,
    reason = "Test-only panic-based assertions are permitted."
)]

use std::collections::BTreeMap;

use proptest::prelude::*;
use survey_core::Location;
use survey_core::QuestionId;
use survey_core::ResponsePayload;
use survey_core::StatRow;
use survey_core::SurveyType;
use survey_core::TitleMap;
use survey_core::WeightedAverage;
use survey_core::aggregation::aggregate;
use survey_core::aggregation::compare;

// ============================================================================
// SECTION: Helpers
// ============================================================================

const Q1: &str = "11111111-1111-4111-8111-111111111111";
const Q2: &str = "22222222-2222-4222-8222-222222222222";

fn row(question: &str, survey_type: SurveyType, value: Option<&str>, label: Option<&str>) -> StatRow {
    StatRow {
        question_uuid: QuestionId::new(question),
        survey_type,
        response_data: ResponsePayload {
            value: value.map(str::to_string),
            label: label.map(str::to_string),
        },
    }
}

fn counts(pairs: &[(&str, u64)]) -> BTreeMap<String, u64> {
    pairs.iter().map(|(token, count)| ((*token).to_string(), *count)).collect()
}

// ============================================================================
// SECTION: Weighted Average
// ============================================================================

#[test]
fn weighted_average_of_extremes_is_three() {
    let average = WeightedAverage::from_counts(&counts(&[("rood", 2), ("groen", 2)]));
    assert_eq!(average, WeightedAverage::Score(3.0));
}

#[test]
fn weighted_average_rounds_to_two_decimals() {
    let average = WeightedAverage::from_counts(&counts(&[("rood", 1), ("beige", 1), ("groen", 1)]));
    assert_eq!(average, WeightedAverage::Score(2.67));
}

#[test]
fn weighted_average_serializes_as_number_or_null() {
    assert_eq!(serde_json::to_value(WeightedAverage::Score(3.0)).unwrap(), serde_json::json!(3.0));
    assert_eq!(serde_json::to_value(WeightedAverage::NoData).unwrap(), serde_json::Value::Null);
}

#[test]
fn unweighted_tokens_yield_no_data_not_zero() {
    let average = WeightedAverage::from_counts(&counts(&[("ja", 3), ("nee", 1)]));
    assert_eq!(average, WeightedAverage::NoData);
    assert_eq!(serde_json::to_value(average).unwrap(), serde_json::Value::Null);
}

#[test]
fn unweighted_tokens_are_excluded_from_denominator() {
    let average = WeightedAverage::from_counts(&counts(&[("groen", 1), ("ja", 5)]));
    assert_eq!(average, WeightedAverage::Score(5.0));
}

// ============================================================================
// SECTION: Bucketing
// ============================================================================

#[test]
fn rows_without_token_or_question_are_skipped() {
    let rows = vec![
        row(Q1, SurveyType::Regular, Some("groen"), None),
        row(Q1, SurveyType::Regular, None, None),
        row(Q1, SurveyType::Regular, Some(""), Some("")),
        row("", SurveyType::Regular, Some("rood"), None),
    ];
    let records = aggregate(&rows, &TitleMap::new());
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].total, 1);
    assert_eq!(records[0].counts, counts(&[("groen", 1)]));
}

#[test]
fn label_is_used_when_value_is_empty() {
    let rows = vec![row(Q1, SurveyType::Regular, Some(""), Some("geel"))];
    let records = aggregate(&rows, &TitleMap::new());
    assert_eq!(records[0].counts, counts(&[("geel", 1)]));
    assert_eq!(records[0].average, WeightedAverage::Score(3.0));
}

#[test]
fn buckets_split_by_survey_type_and_fall_back_to_identifier_title() {
    let rows = vec![
        row(Q2, SurveyType::OuderKind, Some("rood"), None),
        row(Q1, SurveyType::OuderKind, Some("groen"), None),
        row(Q1, SurveyType::Regular, Some("groen"), None),
    ];
    let titles: TitleMap = [(QuestionId::new(Q1), "Satisfaction".to_string())].into_iter().collect();
    let records = aggregate(&rows, &titles);
    let keys: Vec<(&str, SurveyType)> =
        records.iter().map(|record| (record.question_uuid.as_str(), record.survey_type)).collect();
    assert_eq!(
        keys,
        vec![(Q1, SurveyType::Regular), (Q1, SurveyType::OuderKind), (Q2, SurveyType::OuderKind)]
    );
    assert_eq!(records[0].question_title, "Satisfaction");
    assert_eq!(records[2].question_title, Q2);
}

// ============================================================================
// SECTION: Comparison
// ============================================================================

#[test]
fn comparison_keeps_gaps_as_null() {
    let global = aggregate(
        &[
            row(Q1, SurveyType::Regular, Some("groen"), None),
            row(Q1, SurveyType::Regular, Some("rood"), None),
            row(Q2, SurveyType::Regular, Some("geel"), None),
            row(Q2, SurveyType::OuderKind, Some("geel"), None),
        ],
        &TitleMap::new(),
    );
    let local = aggregate(&[row(Q1, SurveyType::Regular, Some("groen"), None)], &TitleMap::new());
    let report = compare(&global, &local, SurveyType::Regular, Location::Almelo);

    assert_eq!(report.series.len(), 2);
    let first = &report.series[0];
    assert_eq!(first.global_average, WeightedAverage::Score(3.0));
    assert_eq!(first.location_average, WeightedAverage::Score(5.0));
    assert_eq!((first.global_total, first.location_total), (2, 1));
    let second = &report.series[1];
    assert_eq!(second.location_average, WeightedAverage::NoData);
    assert_eq!(second.location_total, 0);

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["location"], "Almelo");
    assert_eq!(json["survey_type"], "regular");
    assert!(json["series"][1]["location_average"].is_null());
}

// ============================================================================
// SECTION: Properties
// ============================================================================

fn token_strategy() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        Just(None),
        Just(Some(String::new())),
        Just(Some("rood".to_string())),
        Just(Some("groen".to_string())),
        Just(Some("ja".to_string())),
    ]
}

proptest! {
    #[test]
    fn bucket_totals_match_countable_rows(
        specs in proptest::collection::vec((0_usize..3, any::<bool>(), token_strategy(), token_strategy()), 0..64)
    ) {
        let questions = ["", Q1, Q2];
        let rows: Vec<StatRow> = specs
            .iter()
            .map(|(question, ouder, value, label)| StatRow {
                question_uuid: QuestionId::new(questions[*question]),
                survey_type: if *ouder { SurveyType::OuderKind } else { SurveyType::Regular },
                response_data: ResponsePayload { value: value.clone(), label: label.clone() },
            })
            .collect();
        let expected = rows
            .iter()
            .filter(|row| !row.question_uuid.as_str().is_empty() && row.response_data.token().is_some())
            .count() as u64;
        let records = aggregate(&rows, &TitleMap::new());
        let total: u64 = records.iter().map(|record| record.total).sum();
        prop_assert_eq!(total, expected);
        for record in &records {
            prop_assert_eq!(record.counts.values().sum::<u64>(), record.total);
            if let WeightedAverage::Score(score) = record.average {
                prop_assert!((1.0..=5.0).contains(&score));
            }
        }
    }
}
