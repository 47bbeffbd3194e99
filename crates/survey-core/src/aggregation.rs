// crates/survey-core/src/aggregation.rs
// ============================================================================
// Module: Survey Aggregation Engine
// Description: Bucketing, frequency counts, weighted averages, and comparisons.
// Purpose: Turn raw response rows into report records without holding state.
// Dependencies: serde, crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! Aggregation is a pure transformation over a snapshot of [`StatRow`]s.
//! Rows are bucketed by `(question, survey type)`; each bucket counts its
//! answer tokens and derives a weighted average on the rating scale.
//!
//! An average over zero weighted answers is [`WeightedAverage::NoData`] and
//! serializes as `null`. It is never coerced to `0`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use serde::Serialize;
use serde::Serializer;

use crate::core::Location;
use crate::core::QuestionId;
use crate::core::Rating;
use crate::core::StatRow;
use crate::core::SurveyType;
use crate::interfaces::TitleMap;

// ============================================================================
// SECTION: Weighted Average
// ============================================================================

/// Weighted average on the 1-5 rating scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WeightedAverage {
    /// No weighted answers were counted.
    NoData,
    /// Average rounded to two decimals.
    Score(f64),
}

impl WeightedAverage {
    /// Computes the weighted average of a frequency map.
    ///
    /// Tokens without a weight are excluded from numerator and denominator.
    #[must_use]
    pub fn from_counts(counts: &BTreeMap<String, u64>) -> Self {
        let (weighted, qualifying) = counts
            .iter()
            .filter_map(|(token, count)| Rating::weight_of(token).map(|weight| (weight, *count)))
            .fold((0_u64, 0_u64), |(sum, total), (weight, count)| {
                (sum.saturating_add(u64::from(weight).saturating_mul(count)), total.saturating_add(count))
            });
        if qualifying == 0 {
            return Self::NoData;
        }
        #[allow(clippy::cast_precision_loss, reason = "Counts stay far below 2^52.")]
        let average = weighted as f64 / qualifying as f64;
        Self::Score(round_two(average))
    }

    /// Returns the score, or `None` for no data.
    #[must_use]
    pub const fn score(self) -> Option<f64> {
        match self {
            Self::NoData => None,
            Self::Score(value) => Some(value),
        }
    }
}

impl Serialize for WeightedAverage {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::NoData => serializer.serialize_none(),
            Self::Score(value) => serializer.serialize_some(value),
        }
    }
}

/// Rounds to two decimal places.
fn round_two(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// ============================================================================
// SECTION: Buckets
// ============================================================================

/// Per-bucket accumulator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bucket {
    /// Counted rows.
    pub total: u64,
    /// Rows per answer token.
    pub counts: BTreeMap<String, u64>,
}

/// Bucket key: question identifier and survey track.
pub type BucketKey = (QuestionId, SurveyType);

/// Partitions rows into buckets, skipping rows without a question or token.
#[must_use]
pub fn bucket_rows(rows: &[StatRow]) -> BTreeMap<BucketKey, Bucket> {
    let mut buckets: BTreeMap<BucketKey, Bucket> = BTreeMap::new();
    for row in rows {
        if row.question_uuid.as_str().is_empty() {
            continue;
        }
        let Some(token) = row.response_data.token() else {
            continue;
        };
        let bucket = buckets.entry((row.question_uuid.clone(), row.survey_type)).or_default();
        bucket.total += 1;
        *bucket.counts.entry(token.to_string()).or_default() += 1;
    }
    buckets
}

/// Returns the distinct question identifiers referenced by `buckets`.
#[must_use]
pub fn bucket_question_ids(buckets: &BTreeMap<BucketKey, Bucket>) -> Vec<QuestionId> {
    buckets.keys().map(|(question, _)| question.clone()).collect::<BTreeSet<_>>().into_iter().collect()
}

// ============================================================================
// SECTION: Records
// ============================================================================

/// One report record per bucket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateRecord {
    /// Question identifier.
    pub question_uuid: QuestionId,
    /// Current title, or the identifier when the question is unknown.
    pub question_title: String,
    /// Survey track.
    pub survey_type: SurveyType,
    /// Counted rows.
    pub total: u64,
    /// Rows per answer token.
    pub counts: BTreeMap<String, u64>,
    /// Weighted average.
    pub average: WeightedAverage,
}

/// Emits records ordered by question identifier, then survey track.
#[must_use]
pub fn build_records(buckets: BTreeMap<BucketKey, Bucket>, titles: &TitleMap) -> Vec<AggregateRecord> {
    buckets
        .into_iter()
        .map(|((question_uuid, survey_type), bucket)| {
            let question_title = titles
                .get(&question_uuid)
                .cloned()
                .unwrap_or_else(|| question_uuid.as_str().to_string());
            AggregateRecord {
                average: WeightedAverage::from_counts(&bucket.counts),
                question_uuid,
                question_title,
                survey_type,
                total: bucket.total,
                counts: bucket.counts,
            }
        })
        .collect()
}

/// Buckets `rows` and emits report records.
#[must_use]
pub fn aggregate(rows: &[StatRow], titles: &TitleMap) -> Vec<AggregateRecord> {
    build_records(bucket_rows(rows), titles)
}

// ============================================================================
// SECTION: Comparison
// ============================================================================

/// One aligned point of the comparison series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonPoint {
    /// Question identifier.
    pub question_uuid: QuestionId,
    /// Display title.
    pub question_title: String,
    /// Average over every location.
    pub global_average: WeightedAverage,
    /// Average for the selected location.
    pub location_average: WeightedAverage,
    /// Counted rows over every location.
    pub global_total: u64,
    /// Counted rows for the selected location.
    pub location_total: u64,
}

/// Global versus one-location comparison within a survey track.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonReport {
    /// Survey track compared.
    pub survey_type: SurveyType,
    /// Selected location.
    pub location: Location,
    /// Aligned series ordered by question identifier.
    pub series: Vec<ComparisonPoint>,
}

/// Joins global and location records on question identifier within `survey_type`.
///
/// A question missing from one side keeps that side as no data with a zero total.
#[must_use]
pub fn compare(
    global: &[AggregateRecord],
    local: &[AggregateRecord],
    survey_type: SurveyType,
    location: Location,
) -> ComparisonReport {
    let in_track = |records: &[AggregateRecord]| -> BTreeMap<QuestionId, AggregateRecord> {
        records
            .iter()
            .filter(|record| record.survey_type == survey_type)
            .map(|record| (record.question_uuid.clone(), record.clone()))
            .collect()
    };
    let global = in_track(global);
    let local = in_track(local);
    let questions: BTreeSet<&QuestionId> = global.keys().chain(local.keys()).collect();

    let series = questions
        .into_iter()
        .map(|question| {
            let global_record = global.get(question);
            let local_record = local.get(question);
            let question_title = global_record
                .or(local_record)
                .map_or_else(|| question.as_str().to_string(), |record| record.question_title.clone());
            ComparisonPoint {
                question_uuid: question.clone(),
                question_title,
                global_average: global_record.map_or(WeightedAverage::NoData, |record| record.average),
                location_average: local_record.map_or(WeightedAverage::NoData, |record| record.average),
                global_total: global_record.map_or(0, |record| record.total),
                location_total: local_record.map_or(0, |record| record.total),
            }
        })
        .collect();

    ComparisonReport {
        survey_type,
        location,
        series,
    }
}
