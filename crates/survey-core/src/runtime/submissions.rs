// crates/survey-core/src/runtime/submissions.rs
// ============================================================================
// Module: Survey Submission Service
// Description: Batched answer intake and paginated submission/response listing.
// Purpose: Create one submission per survey pass and enrich listings with titles.
// Dependencies: tracing, crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! [`SubmissionService::submit`] hands the store one submission row plus all
//! of its response rows in a single atomic call. Listings resolve question
//! titles with one batch lookup per page rather than one per row.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use crate::core::EnrichedResponse;
use crate::core::NewSubmission;
use crate::core::Page;
use crate::core::PageRequest;
use crate::core::QuestionId;
use crate::core::ResponseId;
use crate::core::ResponseRecord;
use crate::core::Submission;
use crate::core::SubmissionId;
use crate::core::SubmissionWithResponses;
use crate::core::SurveyType;
use crate::core::Timestamp;
use crate::interfaces::SurveyStore;
use crate::interfaces::TitleMap;
use crate::runtime::error::ServiceError;

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Returns the distinct question identifiers referenced by `rows`.
fn distinct_questions<'a>(rows: impl Iterator<Item = &'a ResponseRecord>) -> Vec<QuestionId> {
    rows.map(|row| row.question_uuid.clone()).collect::<BTreeSet<_>>().into_iter().collect()
}

/// Attaches the resolved title to a response row.
fn enrich(record: ResponseRecord, titles: &TitleMap) -> EnrichedResponse {
    let question_title = titles.get(&record.question_uuid).cloned();
    EnrichedResponse {
        record,
        question_title,
    }
}

// ============================================================================
// SECTION: Service
// ============================================================================

/// Submission intake and listing service.
#[derive(Debug, Clone)]
pub struct SubmissionService<S> {
    /// Backing store.
    store: S,
}

impl<S: SurveyStore> SubmissionService<S> {
    /// Creates a service over `store`.
    #[must_use]
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Stores one submission and its answers atomically.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError`] when the store rejects the batch; nothing is
    /// persisted in that case.
    pub fn submit(&self, batch: NewSubmission) -> Result<SubmissionId, ServiceError> {
        let created_at = Timestamp::now();
        let submission = Submission {
            uuid: SubmissionId::generate(),
            survey_type: batch.survey_type,
            location: batch.location,
            created_at,
        };
        let responses: Vec<ResponseRecord> = batch
            .responses
            .into_iter()
            .map(|answer| ResponseRecord {
                uuid: ResponseId::generate(),
                submission_uuid: submission.uuid.clone(),
                question_uuid: answer.question_uuid,
                response_data: answer.response_data,
                user_identifier: answer.user_identifier,
                survey_type: submission.survey_type,
                created_at,
            })
            .collect();
        self.store.insert_submission(&submission, &responses)?;
        tracing::info!(
            submission = %submission.uuid,
            survey_type = submission.survey_type.as_str(),
            location = submission.location.map(|location| location.as_str()),
            responses = responses.len(),
            "submission stored"
        );
        Ok(submission.uuid)
    }

    /// Lists submissions newest first, each with its enriched responses.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Store`] when a store query fails.
    pub fn list_submissions(
        &self,
        page: PageRequest,
        survey_type: Option<SurveyType>,
    ) -> Result<Page<SubmissionWithResponses>, ServiceError> {
        let submissions = self.store.list_submissions(page, survey_type)?;
        let ids: Vec<SubmissionId> =
            submissions.data.iter().map(|submission| submission.uuid.clone()).collect();
        let rows = if ids.is_empty() { Vec::new() } else { self.store.responses_for_submissions(&ids)? };
        let questions = distinct_questions(rows.iter());
        let titles = if questions.is_empty() { TitleMap::new() } else { self.store.question_titles(&questions)? };

        let mut grouped: BTreeMap<SubmissionId, Vec<EnrichedResponse>> = BTreeMap::new();
        for row in rows {
            grouped.entry(row.submission_uuid.clone()).or_default().push(enrich(row, &titles));
        }
        Ok(submissions.map(|submission| {
            let responses = grouped.remove(&submission.uuid).unwrap_or_default();
            SubmissionWithResponses {
                submission,
                responses,
            }
        }))
    }

    /// Lists response rows by identifier descending.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Store`] when a store query fails.
    pub fn list_responses(
        &self,
        page: PageRequest,
        question: Option<&QuestionId>,
    ) -> Result<Page<EnrichedResponse>, ServiceError> {
        let rows = self.store.list_responses(page, question)?;
        let questions = distinct_questions(rows.data.iter());
        let titles = if questions.is_empty() { TitleMap::new() } else { self.store.question_titles(&questions)? };
        Ok(rows.map(|row| enrich(row, &titles)))
    }
}
