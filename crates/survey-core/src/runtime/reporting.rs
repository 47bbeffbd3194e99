// crates/survey-core/src/runtime/reporting.rs
// ============================================================================
// Module: Survey Reporting Service
// Description: Response statistics and cross-location comparison.
// Purpose: Fetch fresh stat snapshots and run them through the aggregation engine.
// Dependencies: crate::{aggregation, core, interfaces}
// ============================================================================

//! ## Overview
//! Every call re-reads the stat projection from the store; nothing is cached
//! between requests. Titles are resolved in one batch per report.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;

use crate::aggregation::AggregateRecord;
use crate::aggregation::ComparisonReport;
use crate::aggregation::bucket_question_ids;
use crate::aggregation::bucket_rows;
use crate::aggregation::build_records;
use crate::aggregation::compare;
use crate::core::Location;
use crate::core::QuestionId;
use crate::core::SurveyType;
use crate::interfaces::SurveyStore;
use crate::interfaces::TitleMap;
use crate::runtime::error::ServiceError;

// ============================================================================
// SECTION: Service
// ============================================================================

/// Reporting service.
#[derive(Debug, Clone)]
pub struct ReportingService<S> {
    /// Backing store.
    store: S,
}

impl<S: SurveyStore> ReportingService<S> {
    /// Creates a service over `store`.
    #[must_use]
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Resolves titles for `ids`, skipping the lookup when empty.
    fn titles(&self, ids: &[QuestionId]) -> Result<TitleMap, ServiceError> {
        if ids.is_empty() {
            return Ok(TitleMap::new());
        }
        Ok(self.store.question_titles(ids)?)
    }

    /// Aggregates responses, optionally restricted to one location.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Store`] when a store query fails.
    pub fn stats(&self, location: Option<Location>) -> Result<Vec<AggregateRecord>, ServiceError> {
        let buckets = bucket_rows(&self.store.stat_rows(location)?);
        let titles = self.titles(&bucket_question_ids(&buckets))?;
        Ok(build_records(buckets, &titles))
    }

    /// Compares one location against the global population within a survey track.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Store`] when a store query fails.
    pub fn compare(
        &self,
        location: Location,
        survey_type: SurveyType,
    ) -> Result<ComparisonReport, ServiceError> {
        let global = bucket_rows(&self.store.stat_rows(None)?);
        let local = bucket_rows(&self.store.stat_rows(Some(location))?);
        let ids: Vec<QuestionId> = bucket_question_ids(&global)
            .into_iter()
            .chain(bucket_question_ids(&local))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let titles = self.titles(&ids)?;
        let global = build_records(global, &titles);
        let local = build_records(local, &titles);
        Ok(compare(&global, &local, survey_type, location))
    }
}
