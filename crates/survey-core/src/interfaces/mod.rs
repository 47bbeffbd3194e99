// crates/survey-core/src/interfaces/mod.rs
// ============================================================================
// Module: Survey Interfaces
// Description: Backend-agnostic persistence interface for survey data.
// Purpose: Define the store contract consumed by the catalog, intake, and reporting services.
// Dependencies: thiserror, crate::core
// ============================================================================

//! ## Overview
//! The survey services never talk to a database directly. They call a
//! [`SurveyStore`], which owns all persisted rows. Implementations must make
//! [`SurveyStore::insert_submission`] atomic: either the submission and every
//! response row become visible, or none do.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;

use crate::core::Location;
use crate::core::Page;
use crate::core::PageRequest;
use crate::core::Question;
use crate::core::QuestionId;
use crate::core::QuestionPatch;
use crate::core::QuestionQuery;
use crate::core::ResponseRecord;
use crate::core::StatRow;
use crate::core::Submission;
use crate::core::SubmissionId;
use crate::core::SurveyType;
use crate::core::Timestamp;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Question titles keyed by question identifier.
pub type TitleMap = HashMap<QuestionId, String>;

/// Whether the optional `mode` column participates in a question query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeColumn {
    /// Read, write, and filter on `mode`.
    Present,
    /// Ignore `mode` entirely.
    Absent,
}

impl ModeColumn {
    /// Maps a presence flag onto the column mode.
    #[must_use]
    pub const fn from_present(present: bool) -> Self {
        if present { Self::Present } else { Self::Absent }
    }

    /// Returns true when the column is present.
    #[must_use]
    pub const fn is_present(self) -> bool {
        matches!(self, Self::Present)
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Survey store errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Target row does not exist.
    #[error("survey store row not found: {0}")]
    NotFound(String),
    /// Unique or key constraint rejected the write.
    #[error("survey store conflict: {0}")]
    Conflict(String),
    /// Caller supplied data the store cannot accept.
    #[error("survey store invalid data: {0}")]
    Invalid(String),
    /// Store cannot be reached.
    #[error("survey store unavailable: {0}")]
    Unavailable(String),
    /// Persisted data fails to decode.
    #[error("survey store corruption: {0}")]
    Corrupt(String),
    /// Store reported an error.
    #[error("survey store error: {0}")]
    Store(String),
}

// ============================================================================
// SECTION: Store Interface
// ============================================================================

/// Persistence interface for questions, submissions, and responses.
pub trait SurveyStore {
    /// Performs a minimal read to confirm the store is reachable.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the store cannot be reached.
    fn ping(&self) -> Result<(), StoreError>;

    /// Reports whether the `questions.mode` column exists.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the probe itself fails for reasons other
    /// than a missing column.
    fn has_mode_column(&self) -> Result<bool, StoreError>;

    /// Lists questions matching `query`, returning one page and the total count.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the query fails.
    fn list_questions(
        &self,
        query: &QuestionQuery,
        mode: ModeColumn,
    ) -> Result<Page<Question>, StoreError>;

    /// Loads a question by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the read fails.
    fn get_question(
        &self,
        id: &QuestionId,
        mode: ModeColumn,
    ) -> Result<Option<Question>, StoreError>;

    /// Inserts a question.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Conflict`] when the identifier already exists.
    fn insert_question(&self, question: &Question, mode: ModeColumn) -> Result<(), StoreError>;

    /// Applies a partial update and returns the updated record, or `None` when missing.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the write fails.
    fn update_question(
        &self,
        id: &QuestionId,
        patch: &QuestionPatch,
        updated_at: Timestamp,
        mode: ModeColumn,
    ) -> Result<Option<Question>, StoreError>;

    /// Deletes a question; returns false when it did not exist.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the write fails.
    fn delete_question(&self, id: &QuestionId) -> Result<bool, StoreError>;

    /// Resolves titles for a set of question identifiers in one lookup.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the read fails.
    fn question_titles(&self, ids: &[QuestionId]) -> Result<TitleMap, StoreError>;

    /// Atomically inserts one submission and all of its response rows.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when any write fails; no rows are left behind.
    fn insert_submission(
        &self,
        submission: &Submission,
        responses: &[ResponseRecord],
    ) -> Result<(), StoreError>;

    /// Lists submissions newest first.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the query fails.
    fn list_submissions(
        &self,
        page: PageRequest,
        survey_type: Option<SurveyType>,
    ) -> Result<Page<Submission>, StoreError>;

    /// Loads every response belonging to the given submissions.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the query fails.
    fn responses_for_submissions(
        &self,
        ids: &[SubmissionId],
    ) -> Result<Vec<ResponseRecord>, StoreError>;

    /// Lists response rows by identifier descending.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the query fails.
    fn list_responses(
        &self,
        page: PageRequest,
        question: Option<&QuestionId>,
    ) -> Result<Page<ResponseRecord>, StoreError>;

    /// Returns the aggregation projection of every response, optionally
    /// restricted to submissions taken at `location`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the query fails.
    fn stat_rows(&self, location: Option<Location>) -> Result<Vec<StatRow>, StoreError>;
}

impl<T> SurveyStore for Arc<T>
where
    T: SurveyStore + ?Sized,
{
    fn ping(&self) -> Result<(), StoreError> {
        (**self).ping()
    }

    fn has_mode_column(&self) -> Result<bool, StoreError> {
        (**self).has_mode_column()
    }

    fn list_questions(
        &self,
        query: &QuestionQuery,
        mode: ModeColumn,
    ) -> Result<Page<Question>, StoreError> {
        (**self).list_questions(query, mode)
    }

    fn get_question(
        &self,
        id: &QuestionId,
        mode: ModeColumn,
    ) -> Result<Option<Question>, StoreError> {
        (**self).get_question(id, mode)
    }

    fn insert_question(&self, question: &Question, mode: ModeColumn) -> Result<(), StoreError> {
        (**self).insert_question(question, mode)
    }

    fn update_question(
        &self,
        id: &QuestionId,
        patch: &QuestionPatch,
        updated_at: Timestamp,
        mode: ModeColumn,
    ) -> Result<Option<Question>, StoreError> {
        (**self).update_question(id, patch, updated_at, mode)
    }

    fn delete_question(&self, id: &QuestionId) -> Result<bool, StoreError> {
        (**self).delete_question(id)
    }

    fn question_titles(&self, ids: &[QuestionId]) -> Result<TitleMap, StoreError> {
        (**self).question_titles(ids)
    }

    fn insert_submission(
        &self,
        submission: &Submission,
        responses: &[ResponseRecord],
    ) -> Result<(), StoreError> {
        (**self).insert_submission(submission, responses)
    }

    fn list_submissions(
        &self,
        page: PageRequest,
        survey_type: Option<SurveyType>,
    ) -> Result<Page<Submission>, StoreError> {
        (**self).list_submissions(page, survey_type)
    }

    fn responses_for_submissions(
        &self,
        ids: &[SubmissionId],
    ) -> Result<Vec<ResponseRecord>, StoreError> {
        (**self).responses_for_submissions(ids)
    }

    fn list_responses(
        &self,
        page: PageRequest,
        question: Option<&QuestionId>,
    ) -> Result<Page<ResponseRecord>, StoreError> {
        (**self).list_responses(page, question)
    }

    fn stat_rows(&self, location: Option<Location>) -> Result<Vec<StatRow>, StoreError> {
        (**self).stat_rows(location)
    }
}
