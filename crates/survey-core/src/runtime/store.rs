// crates/survey-core/src/runtime/store.rs
// ============================================================================
// Module: Survey In-Memory Store
// Description: Simple in-memory survey store for tests and local demos.
// Purpose: Provide a deterministic store implementation without external deps.
// Dependencies: crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! This module provides an in-memory implementation of [`SurveyStore`]. It
//! mirrors the SQLite backend's ordering rules so service tests behave the
//! same against either store. It is not intended for production use.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;

use crate::core::Location;
use crate::core::Page;
use crate::core::PageRequest;
use crate::core::Question;
use crate::core::QuestionFilter;
use crate::core::QuestionId;
use crate::core::QuestionPatch;
use crate::core::QuestionQuery;
use crate::core::ResponseRecord;
use crate::core::SortField;
use crate::core::SortOrder;
use crate::core::StatRow;
use crate::core::Submission;
use crate::core::SubmissionId;
use crate::core::SurveyType;
use crate::core::Timestamp;
use crate::interfaces::ModeColumn;
use crate::interfaces::StoreError;
use crate::interfaces::SurveyStore;
use crate::interfaces::TitleMap;

// ============================================================================
// SECTION: In-Memory Store
// ============================================================================

/// Rows held by the in-memory store.
#[derive(Debug, Default)]
struct MemoryState {
    /// Questions keyed by identifier.
    questions: BTreeMap<String, Question>,
    /// Submissions in insertion order.
    submissions: Vec<Submission>,
    /// Responses in insertion order.
    responses: Vec<ResponseRecord>,
}

/// In-memory survey store for tests and examples.
#[derive(Debug, Clone)]
pub struct InMemorySurveyStore {
    /// Rows protected by a mutex.
    state: Arc<Mutex<MemoryState>>,
    /// Whether the simulated schema has `questions.mode`.
    mode_column: bool,
}

impl Default for InMemorySurveyStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemorySurveyStore {
    /// Creates an empty store with the `mode` column present.
    #[must_use]
    pub fn new() -> Self {
        Self::with_mode_column(true)
    }

    /// Creates an empty store simulating presence or absence of `questions.mode`.
    #[must_use]
    pub fn with_mode_column(mode_column: bool) -> Self {
        Self {
            state: Arc::new(Mutex::new(MemoryState::default())),
            mode_column,
        }
    }

    /// Returns the number of stored submissions.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the store mutex is poisoned.
    pub fn submission_count(&self) -> Result<usize, StoreError> {
        Ok(self.lock()?.submissions.len())
    }

    /// Returns the number of stored responses.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the store mutex is poisoned.
    pub fn response_count(&self) -> Result<usize, StoreError> {
        Ok(self.lock()?.responses.len())
    }

    /// Locks the row state.
    fn lock(&self) -> Result<MutexGuard<'_, MemoryState>, StoreError> {
        self.state
            .lock()
            .map_err(|_| StoreError::Store("survey store mutex poisoned".to_string()))
    }

    /// Fails when a caller asks for `mode` on a schema without it.
    fn require_mode(&self, mode: ModeColumn) -> Result<(), StoreError> {
        if mode.is_present() && !self.mode_column {
            return Err(StoreError::Store("no such column: mode".to_string()));
        }
        Ok(())
    }

    /// Projects a stored question for the requested column mode.
    fn project(question: &Question, mode: ModeColumn) -> Question {
        let mut question = question.clone();
        if !mode.is_present() {
            question.mode = None;
        }
        question
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Returns true when `question` satisfies every filter.
fn matches_filter(question: &Question, filter: &QuestionFilter) -> bool {
    if filter.category.as_ref().is_some_and(|category| question.category.as_ref() != Some(category)) {
        return false;
    }
    if filter.status.is_some_and(|status| question.status != status) {
        return false;
    }
    if filter.priority.is_some_and(|priority| question.priority != priority) {
        return false;
    }
    if filter.mode.is_some_and(|mode| question.mode != Some(mode)) {
        return false;
    }
    if let Some(search) = &filter.search {
        let needle = search.to_lowercase();
        let in_title = question.title.to_lowercase().contains(&needle);
        let in_description =
            question.description.as_ref().is_some_and(|text| text.to_lowercase().contains(&needle));
        return in_title || in_description;
    }
    true
}

/// Compares two questions by the requested sort, breaking ties on identifier.
fn compare_questions(left: &Question, right: &Question, field: SortField, order: SortOrder) -> Ordering {
    let primary = match field {
        SortField::CreatedAt => left.created_at.cmp(&right.created_at),
        SortField::UpdatedAt => left.updated_at.cmp(&right.updated_at),
        SortField::Title => left.title.cmp(&right.title),
        SortField::Priority => left.priority.rank().cmp(&right.priority.rank()),
    };
    let primary = match order {
        SortOrder::Asc => primary,
        SortOrder::Desc => primary.reverse(),
    };
    primary.then_with(|| left.uuid.cmp(&right.uuid))
}

/// Slices one page out of a fully ordered row set.
fn window<T: Clone>(rows: &[T], page: PageRequest) -> Vec<T> {
    let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
    rows.iter().skip(offset).take(page.limit as usize).cloned().collect()
}

// ============================================================================
// SECTION: Store Implementation
// ============================================================================

impl SurveyStore for InMemorySurveyStore {
    fn ping(&self) -> Result<(), StoreError> {
        self.lock().map(|_| ())
    }

    fn has_mode_column(&self) -> Result<bool, StoreError> {
        Ok(self.mode_column)
    }

    fn list_questions(
        &self,
        query: &QuestionQuery,
        mode: ModeColumn,
    ) -> Result<Page<Question>, StoreError> {
        if query.filter.mode.is_some() {
            self.require_mode(ModeColumn::Present)?;
        }
        let guard = self.lock()?;
        let mut rows: Vec<&Question> =
            guard.questions.values().filter(|question| matches_filter(question, &query.filter)).collect();
        rows.sort_by(|left, right| compare_questions(left, right, query.sort_by, query.sort_order));
        let projected: Vec<Question> = rows.into_iter().map(|row| Self::project(row, mode)).collect();
        let total = projected.len() as u64;
        Ok(Page::new(window(&projected, query.page), query.page, total))
    }

    fn get_question(
        &self,
        id: &QuestionId,
        mode: ModeColumn,
    ) -> Result<Option<Question>, StoreError> {
        self.require_mode(mode)?;
        let guard = self.lock()?;
        Ok(guard.questions.get(id.as_str()).map(|question| Self::project(question, mode)))
    }

    fn insert_question(&self, question: &Question, mode: ModeColumn) -> Result<(), StoreError> {
        self.require_mode(mode)?;
        let mut guard = self.lock()?;
        if guard.questions.contains_key(question.uuid.as_str()) {
            return Err(StoreError::Conflict(format!("duplicate question uuid {}", question.uuid)));
        }
        let stored = Self::project(question, mode);
        guard.questions.insert(question.uuid.as_str().to_string(), stored);
        Ok(())
    }

    fn update_question(
        &self,
        id: &QuestionId,
        patch: &QuestionPatch,
        updated_at: Timestamp,
        mode: ModeColumn,
    ) -> Result<Option<Question>, StoreError> {
        if patch.mode.is_some() {
            self.require_mode(ModeColumn::Present)?;
        }
        self.require_mode(mode)?;
        let mut guard = self.lock()?;
        let Some(question) = guard.questions.get_mut(id.as_str()) else {
            return Ok(None);
        };
        if let Some(title) = &patch.title {
            question.title.clone_from(title);
        }
        if let Some(description) = &patch.description {
            question.description.clone_from(description);
        }
        if let Some(category) = &patch.category {
            question.category.clone_from(category);
        }
        if let Some(priority) = patch.priority {
            question.priority = priority;
        }
        if let Some(status) = patch.status {
            question.status = status;
        }
        if let Some(survey_mode) = patch.mode {
            question.mode = Some(survey_mode);
        }
        question.updated_at = updated_at;
        Ok(Some(Self::project(question, mode)))
    }

    fn delete_question(&self, id: &QuestionId) -> Result<bool, StoreError> {
        let mut guard = self.lock()?;
        Ok(guard.questions.remove(id.as_str()).is_some())
    }

    fn question_titles(&self, ids: &[QuestionId]) -> Result<TitleMap, StoreError> {
        let guard = self.lock()?;
        Ok(ids
            .iter()
            .filter_map(|id| {
                guard.questions.get(id.as_str()).map(|question| (id.clone(), question.title.clone()))
            })
            .collect())
    }

    fn insert_submission(
        &self,
        submission: &Submission,
        responses: &[ResponseRecord],
    ) -> Result<(), StoreError> {
        let mut guard = self.lock()?;
        if guard.submissions.iter().any(|existing| existing.uuid == submission.uuid) {
            return Err(StoreError::Conflict(format!("duplicate submission uuid {}", submission.uuid)));
        }
        let mut seen: BTreeSet<&str> = guard.responses.iter().map(|row| row.uuid.as_str()).collect();
        for response in responses {
            if response.submission_uuid != submission.uuid {
                return Err(StoreError::Invalid(format!(
                    "response {} does not belong to submission {}",
                    response.uuid, submission.uuid
                )));
            }
            if !seen.insert(response.uuid.as_str()) {
                return Err(StoreError::Conflict(format!("duplicate response uuid {}", response.uuid)));
            }
        }
        drop(seen);
        guard.submissions.push(submission.clone());
        guard.responses.extend_from_slice(responses);
        Ok(())
    }

    fn list_submissions(
        &self,
        page: PageRequest,
        survey_type: Option<SurveyType>,
    ) -> Result<Page<Submission>, StoreError> {
        let guard = self.lock()?;
        let mut rows: Vec<Submission> = guard
            .submissions
            .iter()
            .filter(|submission| survey_type.is_none_or(|kind| submission.survey_type == kind))
            .cloned()
            .collect();
        rows.sort_by(|left, right| {
            right.created_at.cmp(&left.created_at).then_with(|| right.uuid.cmp(&left.uuid))
        });
        let total = rows.len() as u64;
        Ok(Page::new(window(&rows, page), page, total))
    }

    fn responses_for_submissions(
        &self,
        ids: &[SubmissionId],
    ) -> Result<Vec<ResponseRecord>, StoreError> {
        let wanted: BTreeSet<&SubmissionId> = ids.iter().collect();
        let guard = self.lock()?;
        Ok(guard.responses.iter().filter(|row| wanted.contains(&row.submission_uuid)).cloned().collect())
    }

    fn list_responses(
        &self,
        page: PageRequest,
        question: Option<&QuestionId>,
    ) -> Result<Page<ResponseRecord>, StoreError> {
        let guard = self.lock()?;
        let mut rows: Vec<ResponseRecord> = guard
            .responses
            .iter()
            .filter(|row| question.is_none_or(|id| &row.question_uuid == id))
            .cloned()
            .collect();
        rows.sort_by(|left, right| right.uuid.cmp(&left.uuid));
        let total = rows.len() as u64;
        Ok(Page::new(window(&rows, page), page, total))
    }

    fn stat_rows(&self, location: Option<Location>) -> Result<Vec<StatRow>, StoreError> {
        let guard = self.lock()?;
        let allowed: Option<BTreeSet<&SubmissionId>> = location.map(|wanted| {
            guard
                .submissions
                .iter()
                .filter(|submission| submission.location == Some(wanted))
                .map(|submission| &submission.uuid)
                .collect()
        });
        Ok(guard
            .responses
            .iter()
            .filter(|row| allowed.as_ref().is_none_or(|set| set.contains(&row.submission_uuid)))
            .map(|row| StatRow {
                question_uuid: row.question_uuid.clone(),
                survey_type: row.survey_type,
                response_data: row.response_data.clone(),
            })
            .collect())
    }
}
