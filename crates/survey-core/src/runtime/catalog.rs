// crates/survey-core/src/runtime/catalog.rs
// ============================================================================
// Module: Survey Question Catalog
// Description: Question list, lookup, create, update, delete, and reorder.
// Purpose: Apply catalog rules on top of a SurveyStore, adapting to schema support.
// Dependencies: tracing, crate::{core, interfaces, runtime::schema}
// ============================================================================

//! ## Overview
//! The catalog consults [`SchemaSupport`] on every call. When the store has
//! no `mode` column, legacy rows are all `regular`: a `regular` filter is
//! dropped, any other mode filter yields an empty page, and supplied modes
//! are ignored on writes.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::NewQuestion;
use crate::core::Page;
use crate::core::Question;
use crate::core::QuestionId;
use crate::core::QuestionPatch;
use crate::core::QuestionQuery;
use crate::core::SurveyType;
use crate::core::Timestamp;
use crate::interfaces::SurveyStore;
use crate::runtime::error::ServiceError;
use crate::runtime::schema::SchemaSupport;

// ============================================================================
// SECTION: Catalog
// ============================================================================

/// Question catalog service.
#[derive(Debug, Clone)]
pub struct QuestionCatalog<S> {
    /// Backing store.
    store: S,
    /// Optional column presence.
    schema: SchemaSupport,
}

impl<S: SurveyStore> QuestionCatalog<S> {
    /// Creates a catalog over `store`.
    #[must_use]
    pub const fn new(store: S, schema: SchemaSupport) -> Self {
        Self { store, schema }
    }

    /// Returns the schema flag used by this catalog.
    #[must_use]
    pub const fn schema(&self) -> &SchemaSupport {
        &self.schema
    }

    /// Lists one page of questions.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Store`] when the store query fails.
    pub fn list(&self, mut query: QuestionQuery) -> Result<Page<Question>, ServiceError> {
        let mode = self.schema.mode_column();
        if !mode.is_present() {
            match query.filter.mode {
                Some(SurveyType::Regular) => query.filter.mode = None,
                Some(_) => return Ok(Page::empty(query.page)),
                None => {}
            }
        }
        Ok(self.store.list_questions(&query, mode)?)
    }

    /// Loads one question.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotFound`] when no question has `id`.
    pub fn get(&self, id: &QuestionId) -> Result<Question, ServiceError> {
        self.store
            .get_question(id, self.schema.mode_column())?
            .ok_or(ServiceError::NotFound("Question"))
    }

    /// Creates a question with a fresh identifier.
    ///
    /// `created_by` falls back to `actor` when the body omits it.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Conflict`] when the identifier already exists.
    pub fn create(&self, new: NewQuestion, actor: Option<&str>) -> Result<Question, ServiceError> {
        let mode = self.schema.mode_column();
        let now = Timestamp::now();
        let question = Question {
            uuid: QuestionId::generate(),
            title: new.title,
            description: new.description,
            category: new.category,
            priority: new.priority,
            status: new.status,
            mode: mode.is_present().then_some(new.mode),
            created_at: now,
            updated_at: now,
            created_by: new.created_by.or_else(|| actor.map(str::to_string)),
        };
        self.store.insert_question(&question, mode)?;
        tracing::info!(question = %question.uuid, "question created");
        Ok(question)
    }

    /// Applies a partial update.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::EmptyUpdate`] when no applicable field remains
    /// and [`ServiceError::NotFound`] when no question has `id`.
    pub fn update(&self, id: &QuestionId, mut patch: QuestionPatch) -> Result<Question, ServiceError> {
        let mode = self.schema.mode_column();
        if !mode.is_present() {
            patch.mode = None;
        }
        if patch.is_empty() {
            return Err(ServiceError::EmptyUpdate);
        }
        let updated = self
            .store
            .update_question(id, &patch, Timestamp::now(), mode)?
            .ok_or(ServiceError::NotFound("Question"))?;
        tracing::info!(question = %id, "question updated");
        Ok(updated)
    }

    /// Deletes a question.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotFound`] when no question has `id`.
    pub fn delete(&self, id: &QuestionId) -> Result<(), ServiceError> {
        if !self.store.delete_question(id)? {
            return Err(ServiceError::NotFound("Question"));
        }
        tracing::info!(question = %id, "question deleted");
        Ok(())
    }

    /// Acknowledges a display order without persisting it.
    ///
    /// The store has no ordering column, so callers must not rely on the
    /// order surviving a reload.
    pub fn reorder(&self, order: &[String]) -> usize {
        tracing::debug!(entries = order.len(), "question order acknowledged");
        order.len()
    }
}
