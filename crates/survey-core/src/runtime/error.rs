// crates/survey-core/src/runtime/error.rs
// ============================================================================
// Module: Survey Service Errors
// Description: Error taxonomy shared by the runtime services.
// Purpose: Translate store failures into outcomes hosts can map to status codes.
// Dependencies: thiserror, crate::{interfaces, validation}
// ============================================================================

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::interfaces::StoreError;
use crate::validation::ValidationErrors;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Survey service errors.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Input failed validation.
    #[error(transparent)]
    Validation(ValidationErrors),
    /// Named entity does not exist.
    #[error("{0} not found")]
    NotFound(&'static str),
    /// Duplicate identifier.
    #[error("conflict: {0}")]
    Conflict(String),
    /// Update carried no applicable fields.
    #[error("no valid fields to update")]
    EmptyUpdate,
    /// Reorder entries lacked string identifiers.
    #[error("invalid order payload")]
    InvalidOrder,
    /// Store failure.
    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for ServiceError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::Conflict(message) => Self::Conflict(message),
            other => Self::Store(other),
        }
    }
}

impl From<ValidationErrors> for ServiceError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(errors)
    }
}
