// crates/survey-core/src/core/identifiers.rs
// ============================================================================
// Module: Survey Identifiers
// Description: Opaque UUID identifiers for questions, submissions, and responses.
// Purpose: Provide strongly typed, serializable identifiers with stable wire forms.
// Dependencies: serde, thiserror, uuid
// ============================================================================

//! ## Overview
//! Every persisted survey row is keyed by a hyphenated UUID string. Generated
//! identifiers are random v4 UUIDs. Parsed identifiers must use the
//! canonical 36-character hyphenated layout; braced, URN, and simple forms
//! are rejected at the boundary.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Length of a hyphenated UUID string.
const HYPHENATED_UUID_LEN: usize = 36;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Identifier parsing errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdError {
    /// Input is not a hyphenated UUID.
    #[error("invalid uuid format: {0}")]
    InvalidFormat(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Declares a UUID-backed identifier newtype.
macro_rules! uuid_identifier {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        ///
        /// # Invariants
        /// - Holds a lowercase hyphenated UUID when built through [`Self::parse`] or [`Self::generate`].
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wraps a raw identifier without validation.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Generates a fresh random v4 identifier.
            #[must_use]
            pub fn generate() -> Self {
                Self(Uuid::new_v4().to_string())
            }

            /// Parses a hyphenated UUID string into its lowercase form.
            ///
            /// # Errors
            ///
            /// Returns [`IdError::InvalidFormat`] when the input is not a UUID.
            pub fn parse(value: &str) -> Result<Self, IdError> {
                if value.len() != HYPHENATED_UUID_LEN {
                    return Err(IdError::InvalidFormat(value.to_string()));
                }
                Uuid::try_parse(value)
                    .map(|uuid| Self(uuid.hyphenated().to_string()))
                    .map_err(|_| IdError::InvalidFormat(value.to_string()))
            }

            /// Returns the identifier as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self::new(value)
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self::new(value)
            }
        }
    };
}

// ============================================================================
// SECTION: Identifier Types
// ============================================================================

uuid_identifier!(
    /// Question identifier; immutable once assigned.
    QuestionId
);

uuid_identifier!(
    /// Submission identifier grouping one respondent's answers.
    SubmissionId
);

uuid_identifier!(
    /// Response row identifier.
    ResponseId
);

// ============================================================================
// SECTION: Tests
// ============================================================================
