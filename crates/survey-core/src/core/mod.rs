// crates/survey-core/src/core/mod.rs
// ============================================================================
// Module: Survey Core Types
// Description: Canonical question, submission, and response structures.
// Purpose: Provide stable, serializable types shared by every survey crate.
// Dependencies: serde, time, uuid
// ============================================================================

//! ## Overview
//! Survey core types define the catalog records, the submission and response
//! rows, pagination envelopes, and the rating scale. These types are the
//! canonical wire shapes for the HTTP API.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod identifiers;
pub mod page;
pub mod question;
pub mod ratings;
pub mod submission;
pub mod time;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use identifiers::IdError;
pub use identifiers::QuestionId;
pub use identifiers::ResponseId;
pub use identifiers::SubmissionId;
pub use page::DEFAULT_PAGE_SIZE;
pub use page::MAX_PAGE_SIZE;
pub use page::Page;
pub use page::PageRequest;
pub use page::Pagination;
pub use question::NewQuestion;
pub use question::Priority;
pub use question::Question;
pub use question::QuestionFilter;
pub use question::QuestionPatch;
pub use question::QuestionQuery;
pub use question::QuestionStatus;
pub use question::SortField;
pub use question::SortOrder;
pub use question::SurveyType;
pub use ratings::RATING_SCALE;
pub use ratings::Rating;
pub use submission::EnrichedResponse;
pub use submission::Location;
pub use submission::NewResponse;
pub use submission::NewSubmission;
pub use submission::ResponsePayload;
pub use submission::ResponseRecord;
pub use submission::StatRow;
pub use submission::Submission;
pub use submission::SubmissionWithResponses;
pub use time::Timestamp;
