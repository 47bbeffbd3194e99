// crates/survey-core/src/core/question.rs
// ============================================================================
// Module: Survey Question Model
// Description: Question catalog records, enumerations, and list queries.
// Purpose: Define the canonical question shapes exchanged with stores and clients.
// Dependencies: serde, crate::core::{identifiers, page, time}
// ============================================================================

//! ## Overview
//! Questions are the catalog entries an administrator curates. The optional
//! [`SurveyType`] tag on a question is called its `mode`; stores that predate
//! the `mode` column return records without it.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::identifiers::QuestionId;
use crate::core::page::PageRequest;
use crate::core::time::Timestamp;

// ============================================================================
// SECTION: Enumerations
// ============================================================================

/// Question priority.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    /// Low priority.
    Low,
    /// Medium priority.
    #[default]
    Medium,
    /// High priority.
    High,
}

impl Priority {
    /// Returns the wire label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Returns the sort rank (low < medium < high).
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::Low => 0,
            Self::Medium => 1,
            Self::High => 2,
        }
    }

    /// Parses a wire label.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }
}

/// Question lifecycle status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionStatus {
    /// Shown to respondents.
    #[default]
    Active,
    /// Hidden from respondents.
    Inactive,
    /// Retained for reporting only.
    Archived,
}

impl QuestionStatus {
    /// Returns the wire label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Archived => "archived",
        }
    }

    /// Parses a wire label.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "active" => Some(Self::Active),
            "inactive" => Some(Self::Inactive),
            "archived" => Some(Self::Archived),
            _ => None,
        }
    }
}

/// Survey track classification, used as a question's `mode` and a submission's `survey_type`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurveyType {
    /// Standard survey track.
    #[default]
    Regular,
    /// Parent and child visiting-day track.
    OuderKind,
}

impl SurveyType {
    /// Returns the wire label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Regular => "regular",
            Self::OuderKind => "ouder_kind",
        }
    }

    /// Parses a wire label.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "regular" => Some(Self::Regular),
            "ouder_kind" => Some(Self::OuderKind),
            _ => None,
        }
    }
}

// ============================================================================
// SECTION: Records
// ============================================================================

/// Persisted question record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    /// Immutable identifier.
    pub uuid: QuestionId,
    /// Display title.
    pub title: String,
    /// Optional long description.
    pub description: Option<String>,
    /// Optional grouping category.
    pub category: Option<String>,
    /// Priority.
    pub priority: Priority,
    /// Lifecycle status.
    pub status: QuestionStatus,
    /// Survey track; omitted when the store lacks the column.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<SurveyType>,
    /// Creation time.
    pub created_at: Timestamp,
    /// Last update time.
    pub updated_at: Timestamp,
    /// Creator reference.
    pub created_by: Option<String>,
}

/// Validated question creation command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewQuestion {
    /// Display title.
    pub title: String,
    /// Optional long description.
    pub description: Option<String>,
    /// Optional grouping category.
    pub category: Option<String>,
    /// Priority.
    pub priority: Priority,
    /// Lifecycle status.
    pub status: QuestionStatus,
    /// Survey track.
    pub mode: SurveyType,
    /// Creator reference supplied by the client.
    pub created_by: Option<String>,
}

/// Validated partial update. `None` leaves a field untouched.
///
/// `description` and `category` use a nested option so that an empty string
/// clears the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionPatch {
    /// New title.
    pub title: Option<String>,
    /// New description; `Some(None)` clears it.
    pub description: Option<Option<String>>,
    /// New category; `Some(None)` clears it.
    pub category: Option<Option<String>>,
    /// New priority.
    pub priority: Option<Priority>,
    /// New status.
    pub status: Option<QuestionStatus>,
    /// New survey track.
    pub mode: Option<SurveyType>,
}

impl QuestionPatch {
    /// Returns true when no field is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.category.is_none()
            && self.priority.is_none()
            && self.status.is_none()
            && self.mode.is_none()
    }
}

// ============================================================================
// SECTION: Queries
// ============================================================================

/// Whitelisted sort columns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortField {
    /// Creation time.
    #[default]
    CreatedAt,
    /// Last update time.
    UpdatedAt,
    /// Title, byte order.
    Title,
    /// Priority rank.
    Priority,
}

impl SortField {
    /// Parses a wire label.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "created_at" => Some(Self::CreatedAt),
            "updated_at" => Some(Self::UpdatedAt),
            "title" => Some(Self::Title),
            "priority" => Some(Self::Priority),
            _ => None,
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    /// Ascending.
    #[default]
    Asc,
    /// Descending.
    Desc,
}

impl SortOrder {
    /// Parses `ASC` or `DESC`, ignoring case.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        if value.eq_ignore_ascii_case("asc") {
            Some(Self::Asc)
        } else if value.eq_ignore_ascii_case("desc") {
            Some(Self::Desc)
        } else {
            None
        }
    }
}

/// Equality filters and search for question listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionFilter {
    /// Exact category match.
    pub category: Option<String>,
    /// Exact status match.
    pub status: Option<QuestionStatus>,
    /// Exact priority match.
    pub priority: Option<Priority>,
    /// Exact mode match.
    pub mode: Option<SurveyType>,
    /// Case-insensitive substring over title or description.
    pub search: Option<String>,
}

/// Validated question list query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionQuery {
    /// Page window.
    pub page: PageRequest,
    /// Filters.
    pub filter: QuestionFilter,
    /// Sort column.
    pub sort_by: SortField,
    /// Sort direction.
    pub sort_order: SortOrder,
}
