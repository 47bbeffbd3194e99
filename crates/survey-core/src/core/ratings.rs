// crates/survey-core/src/core/ratings.rs
// ============================================================================
// Module: Survey Rating Scale
// Description: Fixed five-point smiley scale with weights and display labels.
// Purpose: Map answer tokens to ordinal weights for weighted averages.
// Dependencies: none
// ============================================================================

//! ## Overview
//! Respondents answer with one of five smiley tokens ordered from least to
//! most favorable. Tokens outside the scale carry no weight and are ignored
//! by weighted scoring, though they still count toward bucket totals.

// ============================================================================
// SECTION: Types
// ============================================================================

/// One step of the rating scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rating {
    /// Answer token stored in `response_data.value`.
    pub token: &'static str,
    /// Ordinal weight on the 1-5 scale.
    pub weight: u8,
    /// Display label shown to respondents.
    pub label: &'static str,
}

/// The rating scale, least favorable first.
pub const RATING_SCALE: [Rating; 5] = [
    Rating {
        token: "rood",
        weight: 1,
        label: "Helemaal niet leuk",
    },
    Rating {
        token: "beige",
        weight: 2,
        label: "Niet leuk",
    },
    Rating {
        token: "geel",
        weight: 3,
        label: "Gewoon",
    },
    Rating {
        token: "lichtgroen",
        weight: 4,
        label: "Leuk",
    },
    Rating {
        token: "groen",
        weight: 5,
        label: "Heel leuk",
    },
];

// ============================================================================
// SECTION: Lookups
// ============================================================================

impl Rating {
    /// Looks up a scale step by answer token.
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        RATING_SCALE.iter().copied().find(|rating| rating.token == token)
    }

    /// Returns the weight for an answer token, if it is on the scale.
    #[must_use]
    pub fn weight_of(token: &str) -> Option<u8> {
        Self::from_token(token).map(|rating| rating.weight)
    }
}
