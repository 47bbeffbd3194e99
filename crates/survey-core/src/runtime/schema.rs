// crates/survey-core/src/runtime/schema.rs
// ============================================================================
// Module: Survey Schema Support
// Description: Presence flag for the optional question mode column.
// Purpose: Let services adapt queries to old and new schemas without a migration gate.
// Dependencies: tracing, crate::interfaces
// ============================================================================

//! ## Overview
//! [`SchemaSupport`] records whether the store provisions `questions.mode`.
//! Hosts resolve it once at startup with [`SchemaSupport::probe`] and pass it
//! to the catalog. Health checks call [`SchemaSupport::refresh`]; a stale
//! read only sends one request down the legacy path.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;

use crate::interfaces::ModeColumn;
use crate::interfaces::StoreError;
use crate::interfaces::SurveyStore;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Shared, refreshable record of optional column presence.
#[derive(Debug, Clone)]
pub struct SchemaSupport {
    /// Whether `questions.mode` exists.
    mode_column: Arc<AtomicBool>,
}

impl SchemaSupport {
    /// Creates a fixed flag, used by tests and hosts that know their schema.
    #[must_use]
    pub fn fixed(mode_column: bool) -> Self {
        Self {
            mode_column: Arc::new(AtomicBool::new(mode_column)),
        }
    }

    /// Probes the store once.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the probe fails.
    pub fn probe<S: SurveyStore + ?Sized>(store: &S) -> Result<Self, StoreError> {
        Ok(Self::fixed(store.has_mode_column()?))
    }

    /// Re-probes the store; the previous value is kept when the probe fails.
    pub fn refresh<S: SurveyStore + ?Sized>(&self, store: &S) -> bool {
        match store.has_mode_column() {
            Ok(present) => {
                let previous = self.mode_column.swap(present, Ordering::Relaxed);
                if previous != present {
                    tracing::info!(mode_column = present, "question mode column presence changed");
                }
                present
            }
            Err(err) => {
                tracing::warn!(error = %err, "mode column probe failed");
                self.mode_present()
            }
        }
    }

    /// Returns true when `questions.mode` exists.
    #[must_use]
    pub fn mode_present(&self) -> bool {
        self.mode_column.load(Ordering::Relaxed)
    }

    /// Returns the column mode for store calls.
    #[must_use]
    pub fn mode_column(&self) -> ModeColumn {
        ModeColumn::from_present(self.mode_present())
    }
}
