//! Result types for browse actions
//!
//! Pure data with no presentation concerns (no colors, emojis). The CLI and
//! any other front end decide how to render them.

use crate::store::StoreError;

/// Result of executing a store-facing action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// Action succeeded on all items
    Success {
        affected_count: usize,
        details: String,
    },

    /// Action succeeded on some items, failed on others
    Partial {
        succeeded: usize,
        failed: usize,
        errors: Vec<String>,
    },

    /// Action completely failed
    Failed(String),
}

impl ActionOutcome {
    /// Fold per-asset results into one outcome
    ///
    /// An empty result list counts as a failure: there was nothing to act on.
    #[must_use]
    pub fn from_results(details: &str, results: &[(String, Result<(), StoreError>)]) -> Self {
        if results.is_empty() {
            return Self::Failed("No assets specified".to_string());
        }

        let errors: Vec<String> = results
            .iter()
            .filter_map(|(id, r)| r.as_ref().err().map(|e| format!("{id}: {e}")))
            .collect();
        let succeeded = results.len() - errors.len();

        if errors.is_empty() {
            Self::Success {
                affected_count: succeeded,
                details: details.to_string(),
            }
        } else if succeeded > 0 {
            Self::Partial {
                succeeded,
                failed: errors.len(),
                errors,
            }
        } else {
            Self::Failed(format!("{details} failed:\n{}", errors.join("\n")))
        }
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Number of items the action was applied to
    #[must_use]
    pub const fn affected(&self) -> usize {
        match self {
            Self::Success { affected_count, .. } => *affected_count,
            Self::Partial { succeeded, .. } => *succeeded,
            Self::Failed(_) => 0,
        }
    }
}

/// Why a label assignment did nothing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The label is empty after trimming
    BlankLabel,
    /// No asset is selected
    EmptySelection,
}

/// Result of a label assignment
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssignOutcome {
    /// The trimmed label was written to `count` assets and persisted
    Applied { label: String, count: usize },
    /// Nothing happened
    Skipped(SkipReason),
}
