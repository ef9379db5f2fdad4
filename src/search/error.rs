//! Search-specific error types
//!
//! Searchers rank identifiers; they fail when their backing data cannot be
//! read or when the query is unusable.

use thiserror::Error;

/// Search-specific errors
#[derive(Debug, Error)]
pub enum SearchError {
    /// Label data could not be read
    #[error("Label store error: {0}")]
    LabelStore(#[from] crate::browse::LabelStoreError),

    /// Query was empty after trimming
    #[error("Search query is empty")]
    EmptyQuery,
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod error_tests;
