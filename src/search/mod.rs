//! Search boundary
//!
//! A [`Searcher`] turns a free-text query into a ranked list of asset
//! identifiers. The browse session resolves those identifiers against the
//! photo store and keeps the ranking as display order.

pub mod error;
mod label;

pub use error::SearchError;
pub use label::LabelSearcher;

use async_trait::async_trait;

/// Ranked identifier lookup
#[async_trait]
pub trait Searcher: Send + Sync {
    /// Identifiers matching `query`, best match first, at most `limit` of them
    ///
    /// # Errors
    ///
    /// Returns `SearchError` if the query is unusable or the backend fails.
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<String>, SearchError>;
}
