use super::{SearchError, Searcher};
use crate::browse::LabelStore;
use async_trait::async_trait;
use std::sync::Arc;

/// Case-insensitive matcher over persisted class labels
///
/// Exact label matches rank before substring matches; ties are broken by
/// identifier so results are stable between runs.
pub struct LabelSearcher {
    labels: Arc<dyn LabelStore>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum MatchRank {
    Exact,
    Contains,
}

impl LabelSearcher {
    #[must_use]
    pub fn new(labels: Arc<dyn LabelStore>) -> Self {
        Self { labels }
    }

    fn rank(label: &str, needle: &str) -> Option<MatchRank> {
        let label = label.to_lowercase();
        if label == needle {
            Some(MatchRank::Exact)
        } else if label.contains(needle) {
            Some(MatchRank::Contains)
        } else {
            None
        }
    }
}

#[async_trait]
impl Searcher for LabelSearcher {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<String>, SearchError> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Err(SearchError::EmptyQuery);
        }

        let mut hits: Vec<(MatchRank, String)> = self
            .labels
            .load_labels()?
            .into_iter()
            .filter_map(|(id, label)| Self::rank(&label, &needle).map(|rank| (rank, id)))
            .collect();

        hits.sort();

        tracing::debug!(query = %needle, hits = hits.len(), "Label search");
        Ok(hits.into_iter().take(limit).map(|(_, id)| id).collect())
    }
}
