//! Browse session state
//!
//! A [`BrowseSession`] owns everything a presentation layer needs for one
//! screen of photos: the displayed [`ResultProjection`], the [`SelectionSet`]
//! over it and the label input buffer. The photo store and the label store are
//! injected at construction so tests can substitute in-memory versions.
//!
//! # Workflow
//!
//! ```text
//! load_library / load_search / load_labeled
//!     ↓ (projection replaced, selection and input reset)
//! toggle(id) ──→ input pre-filled with the asset's label
//!     ↓
//! set_label_input(text)
//!     ↓
//! assign_label() ──→ one persist call ──→ selection and input cleared
//! ```
//!
//! Store mutations (`set_favorite`, `delete`) update the projection in place
//! once the store confirms them.

use super::actions;
use super::models::{ActionOutcome, AssignOutcome};
use super::persistence::{LabelStore, LabelStoreError};
use super::projection::ResultProjection;
use super::selection::SelectionSet;
use crate::asset::Asset;
use crate::search::{SearchError, Searcher};
use crate::store::{ContentMode, PhotoStore, StoreError, Thumbnail, ThumbnailSize};
use futures::future::join_all;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::watch;

/// Browse session result type
pub type Result<T> = std::result::Result<T, BrowseError>;

/// Errors that can occur during a browse session
#[derive(Debug, thiserror::Error)]
pub enum BrowseError {
    #[error("Label persistence failed: {0}")]
    Persistence(#[from] LabelStoreError),

    #[error("Search failed: {0}")]
    Search(#[from] SearchError),

    #[error("Asset not displayed: {0}")]
    NotDisplayed(String),
}

pub struct BrowseSession {
    photos: Arc<dyn PhotoStore>,
    labels: Arc<dyn LabelStore>,
    projection: ResultProjection,
    selection: SelectionSet,
    label_input: String,
}

impl BrowseSession {
    #[must_use]
    pub fn new(photos: Arc<dyn PhotoStore>, labels: Arc<dyn LabelStore>) -> Self {
        Self {
            photos,
            labels,
            projection: ResultProjection::new(),
            selection: SelectionSet::new(),
            label_input: String::new(),
        }
    }

    #[must_use]
    pub const fn projection(&self) -> &ResultProjection {
        &self.projection
    }

    #[must_use]
    pub const fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    /// Revision receiver, notified after every projection change
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.projection.subscribe()
    }

    /// Selected assets in display order
    #[must_use]
    pub fn selected_assets(&self) -> Vec<&Asset> {
        self.projection.selected(&self.selection)
    }

    // ---- loading ----

    /// Display the whole library with persisted labels merged in
    ///
    /// # Errors
    ///
    /// Returns `BrowseError::Persistence` if the labels cannot be read.
    pub async fn load_library(&mut self) -> Result<usize> {
        let handles = self.photos.fetch_all().await;
        let mut labels = self.labels.load_labels()?;

        let assets = handles
            .into_iter()
            .enumerate()
            .map(|(i, handle)| {
                let label = labels.remove(&handle.local_identifier);
                Asset::from_handle(handle, Some(i), label)
            })
            .collect();

        Ok(self.show(assets))
    }

    /// Display the assets a searcher ranks for `query`, best match first
    ///
    /// Identifiers the photo store cannot resolve are left out.
    ///
    /// # Errors
    ///
    /// Returns `BrowseError::Search` if the searcher fails, or
    /// `BrowseError::Persistence` if the labels cannot be read.
    pub async fn load_search(&mut self, searcher: &dyn Searcher, query: &str, limit: usize) -> Result<usize> {
        let ranked = searcher.search(query, limit).await?;
        let mut by_id: HashMap<String, _> = self
            .photos
            .fetch_by_identifiers(&ranked)
            .await
            .into_iter()
            .map(|h| (h.local_identifier.clone(), h))
            .collect();
        let mut labels = self.labels.load_labels()?;

        let mut assets = Vec::with_capacity(by_id.len());
        for id in &ranked {
            match by_id.remove(id) {
                Some(handle) => {
                    let label = labels.remove(id);
                    assets.push(Asset::from_handle(handle, Some(assets.len()), label));
                }
                None => tracing::debug!(identifier = %id, "Search hit not in photo store"),
            }
        }

        Ok(self.show(assets))
    }

    /// Display every asset persisted with exactly `label`
    ///
    /// Assets are rebuilt from their identifiers; ones the store no longer
    /// knows are still shown, without a handle.
    ///
    /// # Errors
    ///
    /// Returns `BrowseError::Persistence` if the labels cannot be read.
    pub async fn load_labeled(&mut self, label: &str) -> Result<usize> {
        let ids = self.labels.find_by_label(label)?;
        let photos = self.photos.as_ref();
        let lookups = ids
            .into_iter()
            .map(|id| Asset::from_identifier(photos, id, Some(label.to_string())));

        let mut assets = join_all(lookups).await;
        for (i, asset) in assets.iter_mut().enumerate() {
            asset.display_index = Some(i);
        }

        Ok(self.show(assets))
    }

    fn show(&mut self, assets: Vec<Asset>) -> usize {
        let count = assets.len();
        self.projection.replace(assets);
        self.selection.clear();
        self.label_input.clear();
        tracing::debug!(count, "Projection replaced");
        count
    }

    // ---- selection and labelling ----

    /// Flip the selection of a displayed asset
    ///
    /// Selecting pre-fills the label input with the asset's current label,
    /// deselecting clears it.
    ///
    /// # Errors
    ///
    /// Returns `BrowseError::NotDisplayed` if no displayed asset has the identifier.
    pub fn toggle(&mut self, identifier: &str) -> Result<bool> {
        let asset = self
            .projection
            .get(identifier)
            .ok_or_else(|| BrowseError::NotDisplayed(identifier.to_string()))?;
        let prefill = asset.class_label.clone().unwrap_or_default();

        let selected = self.selection.toggle(identifier);
        if selected {
            self.label_input = prefill;
        } else {
            self.label_input.clear();
        }
        Ok(selected)
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn set_label_input(&mut self, text: impl Into<String>) {
        self.label_input = text.into();
    }

    #[must_use]
    pub fn label_input(&self) -> &str {
        &self.label_input
    }

    /// Whether `assign_label` would do anything
    #[must_use]
    pub fn can_assign(&self) -> bool {
        !self.selection.is_empty() && actions::normalize_label(&self.label_input).is_some()
    }

    /// Apply the label input to every selected asset and persist
    ///
    /// On success the selection and the input are cleared. A blank input or an
    /// empty selection leaves everything untouched.
    ///
    /// # Errors
    ///
    /// Returns `BrowseError::Persistence` if the write fails. The labels stay
    /// applied in the projection and the selection is kept for a retry.
    pub fn assign_label(&mut self) -> Result<AssignOutcome> {
        let outcome = actions::execute_assign_label(
            &mut self.projection,
            &self.selection,
            &self.label_input,
            self.labels.as_ref(),
        )
        .inspect_err(|e| tracing::error!(error = %e, "Failed to persist labels"))?;

        if matches!(outcome, AssignOutcome::Applied { .. }) {
            self.selection.clear();
            self.label_input.clear();
        }
        Ok(outcome)
    }

    // ---- store actions ----

    /// Change the favorite flag of one displayed asset
    pub async fn set_favorite(&mut self, identifier: &str, value: bool) -> ActionOutcome {
        let Some(asset) = self.projection.get(identifier) else {
            return ActionOutcome::Failed(BrowseError::NotDisplayed(identifier.to_string()).to_string());
        };
        let results = actions::execute_set_favorite(self.photos.as_ref(), &[asset], value).await;
        self.finish_favorite(results, value).await
    }

    /// Change the favorite flag of every selected asset
    pub async fn favorite_selection(&mut self, value: bool) -> ActionOutcome {
        let targets = self.projection.selected(&self.selection);
        let results = actions::execute_set_favorite(self.photos.as_ref(), &targets, value).await;
        self.finish_favorite(results, value).await
    }

    async fn finish_favorite(&mut self, results: Vec<(String, std::result::Result<(), StoreError>)>, value: bool) -> ActionOutcome {
        let changed = succeeded(&results);
        if !changed.is_empty() {
            for handle in self.photos.fetch_by_identifiers(&changed).await {
                self.projection.update_handle(&handle);
            }
        }
        let details = if value { "Favorited" } else { "Unfavorited" };
        ActionOutcome::from_results(details, &results)
    }

    /// Delete one displayed asset from the photo store
    pub async fn delete(&mut self, identifier: &str) -> ActionOutcome {
        let Some(asset) = self.projection.get(identifier) else {
            return ActionOutcome::Failed(BrowseError::NotDisplayed(identifier.to_string()).to_string());
        };
        let results = actions::execute_delete(self.photos.as_ref(), &[asset]).await;
        let results = self.finish_delete(results);
        ActionOutcome::from_results("Deleted", &results)
    }

    /// Delete every selected asset with a single change request
    pub async fn delete_selection(&mut self) -> ActionOutcome {
        let targets = self.projection.selected(&self.selection);
        let results = actions::execute_delete(self.photos.as_ref(), &targets).await;
        let results = self.finish_delete(results);
        ActionOutcome::from_results("Deleted", &results)
    }

    /// Assets the store no longer knows count as deleted, so their stale
    /// labels can still be forgotten.
    fn finish_delete(&mut self, results: Vec<(String, std::result::Result<(), StoreError>)>) -> Vec<(String, std::result::Result<(), StoreError>)> {
        let results: Vec<_> = results
            .into_iter()
            .map(|(id, result)| match result {
                Err(StoreError::Unresolved(_)) => {
                    tracing::debug!(identifier = %id, "Dropping asset missing from the photo store");
                    (id, Ok(()))
                }
                other => (id, other),
            })
            .collect();

        let deleted = succeeded(&results);
        if deleted.is_empty() {
            return results;
        }

        self.projection.remove(&deleted);
        let projection = &self.projection;
        self.selection.retain_known(|id| projection.contains(id));

        if let Err(e) = self.labels.forget(&deleted) {
            tracing::warn!(error = %e, count = deleted.len(), "Failed to forget labels of deleted assets");
        }
        results
    }

    /// Thumbnail for a displayed asset
    pub async fn thumbnail(&self, identifier: &str, size: ThumbnailSize, mode: ContentMode) -> Option<Thumbnail> {
        if !self.projection.contains(identifier) {
            return None;
        }
        self.photos.request_thumbnail(identifier, size, mode).await
    }
}

fn succeeded(results: &[(String, std::result::Result<(), StoreError>)]) -> Vec<String> {
    results
        .iter()
        .filter(|(_, r)| r.is_ok())
        .map(|(id, _)| id.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browse::persistence::MemoryLabelStore;
    use crate::search::LabelSearcher;
    use crate::store::MemoryStore;
    use crate::testing::handle;

    struct Fixture {
        photos: Arc<MemoryStore>,
        labels: Arc<MemoryLabelStore>,
        session: BrowseSession,
    }

    fn fixture(ids: &[&str], labels: MemoryLabelStore) -> Fixture {
        let photos = Arc::new(MemoryStore::with_handles(ids.iter().map(|id| handle(id))));
        let labels = Arc::new(labels);
        let session = BrowseSession::new(photos.clone(), labels.clone());
        Fixture { photos, labels, session }
    }

    fn displayed_labels(session: &BrowseSession) -> Vec<Option<&str>> {
        session.projection().iter().map(|a| a.class_label.as_deref()).collect()
    }

    #[tokio::test]
    async fn test_sunset_scenario() {
        let mut f = fixture(&["p1", "p2", "p3"], MemoryLabelStore::new());
        assert_eq!(f.session.load_library().await.unwrap(), 3);

        f.session.toggle("p1").unwrap();
        f.session.toggle("p3").unwrap();
        f.session.set_label_input("sunset");
        let outcome = f.session.assign_label().unwrap();

        assert_eq!(outcome, AssignOutcome::Applied { label: "sunset".into(), count: 2 });
        assert_eq!(displayed_labels(&f.session), vec![Some("sunset"), None, Some("sunset")]);
        assert!(f.session.selection().is_empty());
        assert_eq!(f.session.label_input(), "");
        assert_eq!(f.labels.persist_count(), 1);
    }

    #[tokio::test]
    async fn test_whitespace_label_is_noop() {
        let mut f = fixture(&["p1", "p2"], MemoryLabelStore::new());
        f.session.load_library().await.unwrap();
        f.session.toggle("p1").unwrap();
        f.session.set_label_input("  \t ");

        assert!(!f.session.can_assign());
        let outcome = f.session.assign_label().unwrap();

        assert!(matches!(outcome, AssignOutcome::Skipped(_)));
        assert!(f.session.selection().contains("p1"));
        assert_eq!(f.session.label_input(), "  \t ");
        assert_eq!(displayed_labels(&f.session), vec![None, None]);
        assert_eq!(f.labels.persist_count(), 0);
    }

    #[tokio::test]
    async fn test_empty_selection_is_noop() {
        let mut f = fixture(&["p1"], MemoryLabelStore::new());
        f.session.load_library().await.unwrap();
        f.session.set_label_input("cat");

        assert!(!f.session.can_assign());
        f.session.assign_label().unwrap();
        assert_eq!(f.labels.persist_count(), 0);
        assert_eq!(f.session.label_input(), "cat");
    }

    #[tokio::test]
    async fn test_persist_failure_keeps_selection_and_input() {
        let mut f = fixture(&["p1"], MemoryLabelStore::new());
        f.session.load_library().await.unwrap();
        f.session.toggle("p1").unwrap();
        f.session.set_label_input("cat");
        f.labels.fail_writes(true);

        let result = f.session.assign_label();

        assert!(matches!(result, Err(BrowseError::Persistence(_))));
        assert!(f.session.selection().contains("p1"));
        assert_eq!(f.session.label_input(), "cat");
        assert_eq!(displayed_labels(&f.session), vec![Some("cat")]);
    }

    #[tokio::test]
    async fn test_toggle_prefills_and_clears_input() {
        let mut f = fixture(&["p1", "p2"], MemoryLabelStore::with_labels([("p1", "dog")]));
        f.session.load_library().await.unwrap();

        assert!(f.session.toggle("p1").unwrap());
        assert_eq!(f.session.label_input(), "dog");
        assert!(f.session.toggle("p2").unwrap());
        assert_eq!(f.session.label_input(), "");
        assert!(!f.session.toggle("p2").unwrap());
        assert_eq!(f.session.label_input(), "");
        assert!(f.session.selection().contains("p1"));

        assert!(matches!(f.session.toggle("nope"), Err(BrowseError::NotDisplayed(_))));
    }

    #[tokio::test]
    async fn test_double_toggle_restores_selection() {
        let mut f = fixture(&["p1", "p2"], MemoryLabelStore::new());
        f.session.load_library().await.unwrap();
        f.session.toggle("p2").unwrap();
        let before = f.session.selection().clone();

        f.session.toggle("p1").unwrap();
        f.session.toggle("p1").unwrap();
        assert_eq!(f.session.selection(), &before);
    }

    #[tokio::test]
    async fn test_reload_resets_selection_and_keeps_labels() {
        let mut f = fixture(&["p1", "p2"], MemoryLabelStore::new());
        f.session.load_library().await.unwrap();
        f.session.toggle("p2").unwrap();
        f.session.set_label_input("cat");
        f.session.assign_label().unwrap();

        f.session.toggle("p1").unwrap();
        f.session.load_library().await.unwrap();

        assert!(f.session.selection().is_empty());
        assert_eq!(displayed_labels(&f.session), vec![None, Some("cat")]);
    }

    #[tokio::test]
    async fn test_load_search_keeps_ranking_and_drops_unknown() {
        let labels = MemoryLabelStore::with_labels([("p1", "cat"), ("p2", "black cat"), ("ghost", "cat")]);
        let mut f = fixture(&["p1", "p2", "p3"], labels);
        let searcher = LabelSearcher::new(f.labels.clone());

        assert_eq!(f.session.load_search(&searcher, "cat", 10).await.unwrap(), 2);

        let ids: Vec<&str> = f.session.projection().iter().map(Asset::identifier).collect();
        assert_eq!(ids, vec!["p1", "p2"]);
        assert_eq!(displayed_labels(&f.session), vec![Some("cat"), Some("black cat")]);
        assert_eq!(f.session.projection().get("p2").unwrap().display_index, Some(1));
    }

    #[tokio::test]
    async fn test_load_labeled_keeps_unresolvable() {
        let labels = MemoryLabelStore::with_labels([("p1", "cat"), ("gone", "cat"), ("p2", "dog")]);
        let mut f = fixture(&["p1", "p2"], labels);

        assert_eq!(f.session.load_labeled("cat").await.unwrap(), 2);

        let gone = f.session.projection().get("gone").unwrap();
        assert!(gone.handle().is_none());
        assert_eq!(gone.accessibility_label(), "Photo");
        assert!(f.session.projection().get("p1").unwrap().handle().is_some());
    }

    #[tokio::test]
    async fn test_favorite_updates_projection_in_place() {
        let mut f = fixture(&["p1", "p2"], MemoryLabelStore::with_labels([("p1", "cat")]));
        f.session.load_library().await.unwrap();

        let outcome = f.session.set_favorite("p1", true).await;

        assert!(outcome.is_success());
        let p1 = f.session.projection().get("p1").unwrap();
        assert!(p1.is_favorite());
        assert_eq!(p1.class_label.as_deref(), Some("cat"));
        assert!(!f.session.projection().get("p2").unwrap().is_favorite());
    }

    #[tokio::test]
    async fn test_favorite_failure_leaves_projection() {
        let mut f = fixture(&["p1"], MemoryLabelStore::new());
        f.session.load_library().await.unwrap();
        f.photos.fail_changes(true);

        let outcome = f.session.set_favorite("p1", true).await;

        assert!(matches!(outcome, ActionOutcome::Failed(_)));
        assert!(!f.session.projection().get("p1").unwrap().is_favorite());
    }

    #[tokio::test]
    async fn test_favorite_selection() {
        let mut f = fixture(&["p1", "p2", "p3"], MemoryLabelStore::new());
        f.session.load_library().await.unwrap();
        f.session.toggle("p1").unwrap();
        f.session.toggle("p3").unwrap();

        let outcome = f.session.favorite_selection(true).await;

        assert_eq!(outcome.affected(), 2);
        let favorites: Vec<bool> = f.session.projection().iter().map(Asset::is_favorite).collect();
        assert_eq!(favorites, vec![true, false, true]);
        assert_eq!(f.photos.change_count(), 2);
    }

    #[tokio::test]
    async fn test_delete_removes_everywhere() {
        let mut f = fixture(&["p1", "p2"], MemoryLabelStore::with_labels([("p1", "cat")]));
        f.session.load_library().await.unwrap();
        f.session.toggle("p1").unwrap();
        let mut rx = f.session.subscribe();
        rx.borrow_and_update();

        let outcome = f.session.delete("p1").await;

        assert!(outcome.is_success());
        assert!(!f.session.projection().contains("p1"));
        assert!(f.session.selection().is_empty());
        assert!(f.labels.load_labels().unwrap().is_empty());
        assert!(!f.photos.contains("p1").await);
        assert!(rx.has_changed().unwrap());
    }

    #[tokio::test]
    async fn test_delete_selection_single_request() {
        let mut f = fixture(&["p1", "p2", "p3"], MemoryLabelStore::new());
        f.session.load_library().await.unwrap();
        f.session.toggle("p1").unwrap();
        f.session.toggle("p2").unwrap();

        let outcome = f.session.delete_selection().await;

        assert_eq!(outcome.affected(), 2);
        assert_eq!(f.photos.change_count(), 1);
        assert_eq!(f.session.projection().len(), 1);
        assert!(f.session.selection().is_empty());
    }

    #[tokio::test]
    async fn test_delete_forgets_asset_missing_from_store() {
        let labels = MemoryLabelStore::with_labels([("p1", "cat"), ("gone", "cat")]);
        let mut f = fixture(&["p1"], labels);
        f.session.load_labeled("cat").await.unwrap();

        let outcome = f.session.delete("gone").await;

        assert!(outcome.is_success());
        assert!(!f.session.projection().contains("gone"));
        assert_eq!(f.labels.find_by_label("cat").unwrap(), vec!["p1"]);
        assert_eq!(f.photos.change_count(), 0);
    }

    #[tokio::test]
    async fn test_delete_stopped_part_way_keeps_the_rest() {
        let labels = MemoryLabelStore::with_labels([("p1", "cat"), ("p2", "cat"), ("p3", "cat")]);
        let mut f = fixture(&["p1", "p2", "p3"], labels);
        f.photos.fail_delete_of("p2").await;
        f.session.load_library().await.unwrap();
        for id in ["p1", "p2", "p3"] {
            f.session.toggle(id).unwrap();
        }

        let outcome = f.session.delete_selection().await;

        assert!(matches!(outcome, ActionOutcome::Partial { succeeded: 1, failed: 2, .. }));
        let shown: Vec<&str> = f.session.projection().iter().map(Asset::identifier).collect();
        assert_eq!(shown, vec!["p2", "p3"]);
        assert_eq!(f.labels.find_by_label("cat").unwrap(), vec!["p2", "p3"]);
        let mut selected: Vec<&str> = f.session.selection().iter().collect();
        selected.sort_unstable();
        assert_eq!(selected, vec!["p2", "p3"]);
    }

    #[tokio::test]
    async fn test_actions_on_empty_selection_fail() {
        let mut f = fixture(&["p1"], MemoryLabelStore::new());
        f.session.load_library().await.unwrap();

        assert!(matches!(f.session.delete_selection().await, ActionOutcome::Failed(_)));
        assert!(matches!(f.session.favorite_selection(true).await, ActionOutcome::Failed(_)));
        assert!(matches!(f.session.delete("nope").await, ActionOutcome::Failed(_)));
        assert_eq!(f.photos.change_count(), 0);
    }

    #[tokio::test]
    async fn test_thumbnail_only_for_displayed() {
        let mut f = fixture(&["p1", "p2"], MemoryLabelStore::new());
        f.photos.insert_thumbnail("p1", vec![1, 2, 3]).await;
        f.photos.insert_thumbnail("p2", vec![4, 5, 6]).await;
        f.session.load_labeled("none").await.unwrap();

        let size = ThumbnailSize::square(32);
        assert!(f.session.thumbnail("p1", size, ContentMode::AspectFit).await.is_none());

        f.session.load_library().await.unwrap();
        let thumb = f.session.thumbnail("p1", size, ContentMode::AspectFit).await.unwrap();
        assert_eq!(thumb.data, vec![1, 2, 3]);
    }
}
