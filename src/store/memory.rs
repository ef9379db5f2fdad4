//! In-process photo store
//!
//! Keeps handles in a map behind a `tokio` lock. Used as the substitute store
//! in tests and for embedding the browse session without a durable library.

use super::{
    sort_handles, ChangeRequest, ContentMode, PhotoStore, StoreError, StoreHandle, Thumbnail,
    ThumbnailSize,
};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::RwLock;

#[derive(Debug, Default)]
pub struct MemoryStore {
    handles: RwLock<HashMap<String, StoreHandle>>,
    thumbnails: RwLock<HashMap<String, Vec<u8>>>,
    undeletable: RwLock<HashSet<String>>,
    fail_changes: AtomicBool,
    change_count: AtomicUsize,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store pre-populated with the given handles
    #[must_use]
    pub fn with_handles(handles: impl IntoIterator<Item = StoreHandle>) -> Self {
        let map = handles
            .into_iter()
            .map(|h| (h.local_identifier.clone(), h))
            .collect();
        Self {
            handles: RwLock::new(map),
            ..Self::default()
        }
    }

    pub async fn insert(&self, handle: StoreHandle) {
        self.handles
            .write()
            .await
            .insert(handle.local_identifier.clone(), handle);
    }

    /// Register encoded thumbnail bytes returned for `identifier`
    pub async fn insert_thumbnail(&self, identifier: impl Into<String>, data: Vec<u8>) {
        self.thumbnails.write().await.insert(identifier.into(), data);
    }

    /// Make every following change request fail with `Rejected`
    pub fn fail_changes(&self, fail: bool) {
        self.fail_changes.store(fail, Ordering::SeqCst);
    }

    /// Make deletes stop at `identifier`, keeping it and every later target
    pub async fn fail_delete_of(&self, identifier: impl Into<String>) {
        self.undeletable.write().await.insert(identifier.into());
    }

    /// Number of change requests received, failed ones included
    #[must_use]
    pub fn change_count(&self) -> usize {
        self.change_count.load(Ordering::SeqCst)
    }

    pub async fn contains(&self, identifier: &str) -> bool {
        self.handles.read().await.contains_key(identifier)
    }

    pub async fn len(&self) -> usize {
        self.handles.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.handles.read().await.is_empty()
    }
}

#[async_trait::async_trait]
impl PhotoStore for MemoryStore {
    async fn fetch_by_identifiers(&self, ids: &[String]) -> Vec<StoreHandle> {
        let handles = self.handles.read().await;
        ids.iter().filter_map(|id| handles.get(id).cloned()).collect()
    }

    async fn fetch_all(&self) -> Vec<StoreHandle> {
        let mut all: Vec<StoreHandle> = self.handles.read().await.values().cloned().collect();
        sort_handles(&mut all);
        all
    }

    async fn perform_change(&self, request: ChangeRequest) -> Result<(), StoreError> {
        self.change_count.fetch_add(1, Ordering::SeqCst);
        if self.fail_changes.load(Ordering::SeqCst) {
            return Err(StoreError::Rejected(format!("{} refused", request.kind())));
        }

        let mut handles = self.handles.write().await;
        match request {
            ChangeRequest::SetFavorite { handle, value } => {
                let entry = handles
                    .get_mut(&handle.local_identifier)
                    .ok_or_else(|| StoreError::Rejected(format!("unknown asset {}", handle.local_identifier)))?;
                entry.is_favorite = value;
            }
            ChangeRequest::Delete { handles: targets } => {
                if let Some(missing) = targets.iter().find(|h| !handles.contains_key(&h.local_identifier)) {
                    return Err(StoreError::Rejected(format!("unknown asset {}", missing.local_identifier)));
                }
                let undeletable = self.undeletable.read().await;
                let mut deleted = Vec::new();
                for target in targets {
                    let identifier = target.local_identifier;
                    if undeletable.contains(&identifier) {
                        let source = StoreError::PermissionDenied(identifier);
                        if deleted.is_empty() {
                            return Err(source);
                        }
                        return Err(StoreError::PartiallyDeleted { deleted, source: Box::new(source) });
                    }
                    handles.remove(&identifier);
                    deleted.push(identifier);
                }
            }
        }
        Ok(())
    }

    async fn request_thumbnail(
        &self,
        identifier: &str,
        size: ThumbnailSize,
        _mode: ContentMode,
    ) -> Option<Thumbnail> {
        if !self.contains(identifier).await {
            return None;
        }
        let data = self.thumbnails.read().await.get(identifier).cloned()?;
        Some(Thumbnail {
            identifier: identifier.to_string(),
            width: size.width,
            height: size.height,
            data,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MediaType;

    fn sample() -> MemoryStore {
        MemoryStore::with_handles([
            StoreHandle::new("p1", MediaType::Image),
            StoreHandle::new("p2", MediaType::Video).with_favorite(true),
        ])
    }

    #[tokio::test]
    async fn test_fetch_skips_unknown_ids() {
        let store = sample();
        let found = store
            .fetch_by_identifiers(&["p2".into(), "missing".into(), "p1".into()])
            .await;
        let ids: Vec<&str> = found.iter().map(|h| h.local_identifier.as_str()).collect();
        assert_eq!(ids, vec!["p2", "p1"]);
    }

    #[tokio::test]
    async fn test_set_favorite_updates_store() {
        let store = sample();
        let handle = store.fetch_by_identifiers(&["p1".into()]).await.remove(0);
        store
            .perform_change(ChangeRequest::SetFavorite { handle, value: true })
            .await
            .unwrap();
        let refreshed = store.fetch_by_identifiers(&["p1".into()]).await;
        assert!(refreshed[0].is_favorite);
        assert_eq!(store.change_count(), 1);
    }

    #[tokio::test]
    async fn test_delete_is_all_or_nothing() {
        let store = sample();
        let p1 = StoreHandle::new("p1", MediaType::Image);
        let ghost = StoreHandle::new("ghost", MediaType::Image);
        let result = store
            .perform_change(ChangeRequest::Delete { handles: vec![p1.clone(), ghost] })
            .await;
        assert!(matches!(result, Err(StoreError::Rejected(_))));
        assert!(store.contains("p1").await);

        store
            .perform_change(ChangeRequest::Delete { handles: vec![p1] })
            .await
            .unwrap();
        assert!(!store.contains("p1").await);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_delete_stopping_part_way() {
        let store = MemoryStore::with_handles(["p1", "p2", "p3"].map(|id| StoreHandle::new(id, MediaType::Image)));
        store.fail_delete_of("p2").await;
        let handles = store.fetch_by_identifiers(&["p1".into(), "p2".into(), "p3".into()]).await;

        let result = store.perform_change(ChangeRequest::Delete { handles }).await;

        match result {
            Err(StoreError::PartiallyDeleted { deleted, source }) => {
                assert_eq!(deleted, vec!["p1"]);
                assert!(matches!(*source, StoreError::PermissionDenied(ref id) if id == "p2"));
            }
            other => panic!("Expected PartiallyDeleted, got {other:?}"),
        }
        assert!(!store.contains("p1").await);
        assert!(store.contains("p2").await);
        assert!(store.contains("p3").await);
    }

    #[tokio::test]
    async fn test_injected_failure() {
        let store = sample();
        store.fail_changes(true);
        let handle = StoreHandle::new("p1", MediaType::Image);
        let result = store
            .perform_change(ChangeRequest::SetFavorite { handle, value: true })
            .await;
        assert!(result.is_err());
        assert!(!store.fetch_by_identifiers(&["p1".into()]).await[0].is_favorite);
    }

    #[tokio::test]
    async fn test_thumbnail_only_for_registered_bytes() {
        let store = sample();
        store.insert_thumbnail("p1", vec![1, 2, 3]).await;
        let thumb = store
            .request_thumbnail("p1", ThumbnailSize::square(50), ContentMode::AspectFill)
            .await
            .unwrap();
        assert_eq!(thumb.data, vec![1, 2, 3]);
        assert_eq!(thumb.width, 50);
        assert!(store
            .request_thumbnail("p2", ThumbnailSize::square(50), ContentMode::AspectFit)
            .await
            .is_none());
    }
}
