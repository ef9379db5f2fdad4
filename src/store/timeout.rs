//! Per-call deadline for a photo store
//!
//! Wraps another store and bounds every call with `tokio::time::timeout`.
//! A change that runs out of time reports `StoreError::Timeout`; the request
//! may still complete inside the wrapped store afterwards.

use super::{ChangeRequest, ContentMode, PhotoStore, StoreError, StoreHandle, Thumbnail, ThumbnailSize};
use std::time::Duration;
use tokio::time::timeout;

pub struct TimeoutStore<S> {
    inner: S,
    limit: Duration,
}

impl<S: PhotoStore> TimeoutStore<S> {
    #[must_use]
    pub const fn new(inner: S, limit: Duration) -> Self {
        Self { inner, limit }
    }

    #[must_use]
    pub const fn inner(&self) -> &S {
        &self.inner
    }
}

#[async_trait::async_trait]
impl<S: PhotoStore> PhotoStore for TimeoutStore<S> {
    async fn fetch_by_identifiers(&self, ids: &[String]) -> Vec<StoreHandle> {
        timeout(self.limit, self.inner.fetch_by_identifiers(ids))
            .await
            .unwrap_or_else(|_| {
                tracing::warn!(count = ids.len(), limit = ?self.limit, "Fetch timed out");
                Vec::new()
            })
    }

    async fn fetch_all(&self) -> Vec<StoreHandle> {
        timeout(self.limit, self.inner.fetch_all())
            .await
            .unwrap_or_else(|_| {
                tracing::warn!(limit = ?self.limit, "Library listing timed out");
                Vec::new()
            })
    }

    async fn perform_change(&self, request: ChangeRequest) -> Result<(), StoreError> {
        let kind = request.kind();
        match timeout(self.limit, self.inner.perform_change(request)).await {
            Ok(result) => result,
            Err(_) => {
                tracing::error!(kind, limit = ?self.limit, "Change request timed out");
                Err(StoreError::Timeout(self.limit))
            }
        }
    }

    async fn request_thumbnail(
        &self,
        identifier: &str,
        size: ThumbnailSize,
        mode: ContentMode,
    ) -> Option<Thumbnail> {
        timeout(self.limit, self.inner.request_thumbnail(identifier, size, mode))
            .await
            .ok()
            .flatten()
    }
}
