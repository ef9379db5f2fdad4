//! Photo asset entity
//!
//! An [`Asset`] is the in-memory view of one photo: the store's identifier, an
//! optional snapshot handle of the store record, and the class label owned by
//! this application.
//!
//! Equality deliberately ignores the label. Two assets are the same visible
//! item when their identifier and favorite state agree, so list diffing reacts
//! to favorite toggles but not to labelling.

use crate::store::{ChangeRequest, MediaType, PhotoStore, StoreError, StoreHandle};
use std::hash::{Hash, Hasher};

/// One photo from the external store plus its app-owned label
#[derive(Debug, Clone)]
pub struct Asset {
    identifier: String,
    /// Position hint for ordering and log output
    pub display_index: Option<usize>,
    handle: Option<StoreHandle>,
    /// Free-text class label, the only field persisted by this crate
    pub class_label: Option<String>,
}

impl Asset {
    /// Build an asset from a store handle
    #[must_use]
    pub fn from_handle(handle: StoreHandle, display_index: Option<usize>, class_label: Option<String>) -> Self {
        Self {
            identifier: handle.local_identifier.clone(),
            display_index,
            handle: Some(handle),
            class_label,
        }
    }

    /// Build an asset from a bare identifier, resolving it against the store
    ///
    /// When the store cannot resolve the identifier the asset has no handle and
    /// its store-derived properties fall back to defaults.
    pub async fn from_identifier(
        store: &dyn PhotoStore,
        identifier: impl Into<String>,
        class_label: Option<String>,
    ) -> Self {
        let identifier = identifier.into();
        let handle = store
            .fetch_by_identifiers(std::slice::from_ref(&identifier))
            .await
            .into_iter()
            .next();
        if handle.is_none() {
            tracing::debug!(identifier = %identifier, "Asset not resolvable in photo store");
        }
        Self {
            identifier,
            display_index: None,
            handle,
            class_label,
        }
    }

    /// Build an asset that is not backed by the store at all
    #[must_use]
    pub fn detached(identifier: impl Into<String>, class_label: Option<String>) -> Self {
        Self {
            identifier: identifier.into(),
            display_index: None,
            handle: None,
            class_label,
        }
    }

    #[must_use]
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    #[must_use]
    pub const fn handle(&self) -> Option<&StoreHandle> {
        self.handle.as_ref()
    }

    /// Swap in a fresher store snapshot. The identifier never changes, so a
    /// handle for another asset is ignored.
    pub fn refresh_handle(&mut self, handle: StoreHandle) {
        if handle.local_identifier == self.identifier {
            self.handle = Some(handle);
        }
    }

    #[must_use]
    pub fn is_favorite(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| h.is_favorite)
    }

    #[must_use]
    pub fn media_type(&self) -> MediaType {
        self.handle.as_ref().map_or(MediaType::Unknown, |h| h.media_type)
    }

    #[must_use]
    pub fn accessibility_label(&self) -> &'static str {
        if self.is_favorite() {
            "Photo, Favorite"
        } else {
            "Photo"
        }
    }

    /// Ask the store to change the favorite flag
    ///
    /// The in-memory asset is not touched; fetch a fresh handle to see the
    /// result. Failures are logged and returned, callers may drop them.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Unresolved` when the asset has no handle, or the
    /// store's error when the change is refused.
    pub async fn set_favorite(&self, store: &dyn PhotoStore, value: bool) -> Result<(), StoreError> {
        let handle = self.require_handle()?;
        let request = ChangeRequest::SetFavorite { handle: handle.clone(), value };
        store.perform_change(request).await.inspect_err(|e| {
            tracing::error!(identifier = %self.identifier, error = %e, "Failed to change favorite");
        })
    }

    /// Ask the store to delete this asset permanently
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Unresolved` when the asset has no handle, or the
    /// store's error when the deletion is refused.
    pub async fn delete(&self, store: &dyn PhotoStore) -> Result<(), StoreError> {
        let handle = self.require_handle()?;
        let request = ChangeRequest::Delete { handles: vec![handle.clone()] };
        match store.perform_change(request).await {
            Ok(()) => {
                tracing::debug!(index = self.log_index(), identifier = %self.identifier, "Asset deleted");
                Ok(())
            }
            Err(e) => {
                tracing::error!(identifier = %self.identifier, error = %e, "Failed to delete asset");
                Err(e)
            }
        }
    }

    fn require_handle(&self) -> Result<&StoreHandle, StoreError> {
        self.handle.as_ref().ok_or_else(|| {
            tracing::error!(identifier = %self.identifier, "No store handle for asset");
            StoreError::Unresolved(self.identifier.clone())
        })
    }

    #[allow(clippy::cast_possible_wrap)]
    fn log_index(&self) -> i64 {
        self.display_index.map_or(-1, |i| i as i64)
    }
}

impl PartialEq for Asset {
    fn eq(&self, other: &Self) -> bool {
        self.identifier == other.identifier && self.is_favorite() == other.is_favorite()
    }
}

impl Eq for Asset {}

impl Hash for Asset {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identifier.hash(state);
    }
}
