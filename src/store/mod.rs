//! Photo store boundary
//!
//! The photo library is owned by something outside this crate: the device's
//! managed library, or the sled-backed [`LibraryStore`] shipped here. The core
//! only talks to it through the [`PhotoStore`] trait, which is injected into
//! every operation that needs it.
//!
//! # Contract
//!
//! - Fetches are best effort. Unknown identifiers are skipped, never reported
//!   as errors.
//! - Changes always resolve to a definitive `Ok` or `Err`.
//! - Thumbnail requests yield an image or nothing.

mod library;
mod memory;
mod timeout;

pub use library::{Imported, LibraryStore};
pub use memory::MemoryStore;
pub use timeout::TimeoutStore;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Kind of media an asset holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, bincode::Encode, bincode::Decode)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    #[default]
    Unknown,
    Image,
    Video,
    Audio,
}

impl MediaType {
    /// Guess the media type from a file extension (case-insensitive)
    #[must_use]
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" | "png" | "gif" | "heic" | "heif" | "webp" | "tif" | "tiff" | "bmp"
            | "dng" | "raw" | "cr2" | "nef" | "arw" => Self::Image,
            "mov" | "mp4" | "m4v" | "avi" | "mkv" | "3gp" => Self::Video,
            "mp3" | "m4a" | "aac" | "wav" | "flac" => Self::Audio,
            _ => Self::Unknown,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Image => "image",
            Self::Video => "video",
            Self::Audio => "audio",
        }
    }
}

impl std::fmt::Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot of the store's record for one asset
///
/// A handle does not track later changes. After a mutation the caller has to
/// fetch a fresh handle to observe the new state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreHandle {
    pub local_identifier: String,
    pub is_favorite: bool,
    pub media_type: MediaType,
    pub path: Option<PathBuf>,
    pub created_at: Option<DateTime<Utc>>,
}

impl StoreHandle {
    #[must_use]
    pub fn new(local_identifier: impl Into<String>, media_type: MediaType) -> Self {
        Self {
            local_identifier: local_identifier.into(),
            is_favorite: false,
            media_type,
            path: None,
            created_at: None,
        }
    }

    #[must_use]
    pub const fn with_favorite(mut self, is_favorite: bool) -> Self {
        self.is_favorite = is_favorite;
        self
    }

    #[must_use]
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    #[must_use]
    pub const fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }
}

/// A mutation submitted to the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeRequest {
    SetFavorite { handle: StoreHandle, value: bool },
    Delete { handles: Vec<StoreHandle> },
}

impl ChangeRequest {
    /// Short name used in log records
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::SetFavorite { .. } => "set-favorite",
            Self::Delete { .. } => "delete",
        }
    }
}

/// How a thumbnail is fitted into the requested box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContentMode {
    /// Scale down until the whole image fits, keeping the aspect ratio
    #[default]
    AspectFit,
    /// Scale and crop so the box is completely covered
    AspectFill,
}

/// Target box for a thumbnail, in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThumbnailSize {
    pub width: u32,
    pub height: u32,
}

impl ThumbnailSize {
    #[must_use]
    pub const fn square(side: u32) -> Self {
        Self { width: side, height: side }
    }
}

/// Encoded thumbnail image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Thumbnail {
    pub identifier: String,
    pub width: u32,
    pub height: u32,
    /// JPEG bytes
    pub data: Vec<u8>,
}

/// Errors reported by a photo store when a change cannot be applied
#[derive(Debug, Error)]
pub enum StoreError {
    /// The asset has no live handle, so nothing can be submitted
    #[error("Asset {0} is not backed by the photo store")]
    Unresolved(String),

    /// The store refused the change (permissions, read-only library)
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// The store rejected the change request itself
    #[error("Change request rejected: {0}")]
    Rejected(String),

    /// The store did not answer in time
    #[error("Photo store timed out after {0:?}")]
    Timeout(std::time::Duration),

    /// A delete stopped part way; the listed assets are gone for good
    #[error("Deleted {} asset(s) before failing: {source}", .deleted.len())]
    PartiallyDeleted {
        deleted: Vec<String>,
        source: Box<StoreError>,
    },

    #[error("Database error: {0}")]
    Db(#[from] crate::db::DbError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Capability to read and mutate the photo library
#[async_trait::async_trait]
pub trait PhotoStore: Send + Sync {
    /// Resolve identifiers to handles. Unknown identifiers are skipped.
    async fn fetch_by_identifiers(&self, ids: &[String]) -> Vec<StoreHandle>;

    /// Every asset in the library, oldest first
    async fn fetch_all(&self) -> Vec<StoreHandle>;

    /// Apply a change request. Resolves to a definitive outcome.
    async fn perform_change(&self, request: ChangeRequest) -> Result<(), StoreError>;

    /// Render a thumbnail for an asset, if the store can produce one
    async fn request_thumbnail(
        &self,
        identifier: &str,
        size: ThumbnailSize,
        mode: ContentMode,
    ) -> Option<Thumbnail>;
}

/// Order handles oldest first, falling back to identifier order
pub(crate) fn sort_handles(handles: &mut [StoreHandle]) {
    handles.sort_by(|a, b| {
        a.created_at
            .cmp(&b.created_at)
            .then_with(|| a.local_identifier.cmp(&b.local_identifier))
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_type_from_extension() {
        assert_eq!(MediaType::from_extension("JPG"), MediaType::Image);
        assert_eq!(MediaType::from_extension("heic"), MediaType::Image);
        assert_eq!(MediaType::from_extension("mov"), MediaType::Video);
        assert_eq!(MediaType::from_extension("m4a"), MediaType::Audio);
        assert_eq!(MediaType::from_extension("txt"), MediaType::Unknown);
    }

    #[test]
    fn test_change_request_kind() {
        let handle = StoreHandle::new("a", MediaType::Image);
        let fav = ChangeRequest::SetFavorite { handle: handle.clone(), value: true };
        let del = ChangeRequest::Delete { handles: vec![handle] };
        assert_eq!(fav.kind(), "set-favorite");
        assert_eq!(del.kind(), "delete");
    }

    #[test]
    fn test_sort_handles_by_creation_then_id() {
        let t0 = DateTime::from_timestamp(0, 0).unwrap();
        let t1 = DateTime::from_timestamp(10, 0).unwrap();
        let mut handles = vec![
            StoreHandle::new("b", MediaType::Image).with_created_at(t1),
            StoreHandle::new("c", MediaType::Image).with_created_at(t0),
            StoreHandle::new("a", MediaType::Image).with_created_at(t1),
        ];
        sort_handles(&mut handles);
        let ids: Vec<&str> = handles.iter().map(|h| h.local_identifier.as_str()).collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_store_error_display() {
        let err = StoreError::Unresolved("p1".into());
        assert_eq!(err.to_string(), "Asset p1 is not backed by the photo store");
    }
}
