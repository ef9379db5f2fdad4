//! Durable photo store over the sled database and the filesystem
//!
//! Assets are registered photo files. The favorite flag lives in the
//! `assets` tree; deleting an asset removes both the record and the file.

use super::{
    sort_handles, ChangeRequest, ContentMode, MediaType, PhotoStore, StoreError, StoreHandle,
    Thumbnail, ThumbnailSize,
};
use crate::db::{AssetRecord, Database, DbError};
use chrono::Utc;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageReader};
use std::io::{Cursor, ErrorKind};
use std::path::{Path, PathBuf};
use std::sync::Arc;

const THUMBNAIL_QUALITY: u8 = 75;

/// Result of registering one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Imported {
    pub identifier: String,
    pub path: PathBuf,
    /// `false` when the file was already registered
    pub created: bool,
}

#[derive(Clone)]
pub struct LibraryStore {
    db: Arc<Database>,
}

impl LibraryStore {
    #[must_use]
    pub const fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    #[must_use]
    pub fn database(&self) -> Arc<Database> {
        Arc::clone(&self.db)
    }

    /// Register a photo file, returning its identifier
    ///
    /// Registering the same file twice returns the existing identifier.
    ///
    /// # Errors
    ///
    /// Returns `DbError::FileNotFound` if the file does not exist,
    /// `DbError::InvalidInput` if the path is a directory, or a database
    /// error if the record cannot be written.
    pub fn import<P: AsRef<Path>>(&self, path: P) -> Result<Imported, DbError> {
        let path = path.as_ref();
        let path = path
            .canonicalize()
            .map_err(|_| DbError::FileNotFound(path.display().to_string()))?;
        if !path.is_file() {
            return Err(DbError::InvalidInput(format!("Not a file: {}", path.display())));
        }

        if let Some(identifier) = self.db.find_by_path(&path)? {
            return Ok(Imported { identifier, path, created: false });
        }

        let media_type = path
            .extension()
            .and_then(|e| e.to_str())
            .map_or(MediaType::Unknown, MediaType::from_extension);
        let identifier = uuid::Uuid::new_v4().to_string().to_uppercase();
        let record = AssetRecord::new(path.clone(), media_type, Utc::now());
        self.db.insert_asset(&identifier, &record)?;

        tracing::debug!(identifier = %identifier, path = %path.display(), "Registered photo");
        Ok(Imported { identifier, path, created: true })
    }

    fn set_favorite(&self, handle: &StoreHandle, value: bool) -> Result<(), StoreError> {
        if self.db.set_favorite(&handle.local_identifier, value)? {
            Ok(())
        } else {
            Err(StoreError::Rejected(format!("unknown asset {}", handle.local_identifier)))
        }
    }

    /// Delete the files and records behind `handles`
    ///
    /// Every target is checked before anything is touched, so an unknown
    /// asset or a path that is not a file fails the whole request. Records
    /// are removed in one batch once their files are gone.
    async fn delete(&self, handles: &[StoreHandle]) -> Result<(), StoreError> {
        let mut targets = Vec::with_capacity(handles.len());
        for handle in handles {
            let identifier = handle.local_identifier.as_str();
            let record = self
                .db
                .get_asset(identifier)?
                .ok_or_else(|| StoreError::Rejected(format!("unknown asset {identifier}")))?;
            check_removable(&record.path).await?;
            targets.push((identifier, record.path));
        }

        let mut deleted: Vec<String> = Vec::with_capacity(targets.len());
        for (identifier, path) in &targets {
            if let Err(e) = remove_photo_file(identifier, path).await {
                if deleted.is_empty() {
                    return Err(e);
                }
                if let Err(db_err) = self.forget_records(&deleted) {
                    tracing::error!(error = %db_err, "Failed to drop records of deleted photos");
                }
                return Err(StoreError::PartiallyDeleted { deleted, source: Box::new(e) });
            }
            deleted.push((*identifier).to_string());
        }

        self.forget_records(&deleted)?;
        Ok(())
    }

    fn forget_records(&self, identifiers: &[String]) -> Result<(), DbError> {
        self.db.remove_assets(identifiers.iter().map(String::as_str))?;
        self.db.flush()
    }
}

async fn check_removable(path: &Path) -> Result<(), StoreError> {
    match tokio::fs::symlink_metadata(path).await {
        Ok(meta) if meta.is_dir() => {
            Err(StoreError::Rejected(format!("{} is not a file", path.display())))
        }
        Ok(_) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) if e.kind() == ErrorKind::PermissionDenied => {
            Err(StoreError::PermissionDenied(path.display().to_string()))
        }
        Err(e) => Err(e.into()),
    }
}

async fn remove_photo_file(identifier: &str, path: &Path) -> Result<(), StoreError> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::warn!(identifier, path = %path.display(), "Photo file already gone");
            Ok(())
        }
        Err(e) if e.kind() == ErrorKind::PermissionDenied => {
            Err(StoreError::PermissionDenied(path.display().to_string()))
        }
        Err(e) => Err(e.into()),
    }
}

#[async_trait::async_trait]
impl PhotoStore for LibraryStore {
    async fn fetch_by_identifiers(&self, ids: &[String]) -> Vec<StoreHandle> {
        ids.iter()
            .filter_map(|id| match self.db.get_asset(id) {
                Ok(record) => record.map(|r| r.to_handle(id)),
                Err(e) => {
                    tracing::warn!(identifier = %id, error = %e, "Failed to read asset record");
                    None
                }
            })
            .collect()
    }

    async fn fetch_all(&self) -> Vec<StoreHandle> {
        let mut handles: Vec<StoreHandle> = match self.db.list_assets() {
            Ok(assets) => assets.iter().map(|(id, record)| record.to_handle(id)).collect(),
            Err(e) => {
                tracing::error!(error = %e, "Failed to list library assets");
                Vec::new()
            }
        };
        sort_handles(&mut handles);
        handles
    }

    async fn perform_change(&self, request: ChangeRequest) -> Result<(), StoreError> {
        tracing::debug!(kind = request.kind(), "Applying change request");
        match request {
            ChangeRequest::SetFavorite { handle, value } => self.set_favorite(&handle, value),
            ChangeRequest::Delete { handles } => self.delete(&handles).await,
        }
    }

    async fn request_thumbnail(
        &self,
        identifier: &str,
        size: ThumbnailSize,
        mode: ContentMode,
    ) -> Option<Thumbnail> {
        let record = self.db.get_asset(identifier).ok().flatten()?;
        if record.media_type != MediaType::Image {
            return None;
        }

        let path = record.path;
        let rendered = tokio::task::spawn_blocking(move || render_thumbnail(&path, size, mode))
            .await
            .ok()?;

        match rendered {
            Ok((width, height, data)) => Some(Thumbnail {
                identifier: identifier.to_string(),
                width,
                height,
                data,
            }),
            Err(e) => {
                tracing::warn!(identifier, error = %e, "Failed to render thumbnail");
                None
            }
        }
    }
}

fn render_thumbnail(
    path: &Path,
    size: ThumbnailSize,
    mode: ContentMode,
) -> image::ImageResult<(u32, u32, Vec<u8>)> {
    let img = ImageReader::open(path)?.with_guessed_format()?.decode()?;
    let img = match mode {
        ContentMode::AspectFit => img.resize(size.width, size.height, FilterType::Triangle),
        ContentMode::AspectFill => img.resize_to_fill(size.width, size.height, FilterType::Triangle),
    };
    let img = DynamicImage::ImageRgb8(img.to_rgb8());

    let mut buffer = Cursor::new(Vec::new());
    img.write_with_encoder(JpegEncoder::new_with_quality(&mut buffer, THUMBNAIL_QUALITY))?;
    Ok((img.width(), img.height(), buffer.into_inner()))
}
