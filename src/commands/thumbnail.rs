//! Thumbnail command - render a photo to a JPEG file

use crate::store::{ContentMode, PhotoStore, ThumbnailSize};
use crate::PhotagError;
use std::path::Path;

type Result<T> = std::result::Result<T, PhotagError>;

/// Execute the thumbnail command
///
/// # Errors
/// Returns an error if the store cannot produce a thumbnail or the file cannot be written.
pub async fn execute(
    photos: &dyn PhotoStore,
    id: &str,
    size: u32,
    fill: bool,
    output: &Path,
    quiet: bool,
) -> Result<()> {
    if size == 0 {
        return Err(PhotagError::InvalidInput("Thumbnail size must be positive".into()));
    }

    let mode = if fill { ContentMode::AspectFill } else { ContentMode::AspectFit };
    let thumbnail = photos
        .request_thumbnail(id, ThumbnailSize::square(size), mode)
        .await
        .ok_or_else(|| PhotagError::ActionFailed(format!("No thumbnail available for {id}")))?;

    tokio::fs::write(output, &thumbnail.data).await?;
    if !quiet {
        println!(
            "Wrote {}x{} thumbnail to {}",
            thumbnail.width,
            thumbnail.height,
            output.display()
        );
    }
    Ok(())
}
