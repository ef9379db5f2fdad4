//! Testing utilities for photag
//!
//! Helper types for writing tests: a `TestDb` wrapper for temporary database
//! management, photo file fixtures and handle builders.
//!
//! Only available when compiled with `cfg(test)`.

use crate::asset::Asset;
use crate::db::Database;
use crate::store::{MediaType, StoreHandle};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Wrapper for a temporary test database that cleans up on drop
///
/// The database lives in its own temporary directory, which is removed when
/// the wrapper goes out of scope.
pub struct TestDb {
    // Field order matters: the database must be dropped before its directory.
    db: Database,
    path: PathBuf,
    dir: TempDir,
}

impl TestDb {
    /// Create a fresh, empty test database
    ///
    /// # Panics
    /// Panics if the temporary directory or the database cannot be created.
    #[must_use]
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("db");
        let db = Database::open(&path).expect("Failed to open test database");
        Self { db, path, dir }
    }

    /// Get a reference to the underlying database
    #[must_use]
    pub const fn db(&self) -> &Database {
        &self.db
    }

    /// Consume the wrapper, returning the database and the guard that keeps its directory alive
    #[must_use]
    pub fn into_parts(self) -> (Database, TempDir) {
        (self.db, self.dir)
    }

    /// Get the path to the test database
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for TestDb {
    fn default() -> Self {
        Self::new()
    }
}

/// Write a small valid PNG image of the given size
///
/// # Panics
/// Panics if the image cannot be written.
pub fn write_test_png(path: impl AsRef<Path>, width: u32, height: u32) {
    let img = image::RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    img.save(path.as_ref()).expect("Failed to write test image");
}

/// Image handle with the given identifier
#[must_use]
pub fn handle(identifier: &str) -> StoreHandle {
    StoreHandle::new(identifier, MediaType::Image)
}

/// Assets backed by image handles, indexed in order
#[must_use]
pub fn assets(identifiers: &[&str]) -> Vec<Asset> {
    identifiers
        .iter()
        .enumerate()
        .map(|(i, id)| Asset::from_handle(handle(id), Some(i), None))
        .collect()
}
