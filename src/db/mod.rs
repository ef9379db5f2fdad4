//! Database wrapper module for photag
//!
//! Provides a clean API for storing library assets and their class labels
//! using sled as the embedded database backend.
//!
//! Uses two sled trees:
//! - `assets`: asset identifier -> `AssetRecord` (path, favorite flag, media type)
//! - `labels`: asset identifier -> class label
//!
//! Labels are keyed by identifier alone, so a label survives for assets that
//! live in an external store this database knows nothing about.

use sled::{Batch, Db, Tree};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

pub mod error;
pub mod types;

pub use error::DbError;
pub use types::{AssetKey, AssetRecord};

/// Database wrapper that encapsulates all database operations
pub struct Database {
    db: Db,
    assets: Tree, // identifier -> AssetRecord
    labels: Tree, // identifier -> label
}

impl Database {
    /// Opens or creates a database at the specified path
    ///
    /// # Examples
    /// ```no_run
    /// use photag::db::Database;
    /// let db = Database::open("my_library").unwrap();
    /// ```
    ///
    /// # Errors
    ///
    /// Returns `DbError` if the database cannot be opened or if the internal trees cannot be created.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, DbError> {
        let db = sled::open(path)?;
        let assets = db.open_tree("assets")?;
        let labels = db.open_tree("labels")?;
        Ok(Self { db, assets, labels })
    }

    /// Insert or replace the record of an asset
    ///
    /// # Errors
    ///
    /// Returns `DbError` if the identifier is blank, encoding fails or the write fails.
    pub fn insert_asset(&self, identifier: &str, record: &AssetRecord) -> Result<(), DbError> {
        let key = AssetKey::new(identifier)?;
        self.assets.insert(key.as_bytes(), record.to_bytes()?)?;
        Ok(())
    }

    /// Get the record of an asset
    ///
    /// # Returns
    /// * `Some(AssetRecord)` if the asset is registered
    /// * `None` if the identifier is unknown
    ///
    /// # Errors
    ///
    /// Returns `DbError` if database operations fail or deserialization errors occur.
    pub fn get_asset(&self, identifier: &str) -> Result<Option<AssetRecord>, DbError> {
        let key = AssetKey::new(identifier)?;
        match self.assets.get(key.as_bytes())? {
            Some(value) => Ok(Some(AssetRecord::from_bytes(&value)?)),
            None => Ok(None),
        }
    }

    /// Set the favorite flag of an asset
    ///
    /// # Returns
    /// `false` if the asset is not registered
    ///
    /// # Errors
    ///
    /// Returns `DbError` if database operations fail or (de)serialization errors occur.
    pub fn set_favorite(&self, identifier: &str, is_favorite: bool) -> Result<bool, DbError> {
        let Some(mut record) = self.get_asset(identifier)? else {
            return Ok(false);
        };
        record.is_favorite = is_favorite;
        self.insert_asset(identifier, &record)?;
        Ok(true)
    }

    /// List every registered asset with its identifier
    ///
    /// # Errors
    ///
    /// Returns `DbError` if database iteration fails or deserialization errors occur.
    pub fn list_assets(&self) -> Result<Vec<(String, AssetRecord)>, DbError> {
        let mut assets = Vec::new();
        for result in &self.assets {
            let (key, value) = result?;
            let identifier = AssetKey::from_bytes(&key)?.into_string();
            assets.push((identifier, AssetRecord::from_bytes(&value)?));
        }
        Ok(assets)
    }

    /// Find the identifier registered for a file path
    ///
    /// # Errors
    ///
    /// Returns `DbError` if database iteration fails or deserialization errors occur.
    pub fn find_by_path<P: AsRef<Path>>(&self, path: P) -> Result<Option<String>, DbError> {
        let path = path.as_ref();
        Ok(self
            .list_assets()?
            .into_iter()
            .find(|(_, record)| record.path == path)
            .map(|(identifier, _)| identifier))
    }

    /// Get the number of registered assets
    #[must_use]
    pub fn count(&self) -> usize {
        self.assets.len()
    }

    /// Check if an asset is registered
    ///
    /// # Errors
    ///
    /// Returns `DbError` if the identifier is blank or the lookup fails.
    pub fn contains(&self, identifier: &str) -> Result<bool, DbError> {
        let key = AssetKey::new(identifier)?;
        Ok(self.assets.contains_key(key.as_bytes())?)
    }

    /// Get the class label of an asset
    ///
    /// # Errors
    ///
    /// Returns `DbError` if database operations fail or deserialization errors occur.
    pub fn get_label(&self, identifier: &str) -> Result<Option<String>, DbError> {
        let key = AssetKey::new(identifier)?;
        match self.labels.get(key.as_bytes())? {
            Some(value) => Ok(Some(decode_label(&value)?)),
            None => Ok(None),
        }
    }

    /// Write a set of label changes as one atomic batch
    ///
    /// `Some(label)` stores the label, `None` removes any stored label.
    /// Either every change lands or none does.
    ///
    /// # Returns
    /// Number of labels stored (removals not counted)
    ///
    /// # Errors
    ///
    /// Returns `DbError` if an identifier is blank, encoding fails or the batch cannot be applied.
    pub fn apply_labels<'a, I>(&self, changes: I) -> Result<usize, DbError>
    where
        I: IntoIterator<Item = (&'a str, Option<&'a str>)>,
    {
        let mut batch = Batch::default();
        let mut stored = 0;

        for (identifier, label) in changes {
            let key = AssetKey::new(identifier)?;
            match label {
                Some(label) => {
                    let value = bincode::encode_to_vec(label, bincode::config::standard())?;
                    batch.insert(key.as_bytes(), value);
                    stored += 1;
                }
                None => batch.remove(key.as_bytes()),
            }
        }

        self.labels.apply_batch(batch)?;
        Ok(stored)
    }

    /// Remove the labels of the given assets in one batch
    ///
    /// # Errors
    ///
    /// Returns `DbError` if an identifier is blank or the batch cannot be applied.
    pub fn remove_labels(&self, identifiers: &[String]) -> Result<(), DbError> {
        self.apply_labels(identifiers.iter().map(|id| (id.as_str(), None)))?;
        Ok(())
    }

    /// All stored labels, keyed by asset identifier
    ///
    /// # Errors
    ///
    /// Returns `DbError` if database iteration fails or deserialization errors occur.
    pub fn list_labels(&self) -> Result<HashMap<String, String>, DbError> {
        let mut labels = HashMap::new();
        for result in &self.labels {
            let (key, value) = result?;
            labels.insert(AssetKey::from_bytes(&key)?.into_string(), decode_label(&value)?);
        }
        Ok(labels)
    }

    /// Identifiers of all assets carrying exactly `label`, sorted
    ///
    /// # Errors
    ///
    /// Returns `DbError` if database iteration fails or deserialization errors occur.
    pub fn find_by_label(&self, label: &str) -> Result<Vec<String>, DbError> {
        let mut ids: Vec<String> = self
            .list_labels()?
            .into_iter()
            .filter(|(_, l)| l == label)
            .map(|(id, _)| id)
            .collect();
        ids.sort();
        Ok(ids)
    }

    /// Every distinct label with the number of assets using it, sorted by label
    ///
    /// # Errors
    ///
    /// Returns `DbError` if database iteration fails or deserialization errors occur.
    pub fn label_counts(&self) -> Result<Vec<(String, usize)>, DbError> {
        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        for label in self.list_labels()?.into_values() {
            *counts.entry(label).or_default() += 1;
        }
        Ok(counts.into_iter().collect())
    }

    /// Flush all pending writes to disk
    ///
    /// # Errors
    ///
    /// Returns `DbError` if the flush operation fails.
    pub fn flush(&self) -> Result<(), DbError> {
        self.db.flush()?;
        Ok(())
    }

    /// Remove the records of several assets in one atomic batch. Labels are left alone.
    ///
    /// # Errors
    ///
    /// Returns `DbError` if an identifier is blank or the batch cannot be applied.
    pub fn remove_assets<'a, I>(&self, identifiers: I) -> Result<(), DbError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut batch = Batch::default();
        for identifier in identifiers {
            batch.remove(AssetKey::new(identifier)?.as_bytes());
        }
        self.assets.apply_batch(batch)?;
        Ok(())
    }
}

fn decode_label(bytes: &[u8]) -> Result<String, DbError> {
    let (label, _): (String, usize) = bincode::decode_from_slice(bytes, bincode::config::standard())?;
    Ok(label)
}

impl Drop for Database {
    fn drop(&mut self) {
        // Best-effort flush; callers needing durability call flush() themselves.
        let _ = self.db.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MediaType;
    use crate::testing::TestDb;
    use chrono::Utc;
    use std::path::PathBuf;

    fn record(path: &str) -> AssetRecord {
        AssetRecord::new(PathBuf::from(path), MediaType::Image, Utc::now())
    }

    #[test]
    fn test_create_database() {
        let test_db = TestDb::new();
        assert_eq!(test_db.db().count(), 0);
        assert!(test_db.path().exists());
    }

    #[test]
    fn test_insert_and_get_asset() {
        let test_db = TestDb::new();
        let db = test_db.db();

        db.insert_asset("p1", &record("/photos/a.jpg")).unwrap();

        assert_eq!(db.count(), 1);
        assert!(db.contains("p1").unwrap());
        assert_eq!(db.get_asset("p1").unwrap().unwrap().path, PathBuf::from("/photos/a.jpg"));
        assert!(db.get_asset("p2").unwrap().is_none());
    }

    #[test]
    fn test_blank_identifier_rejected() {
        let test_db = TestDb::new();
        let result = test_db.db().insert_asset(" ", &record("/photos/a.jpg"));
        assert!(matches!(result, Err(DbError::InvalidInput(_))));
    }

    #[test]
    fn test_set_favorite() {
        let test_db = TestDb::new();
        let db = test_db.db();
        db.insert_asset("p1", &record("/photos/a.jpg")).unwrap();

        assert!(db.set_favorite("p1", true).unwrap());
        assert!(db.get_asset("p1").unwrap().unwrap().is_favorite);
        assert!(!db.set_favorite("unknown", true).unwrap());
    }

    #[test]
    fn test_find_by_path() {
        let test_db = TestDb::new();
        let db = test_db.db();
        db.insert_asset("p1", &record("/photos/a.jpg")).unwrap();
        db.insert_asset("p2", &record("/photos/b.jpg")).unwrap();

        assert_eq!(db.find_by_path("/photos/b.jpg").unwrap(), Some("p2".to_string()));
        assert_eq!(db.find_by_path("/photos/c.jpg").unwrap(), None);
    }

    #[test]
    fn test_apply_labels_upserts_and_removes() {
        let test_db = TestDb::new();
        let db = test_db.db();

        let stored = db
            .apply_labels([("p1", Some("cat")), ("p2", Some("dog")), ("p3", Some("cat"))])
            .unwrap();
        assert_eq!(stored, 3);

        let stored = db.apply_labels([("p1", Some("sunset")), ("p2", None)]).unwrap();
        assert_eq!(stored, 1);

        let labels = db.list_labels().unwrap();
        assert_eq!(labels.len(), 2);
        assert_eq!(labels["p1"], "sunset");
        assert_eq!(labels["p3"], "cat");
    }

    #[test]
    fn test_apply_labels_is_atomic_on_bad_key() {
        let test_db = TestDb::new();
        let db = test_db.db();

        let result = db.apply_labels([("p1", Some("cat")), ("", Some("dog"))]);
        assert!(result.is_err());
        assert!(db.list_labels().unwrap().is_empty());
    }

    #[test]
    fn test_find_by_label_and_counts() {
        let test_db = TestDb::new();
        let db = test_db.db();
        db.apply_labels([("b", Some("cat")), ("a", Some("cat")), ("c", Some("dog"))])
            .unwrap();

        assert_eq!(db.find_by_label("cat").unwrap(), vec!["a".to_string(), "b".to_string()]);
        assert!(db.find_by_label("bird").unwrap().is_empty());
        assert_eq!(
            db.label_counts().unwrap(),
            vec![("cat".to_string(), 2), ("dog".to_string(), 1)]
        );
    }

    #[test]
    fn test_remove_labels() {
        let test_db = TestDb::new();
        let db = test_db.db();
        db.apply_labels([("a", Some("cat")), ("b", Some("dog"))]).unwrap();

        db.remove_labels(&["a".to_string()]).unwrap();
        assert_eq!(db.get_label("a").unwrap(), None);
        assert_eq!(db.get_label("b").unwrap(), Some("dog".to_string()));
    }

    #[test]
    fn test_reopen_existing_database() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("library");

        {
            let db = Database::open(&path).unwrap();
            db.insert_asset("p1", &record("/photos/a.jpg")).unwrap();
            db.apply_labels([("p1", Some("saved"))]).unwrap();
            db.flush().unwrap();
        }

        let db = Database::open(&path).unwrap();
        assert_eq!(db.count(), 1);
        assert_eq!(db.get_label("p1").unwrap(), Some("saved".to_string()));
    }

    #[test]
    fn test_remove_assets_batch() {
        let test_db = TestDb::new();
        let db = test_db.db();
        db.insert_asset("p1", &record("/photos/a.jpg")).unwrap();
        db.insert_asset("p2", &record("/photos/b.jpg")).unwrap();
        db.insert_asset("p3", &record("/photos/c.jpg")).unwrap();
        db.apply_labels([("p1", Some("cat"))]).unwrap();

        db.remove_assets(["p1", "p3"]).unwrap();
        assert_eq!(db.count(), 1);
        assert!(db.contains("p2").unwrap());
        assert_eq!(db.get_label("p1").unwrap(), Some("cat".to_string()));

        assert!(db.remove_assets(["p2", " "]).is_err());
        assert!(db.contains("p2").unwrap());
    }
}
