//! Label persistence boundary
//!
//! Class labels are the only asset data this crate owns. They are written as
//! one batch per assignment so a crash loses a whole assignment or nothing.

use crate::asset::Asset;
use crate::db::{Database, DbError};
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LabelStoreError {
    #[error("Database error: {0}")]
    Db(#[from] DbError),

    #[error("Label store unavailable: {0}")]
    Unavailable(String),
}

/// Durable storage for class labels
pub trait LabelStore: Send + Sync {
    /// Write the labels of all given assets in one batch
    ///
    /// Assets without a label have any stored label removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the batch could not be written; nothing is stored then.
    fn persist(&self, assets: &[Asset]) -> Result<usize, LabelStoreError>;

    /// All stored labels keyed by asset identifier
    ///
    /// # Errors
    ///
    /// Returns an error if the labels cannot be read.
    fn load_labels(&self) -> Result<HashMap<String, String>, LabelStoreError>;

    /// Drop the stored labels of the given assets
    ///
    /// # Errors
    ///
    /// Returns an error if the labels cannot be removed.
    fn forget(&self, identifiers: &[String]) -> Result<(), LabelStoreError>;

    /// Identifiers carrying exactly `label`, sorted
    ///
    /// # Errors
    ///
    /// Returns an error if the labels cannot be read.
    fn find_by_label(&self, label: &str) -> Result<Vec<String>, LabelStoreError> {
        let mut ids: Vec<String> = self
            .load_labels()?
            .into_iter()
            .filter(|(_, l)| l == label)
            .map(|(id, _)| id)
            .collect();
        ids.sort();
        Ok(ids)
    }
}

impl LabelStore for Database {
    fn persist(&self, assets: &[Asset]) -> Result<usize, LabelStoreError> {
        let stored = self.apply_labels(
            assets
                .iter()
                .map(|a| (a.identifier(), a.class_label.as_deref())),
        )?;
        self.flush()?;
        Ok(stored)
    }

    fn load_labels(&self) -> Result<HashMap<String, String>, LabelStoreError> {
        Ok(self.list_labels()?)
    }

    fn forget(&self, identifiers: &[String]) -> Result<(), LabelStoreError> {
        self.remove_labels(identifiers)?;
        Ok(())
    }

    fn find_by_label(&self, label: &str) -> Result<Vec<String>, LabelStoreError> {
        Ok(Database::find_by_label(self, label)?)
    }
}

/// Label store kept in memory, counting persist calls
#[derive(Debug, Default)]
pub struct MemoryLabelStore {
    labels: Mutex<HashMap<String, String>>,
    persist_count: AtomicUsize,
    fail: AtomicBool,
}

impl MemoryLabelStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_labels<I, K, V>(labels: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            labels: Mutex::new(labels.into_iter().map(|(k, v)| (k.into(), v.into())).collect()),
            ..Self::default()
        }
    }

    /// Number of `persist` calls received, failed ones included
    #[must_use]
    pub fn persist_count(&self) -> usize {
        self.persist_count.load(Ordering::SeqCst)
    }

    /// Make every following write fail
    pub fn fail_writes(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    fn guard(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>, LabelStoreError> {
        self.labels
            .lock()
            .map_err(|_| LabelStoreError::Unavailable("label map poisoned".into()))
    }

    fn check_writable(&self) -> Result<(), LabelStoreError> {
        if self.fail.load(Ordering::SeqCst) {
            Err(LabelStoreError::Unavailable("writes disabled".into()))
        } else {
            Ok(())
        }
    }
}

impl LabelStore for MemoryLabelStore {
    fn persist(&self, assets: &[Asset]) -> Result<usize, LabelStoreError> {
        self.persist_count.fetch_add(1, Ordering::SeqCst);
        self.check_writable()?;

        let mut labels = self.guard()?;
        let mut stored = 0;
        for asset in assets {
            match &asset.class_label {
                Some(label) => {
                    labels.insert(asset.identifier().to_string(), label.clone());
                    stored += 1;
                }
                None => {
                    labels.remove(asset.identifier());
                }
            }
        }
        Ok(stored)
    }

    fn load_labels(&self) -> Result<HashMap<String, String>, LabelStoreError> {
        Ok(self.guard()?.clone())
    }

    fn forget(&self, identifiers: &[String]) -> Result<(), LabelStoreError> {
        self.check_writable()?;
        let mut labels = self.guard()?;
        for id in identifiers {
            labels.remove(id);
        }
        Ok(())
    }
}
