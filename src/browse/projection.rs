//! Ordered list of the assets currently on display
//!
//! The projection only changes through its own methods: wholesale
//! replacement after a load, label writes and targeted per-asset updates.
//! Every change bumps a revision published on a `watch` channel so a
//! presentation layer can redraw.

use super::selection::SelectionSet;
use crate::asset::Asset;
use crate::store::StoreHandle;
use tokio::sync::watch;

#[derive(Debug)]
pub struct ResultProjection {
    assets: Vec<Asset>,
    revision: watch::Sender<u64>,
}

impl Default for ResultProjection {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultProjection {
    #[must_use]
    pub fn new() -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            assets: Vec::new(),
            revision,
        }
    }

    /// Receiver notified with the revision number after every change
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    #[must_use]
    pub fn revision(&self) -> u64 {
        *self.revision.borrow()
    }

    /// Replace the whole list; display order is the given order
    pub fn replace(&mut self, assets: Vec<Asset>) {
        self.assets = assets;
        self.bump();
    }

    #[must_use]
    pub fn assets(&self) -> &[Asset] {
        &self.assets
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Asset> {
        self.assets.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.assets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    /// First asset with the identifier
    #[must_use]
    pub fn get(&self, identifier: &str) -> Option<&Asset> {
        self.assets.iter().find(|a| a.identifier() == identifier)
    }

    #[must_use]
    pub fn contains(&self, identifier: &str) -> bool {
        self.get(identifier).is_some()
    }

    /// Assets whose identifier is selected, in display order
    #[must_use]
    pub fn selected<'a>(&'a self, selection: &'a SelectionSet) -> Vec<&'a Asset> {
        self.assets
            .iter()
            .filter(|a| selection.contains(a.identifier()))
            .collect()
    }

    /// Set `label` on every selected asset, replacing any previous label
    ///
    /// # Returns
    /// Number of assets labelled
    pub fn apply_label(&mut self, selection: &SelectionSet, label: &str) -> usize {
        let mut labelled = 0;
        for asset in &mut self.assets {
            if selection.contains(asset.identifier()) {
                asset.class_label = Some(label.to_string());
                labelled += 1;
            }
        }
        if labelled > 0 {
            self.bump();
        }
        labelled
    }

    /// Swap in a fresh store handle for every row of that asset
    ///
    /// # Returns
    /// `true` if at least one row was updated
    pub fn update_handle(&mut self, handle: &StoreHandle) -> bool {
        let mut updated = false;
        for asset in &mut self.assets {
            if asset.identifier() == handle.local_identifier {
                asset.refresh_handle(handle.clone());
                updated = true;
            }
        }
        if updated {
            self.bump();
        }
        updated
    }

    /// Drop every row with one of the identifiers
    ///
    /// # Returns
    /// Number of rows removed
    pub fn remove(&mut self, identifiers: &[String]) -> usize {
        let before = self.assets.len();
        self.assets.retain(|a| !identifiers.iter().any(|id| id == a.identifier()));
        let removed = before - self.assets.len();
        if removed > 0 {
            self.bump();
        }
        removed
    }

    fn bump(&self) {
        self.revision.send_modify(|r| *r += 1);
    }
}

impl<'a> IntoIterator for &'a ResultProjection {
    type Item = &'a Asset;
    type IntoIter = std::slice::Iter<'a, Asset>;

    fn into_iter(self) -> Self::IntoIter {
        self.assets.iter()
    }
}
