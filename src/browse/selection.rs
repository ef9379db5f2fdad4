//! Selection state over the displayed assets
//!
//! Membership is keyed by asset identifier, so duplicates in the projection
//! are harmless: selecting one selects every row with that identifier.

use std::collections::HashSet;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    ids: HashSet<String>,
}

impl SelectionSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert the identifier if absent, remove it if present
    ///
    /// # Returns
    /// `true` if the identifier is selected afterwards
    pub fn toggle(&mut self, identifier: &str) -> bool {
        if self.ids.remove(identifier) {
            false
        } else {
            self.ids.insert(identifier.to_string());
            true
        }
    }

    /// Add the identifier without toggling
    pub fn select(&mut self, identifier: &str) {
        self.ids.insert(identifier.to_string());
    }

    /// Remove the identifier if present
    pub fn deselect(&mut self, identifier: &str) -> bool {
        self.ids.remove(identifier)
    }

    #[must_use]
    pub fn contains(&self, identifier: &str) -> bool {
        self.ids.contains(identifier)
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    /// Drop identifiers for which `known` returns false
    pub fn retain_known(&mut self, known: impl Fn(&str) -> bool) {
        self.ids.retain(|id| known(id));
    }
}
