//! Photag - photo browsing with multi-select class labelling
//!
//! This library provides the browse session behind photag: a projection of
//! photo assets from a pluggable photo store, a multi-select set over it and
//! a workflow that stamps a free-text class label onto the selection and
//! persists it in an embedded database.

use thiserror::Error;

pub mod asset;
pub mod browse;
pub mod cli;
pub mod commands;
pub mod config;
pub mod db;
pub mod logging;
pub mod output;
pub mod search;
pub mod store;

#[cfg(test)]
pub mod testing;

/// Error enum, contains all failure states of the program
#[derive(Debug, Error)]
pub enum PhotagError {
    /// Database error
    #[error("Database error: {0}")]
    DbError(#[from] db::DbError),
    /// Photo store error
    #[error("Photo store error: {0}")]
    StoreError(#[from] store::StoreError),
    /// Label persistence error
    #[error("Label store error: {0}")]
    LabelStoreError(#[from] browse::LabelStoreError),
    /// Search error
    #[error("Search error: {0}")]
    SearchError(#[from] search::SearchError),
    /// Browse session error
    #[error("{0}")]
    BrowseError(#[from] browse::BrowseError),
    /// Represents a configuration error
    #[error("Configuration error: {0}")]
    ConfigError(#[from] ::config::ConfigError),
    /// JSON output could not be produced
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
    /// Represents an I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    /// Invalid input error
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// A store action failed for every photo it was applied to
    #[error("{0}")]
    ActionFailed(String),
}

pub use asset::Asset;
pub use browse::{BrowseSession, LabelStore};
pub use db::Database;
pub use store::PhotoStore;
