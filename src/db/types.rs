//! Type wrappers for database keys and values
//!
//! # Types
//!
//! - **`AssetKey`**: validated asset identifier used as a sled key
//! - **`AssetRecord`**: the stored state of one library asset, encoded with bincode

use super::error::DbError;
use crate::store::{MediaType, StoreHandle};
use bincode::{Decode, Encode};
use chrono::{DateTime, Utc};
use std::path::PathBuf;

/// Asset identifier that is safe to use as a database key
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AssetKey(String);

impl AssetKey {
    /// # Errors
    ///
    /// Returns `DbError::InvalidInput` if the identifier is empty or only whitespace.
    pub fn new(identifier: &str) -> Result<Self, DbError> {
        if identifier.trim().is_empty() {
            return Err(DbError::InvalidInput("asset identifier is empty".into()));
        }
        Ok(Self(identifier.to_string()))
    }

    /// # Errors
    ///
    /// Returns `DbError::SerializeError` if the key bytes are not valid UTF-8.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DbError> {
        String::from_utf8(bytes.to_vec())
            .map(Self)
            .map_err(|_| DbError::SerializeError("Invalid UTF-8 in asset key".into()))
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::ops::Deref for AssetKey {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Stored state of one library asset
#[derive(Encode, Decode, Debug, Clone, PartialEq, Eq)]
pub struct AssetRecord {
    pub path: PathBuf,
    pub is_favorite: bool,
    pub media_type: MediaType,
    /// Unix timestamp (seconds) of registration
    pub added: i64,
}

impl AssetRecord {
    #[must_use]
    pub fn new(path: PathBuf, media_type: MediaType, added: DateTime<Utc>) -> Self {
        Self {
            path,
            is_favorite: false,
            media_type,
            added: added.timestamp(),
        }
    }

    /// # Errors
    ///
    /// Returns `DbError::EncodeError` if bincode cannot encode the record.
    pub fn to_bytes(&self) -> Result<Vec<u8>, DbError> {
        Ok(bincode::encode_to_vec(self, bincode::config::standard())?)
    }

    /// # Errors
    ///
    /// Returns `DbError::DecodeError` if the bytes are not a valid record.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DbError> {
        let (record, _): (Self, usize) =
            bincode::decode_from_slice(bytes, bincode::config::standard())?;
        Ok(record)
    }

    /// Build the store handle for this record
    #[must_use]
    pub fn to_handle(&self, identifier: &str) -> StoreHandle {
        let mut handle = StoreHandle::new(identifier, self.media_type)
            .with_favorite(self.is_favorite)
            .with_path(self.path.clone());
        handle.created_at = DateTime::from_timestamp(self.added, 0);
        handle
    }
}

#[cfg(test)]
#[path = "types_tests.rs"]
mod types_tests;
