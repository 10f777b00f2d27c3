//! Error types shared by the catalog, storage and favorites layers.

use std::path::PathBuf;

use thiserror::Error;

/// Failures raised by the catalog store.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// No game carries the requested id.
    #[error("no game with id '{id}'")]
    NotFound {
        /// Id that was looked up.
        id: String,
    },
    /// Two records share an id.
    #[error("duplicate game id '{id}' in catalog")]
    DuplicateId {
        /// Offending id.
        id: String,
    },
    /// Catalog document could not be decoded.
    #[error("failed to decode catalog: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Failures raised by a [`crate::storage::KeyValueStore`] adapter.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Underlying filesystem access failed.
    #[error("storage i/o failed for {path}: {source}")]
    Io {
        /// File that was being read or written.
        path: PathBuf,
        /// Original error.
        #[source]
        source: std::io::Error,
    },
    /// Key cannot be mapped onto the backing store.
    #[error("invalid storage key '{key}': {reason}")]
    InvalidKey {
        /// Rejected key.
        key: String,
        /// Why it was rejected.
        reason: String,
    },
}

/// Failures raised while loading or persisting the favorite-id set.
#[derive(Debug, Error)]
pub enum FavoritesError {
    /// A value exists under the key but is not a JSON list of strings.
    #[error("persisted favorites under '{key}' are malformed: {reason}")]
    MalformedPersistedData {
        /// Storage key that held the value.
        key: String,
        /// Decoder message.
        reason: String,
    },
    /// The storage port failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
    /// The set could not be encoded.
    #[error("failed to encode favorites: {0}")]
    Encode(#[source] serde_json::Error),
}
