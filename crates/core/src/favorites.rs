//! User-local favorites and their persistence.

use std::collections::BTreeSet;

use tracing::{info, warn};

use crate::{error::FavoritesError, storage::KeyValueStore};

/// Storage key used when none is configured.
pub const DEFAULT_FAVORITES_KEY: &str = "nexus-favorites";

/// Set of favorited game ids.
///
/// Ids need not exist in the catalog. Iteration order is sorted, which keeps
/// the persisted encoding stable.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FavoriteSet {
    ids: BTreeSet<String>,
}

impl FavoriteSet {
    /// Empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// New set with `id` removed when present, added otherwise.
    #[must_use]
    pub fn toggle(&self, id: &str) -> Self {
        let mut ids = self.ids.clone();
        if !ids.remove(id) {
            ids.insert(id.to_string());
        }
        Self { ids }
    }

    /// Whether `id` is favorited.
    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Number of favorited ids.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether nothing is favorited.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Ids in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    fn encode(&self) -> Result<String, FavoritesError> {
        serde_json::to_string(&self.ids).map_err(FavoritesError::Encode)
    }
}

impl<S: Into<String>> FromIterator<S> for FavoriteSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Loads and persists a [`FavoriteSet`] under a single storage key.
#[derive(Debug, Clone)]
pub struct FavoritesManager<S> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> FavoritesManager<S> {
    /// Manager using [`DEFAULT_FAVORITES_KEY`].
    pub fn new(store: S) -> Self {
        Self::with_key(store, DEFAULT_FAVORITES_KEY)
    }

    /// Manager using a custom key.
    pub fn with_key(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// Storage key in use.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Read the persisted set, reporting absent data as empty and anything
    /// undecodable as an error.
    pub fn try_load(&self) -> Result<FavoriteSet, FavoritesError> {
        let Some(raw) = self.store.get(&self.key)? else {
            return Ok(FavoriteSet::new());
        };
        let ids: Vec<String> =
            serde_json::from_str(&raw).map_err(|err| FavoritesError::MalformedPersistedData {
                key: self.key.clone(),
                reason: err.to_string(),
            })?;
        let favorites: FavoriteSet = ids.into_iter().collect();
        info!(key = %self.key, count = favorites.len(), "Favorites loaded");
        Ok(favorites)
    }

    /// Read the persisted set, falling back to an empty set on any failure.
    pub fn load(&self) -> FavoriteSet {
        self.try_load().unwrap_or_else(|err| {
            warn!(key = %self.key, "Failed to load favorites: {err}");
            FavoriteSet::new()
        })
    }

    /// Overwrite the persisted value with `favorites`.
    pub fn save(&self, favorites: &FavoriteSet) -> Result<(), FavoritesError> {
        let encoded = favorites.encode()?;
        self.store.set(&self.key, &encoded)?;
        info!(key = %self.key, count = favorites.len(), "Favorites saved");
        Ok(())
    }

    /// Toggle `id` and persist the result before returning it.
    pub fn toggle(&self, favorites: &FavoriteSet, id: &str) -> Result<FavoriteSet, FavoritesError> {
        let next = favorites.toggle(id);
        self.save(&next)?;
        Ok(next)
    }
}
