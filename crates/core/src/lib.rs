#![warn(clippy::all, missing_docs)]

//! Core domain logic for the Nexus arcade browser.
//!
//! This crate hosts the game catalog, the search/category filter,
//! favorites persistence behind a key-value storage port, the browse
//! session state and configuration used by the terminal UI and any
//! future frontends.

pub mod catalog;
pub mod config;
pub mod error;
pub mod favorites;
pub mod filter;
pub mod models;
pub mod session;
pub mod storage;

pub use catalog::Catalog;
pub use config::AppConfig;
pub use error::{CatalogError, FavoritesError, StorageError};
pub use favorites::{FavoriteSet, FavoritesManager};
pub use filter::{filter_games, SearchFields};
pub use models::{Category, CategoryFilter, Game};
pub use session::{BrowseOptions, BrowseSession};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
