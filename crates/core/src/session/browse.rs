use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::{
    catalog::Catalog,
    error::{CatalogError, FavoritesError},
    favorites::{FavoriteSet, FavoritesManager},
    filter::filter_games,
    models::{CategoryFilter, Game},
    storage::KeyValueStore,
};

use super::options::BrowseOptions;

/// State of one user's browsing session over a shared catalog.
///
/// Only the favorite-id set outlives the session; it is written through the
/// [`FavoritesManager`] on every change.
#[derive(Debug)]
pub struct BrowseSession<S> {
    catalog: Arc<Catalog>,
    favorites_manager: FavoritesManager<S>,
    options: BrowseOptions,
    search_query: String,
    selected_category: CategoryFilter,
    selected_game: Option<String>,
    favorites: FavoriteSet,
    sidebar_open: bool,
    hydration_warning: Option<String>,
}

impl<S: KeyValueStore> BrowseSession<S> {
    /// Start a session, hydrating favorites from storage.
    pub fn new(
        catalog: Arc<Catalog>,
        favorites_manager: FavoritesManager<S>,
        options: BrowseOptions,
    ) -> Self {
        let (favorites, hydration_warning) = match favorites_manager.try_load() {
            Ok(favorites) => (favorites, None),
            Err(err) => {
                warn!(key = favorites_manager.key(), "Ignoring stored favorites: {err}");
                (FavoriteSet::new(), Some(err.to_string()))
            }
        };
        info!(
            games = catalog.len(),
            favorites = favorites.len(),
            "Browse session started"
        );
        Self {
            catalog,
            favorites_manager,
            options,
            search_query: String::new(),
            selected_category: CategoryFilter::All,
            selected_game: None,
            favorites,
            sidebar_open: true,
            hydration_warning,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn options(&self) -> &BrowseOptions {
        &self.options
    }

    /// Message describing why stored favorites were discarded at startup.
    pub fn hydration_warning(&self) -> Option<&str> {
        self.hydration_warning.as_deref()
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn selected_category(&self) -> CategoryFilter {
        self.selected_category
    }

    pub fn sidebar_open(&self) -> bool {
        self.sidebar_open
    }

    pub fn favorites(&self) -> &FavoriteSet {
        &self.favorites
    }

    /// Currently opened game, if any.
    pub fn selected_game(&self) -> Option<&Game> {
        self.selected_game
            .as_deref()
            .and_then(|id| self.catalog.by_id(id).ok())
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
        debug!(query = %self.search_query, "Search query updated");
    }

    pub fn push_search_char(&mut self, ch: char) {
        self.search_query.push(ch);
    }

    pub fn pop_search_char(&mut self) -> Option<char> {
        self.search_query.pop()
    }

    /// Switch category and return to the grid.
    pub fn select_category(&mut self, category: CategoryFilter) {
        self.selected_category = category;
        self.selected_game = None;
        debug!(category = %category, "Category selected");
    }

    /// Open a game. Unknown ids leave the session untouched.
    pub fn select_game(&mut self, id: &str) -> Result<&Game, CatalogError> {
        let game = self.catalog.by_id(id)?;
        info!(game_id = %game.id, title = %game.title, "Game selected");
        self.selected_game = Some(game.id.clone());
        Ok(game)
    }

    /// Back to the grid.
    pub fn clear_selection(&mut self) {
        self.selected_game = None;
    }

    /// Grid view with no filters applied.
    pub fn go_home(&mut self) {
        self.selected_game = None;
        self.reset_filters();
    }

    /// Clear the search text and category; the selection is kept.
    pub fn reset_filters(&mut self) {
        self.selected_category = CategoryFilter::All;
        self.search_query.clear();
    }

    pub fn toggle_sidebar(&mut self) -> bool {
        self.sidebar_open = !self.sidebar_open;
        self.sidebar_open
    }

    pub fn is_favorite(&self, id: &str) -> bool {
        self.favorites.contains(id)
    }

    pub fn favorite_count(&self) -> usize {
        self.favorites.len()
    }

    /// Flip the favorite state of `id` and persist it, returning the new state.
    ///
    /// Selection, query and category are never touched. When the write fails
    /// the in-memory set keeps its previous value.
    pub fn toggle_favorite(&mut self, id: &str) -> Result<bool, FavoritesError> {
        let next = self.favorites_manager.toggle(&self.favorites, id)?;
        self.favorites = next;
        Ok(self.favorites.contains(id))
    }

    /// Games visible in the grid for the current query and category.
    pub fn filtered_games(&self) -> Vec<&Game> {
        let games = filter_games(
            self.catalog.all(),
            &self.search_query,
            self.selected_category,
            self.options.search_fields,
        );
        debug!(
            query = %self.search_query,
            category = %self.selected_category,
            matches = games.len(),
            "Filter recomputed"
        );
        games
    }

    pub fn featured_games(&self) -> Vec<&Game> {
        self.catalog.featured()
    }

    /// Favorited games present in the catalog, in catalog order.
    pub fn favorite_games(&self) -> Vec<&Game> {
        self.catalog
            .all()
            .iter()
            .filter(|game| self.favorites.contains(&game.id))
            .collect()
    }

    /// Games related to the selection; empty in grid view.
    pub fn related_games(&self) -> Vec<&Game> {
        match self.selected_game() {
            Some(game) => self.catalog.related(game, self.options.related_limit),
            None => Vec::new(),
        }
    }

    pub fn hero_game(&self) -> Option<&Game> {
        self.catalog.by_id(&self.options.hero_game_id).ok()
    }

    /// Whether the hero panel belongs on screen right now.
    pub fn show_hero(&self) -> bool {
        self.options.show_hero
            && self.selected_game.is_none()
            && self.selected_category == CategoryFilter::All
            && self.search_query.is_empty()
    }

    /// Title for the grid section.
    pub fn section_heading(&self) -> String {
        if !self.search_query.is_empty() {
            format!("Search Results for \"{}\"", self.search_query)
        } else if let CategoryFilter::Only(category) = self.selected_category {
            format!("{category} Games")
        } else {
            "Popular Games".to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Result;

    use super::*;
    use crate::{
        error::StorageError,
        favorites::DEFAULT_FAVORITES_KEY,
        filter::SearchFields,
        models::Category,
        storage::MemoryStore,
    };

    fn session_with(store: MemoryStore, options: BrowseOptions) -> BrowseSession<MemoryStore> {
        BrowseSession::new(Catalog::builtin(), FavoritesManager::new(store), options)
    }

    fn session() -> BrowseSession<MemoryStore> {
        session_with(MemoryStore::new(), BrowseOptions::default())
    }

    fn ids(games: Vec<&Game>) -> Vec<String> {
        games.into_iter().map(|game| game.id.clone()).collect()
    }

    #[test]
    fn starts_in_default_state() {
        let session = session();
        assert_eq!(session.search_query(), "");
        assert_eq!(session.selected_category(), CategoryFilter::All);
        assert!(session.selected_game().is_none());
        assert!(session.sidebar_open());
        assert_eq!(session.favorite_count(), 0);
        assert!(session.hydration_warning().is_none());
        assert_eq!(session.filtered_games().len(), 12);
    }

    #[test]
    fn hydrates_persisted_favorites() {
        let store = MemoryStore::with_entry(DEFAULT_FAVORITES_KEY, r#"["3","12"]"#);
        let session = session_with(store, BrowseOptions::default());
        assert!(session.is_favorite("3"));
        assert!(session.is_favorite("12"));
        assert_eq!(ids(session.favorite_games()), ["3", "12"]);
    }

    #[test]
    fn featured_games_follow_catalog_flags() {
        let session = session();
        assert_eq!(ids(session.featured_games()), ["1", "3", "5"]);

        let mut filtered = session;
        filtered.select_category(Category::Retro.into());
        filtered.set_search_query("zzz");
        assert_eq!(ids(filtered.featured_games()), ["1", "3", "5"]);
    }

    #[test]
    fn favorite_games_skip_unknown_ids_and_keep_catalog_order() -> Result<()> {
        let mut session = session();
        session.toggle_favorite("12")?;
        session.toggle_favorite("missing")?;
        session.toggle_favorite("2")?;
        assert_eq!(session.favorite_count(), 3);
        assert_eq!(ids(session.favorite_games()), ["2", "12"]);
        Ok(())
    }

    #[test]
    fn malformed_favorites_start_empty_with_warning() {
        let store = MemoryStore::with_entry(DEFAULT_FAVORITES_KEY, "{broken");
        let session = session_with(store, BrowseOptions::default());
        assert_eq!(session.favorite_count(), 0);
        let warning = session.hydration_warning().expect("warning");
        assert!(warning.contains(DEFAULT_FAVORITES_KEY));
    }

    #[test]
    fn toggle_favorite_keeps_selection_and_persists() -> Result<()> {
        let store = MemoryStore::new();
        let mut session = session_with(store.clone(), BrowseOptions::default());
        session.select_game("5")?;

        assert!(session.toggle_favorite("5")?);
        assert_eq!(session.selected_game().map(|game| game.id.as_str()), Some("5"));
        assert_eq!(store.raw(DEFAULT_FAVORITES_KEY).as_deref(), Some(r#"["5"]"#));

        assert!(!session.toggle_favorite("5")?);
        assert_eq!(session.selected_game().map(|game| game.id.as_str()), Some("5"));
        assert_eq!(store.raw(DEFAULT_FAVORITES_KEY).as_deref(), Some("[]"));
        Ok(())
    }

    #[test]
    fn failed_save_keeps_previous_favorites() {
        struct ReadOnly;
        impl KeyValueStore for ReadOnly {
            fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
                Ok(Some(r#"["1"]"#.to_string()))
            }
            fn set(&self, key: &str, _value: &str) -> Result<(), StorageError> {
                Err(StorageError::InvalidKey {
                    key: key.to_string(),
                    reason: "read-only".to_string(),
                })
            }
        }

        let mut session = BrowseSession::new(
            Catalog::builtin(),
            FavoritesManager::new(ReadOnly),
            BrowseOptions::default(),
        );
        assert!(session.toggle_favorite("2").is_err());
        assert!(session.is_favorite("1"));
        assert!(!session.is_favorite("2"));
    }

    #[test]
    fn unknown_game_selection_is_not_found() -> Result<()> {
        let mut session = session();
        session.select_game("1")?;
        assert!(matches!(
            session.select_game("99"),
            Err(CatalogError::NotFound { .. })
        ));
        assert_eq!(session.selected_game().map(|game| game.id.as_str()), Some("1"));
        Ok(())
    }

    #[test]
    fn category_selection_returns_to_grid() -> Result<()> {
        let mut session = session();
        session.select_game("5")?;
        session.select_category(CategoryFilter::Only(Category::Arcade));
        assert!(session.selected_game().is_none());
        assert_eq!(ids(session.filtered_games()), ["2", "4", "9"]);
        assert_eq!(session.section_heading(), "Arcade Games");
        Ok(())
    }

    #[test]
    fn search_respects_configured_fields() {
        let mut full = session();
        full.set_search_query("TETRIS");
        assert_eq!(ids(full.filtered_games()), ["2"]);
        assert_eq!(full.section_heading(), "Search Results for \"TETRIS\"");

        let mut minimal = session_with(MemoryStore::new(), BrowseOptions::minimal());
        minimal.set_search_query("TETRIS");
        assert!(minimal.filtered_games().is_empty());
        assert_eq!(minimal.options().search_fields, SearchFields::Title);
    }

    #[test]
    fn search_editing_by_character() {
        let mut session = session();
        for ch in "pac-".chars() {
            session.push_search_char(ch);
        }
        assert_eq!(ids(session.filtered_games()), ["12"]);
        assert_eq!(session.pop_search_char(), Some('-'));
        assert_eq!(session.search_query(), "pac");
        assert_eq!(ids(session.filtered_games()), ["2", "5", "12"]);
    }

    #[test]
    fn reset_and_home() -> Result<()> {
        let mut session = session();
        session.set_search_query("slope");
        session.select_category(CategoryFilter::Only(Category::Action));
        session.select_game("5")?;

        session.reset_filters();
        assert_eq!(session.search_query(), "");
        assert_eq!(session.selected_category(), CategoryFilter::All);
        assert!(session.selected_game().is_some());

        session.set_search_query("x");
        session.go_home();
        assert_eq!(session.search_query(), "");
        assert!(session.selected_game().is_none());
        assert_eq!(session.section_heading(), "Popular Games");
        Ok(())
    }

    #[test]
    fn hero_only_on_unfiltered_grid() -> Result<()> {
        let mut session = session();
        assert!(session.show_hero());
        assert_eq!(session.hero_game().map(|game| game.title.as_str()), Some("Slope"));

        session.set_search_query("a");
        assert!(!session.show_hero());
        session.set_search_query("");
        session.select_category(CategoryFilter::Only(Category::Retro));
        assert!(!session.show_hero());
        session.select_category(CategoryFilter::All);
        session.select_game("1")?;
        assert!(!session.show_hero());

        let minimal = session_with(MemoryStore::new(), BrowseOptions::minimal());
        assert!(!minimal.show_hero());
        Ok(())
    }

    #[test]
    fn related_games_follow_selection() -> Result<()> {
        let mut session = session();
        assert!(session.related_games().is_empty());
        session.select_game("3")?;
        assert_eq!(ids(session.related_games()), ["6", "10"]);
        Ok(())
    }

    #[test]
    fn sidebar_toggles() {
        let mut session = session();
        assert!(!session.toggle_sidebar());
        assert!(session.toggle_sidebar());
    }

    #[test]
    fn favorites_survive_a_new_session() -> Result<()> {
        let store = MemoryStore::new();
        let mut first = session_with(store.clone(), BrowseOptions::default());
        first.toggle_favorite("7")?;
        first.toggle_favorite("unknown")?;
        drop(first);

        let second = session_with(store, BrowseOptions::default());
        assert!(second.is_favorite("7"));
        assert!(second.is_favorite("unknown"));
        assert_eq!(ids(second.favorite_games()), ["7"]);
        Ok(())
    }
}
