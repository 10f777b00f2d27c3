//! Read-only catalog of embeddable games.

use std::{collections::HashSet, sync::Arc};

use once_cell::sync::Lazy;
use tracing::debug;

use crate::{error::CatalogError, models::Game};

const BUILTIN_CATALOG: &str = include_str!("../data/games.json");

static BUILTIN: Lazy<Arc<Catalog>> = Lazy::new(|| {
    let catalog = Catalog::from_json(BUILTIN_CATALOG).expect("embedded catalog must be valid");
    debug!(total = catalog.len(), "Built-in catalog decoded");
    Arc::new(catalog)
});

/// Immutable, ordered collection of games with unique ids.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    games: Vec<Game>,
}

impl Catalog {
    /// Build a catalog, rejecting duplicate ids. Order is preserved.
    pub fn from_games(games: Vec<Game>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::with_capacity(games.len());
        for game in &games {
            if !seen.insert(game.id.as_str()) {
                return Err(CatalogError::DuplicateId {
                    id: game.id.clone(),
                });
            }
        }
        Ok(Self { games })
    }

    /// Decode a JSON array of game records.
    pub fn from_json(raw: &str) -> Result<Self, CatalogError> {
        let games: Vec<Game> = serde_json::from_str(raw)?;
        Self::from_games(games)
    }

    /// The catalog compiled into the binary.
    pub fn builtin() -> Arc<Catalog> {
        Arc::clone(&BUILTIN)
    }

    /// Every game, in source order.
    pub fn all(&self) -> &[Game] {
        &self.games
    }

    /// Look up a game by id.
    pub fn by_id(&self, id: &str) -> Result<&Game, CatalogError> {
        self.games
            .iter()
            .find(|game| game.id == id)
            .ok_or_else(|| CatalogError::NotFound { id: id.to_string() })
    }

    /// Games flagged as featured, in source order.
    pub fn featured(&self) -> Vec<&Game> {
        self.games.iter().filter(|game| game.featured).collect()
    }

    /// Up to `limit` other games sharing `game`'s category.
    pub fn related(&self, game: &Game, limit: usize) -> Vec<&Game> {
        self.games
            .iter()
            .filter(|candidate| candidate.category == game.category && candidate.id != game.id)
            .take(limit)
            .collect()
    }

    /// Number of games.
    pub fn len(&self) -> usize {
        self.games.len()
    }

    /// Whether the catalog has no games.
    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::Category;

    pub(crate) fn game(id: &str, title: &str, category: Category) -> Game {
        Game {
            id: id.to_string(),
            title: title.to_string(),
            description: format!("{title} description"),
            thumbnail: format!("https://example.com/{id}.png"),
            iframe_url: format!("https://example.com/play/{id}"),
            category,
            rating: 4.5,
            featured: false,
        }
    }

    #[test]
    fn builtin_catalog_has_twelve_games_in_source_order() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.len(), 12);
        let ids: Vec<&str> = catalog.all().iter().map(|game| game.id.as_str()).collect();
        assert_eq!(
            ids,
            ["1", "2", "3", "4", "5", "6", "7", "8", "9", "10", "11", "12"]
        );
        assert_eq!(catalog.all()[4].title, "Slope");
    }

    #[test]
    fn builtin_catalog_returns_same_snapshot() {
        assert!(Arc::ptr_eq(&Catalog::builtin(), &Catalog::builtin()));
    }

    #[test]
    fn by_id_finds_and_reports_missing() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.by_id("12").expect("pac-man").title, "Pac-Man");
        match catalog.by_id("404") {
            Err(CatalogError::NotFound { id }) => assert_eq!(id, "404"),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let result = Catalog::from_games(vec![
            game("1", "One", Category::Action),
            game("1", "Uno", Category::Puzzle),
        ]);
        assert!(matches!(result, Err(CatalogError::DuplicateId { id }) if id == "1"));
    }

    #[test]
    fn malformed_json_is_a_decode_error() {
        assert!(matches!(
            Catalog::from_json("{\"id\": 1}"),
            Err(CatalogError::Decode(_))
        ));
    }

    #[test]
    fn featured_games_follow_source_order() {
        let catalog = Catalog::builtin();
        let titles: Vec<&str> = catalog
            .featured()
            .into_iter()
            .map(|game| game.title.as_str())
            .collect();
        assert_eq!(titles, ["2048", "Cookie Clicker", "Slope"]);
    }

    #[test]
    fn related_excludes_self_and_respects_limit() {
        let catalog = Catalog::builtin();
        let hextris = catalog.by_id("2").expect("hextris");
        let related: Vec<&str> = catalog
            .related(hextris, 6)
            .into_iter()
            .map(|game| game.id.as_str())
            .collect();
        assert_eq!(related, ["4", "9"]);

        assert_eq!(catalog.related(hextris, 1).len(), 1);

        let pacman = catalog.by_id("12").expect("pac-man");
        assert!(catalog.related(pacman, 6).is_empty());
    }
}
