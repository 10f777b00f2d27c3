//! Text and category filtering over the catalog.

use serde::{Deserialize, Serialize};

use crate::models::{CategoryFilter, Game};

/// Which game fields a search query is matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchFields {
    /// Title only.
    Title,
    /// Title or description.
    #[default]
    TitleAndDescription,
}

/// Games passing both the category and the text predicate, in input order.
///
/// The query is matched case-insensitively as a substring and is not trimmed,
/// so `" "` only matches games whose searched text contains a space. An empty
/// query matches everything.
pub fn filter_games<'a>(
    games: &'a [Game],
    query: &str,
    category: CategoryFilter,
    fields: SearchFields,
) -> Vec<&'a Game> {
    let needle = query.to_lowercase();
    games
        .iter()
        .filter(|game| category.admits(game.category))
        .filter(|game| game_matches(game, &needle, fields))
        .collect()
}

/// Text predicate. `needle` must already be lowercased.
pub fn game_matches(game: &Game, needle: &str, fields: SearchFields) -> bool {
    if needle.is_empty() {
        return true;
    }
    if game.title.to_lowercase().contains(needle) {
        return true;
    }
    match fields {
        SearchFields::Title => false,
        SearchFields::TitleAndDescription => game.description.to_lowercase().contains(needle),
    }
}
