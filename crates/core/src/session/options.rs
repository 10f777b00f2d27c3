use serde::{Deserialize, Serialize};

use crate::filter::SearchFields;

/// Id of the game promoted by the hero panel when none is configured.
pub const DEFAULT_HERO_GAME_ID: &str = "5";

/// Number of related games shown next to a selected game.
pub const DEFAULT_RELATED_LIMIT: usize = 6;

/// Feature switches distinguishing the storefront variants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowseOptions {
    /// Fields the search box matches against.
    pub search_fields: SearchFields,
    /// Mark featured games with a badge in the grid.
    pub show_featured_badge: bool,
    /// Show the hero panel on the unfiltered front page.
    pub show_hero: bool,
    /// Show the controls panel next to a selected game.
    pub show_how_to_play: bool,
    /// Game launched from the hero panel.
    pub hero_game_id: String,
    /// Maximum number of related games listed for a selection.
    pub related_limit: usize,
}

impl Default for BrowseOptions {
    fn default() -> Self {
        Self {
            search_fields: SearchFields::TitleAndDescription,
            show_featured_badge: true,
            show_hero: true,
            show_how_to_play: true,
            hero_game_id: DEFAULT_HERO_GAME_ID.to_string(),
            related_limit: DEFAULT_RELATED_LIMIT,
        }
    }
}

impl BrowseOptions {
    /// Plain grid: title-only search and no promotional panels.
    pub fn minimal() -> Self {
        Self {
            search_fields: SearchFields::Title,
            show_featured_badge: false,
            show_hero: false,
            show_how_to_play: false,
            ..Self::default()
        }
    }
}
