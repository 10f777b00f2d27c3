//! Shared domain models.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Closed set of genres a game can belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    /// Fast reflex games.
    Action,
    /// Exploration and story driven games.
    Adventure,
    /// Logic and tile games.
    Puzzle,
    /// Planning, idle and board games.
    Strategy,
    /// Racing and sports titles.
    Sports,
    /// Short-session arcade games.
    Arcade,
    /// Classics.
    Retro,
}

impl Category {
    /// Every category in sidebar order.
    pub const ALL: [Category; 7] = [
        Category::Action,
        Category::Adventure,
        Category::Puzzle,
        Category::Strategy,
        Category::Sports,
        Category::Arcade,
        Category::Retro,
    ];

    /// Display name, also used as the serialized form.
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Action => "Action",
            Category::Adventure => "Adventure",
            Category::Puzzle => "Puzzle",
            Category::Strategy => "Strategy",
            Category::Sports => "Sports",
            Category::Arcade => "Arcade",
            Category::Retro => "Retro",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

/// Returned when parsing a category name that is not part of [`Category::ALL`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown category '{0}'")]
pub struct UnknownCategory(pub String);

/// Category selection in a browse session: everything, or a single category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CategoryFilter {
    /// No category restriction.
    #[default]
    All,
    /// Only games of the given category.
    Only(Category),
}

impl CategoryFilter {
    /// `All` followed by every category, in sidebar order.
    pub fn choices() -> Vec<CategoryFilter> {
        std::iter::once(CategoryFilter::All)
            .chain(Category::ALL.into_iter().map(CategoryFilter::Only))
            .collect()
    }

    /// Whether a game of `category` passes this filter.
    pub fn admits(self, category: Category) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(selected) => selected == category,
        }
    }

    /// Next choice in sidebar order, wrapping around.
    pub fn next(self) -> Self {
        self.step(1)
    }

    /// Previous choice in sidebar order, wrapping around.
    pub fn previous(self) -> Self {
        self.step(-1)
    }

    fn step(self, delta: isize) -> Self {
        let choices = Self::choices();
        let len = choices.len() as isize;
        let current = choices
            .iter()
            .position(|choice| *choice == self)
            .unwrap_or(0) as isize;
        choices[(current + delta).rem_euclid(len) as usize]
    }

    /// Label shown in the sidebar.
    pub fn label(self) -> &'static str {
        match self {
            CategoryFilter::All => "All",
            CategoryFilter::Only(category) => category.as_str(),
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<Category> for CategoryFilter {
    fn from(category: Category) -> Self {
        CategoryFilter::Only(category)
    }
}

/// An embeddable third-party game listed in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    /// Unique identifier within the catalog.
    pub id: String,
    /// Display name, always searched.
    pub title: String,
    /// Short blurb, searched when the session is configured for it.
    pub description: String,
    /// Opaque thumbnail URI.
    pub thumbnail: String,
    /// Opaque URI of the embedded game document.
    pub iframe_url: String,
    /// Genre.
    pub category: Category,
    /// Display-only score.
    pub rating: f32,
    /// Promoted on the front page.
    #[serde(default)]
    pub featured: bool,
}

impl Game {
    /// Rating formatted with one decimal place.
    pub fn rating_label(&self) -> String {
        format!("{:.1}", self.rating)
    }
}
