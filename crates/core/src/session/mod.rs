#![allow(missing_docs)]

//! Browse session state and the options that shape it.

mod browse;
mod options;

pub use browse::BrowseSession;
pub use options::{BrowseOptions, DEFAULT_HERO_GAME_ID, DEFAULT_RELATED_LIMIT};
