pub mod domain;
pub mod matching;
pub mod models;
pub mod processing;
pub mod providers;
pub mod streaming;

/// Number of search results considered per provider lookup.
pub const MAX_SEARCH_RESULTS: usize = 10;
