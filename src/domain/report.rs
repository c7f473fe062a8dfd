use serde::Serialize;

use crate::domain::candidate::ScoredCandidate;

/// Rating block extracted from an IMDb title page.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AggregateRating {
    pub rating_count: u64,
    pub best_rating: u32,
    pub worst_rating: u32,
    pub rating_value: f64,
}

/// Outcome of one provider lookup: the best-matching candidate, if any,
/// plus a page-level rating where the provider exposes one separately
/// from its search results.
#[derive(Debug, Clone, Serialize)]
pub struct ProviderMatch {
    pub provider: &'static str,
    pub best_match: Option<ScoredCandidate>,
    pub rating: Option<AggregateRating>,
}

impl ProviderMatch {
    /// A provider that produced no usable candidates.
    pub fn not_found(provider: &'static str) -> Self {
        Self {
            provider,
            best_match: None,
            rating: None,
        }
    }
}

/// Aggregated result of querying every provider for one title.
#[derive(Debug, Clone, Serialize)]
pub struct TitleReport {
    pub query: String,
    pub matches: Vec<ProviderMatch>,
}
