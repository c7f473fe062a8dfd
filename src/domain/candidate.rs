use serde::Serialize;

use crate::matching::SimilarityResult;

/// One entry extracted from a provider's search results page.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Candidate {
    pub title: String,
    pub reference_url: String,
    pub image: Option<String>,
    pub raw_score: Option<String>,
}

/// A candidate together with the similarity diagnostics computed against the
/// query. Produced by the best-match selector.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredCandidate {
    #[serde(flatten)]
    pub candidate: Candidate,
    #[serde(flatten)]
    pub similarity: SimilarityResult,
}
