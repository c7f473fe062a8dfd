//! Title matching engine.
//!
//! Pure, synchronous scoring: no I/O, no shared state. Provider adapters
//! hand in candidate lists and get back the single best match together
//! with per-scorer diagnostics.

use serde::Serialize;

use crate::domain::candidate::{Candidate, ScoredCandidate};

pub mod cosine;
pub mod jaro;
pub mod levenshtein;

/// Composite weight of the normalized Levenshtein score.
pub const LEVENSHTEIN_WEIGHT: f64 = 0.4;
/// Composite weight of the Jaro score.
pub const JARO_WEIGHT: f64 = 0.3;
/// Composite weight of the trigram cosine score.
pub const COSINE_WEIGHT: f64 = 0.3;

/// Per-scorer diagnostics plus the weighted composite used for ranking.
///
/// The sub-scores are kept alongside the composite; they cannot be
/// recovered from it alone.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct SimilarityResult {
    pub levenshtein_score: f64,
    pub jaro_score: f64,
    pub cosine_score: f64,
    pub similarity_score: f64,
}

/// Score a candidate title against the query with all three scorers and
/// combine them into the weighted composite.
///
/// The weights are tunable constants of this module, not runtime
/// configuration.
pub fn final_similarity(query: &str, title: &str) -> SimilarityResult {
    let levenshtein_score = levenshtein::levenshtein_similarity(query, title);
    let jaro_score = jaro::jaro(query, title);
    let cosine_score = cosine::cosine_trigrams(query, title);

    let similarity_score = LEVENSHTEIN_WEIGHT * levenshtein_score
        + JARO_WEIGHT * jaro_score
        + COSINE_WEIGHT * cosine_score;

    SimilarityResult {
        levenshtein_score,
        jaro_score,
        cosine_score,
        similarity_score,
    }
}

/// Pick the candidate whose title best matches the query.
///
/// Candidates without a usable title are dropped before scoring. The
/// scan keeps the first candidate on equal composite scores, so the
/// result is deterministic in input order. Returns `None` when nothing
/// survives the filter.
pub fn select_best_match(query: &str, candidates: Vec<Candidate>) -> Option<ScoredCandidate> {
    let mut best: Option<ScoredCandidate> = None;

    for candidate in candidates {
        if candidate.title.trim().is_empty() {
            continue;
        }
        let similarity = final_similarity(query, &candidate.title);
        let is_better = match &best {
            Some(current) => similarity.similarity_score > current.similarity.similarity_score,
            None => true,
        };
        if is_better {
            best = Some(ScoredCandidate {
                candidate,
                similarity,
            });
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(title: &str) -> Candidate {
        Candidate {
            title: title.to_string(),
            reference_url: format!("https://example.com/{}", title.replace(' ', "-")),
            image: None,
            raw_score: None,
        }
    }

    #[test]
    fn composite_is_the_weighted_sum_of_sub_scores() {
        let result = final_similarity("Dr Stone", "Dr. Stone");
        let expected = LEVENSHTEIN_WEIGHT * result.levenshtein_score
            + JARO_WEIGHT * result.jaro_score
            + COSINE_WEIGHT * result.cosine_score;
        assert!((result.similarity_score - expected).abs() < 1e-12);
    }

    #[test]
    fn composite_stays_in_unit_interval() {
        let pairs = [
            ("", ""),
            ("", "One Piece"),
            ("a", "b"),
            ("Dr Stone", "Dr. Stone"),
            ("attack on titan", "Attack on Titan Final Season"),
            ("x", "xxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxx"),
        ];
        for (a, b) in pairs {
            let score = final_similarity(a, b).similarity_score;
            assert!(
                (0.0..=1.0).contains(&score),
                "{score} out of range for {a:?}/{b:?}"
            );
        }
    }

    #[test]
    fn identical_long_titles_score_one() {
        let result = final_similarity("Dr. Stone", "Dr. Stone");
        assert!((result.similarity_score - 1.0).abs() < 1e-9);
    }

    #[test]
    fn selects_the_closest_title() {
        let best = select_best_match(
            "Dr Stone",
            vec![candidate("Dr. Stone"), candidate("One Piece"), candidate("")],
        )
        .expect("a match");
        assert_eq!(best.candidate.title, "Dr. Stone");
    }

    #[test]
    fn empty_titles_are_excluded_not_scored() {
        // A sole empty-titled candidate means no match at all.
        assert!(select_best_match("Dr Stone", vec![candidate("")]).is_none());
        assert!(select_best_match("Dr Stone", vec![candidate("   ")]).is_none());
    }

    #[test]
    fn empty_candidate_list_yields_none() {
        assert!(select_best_match("Dr Stone", vec![]).is_none());
    }

    #[test]
    fn ties_keep_the_first_candidate_in_input_order() {
        let mut first = candidate("Dr. Stone");
        first.reference_url = "https://example.com/first".to_string();
        let mut duplicate = candidate("Dr. Stone");
        duplicate.reference_url = "https://example.com/second".to_string();

        let best = select_best_match("Dr Stone", vec![first, duplicate]).expect("a match");
        assert_eq!(best.candidate.reference_url, "https://example.com/first");
    }

    #[test]
    fn scoring_attaches_all_diagnostics() {
        let best = select_best_match("Dr Stone", vec![candidate("Dr. Stone")]).expect("a match");
        let sim = best.similarity;
        assert!(sim.levenshtein_score > 0.0);
        assert!(sim.jaro_score > 0.0);
        assert!(sim.cosine_score > 0.0);
        assert!(sim.similarity_score > 0.5);
    }
}
