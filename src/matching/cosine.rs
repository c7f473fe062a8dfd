//! Character n-gram cosine similarity scorer.
//!
//! Treats each string as a frequency vector of its character trigrams and
//! measures the cosine of the angle between the two vectors. Insensitive
//! to word order, which complements the positional scorers.

use std::collections::HashMap;

/// N-gram size used by the composite similarity function.
pub const NGRAM_SIZE: usize = 3;

/// Lowercase the string and collapse whitespace runs into single spaces.
fn normalize(s: &str) -> String {
    s.to_lowercase().split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Frequency map over all contiguous char windows of length `n`. Strings
/// shorter than `n` produce an empty map.
fn ngram_frequencies(s: &str, n: usize) -> HashMap<String, usize> {
    let chars: Vec<char> = s.chars().collect();
    let mut map = HashMap::new();
    if n == 0 || chars.len() < n {
        return map;
    }
    for window in chars.windows(n) {
        let ngram: String = window.iter().collect();
        *map.entry(ngram).or_insert(0) += 1;
    }
    map
}

/// Cosine similarity over `n`-gram frequency vectors, in `[0.0, 1.0]`.
///
/// Returns 0.0 whenever either vector has zero norm (empty string or
/// shorter than `n`), so degenerate inputs score as "no similarity"
/// instead of dividing by zero.
pub fn cosine(a: &str, b: &str, n: usize) -> f64 {
    let map_a = ngram_frequencies(&normalize(a), n);
    let map_b = ngram_frequencies(&normalize(b), n);

    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;

    for (key, &count_a) in &map_a {
        let count_a = count_a as f64;
        norm_a += count_a * count_a;
        if let Some(&count_b) = map_b.get(key) {
            dot += count_a * count_b as f64;
        }
    }
    for &count_b in map_b.values() {
        let count_b = count_b as f64;
        norm_b += count_b * count_b;
    }

    let magnitude = (norm_a * norm_b).sqrt();
    if magnitude == 0.0 {
        return 0.0;
    }
    (dot / magnitude).clamp(0.0, 1.0)
}

/// Trigram cosine similarity, the variant used for title matching.
pub fn cosine_trigrams(a: &str, b: &str) -> f64 {
    cosine(a, b, NGRAM_SIZE)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn identical_strings_score_one() {
        assert!(approx_eq(cosine_trigrams("dr stone", "dr stone"), 1.0));
        assert!(approx_eq(cosine_trigrams("One Piece", "One Piece"), 1.0));
    }

    #[test]
    fn disjoint_trigrams_score_zero() {
        assert_eq!(cosine_trigrams("abc", "xyz"), 0.0);
    }

    #[test]
    fn short_or_empty_inputs_score_zero() {
        // No trigrams can be extracted, so the vectors have zero norm.
        assert_eq!(cosine_trigrams("", ""), 0.0);
        assert_eq!(cosine_trigrams("ab", "ab"), 0.0);
        assert_eq!(cosine_trigrams("ab", "abc"), 0.0);
    }

    #[test]
    fn normalization_ignores_case_and_whitespace_runs() {
        assert!(approx_eq(cosine_trigrams("Dr  Stone", "dr stone"), 1.0));
        assert!(approx_eq(cosine_trigrams("  one   piece ", "One Piece"), 1.0));
    }

    #[test]
    fn word_order_changes_are_tolerated() {
        let sim = cosine_trigrams("stone dr", "dr stone");
        assert!(sim >= 0.5, "shared trigrams should dominate: {sim}");
        assert!(sim < 1.0);
    }

    #[test]
    fn repeated_ngrams_are_counted() {
        // "aaaa" has the trigram "aaa" twice; frequency weighting keeps the
        // similarity at 1.0 against itself and high against "aaa".
        assert!(approx_eq(cosine_trigrams("aaaa", "aaaa"), 1.0));
        assert!(cosine_trigrams("aaaa", "aaa") > 0.99);
    }

    #[test]
    fn stays_in_unit_interval() {
        let pairs = [
            ("dr stone", "dr. stone"),
            ("naruto", "boruto"),
            ("attack on titan", "titan attack"),
        ];
        for (a, b) in pairs {
            let sim = cosine_trigrams(a, b);
            assert!((0.0..=1.0).contains(&sim), "{sim} out of range for {a:?}/{b:?}");
        }
    }
}
