//! Fuzzy matching of a desired value against candidate labels.
//!
//! One algorithm serves both `<select>` option texts and radio-group label
//! texts. Scores are additive over three signals; an exact normalized match
//! dominates containment, which dominates shared-word overlap, for any
//! realistic candidate set.

use formpilot_core_types::norm::normalize_key;
use tracing::debug;

const EXACT_BONUS: i64 = 1000;
const CONTAINS_BONUS: i64 = 200;
const WORD_OVERLAP_BONUS: i64 = 25;

/// Score one candidate against the desired value. Both sides are compared
/// through [`normalize_key`]. The containment bonus applies independently of
/// the exact bonus, so an exact match earns both.
pub fn score(desired: &str, candidate: &str) -> i64 {
    let desired = normalize_key(desired);
    let candidate = normalize_key(candidate);
    if candidate.is_empty() {
        return 0;
    }

    let mut total = 0;
    if candidate == desired {
        total += EXACT_BONUS;
    }
    if candidate.contains(desired.as_str()) || desired.contains(candidate.as_str()) {
        total += CONTAINS_BONUS;
    }

    let candidate_words: Vec<&str> = candidate.split(' ').filter(|w| !w.is_empty()).collect();
    let overlap = desired
        .split(' ')
        .filter(|w| !w.is_empty())
        .collect::<std::collections::HashSet<_>>()
        .iter()
        .filter(|w| candidate_words.contains(*w))
        .count() as i64;
    total + overlap * WORD_OVERLAP_BONUS
}

/// Index of the best-scoring candidate.
///
/// Contract: the scan is stable — a later candidate wins only with a
/// strictly higher score, so ties resolve to the first candidate
/// encountered. A best score of zero or below is no match, even when it is
/// the maximum.
pub fn best_match<S: AsRef<str>>(desired: &str, candidates: &[S]) -> Option<usize> {
    let mut best_idx = None;
    let mut best_score = -1;
    for (idx, candidate) in candidates.iter().enumerate() {
        let s = score(desired, candidate.as_ref());
        if s > best_score {
            best_score = s;
            best_idx = Some(idx);
        }
    }
    if best_score > 0 {
        debug!(index = ?best_idx, score = best_score, "option matched");
        best_idx
    } else {
        None
    }
}
