//! Bigram similarity (Sørensen–Dice over character pairs).
//!
//! Pure-Rust, allocation-light scoring used by the resolver. Inputs are
//! expected to be normalized already; the scorer itself does no case
//! folding.

use std::collections::HashSet;

/// The distinct overlapping two-character windows of `s`.
///
/// Strings shorter than two characters have no bigrams.
pub fn bigrams(s: &str) -> HashSet<(char, char)> {
    let chars: Vec<char> = s.chars().collect();
    chars.windows(2).map(|w| (w[0], w[1])).collect()
}

/// Compute the Dice coefficient between the bigram sets of `a` and `b`.
///
/// Returns a value in [0, 1] where 1 = identical bigram sets.
/// Returns 0.0 when both inputs are too short to have bigrams.
pub fn score(a: &str, b: &str) -> f64 {
    let left = bigrams(a);
    let right = bigrams(b);

    let total = left.len() + right.len();
    if total == 0 {
        return 0.0;
    }

    let shared = left.intersection(&right).count();
    (2.0 * shared as f64) / total as f64
}
