//! Entity resolver — maps free-text model names onto asset identifiers.
//!
//! Names arrive from customers and from the LLM in every spelling
//! (`BEAT_STREET`, `Beat Street`, `new beat street`). Candidates are folder
//! or file names. Both sides are normalized, scored with the bigram
//! scorer, boosted when one contains the other, and the best candidate is
//! accepted only above the policy's floor.

use dealerbot_core::catalog::{AssetCategory, CandidateSource, MatchResult};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::similarity;

/// Score a candidate is raised to when one normalized name contains the other.
pub const CONTAINMENT_FLOOR: f64 = 0.8;

/// A best score must strictly exceed this to be accepted.
pub const MIN_SCORE: f64 = 0.4;

/// Separators become spaces and everything is lower-cased.
///
/// Only used for comparison, never for display.
pub fn normalize(name: &str) -> String {
    name.replace('_', " ").trim().to_lowercase()
}

/// Acceptance policy for [`resolve`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchPolicy {
    pub min_score: f64,
    pub containment_floor: f64,
}

impl Default for MatchPolicy {
    fn default() -> Self {
        Self {
            min_score: MIN_SCORE,
            containment_floor: CONTAINMENT_FLOOR,
        }
    }
}

impl From<&dealerbot_config::CatalogConfig> for MatchPolicy {
    fn from(config: &dealerbot_config::CatalogConfig) -> Self {
        Self {
            min_score: config.min_score,
            containment_floor: config.containment_floor,
        }
    }
}

impl MatchPolicy {
    /// Score one normalized candidate against a normalized target.
    fn score(&self, target: &str, candidate: &str) -> f64 {
        let base = similarity::score(target, candidate);
        // An empty target is a substring of every candidate; it gets no boost
        // and so never matches, unlike a plain substring test would.
        if target.is_empty() || candidate.is_empty() {
            return base;
        }
        if candidate.contains(target) || target.contains(candidate) {
            base.max(self.containment_floor)
        } else {
            base
        }
    }

    /// Pick the best candidate for `target`.
    ///
    /// Ties keep the candidate seen first, so callers should pass candidates
    /// in a stable order.
    pub fn resolve<S: AsRef<str>>(&self, target: &str, candidates: &[S]) -> MatchResult {
        let norm_target = normalize(target);

        let mut best: Option<&str> = None;
        let mut best_score = 0.0_f64;
        for candidate in candidates {
            let candidate = candidate.as_ref();
            let s = self.score(&norm_target, &normalize(candidate));
            if s > best_score {
                best_score = s;
                best = Some(candidate);
            }
        }

        match best {
            Some(candidate) if best_score > self.min_score => {
                debug!(target = %target, candidate = %candidate, score = best_score, "Asset name resolved");
                MatchResult {
                    candidate: Some(candidate.to_string()),
                    score: best_score,
                }
            }
            _ => {
                debug!(target = %target, score = best_score, "No asset cleared the threshold");
                MatchResult::none(best_score)
            }
        }
    }
}

/// Resolve with the fixed compatibility policy (0.8 boost floor, 0.4 acceptance).
pub fn resolve<S: AsRef<str>>(target: &str, candidates: &[S]) -> MatchResult {
    MatchPolicy::default().resolve(target, candidates)
}

/// Resolve a name against the identifiers a candidate source currently lists.
pub fn resolve_asset(name: &str, candidates: &dyn CandidateSource, category: AssetCategory) -> MatchResult {
    resolve(name, &candidates.list_candidates(category))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn folders() -> Vec<String> {
        ["NEW_BEAT_STREET", "BEAT_SPORTY_CBS", "ALL_NEW_VARIO_160_CBS"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    #[test]
    fn normalize_replaces_separators() {
        assert_eq!(normalize("ALL_NEW_BEAT_STREET"), "all new beat street");
        assert_eq!(normalize("  Beat Street "), "beat street");
    }

    #[test]
    fn containment_boost_picks_street() {
        let result = resolve("beat_street", &folders()[..2]);
        assert_eq!(result.candidate.as_deref(), Some("NEW_BEAT_STREET"));
        assert!(result.score >= 0.8);
    }

    #[test]
    fn spelling_variants_resolve_alike() {
        for name in ["BEAT_STREET", "Beat Street", "beat street"] {
            assert_eq!(
                resolve(name, &folders()).candidate.as_deref(),
                Some("NEW_BEAT_STREET"),
                "{name}"
            );
        }
    }

    #[test]
    fn unknown_name_is_rejected() {
        let result = resolve("zzz_unknown_model", &folders());
        assert!(result.candidate.is_none());
        assert!(!result.is_match());
    }

    #[test]
    fn empty_candidates_yield_none() {
        let none: Vec<String> = vec![];
        assert_eq!(resolve("vario", &none), MatchResult::none(0.0));
    }

    #[test]
    fn empty_target_never_matches() {
        assert!(resolve("", &folders()).candidate.is_none());
        assert!(resolve("__", &folders()).candidate.is_none());
    }

    #[test]
    fn ties_keep_first_candidate() {
        let candidates = ["VARIO_125", "VARIO_160"];
        let result = resolve("vario", &candidates);
        assert_eq!(result.candidate.as_deref(), Some("VARIO_125"));

        let reversed = ["VARIO_160", "VARIO_125"];
        assert_eq!(resolve("vario", &reversed).candidate.as_deref(), Some("VARIO_160"));
    }

    #[test]
    fn boost_never_lowers_a_higher_score() {
        let result = resolve("new beat street", &["NEW_BEAT_STREET"]);
        assert!((result.score - 1.0).abs() < 1e-9);
    }

    #[test]
    fn score_at_floor_is_rejected() {
        let strict = MatchPolicy {
            min_score: 0.8,
            containment_floor: 0.8,
        };
        // Containment yields exactly the floor, which does not exceed min_score
        assert!(strict.resolve("vario", &["ALL_NEW_VARIO_160_CBS"]).candidate.is_none());
        assert!(resolve("vario", &["ALL_NEW_VARIO_160_CBS"]).candidate.is_some());
    }

    #[test]
    fn resolve_asset_lists_the_category() {
        let result = resolve_asset("vario 160", &folders(), AssetCategory::Motors);
        assert_eq!(result.candidate.as_deref(), Some("ALL_NEW_VARIO_160_CBS"));
    }
}
