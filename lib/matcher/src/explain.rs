//! Explainability for ranked candidates
//!
//! Output structures that show how each score was composed, for JSON
//! responses and diagnostics.

use crate::matcher::{MatchOutcome, ScoredCandidate};
use serde::Serialize;
use std::collections::BTreeMap;

/// A ranked candidate with a per-component score breakdown
#[derive(Debug, Clone, Serialize)]
pub struct ExplainedCandidate {
    /// Catalog position
    pub index: usize,
    pub summary: String,
    pub score: f32,
    /// Contribution of "shape", "color" and "imprint"
    pub explain: BTreeMap<&'static str, f32>,
}

impl ExplainedCandidate {
    pub fn from_scored(candidate: ScoredCandidate) -> Self {
        let explain = BTreeMap::from([
            ("shape", candidate.breakdown.shape),
            ("color", candidate.breakdown.color),
            ("imprint", candidate.breakdown.imprint),
        ]);
        Self {
            index: candidate.index,
            summary: candidate.summary,
            score: candidate.score,
            explain,
        }
    }
}

/// Response body for a match request
#[derive(Debug, Clone, Serialize)]
pub struct MatchResponse {
    pub result: Vec<ExplainedCandidate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<MatchStats>,
}

impl MatchResponse {
    pub fn from_outcome(outcome: MatchOutcome, include_stats: bool) -> Self {
        Self {
            result: outcome.candidates.into_iter().map(ExplainedCandidate::from_scored).collect(),
            stats: include_stats.then_some(outcome.stats),
        }
    }
}

/// Summary statistics for one match run
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MatchStats {
    pub catalog_size: usize,
    /// Records scored after pre-filtering
    pub candidates_count: usize,
    /// Pre-filter selected nothing and the full catalog was scored
    pub used_fallback: bool,
    pub results_count: usize,
    pub avg_score: f32,
    pub best_score: f32,
    /// Component that contributed most to the best result
    pub top_contributing_component: Option<&'static str>,
}

impl MatchStats {
    /// `results` must already be sorted by score, best first
    pub fn compute(
        results: &[ScoredCandidate],
        catalog_size: usize,
        candidates_count: usize,
        used_fallback: bool,
    ) -> Self {
        let Some(best) = results.first() else {
            return Self {
                catalog_size,
                candidates_count,
                used_fallback,
                results_count: 0,
                avg_score: 0.0,
                best_score: 0.0,
                top_contributing_component: None,
            };
        };

        let avg_score = results.iter().map(|r| r.score).sum::<f32>() / results.len() as f32;

        Self {
            catalog_size,
            candidates_count,
            used_fallback,
            results_count: results.len(),
            avg_score,
            best_score: best.score,
            top_contributing_component: Some(best.breakdown.top_component()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::ScoreBreakdown;

    fn candidate(index: usize, shape: f32, color: f32, imprint: f32) -> ScoredCandidate {
        let breakdown = ScoreBreakdown { shape, color, imprint };
        ScoredCandidate {
            index,
            summary: format!("pill-{}", index),
            score: breakdown.total(),
            breakdown,
        }
    }

    #[test]
    fn test_explained_candidate() {
        let explained = ExplainedCandidate::from_scored(candidate(3, 22.5, 25.0, 70.0));
        assert_eq!(explained.index, 3);
        assert_eq!(explained.score, 117.5);
        assert_eq!(explained.explain.len(), 3);
        assert_eq!(explained.explain["imprint"], 70.0);
    }

    #[test]
    fn test_stats() {
        let results = vec![candidate(0, 25.0, 25.0, 10.0), candidate(1, 20.0, 0.0, 0.0)];
        let stats = MatchStats::compute(&results, 100, 12, false);

        assert_eq!(stats.catalog_size, 100);
        assert_eq!(stats.candidates_count, 12);
        assert_eq!(stats.results_count, 2);
        assert_eq!(stats.best_score, 60.0);
        assert!((stats.avg_score - 40.0).abs() < 1e-4);
        assert_eq!(stats.top_contributing_component, Some("shape"));
    }

    #[test]
    fn test_empty_stats() {
        let stats = MatchStats::compute(&[], 5, 5, true);
        assert_eq!(stats.results_count, 0);
        assert_eq!(stats.best_score, 0.0);
        assert!(stats.used_fallback);
        assert!(stats.top_contributing_component.is_none());
    }

    #[test]
    fn test_response_serialization() {
        let results = vec![candidate(0, 25.0, 25.0, 10.0)];
        let stats = MatchStats::compute(&results, 1, 1, false);
        let outcome = MatchOutcome { candidates: results, stats };

        let json = serde_json::to_string(&MatchResponse::from_outcome(outcome.clone(), true)).unwrap();
        assert!(json.contains("\"result\""));
        assert!(json.contains("\"explain\""));
        assert!(json.contains("\"stats\""));

        let json = serde_json::to_string(&MatchResponse::from_outcome(outcome, false)).unwrap();
        assert!(!json.contains("\"stats\""));
    }
}
