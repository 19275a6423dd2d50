//! Candidate selection and ranking
//!
//! Filters the catalog with the policy's cheap pre-filter, scores the
//! surviving records, and returns the best ones in score order. Ties keep
//! catalog order.

use crate::config::MatcherConfig;
use crate::explain::MatchStats;
use crate::filter::{Filter, RecordFilter};
use crate::policy::{Query, ScoreBreakdown, ScoringPolicy};
use ordered_float::OrderedFloat;
use pillx_core::{Catalog, ObservedAttributes, Result, ShapeInput};
use pillx_similarity::ColorTable;
use rayon::prelude::*;
use serde::Serialize;
use std::cmp::Reverse;
use std::sync::Arc;
use tracing::debug;

/// A ranked catalog record
#[derive(Debug, Clone, Serialize)]
pub struct ScoredCandidate {
    /// Position in the catalog
    pub index: usize,
    pub summary: String,
    pub score: f32,
    pub breakdown: ScoreBreakdown,
}

/// Ranked candidates plus how they were obtained
#[derive(Debug, Clone)]
pub struct MatchOutcome {
    pub candidates: Vec<ScoredCandidate>,
    pub stats: MatchStats,
}

/// Stateless matching engine; safe to share across threads
#[derive(Debug, Clone)]
pub struct Matcher {
    config: MatcherConfig,
    colors: Arc<ColorTable>,
    policy: Arc<dyn ScoringPolicy>,
}

impl Matcher {
    /// Create a matcher using the policy named in the config
    pub fn new(config: MatcherConfig, colors: Arc<ColorTable>) -> Result<Self> {
        let policy = config.policy.build(config.weights.clone());
        Self::with_policy(config, colors, policy)
    }

    /// Create a matcher with a custom scoring policy
    pub fn with_policy(
        config: MatcherConfig,
        colors: Arc<ColorTable>,
        policy: Arc<dyn ScoringPolicy>,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, colors, policy })
    }

    pub fn config(&self) -> &MatcherConfig {
        &self.config
    }

    pub fn policy(&self) -> &dyn ScoringPolicy {
        self.policy.as_ref()
    }

    pub fn colors(&self) -> &ColorTable {
        &self.colors
    }

    /// Rank catalog records against raw observations
    ///
    /// # Arguments
    /// * `shape` - label to percentage map, formatted classifier string, or a prepared distribution
    /// * `colors` - whitespace-delimited color tokens
    /// * `imprint` - recognized imprint text in any case or punctuation
    pub fn find_best_match(
        &self,
        catalog: &Catalog,
        shape: impl Into<ShapeInput>,
        colors: &str,
        imprint: &str,
    ) -> Vec<ScoredCandidate> {
        let observed = ObservedAttributes::new(shape, colors, imprint);
        self.identify(catalog, &observed).candidates
    }

    /// Rank catalog records and report statistics about the run
    pub fn identify(&self, catalog: &Catalog, observed: &ObservedAttributes) -> MatchOutcome {
        let query = Query::new(observed);
        let (indices, used_fallback) = self.select_candidates(catalog, &query);
        let candidates_count = indices.len();

        let mut scored = self.score_candidates(catalog, &query, indices);

        // Stable: equal scores keep catalog order
        scored.sort_by_key(|(_, breakdown)| Reverse(OrderedFloat(breakdown.total())));

        let candidates: Vec<ScoredCandidate> = scored
            .into_iter()
            .filter(|(_, breakdown)| breakdown.total() > 0.0)
            .take(self.config.limit)
            .filter_map(|(index, breakdown)| {
                catalog.get(index).map(|record| ScoredCandidate {
                    index,
                    summary: record.summary(),
                    score: breakdown.total(),
                    breakdown,
                })
            })
            .collect();

        debug!(
            policy = %self.policy.version(),
            catalog = catalog.len(),
            candidates = candidates_count,
            used_fallback,
            results = candidates.len(),
            "match complete"
        );

        let stats = MatchStats::compute(&candidates, catalog.len(), candidates_count, used_fallback);
        MatchOutcome { candidates, stats }
    }

    /// Indices of records worth scoring, and whether the full-scan fallback was used
    fn select_candidates(&self, catalog: &Catalog, query: &Query<'_>) -> (Vec<usize>, bool) {
        for (stage, condition) in self.policy.prefilter(query).into_iter().enumerate() {
            let filter = RecordFilter::new(condition);
            let selected: Vec<usize> = catalog
                .iter()
                .enumerate()
                .filter(|(_, record)| filter.matches(record))
                .map(|(index, _)| index)
                .collect();

            if !selected.is_empty() {
                debug!(stage, selected = selected.len(), "pre-filter selected candidates");
                return (selected, false);
            }
            debug!(stage, "pre-filter stage selected nothing");
        }

        debug!(catalog = catalog.len(), "falling back to full catalog scan");
        ((0..catalog.len()).collect(), true)
    }

    /// Score in catalog order; the parallel path preserves that order too
    fn score_candidates(
        &self,
        catalog: &Catalog,
        query: &Query<'_>,
        indices: Vec<usize>,
    ) -> Vec<(usize, ScoreBreakdown)> {
        let records = catalog.records();
        let score = |index: usize| (index, self.policy.score(&records[index], query, &self.colors));

        if indices.len() >= self.config.parallel_threshold {
            indices.into_par_iter().map(score).collect()
        } else {
            indices.into_iter().map(score).collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::PolicyVersion;
    use pillx_core::CatalogRecord;
    use std::collections::HashMap;

    fn matcher(config: MatcherConfig) -> Matcher {
        Matcher::new(config, Arc::new(ColorTable::standard())).unwrap()
    }

    fn shape(label: &str, percent: f32) -> HashMap<String, f32> {
        HashMap::from([(label.to_string(), percent)])
    }

    fn sample_catalog() -> Catalog {
        Catalog::new(vec![
            CatalogRecord::new("타이레놀정500", "장방형", "하양").with_imprints("TY", "500"),
            CatalogRecord::new("비맥스메타정", "타원형", "갈색").with_imprints("BM", "X"),
            CatalogRecord::new("삐콤씨정", "타원형", "주황").with_imprints("YHC", "B-C"),
            CatalogRecord::new("Aspirin100", "원형", "하양").with_imprints("A100", ""),
            CatalogRecord::new("무각인정", "원형", "하양"),
        ])
    }

    #[test]
    fn test_exact_match_ranks_first() {
        let m = matcher(MatcherConfig::default());
        let results = m.find_best_match(&sample_catalog(), shape("원형", 90.0), "하양", "A100");

        assert_eq!(results[0].index, 3);
        assert!(results[0].score >= 85.0);
        assert!(results[0].summary.starts_with("Aspirin100"));
    }

    #[test]
    fn test_results_sorted_positive_and_limited() {
        let m = matcher(MatcherConfig { limit: 2, ..Default::default() });
        let results = m.find_best_match(&sample_catalog(), "원형 (60%), 타원형 (40%)", "하양 갈색", "");

        assert!(results.len() <= 2);
        assert!(results.iter().all(|c| c.score > 0.0));
        assert!(results.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn test_ties_keep_catalog_order() {
        let catalog = Catalog::new(
            (0..6)
                .map(|i| CatalogRecord::new(format!("pill-{}", i), "원형", "하양"))
                .collect(),
        );
        let m = matcher(MatcherConfig { limit: 10, ..Default::default() });
        let results = m.find_best_match(&catalog, shape("원형", 100.0), "하양", "");

        let order: Vec<usize> = results.iter().map(|c| c.index).collect();
        assert_eq!(order, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_parallel_scoring_keeps_tie_order() {
        let catalog = Catalog::new(
            (0..64)
                .map(|i| {
                    let color = if i % 3 == 0 { "하양" } else { "투명" };
                    CatalogRecord::new(format!("pill-{}", i), "원형", color)
                })
                .collect(),
        );
        let sequential = matcher(MatcherConfig { limit: 64, parallel_threshold: usize::MAX, ..Default::default() });
        let parallel = matcher(MatcherConfig { limit: 64, parallel_threshold: 0, ..Default::default() });

        let a = sequential.find_best_match(&catalog, shape("원형", 80.0), "하양", "");
        let b = parallel.find_best_match(&catalog, shape("원형", 80.0), "하양", "");

        let ia: Vec<usize> = a.iter().map(|c| c.index).collect();
        let ib: Vec<usize> = b.iter().map(|c| c.index).collect();
        assert_eq!(ia, ib);
        assert_eq!(ia[0], 0);
        assert_eq!(ia[1], 3);
    }

    #[test]
    fn test_fallback_scans_whole_catalog() {
        let m = matcher(MatcherConfig::default());
        let observed = ObservedAttributes::new("", "", "");
        let outcome = m.identify(&sample_catalog(), &observed);

        assert!(outcome.stats.used_fallback);
        assert_eq!(outcome.stats.candidates_count, 5);
        // only the blank record earns the no-imprint agreement bonus
        assert_eq!(outcome.candidates.len(), 1);
        assert_eq!(outcome.candidates[0].index, 4);
        assert_eq!(outcome.candidates[0].score, 10.0);
    }

    #[test]
    fn test_prefilter_narrows_candidates() {
        let m = matcher(MatcherConfig::default());
        let observed = ObservedAttributes::new(shape("장방형", 100.0), "", "");
        let outcome = m.identify(&sample_catalog(), &observed);

        assert!(!outcome.stats.used_fallback);
        assert_eq!(outcome.stats.candidates_count, 1);
        assert_eq!(outcome.candidates[0].index, 0);
    }

    #[test]
    fn test_empty_catalog() {
        let m = matcher(MatcherConfig::default());
        let results = m.find_best_match(&Catalog::default(), shape("원형", 90.0), "하양", "A100");
        assert!(results.is_empty());
    }

    #[test]
    fn test_legacy_policy_cascade() {
        let m = matcher(MatcherConfig { policy: PolicyVersion::V1, limit: 10, ..Default::default() });

        // imprint stage: "A100" contains the text, "500" is two edits away
        let outcome = m.identify(&sample_catalog(), &ObservedAttributes::new("원형 (90%)", "하양", "A10"));
        assert_eq!(outcome.stats.candidates_count, 2);
        assert_eq!(outcome.candidates[0].index, 3);
        assert_eq!(outcome.candidates[0].score, 90.0);
        assert_eq!(outcome.candidates[1].index, 0);
        assert_eq!(outcome.candidates[1].score, 50.0);

        // no imprint evidence: shape and color stage
        let outcome = m.identify(&sample_catalog(), &ObservedAttributes::new("타원형 (90%)", "갈색", ""));
        assert_eq!(outcome.stats.candidates_count, 1);
        assert_eq!(outcome.candidates[0].index, 1);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let result = Matcher::new(MatcherConfig { limit: 0, ..Default::default() }, Arc::new(ColorTable::standard()));
        assert!(result.is_err());
    }
}
