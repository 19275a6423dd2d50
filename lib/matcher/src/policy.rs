//! Versioned scoring policies
//!
//! A policy owns both its pre-filter and its scoring law. The two are
//! coupled: the filter assumes the same representation of shape and color
//! evidence that the scorer rewards, so they are never mixed across versions.

use crate::filter::FilterCondition;
use crate::weights::ScoreWeights;
use pillx_core::{CatalogRecord, ObservedAttributes, ShapeDistribution};
use pillx_similarity::{char_class, edit_distance, fuzzy_ratio, normalize, ColorTable};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Observation prepared once per request
#[derive(Debug, Clone)]
pub struct Query<'a> {
    pub shape: &'a ShapeDistribution,
    pub colors: &'a [String],
    /// Normalized imprint
    pub imprint: String,
}

impl<'a> Query<'a> {
    pub fn new(observed: &'a ObservedAttributes) -> Self {
        Self {
            shape: &observed.shape,
            colors: &observed.colors,
            imprint: normalize(&observed.imprint),
        }
    }
}

/// Per-component contributions to a record's score
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub shape: f32,
    pub color: f32,
    pub imprint: f32,
}

impl ScoreBreakdown {
    pub fn total(&self) -> f32 {
        self.shape + self.color + self.imprint
    }

    /// Component with the largest contribution
    pub fn top_component(&self) -> &'static str {
        let mut best = ("shape", self.shape);
        for candidate in [("color", self.color), ("imprint", self.imprint)] {
            if candidate.1 > best.1 {
                best = candidate;
            }
        }
        best.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicyVersion {
    /// Flat shape/color membership, edit-distance imprint scoring
    V1,
    /// Probability-weighted shape, perceptual color, fuzzy-ratio imprint scoring
    #[default]
    V2,
}

impl PolicyVersion {
    pub fn build(self, weights: ScoreWeights) -> Arc<dyn ScoringPolicy> {
        match self {
            PolicyVersion::V1 => Arc::new(LegacyPolicy),
            PolicyVersion::V2 => Arc::new(ProbabilisticPolicy::new(weights)),
        }
    }
}

impl fmt::Display for PolicyVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PolicyVersion::V1 => write!(f, "v1"),
            PolicyVersion::V2 => write!(f, "v2"),
        }
    }
}

impl FromStr for PolicyVersion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "v1" | "legacy" => Ok(PolicyVersion::V1),
            "v2" | "probabilistic" => Ok(PolicyVersion::V2),
            other => Err(format!("unknown scoring policy '{}', expected v1 or v2", other)),
        }
    }
}

/// Strategy injected into the matcher
pub trait ScoringPolicy: Send + Sync + fmt::Debug {
    fn version(&self) -> PolicyVersion;

    /// Filter stages tried in order; the first stage selecting any record wins
    fn prefilter(&self, query: &Query<'_>) -> Vec<FilterCondition>;

    fn score(&self, record: &CatalogRecord, query: &Query<'_>, colors: &ColorTable) -> ScoreBreakdown;
}

/// Current scoring law
#[derive(Debug, Clone, Default)]
pub struct ProbabilisticPolicy {
    weights: ScoreWeights,
}

impl ProbabilisticPolicy {
    pub fn new(weights: ScoreWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &ScoreWeights {
        &self.weights
    }

    fn imprint_score(&self, record: &CatalogRecord, observed: &str) -> f32 {
        let primary = normalize(record.primary_imprint());
        let secondary = normalize(record.secondary_imprint());
        let catalog_blank = primary.is_empty() && secondary.is_empty();

        match (observed.is_empty(), catalog_blank) {
            (true, true) => self.weights.blank_imprint_bonus,
            (true, false) | (false, true) => 0.0,
            (false, false) => {
                let combined = format!("{}{}", primary, secondary);
                let best = [primary.as_str(), secondary.as_str(), combined.as_str()]
                    .iter()
                    .map(|candidate| fuzzy_ratio(observed, candidate))
                    .max()
                    .unwrap_or(0);

                let mut score = self.weights.imprint * f32::from(best) / 100.0;
                if best > self.weights.exact_imprint_threshold {
                    score += self.weights.exact_imprint_bonus;
                }
                score
            }
        }
    }
}

impl ScoringPolicy for ProbabilisticPolicy {
    fn version(&self) -> PolicyVersion {
        PolicyVersion::V2
    }

    fn prefilter(&self, query: &Query<'_>) -> Vec<FilterCondition> {
        let mut any = vec![FilterCondition::ShapeIn(
            query.shape.labels().map(str::to_string).collect(),
        )];
        any.extend(query.colors.iter().cloned().map(FilterCondition::ColorContains));
        if !query.imprint.is_empty() {
            any.push(FilterCondition::ImprintContains(query.imprint.clone()));
        }
        vec![FilterCondition::Or(any)]
    }

    fn score(&self, record: &CatalogRecord, query: &Query<'_>, colors: &ColorTable) -> ScoreBreakdown {
        ScoreBreakdown {
            shape: self.weights.shape * query.shape.probability(record.shape()),
            color: self.weights.color * colors.set_similarity(query.colors, record.color_tokens()),
            imprint: self.imprint_score(record, &query.imprint),
        }
    }
}

/// Earlier scoring law: flat points for shape and color membership and an
/// edit-distance imprint score with a letter/digit confusion penalty
#[derive(Debug, Clone, Copy, Default)]
pub struct LegacyPolicy;

impl LegacyPolicy {
    pub const SHAPE_POINTS: f32 = 30.0;
    pub const COLOR_POINTS: f32 = 30.0;
    pub const IMPRINT_POINTS: f32 = 40.0;
    pub const POINTS_PER_EDIT: f32 = 10.0;
    pub const CLASS_PENALTY: f32 = 20.0;
    /// Edit distance still accepted by the imprint pre-filter
    pub const NEAR_DISTANCE: usize = 2;

    fn imprint_score(record: &CatalogRecord, observed: &str) -> f32 {
        let primary = normalize(record.primary_imprint());
        let secondary = normalize(record.secondary_imprint());

        let d1 = edit_distance(observed, &primary);
        let d2 = edit_distance(observed, &secondary);
        let (closest, distance) = if d1 <= d2 { (primary, d1) } else { (secondary, d2) };

        let penalty = if char_class(observed).conflicts_with(char_class(&closest)) {
            Self::CLASS_PENALTY
        } else {
            0.0
        };

        (Self::IMPRINT_POINTS - Self::POINTS_PER_EDIT * distance as f32 - penalty).max(0.0)
    }
}

impl ScoringPolicy for LegacyPolicy {
    fn version(&self) -> PolicyVersion {
        PolicyVersion::V1
    }

    fn prefilter(&self, query: &Query<'_>) -> Vec<FilterCondition> {
        let mut stages = Vec::with_capacity(2);
        if !query.imprint.is_empty() {
            stages.push(FilterCondition::ImprintNear {
                text: query.imprint.clone(),
                max_distance: Self::NEAR_DISTANCE,
            });
        }
        stages.push(FilterCondition::And(vec![
            FilterCondition::ShapeIn(query.shape.labels().map(str::to_string).collect()),
            FilterCondition::Or(query.colors.iter().cloned().map(FilterCondition::ColorContains).collect()),
        ]));
        stages
    }

    fn score(&self, record: &CatalogRecord, query: &Query<'_>, _colors: &ColorTable) -> ScoreBreakdown {
        let shape = if query.shape.contains(record.shape()) { Self::SHAPE_POINTS } else { 0.0 };
        let color_match = !query.colors.is_empty()
            && query.colors.iter().all(|c| record.color().contains(c.as_str()));
        let color = if color_match { Self::COLOR_POINTS } else { 0.0 };

        ScoreBreakdown {
            shape,
            color,
            imprint: Self::imprint_score(record, &query.imprint),
        }
    }
}
