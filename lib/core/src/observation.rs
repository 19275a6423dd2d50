//! Per-request observations extracted from an image
//!
//! Shape probabilities enter the engine as percentages (0-100), either as a
//! label map or as the classifier's formatted string
//! `"<label> (<percent>%), <label> (<percent>%)"`. They are converted to
//! fractions of 1 here, once, and every scorer works with fractions.

use ahash::AHashMap;
use smallvec::SmallVec;
use std::collections::HashMap;

/// Shape label to probability (fraction in [0, 1])
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShapeDistribution {
    probs: AHashMap<String, f32>,
}

impl ShapeDistribution {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from percentages in [0, 100]
    pub fn from_percentages<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, f32)>,
        K: Into<String>,
    {
        let mut dist = Self::new();
        for (label, percent) in entries {
            dist.insert(label.into(), percent / 100.0);
        }
        dist
    }

    /// Build from probabilities already expressed as fractions of 1
    pub fn from_fractions<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, f32)>,
        K: Into<String>,
    {
        let mut dist = Self::new();
        for (label, fraction) in entries {
            dist.insert(label.into(), fraction);
        }
        dist
    }

    /// Parse the classifier's formatted output, skipping malformed segments
    pub fn parse(formatted: &str) -> Self {
        Self::parse_with_skipped(formatted).0
    }

    /// Like [`parse`](Self::parse) but also reports how many segments were skipped
    pub fn parse_with_skipped(formatted: &str) -> (Self, usize) {
        let mut dist = Self::new();
        let mut skipped = 0;

        for segment in formatted.split(',') {
            let segment = segment.trim();
            if segment.is_empty() {
                continue;
            }
            match parse_segment(segment) {
                Some((label, percent)) if dist.insert(label.to_string(), percent / 100.0) => {}
                _ => {
                    tracing::trace!(segment, "skipping malformed shape segment");
                    skipped += 1;
                }
            }
        }

        (dist, skipped)
    }

    /// Probability of `label`, zero when absent
    pub fn probability(&self, label: &str) -> f32 {
        self.probs.get(label).copied().unwrap_or(0.0)
    }

    pub fn contains(&self, label: &str) -> bool {
        self.probs.contains_key(label)
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.probs.keys().map(String::as_str)
    }

    /// Most probable label; ties resolve to the lexicographically smaller label
    pub fn top(&self) -> Option<(&str, f32)> {
        self.probs
            .iter()
            .max_by(|a, b| a.1.total_cmp(b.1).then_with(|| b.0.cmp(a.0)))
            .map(|(label, p)| (label.as_str(), *p))
    }

    pub fn len(&self) -> usize {
        self.probs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.probs.is_empty()
    }

    /// Returns false when the entry was rejected
    fn insert(&mut self, label: String, fraction: f32) -> bool {
        let label = label.trim();
        if label.is_empty() || !fraction.is_finite() || fraction < 0.0 {
            return false;
        }
        let fraction = fraction.min(1.0);
        let slot = self.probs.entry(label.to_string()).or_insert(fraction);
        *slot = slot.max(fraction);
        true
    }
}

/// `<label> (<number>%)`; nothing may follow the closing parenthesis
fn parse_segment(segment: &str) -> Option<(&str, f32)> {
    let inner = segment.strip_suffix(')')?;
    let open = inner.rfind('(')?;
    let label = inner[..open].trim();
    let value = inner[open + 1..].trim().strip_suffix('%')?.trim();
    let percent = value.parse::<f32>().ok()?;
    Some((label, percent))
}

/// Shape evidence in any of the accepted input forms
#[derive(Debug, Clone)]
pub enum ShapeInput {
    /// Label to percentage in [0, 100]
    Percentages(HashMap<String, f32>),
    /// `"<label> (<percent>%), ..."`
    Formatted(String),
    /// Already converted to fractions
    Distribution(ShapeDistribution),
}

impl ShapeInput {
    pub fn into_distribution(self) -> ShapeDistribution {
        match self {
            ShapeInput::Percentages(map) => ShapeDistribution::from_percentages(map),
            ShapeInput::Formatted(text) => ShapeDistribution::parse(&text),
            ShapeInput::Distribution(dist) => dist,
        }
    }
}

impl From<&str> for ShapeInput {
    fn from(text: &str) -> Self {
        ShapeInput::Formatted(text.to_string())
    }
}

impl From<String> for ShapeInput {
    fn from(text: String) -> Self {
        ShapeInput::Formatted(text)
    }
}

impl From<HashMap<String, f32>> for ShapeInput {
    fn from(map: HashMap<String, f32>) -> Self {
        ShapeInput::Percentages(map)
    }
}

impl From<ShapeDistribution> for ShapeInput {
    fn from(dist: ShapeDistribution) -> Self {
        ShapeInput::Distribution(dist)
    }
}

/// Everything observed about one pill
#[derive(Debug, Clone, Default)]
pub struct ObservedAttributes {
    pub shape: ShapeDistribution,
    pub colors: SmallVec<[String; 4]>,
    /// Raw recognized text; scorers normalize it themselves
    pub imprint: String,
}

impl ObservedAttributes {
    /// `colors` is a whitespace-delimited list of color tokens
    pub fn new(shape: impl Into<ShapeInput>, colors: &str, imprint: &str) -> Self {
        Self {
            shape: shape.into().into_distribution(),
            colors: colors.split_whitespace().map(str::to_string).collect(),
            imprint: imprint.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_formatted_shape_string() {
        let dist = ShapeDistribution::parse("원형 (90.5%), 타원형 (7%), 장방형 (2.5%)");
        assert_eq!(dist.len(), 3);
        assert!((dist.probability("원형") - 0.905).abs() < 1e-6);
        assert!((dist.probability("타원형") - 0.07).abs() < 1e-6);
        assert_eq!(dist.top().map(|(label, _)| label), Some("원형"));
    }

    #[test]
    fn test_parse_skips_malformed_segments() {
        let (dist, skipped) =
            ShapeDistribution::parse_with_skipped("원형 (80%), garbage, 타원형 (abc%), (5%), 장방형 (20%)");
        assert_eq!(skipped, 3);
        assert_eq!(dist.len(), 2);
        assert!(dist.contains("원형"));
        assert!(dist.contains("장방형"));
    }

    #[test]
    fn test_parse_rejects_trailing_text_and_missing_percent() {
        let (dist, skipped) =
            ShapeDistribution::parse_with_skipped("원형 (90%) junk, 타원형 (10), 장방형 (5 %)");
        assert_eq!(skipped, 2);
        assert_eq!(dist.len(), 1);
        assert!((dist.probability("장방형") - 0.05).abs() < 1e-6);
        assert!(!dist.contains("원형"));
        assert!(!dist.contains("타원형"));
    }

    #[test]
    fn test_parse_model_failure_message() {
        let dist = ShapeDistribution::parse("모델 로드 실패");
        assert!(dist.is_empty());
    }

    #[test]
    fn test_percentages_are_converted_and_clamped() {
        let dist = ShapeDistribution::from_percentages([("원형", 90.0), ("타원형", 150.0), ("장방형", -5.0)]);
        assert!((dist.probability("원형") - 0.9).abs() < 1e-6);
        assert_eq!(dist.probability("타원형"), 1.0);
        assert!(!dist.contains("장방형"));
    }

    #[test]
    fn test_repeated_label_keeps_highest() {
        let dist = ShapeDistribution::parse("원형 (30%), 원형 (60%), 원형 (10%)");
        assert!((dist.probability("원형") - 0.6).abs() < 1e-6);
    }

    #[test]
    fn test_absent_label_is_zero() {
        let dist = ShapeDistribution::from_fractions([("원형", 0.5)]);
        assert_eq!(dist.probability("삼각형"), 0.0);
    }

    #[test]
    fn test_observed_attributes_from_map() {
        let map = HashMap::from([("원형".to_string(), 90.0_f32)]);
        let observed = ObservedAttributes::new(map, " 하양  노랑 ", "A100");
        assert!((observed.shape.probability("원형") - 0.9).abs() < 1e-6);
        assert_eq!(observed.colors.as_slice(), &["하양".to_string(), "노랑".to_string()]);
        assert_eq!(observed.imprint, "A100");
    }
}
