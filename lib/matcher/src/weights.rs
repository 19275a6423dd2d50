//! Score caps and bonuses for the probabilistic scoring law
//!
//! Shape, color and imprint contribute independently capped sub-scores.
//! Defaults: shape 25, color 25, imprint 50 plus a 20 point bonus for
//! near-exact imprints and a 10 point bonus when neither side has an imprint.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScoreWeights {
    /// Points for a shape probability of 1.0
    pub shape: f32,
    /// Points for a perfect color set similarity
    pub color: f32,
    /// Points for a fuzzy ratio of 100
    pub imprint: f32,
    /// Added when the best fuzzy ratio exceeds `exact_imprint_threshold`
    pub exact_imprint_bonus: f32,
    pub exact_imprint_threshold: u8,
    /// Awarded when neither the observation nor the record carries an imprint
    pub blank_imprint_bonus: f32,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            shape: 25.0,
            color: 25.0,
            imprint: 50.0,
            exact_imprint_bonus: 20.0,
            exact_imprint_threshold: 95,
            blank_imprint_bonus: 10.0,
        }
    }
}

impl ScoreWeights {
    /// Check that every cap and bonus is a finite, non-negative number
    pub fn validate(&self) -> Result<(), WeightsError> {
        let fields = [
            ("shape", self.shape),
            ("color", self.color),
            ("imprint", self.imprint),
            ("exact_imprint_bonus", self.exact_imprint_bonus),
            ("blank_imprint_bonus", self.blank_imprint_bonus),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(WeightsError::InvalidWeight { field: name, value });
            }
        }
        if self.exact_imprint_threshold > 100 {
            return Err(WeightsError::ThresholdOutOfRange(self.exact_imprint_threshold));
        }
        Ok(())
    }

    /// Highest score a single record can reach
    pub fn max_total(&self) -> f32 {
        self.shape + self.color + self.imprint + self.exact_imprint_bonus.max(self.blank_imprint_bonus)
    }
}

/// Errors that can occur during weight validation
#[derive(Debug, Clone, thiserror::Error)]
pub enum WeightsError {
    #[error("Weight '{field}' must be finite and non-negative, got {value}")]
    InvalidWeight { field: &'static str, value: f32 },

    #[error("Exact imprint threshold must be within 0..=100, got {0}")]
    ThresholdOutOfRange(u8),
}
