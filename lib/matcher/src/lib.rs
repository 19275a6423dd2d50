//! # pillx Matcher
//!
//! Ranks catalog records against the attributes observed on a pill image.
//!
//! ## Features
//!
//! - **Versioned scoring policies**: a [`ScoringPolicy`] owns both its cheap
//!   pre-filter and its scoring law; `v2` ([`ProbabilisticPolicy`]) is the
//!   default, `v1` ([`LegacyPolicy`]) reproduces the earlier flat scoring
//! - **Filter cascade**: pre-filter stages narrow the catalog, with a full
//!   scan when nothing survives
//! - **Stable ranking**: ties keep catalog order, also when scoring runs on
//!   the rayon pool
//! - **Explainability**: per-component score breakdown and run statistics
//!
//! ## Example
//!
//! ```rust
//! use pillx_core::{Catalog, CatalogRecord};
//! use pillx_matcher::{Matcher, MatcherConfig};
//! use pillx_similarity::ColorTable;
//! use std::collections::HashMap;
//! use std::sync::Arc;
//!
//! let catalog = Catalog::new(vec![
//!     CatalogRecord::new("Aspirin100", "원형", "하양").with_imprints("A100", ""),
//! ]);
//! let matcher = Matcher::new(MatcherConfig::default(), Arc::new(ColorTable::standard())).unwrap();
//!
//! let shape = HashMap::from([("원형".to_string(), 90.0_f32)]);
//! let results = matcher.find_best_match(&catalog, shape, "하양", "A100");
//! assert_eq!(results.len(), 1);
//! assert!(results[0].score >= 85.0);
//! ```
//!
//! ## Matching Flow
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │ Observation │────>│ Pre-filter  │────>│   Scoring   │
//! │ (shape/...) │     │ (policy)    │     │ (policy)    │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!                                                │
//!                                         ┌──────┴──────┐
//!                                         │ Sort, drop  │
//!                                         │ <= 0, top K │
//!                                         └─────────────┘
//! ```

pub mod weights;
pub mod filter;
pub mod policy;
pub mod config;
pub mod matcher;
pub mod explain;

pub use weights::{ScoreWeights, WeightsError};
pub use filter::{Filter, FilterCondition, RecordFilter};
pub use policy::{
    LegacyPolicy,
    PolicyVersion,
    ProbabilisticPolicy,
    Query,
    ScoreBreakdown,
    ScoringPolicy,
};
pub use config::{MatcherConfig, DEFAULT_LIMIT, DEFAULT_PARALLEL_THRESHOLD};
pub use matcher::{MatchOutcome, Matcher, ScoredCandidate};
pub use explain::{ExplainedCandidate, MatchResponse, MatchStats};
