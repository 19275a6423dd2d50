//! # pillx
//!
//! Identifies a pill by ranking a reference catalog against the shape, color
//! and imprint observed on an image.
//!
//! Image processing, OCR and shape classification happen upstream; pillx
//! consumes their output:
//!
//! - a shape probability distribution (percentages, or the classifier's
//!   formatted string `"원형 (90%), 타원형 (10%)"`)
//! - a whitespace-delimited list of detected color names
//! - the recognized imprint text
//!
//! ## Quick Start
//!
//! ### As a CLI
//!
//! ```bash
//! pillx --catalog pills.json --shape "원형 (90%)" --colors 하양 --imprint A100
//! ```
//!
//! ### As a Library
//!
//! ```rust
//! use pillx::prelude::*;
//! use std::sync::Arc;
//!
//! let catalog = Catalog::new(vec![
//!     CatalogRecord::new("Aspirin100", "원형", "하양").with_imprints("A100", ""),
//!     CatalogRecord::new("타이레놀정500", "장방형", "하양").with_imprints("TY", "500"),
//! ]);
//!
//! let matcher = Matcher::new(MatcherConfig::default(), Arc::new(ColorTable::standard())).unwrap();
//! let results = matcher.find_best_match(&catalog, "원형 (90%)", "하양", "a100");
//!
//! assert_eq!(results[0].index, 0);
//! ```
//!
//! ## Crate Structure
//!
//! - [`pillx-core`](https://docs.rs/pillx-core) - catalog records and observations
//! - [`pillx-similarity`](https://docs.rs/pillx-similarity) - text distance, imprint normalization, color similarity
//! - [`pillx-matcher`](https://docs.rs/pillx-matcher) - scoring policies, filtering and ranking

// Re-export core types
pub use pillx_core::{
    Catalog, CatalogRecord, RawRecord,
    ObservedAttributes, ShapeDistribution, ShapeInput,
    Error, Result,
};

// Re-export similarity primitives
pub use pillx_similarity::{
    ColorTable, CharClass,
    char_class, edit_distance, fuzzy_ratio, normalize,
};

// Re-export matcher
pub use pillx_matcher::{
    Matcher, MatcherConfig, MatchOutcome, MatchResponse, MatchStats,
    PolicyVersion, ScoreBreakdown, ScoreWeights, ScoredCandidate, ScoringPolicy,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        Catalog, CatalogRecord, RawRecord,
        ObservedAttributes, ShapeInput,
        ColorTable,
        Matcher, MatcherConfig, PolicyVersion, ScoredCandidate,
        Error, Result,
    };
}
