//! # pillx Core
//!
//! Core data types for the pillx identification engine.
//!
//! - [`CatalogRecord`] / [`Catalog`] - validated, immutable reference catalog
//! - [`RawRecord`] - a catalog row as handed over by an external loader
//! - [`ShapeDistribution`] / [`ShapeInput`] - shape classifier output
//! - [`ObservedAttributes`] - everything observed about one pill
//!
//! ## Example
//!
//! ```rust
//! use pillx_core::{Catalog, RawRecord, ObservedAttributes};
//!
//! let catalog = Catalog::from_records(vec![RawRecord {
//!     name: Some("Aspirin100".to_string()),
//!     shape: Some("원형".to_string()),
//!     color: Some("하양".to_string()),
//!     primary_imprint: Some("A100".to_string()),
//!     secondary_imprint: None,
//! }])
//! .unwrap();
//! assert_eq!(catalog.len(), 1);
//!
//! let observed = ObservedAttributes::new("원형 (90%), 타원형 (10%)", "하양", "A100");
//! assert!((observed.shape.probability("원형") - 0.9).abs() < 1e-6);
//! ```

pub mod error;
pub mod record;
pub mod observation;

pub use error::{Error, Result};
pub use record::{Catalog, CatalogRecord, ColorTokens, RawRecord};
pub use observation::{ObservedAttributes, ShapeDistribution, ShapeInput};
