//! # pillx Similarity
//!
//! Leaf similarity primitives used by the pillx scorers.
//!
//! - **Text distance**: [`edit_distance`] and [`fuzzy_ratio`] over normalized strings
//! - **Imprint normalization**: [`normalize`] and [`char_class`] for OCR / catalog text
//! - **Color similarity**: [`ColorTable`] with per-pair and set-to-set similarity
//!
//! ## Example
//!
//! ```rust
//! use pillx_similarity::{normalize, fuzzy_ratio, ColorTable};
//!
//! let observed = normalize("ty-5oo");
//! assert_eq!(observed, "TY5OO");
//! assert_eq!(fuzzy_ratio(&observed, &normalize("TY 500")), 60);
//!
//! let table = ColorTable::standard();
//! assert_eq!(table.set_similarity(&["하양"], &["하양", "노랑"]), 1.0);
//! ```

pub mod distance;
pub mod imprint;
pub mod color;

pub use distance::{edit_distance, fuzzy_ratio};
pub use imprint::{char_class, normalize, CharClass};
pub use color::{ColorTable, ColorTableError, DEFAULT_EFFECTIVE_DISTANCE, MAX_RGB_DISTANCE};
