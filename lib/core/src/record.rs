//! Catalog records and the immutable catalog snapshot
//!
//! Upstream loaders hand over rows as [`RawRecord`]s where any column may be
//! missing. [`Catalog::from_records`] validates them once; after that the
//! catalog is read-only and can be shared across threads.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Placeholder written by upstream serializers for missing values
const MISSING_PLACEHOLDER: &str = "nan";

/// Color tokens of a record; most pills carry one or two colors
pub type ColorTokens = SmallVec<[String; 2]>;

/// A catalog row as produced by an external loader
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RawRecord {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub shape: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default, alias = "text")]
    pub primary_imprint: Option<String>,
    #[serde(default, alias = "text2")]
    pub secondary_imprint: Option<String>,
}

/// One validated reference pill; fields are fixed once constructed so the
/// cached color tokens always agree with the color field
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CatalogRecord {
    name: String,
    shape: String,
    /// Space-separated color tokens, as stored upstream
    color: String,
    primary_imprint: String,
    secondary_imprint: String,
    #[serde(skip)]
    color_tokens: ColorTokens,
}

impl CatalogRecord {
    pub fn new(name: impl Into<String>, shape: impl Into<String>, color: impl Into<String>) -> Self {
        let color = color.into();
        let color_tokens = tokenize_colors(&color);
        Self {
            name: name.into(),
            shape: shape.into(),
            color,
            primary_imprint: String::new(),
            secondary_imprint: String::new(),
            color_tokens,
        }
    }

    pub fn with_imprints(mut self, primary: impl Into<String>, secondary: impl Into<String>) -> Self {
        self.primary_imprint = clean_optional(Some(primary.into()));
        self.secondary_imprint = clean_optional(Some(secondary.into()));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn shape(&self) -> &str {
        &self.shape
    }

    pub fn color(&self) -> &str {
        &self.color
    }

    /// Front engraving, empty when the pill carries none
    pub fn primary_imprint(&self) -> &str {
        &self.primary_imprint
    }

    /// Back engraving, empty when the pill carries none
    pub fn secondary_imprint(&self) -> &str {
        &self.secondary_imprint
    }

    /// Color field split on whitespace
    pub fn color_tokens(&self) -> &[String] {
        &self.color_tokens
    }

    /// Human readable one-line description used in result listings
    pub fn summary(&self) -> String {
        format!(
            "{} ({}, {}, 앞:{}/뒤:{})",
            self.name, self.shape, self.color, self.primary_imprint, self.secondary_imprint
        )
    }

    fn from_raw(index: usize, raw: RawRecord) -> Result<Self> {
        let name = required(raw.name);
        let shape = required(raw.shape);
        let color = required(raw.color);

        let missing = |field: &'static str| Error::InvalidRecord {
            index,
            field,
            name: name.clone(),
        };

        let shape = shape.ok_or_else(|| missing("shape"))?;
        let color = color.ok_or_else(|| missing("color"))?;
        let name = name.clone().ok_or_else(|| missing("name"))?;

        Ok(CatalogRecord::new(name, shape, color)
            .with_imprints(
                raw.primary_imprint.unwrap_or_default(),
                raw.secondary_imprint.unwrap_or_default(),
            ))
    }
}

fn tokenize_colors(color: &str) -> ColorTokens {
    color.split_whitespace().map(str::to_string).collect()
}

fn is_placeholder(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case(MISSING_PLACEHOLDER)
}

fn required(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty() && !is_placeholder(v))
}

fn clean_optional(value: Option<String>) -> String {
    match value {
        Some(v) if is_placeholder(&v) => String::new(),
        Some(v) => v.trim().to_string(),
        None => String::new(),
    }
}

/// Ordered, immutable catalog snapshot
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    records: Vec<CatalogRecord>,
}

impl Catalog {
    pub fn new(records: Vec<CatalogRecord>) -> Self {
        Self { records }
    }

    /// Validate raw rows, failing on the first record missing a required field
    pub fn from_records(raw: Vec<RawRecord>) -> Result<Self> {
        let records = raw
            .into_iter()
            .enumerate()
            .map(|(index, row)| CatalogRecord::from_raw(index, row))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { records })
    }

    /// Read a JSON array of raw records
    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self> {
        let raw: Vec<RawRecord> = serde_json::from_reader(reader)?;
        Self::from_records(raw)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_json_reader(BufReader::new(file))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&CatalogRecord> {
        self.records.get(index)
    }

    pub fn records(&self) -> &[CatalogRecord] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &CatalogRecord> {
        self.records.iter()
    }
}

impl From<Vec<CatalogRecord>> for Catalog {
    fn from(records: Vec<CatalogRecord>) -> Self {
        Self::new(records)
    }
}
