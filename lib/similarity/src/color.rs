//! Perceptual similarity between named pill colors
//!
//! Each color name maps to an RGB reference value. Distances are Euclidean in
//! RGB space; beyond the table's effective distance two colors are considered
//! unrelated and contribute nothing.

use ahash::AHashMap;

/// Largest possible Euclidean distance between two RGB values, sqrt(3 * 255^2)
pub const MAX_RGB_DISTANCE: f32 = 441.672_96;

/// Distance at which similarity reaches zero
pub const DEFAULT_EFFECTIVE_DISTANCE: f32 = 150.0;

/// Reference values for the color vocabulary used by the Korean pill catalog
const STANDARD_COLORS: &[(&str, [u8; 3])] = &[
    ("하양", [255, 255, 255]),
    ("노랑", [255, 212, 0]),
    ("주황", [255, 127, 0]),
    ("분홍", [255, 160, 190]),
    ("빨강", [220, 30, 40]),
    ("갈색", [140, 80, 40]),
    ("연두", [170, 210, 70]),
    ("초록", [30, 150, 60]),
    ("청록", [0, 150, 150]),
    ("파랑", [30, 90, 220]),
    ("남색", [30, 40, 120]),
    ("자주", [150, 30, 110]),
    ("보라", [130, 60, 170]),
    ("회색", [128, 128, 128]),
    ("검정", [0, 0, 0]),
    ("투명", [235, 235, 235]),
];

/// Errors raised while building a color table
#[derive(Debug, Clone, thiserror::Error)]
pub enum ColorTableError {
    #[error("Color table cannot be empty")]
    EmptyTable,

    #[error("Effective distance must be positive and at most 441.67, got {0}")]
    InvalidEffectiveDistance(f32),
}

/// Immutable color name to RGB reference table
#[derive(Debug, Clone)]
pub struct ColorTable {
    entries: AHashMap<String, [f32; 3]>,
    effective_distance: f32,
}

impl ColorTable {
    pub fn new<I, K>(entries: I, effective_distance: f32) -> Result<Self, ColorTableError>
    where
        I: IntoIterator<Item = (K, [u8; 3])>,
        K: Into<String>,
    {
        if !(effective_distance > 0.0 && effective_distance <= MAX_RGB_DISTANCE) {
            return Err(ColorTableError::InvalidEffectiveDistance(effective_distance));
        }

        let entries: AHashMap<String, [f32; 3]> = entries
            .into_iter()
            .map(|(name, [r, g, b])| (name.into(), [r as f32, g as f32, b as f32]))
            .collect();

        if entries.is_empty() {
            return Err(ColorTableError::EmptyTable);
        }

        Ok(Self { entries, effective_distance })
    }

    /// Table for the catalog's standard color vocabulary
    pub fn standard() -> Self {
        let entries = STANDARD_COLORS
            .iter()
            .map(|(name, rgb)| (name.to_string(), rgb.map(f32::from)))
            .collect();
        Self {
            entries,
            effective_distance: DEFAULT_EFFECTIVE_DISTANCE,
        }
    }

    pub fn get(&self, name: &str) -> Option<[f32; 3]> {
        self.entries.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Color names in sorted order
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn max_distance(&self) -> f32 {
        MAX_RGB_DISTANCE
    }

    pub fn effective_distance(&self) -> f32 {
        self.effective_distance
    }

    /// Euclidean distance between two named colors, maximal if either is unknown
    pub fn color_distance(&self, a: &str, b: &str) -> f32 {
        match (self.get(a), self.get(b)) {
            (Some(x), Some(y)) => x
                .iter()
                .zip(y.iter())
                .map(|(p, q)| (p - q) * (p - q))
                .sum::<f32>()
                .sqrt(),
            _ => MAX_RGB_DISTANCE,
        }
    }

    /// Map a distance to [0, 1], reaching zero at the effective distance
    pub fn similarity(&self, distance: f32) -> f32 {
        if distance == 0.0 {
            1.0
        } else {
            (1.0 - distance / self.effective_distance).max(0.0)
        }
    }

    /// How well each observed color is explained by the catalog colors
    ///
    /// Averages, over the observed tokens, the best similarity to any catalog
    /// token. Identical tokens score 1.0 even when unknown to the table.
    /// Returns 0.0 when either side is empty.
    pub fn set_similarity<A, B>(&self, observed: &[A], catalog: &[B]) -> f32
    where
        A: AsRef<str>,
        B: AsRef<str>,
    {
        if observed.is_empty() || catalog.is_empty() {
            return 0.0;
        }

        let total: f32 = observed
            .iter()
            .map(|obs| {
                let obs = obs.as_ref();
                catalog
                    .iter()
                    .map(|cat| {
                        let cat = cat.as_ref();
                        if obs == cat {
                            1.0
                        } else {
                            self.similarity(self.color_distance(obs, cat))
                        }
                    })
                    .fold(0.0f32, f32::max)
            })
            .sum();

        total / observed.len() as f32
    }
}

impl Default for ColorTable {
    fn default() -> Self {
        Self::standard()
    }
}
