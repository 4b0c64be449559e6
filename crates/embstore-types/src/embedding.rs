//! Embedding domain types.
//!
//! `VectorRecord` is the unit the store persists; `RawRecord` is what a text
//! reader yields before ingestion. `OovPolicy` controls what a lookup returns
//! for keys that were never stored.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Label of the default category every key falls into when no configured
/// category matches it (or more than one does).
pub const DEFAULT_CATEGORY: &str = "word";

/// Key of the synthetic average vector for the default category.
pub const WORD_UNKNOWN_KEY: &str = "#WORD/UNK#";

/// Half-width of the interval random out-of-vocabulary vectors are drawn from.
pub const RANDOM_OOV_BOUND: f32 = 0.1;

/// Key of the synthetic average vector for a category label.
///
/// `None` (the default category) maps to [`WORD_UNKNOWN_KEY`].
pub fn unknown_key(category: Option<&str>) -> String {
    match category {
        Some(label) => format!("#{label}UNK#"),
        None => WORD_UNKNOWN_KEY.to_string(),
    }
}

/// A stored embedding: a unique key and its fixed-width vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorRecord {
    pub key: String,
    pub vector: Vec<f32>,
}

impl VectorRecord {
    pub fn new(key: impl Into<String>, vector: Vec<f32>) -> Self {
        Self {
            key: key.into(),
            vector,
        }
    }

    pub fn dimension(&self) -> usize {
        self.vector.len()
    }
}

/// A record as produced by a text reader, tagged with its 1-based data line.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    pub line: usize,
    pub key: String,
    pub vector: Vec<f32>,
}

impl From<RawRecord> for VectorRecord {
    fn from(raw: RawRecord) -> Self {
        Self {
            key: raw.key,
            vector: raw.vector,
        }
    }
}

/// How a lookup answers for a key with no stored record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OovPolicy {
    /// Report the miss as absent.
    #[default]
    None,
    /// Return a vector of zeros.
    Zero,
    /// Return a vector drawn uniformly from `[-0.1, 0.1]`.
    Random,
}

impl fmt::Display for OovPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OovPolicy::None => write!(f, "none"),
            OovPolicy::Zero => write!(f, "zero"),
            OovPolicy::Random => write!(f, "random"),
        }
    }
}

impl FromStr for OovPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" => Ok(OovPolicy::None),
            "zero" => Ok(OovPolicy::Zero),
            "random" => Ok(OovPolicy::Random),
            other => Err(format!(
                "invalid out-of-vocabulary policy '{other}' (expected none, zero or random)"
            )),
        }
    }
}
