//! Global configuration types for embstore.
//!
//! `GlobalConfig` represents the optional `config.toml` in the data directory
//! that supplies defaults for batching, out-of-vocabulary policy, and
//! category labels. Store dimensionality always comes from the input file.

use serde::{Deserialize, Serialize};

use crate::embedding::OovPolicy;

/// Top-level configuration.
///
/// Loaded from `~/.embeddings/config.toml`. All fields have sensible defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalConfig {
    /// Maximum number of records per insert transaction during ingestion.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// What lookups return for keys that were never stored.
    #[serde(default)]
    pub oov_policy: OovPolicy,

    /// Category labels (literal substrings) used to compute per-category
    /// unknown-word vectors.
    #[serde(default)]
    pub categories: Vec<String>,
}

fn default_batch_size() -> usize {
    5000
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            oov_policy: OovPolicy::default(),
            categories: Vec::new(),
        }
    }
}
