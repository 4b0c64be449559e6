//! Per-category running sums for unknown-word vectors.
//!
//! Every accepted key is assigned to exactly one category: the single
//! configured label that occurs in the key as a literal substring, or the
//! default `word` category when no label, or more than one, matches. At the
//! end of an ingestion pass each non-empty category yields the mean of its
//! vectors under a synthetic `#<LABEL>UNK#` key (`#WORD/UNK#` for the default).

use embstore_types::embedding::{unknown_key, VectorRecord};

/// Select the category label for `key`.
///
/// Returns `None` (the default category) unless exactly one label matches.
pub fn select_category<'a>(key: &str, labels: &'a [String]) -> Option<&'a str> {
    let mut matches = labels.iter().filter(|label| key.contains(label.as_str()));
    match (matches.next(), matches.next()) {
        (Some(label), None) => Some(label.as_str()),
        _ => None,
    }
}

/// Running count and component-wise sum for one category.
#[derive(Debug, Clone)]
pub struct CategoryAccumulator {
    label: Option<String>,
    count: u64,
    sum: Vec<f64>,
}

impl CategoryAccumulator {
    fn new(label: Option<String>, dimension: usize) -> Self {
        Self {
            label,
            count: 0,
            sum: vec![0.0; dimension],
        }
    }

    fn add(&mut self, vector: &[f32]) {
        self.count += 1;
        for (acc, v) in self.sum.iter_mut().zip(vector) {
            *acc += f64::from(*v);
        }
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    /// The mean vector, or None if nothing was accumulated.
    pub fn mean(&self) -> Option<Vec<f32>> {
        if self.count == 0 {
            return None;
        }
        let n = self.count as f64;
        Some(self.sum.iter().map(|s| (s / n) as f32).collect())
    }
}

/// Accumulators for the configured categories plus the default one.
#[derive(Debug, Clone)]
pub struct CategoryTable {
    labels: Vec<String>,
    categories: Vec<CategoryAccumulator>,
    default: CategoryAccumulator,
}

impl CategoryTable {
    /// Build a table for `labels` in configuration order.
    ///
    /// Empty labels and repeated labels are dropped: an empty label would
    /// match every key and a repeated one would always be ambiguous.
    pub fn new(labels: &[String], dimension: usize) -> Self {
        let mut kept: Vec<String> = Vec::with_capacity(labels.len());
        for label in labels {
            if label.is_empty() {
                tracing::warn!("ignoring empty category label");
                continue;
            }
            if kept.contains(label) {
                tracing::warn!(label = %label, "ignoring repeated category label");
                continue;
            }
            kept.push(label.clone());
        }

        let categories = kept
            .iter()
            .map(|label| CategoryAccumulator::new(Some(label.clone()), dimension))
            .collect();

        Self {
            labels: kept,
            categories,
            default: CategoryAccumulator::new(None, dimension),
        }
    }

    /// Add `vector` to the category selected for `key`.
    pub fn accumulate(&mut self, key: &str, vector: &[f32]) {
        let index = select_category(key, &self.labels)
            .and_then(|label| self.labels.iter().position(|l| l == label));
        match index {
            Some(i) => self.categories[i].add(vector),
            None => self.default.add(vector),
        }
    }

    pub fn accumulators(&self) -> impl Iterator<Item = &CategoryAccumulator> {
        self.categories.iter().chain(std::iter::once(&self.default))
    }

    /// Synthetic mean records for every non-empty category.
    ///
    /// Configured categories come first in configuration order, followed by
    /// the default `#WORD/UNK#` record.
    pub fn finalize(&self) -> Vec<VectorRecord> {
        self.accumulators()
            .filter_map(|acc| {
                acc.mean()
                    .map(|mean| VectorRecord::new(unknown_key(acc.label()), mean))
            })
            .collect()
    }
}
