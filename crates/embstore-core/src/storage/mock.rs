//! In-memory `VectorStore` used by unit tests in this crate.

use std::collections::BTreeMap;
use std::sync::Mutex;

use embstore_types::embedding::VectorRecord;
use embstore_types::error::StoreError;

use super::vector_store::{attempted_keys, validate_batch, VectorStore};

pub(crate) struct MemoryVectorStore {
    dimension: usize,
    rows: Mutex<BTreeMap<String, Vec<f32>>>,
    batch_sizes: Mutex<Vec<usize>>,
    /// When set, the n-th call to `insert_batch` (0-based) fails.
    fail_on_batch: Option<usize>,
}

impl MemoryVectorStore {
    pub(crate) fn new(dimension: usize) -> Self {
        Self {
            dimension,
            rows: Mutex::new(BTreeMap::new()),
            batch_sizes: Mutex::new(Vec::new()),
            fail_on_batch: None,
        }
    }

    pub(crate) fn failing_on_batch(mut self, index: usize) -> Self {
        self.fail_on_batch = Some(index);
        self
    }

    pub(crate) fn rows(&self) -> BTreeMap<String, Vec<f32>> {
        self.rows.lock().unwrap().clone()
    }

    pub(crate) fn batch_sizes(&self) -> Vec<usize> {
        self.batch_sizes.lock().unwrap().clone()
    }
}

impl VectorStore for MemoryVectorStore {
    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn count(&self) -> Result<u64, StoreError> {
        Ok(self.rows.lock().unwrap().len() as u64)
    }

    async fn insert_batch(&self, records: &[VectorRecord]) -> Result<(), StoreError> {
        validate_batch(self.dimension, records)?;

        let mut sizes = self.batch_sizes.lock().unwrap();
        let call = sizes.len();
        sizes.push(records.len());
        if self.fail_on_batch == Some(call) {
            return Err(StoreError::BatchFailed {
                attempted: attempted_keys(records),
                reason: "injected failure".to_string(),
            });
        }

        let mut rows = self.rows.lock().unwrap();
        if let Some(existing) = records.iter().find(|r| rows.contains_key(&r.key)) {
            return Err(StoreError::KeyConflict {
                key: existing.key.clone(),
                attempted: attempted_keys(records),
            });
        }
        for record in records {
            rows.insert(record.key.clone(), record.vector.clone());
        }
        Ok(())
    }

    async fn lookup(&self, key: &str) -> Result<Option<Vec<f32>>, StoreError> {
        Ok(self.rows.lock().unwrap().get(key).cloned())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        self.rows.lock().unwrap().clear();
        Ok(())
    }
}
