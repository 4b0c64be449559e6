//! Vector store trait.
//!
//! Defines the interface for durable fixed-width vector storage keyed by
//! string, with transactional batch writes.
//! Implementations live in embstore-infra.

use std::collections::HashSet;

use embstore_types::embedding::VectorRecord;
use embstore_types::error::StoreError;

/// Trait for a persistent table of fixed-dimension vectors keyed by string.
///
/// Every record in a store has exactly [`dimension`](VectorStore::dimension)
/// components and keys are unique. Uses RPITIT (native async fn in traits,
/// Rust 2024 edition).
pub trait VectorStore: Send + Sync {
    /// Number of components every stored vector has.
    fn dimension(&self) -> usize;

    /// Number of stored records.
    fn count(&self) -> impl std::future::Future<Output = Result<u64, StoreError>> + Send;

    /// Insert a batch of records as one all-or-nothing transaction.
    ///
    /// Fails with `DimensionMismatch` before any write if a vector has the
    /// wrong length, and with `KeyConflict` if a key repeats within the batch
    /// or already exists. On failure the store is left unchanged.
    fn insert_batch(
        &self,
        records: &[VectorRecord],
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;

    /// Exact-match lookup. Returns None if the key does not exist.
    fn lookup(
        &self,
        key: &str,
    ) -> impl std::future::Future<Output = Result<Option<Vec<f32>>, StoreError>> + Send;

    /// Whether a record exists for `key`.
    fn contains(
        &self,
        key: &str,
    ) -> impl std::future::Future<Output = Result<bool, StoreError>> + Send {
        async move { Ok(self.lookup(key).await?.is_some()) }
    }

    /// Delete all records. The schema persists.
    fn clear(&self) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;
}

/// Check a batch against a store's dimensionality, for non-finite
/// components, and for repeated keys.
///
/// Shared by store implementations so validation happens before any write.
pub fn validate_batch(dimension: usize, records: &[VectorRecord]) -> Result<(), StoreError> {
    if let Some(bad) = records.iter().find(|r| r.vector.len() != dimension) {
        return Err(StoreError::DimensionMismatch {
            key: bad.key.clone(),
            expected: dimension,
            actual: bad.vector.len(),
        });
    }

    for record in records {
        if let Some(index) = record.vector.iter().position(|c| !c.is_finite()) {
            return Err(StoreError::NonFinite {
                key: record.key.clone(),
                index,
            });
        }
    }

    let mut keys = HashSet::with_capacity(records.len());
    for record in records {
        if !keys.insert(record.key.as_str()) {
            return Err(StoreError::KeyConflict {
                key: record.key.clone(),
                attempted: attempted_keys(records),
            });
        }
    }

    Ok(())
}

/// Keys of a batch in insertion order, for error diagnostics.
pub fn attempted_keys(records: &[VectorRecord]) -> Vec<String> {
    records.iter().map(|r| r.key.clone()).collect()
}
