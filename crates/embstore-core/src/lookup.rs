//! Lookup facade applying the out-of-vocabulary policy.
//!
//! A hit is returned unchanged. A miss is answered according to
//! [`OovPolicy`]: absent, a zero vector, or a random vector drawn uniformly
//! from `[-0.1, 0.1]`. Random draws are not reproducible across runs unless
//! the facade is built with [`EmbeddingLookup::with_seed`].

use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use embstore_types::embedding::{unknown_key, OovPolicy, RANDOM_OOV_BOUND};
use embstore_types::error::StoreError;

use crate::ingest::category::select_category;
use crate::storage::vector_store::VectorStore;

/// Keyed embedding lookup over a `VectorStore`.
pub struct EmbeddingLookup<S: VectorStore> {
    store: S,
    policy: OovPolicy,
    rng: Mutex<StdRng>,
}

impl<S: VectorStore> EmbeddingLookup<S> {
    /// Create a lookup whose random fallback is seeded from OS entropy.
    pub fn new(store: S, policy: OovPolicy) -> Self {
        Self {
            store,
            policy,
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Create a lookup whose random fallback is reproducible for `seed`.
    pub fn with_seed(store: S, policy: OovPolicy, seed: u64) -> Self {
        Self {
            store,
            policy,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn policy(&self) -> OovPolicy {
        self.policy
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Look up `key`, applying the out-of-vocabulary policy on a miss.
    pub async fn embed(&self, key: &str) -> Result<Option<Vec<f32>>, StoreError> {
        match self.store.lookup(key).await? {
            Some(vector) => Ok(Some(vector)),
            None => {
                tracing::debug!(key, policy = %self.policy, "out-of-vocabulary lookup");
                Ok(self.fallback())
            }
        }
    }

    /// Look up `key`, falling back to the stored unknown-word vector of its
    /// category before applying the out-of-vocabulary policy.
    ///
    /// The category is chosen by the same substring rule used at ingestion.
    pub async fn embed_or_unknown(
        &self,
        key: &str,
        categories: &[String],
    ) -> Result<Option<Vec<f32>>, StoreError> {
        if let Some(vector) = self.store.lookup(key).await? {
            return Ok(Some(vector));
        }

        let unk = unknown_key(select_category(key, categories));
        if let Some(vector) = self.store.lookup(&unk).await? {
            tracing::debug!(key, unknown = %unk, "using category unknown-word vector");
            return Ok(Some(vector));
        }

        Ok(self.fallback())
    }

    fn fallback(&self) -> Option<Vec<f32>> {
        let dimension = self.store.dimension();
        match self.policy {
            OovPolicy::None => None,
            OovPolicy::Zero => Some(vec![0.0; dimension]),
            OovPolicy::Random => {
                let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
                Some(
                    (0..dimension)
                        .map(|_| rng.gen_range(-RANDOM_OOV_BOUND..=RANDOM_OOV_BOUND))
                        .collect(),
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::mock::MemoryVectorStore;
    use embstore_types::embedding::VectorRecord;

    async fn store_with(records: &[(&str, Vec<f32>)]) -> MemoryVectorStore {
        let dimension = records.first().map_or(3, |(_, v)| v.len());
        let store = MemoryVectorStore::new(dimension);
        let batch: Vec<VectorRecord> = records
            .iter()
            .map(|(k, v)| VectorRecord::new(*k, v.clone()))
            .collect();
        store.insert_batch(&batch).await.unwrap();
        store
    }

    #[tokio::test]
    async fn test_hit_is_returned_for_every_policy() {
        for policy in [OovPolicy::None, OovPolicy::Zero, OovPolicy::Random] {
            let store = store_with(&[("cat", vec![0.25, 0.5, 0.75])]).await;
            let lookup = EmbeddingLookup::new(store, policy);
            assert_eq!(
                lookup.embed("cat").await.unwrap(),
                Some(vec![0.25, 0.5, 0.75])
            );
        }
    }

    #[tokio::test]
    async fn test_none_policy_returns_absent() {
        let lookup = EmbeddingLookup::new(MemoryVectorStore::new(3), OovPolicy::None);
        assert_eq!(lookup.embed("missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_zero_policy() {
        let lookup = EmbeddingLookup::new(MemoryVectorStore::new(4), OovPolicy::Zero);
        assert_eq!(
            lookup.embed("missing").await.unwrap(),
            Some(vec![0.0; 4])
        );
    }

    #[tokio::test]
    async fn test_random_policy_within_bounds() {
        let lookup = EmbeddingLookup::new(MemoryVectorStore::new(300), OovPolicy::Random);
        let vector = lookup.embed("missing").await.unwrap().unwrap();
        assert_eq!(vector.len(), 300);
        assert!(vector.iter().all(|c| (-0.1..=0.1).contains(c)));
    }

    #[tokio::test]
    async fn test_random_policy_seeded_is_reproducible() {
        let a = EmbeddingLookup::with_seed(MemoryVectorStore::new(8), OovPolicy::Random, 7);
        let b = EmbeddingLookup::with_seed(MemoryVectorStore::new(8), OovPolicy::Random, 7);
        assert_eq!(
            a.embed("x").await.unwrap(),
            b.embed("x").await.unwrap()
        );
    }

    #[tokio::test]
    async fn test_embed_or_unknown_uses_category_vector() {
        let store = store_with(&[
            ("#ENTITY/UNK#", vec![1.0, 1.0]),
            ("#WORD/UNK#", vec![2.0, 2.0]),
        ])
        .await;
        let lookup = EmbeddingLookup::new(store, OovPolicy::Zero);
        let categories = vec!["ENTITY/".to_string()];

        assert_eq!(
            lookup
                .embed_or_unknown("ENTITY/Atlantis", &categories)
                .await
                .unwrap(),
            Some(vec![1.0, 1.0])
        );
        assert_eq!(
            lookup.embed_or_unknown("zyzzyva", &categories).await.unwrap(),
            Some(vec![2.0, 2.0])
        );
    }

    #[tokio::test]
    async fn test_embed_or_unknown_falls_back_to_policy() {
        let lookup = EmbeddingLookup::new(MemoryVectorStore::new(2), OovPolicy::Zero);
        assert_eq!(
            lookup.embed_or_unknown("nothing", &[]).await.unwrap(),
            Some(vec![0.0, 0.0])
        );
    }
}
