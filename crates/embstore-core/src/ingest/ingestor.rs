//! The ingestion pass.
//!
//! All mutable state of a pass (seen keys, the pending batch, category sums,
//! progress counters) lives in a private `IngestPass` created per call to
//! [`Ingestor::ingest`], so two passes never share anything but the store.

use std::collections::HashSet;

use embstore_types::embedding::{RawRecord, VectorRecord};
use embstore_types::error::{IngestError, IngestFailure, ParseError, StoreError};

use super::category::CategoryTable;
use crate::storage::vector_store::VectorStore;

/// Default number of records per insert transaction.
pub const DEFAULT_BATCH_SIZE: usize = 5000;

/// Key reported in the dimension error when the input header disagrees
/// with the store.
const HEADER_KEY: &str = "<header>";

/// Options for one ingestion pass.
#[derive(Debug, Clone)]
pub struct IngestOptions {
    /// Maximum records per `insert_batch` call. Zero is treated as one.
    pub batch_size: usize,
    /// Category labels for unknown-word vectors, in output order.
    pub categories: Vec<String>,
    /// Clear the store before ingesting.
    pub reset: bool,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            categories: Vec::new(),
            reset: false,
        }
    }
}

/// Summary of a completed ingestion pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestReport {
    /// Data lines consumed from the input.
    pub lines_read: u64,
    /// Records written to the store, synthetic ones included.
    pub inserted: u64,
    /// Records skipped because their key was already seen in this pass.
    pub duplicates_skipped: u64,
    /// Number of `insert_batch` calls that committed.
    pub batches: u64,
    /// Keys of the synthetic unknown-word records that were written.
    pub synthetic: Vec<String>,
}

/// Turns a lazy sequence of raw records into deduplicated batched inserts.
pub struct Ingestor<'a, S: VectorStore> {
    store: &'a S,
    options: IngestOptions,
}

impl<'a, S: VectorStore> Ingestor<'a, S> {
    pub fn new(store: &'a S, options: IngestOptions) -> Self {
        Self { store, options }
    }

    pub fn options(&self) -> &IngestOptions {
        &self.options
    }

    /// Run one ingestion pass.
    ///
    /// `declared_dimension` is the dimensionality announced by the input
    /// header; it must equal the store's. On failure, batches flushed before
    /// the error stay committed and the returned error records how many
    /// records that is and the last data line processed.
    pub async fn ingest<I>(
        &self,
        declared_dimension: usize,
        records: I,
    ) -> Result<IngestReport, IngestError>
    where
        I: IntoIterator<Item = Result<RawRecord, ParseError>>,
    {
        let dimension = self.store.dimension();
        let mut pass = IngestPass::new(&self.options, dimension);

        if declared_dimension != dimension {
            return Err(pass.abort(StoreError::DimensionMismatch {
                key: HEADER_KEY.to_string(),
                expected: dimension,
                actual: declared_dimension,
            }));
        }

        if self.options.reset {
            tracing::info!("clearing store before ingestion");
            self.store.clear().await.map_err(|e| pass.abort(e))?;
        }

        for item in records {
            let raw = item.map_err(|e| pass.abort(e))?;
            pass.report.lines_read += 1;

            if raw.vector.len() != dimension {
                return Err(pass.abort(StoreError::DimensionMismatch {
                    key: raw.key,
                    expected: dimension,
                    actual: raw.vector.len(),
                }));
            }

            pass.last_line = Some(raw.line);
            if pass.seen.contains(&raw.key) {
                tracing::debug!(key = %raw.key, line = raw.line, "skipping duplicate key");
                pass.report.duplicates_skipped += 1;
            } else {
                pass.categories.accumulate(&raw.key, &raw.vector);
                pass.push(raw.into());
                if pass.batch_full() {
                    pass.flush(self.store).await?;
                }
            }
        }

        for record in pass.categories.finalize() {
            if pass.seen.contains(&record.key) {
                tracing::warn!(key = %record.key, "synthetic key already present in input, skipping");
                pass.report.duplicates_skipped += 1;
                continue;
            }
            tracing::info!(key = %record.key, "adding category average");
            pass.report.synthetic.push(record.key.clone());
            pass.push(record);
            if pass.batch_full() {
                pass.flush(self.store).await?;
            }
        }

        pass.flush(self.store).await?;

        tracing::info!(
            lines = pass.report.lines_read,
            inserted = pass.report.inserted,
            duplicates = pass.report.duplicates_skipped,
            batches = pass.report.batches,
            "ingestion complete"
        );

        Ok(pass.report)
    }
}

/// Mutable state of a single ingestion pass.
struct IngestPass {
    batch_size: usize,
    seen: HashSet<String>,
    batch: Vec<VectorRecord>,
    categories: CategoryTable,
    report: IngestReport,
    last_line: Option<usize>,
}

impl IngestPass {
    fn new(options: &IngestOptions, dimension: usize) -> Self {
        let batch_size = options.batch_size.max(1);
        Self {
            batch_size,
            seen: HashSet::new(),
            batch: Vec::with_capacity(batch_size.min(DEFAULT_BATCH_SIZE)),
            categories: CategoryTable::new(&options.categories, dimension),
            report: IngestReport::default(),
            last_line: None,
        }
    }

    fn push(&mut self, record: VectorRecord) {
        self.seen.insert(record.key.clone());
        self.batch.push(record);
    }

    fn batch_full(&self) -> bool {
        self.batch.len() >= self.batch_size
    }

    async fn flush<S: VectorStore>(&mut self, store: &S) -> Result<(), IngestError> {
        if self.batch.is_empty() {
            return Ok(());
        }

        if let Err(e) = store.insert_batch(&self.batch).await {
            return Err(self.abort(e));
        }

        self.report.inserted += self.batch.len() as u64;
        self.report.batches += 1;
        tracing::debug!(
            batch = self.report.batches,
            size = self.batch.len(),
            committed = self.report.inserted,
            line = ?self.last_line,
            "flushed batch"
        );
        self.batch.clear();
        Ok(())
    }

    fn abort(&self, cause: impl Into<IngestFailure>) -> IngestError {
        let err = IngestError {
            last_line: self.last_line,
            committed: self.report.inserted,
            cause: cause.into(),
        };
        tracing::warn!(error = %err, "ingestion aborted");
        err
    }
}
