//! Streaming ingestion of (key, vector) records into a `VectorStore`.
//!
//! The ingestor deduplicates keys (first occurrence wins), groups accepted
//! records into batches, and accumulates per-category sums so it can emit
//! synthetic unknown-word vectors once the stream ends.

pub mod category;
pub mod ingestor;

pub use ingestor::{IngestOptions, IngestReport, Ingestor};
