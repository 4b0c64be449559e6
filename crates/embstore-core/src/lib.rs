//! Ingestion, lookup, and store trait definitions for embstore.
//!
//! This crate defines the `VectorStore` port that the infrastructure layer
//! implements, plus the logic that runs on top of it: the streaming
//! `Ingestor` and the `EmbeddingLookup` facade. It depends only on
//! `embstore-types` -- never on `embstore-infra` or any database/IO crate.

pub mod ingest;
pub mod lookup;
pub mod storage;
