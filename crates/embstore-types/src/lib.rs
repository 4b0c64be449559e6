//! Shared domain types for embstore.
//!
//! This crate contains the core domain types used across the workspace:
//! vector records, out-of-vocabulary policy, global configuration, and the
//! error taxonomy for storage, parsing, and ingestion.
//!
//! Zero infrastructure dependencies -- only serde and thiserror.

pub mod config;
pub mod embedding;
pub mod error;
