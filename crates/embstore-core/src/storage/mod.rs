//! Storage abstractions for embstore.
//!
//! Defines the fixed-dimension vector store trait.
//! Implementations live in embstore-infra.

pub mod vector_store;

#[cfg(test)]
pub(crate) mod mock;
