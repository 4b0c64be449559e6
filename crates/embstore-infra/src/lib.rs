//! Infrastructure layer for embstore.
//!
//! Contains the implementation of the `VectorStore` trait defined in
//! `embstore-core` (SQLite via sqlx), the word2vec text reader, data
//! directory resolution, and the `config.toml` loader.

pub mod config;
pub mod filesystem;
pub mod load;
pub mod sqlite;
pub mod word2vec;
