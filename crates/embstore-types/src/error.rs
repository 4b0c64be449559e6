use thiserror::Error;

/// Errors from vector store operations (used by the `VectorStore` trait in embstore-core).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("schema error: {0}")]
    Schema(String),

    #[error("dimension mismatch for '{key}': expected {expected} components, got {actual}")]
    DimensionMismatch {
        key: String,
        expected: usize,
        actual: usize,
    },

    #[error("non-finite component {index} for '{key}'")]
    NonFinite { key: String, index: usize },

    #[error("key conflict on '{key}' ({} keys attempted)", .attempted.len())]
    KeyConflict { key: String, attempted: Vec<String> },

    #[error("batch insert failed ({} keys attempted): {reason}", .attempted.len())]
    BatchFailed {
        attempted: Vec<String>,
        reason: String,
    },

    #[error("io error: {0}")]
    Io(String),

    #[error("query error: {0}")]
    Query(String),
}

impl StoreError {
    /// Keys of the batch that was being written when the error occurred.
    ///
    /// Empty for errors raised outside of `insert_batch`.
    pub fn attempted_keys(&self) -> &[String] {
        match self {
            StoreError::KeyConflict { attempted, .. } | StoreError::BatchFailed { attempted, .. } => {
                attempted
            }
            _ => &[],
        }
    }
}

/// Errors raised while reading the word2vec text format.
///
/// Line numbers are 1-based indices of data lines (the header is not counted).
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("invalid header: {0}")]
    Header(String),

    #[error("invalid vector on line {line}: expected {expected} fields, got {actual}")]
    FieldCount {
        line: usize,
        expected: usize,
        actual: usize,
    },

    #[error("invalid number '{token}' on line {line}")]
    InvalidNumber { line: usize, token: String },

    #[error("invalid utf-8 on line {line}")]
    Encoding { line: usize },

    #[error("unexpected end of input after {read} of {expected} lines; is the count incorrect or the file damaged?")]
    UnexpectedEof { expected: usize, read: usize },

    #[error("io error: {0}")]
    Io(String),
}

/// The underlying failure that aborted an ingestion pass.
#[derive(Debug, Error)]
pub enum IngestFailure {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// An aborted ingestion pass.
///
/// Batches flushed before the failure stay committed; `committed` counts the
/// records they contain and `last_line` is the last data line that was
/// processed successfully (if any).
#[derive(Debug, Error)]
#[error("ingestion aborted after line {} with {committed} records committed", .last_line.map_or_else(|| "none".to_string(), |l| l.to_string()))]
pub struct IngestError {
    pub last_line: Option<usize>,
    pub committed: u64,
    #[source]
    pub cause: IngestFailure,
}
