//! Loading a word2vec text file into a vector store.
//!
//! Glue between [`Word2VecReader`] and the core [`Ingestor`]: the header's
//! dimensionality is checked against the store, then records stream through
//! deduplication, category accumulation, and batched inserts.

use std::io::BufRead;
use std::path::Path;

use embstore_core::ingest::{IngestOptions, IngestReport, Ingestor};
use embstore_core::storage::vector_store::VectorStore;
use embstore_types::error::IngestError;

use crate::word2vec::Word2VecReader;

/// Ingest every record from an already-opened reader.
///
/// The reader is synchronous, so for a file-backed reader each record read
/// blocks the calling task. Run this on a dedicated task (or inside
/// `tokio::task::block_in_place` on a multi-threaded runtime) when other
/// work shares the runtime.
pub async fn load_from_reader<S, R>(
    store: &S,
    reader: Word2VecReader<R>,
    options: IngestOptions,
) -> Result<IngestReport, IngestError>
where
    S: VectorStore,
    R: BufRead,
{
    let declared = reader.dimension();
    tracing::info!(
        vocab_size = reader.vocab_size(),
        records = reader.expected_records(),
        dimension = declared,
        batch_size = options.batch_size,
        "loading embeddings"
    );
    Ingestor::new(store, options).ingest(declared, reader).await
}

/// Open the word2vec text file at `path` and ingest up to `limit` records.
pub async fn load_word2vec_file<S: VectorStore>(
    store: &S,
    path: &Path,
    options: IngestOptions,
    limit: Option<usize>,
) -> Result<IngestReport, IngestError> {
    let reader = Word2VecReader::open(path)
        .map_err(|e| IngestError {
            last_line: None,
            committed: 0,
            cause: e.into(),
        })?
        .with_limit(limit);
    load_from_reader(store, reader, options).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::io::Cursor;

    use embstore_types::error::{IngestFailure, ParseError, StoreError};

    use crate::sqlite::vector::SqliteVectorStore;

    async fn test_store(dimension: usize) -> SqliteVectorStore {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("load.db");
        std::mem::forget(dir);
        SqliteVectorStore::open(&db_path, dimension).await.unwrap()
    }

    fn reader(input: &str) -> Word2VecReader<Cursor<Vec<u8>>> {
        Word2VecReader::new(Cursor::new(input.as_bytes().to_vec())).unwrap()
    }

    fn options(batch_size: usize, categories: &[&str]) -> IngestOptions {
        IngestOptions {
            batch_size,
            categories: categories.iter().map(|s| s.to_string()).collect(),
            reset: false,
        }
    }

    async fn snapshot(store: &SqliteVectorStore, keys: &[&str]) -> BTreeMap<String, Option<Vec<f32>>> {
        let mut out = BTreeMap::new();
        for key in keys {
            out.insert(key.to_string(), store.lookup(key).await.unwrap());
        }
        out
    }

    #[tokio::test]
    async fn test_repeated_key_keeps_first() {
        let store = test_store(2).await;

        load_from_reader(&store, reader("2 2\nfoo 1.0 2.0\nfoo 9.0 9.0\n"), options(10, &[]))
            .await
            .unwrap();

        assert_eq!(store.lookup("foo").await.unwrap(), Some(vec![1.0, 2.0]));
    }

    #[tokio::test]
    async fn test_category_unknown_vectors() {
        let store = test_store(2).await;
        let input = "3 2\nCAT/a 2 0\nCAT/b 4 0\nplain 0 10\n";

        let report = load_from_reader(&store, reader(input), options(1000, &["CAT/"]))
            .await
            .unwrap();

        assert_eq!(report.synthetic, vec!["#CAT/UNK#", "#WORD/UNK#"]);
        assert_eq!(
            store.lookup("#CAT/UNK#").await.unwrap(),
            Some(vec![3.0, 0.0])
        );
        assert_eq!(
            store.lookup("#WORD/UNK#").await.unwrap(),
            Some(vec![0.0, 10.0])
        );
        assert_eq!(store.count().await.unwrap(), 5);
    }

    #[tokio::test]
    async fn test_batch_size_does_not_change_contents() {
        let input = "6 2\nCAT/x 1 1\ny 2 0\nCAT/x 7 7\nz 0 4\nCAT/w 3 3\ny 5 5\n";
        let keys = ["CAT/x", "CAT/w", "y", "z", "#CAT/UNK#", "#WORD/UNK#"];

        let one = test_store(2).await;
        let r1 = load_from_reader(&one, reader(input), options(1, &["CAT/"]))
            .await
            .unwrap();

        let many = test_store(2).await;
        let r2 = load_from_reader(&many, reader(input), options(1000, &["CAT/"]))
            .await
            .unwrap();

        assert_eq!(snapshot(&one, &keys).await, snapshot(&many, &keys).await);
        assert_eq!(one.count().await.unwrap(), many.count().await.unwrap());
        assert_eq!(r1.inserted, r2.inserted);
        assert_eq!(r1.batches, 6);
        assert_eq!(r2.batches, 1);
    }

    #[tokio::test]
    async fn test_truncated_input_keeps_flushed_batches() {
        let store = test_store(1).await;
        let input = "10 1\na 1\nb 2\nc 3\n";

        let err = load_from_reader(&store, reader(input), options(2, &[]))
            .await
            .unwrap_err();

        assert!(matches!(
            err.cause,
            IngestFailure::Parse(ParseError::UnexpectedEof {
                expected: 10,
                read: 3
            })
        ));
        assert_eq!(err.committed, 2);
        assert_eq!(err.last_line, Some(3));
        assert_eq!(store.lookup("a").await.unwrap(), Some(vec![1.0]));
        assert_eq!(store.lookup("b").await.unwrap(), Some(vec![2.0]));
        assert_eq!(store.lookup("c").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_nan_component_fails_as_parse_error() {
        let store = test_store(2).await;

        let err = load_from_reader(&store, reader("2 2\nok 1 1\nfoo nan 1.0\n"), options(10, &[]))
            .await
            .unwrap_err();

        assert!(matches!(
            err.cause,
            IngestFailure::Parse(ParseError::InvalidNumber { line: 2, ref token }) if token == "nan"
        ));
        assert_eq!(err.last_line, Some(1));
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_header_dimension_must_match_store() {
        let store = test_store(3).await;

        let err = load_from_reader(&store, reader("1 2\nfoo 1 2\n"), options(10, &[]))
            .await
            .unwrap_err();

        assert!(matches!(
            err.cause,
            IngestFailure::Store(StoreError::DimensionMismatch { .. })
        ));
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_second_load_without_reset_conflicts() {
        let store = test_store(1).await;
        let input = "1 1\na 1\n";

        load_from_reader(&store, reader(input), options(10, &[]))
            .await
            .unwrap();
        let err = load_from_reader(&store, reader(input), options(10, &[]))
            .await
            .unwrap_err();
        assert!(matches!(
            err.cause,
            IngestFailure::Store(StoreError::KeyConflict { .. })
        ));
        assert_eq!(err.committed, 0);

        let mut reset = options(10, &[]);
        reset.reset = true;
        let report = load_from_reader(&store, reader(input), reset).await.unwrap();
        assert_eq!(report.inserted, 2);
        assert_eq!(store.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_load_word2vec_file_with_limit() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("vectors.txt");
        tokio::fs::write(&file, "3 2\nthe 0.5 0.5\nof 1.5 1.5\nand 2.5 2.5\n")
            .await
            .unwrap();
        let store = SqliteVectorStore::open(&dir.path().join("limit.db"), 2)
            .await
            .unwrap();

        let report = load_word2vec_file(&store, &file, options(10, &[]), Some(2))
            .await
            .unwrap();

        assert_eq!(report.lines_read, 2);
        assert!(store.contains("of").await.unwrap());
        assert!(!store.contains("and").await.unwrap());
        assert_eq!(
            store.lookup("#WORD/UNK#").await.unwrap(),
            Some(vec![1.0, 1.0])
        );
    }

    #[tokio::test]
    async fn test_load_word2vec_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteVectorStore::open(&dir.path().join("m.db"), 2)
            .await
            .unwrap();

        let err = load_word2vec_file(&store, &dir.path().join("absent.txt"), options(10, &[]), None)
            .await
            .unwrap_err();
        assert!(matches!(err.cause, IngestFailure::Parse(ParseError::Io(_))));
    }
}
