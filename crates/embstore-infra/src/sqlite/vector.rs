//! SQLite vector store implementation.
//!
//! Implements `VectorStore` from `embstore-core` using sqlx with split
//! read/write pools. Each vector is stored as one row with one REAL column
//! per component; f32 components widen losslessly to SQLite's f64 REAL, so a
//! lookup returns exactly what was inserted.

use std::path::{Path, PathBuf};

use embstore_core::storage::vector_store::{attempted_keys, validate_batch, VectorStore};
use embstore_types::embedding::VectorRecord;
use embstore_types::error::StoreError;
use sqlx::Row;

use super::pool::DatabasePool;
use super::schema::{self, TABLE_NAME};

/// SQLite-backed implementation of `VectorStore`.
pub struct SqliteVectorStore {
    pool: DatabasePool,
    path: PathBuf,
    dimension: usize,
    insert_sql: String,
    select_sql: String,
}

impl SqliteVectorStore {
    /// Open or create the store at `path` for vectors of `dimension` components.
    ///
    /// Creates missing parent directories and the table if absent. An existing
    /// table with a different layout fails with `StoreError::Schema`.
    pub async fn open(path: &Path, dimension: usize) -> Result<Self, StoreError> {
        schema::check_dimension(dimension)?;
        ensure_parent_dir(path).await?;

        let pool = connect(path).await?;
        if let Err(e) = schema::ensure_schema(&pool.writer, dimension).await {
            pool.close().await;
            return Err(e);
        }

        tracing::info!(path = %path.display(), dimension, "opened vector store");
        Ok(Self::from_parts(pool, path, dimension))
    }

    /// Open an existing store, taking the dimensionality from its table.
    pub async fn open_existing(path: &Path) -> Result<Self, StoreError> {
        let exists = tokio::fs::try_exists(path)
            .await
            .map_err(|e| StoreError::Io(format!("{}: {e}", path.display())))?;
        if !exists {
            return Err(StoreError::Io(format!(
                "no vector store at {}",
                path.display()
            )));
        }

        let pool = connect(path).await?;
        let dimension = match schema::describe_table(&pool.writer).await {
            Ok(Some(columns)) => schema::dimension_of(&columns),
            Ok(None) => Err(StoreError::Schema(format!(
                "{} has no {TABLE_NAME} table",
                path.display()
            ))),
            Err(e) => Err(e),
        };
        let dimension = match dimension {
            Ok(d) => d,
            Err(e) => {
                pool.close().await;
                return Err(e);
            }
        };

        tracing::info!(path = %path.display(), dimension, "opened existing vector store");
        Ok(Self::from_parts(pool, path, dimension))
    }

    fn from_parts(pool: DatabasePool, path: &Path, dimension: usize) -> Self {
        Self {
            pool,
            path: path.to_path_buf(),
            dimension,
            insert_sql: schema::insert_sql(dimension),
            select_sql: schema::select_sql(dimension),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Release both connection pools.
    pub async fn close(self) {
        self.pool.close().await;
    }

    async fn write_batch(&self, records: &[VectorRecord]) -> Result<(), StoreError> {
        let mut tx = self
            .pool
            .writer
            .begin()
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;

        for record in records {
            let mut query = sqlx::query(&self.insert_sql).bind(&record.key);
            for component in &record.vector {
                query = query.bind(f64::from(*component));
            }

            if let Err(e) = query.execute(&mut *tx).await {
                if let Err(rollback_err) = tx.rollback().await {
                    tracing::warn!(error = %rollback_err, "rollback failed");
                }
                return Err(classify_insert_error(e, record, records));
            }
        }

        tx.commit().await.map_err(|e| StoreError::BatchFailed {
            attempted: attempted_keys(records),
            reason: e.to_string(),
        })
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn ensure_parent_dir(path: &Path) -> Result<(), StoreError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| StoreError::Io(format!("{}: {e}", parent.display())))?;
    }
    Ok(())
}

async fn connect(path: &Path) -> Result<DatabasePool, StoreError> {
    DatabasePool::open(path)
        .await
        .map_err(|e| StoreError::Io(format!("failed to open {}: {e}", path.display())))
}

fn classify_insert_error(
    err: sqlx::Error,
    record: &VectorRecord,
    records: &[VectorRecord],
) -> StoreError {
    if let sqlx::Error::Database(ref db_err) = err {
        if db_err.is_unique_violation() || db_err.message().contains("UNIQUE") {
            return StoreError::KeyConflict {
                key: record.key.clone(),
                attempted: attempted_keys(records),
            };
        }
    }
    StoreError::BatchFailed {
        attempted: attempted_keys(records),
        reason: err.to_string(),
    }
}

// ---------------------------------------------------------------------------
// VectorStore implementation
// ---------------------------------------------------------------------------

impl VectorStore for SqliteVectorStore {
    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn count(&self) -> Result<u64, StoreError> {
        let (count,): (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {TABLE_NAME}"))
            .fetch_one(&self.pool.reader)
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;

        Ok(count as u64)
    }

    async fn insert_batch(&self, records: &[VectorRecord]) -> Result<(), StoreError> {
        validate_batch(self.dimension, records)?;
        if records.is_empty() {
            return Ok(());
        }

        self.write_batch(records).await.inspect_err(|e| {
            tracing::warn!(
                error = %e,
                keys = ?e.attempted_keys(),
                "insert failed, batch rolled back"
            );
        })
    }

    async fn lookup(&self, key: &str) -> Result<Option<Vec<f32>>, StoreError> {
        let row = sqlx::query(&self.select_sql)
            .bind(key)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let mut vector = Vec::with_capacity(self.dimension);
                for i in 0..self.dimension {
                    let component: f64 = row
                        .try_get(i)
                        .map_err(|e| StoreError::Query(e.to_string()))?;
                    vector.push(component as f32);
                }
                Ok(Some(vector))
            }
            None => Ok(None),
        }
    }

    async fn clear(&self) -> Result<(), StoreError> {
        let result = sqlx::query(&format!("DELETE FROM {TABLE_NAME}"))
            .execute(&self.pool.writer)
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;

        tracing::info!(deleted = result.rows_affected(), "cleared vector store");
        Ok(())
    }
}
