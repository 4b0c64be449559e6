//! Table layout for a vector store.
//!
//! One table, `embeddings`, with a text primary key and one REAL column per
//! component (`d0` .. `d{D-1}`). There is no version field: compatibility of
//! an existing file is decided from its column list alone.

use embstore_types::error::StoreError;
use sqlx::Row;
use sqlx::sqlite::SqlitePool;

pub const TABLE_NAME: &str = "embeddings";

const KEY_COLUMN: &str = "key";

/// SQLite's default column limit is 2000 per table, one is the key.
pub const MAX_DIMENSION: usize = 1999;

/// A column as reported by `PRAGMA table_info`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnInfo {
    pub name: String,
    pub decl_type: String,
    pub primary_key: bool,
}

pub fn component_column(index: usize) -> String {
    format!("d{index}")
}

fn component_list(dimension: usize) -> String {
    (0..dimension)
        .map(|i| format!("\"{}\"", component_column(i)))
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn create_table_sql(dimension: usize) -> String {
    let columns = (0..dimension)
        .map(|i| format!("\"{}\" REAL NOT NULL", component_column(i)))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "CREATE TABLE IF NOT EXISTS {TABLE_NAME} (\"{KEY_COLUMN}\" TEXT PRIMARY KEY NOT NULL, {columns})"
    )
}

pub fn insert_sql(dimension: usize) -> String {
    let placeholders = vec!["?"; dimension + 1].join(", ");
    format!(
        "INSERT INTO {TABLE_NAME} (\"{KEY_COLUMN}\", {}) VALUES ({placeholders})",
        component_list(dimension)
    )
}

pub fn select_sql(dimension: usize) -> String {
    format!(
        "SELECT {} FROM {TABLE_NAME} WHERE \"{KEY_COLUMN}\" = ?",
        component_list(dimension)
    )
}

pub fn check_dimension(dimension: usize) -> Result<(), StoreError> {
    if dimension == 0 || dimension > MAX_DIMENSION {
        return Err(StoreError::Schema(format!(
            "dimensionality must be between 1 and {MAX_DIMENSION}, got {dimension}"
        )));
    }
    Ok(())
}

/// Columns of the `embeddings` table, or None if it does not exist.
pub async fn describe_table(pool: &SqlitePool) -> Result<Option<Vec<ColumnInfo>>, StoreError> {
    let rows = sqlx::query(&format!("PRAGMA table_info({TABLE_NAME})"))
        .fetch_all(pool)
        .await
        .map_err(|e| StoreError::Query(e.to_string()))?;

    if rows.is_empty() {
        return Ok(None);
    }

    let mut columns = Vec::with_capacity(rows.len());
    for row in &rows {
        let pk: i64 = row
            .try_get("pk")
            .map_err(|e| StoreError::Query(e.to_string()))?;
        columns.push(ColumnInfo {
            name: row
                .try_get("name")
                .map_err(|e| StoreError::Query(e.to_string()))?,
            decl_type: row
                .try_get("type")
                .map_err(|e| StoreError::Query(e.to_string()))?,
            primary_key: pk > 0,
        });
    }
    Ok(Some(columns))
}

/// Validate a column list and return the dimensionality it encodes.
pub fn dimension_of(columns: &[ColumnInfo]) -> Result<usize, StoreError> {
    let (key, components) = columns
        .split_first()
        .ok_or_else(|| StoreError::Schema("table has no columns".to_string()))?;

    if key.name != KEY_COLUMN || !key.decl_type.eq_ignore_ascii_case("TEXT") || !key.primary_key {
        return Err(StoreError::Schema(format!(
            "first column must be '{KEY_COLUMN} TEXT PRIMARY KEY', found '{} {}'",
            key.name, key.decl_type
        )));
    }

    if components.is_empty() {
        return Err(StoreError::Schema("table has no component columns".to_string()));
    }

    for (i, column) in components.iter().enumerate() {
        let expected = component_column(i);
        if column.name != expected || !column.decl_type.eq_ignore_ascii_case("REAL") {
            return Err(StoreError::Schema(format!(
                "column {} must be '{expected} REAL', found '{} {}'",
                i + 1,
                column.name,
                column.decl_type
            )));
        }
    }

    Ok(components.len())
}

/// Create the table if absent and verify an existing one matches `dimension`.
pub async fn ensure_schema(pool: &SqlitePool, dimension: usize) -> Result<(), StoreError> {
    check_dimension(dimension)?;

    sqlx::query(&create_table_sql(dimension))
        .execute(pool)
        .await
        .map_err(|e| StoreError::Schema(e.to_string()))?;

    let columns = describe_table(pool)
        .await?
        .ok_or_else(|| StoreError::Schema(format!("table {TABLE_NAME} missing after create")))?;

    let existing = dimension_of(&columns)?;
    if existing != dimension {
        return Err(StoreError::Schema(format!(
            "store has {existing} components per vector, requested {dimension}"
        )));
    }
    Ok(())
}
