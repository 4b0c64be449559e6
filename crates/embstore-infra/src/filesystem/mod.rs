//! Filesystem layout for embstore.
//!
//! Stores live as `<name>.db` files under a data directory resolved from the
//! environment. Only path resolution and directory listing happen here; the
//! store itself creates its file on open.

use std::path::{Path, PathBuf};

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "EMBSTORE_ROOT";

/// File extension of store files.
pub const STORE_EXTENSION: &str = "db";

/// Resolve the data directory from environment or platform defaults.
///
/// Priority:
/// 1. `EMBSTORE_ROOT` environment variable
/// 2. `~/.embeddings` in the user's home directory
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".embeddings");
    }

    // Last resort: current directory
    PathBuf::from(".embeddings")
}

/// Resolve the file for a store name.
///
/// A bare name maps to `{data_dir}/{name}.db`. A name that already carries an
/// extension is used as a file name as-is; absolute paths bypass `data_dir`.
pub fn store_path(data_dir: &Path, name: &str) -> PathBuf {
    let candidate = Path::new(name);
    if candidate.is_absolute() {
        return candidate.to_path_buf();
    }
    if candidate.extension().is_some() {
        return data_dir.join(candidate);
    }
    data_dir.join(format!("{name}.{STORE_EXTENSION}"))
}

/// Names of the stores in `data_dir`, sorted. A missing directory has none.
pub async fn list_stores(data_dir: &Path) -> Result<Vec<String>, std::io::Error> {
    let mut entries = match tokio::fs::read_dir(data_dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e),
    };

    let mut names = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some(STORE_EXTENSION) {
            continue;
        }
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            names.push(stem.to_string());
        }
    }
    names.sort();
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_store_path_bare_name() {
        let root = Path::new("/data/embeddings");
        assert_eq!(
            store_path(root, "wiki2vec"),
            PathBuf::from("/data/embeddings/wiki2vec.db")
        );
    }

    #[test]
    fn test_store_path_with_extension() {
        let root = Path::new("/data/embeddings");
        assert_eq!(
            store_path(root, "glove.sqlite"),
            PathBuf::from("/data/embeddings/glove.sqlite")
        );
        assert_eq!(
            store_path(root, "sub/glove.db"),
            PathBuf::from("/data/embeddings/sub/glove.db")
        );
    }

    #[test]
    fn test_store_path_absolute() {
        let root = Path::new("/data/embeddings");
        assert_eq!(
            store_path(root, "/tmp/other.db"),
            PathBuf::from("/tmp/other.db")
        );
    }

    #[test]
    fn test_resolve_data_dir_is_not_empty() {
        assert!(!resolve_data_dir().as_os_str().is_empty());
    }

    #[tokio::test]
    async fn test_list_stores() {
        let dir = tempdir().unwrap();
        tokio::fs::write(dir.path().join("b.db"), b"").await.unwrap();
        tokio::fs::write(dir.path().join("a.db"), b"").await.unwrap();
        tokio::fs::write(dir.path().join("a.db-wal"), b"").await.unwrap();
        tokio::fs::write(dir.path().join("config.toml"), b"").await.unwrap();

        let names = list_stores(dir.path()).await.unwrap();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_list_stores_missing_dir() {
        let dir = tempdir().unwrap();
        let names = list_stores(&dir.path().join("absent")).await.unwrap();
        assert!(names.is_empty());
    }
}
