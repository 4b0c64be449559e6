//! Application state shared by the CLI commands.
//!
//! Holds the resolved data directory and the global configuration. Stores are
//! opened per command since each command names its own store.

use std::path::PathBuf;

use anyhow::Context;

use embstore_infra::config::load_global_config;
use embstore_infra::filesystem::{resolve_data_dir, store_path};
use embstore_infra::sqlite::vector::SqliteVectorStore;
use embstore_types::config::GlobalConfig;

#[derive(Debug, Clone)]
pub struct AppState {
    pub data_dir: PathBuf,
    pub config: GlobalConfig,
}

impl AppState {
    /// Resolve the data directory and read `config.toml` from it.
    pub async fn init() -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();
        Ok(Self::with_data_dir(data_dir).await)
    }

    pub async fn with_data_dir(data_dir: PathBuf) -> Self {
        let config = load_global_config(&data_dir).await;
        tracing::debug!(data_dir = %data_dir.display(), "application state initialized");
        Self { data_dir, config }
    }

    pub fn store_path(&self, name: &str) -> PathBuf {
        store_path(&self.data_dir, name)
    }

    /// Open or create the named store with `dimension` components per vector.
    pub async fn open_store(
        &self,
        name: &str,
        dimension: usize,
    ) -> anyhow::Result<SqliteVectorStore> {
        let path = self.store_path(name);
        SqliteVectorStore::open(&path, dimension)
            .await
            .with_context(|| format!("failed to open store '{name}' at {}", path.display()))
    }

    /// Open a store that must already exist.
    pub async fn open_existing_store(&self, name: &str) -> anyhow::Result<SqliteVectorStore> {
        let path = self.store_path(name);
        SqliteVectorStore::open_existing(&path)
            .await
            .with_context(|| format!("failed to open store '{name}'"))
    }
}
