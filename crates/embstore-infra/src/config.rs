//! Global configuration loader for embstore.
//!
//! Reads `config.toml` from the data directory (`~/.embeddings/` by default)
//! and deserializes it into [`GlobalConfig`]. Falls back to sensible defaults
//! when the file is missing or malformed.

use std::path::Path;

use embstore_types::config::GlobalConfig;

/// Load global configuration from `{data_dir}/config.toml`.
///
/// - If the file does not exist, returns [`GlobalConfig::default()`].
/// - If the file exists but fails to parse, logs a warning and returns the default.
/// - If the file exists and parses successfully, returns the parsed config.
pub async fn load_global_config(data_dir: &Path) -> GlobalConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return GlobalConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return GlobalConfig::default();
        }
    };

    match toml::from_str::<GlobalConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            GlobalConfig::default()
        }
    }
}

/// Resolve the ingestion batch size.
///
/// A command-line override wins over `config.toml`. At least one record per
/// batch is enforced regardless of source.
pub fn resolve_batch_size(global_config: &GlobalConfig, cli_override: Option<usize>) -> usize {
    cli_override.unwrap_or(global_config.batch_size).max(1)
}

/// Resolve the category labels: labels given on the command line replace
/// the configured ones entirely.
pub fn resolve_categories(global_config: &GlobalConfig, cli_labels: &[String]) -> Vec<String> {
    if cli_labels.is_empty() {
        global_config.categories.clone()
    } else {
        cli_labels.to_vec()
    }
}
