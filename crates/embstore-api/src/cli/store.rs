//! `embstore count` and `embstore clear`.

use std::time::Duration;

use anyhow::Result;
use console::style;
use dialoguer::Confirm;
use indicatif::{ProgressBar, ProgressStyle};

use embstore_core::storage::vector_store::VectorStore;

use crate::state::AppState;

pub async fn count(state: &AppState, name: &str, json: bool) -> Result<()> {
    let store = state.open_existing_store(name).await?;
    let count = store.count().await;
    let dimension = store.dimension();
    store.close().await;
    let count = count?;

    if json {
        println!(
            "{}",
            serde_json::json!({"store": name, "count": count, "dimension": dimension})
        );
    } else {
        println!("{count}");
    }
    Ok(())
}

/// Delete every record in the store, asking first unless `force` or `json`.
pub async fn clear(state: &AppState, name: &str, force: bool, json: bool) -> Result<()> {
    let store = state.open_existing_store(name).await?;

    if !force && !json {
        let confirmed = Confirm::new()
            .with_prompt(format!(
                "Delete all {} records in '{}'?",
                store.count().await?,
                style(name).red().bold()
            ))
            .default(false)
            .interact()?;

        if !confirmed {
            store.close().await;
            println!("  Cancelled.");
            return Ok(());
        }
    }

    let spinner = if json {
        ProgressBar::hidden()
    } else {
        ProgressBar::new_spinner()
    };
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.red} {msg}")?);
    spinner.set_message(format!("Clearing {name}..."));
    spinner.enable_steady_tick(Duration::from_millis(80));

    let result = store.clear().await;
    spinner.finish_and_clear();
    store.close().await;
    result?;

    if json {
        println!("{}", serde_json::json!({"cleared": true, "store": name}));
    } else {
        println!("  {} Store '{}' cleared.", style("✓").red().bold(), name);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use embstore_types::embedding::VectorRecord;

    #[tokio::test]
    async fn test_clear_forced_empties_store() {
        let dir = tempfile::tempdir().unwrap();
        let state = AppState::with_data_dir(dir.path().to_path_buf()).await;
        let store = state.open_store("vec", 1).await.unwrap();
        store
            .insert_batch(&[VectorRecord::new("a", vec![1.0])])
            .await
            .unwrap();
        store.close().await;

        clear(&state, "vec", true, true).await.unwrap();
        count(&state, "vec", true).await.unwrap();

        let store = state.open_existing_store("vec").await.unwrap();
        assert_eq!(store.count().await.unwrap(), 0);
        assert_eq!(store.dimension(), 1);
        store.close().await;
    }

    #[tokio::test]
    async fn test_count_missing_store_fails() {
        let dir = tempfile::tempdir().unwrap();
        let state = AppState::with_data_dir(dir.path().to_path_buf()).await;
        assert!(count(&state, "absent", true).await.is_err());
    }
}
