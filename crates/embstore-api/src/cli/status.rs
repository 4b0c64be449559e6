//! Data directory overview: configuration and every store found.

use anyhow::Result;
use comfy_table::{presets, Cell, Color, ContentArrangement, Table};
use console::style;

use embstore_core::storage::vector_store::VectorStore;
use embstore_infra::filesystem::list_stores;

use crate::state::AppState;

/// One row of the status table.
#[derive(Debug)]
pub struct StoreSummary {
    pub name: String,
    pub dimension: Option<usize>,
    pub count: Option<u64>,
    pub error: Option<String>,
}

/// Open every store in the data directory and collect its shape.
///
/// A store that cannot be read is reported with its error instead of
/// failing the whole listing.
pub async fn summarize(state: &AppState) -> Result<Vec<StoreSummary>> {
    let mut summaries = Vec::new();
    for name in list_stores(&state.data_dir).await? {
        let summary = match state.open_existing_store(&name).await {
            Ok(store) => {
                let dimension = store.dimension();
                let count = store.count().await;
                store.close().await;
                match count {
                    Ok(count) => StoreSummary {
                        name,
                        dimension: Some(dimension),
                        count: Some(count),
                        error: None,
                    },
                    Err(e) => StoreSummary {
                        name,
                        dimension: Some(dimension),
                        count: None,
                        error: Some(e.to_string()),
                    },
                }
            }
            Err(e) => {
                tracing::warn!(store = %name, "unreadable store: {e:#}");
                StoreSummary {
                    name,
                    dimension: None,
                    count: None,
                    error: Some(format!("{e:#}")),
                }
            }
        };
        summaries.push(summary);
    }
    Ok(summaries)
}

pub async fn status(state: &AppState, json: bool) -> Result<()> {
    let stores = summarize(state).await?;

    if json {
        let status = serde_json::json!({
            "version": env!("CARGO_PKG_VERSION"),
            "data_dir": state.data_dir.display().to_string(),
            "config": {
                "batch_size": state.config.batch_size,
                "oov_policy": state.config.oov_policy.to_string(),
                "categories": state.config.categories,
            },
            "stores": stores.iter().map(|s| serde_json::json!({
                "name": s.name,
                "dimension": s.dimension,
                "count": s.count,
                "error": s.error,
            })).collect::<Vec<_>>(),
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!();
    println!(
        "  {} embstore v{}",
        style("⚡").bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!();

    println!("  {}", style("── Stores ──").dim());
    if stores.is_empty() {
        println!("  {}", style("No stores yet. Create one with `embstore load`.").dim());
    } else {
        let mut table = Table::new();
        table.load_preset(presets::UTF8_FULL_CONDENSED);
        table.set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(vec![
            Cell::new("Name").fg(Color::White),
            Cell::new("Dimension").fg(Color::White),
            Cell::new("Records").fg(Color::White),
        ]);
        for s in &stores {
            let (dimension, records) = match (&s.error, s.dimension, s.count) {
                (Some(_), _, _) => (
                    Cell::new(s.dimension.map_or("-".to_string(), |d| d.to_string())),
                    Cell::new("unreadable").fg(Color::Red),
                ),
                (None, d, c) => (
                    Cell::new(d.map_or("-".to_string(), |d| d.to_string())),
                    Cell::new(c.map_or("-".to_string(), |c| c.to_string())),
                ),
            };
            table.add_row(vec![Cell::new(&s.name).fg(Color::Cyan), dimension, records]);
        }
        for line in table.to_string().lines() {
            println!("  {line}");
        }
    }
    println!();

    println!("  {}", style("── Config ──").dim());
    println!("  Batch size: {}", state.config.batch_size);
    println!("  OOV policy: {}", state.config.oov_policy);
    if !state.config.categories.is_empty() {
        println!("  Categories: {}", state.config.categories.join(", "));
    }
    println!();

    println!("  {}", style("── System ──").dim());
    println!("  Data dir: {}", style(state.data_dir.display()).dim());
    println!("  Database: {}", style("SQLite (WAL mode)").dim());
    println!();

    Ok(())
}
