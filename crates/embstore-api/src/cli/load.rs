//! `embstore load`: ingest a word2vec text file into a store.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use embstore_core::ingest::{IngestOptions, IngestReport};
use embstore_infra::config::{resolve_batch_size, resolve_categories};
use embstore_infra::load::load_from_reader;
use embstore_infra::word2vec::Word2VecReader;

use crate::state::AppState;

/// Arguments of the `load` command after clap parsing.
pub struct LoadArgs<'a> {
    pub name: &'a str,
    pub file: &'a Path,
    pub dim: Option<usize>,
    pub categories: &'a [String],
    pub batch_size: Option<usize>,
    pub limit: Option<usize>,
    pub reset: bool,
}

/// Load `args.file` into the named store.
///
/// Without `--dim` the store is sized from the file header, so a new store
/// always matches its input. An explicit `--dim` must agree with the header.
pub async fn load(state: &AppState, args: LoadArgs<'_>, json: bool, quiet: bool) -> Result<()> {
    let options = IngestOptions {
        batch_size: resolve_batch_size(&state.config, args.batch_size),
        categories: resolve_categories(&state.config, args.categories),
        reset: args.reset,
    };

    let reader = Word2VecReader::open(args.file)
        .with_context(|| format!("failed to read {}", args.file.display()))?
        .with_limit(args.limit);
    let dimension = args.dim.unwrap_or(reader.dimension());

    let store = state.open_store(args.name, dimension).await?;

    let spinner = if json || quiet {
        ProgressBar::hidden()
    } else {
        ProgressBar::new_spinner()
    };
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}")?);
    spinner.set_message(format!(
        "Loading {} into '{}'...",
        args.file.display(),
        args.name
    ));
    spinner.enable_steady_tick(Duration::from_millis(80));

    let result = load_from_reader(&store, reader, options).await;
    spinner.finish_and_clear();
    store.close().await;

    let report = match result {
        Ok(report) => report,
        Err(err) => {
            if !quiet {
                eprintln!(
                    "  {} Load stopped after {} committed records{}",
                    style("✗").red().bold(),
                    err.committed,
                    err.last_line
                        .map(|line| format!(" (last line read: {line})"))
                        .unwrap_or_default()
                );
            }
            return Err(err.into());
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report_json(args.name, dimension, &report))?);
    } else if !quiet {
        println!(
            "  {} Loaded {} records into '{}' ({} dimensions)",
            style("✓").green().bold(),
            style(report.inserted).bold(),
            style(args.name).cyan(),
            dimension
        );
        println!(
            "  Lines read: {}  Duplicates skipped: {}  Batches: {}",
            report.lines_read, report.duplicates_skipped, report.batches
        );
        if !report.synthetic.is_empty() {
            println!(
                "  Unknown-word vectors: {}",
                style(report.synthetic.join(", ")).dim()
            );
        }
    }

    Ok(())
}

fn report_json(name: &str, dimension: usize, report: &IngestReport) -> serde_json::Value {
    serde_json::json!({
        "store": name,
        "dimension": dimension,
        "lines_read": report.lines_read,
        "inserted": report.inserted,
        "duplicates_skipped": report.duplicates_skipped,
        "batches": report.batches,
        "synthetic": report.synthetic,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use embstore_core::storage::vector_store::VectorStore;

    #[test]
    fn test_report_json_fields() {
        let report = IngestReport {
            lines_read: 3,
            inserted: 4,
            duplicates_skipped: 0,
            batches: 1,
            synthetic: vec!["#WORD/UNK#".to_string()],
        };
        let value = report_json("wiki", 2, &report);
        assert_eq!(value["inserted"], 4);
        assert_eq!(value["synthetic"][0], "#WORD/UNK#");
    }

    #[tokio::test]
    async fn test_load_command_writes_store() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("vectors.txt");
        tokio::fs::write(&file, "2 2\nthe 1 2\nof 3 4\n").await.unwrap();
        let state = AppState::with_data_dir(dir.path().to_path_buf()).await;

        let args = LoadArgs {
            name: "small",
            file: &file,
            dim: Some(2),
            categories: &[],
            batch_size: Some(1),
            limit: None,
            reset: false,
        };
        load(&state, args, true, true).await.unwrap();

        let store = state.open_existing_store("small").await.unwrap();
        assert_eq!(store.count().await.unwrap(), 3);
        assert_eq!(store.lookup("of").await.unwrap(), Some(vec![3.0, 4.0]));
        store.close().await;
    }

    #[tokio::test]
    async fn test_load_without_dim_uses_header_dimension() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("vectors.txt");
        tokio::fs::write(&file, "2 2\nthe 1 2\nof 3 4\n").await.unwrap();
        let state = AppState::with_data_dir(dir.path().to_path_buf()).await;

        let file_ref: &Path = &file;
        let args = move |dim| LoadArgs {
            name: "s",
            file: file_ref,
            dim,
            categories: &[],
            batch_size: None,
            limit: None,
            reset: true,
        };
        load(&state, args(None), true, true).await.unwrap();
        load(&state, args(Some(2)), true, true).await.unwrap();

        let store = state.open_existing_store("s").await.unwrap();
        assert_eq!(store.dimension(), 2);
        assert_eq!(store.count().await.unwrap(), 3);
        store.close().await;
    }

    #[tokio::test]
    async fn test_load_missing_file_creates_no_store() {
        let dir = tempfile::tempdir().unwrap();
        let state = AppState::with_data_dir(dir.path().to_path_buf()).await;
        let file = dir.path().join("absent.txt");

        let args = LoadArgs {
            name: "s",
            file: &file,
            dim: None,
            categories: &[],
            batch_size: None,
            limit: None,
            reset: false,
        };
        assert!(load(&state, args, true, true).await.is_err());
        assert!(!dir.path().join("s.db").exists());
    }

    #[tokio::test]
    async fn test_load_command_reports_dimension_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("vectors.txt");
        tokio::fs::write(&file, "1 3\nthe 1 2 3\n").await.unwrap();
        let state = AppState::with_data_dir(dir.path().to_path_buf()).await;

        let args = LoadArgs {
            name: "small",
            file: &file,
            dim: Some(2),
            categories: &[],
            batch_size: None,
            limit: None,
            reset: false,
        };
        assert!(load(&state, args, true, true).await.is_err());
    }
}
