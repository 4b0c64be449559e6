//! `embstore lookup`: print the vector stored for a key.

use anyhow::Result;
use console::style;

use embstore_core::lookup::EmbeddingLookup;
use embstore_infra::config::resolve_categories;
use embstore_types::embedding::OovPolicy;

use crate::state::AppState;

/// Arguments of the `lookup` command after clap parsing.
pub struct LookupArgs<'a> {
    pub name: &'a str,
    pub key: &'a str,
    pub oov: Option<OovPolicy>,
    pub seed: Option<u64>,
    pub categories: &'a [String],
    pub unknown: bool,
}

/// Resolve the vector for `args.key`. `None` means the key is unknown and the
/// policy is `none`.
pub async fn resolve(state: &AppState, args: &LookupArgs<'_>) -> Result<Option<Vec<f32>>> {
    let store = state.open_existing_store(args.name).await?;
    let policy = args.oov.unwrap_or(state.config.oov_policy);
    let lookup = match args.seed {
        Some(seed) => EmbeddingLookup::with_seed(store, policy, seed),
        None => EmbeddingLookup::new(store, policy),
    };

    let vector = if args.unknown || !args.categories.is_empty() {
        let categories = resolve_categories(&state.config, args.categories);
        lookup.embed_or_unknown(args.key, &categories).await
    } else {
        lookup.embed(args.key).await
    };
    lookup.into_store().close().await;
    Ok(vector?)
}

pub async fn lookup(state: &AppState, args: LookupArgs<'_>, json: bool) -> Result<()> {
    let vector = resolve(state, &args).await?;

    if json {
        let out = serde_json::json!({
            "key": args.key,
            "found": vector.is_some(),
            "vector": vector,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    match vector {
        Some(vector) => {
            let components: Vec<String> = vector.iter().map(|c| c.to_string()).collect();
            println!("{} {}", args.key, components.join(" "));
        }
        None => {
            eprintln!(
                "  {} '{}' is not in '{}'",
                style("✗").yellow().bold(),
                args.key,
                args.name
            );
        }
    }

    Ok(())
}
