//! CLI command definitions for the `embstore` binary.
//!
//! Uses clap derive macros for argument parsing. Every command names a store;
//! a bare name resolves to `<data_dir>/<name>.db`.

pub mod load;
pub mod lookup;
pub mod status;
pub mod store;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

use embstore_types::embedding::OovPolicy;

/// Persist word embeddings in SQLite and look them up by key.
#[derive(Parser)]
#[command(name = "embstore", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Export tracing spans via OpenTelemetry (stdout exporter).
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Load a word2vec text file into a store.
    Load {
        /// Store name (or path to a .db file).
        name: String,

        /// word2vec text file to read.
        file: PathBuf,

        /// Components per vector; must match the file header (defaults to it).
        #[arg(long)]
        dim: Option<usize>,

        /// Category label for an unknown-word vector (repeatable).
        #[arg(long = "category", value_name = "LABEL")]
        categories: Vec<String>,

        /// Records per insert transaction.
        #[arg(long)]
        batch_size: Option<usize>,

        /// Read at most this many records from the file.
        #[arg(long)]
        limit: Option<usize>,

        /// Clear the store before loading.
        #[arg(long)]
        reset: bool,
    },

    /// Look up the vector for a key.
    Lookup {
        /// Store name (or path to a .db file).
        name: String,

        /// Key to look up.
        key: String,

        /// What to return for an unknown key: none, zero or random.
        #[arg(long)]
        oov: Option<OovPolicy>,

        /// Seed for random out-of-vocabulary vectors.
        #[arg(long)]
        seed: Option<u64>,

        /// Fall back to the key's category unknown-word vector before the
        /// out-of-vocabulary policy; labels default to config.toml (repeatable).
        #[arg(long = "category", value_name = "LABEL")]
        categories: Vec<String>,

        /// Use the stored unknown-word vectors for misses.
        #[arg(long)]
        unknown: bool,
    },

    /// Count the records in a store.
    Count {
        /// Store name (or path to a .db file).
        name: String,
    },

    /// Delete every record in a store (the schema is kept).
    Clear {
        /// Store name (or path to a .db file).
        name: String,

        /// Skip confirmation prompt.
        #[arg(long)]
        force: bool,
    },

    /// List stores in the data directory.
    Status,

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}
