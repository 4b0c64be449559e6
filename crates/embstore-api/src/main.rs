//! embstore CLI entry point.
//!
//! Binary name: `embstore`
//!
//! Parses CLI arguments, installs tracing, resolves the data directory and
//! configuration, then dispatches to the command handler.

mod cli;
mod state;

use clap::Parser;
use clap_complete::generate;

use cli::load::LoadArgs;
use cli::lookup::LookupArgs;
use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up tracing based on verbosity
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info,embstore_infra=debug,embstore_core=debug",
        _ => "trace",
    };
    if let Err(e) = embstore_observe::tracing_setup::init_tracing(cli.otel, filter) {
        eprintln!("Warning: failed to initialize tracing: {e}");
    }

    let result = run(cli).await;
    embstore_observe::tracing_setup::shutdown_tracing();
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    // Shell completions don't need app state
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "embstore", &mut std::io::stdout());
        return Ok(());
    }

    let state = AppState::init().await?;

    match cli.command {
        Commands::Load {
            name,
            file,
            dim,
            categories,
            batch_size,
            limit,
            reset,
        } => {
            let args = LoadArgs {
                name: &name,
                file: &file,
                dim,
                categories: &categories,
                batch_size,
                limit,
                reset,
            };
            cli::load::load(&state, args, cli.json, cli.quiet).await?;
        }

        Commands::Lookup {
            name,
            key,
            oov,
            seed,
            categories,
            unknown,
        } => {
            let args = LookupArgs {
                name: &name,
                key: &key,
                oov,
                seed,
                categories: &categories,
                unknown,
            };
            cli::lookup::lookup(&state, args, cli.json).await?;
        }

        Commands::Count { name } => {
            cli::store::count(&state, &name, cli.json).await?;
        }

        Commands::Clear { name, force } => {
            cli::store::clear(&state, &name, force, cli.json).await?;
        }

        Commands::Status => {
            cli::status::status(&state, cli.json).await?;
        }

        Commands::Completions { .. } => unreachable!("handled above"),
    }

    Ok(())
}
