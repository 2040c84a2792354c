//! Tabula CLI - text-to-table extraction and QA verification.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Extract {
            file,
            output,
            format,
            oracle,
            model,
            concurrency,
        } => commands::extract::run(file, output, format, oracle, model, concurrency, cli.verbose),

        Commands::Qa {
            file,
            oracle,
            model,
            concurrency,
            json,
        } => commands::qa::run(file, oracle, model, concurrency, json, cli.verbose),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Route diagnostics to stderr so exported tables stay clean on stdout.
fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "tabula=debug" } else { "tabula=warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
