//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Tabula: turn unstructured text into validated tables
#[derive(Parser)]
#[command(name = "tabula")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Extract a validated table from a text document
    Extract {
        /// Path to the document (txt/md)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output path for the extracted table
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, default_value = "csv")]
        format: OutputFormat,

        /// Oracle provider to use
        #[arg(long, default_value = "ollama")]
        oracle: OracleChoice,

        /// Model to use (provider-specific, e.g., "mistral", "llama3.2")
        #[arg(long)]
        model: Option<String>,

        /// Concurrent oracle requests during cell extraction
        #[arg(long, default_value = "4")]
        concurrency: usize,
    },

    /// Cross-check an extracted table against its source text with
    /// auto-generated questions
    Qa {
        /// Path to the document (txt/md)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Oracle provider to use
        #[arg(long, default_value = "ollama")]
        oracle: OracleChoice,

        /// Model to use (provider-specific)
        #[arg(long)]
        model: Option<String>,

        /// Concurrent oracle requests
        #[arg(long, default_value = "4")]
        concurrency: usize,

        /// Output the QA report as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Which oracle backend to run against.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OracleChoice {
    /// Anthropic API (requires ANTHROPIC_API_KEY)
    Anthropic,
    /// Local Ollama server
    Ollama,
}

/// Export format for extracted tables.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormat {
    Csv,
    Markdown,
    Json,
}
