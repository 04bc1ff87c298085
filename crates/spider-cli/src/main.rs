//! Spider CLI - compile command bags from the shell.
//!
//! Reads Bags written as JSON and prints the command a dialect processor
//! produces for them, so query shapes can be checked without an engine.

mod commands;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Spider command compiler.
///
/// Compiles JSON-described graph commands into a dialect's query text and
/// shows the translation tables behind them.
#[derive(Parser)]
#[command(name = "spider")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, global = true, default_value = "table")]
    format: OutputFormat,

    /// Suppress info messages
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Enable verbose debug logging
    #[arg(long, short, global = true)]
    verbose: bool,
}

/// Output format options.
#[derive(Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    /// Human-readable table format
    #[default]
    Table,
    /// Machine-readable JSON format
    Json,
}

/// Available commands.
#[derive(Subcommand)]
enum Commands {
    /// Compile one Bag
    Compile {
        /// JSON file holding the Bag, or `-` for stdin
        input: PathBuf,

        /// Target dialect
        #[arg(long, default_value = "orientSQL")]
        dialect: String,

        /// Bound on embedded command nesting
        #[arg(long)]
        max_depth: Option<usize>,
    },

    /// Compile a JSON array of Bags into one transactional script
    Batch {
        /// JSON file holding the Bags, or `-` for stdin
        input: PathBuf,

        /// Target dialect
        #[arg(long, default_value = "orientSQL")]
        dialect: String,

        /// Bound on embedded command nesting
        #[arg(long)]
        max_depth: Option<usize>,
    },

    /// Show a dialect's translation tables
    Tables {
        /// Dialect to show
        #[arg(long, default_value = "orientSQL")]
        dialect: String,
    },

    /// List the dialects compiled into this build
    Dialects,
}

fn main() {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(std::io::stderr)
            .init();
    } else if !cli.quiet {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .with_writer(std::io::stderr)
            .init();
    }

    let result = match cli.command {
        Commands::Compile {
            input,
            dialect,
            max_depth,
        } => commands::compile::run(&input, &dialect, max_depth, cli.format, cli.quiet),
        Commands::Batch {
            input,
            dialect,
            max_depth,
        } => commands::batch::run(&input, &dialect, max_depth, cli.format, cli.quiet),
        Commands::Tables { dialect } => commands::tables::run(&dialect, cli.format, cli.quiet),
        Commands::Dialects => commands::tables::list_dialects(cli.format, cli.quiet),
    };

    if let Err(e) = result {
        output::error(&format!("{e:#}"));
        std::process::exit(1);
    }
}
