//! Formica CLI - Command-line interface for ant colony simulation.

mod commands;
mod config;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "formica")]
#[command(
    author,
    version,
    about = "Formica - Ant colony optimization on spatial graphs",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output (debug logging unless RUST_LOG is set)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default formica.toml
    Init {
        /// Project directory (default: current directory)
        #[arg(short, long)]
        path: Option<String>,
    },

    /// Run the colony simulation
    Run {
        /// Number of ticks to run (default: from formica.toml)
        #[arg(short, long)]
        ticks: Option<u64>,

        /// Seed for the graph and the ants (default: from formica.toml)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Write a JSON snapshot of the final state to this file
        #[arg(long)]
        snapshot: Option<PathBuf>,
    },

    /// Run the simulation and report on the strongest trail
    Trail {
        /// Number of ticks to run (default: from formica.toml)
        #[arg(short, long)]
        ticks: Option<u64>,

        /// Seed for the graph and the ants (default: from formica.toml)
        #[arg(short, long)]
        seed: Option<u64>,
    },
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Init { path } => commands::init::run(path),
        Commands::Run {
            ticks,
            seed,
            snapshot,
        } => commands::run::run(ticks, seed, snapshot, cli.verbose),
        Commands::Trail { ticks, seed } => commands::trail::run(ticks, seed, cli.verbose),
    }
}
