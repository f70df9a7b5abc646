//! Run the colony simulation.

use anyhow::{Context, Result};
use colored::Colorize;
use formica::prelude::*;
use std::path::PathBuf;

use crate::config::Config;

/// Edges listed in the summary.
const TOP_EDGES: usize = 5;

pub fn run(
    ticks: Option<u64>,
    seed: Option<u64>,
    snapshot: Option<PathBuf>,
    verbose: bool,
) -> Result<()> {
    let config = Config::load()?;
    let ticks = ticks.unwrap_or(config.run.ticks);

    let mut colony = super::build_colony(&config, seed)?;
    super::simulate(&mut colony, ticks, config.run.dt, verbose)?;

    let stats = colony.stats();
    println!();
    println!("{} Simulation complete!", "✓".green().bold());
    println!("  Ticks:            {}", stats.tick.to_string().cyan());
    println!("  Simulated time:   {:.3}", stats.elapsed);
    println!("  Food found:       {}", stats.food_found.to_string().green());
    println!("  Food delivered:   {}", stats.food_delivered.to_string().green());
    println!("  Ants carrying:    {}", stats.carrying.to_string().yellow());
    println!("  Total pheromone:  {:.4}", stats.total_pheromone);
    println!("  Max pheromone:    {:.4}", stats.max_pheromone);

    let snap = colony.snapshot();
    println!();
    println!("{}", "Strongest edges".blue().bold());
    for edge in ranked_edges(&snap).into_iter().take(TOP_EDGES) {
        println!(
            "  {} - {}  {:.4}  (length {:.3})",
            edge.a, edge.b, edge.pheromone, edge.weight
        );
    }

    if let Some(path) = snapshot {
        write_snapshot(&colony, &path)
            .with_context(|| format!("Failed to write snapshot: {}", path.display()))?;
        println!("  {} Snapshot written to {}", "✓".green(), path.display());
    }

    Ok(())
}
