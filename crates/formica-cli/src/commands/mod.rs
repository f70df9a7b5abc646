//! CLI command implementations.

pub mod init;
pub mod run;
pub mod trail;

use anyhow::{Context, Result};
use colored::Colorize;
use formica::prelude::*;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

use crate::config::Config;

/// Build the scene and populate it, as described by `config`.
///
/// `seed` overrides the configured seed for both the graph and the ants.
pub fn build_colony(config: &Config, seed: Option<u64>) -> Result<Colony> {
    let seed = seed.unwrap_or(config.colony.seed);
    debug!(seed, layout = %config.scene.layout, "building colony");
    let scene_config = config.scene_config(seed)?;

    println!(
        "{} Building scene: {} nodes, {} layout...",
        "→".blue(),
        scene_config.num_nodes.to_string().cyan(),
        config.scene.layout.cyan()
    );
    let scene = SceneBuilder::from_config(scene_config)
        .build()
        .context("Failed to build scene")?;
    let colony =
        Colony::new(scene, config.colony_config(seed)?).context("Failed to create colony")?;

    let stats = colony.stats();
    println!(
        "  {} {} nodes, {} edges, {} ants",
        "✓".green(),
        stats.graph_nodes.to_string().cyan(),
        stats.graph_edges.to_string().cyan(),
        stats.ants.to_string().cyan()
    );
    Ok(colony)
}

/// Run `ticks` ticks of `dt` with a progress bar.
pub fn simulate(colony: &mut Colony, ticks: u64, dt: f64, verbose: bool) -> Result<()> {
    println!(
        "{} Running {} ticks (dt = {})...",
        "→".blue(),
        ticks.to_string().cyan(),
        dt
    );

    let pb = ProgressBar::new(ticks);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} ticks {msg}")?
            .progress_chars("#>-"),
    );

    for _ in 0..ticks {
        let events = colony
            .tick(dt)
            .with_context(|| format!("Simulation failed at tick {}", colony.tick_count()))?;
        let delivered = events
            .iter()
            .filter(|e| matches!(e, ColonyEvent::FoodDelivered { .. }))
            .count();
        if verbose && delivered > 0 {
            pb.println(format!("  tick {}: {} deliveries", colony.tick_count(), delivered));
        }
        pb.set_message(format!("{} delivered", colony.stats().food_delivered));
        pb.inc(1);
    }
    pb.finish_with_message("done");
    Ok(())
}
