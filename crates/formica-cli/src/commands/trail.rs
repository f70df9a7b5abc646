//! Run the colony and report on the trail it laid.

use anyhow::Result;
use colored::Colorize;
use formica::prelude::*;

use crate::config::Config;

pub fn run(ticks: Option<u64>, seed: Option<u64>, verbose: bool) -> Result<()> {
    let config = Config::load()?;
    let ticks = ticks.unwrap_or(config.run.ticks);

    let mut colony = super::build_colony(&config, seed)?;
    super::simulate(&mut colony, ticks, config.run.dt, verbose)?;

    let report = trail_report(&colony);
    print_report(&report);
    Ok(())
}

fn format_route(route: &Route) -> String {
    route
        .nodes
        .iter()
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join(" → ")
}

fn print_report(report: &TrailReport) {
    println!();
    println!("{}", "Formica Trail Report".white().bold());
    println!("{}", "═".repeat(40).dimmed());
    println!();

    println!("{}", "Strongest Trail".blue().bold());
    println!("  Route:     {}", format_route(&report.strongest));
    println!("  Hops:      {}", report.strongest.hops().to_string().cyan());
    println!("  Length:    {:.4}", report.strongest.length);
    if report.strongest.reaches_food {
        println!("  Reaches:   {}", "food".green());
    } else {
        println!("  Reaches:   {}", "dead end".red());
    }
    println!();

    println!("{}", "Shortest Route".blue().bold());
    match &report.shortest {
        Some(route) => {
            println!("  Route:     {}", format_route(route));
            println!("  Hops:      {}", route.hops().to_string().cyan());
            println!("  Length:    {:.4}", route.length);
        }
        None => println!("  {}", "no route to food".red()),
    }
    println!();

    println!("{}", "Convergence".blue().bold());
    let converged = if report.converged {
        "yes".green()
    } else {
        "no".yellow()
    };
    println!("  Converged:      {}", converged);
    if let Some(stretch) = report.stretch {
        println!("  Stretch:        {:.3}", stretch);
    }
    println!("  Concentration:  {:.1}%", report.concentration * 100.0);
    println!(
        "  Deliveries:     {}",
        report.stats.food_delivered.to_string().green()
    );

    println!();
    println!("{}", "═".repeat(40).dimmed());
}
