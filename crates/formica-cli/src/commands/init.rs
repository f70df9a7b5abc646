//! Initialize a new Formica project.

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::PathBuf;

use crate::config::{Config, CONFIG_FILE};

pub fn run(path: Option<String>) -> Result<()> {
    let base_path = match path {
        Some(p) => PathBuf::from(p),
        None => std::env::current_dir().context("Failed to read current directory")?,
    };

    println!("{} Initializing Formica project...", "→".blue());

    std::fs::create_dir_all(&base_path)
        .with_context(|| format!("Failed to create {}", base_path.display()))?;

    let config_path = base_path.join(CONFIG_FILE);
    if !config_path.exists() {
        Config::default().save(&config_path)?;
        println!("  {} Created {}", "✓".green(), config_path.display());
    } else {
        println!("  {} {} already exists", "•".yellow(), config_path.display());
    }

    println!();
    println!("{} Formica project initialized!", "✓".green().bold());
    println!();
    println!("Next steps:");
    println!("  {} edit {} to taste", "1.".blue(), CONFIG_FILE);
    println!("  {} formica run --snapshot colony.json", "2.".blue());
    println!("  {} formica trail", "3.".blue());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_default_config_once() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("colony");
        run(Some(target.display().to_string())).unwrap();

        let path = target.join(CONFIG_FILE);
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.colony.num_ants, 300);

        // A second init leaves an edited file alone.
        std::fs::write(&path, "[colony]\nnum_ants = 7\n").unwrap();
        run(Some(target.display().to_string())).unwrap();
        assert_eq!(Config::load_from(&path).unwrap().colony.num_ants, 7);
    }
}
