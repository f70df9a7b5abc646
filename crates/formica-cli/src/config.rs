//! Configuration management for the Formica CLI.

use anyhow::{Context, Result};
use formica::prelude::{
    AntConfig, ColonyConfig, DepositLeg, DepositTiming, Layout, SceneConfig, TrailReset,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the project config file.
pub const CONFIG_FILE: &str = "formica.toml";

/// Formica project configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub scene: SceneSection,
    #[serde(default)]
    pub colony: ColonySection,
    #[serde(default)]
    pub ant: AntSection,
    #[serde(default)]
    pub run: RunSection,
}

/// Graph generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneSection {
    #[serde(default = "default_num_nodes")]
    pub num_nodes: usize,
    /// "random_geometric" or "lattice".
    #[serde(default = "default_layout")]
    pub layout: String,
    #[serde(default = "default_connectivity")]
    pub connectivity: f64,
    #[serde(default = "default_difficulty")]
    pub difficulty: f64,
    #[serde(default = "default_edge_probability")]
    pub edge_probability: f64,
    #[serde(default = "default_jitter")]
    pub jitter: f64,
    #[serde(default = "default_min_path_length")]
    pub min_path_length: usize,
    #[serde(default = "default_food_sources")]
    pub food_sources: usize,
    #[serde(default = "default_initial_pheromone")]
    pub initial_pheromone: f64,
    #[serde(default = "default_max_attempts")]
    pub max_attempts: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColonySection {
    #[serde(default = "default_num_ants")]
    pub num_ants: usize,
    #[serde(default)]
    pub seed: u64,
    #[serde(default = "default_decay")]
    pub pheromone_decay: f64,
    #[serde(default = "default_deposit")]
    pub pheromone_deposit: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AntSection {
    #[serde(default = "default_speed")]
    pub speed: f64,
    #[serde(default = "default_epsilon")]
    pub epsilon: f64,
    #[serde(default = "default_true")]
    pub anti_backtrack: bool,
    #[serde(default = "default_true")]
    pub back_trace: bool,
    #[serde(default = "default_deposit_timing")]
    pub deposit_timing: DepositTiming,
    #[serde(default = "default_deposit_leg")]
    pub deposit_leg: DepositLeg,
    #[serde(default = "default_trail_reset")]
    pub trail_reset: TrailReset,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSection {
    #[serde(default = "default_ticks")]
    pub ticks: u64,
    #[serde(default = "default_dt")]
    pub dt: f64,
}

// Default value functions
fn default_num_nodes() -> usize { 200 }
fn default_layout() -> String { "random_geometric".to_string() }
fn default_connectivity() -> f64 { 1.75 }
fn default_difficulty() -> f64 { 0.1 }
fn default_edge_probability() -> f64 { 0.1 }
fn default_jitter() -> f64 { 0.05 }
fn default_min_path_length() -> usize { 4 }
fn default_food_sources() -> usize { 1 }
fn default_initial_pheromone() -> f64 { 0.1 }
fn default_max_attempts() -> usize { 1000 }
fn default_num_ants() -> usize { 300 }
fn default_decay() -> f64 { 0.2 }
fn default_deposit() -> f64 { 1.2 }
fn default_speed() -> f64 { 1.0 }
fn default_epsilon() -> f64 { 0.1 }
fn default_true() -> bool { true }
fn default_deposit_timing() -> DepositTiming { DepositTiming::Continuous }
fn default_deposit_leg() -> DepositLeg { DepositLeg::ReturnOnly }
fn default_trail_reset() -> TrailReset { TrailReset::Nest }
fn default_ticks() -> u64 { 2000 }
fn default_dt() -> f64 { 0.003 }

impl Default for SceneSection {
    fn default() -> Self {
        Self {
            num_nodes: default_num_nodes(),
            layout: default_layout(),
            connectivity: default_connectivity(),
            difficulty: default_difficulty(),
            edge_probability: default_edge_probability(),
            jitter: default_jitter(),
            min_path_length: default_min_path_length(),
            food_sources: default_food_sources(),
            initial_pheromone: default_initial_pheromone(),
            max_attempts: default_max_attempts(),
        }
    }
}

impl Default for ColonySection {
    fn default() -> Self {
        Self {
            num_ants: default_num_ants(),
            seed: 0,
            pheromone_decay: default_decay(),
            pheromone_deposit: default_deposit(),
        }
    }
}

impl Default for AntSection {
    fn default() -> Self {
        Self {
            speed: default_speed(),
            epsilon: default_epsilon(),
            anti_backtrack: true,
            back_trace: true,
            deposit_timing: default_deposit_timing(),
            deposit_leg: default_deposit_leg(),
            trail_reset: default_trail_reset(),
        }
    }
}

impl Default for RunSection {
    fn default() -> Self {
        Self {
            ticks: default_ticks(),
            dt: default_dt(),
        }
    }
}

impl Config {
    /// Load config from formica.toml in the current or parent directories.
    pub fn load() -> Result<Self> {
        match find_config_file() {
            Some(path) => Self::load_from(&path),
            None => Ok(Config::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))
    }

    /// Save config to the specified path.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(())
    }

    /// Scene parameters, with `seed` used for graph generation.
    pub fn scene_config(&self, seed: u64) -> Result<SceneConfig> {
        let s = &self.scene;
        let layout = match s.layout.as_str() {
            "random_geometric" => Layout::RandomGeometric {
                connectivity: s.connectivity,
                difficulty: s.difficulty,
            },
            "lattice" => Layout::Lattice {
                edge_probability: s.edge_probability,
                jitter: s.jitter,
                min_path_length: s.min_path_length,
            },
            other => anyhow::bail!(
                "Unknown scene layout '{other}' (expected 'random_geometric' or 'lattice')"
            ),
        };
        let config = SceneConfig {
            num_nodes: s.num_nodes,
            layout,
            food_sources: s.food_sources,
            initial_pheromone: s.initial_pheromone,
            max_attempts: s.max_attempts,
            seed,
        };
        config.validate().context("Invalid [scene] section")?;
        Ok(config)
    }

    /// Colony parameters, with `seed` driving the ants' random streams.
    pub fn colony_config(&self, seed: u64) -> Result<ColonyConfig> {
        let a = &self.ant;
        let config = ColonyConfig {
            num_ants: self.colony.num_ants,
            seed,
            pheromone_decay: self.colony.pheromone_decay,
            pheromone_deposit: self.colony.pheromone_deposit,
            ant: AntConfig {
                speed: a.speed,
                epsilon: a.epsilon,
                anti_backtrack: a.anti_backtrack,
                back_trace: a.back_trace,
                deposit_timing: a.deposit_timing,
                deposit_leg: a.deposit_leg,
                trail_reset: a.trail_reset,
            },
        };
        config.validate().context("Invalid [colony] or [ant] section")?;
        Ok(config)
    }
}

/// Find formica.toml in current or parent directories.
fn find_config_file() -> Option<PathBuf> {
    let mut dir = std::env::current_dir().ok()?;
    loop {
        let config_path = dir.join(CONFIG_FILE);
        if config_path.exists() {
            return Some(config_path);
        }
        if !dir.pop() {
            break;
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        let mut config = Config::default();
        config.colony.num_ants = 42;
        config.ant.trail_reset = TrailReset::Empty;
        config.save(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.colony.num_ants, 42);
        assert_eq!(loaded.ant.trail_reset, TrailReset::Empty);
        assert_eq!(loaded.scene.layout, "random_geometric");
    }

    #[test]
    fn partial_file_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [scene]
            layout = "lattice"
            num_nodes = 64

            [ant]
            deposit_timing = "on_arrival"
            "#,
        )
        .unwrap();
        assert_eq!(config.scene.num_nodes, 64);
        assert_eq!(config.scene.min_path_length, 4);
        assert_eq!(config.colony.num_ants, 300);
        assert_eq!(config.ant.deposit_timing, DepositTiming::OnArrival);
        assert!(config.ant.back_trace);
        assert_eq!(config.run.dt, 0.003);

        let scene = config.scene_config(1).unwrap();
        assert!(matches!(scene.layout, Layout::Lattice { min_path_length: 4, .. }));
    }

    #[test]
    fn rejects_unknown_layout_and_bad_rates() {
        let mut config = Config::default();
        config.scene.layout = "hexagonal".to_string();
        assert!(config.scene_config(0).is_err());

        let mut config = Config::default();
        config.colony.pheromone_decay = 2.0;
        assert!(config.colony_config(0).is_err());
    }
}
