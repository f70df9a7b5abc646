//! Snapshot export: write colony state to disk as JSON.
//!
//! Snapshots carry everything a renderer needs to redraw a frame: node
//! positions, edge pheromone, ant positions and states.

use crate::colony::{Colony, ColonySnapshot, EdgeSnapshot};
use formica_core::error::Result;
use std::fs;
use std::path::Path;

/// Write the colony's current snapshot to `path` as pretty-printed JSON.
pub fn write_snapshot(colony: &Colony, path: &Path) -> Result<()> {
    let snapshot = colony.snapshot();
    let json = serde_json::to_string_pretty(&snapshot)?;
    fs::write(path, json)?;
    Ok(())
}

/// Read a snapshot written by [`write_snapshot`].
pub fn read_snapshot(path: &Path) -> Result<ColonySnapshot> {
    let json = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&json)?)
}

/// Edges sorted by pheromone, strongest first.
pub fn ranked_edges(snapshot: &ColonySnapshot) -> Vec<&EdgeSnapshot> {
    let mut edges: Vec<_> = snapshot.edges.iter().collect();
    edges.sort_by(|a, b| b.pheromone.total_cmp(&a.pheromone));
    edges
}
