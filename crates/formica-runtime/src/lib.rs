//! # Formica Runtime
//!
//! Colony management, the pheromone field, and scene construction.
//!
//! The runtime is where the ants live. It builds the foraging graph, steps
//! every ant through the tick-based simulation, and maintains the pheromone
//! on the graph's edges.

pub mod topology_impl;
pub mod pheromone;
pub mod selector;
pub mod ant;
pub mod colony;
pub mod scene;
pub mod metrics;
pub mod export;
pub mod prelude;
