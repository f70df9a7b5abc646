//! # Formica Core
//!
//! Core types and contracts for the Formica ant colony engine.
//!
//! This crate defines what the rest of the workspace agrees on:
//!
//! - **Types**: node and edge identifiers, positions, edge data, terminals
//! - **Topology**: the `TopologyGraph` trait ants and pheromone run against
//! - **Errors**: the `FormicaError` taxonomy (malformed graph, trail
//!   bookkeeping, degenerate selection, invalid configuration)
//!
//! ## Quick Start
//!
//! ```rust
//! use formica_core::prelude::*;
//!
//! let nest = Position::new(0.5, 0.5);
//! let food = Position::new(0.9, 0.1);
//! let edge = EdgeData::new(nest.distance_to(&food), 0.1);
//! assert!(edge.weight > 0.0);
//! ```

pub mod types;
pub mod topology;
pub mod error;
pub mod prelude;
