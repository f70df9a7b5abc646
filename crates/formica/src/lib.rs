//! # Formica
//!
//! Ant colony optimization on spatial graphs.
//!
//! A colony of ants forages on a graph embedded in the plane. Ants leave the
//! nest, wander by pheromone until they find food, and carry it home while
//! marking the edges they cross. Pheromone evaporates everywhere, all the
//! time. Short routes are crossed more often per unit time, so they end up
//! carrying the strongest trail.
//!
//! ## Quick Start
//!
//! ```rust
//! use formica::prelude::*;
//!
//! // Generate a random geometric graph with a nest and one food source
//! let scene = SceneBuilder::new().num_nodes(60).seed(7).build().unwrap();
//!
//! // Populate it
//! let mut colony = Colony::new(scene, ColonyConfig {
//!     num_ants: 50,
//!     ..ColonyConfig::default()
//! }).unwrap();
//!
//! // Run the simulation
//! colony.run(200, 0.01).unwrap();
//!
//! // Where does the pheromone point?
//! let report = trail_report(&colony);
//! println!("strongest trail: {} hops", report.strongest.hops());
//! ```
//!
//! ## Architecture
//!
//! Formica is organized into several crates:
//!
//! - [`formica_core`] - Shared types, the graph contract, errors
//! - [`formica_runtime`] - Ants, pheromone field, colony, scene construction
//!
//! ## Key Concepts
//!
//! ### The ant's trip
//!
//! | Phase | What happens |
//! |-------|--------------|
//! | Outbound | Choose edges by pheromone, avoid turning back |
//! | Food found | Pick up food, start returning |
//! | Returning | Retrace the outbound route, loops cut out, laying pheromone |
//! | Delivered | Drop food at the nest, set out again |
//!
//! ### Pheromone
//!
//! - Choosing: weight `pheromone + epsilon`, normalized over the current node's edges
//! - Laying: `deposit * dt / length` per tick, so every crossing lays the same total
//! - Evaporating: `pheromone *= (1 - decay)^dt` on every edge, once per tick
//!
//! ## Explicit graphs
//!
//! ```rust
//! use formica::prelude::*;
//!
//! let mut b = GraphBuilder::new();
//! let nest = b.add_node(Position::new(0.0, 0.0));
//! let mid = b.add_node(Position::new(1.0, 0.0));
//! let food = b.add_node(Position::new(2.0, 0.0));
//! b.add_edge(nest, mid).unwrap();
//! b.add_edge(mid, food).unwrap();
//!
//! let scene = b.build(nest, vec![food]).unwrap();
//! let mut colony = Colony::new(scene, ColonyConfig::default()).unwrap();
//! colony.tick(0.003).unwrap();
//! assert_eq!(colony.positions().len(), 300);
//! ```

// Re-export all subcrates
pub use formica_core as core;
pub use formica_runtime as runtime;

/// Prelude module for convenient imports.
///
/// ```rust
/// use formica::prelude::*;
/// ```
pub mod prelude {
    // Core types, traits, and errors
    pub use formica_core::prelude::*;

    // Runtime
    pub use formica_runtime::ant::{Ant, AntConfig, DepositLeg, DepositTiming, TrailReset};
    pub use formica_runtime::colony::{
        Colony, ColonyConfig, ColonyEvent, ColonySnapshot, ColonyStats,
    };
    pub use formica_runtime::export::{ranked_edges, read_snapshot, write_snapshot};
    pub use formica_runtime::metrics::{trail_report, Route, TrailReport};
    pub use formica_runtime::pheromone::PheromoneField;
    pub use formica_runtime::scene::{GraphBuilder, Layout, Scene, SceneBuilder, SceneConfig};
    pub use formica_runtime::selector::EdgeSelector;
    pub use formica_runtime::topology_impl::PetTopologyGraph;
}

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
