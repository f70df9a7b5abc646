//! Formica Runtime Prelude: convenient imports for common usage.
//!
//! ```rust
//! use formica_runtime::prelude::*;
//! ```

// Re-export colony
pub use crate::colony::{Colony, ColonyConfig, ColonyEvent, ColonySnapshot, ColonyStats};

// Re-export ants and their building blocks
pub use crate::ant::{Ant, AntConfig, AntEvent, DepositLeg, DepositTiming, TrailReset};
pub use crate::pheromone::{PheromoneField, PHEROMONE_FLOOR};
pub use crate::selector::{EdgeSelector, Junction};

// Re-export scene construction
pub use crate::scene::{GraphBuilder, Layout, Scene, SceneBuilder, SceneConfig};
pub use crate::topology_impl::PetTopologyGraph;

// Re-export metrics and export
pub use crate::export::{ranked_edges, read_snapshot, write_snapshot};
pub use crate::metrics::{strongest_trail, shortest_route, trail_report, Route, TrailReport};

// Re-export from core
pub use formica_core::prelude::*;
