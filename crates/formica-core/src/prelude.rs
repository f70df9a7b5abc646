//! Formica Core Prelude: convenient imports for common usage.
//!
//! ```rust
//! use formica_core::prelude::*;
//! ```

// Re-export commonly used types
pub use crate::types::{
    AntIndex, AntState, Candidate, EdgeData, EdgeId, NodeData, NodeId, Position, Terminals, Tick,
};

// Re-export the TopologyGraph trait
pub use crate::topology::TopologyGraph;

// Re-export error types
pub use crate::error::{AgentError, ConfigError, FormicaError, GraphError, Result};
