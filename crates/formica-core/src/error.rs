//! Error types for Formica operations.
//!
//! Everything that can go wrong inside the engine is a contract violation
//! by the caller or by the graph builder; nothing here is retried.

use crate::types::{AntIndex, NodeId};
use thiserror::Error;

/// Result type for Formica operations.
pub type Result<T> = std::result::Result<T, FormicaError>;

/// Errors that can occur during Formica operations.
#[derive(Debug, Clone, Error)]
pub enum FormicaError {
    /// Graph-related errors.
    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),
    /// Ant-related errors.
    #[error("Ant error: {0}")]
    Agent(#[from] AgentError),
    /// Configuration errors.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    /// An ant's step failed; the tick was aborted.
    #[error("Ant {ant} failed its step: {source}")]
    AntStep {
        ant: AntIndex,
        #[source]
        source: Box<FormicaError>,
    },
    /// I/O errors (wrapped).
    #[error("I/O error: {0}")]
    Io(String),
    /// Serialization errors.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<std::io::Error> for FormicaError {
    fn from(e: std::io::Error) -> Self {
        FormicaError::Io(e.to_string())
    }
}

impl From<serde_json::Error> for FormicaError {
    fn from(e: serde_json::Error) -> Self {
        FormicaError::Serialization(e.to_string())
    }
}

/// Graph-related errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GraphError {
    /// Node not found.
    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),
    /// Edge not found.
    #[error("Edge not found: {0} -> {1}")]
    EdgeNotFound(NodeId, NodeId),
    /// A node has no outgoing edges when an ant must leave it.
    #[error("Node {0} has no outgoing edges")]
    NoCandidates(NodeId),
    /// Edge weight must be strictly positive.
    #[error("Invalid edge weight: {0} (must be > 0)")]
    InvalidWeight(f64),
    /// Self-loops are not part of the graph contract.
    #[error("Self-loop on node {0}")]
    SelfLoop(NodeId),
    /// The same pair of nodes was connected twice.
    #[error("Duplicate edge: {0} -- {1}")]
    DuplicateEdge(NodeId, NodeId),
    /// No food source was designated.
    #[error("Scene has no food nodes")]
    NoFood,
    /// Construction gave up before nest and food were connected.
    #[error("No path from nest {nest} to food after {attempts} attempts")]
    NoPath { nest: NodeId, attempts: usize },
    /// Graph is empty.
    #[error("Graph is empty")]
    EmptyGraph,
}

/// Ant-related errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AgentError {
    /// A returning ant ran out of trail before reaching the nest.
    #[error("Ant {ant} has an empty trail at {at} while returning")]
    EmptyTrail { ant: AntIndex, at: NodeId },
    /// Selection weights did not form a valid distribution.
    #[error("Degenerate selection distribution at {node}: {reason}")]
    DegenerateDistribution { node: NodeId, reason: String },
}

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Invalid value.
    #[error("Invalid value for {field}: {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
    /// Out of range.
    #[error("{field} out of range: {value} (must be {min}-{max})")]
    OutOfRange {
        field: String,
        min: f64,
        max: f64,
        value: f64,
    },
}

// Convenience constructors
impl FormicaError {
    pub fn node_not_found(id: NodeId) -> Self {
        FormicaError::Graph(GraphError::NodeNotFound(id))
    }

    pub fn invalid_config(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        FormicaError::Config(ConfigError::InvalidValue {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        })
    }

    pub fn out_of_range(field: impl Into<String>, min: f64, max: f64, value: f64) -> Self {
        FormicaError::Config(ConfigError::OutOfRange {
            field: field.into(),
            min,
            max,
            value,
        })
    }

    /// Attach the failing ant's index to an error raised during its step.
    pub fn in_ant(self, ant: AntIndex) -> Self {
        FormicaError::AntStep {
            ant,
            source: Box::new(self),
        }
    }

    /// The innermost error, unwrapping any `AntStep` layers.
    pub fn root(&self) -> &FormicaError {
        match self {
            FormicaError::AntStep { source, .. } => source.root(),
            other => other,
        }
    }
}

/// Check that `value` lies in `[min, max]` and is finite.
pub fn ensure_range(field: &str, value: f64, min: f64, max: f64) -> Result<()> {
    if value.is_finite() && value >= min && value <= max {
        Ok(())
    } else {
        Err(FormicaError::out_of_range(field, min, max, value))
    }
}
