//! Topology: the foraging graph the colony lives on.
//!
//! Nodes are points in the plane; undirected edges carry a fixed length
//! and a mutable pheromone level. Ants read the structure and write only
//! the pheromone.

use crate::error::Result;
use crate::types::*;

/// A handle to the foraging graph.
///
/// This is a trait rather than a concrete type so that the ants and the
/// pheromone field can run against any graph backend.
pub trait TopologyGraph {
    /// Add a node at a position and return its ID.
    fn add_node(&mut self, position: Position) -> NodeId;

    /// Get node data by ID.
    fn get_node(&self, id: NodeId) -> Option<&NodeData>;

    /// Connect two existing, distinct nodes. Returns the edge's ID.
    ///
    /// Connecting an already connected pair replaces its data.
    fn add_edge(&mut self, a: NodeId, b: NodeId, data: EdgeData) -> Result<EdgeId>;

    /// Find the edge between two nodes, in either direction.
    fn find_edge(&self, a: NodeId, b: NodeId) -> Option<EdgeId>;

    /// Get edge data by ID.
    fn edge(&self, id: EdgeId) -> Option<&EdgeData>;

    /// Get mutable edge data by ID.
    fn edge_mut(&mut self, id: EdgeId) -> Option<&mut EdgeData>;

    /// The two endpoints of an edge.
    fn endpoints(&self, id: EdgeId) -> Option<(NodeId, NodeId)>;

    /// All edges leaving a node, with their current pheromone.
    fn candidates(&self, node: NodeId) -> Vec<Candidate>;

    /// Get all node IDs.
    fn all_nodes(&self) -> Vec<NodeId>;

    /// Get all edge IDs.
    fn all_edges(&self) -> Vec<EdgeId>;

    /// Number of nodes.
    fn node_count(&self) -> usize;

    /// Number of edges.
    fn edge_count(&self) -> usize;

    /// Multiply every edge's pheromone by `factor`, never going below `floor`.
    fn scale_pheromone(&mut self, factor: f64, floor: f64);

    /// Sum of pheromone over all edges.
    fn total_pheromone(&self) -> f64;

    /// Position of a node, if it exists.
    fn position(&self, id: NodeId) -> Option<Position> {
        self.get_node(id).map(|n| n.position)
    }
}
