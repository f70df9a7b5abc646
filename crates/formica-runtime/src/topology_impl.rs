//! Concrete implementation of the TopologyGraph trait using petgraph.
//!
//! The foraging graph is the colony's shared structure. This implementation
//! uses petgraph's undirected `Graph` as the backing arena. Nodes and edges
//! are never removed, so petgraph's indices are stable and map one-to-one
//! onto `NodeId` and `EdgeId`.

use formica_core::error::{GraphError, Result};
use formica_core::topology::TopologyGraph;
use formica_core::types::*;
use petgraph::algo::astar;
use petgraph::graph::{EdgeIndex, Graph, NodeIndex};
use petgraph::visit::EdgeRef;

/// Petgraph-backed implementation of the topology graph.
#[derive(Debug, Clone)]
pub struct PetTopologyGraph {
    graph: Graph<NodeData, EdgeData, petgraph::Undirected>,
}

impl PetTopologyGraph {
    pub fn new() -> Self {
        Self {
            graph: Graph::new_undirected(),
        }
    }

    /// Create an empty graph with room for `nodes` nodes and `edges` edges.
    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        Self {
            graph: Graph::with_capacity(nodes, edges),
        }
    }

    fn node_idx(&self, id: NodeId) -> Option<NodeIndex> {
        (id.0 < self.graph.node_count()).then(|| NodeIndex::new(id.0))
    }

    fn edge_idx(&self, id: EdgeId) -> Option<EdgeIndex> {
        (id.0 < self.graph.edge_count()).then(|| EdgeIndex::new(id.0))
    }

    /// Number of edges incident to a node.
    pub fn degree(&self, id: NodeId) -> usize {
        self.node_idx(id)
            .map(|idx| self.graph.edges(idx).count())
            .unwrap_or(0)
    }

    /// Shortest path by edge weight (Euclidean length).
    ///
    /// Returns the node sequence and its total length.
    pub fn shortest_path(&self, from: NodeId, to: NodeId) -> Option<(Vec<NodeId>, f64)> {
        let from_idx = self.node_idx(from)?;
        let to_idx = self.node_idx(to)?;
        let (cost, path) = astar(
            &self.graph,
            from_idx,
            |n| n == to_idx,
            |e| e.weight().weight,
            |_| 0.0,
        )?;
        let path = path.into_iter().map(|idx| self.graph[idx].id).collect();
        Some((path, cost))
    }

    /// Shortest path by hop count.
    pub fn hop_path(&self, from: NodeId, to: NodeId) -> Option<Vec<NodeId>> {
        let from_idx = self.node_idx(from)?;
        let to_idx = self.node_idx(to)?;
        let (_, path) = astar(&self.graph, from_idx, |n| n == to_idx, |_| 1usize, |_| 0)?;
        Some(path.into_iter().map(|idx| self.graph[idx].id).collect())
    }

    /// Total Euclidean length of a node sequence, if every hop is an edge.
    pub fn path_length(&self, path: &[NodeId]) -> Option<f64> {
        path.windows(2).try_fold(0.0, |acc, pair| {
            let edge = self.find_edge(pair[0], pair[1])?;
            Some(acc + self.edge(edge)?.weight)
        })
    }
}

impl Default for PetTopologyGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl TopologyGraph for PetTopologyGraph {
    fn add_node(&mut self, position: Position) -> NodeId {
        let id = NodeId(self.graph.node_count());
        self.graph.add_node(NodeData { id, position });
        id
    }

    fn get_node(&self, id: NodeId) -> Option<&NodeData> {
        self.node_idx(id).map(|idx| &self.graph[idx])
    }

    fn add_edge(&mut self, a: NodeId, b: NodeId, data: EdgeData) -> Result<EdgeId> {
        let a_idx = self.node_idx(a).ok_or(GraphError::NodeNotFound(a))?;
        let b_idx = self.node_idx(b).ok_or(GraphError::NodeNotFound(b))?;
        if a_idx == b_idx {
            return Err(GraphError::SelfLoop(a).into());
        }

        // Check if edge already exists
        if let Some(edge_idx) = self.graph.find_edge(a_idx, b_idx) {
            self.graph[edge_idx] = data;
            Ok(EdgeId(edge_idx.index()))
        } else {
            Ok(EdgeId(self.graph.add_edge(a_idx, b_idx, data).index()))
        }
    }

    fn find_edge(&self, a: NodeId, b: NodeId) -> Option<EdgeId> {
        let a_idx = self.node_idx(a)?;
        let b_idx = self.node_idx(b)?;
        self.graph
            .find_edge(a_idx, b_idx)
            .map(|idx| EdgeId(idx.index()))
    }

    fn edge(&self, id: EdgeId) -> Option<&EdgeData> {
        self.edge_idx(id).map(|idx| &self.graph[idx])
    }

    fn edge_mut(&mut self, id: EdgeId) -> Option<&mut EdgeData> {
        self.edge_idx(id).map(|idx| &mut self.graph[idx])
    }

    fn endpoints(&self, id: EdgeId) -> Option<(NodeId, NodeId)> {
        let (a, b) = self.graph.edge_endpoints(self.edge_idx(id)?)?;
        Some((self.graph[a].id, self.graph[b].id))
    }

    fn candidates(&self, node: NodeId) -> Vec<Candidate> {
        let Some(node_idx) = self.node_idx(node) else {
            return Vec::new();
        };

        self.graph
            .edges(node_idx)
            .map(|edge| {
                let other_idx = if edge.source() == node_idx {
                    edge.target()
                } else {
                    edge.source()
                };
                Candidate {
                    neighbor: self.graph[other_idx].id,
                    edge: EdgeId(edge.id().index()),
                    pheromone: edge.weight().pheromone,
                }
            })
            .collect()
    }

    fn all_nodes(&self) -> Vec<NodeId> {
        self.graph
            .node_indices()
            .map(|idx| self.graph[idx].id)
            .collect()
    }

    fn all_edges(&self) -> Vec<EdgeId> {
        self.graph
            .edge_indices()
            .map(|idx| EdgeId(idx.index()))
            .collect()
    }

    fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    fn scale_pheromone(&mut self, factor: f64, floor: f64) {
        for edge in self.graph.edge_weights_mut() {
            edge.pheromone = (edge.pheromone * factor).max(floor);
        }
    }

    fn total_pheromone(&self) -> f64 {
        self.graph.edge_weights().map(|e| e.pheromone).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use formica_core::error::FormicaError;

    /// Square with one diagonal: 0-1-2-3-0 plus 0-2.
    fn square() -> PetTopologyGraph {
        let mut g = PetTopologyGraph::new();
        let pts = [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)];
        let ids: Vec<NodeId> = pts
            .iter()
            .map(|&(x, y)| g.add_node(Position::new(x, y)))
            .collect();
        for (a, b) in [(0, 1), (1, 2), (2, 3), (3, 0), (0, 2)] {
            let pa = g.position(ids[a]).unwrap();
            let w = pa.distance_to(&g.position(ids[b]).unwrap());
            g.add_edge(ids[a], ids[b], EdgeData::new(w, 0.1)).unwrap();
        }
        g
    }

    #[test]
    fn node_ids_are_dense() {
        let g = square();
        assert_eq!(g.all_nodes(), vec![NodeId(0), NodeId(1), NodeId(2), NodeId(3)]);
        assert_eq!(g.edge_count(), 5);
        assert!(g.get_node(NodeId(4)).is_none());
    }

    #[test]
    fn find_edge_is_undirected() {
        let g = square();
        let e = g.find_edge(NodeId(0), NodeId(1)).unwrap();
        assert_eq!(g.find_edge(NodeId(1), NodeId(0)), Some(e));
        assert!(g.find_edge(NodeId(1), NodeId(3)).is_none());
    }

    #[test]
    fn candidates_list_every_neighbor() {
        let g = square();
        let mut neighbors: Vec<NodeId> = g
            .candidates(NodeId(0))
            .iter()
            .map(|c| c.neighbor)
            .collect();
        neighbors.sort();
        assert_eq!(neighbors, vec![NodeId(1), NodeId(2), NodeId(3)]);
        assert!(g.candidates(NodeId(99)).is_empty());
    }

    #[test]
    fn re_adding_edge_replaces_data() {
        let mut g = square();
        let e = g.find_edge(NodeId(0), NodeId(1)).unwrap();
        let again = g
            .add_edge(NodeId(1), NodeId(0), EdgeData::new(1.0, 0.7))
            .unwrap();
        assert_eq!(e, again);
        assert_eq!(g.edge_count(), 5);
        assert!((g.edge(e).unwrap().pheromone - 0.7).abs() < 1e-12);
    }

    #[test]
    fn add_edge_rejects_unknown_nodes_and_self_loops() {
        let mut g = square();
        let err = g
            .add_edge(NodeId(0), NodeId(9), EdgeData::new(1.0, 0.1))
            .unwrap_err();
        assert!(matches!(
            err,
            FormicaError::Graph(GraphError::NodeNotFound(NodeId(9)))
        ));
        let err = g
            .add_edge(NodeId(2), NodeId(2), EdgeData::new(1.0, 0.1))
            .unwrap_err();
        assert!(matches!(
            err,
            FormicaError::Graph(GraphError::SelfLoop(NodeId(2)))
        ));
        assert_eq!(g.edge_count(), 5);
    }

    #[test]
    fn scale_pheromone_respects_floor() {
        let mut g = square();
        g.scale_pheromone(0.0, 1e-9);
        for e in g.all_edges() {
            assert_eq!(g.edge(e).unwrap().pheromone, 1e-9);
        }
    }

    #[test]
    fn shortest_path_takes_diagonal() {
        let g = square();
        let (path, len) = g.shortest_path(NodeId(0), NodeId(2)).unwrap();
        assert_eq!(path, vec![NodeId(0), NodeId(2)]);
        assert!((len - 2f64.sqrt()).abs() < 1e-9);
        assert_eq!(g.path_length(&[NodeId(0), NodeId(1), NodeId(2)]), Some(2.0));
        assert_eq!(g.path_length(&[NodeId(1), NodeId(3)]), None);
    }
}
