//! Trail metrics: has the colony found a good route?
//!
//! Compares the route the pheromone points along with the true shortest
//! route from the nest to the food:
//! - Strongest trail: greedy walk from the nest along the most marked edge
//! - Shortest route: by Euclidean length, ignoring pheromone
//! - Concentration: how much of all pheromone sits on the strongest trail

use crate::colony::{Colony, ColonyStats};
use crate::topology_impl::PetTopologyGraph;
use formica_core::topology::TopologyGraph;
use formica_core::types::*;
use serde::Serialize;
use std::collections::HashSet;

/// A route through the graph.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Route {
    pub nodes: Vec<NodeId>,
    /// Sum of edge weights along the route.
    pub length: f64,
    /// Whether the route ends on a food node.
    pub reaches_food: bool,
}

impl Route {
    pub fn hops(&self) -> usize {
        self.nodes.len().saturating_sub(1)
    }
}

/// Summary of how well the colony's pheromone marks the best route.
#[derive(Debug, Clone, Serialize)]
pub struct TrailReport {
    pub strongest: Route,
    pub shortest: Option<Route>,
    /// Strongest trail and shortest route visit the same nodes.
    pub converged: bool,
    /// Strongest trail length over shortest route length (1.0 is optimal).
    pub stretch: Option<f64>,
    /// Fraction of all pheromone lying on the strongest trail.
    pub concentration: f64,
    pub stats: ColonyStats,
}

/// Follow the most marked edge from the nest without revisiting a node,
/// until a food node or a dead end. Ties go to the lower node id.
pub fn strongest_trail(graph: &PetTopologyGraph, terminals: &Terminals) -> Route {
    let mut nodes = vec![terminals.nest];
    let mut visited: HashSet<NodeId> = HashSet::from([terminals.nest]);
    let mut length = 0.0;
    let mut current = terminals.nest;

    while !terminals.is_food(current) {
        let best = graph
            .candidates(current)
            .into_iter()
            .filter(|c| !visited.contains(&c.neighbor))
            .max_by(|a, b| {
                a.pheromone
                    .total_cmp(&b.pheromone)
                    .then(b.neighbor.cmp(&a.neighbor))
            });
        let Some(next) = best else {
            break;
        };
        length += graph.edge(next.edge).map(|e| e.weight).unwrap_or(0.0);
        visited.insert(next.neighbor);
        nodes.push(next.neighbor);
        current = next.neighbor;
    }

    Route {
        reaches_food: terminals.is_food(current),
        nodes,
        length,
    }
}

/// Shortest route by length from the nest to the nearest food node.
pub fn shortest_route(graph: &PetTopologyGraph, terminals: &Terminals) -> Option<Route> {
    terminals
        .food
        .iter()
        .filter_map(|&food| graph.shortest_path(terminals.nest, food))
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(nodes, length)| Route {
            nodes,
            length,
            reaches_food: true,
        })
}

/// Fraction of the graph's pheromone on the edges of `route`.
pub fn concentration(graph: &PetTopologyGraph, route: &Route) -> f64 {
    let total = graph.total_pheromone();
    if total <= 0.0 {
        return 0.0;
    }
    let on_route: f64 = route
        .nodes
        .windows(2)
        .filter_map(|pair| graph.find_edge(pair[0], pair[1]))
        .filter_map(|e| graph.edge(e).map(|d| d.pheromone))
        .sum();
    on_route / total
}

/// Build the full report for a colony.
pub fn trail_report(colony: &Colony) -> TrailReport {
    let graph = colony.graph();
    let terminals = colony.terminals();
    let strongest = strongest_trail(graph, terminals);
    let shortest = shortest_route(graph, terminals);

    let converged = shortest
        .as_ref()
        .is_some_and(|s| strongest.reaches_food && s.nodes == strongest.nodes);
    let stretch = shortest
        .as_ref()
        .filter(|s| strongest.reaches_food && s.length > 0.0)
        .map(|s| strongest.length / s.length);

    TrailReport {
        concentration: concentration(graph, &strongest),
        strongest,
        shortest,
        converged,
        stretch,
        stats: colony.stats(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::GraphBuilder;

    /// Nest 0, food 3. Short route 0-1-3, long route 0-2-3, dead end 0-4.
    fn routes() -> (PetTopologyGraph, Terminals) {
        let mut b = GraphBuilder::new();
        let n0 = b.add_node(Position::new(0.0, 0.0));
        let n1 = b.add_node(Position::new(1.0, 0.0));
        let n2 = b.add_node(Position::new(1.0, 2.0));
        let n3 = b.add_node(Position::new(2.0, 0.0));
        let n4 = b.add_node(Position::new(-1.0, 0.0));
        b.add_edge(n0, n1).unwrap();
        b.add_edge(n1, n3).unwrap();
        b.add_edge(n0, n2).unwrap();
        b.add_edge(n2, n3).unwrap();
        b.add_edge(n0, n4).unwrap();
        let scene = b.build(n0, vec![n3]).unwrap();
        (scene.graph, scene.terminals)
    }

    fn mark(graph: &mut PetTopologyGraph, a: usize, b: usize, pheromone: f64) {
        let e = graph.find_edge(NodeId(a), NodeId(b)).unwrap();
        graph.edge_mut(e).unwrap().pheromone = pheromone;
    }

    #[test]
    fn strongest_follows_marked_edges() {
        let (mut g, t) = routes();
        mark(&mut g, 0, 2, 5.0);
        mark(&mut g, 2, 3, 5.0);
        let trail = strongest_trail(&g, &t);
        assert_eq!(trail.nodes, vec![NodeId(0), NodeId(2), NodeId(3)]);
        assert!(trail.reaches_food);
        assert_eq!(trail.hops(), 2);
    }

    #[test]
    fn strongest_stops_at_dead_end() {
        let (mut g, t) = routes();
        mark(&mut g, 0, 4, 9.0);
        let trail = strongest_trail(&g, &t);
        assert_eq!(trail.nodes, vec![NodeId(0), NodeId(4)]);
        assert!(!trail.reaches_food);
    }

    #[test]
    fn shortest_ignores_pheromone() {
        let (mut g, t) = routes();
        mark(&mut g, 0, 2, 5.0);
        let route = shortest_route(&g, &t).unwrap();
        assert_eq!(route.nodes, vec![NodeId(0), NodeId(1), NodeId(3)]);
        assert!((route.length - 2.0).abs() < 1e-12);
    }

    #[test]
    fn concentration_is_a_fraction() {
        let (mut g, t) = routes();
        mark(&mut g, 0, 1, 4.0);
        mark(&mut g, 1, 3, 4.0);
        let trail = strongest_trail(&g, &t);
        let c = concentration(&g, &trail);
        // 8.0 on the route, 0.1 on each of the other three edges.
        assert!((c - 8.0 / 8.3).abs() < 1e-12);
    }
}
