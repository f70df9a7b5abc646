//! Pheromone field: the decay and deposit protocol on the shared graph.
//!
//! Pheromone lives on the edges of the graph; this module owns the rules for
//! changing it. Deposits are purely additive and decay purely
//! multiplicative, so the order in which ants deposit within a tick does not
//! change the final values. Decay runs once per tick, after every ant moved.

use formica_core::error::{ensure_range, Result};
use formica_core::topology::TopologyGraph;
use formica_core::types::EdgeId;
use serde::{Deserialize, Serialize};

/// Smallest value any edge's pheromone may decay to.
///
/// Keeps pheromone strictly positive even with `decay_rate = 1` or after
/// long decay chains that would underflow to zero.
pub const PHEROMONE_FLOOR: f64 = f64::MIN_POSITIVE;

/// Rates governing the pheromone field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PheromoneField {
    /// Fraction of pheromone lost per unit of simulated time, in `[0, 1]`.
    decay_rate: f64,
    /// Pheromone laid per unit of time on an edge of unit length.
    deposit_rate: f64,
}

impl PheromoneField {
    pub fn new(decay_rate: f64, deposit_rate: f64) -> Result<Self> {
        ensure_range("pheromone_decay", decay_rate, 0.0, 1.0)?;
        ensure_range("pheromone_deposit", deposit_rate, 0.0, f64::MAX)?;
        Ok(Self {
            decay_rate,
            deposit_rate,
        })
    }

    pub fn decay_rate(&self) -> f64 {
        self.decay_rate
    }

    pub fn deposit_rate(&self) -> f64 {
        self.deposit_rate
    }

    /// Multiplier applied by one decay over `dt`: `(1 - rate)^dt`.
    pub fn decay_factor(&self, dt: f64) -> f64 {
        (1.0 - self.decay_rate).powf(dt)
    }

    /// Decay every edge in the graph, occupied or not.
    pub fn decay(&self, graph: &mut dyn TopologyGraph, dt: f64) {
        graph.scale_pheromone(self.decay_factor(dt), PHEROMONE_FLOOR);
    }

    /// Amount laid while crossing `dt` of time on an edge of length `weight`.
    ///
    /// Dividing by the length keeps long and short edges comparable: an edge
    /// twice as long takes twice as many ticks to cross, and each tick lays
    /// half as much.
    pub fn deposit_amount(&self, weight: f64, dt: f64) -> f64 {
        self.deposit_rate * dt / weight
    }

    /// Add `amount` to one edge. Negative amounts are ignored.
    ///
    /// Returns the amount actually added (zero if the edge does not exist).
    pub fn deposit(&self, graph: &mut dyn TopologyGraph, edge: EdgeId, amount: f64) -> f64 {
        let amount = amount.max(0.0);
        match graph.edge_mut(edge) {
            Some(data) => {
                data.pheromone += amount;
                amount
            }
            None => 0.0,
        }
    }

    /// Deposit for `dt` of traversal on `edge`, scaled by its length.
    pub fn deposit_for(&self, graph: &mut dyn TopologyGraph, edge: EdgeId, dt: f64) -> f64 {
        let Some(weight) = graph.edge(edge).map(|e| e.weight) else {
            return 0.0;
        };
        let amount = self.deposit_amount(weight, dt);
        self.deposit(graph, edge, amount)
    }
}

impl Default for PheromoneField {
    fn default() -> Self {
        Self {
            decay_rate: 0.2,
            deposit_rate: 1.2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology_impl::PetTopologyGraph;
    use formica_core::types::{EdgeData, Position};

    fn two_edges() -> (PetTopologyGraph, EdgeId, EdgeId) {
        let mut g = PetTopologyGraph::new();
        let a = g.add_node(Position::new(0.0, 0.0));
        let b = g.add_node(Position::new(1.0, 0.0));
        let c = g.add_node(Position::new(3.0, 0.0));
        let short = g.add_edge(a, b, EdgeData::new(1.0, 0.1)).unwrap();
        let long = g.add_edge(b, c, EdgeData::new(2.0, 0.1)).unwrap();
        (g, short, long)
    }

    #[test]
    fn rejects_out_of_range_rates() {
        assert!(PheromoneField::new(1.5, 1.0).is_err());
        assert!(PheromoneField::new(-0.1, 1.0).is_err());
        assert!(PheromoneField::new(0.2, -1.0).is_err());
        assert!(PheromoneField::new(1.0, 0.0).is_ok());
    }

    #[test]
    fn decay_scales_total_exactly() {
        let (mut g, short, _) = two_edges();
        let field = PheromoneField::new(0.2, 1.2).unwrap();
        field.deposit(&mut g, short, 3.0);
        let before = g.total_pheromone();
        field.decay(&mut g, 0.5);
        let expected = before * 0.8f64.powf(0.5);
        assert!((g.total_pheromone() - expected).abs() < 1e-12);
    }

    #[test]
    fn deposit_is_inverse_to_length() {
        let (mut g, short, long) = two_edges();
        let field = PheromoneField::new(0.0, 1.0).unwrap();
        let on_short = field.deposit_for(&mut g, short, 0.25);
        let on_long = field.deposit_for(&mut g, long, 0.25);
        assert!((on_short / on_long - 2.0).abs() < 1e-12);
    }

    #[test]
    fn full_decay_stays_positive() {
        let (mut g, short, long) = two_edges();
        let field = PheromoneField::new(1.0, 1.0).unwrap();
        for _ in 0..10 {
            field.decay(&mut g, 1.0);
        }
        assert!(g.edge(short).unwrap().pheromone > 0.0);
        assert!(g.edge(long).unwrap().pheromone > 0.0);
    }

    #[test]
    fn zero_dt_is_identity() {
        let (mut g, short, _) = two_edges();
        let field = PheromoneField::new(1.0, 1.0).unwrap();
        field.decay(&mut g, 0.0);
        assert_eq!(g.edge(short).unwrap().pheromone, 0.1);
    }

    #[test]
    fn negative_deposit_is_ignored() {
        let (mut g, short, _) = two_edges();
        let field = PheromoneField::default();
        assert_eq!(field.deposit(&mut g, short, -5.0), 0.0);
        assert_eq!(g.edge(short).unwrap().pheromone, 0.1);
    }
}
