//! Edge selection: where does an ant go next?
//!
//! The probability of taking an edge is proportional to its pheromone plus a
//! small floor `epsilon`, normalized over the edges leaving the current node
//! only. Ants also prefer not to turn straight back the way they came,
//! unless that is their only option or they stand on the nest or a food
//! source.

use formica_core::error::{ensure_range, AgentError, GraphError, Result};
use formica_core::types::{Candidate, NodeId};
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Where the ant is standing when it picks its next edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Junction {
    /// The node the ant is leaving.
    pub current: NodeId,
    /// The node the ant just came from.
    pub previous: NodeId,
    pub at_food: bool,
    pub at_nest: bool,
}

impl Junction {
    pub fn is_terminal(&self) -> bool {
        self.at_food || self.at_nest
    }
}

/// Pheromone-proportional edge selector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EdgeSelector {
    /// Additive floor so unexplored edges keep a nonzero probability.
    epsilon: f64,
    /// Drop the previous node from the candidates away from terminals.
    anti_backtrack: bool,
}

impl EdgeSelector {
    pub fn new(epsilon: f64, anti_backtrack: bool) -> Result<Self> {
        ensure_range("epsilon", epsilon, f64::MIN_POSITIVE, f64::MAX)?;
        Ok(Self {
            epsilon,
            anti_backtrack,
        })
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    pub fn anti_backtrack(&self) -> bool {
        self.anti_backtrack
    }

    /// The candidates that remain after the anti-backtrack rule.
    pub fn eligible(&self, candidates: &[Candidate], junction: &Junction) -> Vec<Candidate> {
        let suppress = self.anti_backtrack && candidates.len() > 1 && !junction.is_terminal();
        candidates
            .iter()
            .filter(|c| !(suppress && c.neighbor == junction.previous))
            .copied()
            .collect()
    }

    /// Selection probability of every eligible candidate. Sums to 1.
    pub fn probabilities(
        &self,
        candidates: &[Candidate],
        junction: &Junction,
    ) -> Result<Vec<(Candidate, f64)>> {
        let (eligible, weights, total) = self.weighted(candidates, junction)?;
        Ok(eligible
            .into_iter()
            .zip(weights)
            .map(|(c, w)| (c, w / total))
            .collect())
    }

    /// Draw the next edge from `rng`.
    pub fn choose<R: Rng + ?Sized>(
        &self,
        candidates: &[Candidate],
        junction: &Junction,
        rng: &mut R,
    ) -> Result<Candidate> {
        let (eligible, weights, _) = self.weighted(candidates, junction)?;
        if eligible.len() == 1 {
            return Ok(eligible[0]);
        }
        let dist = WeightedIndex::new(&weights).map_err(|e| AgentError::DegenerateDistribution {
            node: junction.current,
            reason: e.to_string(),
        })?;
        Ok(eligible[dist.sample(rng)])
    }

    /// Eligible candidates, their weights, and the weight total.
    fn weighted(
        &self,
        candidates: &[Candidate],
        junction: &Junction,
    ) -> Result<(Vec<Candidate>, Vec<f64>, f64)> {
        let eligible = self.non_empty(candidates, junction)?;
        let weights: Vec<f64> = eligible.iter().map(|c| c.pheromone + self.epsilon).collect();
        let total: f64 = weights.iter().sum();
        if !total.is_finite() || total <= 0.0 || weights.iter().any(|w| w.is_nan()) {
            return Err(AgentError::DegenerateDistribution {
                node: junction.current,
                reason: format!("weight total {total}"),
            }
            .into());
        }
        Ok((eligible, weights, total))
    }

    fn non_empty(&self, candidates: &[Candidate], junction: &Junction) -> Result<Vec<Candidate>> {
        let eligible = self.eligible(candidates, junction);
        if eligible.is_empty() {
            return Err(GraphError::NoCandidates(junction.current).into());
        }
        Ok(eligible)
    }
}

impl Default for EdgeSelector {
    fn default() -> Self {
        Self {
            epsilon: 0.1,
            anti_backtrack: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use formica_core::error::FormicaError;
    use formica_core::types::EdgeId;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn cand(neighbor: usize, pheromone: f64) -> Candidate {
        Candidate {
            neighbor: NodeId(neighbor),
            edge: EdgeId(neighbor),
            pheromone,
        }
    }

    fn junction(previous: usize) -> Junction {
        Junction {
            current: NodeId(0),
            previous: NodeId(previous),
            at_food: false,
            at_nest: false,
        }
    }

    #[test]
    fn never_returns_previous_with_alternatives() {
        let selector = EdgeSelector::default();
        let candidates = [cand(1, 50.0), cand(2, 0.0), cand(3, 0.0)];
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..500 {
            let picked = selector.choose(&candidates, &junction(1), &mut rng).unwrap();
            assert_ne!(picked.neighbor, NodeId(1));
        }
    }

    #[test]
    fn returns_previous_when_it_is_the_only_option() {
        let selector = EdgeSelector::default();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let picked = selector.choose(&[cand(1, 0.1)], &junction(1), &mut rng).unwrap();
        assert_eq!(picked.neighbor, NodeId(1));
    }

    #[test]
    fn terminals_allow_reversal() {
        let selector = EdgeSelector::default();
        let candidates = [cand(1, 0.1), cand(2, 0.1)];
        let mut at_food = junction(1);
        at_food.at_food = true;
        assert_eq!(selector.eligible(&candidates, &at_food).len(), 2);
        let mut at_nest = junction(1);
        at_nest.at_nest = true;
        assert_eq!(selector.eligible(&candidates, &at_nest).len(), 2);
    }

    #[test]
    fn anti_backtrack_can_be_disabled() {
        let selector = EdgeSelector::new(0.1, false).unwrap();
        let candidates = [cand(1, 0.1), cand(2, 0.1)];
        assert_eq!(selector.eligible(&candidates, &junction(1)).len(), 2);
    }

    #[test]
    fn probabilities_are_local_and_normalized() {
        let selector = EdgeSelector::new(0.1, true).unwrap();
        let candidates = [cand(1, 0.9), cand(2, 0.0), cand(3, 0.4)];
        let probs = selector.probabilities(&candidates, &junction(9)).unwrap();
        let total: f64 = probs.iter().map(|(_, p)| p).sum();
        assert!((total - 1.0).abs() < 1e-12);
        // (0.9 + 0.1) / (1.0 + 0.1 + 0.5)
        assert!((probs[0].1 - 1.0 / 1.6).abs() < 1e-12);
        // Zero pheromone still has a chance.
        assert!(probs[1].1 > 0.0);
    }

    #[test]
    fn empty_candidates_is_malformed_graph() {
        let selector = EdgeSelector::default();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let err = selector.choose(&[], &junction(1), &mut rng).unwrap_err();
        assert!(matches!(
            err,
            FormicaError::Graph(GraphError::NoCandidates(NodeId(0)))
        ));
    }

    #[test]
    fn non_finite_pheromone_is_degenerate() {
        let selector = EdgeSelector::default();
        let candidates = [cand(1, f64::INFINITY), cand(2, 0.1)];
        let err = selector.probabilities(&candidates, &junction(9)).unwrap_err();
        assert!(matches!(
            err,
            FormicaError::Agent(AgentError::DegenerateDistribution { .. })
        ));
    }

    #[test]
    fn same_seed_same_choices() {
        let selector = EdgeSelector::default();
        let candidates = [cand(1, 0.3), cand(2, 0.2), cand(3, 0.5)];
        let draw = |seed| {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            (0..50)
                .map(|_| {
                    selector
                        .choose(&candidates, &junction(9), &mut rng)
                        .unwrap()
                        .neighbor
                })
                .collect::<Vec<_>>()
        };
        assert_eq!(draw(42), draw(42));
    }

    #[test]
    fn heavy_edge_dominates_draws() {
        let selector = EdgeSelector::default();
        let candidates = [cand(1, 100.0), cand(2, 0.0)];
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let heavy = (0..1000)
            .filter(|_| {
                let picked = selector.choose(&candidates, &junction(9), &mut rng).unwrap();
                picked.neighbor == NodeId(1)
            })
            .count();
        assert!(heavy > 980, "heavy edge picked {heavy} times");
    }
}
