//! Colony: ants on a shared graph, stepped tick by tick.
//!
//! The colony owns everything a simulation needs: the foraging graph with
//! its pheromone, the nest and food terminals, every ant, and the position
//! buffer renderers read from.
//!
//! Each tick:
//! 1. Every ant steps in index order, moving and depositing pheromone
//! 2. Every edge's pheromone decays once
//! 3. The tick counter and the simulated clock advance
//!
//! A failing ant aborts the tick with `FormicaError::AntStep`. State already
//! changed by earlier ants in that tick is not rolled back.

use crate::ant::{Ant, AntConfig, AntEvent, StepContext};
use crate::pheromone::PheromoneField;
use crate::scene::{check_scene, Scene};
use crate::topology_impl::PetTopologyGraph;
use formica_core::error::{ensure_range, FormicaError, Result};
use formica_core::topology::TopologyGraph;
use formica_core::types::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Event emitted by the colony during simulation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ColonyEvent {
    /// An ant picked up food.
    FoodFound { ant: AntIndex, node: NodeId },
    /// An ant brought food back to the nest.
    FoodDelivered { ant: AntIndex },
    /// A tick completed.
    TickComplete { tick: Tick, carrying: usize },
}

/// Statistics about the colony.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColonyStats {
    pub tick: Tick,
    /// Simulated time elapsed, the sum of every tick's `dt`.
    pub elapsed: f64,
    pub ants: usize,
    /// Ants currently carrying food home.
    pub carrying: usize,
    pub food_found: u64,
    pub food_delivered: u64,
    pub graph_nodes: usize,
    pub graph_edges: usize,
    pub total_pheromone: f64,
    pub max_pheromone: f64,
}

/// A serializable snapshot of an ant's state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AntSnapshot {
    pub index: AntIndex,
    pub position: Position,
    pub state: AntState,
    pub from: NodeId,
    pub to: NodeId,
    pub progress: f64,
}

/// A serializable snapshot of a graph node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSnapshot {
    pub id: NodeId,
    pub position: Position,
}

/// A serializable snapshot of a graph edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeSnapshot {
    pub id: EdgeId,
    pub a: NodeId,
    pub b: NodeId,
    pub weight: f64,
    pub pheromone: f64,
}

/// A complete serializable snapshot of the colony at a point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColonySnapshot {
    pub tick: Tick,
    pub terminals: Terminals,
    pub ants: Vec<AntSnapshot>,
    pub nodes: Vec<NodeSnapshot>,
    pub edges: Vec<EdgeSnapshot>,
    pub stats: ColonyStats,
}

/// Configuration for colony simulation parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColonyConfig {
    /// Number of ants, all starting at the nest (default: 300).
    pub num_ants: usize,
    /// Master seed for every ant's random stream (default: 0).
    pub seed: u64,
    /// Fraction of pheromone lost per unit time, in [0, 1] (default: 0.2).
    pub pheromone_decay: f64,
    /// Pheromone laid per unit time on a unit-length edge (default: 1.2).
    pub pheromone_deposit: f64,
    /// Behavior shared by every ant.
    pub ant: AntConfig,
}

impl Default for ColonyConfig {
    fn default() -> Self {
        Self {
            num_ants: 300,
            seed: 0,
            pheromone_decay: 0.2,
            pheromone_deposit: 1.2,
            ant: AntConfig::default(),
        }
    }
}

impl ColonyConfig {
    pub fn validate(&self) -> Result<()> {
        ensure_range("pheromone_decay", self.pheromone_decay, 0.0, 1.0)?;
        ensure_range("pheromone_deposit", self.pheromone_deposit, 0.0, f64::MAX)?;
        self.ant.validate()
    }

    pub fn field(&self) -> Result<PheromoneField> {
        PheromoneField::new(self.pheromone_decay, self.pheromone_deposit)
    }
}

/// The colony and its simulation clock.
#[derive(Debug, Clone)]
pub struct Colony {
    graph: PetTopologyGraph,
    terminals: Terminals,
    field: PheromoneField,
    ants: Vec<Ant>,
    /// One slot per ant, indexed by `AntIndex`.
    positions: Vec<Position>,
    config: ColonyConfig,

    tick: Tick,
    elapsed: f64,
    food_found: u64,
    food_delivered: u64,
}

impl Colony {
    /// Populate a scene with ants, all parked on the nest.
    pub fn new(scene: Scene, config: ColonyConfig) -> Result<Self> {
        config.validate()?;
        let Scene { graph, terminals } = scene;
        check_scene(&graph, &terminals)?;

        let field = config.field()?;
        let nest_pos = graph
            .position(terminals.nest)
            .ok_or_else(|| FormicaError::node_not_found(terminals.nest))?;
        let ants = (0..config.num_ants)
            .map(|i| Ant::new(i, terminals.nest, config.ant.clone(), config.seed))
            .collect::<Result<Vec<_>>>()?;
        let positions = vec![nest_pos; ants.len()];

        info!(
            ants = ants.len(),
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            nest = %terminals.nest,
            food = terminals.food.len(),
            "colony ready"
        );

        Ok(Self {
            graph,
            terminals,
            field,
            ants,
            positions,
            config,
            tick: 0,
            elapsed: 0.0,
            food_found: 0,
            food_delivered: 0,
        })
    }

    /// Advance the simulation by `dt` of simulated time.
    pub fn tick(&mut self, dt: f64) -> Result<Vec<ColonyEvent>> {
        if !dt.is_finite() || dt < 0.0 {
            return Err(FormicaError::invalid_config(
                "dt",
                dt.to_string(),
                "must be finite and non-negative",
            ));
        }

        let mut events = Vec::new();
        let mut ctx = StepContext {
            graph: &mut self.graph,
            terminals: &self.terminals,
            field: &self.field,
        };

        // Phase 1: every ant moves and deposits
        for (ant, slot) in self.ants.iter_mut().zip(self.positions.iter_mut()) {
            let index = ant.index();
            let ant_events = ant
                .step(dt, &mut ctx, slot)
                .map_err(|e| e.in_ant(index))?;
            for event in ant_events {
                match event {
                    AntEvent::FoodFound { node } => {
                        self.food_found += 1;
                        events.push(ColonyEvent::FoodFound { ant: index, node });
                    }
                    AntEvent::FoodDelivered => {
                        self.food_delivered += 1;
                        events.push(ColonyEvent::FoodDelivered { ant: index });
                    }
                }
            }
        }

        // Phase 2: decay once, after all deposits
        self.field.decay(&mut self.graph, dt);

        self.tick += 1;
        self.elapsed += dt;
        let carrying = self.carrying_count();
        events.push(ColonyEvent::TickComplete {
            tick: self.tick,
            carrying,
        });
        debug!(tick = self.tick, carrying, "tick complete");

        Ok(events)
    }

    /// Run the simulation for N ticks of `dt` each.
    pub fn run(&mut self, ticks: u64, dt: f64) -> Result<Vec<Vec<ColonyEvent>>> {
        (0..ticks).map(|_| self.tick(dt)).collect()
    }

    /// Get colony statistics.
    pub fn stats(&self) -> ColonyStats {
        let max_pheromone = self
            .graph
            .all_edges()
            .into_iter()
            .filter_map(|e| self.graph.edge(e).map(|d| d.pheromone))
            .fold(0.0, f64::max);
        ColonyStats {
            tick: self.tick,
            elapsed: self.elapsed,
            ants: self.ants.len(),
            carrying: self.carrying_count(),
            food_found: self.food_found,
            food_delivered: self.food_delivered,
            graph_nodes: self.graph.node_count(),
            graph_edges: self.graph.edge_count(),
            total_pheromone: self.graph.total_pheromone(),
            max_pheromone,
        }
    }

    /// Take a serializable snapshot of the colony's current state.
    pub fn snapshot(&self) -> ColonySnapshot {
        let ants = self
            .ants
            .iter()
            .zip(&self.positions)
            .map(|(ant, &position)| AntSnapshot {
                index: ant.index(),
                position,
                state: ant.state(),
                from: ant.from_node(),
                to: ant.to_node(),
                progress: ant.progress(),
            })
            .collect();

        let nodes = self
            .graph
            .all_nodes()
            .into_iter()
            .filter_map(|id| {
                let n = self.graph.get_node(id)?;
                Some(NodeSnapshot {
                    id: n.id,
                    position: n.position,
                })
            })
            .collect();

        let edges = self
            .graph
            .all_edges()
            .into_iter()
            .filter_map(|id| {
                let (a, b) = self.graph.endpoints(id)?;
                let data = self.graph.edge(id)?;
                Some(EdgeSnapshot {
                    id,
                    a,
                    b,
                    weight: data.weight,
                    pheromone: data.pheromone,
                })
            })
            .collect();

        ColonySnapshot {
            tick: self.tick,
            terminals: self.terminals.clone(),
            ants,
            nodes,
            edges,
            stats: self.stats(),
        }
    }

    /// Current position of every ant, indexed by `AntIndex`.
    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    /// Current state of every ant, indexed by `AntIndex`.
    pub fn ant_states(&self) -> Vec<AntState> {
        self.ants.iter().map(Ant::state).collect()
    }

    pub fn ants(&self) -> &[Ant] {
        &self.ants
    }

    pub fn graph(&self) -> &PetTopologyGraph {
        &self.graph
    }

    pub fn terminals(&self) -> &Terminals {
        &self.terminals
    }

    pub fn field(&self) -> &PheromoneField {
        &self.field
    }

    pub fn config(&self) -> &ColonyConfig {
        &self.config
    }

    pub fn tick_count(&self) -> Tick {
        self.tick
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Pheromone on the edge between `a` and `b`, if they are adjacent.
    pub fn pheromone(&self, a: NodeId, b: NodeId) -> Option<f64> {
        let edge = self.graph.find_edge(a, b)?;
        self.graph.edge(edge).map(|e| e.pheromone)
    }

    /// Number of ants currently carrying food.
    pub fn carrying_count(&self) -> usize {
        self.ants.iter().filter(|a| a.carrying_food()).count()
    }
}
