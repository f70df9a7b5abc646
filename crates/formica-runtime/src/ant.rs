//! Ant: a single forager walking the graph.
//!
//! An ant leaves the nest, picks edges by pheromone until it steps onto a
//! food node, then carries the food home. With back-tracing enabled it walks
//! home along the exact nodes it left on the way out, with any loops cut
//! out; otherwise it keeps choosing edges by pheromone until it stumbles
//! onto the nest. While carrying food it lays pheromone on the edge it is
//! crossing.
//!
//! Biological analog: a forager that remembers its outbound route and lays
//! a recruitment trail only on the way back.

use crate::pheromone::PheromoneField;
use crate::selector::{EdgeSelector, Junction};
use formica_core::error::{ensure_range, AgentError, FormicaError, GraphError, Result};
use formica_core::topology::TopologyGraph;
use formica_core::types::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// When pheromone is laid on an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DepositTiming {
    /// A little on every tick spent on the edge.
    Continuous,
    /// Everything at once when the far end is reached.
    OnArrival,
}

/// Which legs of the trip lay pheromone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DepositLeg {
    /// Only while carrying food home.
    ReturnOnly,
    /// Outbound and returning alike.
    Both,
}

/// What the trail holds after food is delivered at the nest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrailReset {
    /// Nothing; the nest is recorded again when the ant leaves it.
    Empty,
    /// Just the nest.
    Nest,
}

/// Behavior switches shared by every ant in a colony.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AntConfig {
    /// Distance covered per unit of simulated time.
    pub speed: f64,
    /// Additive pheromone floor used when choosing edges.
    pub epsilon: f64,
    /// Avoid turning straight back away from terminals.
    pub anti_backtrack: bool,
    /// Retrace the outbound route when carrying food.
    pub back_trace: bool,
    pub deposit_timing: DepositTiming,
    pub deposit_leg: DepositLeg,
    pub trail_reset: TrailReset,
}

impl Default for AntConfig {
    fn default() -> Self {
        Self {
            speed: 1.0,
            epsilon: 0.1,
            anti_backtrack: true,
            back_trace: true,
            deposit_timing: DepositTiming::Continuous,
            deposit_leg: DepositLeg::ReturnOnly,
            trail_reset: TrailReset::Nest,
        }
    }
}

impl AntConfig {
    pub fn validate(&self) -> Result<()> {
        ensure_range("ant_speed", self.speed, f64::MIN_POSITIVE, f64::MAX)?;
        ensure_range("epsilon", self.epsilon, f64::MIN_POSITIVE, f64::MAX)?;
        Ok(())
    }

    /// The edge selector these settings describe.
    pub fn selector(&self) -> Result<EdgeSelector> {
        EdgeSelector::new(self.epsilon, self.anti_backtrack)
    }
}

/// Something noteworthy that happened to an ant during its step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AntEvent {
    /// The ant reached a food node and picked up food.
    FoodFound { node: NodeId },
    /// The ant brought food back to the nest.
    FoodDelivered,
}

/// Shared state an ant reads and writes during its step.
pub struct StepContext<'a> {
    pub graph: &'a mut dyn TopologyGraph,
    pub terminals: &'a Terminals,
    pub field: &'a PheromoneField,
}

/// A single forager.
#[derive(Debug, Clone)]
pub struct Ant {
    index: AntIndex,
    config: AntConfig,
    selector: EdgeSelector,

    // Where on the graph
    from: NodeId,
    to: NodeId,
    /// `None` only before the first step, while parked on the nest.
    edge: Option<EdgeId>,
    /// Fraction of the current edge covered. Above 1.0 means arrived.
    progress: f64,

    // Foraging state
    carrying_food: bool,
    returning: bool,
    /// Nodes departed from on the way out, oldest first.
    trail: Vec<NodeId>,
    /// Time spent laying on the current edge, for on-arrival deposits.
    pending_deposit_time: f64,
    deliveries: u64,

    rng: ChaCha8Rng,
}

impl Ant {
    /// Create an ant parked on the nest.
    ///
    /// Each ant draws from its own ChaCha stream: the colony's master seed
    /// selects the key, the ant's index selects the stream.
    pub fn new(index: AntIndex, nest: NodeId, config: AntConfig, master_seed: u64) -> Result<Self> {
        config.validate()?;
        let selector = config.selector()?;
        let mut rng = ChaCha8Rng::seed_from_u64(master_seed);
        rng.set_stream(index as u64);
        Ok(Self {
            index,
            config,
            selector,
            from: nest,
            to: nest,
            edge: None,
            progress: 0.0,
            carrying_food: false,
            returning: false,
            trail: Vec::new(),
            pending_deposit_time: 0.0,
            deliveries: 0,
            rng,
        })
    }

    pub fn index(&self) -> AntIndex {
        self.index
    }

    pub fn config(&self) -> &AntConfig {
        &self.config
    }

    pub fn from_node(&self) -> NodeId {
        self.from
    }

    pub fn to_node(&self) -> NodeId {
        self.to
    }

    pub fn current_edge(&self) -> Option<EdgeId> {
        self.edge
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn carrying_food(&self) -> bool {
        self.carrying_food
    }

    pub fn is_returning(&self) -> bool {
        self.returning
    }

    pub fn trail(&self) -> &[NodeId] {
        &self.trail
    }

    /// Food items brought home so far.
    pub fn deliveries(&self) -> u64 {
        self.deliveries
    }

    pub fn state(&self) -> AntState {
        if self.carrying_food {
            AntState::Returning
        } else {
            AntState::Outbound
        }
    }

    /// Whether the ant lays pheromone on the edge it is crossing.
    pub fn lays_pheromone(&self) -> bool {
        match self.config.deposit_leg {
            DepositLeg::ReturnOnly => self.carrying_food,
            DepositLeg::Both => true,
        }
    }

    /// Advance the ant by `dt` of simulated time.
    ///
    /// Writes the ant's new position into `slot` and returns what happened.
    pub fn step(
        &mut self,
        dt: f64,
        ctx: &mut StepContext<'_>,
        slot: &mut Position,
    ) -> Result<Vec<AntEvent>> {
        let mut events = Vec::new();

        let Some(edge) = self.edge else {
            // Parked on the nest: choose the first edge right away.
            *slot = node_position(ctx.graph, self.to)?;
            self.arrive(ctx, &mut events)?;
            return Ok(events);
        };

        let weight = ctx
            .graph
            .edge(edge)
            .map(|e| e.weight)
            .ok_or(GraphError::EdgeNotFound(self.from, self.to))?;
        self.progress += self.config.speed * dt / weight;

        let from_pos = node_position(ctx.graph, self.from)?;
        let to_pos = node_position(ctx.graph, self.to)?;
        *slot = from_pos.lerp(&to_pos, self.progress);

        if self.lays_pheromone() {
            match self.config.deposit_timing {
                DepositTiming::Continuous => {
                    ctx.field.deposit_for(ctx.graph, edge, dt);
                }
                DepositTiming::OnArrival => self.pending_deposit_time += dt,
            }
        }

        if self.progress > 1.0 {
            self.arrive(ctx, &mut events)?;
        }
        Ok(events)
    }

    /// The ant has reached `to`: settle deposits, handle food and nest,
    /// and set off along the next edge.
    fn arrive(&mut self, ctx: &mut StepContext<'_>, events: &mut Vec<AntEvent>) -> Result<()> {
        if let Some(edge) = self.edge {
            if self.pending_deposit_time > 0.0 {
                ctx.field.deposit_for(ctx.graph, edge, self.pending_deposit_time);
            }
        }
        self.pending_deposit_time = 0.0;

        let here = self.to;
        if ctx.terminals.is_food(here) && !self.carrying_food {
            self.carrying_food = true;
            self.returning = true;
            debug!(ant = self.index, node = %here, "found food");
            events.push(AntEvent::FoodFound { node: here });
        } else if ctx.terminals.is_nest(here) && self.carrying_food {
            self.carrying_food = false;
            self.returning = false;
            self.deliveries += 1;
            self.trail.clear();
            if self.config.trail_reset == TrailReset::Nest {
                self.trail.push(ctx.terminals.nest);
            }
            debug!(ant = self.index, deliveries = self.deliveries, "delivered food");
            events.push(AntEvent::FoodDelivered);
        }

        self.pick_next(ctx)
    }

    fn pick_next(&mut self, ctx: &mut StepContext<'_>) -> Result<()> {
        let previous = self.from;
        self.from = self.to;
        let current = self.from;

        let next = if self.returning && self.config.back_trace {
            self.retrace(current)?
        } else {
            if self.config.back_trace && !self.carrying_food {
                self.trail.push(current);
            }
            let junction = Junction {
                current,
                previous,
                at_food: ctx.terminals.is_food(current),
                at_nest: ctx.terminals.is_nest(current),
            };
            let candidates = ctx.graph.candidates(current);
            self.selector
                .choose(&candidates, &junction, &mut self.rng)?
                .neighbor
        };

        let edge = ctx
            .graph
            .find_edge(current, next)
            .ok_or(GraphError::EdgeNotFound(current, next))?;
        self.to = next;
        self.edge = Some(edge);
        self.progress = 0.0;
        Ok(())
    }

    /// Next node on the way home: the most recent trail entry, with the
    /// trail cut back to that node's first visit so loops are skipped.
    fn retrace(&mut self, current: NodeId) -> Result<NodeId> {
        let next = *self.trail.last().ok_or(AgentError::EmptyTrail {
            ant: self.index,
            at: current,
        })?;
        let first = self
            .trail
            .iter()
            .position(|&n| n == next)
            .unwrap_or(self.trail.len() - 1);
        self.trail.truncate(first);
        Ok(next)
    }
}

fn node_position(graph: &dyn TopologyGraph, id: NodeId) -> Result<Position> {
    graph.position(id).ok_or_else(|| FormicaError::node_not_found(id))
}
