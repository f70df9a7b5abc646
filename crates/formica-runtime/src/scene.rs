//! Scene construction: the graph the colony forages on.
//!
//! Two ways to get a [`Scene`]:
//! - [`GraphBuilder`] for explicit graphs: place nodes, connect them, name
//!   the nest and the food.
//! - [`SceneBuilder`] for generated ones: a random geometric graph or a
//!   jittered lattice in the unit square, regenerated until the nest and
//!   the food are connected.
//!
//! Edge weights are always the Euclidean distance between the endpoints.
//!
//! # Example
//!
//! ```rust
//! use formica_runtime::scene::{Layout, SceneBuilder};
//!
//! let scene = SceneBuilder::new()
//!     .num_nodes(60)
//!     .layout(Layout::default())
//!     .seed(7)
//!     .build()
//!     .unwrap();
//! assert_eq!(scene.terminals.food.len(), 1);
//! ```

use crate::topology_impl::PetTopologyGraph;
use formica_core::error::{ensure_range, FormicaError, GraphError, Result};
use formica_core::topology::TopologyGraph;
use formica_core::types::*;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Pheromone on every edge of a freshly built graph.
pub const DEFAULT_INITIAL_PHEROMONE: f64 = 0.1;

/// A foraging graph together with its nest and food.
#[derive(Debug, Clone)]
pub struct Scene {
    pub graph: PetTopologyGraph,
    pub terminals: Terminals,
}

impl Scene {
    /// Length of the shortest nest-to-food route, by edge weight.
    pub fn shortest_route_length(&self) -> Option<f64> {
        self.terminals
            .food
            .iter()
            .filter_map(|&food| self.graph.shortest_path(self.terminals.nest, food))
            .map(|(_, len)| len)
            .min_by(f64::total_cmp)
    }
}

// ---------------------------------------------------------------------------
// Explicit graphs
// ---------------------------------------------------------------------------

/// Builder for hand-made graphs.
#[derive(Debug, Clone)]
pub struct GraphBuilder {
    graph: PetTopologyGraph,
    initial_pheromone: f64,
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self {
            graph: PetTopologyGraph::new(),
            initial_pheromone: DEFAULT_INITIAL_PHEROMONE,
        }
    }

    /// Pheromone given to edges added from now on.
    pub fn initial_pheromone(mut self, pheromone: f64) -> Self {
        self.initial_pheromone = pheromone;
        self
    }

    pub fn add_node(&mut self, position: Position) -> NodeId {
        self.graph.add_node(position)
    }

    /// Connect two nodes. The weight is their distance.
    pub fn add_edge(&mut self, a: NodeId, b: NodeId) -> Result<EdgeId> {
        ensure_range("initial_pheromone", self.initial_pheromone, f64::MIN_POSITIVE, f64::MAX)?;
        if a == b {
            return Err(GraphError::SelfLoop(a).into());
        }
        let pa = self.graph.position(a).ok_or_else(|| FormicaError::node_not_found(a))?;
        let pb = self.graph.position(b).ok_or_else(|| FormicaError::node_not_found(b))?;
        if self.graph.find_edge(a, b).is_some() {
            return Err(GraphError::DuplicateEdge(a, b).into());
        }
        let weight = pa.distance_to(&pb);
        if !(weight.is_finite() && weight > 0.0) {
            return Err(GraphError::InvalidWeight(weight).into());
        }
        self.graph
            .add_edge(a, b, EdgeData::new(weight, self.initial_pheromone))
    }

    /// Finish the graph. Every food node must be reachable from the nest.
    pub fn build(self, nest: NodeId, food: Vec<NodeId>) -> Result<Scene> {
        let terminals = Terminals::new(nest, food);
        check_scene(&self.graph, &terminals)?;
        for &f in &terminals.food {
            if self.graph.shortest_path(nest, f).is_none() {
                return Err(GraphError::NoPath { nest, attempts: 1 }.into());
            }
        }
        Ok(Scene {
            graph: self.graph,
            terminals,
        })
    }
}

/// Structural checks shared by every way of obtaining a colony's graph:
/// the terminals exist, the nest is not a food source, and every edge has
/// a finite positive weight.
pub(crate) fn check_scene(graph: &PetTopologyGraph, terminals: &Terminals) -> Result<()> {
    if graph.node_count() == 0 {
        return Err(GraphError::EmptyGraph.into());
    }
    if terminals.food.is_empty() {
        return Err(GraphError::NoFood.into());
    }
    for &node in std::iter::once(&terminals.nest).chain(&terminals.food) {
        if graph.get_node(node).is_none() {
            return Err(FormicaError::node_not_found(node));
        }
    }
    if terminals.is_food(terminals.nest) {
        return Err(FormicaError::invalid_config(
            "food",
            terminals.nest.to_string(),
            "the nest cannot be a food source",
        ));
    }
    for edge in graph.all_edges() {
        let weight = graph.edge(edge).map(|e| e.weight).unwrap_or(f64::NAN);
        if !(weight.is_finite() && weight > 0.0) {
            return Err(GraphError::InvalidWeight(weight).into());
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Generated graphs
// ---------------------------------------------------------------------------

/// How generated nodes are placed and connected.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Layout {
    /// Uniform random points, connected when closer than
    /// `connectivity / sqrt(num_nodes)`.
    ///
    /// The nest is the node closest to the centre. A single food source is
    /// the node farthest from the centre among the first
    /// `difficulty * num_nodes` nodes.
    RandomGeometric { connectivity: f64, difficulty: f64 },
    /// A `⌊√n⌋ × ⌊√n⌋` grid with each point nudged by up to `jitter / 2`.
    /// Every pair of nodes is connected with probability `edge_probability`.
    ///
    /// The nest is the first node and the food the last; the shortest route
    /// between them must visit more than `min_path_length` nodes.
    Lattice {
        edge_probability: f64,
        jitter: f64,
        min_path_length: usize,
    },
}

impl Default for Layout {
    fn default() -> Self {
        Layout::RandomGeometric {
            connectivity: 1.75,
            difficulty: 0.1,
        }
    }
}

impl Layout {
    /// Lattice with the usual defaults.
    pub fn lattice() -> Self {
        Layout::Lattice {
            edge_probability: 0.1,
            jitter: 0.05,
            min_path_length: 4,
        }
    }
}

/// Parameters for generating a scene.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneConfig {
    pub num_nodes: usize,
    pub layout: Layout,
    /// Number of food nodes (default: 1).
    pub food_sources: usize,
    pub initial_pheromone: f64,
    /// Attempts before giving up with `GraphError::NoPath`.
    pub max_attempts: usize,
    pub seed: u64,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            num_nodes: 200,
            layout: Layout::default(),
            food_sources: 1,
            initial_pheromone: DEFAULT_INITIAL_PHEROMONE,
            max_attempts: 1000,
            seed: 0,
        }
    }
}

impl SceneConfig {
    pub fn validate(&self) -> Result<()> {
        let min_nodes = match self.layout {
            Layout::RandomGeometric {
                connectivity,
                difficulty,
            } => {
                ensure_range("connectivity", connectivity, f64::MIN_POSITIVE, f64::MAX)?;
                ensure_range("difficulty", difficulty, 0.0, 1.0)?;
                2
            }
            Layout::Lattice {
                edge_probability,
                jitter,
                ..
            } => {
                ensure_range("edge_probability", edge_probability, 0.0, 1.0)?;
                ensure_range("jitter", jitter, 0.0, 1.0)?;
                4
            }
        };
        if self.num_nodes < min_nodes {
            return Err(FormicaError::invalid_config(
                "num_nodes",
                self.num_nodes.to_string(),
                format!("need at least {min_nodes} nodes for this layout"),
            ));
        }
        if self.food_sources == 0 || self.food_sources >= self.placed_nodes() {
            return Err(FormicaError::invalid_config(
                "food_sources",
                self.food_sources.to_string(),
                "must be at least 1 and leave room for the nest",
            ));
        }
        if self.max_attempts == 0 {
            return Err(FormicaError::invalid_config("max_attempts", "0", "must be at least 1"));
        }
        ensure_range("initial_pheromone", self.initial_pheromone, f64::MIN_POSITIVE, f64::MAX)
    }

    /// Nodes actually placed; the lattice rounds down to a square.
    pub fn placed_nodes(&self) -> usize {
        match self.layout {
            Layout::RandomGeometric { .. } => self.num_nodes,
            Layout::Lattice { .. } => {
                let side = lattice_side(self.num_nodes);
                side * side
            }
        }
    }
}

/// Outcome of one generation attempt.
enum Attempt {
    Accepted(Scene),
    /// The graph failed the path requirement; carries its nest.
    Rejected(NodeId),
}

/// Builder for generated scenes.
#[derive(Debug, Clone, Default)]
pub struct SceneBuilder {
    config: SceneConfig,
}

impl SceneBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: SceneConfig) -> Self {
        Self { config }
    }

    pub fn num_nodes(mut self, n: usize) -> Self {
        self.config.num_nodes = n;
        self
    }

    pub fn layout(mut self, layout: Layout) -> Self {
        self.config.layout = layout;
        self
    }

    pub fn food_sources(mut self, n: usize) -> Self {
        self.config.food_sources = n;
        self
    }

    pub fn initial_pheromone(mut self, pheromone: f64) -> Self {
        self.config.initial_pheromone = pheromone;
        self
    }

    pub fn max_attempts(mut self, attempts: usize) -> Self {
        self.config.max_attempts = attempts;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    /// Generate the scene, retrying until nest and food are connected.
    pub fn build(&self) -> Result<Scene> {
        self.config.validate()?;
        let mut rng = ChaCha8Rng::seed_from_u64(self.config.seed);

        // The lattice keeps its points across attempts; only edges are redrawn.
        let layout = self.config.layout;
        let lattice_points = match layout {
            Layout::Lattice { jitter, .. } => {
                lattice_positions(self.config.num_nodes, jitter, &mut rng)
            }
            Layout::RandomGeometric { .. } => Vec::new(),
        };

        let mut nest = NodeId(0);
        for attempt in 1..=self.config.max_attempts {
            let candidate = match layout {
                Layout::RandomGeometric {
                    connectivity,
                    difficulty,
                } => self.random_geometric(connectivity, difficulty, &mut rng)?,
                Layout::Lattice {
                    edge_probability,
                    min_path_length,
                    ..
                } => {
                    self.lattice(&lattice_points, edge_probability, min_path_length, &mut rng)?
                }
            };
            match candidate {
                Attempt::Accepted(scene) => {
                    info!(
                        nodes = scene.graph.node_count(),
                        edges = scene.graph.edge_count(),
                        nest = %scene.terminals.nest,
                        attempts = attempt,
                        "scene built"
                    );
                    return Ok(scene);
                }
                Attempt::Rejected(rejected) => {
                    nest = rejected;
                    warn!(attempt, nest = %rejected, "nest and food not connected, regenerating");
                }
            }
        }

        Err(GraphError::NoPath {
            nest,
            attempts: self.config.max_attempts,
        }
        .into())
    }

    /// One random geometric attempt.
    fn random_geometric(
        &self,
        connectivity: f64,
        difficulty: f64,
        rng: &mut ChaCha8Rng,
    ) -> Result<Attempt> {
        let n = self.config.num_nodes;
        let points: Vec<Position> = (0..n)
            .map(|_| Position::new(rng.gen::<f64>(), rng.gen::<f64>()))
            .collect();
        let radius = connectivity / (n as f64).sqrt();
        let graph = self.connect(&points, |a, b| a.distance_to(b) <= radius)?;

        let centre = Position::new(0.5, 0.5);
        let from_centre = |i: &usize| points[*i].distance_to(&centre);
        let nest = (0..n)
            .min_by(|a, b| from_centre(a).total_cmp(&from_centre(b)))
            .map(NodeId)
            .unwrap_or(NodeId(0));

        let food = if self.config.food_sources == 1 {
            let pool = ((n as f64 * difficulty) as usize).max(1);
            let far = (0..pool)
                .max_by(|a, b| from_centre(a).total_cmp(&from_centre(b)))
                .map(NodeId)
                .unwrap_or(NodeId(0));
            vec![far]
        } else {
            random_food(n, nest, self.config.food_sources, rng)
        };

        Ok(self.accept(graph, Terminals::new(nest, food), 0))
    }

    /// One lattice attempt over fixed points.
    fn lattice(
        &self,
        points: &[Position],
        edge_probability: f64,
        min_path_length: usize,
        rng: &mut ChaCha8Rng,
    ) -> Result<Attempt> {
        let graph = self.connect(points, |_, _| rng.gen_bool(edge_probability))?;
        let nest = NodeId(0);
        let last = NodeId(points.len() - 1);
        let mut food = vec![last];
        if self.config.food_sources > 1 {
            food.extend(
                random_food(points.len() - 1, nest, self.config.food_sources - 1, rng),
            );
        }
        Ok(self.accept(graph, Terminals::new(nest, food), min_path_length))
    }

    /// Edges between every pair the predicate admits, weighted by distance.
    fn connect<F>(&self, points: &[Position], mut admit: F) -> Result<PetTopologyGraph>
    where
        F: FnMut(&Position, &Position) -> bool,
    {
        let mut graph = PetTopologyGraph::with_capacity(points.len(), points.len() * 4);
        for &p in points {
            graph.add_node(p);
        }
        for i in 0..points.len() {
            for j in (i + 1)..points.len() {
                if admit(&points[i], &points[j]) {
                    let weight = points[i].distance_to(&points[j]);
                    if weight > 0.0 {
                        graph.add_edge(
                            NodeId(i),
                            NodeId(j),
                            EdgeData::new(weight, self.config.initial_pheromone),
                        )?;
                    }
                }
            }
        }
        Ok(graph)
    }

    /// Keep the graph if every food node is reachable from the nest and the
    /// first food's shortest route visits more than `min_path_length` nodes.
    fn accept(
        &self,
        graph: PetTopologyGraph,
        terminals: Terminals,
        min_path_length: usize,
    ) -> Attempt {
        let nest = terminals.nest;
        if terminals.is_food(nest) {
            return Attempt::Rejected(nest);
        }
        for (i, &food) in terminals.food.iter().enumerate() {
            match graph.shortest_path(nest, food) {
                Some((path, _)) if i > 0 || path.len() > min_path_length => {}
                _ => return Attempt::Rejected(nest),
            }
        }
        Attempt::Accepted(Scene { graph, terminals })
    }
}

fn lattice_side(num_nodes: usize) -> usize {
    (num_nodes as f64).sqrt().floor() as usize
}

/// Jittered grid points, row by row, inset from the unit square's border.
fn lattice_positions(num_nodes: usize, jitter: f64, rng: &mut ChaCha8Rng) -> Vec<Position> {
    let side = lattice_side(num_nodes);
    let inset = jitter;
    let step = (1.0 - 2.0 * inset) / (side - 1) as f64;
    let mut points = Vec::with_capacity(side * side);
    for row in 0..side {
        for col in 0..side {
            let x = inset + step * col as f64 + jitter * (rng.gen::<f64>() - 0.5);
            let y = inset + step * row as f64 + jitter * (rng.gen::<f64>() - 0.5);
            points.push(Position::new(x, y));
        }
    }
    points
}

/// `count` distinct nodes below `n`, none of them the nest.
fn random_food(n: usize, nest: NodeId, count: usize, rng: &mut ChaCha8Rng) -> Vec<NodeId> {
    let pool: Vec<NodeId> = (0..n).map(NodeId).filter(|&id| id != nest).collect();
    pool.choose_multiple(rng, count).copied().collect()
}
