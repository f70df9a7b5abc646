//! Shared types used across the colony, the graph, and the ants.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a node in the foraging graph.
///
/// Nodes are dense integers assigned in insertion order by the graph
/// builder, so they double as indices into position arrays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub usize);

impl NodeId {
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// Stable identifier of an undirected edge in the graph's edge arena.
///
/// The graph never mutates after construction, so an `EdgeId` stays valid
/// for the lifetime of the colony.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EdgeId(pub usize);

impl EdgeId {
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}", self.0)
    }
}

/// Index of an ant within its colony (and its slot in the position buffer).
pub type AntIndex = usize;

/// A point in the 2D plane the graph is embedded in.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Position) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }

    /// Linear interpolation from `self` toward `other`.
    ///
    /// `t` is not clamped: values above 1.0 extrapolate past `other`.
    pub fn lerp(&self, other: &Position, t: f64) -> Position {
        Position {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
        }
    }
}

/// Data stored on a graph node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeData {
    pub id: NodeId,
    pub position: Position,
}

/// Data stored on a graph edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EdgeData {
    /// Euclidean length of the edge. Fixed at construction, always > 0.
    pub weight: f64,
    /// Current pheromone level. Always > 0.
    pub pheromone: f64,
}

impl EdgeData {
    pub fn new(weight: f64, pheromone: f64) -> Self {
        Self { weight, pheromone }
    }
}

/// One outgoing option from a node: the neighbor, the edge leading there,
/// and the edge's pheromone at the time of enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Candidate {
    pub neighbor: NodeId,
    pub edge: EdgeId,
    pub pheromone: f64,
}

/// The nest and the food sources of a scene.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Terminals {
    pub nest: NodeId,
    pub food: Vec<NodeId>,
}

impl Terminals {
    pub fn new(nest: NodeId, food: Vec<NodeId>) -> Self {
        Self { nest, food }
    }

    pub fn is_nest(&self, node: NodeId) -> bool {
        self.nest == node
    }

    pub fn is_food(&self, node: NodeId) -> bool {
        self.food.contains(&node)
    }

    /// Nest or food source: places where reversing direction is allowed.
    pub fn is_terminal(&self, node: NodeId) -> bool {
        self.is_nest(node) || self.is_food(node)
    }
}

/// Behavioral state of an ant.
///
/// Renderers derive display attributes (such as color) from this; it is
/// never stored alongside a separate display field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AntState {
    /// Searching for food.
    Outbound,
    /// Carrying food back to the nest.
    Returning,
}

/// The current tick of the simulation.
pub type Tick = u64;
