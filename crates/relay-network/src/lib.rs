//! Relay Network
//!
//! Connectivity inference and minimum-delay routing for a fleet of
//! antenna-carrying nodes:
//!
//! - Indexable binary min-heap and priority queue with decrease-key
//! - Range models (Standard, Additive/Root) deciding which nodes can link
//! - Generic A* pathfinder over an implicit neighbor oracle
//! - `Network` context answering link, neighbor and route queries
//! - Explicit topology view for visualization and reference checks
//!
//! All queries take `&Network` and allocate their own search state, so a
//! shared network can be queried from several threads at once.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub mod heap;
pub mod link;
pub mod network;
pub mod node;
pub mod pathfinder;
pub mod queue;
pub mod range;
pub mod route;
pub mod settings;
pub mod snapshot;
pub mod topology;

pub use heap::BinaryMinHeap;
pub use link::{Link, LinkKind};
pub use network::Network;
pub use node::{Antenna, AntennaSpec, Body, DishTarget, Node, NodeSpec};
pub use pathfinder::{Path, SearchLimits};
pub use queue::PriorityQueue;
pub use range::{AdditiveRangeModel, RangeModel, StandardRangeModel};
pub use route::Route;
pub use settings::{NetworkSettings, RangeModelKind};
pub use snapshot::NetworkSnapshot;
pub use topology::{Topology, TopologyStats};

/// Relay network errors
#[derive(Error, Debug)]
pub enum RelayError {
    #[error("Structure is empty")]
    Empty,
    #[error("Heap index {0} out of range (len {1})")]
    IndexOutOfRange(usize, usize),
    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),
    #[error("Antenna not found: {0}")]
    AntennaNotFound(AntennaId),
    #[error("Body not found: {0}")]
    BodyNotFound(BodyId),
    #[error("Invalid snapshot: {0}")]
    InvalidSnapshot(String),
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, RelayError>;

/// Stable identity of a node for its whole lifetime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u32);

/// Arena index of an antenna
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AntennaId(pub u32);

/// Arena index of a celestial body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BodyId(pub u32);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node-{}", self.0)
    }
}

impl fmt::Display for AntennaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "antenna-{}", self.0)
    }
}

impl fmt::Display for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "body-{}", self.0)
    }
}
