//! Nodes, antennas and celestial bodies
//!
//! Plain value types held in the [`Network`](crate::Network) arenas. Nodes
//! reference their antennas and bodies by id; antennas reference their owner
//! by id, so there are no ownership cycles.

use crate::{AntennaId, BodyId, NodeId};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Default dish cone half-angle when targeting a body (degrees)
pub const DEFAULT_CONE_HALF_ANGLE_DEG: f64 = 5.0;

/// What a dish antenna is pointed at
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DishTarget {
    #[default]
    None,
    /// A single node
    Node { id: NodeId },
    /// Broadcast to a group of nodes
    Group { members: Vec<NodeId> },
    /// The centre of a celestial body; nodes inside the cone are covered
    Body { id: BodyId },
    /// Whichever node the host currently has active
    ActiveNode,
}

/// A celestial body nodes orbit and dishes can point at
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Body {
    pub id: BodyId,
    pub name: String,
    pub position: Vector3<f64>,
}

/// A node ("satellite") in the relay network
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub name: String,
    /// Current position (metres, shared inertial frame)
    pub position: Vector3<f64>,
    pub body: BodyId,
    pub powered: bool,
    /// Operator has direct control; no signal delay applies
    pub local_control: bool,
    /// Node is a command station that other nodes route to
    pub command_station: bool,
    pub antennas: Vec<AntennaId>,
}

impl Node {
    pub fn distance_to(&self, other: &Node) -> f64 {
        (self.position - other.position).norm()
    }
}

/// An antenna owned by exactly one node
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Antenna {
    pub id: AntennaId,
    pub owner: NodeId,
    pub name: String,
    /// Omnidirectional range (metres, 0 if none)
    pub omni_range: f64,
    /// Directional range (metres, 0 if none)
    pub dish_range: f64,
    pub target: DishTarget,
    pub cone_half_angle_deg: f64,
    pub activated: bool,
}

impl Antenna {
    /// Usable omni range; 0 when deactivated or the raw figure is NaN/negative
    pub fn omni(&self) -> f64 {
        if self.activated {
            usable_range(self.omni_range)
        } else {
            0.0
        }
    }

    /// Usable dish range; 0 when deactivated or the raw figure is NaN/negative
    pub fn dish(&self) -> f64 {
        if self.activated {
            usable_range(self.dish_range)
        } else {
            0.0
        }
    }

    pub fn cos_half_angle(&self) -> f64 {
        self.cone_half_angle_deg.to_radians().cos()
    }
}

#[inline]
fn usable_range(range: f64) -> f64 {
    if range > 0.0 {
        range
    } else {
        // also catches NaN
        0.0
    }
}

/// Builder input for [`Network::add_node`](crate::Network::add_node)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeSpec {
    pub name: String,
    pub position: Vector3<f64>,
    pub body: BodyId,
    #[serde(default = "default_true")]
    pub powered: bool,
    #[serde(default)]
    pub local_control: bool,
    #[serde(default)]
    pub command_station: bool,
}

fn default_true() -> bool {
    true
}

impl NodeSpec {
    pub fn satellite(name: impl Into<String>, position: Vector3<f64>, body: BodyId) -> Self {
        Self {
            name: name.into(),
            position,
            body,
            powered: true,
            local_control: false,
            command_station: false,
        }
    }

    pub fn command_station(name: impl Into<String>, position: Vector3<f64>, body: BodyId) -> Self {
        Self {
            command_station: true,
            local_control: true,
            ..Self::satellite(name, position, body)
        }
    }

    pub fn unpowered(mut self) -> Self {
        self.powered = false;
        self
    }

    pub fn local_control(mut self) -> Self {
        self.local_control = true;
        self
    }
}

/// Builder input for [`Network::add_antenna`](crate::Network::add_antenna)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AntennaSpec {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub omni_range: f64,
    #[serde(default)]
    pub dish_range: f64,
    #[serde(default)]
    pub target: DishTarget,
    #[serde(default = "default_cone")]
    pub cone_half_angle_deg: f64,
    #[serde(default = "default_true")]
    pub activated: bool,
}

fn default_cone() -> f64 {
    DEFAULT_CONE_HALF_ANGLE_DEG
}

impl AntennaSpec {
    pub fn omni(range: f64) -> Self {
        Self {
            name: "omni".to_string(),
            omni_range: range,
            dish_range: 0.0,
            target: DishTarget::None,
            cone_half_angle_deg: DEFAULT_CONE_HALF_ANGLE_DEG,
            activated: true,
        }
    }

    pub fn dish(range: f64, target: DishTarget) -> Self {
        Self {
            name: "dish".to_string(),
            omni_range: 0.0,
            dish_range: range,
            target,
            cone_half_angle_deg: DEFAULT_CONE_HALF_ANGLE_DEG,
            activated: true,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_cone(mut self, half_angle_deg: f64) -> Self {
        self.cone_half_angle_deg = half_angle_deg;
        self
    }

    pub fn inactive(mut self) -> Self {
        self.activated = false;
        self
    }
}
