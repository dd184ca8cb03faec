//! Network context
//!
//! Holds the host's current snapshot of bodies, nodes and antennas together
//! with the settings and the selected range model. All queries borrow the
//! network immutably and build their own search state, so nothing is cached
//! between ticks and concurrent queries never share a queue.

use crate::link::Link;
use crate::node::{Antenna, AntennaSpec, Body, DishTarget, Node, NodeSpec};
use crate::pathfinder::{self, SearchLimits};
use crate::range::{self, RangeModel};
use crate::route::Route;
use crate::settings::NetworkSettings;
use crate::topology::Topology;
use crate::{AntennaId, BodyId, NodeId, RelayError, Result};
use nalgebra::Vector3;
use std::fmt;
use tracing::debug;

/// Arena of bodies, nodes and antennas plus the active range model
pub struct Network {
    settings: NetworkSettings,
    model: Box<dyn RangeModel>,
    bodies: Vec<Body>,
    nodes: Vec<Node>,
    antennas: Vec<Antenna>,
    active: Option<NodeId>,
}

impl Network {
    pub fn new(settings: NetworkSettings) -> Self {
        let model = range::model_for(&settings);
        Self {
            settings,
            model,
            bodies: Vec::new(),
            nodes: Vec::new(),
            antennas: Vec::new(),
            active: None,
        }
    }

    pub fn settings(&self) -> &NetworkSettings {
        &self.settings
    }

    /// Replace the settings and rebuild the range model
    pub fn set_settings(&mut self, settings: NetworkSettings) {
        self.model = range::model_for(&settings);
        self.settings = settings;
    }

    // ------------------------------------------------------------------
    // Arena management
    // ------------------------------------------------------------------

    pub fn add_body(&mut self, name: impl Into<String>, position: Vector3<f64>) -> BodyId {
        let id = BodyId(self.bodies.len() as u32);
        self.bodies.push(Body {
            id,
            name: name.into(),
            position,
        });
        id
    }

    pub fn add_node(&mut self, spec: NodeSpec) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node {
            id,
            name: spec.name,
            position: spec.position,
            body: spec.body,
            powered: spec.powered,
            local_control: spec.local_control,
            command_station: spec.command_station,
            antennas: Vec::new(),
        });
        id
    }

    pub fn add_antenna(&mut self, owner: NodeId, spec: AntennaSpec) -> Result<AntennaId> {
        let id = AntennaId(self.antennas.len() as u32);
        let node = self
            .nodes
            .get_mut(owner.0 as usize)
            .ok_or(RelayError::NodeNotFound(owner))?;
        node.antennas.push(id);

        self.antennas.push(Antenna {
            id,
            owner,
            name: spec.name,
            omni_range: spec.omni_range,
            dish_range: spec.dish_range,
            target: spec.target,
            cone_half_angle_deg: spec.cone_half_angle_deg,
            activated: spec.activated,
        });
        Ok(id)
    }

    pub fn body(&self, id: BodyId) -> Option<&Body> {
        self.bodies.get(id.0 as usize)
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0 as usize)
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn antenna(&self, id: AntennaId) -> Option<&Antenna> {
        self.antennas.get(id.0 as usize)
    }

    /// Antennas owned by `node`, in mounting order
    pub fn antennas_of<'a>(&'a self, node: &'a Node) -> impl Iterator<Item = &'a Antenna> + 'a {
        node.antennas
            .iter()
            .filter_map(move |id| self.antennas.get(id.0 as usize))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node> {
        self.nodes
            .get_mut(id.0 as usize)
            .ok_or(RelayError::NodeNotFound(id))
    }

    fn antenna_mut(&mut self, id: AntennaId) -> Result<&mut Antenna> {
        self.antennas
            .get_mut(id.0 as usize)
            .ok_or(RelayError::AntennaNotFound(id))
    }

    pub fn set_body_position(&mut self, id: BodyId, position: Vector3<f64>) -> Result<()> {
        let body = self
            .bodies
            .get_mut(id.0 as usize)
            .ok_or(RelayError::BodyNotFound(id))?;
        body.position = position;
        Ok(())
    }

    pub fn set_position(&mut self, id: NodeId, position: Vector3<f64>) -> Result<()> {
        self.node_mut(id)?.position = position;
        Ok(())
    }

    pub fn set_powered(&mut self, id: NodeId, powered: bool) -> Result<()> {
        self.node_mut(id)?.powered = powered;
        Ok(())
    }

    pub fn set_local_control(&mut self, id: NodeId, local_control: bool) -> Result<()> {
        self.node_mut(id)?.local_control = local_control;
        Ok(())
    }

    pub fn set_target(&mut self, id: AntennaId, target: DishTarget) -> Result<()> {
        self.antenna_mut(id)?.target = target;
        Ok(())
    }

    pub fn set_activated(&mut self, id: AntennaId, activated: bool) -> Result<()> {
        self.antenna_mut(id)?.activated = activated;
        Ok(())
    }

    pub fn set_active_node(&mut self, node: Option<NodeId>) {
        self.active = node;
    }

    pub fn active_node(&self) -> Option<NodeId> {
        self.active
    }

    // ------------------------------------------------------------------
    // Connectivity
    // ------------------------------------------------------------------

    /// One-shot connectivity test between two nodes
    pub fn find_link(&self, a: NodeId, b: NodeId) -> Option<Link> {
        let na = self.node(a)?;
        let nb = self.node(b)?;
        self.model.try_link(self, na, nb)
    }

    /// All links currently available from `node`, oriented away from it
    pub fn find_neighbors(&self, node: NodeId) -> Vec<Link> {
        let Some(origin) = self.node(node) else {
            return Vec::new();
        };
        if !self.can_transmit(origin) {
            return Vec::new();
        }

        self.nodes
            .iter()
            .filter(|other| other.id != origin.id && self.can_transmit(other))
            .filter_map(|other| self.model.try_link(self, origin, other))
            .collect()
    }

    /// Every link in the network, each pair once
    pub fn all_links(&self) -> Vec<Link> {
        let candidates: Vec<&Node> = self.nodes.iter().filter(|n| self.can_transmit(n)).collect();
        let mut links = Vec::new();

        for (i, a) in candidates.iter().enumerate() {
            for b in &candidates[i + 1..] {
                if let Some(link) = self.model.try_link(self, a, b) {
                    links.push(link);
                }
            }
        }
        links
    }

    // Cheap prefilter: powered and at least one antenna with some range.
    fn can_transmit(&self, node: &Node) -> bool {
        node.powered
            && self
                .antennas_of(node)
                .any(|a| a.omni() > 0.0 || a.dish() > 0.0)
    }

    // ------------------------------------------------------------------
    // Routing
    // ------------------------------------------------------------------

    /// Minimum-delay route from `start` to `goal`
    pub fn solve(&self, start: NodeId, goal: NodeId) -> Route {
        let (Some(_), Some(target)) = (self.node(start), self.node(goal)) else {
            return Route::unreachable(start, goal);
        };
        if start == goal {
            return Route::local(start);
        }

        let limits = SearchLimits {
            max_expansions: self.settings.max_expansions,
        };
        let path = pathfinder::solve(
            start,
            goal,
            |n| {
                self.find_neighbors(n)
                    .into_iter()
                    .filter_map(move |link| link.other(n).map(|m| (m, link)))
            },
            |_, _, link: &Link| link.distance(),
            |n, _| {
                self.node(n)
                    .map(|node| node.distance_to(target))
                    .unwrap_or(0.0)
            },
            limits,
        );

        let route = Route::from_path(start, goal, path, self.settings.propagation_speed);
        debug!(%start, %goal, exists = route.exists(), delay = route.delay(), "route solved");
        route
    }

    pub fn command_stations(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(|n| n.command_station)
    }

    /// Lowest-delay route from `node` to any command station
    pub fn connection_to_command(&self, node: NodeId) -> Route {
        match self.node(node) {
            Some(n) if n.command_station => return Route::local(node),
            Some(_) => {}
            None => return Route::unreachable(node, node),
        }

        Route::best(
            self.command_stations()
                .map(|station| self.solve(node, station.id)),
        )
        .unwrap_or_else(|| Route::unreachable(node, node))
    }

    /// Seconds before a command reaches `node`; 0 under local control
    pub fn signal_delay(&self, node: NodeId) -> f64 {
        match self.node(node) {
            Some(n) if n.local_control => 0.0,
            Some(_) => self.connection_to_command(node).delay(),
            None => f64::INFINITY,
        }
    }

    pub fn has_any_connection(&self, node: NodeId) -> bool {
        !self.find_neighbors(node).is_empty()
    }

    pub fn has_connection_to_command(&self, node: NodeId) -> bool {
        match self.node(node) {
            Some(n) if n.command_station => true,
            Some(_) => self.connection_to_command(node).exists(),
            None => false,
        }
    }

    /// Explicit graph of the current links
    pub fn topology(&self) -> Topology {
        Topology::build(self)
    }
}

impl Default for Network {
    fn default() -> Self {
        Self::new(NetworkSettings::default())
    }
}

impl fmt::Debug for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Network")
            .field("settings", &self.settings)
            .field("bodies", &self.bodies.len())
            .field("nodes", &self.nodes.len())
            .field("antennas", &self.antennas.len())
            .field("active", &self.active)
            .finish()
    }
}
