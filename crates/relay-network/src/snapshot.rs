//! Snapshot documents
//!
//! The host hands the core a JSON snapshot of bodies, nodes and antennas.
//! Node ids are positions in the `nodes` list and body ids are positions in
//! the `bodies` list; targets refer to them the same way. Malformed
//! documents are rejected here so the core can assume well-formed input.

use crate::node::{AntennaSpec, DishTarget, NodeSpec};
use crate::settings::NetworkSettings;
use crate::{BodyId, Network, NodeId, RelayError, Result};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::info;

/// Full host snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkSnapshot {
    #[serde(default)]
    pub settings: NetworkSettings,
    #[serde(default)]
    pub bodies: Vec<BodySnapshot>,
    pub nodes: Vec<NodeSnapshot>,
    #[serde(default)]
    pub active_node: Option<NodeId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BodySnapshot {
    pub name: String,
    pub position: Vector3<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeSnapshot {
    #[serde(flatten)]
    pub node: NodeSpec,
    #[serde(default)]
    pub antennas: Vec<AntennaSpec>,
}

impl NetworkSnapshot {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let snapshot: Self = serde_json::from_str(json)?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    /// Load and validate a snapshot file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading network snapshot from {:?}", path);

        let reader = BufReader::new(File::open(path)?);
        let snapshot: Self = serde_json::from_reader(reader)?;
        snapshot.validate()?;

        info!(
            "Loaded {} bodies, {} nodes",
            snapshot.bodies.len(),
            snapshot.nodes.len()
        );
        Ok(snapshot)
    }

    pub fn validate(&self) -> Result<()> {
        self.settings.validate()?;

        for body in &self.bodies {
            if !is_finite(&body.position) {
                return Err(invalid(format!("body {:?} has a non-finite position", body.name)));
            }
        }

        for (i, entry) in self.nodes.iter().enumerate() {
            let node = &entry.node;
            if !is_finite(&node.position) {
                return Err(invalid(format!("node {} ({:?}) has a non-finite position", i, node.name)));
            }
            self.check_body(node.body)?;

            for antenna in &entry.antennas {
                match &antenna.target {
                    DishTarget::Node { id } => self.check_node(*id)?,
                    DishTarget::Group { members } => {
                        for id in members {
                            self.check_node(*id)?;
                        }
                    }
                    DishTarget::Body { id } => self.check_body(*id)?,
                    DishTarget::None | DishTarget::ActiveNode => {}
                }
            }
        }

        if let Some(active) = self.active_node {
            self.check_node(active)?;
        }
        Ok(())
    }

    fn check_node(&self, id: NodeId) -> Result<()> {
        if (id.0 as usize) < self.nodes.len() {
            Ok(())
        } else {
            Err(invalid(format!("reference to unknown {}", id)))
        }
    }

    fn check_body(&self, id: BodyId) -> Result<()> {
        if (id.0 as usize) < self.bodies.len() {
            Ok(())
        } else {
            Err(invalid(format!("reference to unknown {}", id)))
        }
    }
}

fn is_finite(v: &Vector3<f64>) -> bool {
    v.iter().all(|c| c.is_finite())
}

fn invalid(message: String) -> RelayError {
    RelayError::InvalidSnapshot(message)
}

impl Network {
    /// Build a network from a validated snapshot
    pub fn from_snapshot(snapshot: NetworkSnapshot) -> Result<Self> {
        snapshot.validate()?;

        let mut network = Network::new(snapshot.settings);
        for body in snapshot.bodies {
            network.add_body(body.name, body.position);
        }
        for entry in snapshot.nodes {
            let id = network.add_node(entry.node);
            for antenna in entry.antennas {
                network.add_antenna(id, antenna)?;
            }
        }
        network.set_active_node(snapshot.active_node);
        Ok(network)
    }
}
