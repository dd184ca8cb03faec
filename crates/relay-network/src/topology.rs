//! Explicit topology view
//!
//! Materializes every current link into an undirected petgraph graph. The
//! routing path never needs this (it queries the range model lazily); it
//! serves consumers that want the whole edge set at once, such as map
//! overlays, statistics and reference shortest-path checks.

use crate::link::{Link, LinkKind};
use crate::{Network, NodeId};
use petgraph::algo::dijkstra;
use petgraph::graph::{NodeIndex, UnGraph};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// Snapshot of the connectivity graph at one instant
pub struct Topology {
    graph: UnGraph<NodeId, Link>,
    index: HashMap<NodeId, NodeIndex>,
}

impl Topology {
    pub fn build(network: &Network) -> Self {
        let mut graph = UnGraph::new_undirected();
        let mut index = HashMap::new();

        for node in network.nodes() {
            index.insert(node.id, graph.add_node(node.id));
        }

        for link in network.all_links() {
            let (a, b) = link.endpoints();
            if let (Some(&ia), Some(&ib)) = (index.get(&a), index.get(&b)) {
                graph.add_edge(ia, ib, link);
            }
        }

        debug!(
            nodes = graph.node_count(),
            links = graph.edge_count(),
            "topology built"
        );
        Self { graph, index }
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn link_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn links(&self) -> impl Iterator<Item = &Link> {
        self.graph.edge_weights()
    }

    /// Nodes directly linked to `id`
    pub fn neighbors(&self, id: NodeId) -> Vec<NodeId> {
        match self.index.get(&id) {
            Some(&idx) => self.graph.neighbors(idx).map(|n| self.graph[n]).collect(),
            None => Vec::new(),
        }
    }

    /// Links touching `id`
    pub fn links_of(&self, id: NodeId) -> Vec<&Link> {
        match self.index.get(&id) {
            Some(&idx) => self.graph.edges(idx).map(|e| e.weight()).collect(),
            None => Vec::new(),
        }
    }

    /// Shortest path length (metres) between two nodes, via Dijkstra
    pub fn shortest_distance(&self, from: NodeId, to: NodeId) -> Option<f64> {
        let a = *self.index.get(&from)?;
        let b = *self.index.get(&to)?;
        let costs = dijkstra(&self.graph, a, Some(b), |e| e.weight().distance());
        costs.get(&b).copied()
    }

    pub fn stats(&self) -> TopologyStats {
        let mut omni_links = 0;
        let mut dish_links = 0;
        for link in self.links() {
            match link.kind() {
                LinkKind::Omni => omni_links += 1,
                LinkKind::Dish => dish_links += 1,
            }
        }

        let isolated_nodes = self
            .graph
            .node_indices()
            .filter(|&n| self.graph.neighbors(n).next().is_none())
            .count();

        TopologyStats {
            total_nodes: self.graph.node_count(),
            total_links: self.graph.edge_count(),
            omni_links,
            dish_links,
            isolated_nodes,
        }
    }
}

/// Graph statistics
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopologyStats {
    pub total_nodes: usize,
    pub total_links: usize,
    pub omni_links: usize,
    pub dish_links: usize,
    pub isolated_nodes: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{AntennaSpec, DishTarget, NodeSpec};
    use nalgebra::Vector3;

    const KM: f64 = 1000.0;

    fn create_test_graph() -> (Network, Vec<NodeId>) {
        let mut network = Network::default();
        let body = network.add_body("Kerbin", Vector3::zeros());
        let ids: Vec<NodeId> = (0..4)
            .map(|i| {
                network.add_node(NodeSpec::satellite(
                    format!("SAT-{}", i),
                    Vector3::new(i as f64 * 1000.0 * KM, 0.0, 0.0),
                    body,
                ))
            })
            .collect();

        network.add_antenna(ids[0], AntennaSpec::omni(1200.0 * KM)).unwrap();
        network.add_antenna(ids[1], AntennaSpec::omni(1200.0 * KM)).unwrap();
        network
            .add_antenna(ids[1], AntennaSpec::dish(5000.0 * KM, DishTarget::Node { id: ids[2] }))
            .unwrap();
        network
            .add_antenna(ids[2], AntennaSpec::dish(5000.0 * KM, DishTarget::Node { id: ids[1] }))
            .unwrap();
        // ids[3] has no antenna
        (network, ids)
    }

    #[test]
    fn test_stats() {
        let (network, _) = create_test_graph();
        let stats = network.topology().stats();

        assert_eq!(stats.total_nodes, 4);
        assert_eq!(stats.total_links, 2);
        assert_eq!(stats.omni_links, 1);
        assert_eq!(stats.dish_links, 1);
        assert_eq!(stats.isolated_nodes, 1);
    }

    #[test]
    fn test_neighbors() {
        let (network, ids) = create_test_graph();
        let topology = network.topology();

        let mut around = topology.neighbors(ids[1]);
        around.sort();
        assert_eq!(around, vec![ids[0], ids[2]]);
        assert_eq!(topology.links_of(ids[2]).len(), 1);
        assert!(topology.neighbors(ids[3]).is_empty());
    }

    #[test]
    fn test_shortest_distance_matches_solve() {
        let (network, ids) = create_test_graph();
        let topology = network.topology();

        let reference = topology.shortest_distance(ids[0], ids[2]).unwrap();
        let route = network.solve(ids[0], ids[2]);
        assert!((reference - route.distance()).abs() < 1e-6);
        assert_eq!(topology.shortest_distance(ids[0], ids[3]), None);
    }
}
