//! Generators for relay network property tests
//!
//! Distances are metres. Scenario extents are kept small enough that random
//! antennas link often, so route properties see real multi-hop graphs.

use nalgebra::Vector3;
use proptest::prelude::*;
use relay_network::snapshot::{BodySnapshot, NodeSnapshot};
use relay_network::{AntennaSpec, BodyId, DishTarget, NetworkSettings, NetworkSnapshot, NodeId, NodeSpec};

pub const KM: f64 = 1000.0;

// ============================================================================
// Heap Workloads
// ============================================================================

/// One step of a random heap workload
#[derive(Debug, Clone)]
pub enum HeapOp {
    Add(i32),
    Remove,
    /// Overwrite the key at `index % len` through `update_key`
    Rekey(usize, i32),
    /// Add `delta` to the key at `index % len` in place, then call
    /// `increase` (delta < 0) or `decrease` (delta >= 0)
    Shift(usize, i32),
}

/// Keys with plenty of duplicates
pub fn heap_key() -> impl Strategy<Value = i32> {
    -50i32..50
}

pub fn heap_keys(max_len: usize) -> impl Strategy<Value = Vec<i32>> {
    prop::collection::vec(heap_key(), 0..max_len)
}

pub fn heap_op() -> impl Strategy<Value = HeapOp> {
    prop_oneof![
        3 => heap_key().prop_map(HeapOp::Add),
        2 => Just(HeapOp::Remove),
        2 => (any::<usize>(), heap_key()).prop_map(|(i, k)| HeapOp::Rekey(i, k)),
        2 => (any::<usize>(), -20i32..20).prop_map(|(i, d)| HeapOp::Shift(i, d)),
    ]
}

pub fn heap_ops(max_len: usize) -> impl Strategy<Value = Vec<HeapOp>> {
    prop::collection::vec(heap_op(), 0..max_len)
}

// ============================================================================
// Weighted Graphs
// ============================================================================

/// Directed adjacency matrix; `None` means no edge
pub type Matrix = Vec<Vec<Option<u32>>>;

/// Random directed graph on `n` nodes with edge weights 1..=20
pub fn adjacency_matrix(n: usize) -> impl Strategy<Value = Matrix> {
    let cell = prop_oneof![
        2 => Just(None),
        1 => (1u32..=20).prop_map(Some),
    ];
    prop::collection::vec(prop::collection::vec(cell, n), n).prop_map(|mut m| {
        for (i, row) in m.iter_mut().enumerate() {
            row[i] = None;
        }
        m
    })
}

/// Matrix plus a start and goal inside it
pub fn matrix_query(max_nodes: usize) -> impl Strategy<Value = (Matrix, usize, usize)> {
    (2..=max_nodes).prop_flat_map(|n| (adjacency_matrix(n), 0..n, 0..n))
}

// ============================================================================
// Network Scenarios
// ============================================================================

pub fn range_m() -> impl Strategy<Value = f64> {
    (100.0f64..4000.0).prop_map(|km| km * KM)
}

/// Position within a cube of `extent_km` on a side
pub fn position(extent_km: f64) -> impl Strategy<Value = Vector3<f64>> {
    let axis = move || (0.0..extent_km).prop_map(|v| v * KM);
    (axis(), axis(), axis()).prop_map(|(x, y, z)| Vector3::new(x, y, z))
}

/// Omni or dish; dishes target a node below `node_count` or nothing
pub fn antenna_spec(node_count: usize) -> impl Strategy<Value = AntennaSpec> {
    let node_count = node_count.max(1) as u32;
    prop_oneof![
        2 => range_m().prop_map(AntennaSpec::omni),
        3 => (range_m(), 0..node_count).prop_map(|(r, id)| {
            AntennaSpec::dish(r * 4.0, DishTarget::Node { id: NodeId(id) })
        }),
        1 => range_m().prop_map(|r| AntennaSpec::dish(r, DishTarget::None)),
    ]
}

/// Short omni plus a long dish aimed at a peer, so mixed omni/dish
/// pairings decide many links
pub fn relay_antennas(node_count: usize) -> impl Strategy<Value = Vec<AntennaSpec>> {
    let node_count = node_count.max(1) as u32;
    ((100.0f64..1500.0), (4000.0f64..12_000.0), 0..node_count).prop_map(|(omni_km, dish_km, peer)| {
        vec![
            AntennaSpec::omni(omni_km * KM),
            AntennaSpec::dish(dish_km * KM, DishTarget::Node { id: NodeId(peer) }),
        ]
    })
}

fn node_snapshot(index: usize, node_count: usize, extent_km: f64) -> impl Strategy<Value = NodeSnapshot> {
    let antennas = prop_oneof![
        2 => prop::collection::vec(antenna_spec(node_count), 0..3),
        1 => relay_antennas(node_count),
    ];
    (
        position(extent_km),
        antennas,
        prop::bool::weighted(0.9),
    )
        .prop_map(move |(position, antennas, powered)| {
            let mut node = NodeSpec::satellite(format!("SAT-{}", index), position, BodyId(0));
            node.powered = powered;
            NodeSnapshot { node, antennas }
        })
}

/// A valid snapshot of 2..=`max_nodes` nodes; node 0 is a command station
pub fn network_snapshot(max_nodes: usize, settings: NetworkSettings) -> impl Strategy<Value = NetworkSnapshot> {
    (2..=max_nodes).prop_flat_map(move |n| {
        let settings = settings.clone();
        let nodes: Vec<_> = (0..n).map(|i| node_snapshot(i, n, 8000.0)).collect();
        nodes.prop_map(move |mut nodes| {
            nodes[0].node.command_station = true;
            nodes[0].node.local_control = true;
            NetworkSnapshot {
                settings: settings.clone(),
                bodies: vec![BodySnapshot {
                    name: "Kerbin".to_string(),
                    position: Vector3::zeros(),
                }],
                nodes,
                active_node: None,
            }
        })
    })
}

/// Snapshot plus two node ids inside it
pub fn network_query(
    max_nodes: usize,
    settings: NetworkSettings,
) -> impl Strategy<Value = (NetworkSnapshot, NodeId, NodeId)> {
    network_snapshot(max_nodes, settings).prop_flat_map(|snapshot| {
        let n = snapshot.nodes.len() as u32;
        (Just(snapshot), (0..n).prop_map(NodeId), (0..n).prop_map(NodeId))
    })
}

/// Standard or additive settings with a random multiplier
pub fn network_settings() -> impl Strategy<Value = NetworkSettings> {
    (prop::bool::ANY, 0.0f64..1.0).prop_map(|(additive, mult)| {
        let base = if additive {
            NetworkSettings::additive()
        } else {
            NetworkSettings::default()
        };
        base.with_multiplier(mult)
    })
}
