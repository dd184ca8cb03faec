//! Reference answers for pathfinder properties
//!
//! Shortest paths over generated matrices computed with petgraph's Dijkstra,
//! independently of the relay network's own queue and search.

use crate::generators::Matrix;
use petgraph::algo::dijkstra;
use petgraph::graph::{DiGraph, NodeIndex};

/// Directed petgraph copy of a matrix; node `i` is `NodeIndex::new(i)`
pub fn matrix_graph(m: &Matrix) -> DiGraph<usize, u32> {
    let mut graph = DiGraph::with_capacity(m.len(), 0);
    for i in 0..m.len() {
        graph.add_node(i);
    }
    for (i, row) in m.iter().enumerate() {
        for (j, cell) in row.iter().enumerate() {
            if let Some(w) = cell {
                graph.add_edge(NodeIndex::new(i), NodeIndex::new(j), *w);
            }
        }
    }
    graph
}

/// Dijkstra distance from `start` to `goal`, `None` when unreachable
pub fn reference_cost(m: &Matrix, start: usize, goal: usize) -> Option<f64> {
    let graph = matrix_graph(m);
    let goal_index = NodeIndex::new(goal);
    let costs = dijkstra(&graph, NodeIndex::new(start), Some(goal_index), |e| *e.weight() as f64);
    costs.get(&goal_index).copied()
}

/// Neighbor oracle over a matrix for the pathfinder
pub fn matrix_neighbors(m: &Matrix) -> impl FnMut(usize) -> Vec<(usize, u32)> + '_ {
    move |i| {
        m[i].iter()
            .enumerate()
            .filter_map(|(j, cell)| cell.map(|w| (j, w)))
            .collect()
    }
}

/// Total weight along `nodes`, `None` if some hop is not an edge
pub fn path_weight(m: &Matrix, nodes: &[usize]) -> Option<f64> {
    nodes
        .windows(2)
        .map(|pair| m[pair[0]][pair[1]].map(f64::from))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_matrix() -> Matrix {
        let mut m = vec![vec![None; 4]; 4];
        m[0][1] = Some(5);
        m[1][2] = Some(5);
        m[0][2] = Some(20);
        m
    }

    #[test]
    fn test_reference_cost() {
        let m = create_test_matrix();
        assert_eq!(reference_cost(&m, 0, 2), Some(10.0));
        assert_eq!(reference_cost(&m, 2, 0), None);
        assert_eq!(reference_cost(&m, 0, 3), None);
    }

    #[test]
    fn test_path_weight() {
        let m = create_test_matrix();
        assert_eq!(path_weight(&m, &[0, 1, 2]), Some(10.0));
        assert_eq!(path_weight(&m, &[0, 3]), None);
        assert_eq!(path_weight(&m, &[1]), Some(0.0));
    }
}
