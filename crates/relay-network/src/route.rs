//! Routes through the relay network

use crate::link::Link;
use crate::pathfinder::Path;
use crate::NodeId;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// An ordered chain of links from a start node to a goal node.
///
/// Produced fresh by every solve; routes carry no identity beyond their
/// content. A route that only holds its start node does not `exist`; when
/// the goal was unreachable its delay is `+inf`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    start: NodeId,
    goal: NodeId,
    nodes: Vec<NodeId>,
    links: Vec<Link>,
    /// Total path length (metres)
    distance: f64,
    /// Signal travel time (seconds)
    delay: f64,
}

impl Route {
    /// No connection between `start` and `goal`
    pub fn unreachable(start: NodeId, goal: NodeId) -> Self {
        Self {
            start,
            goal,
            nodes: vec![start],
            links: Vec::new(),
            distance: f64::INFINITY,
            delay: f64::INFINITY,
        }
    }

    /// Zero-delay route of a node to itself
    pub fn local(node: NodeId) -> Self {
        Self {
            start: node,
            goal: node,
            nodes: vec![node],
            links: Vec::new(),
            distance: 0.0,
            delay: 0.0,
        }
    }

    pub(crate) fn from_path(start: NodeId, goal: NodeId, path: Path<NodeId, Link>, propagation_speed: f64) -> Self {
        if path.cost.is_infinite() {
            return Self::unreachable(start, goal);
        }
        Self {
            start,
            goal,
            nodes: path.nodes,
            links: path.edges,
            distance: path.cost,
            delay: path.cost / propagation_speed,
        }
    }

    pub fn start(&self) -> NodeId {
        self.start
    }

    pub fn goal(&self) -> NodeId {
        self.goal
    }

    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn distance(&self) -> f64 {
        self.distance
    }

    pub fn delay(&self) -> f64 {
        self.delay
    }

    pub fn exists(&self) -> bool {
        self.nodes.len() > 1
    }

    pub fn hops(&self) -> usize {
        self.links.len()
    }

    /// Ascending delay; unreachable routes sort last
    pub fn compare_delay(&self, other: &Self) -> Ordering {
        self.delay.total_cmp(&other.delay)
    }

    /// Lowest-delay route of a set
    pub fn best(routes: impl IntoIterator<Item = Route>) -> Option<Route> {
        routes.into_iter().min_by(|a, b| a.compare_delay(b))
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hops: Vec<String> = self.nodes.iter().map(|n| n.to_string()).collect();
        if self.exists() {
            write!(f, "{} ({:.6} s)", hops.join(" -> "), self.delay)
        } else if self.delay == 0.0 {
            write!(f, "{} (local)", self.start)
        } else {
            write!(f, "{} -> {}: no connection", self.start, self.goal)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::link::LinkKind;

    fn hop(a: u32, b: u32, distance: f64) -> Link {
        Link::new(NodeId(a), vec![], NodeId(b), vec![], LinkKind::Omni, distance)
    }

    #[test]
    fn test_unreachable_route() {
        let route = Route::unreachable(NodeId(1), NodeId(2));
        assert!(!route.exists());
        assert!(route.delay().is_infinite());
        assert_eq!(route.nodes(), &[NodeId(1)]);
    }

    #[test]
    fn test_from_path_divides_by_speed() {
        let path = Path {
            nodes: vec![NodeId(1), NodeId(2), NodeId(3)],
            edges: vec![hop(1, 2, 300.0), hop(2, 3, 300.0)],
            cost: 600.0,
        };
        let route = Route::from_path(NodeId(1), NodeId(3), path, 300.0);
        assert!(route.exists());
        assert_eq!(route.hops(), 2);
        assert_eq!(route.delay(), 2.0);
    }

    #[test]
    fn test_ordering_by_delay() {
        let near = Route::from_path(
            NodeId(1),
            NodeId(2),
            Path { nodes: vec![NodeId(1), NodeId(2)], edges: vec![hop(1, 2, 10.0)], cost: 10.0 },
            1.0,
        );
        let none = Route::unreachable(NodeId(1), NodeId(3));

        assert_eq!(near.compare_delay(&none), Ordering::Less);
        assert_eq!(Route::best(vec![none.clone(), near.clone()]), Some(near));
        assert_eq!(Route::best(Vec::new()), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Route::local(NodeId(4)).to_string(), "node-4 (local)");
        assert_eq!(
            Route::unreachable(NodeId(1), NodeId(2)).to_string(),
            "node-1 -> node-2: no connection"
        );
    }
}
