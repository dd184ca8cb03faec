//! Links between two nodes

use crate::{AntennaId, NodeId};
use serde::{Deserialize, Serialize};

/// How a link is realized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LinkKind {
    /// Both sides reach each other omnidirectionally
    Omni,
    /// At least one side uses a pointed dish
    Dish,
}

/// An undirected edge of the connectivity graph.
///
/// Derived fresh by a range model on every query and never mutated
/// afterwards. Equality ignores endpoint order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Link {
    a: NodeId,
    b: NodeId,
    kind: LinkKind,
    interfaces_a: Vec<AntennaId>,
    interfaces_b: Vec<AntennaId>,
    /// Separation at evaluation time (metres)
    distance: f64,
}

impl Link {
    pub fn new(
        a: NodeId,
        interfaces_a: Vec<AntennaId>,
        b: NodeId,
        interfaces_b: Vec<AntennaId>,
        kind: LinkKind,
        distance: f64,
    ) -> Self {
        Self {
            a,
            b,
            kind,
            interfaces_a,
            interfaces_b,
            distance,
        }
    }

    pub fn endpoints(&self) -> (NodeId, NodeId) {
        (self.a, self.b)
    }

    pub fn kind(&self) -> LinkKind {
        self.kind
    }

    pub fn distance(&self) -> f64 {
        self.distance
    }

    /// The far end as seen from `node`, if `node` is an endpoint
    pub fn other(&self, node: NodeId) -> Option<NodeId> {
        if node == self.a {
            Some(self.b)
        } else if node == self.b {
            Some(self.a)
        } else {
            None
        }
    }

    pub fn connects(&self, x: NodeId, y: NodeId) -> bool {
        (self.a == x && self.b == y) || (self.a == y && self.b == x)
    }

    /// Antennas on `node`'s side that realize this link
    pub fn interfaces(&self, node: NodeId) -> &[AntennaId] {
        if node == self.a {
            &self.interfaces_a
        } else if node == self.b {
            &self.interfaces_b
        } else {
            &[]
        }
    }

    /// The same link seen from the other end
    pub fn reversed(&self) -> Self {
        Self {
            a: self.b,
            b: self.a,
            kind: self.kind,
            interfaces_a: self.interfaces_b.clone(),
            interfaces_b: self.interfaces_a.clone(),
            distance: self.distance,
        }
    }
}

impl PartialEq for Link {
    fn eq(&self, other: &Self) -> bool {
        if self.kind != other.kind || self.distance != other.distance {
            return false;
        }
        let same = self.a == other.a
            && self.b == other.b
            && self.interfaces_a == other.interfaces_a
            && self.interfaces_b == other.interfaces_b;
        let swapped = self.a == other.b
            && self.b == other.a
            && self.interfaces_a == other.interfaces_b
            && self.interfaces_b == other.interfaces_a;
        same || swapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Link {
        Link::new(
            NodeId(1),
            vec![AntennaId(10)],
            NodeId(2),
            vec![AntennaId(20), AntennaId(21)],
            LinkKind::Dish,
            1500.0,
        )
    }

    #[test]
    fn test_symmetric_equality() {
        let link = sample();
        assert_eq!(link, link.reversed());
        assert!(link.connects(NodeId(2), NodeId(1)));
    }

    #[test]
    fn test_other_and_interfaces() {
        let link = sample();
        assert_eq!(link.other(NodeId(1)), Some(NodeId(2)));
        assert_eq!(link.other(NodeId(3)), None);
        assert_eq!(link.interfaces(NodeId(2)).len(), 2);
        assert!(link.interfaces(NodeId(3)).is_empty());
    }

    #[test]
    fn test_kind_breaks_equality() {
        let a = sample();
        let b = Link::new(
            NodeId(1),
            vec![AntennaId(10)],
            NodeId(2),
            vec![AntennaId(20), AntennaId(21)],
            LinkKind::Omni,
            1500.0,
        );
        assert_ne!(a, b);
    }
}
