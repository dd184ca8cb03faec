//! Range models
//!
//! A range model decides whether two nodes can currently talk and, if so,
//! which antennas on each side carry the link. Both models are stateless:
//! positions, power and antenna state are read from the [`Network`] on every
//! call.
//!
//! - [`StandardRangeModel`]: each side must independently reach the other,
//!   through an omni antenna (plus the multiple-antenna bonus) or a dish
//!   pointed at it.
//! - [`AdditiveRangeModel`]: both sides' best figures are combined as
//!   `min(lo + sqrt(lo * hi), clamp * lo)`, so a strong antenna partially
//!   compensates for a weak one.

use crate::link::{Link, LinkKind};
use crate::node::{Antenna, DishTarget, Node};
use crate::settings::{NetworkSettings, RangeModelKind};
use crate::{AntennaId, Network};
use nalgebra::Vector3;

/// Connectivity policy between two nodes
pub trait RangeModel: Send + Sync {
    /// The link between `a` and `b`, if one can form right now
    fn try_link(&self, network: &Network, a: &Node, b: &Node) -> Option<Link>;
}

/// Build the model selected by `settings`
pub fn model_for(settings: &NetworkSettings) -> Box<dyn RangeModel> {
    match settings.range_model {
        RangeModelKind::Standard => Box::new(StandardRangeModel::new(
            settings.multiple_antenna_multiplier,
        )),
        RangeModelKind::Additive => Box::new(AdditiveRangeModel::new(
            settings.multiple_antenna_multiplier,
            settings.omni_clamp,
            settings.dish_clamp,
        )),
    }
}

/// Whether `antenna` (on `owner`) is pointed at `candidate`
pub fn is_targeting(network: &Network, antenna: &Antenna, owner: &Node, candidate: &Node) -> bool {
    match &antenna.target {
        DishTarget::None => false,
        DishTarget::Node { id } => *id == candidate.id,
        DishTarget::Group { members } => members.contains(&candidate.id),
        DishTarget::ActiveNode => network.active_node() == Some(candidate.id),
        DishTarget::Body { id } => network.body(*id).is_some_and(|body| {
            within_cone(
                &owner.position,
                &body.position,
                &candidate.position,
                antenna.cos_half_angle(),
            )
        }),
    }
}

/// Direction-cosine test: is `candidate` inside the cone from `origin`
/// around the direction to `aim`?
pub fn within_cone(
    origin: &Vector3<f64>,
    aim: &Vector3<f64>,
    candidate: &Vector3<f64>,
    cos_half_angle: f64,
) -> bool {
    let pointing = aim - origin;
    let direction = candidate - origin;
    let norms = pointing.norm() * direction.norm();
    if norms == 0.0 {
        return false;
    }
    pointing.dot(&direction) / norms >= cos_half_angle
}

/// Extra omni range granted to one antenna by the node's other omni antennas
fn multiple_antenna_bonus(total_omni: f64, own: f64, multiplier: f64) -> f64 {
    (total_omni - own).max(0.0) * multiplier
}

/// Combined reach of two range figures, capped at `clamp` times the weaker
pub fn combined_range(r1: f64, r2: f64, clamp: f64) -> f64 {
    if r1 <= 0.0 || r2 <= 0.0 {
        return 0.0;
    }
    let lo = r1.min(r2);
    let hi = r1.max(r2);
    (lo + (lo * hi).sqrt()).min(clamp * lo)
}

fn can_link(a: &Node, b: &Node) -> bool {
    a.id != b.id && a.powered && b.powered
}

/// Qualifying antennas on one side of a prospective link
#[derive(Debug, Default)]
struct Side {
    antennas: Vec<AntennaId>,
    via_dish: bool,
}

/// Flat per-side range comparison
#[derive(Debug, Clone)]
pub struct StandardRangeModel {
    multiplier: f64,
}

impl StandardRangeModel {
    pub fn new(multiple_antenna_multiplier: f64) -> Self {
        Self {
            multiplier: multiple_antenna_multiplier,
        }
    }

    fn qualifying(&self, network: &Network, from: &Node, to: &Node, distance: f64) -> Side {
        let antennas: Vec<&Antenna> = network.antennas_of(from).collect();
        let total_omni: f64 = antennas.iter().map(|a| a.omni()).sum();
        let mut side = Side::default();

        // One entry per antenna even when both its omni and dish qualify
        for antenna in &antennas {
            let omni = antenna.omni();
            let by_omni =
                omni > 0.0 && omni + multiple_antenna_bonus(total_omni, omni, self.multiplier) >= distance;
            let dish = antenna.dish();
            let by_dish = dish > 0.0 && dish > distance && is_targeting(network, antenna, from, to);

            if by_omni || by_dish {
                side.antennas.push(antenna.id);
            }
            side.via_dish |= by_dish;
        }

        side
    }
}

impl RangeModel for StandardRangeModel {
    fn try_link(&self, network: &Network, a: &Node, b: &Node) -> Option<Link> {
        if !can_link(a, b) {
            return None;
        }
        let distance = a.distance_to(b);

        let side_a = self.qualifying(network, a, b, distance);
        if side_a.antennas.is_empty() {
            return None;
        }
        let side_b = self.qualifying(network, b, a, distance);
        if side_b.antennas.is_empty() {
            return None;
        }

        let kind = if side_a.via_dish || side_b.via_dish {
            LinkKind::Dish
        } else {
            LinkKind::Omni
        };

        Some(Link::new(a.id, side_a.antennas, b.id, side_b.antennas, kind, distance))
    }
}

/// Best figures of one node toward a specific peer
#[derive(Debug, Default)]
struct Reach {
    omni: f64,
    omni_antennas: Vec<AntennaId>,
    dish: f64,
    dish_antennas: Vec<AntennaId>,
}

/// Geometric combination of both sides' ranges
#[derive(Debug, Clone)]
pub struct AdditiveRangeModel {
    multiplier: f64,
    omni_clamp: f64,
    dish_clamp: f64,
}

impl AdditiveRangeModel {
    pub fn new(multiple_antenna_multiplier: f64, omni_clamp: f64, dish_clamp: f64) -> Self {
        Self {
            multiplier: multiple_antenna_multiplier,
            omni_clamp,
            dish_clamp,
        }
    }

    fn reach(&self, network: &Network, from: &Node, to: &Node) -> Reach {
        let mut reach = Reach::default();
        let mut total_omni = 0.0;

        for antenna in network.antennas_of(from) {
            let omni = antenna.omni();
            if omni > 0.0 {
                total_omni += omni;
                reach.omni = reach.omni.max(omni);
                reach.omni_antennas.push(antenna.id);
            }
            let dish = antenna.dish();
            if dish > 0.0 && is_targeting(network, antenna, from, to) {
                reach.dish = reach.dish.max(dish);
                reach.dish_antennas.push(antenna.id);
            }
        }

        if reach.omni > 0.0 {
            reach.omni += multiple_antenna_bonus(total_omni, reach.omni, self.multiplier);
        }
        reach
    }
}

impl RangeModel for AdditiveRangeModel {
    fn try_link(&self, network: &Network, a: &Node, b: &Node) -> Option<Link> {
        if !can_link(a, b) {
            return None;
        }
        // Mixed pairings are asymmetric; evaluate from the lower id
        if b.id < a.id {
            return self.try_link(network, b, a).map(|link| link.reversed());
        }
        let distance = a.distance_to(b);
        let ra = self.reach(network, a, b);
        let rb = self.reach(network, b, a);

        // Omni/omni first, then any pairing that involves a dish
        let pairings = [
            (ra.omni, &ra.omni_antennas, rb.omni, &rb.omni_antennas, self.omni_clamp, LinkKind::Omni),
            (ra.omni, &ra.omni_antennas, rb.dish, &rb.dish_antennas, self.dish_clamp, LinkKind::Dish),
            (ra.dish, &ra.dish_antennas, rb.omni, &rb.omni_antennas, self.dish_clamp, LinkKind::Dish),
            (ra.dish, &ra.dish_antennas, rb.dish, &rb.dish_antennas, self.dish_clamp, LinkKind::Dish),
        ];

        // Bound before returning: the iterator borrows `ra` and `rb`
        let link = pairings
            .into_iter()
            .find(|(r1, _, r2, _, clamp, _)| combined_range(*r1, *r2, *clamp) >= distance)
            .map(|(_, side_a, _, side_b, _, kind)| {
                Link::new(a.id, side_a.clone(), b.id, side_b.clone(), kind, distance)
            });
        link
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{AntennaSpec, NodeSpec};
    use crate::NodeId;

    const KM: f64 = 1000.0;

    fn pair(settings: NetworkSettings, separation: f64) -> (Network, NodeId, NodeId) {
        let mut network = Network::new(settings);
        let body = network.add_body("Kerbin", Vector3::zeros());
        let a = network.add_node(NodeSpec::satellite("A", Vector3::new(0.0, 0.0, 0.0), body));
        let b = network.add_node(NodeSpec::satellite("B", Vector3::new(separation, 0.0, 0.0), body));
        (network, a, b)
    }

    fn link(network: &Network, a: NodeId, b: NodeId) -> Option<Link> {
        network.find_link(a, b)
    }

    #[test]
    fn test_combined_range() {
        assert_eq!(combined_range(0.0, 100.0, 10.0), 0.0);
        // lo = 100, hi = 400: 100 + 200 = 300
        assert_eq!(combined_range(100.0, 400.0, 10.0), 300.0);
        // clamp bites: 1 + sqrt(1e6) = 1001 > 10 * 1
        assert_eq!(combined_range(1.0, 1.0e6, 10.0), 10.0);
        assert_eq!(combined_range(400.0, 100.0, 10.0), combined_range(100.0, 400.0, 10.0));
    }

    #[test]
    fn test_within_cone() {
        let origin = Vector3::zeros();
        let aim = Vector3::new(10.0, 0.0, 0.0);
        let cos5 = 5.0_f64.to_radians().cos();
        assert!(within_cone(&origin, &aim, &Vector3::new(100.0, 1.0, 0.0), cos5));
        assert!(!within_cone(&origin, &aim, &Vector3::new(0.0, 100.0, 0.0), cos5));
        assert!(!within_cone(&origin, &origin, &Vector3::new(1.0, 0.0, 0.0), cos5));
    }

    #[test]
    fn test_standard_omni_link() {
        let (mut network, a, b) = pair(NetworkSettings::default(), 1500.0 * KM);
        network.add_antenna(a, AntennaSpec::omni(2000.0 * KM)).unwrap();
        network.add_antenna(b, AntennaSpec::omni(2000.0 * KM)).unwrap();

        let found = link(&network, a, b).unwrap();
        assert_eq!(found.kind(), LinkKind::Omni);
        assert_eq!(found.interfaces(a).len(), 1);
    }

    #[test]
    fn test_standard_requires_both_sides() {
        let (mut network, a, b) = pair(NetworkSettings::default(), 1500.0 * KM);
        network.add_antenna(a, AntennaSpec::omni(2000.0 * KM)).unwrap();
        network.add_antenna(b, AntennaSpec::omni(1000.0 * KM)).unwrap();

        assert!(link(&network, a, b).is_none());
    }

    #[test]
    fn test_standard_asymmetric_dish_and_omni() {
        // A only reaches B through its dish; B reaches A through its omni
        let (mut network, a, b) = pair(NetworkSettings::default(), 5000.0 * KM);
        network.add_antenna(a, AntennaSpec::omni(100.0 * KM)).unwrap();
        let dish = network
            .add_antenna(a, AntennaSpec::dish(50_000.0 * KM, DishTarget::Node { id: b }))
            .unwrap();
        network.add_antenna(b, AntennaSpec::omni(6000.0 * KM)).unwrap();

        let found = link(&network, a, b).unwrap();
        assert_eq!(found.kind(), LinkKind::Dish);
        assert_eq!(found.interfaces(a), &[dish]);
    }

    #[test]
    fn test_standard_dish_range_must_exceed_distance() {
        let (mut network, a, b) = pair(NetworkSettings::default(), 5000.0 * KM);
        let dish = network
            .add_antenna(a, AntennaSpec::dish(5000.0 * KM, DishTarget::Node { id: b }))
            .unwrap();
        network.add_antenna(b, AntennaSpec::omni(6000.0 * KM)).unwrap();
        assert!(link(&network, a, b).is_none());

        network.set_activated(dish, false).unwrap();
        network
            .add_antenna(a, AntennaSpec::dish(5001.0 * KM, DishTarget::Node { id: b }))
            .unwrap();
        assert!(link(&network, a, b).is_some());
    }

    #[test]
    fn test_standard_dual_mode_antenna_listed_once() {
        let (mut network, a, b) = pair(NetworkSettings::default(), 1000.0 * KM);
        let combo = network
            .add_antenna(
                a,
                AntennaSpec {
                    omni_range: 2000.0 * KM,
                    ..AntennaSpec::dish(5000.0 * KM, DishTarget::Node { id: b })
                },
            )
            .unwrap();
        network.add_antenna(b, AntennaSpec::omni(2000.0 * KM)).unwrap();

        let found = link(&network, a, b).unwrap();
        assert_eq!(found.kind(), LinkKind::Dish);
        assert_eq!(found.interfaces(a), &[combo]);
    }

    #[test]
    fn test_standard_dish_must_target() {
        let (mut network, a, b) = pair(NetworkSettings::default(), 5000.0 * KM);
        network.add_antenna(a, AntennaSpec::dish(50_000.0 * KM, DishTarget::None)).unwrap();
        network.add_antenna(b, AntennaSpec::omni(6000.0 * KM)).unwrap();

        assert!(link(&network, a, b).is_none());
    }

    #[test]
    fn test_standard_multiple_antenna_bonus() {
        let settings = NetworkSettings::default().with_multiplier(0.5);
        let (mut network, a, b) = pair(settings, 1200.0 * KM);
        // 1000 + 0.5 * 500 = 1250 >= 1200
        network.add_antenna(a, AntennaSpec::omni(1000.0 * KM)).unwrap();
        network.add_antenna(a, AntennaSpec::omni(500.0 * KM)).unwrap();
        network.add_antenna(b, AntennaSpec::omni(2000.0 * KM)).unwrap();

        let found = link(&network, a, b).unwrap();
        assert_eq!(found.interfaces(a).len(), 1);

        network.set_settings(NetworkSettings::default());
        assert!(link(&network, a, b).is_none());
    }

    #[test]
    fn test_broadcast_group_target() {
        let (mut network, a, b) = pair(NetworkSettings::default(), 5000.0 * KM);
        network
            .add_antenna(
                a,
                AntennaSpec::dish(10_000.0 * KM, DishTarget::Group { members: vec![NodeId(99), b] }),
            )
            .unwrap();
        network.add_antenna(b, AntennaSpec::omni(6000.0 * KM)).unwrap();

        assert!(link(&network, a, b).is_some());
    }

    #[test]
    fn test_body_cone_target() {
        let mut network = Network::new(NetworkSettings::default());
        let home = network.add_body("Kerbin", Vector3::zeros());
        let moon = network.add_body("Mun", Vector3::new(12_000.0 * KM, 0.0, 0.0));
        let a = network.add_node(NodeSpec::satellite("A", Vector3::new(-1000.0 * KM, 0.0, 0.0), home));
        let near_moon = network.add_node(NodeSpec::satellite("B", Vector3::new(12_000.0 * KM, 300.0 * KM, 0.0), moon));
        let off_axis = network.add_node(NodeSpec::satellite("C", Vector3::new(-1000.0 * KM, 9000.0 * KM, 0.0), home));

        network
            .add_antenna(a, AntennaSpec::dish(50_000.0 * KM, DishTarget::Body { id: moon }).with_cone(10.0))
            .unwrap();
        network.add_antenna(near_moon, AntennaSpec::dish(50_000.0 * KM, DishTarget::Node { id: a })).unwrap();
        network.add_antenna(off_axis, AntennaSpec::dish(50_000.0 * KM, DishTarget::Node { id: a })).unwrap();

        assert!(link(&network, a, near_moon).is_some());
        assert!(link(&network, a, off_axis).is_none());
    }

    #[test]
    fn test_active_node_target() {
        let (mut network, a, b) = pair(NetworkSettings::default(), 5000.0 * KM);
        network.add_antenna(a, AntennaSpec::dish(10_000.0 * KM, DishTarget::ActiveNode)).unwrap();
        network.add_antenna(b, AntennaSpec::omni(6000.0 * KM)).unwrap();

        assert!(link(&network, a, b).is_none());
        network.set_active_node(Some(b));
        assert!(link(&network, a, b).is_some());
    }

    #[test]
    fn test_unpowered_and_self_links() {
        let (mut network, a, b) = pair(NetworkSettings::default(), 1000.0 * KM);
        network.add_antenna(a, AntennaSpec::omni(2000.0 * KM)).unwrap();
        network.add_antenna(b, AntennaSpec::omni(2000.0 * KM)).unwrap();

        assert!(link(&network, a, a).is_none());
        network.set_powered(b, false).unwrap();
        assert!(link(&network, a, b).is_none());
    }

    #[test]
    fn test_additive_weak_strong_omni() {
        // 500 + sqrt(500 * 4500) = 2000 km reach
        let (mut network, a, b) = pair(NetworkSettings::additive(), 1900.0 * KM);
        network.add_antenna(a, AntennaSpec::omni(500.0 * KM)).unwrap();
        network.add_antenna(b, AntennaSpec::omni(4500.0 * KM)).unwrap();

        let found = link(&network, a, b).unwrap();
        assert_eq!(found.kind(), LinkKind::Omni);

        // Standard rejects it: A's omni alone is far too short
        network.set_settings(NetworkSettings::default());
        assert!(link(&network, a, b).is_none());
    }

    #[test]
    fn test_additive_dish_pairing() {
        let (mut network, a, b) = pair(NetworkSettings::additive(), 40_000.0 * KM);
        network.add_antenna(a, AntennaSpec::dish(30_000.0 * KM, DishTarget::Node { id: b })).unwrap();
        network.add_antenna(b, AntennaSpec::dish(30_000.0 * KM, DishTarget::Node { id: a })).unwrap();

        // 30k + 30k = 60k km combined
        let found = link(&network, a, b).unwrap();
        assert_eq!(found.kind(), LinkKind::Dish);
    }

    #[test]
    fn test_additive_mixed_pairing_is_direction_independent() {
        // omni/omni reaches 2000 km; both omni/dish pairings reach ~4162 km
        let (mut network, a, b) = pair(NetworkSettings::additive(), 3000.0 * KM);
        let a_omni = network.add_antenna(a, AntennaSpec::omni(1000.0 * KM)).unwrap();
        network
            .add_antenna(a, AntennaSpec::dish(10_000.0 * KM, DishTarget::Node { id: b }))
            .unwrap();
        network.add_antenna(b, AntennaSpec::omni(1000.0 * KM)).unwrap();
        let b_dish = network
            .add_antenna(b, AntennaSpec::dish(10_000.0 * KM, DishTarget::Node { id: a }))
            .unwrap();

        let forward = link(&network, a, b).unwrap();
        let backward = link(&network, b, a).unwrap();
        assert_eq!(forward, backward);
        assert_eq!(forward.kind(), LinkKind::Dish);
        assert_eq!(forward.interfaces(a), &[a_omni]);
        assert_eq!(forward.interfaces(b), &[b_dish]);

        assert_eq!(backward.endpoints(), (b, a));
        assert_eq!(backward.interfaces(a), &[a_omni]);
        assert_eq!(network.find_neighbors(b)[0], forward);
    }

    #[test]
    fn test_additive_out_of_reach() {
        let (mut network, a, b) = pair(NetworkSettings::additive(), 3000.0 * KM);
        network.add_antenna(a, AntennaSpec::omni(500.0 * KM)).unwrap();
        network.add_antenna(b, AntennaSpec::omni(4500.0 * KM)).unwrap();

        assert!(link(&network, a, b).is_none());
    }
}
