//! Routing policy candidate selection

mod common;

use common::street;
use evac_sim::simulation::{
    CapacityLedger, NearestExit, Node, NoLeftTurn, PolicyKind, RoadNetwork, RoutingPolicy,
    SimError, Unrestricted,
};

const CENTER: Node = Node { x: 0, y: 0 };
const NORTH: Node = Node { x: 0, y: 10 };
const EAST: Node = Node { x: 10, y: 0 };
const SOUTH: Node = Node { x: 0, y: -10 };
const WEST: Node = Node { x: -10, y: 0 };

/// A plus-shaped junction; every segment holds exactly one vehicle
fn junction() -> RoadNetwork {
    RoadNetwork::from_records(
        &[
            street((0, 0), (0, 10), 1),
            street((0, 0), (10, 0), 1),
            street((0, 0), (0, -10), 1),
            street((0, 0), (-10, 0), 1),
        ],
        10.0,
    )
    .unwrap()
}

fn sorted_next(
    policy: &dyn RoutingPolicy,
    from: Node,
    to: Node,
    network: &RoadNetwork,
    ledger: &CapacityLedger,
) -> Vec<Node> {
    let mut next: Vec<Node> = policy
        .candidates(from, to, network, ledger)
        .into_iter()
        .map(|candidate| candidate.next)
        .collect();
    next.sort();
    next
}

#[test]
fn test_unrestricted_returns_every_open_segment() {
    let network = junction();
    let mut ledger = CapacityLedger::new(&network);

    let all = sorted_next(&Unrestricted, WEST, CENTER, &network, &ledger);
    let mut expected = vec![NORTH, EAST, SOUTH, WEST];
    expected.sort();
    assert_eq!(all, expected);

    ledger.reserve(&network, CENTER, NORTH).unwrap();
    let open = sorted_next(&Unrestricted, WEST, CENTER, &network, &ledger);
    assert!(!open.contains(&NORTH));
    assert_eq!(open.len(), 3);

    let candidates = Unrestricted.candidates(WEST, CENTER, &network, &ledger);
    assert!(candidates.iter().all(|candidate| candidate.available == 1));
}

#[test]
fn test_no_left_turn_keeps_eastward_and_straight_moves() {
    let network = junction();
    let ledger = CapacityLedger::new(&network);

    let policy = NoLeftTurn::new(0.0);
    let mut expected = vec![NORTH, EAST, SOUTH];
    expected.sort();
    assert_eq!(sorted_next(&policy, WEST, CENTER, &network, &ledger), expected);

    // Heading west back from the east is not allowed, but a U-turn east is
    let from_east = sorted_next(&policy, EAST, CENTER, &network, &ledger);
    assert!(from_east.contains(&EAST));
    assert!(!from_east.contains(&WEST));
}

#[test]
fn test_no_left_turn_tolerance_admits_west() {
    let network = junction();
    let ledger = CapacityLedger::new(&network);

    let policy = NoLeftTurn::new(10.0);
    assert_eq!(sorted_next(&policy, EAST, CENTER, &network, &ledger).len(), 4);
}

#[test]
fn test_nearest_exit_picks_closest_neighbour() {
    let network = junction();
    let ledger = CapacityLedger::new(&network);
    let policy = NearestExit::new(vec![Node::new(30, 0), Node::new(-100, 0)]);

    let candidates = policy.candidates(WEST, CENTER, &network, &ledger);
    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].next, EAST);
}

#[test]
fn test_nearest_exit_never_turns_back() {
    let network = junction();
    let ledger = CapacityLedger::new(&network);
    let policy = NearestExit::new(vec![Node::new(30, 0)]);

    // EAST is closest but is where the vehicle came from
    let candidates = policy.candidates(EAST, CENTER, &network, &ledger);
    assert_eq!(candidates.len(), 1);
    assert!(candidates[0].next == NORTH || candidates[0].next == SOUTH);
}

#[test]
fn test_nearest_exit_skips_full_segments() {
    let network = junction();
    let mut ledger = CapacityLedger::new(&network);
    let policy = NearestExit::new(vec![Node::new(30, 0)]);

    ledger.reserve(&network, CENTER, EAST).unwrap();
    let candidates = policy.candidates(WEST, CENTER, &network, &ledger);
    assert_eq!(candidates.len(), 1);
    assert!(candidates[0].next == NORTH || candidates[0].next == SOUTH);
}

#[test]
fn test_empty_candidates_when_everything_is_full() {
    let network = junction();
    let mut ledger = CapacityLedger::new(&network);
    for next in [NORTH, EAST, SOUTH, WEST] {
        ledger.reserve(&network, CENTER, next).unwrap();
    }

    for kind in [PolicyKind::NearestExit, PolicyKind::NoLeftTurn, PolicyKind::Unrestricted] {
        let policy = kind.build(&[Node::new(30, 0)], 0.0);
        assert!(policy.candidates(WEST, CENTER, &network, &ledger).is_empty());
        assert_eq!(policy.kind(), kind);
    }
}

#[test]
fn test_policy_kind_from_str() {
    assert_eq!("nearest-exit".parse::<PolicyKind>().unwrap(), PolicyKind::NearestExit);
    assert_eq!("no-left-turn".parse::<PolicyKind>().unwrap(), PolicyKind::NoLeftTurn);
    assert_eq!(" Unrestricted ".parse::<PolicyKind>().unwrap(), PolicyKind::Unrestricted);

    let err = "police".parse::<PolicyKind>().unwrap_err();
    assert!(matches!(err, SimError::UnknownRoutingPolicy(ref name) if name == "police"));
    assert_eq!(PolicyKind::NoLeftTurn.to_string(), "no-left-turn");
}
