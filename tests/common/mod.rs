#![allow(dead_code)]

use std::collections::HashSet;

use evac_sim::simulation::{
    Node, PolicyKind, RoadNetwork, SegmentKind, SimConfig, SimWorld, TopologyRecord, VehicleId,
};

pub fn street(a: (i32, i32), b: (i32, i32), lanes: u32) -> TopologyRecord {
    TopologyRecord::Street {
        a: Node::new(a.0, a.1),
        b: Node::new(b.0, b.1),
        lanes,
    }
}

pub fn parking(lot: (i32, i32), egress: (i32, i32), capacity: u32) -> TopologyRecord {
    TopologyRecord::Parking {
        lot: Node::new(lot.0, lot.1),
        egress: Node::new(egress.0, egress.1),
        capacity,
    }
}

/// One lot of ten spaces feeding a single two-lane street whose far end is the exit
pub fn two_node_world(fill_fraction: f64, seed: u64) -> SimWorld {
    let records = vec![
        street((0, 0), (100, 0), 2),
        parking((0, -20), (0, 0), 10),
    ];
    let config = SimConfig {
        fill_fraction,
        ..SimConfig::with_exits(vec![Node::new(100, 0)])
    };
    let network = RoadNetwork::from_records(&records, config.car_length).unwrap();
    SimWorld::new_with_seed(network, config, PolicyKind::Unrestricted, seed).unwrap()
}

pub fn vehicle(origin: (i32, i32), sequence: u32) -> VehicleId {
    VehicleId {
        origin: Node::new(origin.0, origin.1),
        sequence,
    }
}

/// Panics if any segment is over capacity or any vehicle has more than one pending event
pub fn assert_invariants(world: &SimWorld) {
    for (occupancy, capacity) in world.ledger().snapshot() {
        assert!(
            occupancy <= capacity,
            "occupancy {} exceeds capacity {}",
            occupancy,
            capacity
        );
    }

    let mut seen = HashSet::new();
    for event in world.scheduler().pending() {
        assert!(
            seen.insert(event.vehicle.id),
            "vehicle {} has more than one pending event",
            event.vehicle.id
        );
    }

    // Every live vehicle on a street holds exactly one slot; lots and their exits hold none
    let network = world.network();
    let holding = world
        .scheduler()
        .pending()
        .filter_map(|event| network.find_segment(event.vehicle.from, event.vehicle.to))
        .filter(|id| network.segment(*id).map(|segment| segment.kind) == Some(SegmentKind::Street))
        .count() as u64;
    assert_eq!(world.ledger().total_occupied(), holding);
}

/// Steps to completion, checking invariants after every event
pub fn run_checked(world: &mut SimWorld) {
    let cap = world.config().max_iterations;
    while world.metrics().processed_events < cap {
        match world.step().unwrap() {
            Some(_) => assert_invariants(world),
            None => break,
        }
    }
}
