//! Departure generation from parking lots

mod common;

use common::{parking, street};
use evac_sim::simulation::{
    exponential_gap, generate_departures, lot_departures, EventKind, Node, ParkingLot,
    RoadNetwork, CAR_LENGTH,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn lot(capacity: u32) -> ParkingLot {
    ParkingLot {
        node: Node::new(0, -10),
        egress: Node::new(0, 0),
        capacity,
    }
}

#[test]
fn test_departure_count_is_floored() {
    let mut rng = StdRng::seed_from_u64(1);
    assert_eq!(lot_departures(&lot(10), 0.25, 5.0, &mut rng).len(), 2);
    assert_eq!(lot_departures(&lot(10), 1.0, 5.0, &mut rng).len(), 10);
    assert_eq!(lot_departures(&lot(1200), 0.10, 5.0, &mut rng).len(), 120);
}

#[test]
fn test_empty_lot_generates_nothing() {
    let mut rng = StdRng::seed_from_u64(1);
    assert!(lot_departures(&lot(5), 0.1, 5.0, &mut rng).is_empty());
    assert!(lot_departures(&lot(500), 0.0, 5.0, &mut rng).is_empty());
    assert!(lot_departures(&lot(0), 1.0, 5.0, &mut rng).is_empty());
}

#[test]
fn test_departures_are_parked_go_events_in_time_order() {
    let mut rng = StdRng::seed_from_u64(9);
    let events = lot_departures(&lot(40), 1.0, 5.0, &mut rng);

    let mut last = 0.0;
    for (sequence, event) in events.iter().enumerate() {
        assert_eq!(event.kind, EventKind::Go);
        assert!(event.vehicle.is_parked());
        assert_eq!(event.vehicle.from, Node::new(0, -10));
        assert_eq!(event.vehicle.id.origin, Node::new(0, -10));
        assert_eq!(event.vehicle.id.sequence, sequence as u32);
        assert!(event.timestamp() >= last);
        last = event.timestamp();
    }
}

#[test]
fn test_exponential_gap_mean() {
    let mut rng = StdRng::seed_from_u64(2024);
    let samples = 20_000;
    let total: f64 = (0..samples).map(|_| exponential_gap(&mut rng, 5.0)).sum();
    let mean = total / samples as f64;
    assert!((mean - 5.0).abs() < 0.3, "sample mean {mean} too far from 5.0");
}

#[test]
fn test_exponential_gap_is_never_negative() {
    let mut rng = StdRng::seed_from_u64(3);
    assert!((0..1000).all(|_| {
        let gap = exponential_gap(&mut rng, 2.0);
        gap.is_finite() && gap >= 0.0
    }));
}

#[test]
fn test_generate_departures_covers_every_lot_deterministically() {
    let network = RoadNetwork::from_records(
        &[
            street((0, 0), (100, 0), 2),
            parking((0, -10), (0, 0), 30),
            parking((100, -10), (100, 0), 20),
            parking((50, -10), (100, 0), 3),
        ],
        CAR_LENGTH,
    )
    .unwrap();

    let first = generate_departures(&network, 0.5, 5.0, &mut StdRng::seed_from_u64(11));
    let second = generate_departures(&network, 0.5, 5.0, &mut StdRng::seed_from_u64(11));

    // 15 + 10 + floor(1.5)
    assert_eq!(first.len(), 26);
    assert_eq!(first, second);

    let from_small_lot = first
        .iter()
        .filter(|event| event.vehicle.id.origin == Node::new(50, -10))
        .count();
    assert_eq!(from_small_lot, 1);
}
