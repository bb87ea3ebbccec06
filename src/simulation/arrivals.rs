//! Initial departures from parking lots
//!
//! Each lot releases `floor(capacity * fill_fraction)` vehicles spaced by
//! exponentially distributed gaps. Every vehicle starts parked and gets a
//! `Go` event at its departure time, so leaving the lot goes through the
//! same routing path as any other move.

use rand::Rng;

use super::road_network::RoadNetwork;
use super::types::{Event, EventKind, ParkingLot, Vehicle, VehicleId};

/// Samples one exponential gap with the given mean by inverse transform
pub fn exponential_gap<R: Rng + ?Sized>(rng: &mut R, mean: f64) -> f64 {
    let u: f64 = rng.random();
    // 1 - u lies in (0, 1], so the log is finite
    -mean * (1.0 - u).ln()
}

/// Departure events for a single lot, in time order
pub fn lot_departures<R: Rng + ?Sized>(
    lot: &ParkingLot,
    fill_fraction: f64,
    departure_mean: f64,
    rng: &mut R,
) -> Vec<Event> {
    let count = lot.departing(fill_fraction);
    let mut timestamp = 0.0;
    (0..count)
        .map(|sequence| {
            timestamp += exponential_gap(rng, departure_mean);
            let id = VehicleId {
                origin: lot.node,
                sequence,
            };
            Event::new(Vehicle::parked(id, timestamp), EventKind::Go)
        })
        .collect()
}

/// Departure events for every lot in the network, lots visited in
/// coordinate order
pub fn generate_departures<R: Rng + ?Sized>(
    network: &RoadNetwork,
    fill_fraction: f64,
    departure_mean: f64,
    rng: &mut R,
) -> Vec<Event> {
    let mut events = Vec::new();
    for lot in network.parking_lots() {
        let departures = lot_departures(lot, fill_fraction, departure_mean, rng);
        log::debug!(
            "Lot {} ({} spaces) releases {} vehicles",
            lot.node,
            lot.capacity,
            departures.len()
        );
        events.extend(departures);
    }
    events
}
