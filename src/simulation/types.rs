//! Core types for the evacuation simulation
//!
//! Plain value types shared by every other module.

use std::fmt;

/// An intersection or parking lot, identified by its integer grid coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Node {
    pub x: i32,
    pub y: i32,
}

impl Node {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Node) -> f64 {
        let dx = f64::from(self.x) - f64::from(other.x);
        let dy = f64::from(self.y) - f64::from(other.y);
        (dx * dx + dy * dy).sqrt()
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Identity of a vehicle for the whole run: the lot it left and its
/// departure order within that lot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VehicleId {
    pub origin: Node,
    pub sequence: u32,
}

impl fmt::Display for VehicleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.origin, self.sequence)
    }
}

/// Snapshot of a vehicle's projected state carried by one event
///
/// `from == to` means the vehicle is still parked at its origin lot and
/// holds no segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vehicle {
    pub timestamp: f64,
    pub from: Node,
    pub to: Node,
    pub id: VehicleId,
}

impl Vehicle {
    /// A vehicle waiting in its lot, about to attempt its first move
    pub fn parked(id: VehicleId, timestamp: f64) -> Self {
        Self {
            timestamp,
            from: id.origin,
            to: id.origin,
            id,
        }
    }

    pub fn is_parked(&self) -> bool {
        self.from == self.to
    }

    /// The same vehicle projected to a later instant
    pub fn at(self, timestamp: f64) -> Self {
        Self { timestamp, ..self }
    }

    /// The same vehicle committed to the segment `(self.to, next)`
    pub fn advanced(self, next: Node) -> Self {
        Self {
            from: self.to,
            to: next,
            ..self
        }
    }
}

/// Why a vehicle leaves the `Go` decision without moving on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepartReason {
    /// No legal move; retry the same segment after the waiting time
    Wait,
    /// Reached an exit node; leave the system
    Exit,
}

/// Which handler an event is dispatched to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Arrive,
    Go,
    Depart(DepartReason),
}

/// A scheduled handler invocation for one vehicle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Event {
    pub vehicle: Vehicle,
    pub kind: EventKind,
}

impl Event {
    pub fn new(vehicle: Vehicle, kind: EventKind) -> Self {
        Self { vehicle, kind }
    }

    pub fn timestamp(&self) -> f64 {
        self.vehicle.timestamp
    }
}

/// A parking lot and the intersection it empties into
#[derive(Debug, Clone, PartialEq)]
pub struct ParkingLot {
    pub node: Node,
    pub egress: Node,
    /// Total spaces
    pub capacity: u32,
}

impl ParkingLot {
    /// Number of vehicles that leave this lot for a given fill fraction
    pub fn departing(&self, fill_fraction: f64) -> u32 {
        (f64::from(self.capacity) * fill_fraction).floor() as u32
    }
}

/// Average vehicle footprint in world units (15 px at a 70/500 scale)
pub const CAR_LENGTH: f64 = 15.0 * 70.0 / 500.0;

/// Mean gap between departures from one lot
pub const DEPARTURE_MEAN: f64 = 5.0;

/// Time to traverse one segment
pub const MEAN_TRAVEL_TIME: f64 = 10.0;

/// Time a blocked vehicle waits before retrying
pub const MEAN_WAITING_TIME: f64 = 1.0;

/// How far west of the current node a no-left-turn move may go
pub const WEST_TOLERANCE: f64 = 0.0;

/// Share of each lot's spaces that are filled at the start
pub const DEFAULT_FILL_FRACTION: f64 = 0.10;

/// Safety bound on processed events
pub const MAX_ITERATIONS: u64 = 1_000_000;
