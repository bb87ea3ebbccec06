//! Evacuation simulation core
//!
//! Discrete-event simulation of vehicles leaving parking lots and moving
//! through a capacity-constrained road network until they reach an exit.

mod arrivals;
mod capacity;
mod config;
mod error;
mod metrics;
mod road_network;
mod routing;
mod scheduler;
mod topology;
mod types;
mod world;

pub use arrivals::{exponential_gap, generate_departures, lot_departures};
pub use capacity::CapacityLedger;
pub use config::SimConfig;
pub use error::{SimError, SimResult};
pub use metrics::{
    export_to_dir, write_capacity_csv, write_exit_counts_csv, write_paths_csv, CapacitySample,
    RunSummary, SimMetrics,
};
pub use road_network::{RoadNetwork, Segment, SegmentId, SegmentKind};
pub use routing::{Candidate, NearestExit, NoLeftTurn, PolicyKind, RoutingPolicy, Unrestricted};
pub use scheduler::EventScheduler;
pub use topology::{demo_world, load_world_file, load_world_reader, TopologyRecord};
pub use types::{
    DepartReason, Event, EventKind, Node, ParkingLot, Vehicle, VehicleId, CAR_LENGTH,
    DEFAULT_FILL_FRACTION, DEPARTURE_MEAN, MAX_ITERATIONS, MEAN_TRAVEL_TIME, MEAN_WAITING_TIME,
    WEST_TOLERANCE,
};
pub use world::SimWorld;
