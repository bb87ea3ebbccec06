//! Simulation runner that ties everything together
//!
//! `SimWorld` owns the network, the capacity ledger, the event queue, the
//! routing policy and the metrics recorder. Every handler runs to
//! completion on the calling thread before the next event is popped.

use log::{debug, info, trace, warn};
use rand::rngs::StdRng;
use rand::Rng;
use rand::SeedableRng;
use std::collections::HashSet;

use super::arrivals::generate_departures;
use super::capacity::CapacityLedger;
use super::config::SimConfig;
use super::error::{SimError, SimResult};
use super::metrics::{RunSummary, SimMetrics};
use super::road_network::RoadNetwork;
use super::routing::{PolicyKind, RoutingPolicy};
use super::scheduler::EventScheduler;
use super::types::{DepartReason, Event, EventKind, Node, Vehicle, VehicleId};

/// The main simulation world
pub struct SimWorld {
    network: RoadNetwork,
    ledger: CapacityLedger,
    scheduler: EventScheduler,
    policy: Box<dyn RoutingPolicy>,
    config: SimConfig,
    exits: HashSet<Node>,
    metrics: SimMetrics,

    /// Optional seeded RNG for reproducible simulations
    rng: Option<StdRng>,
}

impl SimWorld {
    fn new_internal(
        network: RoadNetwork,
        config: SimConfig,
        policy: Box<dyn RoutingPolicy>,
        rng: Option<StdRng>,
    ) -> SimResult<Self> {
        config.validate()?;
        if let Some(missing) = config.exits.iter().find(|exit| !network.contains(**exit)) {
            return Err(SimError::UnknownExitNode(*missing));
        }
        if config.exits.is_empty() {
            warn!("No exit nodes configured; vehicles can only leave via the iteration cap");
        }

        let ledger = CapacityLedger::new(&network);
        let metrics = SimMetrics::new(&config.exits);
        let exits = config.exits.iter().copied().collect();

        Ok(Self {
            network,
            ledger,
            scheduler: EventScheduler::new(),
            policy,
            config,
            exits,
            metrics,
            rng,
        })
    }

    pub fn new(network: RoadNetwork, config: SimConfig, policy: PolicyKind) -> SimResult<Self> {
        let policy = policy.build(&config.exits, config.west_tolerance);
        Self::new_internal(network, config, policy, None)
    }

    /// Create a new SimWorld with a seeded RNG for reproducible simulations
    pub fn new_with_seed(
        network: RoadNetwork,
        config: SimConfig,
        policy: PolicyKind,
        seed: u64,
    ) -> SimResult<Self> {
        let policy = policy.build(&config.exits, config.west_tolerance);
        Self::new_internal(network, config, policy, Some(StdRng::seed_from_u64(seed)))
    }

    /// Create a SimWorld around a caller-supplied routing policy
    pub fn with_policy(
        network: RoadNetwork,
        config: SimConfig,
        policy: Box<dyn RoutingPolicy>,
        seed: Option<u64>,
    ) -> SimResult<Self> {
        Self::new_internal(network, config, policy, seed.map(StdRng::seed_from_u64))
    }

    /// Pick a uniformly random index below `len`, using seeded RNG if available
    fn random_index(&mut self, len: usize) -> usize {
        match &mut self.rng {
            Some(rng) => rng.random_range(0..len),
            None => rand::rng().random_range(0..len),
        }
    }

    /// Draws departures for every parking lot and queues their `Go` events
    ///
    /// Returns the number of vehicles generated.
    pub fn seed_departures(&mut self) -> usize {
        let fill = self.config.fill_fraction;
        let mean = self.config.departure_mean;
        let events = match &mut self.rng {
            Some(rng) => generate_departures(&self.network, fill, mean, rng),
            None => generate_departures(&self.network, fill, mean, &mut rand::rng()),
        };

        let count = events.len();
        for event in events {
            self.metrics.record_vehicle(event.vehicle.id);
            self.scheduler.schedule(event);
        }
        info!(
            "Seeded {} departures across {} parking lots",
            count,
            self.network.parking_lots().count()
        );
        count
    }

    /// Adds one parked vehicle that attempts its first move at `timestamp`
    pub fn add_vehicle(&mut self, id: VehicleId, timestamp: f64) {
        self.metrics.record_vehicle(id);
        self.scheduler
            .schedule(Event::new(Vehicle::parked(id, timestamp), EventKind::Go));
    }

    /// Processes the earliest pending event
    ///
    /// Returns the handled event, or `None` when the queue is empty.
    pub fn step(&mut self) -> SimResult<Option<Event>> {
        let Some(event) = self.scheduler.pop_next() else {
            return Ok(None);
        };

        match event.kind {
            EventKind::Arrive => self.arrive(event.vehicle),
            EventKind::Go => self.go(event.vehicle)?,
            EventKind::Depart(reason) => self.depart(event.vehicle, reason)?,
        }

        self.metrics.processed_events += 1;
        self.metrics
            .record_capacity(event.timestamp(), self.ledger.total_free());
        Ok(Some(event))
    }

    /// Runs until the queue drains or the iteration cap is hit
    pub fn run(&mut self) -> SimResult<RunSummary> {
        while !self.scheduler.is_empty() {
            if self.metrics.processed_events >= self.config.max_iterations {
                self.metrics.truncated = true;
                let next_time = self.scheduler.peek().map_or(0.0, Event::timestamp);
                warn!(
                    "Iteration cap of {} reached with {} events pending (next at t={:.2})",
                    self.config.max_iterations,
                    self.scheduler.len(),
                    next_time
                );
                break;
            }
            self.step()?;
        }

        let summary = self.metrics.summary();
        summary.log();
        Ok(summary)
    }

    /// The vehicle is on `(from, to)` and reaches `to` after the travel time
    fn arrive(&mut self, vehicle: Vehicle) {
        let at = vehicle.timestamp + self.config.travel_time;
        self.scheduler
            .schedule(Event::new(vehicle.at(at), EventKind::Go));
    }

    /// The vehicle stands at `to` and decides what to do next
    fn go(&mut self, vehicle: Vehicle) -> SimResult<()> {
        if self.exits.contains(&vehicle.to) {
            self.scheduler.schedule(Event::new(
                vehicle,
                EventKind::Depart(DepartReason::Exit),
            ));
            return Ok(());
        }

        let candidates =
            self.policy
                .candidates(vehicle.from, vehicle.to, &self.network, &self.ledger);
        if candidates.is_empty() {
            trace!("Vehicle {} blocked at {}", vehicle.id, vehicle.to);
            self.scheduler.schedule(Event::new(
                vehicle,
                EventKind::Depart(DepartReason::Wait),
            ));
            return Ok(());
        }

        let next = candidates[self.random_index(candidates.len())].next;

        // Commit in the same handler as the probe
        self.ledger.reserve(&self.network, vehicle.to, next)?;
        if !vehicle.is_parked() {
            self.ledger
                .release(&self.network, vehicle.from, vehicle.to)?;
        }
        self.metrics.record_move(vehicle.id, next);

        trace!("Vehicle {} moves {} -> {}", vehicle.id, vehicle.to, next);
        self.scheduler.schedule(Event::new(
            vehicle.advanced(next),
            EventKind::Arrive,
        ));
        Ok(())
    }

    /// Removes an exiting vehicle, or sends a blocked one back to retry
    ///
    /// A waiting vehicle keeps its reservation on `(from, to)` instead of
    /// releasing it. It is still physically on that segment, and the retry
    /// goes straight to `Arrive` without probing the segment again, so a
    /// release here could let the segment fill past its capacity.
    fn depart(&mut self, vehicle: Vehicle, reason: DepartReason) -> SimResult<()> {
        match reason {
            DepartReason::Exit => {
                if !vehicle.is_parked() {
                    self.ledger
                        .release(&self.network, vehicle.from, vehicle.to)?;
                }
                self.metrics.record_exit(vehicle.to);
                debug!(
                    "Vehicle {} exited at {} (t={:.2})",
                    vehicle.id, vehicle.to, vehicle.timestamp
                );
            }
            DepartReason::Wait => {
                let at = vehicle.timestamp + self.config.waiting_time;
                self.scheduler
                    .schedule(Event::new(vehicle.at(at), EventKind::Arrive));
            }
        }
        Ok(())
    }

    pub fn network(&self) -> &RoadNetwork {
        &self.network
    }

    pub fn ledger(&self) -> &CapacityLedger {
        &self.ledger
    }

    pub fn scheduler(&self) -> &EventScheduler {
        &self.scheduler
    }

    pub fn metrics(&self) -> &SimMetrics {
        &self.metrics
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn policy_kind(&self) -> PolicyKind {
        self.policy.kind()
    }

    pub fn summary(&self) -> RunSummary {
        self.metrics.summary()
    }

    /// Print a summary of the world state
    pub fn print_summary(&self) {
        println!("=== Evacuation Simulation ===");
        println!("Policy: {}", self.policy.kind());
        println!(
            "Nodes: {}, Segments: {}, Parking lots: {}",
            self.network.node_count(),
            self.network.segment_count(),
            self.network.parking_lots().count()
        );
        println!(
            "Capacity: {} free of {}",
            self.ledger.total_free(),
            self.network.total_capacity()
        );
        println!("Pending events: {}", self.scheduler.len());
        self.metrics.summary().print();
    }
}
