//! Routing policies
//!
//! A policy looks at the segments leaving a vehicle's current node and
//! proposes where it may go next. Policies are local and greedy; picking
//! among several candidates is left to the caller.

use ordered_float::OrderedFloat;
use std::fmt;
use std::str::FromStr;

use super::capacity::CapacityLedger;
use super::error::SimError;
use super::road_network::RoadNetwork;
use super::types::Node;

/// A segment the vehicle could enter next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    pub next: Node,
    /// Free slots on `(to, next)` at probe time
    pub available: u32,
}

/// Strategy for choosing a vehicle's next segment
pub trait RoutingPolicy {
    /// Proposes moves for a vehicle on `(from, to)`
    ///
    /// Only segments the ledger reports open are returned. An empty
    /// result means the vehicle has no legal move right now.
    fn candidates(
        &self,
        from: Node,
        to: Node,
        network: &RoadNetwork,
        ledger: &CapacityLedger,
    ) -> Vec<Candidate>;

    fn kind(&self) -> PolicyKind;
}

/// Downstream segments from `to` that a vehicle may enter now
fn open_segments(to: Node, network: &RoadNetwork, ledger: &CapacityLedger) -> Vec<Candidate> {
    network
        .downstream(to)
        .filter(|(_, id)| ledger.is_open(*id))
        .map(|(next, id)| Candidate {
            next,
            available: ledger.available_on(id),
        })
        .collect()
}

/// Heads for whichever open neighbour is closest to any exit, never
/// turning straight back
#[derive(Debug, Clone)]
pub struct NearestExit {
    exits: Vec<Node>,
}

impl NearestExit {
    pub fn new(exits: Vec<Node>) -> Self {
        Self { exits }
    }

    fn distance_to_exit(&self, node: &Node) -> OrderedFloat<f64> {
        self.exits
            .iter()
            .map(|exit| OrderedFloat(node.distance(exit)))
            .min()
            .unwrap_or(OrderedFloat(f64::INFINITY))
    }
}

impl RoutingPolicy for NearestExit {
    fn candidates(
        &self,
        from: Node,
        to: Node,
        network: &RoadNetwork,
        ledger: &CapacityLedger,
    ) -> Vec<Candidate> {
        let mut best: Option<(OrderedFloat<f64>, Candidate)> = None;
        for candidate in open_segments(to, network, ledger) {
            if candidate.next == from {
                continue;
            }
            let distance = self.distance_to_exit(&candidate.next);
            // Strict comparison keeps the first of equally close candidates
            match best {
                Some((closest, _)) if distance >= closest => {}
                _ => best = Some((distance, candidate)),
            }
        }
        best.map(|(_, candidate)| vec![candidate]).unwrap_or_default()
    }

    fn kind(&self) -> PolicyKind {
        PolicyKind::NearestExit
    }
}

/// Allows any open segment that does not head further west than the
/// tolerance permits
#[derive(Debug, Clone)]
pub struct NoLeftTurn {
    west_tolerance: f64,
}

impl NoLeftTurn {
    pub fn new(west_tolerance: f64) -> Self {
        Self { west_tolerance }
    }
}

impl RoutingPolicy for NoLeftTurn {
    fn candidates(
        &self,
        _from: Node,
        to: Node,
        network: &RoadNetwork,
        ledger: &CapacityLedger,
    ) -> Vec<Candidate> {
        let min_x = f64::from(to.x) - self.west_tolerance;
        open_segments(to, network, ledger)
            .into_iter()
            .filter(|candidate| f64::from(candidate.next.x) >= min_x)
            .collect()
    }

    fn kind(&self) -> PolicyKind {
        PolicyKind::NoLeftTurn
    }
}

/// Any open segment at all
#[derive(Debug, Clone, Default)]
pub struct Unrestricted;

impl RoutingPolicy for Unrestricted {
    fn candidates(
        &self,
        _from: Node,
        to: Node,
        network: &RoadNetwork,
        ledger: &CapacityLedger,
    ) -> Vec<Candidate> {
        open_segments(to, network, ledger)
    }

    fn kind(&self) -> PolicyKind {
        PolicyKind::Unrestricted
    }
}

/// Selector for the three routing policies
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum PolicyKind {
    NearestExit,
    NoLeftTurn,
    Unrestricted,
}

impl PolicyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PolicyKind::NearestExit => "nearest-exit",
            PolicyKind::NoLeftTurn => "no-left-turn",
            PolicyKind::Unrestricted => "unrestricted",
        }
    }

    /// Instantiates the policy with the run's exits and tolerances
    pub fn build(self, exits: &[Node], west_tolerance: f64) -> Box<dyn RoutingPolicy> {
        match self {
            PolicyKind::NearestExit => Box::new(NearestExit::new(exits.to_vec())),
            PolicyKind::NoLeftTurn => Box::new(NoLeftTurn::new(west_tolerance)),
            PolicyKind::Unrestricted => Box::new(Unrestricted),
        }
    }
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PolicyKind {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "nearest-exit" => Ok(PolicyKind::NearestExit),
            "no-left-turn" => Ok(PolicyKind::NoLeftTurn),
            "unrestricted" => Ok(PolicyKind::Unrestricted),
            _ => Err(SimError::UnknownRoutingPolicy(s.to_string())),
        }
    }
}
