//! Mutable per-segment occupancy layered on the road network
//!
//! The ledger stores free slots per segment. `reserve` takes a slot,
//! `release` gives one back. Callers probe availability before reserving;
//! a reserve on a full segment is a contract violation and is reported as
//! [`SimError::CapacityExceeded`] rather than letting the counter wrap.
//!
//! Parking-lot exits carry a capacity for bookkeeping only. They are always
//! open, and `reserve`/`release` leave their counters untouched.

use super::error::{SimError, SimResult};
use super::road_network::{RoadNetwork, SegmentId, SegmentKind};
use super::types::Node;

#[derive(Debug, Clone)]
pub struct CapacityLedger {
    /// Free slots, indexed by segment index
    available: Vec<u32>,
    capacity: Vec<u32>,
    /// False for segments that never block a vehicle
    throttled: Vec<bool>,
    total_free: u64,
}

impl CapacityLedger {
    /// Starts with every segment empty
    pub fn new(network: &RoadNetwork) -> Self {
        let mut capacity = vec![0; network.segment_count()];
        let mut throttled = vec![true; network.segment_count()];
        for (id, segment) in network.segments() {
            capacity[id.index()] = segment.capacity;
            throttled[id.index()] = segment.kind == SegmentKind::Street;
        }
        let total_free = capacity.iter().map(|c| u64::from(*c)).sum();
        Self {
            available: capacity.clone(),
            capacity,
            throttled,
            total_free,
        }
    }

    fn lookup(&self, network: &RoadNetwork, from: Node, to: Node) -> SimResult<SegmentId> {
        network
            .find_segment(from, to)
            .filter(|id| id.index() < self.available.len())
            .ok_or(SimError::UnknownSegment { from, to })
    }

    /// Takes one slot on `(from, to)`
    pub fn reserve(&mut self, network: &RoadNetwork, from: Node, to: Node) -> SimResult<()> {
        let id = self.lookup(network, from, to)?;
        if !self.throttled[id.index()] {
            return Ok(());
        }
        let slot = &mut self.available[id.index()];
        if *slot == 0 {
            return Err(SimError::CapacityExceeded { from, to });
        }
        *slot -= 1;
        self.total_free -= 1;
        Ok(())
    }

    /// Returns one slot on `(from, to)`, never exceeding the segment's capacity
    pub fn release(&mut self, network: &RoadNetwork, from: Node, to: Node) -> SimResult<()> {
        let id = self.lookup(network, from, to)?;
        let index = id.index();
        if !self.throttled[index] {
            return Ok(());
        }
        if self.available[index] < self.capacity[index] {
            self.available[index] += 1;
            self.total_free += 1;
        } else {
            log::warn!("Release on empty segment {from} -> {to} ignored");
        }
        Ok(())
    }

    /// Free slots on a segment by id
    pub fn available_on(&self, id: SegmentId) -> u32 {
        self.available.get(id.index()).copied().unwrap_or(0)
    }

    /// Whether a vehicle may enter the segment now
    pub fn is_open(&self, id: SegmentId) -> bool {
        match self.throttled.get(id.index()) {
            Some(true) => self.available_on(id) > 0,
            Some(false) => true,
            None => false,
        }
    }

    pub fn available(&self, network: &RoadNetwork, from: Node, to: Node) -> SimResult<u32> {
        let id = self.lookup(network, from, to)?;
        Ok(self.available[id.index()])
    }

    /// Vehicles currently committed to `(from, to)`
    pub fn occupancy(&self, network: &RoadNetwork, from: Node, to: Node) -> SimResult<u32> {
        let id = self.lookup(network, from, to)?;
        Ok(self.capacity[id.index()] - self.available[id.index()])
    }

    /// Free slots summed over the whole network
    pub fn total_free(&self) -> u64 {
        self.total_free
    }

    /// Occupied slots summed over the whole network
    pub fn total_occupied(&self) -> u64 {
        self.capacity.iter().map(|c| u64::from(*c)).sum::<u64>() - self.total_free
    }

    /// `(occupancy, capacity)` for every segment, indexed by segment index
    pub fn snapshot(&self) -> Vec<(u32, u32)> {
        self.available
            .iter()
            .zip(&self.capacity)
            .map(|(free, cap)| (cap - free, *cap))
            .collect()
    }
}
