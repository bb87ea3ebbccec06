//! Road network graph with per-segment capacity
//!
//! Built once from topology records and read-only for the rest of a run.

use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;
use std::collections::{BTreeMap, HashMap};

use super::error::{SimError, SimResult};
use super::topology::TopologyRecord;
use super::types::{Node, ParkingLot};

/// Stable handle to a directed segment
pub type SegmentId = EdgeIndex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    Street,
    /// One-way egress from a parking lot into its intersection; its
    /// capacity is bookkeeping and never holds a vehicle back
    ParkingExit,
}

/// Edge data for the road network graph
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub from: Node,
    pub to: Node,
    pub lanes: u32,
    /// Vehicles that fit on the segment at once
    pub capacity: u32,
    pub kind: SegmentKind,
}

impl Segment {
    pub fn new(from: Node, to: Node, lanes: u32, kind: SegmentKind, car_length: f64) -> Self {
        let capacity = (from.distance(&to) * f64::from(lanes) / car_length).floor() as u32;
        Self {
            from,
            to,
            lanes,
            capacity,
            kind,
        }
    }
}

#[derive(Default)]
pub struct RoadNetwork {
    graph: DiGraph<Node, Segment>,

    /// Maps coordinates to their node indices in the graph
    node_index: HashMap<Node, NodeIndex>,

    parking_lots: BTreeMap<Node, ParkingLot>,
}

impl RoadNetwork {
    /// Builds the network, deriving every segment's capacity from its
    /// length, lane count and `car_length`
    pub fn from_records(records: &[TopologyRecord], car_length: f64) -> SimResult<Self> {
        if !(car_length > 0.0) {
            return Err(SimError::InvalidConfig(format!(
                "car length must be positive, got {car_length}"
            )));
        }

        let mut network = Self::default();
        for record in records {
            match *record {
                TopologyRecord::Street { a, b, lanes } => {
                    if a == b {
                        return Err(SimError::MalformedTopology(format!(
                            "street at {a} has zero length"
                        )));
                    }
                    network.add_segment(Segment::new(a, b, lanes, SegmentKind::Street, car_length))?;
                    network.add_segment(Segment::new(b, a, lanes, SegmentKind::Street, car_length))?;
                }
                TopologyRecord::Parking {
                    lot,
                    egress,
                    capacity,
                } => {
                    if lot == egress {
                        return Err(SimError::MalformedTopology(format!(
                            "parking lot at {lot} exits into itself"
                        )));
                    }
                    if network.parking_lots.contains_key(&lot) {
                        return Err(SimError::MalformedTopology(format!(
                            "parking lot at {lot} is declared twice"
                        )));
                    }
                    network.add_segment(Segment::new(
                        lot,
                        egress,
                        1,
                        SegmentKind::ParkingExit,
                        car_length,
                    ))?;
                    network.parking_lots.insert(
                        lot,
                        ParkingLot {
                            node: lot,
                            egress,
                            capacity,
                        },
                    );
                }
            }
        }

        log::info!(
            "Built road network: {} nodes, {} segments, {} parking lots, {} total capacity",
            network.node_count(),
            network.segment_count(),
            network.parking_lots.len(),
            network.total_capacity()
        );
        Ok(network)
    }

    fn ensure_node(&mut self, node: Node) -> NodeIndex {
        if let Some(index) = self.node_index.get(&node) {
            return *index;
        }
        let index = self.graph.add_node(node);
        self.node_index.insert(node, index);
        index
    }

    fn add_segment(&mut self, segment: Segment) -> SimResult<()> {
        let from = self.ensure_node(segment.from);
        let to = self.ensure_node(segment.to);

        if let Some(existing) = self.graph.find_edge(from, to) {
            let existing = self.graph[existing];
            if existing.kind == SegmentKind::Street
                && segment.kind == SegmentKind::Street
                && existing.lanes == segment.lanes
            {
                log::debug!("Ignoring repeated street {} -> {}", segment.from, segment.to);
                return Ok(());
            }
            return Err(SimError::MalformedTopology(format!(
                "segment {} -> {} declared twice inconsistently ({} vs {} lanes)",
                segment.from, segment.to, existing.lanes, segment.lanes
            )));
        }

        self.graph.add_edge(from, to, segment);
        Ok(())
    }

    /// Finds the directed segment between two nodes
    pub fn find_segment(&self, from: Node, to: Node) -> Option<SegmentId> {
        let from = self.node_index.get(&from)?;
        let to = self.node_index.get(&to)?;
        self.graph.find_edge(*from, *to)
    }

    pub fn segment(&self, id: SegmentId) -> Option<&Segment> {
        self.graph.edge_weight(id)
    }

    /// Segments leaving `node`, as `(next node, segment)` pairs in adjacency order
    pub fn downstream(&self, node: Node) -> impl Iterator<Item = (Node, SegmentId)> + '_ {
        self.node_index
            .get(&node)
            .into_iter()
            .flat_map(move |index| {
                self.graph
                    .edges(*index)
                    .map(|edge| (edge.weight().to, edge.id()))
            })
    }

    pub fn segments(&self) -> impl Iterator<Item = (SegmentId, &Segment)> {
        self.graph
            .edge_indices()
            .filter_map(|id| self.graph.edge_weight(id).map(|segment| (id, segment)))
    }

    pub fn contains(&self, node: Node) -> bool {
        self.node_index.contains_key(&node)
    }

    /// Parking lots ordered by coordinate
    pub fn parking_lots(&self) -> impl Iterator<Item = &ParkingLot> {
        self.parking_lots.values()
    }

    pub fn node_count(&self) -> usize {
        self.node_index.len()
    }

    pub fn segment_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn total_capacity(&self) -> u64 {
        self.graph
            .edge_weights()
            .map(|segment| u64::from(segment.capacity))
            .sum()
    }
}
