//! Time-ordered event queue
//!
//! Events pop in non-decreasing timestamp order. Events with equal
//! timestamps pop in the order they were pushed.

use ordered_float::OrderedFloat;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

use super::types::Event;

#[derive(Debug, Clone)]
struct Scheduled {
    timestamp: OrderedFloat<f64>,
    /// Insertion counter, breaks timestamp ties
    sequence: u64,
    event: Event,
}

impl PartialEq for Scheduled {
    fn eq(&self, other: &Self) -> bool {
        self.timestamp == other.timestamp && self.sequence == other.sequence
    }
}

impl Eq for Scheduled {}

impl Ord for Scheduled {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed so the max-heap yields the earliest event first
        other
            .timestamp
            .cmp(&self.timestamp)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

impl PartialOrd for Scheduled {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Debug, Default)]
pub struct EventScheduler {
    now: f64,
    next_sequence: u64,
    events: BinaryHeap<Scheduled>,
}

impl EventScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Timestamp of the most recently popped event
    pub fn now(&self) -> f64 {
        self.now
    }

    pub fn schedule(&mut self, event: Event) {
        debug_assert!(
            event.timestamp() >= self.now,
            "event timestamp must be >= current time"
        );
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.events.push(Scheduled {
            timestamp: OrderedFloat(event.timestamp()),
            sequence,
            event,
        });
    }

    pub fn pop_next(&mut self) -> Option<Event> {
        let scheduled = self.events.pop()?;
        self.now = scheduled.timestamp.into_inner();
        Some(scheduled.event)
    }

    pub fn peek(&self) -> Option<&Event> {
        self.events.peek().map(|scheduled| &scheduled.event)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Pending events in no particular order
    pub fn pending(&self) -> impl Iterator<Item = &Event> {
        self.events.iter().map(|scheduled| &scheduled.event)
    }
}
