use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::routing::NodeId;

/// Events that move clients through the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// External arrival at a station.
    Arrival { node: NodeId },
    /// Service completion that sends the client out of the network.
    Departure { origin: NodeId },
    /// Service completion that forwards the client to another station.
    Passage { origin: NodeId, destination: NodeId },
}

/// An event pinned to an absolute simulation time.
#[derive(Debug, Clone, Copy)]
pub struct ScheduledEvent {
    time: f64,
    event: Event,
    sequence: u64,
}

impl ScheduledEvent {
    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn event(&self) -> Event {
        self.event
    }
}

impl PartialEq for ScheduledEvent {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ScheduledEvent {}

impl PartialOrd for ScheduledEvent {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScheduledEvent {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max heap: reverse both keys so the earliest time,
        // then the earliest insertion, pops first.
        other
            .time
            .total_cmp(&self.time)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

/// Time-ordered schedule of pending events.
#[derive(Debug, Default)]
pub struct EventSchedule {
    heap: BinaryHeap<ScheduledEvent>,
    next_sequence: u64,
}

impl EventSchedule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, time: f64, event: Event) {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.heap.push(ScheduledEvent {
            time,
            event,
            sequence,
        });
    }

    pub fn pop_earliest(&mut self) -> Option<ScheduledEvent> {
        self.heap.pop()
    }

    pub fn peek_earliest(&self) -> Option<&ScheduledEvent> {
        self.heap.peek()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn clear(&mut self) {
        self.heap.clear();
        self.next_sequence = 0;
    }
}
