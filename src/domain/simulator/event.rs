use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::domain::fog_system_model::resource::session_process::ProcessKey;

/// Virtual simulation time.
pub type SimTime = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Next mobility frame.
    ClientRefresh,
    /// Departures, then arrivals, then a metrics sample.
    ServiceMonitor,
    Orchestrate,
    /// Continuation of a session-serving process.
    SessionResume(ProcessKey),
    Stop,
}

#[derive(Debug)]
struct Scheduled {
    time: SimTime,
    seq: u64,
    event: Event,
}

impl PartialEq for Scheduled {
    fn eq(&self, other: &Self) -> bool {
        self.time == other.time && self.seq == other.seq
    }
}

impl Eq for Scheduled {}

impl PartialOrd for Scheduled {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Scheduled {
    // Reversed so the max-heap pops the earliest (time, seq) first.
    fn cmp(&self, other: &Self) -> Ordering {
        other.time.cmp(&self.time).then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Pending events ordered by timestamp, FIFO among equal timestamps.
#[derive(Debug, Default)]
pub struct EventQueue {
    heap: BinaryHeap<Scheduled>,
    next_seq: u64,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, time: SimTime, event: Event) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Scheduled { time, seq, event });
    }

    pub fn pop(&mut self) -> Option<(SimTime, Event)> {
        self.heap.pop().map(|s| (s.time, s.event))
    }
}
