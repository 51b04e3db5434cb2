use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use super::QueueId;

/// The two things that can happen at a queue
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum EventKind {
    /// A packet arrives at the queue
    Arrival,
    /// The queue's server completes a service
    Departure,
}

impl EventKind {
    /// Rank used as the second key of the event order. Arrivals sort before departures.
    fn rank(self) -> u8 {
        match self {
            EventKind::Arrival => 0,
            EventKind::Departure => 1,
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventKind::Arrival => write!(f, "arrival"),
            EventKind::Departure => write!(f, "departure"),
        }
    }
}

/// A pending occurrence in simulated time.
///
/// Events are totally ordered by `(time, kind, queue_id)`:
/// - `time` is compared with `f64::total_cmp`, so the order is total even for equal or
///   signed-zero timestamps;
/// - on equal times an `Arrival` sorts before a `Departure`;
/// - on equal time and kind the lower queue id sorts first.
///
/// Two events that compare equal are indistinguishable, so the order of a replay with the
/// same seed is fully determined.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Event {
    /// Simulated time at which the event fires
    pub time: f64,
    /// What happens
    pub kind: EventKind,
    /// The queue the event belongs to
    pub queue_id: QueueId,
}

impl Event {
    pub fn arrival(time: f64, queue_id: QueueId) -> Self {
        Self { time, kind: EventKind::Arrival, queue_id }
    }

    pub fn departure(time: f64, queue_id: QueueId) -> Self {
        Self { time, kind: EventKind::Departure, queue_id }
    }

    /// Compares two events by `(time, kind, queue_id)`.
    pub fn chronological_cmp(&self, other: &Self) -> Ordering {
        self.time
            .total_cmp(&other.time)
            .then_with(|| self.kind.rank().cmp(&other.kind.rank()))
            .then_with(|| self.queue_id.cmp(&other.queue_id))
    }
}

impl PartialEq for Event {
    fn eq(&self, other: &Self) -> bool {
        self.chronological_cmp(other) == Ordering::Equal
    }
}

impl Eq for Event {}

impl PartialOrd for Event {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Event {
    fn cmp(&self, other: &Self) -> Ordering {
        self.chronological_cmp(other)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {} (t={})", self.kind, self.queue_id, self.time)
    }
}
