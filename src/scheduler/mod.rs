use std::cmp::Reverse;
use std::collections::BinaryHeap;
use thiserror::Error;
use crate::types::Event;


#[derive(Debug, Error, Clone, PartialEq)]
pub enum SchedulerError {
    #[error("Event list empty at (simulated) time {time}")]
    Exhausted { time: f64 },
    #[error("Cannot schedule {event} before the current (simulated) time {now}")]
    ScheduledInPast { event: Event, now: f64 },
    #[error("Cannot schedule {event}: time is not finite")]
    NonFiniteTime { event: Event },
}

/// Pending events ordered by `(time, kind, queue_id)`, together with the simulation clock.
///
/// The clock only moves when [`EventList::next`] hands out an event, and never moves
/// backwards because no event earlier than the clock is accepted.
#[derive(Debug, Default)]
pub struct EventList {
    /// Min-heap of pending events
    pending: BinaryHeap<Reverse<Event>>,
    /// Current simulated time
    clock: f64,
    /// Number of events taken so far
    dispatched: u64,
}

impl EventList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an event. O(log n).
    pub fn schedule(&mut self, event: Event) -> Result<(), SchedulerError> {
        if !event.time.is_finite() {
            return Err(SchedulerError::NonFiniteTime { event });
        }
        if event.time < self.clock {
            return Err(SchedulerError::ScheduledInPast { event, now: self.clock });
        }
        self.pending.push(Reverse(event));
        Ok(())
    }

    /// Removes the earliest event and advances the clock to its time. O(log n).
    pub fn next(&mut self) -> Result<Event, SchedulerError> {
        let Reverse(event) = self
            .pending
            .pop()
            .ok_or(SchedulerError::Exhausted { time: self.clock })?;
        self.clock = event.time;
        self.dispatched += 1;
        Ok(event)
    }

    /// Returns the earliest pending event without removing it
    pub fn peek(&self) -> Option<&Event> {
        self.pending.peek().map(|Reverse(event)| event)
    }

    /// Current simulated time
    pub fn now(&self) -> f64 {
        self.clock
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Number of events handed out by `next`
    pub fn events_dispatched(&self) -> u64 {
        self.dispatched
    }
}
