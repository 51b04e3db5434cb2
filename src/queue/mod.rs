use thiserror::Error;
use crate::types::QueueId;

pub mod node;
pub use node::{ArrivalOutcome, Departure, DepartureOutcome, QueueNode};


/// A packet found its queue busy and the buffer already holding `capacity` packets
#[derive(Debug, Error, Clone, PartialEq)]
#[error("{name} overflow at (simulated) time {time} (buffer limit {capacity})")]
pub struct OverflowError {
    pub queue_id: QueueId,
    pub name: String,
    pub time: f64,
    pub capacity: usize,
}
